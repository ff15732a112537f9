use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    core::{
        country::{CountryRegistry, CountryStore},
        store::{MemoryPersonStore, PersonStore},
    },
    error::{DirectoryError, Result},
    person::{PersonRecord, PersonRequest, PersonResponse, PersonUpdateRequest},
    types::{CountryId, PersonId, SortOrder},
    validate::{validate, validate_id},
};

use super::{
    query::{self, PersonField},
    response::{self, Clock, SystemClock},
};

/// Person query and mutation logic over injected stores.
///
/// Every read goes through response assembly, so a person whose country
/// cannot be resolved surfaces as [`DirectoryError::NotFound`].
pub struct PersonService<S = MemoryPersonStore, C = CountryRegistry> {
    persons: S,
    countries: C,
    clock: Box<dyn Clock>,
}

impl PersonService {
    /// Service over empty in-memory stores.
    pub fn in_memory() -> Self {
        Self::new(MemoryPersonStore::new(), CountryRegistry::new())
    }
}

impl<S: PersonStore, C: CountryStore> PersonService<S, C> {
    /// Wraps the given stores, deriving ages from the system clock.
    pub fn new(persons: S, countries: C) -> Self {
        Self {
            persons,
            countries,
            clock: Box::new(SystemClock),
        }
    }

    /// Replaces the clock used for age derivation.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Country store backing referential checks.
    pub fn countries(&self) -> &C {
        &self.countries
    }

    /// Mutable access to the country store, e.g. to add countries.
    pub fn countries_mut(&mut self) -> &mut C {
        &mut self.countries
    }

    /// Underlying person store.
    pub fn persons(&self) -> &S {
        &self.persons
    }

    /// Number of stored persons.
    pub fn len(&self) -> usize {
        self.persons.len()
    }

    /// Returns true when no person is stored.
    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    /// Validates and stores a new person in an existing country.
    pub fn add(&mut self, request: impl Into<Option<PersonRequest>>) -> Result<PersonResponse> {
        let request = request
            .into()
            .ok_or(DirectoryError::MissingArgument("person request"))?;
        validate(&request)?;

        let rec = request.into_record(Uuid::new_v4());
        self.ensure_country(rec.country_id)?;
        let response = self.to_response(&rec)?;

        info!(id = %rec.id, country = ?rec.country_id, "person added");
        self.persons.insert(rec)?;
        Ok(response)
    }

    /// Fetches one person by id.
    pub fn get_by_id(&self, id: impl Into<Option<PersonId>>) -> Result<PersonResponse> {
        let id = validate_id(id.into())?;
        debug!(%id, "get person");

        let rec = self
            .persons
            .get(id)
            .ok_or(DirectoryError::person_not_found(id))?;
        self.ensure_country(rec.country_id)?;
        self.to_response(rec)
    }

    /// Every stored person, oldest first.
    ///
    /// Fails as a whole if any person's country no longer resolves.
    pub fn list(&self) -> Result<Vec<PersonResponse>> {
        self.persons
            .records()
            .into_iter()
            .map(|rec| self.to_response(rec))
            .collect()
    }

    /// Filters [`Self::list`] by a field given by name.
    ///
    /// A blank or unrecognized field, or blank text, yields the full list.
    pub fn filtered(&self, field: &str, text: &str) -> Result<Vec<PersonResponse>> {
        Ok(query::filter_named(self.list()?, field, text))
    }

    /// Filters [`Self::list`] on a typed field.
    pub fn filter_by(&self, field: PersonField, text: &str) -> Result<Vec<PersonResponse>> {
        Ok(query::filter(self.list()?, field, text))
    }

    /// Sorts `list` by a field given by name.
    ///
    /// A blank or unrecognized field returns `list` untouched.
    pub fn sorted(&self, list: Vec<PersonResponse>, field: &str, order: SortOrder) -> Vec<PersonResponse> {
        query::sort_named(list, field, order)
    }

    /// Sorts `list` on a typed field.
    pub fn sort_by(&self, list: Vec<PersonResponse>, field: PersonField, order: SortOrder) -> Vec<PersonResponse> {
        query::sort(list, field, order)
    }

    /// Overwrites the editable fields of an existing person.
    ///
    /// The person's country id is never reassigned. The returned country
    /// name comes from the country store, like every other read.
    pub fn update(&mut self, request: impl Into<Option<PersonUpdateRequest>>) -> Result<PersonResponse> {
        let request = request
            .into()
            .ok_or(DirectoryError::MissingArgument("person update request"))?;
        validate(&request)?;

        let id = request.id;
        let mut updated = self
            .persons
            .get(id)
            .cloned()
            .ok_or(DirectoryError::person_not_found(id))?;
        request.apply_to(&mut updated);
        let response = self.to_response(&updated)?;

        let rec = self
            .persons
            .get_mut(id)
            .ok_or(DirectoryError::person_not_found(id))?;
        *rec = updated;
        info!(%id, "person updated");
        Ok(response)
    }

    /// Removes a person; `Ok(false)` when nothing matched.
    pub fn delete(&mut self, id: impl Into<Option<PersonId>>) -> Result<bool> {
        let id = match id.into() {
            Some(id) if !id.is_nil() => id,
            _ => return Err(DirectoryError::MissingArgument("person id")),
        };

        let removed = self.persons.remove(id).is_some();
        if removed {
            info!(%id, "person deleted");
        } else {
            debug!(%id, "delete missed");
        }
        Ok(removed)
    }

    fn ensure_country(&self, id: Option<CountryId>) -> Result<()> {
        let known = id.is_some_and(|id| self.countries.get(id).is_ok());
        if known {
            Ok(())
        } else {
            warn!(country = ?id, "person references unknown country");
            Err(DirectoryError::country_not_found(id))
        }
    }

    fn to_response(&self, rec: &PersonRecord) -> Result<PersonResponse> {
        response::assemble(rec, &self.countries, self.clock.today())
    }
}
