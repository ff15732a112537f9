use chrono::{Local, NaiveDate};

use crate::{
    core::country::CountryStore,
    error::{DirectoryError, Result},
    person::{PersonRecord, PersonResponse},
};

const DAYS_PER_YEAR: f64 = 365.25;

/// Source of "today" for age derivation.
pub trait Clock: Send + Sync {
    /// Current calendar date.
    fn today(&self) -> NaiveDate;
}

/// Reads the local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always reports the same date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Whole years between `birth` and `today`, rounded to nearest.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let days = (today - birth).num_days() as f64;
    (days / DAYS_PER_YEAR).round() as i32
}

/// Builds the read view of `rec`, joining its country name from `countries`.
///
/// The stored denormalized country name is ignored. An absent or nil
/// country id is reported as a missing country.
pub fn assemble<C: CountryStore>(rec: &PersonRecord, countries: &C, today: NaiveDate) -> Result<PersonResponse> {
    let country_id = rec
        .country_id
        .filter(|id| !id.is_nil())
        .ok_or(DirectoryError::country_not_found(rec.country_id))?;
    let country = countries.get(country_id)?;

    Ok(PersonResponse {
        id: rec.id,
        name: rec.name.clone(),
        email: rec.email.clone(),
        birth_date: rec.birth_date,
        gender: rec.gender,
        country_id: rec.country_id,
        country_name: Some(country.name),
        receive_newsletters: rec.receive_newsletters,
        age: rec.birth_date.map(|birth| age_on(birth, today)),
    })
}
