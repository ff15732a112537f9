//! Person record, request, update, and response types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    types::{CountryId, Gender, PersonId},
    validate::{FieldRule, Rule, Validate},
};

/// Fully materialized, stored person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRecord {
    /// Server-assigned id.
    pub id: PersonId,
    /// Full name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Calendar birth date.
    pub birth_date: Option<NaiveDate>,
    /// Declared gender.
    pub gender: Option<Gender>,
    /// Country the person belongs to.
    pub country_id: Option<CountryId>,
    /// Denormalized country name as last supplied by a caller.
    ///
    /// Responses never read this; they look the name up from the country
    /// store.
    pub country_name: Option<String>,
    /// Newsletter opt-in.
    pub receive_newsletters: bool,
}

/// Insert payload used to create a new [`PersonRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRequest {
    /// Full name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Calendar birth date.
    pub birth_date: Option<NaiveDate>,
    /// Declared gender.
    pub gender: Option<Gender>,
    /// Country the person belongs to; must exist.
    pub country_id: Option<CountryId>,
    /// Country name as the caller knows it.
    pub country_name: Option<String>,
    /// Newsletter opt-in.
    pub receive_newsletters: bool,
}

impl PersonRequest {
    pub(crate) fn into_record(self, id: PersonId) -> PersonRecord {
        PersonRecord {
            id,
            name: self.name,
            email: self.email,
            birth_date: self.birth_date,
            gender: self.gender,
            country_id: self.country_id,
            country_name: self.country_name,
            receive_newsletters: self.receive_newsletters,
        }
    }
}

impl Validate for PersonRequest {
    fn rules(&self) -> Vec<FieldRule<'_>> {
        person_rules(&self.name, &self.email)
    }
}

/// Full replacement for the editable fields of an existing person.
///
/// `country_id` is carried for symmetry with [`PersonResponse`] but an
/// update never moves a person to another country.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonUpdateRequest {
    /// Id of the person to update.
    pub id: PersonId,
    /// Replacement name.
    pub name: String,
    /// Replacement email.
    pub email: String,
    /// Replacement birth date.
    pub birth_date: Option<NaiveDate>,
    /// Replacement gender.
    pub gender: Option<Gender>,
    /// Ignored by updates.
    pub country_id: Option<CountryId>,
    /// Replacement denormalized country name.
    pub country_name: Option<String>,
    /// Replacement newsletter opt-in.
    pub receive_newsletters: bool,
}

impl PersonUpdateRequest {
    /// Overwrites the editable fields of `rec` in place.
    pub fn apply_to(&self, rec: &mut PersonRecord) {
        rec.name = self.name.clone();
        rec.email = self.email.clone();
        rec.birth_date = self.birth_date;
        rec.gender = self.gender;
        rec.country_name = self.country_name.clone();
        rec.receive_newsletters = self.receive_newsletters;
    }
}

impl Validate for PersonUpdateRequest {
    fn rules(&self) -> Vec<FieldRule<'_>> {
        person_rules(&self.name, &self.email)
    }
}

fn person_rules<'a>(name: &'a str, email: &'a str) -> Vec<FieldRule<'a>> {
    vec![
        FieldRule::new("name", Some(name), Rule::Required, "Person Name is required"),
        FieldRule::new("email", Some(email), Rule::Required, "Email is required"),
        FieldRule::new("email", Some(email), Rule::Email, "Email is not valid"),
    ]
}

/// Read-side view of a person, with derived fields filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonResponse {
    /// Person id.
    pub id: PersonId,
    /// Full name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Calendar birth date.
    pub birth_date: Option<NaiveDate>,
    /// Declared gender.
    pub gender: Option<Gender>,
    /// Country id.
    pub country_id: Option<CountryId>,
    /// Authoritative country name from the country store.
    pub country_name: Option<String>,
    /// Newsletter opt-in.
    pub receive_newsletters: bool,
    /// Age in years derived from `birth_date`.
    pub age: Option<i32>,
}

impl PersonResponse {
    /// Builds an update request pre-filled with this response's values.
    pub fn to_update_request(&self) -> PersonUpdateRequest {
        PersonUpdateRequest {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            birth_date: self.birth_date,
            gender: self.gender,
            country_id: self.country_id,
            country_name: self.country_name.clone(),
            receive_newsletters: self.receive_newsletters,
        }
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::{error::DirectoryError, validate::validate};

    fn request(name: &str, email: &str) -> PersonRequest {
        PersonRequest {
            name: name.to_string(),
            email: email.to_string(),
            ..PersonRequest::default()
        }
    }

    #[test]
    fn person_rules_report_specific_messages() {
        let msg = |r: &PersonRequest| match validate(r) {
            Err(DirectoryError::ValidationFailed(m)) => m,
            other => panic!("expected validation failure, got {other:?}"),
        };

        assert_eq!(msg(&request("", "a@b.com")), "Person Name is required");
        assert_eq!(msg(&request("John Doe", "")), "Email is required");
        assert_eq!(msg(&request("John Doe", "john.doe")), "Email is not valid");
        assert!(validate(&request("John Doe", "john@doe.com")).is_ok());
    }

    #[test]
    fn apply_to_keeps_id_and_country_id() {
        let country = Uuid::new_v4();
        let mut rec = request("Ann", "ann@x.com").into_record(Uuid::new_v4());
        rec.country_id = Some(country);
        let id = rec.id;

        let update = PersonUpdateRequest {
            id,
            name: "Anna".into(),
            email: "anna@x.com".into(),
            gender: Some(Gender::Female),
            country_id: Some(Uuid::new_v4()),
            receive_newsletters: true,
            ..PersonUpdateRequest::default()
        };
        update.apply_to(&mut rec);

        assert_eq!(rec.id, id);
        assert_eq!(rec.country_id, Some(country));
        assert_eq!(rec.name, "Anna");
        assert_eq!(rec.gender, Some(Gender::Female));
        assert!(rec.receive_newsletters);
    }
}
