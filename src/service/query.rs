use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use tracing::debug;

use crate::{person::PersonResponse, types::SortOrder};

/// Display format for birth dates in filters, e.g. `15 May 1995`.
pub const BIRTH_DAY_FORMAT: &str = "%d %b %Y";

/// Person response fields that can drive filtering and sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersonField {
    /// Full name.
    PersonName,
    /// Email address.
    Email,
    /// Birth date.
    BirthDay,
    /// Derived age. Sort only.
    Age,
    /// Gender text.
    Gender,
    /// Joined country name.
    CountryName,
    /// Newsletter opt-in. Sort only.
    ReceiveNewsLetters,
}

impl PersonField {
    /// Every field, in declaration order.
    pub const ALL: [PersonField; 7] = [
        PersonField::PersonName,
        PersonField::Email,
        PersonField::BirthDay,
        PersonField::Age,
        PersonField::Gender,
        PersonField::CountryName,
        PersonField::ReceiveNewsLetters,
    ];

    /// Canonical field name.
    pub fn as_str(self) -> &'static str {
        match self {
            PersonField::PersonName => "PersonName",
            PersonField::Email => "Email",
            PersonField::BirthDay => "BirthDay",
            PersonField::Age => "Age",
            PersonField::Gender => "Gender",
            PersonField::CountryName => "CountryName",
            PersonField::ReceiveNewsLetters => "ReceiveNewsLetters",
        }
    }

    /// Returns false for fields that only support sorting.
    pub fn is_filterable(self) -> bool {
        !matches!(self, PersonField::Age | PersonField::ReceiveNewsLetters)
    }

    /// Tests `person` against `needle` using this field's match rule.
    ///
    /// Sort-only fields match everything.
    pub fn matches(self, person: &PersonResponse, needle: &str) -> bool {
        self.matches_lowered(person, &needle.to_lowercase())
    }

    pub(crate) fn matches_lowered(self, person: &PersonResponse, needle: &str) -> bool {
        match self {
            PersonField::PersonName => blank_or_contains(&person.name, needle),
            PersonField::Email => blank_or_contains(&person.email, needle),
            PersonField::BirthDay => person
                .birth_date
                .is_none_or(|d| format_birth_day(d).to_lowercase().contains(needle)),
            PersonField::Gender => person
                .gender
                .is_some_and(|g| g.as_str().to_lowercase() == needle),
            PersonField::CountryName => person
                .country_name
                .as_deref()
                .is_some_and(|c| c.to_lowercase().starts_with(needle)),
            PersonField::Age | PersonField::ReceiveNewsLetters => true,
        }
    }

    /// Ascending order of `a` relative to `b` on this field.
    pub fn compare(self, a: &PersonResponse, b: &PersonResponse) -> Ordering {
        match self {
            PersonField::PersonName => cmp_ignore_case(&a.name, &b.name),
            PersonField::Email => cmp_ignore_case(&a.email, &b.email),
            PersonField::BirthDay => a.birth_date.cmp(&b.birth_date),
            PersonField::Age => a.age.cmp(&b.age),
            PersonField::Gender => cmp_opt_ignore_case(
                a.gender.map(|g| g.as_str()),
                b.gender.map(|g| g.as_str()),
            ),
            PersonField::CountryName => {
                cmp_opt_ignore_case(a.country_name.as_deref(), b.country_name.as_deref())
            }
            PersonField::ReceiveNewsLetters => a.receive_newsletters.cmp(&b.receive_newsletters),
        }
    }
}

impl fmt::Display for PersonField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PersonField {
    type Err = String;

    /// Accepts canonical names case-insensitively, plus snake_case spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "personname" | "name" => Ok(PersonField::PersonName),
            "email" => Ok(PersonField::Email),
            "birthday" | "birthdate" => Ok(PersonField::BirthDay),
            "age" => Ok(PersonField::Age),
            "gender" => Ok(PersonField::Gender),
            "countryname" => Ok(PersonField::CountryName),
            "receivenewsletters" => Ok(PersonField::ReceiveNewsLetters),
            _ => Err(format!("unknown person field: {s}")),
        }
    }
}

/// Keeps the entries of `list` that match `needle` on `field`.
pub fn filter(list: Vec<PersonResponse>, field: PersonField, needle: &str) -> Vec<PersonResponse> {
    if needle.trim().is_empty() || !field.is_filterable() {
        return list;
    }
    let needle = needle.to_lowercase();
    list.into_iter()
        .filter(|p| field.matches_lowered(p, &needle))
        .collect()
}

/// Stable sort of `list` on `field`.
pub fn sort(mut list: Vec<PersonResponse>, field: PersonField, order: SortOrder) -> Vec<PersonResponse> {
    match order {
        SortOrder::Ascending => list.sort_by(|a, b| field.compare(a, b)),
        SortOrder::Descending => list.sort_by(|a, b| field.compare(b, a)),
    }
    list
}

/// [`filter`] with the field given by name.
///
/// A blank or unrecognized field, or blank text, returns `list` as is.
pub fn filter_named(list: Vec<PersonResponse>, field: &str, needle: &str) -> Vec<PersonResponse> {
    if field.trim().is_empty() || needle.trim().is_empty() {
        return list;
    }
    match field.parse::<PersonField>() {
        Ok(field) => filter(list, field, needle),
        Err(err) => {
            debug!(%err, "filter field not recognized, returning all");
            list
        }
    }
}

/// [`sort`] with the field given by name.
///
/// A blank or unrecognized field returns `list` as is.
pub fn sort_named(list: Vec<PersonResponse>, field: &str, order: SortOrder) -> Vec<PersonResponse> {
    if field.trim().is_empty() {
        return list;
    }
    match field.parse::<PersonField>() {
        Ok(field) => sort(list, field, order),
        Err(err) => {
            debug!(%err, "sort field not recognized, keeping order");
            list
        }
    }
}

/// Formats a birth date the way filters see it.
pub fn format_birth_day(date: NaiveDate) -> String {
    date.format(BIRTH_DAY_FORMAT).to_string()
}

fn blank_or_contains(value: &str, needle: &str) -> bool {
    value.trim().is_empty() || value.to_lowercase().contains(needle)
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

// None sorts first.
fn cmp_opt_ignore_case(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp_ignore_case(a, b),
        (a, b) => a.is_some().cmp(&b.is_some()),
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::types::Gender;

    fn resp(name: &str) -> PersonResponse {
        PersonResponse {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: format!("{}@mail.com", name.to_lowercase()),
            birth_date: None,
            gender: None,
            country_id: None,
            country_name: None,
            receive_newsletters: false,
            age: None,
        }
    }

    #[test]
    fn parses_canonical_and_snake_case_names() {
        for field in PersonField::ALL {
            assert_eq!(field.as_str().parse::<PersonField>(), Ok(field));
        }
        assert_eq!("person_name".parse::<PersonField>(), Ok(PersonField::PersonName));
        assert_eq!("birth_date".parse::<PersonField>(), Ok(PersonField::BirthDay));
        assert_eq!("receive_newsletters".parse::<PersonField>(), Ok(PersonField::ReceiveNewsLetters));
        assert!("Nickname".parse::<PersonField>().is_err());
    }

    #[test]
    fn birth_day_format_uses_short_month() {
        let d = NaiveDate::from_ymd_opt(1995, 5, 5).unwrap();
        assert_eq!(format_birth_day(d), "05 May 1995");
    }

    #[test]
    fn name_and_email_pass_blank_values() {
        let mut blank = resp("x");
        blank.name = "  ".into();
        assert!(PersonField::PersonName.matches(&blank, "zzz"));
        assert!(!PersonField::PersonName.matches(&resp("Alice"), "zzz"));
        assert!(PersonField::PersonName.matches(&resp("Alice"), "LIC"));
    }

    #[test]
    fn gender_requires_exact_text() {
        let mut p = resp("a");
        assert!(!PersonField::Gender.matches(&p, "male"));
        p.gender = Some(Gender::Female);
        assert!(!PersonField::Gender.matches(&p, "male"));
        assert!(PersonField::Gender.matches(&p, "FEMALE"));
    }

    #[test]
    fn country_name_is_prefix_without_vacuous_pass() {
        let mut p = resp("a");
        assert!(!PersonField::CountryName.matches(&p, "us"));
        p.country_name = Some("USA".into());
        assert!(PersonField::CountryName.matches(&p, "us"));
        assert!(!PersonField::CountryName.matches(&p, "sa"));
    }

    #[test]
    fn sort_only_fields_leave_list_untouched() {
        let list = vec![resp("b"), resp("a")];
        let out = filter(list.clone(), PersonField::Age, "30");
        assert_eq!(out, list);
    }

    #[test]
    fn absent_country_names_sort_first() {
        let mut a = resp("a");
        a.country_name = Some("india".into());
        let b = resp("b");
        let mut c = resp("c");
        c.country_name = Some("Chile".into());

        let out = sort(vec![a, b, c], PersonField::CountryName, SortOrder::Ascending);
        let names: Vec<_> = out.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["b", "c", "a"]);
    }

    #[test]
    fn descending_keeps_ties_in_input_order() {
        let mut first = resp("first");
        first.receive_newsletters = true;
        let mut second = resp("second");
        second.receive_newsletters = true;
        let third = resp("third");

        let out = sort(
            vec![third, first, second],
            PersonField::ReceiveNewsLetters,
            SortOrder::Descending,
        );
        let names: Vec<_> = out.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["first", "second", "third"]);
    }
}
