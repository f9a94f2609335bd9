//! Form validation rules and schemas.

use chrono::NaiveDate;
use food_en_k_core::{Email, PhoneNumber};
use serde::Serialize;

/// Field errors in schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors(Vec<(String, Vec<String>)>);

impl ValidationErrors {
    /// Record an error for `field`.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        let message = message.into();
        if let Some((_, messages)) = self.0.iter_mut().find(|(f, _)| f == field) {
            messages.push(message);
        } else {
            self.0.push((field.to_string(), vec![message]));
        }
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, messages)| messages.as_slice())
    }

    /// First error of a field, for inline display.
    #[must_use]
    pub fn first(&self, field: &str) -> Option<&str> {
        self.get(field)
            .and_then(<[String]>::first)
            .map(String::as_str)
    }

    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }
}

/// Read access to submitted form fields.
pub trait FormData {
    /// Raw value of a field, `None` when absent.
    fn field(&self, name: &str) -> Option<String>;
}

// =============================================================================
// Basic checks
// =============================================================================

#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    Email::parse(email).is_ok()
}

#[must_use]
pub fn is_valid_phone(phone: &str) -> bool {
    PhoneNumber::is_valid(phone)
}

#[must_use]
pub fn is_required(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

#[must_use]
pub fn min_length(value: &str, min: usize) -> bool {
    value.trim().chars().count() >= min
}

#[must_use]
pub fn max_length(value: &str, max: usize) -> bool {
    value.trim().chars().count() <= max
}

#[must_use]
pub fn is_positive_number(value: &str) -> bool {
    value
        .trim()
        .parse::<f64>()
        .is_ok_and(|n| n.is_finite() && n > 0.0)
}

/// `YYYY-MM-DD` strictly after `today`.
#[must_use]
pub fn is_future_date(value: &str, today: NaiveDate) -> bool {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").is_ok_and(|date| date > today)
}

// =============================================================================
// Schemas
// =============================================================================

/// A single check applied to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    MinLength(usize),
    MaxLength(usize),
    Email,
    /// Valid French number, or empty.
    OptionalPhone,
    FutureDate,
    PositiveNumber,
}

impl Rule {
    fn check(self, value: Option<&str>, today: NaiveDate) -> bool {
        let text = value.unwrap_or("");
        match self {
            Self::Required => is_required(value),
            Self::MinLength(min) => min_length(text, min),
            Self::MaxLength(max) => max_length(text, max),
            Self::Email => is_valid_email(text),
            Self::OptionalPhone => text.trim().is_empty() || is_valid_phone(text),
            Self::FutureDate => is_future_date(text, today),
            Self::PositiveNumber => is_positive_number(text),
        }
    }
}

/// Rules per field, checked in order.
#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<(&'static str, Vec<(Rule, &'static str)>)>,
}

impl Schema {
    /// General contact form.
    #[must_use]
    pub fn contact() -> Self {
        Self {
            fields: vec![
                (
                    "name",
                    vec![
                        (Rule::Required, "Le nom est requis"),
                        (Rule::MinLength(2), "Le nom doit contenir au moins 2 caractères"),
                    ],
                ),
                (
                    "email",
                    vec![
                        (Rule::Required, "L'email est requis"),
                        (Rule::Email, "L'email doit être valide"),
                    ],
                ),
                (
                    "phone",
                    vec![(Rule::OptionalPhone, "Le téléphone doit être valide")],
                ),
                (
                    "message",
                    vec![
                        (Rule::Required, "Le message est requis"),
                        (
                            Rule::MinLength(10),
                            "Le message doit contenir au moins 10 caractères",
                        ),
                    ],
                ),
            ],
        }
    }

    /// Contact form plus event details.
    #[must_use]
    pub fn event() -> Self {
        let mut schema = Self::contact();
        schema.fields.push((
            "event_date",
            vec![
                (Rule::Required, "La date de l'événement est requise"),
                (Rule::FutureDate, "La date doit être dans le futur"),
            ],
        ));
        schema.fields.push((
            "estimated_guests",
            vec![
                (Rule::Required, "Le nombre d'invités est requis"),
                (
                    Rule::PositiveNumber,
                    "Le nombre d'invités doit être positif",
                ),
            ],
        ));
        schema
    }

    /// Check one value against a rule list.
    #[must_use]
    pub fn validate_field(
        value: Option<&str>,
        rules: &[(Rule, &'static str)],
        today: NaiveDate,
    ) -> Vec<String> {
        rules
            .iter()
            .filter(|(rule, _)| !rule.check(value, today))
            .map(|(_, message)| (*message).to_string())
            .collect()
    }

    /// Check every field of the schema.
    #[must_use]
    pub fn validate(&self, data: &dyn FormData, today: NaiveDate) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        for (field, rules) in &self.fields {
            let value = data.field(field);
            for message in Self::validate_field(value.as_deref(), rules, today) {
                errors.add(field, message);
            }
        }
        errors
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Fields(HashMap<&'static str, &'static str>);

    impl FormData for Fields {
        fn field(&self, name: &str) -> Option<String> {
            self.0.get(name).map(ToString::to_string)
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_basic_checks() {
        assert!(is_valid_email(" chef@food-en-k.com "));
        assert!(!is_valid_email("chef@food"));
        assert!(is_valid_phone("06 24 31 67 90"));
        assert!(!is_valid_phone("12345"));
        assert!(!is_required(Some("   ")));
        assert!(!is_required(None));
        assert!(min_length(" ab ", 2));
        assert!(!max_length("abcdef", 5));
        assert!(is_positive_number("120"));
        assert!(!is_positive_number("-3"));
        assert!(!is_positive_number("beaucoup"));
    }

    #[test]
    fn test_future_date() {
        assert!(is_future_date("2026-10-20", today()));
        assert!(!is_future_date("2026-10-19", today()));
        assert!(!is_future_date("20/10/2026", today()));
    }

    #[test]
    fn test_contact_schema_valid() {
        let data = Fields(HashMap::from([
            ("name", "Jeanne"),
            ("email", "jeanne@example.fr"),
            ("phone", ""),
            ("message", "Bonjour, êtes-vous à Rennes samedi ?"),
        ]));
        assert!(Schema::contact().validate(&data, today()).is_empty());
    }

    #[test]
    fn test_contact_schema_collects_every_failure() {
        let data = Fields(HashMap::from([
            ("email", "pas-un-email"),
            ("phone", "123"),
            ("message", "court"),
        ]));
        let errors = Schema::contact().validate(&data, today());

        assert_eq!(
            errors.get("name").unwrap(),
            ["Le nom est requis", "Le nom doit contenir au moins 2 caractères"]
        );
        assert_eq!(errors.first("email"), Some("L'email doit être valide"));
        assert!(errors.has("phone"));
        assert_eq!(
            errors.first("message"),
            Some("Le message doit contenir au moins 10 caractères")
        );
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_event_schema() {
        let data = Fields(HashMap::from([
            ("name", "Jeanne"),
            ("email", "jeanne@example.fr"),
            ("message", "Mariage de 120 personnes en juin"),
            ("event_date", "2026-01-01"),
            ("estimated_guests", "0"),
        ]));
        let errors = Schema::event().validate(&data, today());
        assert_eq!(
            errors.first("event_date"),
            Some("La date doit être dans le futur")
        );
        assert_eq!(
            errors.first("estimated_guests"),
            Some("Le nombre d'invités doit être positif")
        );
    }

    #[test]
    fn test_errors_keep_field_order() {
        let mut errors = ValidationErrors::default();
        errors.add("b", "1");
        errors.add("a", "2");
        errors.add("b", "3");
        let fields: Vec<&str> = errors.iter().map(|(f, _)| f).collect();
        assert_eq!(fields, vec!["b", "a"]);
        assert_eq!(errors.get("b").unwrap().len(), 2);
    }
}
