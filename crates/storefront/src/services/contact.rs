//! Contact and event request submission.
//!
//! Requests are validated, rendered to the plain-text body the team reads,
//! and stored in the CMS `contact-requests` collection.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::instrument;

use super::notifications::{Notification, Notifications};
use super::validation::{FormData, Schema, ValidationErrors, is_valid_email};
use crate::cms::ContentApi;

/// CMS collection receiving submissions.
pub const CONTACT_COLLECTION: &str = "contact-requests";

/// What the visitor is asking about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestType {
    Order,
    Event,
    Info,
    Other,
}

impl RequestType {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "order" => Some(Self::Order),
            "event" => Some(Self::Event),
            "info" => Some(Self::Info),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Order => "order",
            Self::Event => "event",
            Self::Info => "info",
            Self::Other => "other",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Order => "🍔 Commande burger",
            Self::Event => "🎉 Événement / Traiteur",
            Self::Info => "❓ Question générale",
            Self::Other => "📝 Autre demande",
        }
    }

    pub const ALL: [Self; 4] = [Self::Order, Self::Event, Self::Info, Self::Other];
}

/// Kind of event for catering requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Wedding,
    Corporate,
    Birthday,
    Festival,
    Inauguration,
    Seminar,
    Other,
}

impl EventType {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value.trim())
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wedding => "wedding",
            Self::Corporate => "corporate",
            Self::Birthday => "birthday",
            Self::Festival => "festival",
            Self::Inauguration => "inauguration",
            Self::Seminar => "seminar",
            Self::Other => "other",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Wedding => "Mariage",
            Self::Corporate => "Événement d'entreprise",
            Self::Birthday => "Anniversaire",
            Self::Festival => "Festival / Fête locale",
            Self::Inauguration => "Inauguration",
            Self::Seminar => "Séminaire",
            Self::Other => "Autre",
        }
    }

    pub const ALL: [Self; 7] = [
        Self::Wedding,
        Self::Corporate,
        Self::Birthday,
        Self::Festival,
        Self::Inauguration,
        Self::Seminar,
        Self::Other,
    ];
}

/// Approximate catering budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Budget {
    LessThan1000,
    #[serde(rename = "1000-2000")]
    From1000To2000,
    #[serde(rename = "2000-5000")]
    From2000To5000,
    MoreThan5000,
    ToDiscuss,
}

impl Budget {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.as_str() == value.trim())
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LessThan1000 => "less-than-1000",
            Self::From1000To2000 => "1000-2000",
            Self::From2000To5000 => "2000-5000",
            Self::MoreThan5000 => "more-than-5000",
            Self::ToDiscuss => "to-discuss",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::LessThan1000 => "Moins de 1000€",
            Self::From1000To2000 => "Entre 1000€ et 2000€",
            Self::From2000To5000 => "Entre 2000€ et 5000€",
            Self::MoreThan5000 => "Plus de 5000€",
            Self::ToDiscuss => "À discuter",
        }
    }

    pub const ALL: [Self; 5] = [
        Self::LessThan1000,
        Self::From1000To2000,
        Self::From2000To5000,
        Self::MoreThan5000,
        Self::ToDiscuss,
    ];
}

/// Raw contact form as posted by the browser.
///
/// Every field is a string so that empty selects and blank inputs decode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub request_type: String,
    pub message: String,
    pub event_type: String,
    pub event_date: String,
    pub event_time: String,
    pub event_location: String,
    pub estimated_guests: String,
    pub budget: String,
    pub specific_requirements: String,
    /// Checkbox: present ("on") when ticked.
    pub has_allergies: Option<String>,
    pub allergies_details: String,
}

impl FormData for ContactForm {
    fn field(&self, name: &str) -> Option<String> {
        let value = match name {
            "name" => &self.name,
            "email" => &self.email,
            "phone" => &self.phone,
            "request_type" => &self.request_type,
            "message" => &self.message,
            "event_type" => &self.event_type,
            "event_date" => &self.event_date,
            "event_time" => &self.event_time,
            "event_location" => &self.event_location,
            "estimated_guests" => &self.estimated_guests,
            "budget" => &self.budget,
            "specific_requirements" => &self.specific_requirements,
            "allergies_details" => &self.allergies_details,
            _ => return None,
        };
        Some(value.clone())
    }
}

/// Event part of a validated request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    pub event_type: EventType,
    pub event_date: NaiveDate,
    pub event_time: Option<String>,
    pub event_location: Option<String>,
    pub estimated_guests: u32,
    pub budget: Option<Budget>,
    pub specific_requirements: Option<String>,
    pub has_allergies: bool,
    pub allergies_details: Option<String>,
}

/// A validated contact request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub request_type: RequestType,
    pub message: String,
    pub event: Option<EventDetails>,
}

/// Why a form was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRejection {
    /// Summary shown above the form.
    pub message: String,
    pub errors: ValidationErrors,
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl ContactForm {
    fn rejection(message: &str, errors: ValidationErrors) -> ContactRejection {
        ContactRejection {
            message: message.to_string(),
            errors,
        }
    }

    /// Validate the form and build a [`ContactRequest`].
    ///
    /// # Errors
    ///
    /// Returns the summary message and field errors when the form is
    /// incomplete or invalid.
    pub fn validate(&self, today: NaiveDate) -> Result<ContactRequest, ContactRejection> {
        let request_type = RequestType::parse(&self.request_type);

        let schema = if request_type == Some(RequestType::Event) {
            Schema::event()
        } else {
            Schema::contact()
        };
        let mut errors = schema.validate(self, today);

        let Some(request_type) = request_type else {
            errors.add("request_type", "Le type de demande est requis");
            return Err(Self::rejection(
                "Veuillez remplir tous les champs obligatoires",
                errors,
            ));
        };

        if non_empty(&self.name).is_none()
            || non_empty(&self.email).is_none()
            || non_empty(&self.message).is_none()
        {
            return Err(Self::rejection(
                "Veuillez remplir tous les champs obligatoires",
                errors,
            ));
        }

        if !is_valid_email(&self.email) {
            return Err(Self::rejection(
                "Veuillez saisir une adresse email valide",
                errors,
            ));
        }

        let event = if request_type == RequestType::Event {
            let event_type = EventType::parse(&self.event_type);
            if event_type.is_none() {
                errors.add("event_type", "Le type d'événement est requis");
            }
            let event_date = NaiveDate::parse_from_str(self.event_date.trim(), "%Y-%m-%d").ok();
            let guests = self.estimated_guests.trim().parse::<u32>().ok().filter(|g| *g > 0);

            match (event_type, event_date, guests) {
                (Some(event_type), Some(event_date), Some(estimated_guests)) => {
                    Some(EventDetails {
                        event_type,
                        event_date,
                        event_time: non_empty(&self.event_time),
                        event_location: non_empty(&self.event_location),
                        estimated_guests,
                        budget: Budget::parse(&self.budget),
                        specific_requirements: non_empty(&self.specific_requirements),
                        has_allergies: self.has_allergies.is_some(),
                        allergies_details: non_empty(&self.allergies_details),
                    })
                }
                _ => {
                    return Err(Self::rejection(
                        "Veuillez remplir tous les champs obligatoires pour votre événement",
                        errors,
                    ));
                }
            }
        } else {
            None
        };

        if !errors.is_empty() {
            return Err(Self::rejection(
                "Veuillez corriger les erreurs du formulaire",
                errors,
            ));
        }

        Ok(ContactRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: non_empty(&self.phone),
            request_type,
            message: self.message.trim().to_string(),
            event,
        })
    }
}

/// Plain-text body sent to the team.
#[must_use]
pub fn format_email_body(request: &ContactRequest) -> String {
    let mut body = String::from("Nouvelle demande de contact - Food en K\n\n");
    body.push_str(&format!("Nom: {}\n", request.name));
    body.push_str(&format!("Email: {}\n", request.email));
    body.push_str(&format!(
        "Téléphone: {}\n",
        request.phone.as_deref().unwrap_or("Non renseigné")
    ));
    body.push_str(&format!(
        "Type de demande: {}\n\n",
        request.request_type.label()
    ));

    if let Some(event) = &request.event {
        body.push_str("=== DÉTAILS DE L'ÉVÉNEMENT ===\n");
        body.push_str(&format!("Type d'événement: {}\n", event.event_type.label()));
        body.push_str(&format!(
            "Date souhaitée: {}",
            event.event_date.format("%d/%m/%Y")
        ));
        if let Some(time) = &event.event_time {
            body.push_str(&format!(" à {time}"));
        }
        body.push('\n');
        body.push_str(&format!(
            "Lieu: {}\n",
            event.event_location.as_deref().unwrap_or("À préciser")
        ));
        body.push_str(&format!(
            "Nombre d'invités estimé: {}\n",
            event.estimated_guests
        ));
        body.push_str(&format!(
            "Budget approximatif: {}\n",
            event.budget.map_or("Non précisé", Budget::label)
        ));
        if let Some(requirements) = &event.specific_requirements {
            body.push_str(&format!("Exigences spécifiques: {requirements}\n"));
        }
        body.push_str(&format!(
            "Allergies alimentaires: {}\n",
            if event.has_allergies { "Oui" } else { "Non" }
        ));
        if event.has_allergies
            && let Some(details) = &event.allergies_details
        {
            body.push_str(&format!("Détails des allergies: {details}\n"));
        }
        body.push('\n');
    }

    body.push_str(&format!("=== MESSAGE ===\n{}\n\n", request.message));
    body.push_str("---\nMessage envoyé depuis le site web Food en K");
    body
}

/// Payload stored in the CMS.
#[must_use]
pub fn contact_payload(request: &ContactRequest) -> Value {
    json!({
        "name": request.name,
        "email": request.email,
        "phone": request.phone,
        "requestType": request.request_type.as_str(),
        "message": request.message,
        "event": request.event,
        "body": format_email_body(request),
    })
}

/// Store a validated request. Returns whether the CMS accepted it.
#[instrument(skip(api, notifications, request), fields(request_type = %request.request_type.as_str()))]
pub async fn submit(api: &ContentApi, notifications: &Notifications, request: &ContactRequest) -> bool {
    let response = api
        .clone()
        .quiet_success()
        .create_entity::<Value>(CONTACT_COLLECTION, &contact_payload(request))
        .await;

    if response.is_ok() {
        notifications
            .push(Notification::success(
                "Message envoyé",
                "Merci ! Nous vous répondrons dans les plus brefs délais.",
            ))
            .await;
        true
    } else {
        false
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn info_form() -> ContactForm {
        ContactForm {
            name: "Jeanne Martin".into(),
            email: "jeanne@example.fr".into(),
            phone: "06 24 31 67 90".into(),
            request_type: "info".into(),
            message: "Serez-vous au marché de Rennes samedi ?".into(),
            ..ContactForm::default()
        }
    }

    fn event_form() -> ContactForm {
        ContactForm {
            request_type: "event".into(),
            message: "Mariage en plein air, 120 invités.".into(),
            event_type: "wedding".into(),
            event_date: "2027-06-12".into(),
            event_time: "19:00".into(),
            estimated_guests: "120".into(),
            budget: "2000-5000".into(),
            has_allergies: Some("on".into()),
            allergies_details: "Deux invités allergiques aux arachides".into(),
            ..info_form()
        }
    }

    #[test]
    fn test_valid_info_request() {
        let request = info_form().validate(today()).unwrap();
        assert_eq!(request.request_type, RequestType::Info);
        assert_eq!(request.phone.as_deref(), Some("06 24 31 67 90"));
        assert!(request.event.is_none());
    }

    #[test]
    fn test_missing_fields() {
        let form = ContactForm {
            name: String::new(),
            ..info_form()
        };
        let rejection = form.validate(today()).unwrap_err();
        assert_eq!(
            rejection.message,
            "Veuillez remplir tous les champs obligatoires"
        );
        assert!(rejection.errors.has("name"));
    }

    #[test]
    fn test_unknown_request_type() {
        let form = ContactForm {
            request_type: "spam".into(),
            ..info_form()
        };
        let rejection = form.validate(today()).unwrap_err();
        assert!(rejection.errors.has("request_type"));
    }

    #[test]
    fn test_invalid_email() {
        let form = ContactForm {
            email: "jeanne.example.fr".into(),
            ..info_form()
        };
        assert_eq!(
            form.validate(today()).unwrap_err().message,
            "Veuillez saisir une adresse email valide"
        );
    }

    #[test]
    fn test_event_requires_details() {
        let form = ContactForm {
            event_type: String::new(),
            ..event_form()
        };
        let rejection = form.validate(today()).unwrap_err();
        assert_eq!(
            rejection.message,
            "Veuillez remplir tous les champs obligatoires pour votre événement"
        );
        assert!(rejection.errors.has("event_type"));
    }

    #[test]
    fn test_event_date_in_past() {
        let form = ContactForm {
            event_date: "2025-06-12".into(),
            ..event_form()
        };
        let rejection = form.validate(today()).unwrap_err();
        assert_eq!(
            rejection.errors.first("event_date"),
            Some("La date doit être dans le futur")
        );
    }

    #[test]
    fn test_short_message_rejected() {
        let form = ContactForm {
            message: "Salut".into(),
            ..info_form()
        };
        let rejection = form.validate(today()).unwrap_err();
        assert_eq!(rejection.message, "Veuillez corriger les erreurs du formulaire");
    }

    #[test]
    fn test_event_email_body() {
        let request = event_form().validate(today()).unwrap();
        let body = format_email_body(&request);

        assert!(body.starts_with("Nouvelle demande de contact - Food en K\n\n"));
        assert!(body.contains("Type de demande: 🎉 Événement / Traiteur\n"));
        assert!(body.contains("Type d'événement: Mariage\n"));
        assert!(body.contains("Date souhaitée: 12/06/2027 à 19:00\n"));
        assert!(body.contains("Lieu: À préciser\n"));
        assert!(body.contains("Nombre d'invités estimé: 120\n"));
        assert!(body.contains("Budget approximatif: Entre 2000€ et 5000€\n"));
        assert!(body.contains("Allergies alimentaires: Oui\n"));
        assert!(body.contains("Détails des allergies: Deux invités allergiques aux arachides\n"));
        assert!(body.ends_with("---\nMessage envoyé depuis le site web Food en K"));
    }

    #[test]
    fn test_info_email_body_without_phone() {
        let form = ContactForm {
            phone: String::new(),
            ..info_form()
        };
        let body = format_email_body(&form.validate(today()).unwrap());
        assert!(body.contains("Téléphone: Non renseigné\n"));
        assert!(!body.contains("DÉTAILS DE L'ÉVÉNEMENT"));
    }

    #[test]
    fn test_payload_shape() {
        let request = event_form().validate(today()).unwrap();
        let payload = contact_payload(&request);
        assert_eq!(payload["requestType"], "event");
        assert_eq!(payload["event"]["eventType"], "wedding");
        assert_eq!(payload["event"]["budget"], "2000-5000");
        assert_eq!(payload["event"]["eventDate"], "2027-06-12");
    }
}
