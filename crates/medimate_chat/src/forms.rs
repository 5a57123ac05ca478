//! Auxiliary forms: patient registration, emergency alert and medicine
//! reminder.
//!
//! Each form is validated locally before anything is sent. Invalid input
//! never reaches the backend.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Services a patient can register for
pub const SERVICES: [&str; 6] = [
    "General Checkup",
    "Emergency Services",
    "COVID-19 Information",
    "Medicine Reminders",
    "Dietary Advice",
    "Mental Health Support",
];

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\+\d{10,15}$").expect("phone pattern is valid"))
}

fn time_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([01]\d|2[0-3]):([0-5]\d)$").expect("time pattern is valid"))
}

fn inline_phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bfor\s*(\+[\d\-]*\d|\d{7,})\b").expect("inline phone pattern is valid"))
}

/// Check a phone number against the E.164 rule (`+` then 10 to 15 digits)
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone_regex().is_match(phone) {
        Ok(())
    } else {
        Err(ValidationError::InvalidPhone(phone.to_string()))
    }
}

/// Check a 24-hour `HH:MM` time
pub fn validate_time(time: &str) -> Result<(), ValidationError> {
    if time_regex().is_match(time) {
        Ok(())
    } else {
        Err(ValidationError::InvalidTime(time.to_string()))
    }
}

/// Validate a phone number typed inline in a reminder request
/// (`"... for +923001112233"`). Text without such a token passes.
pub fn validate_inline_phone(text: &str) -> Result<(), ValidationError> {
    match inline_phone_regex().captures(text) {
        Some(caps) => validate_phone(caps[1].trim()),
        None => Ok(()),
    }
}

fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(())
    }
}

/// Local form contract
pub trait Form {
    /// Validated payload sent to the backend
    type Payload: Serialize;

    /// Backend path, relative to the base URL
    const PATH: &'static str;

    /// Check every field and build the request body
    fn validate(&self) -> Result<Self::Payload, ValidationError>;
}

/// Registration form as typed by the user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrationForm {
    pub name: String,
    pub phone: String,
    pub age: String,
    pub service: String,
}

/// Registration request body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub phone: String,
    pub age: u32,
    pub service: String,
}

impl Form for RegistrationForm {
    type Payload = Registration;
    const PATH: &'static str = "register";

    fn validate(&self) -> Result<Registration, ValidationError> {
        require(&self.name, "name")?;
        require(&self.phone, "phone")?;
        require(&self.age, "age")?;
        require(&self.service, "service")?;

        let phone = self.phone.trim();
        validate_phone(phone)?;

        let age = self
            .age
            .trim()
            .parse::<u32>()
            .map_err(|_| ValidationError::InvalidAge(self.age.clone()))?;

        let service = SERVICES
            .iter()
            .find(|s| s.eq_ignore_ascii_case(self.service.trim()))
            .ok_or_else(|| ValidationError::UnknownService(self.service.clone()))?;

        Ok(Registration {
            name: self.name.trim().to_string(),
            phone: phone.to_string(),
            age,
            service: service.to_string(),
        })
    }
}

/// Emergency alert form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmergencyForm {
    pub patient_phone: String,
    pub condition: String,
}

/// Emergency request body. The backend reads the phone number from
/// `patient_name`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmergencyAlert {
    #[serde(rename = "patient_name")]
    pub patient_phone: String,
    pub condition: String,
}

impl Form for EmergencyForm {
    type Payload = EmergencyAlert;
    const PATH: &'static str = "emergency";

    fn validate(&self) -> Result<EmergencyAlert, ValidationError> {
        require(&self.patient_phone, "patient_phone")?;
        require(&self.condition, "condition")?;

        let phone = self.patient_phone.trim();
        validate_phone(phone)?;

        Ok(EmergencyAlert {
            patient_phone: phone.to_string(),
            condition: self.condition.trim().to_string(),
        })
    }
}

/// Medicine reminder form; also the request body
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReminderForm {
    pub phone: String,
    pub medicine_name: String,
    pub reminder_time: String,
}

impl Form for ReminderForm {
    type Payload = ReminderForm;
    const PATH: &'static str = "medicine-reminder";

    fn validate(&self) -> Result<ReminderForm, ValidationError> {
        require(&self.phone, "phone")?;
        require(&self.medicine_name, "medicine_name")?;
        require(&self.reminder_time, "reminder_time")?;

        let phone = self.phone.trim();
        let time = self.reminder_time.trim();
        validate_phone(phone)?;
        validate_time(time)?;

        Ok(ReminderForm {
            phone: phone.to_string(),
            medicine_name: self.medicine_name.trim().to_string(),
            reminder_time: time.to_string(),
        })
    }
}

/// Confirmation returned by `/medicine-reminder`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReminderConfirmation {
    #[serde(default)]
    pub medicine: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub to: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_rule() {
        assert!(validate_phone("+923001112233").is_ok());
        assert!(validate_phone("+1234567890").is_ok());
        assert!(validate_phone("923001112233").is_err());
        assert!(validate_phone("+12345").is_err());
        assert!(validate_phone("+1234567890123456").is_err());
        assert!(validate_phone("+92 300 1112233").is_err());
    }

    #[test]
    fn test_time_rule() {
        for ok in ["00:00", "09:30", "14:00", "23:59"] {
            assert!(validate_time(ok).is_ok(), "{ok}");
        }
        for bad in ["24:00", "9:30", "12:60", "noon", "12:5"] {
            assert!(validate_time(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_inline_phone() {
        assert!(validate_inline_phone("Set a reminder for Paracetamol at 08:00 for +923001112233").is_ok());
        assert!(validate_inline_phone("remind me for +9230").is_err());
        assert!(validate_inline_phone("remind me for 923001112233").is_err());
        assert!(validate_inline_phone("remind me about my pills").is_ok());
        assert!(validate_inline_phone("take it for 10 days").is_ok());
    }

    #[test]
    fn test_inline_phone_stops_at_whitespace() {
        assert!(validate_inline_phone("Set a reminder for +923001112233 2 times a day").is_ok());
        assert!(validate_inline_phone("for +923001112233, twice daily").is_ok());
        assert_eq!(
            validate_inline_phone("remind me for +92 300 1112233"),
            Err(ValidationError::InvalidPhone("+92".to_string()))
        );
    }

    #[test]
    fn test_registration_validation() {
        let form = RegistrationForm {
            name: " Ayesha ".to_string(),
            phone: "+923001112233".to_string(),
            age: "34".to_string(),
            service: "dietary advice".to_string(),
        };
        let payload = form.validate().unwrap();
        assert_eq!(payload.name, "Ayesha");
        assert_eq!(payload.age, 34);
        assert_eq!(payload.service, "Dietary Advice");

        let missing = RegistrationForm {
            name: String::new(),
            ..form.clone()
        };
        assert_eq!(missing.validate(), Err(ValidationError::MissingField("name")));

        let bad_age = RegistrationForm {
            age: "thirty".to_string(),
            ..form.clone()
        };
        assert!(matches!(bad_age.validate(), Err(ValidationError::InvalidAge(_))));

        let bad_service = RegistrationForm {
            service: "Astrology".to_string(),
            ..form
        };
        assert!(matches!(
            bad_service.validate(),
            Err(ValidationError::UnknownService(_))
        ));
    }

    #[test]
    fn test_emergency_payload_uses_patient_name_field() {
        let form = EmergencyForm {
            patient_phone: "+923001112233".to_string(),
            condition: "Chest pain".to_string(),
        };
        let json = serde_json::to_value(form.validate().unwrap()).unwrap();
        assert_eq!(json["patient_name"], "+923001112233");
        assert_eq!(json["condition"], "Chest pain");
    }

    #[test]
    fn test_reminder_validation() {
        let form = ReminderForm {
            phone: "+923001112233".to_string(),
            medicine_name: "Panadol".to_string(),
            reminder_time: "25:00".to_string(),
        };
        assert!(matches!(form.validate(), Err(ValidationError::InvalidTime(_))));

        let form = ReminderForm {
            reminder_time: "08:00".to_string(),
            ..form
        };
        assert!(form.validate().is_ok());
    }
}
