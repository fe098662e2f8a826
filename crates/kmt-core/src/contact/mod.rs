//! Contact form submissions delivered by a transactional email service.

use crate::{JsonValue, Map, error::Error, warn};
use minijinja::{Value, context};
use serde::Deserialize;
use std::str::FromStr;

mod emailjs;

pub use emailjs::{EmailClient, EmailJsClient, EmailJsConfig};

/// Value sent for a missing contact number.
const CONTACT_NUMBER_PLACEHOLDER: &str = "Not provided";

/// Program a contact request is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Program {
    /// Passenger services.
    Passenger,
    /// Goods transportation.
    Goods,
    /// Bus tracking.
    Tracking,
    /// Anything else.
    Other,
}

impl Program {
    /// All programs in display order.
    pub const ALL: [Self; 4] = [Self::Passenger, Self::Goods, Self::Tracking, Self::Other];

    /// Returns the form value.
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Passenger => "passenger",
            Self::Goods => "goods",
            Self::Tracking => "tracking",
            Self::Other => "other",
        }
    }

    /// Returns the translation key of the label.
    #[inline]
    pub fn label_key(self) -> &'static str {
        match self {
            Self::Passenger => "program_passenger",
            Self::Goods => "program_goods",
            Self::Tracking => "program_tracking",
            Self::Other => "program_other",
        }
    }
}

impl FromStr for Program {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|program| program.as_str() == s.trim())
            .ok_or_else(|| warn!("unsupported program `{s}`"))
    }
}

/// Submitted values of the contact form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ContactForm {
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Email address.
    pub email: String,
    /// Optional phone number.
    pub contact_number: String,
    /// One of the program values.
    pub program_name: String,
    /// Query or message.
    #[serde(rename = "query-message")]
    pub message: String,
}

impl ContactForm {
    /// Validates the form.
    ///
    /// The error message is the translation key of the alert to show.
    pub fn validate(&self) -> Result<Program, Error> {
        let required = [
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.program_name,
            &self.message,
        ];
        if required.iter().any(|value| value.trim().is_empty()) {
            return Err(Error::new("contact_error_required"));
        }

        let email = self.email.trim();
        let valid_email = email
            .split_once('@')
            .is_some_and(|(user, domain)| !user.is_empty() && domain.contains('.'));
        if !valid_email {
            return Err(Error::new("contact_error_email"));
        }
        self.program_name
            .parse()
            .map_err(|err| Error::with_source("contact_error_required", err))
    }

    /// Returns the flat template params of the email.
    pub fn template_params(&self) -> Map {
        let contact_number = match self.contact_number.trim() {
            "" => CONTACT_NUMBER_PLACEHOLDER,
            number => number,
        };
        let from_name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let mut params = Map::new();
        params.insert("from_name".to_owned(), from_name.into());
        params.insert("from_email".to_owned(), self.email.trim().into());
        params.insert("contact_number".to_owned(), contact_number.into());
        params.insert(
            "program_name".to_owned(),
            JsonValue::from(self.program_name.trim()),
        );
        params.insert("message".to_owned(), self.message.trim().into());
        params
    }

    /// Returns the data of the form with the submitted values.
    pub fn view(&self) -> Value {
        let programs = Program::ALL
            .into_iter()
            .map(|program| {
                context! {
                    value => program.as_str(),
                    label_key => program.label_key(),
                }
            })
            .collect::<Vec<_>>();
        context! {
            first_name => &self.first_name,
            last_name => &self.last_name,
            email => &self.email,
            contact_number => &self.contact_number,
            program_name => self.program_name.trim(),
            message => &self.message,
            programs => programs,
        }
    }
}
