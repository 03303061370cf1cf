use serde::{Deserialize, Serialize};

use crate::domain::client::{Gender, NewClient};
use crate::domain::types::{ClientEmail, PersonName, is_plausible_email};
use crate::forms::FormError;

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
/// Form data for registering a client.
///
/// Optional inputs arrive as raw strings so the form can be re-rendered with
/// exactly what the user typed.
pub struct RegisterClientForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub gender: String,
}

impl RegisterClientForm {
    /// Checks the required fields in display order, stopping at the first
    /// failure.
    pub fn check(&self) -> Result<(), FormError> {
        if self.first_name.trim().is_empty() {
            return Err(FormError::FirstNameRequired);
        }
        if self.last_name.trim().is_empty() {
            return Err(FormError::LastNameRequired);
        }
        if self.email.trim().is_empty() {
            return Err(FormError::EmailRequired);
        }
        if !is_plausible_email(&self.email) {
            return Err(FormError::InvalidEmail);
        }
        Ok(())
    }

    /// Age as typed; bounds are a widget hint only, unparseable input is
    /// treated as absent.
    pub fn parsed_age(&self) -> Option<u32> {
        self.age.trim().parse().ok()
    }

    pub fn parsed_gender(&self) -> Option<Gender> {
        self.gender.parse().ok()
    }
}

impl TryFrom<&RegisterClientForm> for NewClient {
    type Error = FormError;

    fn try_from(form: &RegisterClientForm) -> Result<Self, Self::Error> {
        form.check()?;

        Ok(NewClient {
            first_name: PersonName::new(form.first_name.as_str())
                .map_err(|_| FormError::FirstNameRequired)?,
            last_name: PersonName::new(form.last_name.as_str())
                .map_err(|_| FormError::LastNameRequired)?,
            email: ClientEmail::new(form.email.as_str()).map_err(|_| FormError::InvalidEmail)?,
            age: form.parsed_age(),
            gender: form.parsed_gender(),
        })
    }
}
