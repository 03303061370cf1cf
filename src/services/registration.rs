//! Registration page. A successful registration hands off to enrollment.

use serde::Serialize;

use crate::api::HealthApi;
use crate::domain::client::{Client, NewClient};
use crate::forms::client::RegisterClientForm;
use crate::services::Navigation;

const REGISTER_FAILED: &str = "Failed to register client. Please try again.";
const REGISTERED: &str = "Client registered successfully!";

#[derive(Debug, Default, Serialize)]
pub struct RegistrationView {
    form: RegisterClientForm,
    is_loading: bool,
    error: Option<String>,
    success: Option<String>,
    created: Option<Client>,
}

impl RegistrationView {
    pub fn new() -> Self {
        Self::default()
    }

    /// A view holding what the user typed, e.g. a posted form.
    pub fn with_form(form: RegisterClientForm) -> Self {
        Self {
            form,
            ..Self::default()
        }
    }

    pub fn set_form(&mut self, form: RegisterClientForm) {
        self.form = form;
    }

    /// Validates and submits the form.
    ///
    /// Validation stops at the first failing field and never reaches the API.
    /// On success the form is reset and the enrollment page for the new
    /// client is returned as the next step.
    pub async fn submit<A>(&mut self, api: &A) -> Option<Navigation>
    where
        A: HealthApi + ?Sized,
    {
        self.error = None;
        self.success = None;

        let payload = match NewClient::try_from(&self.form) {
            Ok(payload) => payload,
            Err(err) => {
                self.error = Some(err.to_string());
                return None;
            }
        };

        self.is_loading = true;
        let result = api.create_client(&payload).await;
        self.is_loading = false;

        match result {
            Ok(client) => {
                log::info!("Registered client {}", client.id);
                let navigation = Navigation::to(format!("/enroll/{}", client.id));
                self.form = RegisterClientForm::default();
                self.success = Some(REGISTERED.to_string());
                self.created = Some(client);
                Some(navigation)
            }
            Err(err) => {
                log::error!("Error registering client: {err}");
                self.error = Some(REGISTER_FAILED.to_string());
                None
            }
        }
    }

    pub fn form(&self) -> &RegisterClientForm {
        &self.form
    }

    pub fn created(&self) -> Option<&Client> {
        self.created.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }
}
