use serde::Deserialize;

use crate::domain::types::ProgramId;
use crate::forms::FormError;

/// Which submit button posted the enrollment form.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentAction {
    #[default]
    Save,
    Filter,
}

#[derive(Debug, Default, Deserialize)]
/// Enrollment form: checked program ids plus the candidate filter.
///
/// `program_ids` repeats once per checked box, so the body has to be decoded
/// with `serde_html_form` rather than `serde_urlencoded`.
pub struct EnrollmentForm {
    #[serde(default)]
    pub program_ids: Vec<String>,
    #[serde(default)]
    pub filter: String,
    #[serde(default)]
    pub action: EnrollmentAction,
}

impl EnrollmentForm {
    /// Selected ids in submission order without duplicates.
    pub fn selection(&self) -> Result<Vec<ProgramId>, FormError> {
        let mut selection: Vec<ProgramId> = Vec::with_capacity(self.program_ids.len());
        for raw in &self.program_ids {
            let id = ProgramId::new(raw.as_str()).map_err(|_| FormError::InvalidProgramId)?;
            if !selection.contains(&id) {
                selection.push(id);
            }
        }
        Ok(selection)
    }
}

#[derive(Debug, Deserialize)]
/// Form posted when removing a single program from a client.
pub struct UnenrollForm {
    pub program_id: String,
}

impl UnenrollForm {
    pub fn program_id(&self) -> Result<ProgramId, FormError> {
        ProgramId::new(self.program_id.as_str()).map_err(|_| FormError::InvalidProgramId)
    }
}
