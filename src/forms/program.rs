use serde::Deserialize;
use validator::Validate;

use crate::domain::program::NewProgram;
use crate::domain::types::{ProgramDescription, ProgramName};
use crate::forms::FormError;

#[derive(Debug, Default, Deserialize, Validate)]
/// Form data for creating a program.
pub struct AddProgramForm {
    /// Display name of the program.
    #[serde(default)]
    #[validate(length(min = 1))]
    pub name: String,
    /// Optional free-text description.
    #[serde(default)]
    pub description: String,
    /// Filter active on the page when the form was posted.
    #[serde(default)]
    pub search: String,
}

impl TryFrom<&AddProgramForm> for NewProgram {
    type Error = FormError;

    fn try_from(form: &AddProgramForm) -> Result<Self, Self::Error> {
        let name =
            ProgramName::new(form.name.as_str()).map_err(|_| FormError::ProgramNameRequired)?;
        let description = ProgramDescription::parse(form.description.as_str());

        Ok(NewProgram::new(name, description))
    }
}

#[derive(Debug, Default, Deserialize)]
/// Answer to the destructive-action confirmation for program deletion.
pub struct DeleteProgramForm {
    /// `yes` confirms, anything else cancels.
    #[serde(default)]
    pub confirm: String,
    #[serde(default)]
    pub search: String,
}

impl DeleteProgramForm {
    pub fn confirmed(&self) -> bool {
        self.confirm.trim().eq_ignore_ascii_case("yes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_name_is_rejected() {
        let form = AddProgramForm {
            name: "   ".to_string(),
            ..AddProgramForm::default()
        };

        let result = NewProgram::try_from(&form);

        assert!(matches!(result, Err(FormError::ProgramNameRequired)));
    }

    #[test]
    fn empty_description_becomes_none() {
        let form = AddProgramForm {
            name: " Maternal Health ".to_string(),
            description: "  ".to_string(),
            search: String::new(),
        };

        let program = NewProgram::try_from(&form).unwrap();

        assert_eq!(program.name.as_str(), "Maternal Health");
        assert_eq!(program.description, None);
    }

    #[test]
    fn only_explicit_yes_confirms_deletion() {
        let yes = DeleteProgramForm {
            confirm: "Yes".to_string(),
            search: String::new(),
        };
        let cancel = DeleteProgramForm::default();

        assert!(yes.confirmed());
        assert!(!cancel.confirmed());
    }
}
