//! Resource attribute contract

use staff_core::error::ValidationErrors;
use staff_models::{NewResource, ResourceChanges};
use validator::Validate;

use crate::base::{finish, from_validator, Contract, ValidationResult};

/// Checks resource create/update bodies
#[derive(Debug, Default, Clone, Copy)]
pub struct ResourceContract;

impl ResourceContract {
    pub fn new() -> Self {
        Self
    }

    fn validate_full_name(&self, full_name: &str, errors: &mut ValidationErrors) {
        if full_name.trim().is_empty() && !errors.has_error("fullName") {
            errors.add("fullName", "can't be blank");
        }
    }

    fn validate_skills(&self, skills: &[String], errors: &mut ValidationErrors) {
        if skills.iter().any(|s| s.trim().is_empty()) {
            errors.add("skills", "can't contain blank entries");
        }
    }

    fn derive_errors(&self, input: &impl Validate) -> ValidationErrors {
        match input.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(e) => from_validator(&e),
        }
    }
}

impl Contract<NewResource> for ResourceContract {
    fn validate(&self, input: &NewResource) -> ValidationResult {
        let mut errors = self.derive_errors(input);
        self.validate_full_name(&input.full_name, &mut errors);
        self.validate_skills(&input.skills, &mut errors);
        finish(errors)
    }
}

impl Contract<ResourceChanges> for ResourceContract {
    fn validate(&self, input: &ResourceChanges) -> ValidationResult {
        let mut errors = self.derive_errors(input);
        if let Some(ref full_name) = input.full_name {
            self.validate_full_name(full_name, &mut errors);
        }
        if let Some(ref skills) = input.skills {
            self.validate_skills(skills, &mut errors);
        }
        finish(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_new_resource() {
        let input = NewResource {
            full_name: "Ada Lovelace".into(),
            skills: vec!["rust".into()],
            occupation_rate: Some(20.0),
            ..Default::default()
        };
        assert!(ResourceContract::new().validate(&input).is_ok());
    }

    #[test]
    fn test_blank_name_rejected() {
        let input = NewResource {
            full_name: "   ".into(),
            ..Default::default()
        };
        let errors = ResourceContract::new().validate(&input).unwrap_err();
        assert_eq!(errors.get("fullName").unwrap(), &vec!["can't be blank".to_string()]);
    }

    #[test]
    fn test_changes_are_checked_only_when_present() {
        let contract = ResourceContract::new();
        assert!(contract.validate(&ResourceChanges::default()).is_ok());

        let changes = ResourceChanges {
            occupation_rate: Some(-5.0),
            skills: Some(vec!["".into()]),
            ..Default::default()
        };
        let errors = contract.validate(&changes).unwrap_err();
        assert!(errors.has_error("occupationRate"));
        assert!(errors.has_error("skills"));
    }
}
