use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::validation::{validate_required, ValidationError, ValidationErrors, Validator};

lazy_static! {
    static ref SIGNATURE_DATA_URI: Regex =
        Regex::new(r"^data:image/(png|jpeg);base64,[A-Za-z0-9+/]+=*$").unwrap();
}

/// One signed snapshot of a plan, in canonical shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Revision {
    pub id: String,
    pub revision_number: u32,
    pub signer_name: Option<String>,
    /// Data URI of the drawn signature.
    pub signature_image: Option<String>,
    pub signed_at: Option<String>,
    pub change_note: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct SignRequest {
    pub signer_name: String,
    /// Explicit confirmation that the signer reviewed the plan.
    pub acknowledged: bool,
    pub signature_image: Option<String>,
    pub change_note: Option<String>,
}

impl Validator for SignRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        validate_required(&self.signer_name, "signer_name", "Signer name", &mut errors);

        if !self.acknowledged {
            errors.add(
                ValidationError::new("acknowledged", "Acknowledgment is required")
                    .with_suggestion("Confirm that you have reviewed the plan before signing"),
            );
        }

        match self.signature_image.as_deref().map(str::trim) {
            None | Some("") => errors.add(ValidationError::empty_field("signature_image", "Signature")),
            Some(image) if image.starts_with("data:") && !SIGNATURE_DATA_URI.is_match(image) => {
                errors.add(
                    ValidationError::new("signature_image", "Signature must be a PNG or JPEG data URI")
                        .with_suggestion("Draw the signature again"),
                );
            }
            Some(_) => {}
        }

        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> SignRequest {
        SignRequest {
            signer_name: "Jane Doe".to_string(),
            acknowledged: true,
            signature_image: Some("data:image/png;base64,iVBORw0KGgo=".to_string()),
            change_note: None,
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_each_missing_input_names_its_field() {
        let mut req = valid_request();
        req.signer_name = "   ".to_string();
        assert!(req.validate().unwrap_err().has_field("signer_name"));

        let mut req = valid_request();
        req.acknowledged = false;
        assert!(req.validate().unwrap_err().has_field("acknowledged"));

        let mut req = valid_request();
        req.signature_image = Some(String::new());
        assert!(req.validate().unwrap_err().has_field("signature_image"));

        let mut req = valid_request();
        req.signature_image = None;
        assert!(req.validate().unwrap_err().has_field("signature_image"));
    }

    #[test]
    fn test_malformed_data_uri_rejected() {
        let mut req = valid_request();
        req.signature_image = Some("data:text/html;base64,PGI+".to_string());
        let errors = req.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.has_field("signature_image"));
    }

    #[test]
    fn test_empty_request_collects_all_errors() {
        assert_eq!(SignRequest::default().validate().unwrap_err().len(), 3);
    }
}
