//! Presence checks shared by every entity. Nothing here inspects content
//! beyond "is it there and is it non-blank".

use uuid::Uuid;

use crate::errors::AppError;

/// Returns the trimmed value, or a validation error naming the field.
pub fn require(value: Option<String>, field: &str) -> Result<String, AppError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(format!("{field} is required")))
}

/// Blank optional fields are stored as absent.
pub fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parses a path id. A malformed id names no record, so it is reported as
/// not found rather than as bad input.
pub fn parse_id(raw: &str, entity: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::NotFound(format!("{entity} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_trims_and_rejects_blank() {
        assert_eq!(
            require(Some("  Engineer ".into()), "title").unwrap(),
            "Engineer"
        );
        let err = require(Some("   ".into()), "title").unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "title is required"));
        assert!(require(None, "location").is_err());
    }

    #[test]
    fn test_optional_drops_blank() {
        assert_eq!(optional(Some(" ".into())), None);
        assert_eq!(
            optional(Some("https://ada.dev".into())),
            Some("https://ada.dev".to_string())
        );
    }

    #[test]
    fn test_malformed_id_is_not_found() {
        assert!(matches!(
            parse_id("not-a-uuid", "Job"),
            Err(AppError::NotFound(_))
        ));
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "Job").unwrap(), id);
    }
}
