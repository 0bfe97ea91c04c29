use thiserror::Error;

pub type Result<T> = std::result::Result<T, ModelError>;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("kind mismatch: {node} is a {actual}, expected {expected}")]
    KindMismatch {
        node: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("missing reference: {0} has no inherited counterpart")]
    MissingReference(String),

    #[error("invalid action: {0}")]
    InvalidAction(String),

    #[error("unknown rule command: {0}")]
    UnknownRuleCommand(String),

    #[error("missing pattern in validator of field {field}")]
    MissingPattern { field: String },

    #[error("invalid pattern in validator of field {field}: {source}")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("port failure: {0}")]
    Port(String),

    #[error("internal: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ModelError {
    /// Errors caused by developer-authored configuration (rules, validators).
    ///
    /// These are raised straight to the caller instead of being folded into a
    /// validation report.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownRuleCommand(_) | Self::MissingPattern { .. } | Self::InvalidPattern { .. }
        )
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidPayload(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_not_found() {
        let e = ModelError::NotFound("definition=media".into());
        assert_eq!(e.to_string(), "not found: definition=media");
    }

    #[test]
    fn display_kind_mismatch() {
        let e = ModelError::KindMismatch {
            node: "title".into(),
            expected: "region",
            actual: "field",
        };
        assert_eq!(e.to_string(), "kind mismatch: title is a field, expected region");
    }

    #[test]
    fn display_missing_pattern_names_field() {
        let e = ModelError::MissingPattern {
            field: "emailAddress".into(),
        };
        assert_eq!(e.to_string(), "missing pattern in validator of field emailAddress");
    }

    #[test]
    fn configuration_errors_are_classified() {
        assert!(ModelError::UnknownRuleCommand("between".into()).is_configuration_error());
        assert!(ModelError::MissingPattern { field: "x".into() }.is_configuration_error());
        assert!(!ModelError::NotFound("x".into()).is_configuration_error());
        assert!(!ModelError::Internal(anyhow::anyhow!("boom")).is_configuration_error());
    }

    #[test]
    fn serde_errors_become_invalid_payload() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let e: ModelError = err.into();
        assert!(matches!(e, ModelError::InvalidPayload(_)));
    }
}
