//! Server-side validation report.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::model::ValidationMessage;
use crate::error::Result;

/// Wire shape of a validation response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResponse {
    #[serde(default)]
    pub nodes: Vec<NodeValidation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeValidation {
    pub id: String,
    #[serde(default)]
    pub messages: Vec<ValidationMessage>,
}

/// Validation messages per model id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelValidationReport {
    mapping: HashMap<String, Vec<ValidationMessage>>,
}

impl ModelValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_response(response: ValidationResponse) -> Self {
        let mut mapping: HashMap<String, Vec<ValidationMessage>> = HashMap::new();
        for node in response.nodes {
            mapping.entry(node.id).or_default().extend(node.messages);
        }
        Self { mapping }
    }

    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        Ok(Self::from_response(serde_json::from_value(value)?))
    }

    pub fn messages(&self, model_id: &str) -> &[ValidationMessage] {
        self.mapping.get(model_id).map(Vec::as_slice).unwrap_or_default()
    }

    /// A model with at least one `ERROR` message may not be deployed.
    pub fn has_critical_errors(&self, model_id: &str) -> bool {
        self.messages(model_id).iter().any(ValidationMessage::is_error)
    }

    pub fn is_valid(&self) -> bool {
        !self.mapping.keys().any(|id| self.has_critical_errors(id))
    }

    pub fn model_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.mapping.keys().map(String::as_str)
    }
}
