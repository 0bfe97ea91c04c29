//! Validation model types: rules attached to attribute metadata and the
//! computed per-attribute validation state.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumString};

// ── Messages ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationMessage {
    pub severity: Severity,
    pub message: String,
}

impl ValidationMessage {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

// ── Rules ──

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
    AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum RuleCondition {
    #[default]
    And,
    Or,
}

/// One comparison evaluated through the rule command table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRuleExpression {
    pub command: String,
    /// Attribute of the owning model whose value is compared.
    pub attribute: String,
    #[serde(default)]
    pub values: Vec<Value>,
}

/// What a fulfilled rule applies to the attribute state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOutcome {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mandatory: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRule {
    /// Values of the triggering attribute for which the rule applies at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<Value>>,
    #[serde(default)]
    pub condition: RuleCondition,
    #[serde(default)]
    pub expressions: Vec<ModelRuleExpression>,
    #[serde(default)]
    pub outcome: RuleOutcome,
}

/// Validation configuration carried by attribute metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelValidationModel {
    #[serde(default)]
    pub mandatory: bool,
    #[serde(default)]
    pub rules: Vec<ModelRule>,
}

// ── Computed state ──

/// Result of validating one attribute against its validation model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeValidationState {
    pub valid: bool,
    pub mandatory: bool,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub messages: Vec<ValidationMessage>,
}

fn default_visible() -> bool {
    true
}

impl Default for AttributeValidationState {
    fn default() -> Self {
        Self {
            valid: true,
            mandatory: false,
            visible: true,
            messages: Vec::new(),
        }
    }
}

impl AttributeValidationState {
    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(ValidationMessage::is_error)
    }
}
