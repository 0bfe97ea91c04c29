//! Validation: attribute rules, server reports and deploy requests.

pub mod deploy;
pub mod model;
pub mod report;
pub mod rules;
pub mod service;

pub use deploy::{DeployableModel, ModelDeployRequest};
pub use model::{
    AttributeValidationState, ModelRule, ModelRuleExpression, ModelValidationModel, RuleCondition,
    RuleOutcome, Severity, ValidationMessage,
};
pub use report::{ModelValidationReport, ValidationResponse};
pub use rules::{ModelManagementRuleEvaluationService, RuleCommandChain};
pub use service::ModelValidationService;
