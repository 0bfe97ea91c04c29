//! Attribute validation: applies rule outcomes and the mandatory check.

use tracing::debug;

use super::model::{AttributeValidationState, ValidationMessage};
use super::rules::ModelManagementRuleEvaluationService;
use crate::error::Result;
use crate::model::{ModelStore, NodeId};

#[derive(Debug, Clone, Copy, Default)]
pub struct ModelValidationService {
    rules: ModelManagementRuleEvaluationService,
}

impl ModelValidationService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the validation state of `attribute` in the context of `owner`.
    ///
    /// Fulfilled rules override the metadata defaults; an attribute that ends
    /// up mandatory and empty is invalid.
    pub fn validate_attribute(
        &self,
        store: &ModelStore,
        attribute: NodeId,
        owner: NodeId,
    ) -> Result<AttributeValidationState> {
        let attr = store.attribute(attribute)?;
        let attr_id = &store.node(attribute)?.id;
        let trigger = attr.value.scalar();

        let mut state = AttributeValidationState {
            mandatory: attr.validation.mandatory,
            ..AttributeValidationState::default()
        };

        for rule in &attr.validation.rules {
            if !self.rules.evaluate_rule(rule, store, owner, &trigger)? {
                continue;
            }
            if let Some(mandatory) = rule.outcome.mandatory {
                state.mandatory = mandatory;
            }
            if let Some(visible) = rule.outcome.visible {
                state.visible = visible;
            }
            if let Some(error) = &rule.outcome.error {
                state.messages.push(ValidationMessage::error(error.clone()));
            }
        }

        if state.mandatory && attr.is_empty() {
            state
                .messages
                .push(ValidationMessage::error(format!("Attribute {attr_id} is mandatory")));
        }
        state.valid = !state.has_errors();
        debug!(
            attribute = %attr_id,
            valid = state.valid,
            mandatory = state.mandatory,
            "validated attribute"
        );
        Ok(state)
    }

    /// Validate every attribute visible on `model`, owned or inherited.
    pub fn validate_model(
        &self,
        store: &ModelStore,
        model: NodeId,
    ) -> Result<Vec<(NodeId, AttributeValidationState)>> {
        store
            .node(model)?
            .attributes
            .values()
            .map(|&attr| Ok((attr, self.validate_attribute(store, attr, model)?)))
            .collect()
    }

    /// Stored states of the attributes of `model` are all valid.
    pub fn is_model_valid(&self, store: &ModelStore, model: NodeId) -> bool {
        store.get(model).is_some_and(|node| {
            node.attributes
                .values()
                .filter_map(|&a| store.attribute(a).ok())
                .all(|a| a.state.valid)
        })
    }
}
