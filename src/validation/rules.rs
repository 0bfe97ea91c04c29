//! Conditional re-evaluation of attribute validation.
//!
//! Expressions are dispatched through a static command table. Commands are
//! developer-authored configuration, so an unknown command or a `matches`
//! without pattern is an error rather than a failed rule.

use regex::Regex;
use serde_json::Value;
use tracing::trace;

use super::model::{ModelRule, ModelRuleExpression, RuleCondition};
use crate::error::{ModelError, Result};
use crate::model::value::is_empty_json;
use crate::model::{ModelStore, NodeId};

/// Input handed to a rule command.
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    /// Id of the model whose attribute is being validated.
    pub field: &'a str,
    pub expression: &'a ModelRuleExpression,
    /// Current value of `expression.attribute` on that model.
    pub value: &'a Value,
}

pub type RuleCommand = fn(&RuleInput<'_>) -> Result<bool>;

const COMMANDS: &[(&str, RuleCommand)] = &[
    ("equals", equals),
    ("not_equals", not_equals),
    ("in", contained),
    ("not_in", not_contained),
    ("empty", empty),
    ("not_empty", not_empty),
    ("matches", matches),
];

fn equals(input: &RuleInput<'_>) -> Result<bool> {
    Ok(input.expression.values.first() == Some(input.value))
}

fn not_equals(input: &RuleInput<'_>) -> Result<bool> {
    equals(input).map(|r| !r)
}

fn contained(input: &RuleInput<'_>) -> Result<bool> {
    Ok(input.expression.values.contains(input.value))
}

fn not_contained(input: &RuleInput<'_>) -> Result<bool> {
    contained(input).map(|r| !r)
}

fn empty(input: &RuleInput<'_>) -> Result<bool> {
    Ok(is_empty_json(input.value))
}

fn not_empty(input: &RuleInput<'_>) -> Result<bool> {
    empty(input).map(|r| !r)
}

fn matches(input: &RuleInput<'_>) -> Result<bool> {
    let pattern = input
        .expression
        .values
        .first()
        .and_then(Value::as_str)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ModelError::MissingPattern {
            field: input.field.to_string(),
        })?;
    let regex = Regex::new(pattern).map_err(|source| ModelError::InvalidPattern {
        field: input.field.to_string(),
        source,
    })?;
    let text = match input.value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    };
    Ok(regex.is_match(&text))
}

/// Static registration table of rule commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleCommandChain;

impl RuleCommandChain {
    pub fn find(name: &str) -> Option<RuleCommand> {
        COMMANDS
            .iter()
            .find(|(command, _)| *command == name)
            .map(|(_, handler)| *handler)
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        COMMANDS.iter().map(|(name, _)| *name)
    }

    pub fn execute(&self, input: &RuleInput<'_>) -> Result<bool> {
        let handler = Self::find(&input.expression.command)
            .ok_or_else(|| ModelError::UnknownRuleCommand(input.expression.command.clone()))?;
        handler(input)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ModelManagementRuleEvaluationService {
    chain: RuleCommandChain,
}

impl ModelManagementRuleEvaluationService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate `rule` for the model `owner`, triggered by `attribute_value`.
    ///
    /// A `values` restriction excluding the triggering value makes the rule
    /// inapplicable. OR is fulfilled by the first true expression; AND fails
    /// on the first false one. Remaining expressions are not evaluated.
    pub fn evaluate_rule(
        &self,
        rule: &ModelRule,
        store: &ModelStore,
        owner: NodeId,
        attribute_value: &Value,
    ) -> Result<bool> {
        if let Some(values) = &rule.values {
            if !values.contains(attribute_value) {
                return Ok(false);
            }
        }

        let field = store.node(owner)?.id.as_str();
        for expression in &rule.expressions {
            let value = store
                .attribute_value(owner, &expression.attribute)
                .map(|attr| attr.value.scalar())
                .unwrap_or(Value::Null);
            let result = self.chain.execute(&RuleInput {
                field,
                expression,
                value: &value,
            })?;
            trace!(
                field,
                command = %expression.command,
                attribute = %expression.attribute,
                result,
                "rule expression"
            );

            match rule.condition {
                RuleCondition::Or if result => return Ok(true),
                RuleCondition::And if !result => return Ok(false),
                _ => {}
            }
        }
        Ok(rule.condition == RuleCondition::And)
    }
}
