//! Raw server payloads consumed by the linkers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributePayload {
    #[serde(alias = "id")]
    pub name: String,
    #[serde(rename = "type", default)]
    pub attribute_type: Option<String>,
    #[serde(default)]
    pub value: Value,
}

/// Generic node: regions, control params, action groups, executions and
/// semantic properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodePayload {
    pub id: String,
    #[serde(default)]
    pub attributes: Vec<AttributePayload>,
}

pub type RegionPayload = NodePayload;
pub type ControlParamPayload = NodePayload;
pub type ActionGroupPayload = NodePayload;
pub type ActionExecutionPayload = NodePayload;
pub type PropertyPayload = NodePayload;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlPayload {
    pub id: String,
    #[serde(default)]
    pub attributes: Vec<AttributePayload>,
    #[serde(default)]
    pub control_params: Vec<ControlParamPayload>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPayload {
    pub id: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub region_id: Option<String>,
    #[serde(default)]
    pub attributes: Vec<AttributePayload>,
    #[serde(default)]
    pub controls: Vec<ControlPayload>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionPayload {
    pub id: String,
    #[serde(default)]
    pub attributes: Vec<AttributePayload>,
    #[serde(default)]
    pub action_executions: Vec<ActionExecutionPayload>,
}

/// A class or a definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelPayload {
    pub id: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub attributes: Vec<AttributePayload>,
    #[serde(default)]
    pub fields: Vec<FieldPayload>,
    #[serde(default)]
    pub regions: Vec<RegionPayload>,
    #[serde(default)]
    pub actions: Vec<ActionPayload>,
    #[serde(default)]
    pub action_groups: Vec<ActionGroupPayload>,
    #[serde(default)]
    pub icon: Option<String>,
}

/// Model data response: a model together with its ancestors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelDataPayload {
    #[serde(default)]
    pub classes: Vec<ModelPayload>,
    #[serde(default)]
    pub definitions: Vec<ModelPayload>,
}

impl ModelDataPayload {
    pub fn contains(&self, id: &str) -> bool {
        self.classes.iter().chain(&self.definitions).any(|m| m.id == id)
    }
}

/// One entry of the models hierarchy response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyPayload {
    pub id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub sub_types: Vec<HierarchyPayload>,
    #[serde(rename = "abstract", default)]
    pub is_abstract: bool,
}
