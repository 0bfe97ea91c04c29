//! Attribute metadata, the schema describing which attributes every model
//! kind carries, their types, defaults and validation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::list::ModelList;
use super::node::ModelType;
use crate::validation::model::ModelValidationModel;

/// Option offered for an enumerated attribute (e.g. control types).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelMetaDataOption {
    pub value: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelMetaData {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(rename = "type", default = "default_meta_type")]
    pub meta_type: String,
    #[serde(default)]
    pub default_value: Value,
    #[serde(default)]
    pub validation_model: ModelValidationModel,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub options: Vec<ModelMetaDataOption>,
}

fn default_meta_type() -> String {
    "string".to_string()
}

impl ModelMetaData {
    /// Key under which semantic metadata is matched: the uri when present.
    pub fn uri_or_id(&self) -> &str {
        self.uri.as_deref().unwrap_or(&self.id)
    }
}

/// Raw metadata response, one list per model kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetaDataPayload {
    pub semantics: Vec<ModelMetaData>,
    pub definitions: Vec<ModelMetaData>,
    pub properties: Vec<ModelMetaData>,
    pub regions: Vec<ModelMetaData>,
    pub fields: Vec<ModelMetaData>,
    pub controls: Vec<ModelMetaData>,
    pub control_params: Vec<ModelMetaData>,
    pub actions: Vec<ModelMetaData>,
    pub action_groups: Vec<ModelMetaData>,
    pub action_executions: Vec<ModelMetaData>,
}

/// Metadata for every model kind, keyed for attribute matching.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelsMetaData {
    pub semantics: ModelList<ModelMetaData>,
    pub definitions: ModelList<ModelMetaData>,
    pub properties: ModelList<ModelMetaData>,
    pub regions: ModelList<ModelMetaData>,
    pub fields: ModelList<ModelMetaData>,
    pub controls: ModelList<ModelMetaData>,
    pub control_params: ModelList<ModelMetaData>,
    pub actions: ModelList<ModelMetaData>,
    pub action_groups: ModelList<ModelMetaData>,
    pub action_executions: ModelList<ModelMetaData>,
}

fn by_id(items: Vec<ModelMetaData>) -> ModelList<ModelMetaData> {
    items.into_iter().map(|m| (m.id.clone(), m)).collect()
}

fn by_uri(items: Vec<ModelMetaData>) -> ModelList<ModelMetaData> {
    items
        .into_iter()
        .map(|m| (m.uri_or_id().to_string(), m))
        .collect()
}

impl ModelsMetaData {
    pub fn from_payload(payload: MetaDataPayload) -> Self {
        Self {
            semantics: by_uri(payload.semantics),
            definitions: by_id(payload.definitions),
            properties: by_uri(payload.properties),
            regions: by_id(payload.regions),
            fields: by_id(payload.fields),
            controls: by_id(payload.controls),
            control_params: by_id(payload.control_params),
            actions: by_id(payload.actions),
            action_groups: by_id(payload.action_groups),
            action_executions: by_id(payload.action_executions),
        }
    }

    pub fn from_json(value: Value) -> crate::error::Result<Self> {
        let payload: MetaDataPayload = serde_json::from_value(value)?;
        Ok(Self::from_payload(payload))
    }

    /// Metadata list describing attributes of the given kind. Attributes
    /// themselves carry no attributes.
    pub fn for_kind(&self, kind: ModelType) -> Option<&ModelList<ModelMetaData>> {
        match kind {
            ModelType::Class => Some(&self.semantics),
            ModelType::Definition => Some(&self.definitions),
            ModelType::Property => Some(&self.properties),
            ModelType::Region => Some(&self.regions),
            ModelType::Field => Some(&self.fields),
            ModelType::Control => Some(&self.controls),
            ModelType::ControlParam => Some(&self.control_params),
            ModelType::Action => Some(&self.actions),
            ModelType::ActionGroup => Some(&self.action_groups),
            ModelType::ActionExecution => Some(&self.action_executions),
            ModelType::Attribute => None,
        }
    }

    pub fn get(&self, kind: ModelType, key: &str) -> Option<&ModelMetaData> {
        self.for_kind(kind)?.get(key)
    }

    /// Control types offered by the `id` attribute of control metadata.
    pub fn control_options(&self) -> &[ModelMetaDataOption] {
        self.controls
            .get("id")
            .map(|m| m.options.as_slice())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metadata() -> ModelsMetaData {
        ModelsMetaData::from_json(json!({
            "semantics": [
                {"id": "title", "uri": "http://purl.org/dc/terms/title", "type": "multiLangString"}
            ],
            "fields": [
                {"id": "label", "type": "label"},
                {"id": "mandatory", "type": "boolean", "defaultValue": false}
            ],
            "controls": [
                {
                    "id": "id",
                    "type": "option",
                    "options": [{"value": "RICHTEXT"}, {"value": "DEFAULT_VALUE_PATTERN"}]
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn semantics_are_keyed_by_uri() {
        let meta = metadata();
        assert!(meta.get(ModelType::Class, "http://purl.org/dc/terms/title").is_some());
        assert!(meta.get(ModelType::Class, "title").is_none());
    }

    #[test]
    fn kinds_map_to_their_lists() {
        let meta = metadata();
        let field_meta = meta.for_kind(ModelType::Field).unwrap();
        assert_eq!(field_meta.ids().collect::<Vec<_>>(), vec!["label", "mandatory"]);
        assert_eq!(field_meta.get("mandatory").unwrap().default_value, json!(false));
        assert!(meta.for_kind(ModelType::Attribute).is_none());
    }

    #[test]
    fn control_options_come_from_id_metadata() {
        let meta = metadata();
        let values: Vec<_> = meta.control_options().iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["RICHTEXT", "DEFAULT_VALUE_PATTERN"]);
        assert!(ModelsMetaData::default().control_options().is_empty());
    }

    #[test]
    fn type_defaults_to_string() {
        let m: ModelMetaData = serde_json::from_value(json!({"id": "x"})).unwrap();
        assert_eq!(m.meta_type, "string");
        assert_eq!(m.default_value, Value::Null);
    }
}
