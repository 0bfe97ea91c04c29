use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::Result;
use crate::model::{label_attribute, AttributeValue, ModelStore, NodeId};

/// Wires `descriptions` of a model from its label attribute, falling back to
/// the payload labels. Language keys are lowercased.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelDescriptionLinker;

impl ModelDescriptionLinker {
    pub fn link(
        store: &mut ModelStore,
        model: NodeId,
        labels: &BTreeMap<String, String>,
    ) -> Result<()> {
        let kind = store.model_type(model)?;
        let from_attribute = store
            .attribute_value(model, label_attribute(kind))
            .map(|attr| label_map(&attr.value))
            .filter(|map| !map.is_empty());

        let descriptions = from_attribute.unwrap_or_else(|| {
            labels
                .iter()
                .filter(|(_, v)| !v.trim().is_empty())
                .map(|(lang, v)| (lang.to_lowercase(), v.clone()))
                .collect()
        });
        store.node_mut(model)?.descriptions = descriptions;
        Ok(())
    }
}

fn label_map(value: &AttributeValue) -> BTreeMap<String, String> {
    match value {
        AttributeValue::MultiLang(values) => values
            .iter()
            .filter_map(|(lang, v)| match &v.value {
                Value::String(s) if !s.trim().is_empty() => Some((lang.clone(), s.clone())),
                _ => None,
            })
            .collect(),
        AttributeValue::Single(_) => BTreeMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::store::new_node;
    use crate::model::{ModelAttributeData, ModelContainer, ModelKind, ModelNode, ModelType};

    #[test]
    fn label_attribute_wins_over_payload_labels() {
        let mut store = ModelStore::new();
        let class = new_node(&mut store, "emf:Entity", ModelKind::empty(ModelType::Class), None);
        let data = ModelAttributeData::new(
            "label",
            AttributeValue::multi_lang([("en", "Entity"), ("bg", "Обект")]),
        );
        let title = store.insert_node(
            ModelNode::attribute("http://purl.org/dc/terms/title", data).with_parent(Some(class)),
        );
        store.attach(class, ModelContainer::Attributes, title, None).unwrap();

        let labels = BTreeMap::from([("EN".to_string(), "ignored".to_string())]);
        ModelDescriptionLinker::link(&mut store, class, &labels).unwrap();
        let descriptions = &store.node(class).unwrap().descriptions;
        assert_eq!(descriptions.get("en").map(String::as_str), Some("Entity"));
        assert_eq!(descriptions.get("bg").map(String::as_str), Some("Обект"));
    }

    #[test]
    fn falls_back_to_lowercased_labels() {
        let mut store = ModelStore::new();
        let def = new_node(&mut store, "media", ModelKind::empty(ModelType::Definition), None);
        let labels = BTreeMap::from([
            ("BG".to_string(), "Медия".to_string()),
            ("EN".to_string(), "Media".to_string()),
        ]);
        ModelDescriptionLinker::link(&mut store, def, &labels).unwrap();
        let descriptions = &store.node(def).unwrap().descriptions;
        assert_eq!(descriptions.get("bg").map(String::as_str), Some("Медия"));
    }
}
