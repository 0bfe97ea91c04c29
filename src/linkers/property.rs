use std::collections::BTreeMap;

use tracing::debug;

use super::description::ModelDescriptionLinker;
use super::payload::PropertyPayload;
use super::LinkContext;
use crate::error::Result;
use crate::model::store::new_node;
use crate::model::{ModelKind, ModelStore, ModelType, NodeId};

/// Hydrates semantic properties and links fields to them by uri.
#[derive(Debug, Clone, Copy)]
pub struct ModelPropertyLinker<'m> {
    ctx: LinkContext<'m>,
}

impl<'m> ModelPropertyLinker<'m> {
    pub fn new(ctx: LinkContext<'m>) -> Self {
        Self { ctx }
    }

    /// Register every property not yet in the store. Already linked
    /// properties are kept as they are.
    pub fn link(
        &self,
        store: &mut ModelStore,
        properties: &[PropertyPayload],
    ) -> Result<Vec<NodeId>> {
        let mut linked = Vec::with_capacity(properties.len());
        for payload in properties {
            if let Some(existing) = store.property(&payload.id) {
                linked.push(existing);
                continue;
            }
            let property =
                new_node(store, &payload.id, ModelKind::empty(ModelType::Property), None);
            store.node_mut(property)?.loaded = true;
            self.ctx.attributes().link(store, property, &payload.attributes, None)?;
            ModelDescriptionLinker::link(store, property, &BTreeMap::new())?;
            store.register_property(property)?;
            linked.push(property);
        }
        debug!(count = linked.len(), "linked semantic properties");
        Ok(linked)
    }

    /// Point `field` at the property registered under `uri`. Returns whether
    /// a property was found.
    pub fn link_field(store: &mut ModelStore, field: NodeId, uri: Option<&str>) -> Result<bool> {
        let property = uri.and_then(|uri| store.property(uri));
        if let Some(data) = store.node_mut(field)?.as_field_mut() {
            data.property = property;
        }
        Ok(property.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelsMetaData;
    use serde_json::json;

    #[test]
    fn links_properties_and_fields() {
        let meta = ModelsMetaData::from_json(json!({
            "properties": [
                {
                    "id": "label",
                    "uri": "http://www.w3.org/2000/01/rdf-schema#label",
                    "type": "label"
                }
            ]
        }))
        .unwrap();
        let payload: Vec<PropertyPayload> = serde_json::from_value(json!([{
            "id": "emf:title",
            "attributes": [{
                "name": "http://www.w3.org/2000/01/rdf-schema#label",
                "type": "label",
                "value": {"en": "Title"}
            }]
        }]))
        .unwrap();

        let mut store = ModelStore::new();
        let linker = ModelPropertyLinker::new(LinkContext::new(&meta));
        let linked = linker.link(&mut store, &payload).unwrap();
        assert_eq!(linked.len(), 1);
        assert_eq!(store.description(linked[0], &["en".to_string()]), "Title");

        // linking again keeps the same handle
        assert_eq!(linker.link(&mut store, &payload).unwrap(), linked);

        let field = new_node(&mut store, "title", ModelKind::empty(ModelType::Field), None);
        assert!(ModelPropertyLinker::link_field(&mut store, field, Some("emf:title")).unwrap());
        assert_eq!(store.node(field).unwrap().as_field().unwrap().property, Some(linked[0]));
        assert!(!ModelPropertyLinker::link_field(&mut store, field, Some("emf:none")).unwrap());
    }
}
