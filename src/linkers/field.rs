use tracing::trace;

use super::control::ModelControlLinker;
use super::payload::FieldPayload;
use super::property::ModelPropertyLinker;
use super::{inherit_children, link_inheriting_child, LinkContext};
use crate::error::Result;
use crate::model::{ModelContainer, ModelStore, ModelType, NodeId};

/// Attribute holding the semantic property uri of a field.
pub const URI_ATTRIBUTE: &str = "uri";

#[derive(Debug, Clone, Copy)]
pub struct ModelFieldLinker<'m> {
    ctx: LinkContext<'m>,
}

impl<'m> ModelFieldLinker<'m> {
    pub fn new(ctx: LinkContext<'m>) -> Self {
        Self { ctx }
    }

    /// Link the fields of `definition`. `parent` is the already linked
    /// parent definition whose fields are inherited.
    pub fn link(
        &self,
        store: &mut ModelStore,
        definition: NodeId,
        fields: &[FieldPayload],
        parent: Option<NodeId>,
    ) -> Result<()> {
        for payload in fields {
            let (field, counterpart) = link_inheriting_child(
                &self.ctx,
                store,
                definition,
                ModelContainer::Fields,
                ModelType::Field,
                &payload.id,
                &payload.attributes,
                parent,
            )?;

            let inherited_region = counterpart
                .and_then(|c| store.get(c))
                .and_then(|n| n.as_field())
                .and_then(|f| f.region_id.clone());
            let region_id = payload.region_id.clone().or(inherited_region);
            if let Some(data) = store.node_mut(field)?.as_field_mut() {
                data.region_id = region_id;
            }

            ModelControlLinker::new(self.ctx).link(store, field, &payload.controls, counterpart)?;

            let uri = payload
                .attributes
                .iter()
                .find(|a| a.name == URI_ATTRIBUTE)
                .and_then(|a| a.value.as_str());
            ModelPropertyLinker::link_field(store, field, uri)?;
            trace!(field = %payload.id, overrides = counterpart.is_some(), "linked field");
        }
        inherit_children(store, definition, ModelContainer::Fields, parent)?;
        Ok(())
    }
}

/// Fields of `definition` placed in the region with `region_id`.
pub fn region_fields(store: &ModelStore, definition: NodeId, region_id: &str) -> Vec<NodeId> {
    store
        .children(definition, ModelContainer::Fields)
        .map(|fields| {
            fields
                .values()
                .copied()
                .filter(|&f| {
                    store
                        .get(f)
                        .and_then(|n| n.as_field())
                        .and_then(|d| d.region_id.as_deref())
                        == Some(region_id)
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::store::new_node;
    use crate::model::{ModelKind, ModelsMetaData};
    use serde_json::json;

    fn fields(value: serde_json::Value) -> Vec<FieldPayload> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn overrides_reference_parent_fields_and_rest_is_inherited() {
        let meta = ModelsMetaData::from_json(json!({
            "fields": [
                {"id": "label", "type": "label"},
                {"id": "displayType", "type": "displayType", "defaultValue": "HIDDEN"}
            ]
        }))
        .unwrap();
        let ctx = LinkContext::new(&meta);
        let mut store = ModelStore::new();
        let entity = new_node(&mut store, "entity", ModelKind::empty(ModelType::Definition), None);
        let media =
            new_node(&mut store, "media", ModelKind::empty(ModelType::Definition), Some(entity));

        let linker = ModelFieldLinker::new(ctx);
        linker
            .link(
                &mut store,
                entity,
                &fields(json!([
                    {
                        "id": "title",
                        "regionId": "generalDetails",
                        "attributes": [{"name": "displayType", "value": "EDITABLE"}]
                    },
                    {"id": "description"}
                ])),
                None,
            )
            .unwrap();
        linker
            .link(
                &mut store,
                media,
                &fields(json!([
                    {"id": "title", "attributes": [{"name": "label", "value": {"en": "Name"}}]}
                ])),
                Some(entity),
            )
            .unwrap();

        let parent_title = store.child(entity, ModelContainer::Fields, "title").unwrap();
        let title = store.child(media, ModelContainer::Fields, "title").unwrap();
        let description = store.child(media, ModelContainer::Fields, "description").unwrap();

        assert_ne!(title, parent_title);
        assert_eq!(store.reference(title), Some(parent_title));
        assert_eq!(store.parent(description), Some(entity));
        // region is inherited from the counterpart, displayType is shared
        assert_eq!(region_fields(&store, media, "generalDetails"), vec![title]);
        assert_eq!(
            store.find_attribute(title, "displayType"),
            store.find_attribute(parent_title, "displayType")
        );
        assert_eq!(store.description(title, &["en".to_string()]), "Name");
    }
}
