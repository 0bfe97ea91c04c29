use super::payload::RegionPayload;
use super::{inherit_children, link_inheriting_child, LinkContext};
use crate::error::Result;
use crate::model::{ModelContainer, ModelStore, ModelType, NodeId};

#[derive(Debug, Clone, Copy)]
pub struct ModelRegionLinker<'m> {
    ctx: LinkContext<'m>,
}

impl<'m> ModelRegionLinker<'m> {
    pub fn new(ctx: LinkContext<'m>) -> Self {
        Self { ctx }
    }

    pub fn link(
        &self,
        store: &mut ModelStore,
        definition: NodeId,
        regions: &[RegionPayload],
        parent: Option<NodeId>,
    ) -> Result<()> {
        for payload in regions {
            link_inheriting_child(
                &self.ctx,
                store,
                definition,
                ModelContainer::Regions,
                ModelType::Region,
                &payload.id,
                &payload.attributes,
                parent,
            )?;
        }
        inherit_children(store, definition, ModelContainer::Regions, parent)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::store::new_node;
    use crate::model::{ModelKind, ModelsMetaData};
    use serde_json::json;

    #[test]
    fn links_regions_with_order() {
        let meta = ModelsMetaData::from_json(json!({
            "regions": [
                {"id": "label", "type": "label"},
                {"id": "order", "type": "integer", "defaultValue": 0}
            ]
        }))
        .unwrap();
        let mut store = ModelStore::new();
        let entity = new_node(&mut store, "entity", ModelKind::empty(ModelType::Definition), None);
        let media =
            new_node(&mut store, "media", ModelKind::empty(ModelType::Definition), Some(entity));
        let linker = ModelRegionLinker::new(LinkContext::new(&meta));

        let regions: Vec<RegionPayload> = serde_json::from_value(json!([
            {"id": "generalDetails", "attributes": [{"name": "order", "value": 10}]}
        ]))
        .unwrap();
        linker.link(&mut store, entity, &regions, None).unwrap();
        let specific: Vec<RegionPayload> =
            serde_json::from_value(json!([{"id": "specificDetails"}])).unwrap();
        linker.link(&mut store, media, &specific, Some(entity)).unwrap();

        let ids: Vec<_> = store
            .children(media, ModelContainer::Regions)
            .unwrap()
            .ids()
            .map(String::from)
            .collect();
        assert_eq!(ids, vec!["specificDetails", "generalDetails"]);
        let order = store
            .attribute_value(
                store.child(entity, ModelContainer::Regions, "generalDetails").unwrap(),
                "order",
            )
            .unwrap();
        assert_eq!(order.value.to_json(), json!(10));
    }
}
