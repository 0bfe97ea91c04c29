use tracing::{debug, warn};

use super::payload::AttributePayload;
use crate::error::Result;
use crate::model::{
    AttributeValue, ModelAttributeData, ModelContainer, ModelMetaData, ModelNode, ModelStore,
    ModelsMetaData, NodeId,
};

/// Hydrates the attributes of a model from its payload and metadata.
///
/// Every payload attribute is matched to metadata by name; attributes without
/// metadata are skipped. Metadata entries missing from the payload are filled
/// by sharing the attribute of `inherit_from`, or else created from the
/// metadata default.
#[derive(Debug, Clone, Copy)]
pub struct ModelAttributeLinker<'m> {
    meta: &'m ModelsMetaData,
    strict: bool,
}

impl<'m> ModelAttributeLinker<'m> {
    pub fn new(meta: &'m ModelsMetaData) -> Self {
        Self { meta, strict: false }
    }

    /// Report skipped attributes at warn level.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn link(
        &self,
        store: &mut ModelStore,
        owner: NodeId,
        attributes: &[AttributePayload],
        inherit_from: Option<NodeId>,
    ) -> Result<()> {
        let kind = store.model_type(owner)?;
        let Some(metas) = self.meta.for_kind(kind) else {
            return Ok(());
        };

        for payload in attributes {
            let Some(meta) = metas.get(&payload.name) else {
                let owner = &store.node(owner)?.id;
                if self.strict {
                    warn!(owner = %owner, attribute = %payload.name, "no metadata, skipped");
                } else {
                    debug!(owner = %owner, attribute = %payload.name, "no metadata, skipped");
                }
                continue;
            };
            let attribute_type = payload.attribute_type.as_deref().unwrap_or(&meta.meta_type);
            let value = AttributeValue::from_json(attribute_type, &payload.value);
            Self::create_attribute(store, owner, &payload.name, attribute_type, meta, value)?;
        }

        for (key, meta) in metas.iter() {
            if store.find_attribute(owner, key).is_some() {
                continue;
            }
            match inherit_from.and_then(|parent| store.find_attribute(parent, key)) {
                Some(inherited) => {
                    store.attach(owner, ModelContainer::Attributes, inherited, None)?
                }
                None => {
                    Self::create_default(store, owner, key, meta)?;
                }
            }
        }
        Ok(())
    }

    /// New attribute owned by `owner`, attached to its attribute list.
    pub fn create_attribute(
        store: &mut ModelStore,
        owner: NodeId,
        key: &str,
        attribute_type: &str,
        meta: &ModelMetaData,
        value: AttributeValue,
    ) -> Result<NodeId> {
        let mut data = ModelAttributeData::new(attribute_type, value);
        data.metadata = Some(key.to_string());
        data.validation = meta.validation_model.clone();
        let attr = store.insert_node(ModelNode::attribute(key, data).with_parent(Some(owner)));
        store.attach(owner, ModelContainer::Attributes, attr, None)?;
        Ok(attr)
    }

    pub fn create_default(
        store: &mut ModelStore,
        owner: NodeId,
        key: &str,
        meta: &ModelMetaData,
    ) -> Result<NodeId> {
        let value = AttributeValue::from_json(&meta.meta_type, &meta.default_value);
        Self::create_attribute(store, owner, key, &meta.meta_type, meta, value)
    }
}
