//! Hydrate raw server payloads into the model arena.
//!
//! Linkers are stateless apart from the metadata they match against. A model
//! is always linked after its parent, so inherited children can be shared by
//! handle and overridden ones can point at their counterpart.

pub mod action;
pub mod attribute;
pub mod control;
pub mod description;
pub mod field;
pub mod hierarchy;
pub mod model;
pub mod payload;
pub mod property;
pub mod region;

use std::collections::BTreeMap;

use crate::error::Result;
use crate::model::store::new_node;
use crate::model::{ModelContainer, ModelKind, ModelStore, ModelType, ModelsMetaData, NodeId};

pub use action::{ModelActionExecutionLinker, ModelActionGroupLinker, ModelActionLinker};
pub use attribute::ModelAttributeLinker;
pub use control::{ModelControlLinker, ModelControlParamLinker};
pub use description::ModelDescriptionLinker;
pub use field::ModelFieldLinker;
pub use hierarchy::ModelHierarchyLinker;
pub use model::ModelLinker;
pub use payload::{
    AttributePayload, ControlPayload, FieldPayload, HierarchyPayload, ModelDataPayload,
    ModelPayload, NodePayload,
};
pub use property::ModelPropertyLinker;
pub use region::ModelRegionLinker;

/// Metadata and options shared by every linker.
#[derive(Debug, Clone, Copy)]
pub struct LinkContext<'m> {
    pub meta: &'m ModelsMetaData,
    pub strict: bool,
}

impl<'m> LinkContext<'m> {
    pub fn new(meta: &'m ModelsMetaData) -> Self {
        Self { meta, strict: false }
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn attributes(&self) -> ModelAttributeLinker<'m> {
        ModelAttributeLinker::new(self.meta).strict(self.strict)
    }
}

/// Create a child of `owner` in `slot`. When `inherited_owner` holds a
/// counterpart with the same id, the child references it and shares its
/// attributes. Returns the child and the counterpart.
#[allow(clippy::too_many_arguments)]
pub(crate) fn link_inheriting_child(
    ctx: &LinkContext<'_>,
    store: &mut ModelStore,
    owner: NodeId,
    slot: ModelContainer,
    model_type: ModelType,
    id: &str,
    attributes: &[AttributePayload],
    inherited_owner: Option<NodeId>,
) -> Result<(NodeId, Option<NodeId>)> {
    let counterpart = inherited_owner.and_then(|o| store.child(o, slot, id));
    let child = new_node(store, id, ModelKind::empty(model_type), Some(owner));
    store.node_mut(child)?.loaded = true;
    if counterpart.is_some() {
        store.set_reference(child, counterpart)?;
    }
    ctx.attributes().link(store, child, attributes, counterpart)?;
    ModelDescriptionLinker::link(store, child, &BTreeMap::new())?;
    store.attach(owner, slot, child, None)?;
    Ok((child, counterpart))
}

/// Share every child of `inherited_owner` that `owner` does not override.
pub(crate) fn inherit_children(
    store: &mut ModelStore,
    owner: NodeId,
    slot: ModelContainer,
    inherited_owner: Option<NodeId>,
) -> Result<usize> {
    let Some(parent) = inherited_owner else {
        return Ok(0);
    };
    let inherited: Vec<NodeId> = store.children(parent, slot)?.values().copied().collect();
    let mut shared = 0;
    for child in inherited {
        let key = store.node(child)?.id.clone();
        if store.child(owner, slot, &key).is_none() {
            store.attach(owner, slot, child, None)?;
            shared += 1;
        }
    }
    Ok(shared)
}
