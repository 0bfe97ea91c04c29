//! Changesets: the persistable diff produced by model actions.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumString};

use crate::error::Result;
use crate::model::{ModelStore, ModelType, NodeId};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ModelOperation {
    Add,
    Modify,
    Remove,
    Restore,
}

/// One changeset entry. `selector` is the model path of the changed node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelChangeSet {
    pub model_id: String,
    pub selector: String,
    pub operation: ModelOperation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,
}

impl ModelChangeSet {
    pub fn with_old_value(mut self, old_value: Value) -> Self {
        self.old_value = Some(old_value);
        self
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ModelChangeSetBuilder;

impl ModelChangeSetBuilder {
    /// Tag a single node with `operation`.
    ///
    /// Attributes carry their current value as `new_value` for additions and
    /// modifications.
    pub fn build_change_set(
        store: &ModelStore,
        node: NodeId,
        operation: ModelOperation,
    ) -> Result<ModelChangeSet> {
        let root = store.root_of(node)?;
        let selector = store.path_of(node)?.to_string();
        let new_value = match operation {
            ModelOperation::Add | ModelOperation::Modify
                if store.model_type(node)? == ModelType::Attribute =>
            {
                Some(store.attribute(node)?.value.to_json())
            }
            _ => None,
        };
        Ok(ModelChangeSet {
            model_id: store.node(root)?.id.clone(),
            selector,
            operation,
            new_value,
            old_value: None,
        })
    }

    /// Tag `child` addressed through `context`. Used once the child has been
    /// detached and its own parent chain no longer leads to the root.
    pub fn build_child_change_set(
        store: &ModelStore,
        context: NodeId,
        child: NodeId,
        operation: ModelOperation,
    ) -> Result<ModelChangeSet> {
        let root = store.root_of(context)?;
        let node = store.node(child)?;
        let selector = store
            .path_of(context)?
            .join(node.model_type().as_ref(), node.id.as_str())
            .to_string();
        Ok(ModelChangeSet {
            model_id: store.node(root)?.id.clone(),
            selector,
            operation,
            new_value: None,
            old_value: None,
        })
    }

    /// Tag every node with the same operation, regardless of dirty state.
    pub fn build_change_sets<I>(
        store: &ModelStore,
        nodes: I,
        operation: ModelOperation,
    ) -> Result<Vec<ModelChangeSet>>
    where
        I: IntoIterator<Item = NodeId>,
    {
        nodes
            .into_iter()
            .map(|node| Self::build_change_set(store, node, operation))
            .collect()
    }

    /// MODIFY entries for the dirty attributes owned by `model` and by its
    /// owned descendants.
    pub fn dirty_change_sets(store: &ModelStore, model: NodeId) -> Result<Vec<ModelChangeSet>> {
        let mut result = Vec::new();
        Self::collect_dirty(store, model, &mut result)?;
        Ok(result)
    }

    fn collect_dirty(
        store: &ModelStore,
        model: NodeId,
        out: &mut Vec<ModelChangeSet>,
    ) -> Result<()> {
        for attr in store.owned_attributes(model) {
            let data = store.attribute(attr)?;
            if data.is_dirty() {
                let original = data.original.to_json();
                let change = Self::build_change_set(store, attr, ModelOperation::Modify)?;
                out.push(change.with_old_value(original));
            }
        }
        let node = store.node(model)?;
        for slot in node.kind.slots() {
            let Some(children) = node.container(*slot) else {
                continue;
            };
            for &child in children.values() {
                if store.parent(child) == Some(model) {
                    Self::collect_dirty(store, child, out)?;
                }
            }
        }
        Ok(())
    }
}
