//! Inheritance helpers shared by linkers, factories and processors.

use super::node::{ModelContainer, ModelType, NodeId};
use super::store::ModelStore;

/// A model is inherited in `context` when it is not owned by it.
pub fn is_inherited(store: &ModelStore, model: NodeId, context: NodeId) -> bool {
    store.parent(model) != Some(context)
}

/// Next node up the inheritance chain: the parent for classes and
/// definitions, the overridden counterpart for nested models.
pub fn inheritance_parent(store: &ModelStore, owner: NodeId) -> Option<NodeId> {
    let node = store.get(owner)?;
    match node.model_type() {
        ModelType::Class | ModelType::Definition => node.parent,
        _ => node.reference(),
    }
}

/// Closest child with `id` in `slot` of the ancestors of `owner`.
pub fn find_inherited(
    store: &ModelStore,
    owner: NodeId,
    slot: ModelContainer,
    id: &str,
) -> Option<NodeId> {
    let mut current = inheritance_parent(store, owner);
    let mut guard = store.len();
    while let Some(ancestor) = current {
        if let Some(found) = store.child(ancestor, slot, id) {
            return Some(found);
        }
        guard = guard.checked_sub(1)?;
        current = inheritance_parent(store, ancestor);
    }
    None
}

/// Ancestors of a class or definition, direct parent first.
pub fn ancestors(store: &ModelStore, id: NodeId) -> Vec<NodeId> {
    let mut result = Vec::new();
    let mut current = inheritance_parent(store, id);
    while let Some(ancestor) = current {
        if result.contains(&ancestor) || ancestor == id {
            break;
        }
        result.push(ancestor);
        current = inheritance_parent(store, ancestor);
    }
    result
}
