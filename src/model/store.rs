//! Arena owning every model node.
//!
//! Parent and child relations are stored as [`NodeId`] handles, so the graph
//! has no reference cycles and a `ModelStore` can be cloned and compared as a
//! snapshot.

use tracing::trace;

use super::list::ModelList;
use super::node::{ModelAttributeData, ModelContainer, ModelKind, ModelNode, ModelType, NodeId};
use super::path::{ModelPath, ModelPathWalkers};
use crate::error::{ModelError, Result};

/// Label attribute of definitions, fields, regions and the rest.
pub const LABEL_ATTRIBUTE: &str = "label";
/// Label attribute of semantic classes.
pub const CLASS_TITLE_ATTRIBUTE: &str = "http://purl.org/dc/terms/title";
/// Label attribute of semantic properties.
pub const PROPERTY_LABEL_ATTRIBUTE: &str = "http://www.w3.org/2000/01/rdf-schema#label";

/// Attribute carrying the display label of a node of the given kind.
pub fn label_attribute(model_type: ModelType) -> &'static str {
    match model_type {
        ModelType::Class => CLASS_TITLE_ATTRIBUTE,
        ModelType::Property => PROPERTY_LABEL_ATTRIBUTE,
        _ => LABEL_ATTRIBUTE,
    }
}

/// State threaded through path resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkTarget {
    Root,
    Node(NodeId),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelStore {
    nodes: Vec<ModelNode>,
    classes: ModelList<NodeId>,
    definitions: ModelList<NodeId>,
    properties: ModelList<NodeId>,
}

impl ModelStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_node(&mut self, node: ModelNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&ModelNode> {
        self.nodes.get(id.index())
    }

    pub fn node(&self, id: NodeId) -> Result<&ModelNode> {
        self.nodes
            .get(id.index())
            .ok_or_else(|| ModelError::NotFound(format!("node {id}")))
    }

    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut ModelNode> {
        self.nodes
            .get_mut(id.index())
            .ok_or_else(|| ModelError::NotFound(format!("node {id}")))
    }

    pub fn model_type(&self, id: NodeId) -> Result<ModelType> {
        Ok(self.node(id)?.model_type())
    }

    /// Fails with `KindMismatch` unless the node is of `expected` kind.
    pub fn expect_kind(&self, id: NodeId, expected: ModelType) -> Result<&ModelNode> {
        let node = self.node(id)?;
        let actual = node.model_type();
        if actual != expected {
            return Err(ModelError::KindMismatch {
                node: node.id.clone(),
                expected: type_name(expected),
                actual: type_name(actual),
            });
        }
        Ok(node)
    }

    // ── Root registries ──

    pub fn register_class(&mut self, id: NodeId) -> Result<()> {
        let key = self.expect_kind(id, ModelType::Class)?.id.clone();
        self.classes.insert(key, id);
        Ok(())
    }

    pub fn register_definition(&mut self, id: NodeId) -> Result<()> {
        let key = self.expect_kind(id, ModelType::Definition)?.id.clone();
        self.definitions.insert(key, id);
        Ok(())
    }

    pub fn register_property(&mut self, id: NodeId) -> Result<()> {
        let key = self.expect_kind(id, ModelType::Property)?.id.clone();
        self.properties.insert(key, id);
        Ok(())
    }

    pub fn unregister_property(&mut self, key: &str) -> Option<(usize, NodeId)> {
        self.properties.remove(key)
    }

    pub fn register_property_at(&mut self, index: usize, id: NodeId) -> Result<()> {
        let key = self.expect_kind(id, ModelType::Property)?.id.clone();
        self.properties.insert_at(index, key, id);
        Ok(())
    }

    pub fn class(&self, id: &str) -> Option<NodeId> {
        self.classes.get(id).copied()
    }

    pub fn definition(&self, id: &str) -> Option<NodeId> {
        self.definitions.get(id).copied()
    }

    pub fn property(&self, id: &str) -> Option<NodeId> {
        self.properties.get(id).copied()
    }

    pub fn classes(&self) -> &ModelList<NodeId> {
        &self.classes
    }

    pub fn definitions(&self) -> &ModelList<NodeId> {
        &self.definitions
    }

    pub fn properties(&self) -> &ModelList<NodeId> {
        &self.properties
    }

    // ── Attributes ──

    pub fn attribute(&self, id: NodeId) -> Result<&ModelAttributeData> {
        let node = self.expect_kind(id, ModelType::Attribute)?;
        node.as_attribute()
            .ok_or_else(|| ModelError::NotFound(format!("attribute {id}")))
    }

    pub fn attribute_mut(&mut self, id: NodeId) -> Result<&mut ModelAttributeData> {
        self.expect_kind(id, ModelType::Attribute)?;
        self.node_mut(id)?
            .as_attribute_mut()
            .ok_or_else(|| ModelError::NotFound(format!("attribute {id}")))
    }

    pub fn find_attribute(&self, owner: NodeId, attribute_id: &str) -> Option<NodeId> {
        self.get(owner)?.attributes.get(attribute_id).copied()
    }

    pub fn attribute_value(
        &self,
        owner: NodeId,
        attribute_id: &str,
    ) -> Option<&ModelAttributeData> {
        let id = self.find_attribute(owner, attribute_id)?;
        self.get(id)?.as_attribute()
    }

    // ── Containment ──

    pub fn children(&self, container: NodeId, slot: ModelContainer) -> Result<&ModelList<NodeId>> {
        let node = self.node(container)?;
        node.container(slot).ok_or_else(|| slot_mismatch(node, slot))
    }

    fn children_mut(
        &mut self,
        container: NodeId,
        slot: ModelContainer,
    ) -> Result<&mut ModelList<NodeId>> {
        let node = self.node_mut(container)?;
        if node.container(slot).is_none() {
            return Err(slot_mismatch(node, slot));
        }
        node.container_mut(slot)
            .ok_or_else(|| ModelError::Internal(anyhow::anyhow!("slot {slot} vanished")))
    }

    /// Find a child in a slot by its string id.
    pub fn child(&self, container: NodeId, slot: ModelContainer, id: &str) -> Option<NodeId> {
        self.children(container, slot).ok()?.get(id).copied()
    }

    /// Add `child` to the slot, appending or at `index`. An existing entry
    /// with the same id is overwritten in place when no index is given.
    pub fn attach(
        &mut self,
        container: NodeId,
        slot: ModelContainer,
        child: NodeId,
        index: Option<usize>,
    ) -> Result<()> {
        let key = self.node(child)?.id.clone();
        trace!(container = %container, slot = %slot, child = %key, "attach");
        let list = self.children_mut(container, slot)?;
        match index {
            Some(index) => {
                list.insert_at(index, key, child);
            }
            None => {
                list.insert(key, child);
            }
        }
        Ok(())
    }

    /// Remove by id, returning the vacated position and handle.
    pub fn detach(
        &mut self,
        container: NodeId,
        slot: ModelContainer,
        id: &str,
    ) -> Result<Option<(usize, NodeId)>> {
        trace!(container = %container, slot = %slot, child = id, "detach");
        Ok(self.children_mut(container, slot)?.remove(id))
    }

    /// Swap `child` into the slot entry with the same id, keeping its
    /// position. Returns the previous handle.
    pub fn replace(
        &mut self,
        container: NodeId,
        slot: ModelContainer,
        child: NodeId,
    ) -> Result<Option<NodeId>> {
        let key = self.node(child)?.id.clone();
        Ok(self.children_mut(container, slot)?.insert(key, child))
    }

    pub fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) -> Result<()> {
        self.node_mut(id)?.parent = parent;
        Ok(())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent
    }

    pub fn reference(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.reference()
    }

    pub fn set_reference(&mut self, id: NodeId, reference: Option<NodeId>) -> Result<()> {
        let node = self.node_mut(id)?;
        if !node.kind.set_reference(reference) {
            return Err(ModelError::InvalidAction(format!(
                "{} of kind {} cannot reference an inherited model",
                node.id,
                node.model_type()
            )));
        }
        Ok(())
    }

    // ── Addressing ──

    /// Path from the owning root down to `id`, built from the parent chain.
    pub fn path_of(&self, id: NodeId) -> Result<ModelPath> {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id)?;
            let model_type = node.model_type();
            segments.push((model_type.to_string(), node.id.clone()));
            if model_type.is_root() {
                break;
            }
            current = node.parent;
        }
        let mut path = ModelPath::new();
        for (name, value) in segments.into_iter().rev() {
            path.push(name, value);
        }
        Ok(path)
    }

    /// Replay a path against this store. Returns `None` when any segment
    /// does not resolve.
    pub fn resolve(&self, path: &ModelPath) -> Option<NodeId> {
        let child_of = |slot: ModelContainer| {
            move |target: WalkTarget, value: &str| match target {
                WalkTarget::Node(owner) => self.child(owner, slot, value).map(WalkTarget::Node),
                WalkTarget::Root => None,
            }
        };
        let walkers = ModelPathWalkers::new()
            .with(ModelType::Class.as_ref(), |t: WalkTarget, v: &str| {
                root_lookup(t, || self.class(v))
            })
            .with(ModelType::Definition.as_ref(), |t: WalkTarget, v: &str| {
                root_lookup(t, || self.definition(v))
            })
            .with(ModelType::Property.as_ref(), |t: WalkTarget, v: &str| match t {
                WalkTarget::Root => self.property(v).map(WalkTarget::Node),
                WalkTarget::Node(owner) => self
                    .child(owner, ModelContainer::Properties, v)
                    .map(WalkTarget::Node),
            })
            .with(ModelType::Field.as_ref(), child_of(ModelContainer::Fields))
            .with(ModelType::Region.as_ref(), child_of(ModelContainer::Regions))
            .with(ModelType::Action.as_ref(), child_of(ModelContainer::Actions))
            .with(ModelType::ActionGroup.as_ref(), child_of(ModelContainer::ActionGroups))
            .with(ModelType::Control.as_ref(), child_of(ModelContainer::Controls))
            .with(ModelType::ControlParam.as_ref(), child_of(ModelContainer::ControlParams))
            .with(ModelType::ActionExecution.as_ref(), child_of(ModelContainer::ActionExecutions))
            .with(ModelType::Attribute.as_ref(), child_of(ModelContainer::Attributes));

        match path.walk(WalkTarget::Root, &walkers)? {
            WalkTarget::Node(id) => Some(id),
            WalkTarget::Root => None,
        }
    }

    /// Owning class or definition of a node.
    pub fn root_of(&self, id: NodeId) -> Result<NodeId> {
        let mut current = id;
        loop {
            let node = self.node(current)?;
            if node.model_type().is_root() {
                return Ok(current);
            }
            current = node
                .parent
                .ok_or_else(|| ModelError::NotFound(format!("owner of {}", node.id)))?;
        }
    }

    // ── Descriptions and state ──

    /// Display text for a node following the language chain: the label
    /// attribute value, then the stored descriptions, then the id.
    pub fn description(&self, id: NodeId, languages: &[String]) -> String {
        let Some(node) = self.get(id) else {
            return String::new();
        };
        let label = self
            .attribute_value(id, label_attribute(node.model_type()))
            .and_then(|attr| attr.value.resolve(languages))
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty());
        if let Some(label) = label {
            return label.to_string();
        }
        languages
            .iter()
            .find_map(|lang| node.descriptions.get(lang))
            .or_else(|| node.descriptions.values().next())
            .cloned()
            .unwrap_or_else(|| node.id.clone())
    }

    pub fn is_dirty(&self, attribute: NodeId) -> bool {
        self.get(attribute)
            .and_then(ModelNode::as_attribute)
            .is_some_and(ModelAttributeData::is_dirty)
    }

    /// A model is dirty when any attribute it owns, or any child it owns,
    /// is dirty. Inherited handles are not considered.
    pub fn is_model_dirty(&self, id: NodeId) -> bool {
        let Some(node) = self.get(id) else {
            return false;
        };
        let owned = |child: &&NodeId| self.parent(**child) == Some(id);
        if node.attributes.values().filter(owned).any(|a| self.is_dirty(*a)) {
            return true;
        }
        node.kind.slots().iter().any(|slot| {
            node.container(*slot)
                .is_some_and(|list| list.values().filter(owned).any(|c| self.is_model_dirty(*c)))
        })
    }

    /// Accept every attribute value as its loaded value, e.g. after saving.
    pub fn mark_clean(&mut self) {
        for node in &mut self.nodes {
            if let ModelKind::Attribute(data) = &mut node.kind {
                data.original = data.value.clone();
            }
        }
    }

    /// Owned attributes of a node, in order.
    pub fn owned_attributes(&self, id: NodeId) -> Vec<NodeId> {
        self.get(id)
            .map(|node| {
                node.attributes
                    .values()
                    .copied()
                    .filter(|a| self.parent(*a) == Some(id))
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn root_lookup(target: WalkTarget, lookup: impl FnOnce() -> Option<NodeId>) -> Option<WalkTarget> {
    match target {
        WalkTarget::Root => lookup().map(WalkTarget::Node),
        WalkTarget::Node(_) => None,
    }
}

fn type_name(model_type: ModelType) -> &'static str {
    model_type.into()
}

fn slot_mismatch(node: &ModelNode, slot: ModelContainer) -> ModelError {
    ModelError::InvalidAction(format!("{} {} has no {slot} container", node.model_type(), node.id))
}

/// Shorthand used by linkers and tests to allocate a node in one call.
pub fn new_node(
    store: &mut ModelStore,
    id: &str,
    kind: ModelKind,
    parent: Option<NodeId>,
) -> NodeId {
    store.insert_node(ModelNode::new(id, kind).with_parent(parent))
}
