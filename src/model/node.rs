//! Arena node types: handles, kinds and per-kind payloads.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};

use super::list::ModelList;
use super::value::AttributeValue;
use crate::validation::model::{AttributeValidationState, ModelValidationModel};

/// Stable handle of a node inside a [`super::ModelStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Model kinds. The string form doubles as the path segment name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ModelType {
    Class,
    Definition,
    Field,
    Region,
    Control,
    ControlParam,
    Action,
    ActionGroup,
    ActionExecution,
    Property,
    Attribute,
}

impl ModelType {
    /// Top-level kinds registered directly in the store.
    pub fn is_root(self) -> bool {
        matches!(self, Self::Class | Self::Definition | Self::Property)
    }
}

/// Named child container slot of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "camelCase")]
pub enum ModelContainer {
    Attributes,
    Properties,
    Fields,
    Regions,
    Actions,
    ActionGroups,
    Controls,
    ControlParams,
    ActionExecutions,
}

// ── Kind payloads ──

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassData {
    pub properties: ModelList<NodeId>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefinitionData {
    pub fields: ModelList<NodeId>,
    pub regions: ModelList<NodeId>,
    pub actions: ModelList<NodeId>,
    pub action_groups: ModelList<NodeId>,
    /// Semantic class this definition is typed as.
    pub semantic_type: Option<NodeId>,
    pub is_abstract: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldData {
    pub controls: ModelList<NodeId>,
    pub region_id: Option<String>,
    /// Inherited counterpart this field overrides.
    pub reference: Option<NodeId>,
    /// Semantic property linked through the `uri` attribute.
    pub property: Option<NodeId>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlData {
    pub control_params: ModelList<NodeId>,
    pub reference: Option<NodeId>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionData {
    pub executions: ModelList<NodeId>,
    pub reference: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelAttributeData {
    pub attribute_type: String,
    pub value: AttributeValue,
    /// Value as loaded; the attribute is dirty when `value` differs.
    pub original: AttributeValue,
    /// Metadata key this attribute was matched to.
    pub metadata: Option<String>,
    pub validation: ModelValidationModel,
    pub state: AttributeValidationState,
}

impl ModelAttributeData {
    pub fn new(attribute_type: impl Into<String>, value: AttributeValue) -> Self {
        Self {
            attribute_type: attribute_type.into(),
            original: value.clone(),
            value,
            metadata: None,
            validation: ModelValidationModel::default(),
            state: AttributeValidationState::default(),
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.value != self.original
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModelKind {
    Class(ClassData),
    Definition(DefinitionData),
    Field(FieldData),
    Region { reference: Option<NodeId> },
    Control(ControlData),
    ControlParam { reference: Option<NodeId> },
    Action(ActionData),
    ActionGroup { reference: Option<NodeId> },
    ActionExecution { reference: Option<NodeId> },
    Property,
    Attribute(ModelAttributeData),
}

impl ModelKind {
    /// Default payload for a kind. Attributes need a value and are built
    /// through [`ModelAttributeData::new`] instead.
    pub fn empty(model_type: ModelType) -> Self {
        match model_type {
            ModelType::Class => Self::Class(ClassData::default()),
            ModelType::Definition => Self::Definition(DefinitionData::default()),
            ModelType::Field => Self::Field(FieldData::default()),
            ModelType::Region => Self::Region { reference: None },
            ModelType::Control => Self::Control(ControlData::default()),
            ModelType::ControlParam => Self::ControlParam { reference: None },
            ModelType::Action => Self::Action(ActionData::default()),
            ModelType::ActionGroup => Self::ActionGroup { reference: None },
            ModelType::ActionExecution => Self::ActionExecution { reference: None },
            ModelType::Property => Self::Property,
            ModelType::Attribute => {
                Self::Attribute(ModelAttributeData::new("string", AttributeValue::default()))
            }
        }
    }

    pub fn model_type(&self) -> ModelType {
        match self {
            Self::Class(_) => ModelType::Class,
            Self::Definition(_) => ModelType::Definition,
            Self::Field(_) => ModelType::Field,
            Self::Region { .. } => ModelType::Region,
            Self::Control(_) => ModelType::Control,
            Self::ControlParam { .. } => ModelType::ControlParam,
            Self::Action(_) => ModelType::Action,
            Self::ActionGroup { .. } => ModelType::ActionGroup,
            Self::ActionExecution { .. } => ModelType::ActionExecution,
            Self::Property => ModelType::Property,
            Self::Attribute(_) => ModelType::Attribute,
        }
    }

    pub fn reference(&self) -> Option<NodeId> {
        match self {
            Self::Field(f) => f.reference,
            Self::Control(c) => c.reference,
            Self::Action(a) => a.reference,
            Self::Region { reference }
            | Self::ControlParam { reference }
            | Self::ActionGroup { reference }
            | Self::ActionExecution { reference } => *reference,
            Self::Class(_) | Self::Definition(_) | Self::Property | Self::Attribute(_) => None,
        }
    }

    /// Returns false for kinds that carry no reference.
    pub fn set_reference(&mut self, target: Option<NodeId>) -> bool {
        let slot = match self {
            Self::Field(f) => &mut f.reference,
            Self::Control(c) => &mut c.reference,
            Self::Action(a) => &mut a.reference,
            Self::Region { reference }
            | Self::ControlParam { reference }
            | Self::ActionGroup { reference }
            | Self::ActionExecution { reference } => reference,
            Self::Class(_) | Self::Definition(_) | Self::Property | Self::Attribute(_) => {
                return false
            }
        };
        *slot = target;
        true
    }

    /// Child list for a non-attribute slot, if this kind has it.
    pub fn container(&self, slot: ModelContainer) -> Option<&ModelList<NodeId>> {
        match (self, slot) {
            (Self::Class(c), ModelContainer::Properties) => Some(&c.properties),
            (Self::Definition(d), ModelContainer::Fields) => Some(&d.fields),
            (Self::Definition(d), ModelContainer::Regions) => Some(&d.regions),
            (Self::Definition(d), ModelContainer::Actions) => Some(&d.actions),
            (Self::Definition(d), ModelContainer::ActionGroups) => Some(&d.action_groups),
            (Self::Field(f), ModelContainer::Controls) => Some(&f.controls),
            (Self::Control(c), ModelContainer::ControlParams) => Some(&c.control_params),
            (Self::Action(a), ModelContainer::ActionExecutions) => Some(&a.executions),
            _ => None,
        }
    }

    pub fn container_mut(&mut self, slot: ModelContainer) -> Option<&mut ModelList<NodeId>> {
        match (self, slot) {
            (Self::Class(c), ModelContainer::Properties) => Some(&mut c.properties),
            (Self::Definition(d), ModelContainer::Fields) => Some(&mut d.fields),
            (Self::Definition(d), ModelContainer::Regions) => Some(&mut d.regions),
            (Self::Definition(d), ModelContainer::Actions) => Some(&mut d.actions),
            (Self::Definition(d), ModelContainer::ActionGroups) => Some(&mut d.action_groups),
            (Self::Field(f), ModelContainer::Controls) => Some(&mut f.controls),
            (Self::Control(c), ModelContainer::ControlParams) => Some(&mut c.control_params),
            (Self::Action(a), ModelContainer::ActionExecutions) => Some(&mut a.executions),
            _ => None,
        }
    }

    /// Child slots owned by this kind, attributes excluded.
    pub fn slots(&self) -> &'static [ModelContainer] {
        match self {
            Self::Class(_) => &[ModelContainer::Properties],
            Self::Definition(_) => &[
                ModelContainer::Regions,
                ModelContainer::Fields,
                ModelContainer::Actions,
                ModelContainer::ActionGroups,
            ],
            Self::Field(_) => &[ModelContainer::Controls],
            Self::Control(_) => &[ModelContainer::ControlParams],
            Self::Action(_) => &[ModelContainer::ActionExecutions],
            _ => &[],
        }
    }
}

/// Slot of the parent that holds children of `child_type`.
pub fn container_for(child_type: ModelType) -> Option<ModelContainer> {
    match child_type {
        ModelType::Attribute => Some(ModelContainer::Attributes),
        ModelType::Property => Some(ModelContainer::Properties),
        ModelType::Field => Some(ModelContainer::Fields),
        ModelType::Region => Some(ModelContainer::Regions),
        ModelType::Control => Some(ModelContainer::Controls),
        ModelType::ControlParam => Some(ModelContainer::ControlParams),
        ModelType::Action => Some(ModelContainer::Actions),
        ModelType::ActionGroup => Some(ModelContainer::ActionGroups),
        ModelType::ActionExecution => Some(ModelContainer::ActionExecutions),
        ModelType::Class | ModelType::Definition => None,
    }
}

/// A model entity stored in the arena.
///
/// `parent` is the inheritance parent for classes and definitions, and the
/// owning container for everything else.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelNode {
    pub id: String,
    pub parent: Option<NodeId>,
    pub kind: ModelKind,
    pub attributes: ModelList<NodeId>,
    pub descriptions: BTreeMap<String, String>,
    pub loaded: bool,
    pub icon: Option<String>,
}

impl ModelNode {
    pub fn new(id: impl Into<String>, kind: ModelKind) -> Self {
        Self {
            id: id.into(),
            parent: None,
            kind,
            attributes: ModelList::new(),
            descriptions: BTreeMap::new(),
            loaded: false,
            icon: None,
        }
    }

    pub fn attribute(id: impl Into<String>, data: ModelAttributeData) -> Self {
        let mut node = Self::new(id, ModelKind::Attribute(data));
        node.loaded = true;
        node
    }

    pub fn with_parent(mut self, parent: Option<NodeId>) -> Self {
        self.parent = parent;
        self
    }

    pub fn model_type(&self) -> ModelType {
        self.kind.model_type()
    }

    pub fn as_attribute(&self) -> Option<&ModelAttributeData> {
        match &self.kind {
            ModelKind::Attribute(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_attribute_mut(&mut self) -> Option<&mut ModelAttributeData> {
        match &mut self.kind {
            ModelKind::Attribute(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_definition(&self) -> Option<&DefinitionData> {
        match &self.kind {
            ModelKind::Definition(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_field(&self) -> Option<&FieldData> {
        match &self.kind {
            ModelKind::Field(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_field_mut(&mut self) -> Option<&mut FieldData> {
        match &mut self.kind {
            ModelKind::Field(data) => Some(data),
            _ => None,
        }
    }

    pub fn reference(&self) -> Option<NodeId> {
        self.kind.reference()
    }

    pub fn container(&self, slot: ModelContainer) -> Option<&ModelList<NodeId>> {
        match slot {
            ModelContainer::Attributes => Some(&self.attributes),
            other => self.kind.container(other),
        }
    }

    pub fn container_mut(&mut self, slot: ModelContainer) -> Option<&mut ModelList<NodeId>> {
        match slot {
            ModelContainer::Attributes => Some(&mut self.attributes),
            other => self.kind.container_mut(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_type_names_are_path_segments() {
        assert_eq!(ModelType::ControlParam.to_string(), "controlParam");
        assert_eq!(ModelType::ActionExecution.as_ref(), "actionExecution");
        assert_eq!("actionGroup".parse::<ModelType>().unwrap(), ModelType::ActionGroup);
    }

    #[test]
    fn references_only_on_inheritable_kinds() {
        let mut region = ModelKind::empty(ModelType::Region);
        assert!(region.set_reference(Some(NodeId(3))));
        assert_eq!(region.reference(), Some(NodeId(3)));

        let mut class = ModelKind::empty(ModelType::Class);
        assert!(!class.set_reference(Some(NodeId(3))));
        assert_eq!(class.reference(), None);
    }

    #[test]
    fn containers_follow_kind() {
        let node = ModelNode::new("media", ModelKind::empty(ModelType::Definition));
        assert!(node.container(ModelContainer::Fields).is_some());
        assert!(node.container(ModelContainer::Attributes).is_some());
        assert!(node.container(ModelContainer::Controls).is_none());
        assert_eq!(container_for(ModelType::Control), Some(ModelContainer::Controls));
        assert_eq!(container_for(ModelType::Definition), None);
    }

    #[test]
    fn attribute_dirty_tracks_original() {
        let mut data = ModelAttributeData::new("string", AttributeValue::single("a"));
        assert!(!data.is_dirty());
        data.value = AttributeValue::single("b");
        assert!(data.is_dirty());
    }
}
