//! Action data holders.
//!
//! Every action carries the `model` it operates on and the `context` that
//! contains it. Fields filled by [`super::ModelActionFactory::evaluate`] or
//! recorded by `execute` are kept on the action so that `restore` can undo
//! it without recomputing anything.

use uuid::Uuid;

use crate::model::{AttributeValue, ModelType, NodeId};
use crate::validation::model::AttributeValidationState;

/// Identity of a single action instance.
pub type ActionId = Uuid;

/// Where a removed model used to sit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovedPosition {
    pub index: usize,
    pub parent: Option<NodeId>,
}

macro_rules! create_action {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            pub id: ActionId,
            /// Detached node allocated by the factory.
            pub model: NodeId,
            pub context: NodeId,
            /// Entry with the same id displaced by `execute`.
            pub replaced: Option<NodeId>,
        }

        impl $name {
            pub fn new(model: NodeId, context: NodeId) -> Self {
                Self {
                    id: Uuid::new_v4(),
                    model,
                    context,
                    replaced: None,
                }
            }
        }
    };
}

macro_rules! remove_action {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            pub id: ActionId,
            pub model: NodeId,
            pub context: NodeId,
            pub removed: Option<RemovedPosition>,
        }

        impl $name {
            pub fn new(model: NodeId, context: NodeId) -> Self {
                Self {
                    id: Uuid::new_v4(),
                    model,
                    context,
                    removed: None,
                }
            }
        }
    };
}

create_action!(
    /// Add a new field to a definition.
    CreateFieldAction
);
create_action!(
    /// Add a new region to a definition.
    CreateRegionAction
);
create_action!(
    /// Add a new semantic property to a class and to the property registry.
    CreatePropertyAction
);
create_action!(
    /// Add a new control to a field.
    CreateControlAction
);
create_action!(
    /// Add a new param to a control.
    CreateControlParamAction
);

remove_action!(RemoveFieldAction);
remove_action!(RemoveControlAction);

/// Remove an owned region. Owned fields placed in it lose their region id
/// while it is gone.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoveRegionAction {
    pub id: ActionId,
    pub model: NodeId,
    pub context: NodeId,
    pub removed: Option<RemovedPosition>,
    pub contained_fields: Vec<NodeId>,
}

/// Drop the override of a field and show the inherited one in its place.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoreInheritedFieldAction {
    pub id: ActionId,
    pub model: NodeId,
    pub context: NodeId,
    pub inherited: Option<NodeId>,
}

/// Drop the override of a region. Owned fields placed in the region lose
/// their region id while the inherited region is shown.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoreInheritedRegionAction {
    pub id: ActionId,
    pub model: NodeId,
    pub context: NodeId,
    pub inherited: Option<NodeId>,
    pub contained_fields: Vec<NodeId>,
}

/// Drop the override of a control. A control the inherited field does not
/// have is removed instead.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoreInheritedControlAction {
    pub id: ActionId,
    pub model: NodeId,
    pub context: NodeId,
    pub inherited: Option<NodeId>,
    pub removed: Option<RemovedPosition>,
}

/// Share the inherited attribute again instead of the owned override.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoreInheritedAttributeAction {
    pub id: ActionId,
    pub model: NodeId,
    pub context: NodeId,
    pub inherited: Option<NodeId>,
}

/// Set a new value on an attribute of `context`.
///
/// When the attribute is inherited the factory allocates an owned copy;
/// `model` is then the copy and `replaced` the inherited attribute it
/// shadows. `displaced` is the entry the copy actually took the place of
/// during `execute`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeAttributeAction {
    pub id: ActionId,
    pub model: NodeId,
    pub context: NodeId,
    pub value: AttributeValue,
    pub previous: Option<AttributeValue>,
    pub replaced: Option<NodeId>,
    pub displaced: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidateAttributeAction {
    pub id: ActionId,
    pub model: NodeId,
    pub context: NodeId,
    pub previous: Option<AttributeValidationState>,
}

/// Validate every attribute visible on `model`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidateAttributesAction {
    pub id: ActionId,
    pub model: NodeId,
    pub previous: Vec<(NodeId, AttributeValidationState)>,
}

impl RemoveRegionAction {
    pub fn new(model: NodeId, context: NodeId) -> Self {
        Self {
            id: Uuid::new_v4(),
            model,
            context,
            removed: None,
            contained_fields: Vec::new(),
        }
    }
}

impl RestoreInheritedFieldAction {
    pub fn new(model: NodeId, context: NodeId) -> Self {
        Self {
            id: Uuid::new_v4(),
            model,
            context,
            inherited: None,
        }
    }
}

impl RestoreInheritedRegionAction {
    pub fn new(model: NodeId, context: NodeId) -> Self {
        Self {
            id: Uuid::new_v4(),
            model,
            context,
            inherited: None,
            contained_fields: Vec::new(),
        }
    }
}

impl RestoreInheritedControlAction {
    pub fn new(model: NodeId, context: NodeId) -> Self {
        Self {
            id: Uuid::new_v4(),
            model,
            context,
            inherited: None,
            removed: None,
        }
    }
}

impl RestoreInheritedAttributeAction {
    pub fn new(model: NodeId, context: NodeId) -> Self {
        Self {
            id: Uuid::new_v4(),
            model,
            context,
            inherited: None,
        }
    }
}

impl ChangeAttributeAction {
    pub fn new(model: NodeId, context: NodeId, value: AttributeValue) -> Self {
        Self {
            id: Uuid::new_v4(),
            model,
            context,
            value,
            previous: None,
            replaced: None,
            displaced: None,
        }
    }
}

impl ValidateAttributeAction {
    pub fn new(model: NodeId, context: NodeId) -> Self {
        Self {
            id: Uuid::new_v4(),
            model,
            context,
            previous: None,
        }
    }
}

impl ValidateAttributesAction {
    pub fn new(model: NodeId) -> Self {
        Self {
            id: Uuid::new_v4(),
            model,
            previous: Vec::new(),
        }
    }
}

/// Every undoable edit of the model graph.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelAction {
    CreateField(CreateFieldAction),
    CreateRegion(CreateRegionAction),
    CreateProperty(CreatePropertyAction),
    CreateControl(CreateControlAction),
    CreateControlParam(CreateControlParamAction),
    RemoveField(RemoveFieldAction),
    RemoveRegion(RemoveRegionAction),
    RemoveControl(RemoveControlAction),
    RestoreInheritedField(RestoreInheritedFieldAction),
    RestoreInheritedRegion(RestoreInheritedRegionAction),
    RestoreInheritedControl(RestoreInheritedControlAction),
    RestoreInheritedAttribute(RestoreInheritedAttributeAction),
    ChangeAttribute(ChangeAttributeAction),
    ValidateAttribute(ValidateAttributeAction),
    ValidateAttributes(ValidateAttributesAction),
}

impl ModelAction {
    pub fn id(&self) -> ActionId {
        match self {
            Self::CreateField(a) => a.id,
            Self::CreateRegion(a) => a.id,
            Self::CreateProperty(a) => a.id,
            Self::CreateControl(a) => a.id,
            Self::CreateControlParam(a) => a.id,
            Self::RemoveField(a) => a.id,
            Self::RemoveRegion(a) => a.id,
            Self::RemoveControl(a) => a.id,
            Self::RestoreInheritedField(a) => a.id,
            Self::RestoreInheritedRegion(a) => a.id,
            Self::RestoreInheritedControl(a) => a.id,
            Self::RestoreInheritedAttribute(a) => a.id,
            Self::ChangeAttribute(a) => a.id,
            Self::ValidateAttribute(a) => a.id,
            Self::ValidateAttributes(a) => a.id,
        }
    }

    pub fn model(&self) -> NodeId {
        match self {
            Self::CreateField(a) => a.model,
            Self::CreateRegion(a) => a.model,
            Self::CreateProperty(a) => a.model,
            Self::CreateControl(a) => a.model,
            Self::CreateControlParam(a) => a.model,
            Self::RemoveField(a) => a.model,
            Self::RemoveRegion(a) => a.model,
            Self::RemoveControl(a) => a.model,
            Self::RestoreInheritedField(a) => a.model,
            Self::RestoreInheritedRegion(a) => a.model,
            Self::RestoreInheritedControl(a) => a.model,
            Self::RestoreInheritedAttribute(a) => a.model,
            Self::ChangeAttribute(a) => a.model,
            Self::ValidateAttribute(a) => a.model,
            Self::ValidateAttributes(a) => a.model,
        }
    }

    /// Containing model. Validating a whole model is its own context.
    pub fn context(&self) -> NodeId {
        match self {
            Self::CreateField(a) => a.context,
            Self::CreateRegion(a) => a.context,
            Self::CreateProperty(a) => a.context,
            Self::CreateControl(a) => a.context,
            Self::CreateControlParam(a) => a.context,
            Self::RemoveField(a) => a.context,
            Self::RemoveRegion(a) => a.context,
            Self::RemoveControl(a) => a.context,
            Self::RestoreInheritedField(a) => a.context,
            Self::RestoreInheritedRegion(a) => a.context,
            Self::RestoreInheritedControl(a) => a.context,
            Self::RestoreInheritedAttribute(a) => a.context,
            Self::ChangeAttribute(a) => a.context,
            Self::ValidateAttribute(a) => a.context,
            Self::ValidateAttributes(a) => a.model,
        }
    }

    /// Kind of the model the action operates on.
    pub fn model_type(&self) -> ModelType {
        match self {
            Self::CreateField(_) | Self::RemoveField(_) | Self::RestoreInheritedField(_) => {
                ModelType::Field
            }
            Self::CreateRegion(_) | Self::RemoveRegion(_) | Self::RestoreInheritedRegion(_) => {
                ModelType::Region
            }
            Self::CreateProperty(_) => ModelType::Property,
            Self::CreateControl(_) | Self::RemoveControl(_) | Self::RestoreInheritedControl(_) => {
                ModelType::Control
            }
            Self::CreateControlParam(_) => ModelType::ControlParam,
            Self::RestoreInheritedAttribute(_)
            | Self::ChangeAttribute(_)
            | Self::ValidateAttribute(_) => ModelType::Attribute,
            Self::ValidateAttributes(_) => ModelType::Definition,
        }
    }

    /// Validation actions only touch validation state and produce no
    /// changeset.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidateAttribute(_) | Self::ValidateAttributes(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateField(_) => "createField",
            Self::CreateRegion(_) => "createRegion",
            Self::CreateProperty(_) => "createProperty",
            Self::CreateControl(_) => "createControl",
            Self::CreateControlParam(_) => "createControlParam",
            Self::RemoveField(_) => "removeField",
            Self::RemoveRegion(_) => "removeRegion",
            Self::RemoveControl(_) => "removeControl",
            Self::RestoreInheritedField(_) => "restoreInheritedField",
            Self::RestoreInheritedRegion(_) => "restoreInheritedRegion",
            Self::RestoreInheritedControl(_) => "restoreInheritedControl",
            Self::RestoreInheritedAttribute(_) => "restoreInheritedAttribute",
            Self::ChangeAttribute(_) => "changeAttribute",
            Self::ValidateAttribute(_) => "validateAttribute",
            Self::ValidateAttributes(_) => "validateAttributes",
        }
    }
}

macro_rules! impl_from_action {
    ($($variant:ident($ty:ident)),* $(,)?) => {
        $(
            impl From<$ty> for ModelAction {
                fn from(action: $ty) -> Self {
                    Self::$variant(action)
                }
            }
        )*
    };
}

impl_from_action!(
    CreateField(CreateFieldAction),
    CreateRegion(CreateRegionAction),
    CreateProperty(CreatePropertyAction),
    CreateControl(CreateControlAction),
    CreateControlParam(CreateControlParamAction),
    RemoveField(RemoveFieldAction),
    RemoveRegion(RemoveRegionAction),
    RemoveControl(RemoveControlAction),
    RestoreInheritedField(RestoreInheritedFieldAction),
    RestoreInheritedRegion(RestoreInheritedRegionAction),
    RestoreInheritedControl(RestoreInheritedControlAction),
    RestoreInheritedAttribute(RestoreInheritedAttributeAction),
    ChangeAttribute(ChangeAttributeAction),
    ValidateAttribute(ValidateAttributeAction),
    ValidateAttributes(ValidateAttributesAction),
);
