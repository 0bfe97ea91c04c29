//! Action factories: build actions and evaluate the state they need.
//!
//! Allocation happens here and never in processors. A created node starts
//! detached, so the store after the factory call equals the store after
//! an execute/restore pair.

use std::collections::BTreeMap;

use tracing::debug;

use super::types::*;
use crate::error::{ModelError, Result};
use crate::linkers::field::region_fields;
use crate::linkers::{ModelAttributeLinker, ModelDescriptionLinker};
use crate::model::store::new_node;
use crate::model::utility::{find_inherited, is_inherited};
use crate::model::{
    AttributeValue, ModelContainer, ModelKind, ModelStore, ModelType, ModelsMetaData, NodeId,
};

/// Fills derived fields of an action before it is executed.
pub trait ActionFactory<A> {
    fn evaluate(&self, store: &mut ModelStore, action: &mut A) -> Result<()>;
}

#[derive(Debug, Clone, Copy)]
pub struct ModelActionFactory<'m> {
    meta: &'m ModelsMetaData,
}

impl<'m> ModelActionFactory<'m> {
    pub fn new(meta: &'m ModelsMetaData) -> Self {
        Self { meta }
    }

    // ── Create ──

    pub fn create_field(
        &self,
        store: &mut ModelStore,
        definition: NodeId,
        id: &str,
    ) -> Result<CreateFieldAction> {
        store.expect_kind(definition, ModelType::Definition)?;
        expect_attached(store, definition)?;
        let model = self.allocate(store, ModelType::Field, id)?;
        Ok(CreateFieldAction::new(model, definition))
    }

    pub fn create_region(
        &self,
        store: &mut ModelStore,
        definition: NodeId,
        id: &str,
    ) -> Result<CreateRegionAction> {
        store.expect_kind(definition, ModelType::Definition)?;
        expect_attached(store, definition)?;
        let model = self.allocate(store, ModelType::Region, id)?;
        Ok(CreateRegionAction::new(model, definition))
    }

    pub fn create_property(
        &self,
        store: &mut ModelStore,
        class: NodeId,
        id: &str,
    ) -> Result<CreatePropertyAction> {
        store.expect_kind(class, ModelType::Class)?;
        expect_attached(store, class)?;
        if store.property(id).is_some() {
            return Err(ModelError::InvalidAction(format!("property {id} already exists")));
        }
        let model = self.allocate(store, ModelType::Property, id)?;
        Ok(CreatePropertyAction::new(model, class))
    }

    /// `control_type` must be one of the offered control options, when the
    /// metadata offers any.
    pub fn create_control(
        &self,
        store: &mut ModelStore,
        field: NodeId,
        control_type: &str,
    ) -> Result<CreateControlAction> {
        store.expect_kind(field, ModelType::Field)?;
        expect_attached(store, field)?;
        let options = self.meta.control_options();
        if !options.is_empty() && !options.iter().any(|o| o.value == control_type) {
            return Err(ModelError::InvalidAction(format!("unknown control type {control_type}")));
        }
        let model = self.allocate(store, ModelType::Control, control_type)?;
        Ok(CreateControlAction::new(model, field))
    }

    pub fn create_control_param(
        &self,
        store: &mut ModelStore,
        control: NodeId,
        id: &str,
    ) -> Result<CreateControlParamAction> {
        store.expect_kind(control, ModelType::Control)?;
        expect_attached(store, control)?;
        let model = self.allocate(store, ModelType::ControlParam, id)?;
        Ok(CreateControlParamAction::new(model, control))
    }

    // ── Remove ──

    pub fn remove_field(
        &self,
        store: &mut ModelStore,
        field: NodeId,
        definition: NodeId,
    ) -> Result<RemoveFieldAction> {
        let mut action = RemoveFieldAction::new(field, definition);
        self.evaluate_one(store, &mut action)?;
        Ok(action)
    }

    pub fn remove_region(
        &self,
        store: &mut ModelStore,
        region: NodeId,
        definition: NodeId,
    ) -> Result<RemoveRegionAction> {
        let mut action = RemoveRegionAction::new(region, definition);
        self.evaluate_one(store, &mut action)?;
        Ok(action)
    }

    pub fn remove_control(
        &self,
        store: &mut ModelStore,
        control: NodeId,
        field: NodeId,
    ) -> Result<RemoveControlAction> {
        let mut action = RemoveControlAction::new(control, field);
        self.evaluate_one(store, &mut action)?;
        Ok(action)
    }

    // ── Restore inherited ──

    pub fn restore_inherited_field(
        &self,
        store: &mut ModelStore,
        field: NodeId,
        definition: NodeId,
    ) -> Result<RestoreInheritedFieldAction> {
        let mut action = RestoreInheritedFieldAction::new(field, definition);
        self.evaluate_one(store, &mut action)?;
        Ok(action)
    }

    pub fn restore_inherited_region(
        &self,
        store: &mut ModelStore,
        region: NodeId,
        definition: NodeId,
    ) -> Result<RestoreInheritedRegionAction> {
        let mut action = RestoreInheritedRegionAction::new(region, definition);
        self.evaluate_one(store, &mut action)?;
        Ok(action)
    }

    pub fn restore_inherited_control(
        &self,
        store: &mut ModelStore,
        control: NodeId,
        field: NodeId,
    ) -> Result<RestoreInheritedControlAction> {
        let mut action = RestoreInheritedControlAction::new(control, field);
        self.evaluate_one(store, &mut action)?;
        Ok(action)
    }

    pub fn restore_inherited_attribute(
        &self,
        store: &mut ModelStore,
        attribute: NodeId,
        owner: NodeId,
    ) -> Result<RestoreInheritedAttributeAction> {
        let mut action = RestoreInheritedAttributeAction::new(attribute, owner);
        self.evaluate_one(store, &mut action)?;
        Ok(action)
    }

    // ── Attributes ──

    pub fn change_attribute(
        &self,
        store: &mut ModelStore,
        attribute: NodeId,
        owner: NodeId,
        value: AttributeValue,
    ) -> Result<ChangeAttributeAction> {
        let mut action = ChangeAttributeAction::new(attribute, owner, value);
        self.evaluate_one(store, &mut action)?;
        Ok(action)
    }

    pub fn validate_attribute(
        &self,
        store: &mut ModelStore,
        attribute: NodeId,
        owner: NodeId,
    ) -> Result<ValidateAttributeAction> {
        let mut action = ValidateAttributeAction::new(attribute, owner);
        self.evaluate_one(store, &mut action)?;
        Ok(action)
    }

    pub fn validate_attributes(
        &self,
        store: &mut ModelStore,
        model: NodeId,
    ) -> Result<ValidateAttributesAction> {
        let mut action = ValidateAttributesAction::new(model);
        self.evaluate_one(store, &mut action)?;
        Ok(action)
    }

    /// Evaluate any action through the factory of its type.
    pub fn evaluate(&self, store: &mut ModelStore, action: &mut ModelAction) -> Result<()> {
        match action {
            ModelAction::CreateField(a) => self.evaluate_one(store, a),
            ModelAction::CreateRegion(a) => self.evaluate_one(store, a),
            ModelAction::CreateProperty(a) => self.evaluate_one(store, a),
            ModelAction::CreateControl(a) => self.evaluate_one(store, a),
            ModelAction::CreateControlParam(a) => self.evaluate_one(store, a),
            ModelAction::RemoveField(a) => self.evaluate_one(store, a),
            ModelAction::RemoveRegion(a) => self.evaluate_one(store, a),
            ModelAction::RemoveControl(a) => self.evaluate_one(store, a),
            ModelAction::RestoreInheritedField(a) => self.evaluate_one(store, a),
            ModelAction::RestoreInheritedRegion(a) => self.evaluate_one(store, a),
            ModelAction::RestoreInheritedControl(a) => self.evaluate_one(store, a),
            ModelAction::RestoreInheritedAttribute(a) => self.evaluate_one(store, a),
            ModelAction::ChangeAttribute(a) => self.evaluate_one(store, a),
            ModelAction::ValidateAttribute(a) => self.evaluate_one(store, a),
            ModelAction::ValidateAttributes(a) => self.evaluate_one(store, a),
        }
    }

    fn evaluate_one<A>(&self, store: &mut ModelStore, action: &mut A) -> Result<()>
    where
        Self: ActionFactory<A>,
    {
        ActionFactory::evaluate(self, store, action)
    }

    /// Detached, loaded node seeded with metadata default attributes.
    fn allocate(&self, store: &mut ModelStore, model_type: ModelType, id: &str) -> Result<NodeId> {
        let node = new_node(store, id, ModelKind::empty(model_type), None);
        store.node_mut(node)?.loaded = true;
        ModelAttributeLinker::new(self.meta).link(store, node, &[], None)?;
        ModelDescriptionLinker::link(store, node, &BTreeMap::new())?;
        debug!(model = id, kind = %model_type, "allocated model for create action");
        Ok(node)
    }
}

/// `context` leads up to its class or definition. Actions on a detached
/// context could not be addressed in a changeset.
fn expect_attached(store: &ModelStore, context: NodeId) -> Result<()> {
    store.root_of(context).map(|_| ())
}

/// Owned child of `context` in `slot`, i.e. the model can be removed or
/// restored there.
fn expect_owned_child(
    store: &ModelStore,
    model: NodeId,
    context: NodeId,
    slot: ModelContainer,
) -> Result<()> {
    expect_attached(store, context)?;
    let node = store.node(model)?;
    if store.child(context, slot, &node.id) != Some(model) {
        return Err(ModelError::NotFound(format!(
            "{} {} in {}",
            node.model_type(),
            node.id,
            store.node(context)?.id
        )));
    }
    if is_inherited(store, model, context) {
        return Err(ModelError::InvalidAction(format!(
            "{} {} is inherited in {}",
            node.model_type(),
            node.id,
            store.node(context)?.id
        )));
    }
    Ok(())
}

/// Counterpart of `model` up the inheritance chain of `context`.
fn inherited_counterpart(
    store: &ModelStore,
    model: NodeId,
    context: NodeId,
    slot: ModelContainer,
) -> Option<NodeId> {
    let id = &store.get(model)?.id;
    store
        .reference(model)
        .or_else(|| find_inherited(store, context, slot, id))
}

/// Fields owned by `definition` and placed in `region`.
fn owned_region_fields(
    store: &ModelStore,
    region: NodeId,
    definition: NodeId,
) -> Result<Vec<NodeId>> {
    let region_id = &store.node(region)?.id;
    Ok(region_fields(store, definition, region_id)
        .into_iter()
        .filter(|&field| !is_inherited(store, field, definition))
        .collect())
}

fn missing_reference(store: &ModelStore, model: NodeId) -> ModelError {
    let id = store.get(model).map(|n| n.id.clone()).unwrap_or_else(|| model.to_string());
    ModelError::MissingReference(id)
}

macro_rules! no_op_factory {
    ($($action:ident),* $(,)?) => {
        $(
            impl ActionFactory<$action> for ModelActionFactory<'_> {
                fn evaluate(&self, _store: &mut ModelStore, _action: &mut $action) -> Result<()> {
                    Ok(())
                }
            }
        )*
    };
}

no_op_factory!(
    CreateFieldAction,
    CreateRegionAction,
    CreatePropertyAction,
    CreateControlAction,
    CreateControlParamAction,
);

impl ActionFactory<RemoveFieldAction> for ModelActionFactory<'_> {
    fn evaluate(&self, store: &mut ModelStore, action: &mut RemoveFieldAction) -> Result<()> {
        expect_owned_child(store, action.model, action.context, ModelContainer::Fields)
    }
}

impl ActionFactory<RemoveRegionAction> for ModelActionFactory<'_> {
    fn evaluate(&self, store: &mut ModelStore, action: &mut RemoveRegionAction) -> Result<()> {
        expect_owned_child(store, action.model, action.context, ModelContainer::Regions)?;
        action.contained_fields = owned_region_fields(store, action.model, action.context)?;
        Ok(())
    }
}

impl ActionFactory<RemoveControlAction> for ModelActionFactory<'_> {
    fn evaluate(&self, store: &mut ModelStore, action: &mut RemoveControlAction) -> Result<()> {
        expect_owned_child(store, action.model, action.context, ModelContainer::Controls)
    }
}

impl ActionFactory<RestoreInheritedFieldAction> for ModelActionFactory<'_> {
    fn evaluate(
        &self,
        store: &mut ModelStore,
        action: &mut RestoreInheritedFieldAction,
    ) -> Result<()> {
        expect_owned_child(store, action.model, action.context, ModelContainer::Fields)?;
        let inherited =
            inherited_counterpart(store, action.model, action.context, ModelContainer::Fields)
                .ok_or_else(|| missing_reference(store, action.model))?;
        action.inherited = Some(inherited);
        Ok(())
    }
}

impl ActionFactory<RestoreInheritedRegionAction> for ModelActionFactory<'_> {
    fn evaluate(
        &self,
        store: &mut ModelStore,
        action: &mut RestoreInheritedRegionAction,
    ) -> Result<()> {
        expect_owned_child(store, action.model, action.context, ModelContainer::Regions)?;
        let inherited =
            inherited_counterpart(store, action.model, action.context, ModelContainer::Regions)
                .ok_or_else(|| missing_reference(store, action.model))?;
        action.inherited = Some(inherited);
        action.contained_fields = owned_region_fields(store, action.model, action.context)?;
        Ok(())
    }
}

impl ActionFactory<RestoreInheritedControlAction> for ModelActionFactory<'_> {
    fn evaluate(
        &self,
        store: &mut ModelStore,
        action: &mut RestoreInheritedControlAction,
    ) -> Result<()> {
        expect_owned_child(store, action.model, action.context, ModelContainer::Controls)?;
        action.inherited =
            inherited_counterpart(store, action.model, action.context, ModelContainer::Controls);
        Ok(())
    }
}

impl ActionFactory<RestoreInheritedAttributeAction> for ModelActionFactory<'_> {
    fn evaluate(
        &self,
        store: &mut ModelStore,
        action: &mut RestoreInheritedAttributeAction,
    ) -> Result<()> {
        expect_owned_child(store, action.model, action.context, ModelContainer::Attributes)?;
        let id = store.node(action.model)?.id.clone();
        let inherited = find_inherited(store, action.context, ModelContainer::Attributes, &id)
            .ok_or_else(|| missing_reference(store, action.model))?;
        action.inherited = Some(inherited);
        Ok(())
    }
}

impl ActionFactory<ChangeAttributeAction> for ModelActionFactory<'_> {
    /// An inherited attribute is never edited in place: the action gets an
    /// owned copy that shadows it in `context`.
    fn evaluate(&self, store: &mut ModelStore, action: &mut ChangeAttributeAction) -> Result<()> {
        store.attribute(action.model)?;
        expect_attached(store, action.context)?;
        if action.replaced.is_some() || !is_inherited(store, action.model, action.context) {
            return Ok(());
        }
        let mut copy = store.node(action.model)?.clone();
        copy.parent = Some(action.context);
        let copy = store.insert_node(copy);
        action.replaced = Some(action.model);
        action.model = copy;
        Ok(())
    }
}

impl ActionFactory<ValidateAttributeAction> for ModelActionFactory<'_> {
    fn evaluate(&self, store: &mut ModelStore, action: &mut ValidateAttributeAction) -> Result<()> {
        store.attribute(action.model)?;
        expect_attached(store, action.context)
    }
}

impl ActionFactory<ValidateAttributesAction> for ModelActionFactory<'_> {
    fn evaluate(
        &self,
        store: &mut ModelStore,
        action: &mut ValidateAttributesAction,
    ) -> Result<()> {
        expect_attached(store, action.model)
    }
}
