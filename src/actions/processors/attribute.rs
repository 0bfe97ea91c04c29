use tracing::{debug, trace};

use super::{node_key, not_executed, ActionProcessor};
use crate::actions::types::{
    ChangeAttributeAction, ValidateAttributeAction, ValidateAttributesAction,
};
use crate::changeset::{ModelChangeSet, ModelChangeSetBuilder, ModelOperation};
use crate::error::Result;
use crate::model::{ModelContainer, ModelStore, NodeId};
use crate::validation::ModelValidationService;

/// Sets the attribute value. An owned copy prepared by the factory shadows
/// the inherited attribute while the action is applied.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelChangeAttributeActionProcessor;

impl ActionProcessor for ModelChangeAttributeActionProcessor {
    type Action = ChangeAttributeAction;

    fn execute(&self, store: &mut ModelStore, action: &mut Self::Action) -> Result<NodeId> {
        if action.replaced.is_some() {
            action.displaced =
                store.replace(action.context, ModelContainer::Attributes, action.model)?;
        }
        let attribute = store.attribute_mut(action.model)?;
        let previous = std::mem::replace(&mut attribute.value, action.value.clone());
        action.previous = Some(previous);
        debug!(attribute = %action.model, "changed attribute value");
        Ok(action.model)
    }

    fn restore(&self, store: &mut ModelStore, action: &mut Self::Action) -> Result<NodeId> {
        let previous = action
            .previous
            .clone()
            .ok_or_else(|| not_executed("ChangeAttributeAction"))?;
        store.attribute_mut(action.model)?.value = previous;
        if action.replaced.is_some() {
            match action.displaced {
                Some(displaced) => {
                    store.replace(action.context, ModelContainer::Attributes, displaced)?;
                }
                None => {
                    let key = node_key(store, action.model)?;
                    store.detach(action.context, ModelContainer::Attributes, &key)?;
                }
            }
        }
        Ok(action.model)
    }

    fn changeset(&self, store: &ModelStore, action: &Self::Action) -> Result<Vec<ModelChangeSet>> {
        let mut change =
            ModelChangeSetBuilder::build_change_set(store, action.model, ModelOperation::Modify)?;
        change.new_value = Some(action.value.to_json());
        if let Some(previous) = &action.previous {
            change = change.with_old_value(previous.to_json());
        }
        Ok(vec![change])
    }
}

/// Computes and stores the validation state of one attribute.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelValidateAttributeActionProcessor {
    validation: ModelValidationService,
}

impl ModelValidateAttributeActionProcessor {
    pub fn new(validation: ModelValidationService) -> Self {
        Self { validation }
    }
}

impl ActionProcessor for ModelValidateAttributeActionProcessor {
    type Action = ValidateAttributeAction;

    fn execute(&self, store: &mut ModelStore, action: &mut Self::Action) -> Result<NodeId> {
        let state = self.validation.validate_attribute(store, action.model, action.context)?;
        let attribute = store.attribute_mut(action.model)?;
        action.previous = Some(std::mem::replace(&mut attribute.state, state));
        Ok(action.model)
    }

    fn restore(&self, store: &mut ModelStore, action: &mut Self::Action) -> Result<NodeId> {
        let previous = action
            .previous
            .clone()
            .ok_or_else(|| not_executed("ValidateAttributeAction"))?;
        store.attribute_mut(action.model)?.state = previous;
        Ok(action.model)
    }

    fn changeset(
        &self,
        _store: &ModelStore,
        _action: &Self::Action,
    ) -> Result<Vec<ModelChangeSet>> {
        Ok(Vec::new())
    }
}

/// Validates every attribute visible on a model.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelValidateAttributesActionProcessor {
    validation: ModelValidationService,
}

impl ModelValidateAttributesActionProcessor {
    pub fn new(validation: ModelValidationService) -> Self {
        Self { validation }
    }
}

impl ActionProcessor for ModelValidateAttributesActionProcessor {
    type Action = ValidateAttributesAction;

    fn execute(&self, store: &mut ModelStore, action: &mut Self::Action) -> Result<NodeId> {
        let states = self.validation.validate_model(store, action.model)?;
        let mut previous = Vec::with_capacity(states.len());
        for (attribute, state) in states {
            let data = store.attribute_mut(attribute)?;
            previous.push((attribute, std::mem::replace(&mut data.state, state)));
        }
        trace!(model = %action.model, attributes = previous.len(), "validated attributes");
        action.previous = previous;
        Ok(action.model)
    }

    fn restore(&self, store: &mut ModelStore, action: &mut Self::Action) -> Result<NodeId> {
        for (attribute, state) in action.previous.iter().rev() {
            store.attribute_mut(*attribute)?.state = state.clone();
        }
        Ok(action.model)
    }

    fn changeset(
        &self,
        _store: &ModelStore,
        _action: &Self::Action,
    ) -> Result<Vec<ModelChangeSet>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ModelActionFactory;
    use crate::model::store::new_node;
    use crate::model::{
        AttributeValue, ModelAttributeData, ModelKind, ModelNode, ModelType, ModelsMetaData,
    };
    use crate::validation::ModelValidationModel;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn inherited_identifier() -> (ModelStore, NodeId, NodeId, NodeId) {
        let mut store = ModelStore::new();
        let entity = new_node(&mut store, "entity", ModelKind::empty(ModelType::Definition), None);
        store.register_definition(entity).unwrap();
        let media =
            new_node(&mut store, "media", ModelKind::empty(ModelType::Definition), Some(entity));
        store.register_definition(media).unwrap();
        let mut data = ModelAttributeData::new("string", AttributeValue::single("entity"));
        data.validation = ModelValidationModel {
            mandatory: true,
            rules: Vec::new(),
        };
        let attr =
            store.insert_node(ModelNode::attribute("identifier", data).with_parent(Some(entity)));
        store.attach(entity, ModelContainer::Attributes, attr, None).unwrap();
        store.attach(media, ModelContainer::Attributes, attr, None).unwrap();
        (store, entity, media, attr)
    }

    #[test]
    fn change_inherited_attribute_shadows_and_restores() {
        let meta = ModelsMetaData::default();
        let (mut store, entity, media, attr) = inherited_identifier();
        let mut action = ModelActionFactory::new(&meta)
            .change_attribute(&mut store, attr, media, AttributeValue::single("media"))
            .unwrap();
        let snapshot = store.clone();

        let processor = ModelChangeAttributeActionProcessor;
        let copy = processor.execute(&mut store, &mut action).unwrap();
        assert_eq!(store.find_attribute(media, "identifier"), Some(copy));
        assert_eq!(store.find_attribute(entity, "identifier"), Some(attr));
        assert_eq!(store.attribute(attr).unwrap().value, AttributeValue::single("entity"));
        assert!(store.is_model_dirty(media));

        let sets = processor.changeset(&store, &action).unwrap();
        assert_eq!(sets[0].selector, "definition=media/attribute=identifier");
        assert_eq!(sets[0].new_value, Some(json!("media")));
        assert_eq!(sets[0].old_value, Some(json!("entity")));

        processor.restore(&mut store, &mut action).unwrap();
        assert_eq!(store, snapshot);
    }

    #[test]
    fn undo_swaps_back_the_entry_displaced_on_execute() {
        let meta = ModelsMetaData::default();
        let (mut store, _, media, attr) = inherited_identifier();
        let factory = ModelActionFactory::new(&meta);
        let mut first = factory
            .change_attribute(&mut store, attr, media, AttributeValue::single("first"))
            .unwrap();
        let mut second = factory
            .change_attribute(&mut store, attr, media, AttributeValue::single("second"))
            .unwrap();
        let snapshot = store.clone();

        let processor = ModelChangeAttributeActionProcessor;
        let first_copy = processor.execute(&mut store, &mut first).unwrap();
        processor.execute(&mut store, &mut second).unwrap();
        assert_eq!(second.displaced, Some(first_copy));

        processor.restore(&mut store, &mut second).unwrap();
        assert_eq!(store.find_attribute(media, "identifier"), Some(first_copy));
        processor.restore(&mut store, &mut first).unwrap();
        assert_eq!(store, snapshot);
    }

    #[test]
    fn validate_attribute_records_previous_state() {
        let meta = ModelsMetaData::default();
        let (mut store, _, media, attr) = inherited_identifier();
        store.attribute_mut(attr).unwrap().value = AttributeValue::single("");
        let mut action = ModelActionFactory::new(&meta)
            .validate_attribute(&mut store, attr, media)
            .unwrap();
        let snapshot = store.clone();

        let processor = ModelValidateAttributeActionProcessor::default();
        processor.execute(&mut store, &mut action).unwrap();
        let state = &store.attribute(attr).unwrap().state;
        assert!(!state.valid);
        assert_eq!(state.messages[0].message, "Attribute identifier is mandatory");
        assert!(processor.changeset(&store, &action).unwrap().is_empty());

        processor.restore(&mut store, &mut action).unwrap();
        assert_eq!(store, snapshot);
    }

    #[test]
    fn validate_attributes_restores_every_state() {
        let meta = ModelsMetaData::default();
        let (mut store, _, media, attr) = inherited_identifier();
        store.attribute_mut(attr).unwrap().value = AttributeValue::single("");
        let mut action = ModelActionFactory::new(&meta)
            .validate_attributes(&mut store, media)
            .unwrap();
        let snapshot = store.clone();

        let processor = ModelValidateAttributesActionProcessor::default();
        processor.execute(&mut store, &mut action).unwrap();
        assert_eq!(action.previous.len(), 1);
        assert!(!store.attribute(attr).unwrap().state.valid);

        processor.restore(&mut store, &mut action).unwrap();
        assert_eq!(store, snapshot);
    }
}
