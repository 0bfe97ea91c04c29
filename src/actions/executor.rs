use tracing::debug;

use super::processors::*;
use super::types::ModelAction;
use crate::changeset::ModelChangeSet;
use crate::error::Result;
use crate::model::{ModelStore, NodeId};
use crate::validation::ModelValidationService;

/// Routes each [`ModelAction`] to the processor of its type.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelActionExecutor {
    validation: ModelValidationService,
}

macro_rules! dispatch {
    ($self:ident, $action:expr, |$processor:ident, $inner:ident| $body:expr) => {
        match $action {
            ModelAction::CreateField($inner) => {
                let $processor = ModelCreateFieldActionProcessor;
                $body
            }
            ModelAction::CreateRegion($inner) => {
                let $processor = ModelCreateRegionActionProcessor;
                $body
            }
            ModelAction::CreateProperty($inner) => {
                let $processor = ModelCreatePropertyActionProcessor;
                $body
            }
            ModelAction::CreateControl($inner) => {
                let $processor = ModelCreateControlActionProcessor;
                $body
            }
            ModelAction::CreateControlParam($inner) => {
                let $processor = ModelCreateControlParamActionProcessor;
                $body
            }
            ModelAction::RemoveField($inner) => {
                let $processor = ModelRemoveFieldActionProcessor;
                $body
            }
            ModelAction::RemoveRegion($inner) => {
                let $processor = ModelRemoveRegionActionProcessor;
                $body
            }
            ModelAction::RemoveControl($inner) => {
                let $processor = ModelRemoveControlActionProcessor;
                $body
            }
            ModelAction::RestoreInheritedField($inner) => {
                let $processor = ModelRestoreInheritedFieldActionProcessor;
                $body
            }
            ModelAction::RestoreInheritedRegion($inner) => {
                let $processor = ModelRestoreInheritedRegionActionProcessor;
                $body
            }
            ModelAction::RestoreInheritedControl($inner) => {
                let $processor = ModelRestoreInheritedControlActionProcessor;
                $body
            }
            ModelAction::RestoreInheritedAttribute($inner) => {
                let $processor = ModelRestoreInheritedAttributeActionProcessor;
                $body
            }
            ModelAction::ChangeAttribute($inner) => {
                let $processor = ModelChangeAttributeActionProcessor;
                $body
            }
            ModelAction::ValidateAttribute($inner) => {
                let $processor = ModelValidateAttributeActionProcessor::new($self.validation);
                $body
            }
            ModelAction::ValidateAttributes($inner) => {
                let $processor = ModelValidateAttributesActionProcessor::new($self.validation);
                $body
            }
        }
    };
}

impl ModelActionExecutor {
    pub fn new(validation: ModelValidationService) -> Self {
        Self { validation }
    }

    pub fn execute(&self, store: &mut ModelStore, action: &mut ModelAction) -> Result<NodeId> {
        debug!(action = action.name(), id = %action.id(), "execute");
        dispatch!(self, action, |processor, inner| processor.execute(store, inner))
    }

    pub fn restore(&self, store: &mut ModelStore, action: &mut ModelAction) -> Result<NodeId> {
        debug!(action = action.name(), id = %action.id(), "restore");
        dispatch!(self, action, |processor, inner| processor.restore(store, inner))
    }

    pub fn changeset(
        &self,
        store: &ModelStore,
        action: &ModelAction,
    ) -> Result<Vec<ModelChangeSet>> {
        dispatch!(self, action, |processor, inner| processor.changeset(store, inner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ModelActionFactory;
    use crate::changeset::ModelOperation;
    use crate::model::store::new_node;
    use crate::model::{ModelContainer, ModelKind, ModelType, ModelsMetaData};

    #[test]
    fn dispatches_to_the_matching_processor() {
        let meta = ModelsMetaData::default();
        let factory = ModelActionFactory::new(&meta);
        let mut store = ModelStore::new();
        let def = new_node(&mut store, "media", ModelKind::empty(ModelType::Definition), None);
        store.register_definition(def).unwrap();

        let mut action: ModelAction =
            factory.create_region(&mut store, def, "general").unwrap().into();
        let snapshot = store.clone();
        let executor = ModelActionExecutor::default();

        let region = executor.execute(&mut store, &mut action).unwrap();
        assert_eq!(store.child(def, ModelContainer::Regions, "general"), Some(region));
        let sets = executor.changeset(&store, &action).unwrap();
        assert_eq!(sets[0].operation, ModelOperation::Add);
        assert_eq!(sets[0].selector, "definition=media/region=general");

        executor.restore(&mut store, &mut action).unwrap();
        assert_eq!(store, snapshot);
    }
}
