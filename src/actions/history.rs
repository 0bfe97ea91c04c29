//! Undo/redo history of executed actions.

use tracing::{debug, warn};

use super::executor::ModelActionExecutor;
use super::types::ModelAction;
use crate::changeset::ModelChangeSet;
use crate::error::{ModelError, Result};
use crate::model::{ModelStore, NodeId};

/// An executed action together with the changesets computed right after it
/// ran.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub action: ModelAction,
    pub changesets: Vec<ModelChangeSet>,
}

/// LIFO stack of executed actions. Executing a new action drops the redo
/// stack. With a limit set, the oldest entries fall off and can no longer be
/// undone.
#[derive(Debug, Clone, Default)]
pub struct ModelActionHistory {
    done: Vec<HistoryEntry>,
    undone: Vec<ModelAction>,
    limit: Option<usize>,
}

impl ModelActionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Execute and record `action`. A failed execute records nothing and
    /// leaves the store as it was.
    pub fn execute(
        &mut self,
        executor: &ModelActionExecutor,
        store: &mut ModelStore,
        mut action: ModelAction,
    ) -> Result<NodeId> {
        let affected = executor.execute(store, &mut action)?;
        let changesets = match executor.changeset(store, &action) {
            Ok(changesets) => changesets,
            Err(err) => {
                roll_back(executor, store, &mut action, &err);
                return Err(err);
            }
        };
        self.done.push(HistoryEntry { action, changesets });
        if !self.undone.is_empty() {
            debug!(dropped = self.undone.len(), "redo stack dropped");
            self.undone.clear();
        }
        if let Some(limit) = self.limit {
            if self.done.len() > limit {
                let overflow = self.done.len() - limit;
                self.done.drain(..overflow);
            }
        }
        Ok(affected)
    }

    /// Restore the last executed action. `None` when there is nothing to undo.
    pub fn undo(
        &mut self,
        executor: &ModelActionExecutor,
        store: &mut ModelStore,
    ) -> Result<Option<NodeId>> {
        let Some(mut entry) = self.done.pop() else {
            return Ok(None);
        };
        match executor.restore(store, &mut entry.action) {
            Ok(affected) => {
                self.undone.push(entry.action);
                Ok(Some(affected))
            }
            Err(err) => {
                warn!(action = entry.action.name(), error = %err, "undo failed");
                self.done.push(entry);
                Err(err)
            }
        }
    }

    /// Execute the last undone action again.
    pub fn redo(
        &mut self,
        executor: &ModelActionExecutor,
        store: &mut ModelStore,
    ) -> Result<Option<NodeId>> {
        let Some(mut action) = self.undone.pop() else {
            return Ok(None);
        };
        let affected = match executor.execute(store, &mut action) {
            Ok(affected) => affected,
            Err(err) => {
                warn!(action = action.name(), error = %err, "redo failed");
                self.undone.push(action);
                return Err(err);
            }
        };
        let changesets = match executor.changeset(store, &action) {
            Ok(changesets) => changesets,
            Err(err) => {
                roll_back(executor, store, &mut action, &err);
                self.undone.push(action);
                return Err(err);
            }
        };
        self.done.push(HistoryEntry { action, changesets });
        Ok(Some(affected))
    }

    pub fn can_undo(&self) -> bool {
        !self.done.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    pub fn len(&self) -> usize {
        self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.done.is_empty()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.done
    }

    /// Changesets of every action still applied, in execution order.
    pub fn changesets(&self) -> Vec<ModelChangeSet> {
        self.done
            .iter()
            .flat_map(|entry| entry.changesets.iter().cloned())
            .collect()
    }

    pub fn clear(&mut self) {
        self.done.clear();
        self.undone.clear();
    }
}

/// Undo an executed action whose changeset could not be built.
fn roll_back(
    executor: &ModelActionExecutor,
    store: &mut ModelStore,
    action: &mut ModelAction,
    cause: &ModelError,
) {
    warn!(action = action.name(), error = %cause, "changeset failed, rolling back");
    if let Err(err) = executor.restore(store, action) {
        warn!(action = action.name(), error = %err, "roll back failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::types::CreateControlAction;
    use crate::actions::ModelActionFactory;
    use crate::model::store::new_node;
    use crate::model::{ModelContainer, ModelKind, ModelType, ModelsMetaData};

    fn setup() -> (ModelStore, NodeId) {
        let mut store = ModelStore::new();
        let def = new_node(&mut store, "media", ModelKind::empty(ModelType::Definition), None);
        store.register_definition(def).unwrap();
        (store, def)
    }

    fn region_ids(store: &ModelStore, def: NodeId) -> Vec<String> {
        store
            .children(def, ModelContainer::Regions)
            .unwrap()
            .ids()
            .map(String::from)
            .collect()
    }

    #[test]
    fn undo_and_redo_follow_lifo_order() {
        let meta = ModelsMetaData::default();
        let factory = ModelActionFactory::new(&meta);
        let executor = ModelActionExecutor::default();
        let (mut store, def) = setup();
        let mut history = ModelActionHistory::new();

        for id in ["general", "specific"] {
            let action = factory.create_region(&mut store, def, id).unwrap();
            history.execute(&executor, &mut store, action.into()).unwrap();
        }
        assert_eq!(region_ids(&store, def), vec!["general", "specific"]);
        assert_eq!(history.changesets().len(), 2);

        history.undo(&executor, &mut store).unwrap();
        assert_eq!(region_ids(&store, def), vec!["general"]);
        assert!(history.can_redo());

        history.redo(&executor, &mut store).unwrap();
        assert_eq!(region_ids(&store, def), vec!["general", "specific"]);
        assert!(!history.can_redo());
    }

    #[test]
    fn new_action_drops_redo_stack() {
        let meta = ModelsMetaData::default();
        let factory = ModelActionFactory::new(&meta);
        let executor = ModelActionExecutor::default();
        let (mut store, def) = setup();
        let mut history = ModelActionHistory::new();

        let action = factory.create_region(&mut store, def, "general").unwrap();
        history.execute(&executor, &mut store, action.into()).unwrap();
        history.undo(&executor, &mut store).unwrap();
        let action = factory.create_region(&mut store, def, "other").unwrap();
        history.execute(&executor, &mut store, action.into()).unwrap();

        assert!(!history.can_redo());
        assert_eq!(history.redo(&executor, &mut store).unwrap(), None);
    }

    #[test]
    fn limit_discards_oldest_entries() {
        let meta = ModelsMetaData::default();
        let factory = ModelActionFactory::new(&meta);
        let executor = ModelActionExecutor::default();
        let (mut store, def) = setup();
        let mut history = ModelActionHistory::with_limit(Some(2));

        for id in ["a", "b", "c"] {
            let action = factory.create_region(&mut store, def, id).unwrap();
            history.execute(&executor, &mut store, action.into()).unwrap();
        }
        assert_eq!(history.len(), 2);
        history.undo(&executor, &mut store).unwrap();
        history.undo(&executor, &mut store).unwrap();
        assert_eq!(history.undo(&executor, &mut store).unwrap(), None);
        assert_eq!(region_ids(&store, def), vec!["a"]);
    }

    #[test]
    fn failed_changeset_rolls_back_execute() {
        let executor = ModelActionExecutor::default();
        let (mut store, _) = setup();
        let field = new_node(&mut store, "orphan", ModelKind::empty(ModelType::Field), None);
        let control = new_node(&mut store, "RICHTEXT", ModelKind::empty(ModelType::Control), None);
        let snapshot = store.clone();
        let mut history = ModelActionHistory::new();

        let action = CreateControlAction::new(control, field);
        let err = history.execute(&executor, &mut store, action.into()).unwrap_err();
        assert!(matches!(err, ModelError::NotFound(_)));
        assert_eq!(store, snapshot);
        assert!(history.is_empty());
    }

    #[test]
    fn failed_changeset_on_redo_keeps_action_undone() {
        let meta = ModelsMetaData::default();
        let factory = ModelActionFactory::new(&meta);
        let executor = ModelActionExecutor::default();
        let (mut store, def) = setup();
        let field = new_node(&mut store, "title", ModelKind::empty(ModelType::Field), Some(def));
        store.attach(def, ModelContainer::Fields, field, None).unwrap();
        let mut history = ModelActionHistory::new();

        let action = factory.create_control(&mut store, field, "RICHTEXT").unwrap();
        history.execute(&executor, &mut store, action.into()).unwrap();
        history.undo(&executor, &mut store).unwrap();

        // the field loses its owner outside the history
        store.set_parent(field, None).unwrap();
        let snapshot = store.clone();
        assert!(history.redo(&executor, &mut store).is_err());
        assert_eq!(store, snapshot);
        assert!(history.can_redo());
        assert!(history.is_empty());
    }

    #[test]
    fn undo_on_empty_history_is_none() {
        let executor = ModelActionExecutor::default();
        let (mut store, _) = setup();
        let mut history = ModelActionHistory::new();
        assert_eq!(history.undo(&executor, &mut store).unwrap(), None);
    }
}
