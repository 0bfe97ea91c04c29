//! Model management facade: loads models through the data source, applies
//! actions through the history and hands changesets to persistence.

use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};

use crate::actions::{ModelAction, ModelActionExecutor, ModelActionFactory, ModelActionHistory};
use crate::changeset::{ModelChangeSet, ModelChangeSetBuilder};
use crate::config::ModelManagementConfig;
use crate::error::{ModelError, Result};
use crate::linkers::{LinkContext, ModelHierarchyLinker, ModelLinker, ModelPropertyLinker};
use crate::model::{ModelHierarchy, ModelStore, ModelType, ModelsMetaData, NodeId};
use crate::ports::{ModelDataSource, ModelPersistence};
use crate::registry::ModelManagementStateRegistry;
use crate::validation::{
    DeployableModel, ModelDeployRequest, ModelValidationReport, ModelValidationService,
};

pub struct ModelManagementService<S, P> {
    source: S,
    persistence: P,
    config: ModelManagementConfig,
    meta: OnceCell<ModelsMetaData>,
    store: ModelStore,
    hierarchy: Option<ModelHierarchy<NodeId>>,
    properties_loaded: bool,
    executor: ModelActionExecutor,
    history: ModelActionHistory,
    state: ModelManagementStateRegistry,
}

impl<S, P> ModelManagementService<S, P>
where
    S: ModelDataSource,
    P: ModelPersistence,
{
    pub fn new(source: S, persistence: P, config: ModelManagementConfig) -> Self {
        let history = ModelActionHistory::with_limit(config.history_limit);
        Self {
            source,
            persistence,
            config,
            meta: OnceCell::new(),
            store: ModelStore::new(),
            hierarchy: None,
            properties_loaded: false,
            executor: ModelActionExecutor::new(ModelValidationService::new()),
            history,
            state: ModelManagementStateRegistry::new(),
        }
    }

    pub fn config(&self) -> &ModelManagementConfig {
        &self.config
    }

    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    pub fn history(&self) -> &ModelActionHistory {
        &self.history
    }

    pub fn state(&self) -> &ModelManagementStateRegistry {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ModelManagementStateRegistry {
        &mut self.state
    }

    // ── Loading ──

    /// Metadata, fetched once and cached for the lifetime of the service.
    pub async fn meta_data(&self) -> Result<&ModelsMetaData> {
        self.meta
            .get_or_try_init(|| async {
                let payload = self.source.get_models_meta_data().await?;
                info!("loaded models metadata");
                Ok::<_, ModelError>(ModelsMetaData::from_payload(payload))
            })
            .await
    }

    /// Class/definition tree. Built on first call; every entry is registered
    /// in the store as an unloaded stub.
    pub async fn hierarchy(&mut self) -> Result<&ModelHierarchy<NodeId>> {
        if self.hierarchy.is_none() {
            let payload = self.source.get_models_hierarchy().await?;
            let hierarchy = ModelHierarchyLinker::link(&mut self.store, &payload)?;
            info!(entries = hierarchy.len(), "built models hierarchy");
            self.hierarchy = Some(hierarchy);
        }
        self.hierarchy
            .as_ref()
            .ok_or_else(|| ModelError::Internal(anyhow::anyhow!("hierarchy vanished")))
    }

    async fn ensure_properties(&mut self) -> Result<()> {
        if self.properties_loaded {
            return Ok(());
        }
        self.meta_data().await?;
        let payload = self.source.get_model_properties().await?;
        let meta = loaded(&self.meta)?;
        let ctx = LinkContext::new(meta).with_strict(self.config.strict_metadata);
        ModelPropertyLinker::new(ctx).link(&mut self.store, &payload)?;
        self.properties_loaded = true;
        Ok(())
    }

    /// Loaded model with `id`, linked together with its parents. Models are
    /// fetched once; later calls return the same node.
    #[instrument(level = "debug", skip(self))]
    pub async fn model(&mut self, id: &str) -> Result<NodeId> {
        self.hierarchy().await?;
        let already = self.lookup(id).filter(|&n| self.store.get(n).is_some_and(|n| n.loaded));
        if let Some(existing) = already {
            debug!(model = id, "model already loaded");
            return Ok(existing);
        }

        self.meta_data().await?;
        self.ensure_properties().await?;
        let data = self.source.get_model_data(id).await?;
        if !data.contains(id) {
            return Err(ModelError::NotFound(format!("model {id}")));
        }

        let meta = loaded(&self.meta)?;
        let ctx = LinkContext::new(meta).with_strict(self.config.strict_metadata);
        ModelLinker::new(ctx).link(&mut self.store, &data)?;

        let model = self
            .lookup(id)
            .ok_or_else(|| ModelError::NotFound(format!("model {id}")))?;
        if let Some(parent) = self.store.parent(model) {
            if self.store.get(parent).is_some_and(|p| !p.loaded) {
                let parent = &self.store.node(parent)?.id;
                warn!(model = id, parent = %parent, "parent model was not part of the model data");
            }
        }
        Ok(model)
    }

    fn lookup(&self, id: &str) -> Option<NodeId> {
        self.store.definition(id).or_else(|| self.store.class(id))
    }

    /// Display text of a node in the configured language chain.
    pub fn description(&self, node: NodeId) -> String {
        self.store.description(node, &self.config.language_chain())
    }

    // ── Editing ──

    /// Build an action with the factory. Metadata must have been loaded.
    pub fn with_factory<T, F>(&mut self, build: F) -> Result<T>
    where
        F: FnOnce(&ModelActionFactory<'_>, &mut ModelStore) -> Result<T>,
    {
        let meta = loaded(&self.meta)?;
        let factory = ModelActionFactory::new(meta);
        build(&factory, &mut self.store)
    }

    pub fn execute(&mut self, action: impl Into<ModelAction>) -> Result<NodeId> {
        self.history.execute(&self.executor, &mut self.store, action.into())
    }

    pub fn undo(&mut self) -> Result<Option<NodeId>> {
        self.history.undo(&self.executor, &mut self.store)
    }

    pub fn redo(&mut self) -> Result<Option<NodeId>> {
        self.history.redo(&self.executor, &mut self.store)
    }

    /// Changesets of the applied actions, in order.
    pub fn changesets(&self) -> Vec<ModelChangeSet> {
        self.history.changesets()
    }

    /// Dirty attributes of `model` as MODIFY entries, independent of history.
    pub fn dirty_changesets(&self, model: NodeId) -> Result<Vec<ModelChangeSet>> {
        ModelChangeSetBuilder::dirty_change_sets(&self.store, model)
    }

    /// Unsaved edits or dirty sections. Validation alone changes nothing
    /// that could be saved.
    pub fn is_dirty(&self) -> bool {
        let edited = self
            .history
            .entries()
            .iter()
            .any(|entry| !entry.action.is_validation());
        edited || self.state.has_dirty_state()
    }

    // ── Persistence ──

    /// Submit the collected changesets and reset history. Returns the number
    /// of entries sent; with nothing to send the port is not called.
    #[instrument(level = "info", skip(self))]
    pub async fn save(&mut self) -> Result<usize> {
        let changes = self.history.changesets();
        if changes.is_empty() {
            debug!("nothing to save");
        } else {
            self.persistence.save_changes(&changes).await?;
            info!(changes = changes.len(), "saved model changes");
        }
        self.history.clear();
        self.store.mark_clean();
        self.state.clear();
        Ok(changes.len())
    }

    pub async fn validate(&self, model_ids: &[String]) -> Result<ModelValidationReport> {
        let response = self.persistence.validate(model_ids).await?;
        Ok(ModelValidationReport::from_response(response))
    }

    /// Deploy request over every loaded definition, validated server side.
    pub async fn deploy_request(&self) -> Result<ModelDeployRequest> {
        let models: Vec<DeployableModel> = self
            .store
            .definitions()
            .values()
            .copied()
            .filter(|&d| self.store.get(d).is_some_and(|n| n.loaded))
            .filter_map(|d| {
                let node = self.store.get(d)?;
                Some(DeployableModel {
                    id: node.id.clone(),
                    label: self.description(d),
                })
            })
            .collect();
        let ids: Vec<String> = models.iter().map(|m| m.id.clone()).collect();
        let report = self.validate(&ids).await?;
        Ok(ModelDeployRequest::new(models, report))
    }

    pub async fn deploy(&self, request: &ModelDeployRequest) -> Result<()> {
        if request.selected_models().is_empty() {
            return Err(ModelError::InvalidAction("no deployable model selected".into()));
        }
        self.persistence.deploy(request).await?;
        info!(models = request.selected_models().len(), "deployed models");
        Ok(())
    }

    /// Models of `model_type` currently linked in the store.
    pub fn loaded_models(&self, model_type: ModelType) -> Vec<NodeId> {
        let list = match model_type {
            ModelType::Class => self.store.classes(),
            ModelType::Definition => self.store.definitions(),
            ModelType::Property => self.store.properties(),
            _ => return Vec::new(),
        };
        list.values()
            .copied()
            .filter(|&n| self.store.get(n).is_some_and(|n| n.loaded))
            .collect()
    }
}

fn loaded(meta: &OnceCell<ModelsMetaData>) -> Result<&ModelsMetaData> {
    meta.get()
        .ok_or_else(|| ModelError::InvalidAction("models metadata is not loaded".into()))
}
