//! Port traits for the model management core.
//! Transport lives behind these traits; the core depends only on them.

use async_trait::async_trait;

use crate::changeset::ModelChangeSet;
use crate::error::Result;
use crate::linkers::payload::{HierarchyPayload, ModelDataPayload, PropertyPayload};
use crate::model::MetaDataPayload;
use crate::validation::{ModelDeployRequest, ValidationResponse};

/// Read side: raw payloads as the model endpoints return them.
#[async_trait]
pub trait ModelDataSource: Send + Sync {
    /// Attribute metadata for every model kind.
    async fn get_models_meta_data(&self) -> Result<MetaDataPayload>;

    /// Classes with their definition sub-types.
    async fn get_models_hierarchy(&self) -> Result<Vec<HierarchyPayload>>;

    /// The model with `id` and the parents it inherits from.
    async fn get_model_data(&self, id: &str) -> Result<ModelDataPayload>;

    /// Semantic properties available to fields.
    async fn get_model_properties(&self) -> Result<Vec<PropertyPayload>>;
}

/// Write side: changesets, validation and deployment.
#[async_trait]
pub trait ModelPersistence: Send + Sync {
    async fn save_changes(&self, changes: &[ModelChangeSet]) -> Result<()>;

    /// Server validation of the models with the given ids.
    async fn validate(&self, model_ids: &[String]) -> Result<ValidationResponse>;

    async fn deploy(&self, request: &ModelDeployRequest) -> Result<()>;
}
