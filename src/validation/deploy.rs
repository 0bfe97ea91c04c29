//! Deploy request: selection of models submitted for publishing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::trace;
use uuid::Uuid;

use super::report::ModelValidationReport;

/// Model offered for deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployableModel {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDeployRequest {
    pub id: Uuid,
    pub requested_at: DateTime<Utc>,
    pub models: Vec<DeployableModel>,
    selected: Vec<String>,
    #[serde(skip)]
    report: ModelValidationReport,
}

impl ModelDeployRequest {
    pub fn new(models: Vec<DeployableModel>, report: ModelValidationReport) -> Self {
        Self {
            id: Uuid::new_v4(),
            requested_at: Utc::now(),
            models,
            selected: Vec::new(),
            report,
        }
    }

    pub fn report(&self) -> &ModelValidationReport {
        &self.report
    }

    /// Replace the report and drop selected models that became invalid.
    pub fn set_report(&mut self, report: ModelValidationReport) {
        self.report = report;
        self.filter_selected_models();
    }

    /// Select models by id. Ids that are not offered and models with
    /// critical errors are left out.
    pub fn set_selected_models<I, S>(&mut self, selection: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected = selection.into_iter().map(Into::into).collect();
        self.filter_selected_models();
    }

    pub fn filter_selected_models(&mut self) {
        let report = &self.report;
        let models = &self.models;
        self.selected.retain(|id| {
            if !models.iter().any(|m| &m.id == id) {
                trace!(model = %id, "excluding model that is not offered for deployment");
                return false;
            }
            let keep = !report.has_critical_errors(id);
            if !keep {
                trace!(model = %id, "excluding model with critical errors from deployment");
            }
            keep
        });
    }

    pub fn selected_models(&self) -> &[String] {
        &self.selected
    }

    /// Ids of offered models that pass validation.
    pub fn deployable_ids(&self) -> Vec<&str> {
        self.models
            .iter()
            .map(|m| m.id.as_str())
            .filter(|id| !self.report.has_critical_errors(id))
            .collect()
    }
}
