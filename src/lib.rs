//! Model management core: the editable model graph behind the administration
//! model editor.
//!
//! The crate owns four concerns:
//! - `model`: arena-backed entities (classes, definitions, fields, regions,
//!   controls, actions, attributes) plus `ModelList`, `ModelPath` and
//!   `ModelHierarchy`.
//! - `linkers`: hydration of raw server JSON into the arena.
//! - `actions`: the undoable Action / Factory / Processor command layer and
//!   the `ModelChangeSetBuilder` that turns it into a persistable diff.
//! - `validation`: rule-driven attribute validation, validation reports and
//!   deploy requests.
//!
//! Transport, rendering and auth live outside. The crate reaches them through
//! the port traits in [`ports`].
//!
//! # Example
//!
//! ```
//! use seip_model_management::model::{ModelList, ModelPath};
//!
//! let mut list = ModelList::new();
//! list.insert("a", 1);
//! list.insert("b", 2);
//! assert_eq!(list.ids().collect::<Vec<_>>(), vec!["a", "b"]);
//!
//! let path = ModelPath::parse("definition=media/field=title").unwrap();
//! assert_eq!(path.tail().unwrap().value, "title");
//! ```

pub mod actions;
pub mod changeset;
pub mod config;
pub mod error;
pub mod linkers;
pub mod model;
pub mod ports;
pub mod registry;
pub mod service;
pub mod telemetry;
pub mod validation;

pub use actions::{ModelAction, ModelActionExecutor, ModelActionFactory, ModelActionHistory};
pub use changeset::{ModelChangeSet, ModelChangeSetBuilder, ModelOperation};
pub use config::{ConfigLoader, ModelManagementConfig};
pub use error::{ModelError, Result};
pub use model::{ModelList, ModelPath, ModelStore, ModelType, NodeId};
pub use registry::{AdminToolRegistry, ModelManagementStateRegistry};
pub use service::ModelManagementService;
pub use validation::{ModelDeployRequest, ModelValidationReport};
