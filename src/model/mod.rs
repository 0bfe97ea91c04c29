//! The model graph: arena store, entity kinds and addressing primitives.

pub mod hierarchy;
pub mod list;
pub mod meta;
pub mod node;
pub mod path;
pub mod store;
pub mod utility;
pub mod value;

pub use hierarchy::{HierarchyNode, ModelHierarchy};
pub use list::ModelList;
pub use meta::{MetaDataPayload, ModelMetaData, ModelsMetaData};
pub use node::{
    container_for, ModelAttributeData, ModelContainer, ModelKind, ModelNode, ModelType, NodeId,
};
pub use path::{ModelPath, ModelPathSegment, ModelPathWalkers};
pub use store::{label_attribute, ModelStore, WalkTarget};
pub use value::{AttributeValue, ModelValue};
