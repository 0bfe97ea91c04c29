//! Shared fixtures: a small media model (entity <- media <- audio/video)
//! and in-memory ports.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use seip_model_management::changeset::ModelChangeSet;
use seip_model_management::linkers::payload::{HierarchyPayload, ModelDataPayload, PropertyPayload};
use seip_model_management::linkers::{
    LinkContext, ModelHierarchyLinker, ModelLinker, ModelPropertyLinker,
};
use seip_model_management::model::{MetaDataPayload, ModelStore, ModelsMetaData};
use seip_model_management::ports::{ModelDataSource, ModelPersistence};
use seip_model_management::validation::{ModelDeployRequest, ValidationResponse};
use seip_model_management::{ModelError, ModelManagementConfig, ModelManagementService, Result};

pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
pub const DC_TITLE: &str = "http://purl.org/dc/terms/title";

pub fn meta_json() -> Value {
    json!({
        "semantics": [
            {"id": "title", "uri": DC_TITLE, "type": "label", "defaultValue": ""}
        ],
        "definitions": [
            {
                "id": "identifier",
                "type": "string",
                "defaultValue": "",
                "validationModel": {"mandatory": true}
            },
            {"id": "abstract", "type": "boolean", "defaultValue": true},
            {"id": "label", "type": "label", "defaultValue": ""}
        ],
        "properties": [
            {"id": "label", "uri": RDFS_LABEL, "type": "label", "defaultValue": ""}
        ],
        "regions": [
            {"id": "label", "type": "label", "defaultValue": ""},
            {"id": "displayType", "type": "option", "defaultValue": "EDITABLE"}
        ],
        "fields": [
            {"id": "label", "type": "label", "defaultValue": ""},
            {"id": "displayType", "type": "option", "defaultValue": "EDITABLE"},
            {"id": "type", "type": "string", "defaultValue": "an..180"}
        ],
        "controls": [
            {"id": "id", "type": "option", "options": [
                {"value": "RICHTEXT", "labels": {"en": "Rich text"}},
                {"value": "DEFAULT_VALUE_PATTERN", "labels": {"en": "Default value pattern"}}
            ]}
        ],
        "controlParams": [
            {"id": "value", "type": "string", "defaultValue": ""},
            {"id": "type", "type": "option", "defaultValue": "default"}
        ],
        "actions": [
            {"id": "label", "type": "label", "defaultValue": ""},
            {"id": "purpose", "type": "string", "defaultValue": "transition"}
        ],
        "actionGroups": [
            {"id": "label", "type": "label", "defaultValue": ""}
        ],
        "actionExecutions": [
            {"id": "value", "type": "string", "defaultValue": ""}
        ]
    })
}

pub fn hierarchy_json() -> Value {
    json!([
        {
            "id": "emf:Entity",
            "parentId": null,
            "labels": {"BG": "emf:Елемент", "EN": "emf:Entity"},
            "subTypes": [
                {
                    "id": "entity",
                    "parentId": null,
                    "labels": {"BG": "Обект", "EN": "Entity"},
                    "abstract": true
                },
                {
                    "id": "media",
                    "parentId": "entity",
                    "labels": {"BG": "Медия", "EN": "Media"},
                    "abstract": true
                }
            ]
        },
        {
            "id": "emf:Object",
            "parentId": "emf:Entity",
            "labels": {"BG": "emf:Обект", "EN": "emf:Object"},
            "subTypes": [
                {"id": "audio", "parentId": "media", "labels": {"EN": "Audio"}, "abstract": false},
                {"id": "video", "parentId": "media", "labels": {"EN": "Video"}, "abstract": false}
            ]
        }
    ])
}

pub fn properties_json() -> Value {
    json!([
        {"id": "dcterms:title", "attributes": [
            {"name": RDFS_LABEL, "type": "label", "value": {"en": "Title", "bg": "Заглавие"}}
        ]},
        {"id": "emf:email", "attributes": [
            {"name": RDFS_LABEL, "type": "label", "value": {"en": "Email"}}
        ]}
    ])
}

fn entity_json() -> Value {
    json!({
        "id": "entity",
        "parent": null,
        "labels": {"EN": "Entity", "BG": "Обект"},
        "attributes": [
            {"name": "identifier", "type": "string", "value": "entity"},
            {"name": "abstract", "type": "boolean", "value": true},
            {"name": "label", "type": "label", "value": {"en": "Entity", "bg": "Обект"}}
        ],
        "regions": [
            {
                "id": "generalDetails",
                "attributes": [
                    {"name": "label", "type": "label", "value": {"en": "General details"}}
                ]
            }
        ],
        "fields": [
            {"id": "title", "regionId": "generalDetails", "attributes": [
                {"name": "label", "type": "label", "value": {"en": "Title"}},
                {"name": "uri", "type": "uri", "value": "dcterms:title"}
            ], "controls": [
                {"id": "RICHTEXT", "controlParams": []}
            ]},
            {"id": "description", "attributes": [
                {"name": "label", "type": "label", "value": {"en": "Description"}},
                {"name": "mandatory", "type": "boolean", "value": false}
            ]},
            {"id": "summary", "regionId": "generalDetails", "attributes": [
                {"name": "label", "type": "label", "value": {"en": "Summary"}}
            ]}
        ],
        "actionGroups": [{"id": "template"}],
        "actions": [
            {
                "id": "approve",
                "attributes": [{"name": "label", "type": "label", "value": {"en": "Approve"}}],
                "actionExecutions": [
                    {"id": "script", "attributes": [{"name": "value", "value": "approve()"}]}
                ]
            }
        ]
    })
}

fn media_json() -> Value {
    json!({
        "id": "media",
        "parent": "entity",
        "labels": {"EN": "Media", "BG": "Медия"},
        "attributes": [
            {"name": "identifier", "type": "string", "value": "media"},
            {"name": "label", "type": "label", "value": {"en": "Media", "bg": "Медия"}}
        ],
        "regions": [
            {
                "id": "generalDetails",
                "attributes": [{"name": "label", "type": "label", "value": {"en": "Media details"}}]
            },
            {
                "id": "specificDetails",
                "attributes": [
                    {"name": "label", "type": "label", "value": {"en": "Specific details"}}
                ]
            }
        ],
        "fields": [
            {"id": "title", "regionId": "generalDetails", "attributes": [
                {"name": "label", "type": "label", "value": {"en": "Media title"}}
            ], "controls": [
                {"id": "DEFAULT_VALUE_PATTERN", "controlParams": [
                    {"id": "template", "attributes": [{"name": "value", "value": "$[title]"}]}
                ]}
            ]},
            {"id": "description", "regionId": null},
            {"id": "emailAddress", "regionId": "specificDetails", "attributes": [
                {"name": "label", "type": "label", "value": {"en": "Email address"}},
                {"name": "uri", "type": "uri", "value": "emf:email"}
            ]},
            {"id": "duration", "regionId": "generalDetails", "attributes": [
                {"name": "label", "type": "label", "value": {"en": "Duration"}}
            ]}
        ]
    })
}

fn class_json() -> Value {
    json!({
        "id": "emf:Entity",
        "parent": null,
        "attributes": [
            {"name": DC_TITLE, "type": "label", "value": {"en": "Entity class"}}
        ]
    })
}

/// Model data responses keyed by requested id. Parents come after the
/// requested model, the way the server lists them.
pub fn model_data_json(id: &str) -> Option<Value> {
    match id {
        "media" => Some(json!({
            "classes": [class_json()],
            "definitions": [media_json(), entity_json()]
        })),
        "entity" => Some(json!({"classes": [class_json()], "definitions": [entity_json()]})),
        _ => None,
    }
}

pub fn meta() -> ModelsMetaData {
    ModelsMetaData::from_json(meta_json()).expect("metadata fixture")
}

/// Store with hierarchy, properties and the media model linked.
pub fn linked_store(meta: &ModelsMetaData) -> ModelStore {
    let mut store = ModelStore::new();
    let hierarchy: Vec<HierarchyPayload> =
        serde_json::from_value(hierarchy_json()).expect("hierarchy fixture");
    ModelHierarchyLinker::link(&mut store, &hierarchy).expect("hierarchy links");
    let properties: Vec<PropertyPayload> =
        serde_json::from_value(properties_json()).expect("properties fixture");
    let ctx = LinkContext::new(meta);
    ModelPropertyLinker::new(ctx).link(&mut store, &properties).expect("properties link");
    let data = model_data_json("media").expect("media fixture");
    let data: ModelDataPayload = serde_json::from_value(data).expect("model data fixture");
    ModelLinker::new(ctx).link(&mut store, &data).expect("model data links");
    store
}

// ── In-memory ports ──

#[derive(Debug, Clone, Default)]
pub struct Calls {
    pub meta: Arc<AtomicUsize>,
    pub hierarchy: Arc<AtomicUsize>,
    pub models: Arc<AtomicUsize>,
    pub properties: Arc<AtomicUsize>,
}

impl Calls {
    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    pub calls: Calls,
}

#[async_trait]
impl ModelDataSource for InMemorySource {
    async fn get_models_meta_data(&self) -> Result<MetaDataPayload> {
        self.calls.meta.fetch_add(1, Ordering::SeqCst);
        Ok(serde_json::from_value(meta_json())?)
    }

    async fn get_models_hierarchy(&self) -> Result<Vec<HierarchyPayload>> {
        self.calls.hierarchy.fetch_add(1, Ordering::SeqCst);
        Ok(serde_json::from_value(hierarchy_json())?)
    }

    async fn get_model_data(&self, id: &str) -> Result<ModelDataPayload> {
        self.calls.models.fetch_add(1, Ordering::SeqCst);
        match model_data_json(id) {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(ModelDataPayload::default()),
        }
    }

    async fn get_model_properties(&self) -> Result<Vec<PropertyPayload>> {
        self.calls.properties.fetch_add(1, Ordering::SeqCst);
        Ok(serde_json::from_value(properties_json())?)
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryPersistence {
    pub saved: Arc<Mutex<Vec<Vec<ModelChangeSet>>>>,
    pub deployed: Arc<Mutex<Vec<ModelDeployRequest>>>,
    pub validation: ValidationResponse,
    pub fail_save: bool,
}

impl InMemoryPersistence {
    pub fn with_validation(validation: Value) -> Self {
        Self {
            validation: serde_json::from_value(validation).expect("validation fixture"),
            ..Self::default()
        }
    }
}

#[async_trait]
impl ModelPersistence for InMemoryPersistence {
    async fn save_changes(&self, changes: &[ModelChangeSet]) -> Result<()> {
        if self.fail_save {
            return Err(ModelError::Port("save rejected".into()));
        }
        self.saved.lock().expect("saved lock").push(changes.to_vec());
        Ok(())
    }

    async fn validate(&self, _model_ids: &[String]) -> Result<ValidationResponse> {
        Ok(self.validation.clone())
    }

    async fn deploy(&self, request: &ModelDeployRequest) -> Result<()> {
        self.deployed.lock().expect("deployed lock").push(request.clone());
        Ok(())
    }
}

pub type TestService = ModelManagementService<InMemorySource, InMemoryPersistence>;

pub fn service_with(
    persistence: InMemoryPersistence,
    config: ModelManagementConfig) -> (TestService,
    Calls,
) {
    let source = InMemorySource::default();
    let calls = source.calls.clone();
    (ModelManagementService::new(source, persistence, config), calls)
}

pub fn service() -> (TestService, Calls) {
    service_with(InMemoryPersistence::default(), ModelManagementConfig::default())
}
