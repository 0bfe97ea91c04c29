use std::collections::HashSet;

use tracing::{debug, info, warn};

use super::action::{ModelActionGroupLinker, ModelActionLinker};
use super::description::ModelDescriptionLinker;
use super::field::ModelFieldLinker;
use super::payload::{ModelDataPayload, ModelPayload};
use super::region::ModelRegionLinker;
use super::LinkContext;
use crate::error::Result;
use crate::model::store::new_node;
use crate::model::{ModelKind, ModelStore, ModelType, NodeId};

/// Attribute flagging a definition as abstract.
pub const ABSTRACT_ATTRIBUTE: &str = "abstract";

/// Links a model data response: classes first, then definitions, each
/// ordered so that parents are linked before their children.
#[derive(Debug, Clone, Copy)]
pub struct ModelLinker<'m> {
    ctx: LinkContext<'m>,
}

impl<'m> ModelLinker<'m> {
    pub fn new(ctx: LinkContext<'m>) -> Self {
        Self { ctx }
    }

    pub fn link(&self, store: &mut ModelStore, data: &ModelDataPayload) -> Result<Vec<NodeId>> {
        let mut linked = Vec::new();
        for class in parents_first(&data.classes) {
            linked.push(self.link_class(store, class)?);
        }
        for definition in parents_first(&data.definitions) {
            linked.push(self.link_definition(store, definition)?);
        }
        info!(
            classes = data.classes.len(),
            definitions = data.definitions.len(),
            "linked model data"
        );
        Ok(linked)
    }

    /// Link a class. A class that is already loaded is left untouched.
    pub fn link_class(&self, store: &mut ModelStore, payload: &ModelPayload) -> Result<NodeId> {
        let Some((class, parent)) = self.prepare(store, ModelType::Class, payload)? else {
            return self.existing(store, ModelType::Class, &payload.id);
        };
        self.ctx.attributes().link(store, class, &payload.attributes, parent)?;
        ModelDescriptionLinker::link(store, class, &payload.labels)?;
        debug!(class = %payload.id, "linked class");
        Ok(class)
    }

    /// Link a definition with its regions, fields, actions and action
    /// groups. A definition that is already loaded is left untouched.
    pub fn link_definition(
        &self,
        store: &mut ModelStore,
        payload: &ModelPayload,
    ) -> Result<NodeId> {
        let Some((definition, parent)) = self.prepare(store, ModelType::Definition, payload)? else {
            return self.existing(store, ModelType::Definition, &payload.id);
        };
        self.ctx.attributes().link(store, definition, &payload.attributes, parent)?;
        ModelDescriptionLinker::link(store, definition, &payload.labels)?;

        let is_abstract = store
            .attribute_value(definition, ABSTRACT_ATTRIBUTE)
            .and_then(|a| a.value.scalar().as_bool());
        let parent_type = parent
            .and_then(|p| store.get(p))
            .and_then(|n| n.as_definition())
            .and_then(|d| d.semantic_type);
        if let ModelKind::Definition(data) = &mut store.node_mut(definition)?.kind {
            if let Some(is_abstract) = is_abstract {
                data.is_abstract = is_abstract;
            }
            if data.semantic_type.is_none() {
                data.semantic_type = parent_type;
            }
        }

        ModelRegionLinker::new(self.ctx).link(store, definition, &payload.regions, parent)?;
        ModelFieldLinker::new(self.ctx).link(store, definition, &payload.fields, parent)?;
        ModelActionGroupLinker::new(self.ctx).link(
            store,
            definition,
            &payload.action_groups,
            parent,
        )?;
        ModelActionLinker::new(self.ctx).link(store, definition, &payload.actions, parent)?;
        debug!(definition = %payload.id, parent = ?payload.parent, "linked definition");
        Ok(definition)
    }

    /// Reuse the stub (or allocate the node) and wire its parent. Returns
    /// `None` when the model is already loaded.
    fn prepare(
        &self,
        store: &mut ModelStore,
        model_type: ModelType,
        payload: &ModelPayload,
    ) -> Result<Option<(NodeId, Option<NodeId>)>> {
        let lookup = |store: &ModelStore, id: &str| match model_type {
            ModelType::Class => store.class(id),
            _ => store.definition(id),
        };

        let node = match lookup(&*store, &payload.id) {
            Some(existing) if store.node(existing)?.loaded => return Ok(None),
            Some(existing) => existing,
            None => {
                let node = new_node(store, &payload.id, ModelKind::empty(model_type), None);
                match model_type {
                    ModelType::Class => store.register_class(node)?,
                    _ => store.register_definition(node)?,
                }
                node
            }
        };

        let parent = match payload.parent.as_deref() {
            Some(parent_id) => {
                let parent = lookup(&*store, parent_id);
                if parent.is_none() {
                    warn!(model = %payload.id, parent = parent_id, "parent model is not known");
                }
                parent
            }
            None => None,
        };

        let entry = store.node_mut(node)?;
        entry.parent = parent;
        entry.loaded = true;
        if payload.icon.is_some() {
            entry.icon = payload.icon.clone();
        }
        Ok(Some((node, parent)))
    }

    fn existing(&self, store: &ModelStore, model_type: ModelType, id: &str) -> Result<NodeId> {
        let found = match model_type {
            ModelType::Class => store.class(id),
            _ => store.definition(id),
        };
        found.ok_or_else(|| crate::error::ModelError::NotFound(format!("{model_type}={id}")))
    }
}

/// Order models so that each comes after its parent when both are present.
fn parents_first(models: &[ModelPayload]) -> Vec<&ModelPayload> {
    let ids: HashSet<&str> = models.iter().map(|m| m.id.as_str()).collect();
    let mut done: HashSet<&str> = HashSet::new();
    let mut ordered = Vec::with_capacity(models.len());
    let mut pending: Vec<&ModelPayload> = models.iter().collect();

    while !pending.is_empty() {
        let before = pending.len();
        pending.retain(|model| {
            let model: &ModelPayload = *model;
            let waiting = model
                .parent
                .as_deref()
                .is_some_and(|p| ids.contains(p) && !done.contains(p) && p != model.id);
            if waiting {
                return true;
            }
            done.insert(model.id.as_str());
            ordered.push(model);
            false
        });
        if pending.len() == before {
            ordered.append(&mut pending);
        }
    }
    ordered
}
