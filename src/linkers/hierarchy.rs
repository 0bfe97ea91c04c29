use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, warn};

use super::payload::HierarchyPayload;
use crate::error::Result;
use crate::model::store::new_node;
use crate::model::{ModelHierarchy, ModelKind, ModelStore, ModelType, NodeId};

/// Builds the class/definition tree from the hierarchy payload.
///
/// Classes nest under their parent class, after the parent's own sub-types.
/// A sub-type nests under the sibling named by its `parentId`, otherwise
/// under its class. Every entry becomes an unloaded stub in the store unless
/// already present; its inheritance parent and semantic type are wired
/// independently of the tree placement.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelHierarchyLinker;

impl ModelHierarchyLinker {
    pub fn link(
        store: &mut ModelStore,
        payload: &[HierarchyPayload],
    ) -> Result<ModelHierarchy<NodeId>> {
        for class in payload {
            let class_id = Self::stub(store, ModelType::Class, &class.id, &class.labels)?;
            for sub_type in &class.sub_types {
                let def = Self::stub(store, ModelType::Definition, &sub_type.id, &sub_type.labels)?;
                if let ModelKind::Definition(data) = &mut store.node_mut(def)?.kind {
                    data.semantic_type = Some(class_id);
                    data.is_abstract = sub_type.is_abstract;
                }
            }
        }

        for class in payload {
            if let (Some(id), Some(parent)) = (store.class(&class.id), class.parent_id.as_deref()) {
                store.set_parent(id, store.class(parent))?;
            }
            for sub_type in &class.sub_types {
                let Some(id) = store.definition(&sub_type.id) else {
                    continue;
                };
                let Some(parent) = sub_type.parent_id.as_deref() else {
                    continue;
                };
                match store.definition(parent) {
                    Some(parent) => store.set_parent(id, Some(parent))?,
                    None => warn!(definition = %sub_type.id, parent, "unknown parent definition"),
                }
            }
        }

        let ids: HashSet<&str> = payload.iter().map(|c| c.id.as_str()).collect();
        let mut hierarchy = ModelHierarchy::new();
        let mut visited = HashSet::new();
        for class in payload {
            let is_root = class.parent_id.as_deref().map_or(true, |p| !ids.contains(p));
            if is_root {
                Self::place_class(store, payload, class, None, &mut hierarchy, &mut visited)?;
            }
        }
        debug!(entries = hierarchy.len(), "built models hierarchy");
        Ok(hierarchy)
    }

    /// Existing node for `id`, or a new unloaded stub described by `labels`.
    fn stub(
        store: &mut ModelStore,
        model_type: ModelType,
        id: &str,
        labels: &BTreeMap<String, String>,
    ) -> Result<NodeId> {
        let existing = match model_type {
            ModelType::Class => store.class(id),
            _ => store.definition(id),
        };
        if let Some(existing) = existing {
            return Ok(existing);
        }
        let node = new_node(store, id, ModelKind::empty(model_type), None);
        store.node_mut(node)?.descriptions = labels
            .iter()
            .map(|(lang, label)| (lang.to_lowercase(), label.clone()))
            .collect();
        match model_type {
            ModelType::Class => store.register_class(node)?,
            _ => store.register_definition(node)?,
        }
        Ok(node)
    }

    fn place_class(
        store: &ModelStore,
        payload: &[HierarchyPayload],
        class: &HierarchyPayload,
        parent: Option<usize>,
        hierarchy: &mut ModelHierarchy<NodeId>,
        visited: &mut HashSet<String>,
    ) -> Result<()> {
        if !visited.insert(class.id.clone()) {
            return Ok(());
        }
        let Some(class_node) = store.class(&class.id) else {
            return Ok(());
        };
        let index = match parent {
            Some(parent) => hierarchy.add_child(parent, &class.id, class_node),
            None => hierarchy.add_root(&class.id, class_node),
        };
        Self::place_sub_types(store, &class.sub_types, index, hierarchy);

        for child in payload.iter().filter(|c| c.parent_id.as_deref() == Some(class.id.as_str())) {
            Self::place_class(store, payload, child, Some(index), hierarchy, visited)?;
        }
        Ok(())
    }

    fn place_sub_types(
        store: &ModelStore,
        sub_types: &[HierarchyPayload],
        class_index: usize,
        hierarchy: &mut ModelHierarchy<NodeId>,
    ) {
        let siblings: HashSet<&str> = sub_types.iter().map(|s| s.id.as_str()).collect();
        let mut placed: HashMap<&str, usize> = HashMap::new();
        let mut pending: Vec<&HierarchyPayload> = sub_types.iter().collect();

        while !pending.is_empty() {
            let before = pending.len();
            pending.retain(|sub_type| {
                let sub_type: &HierarchyPayload = *sub_type;
                let sibling_parent = sub_type
                    .parent_id
                    .as_deref()
                    .filter(|p| siblings.contains(p) && *p != sub_type.id);
                let under = match sibling_parent {
                    Some(p) => match placed.get(p) {
                        Some(&index) => index,
                        None => return true,
                    },
                    None => class_index,
                };
                if let Some(def) = store.definition(&sub_type.id) {
                    let index = hierarchy.add_child(under, &sub_type.id, def);
                    placed.insert(sub_type.id.as_str(), index);
                }
                false
            });
            if pending.len() == before {
                // cyclic sibling parents
                for sub_type in pending.drain(..) {
                    if let Some(def) = store.definition(&sub_type.id) {
                        hierarchy.add_child(class_index, &sub_type.id, def);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload() -> Vec<HierarchyPayload> {
        serde_json::from_value(json!([
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
                    {"id": "audio", "parentId": "media", "labels": {"EN": "Audio"}},
                    {"id": "video", "parentId": "media", "labels": {"EN": "Video"}}
                ]
            }
        ]))
        .unwrap()
    }

    #[test]
    fn builds_tree_with_nested_classes() {
        let mut store = ModelStore::new();
        let h = ModelHierarchyLinker::link(&mut store, &payload()).unwrap();
        let roots: Vec<_> = h.roots().map(|n| n.id()).collect();
        assert_eq!(roots, vec!["emf:Entity"]);

        let entity_class = h.find("emf:Entity").unwrap();
        let children: Vec<_> = entity_class.children().map(|n| n.id()).collect();
        assert_eq!(children, vec!["entity", "emf:Object"]);
        assert_eq!(h.find("media").unwrap().parent().unwrap().id(), "entity");

        let object: Vec<_> = h.find("emf:Object").unwrap().children().map(|n| n.id()).collect();
        assert_eq!(object, vec!["audio", "video"]);
    }

    #[test]
    fn wires_parent_and_type_links() {
        let mut store = ModelStore::new();
        let h = ModelHierarchyLinker::link(&mut store, &payload()).unwrap();
        let node = |id: &str| *h.get(id).unwrap();

        assert_eq!(store.parent(node("audio")), Some(node("media")));
        assert_eq!(store.parent(node("media")), Some(node("entity")));
        assert_eq!(store.parent(node("emf:Object")), Some(node("emf:Entity")));

        let semantic =
            |id: &str| store.node(node(id)).unwrap().as_definition().unwrap().semantic_type;
        assert_eq!(semantic("media"), Some(node("emf:Entity")));
        assert_eq!(semantic("audio"), Some(node("emf:Object")));
        assert!(!store.node(node("media")).unwrap().loaded);
    }

    #[test]
    fn stub_descriptions_use_lowercase_languages() {
        let mut store = ModelStore::new();
        let h = ModelHierarchyLinker::link(&mut store, &payload()).unwrap();
        let entity = *h.get("entity").unwrap();
        let chain = |langs: &[&str]| langs.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(store.description(entity, &chain(&["fi", "de", "en"])), "Entity");
        assert_eq!(store.description(entity, &chain(&["bg", "de", "en"])), "Обект");
    }

    #[test]
    fn relinking_reuses_nodes() {
        let mut store = ModelStore::new();
        ModelHierarchyLinker::link(&mut store, &payload()).unwrap();
        let size = store.len();
        ModelHierarchyLinker::link(&mut store, &payload()).unwrap();
        assert_eq!(store.len(), size);
    }
}
