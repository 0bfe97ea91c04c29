//! Generic inheritance tree, independent of the entities it wraps.

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
struct HierarchyEntry<T> {
    id: String,
    root: T,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// A forest of `T` with parent/children links and a flat id index.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelHierarchy<T> {
    entries: Vec<HierarchyEntry<T>>,
    roots: Vec<usize>,
    flat: HashMap<String, usize>,
}

impl<T> Default for ModelHierarchy<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            roots: Vec::new(),
            flat: HashMap::new(),
        }
    }
}

/// Borrowed view of one hierarchy node.
#[derive(Debug)]
pub struct HierarchyNode<'a, T> {
    hierarchy: &'a ModelHierarchy<T>,
    index: usize,
}

impl<T> Clone for HierarchyNode<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for HierarchyNode<'_, T> {}

impl<'a, T> HierarchyNode<'a, T> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn id(&self) -> &'a str {
        &self.hierarchy.entries[self.index].id
    }

    pub fn root(&self) -> &'a T {
        &self.hierarchy.entries[self.index].root
    }

    pub fn parent(&self) -> Option<HierarchyNode<'a, T>> {
        self.hierarchy.entries[self.index]
            .parent
            .map(|index| self.hierarchy.at(index))
    }

    pub fn children(&self) -> impl Iterator<Item = HierarchyNode<'a, T>> + 'a {
        let hierarchy = self.hierarchy;
        hierarchy.entries[self.index]
            .children
            .iter()
            .map(move |&index| hierarchy.at(index))
    }

    pub fn is_leaf(&self) -> bool {
        self.hierarchy.entries[self.index].children.is_empty()
    }

    /// Ancestors from the direct parent up to the tree root.
    pub fn ancestors(&self) -> Vec<HierarchyNode<'a, T>> {
        let mut result = Vec::new();
        let mut current = self.parent();
        while let Some(node) = current {
            result.push(node);
            current = node.parent();
        }
        result
    }

    /// Depth-first descendants, excluding self.
    pub fn descendants(&self) -> Vec<HierarchyNode<'a, T>> {
        let mut result = Vec::new();
        let mut stack: Vec<HierarchyNode<'a, T>> = self.children().collect();
        stack.reverse();
        while let Some(node) = stack.pop() {
            result.push(node);
            let mut children: Vec<_> = node.children().collect();
            children.reverse();
            stack.extend(children);
        }
        result
    }
}

impl<T> ModelHierarchy<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_root(&mut self, id: impl Into<String>, root: T) -> usize {
        let index = self.push(id.into(), root, None);
        self.roots.push(index);
        index
    }

    /// Add `root` under the node at `parent`. Panics on an index not issued
    /// by this hierarchy.
    pub fn add_child(&mut self, parent: usize, id: impl Into<String>, root: T) -> usize {
        let index = self.push(id.into(), root, Some(parent));
        self.entries[parent].children.push(index);
        index
    }

    fn push(&mut self, id: String, root: T, parent: Option<usize>) -> usize {
        let index = self.entries.len();
        self.flat.insert(id.clone(), index);
        self.entries.push(HierarchyEntry {
            id,
            root,
            parent,
            children: Vec::new(),
        });
        index
    }

    fn at(&self, index: usize) -> HierarchyNode<'_, T> {
        HierarchyNode {
            hierarchy: self,
            index,
        }
    }

    pub fn node(&self, index: usize) -> Option<HierarchyNode<'_, T>> {
        (index < self.entries.len()).then(|| self.at(index))
    }

    /// Flat lookup by id.
    pub fn find(&self, id: &str) -> Option<HierarchyNode<'_, T>> {
        self.flat.get(id).map(|&index| self.at(index))
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.find(id).map(|node| node.root())
    }

    pub fn roots(&self) -> impl Iterator<Item = HierarchyNode<'_, T>> + '_ {
        self.roots.iter().map(move |&index| self.at(index))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ModelHierarchy<&'static str> {
        let mut h = ModelHierarchy::new();
        let entity = h.add_root("emf:Entity", "Entity");
        let def = h.add_child(entity, "entity", "entity");
        h.add_child(def, "media", "media");
        let object = h.add_root("emf:Object", "Object");
        h.add_child(object, "audio", "audio");
        h.add_child(object, "video", "video");
        h
    }

    #[test]
    fn builds_tree_and_flat_index() {
        let h = sample();
        let roots: Vec<_> = h.roots().map(|n| n.id()).collect();
        assert_eq!(roots, vec!["emf:Entity", "emf:Object"]);
        assert_eq!(h.get("media"), Some(&"media"));
        assert_eq!(h.len(), 6);
    }

    #[test]
    fn parent_and_children_links() {
        let h = sample();
        let media = h.find("media").unwrap();
        assert_eq!(media.parent().unwrap().id(), "entity");
        assert!(media.is_leaf());

        let object = h.find("emf:Object").unwrap();
        let children: Vec<_> = object.children().map(|n| n.id()).collect();
        assert_eq!(children, vec!["audio", "video"]);
        assert!(object.parent().is_none());
    }

    #[test]
    fn ancestors_and_descendants() {
        let h = sample();
        let media = h.find("media").unwrap();
        let up: Vec<_> = media.ancestors().iter().map(|n| n.id()).collect();
        assert_eq!(up, vec!["entity", "emf:Entity"]);

        let root = h.find("emf:Entity").unwrap();
        let down: Vec<_> = root.descendants().iter().map(|n| n.id()).collect();
        assert_eq!(down, vec!["entity", "media"]);
    }
}
