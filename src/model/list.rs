//! Ordered, id-keyed collection used for every child container in the model.

use std::collections::HashMap;

/// Insertion-ordered map from string id to `T`.
///
/// Iteration follows insertion order. Inserting an existing id overwrites the
/// value in place; removing and re-inserting an id appends it at the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelList<T> {
    order: Vec<String>,
    entries: HashMap<String, T>,
}

impl<T> Default for ModelList<T> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            entries: HashMap::new(),
        }
    }
}

impl<T> ModelList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite by id. Returns the replaced value, if any.
    pub fn insert(&mut self, id: impl Into<String>, value: T) -> Option<T> {
        let id = id.into();
        if let Some(slot) = self.entries.get_mut(&id) {
            return Some(std::mem::replace(slot, value));
        }
        self.order.push(id.clone());
        self.entries.insert(id, value);
        None
    }

    /// Insert at a position, moving the id there if it is already present.
    /// Positions past the end append.
    pub fn insert_at(&mut self, index: usize, id: impl Into<String>, value: T) -> Option<T> {
        let id = id.into();
        let previous = self.remove(&id).map(|(_, v)| v);
        let index = index.min(self.order.len());
        self.order.insert(index, id.clone());
        self.entries.insert(id, value);
        previous
    }

    /// Remove by id, returning the vacated position and value.
    /// A missing id is a no-op.
    pub fn remove(&mut self, id: &str) -> Option<(usize, T)> {
        let value = self.entries.remove(id)?;
        let index = self.order.iter().position(|k| k == id)?;
        self.order.remove(index);
        Some((index, value))
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.entries.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.entries.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.order.iter().position(|k| k == id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.order.iter().map(String::as_str)
    }

    /// Values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.order.iter().filter_map(move |k| self.entries.get(k))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> + '_ {
        self.order
            .iter()
            .filter_map(move |k| self.entries.get(k).map(|v| (k.as_str(), v)))
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.entries.clear();
    }

    /// Reorder entries with a comparator over the values; ties keep the
    /// current relative order.
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&T, &T) -> std::cmp::Ordering,
    {
        let entries = &self.entries;
        self.order.sort_by(|a, b| compare(&entries[a], &entries[b]));
    }
}

impl<T: Clone> ModelList<T> {
    /// Replace the whole content with a copy of `other`.
    pub fn copy_from(&mut self, other: &Self) {
        self.order.clone_from(&other.order);
        self.entries.clone_from(&other.entries);
    }

    /// Values in insertion order, cloned.
    pub fn to_vec(&self) -> Vec<T> {
        self.values().cloned().collect()
    }
}

impl<T, S: Into<String>> FromIterator<(S, T)> for ModelList<T> {
    fn from_iter<I: IntoIterator<Item = (S, T)>>(iter: I) -> Self {
        let mut list = Self::new();
        for (id, value) in iter {
            list.insert(id, value);
        }
        list
    }
}
