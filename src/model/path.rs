//! Path addressing for nodes inside the model tree.
//!
//! A path is a sequence of `name=value` segments, e.g.
//! `definition=media/field=title/attribute=label`. Callers interpret a path
//! against any target by supplying a map of named walkers.

use std::collections::HashMap;
use std::fmt;

use crate::error::{ModelError, Result};

/// One `name=value` step of a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelPathSegment {
    pub name: String,
    pub value: String,
}

impl ModelPathSegment {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A linked sequence of segments. Links are positional: the segment at
/// `i` has `previous(i) = i - 1` and `next(i) = i + 1`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ModelPath {
    segments: Vec<ModelPathSegment>,
}

/// Walker applied to one segment: `(walkable, segment value) -> walkable'`.
pub type Walker<'a, W> = Box<dyn Fn(W, &str) -> Option<W> + 'a>;

/// Named walker functions, keyed by segment name.
pub struct ModelPathWalkers<'a, W> {
    walkers: HashMap<String, Walker<'a, W>>,
}

impl<'a, W> Default for ModelPathWalkers<'a, W> {
    fn default() -> Self {
        Self {
            walkers: HashMap::new(),
        }
    }
}

impl<'a, W> ModelPathWalkers<'a, W> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<F>(mut self, name: impl Into<String>, walker: F) -> Self
    where
        F: Fn(W, &str) -> Option<W> + 'a,
    {
        self.insert(name, walker);
        self
    }

    pub fn insert<F>(&mut self, name: impl Into<String>, walker: F)
    where
        F: Fn(W, &str) -> Option<W> + 'a,
    {
        self.walkers.insert(name.into(), Box::new(walker));
    }

    pub fn get(&self, name: &str) -> Option<&Walker<'a, W>> {
        self.walkers.get(name)
    }
}

impl ModelPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_segments(segments: Vec<ModelPathSegment>) -> Self {
        Self { segments }
    }

    /// Parse `name=value/name=value`.
    ///
    /// A `/` starts a new segment only when followed by an alphabetic name and
    /// `=`, so values may contain slashes (attribute URIs).
    pub fn parse(input: &str) -> Result<Self> {
        let mut segments = Vec::new();
        if input.is_empty() {
            return Ok(Self { segments });
        }

        let mut start = 0;
        for split in segment_boundaries(input) {
            segments.push(parse_segment(&input[start..split])?);
            start = split + 1;
        }
        segments.push(parse_segment(&input[start..])?);
        Ok(Self { segments })
    }

    /// Append a segment at the tail.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.segments.push(ModelPathSegment::new(name, value));
    }

    /// Return a new path with a segment appended.
    pub fn join(&self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut path = self.clone();
        path.push(name, value);
        path
    }

    pub fn head(&self) -> Option<&ModelPathSegment> {
        self.segments.first()
    }

    pub fn tail(&self) -> Option<&ModelPathSegment> {
        self.segments.last()
    }

    pub fn get(&self, index: usize) -> Option<&ModelPathSegment> {
        self.segments.get(index)
    }

    pub fn next(&self, index: usize) -> Option<&ModelPathSegment> {
        self.segments.get(index.checked_add(1)?)
    }

    pub fn previous(&self, index: usize) -> Option<&ModelPathSegment> {
        self.segments.get(index.checked_sub(1)?)
    }

    pub fn segments(&self) -> &[ModelPathSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Split at `index`: `self` keeps the segments before it and the returned
    /// path starts at `index` with no backward link.
    pub fn cut(&mut self, index: usize) -> ModelPath {
        let index = index.min(self.segments.len());
        ModelPath {
            segments: self.segments.split_off(index),
        }
    }

    /// Fold the walkers over the segments in order.
    ///
    /// Stops at the first walker returning `None`, or at a segment no walker
    /// is registered for; later walkers are not invoked.
    pub fn walk<W>(&self, seed: W, walkers: &ModelPathWalkers<'_, W>) -> Option<W> {
        let mut current = seed;
        for segment in &self.segments {
            let walker = walkers.get(&segment.name)?;
            current = walker(current, &segment.value)?;
        }
        Some(current)
    }
}

impl fmt::Display for ModelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}={}", segment.name, segment.value)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for ModelPath {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn parse_segment(raw: &str) -> Result<ModelPathSegment> {
    let Some((name, value)) = raw.split_once('=') else {
        return Err(ModelError::InvalidPayload(format!("malformed path segment '{raw}'")));
    };
    if name.is_empty() {
        return Err(ModelError::InvalidPayload(format!("path segment without name '{raw}'")));
    }
    Ok(ModelPathSegment::new(name, value))
}

/// Byte offsets of `/` characters that start a new segment.
fn segment_boundaries(input: &str) -> Vec<usize> {
    let bytes = input.as_bytes();
    let mut boundaries = Vec::new();
    for (i, &b) in bytes.iter().enumerate() {
        if b != b'/' {
            continue;
        }
        let name_len = bytes[i + 1..]
            .iter()
            .take_while(|c| c.is_ascii_alphabetic())
            .count();
        if name_len > 0 && bytes.get(i + 1 + name_len) == Some(&b'=') {
            boundaries.push(i);
        }
    }
    boundaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn parse_and_display_round_trip() {
        let path = ModelPath::parse("definition=media/field=title/attribute=label").unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path.head().unwrap(), &ModelPathSegment::new("definition", "media"));
        assert_eq!(path.tail().unwrap(), &ModelPathSegment::new("attribute", "label"));
        assert_eq!(path.to_string(), "definition=media/field=title/attribute=label");
    }

    #[test]
    fn values_may_contain_slashes() {
        let path =
            ModelPath::parse("class=emf:Entity/attribute=http://purl.org/dc/terms/title").unwrap();
        assert_eq!(path.len(), 2);
        assert_eq!(path.tail().unwrap().value, "http://purl.org/dc/terms/title");
    }

    #[test]
    fn malformed_segment_is_rejected() {
        assert!(ModelPath::parse("definition").is_err());
        assert!(ModelPath::parse("=x").is_err());
    }

    #[test]
    fn navigation_links() {
        let path = ModelPath::parse("a=1/b=2/c=3").unwrap();
        assert_eq!(path.next(0).unwrap().name, "b");
        assert_eq!(path.previous(2).unwrap().name, "b");
        assert!(path.previous(0).is_none());
        assert!(path.next(2).is_none());
    }

    #[test]
    fn cut_splits_without_touching_suffix() {
        let mut path = ModelPath::parse("a=1/b=2/c=3").unwrap();
        let suffix = path.cut(1);
        assert_eq!(path.to_string(), "a=1");
        assert_eq!(suffix.to_string(), "b=2/c=3");
        assert!(suffix.previous(0).is_none());
    }

    #[test]
    fn walk_folds_segments() {
        let path = ModelPath::parse("add=2/mul=5").unwrap();
        let walkers = ModelPathWalkers::new()
            .with("add", |w: i64, v: &str| v.parse::<i64>().ok().map(|n| w + n))
            .with("mul", |w: i64, v: &str| v.parse::<i64>().ok().map(|n| w * n));
        assert_eq!(path.walk(1, &walkers), Some(15));
    }

    #[test]
    fn walk_short_circuits_on_none() {
        let calls = Cell::new(0);
        let path = ModelPath::parse("x=1/y=2").unwrap();
        let walkers = ModelPathWalkers::new()
            .with("x", |_: i32, _: &str| None)
            .with("y", |w: i32, _: &str| {
                calls.set(calls.get() + 1);
                Some(w)
            });
        assert_eq!(path.walk(0, &walkers), None);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn walk_without_walker_short_circuits() {
        let path = ModelPath::parse("unknown=1").unwrap();
        let walkers: ModelPathWalkers<'_, i32> = ModelPathWalkers::new();
        assert_eq!(path.walk(0, &walkers), None);
    }

    #[test]
    fn empty_path_returns_seed() {
        let walkers: ModelPathWalkers<'_, i32> = ModelPathWalkers::new();
        assert_eq!(ModelPath::new().walk(7, &walkers), Some(7));
    }
}
