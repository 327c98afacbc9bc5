// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Generic named-node tree holding one event's data objects.
//!
//! Paths are `/`-separated; leading separators and empty segments are
//! ignored, so `"/event/hits"`, `"event/hits"` and `"event//hits"` name the
//! same node. The canonical spelling (no leading separator) is what insert
//! returns and what the new-product queue carries. Intermediate nodes are
//! created on demand. Objects are never removed or replaced mid-event.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::RegistryError;

/// A data object leaf: any shareable value.
pub type DataObject = Arc<dyn Any + Send + Sync>;

#[derive(Default)]
struct DataNode {
    object: Option<DataObject>,
    children: HashMap<String, DataNode>,
}

/// Hierarchical object store for one event.
#[derive(Default)]
pub struct DataTree {
    root: DataNode,
}

impl DataTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an object at `path`, creating intermediate nodes as needed.
    ///
    /// Returns the canonical path on success. Inserting where an object
    /// already lives is an error: registered objects are immutable for the
    /// rest of the event.
    pub fn insert(&mut self, path: &str, object: DataObject) -> Result<String, RegistryError> {
        let segments = split_path(path);
        if segments.is_empty() {
            return Err(RegistryError::EmptyPath);
        }
        let canonical = segments.join("/");

        let mut node = &mut self.root;
        for segment in &segments {
            node = node.children.entry(segment.to_string()).or_default();
        }

        if node.object.is_some() {
            return Err(RegistryError::AlreadyPresent { path: canonical });
        }
        node.object = Some(object);
        Ok(canonical)
    }

    /// Walk the tree to the object at `path`, if any.
    pub fn lookup(&self, path: &str) -> Option<DataObject> {
        let mut node = &self.root;
        for segment in split_path(path) {
            node = node.children.get(segment)?;
        }
        node.object.clone()
    }

    /// Canonical paths of every object-bearing node, in no particular order.
    pub fn object_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        collect_paths(&self.root, &mut String::new(), &mut paths);
        paths
    }

    /// Number of objects held.
    pub fn object_count(&self) -> usize {
        self.object_paths().len()
    }
}

fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn collect_paths(node: &DataNode, prefix: &mut String, out: &mut Vec<String>) {
    if node.object.is_some() {
        out.push(prefix.clone());
    }
    for (name, child) in &node.children {
        let saved = prefix.len();
        if !prefix.is_empty() {
            prefix.push('/');
        }
        prefix.push_str(name);
        collect_paths(child, prefix, out);
        prefix.truncate(saved);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_lookup() {
        let mut tree = DataTree::new();
        tree.insert("event/hits", Arc::new(42usize)).unwrap();

        let object = tree.lookup("event/hits").unwrap();
        assert_eq!(*object.downcast::<usize>().unwrap(), 42);
        assert!(tree.lookup("event/cells").is_none());
        assert!(tree.lookup("event").is_none());
    }

    #[test]
    fn path_spellings_are_equivalent() {
        let mut tree = DataTree::new();
        let canonical = tree.insert("/event//hits", Arc::new(())).unwrap();
        assert_eq!(canonical, "event/hits");
        assert!(tree.lookup("event/hits").is_some());
        assert!(tree.lookup("/event/hits").is_some());
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut tree = DataTree::new();
        tree.insert("x", Arc::new(1u32)).unwrap();
        let err = tree.insert("/x", Arc::new(2u32)).unwrap_err();
        assert_eq!(
            err,
            RegistryError::AlreadyPresent {
                path: "x".to_string()
            }
        );
        // the original object is untouched
        let object = tree.lookup("x").unwrap();
        assert_eq!(*object.downcast::<u32>().unwrap(), 1);
    }

    #[test]
    fn empty_path_is_rejected() {
        let mut tree = DataTree::new();
        assert_eq!(
            tree.insert("//", Arc::new(())).unwrap_err(),
            RegistryError::EmptyPath
        );
    }

    #[test]
    fn interior_nodes_can_hold_objects() {
        let mut tree = DataTree::new();
        tree.insert("a/b", Arc::new(1u8)).unwrap();
        tree.insert("a", Arc::new(2u8)).unwrap();

        let mut paths = tree.object_paths();
        paths.sort();
        assert_eq!(paths, vec!["a", "a/b"]);
        assert_eq!(tree.object_count(), 2);
    }
}
