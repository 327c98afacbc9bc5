// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Per-event whiteboard slot: the data tree plus the new-product queue.
//!
//! Concurrency contract: any number of concurrently running algorithm tasks
//! may `add` for the same event; exactly one consumer, the scheduler's
//! controlling loop, calls `drain`. The queue is an unbounded channel, so
//! producers never block and a drain never returns a path twice.

use std::any::Any;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::errors::RegistryError;
use crate::registry::store::{DataObject, DataTree};

/// One event's hierarchical namespace and its drainable new-product queue.
pub struct RegistrySlot {
    tree: Mutex<DataTree>,
    sender: UnboundedSender<String>,
    receiver: Mutex<UnboundedReceiver<String>>,
}

impl RegistrySlot {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            tree: Mutex::new(DataTree::new()),
            sender,
            receiver: Mutex::new(receiver),
        }
    }

    /// Publish an object under `path` and enqueue its canonical path for the
    /// next drain. Safe to call from concurrent tasks.
    pub fn add(&self, path: &str, object: DataObject) -> Result<(), RegistryError> {
        let canonical = self.tree.lock().insert(path, object)?;
        // receiver lives as long as self, the send cannot fail
        let _ = self.sender.send(canonical);
        Ok(())
    }

    /// Convenience wrapper boxing a concrete value into a [`DataObject`].
    pub fn add_value<T: Any + Send + Sync>(&self, path: &str, value: T) -> Result<(), RegistryError> {
        self.add(path, Arc::new(value))
    }

    /// Walk the tree to the object at `path`.
    pub fn lookup(&self, path: &str) -> Option<DataObject> {
        self.tree.lock().lookup(path)
    }

    /// Typed lookup, `None` if the path is vacant or the type does not match.
    pub fn get<T: Any + Send + Sync>(&self, path: &str) -> Option<Arc<T>> {
        self.lookup(path).and_then(|object| object.downcast::<T>().ok())
    }

    /// Pop every currently available new-product path.
    ///
    /// Never blocks, never re-returns a path. Only the controlling loop may
    /// call this.
    pub fn drain(&self) -> Vec<String> {
        let mut receiver = self.receiver.lock();
        let mut paths = Vec::new();
        while let Ok(path) = receiver.try_recv() {
            paths.push(path);
        }
        paths
    }

    /// Canonical paths of every object currently registered.
    pub fn object_paths(&self) -> Vec<String> {
        self.tree.lock().object_paths()
    }

    /// Number of objects currently registered.
    pub fn object_count(&self) -> usize {
        self.tree.lock().object_count()
    }
}

impl Default for RegistrySlot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_enqueues_canonical_path() {
        let slot = RegistrySlot::new();
        slot.add_value("/event/hits", 7usize).unwrap();

        assert_eq!(slot.drain(), vec!["event/hits"]);
        assert_eq!(*slot.get::<usize>("event/hits").unwrap(), 7);
    }

    #[test]
    fn drain_never_returns_a_path_twice() {
        let slot = RegistrySlot::new();
        slot.add_value("a", ()).unwrap();
        slot.add_value("b", ()).unwrap();

        let mut first = slot.drain();
        first.sort();
        assert_eq!(first, vec!["a", "b"]);
        assert!(slot.drain().is_empty());

        slot.add_value("c", ()).unwrap();
        assert_eq!(slot.drain(), vec!["c"]);
    }

    #[test]
    fn duplicate_add_is_rejected_and_not_enqueued() {
        let slot = RegistrySlot::new();
        slot.add_value("x", 1u8).unwrap();
        assert!(matches!(
            slot.add_value("x", 2u8),
            Err(RegistryError::AlreadyPresent { .. })
        ));
        assert_eq!(slot.drain(), vec!["x"]);
    }

    #[test]
    fn typed_lookup_checks_the_type() {
        let slot = RegistrySlot::new();
        slot.add_value("n", 5i64).unwrap();
        assert!(slot.get::<String>("n").is_none());
        assert_eq!(*slot.get::<i64>("n").unwrap(), 5);
    }

    #[tokio::test]
    async fn concurrent_producers_single_consumer() {
        let slot = Arc::new(RegistrySlot::new());

        let mut handles = Vec::new();
        for task in 0..8 {
            let slot = Arc::clone(&slot);
            handles.push(tokio::spawn(async move {
                for item in 0..16 {
                    slot.add_value(&format!("t{}/obj{}", task, item), item)
                        .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let mut drained = slot.drain();
        assert_eq!(drained.len(), 8 * 16);
        drained.sort();
        drained.dedup();
        assert_eq!(drained.len(), 8 * 16);
        assert!(slot.drain().is_empty());
    }
}
