// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Startup-time resolution of declared data dependencies.
//!
//! The resolver runs exactly once, before the first event is admitted. It
//! interns every declared input-product name to a small integer (first-seen
//! order, stable for the run) and folds each algorithm's declarations into a
//! requirement bitmask with one bit per interned product. The scheduler then
//! answers "can this algorithm run?" with a word-wise mask comparison instead
//! of string lookups on the hot path.

use std::collections::HashMap;

use crate::config::{AlgorithmConfig, Stage};
use crate::deps::tokenize::tokenize_declaration;
use crate::errors::ConfigurationError;

/// A set of interned product indices, packed into 64-bit words.
///
/// Grows on `set`; a `contains` comparison treats missing words as zero, so
/// masks of different lengths compare correctly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductMask {
    words: Vec<u64>,
}

impl ProductMask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bit for a product index.
    pub fn set(&mut self, index: usize) {
        let word = index / 64;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1u64 << (index % 64);
    }

    /// Whether the bit for a product index is set.
    pub fn test(&self, index: usize) -> bool {
        self.words
            .get(index / 64)
            .map(|word| word & (1u64 << (index % 64)) != 0)
            .unwrap_or(false)
    }

    /// Whether every bit of `other` is also set in `self` (superset test).
    pub fn contains(&self, other: &ProductMask) -> bool {
        other.words.iter().enumerate().all(|(i, &required)| {
            let have = self.words.get(i).copied().unwrap_or(0);
            have & required == required
        })
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }
}

/// Static metadata of one algorithm type, immutable after startup.
#[derive(Debug, Clone)]
pub struct AlgorithmDescriptor {
    /// Position in the roster; the started-vector is indexed by this.
    pub index: usize,
    /// Type name; the pool and factory key.
    pub type_name: String,
    /// Lifecycle stage the scheduler dispatches this algorithm in.
    pub stage: Stage,
    /// Interned indices of every declared input product.
    pub requirements: ProductMask,
}

/// The immutable output of dependency resolution.
#[derive(Debug, Clone)]
pub struct DependencyTable {
    descriptors: Vec<AlgorithmDescriptor>,
    product_indices: HashMap<String, usize>,
    product_names: Vec<String>,
}

impl DependencyTable {
    /// Build the table from the configured algorithm roster.
    ///
    /// Interning is first-seen order over the declarations, so indices are
    /// stable for the run. Fails with
    /// [`ConfigurationError::MalformedDependency`] if any declaration cannot
    /// be tokenized.
    pub fn build(algorithms: &[AlgorithmConfig]) -> Result<Self, ConfigurationError> {
        let mut product_indices: HashMap<String, usize> = HashMap::new();
        let mut product_names: Vec<String> = Vec::new();
        let mut descriptors = Vec::with_capacity(algorithms.len());

        for (index, algorithm) in algorithms.iter().enumerate() {
            let mut requirements = ProductMask::new();

            for declaration in &algorithm.inputs {
                let tokens = tokenize_declaration(declaration).ok_or_else(|| {
                    ConfigurationError::MalformedDependency {
                        type_name: algorithm.type_name.clone(),
                        declaration: declaration.clone(),
                    }
                })?;

                for token in tokens {
                    let name = canonical_product_name(&token);
                    let idx = match product_indices.get(&name) {
                        Some(&idx) => idx,
                        None => {
                            let idx = product_names.len();
                            product_indices.insert(name.clone(), idx);
                            product_names.push(name);
                            idx
                        }
                    };
                    requirements.set(idx);
                }
            }

            descriptors.push(AlgorithmDescriptor {
                index,
                type_name: algorithm.type_name.clone(),
                stage: algorithm.stage,
                requirements,
            });
        }

        Ok(Self {
            descriptors,
            product_indices,
            product_names,
        })
    }

    pub fn descriptors(&self) -> &[AlgorithmDescriptor] {
        &self.descriptors
    }

    pub fn descriptor(&self, index: usize) -> &AlgorithmDescriptor {
        &self.descriptors[index]
    }

    /// Number of algorithm types in the roster.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Number of algorithms the scheduler dispatches by data flow.
    pub fn processing_count(&self) -> usize {
        self.descriptors
            .iter()
            .filter(|d| d.stage == Stage::Processing)
            .count()
    }

    /// Interned index of a product name, if any algorithm requires it.
    pub fn product_index(&self, name: &str) -> Option<usize> {
        self.product_indices.get(canonical_product_name(name).as_str()).copied()
    }

    /// Name a product index was interned under.
    pub fn product_name(&self, index: usize) -> Option<&str> {
        self.product_names.get(index).map(String::as_str)
    }

    /// Number of distinct products interned.
    pub fn product_count(&self) -> usize {
        self.product_names.len()
    }
}

/// Registry paths and declared product names compare in a slash-insensitive
/// canonical form: no leading separator.
fn canonical_product_name(name: &str) -> String {
    name.trim_start_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn algorithm(type_name: &str, inputs: &[&str]) -> AlgorithmConfig {
        AlgorithmConfig {
            type_name: type_name.to_string(),
            kind: None,
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            outputs: vec![],
            stage: Stage::Processing,
            options: HashMap::new(),
        }
    }

    #[test]
    fn mask_set_and_test() {
        let mut mask = ProductMask::new();
        mask.set(0);
        mask.set(63);
        mask.set(64);
        mask.set(130);
        for idx in [0, 63, 64, 130] {
            assert!(mask.test(idx));
        }
        assert!(!mask.test(1));
        assert!(!mask.test(129));
        assert_eq!(mask.count_ones(), 4);
    }

    #[test]
    fn mask_superset_across_word_boundaries() {
        let mut have = ProductMask::new();
        let mut need = ProductMask::new();
        need.set(70);
        assert!(!have.contains(&need));
        have.set(70);
        assert!(have.contains(&need));
        have.set(3);
        assert!(have.contains(&need));
        need.set(200);
        assert!(!have.contains(&need));
    }

    #[test]
    fn empty_mask_is_contained_everywhere() {
        let empty = ProductMask::new();
        assert!(ProductMask::new().contains(&empty));
        let mut some = ProductMask::new();
        some.set(5);
        assert!(some.contains(&empty));
    }

    #[test]
    fn interning_is_first_seen_and_stable() {
        let table = DependencyTable::build(&[
            algorithm("b", &["y, x"]),
            algorithm("c", &["x", "z"]),
        ])
        .unwrap();

        assert_eq!(table.product_index("y"), Some(0));
        assert_eq!(table.product_index("x"), Some(1));
        assert_eq!(table.product_index("z"), Some(2));
        assert_eq!(table.product_count(), 3);
        assert_eq!(table.product_name(1), Some("x"));
    }

    #[test]
    fn requirement_masks_reflect_declarations() {
        let table = DependencyTable::build(&[
            algorithm("a", &[]),
            algorithm("b", &["['x']"]),
            algorithm("c", &["x, y"]),
        ])
        .unwrap();

        assert!(table.descriptor(0).requirements.is_empty());

        let x = table.product_index("x").unwrap();
        let y = table.product_index("y").unwrap();
        assert!(table.descriptor(1).requirements.test(x));
        assert!(!table.descriptor(1).requirements.test(y));
        assert!(table.descriptor(2).requirements.test(x));
        assert!(table.descriptor(2).requirements.test(y));
    }

    #[test]
    fn leading_slash_is_canonicalized() {
        let table = DependencyTable::build(&[algorithm("a", &["/event/hits"])]).unwrap();
        assert_eq!(table.product_index("event/hits"), Some(0));
        assert_eq!(table.product_index("/event/hits"), Some(0));
    }

    #[test]
    fn malformed_declaration_is_a_configuration_error() {
        let err = DependencyTable::build(&[algorithm("a", &["x;y"])]).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::MalformedDependency {
                type_name: "a".to_string(),
                declaration: "x;y".to_string(),
            }
        );
    }

    #[test]
    fn processing_count_excludes_output_stage() {
        let mut writer = algorithm("w", &[]);
        writer.stage = Stage::Output;
        let table =
            DependencyTable::build(&[algorithm("a", &[]), algorithm("b", &[]), writer]).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.processing_count(), 2);
    }
}
