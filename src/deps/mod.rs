// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod resolver;
mod tokenize;

pub use resolver::{AlgorithmDescriptor, DependencyTable, ProductMask};
pub use tokenize::tokenize_declaration;
