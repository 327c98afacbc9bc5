// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod algorithm;
pub mod factory;
pub mod tool;

pub use algorithm::{Algorithm, EventContext};
pub use factory::{AlgorithmFactory, ToolFactory};
pub use tool::Tool;
