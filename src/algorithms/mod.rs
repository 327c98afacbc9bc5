// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Bundled in-process algorithm implementations.

mod cruncher;
mod factory;
mod stub;
mod writer;

pub use cruncher::CruncherAlgorithm;
pub use factory::LocalAlgorithmFactory;
pub use stub::{FailingAlgorithm, PanickingAlgorithm, StubAlgorithm};
pub use writer::WriterAlgorithm;
