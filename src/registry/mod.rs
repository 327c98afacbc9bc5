// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod slot;
mod store;

pub use slot::RegistrySlot;
pub use store::{DataObject, DataTree};
