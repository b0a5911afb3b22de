// SPDX-License-Identifier: Apache-2.0

pub mod emit_aiger;
pub mod load_aiger;

pub use crate::aig_serdes::emit_aiger::emit_aiger;
pub use crate::aig_serdes::load_aiger::{load_aiger, load_aiger_from_path};
