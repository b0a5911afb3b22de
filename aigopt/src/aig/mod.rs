// SPDX-License-Identifier: Apache-2.0

pub mod events;
pub mod fanout;
pub mod network;
pub mod signal;
pub mod strash;
mod substitute;
pub mod summary_stats;
pub mod topo;

pub use crate::aig::events::{ListenerId, NetworkEvent};
pub use crate::aig::network::{Aig, NodeKind};
pub use crate::aig::signal::{NodeRef, Signal};
