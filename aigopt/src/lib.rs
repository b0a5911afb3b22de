// SPDX-License-Identifier: Apache-2.0

pub mod aig;
pub mod aig_serdes;
pub mod aig_sim;
pub mod check_equivalence;
pub mod depth_view;
pub mod rewrite;
pub mod test_utils;

pub use crate::rewrite::{
    aig_algebraic_rewriting, aig_algebraic_rewriting_with_options, RewriteOptions, RewriteStats,
};
