//! BDD test entry point using rstest-bdd.
//!
//! The `scenarios!` macro generates one test per scenario found in the
//! feature files and injects a fresh [`TestWorld`] into each.

mod bdd;

pub use bdd::fixtures::*;

use rstest_bdd_macros::scenarios;

scenarios!("tests/features", fixtures = [world: TestWorld]);
