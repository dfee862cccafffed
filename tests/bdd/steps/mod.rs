//! Step definition modules for BDD scenarios.
//!
//! The `rstest-bdd` macros generate wrapper code for each step function that
//! triggers Clippy lints the step bodies cannot influence, so those lints are
//! expected here for every step module.

#![expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd step signatures take owned placeholder values"
)]

mod generation;
mod rendering;
