//! Fixtures for BDD scenarios.
//!
//! The `TestWorld` struct holds all state for one scenario. Non-Clone types
//! use `RefCell<Option<T>>` directly, while Clone types use `Slot<T>`.

// The `#[fixture]` macro generates types that cannot have doc comments attached
#![allow(
    missing_docs,
    reason = "Generated fixture types cannot have doc comments attached"
)]

use rstest::fixture;
use rstest_bdd::Slot;
use std::cell::RefCell;
use test_support::StepProject;

/// State shared by the steps of one scenario.
#[derive(Default)]
pub struct TestWorld {
    /// Temporary project the scenario operates on (non-Clone).
    pub project: RefCell<Option<StepProject>>,
    /// HTML produced by the last fragment render.
    pub fragment: Slot<String>,
    /// Error text captured when rendering fails.
    pub render_error: Slot<String>,
}

/// Fixture providing a fresh `TestWorld` for each scenario.
#[fixture]
pub fn world() -> TestWorld {
    TestWorld::default()
}

/// Helper trait extensions for `RefCell<Option<T>>`.
pub trait RefCellOptionExt<T> {
    /// Set the value inside the `RefCell`.
    fn set_value(&self, value: T);
    /// Borrow the inner value immutably and apply a function.
    fn with_ref<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R>;
}

impl<T> RefCellOptionExt<T> for RefCell<Option<T>> {
    fn set_value(&self, value: T) {
        *self.borrow_mut() = Some(value);
    }

    fn with_ref<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.borrow().as_ref().map(f)
    }
}

/// Strip surrounding double quotes from a string parameter.
///
/// rstest-bdd captures quoted strings including the quotes, so they are
/// stripped before use.
#[must_use]
pub fn strip_quotes(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|stripped| stripped.strip_suffix('"'))
        .unwrap_or(s)
}
