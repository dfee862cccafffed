//! stepdoc core library.
//!
//! Collects behave step modules, writes reStructuredText index and leaf
//! documents for them, and renders the decorated step functions of each
//! module into HTML through a `MiniJinja` template.

pub mod cli;
pub mod collect;
pub mod model;
pub mod pysource;
pub mod record;
pub mod render;
pub mod runner;
pub mod tree;
