//! Test utilities for stepdoc.
//!
//! Provides environment guards and a builder for throwaway step projects
//! used by the integration and behavioural tests.

pub mod env_lock;
pub mod env_var_guard;
pub mod step_project;

pub use env_var_guard::EnvVarGuard;
pub use step_project::StepProject;
