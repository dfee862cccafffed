//! Throwaway step projects for integration tests.
//!
//! A [`StepProject`] owns a temporary directory laid out like a behave
//! project: category directories of Python step modules below the project
//! root and a `docs/` directory receiving generated documents.

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

/// Step module with two decorated steps, one tabled docstring and a helper.
pub const LOGIN_STEPS: &str = r#""""Login steps."""
from behave import given, then


def helper(value):
    """| not | a step |"""
    return value


@then("the user is logged in")
def step_logged_in(context):
    assert context.user


@given('a user named "{name}"')
def step_user(context, name):
    """Register a user.

    | name | role  |
    | bob  | admin |
    """
    context.user = helper(name)
"#;

/// Step module with a single undocumented step.
pub const CART_STEPS: &str = r#"from behave import when


@when('the cart is emptied')
def step_empty_cart(context):
    context.cart.clear()
"#;

/// Temporary project directory removed on drop.
#[derive(Debug)]
pub struct StepProject {
    _temp: TempDir,
    root: Utf8PathBuf,
}

impl StepProject {
    /// Create an empty project in a fresh temporary directory.
    ///
    /// The root is canonicalised so it matches the paths the generator
    /// collects.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created or its path is
    /// not valid UTF-8.
    pub fn new() -> Result<Self> {
        let temp = tempfile::tempdir().context("create temp project")?;
        let root = Utf8PathBuf::from_path_buf(temp.path().canonicalize()?)
            .map_err(|p| anyhow::anyhow!("temp path {} is not UTF-8", p.display()))?;
        Ok(Self { _temp: temp, root })
    }

    /// Project with a `login` category holding [`LOGIN_STEPS`] and a `shop`
    /// category holding [`CART_STEPS`].
    ///
    /// # Errors
    ///
    /// Returns an error when a file cannot be written.
    pub fn sample() -> Result<Self> {
        let project = Self::new()?;
        project.write("login/auth.py", LOGIN_STEPS)?;
        project.write("shop/cart.py", CART_STEPS)?;
        Ok(project)
    }

    /// Project root directory.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Documentation root used by default.
    #[must_use]
    pub fn docs_dir(&self) -> Utf8PathBuf {
        self.root.join("docs")
    }

    /// Directory receiving generated documents.
    #[must_use]
    pub fn generated_dir(&self) -> Utf8PathBuf {
        self.docs_dir().join("steps")
    }

    /// Write `contents` to `relative`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error when the file or its parents cannot be written.
    pub fn write(&self, relative: &str, contents: &str) -> Result<Utf8PathBuf> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {parent}"))?;
        }
        fs::write(&path, contents).with_context(|| format!("write {path}"))?;
        Ok(path)
    }

    /// Create the directory `relative` and its parents.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created.
    pub fn mkdir(&self, relative: &str) -> Result<Utf8PathBuf> {
        let path = self.root.join(relative);
        fs::create_dir_all(&path).with_context(|| format!("create {path}"))?;
        Ok(path)
    }

    /// Read the file at `relative` below the project root.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read.
    pub fn read(&self, relative: &str) -> Result<String> {
        let path = self.root.join(relative);
        fs::read_to_string(&path).with_context(|| format!("read {path}"))
    }

    /// Sorted file names in the generated documents directory.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be listed.
    pub fn generated_files(&self) -> Result<Vec<String>> {
        let dir = self.generated_dir();
        let mut names = fs::read_dir(&dir)
            .with_context(|| format!("list {dir}"))?
            .map(|entry| Ok(entry?.file_name().to_string_lossy().into_owned()))
            .collect::<Result<Vec<_>>>()?;
        names.sort();
        Ok(names)
    }
}
