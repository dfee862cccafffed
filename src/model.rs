//! Document model shared by the tree builder and the renderer.
//!
//! A [`ModuleRef`] names one importable step module in dotted form. A
//! [`DocNode`] is a single generated reStructuredText document; its
//! [`Display`](std::fmt::Display) implementation produces the exact text
//! written to disk.

use camino::{Utf8Path, Utf8PathBuf};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// File extension of every generated document.
pub const DOC_EXTENSION: &str = "rst";

/// Directive keyword that embeds step metadata for one or more modules.
pub const AUTOBEHAVE_DIRECTIVE: &str = "autobehave";

/// Dotted path identifying a step module, such as `features.steps.login`.
///
/// # Examples
/// ```
/// use stepdoc::model::ModuleRef;
/// let module = ModuleRef::new("features.steps.login");
/// assert_eq!(module.name(), "login");
/// assert_eq!(module.as_str(), "features.steps.login");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleRef(String);

impl ModuleRef {
    /// Wrap an existing dotted path.
    #[must_use]
    pub fn new(dotted: impl Into<String>) -> Self {
        Self(dotted.into())
    }

    /// Borrow the dotted path.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Final segment of the dotted path.
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }

    /// Candidate source files for this module relative to the project root.
    ///
    /// A plain module (`pkg/mod.py`) is preferred over a package
    /// (`pkg/mod/__init__.py`).
    #[must_use]
    pub fn candidate_paths(&self) -> [Utf8PathBuf; 2] {
        let base: Utf8PathBuf = self.0.split('.').collect();
        [base.with_extension("py"), base.join("__init__.py")]
    }
}

impl Display for ModuleRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Body of a generated document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocBody {
    /// Table of contents listing child document file names.
    TocTree(Vec<String>),
    /// Placeholder directive resolved to rendered HTML at render time.
    AutoBehave(Vec<ModuleRef>),
}

/// A generated reStructuredText document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocNode {
    /// Human readable title.
    pub title: String,
    /// File name relative to the steps documentation directory.
    pub file_name: String,
    /// Directive emitted below the title.
    pub body: DocBody,
}

impl DocNode {
    /// Location of this document inside `dir`.
    #[must_use]
    pub fn path_in(&self, dir: &Utf8Path) -> Utf8PathBuf {
        dir.join(&self.file_name)
    }
}

impl Display for DocNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let underline = "=".repeat(self.title.chars().count());
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{underline}")?;
        writeln!(f)?;
        let (directive, option, entries) = match &self.body {
            DocBody::TocTree(children) => (
                "toctree",
                Some(":maxdepth: 1"),
                children.iter().map(String::as_str).collect_vec(),
            ),
            DocBody::AutoBehave(modules) => (
                AUTOBEHAVE_DIRECTIVE,
                None,
                modules.iter().map(ModuleRef::as_str).collect_vec(),
            ),
        };
        writeln!(f, "..  {directive}::")?;
        if let Some(opt) = option {
            writeln!(f, "    {opt}")?;
        }
        writeln!(f)?;
        for entry in entries {
            writeln!(f, "    {entry}")?;
        }
        Ok(())
    }
}
