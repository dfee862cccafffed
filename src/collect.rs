//! Path collection for step definition trees.
//!
//! The steps root holds one directory per step category. Each category holds
//! Python step modules, possibly nested in packages. Entries whose name starts
//! with an underscore are private and never collected. A missing directory
//! yields an empty listing rather than an error.

// Scoped suppression for version-dependent lint false positives from
// miette/thiserror derive macros.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use crate::model::ModuleRef;
use camino::{Utf8Path, Utf8PathBuf};
use glob::{MatchOptions, Pattern};
use itertools::Itertools;
use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// File extension of step modules.
pub const SOURCE_EXTENSION: &str = "py";

/// Errors raised while listing step directories and modules.
#[derive(Debug, Error, Diagnostic)]
pub enum CollectError {
    /// The constructed glob pattern was rejected.
    #[error("invalid glob pattern '{pattern}': {source}")]
    #[diagnostic(code(stepdoc::collect::pattern))]
    Pattern {
        /// Pattern text handed to the glob matcher.
        pattern: String,
        /// Underlying parser error.
        #[source]
        source: glob::PatternError,
    },
    /// Reading a directory entry failed.
    #[error("failed to read {path}: {source}")]
    #[diagnostic(code(stepdoc::collect::io))]
    Io {
        /// Entry that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A collected path is not valid UTF-8.
    #[error("path {} is not valid UTF-8", .0.display())]
    #[diagnostic(
        code(stepdoc::collect::non_utf8),
        help("rename the entry or move it out of the steps tree")
    )]
    NonUtf8(PathBuf),
}

fn match_options() -> MatchOptions {
    MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    }
}

fn expand(dir: &Utf8Path, suffix: &str) -> Result<Vec<Utf8PathBuf>, CollectError> {
    let pattern = format!("{}/{suffix}", Pattern::escape(dir.as_str()));
    let entries = glob::glob_with(&pattern, match_options()).map_err(|source| {
        CollectError::Pattern {
            pattern: pattern.clone(),
            source,
        }
    })?;
    entries
        .map(|entry| {
            let path = entry.map_err(|err| {
                let failed = err.path().to_path_buf();
                CollectError::Io {
                    path: failed,
                    source: std::io::Error::from(err),
                }
            })?;
            Utf8PathBuf::try_from(path).map_err(|err| CollectError::NonUtf8(err.into_path_buf()))
        })
        .collect()
}

fn is_private(segment: &str) -> bool {
    segment.starts_with('_')
}

/// Drop every path whose final segment starts with an underscore.
///
/// # Examples
/// ```
/// use camino::Utf8PathBuf;
/// use stepdoc::collect::filter_underscores;
/// let kept = filter_underscores(vec![
///     Utf8PathBuf::from("steps/login"),
///     Utf8PathBuf::from("steps/_shared"),
/// ]);
/// assert_eq!(kept, vec![Utf8PathBuf::from("steps/login")]);
/// ```
#[must_use]
pub fn filter_underscores(paths: Vec<Utf8PathBuf>) -> Vec<Utf8PathBuf> {
    paths
        .into_iter()
        .filter(|path| !path.file_name().is_some_and(is_private))
        .collect()
}

/// List the step category directories directly below `steps_root`.
///
/// # Errors
///
/// Returns [`CollectError`] when the directory cannot be enumerated or an
/// entry is not valid UTF-8.
pub fn step_categories(steps_root: &Utf8Path) -> Result<Vec<Utf8PathBuf>, CollectError> {
    if !steps_root.is_dir() {
        debug!(root = %steps_root, "steps root missing; no categories collected");
        return Ok(Vec::new());
    }
    let dirs = expand(steps_root, "*")?
        .into_iter()
        .filter(|path| path.is_dir())
        .collect();
    Ok(filter_underscores(dirs))
}

/// List the step modules below `category_dir` as dotted references rooted at
/// `project_root`.
///
/// Any file or package whose name starts with an underscore is skipped at
/// every depth below `category_dir`, which also excludes `__init__.py` and
/// `__pycache__`.
///
/// # Errors
///
/// Returns [`CollectError`] when the tree cannot be enumerated or a path is
/// not valid UTF-8.
pub fn step_modules(
    project_root: &Utf8Path,
    category_dir: &Utf8Path,
) -> Result<Vec<ModuleRef>, CollectError> {
    if !category_dir.is_dir() {
        debug!(dir = %category_dir, "category directory missing; no modules collected");
        return Ok(Vec::new());
    }
    let files = expand(category_dir, &format!("**/*.{SOURCE_EXTENSION}"))?;
    let modules = files
        .iter()
        .filter(|path| path.is_file())
        .filter(|path| {
            path.strip_prefix(category_dir)
                .ok()
                .is_none_or(|rel| !rel.iter().any(is_private))
        })
        .filter_map(|path| path_to_module(project_root, path))
        .collect_vec();
    debug!(dir = %category_dir, count = modules.len(), "collected step modules");
    Ok(modules)
}

/// Convert a source path into a dotted module reference.
///
/// The project root prefix and the `.py` extension are removed and the
/// remaining segments are joined with dots. Returns `None` when the path has
/// no segments left once the root is stripped.
///
/// # Examples
/// ```
/// use camino::Utf8Path;
/// use stepdoc::collect::path_to_module;
/// let module = path_to_module(Utf8Path::new("/srv/app"), Utf8Path::new("/srv/app/pkg/mod.py"));
/// assert_eq!(module.map(|m| m.to_string()), Some("pkg.mod".to_owned()));
/// ```
#[must_use]
pub fn path_to_module(project_root: &Utf8Path, path: &Utf8Path) -> Option<ModuleRef> {
    let relative = path.strip_prefix(project_root).unwrap_or(path);
    let without_ext = if relative.extension() == Some(SOURCE_EXTENSION) {
        relative.with_extension("")
    } else {
        relative.to_path_buf()
    };
    let dotted = without_ext
        .components()
        .filter_map(|component| match component {
            camino::Utf8Component::Normal(segment) => Some(segment),
            _ => None,
        })
        .join(".");
    (!dotted.is_empty()).then(|| ModuleRef::new(dotted))
}
