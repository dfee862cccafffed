//! Document tree generation.
//!
//! Walks the steps root one level at a time. Every category directory
//! becomes an index document listing its modules, every module becomes a
//! leaf document embedding an `autobehave` directive, and a fixed top-level
//! index ties the categories together. All documents land flat in
//! `<docs_root>/steps/` and overwrite whatever was there before.

// Scoped suppression for version-dependent lint false positives from
// miette/thiserror derive macros.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

pub mod naming;

use crate::collect::{self, CollectError};
use crate::model::{DocBody, DocNode, ModuleRef};
use camino::Utf8PathBuf;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use miette::Diagnostic;
use thiserror::Error;
use tracing::{debug, info};

/// Directory below the docs root that receives generated documents.
pub const STEPS_DOC_DIR: &str = "steps";

/// File name of the top-level index document.
pub const ROOT_INDEX_FILE: &str = "step-index.rst";

/// Errors raised while generating the document tree.
#[derive(Debug, Error, Diagnostic)]
pub enum TreeError {
    /// Listing step directories or modules failed.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Collect(#[from] CollectError),
    /// The output directory could not be created or opened.
    #[error("failed to prepare output directory {path}: {source}")]
    #[diagnostic(code(stepdoc::tree::output_dir))]
    OutputDir {
        /// Directory that could not be prepared.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A document could not be written.
    #[error("failed to write {path}: {source}")]
    #[diagnostic(code(stepdoc::tree::write))]
    Write {
        /// Document that could not be written.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Filesystem locations used during generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocLayout {
    /// Root that module references are relative to.
    pub project_root: Utf8PathBuf,
    /// Directory whose subdirectories are step categories.
    pub steps_root: Utf8PathBuf,
    /// Documentation root; documents are written to its `steps` child.
    pub docs_root: Utf8PathBuf,
}

impl DocLayout {
    /// Directory that receives generated documents.
    #[must_use]
    pub fn output_dir(&self) -> Utf8PathBuf {
        self.docs_root.join(STEPS_DOC_DIR)
    }
}

/// One node of the walk: an index-level category or a leaf-level module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepEntry {
    /// A directory of step modules.
    Category(Utf8PathBuf),
    /// A single step module.
    Module(ModuleRef),
}

impl StepEntry {
    /// Name used for the title and file name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Category(dir) => dir.file_name().unwrap_or(dir.as_str()),
            Self::Module(module) => module.name(),
        }
    }

    /// Entries one level below this one.
    ///
    /// # Errors
    ///
    /// Returns [`CollectError`] when the category cannot be listed.
    pub fn children(&self, layout: &DocLayout) -> Result<Vec<Self>, CollectError> {
        match self {
            Self::Category(dir) => Ok(collect::step_modules(&layout.project_root, dir)?
                .into_iter()
                .map(Self::Module)
                .collect()),
            Self::Module(_) => Ok(Vec::new()),
        }
    }

    fn file_name(&self) -> String {
        match self {
            Self::Category(_) => naming::index_file_name(self.name()),
            Self::Module(_) => naming::leaf_file_name(self.name()),
        }
    }
}

/// Writes generated documents into one output directory.
struct DocWriter<'a> {
    layout: &'a DocLayout,
    out: Dir,
    out_path: Utf8PathBuf,
    written: Vec<Utf8PathBuf>,
}

impl<'a> DocWriter<'a> {
    fn open(layout: &'a DocLayout) -> Result<Self, TreeError> {
        let out_path = layout.output_dir();
        let prepare = || -> std::io::Result<Dir> {
            std::fs::create_dir_all(&out_path)?;
            Dir::open_ambient_dir(&out_path, ambient_authority())
        };
        let out = prepare().map_err(|source| TreeError::OutputDir {
            path: out_path.clone(),
            source,
        })?;
        Ok(Self {
            layout,
            out,
            out_path,
            written: Vec::new(),
        })
    }

    fn write(&mut self, node: &DocNode) -> Result<(), TreeError> {
        let path = node.path_in(&self.out_path);
        if self.written.contains(&path) {
            debug!(%path, "overwriting document generated earlier in this run");
        }
        self.out
            .write(&node.file_name, node.to_string())
            .map_err(|source| TreeError::Write {
                path: path.clone(),
                source,
            })?;
        debug!(%path, "wrote document");
        self.written.push(path);
        Ok(())
    }

    /// Emit the document for `entry`, recursing into its children first.
    ///
    /// Returns the file name of the emitted document.
    fn emit(&mut self, entry: &StepEntry) -> Result<String, TreeError> {
        let body = match entry {
            StepEntry::Category(_) => {
                let children = entry.children(self.layout)?;
                let names = children
                    .iter()
                    .map(|child| self.emit(child))
                    .collect::<Result<Vec<_>, _>>()?;
                DocBody::TocTree(names)
            }
            StepEntry::Module(module) => DocBody::AutoBehave(vec![module.clone()]),
        };
        let node = DocNode {
            title: naming::doc_title(entry.name()),
            file_name: entry.file_name(),
            body,
        };
        self.write(&node)?;
        Ok(node.file_name)
    }
}

/// Generate the whole documentation tree for `layout`.
///
/// Returns every written document path, the top-level index last. A failure
/// partway through leaves the documents written so far in place.
///
/// # Errors
///
/// Returns [`TreeError`] when listing the steps tree or writing a document
/// fails.
pub fn generate(layout: &DocLayout) -> Result<Vec<Utf8PathBuf>, TreeError> {
    let categories = collect::step_categories(&layout.steps_root)?;
    let mut writer = DocWriter::open(layout)?;
    let names = categories
        .into_iter()
        .filter(|dir| {
            let is_docs = *dir == layout.docs_root;
            if is_docs {
                debug!(%dir, "skipping documentation root below the steps root");
            }
            !is_docs
        })
        .map(|dir| writer.emit(&StepEntry::Category(dir)))
        .collect::<Result<Vec<_>, _>>()?;
    let index = DocNode {
        title: naming::STEPS_SUFFIX.to_owned(),
        file_name: ROOT_INDEX_FILE.to_owned(),
        body: DocBody::TocTree(names),
    };
    writer.write(&index)?;
    info!(
        count = writer.written.len(),
        dir = %writer.out_path,
        "generated step documentation"
    );
    Ok(writer.written)
}

