//! Step metadata rendering.
//!
//! Resolves module references to source files below the project root, reads
//! decorated step functions out of them, and renders the resulting
//! [`FunctionRecord`]s through a `MiniJinja` template. The render pass then
//! swaps every `autobehave` directive in the generated documents for the
//! rendered HTML.

// Scoped suppression for version-dependent lint false positives from
// miette/thiserror derive macros.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

mod document;

pub use document::{AutoBehaveNode, Block, StepDocument};

use crate::model::{DOC_EXTENSION, ModuleRef};
use crate::pysource;
use crate::record::{FunctionRecord, collect_records};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use miette::Diagnostic;
use minijinja::{Environment, context};
use std::fs;
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Name under which the step template is registered.
///
/// The `.html` suffix switches on HTML auto-escaping.
pub const TEMPLATE_NAME: &str = "behave.html";

/// Template used when no custom template is configured.
pub const DEFAULT_TEMPLATE: &str = include_str!("../../templates/behave.html");

/// Errors raised while rendering step metadata.
#[derive(Debug, Error, Diagnostic)]
pub enum RenderError {
    /// No source file exists for a referenced module.
    #[error("module '{module}' not found under {root}")]
    #[diagnostic(
        code(stepdoc::render::module_not_found),
        help("regenerate the documents or check the project root")
    )]
    ModuleNotFound {
        /// Reference that failed to resolve.
        module: ModuleRef,
        /// Project root searched.
        root: Utf8PathBuf,
    },
    /// A file could not be read or written.
    #[error("failed to access {path}: {source}")]
    #[diagnostic(code(stepdoc::render::io))]
    Io {
        /// File or directory involved.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Walking the documentation tree failed.
    #[error("failed to walk {root}: {source}")]
    #[diagnostic(code(stepdoc::render::walk))]
    Walk {
        /// Directory being walked.
        root: Utf8PathBuf,
        /// Underlying walk error.
        #[source]
        source: walkdir::Error,
    },
    /// The template failed to compile or render.
    #[error("template error: {0}")]
    #[diagnostic(code(stepdoc::render::template))]
    Template(#[from] minijinja::Error),
}

/// Locates module sources below a project root.
#[derive(Debug)]
pub struct ModuleResolver {
    root: Dir,
    root_path: Utf8PathBuf,
}

impl ModuleResolver {
    /// Open `project_root` for module lookups.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Io`] when the directory cannot be opened.
    pub fn open(project_root: &Utf8Path) -> Result<Self, RenderError> {
        let root = Dir::open_ambient_dir(project_root, ambient_authority()).map_err(|source| {
            RenderError::Io {
                path: project_root.to_path_buf(),
                source,
            }
        })?;
        Ok(Self {
            root,
            root_path: project_root.to_path_buf(),
        })
    }

    /// Read the source text of `module`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::ModuleNotFound`] when no candidate file exists
    /// and [`RenderError::Io`] when reading fails.
    pub fn read(&self, module: &ModuleRef) -> Result<String, RenderError> {
        let path = module
            .candidate_paths()
            .into_iter()
            .find(|candidate| self.root.is_file(candidate))
            .ok_or_else(|| RenderError::ModuleNotFound {
                module: module.clone(),
                root: self.root_path.clone(),
            })?;
        self.root
            .read_to_string(&path)
            .map_err(|source| RenderError::Io {
                path: self.root_path.join(&path),
                source,
            })
    }

    /// Parse the step records of `module`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when the module cannot be read.
    pub fn records(&self, module: &ModuleRef) -> Result<Vec<FunctionRecord>, RenderError> {
        let source = self.read(module)?;
        let records = collect_records(&pysource::parse_module(&source));
        debug!(%module, count = records.len(), "collected step records");
        Ok(records)
    }
}

/// Renders step records through a template.
#[derive(Debug)]
pub struct StepRenderer {
    env: Environment<'static>,
}

impl StepRenderer {
    /// Compile `template` as the step template.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Template`] when the template does not compile.
    pub fn new(template: impl Into<String>) -> Result<Self, RenderError> {
        let mut env = Environment::new();
        env.add_template_owned(TEMPLATE_NAME, template.into())?;
        Ok(Self { env })
    }

    /// Renderer using the bundled template.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Template`] if the bundled template is invalid.
    pub fn with_default_template() -> Result<Self, RenderError> {
        Self::new(DEFAULT_TEMPLATE)
    }

    /// Renderer using the template file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when the file cannot be read or compiled.
    pub fn from_path(path: &Utf8Path) -> Result<Self, RenderError> {
        let template = fs::read_to_string(path).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(template)
    }

    /// Render `functions` as one HTML fragment.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Template`] when rendering fails.
    pub fn render_records(&self, functions: &[FunctionRecord]) -> Result<String, RenderError> {
        let template = self.env.get_template(TEMPLATE_NAME)?;
        Ok(template.render(context! { functions })?)
    }

    /// Render the step records of every module in `modules` as one fragment.
    ///
    /// Records appear grouped by module in the order given.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when a module cannot be resolved or the
    /// template fails.
    pub fn render_modules(
        &self,
        modules: &[ModuleRef],
        resolver: &ModuleResolver,
    ) -> Result<String, RenderError> {
        let mut functions = Vec::new();
        for module in modules {
            functions.extend(resolver.records(module)?);
        }
        self.render_records(&functions)
    }
}

fn io_error(path: &Utf8Path) -> impl FnOnce(std::io::Error) -> RenderError + '_ {
    move |source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Resolve every document below `source_dir` into `output_dir`.
///
/// Documents keep their relative paths. Documents without directives are
/// copied through unchanged. Returns the written paths.
///
/// # Errors
///
/// Returns [`RenderError`] when walking, reading, rendering or writing fails.
pub fn render_tree(
    source_dir: &Utf8Path,
    output_dir: &Utf8Path,
    renderer: &StepRenderer,
    resolver: &ModuleResolver,
) -> Result<Vec<Utf8PathBuf>, RenderError> {
    let mut written = Vec::new();
    if !source_dir.is_dir() {
        debug!(dir = %source_dir, "no generated documents to render");
        return Ok(written);
    }
    fs::create_dir_all(output_dir).map_err(io_error(output_dir))?;
    for walked in WalkDir::new(source_dir).sort_by_file_name() {
        let entry = walked.map_err(|source| RenderError::Walk {
            root: source_dir.to_path_buf(),
            source,
        })?;
        let Some(path) = Utf8Path::from_path(entry.path()) else {
            continue;
        };
        if !entry.file_type().is_file() || path.extension() != Some(DOC_EXTENSION) {
            continue;
        }
        let relative = path.strip_prefix(source_dir).unwrap_or(path);
        let target = output_dir.join(relative);
        let text = fs::read_to_string(path).map_err(io_error(path))?;
        let resolved = StepDocument::parse(&text)
            .resolve(|node| renderer.render_modules(&node.modules, resolver))?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(io_error(parent))?;
        }
        fs::write(&target, resolved).map_err(io_error(&target))?;
        debug!(source = %path, target = %target, "resolved document");
        written.push(target);
    }
    info!(count = written.len(), dir = %output_dir, "rendered step documentation");
    Ok(written)
}
