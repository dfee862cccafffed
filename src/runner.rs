//! CLI execution and command dispatch logic.
//!
//! This module keeps `main` minimal by providing a single entry point that
//! resolves the configured paths and runs the requested command.

use crate::cli::{Cli, Commands, RenderArgs};
use crate::model::ModuleRef;
use crate::render::{self, ModuleResolver, StepRenderer};
use crate::tree::{self, DocLayout};
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, info};

/// Directory, relative to the docs root, receiving resolved documents.
pub const RENDER_OUTPUT_DIR: &str = "_build/steps";

fn utf8(path: &Path) -> Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path.to_path_buf())
        .map_err(|p| anyhow::anyhow!("path {} is not valid UTF-8", p.display()))
}

/// Resolve `path` against `base` unless it is already absolute.
fn under(base: &Utf8Path, path: &Path) -> Result<Utf8PathBuf> {
    let utf8_path = utf8(path)?;
    Ok(if utf8_path.is_absolute() {
        utf8_path
    } else {
        base.join(utf8_path)
    })
}

/// Build the filesystem layout described by `cli`.
///
/// The project root is canonicalised so collected paths share its prefix.
///
/// # Errors
///
/// Returns an error when the project root does not exist or a path is not
/// valid UTF-8.
pub fn layout(cli: &Cli) -> Result<DocLayout> {
    let project_root = utf8(&cli.project_root)?
        .canonicalize_utf8()
        .with_context(|| format!("resolving project root {}", cli.project_root.display()))?;
    let steps_root = match &cli.steps_dir {
        Some(dir) => under(&project_root, dir)?,
        None => project_root.clone(),
    };
    let docs_root = under(&project_root, &cli.docs_dir)?;
    debug!(%project_root, %steps_root, %docs_root, "resolved layout");
    Ok(DocLayout {
        project_root,
        steps_root,
        docs_root,
    })
}

fn renderer(cli: &Cli, project_root: &Utf8Path) -> Result<StepRenderer> {
    let renderer = match &cli.template {
        Some(configured) => {
            let path = under(project_root, configured)?;
            StepRenderer::from_path(&path)
                .with_context(|| format!("loading template {path}"))?
        }
        None => StepRenderer::with_default_template().context("loading built-in template")?,
    };
    Ok(renderer)
}

/// Execute the parsed [`Cli`] commands.
///
/// # Errors
///
/// Returns an error if generation, rendering, or writing output fails.
pub fn run(cli: &Cli) -> Result<()> {
    let command = cli.command.clone().unwrap_or(Commands::Generate);
    let layout = layout(cli)?;
    match command {
        Commands::Generate => {
            let written = tree::generate(&layout).context("generating step documents")?;
            info!(count = written.len(), "generation finished");
            Ok(())
        }
        Commands::Render(args) => render_documents(cli, &layout, &args),
        Commands::Fragment { modules: names } => {
            let modules: Vec<ModuleRef> = names.into_iter().map(ModuleRef::new).collect();
            let resolver = ModuleResolver::open(&layout.project_root)?;
            let html = renderer(cli, &layout.project_root)?
                .render_modules(&modules, &resolver)
                .context("rendering fragment")?;
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{html}").context("writing fragment to stdout")?;
            Ok(())
        }
    }
}

fn render_documents(cli: &Cli, layout: &DocLayout, args: &RenderArgs) -> Result<()> {
    let output = match &args.output {
        Some(dir) => under(&layout.project_root, dir)?,
        None => layout.docs_root.join(RENDER_OUTPUT_DIR),
    };
    let resolver = ModuleResolver::open(&layout.project_root)?;
    let renderer = renderer(cli, &layout.project_root)?;
    let written = render::render_tree(&layout.output_dir(), &output, &renderer, &resolver)
        .context("rendering step documents")?;
    info!(count = written.len(), %output, "render finished");
    Ok(())
}
