//! Steps that render fragments and resolve generated documents.

use super::generation::{layout, with_project};
use crate::bdd::fixtures::{TestWorld, strip_quotes};
use anyhow::{Context, Result, ensure};
use rstest_bdd_macros::{then, when};
use stepdoc::model::ModuleRef;
use stepdoc::render::{self, ModuleResolver, StepRenderer};

const RENDERED_DIR: &str = "site";

fn rendered_document(world: &TestWorld, document: &str) -> Result<String> {
    with_project(world, |project| {
        project.read(&format!("{RENDERED_DIR}/{document}"))
    })
}

#[when("the documents are rendered")]
fn documents_rendered(world: &TestWorld) -> Result<()> {
    with_project(world, |project| {
        let resolver = ModuleResolver::open(project.root())?;
        let renderer = StepRenderer::with_default_template()?;
        render::render_tree(
            &layout(project).output_dir(),
            &project.root().join(RENDERED_DIR),
            &renderer,
            &resolver,
        )?;
        Ok(())
    })
}

#[when("the fragment for {module} is rendered")]
fn fragment_rendered(world: &TestWorld, module: String) -> Result<()> {
    let modules = [ModuleRef::new(strip_quotes(&module))];
    let outcome = with_project(world, |project| {
        let resolver = ModuleResolver::open(project.root())?;
        Ok(StepRenderer::with_default_template()?.render_modules(&modules, &resolver))
    })?;
    match outcome {
        Ok(html) => world.fragment.set(html),
        Err(err) => world.render_error.set(err.to_string()),
    }
    Ok(())
}

#[then("the rendered document {document} contains {text}")]
fn rendered_contains(world: &TestWorld, document: String, text: String) -> Result<()> {
    let rendered = rendered_document(world, strip_quotes(&document))?;
    let wanted = strip_quotes(&text);
    ensure!(rendered.contains(wanted), "{wanted} missing from {rendered}");
    Ok(())
}

#[then("the rendered document {document} does not contain {text}")]
fn rendered_does_not_contain(world: &TestWorld, document: String, text: String) -> Result<()> {
    let rendered = rendered_document(world, strip_quotes(&document))?;
    let unwanted = strip_quotes(&text);
    ensure!(!rendered.contains(unwanted), "{unwanted} found in {rendered}");
    Ok(())
}

#[then("the fragment contains {text}")]
fn fragment_contains(world: &TestWorld, text: String) -> Result<()> {
    let fragment = world.fragment.get().context("no fragment was rendered")?;
    let wanted = strip_quotes(&text);
    ensure!(fragment.contains(wanted), "{wanted} missing from {fragment}");
    Ok(())
}

#[then("the fragment does not contain {text}")]
fn fragment_does_not_contain(world: &TestWorld, text: String) -> Result<()> {
    let fragment = world.fragment.get().context("no fragment was rendered")?;
    let unwanted = strip_quotes(&text);
    ensure!(!fragment.contains(unwanted), "{unwanted} found in {fragment}");
    Ok(())
}

#[then("rendering fails mentioning {text}")]
fn rendering_fails(world: &TestWorld, text: String) -> Result<()> {
    let error = world.render_error.get().context("rendering did not fail")?;
    let wanted = strip_quotes(&text);
    ensure!(error.contains(wanted), "{wanted} missing from error {error}");
    Ok(())
}
