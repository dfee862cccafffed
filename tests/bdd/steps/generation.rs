//! Steps that build step projects and generate their document trees.

use crate::bdd::fixtures::{RefCellOptionExt, TestWorld, strip_quotes};
use anyhow::{Context, Result, ensure};
use rstest_bdd_macros::{given, then, when};
use stepdoc::tree::{self, DocLayout};
use test_support::StepProject;

/// Run `f` against the scenario's project.
pub(super) fn with_project<R>(
    world: &TestWorld,
    f: impl FnOnce(&StepProject) -> Result<R>,
) -> Result<R> {
    world
        .project
        .with_ref(f)
        .context("no step project has been created")?
}

/// Layout rooted at the project with the default docs directory.
pub(super) fn layout(project: &StepProject) -> DocLayout {
    DocLayout {
        project_root: project.root().to_path_buf(),
        steps_root: project.root().to_path_buf(),
        docs_root: project.docs_dir(),
    }
}

fn toctree_entries(project: &StepProject, document: &str) -> Result<Vec<String>> {
    let text = project.read(&format!("docs/steps/{document}"))?;
    Ok(text
        .lines()
        .skip_while(|line| !line.starts_with("..  toctree::"))
        .filter_map(|line| line.strip_prefix("    "))
        .filter(|entry| !entry.starts_with(':'))
        .map(str::to_owned)
        .collect())
}

#[given("a sample step project")]
fn sample_project(world: &TestWorld) -> Result<()> {
    world.project.set_value(StepProject::sample()?);
    Ok(())
}

#[given("a step module {path}")]
fn step_module(world: &TestWorld, path: String) -> Result<()> {
    let relative = strip_quotes(&path);
    with_project(world, |project| {
        project.write(relative, "@given('x')\ndef step_x(context):\n    pass\n")?;
        Ok(())
    })
}

#[when("the documents are generated")]
fn documents_generated(world: &TestWorld) -> Result<()> {
    with_project(world, |project| {
        tree::generate(&layout(project))?;
        Ok(())
    })
}

#[then("the generated files are {files}")]
fn generated_files(world: &TestWorld, files: String) -> Result<()> {
    let expected: Vec<&str> = strip_quotes(&files).split(", ").collect();
    let actual = with_project(world, StepProject::generated_files)?;
    ensure!(actual == expected, "expected {expected:?}, got {actual:?}");
    Ok(())
}

#[then("the document {document} lists {entry}")]
fn document_lists(world: &TestWorld, document: String, entry: String) -> Result<()> {
    let entries = with_project(world, |project| {
        toctree_entries(project, strip_quotes(&document))
    })?;
    let wanted = strip_quotes(&entry);
    ensure!(
        entries.iter().any(|listed| listed == wanted),
        "{wanted} missing from {entries:?}"
    );
    Ok(())
}

#[then("the document {document} does not list {entry}")]
fn document_does_not_list(world: &TestWorld, document: String, entry: String) -> Result<()> {
    let entries = with_project(world, |project| {
        toctree_entries(project, strip_quotes(&document))
    })?;
    let unwanted = strip_quotes(&entry);
    ensure!(
        !entries.iter().any(|listed| listed == unwanted),
        "{unwanted} unexpectedly listed in {entries:?}"
    );
    Ok(())
}
