//! Integration tests for document tree generation.
//!
//! Each test builds a throwaway step project, generates the documentation
//! tree, and inspects the files written below `docs/steps`.

use anyhow::{Context, Result, ensure};
use insta::{Settings, assert_snapshot};
use rstest::{fixture, rstest};
use stepdoc::tree::{self, DocLayout};
use test_support::StepProject;

fn layout_for(project: &StepProject) -> DocLayout {
    DocLayout {
        project_root: project.root().to_path_buf(),
        steps_root: project.root().to_path_buf(),
        docs_root: project.docs_dir(),
    }
}

#[fixture]
fn sample() -> StepProject {
    StepProject::sample().expect("create sample project")
}

#[rstest]
fn writes_one_index_per_category_and_a_root_index(sample: StepProject) -> Result<()> {
    let written = tree::generate(&layout_for(&sample))?;
    ensure!(written.len() == 5, "expected five documents, got {written:?}");
    let last = written.last().context("nothing written")?;
    ensure!(
        last.file_name() == Some("step-index.rst"),
        "root index should be written last, got {last}"
    );
    assert_eq!(
        sample.generated_files()?,
        [
            "auth-steps.rst",
            "cart-steps.rst",
            "login.rst",
            "shop.rst",
            "step-index.rst",
        ]
    );
    Ok(())
}

#[rstest]
fn generated_documents_match_snapshots(sample: StepProject) -> Result<()> {
    tree::generate(&layout_for(&sample))?;
    let root_index = sample.read("docs/steps/step-index.rst")?;
    let category_index = sample.read("docs/steps/login.rst")?;
    let leaf = sample.read("docs/steps/auth-steps.rst")?;

    let mut settings = Settings::new();
    settings.set_snapshot_path(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/snapshots/tree"));
    settings.bind(|| {
        assert_snapshot!("root_index", root_index);
        assert_snapshot!("category_index", category_index);
        assert_snapshot!("leaf_document", leaf);
    });
    Ok(())
}

#[rstest]
fn private_entries_are_not_documented(sample: StepProject) -> Result<()> {
    sample.write("_shared/common.py", "@given('x')\ndef step(context):\n    pass\n")?;
    sample.write("login/__init__.py", "")?;
    sample.write("login/_helpers.py", "def helper():\n    pass\n")?;
    sample.write("login/__pycache__/auth.py", "")?;
    sample.write("login/_internal/deep.py", "")?;
    sample.mkdir(".hidden")?;

    tree::generate(&layout_for(&sample))?;

    let files = sample.generated_files()?;
    for unwanted in ["shared.rst", "-shared.rst", "common-steps.rst", "deep-steps.rst"] {
        ensure!(
            !files.iter().any(|f| f == unwanted),
            "{unwanted} should not be generated: {files:?}"
        );
    }
    ensure!(
        !files.iter().any(|f| f.starts_with('_') || f.starts_with('.')),
        "private entries leaked: {files:?}"
    );
    let index = sample.read("docs/steps/login.rst")?;
    assert_eq!(
        index,
        "Login Steps\n===========\n\n..  toctree::\n    :maxdepth: 1\n\n    auth-steps.rst\n"
    );
    Ok(())
}

#[rstest]
fn nested_packages_become_dotted_module_references() -> Result<()> {
    let project = StepProject::new()?;
    project.write("user_login/accounts/password_reset.py", "")?;

    tree::generate(&layout_for(&project))?;

    let index = project.read("docs/steps/user-login.rst")?;
    ensure!(index.starts_with("User Login Steps\n================\n"));
    ensure!(index.ends_with("    password-reset-steps.rst\n"), "index was {index:?}");
    let leaf = project.read("docs/steps/password-reset-steps.rst")?;
    assert_eq!(
        leaf,
        concat!(
            "Password Reset Steps\n",
            "====================\n",
            "\n",
            "..  autobehave::\n",
            "\n",
            "    user_login.accounts.password_reset\n",
        )
    );
    Ok(())
}

#[rstest]
fn colliding_file_names_keep_the_last_module_written() -> Result<()> {
    let project = StepProject::new()?;
    project.write("login/foo-bar.py", "")?;
    project.write("login/foo_bar.py", "")?;

    tree::generate(&layout_for(&project))?;

    let index = project.read("docs/steps/login.rst")?;
    ensure!(
        index.ends_with("    foo-bar-steps.rst\n    foo-bar-steps.rst\n"),
        "both modules should be listed: {index:?}"
    );
    let leaf = project.read("docs/steps/foo-bar-steps.rst")?;
    ensure!(leaf.ends_with("    login.foo_bar\n"), "leaf was {leaf:?}");
    Ok(())
}

#[rstest]
fn colliding_category_names_keep_the_last_directory_written() -> Result<()> {
    let project = StepProject::new()?;
    project.write("foo-bar/b.py", "")?;
    project.write("foo_bar/a.py", "")?;

    let written = tree::generate(&layout_for(&project))?;

    let names: Vec<&str> = written.iter().filter_map(|path| path.file_name()).collect();
    assert_eq!(
        names,
        [
            "b-steps.rst",
            "foo-bar.rst",
            "a-steps.rst",
            "foo-bar.rst",
            "step-index.rst",
        ]
    );
    assert_eq!(
        project.generated_files()?,
        ["a-steps.rst", "b-steps.rst", "foo-bar.rst", "step-index.rst"]
    );
    let root_index = project.read("docs/steps/step-index.rst")?;
    ensure!(
        root_index.ends_with("    foo-bar.rst\n    foo-bar.rst\n"),
        "both categories should be listed: {root_index:?}"
    );
    let index = project.read("docs/steps/foo-bar.rst")?;
    ensure!(
        index.ends_with("\n\n    a-steps.rst\n"),
        "surviving index should list only the second directory's module: {index:?}"
    );
    Ok(())
}

#[rstest]
fn missing_steps_root_yields_an_empty_root_index() -> Result<()> {
    let project = StepProject::new()?;
    let layout = DocLayout {
        steps_root: project.root().join("features/steps"),
        ..layout_for(&project)
    };

    let written = tree::generate(&layout)?;

    ensure!(written.len() == 1, "only the root index expected: {written:?}");
    assert_eq!(
        project.read("docs/steps/step-index.rst")?,
        "Steps\n=====\n\n..  toctree::\n    :maxdepth: 1\n\n"
    );
    Ok(())
}

#[rstest]
fn steps_root_below_project_root_keeps_full_module_paths() -> Result<()> {
    let project = StepProject::new()?;
    project.write("features/steps/checkout/payment.py", "")?;
    let layout = DocLayout {
        steps_root: project.root().join("features/steps"),
        ..layout_for(&project)
    };

    tree::generate(&layout)?;

    let leaf = project.read("docs/steps/payment-steps.rst")?;
    ensure!(
        leaf.ends_with("    features.steps.checkout.payment\n"),
        "leaf was {leaf:?}"
    );
    Ok(())
}

#[rstest]
fn regeneration_overwrites_and_skips_the_docs_root(sample: StepProject) -> Result<()> {
    sample.write("docs/steps/auth-steps.rst", "stale\n")?;

    tree::generate(&layout_for(&sample))?;
    tree::generate(&layout_for(&sample))?;

    let leaf = sample.read("docs/steps/auth-steps.rst")?;
    ensure!(leaf.starts_with("Auth Steps\n"), "leaf was not rewritten: {leaf:?}");
    let files = sample.generated_files()?;
    ensure!(
        !files.iter().any(|f| f == "docs.rst"),
        "docs root documented as a category: {files:?}"
    );
    Ok(())
}
