//! Command line interface definition using clap.
//!
//! This module defines the [`Cli`] structure and its subcommands, and merges
//! the parsed values with configuration files and `STEPDOC_*` environment
//! variables through `OrthoConfig`.

use clap::parser::ValueSource;
use clap::{ArgMatches, Args, CommandFactory, FromArgMatches, Parser, Subcommand};
use ortho_config::declarative::LayerComposition;
use ortho_config::figment::{Figment, providers::Env};
use ortho_config::uncased::Uncased;
use ortho_config::{
    ConfigDiscovery, MergeComposer, OrthoConfig, OrthoMergeExt, OrthoResult, sanitize_value,
};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;

const CONFIG_ENV_VAR: &str = "STEPDOC_CONFIG_PATH";
const ENV_PREFIX: &str = "STEPDOC_";

/// Generate reStructuredText reference pages for behave step definitions.
#[derive(Debug, Parser, Serialize, Deserialize, OrthoConfig)]
#[command(author, version, about, long_about = None)]
#[ortho_config(prefix = "STEPDOC")]
pub struct Cli {
    /// Project root that module references are relative to.
    #[arg(short = 'C', long, value_name = "DIR", default_value = ".")]
    #[ortho_config(default = default_project_root())]
    pub project_root: PathBuf,

    /// Directory holding one subdirectory per step category.
    ///
    /// Relative to the project root; defaults to the project root itself.
    #[arg(long, value_name = "DIR")]
    pub steps_dir: Option<PathBuf>,

    /// Documentation root; documents are written to its `steps` directory.
    ///
    /// Relative paths are resolved against the project root.
    #[arg(short, long, value_name = "DIR", default_value = "docs")]
    #[ortho_config(default = default_docs_dir())]
    pub docs_dir: PathBuf,

    /// Template used to render step metadata instead of the built-in one.
    #[arg(short, long, value_name = "FILE")]
    pub template: Option<PathBuf>,

    /// Enable verbose diagnostic logging.
    #[arg(short, long)]
    #[ortho_config(default = false)]
    pub verbose: bool,

    /// Optional subcommand to execute; defaults to `generate` when omitted.
    ///
    /// `OrthoConfig` merging ignores this field; CLI parsing supplies it.
    #[serde(skip)]
    #[command(subcommand)]
    #[ortho_config(skip_cli)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Apply the default command if none was specified.
    #[must_use]
    pub fn with_default_command(mut self) -> Self {
        if self.command.is_none() {
            self.command = Some(Commands::Generate);
        }
        self
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            project_root: default_project_root(),
            steps_dir: None,
            docs_dir: default_docs_dir(),
            template: None,
            verbose: false,
            command: None,
        }
        .with_default_command()
    }
}

/// Arguments accepted by the `render` command.
#[derive(Debug, Args, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct RenderArgs {
    /// Directory receiving the resolved documents.
    ///
    /// Defaults to `_build/steps` inside the documentation root.
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,
}

/// Available top-level commands.
#[derive(Debug, Subcommand, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Commands {
    /// Write index and leaf documents for every step module.
    Generate,

    /// Replace `autobehave` directives in generated documents with HTML.
    Render(RenderArgs),

    /// Print the rendered HTML fragment for the given modules.
    Fragment {
        /// Dotted module references, such as `features.steps.login`.
        #[arg(value_name = "MODULE", required = true)]
        modules: Vec<String>,
    },
}

/// Return the default project root when none is provided.
fn default_project_root() -> PathBuf {
    PathBuf::from(".")
}

/// Return the default documentation root when none is provided.
fn default_docs_dir() -> PathBuf {
    PathBuf::from("docs")
}

/// Parse CLI arguments from `iter`.
///
/// Returns both the parsed CLI struct and the `ArgMatches` required for
/// configuration merging.
///
/// # Errors
///
/// Returns a `clap::Error` when parsing fails.
pub fn parse_from<I, T>(iter: I) -> Result<(Cli, ArgMatches), clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut command = Cli::command();
    let matches = command.try_get_matches_from_mut(iter)?;
    // Clone matches before from_arg_matches_mut consumes the values.
    let matches_for_merge = matches.clone();
    let mut matches_for_parse = matches;
    let cli = Cli::from_arg_matches_mut(&mut matches_for_parse)
        .map_err(|clap_err| clap_err.with_cmd(&command))?;
    Ok((cli, matches_for_merge))
}

/// Return the prefixed environment provider for CLI configuration.
fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX)
}

/// Build configuration discovery rooted in the project directory.
fn config_discovery(project_root: &PathBuf) -> ConfigDiscovery {
    ConfigDiscovery::builder("stepdoc")
        .env_var(CONFIG_ENV_VAR)
        .clear_project_roots()
        .add_project_root(project_root)
        .build()
}

/// Return `true` when no CLI overrides were supplied.
///
/// The merge pipeline treats an empty JSON object as "no overrides".
fn is_empty_value(value: &serde_json::Value) -> bool {
    matches!(value, serde_json::Value::Object(map) if map.is_empty())
}

fn cli_overrides_from_matches(cli: &Cli, matches: &ArgMatches) -> OrthoResult<serde_json::Value> {
    let value = sanitize_value(cli)?;
    let mut map = match value {
        serde_json::Value::Object(map) => map,
        other => {
            return Err(Arc::new(ortho_config::OrthoError::Validation {
                key: String::from("cli"),
                message: format!(
                    "expected parsed CLI values to serialize to an object, got {other:?}"
                ),
            }));
        }
    };

    map.remove("command");
    for field in ["project_root", "steps_dir", "docs_dir", "template", "verbose"] {
        if matches.value_source(field) != Some(ValueSource::CommandLine) {
            map.remove(field);
        }
    }

    Ok(serde_json::Value::Object(map))
}

/// Merge configuration layers over the parsed CLI values.
///
/// Precedence, lowest first: defaults, configuration file, environment,
/// explicit command-line flags.
///
/// # Errors
///
/// Returns an [`ortho_config::OrthoError`] if layer composition or merging
/// fails.
pub fn merge_with_config(cli: &Cli, matches: &ArgMatches) -> OrthoResult<Cli> {
    let command = cli.command.clone();
    let mut errors = Vec::new();
    let mut composer = MergeComposer::with_capacity(4);

    match sanitize_value(&Cli::default()) {
        Ok(value) => composer.push_defaults(value),
        Err(err) => errors.push(err),
    }

    let discovery = config_discovery(&cli.project_root);
    let mut file_layers = discovery.compose_layers();
    errors.append(&mut file_layers.required_errors);
    if file_layers.value.is_empty() {
        errors.append(&mut file_layers.optional_errors);
    }
    for layer in file_layers.value {
        composer.push_layer(layer);
    }

    let env_provider = env_provider()
        .map(|key| Uncased::new(key.as_str().to_ascii_uppercase()))
        .split("__");
    match Figment::from(env_provider)
        .extract::<serde_json::Value>()
        .into_ortho_merge()
    {
        Ok(value) => composer.push_environment(value),
        Err(err) => errors.push(err),
    }

    match cli_overrides_from_matches(cli, matches) {
        Ok(value) if !is_empty_value(&value) => composer.push_cli(value),
        Ok(_) => {}
        Err(err) => errors.push(err),
    }

    let composition = LayerComposition::new(composer.layers(), errors);
    let mut merged = composition.into_merge_result(Cli::merge_from_layers)?;
    merged.command = command;
    Ok(merged)
}
