//! neo - CLI entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use neo::error::{ConfigError, MatrixError};
use neo::git::{IndexLister, LocalDiff};
use neo::github::{GitHubCompare, get_github_token, parse_repository, resolve_refs};
use neo::matrix::{MatrixConfig, RenamePolicy, UngroupedPolicy, generate_matrix};
use neo::output::write_github_output;
use neo::source::{ChangeSetProvider, RepositoryLister};
use neo::walk::DirectoryLister;

/// Environment variable holding the log filter (e.g. `debug`).
const LOG_ENV_VAR: &str = "NEO_LOG_LEVEL";

/// Where the change set comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Source {
    /// GitHub compare API
    Github,
    /// Local git diff between the two refs
    Git,
}

/// How the full repository is listed in fallback mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Listing {
    /// Files tracked in the git index
    Git,
    /// Every file on disk, honoring .gitignore
    Walk,
}

/// Generate a CI job matrix from changed files.
#[derive(Parser, Debug)]
#[command(name = "neo")]
#[command(about = "Generate a CI job matrix from changed files using named regex groups")]
#[command(version)]
struct Cli {
    /// Regex pattern with named groups to match changed files against
    #[arg(long, env = "NEO_PATTERN")]
    pattern: String,

    /// If no changed file matches the pattern, match every file in the repository (a.k.a. run everything)
    #[arg(
        long,
        env = "NEO_DEFAULTS",
        default_value = "false",
        default_missing_value = "true",
        num_args = 0..=1,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    defaults: bool,

    /// If any changed file matches one of these globs, match every file in the repository
    #[arg(long, env = "DEFAULT_PATTERNS", num_args = 1..)]
    default_patterns: Vec<String>,

    /// Require the pattern to match at the start of the path
    #[arg(long)]
    anchored: bool,

    /// How renamed files contribute to the reason
    #[arg(long, value_enum, default_value_t = RenamePolicy::Added)]
    rename_policy: RenamePolicy,

    /// How a pattern without named groups is keyed
    #[arg(long, value_enum, default_value_t = UngroupedPolicy::Global)]
    ungrouped: UngroupedPolicy,

    /// In fallback mode, keep the change reason for entries that actually changed
    #[arg(long)]
    keep_change_reasons: bool,

    /// Where to read the changed files from
    #[arg(long, value_enum, default_value_t = Source::Github)]
    source: Source,

    /// How to list repository files in fallback mode
    #[arg(long, value_enum, default_value_t = Listing::Git)]
    listing: Listing,

    /// Repository checkout root
    #[arg(long, env = "GITHUB_WORKSPACE", default_value = ".")]
    workspace: PathBuf,

    /// Base of the comparison (commit, branch or tag)
    #[arg(long, alias = "github-base-ref")]
    base_ref: Option<String>,

    /// Head of the comparison (commit, branch or tag)
    #[arg(long, alias = "github-head-ref")]
    head_ref: Option<String>,

    /// Repository as owner/name
    #[arg(long, env = "GITHUB_REPOSITORY")]
    github_repository: Option<String>,

    /// GitHub token (falls back to gh CLI auth)
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = "https://api.github.com")]
    github_api_url: String,

    /// Page size for the compare API
    #[arg(long)]
    per_page: Option<u8>,

    #[arg(long, env = "GITHUB_EVENT_NAME", hide = true)]
    github_event_name: Option<String>,

    #[arg(long, env = "GITHUB_EVENT_PATH", hide = true)]
    github_event_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(&e),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = MatrixConfig::builder(&cli.pattern)
        .anchored(cli.anchored)
        .ungrouped(cli.ungrouped)
        .defaults(cli.defaults)
        .default_patterns(&cli.default_patterns)
        .rename_policy(cli.rename_policy)
        .keep_change_reasons(cli.keep_change_reasons)
        .build()
        .map_err(MatrixError::from)?;

    let provider = build_provider(&cli).map_err(MatrixError::from)?;

    let lister: Box<dyn RepositoryLister> = match cli.listing {
        Listing::Git => Box::new(IndexLister::new(&cli.workspace)),
        Listing::Walk => Box::new(DirectoryLister::new(&cli.workspace)),
    };

    let matrix = generate_matrix(&config, provider.as_ref(), lister.as_ref()).await?;

    let json = matrix
        .to_include_json()
        .context("Failed to serialize matrix")?;
    info!("{}", json);

    if std::env::var_os("GITHUB_ACTIONS").is_some() {
        let output_file = std::env::var_os("GITHUB_OUTPUT").map(PathBuf::from);
        write_github_output(&matrix, output_file.as_deref())
            .context("Failed to write GitHub Actions output")?;
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn build_provider(cli: &Cli) -> Result<Box<dyn ChangeSetProvider>, ConfigError> {
    let head = match (cli.source, &cli.github_event_path) {
        (Source::Git, None) => cli.head_ref.clone().or_else(|| Some("HEAD".to_string())),
        _ => cli.head_ref.clone(),
    };

    let refs = resolve_refs(
        cli.base_ref.clone(),
        head,
        cli.github_event_name.as_deref(),
        cli.github_event_path.as_deref(),
    )?;
    info!("Comparing {}...{}", refs.base, refs.head);

    match cli.source {
        Source::Git => Ok(Box::new(LocalDiff::new(
            &cli.workspace,
            refs.base,
            Some(refs.head),
        ))),
        Source::Github => {
            let slug = cli
                .github_repository
                .as_deref()
                .ok_or(ConfigError::MissingRepository)?;
            let (owner, repo) = parse_repository(slug)?;
            let token = get_github_token(cli.github_token.as_deref())?;

            let mut compare = GitHubCompare::new(
                &cli.github_api_url,
                &token,
                &owner,
                &repo,
                &refs.base,
                &refs.head,
            )?;
            if let Some(per_page) = cli.per_page {
                compare = compare.per_page(per_page);
            }
            Ok(Box::new(compare))
        }
    }
}

/// Log the error and pick an exit code: 2 for configuration mistakes, 1 otherwise.
fn report(e: &anyhow::Error) -> ExitCode {
    let Some(matrix_error) = e.downcast_ref::<MatrixError>() else {
        error!("{:#}", e);
        return ExitCode::FAILURE;
    };

    // MatrixError messages already embed their sources.
    if matrix_error.is_configuration() {
        error!("{}. Fix the inputs before re-running.", matrix_error);
        ExitCode::from(2)
    } else if matrix_error.is_retryable() {
        error!("{}. This looks transient; retrying the job may help.", matrix_error);
        ExitCode::FAILURE
    } else {
        error!("{}", matrix_error);
        ExitCode::FAILURE
    }
}
