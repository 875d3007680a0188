use clap::{Parser, Subcommand};
use matrixpp_site::compare;
use matrixpp_site::github::{self, GitHubClient, LookupConfig, RepoRef};
use matrixpp_site::history::{self, LastUpdateCheck};
use matrixpp_site::report::{self, emit};
use matrixpp_site::schema::{DEFAULT_SUITE, DEFAULT_TOOL};
use matrixpp_site::site;
use matrixpp_site::snippets;
use matrixpp_site::{commit, ingest, Error, Result};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Subcommand, Debug)]
enum Command {
    /// Append one run built from Google Benchmark JSON reports to the history.
    Append {
        /// History document (`dev/bench/data.js`); created on first run.
        #[arg(long, value_name = "FILE")]
        history: PathBuf,

        /// Report file or directory of reports. Can be provided multiple times.
        #[arg(short, long, value_name = "PATH", num_args = 1.., action = clap::ArgAction::Append, required = true)]
        input: Vec<PathBuf>,

        /// Push event payload or bare commit JSON describing the benchmarked revision.
        #[arg(long, value_name = "FILE", env = "GITHUB_EVENT_PATH")]
        commit: PathBuf,

        #[arg(long, default_value = DEFAULT_SUITE)]
        suite: String,

        /// Harness name recorded on the run.
        #[arg(long, default_value = DEFAULT_TOOL)]
        tool: String,

        /// Run date in epoch milliseconds; defaults to now.
        #[arg(long)]
        date: Option<u64>,

        /// Repository URL stored when the document is created.
        #[arg(long, default_value = "https://github.com/sam20908/matrixpp")]
        repo_url: String,
    },

    /// Check every history invariant and print a short digest.
    ///
    /// `lastUpdate` must equal the newest run date; snapshots that stamped
    /// `lastUpdate` after their run (the committed `dev/bench/data.js` does)
    /// fail with exit code 3 unless `--legacy` is given.
    Validate {
        #[arg(long, value_name = "FILE")]
        history: PathBuf,

        /// Accept `lastUpdate` at or after the newest run date.
        #[arg(long, default_value_t = false)]
        legacy: bool,
    },

    /// Compare the latest run of a suite against the one before it.
    Summary {
        #[arg(long, value_name = "FILE")]
        history: PathBuf,

        #[arg(long, default_value = DEFAULT_SUITE)]
        suite: String,

        /// Ratio above which a bench is flagged as a regression.
        #[arg(long, default_value_t = 1.5)]
        threshold: f64,
    },

    /// Fetch the latest release and repository URL for the home page.
    Lookup {
        #[arg(long, default_value = github::DEFAULT_OWNER)]
        owner: String,

        #[arg(long, default_value = github::DEFAULT_REPO)]
        repo: String,

        #[arg(long, env = "GITHUB_API_URL", default_value = github::DEFAULT_API_BASE)]
        api_base: String,

        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Longest rate-limit wait (seconds) honoured before giving up.
        #[arg(long, default_value_t = 60)]
        max_retry_wait: u64,

        /// Print the rendered link fragment instead of the JSON state.
        #[arg(long, default_value_t = false)]
        html: bool,
    },

    /// Print one of the documentation C++ snippets.
    Snippet {
        #[arg(value_name = "NAME")]
        name: String,
    },
}

#[derive(Parser, Debug)]
#[command(name = "matrixpp-site")]
#[command(about = "Benchmark history and release lookup for the matrixpp website")]
struct Args {
    /// Where to write the command output. If omitted, prints to stdout.
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

fn now_millis() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default()
}

fn run(args: Args) -> Result<()> {
    let out = args.out.as_deref();

    match args.cmd {
        Command::Append {
            history: path,
            input,
            commit: commit_path,
            suite,
            tool,
            date,
            repo_url,
        } => {
            let commit = commit::load_commit(&commit_path)?;
            let run = ingest::build_run(commit, date.unwrap_or_else(now_millis), &tool, &input)?;
            let existing = history::load(&path)?;
            let doc = history::append_run(existing, &suite, run, &repo_url)?;
            history::save(&path, &doc)?;

            tracing::info!(
                "{}: {} runs, lastUpdate {}",
                path.display(),
                doc.run_count(),
                doc.last_update
            );
        }
        Command::Validate {
            history: path,
            legacy,
        } => {
            let doc = report::load_existing(&path)?;
            let check = if legacy {
                LastUpdateCheck::AtLeast
            } else {
                LastUpdateCheck::Exact
            };
            emit(out, &report::validation_report(&path, &doc, check)?)?;
        }
        Command::Summary {
            history: path,
            suite,
            threshold,
        } => {
            let doc = report::load_existing(&path)?;
            let Some(cmp) = compare::compare_latest(&doc, &suite) else {
                tracing::warn!("Suite {suite} has no runs");
                return Ok(());
            };
            for delta in cmp.regressions(threshold) {
                tracing::warn!(
                    "{} regressed: {:.3} -> {:.3} {} (x{:.2})",
                    delta.name,
                    delta.previous.unwrap_or_default(),
                    delta.current,
                    delta.unit,
                    delta.ratio.unwrap_or_default()
                );
            }
            emit(out, &serde_json::to_string_pretty(&cmp)?)?;
        }
        Command::Lookup {
            owner,
            repo,
            api_base,
            token,
            max_retry_wait,
            html,
        } => {
            let client = GitHubClient::new(LookupConfig {
                api_base,
                token,
                max_retry_wait: Duration::from_secs(max_retry_wait),
            });
            let repo = RepoRef { owner, repo };
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            let state = runtime.block_on(github::lookup(&client, &repo));

            let text = if html {
                site::render_links(&state)
            } else {
                serde_json::to_string_pretty(&state)?
            };
            emit(out, &text)?;
        }
        Command::Snippet { name } => {
            let code = snippets::get(&name).ok_or_else(|| Error::UnknownSnippet { name: name.clone() })?;
            emit(out, code)?;
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("matrixpp_site=info")),
        )
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            e.exit_code()
        }
    }
}
