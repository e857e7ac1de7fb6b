//! talend-review - static review of Talend jobs stored in git
//!
//! Usage: talend-review <REPO> <REF> <ITEM>
//!
//! ITEM is ALL, LIST, TREE, TABLES, SQL or the name of a job. Output is JSON on stdout.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use indexmap::IndexMap;
use tracing::Level;

use talend_review::config::ProjectOptions;
use talend_review::project::Project;
use talend_review::sink::TracingSink;

#[derive(Parser)]
#[command(name = "talend-review")]
#[command(about = "Static review of Talend job definitions stored in git")]
struct Cli {
    /// Repository path (a bare repository unless --work-tree is given)
    #[arg(env = "TALEND_REVIEW_REPO")]
    repo: PathBuf,

    /// Commit, branch or tag to review
    #[arg(env = "TALEND_REVIEW_REF")]
    reference: String,

    /// ALL, LIST, TREE, TABLES, SQL or a job name
    item: String,

    /// REPO is a work tree containing .git
    #[arg(long)]
    work_tree: bool,

    /// Read job files from the work tree instead of REF
    #[arg(long, requires = "work_tree")]
    uncommitted: bool,

    /// Report job discovery and parsing
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::TRACE } else { Level::WARN };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    match run(&cli, level) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, level: Level) -> Result<String> {
    let reference = (!cli.uncommitted).then(|| cli.reference.clone());
    let options = ProjectOptions::new(cli.repo.clone())
        .with_reference(reference)
        .with_bare(!cli.work_tree);

    let project = Project::open(&options, Arc::new(TracingSink::new(level)))
        .with_context(|| format!("loading project from {}", cli.repo.display()))?;

    let json = match cli.item.as_str() {
        "ALL" => {
            let mut summaries = IndexMap::new();
            for name in project.job_names() {
                summaries.insert(name.to_string(), project.summary(name, false)?);
            }
            serde_json::to_string(&summaries)?
        }
        "LIST" => serde_json::to_string(&project.job_names().collect::<Vec<_>>())?,
        "TREE" => serde_json::to_string(&project.tree_view(None)?)?,
        "TABLES" => serde_json::to_string(&project.all_tables()?)?,
        "SQL" => serde_json::to_string(&project.dump_sql_structured()?)?,
        job => serde_json::to_string(
            &project
                .summary(job, true)
                .with_context(|| format!("reviewing job {}", job))?,
        )?,
    };

    Ok(json)
}
