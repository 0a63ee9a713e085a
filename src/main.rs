//! relnotes CLI - grouped Markdown release notes for a range of git history.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use relnotes::ReleaseNotes;
use tracing_subscriber::EnvFilter;

/// Generate release notes from conventional commits between two revisions.
#[derive(Debug, Parser)]
#[command(name = "relnotes")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the git repository
    #[arg(long, default_value = ".")]
    repo: String,

    /// Tag or commit to start from (older, excluded)
    #[arg(long)]
    from: Option<String>,

    /// Tag or commit to end at (newer)
    #[arg(long)]
    to: Option<String>,

    /// Config file to use instead of `<repo>/.relnotes.toml`
    #[arg(short, long, env = "RELNOTES_CONFIG")]
    config: Option<PathBuf>,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Document title
    #[arg(long)]
    title: Option<String>,

    /// Skip `git fetch --tags`
    #[arg(long)]
    no_fetch: bool,

    /// Include the customer-facing release notes section
    #[arg(long)]
    customer_notes: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn options(&self) -> Result<ReleaseNotes> {
        let repo = expand_home(&self.repo);
        let mut notes = match &self.config {
            Some(cfg) => ReleaseNotes::from_file(cfg)?.repository(&repo),
            None => ReleaseNotes::with_dir(&repo)?,
        };

        if let Some(from) = &self.from {
            notes = notes.from(from);
        }
        if let Some(to) = &self.to {
            notes = notes.to(to);
        }
        if let Some(title) = &self.title {
            notes = notes.title(title);
        }
        if let Some(output) = &self.output {
            notes = notes.outfile(output);
        }
        if self.no_fetch {
            notes = notes.fetch(false);
        }
        if self.customer_notes {
            notes = notes.customer_notes(true);
        }
        Ok(notes)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let notes = cli.options()?;
    info!("Using repo path: {}", notes.repo.display());

    notes.prepare()?;
    let commits = notes
        .get_parsed_commits()
        .context("failed to read commits")?;
    if commits.is_empty() {
        info!("no commits found");
        return Ok(());
    }

    notes.write_output(&notes.render(&commits))?;
    Ok(())
}

/// Expands a leading `~` to the home directory.
fn expand_home(path: &str) -> PathBuf {
    let rest = match path {
        "~" => "",
        p => match p.strip_prefix("~/") {
            Some(rest) => rest,
            None => return PathBuf::from(path),
        },
    };
    match dirs::home_dir() {
        Some(home) if rest.is_empty() => home,
        Some(home) => home.join(rest),
        None => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_home() {
        assert_eq!(expand_home("/srv/repo"), PathBuf::from("/srv/repo"));
        assert_eq!(expand_home("~user/repo"), PathBuf::from("~user/repo"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~"), home);
            assert_eq!(expand_home("~/code/app"), home.join("code/app"));
        }
    }

    #[test]
    fn parses_flags() {
        let cli = Cli::parse_from(["relnotes", "--from", "v1.0.0", "--to", "v1.1.0", "--no-fetch"]);
        assert_eq!(cli.repo, ".");
        assert_eq!(cli.from.as_deref(), Some("v1.0.0"));
        assert_eq!(cli.to.as_deref(), Some("v1.1.0"));
        assert!(cli.no_fetch);
        assert!(!cli.customer_notes);
    }
}
