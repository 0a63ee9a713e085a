use std::{
    env, fs,
    io::{stdout, BufWriter, Write},
    path::{Path, PathBuf},
    process::Command,
};

use log::{debug, info, warn};

use crate::{
    commit::ParsedCommit,
    config::RawCfg,
    error::{Error, Result},
    fmt::MarkdownWriter,
    git::{parse_log_output, Commits, LOG_FORMAT},
    parser::parse_commit,
    sectionmap::SectionMap,
    DEFAULT_CONFIG_FILE,
};

/// The base struct used to set options, read history and produce release
/// notes.
#[derive(Debug, Clone)]
pub struct ReleaseNotes {
    /// The document title (Defaults to "Release Notes")
    pub title: String,
    /// Older end of the range, exclusive
    pub from: Option<String>,
    /// Newer end of the range (`HEAD` when only `from` is set)
    pub to: Option<String>,
    /// The working tree of the git project
    pub repo: PathBuf,
    /// Follow only the first parent of merges (Defaults to `true`)
    pub first_parent: bool,
    /// Run `git fetch --tags` before reading history (Defaults to `true`)
    pub fetch: bool,
    /// Also render the customer-facing notes section (Defaults to `false`)
    pub customer_notes: bool,
    /// The file to write to (Defaults to `stdout` if omitted)
    pub outfile: Option<PathBuf>,
}

impl Default for ReleaseNotes {
    fn default() -> Self {
        ReleaseNotes {
            title: "Release Notes".to_owned(),
            from: None,
            to: None,
            repo: PathBuf::from("."),
            first_parent: true,
            fetch: true,
            customer_notes: false,
            outfile: None,
        }
    }
}

impl ReleaseNotes {
    /// Uses the current directory as the repository, picking up
    /// `.relnotes.toml` there if it exists.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use relnotes::ReleaseNotes;
    /// let notes = ReleaseNotes::new().unwrap();
    /// ```
    pub fn new() -> Result<Self> {
        debug!("Creating default release notes with new()");
        let cwd = env::current_dir().map_err(|_| Error::CurrentDir)?;
        ReleaseNotes::with_dir(cwd)
    }

    /// Uses `dir` as the repository, picking up `.relnotes.toml` there if it
    /// exists.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use relnotes::ReleaseNotes;
    /// let notes = ReleaseNotes::with_dir("/myproject").unwrap();
    /// ```
    pub fn with_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        debug!("Creating release notes with dir: {:?}", dir.as_ref());
        let notes = ReleaseNotes {
            repo: dir.as_ref().to_path_buf(),
            ..ReleaseNotes::default()
        };

        let cfg_file = dir.as_ref().join(DEFAULT_CONFIG_FILE);
        if cfg_file.is_file() {
            notes.try_config_file(&cfg_file)
        } else {
            debug!("No config file at {:?}, using defaults", cfg_file);
            Ok(notes)
        }
    }

    /// Reads options from a TOML configuration file, using the directory
    /// containing it as the repository. The file must exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use relnotes::ReleaseNotes;
    /// let notes = ReleaseNotes::from_file("/myproject/relnotes.toml").unwrap();
    /// ```
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        debug!("Creating release notes with file: {:?}", file.as_ref());
        let cfg_file = if file.as_ref().is_relative() {
            let cwd = env::current_dir().map_err(|_| Error::CurrentDir)?;
            cwd.join(file.as_ref())
        } else {
            file.as_ref().to_path_buf()
        };
        if !cfg_file.is_file() {
            return Err(Error::ConfigMissing(cfg_file));
        }

        // The config file is assumed to sit in the project directory
        let mut dir = cfg_file.clone();
        dir.pop();
        let notes = ReleaseNotes {
            repo: dir,
            ..ReleaseNotes::default()
        };
        notes.try_config_file(&cfg_file)
    }

    fn try_config_file(mut self, cfg_file: &Path) -> Result<Self> {
        debug!("Trying to use config file: {:?}", cfg_file);
        let contents = fs::read_to_string(cfg_file)?;
        let cfg: RawCfg = toml::from_str(&contents).map_err(|source| Error::ConfigParse {
            path: cfg_file.to_path_buf(),
            source,
        })?;
        let cfg = cfg.relnotes;

        if let Some(title) = cfg.title {
            self.title = title;
        }
        if let Some(first_parent) = cfg.first_parent {
            self.first_parent = first_parent;
        }
        if let Some(fetch) = cfg.fetch_tags {
            self.fetch = fetch;
        }
        self.customer_notes = cfg.customer_notes;
        self.outfile = cfg.outfile.map(|out| {
            if out.is_relative() {
                self.repo.join(out)
            } else {
                out
            }
        });

        if cfg.from_latest_tag {
            self.from = Some(self.get_latest_tag()?);
        }

        debug!("Returning release notes:\n{:?}", self);
        Ok(self)
    }

    /// Sets the document title.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use relnotes::ReleaseNotes;
    /// let notes = ReleaseNotes::new().unwrap().title("Firmware Release Notes");
    /// ```
    pub fn title<S: Into<String>>(mut self, t: S) -> ReleaseNotes {
        self.title = t.into();
        self
    }

    /// Sets where to begin reading history, as a tag or commit. Commits
    /// reachable from it are excluded.
    ///
    /// **NOTE:** Anything set here will override anything in a configuration
    /// TOML file
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use relnotes::ReleaseNotes;
    /// let notes = ReleaseNotes::new().unwrap().from("v1.0.0");
    /// ```
    pub fn from<S: Into<String>>(mut self, f: S) -> ReleaseNotes {
        self.from = Some(f.into());
        self
    }

    /// Sets where to stop reading history, as a tag or commit.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use relnotes::ReleaseNotes;
    /// let notes = ReleaseNotes::new().unwrap().to("v1.1.0");
    /// ```
    pub fn to<S: Into<String>>(mut self, t: S) -> ReleaseNotes {
        self.to = Some(t.into());
        self
    }

    /// Sets the repository working tree.
    pub fn repository<P: AsRef<Path>>(mut self, dir: P) -> ReleaseNotes {
        self.repo = dir.as_ref().to_path_buf();
        self
    }

    /// Sets whether merges are followed through their first parent only.
    pub fn first_parent(mut self, f: bool) -> ReleaseNotes {
        self.first_parent = f;
        self
    }

    /// Sets whether tags are fetched from the remote before reading history.
    pub fn fetch(mut self, f: bool) -> ReleaseNotes {
        self.fetch = f;
        self
    }

    /// Sets whether the customer-facing notes get their own section.
    pub fn customer_notes(mut self, c: bool) -> ReleaseNotes {
        self.customer_notes = c;
        self
    }

    /// Sets the file release notes are written to.
    ///
    /// **NOTE:** Anything set here will override anything in a configuration
    /// TOML file
    pub fn outfile<P: AsRef<Path>>(mut self, o: P) -> ReleaseNotes {
        self.outfile = Some(o.as_ref().to_path_buf());
        self
    }

    fn git(&self) -> Command {
        let mut cmd = Command::new("git");
        cmd.arg("-C").arg(&self.repo);
        cmd
    }

    fn run_git(&self, args: &[&str]) -> Result<String> {
        debug!("Running git {:?} in {:?}", args, self.repo);
        let output = self.git().args(args).output()?;
        if !output.status.success() {
            return Err(Error::Git {
                command: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Fetches all tags from the remote.
    pub fn fetch_remote_tags(&self) -> Result<()> {
        self.run_git(&["fetch", "--tags"]).map(|_| ())
    }

    /// Whether `rev` names a tag or commit in the repository.
    pub fn rev_exists(&self, rev: &str) -> Result<bool> {
        let status = self
            .git()
            .args(["rev-parse", "--verify", "--quiet"])
            .arg(format!("{rev}^{{commit}}"))
            .output()?
            .status;
        Ok(status.success())
    }

    /// Retrieves the most recent tag reachable from `HEAD`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use relnotes::ReleaseNotes;
    /// let notes = ReleaseNotes::new().unwrap();
    /// let tag = notes.get_latest_tag().unwrap();
    /// ```
    pub fn get_latest_tag(&self) -> Result<String> {
        let out = self.run_git(&["describe", "--tags", "--abbrev=0"])?;
        Ok(out.trim().to_owned())
    }

    /// The revision range handed to `git log`, if any end is set.
    pub fn revision_range(&self) -> Option<String> {
        match (self.from.as_deref(), self.to.as_deref()) {
            (Some(from), Some(to)) => Some(format!("{from}..{to}")),
            (Some(from), None) => Some(format!("{from}..HEAD")),
            (None, Some(to)) => Some(to.to_owned()),
            (None, None) => None,
        }
    }

    /// Fails with [`Error::UnknownRevision`] if either end of the range does
    /// not resolve.
    pub fn validate_range(&self) -> Result<()> {
        for rev in [&self.from, &self.to].into_iter().flatten() {
            if !self.rev_exists(rev)? {
                return Err(Error::UnknownRevision(rev.clone()));
            }
        }
        Ok(())
    }

    /// Retrieves the commits in the range, newest first.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use relnotes::ReleaseNotes;
    /// let notes = ReleaseNotes::new().unwrap().from("v1.0.0");
    /// let commits = notes.get_commits().unwrap();
    /// ```
    pub fn get_commits(&self) -> Result<Commits> {
        let format = format!("--pretty=format:{LOG_FORMAT}");
        let mut args = vec!["log"];
        if self.first_parent {
            args.push("--first-parent");
        }
        args.push(&format);
        let range = self.revision_range();
        if let Some(range) = range.as_deref() {
            args.push(range);
        }

        let commits = parse_log_output(&self.run_git(&args)?);
        debug!("Read {} commits", commits.len());
        Ok(commits)
    }

    /// Retrieves and parses the commits in the range.
    pub fn get_parsed_commits(&self) -> Result<Vec<ParsedCommit>> {
        Ok(self.get_commits()?.iter().map(parse_commit).collect())
    }

    /// Renders parsed commits with these options. Never fails.
    pub fn render(&self, commits: &[ParsedCommit]) -> String {
        let sm = SectionMap::from_commits(commits);
        let mut out = String::new();
        MarkdownWriter::new(&mut out).write_release_notes(self, &sm);
        out
    }

    /// Fetches tags (if enabled), validates the range, reads history and
    /// renders it. A failed fetch is logged and ignored.
    pub fn generate(&self) -> Result<String> {
        self.prepare()?;
        let commits = self.get_parsed_commits()?;
        Ok(self.render(&commits))
    }

    /// Runs the steps before reading history: the optional tag fetch and
    /// range validation.
    pub fn prepare(&self) -> Result<()> {
        if self.fetch {
            if let Err(e) = self.fetch_remote_tags() {
                warn!("failed to fetch tags: {e}");
            }
        }
        self.validate_range()
    }

    /// Writes rendered notes to the outfile, or `stdout` when none is set.
    pub fn write_output(&self, notes: &str) -> Result<()> {
        if let Some(ref out) = self.outfile {
            debug!("outfile set to: {:?}", out);
            fs::write(out, notes)?;
            info!("wrote release notes to {}", out.display());
        } else {
            let out = stdout();
            let mut out_buf = BufWriter::new(out.lock());
            out_buf.write_all(notes.as_bytes())?;
            out_buf.flush()?;
        }
        Ok(())
    }

    /// Generates the release notes and writes them out.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use relnotes::ReleaseNotes;
    /// let notes = ReleaseNotes::new().unwrap().from("v1.0.0").to("v1.1.0");
    /// notes.write_release_notes().unwrap();
    /// ```
    pub fn write_release_notes(&self) -> Result<()> {
        let notes = self.generate()?;
        self.write_output(&notes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let notes = ReleaseNotes::default();
        assert_eq!(notes.title, "Release Notes");
        assert!(notes.first_parent);
        assert!(notes.fetch);
        assert!(!notes.customer_notes);
        assert_eq!(notes.revision_range(), None);
    }

    #[test]
    fn revision_ranges() {
        let notes = ReleaseNotes::default();
        assert_eq!(
            notes.clone().from("v1").to("v2").revision_range().as_deref(),
            Some("v1..v2")
        );
        assert_eq!(notes.clone().from("v1").revision_range().as_deref(), Some("v1..HEAD"));
        assert_eq!(notes.to("v2").revision_range().as_deref(), Some("v2"));
    }

    #[test]
    fn with_dir_reads_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            "[relnotes]\ntitle = \"Firmware\"\nfetch-tags = false\noutfile = \"NOTES.md\"\n",
        )
        .unwrap();

        let notes = ReleaseNotes::with_dir(dir.path()).unwrap();
        assert_eq!(notes.title, "Firmware");
        assert!(!notes.fetch);
        assert!(notes.first_parent);
        assert_eq!(notes.repo, dir.path());
        assert_eq!(notes.outfile, Some(dir.path().join("NOTES.md")));
    }

    #[test]
    fn with_dir_without_config() {
        let dir = tempfile::tempdir().unwrap();
        let notes = ReleaseNotes::with_dir(dir.path()).unwrap();
        assert_eq!(notes.title, "Release Notes");
        assert_eq!(notes.outfile, None);
    }

    #[test]
    fn setters_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = dir.path().join("custom.toml");
        fs::write(&cfg, "[relnotes]\ntitle = \"From file\"\n").unwrap();

        let notes = ReleaseNotes::from_file(&cfg).unwrap().title("From code");
        assert_eq!(notes.title, "From code");
        assert_eq!(notes.repo, dir.path());
    }

    #[test]
    fn missing_explicit_config() {
        let dir = tempfile::tempdir().unwrap();
        let err = ReleaseNotes::from_file(dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, Error::ConfigMissing(_)), "{err:?}");
    }

    #[test]
    fn malformed_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "[relnotes\ntitle = 1").unwrap();

        let err = ReleaseNotes::with_dir(dir.path()).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }), "{err:?}");
    }

    #[test]
    fn writes_outfile() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("notes.md");
        let notes = ReleaseNotes::default().outfile(&out);

        notes.write_output(&notes.render(&[])).unwrap();
        let written = fs::read_to_string(&out).unwrap();
        assert!(written.starts_with("# Release Notes\n"));
        assert!(written.contains("No configuration changes."));
    }
}
