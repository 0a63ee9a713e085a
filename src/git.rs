/// Marker line written after every record by the `git log` format string.
pub const COMMIT_END: &str = "---COMMIT-END---";

/// The `--pretty` format understood by [`parse_log_output`].
pub const LOG_FORMAT: &str = "%H%n%s%n%b%n---COMMIT-END---";

/// The struct representation of a `Commit` as read from `git log`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCommit {
    /// The 40 char hash
    pub hash: String,
    /// The commit subject
    pub subject: String,
    /// The commit body, trimmed
    pub body: String,
}

impl RawCommit {
    pub fn new<S: Into<String>>(hash: S, subject: S, body: S) -> Self {
        RawCommit {
            hash: hash.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// A convienience type for multiple commits
pub type Commits = Vec<RawCommit>;

/// Splits output produced with [`LOG_FORMAT`] into commit records, keeping
/// the order `git log` printed them in.
pub fn parse_log_output(output: &str) -> Commits {
    output
        .split(COMMIT_END)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let mut lines = entry.splitn(3, '\n');
            let hash = lines.next().unwrap_or("").trim();
            let subject = lines.next().unwrap_or("").trim_end_matches('\r');
            let body = lines.next().unwrap_or("").trim();
            RawCommit::new(hash, subject, body)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_records() {
        let out = "aaaa1111\nfeat(ui): add button\nSome body\n\nmore\n---COMMIT-END---\n\
                   bbbb2222\nfix: crash\n\n---COMMIT-END---";
        let commits = parse_log_output(out);

        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].hash, "aaaa1111");
        assert_eq!(commits[0].subject, "feat(ui): add button");
        assert_eq!(commits[0].body, "Some body\n\nmore");
        assert_eq!(commits[1], RawCommit::new("bbbb2222", "fix: crash", ""));
    }

    #[test]
    fn hash_only_record() {
        let commits = parse_log_output("cccc3333\n---COMMIT-END---\n");
        assert_eq!(commits, vec![RawCommit::new("cccc3333", "", "")]);
    }

    #[test]
    fn empty_output() {
        assert!(parse_log_output("").is_empty());
        assert!(parse_log_output("\n\n").is_empty());
    }
}
