use strum::EnumString;

use crate::git::RawCommit;

/// The intent of a commit, which decides the top level section it is listed
/// under.
///
/// Parsing accepts the type token of a conventional subject, ignoring ASCII
/// case. `Other` is never produced by parsing; use
/// [`ChangeType::from_token`] to get the fallback.
///
/// # Example
///
/// ```
/// # use relnotes::ChangeType;
/// assert_eq!(ChangeType::from_token("feat"), ChangeType::Feature);
/// assert_eq!(ChangeType::from_token("BugFix"), ChangeType::Fix);
/// assert_eq!(ChangeType::from_token("chore"), ChangeType::Other);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum ChangeType {
    #[strum(serialize = "feature", serialize = "feat")]
    Feature,
    #[strum(serialize = "fix", serialize = "bugfix")]
    Fix,
    #[default]
    #[strum(disabled)]
    Other,
}

impl ChangeType {
    /// Render order of the change type sections.
    pub const ALL: [ChangeType; 3] = [ChangeType::Feature, ChangeType::Fix, ChangeType::Other];

    /// Maps a type token to its change type, falling back to `Other`.
    pub fn from_token(token: &str) -> Self {
        token.parse().unwrap_or_default()
    }

    /// The heading of the section this change type is listed under.
    pub fn title(self) -> &'static str {
        match self {
            ChangeType::Feature => "Features",
            ChangeType::Fix => "Bug Fixes",
            ChangeType::Other => "Other Changes",
        }
    }
}

/// The free-text blocks recognized in a commit body. Each one starts at a
/// fixed level two heading and runs until the next level two heading.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum BodySection {
    CustomerFacingNotes,
    ConfigurationChanges,
    RequiredHardwareChanges,
}

impl BodySection {
    pub const ALL: [BodySection; 3] = [
        BodySection::CustomerFacingNotes,
        BodySection::ConfigurationChanges,
        BodySection::RequiredHardwareChanges,
    ];

    /// The verbatim heading that opens this section in a commit body.
    pub fn header(self) -> &'static str {
        match self {
            BodySection::CustomerFacingNotes => "## \u{1F4E3} Customer-Facing Release Notes",
            BodySection::ConfigurationChanges => "## \u{2699}\u{FE0F} Configuration Changes",
            BodySection::RequiredHardwareChanges => "## \u{1F50C} Required Hardware Changes",
        }
    }
}

/// A commit after classification and section extraction. Built once by
/// [`parse_commit`](crate::parse_commit) and only read afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCommit {
    pub change_type: ChangeType,
    /// The component token, empty when the commit is uncategorized
    pub component: String,
    /// The summary line
    pub description: String,
    /// External tracker id such as `SW-1928`
    pub issue_number: Option<String>,
    /// Pull request number, digits only
    pub pr_number: Option<String>,
    pub customer_facing_notes: Option<String>,
    pub configuration_changes: Option<String>,
    pub required_hardware_changes: Option<String>,
    /// The commit this was derived from
    pub original: RawCommit,
}

impl ParsedCommit {
    /// The cleaned text of one body section, if the commit carries it.
    pub fn section(&self, section: BodySection) -> Option<&str> {
        match section {
            BodySection::CustomerFacingNotes => self.customer_facing_notes.as_deref(),
            BodySection::ConfigurationChanges => self.configuration_changes.as_deref(),
            BodySection::RequiredHardwareChanges => self.required_hardware_changes.as_deref(),
        }
    }

    /// First eight characters of the original hash (or all of it when
    /// shorter). Empty when the commit has no hash.
    pub fn short_hash(&self) -> &str {
        let hash = &self.original.hash;
        match hash.char_indices().nth(8) {
            Some((idx, _)) => &hash[..idx],
            None => hash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_table() {
        assert_eq!(ChangeType::from_token("feature"), ChangeType::Feature);
        assert_eq!(ChangeType::from_token("FEAT"), ChangeType::Feature);
        assert_eq!(ChangeType::from_token("fix"), ChangeType::Fix);
        assert_eq!(ChangeType::from_token("bugfix"), ChangeType::Fix);
        assert_eq!(ChangeType::from_token("docs"), ChangeType::Other);
        assert_eq!(ChangeType::from_token("other"), ChangeType::Other);
        assert_eq!(ChangeType::from_token(""), ChangeType::Other);
    }

    #[test]
    fn headers_carry_variation_selector() {
        assert_eq!(
            BodySection::ConfigurationChanges.header(),
            "## ⚙\u{FE0F} Configuration Changes"
        );
        assert!(BodySection::ALL.iter().all(|s| s.header().starts_with("## ")));
    }

    #[test]
    fn short_hash() {
        let mut commit = ParsedCommit::default();
        assert_eq!(commit.short_hash(), "");

        commit.original.hash = "abc".into();
        assert_eq!(commit.short_hash(), "abc");

        commit.original.hash = "0123456789abcdef".into();
        assert_eq!(commit.short_hash(), "01234567");
    }
}
