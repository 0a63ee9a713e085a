//! Grouped Markdown release notes from conventional commit history.
//!
//! Commits are read with `git log`, their subjects classified with the
//! grammar `type(component): description [ISSUE] (#PR)`, and the
//! customer-facing, configuration and hardware sections pulled out of their
//! bodies. [`SectionMap`] groups them by change type and component, and
//! [`fmt::MarkdownWriter`] renders the document.
//!
//! ```
//! let commits = vec![
//!     relnotes::RawCommit::new("a1", "feat(ui): add new button [123]", ""),
//!     relnotes::RawCommit::new("b2", "fix(backend): fix crash [456]", ""),
//! ];
//! let parsed: Vec<_> = commits.iter().map(relnotes::parse_commit).collect();
//! let notes = relnotes::generate(&parsed, Some("v1.0.0"), Some("v1.1.0"));
//!
//! assert!(notes.starts_with("# Release Notes (v1.0.0...v1.1.0)"));
//! assert!(notes.contains("* add new button [123]"));
//! ```

#[macro_use]
mod macros;
mod commit;
pub mod config;
pub mod error;
pub mod fmt;
pub mod git;
mod parser;
mod release_notes;
mod sectionmap;

pub use commit::{BodySection, ChangeType, ParsedCommit};
pub use error::{Error, Result};
pub use git::RawCommit;
pub use parser::{clean_content, extract_section, parse_commit, Subject};
pub use release_notes::ReleaseNotes;
pub use sectionmap::{compare_commits, component_order, ComponentMap, SectionMap, OTHER_COMPONENT};

// The default config file
const DEFAULT_CONFIG_FILE: &str = ".relnotes.toml";

/// Renders parsed commits with the default options and the given range
/// labels. Never fails; an empty slice still yields the title and the
/// configuration and hardware placeholders.
pub fn generate(commits: &[ParsedCommit], from: Option<&str>, to: Option<&str>) -> String {
    let options = ReleaseNotes {
        from: from.map(str::to_owned),
        to: to.map(str::to_owned),
        ..ReleaseNotes::default()
    };
    options.render(commits)
}
