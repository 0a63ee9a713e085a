use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use crate::{
    commit::{BodySection, ChangeType, ParsedCommit},
    git::RawCommit,
};

// type(component): description [ISSUE] (#PR)
static SUBJECT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    regex!(r"^([a-z]+)(?:\(([^)]+)\))?: (.+?)(?: \[#?([a-zA-Z0-9-]+)\])?(?: \(#(\d+)\))?$")
});

static COMMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| regex!(r"(?s)<!--.*?-->"));

/// Start of the heading that ends a body section.
const NEXT_HEADING: &str = "\n## ";

/// The result of matching a subject line against the commit grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject<'a> {
    /// `type(component): description [ISSUE] (#PR)`, where the component,
    /// issue and PR parts are optional
    Conventional {
        type_token: &'a str,
        component: Option<&'a str>,
        description: &'a str,
        issue: Option<&'a str>,
        pr: Option<&'a str>,
    },
    /// Anything the grammar does not accept
    Freeform(&'a str),
}

impl<'a> Subject<'a> {
    pub fn parse(subject: &'a str) -> Self {
        let Some(caps) = SUBJECT_REGEX.captures(subject) else {
            return Subject::Freeform(subject);
        };
        let group = |i| caps.get(i).map(|m| m.as_str());
        Subject::Conventional {
            type_token: group(1).unwrap_or_default(),
            component: group(2),
            description: group(3).unwrap_or_default(),
            issue: group(4),
            pr: group(5),
        }
    }
}

/// Strips `<!-- -->` comments and surrounding whitespace. Returns an empty
/// string when nothing is left, or when what is left starts with `none` or
/// `n/a` (ignoring case).
///
/// # Example
///
/// ```
/// # use relnotes::clean_content;
/// assert_eq!(clean_content("  text  "), "text");
/// assert_eq!(clean_content("<!-- c --> None"), "");
/// assert_eq!(clean_content("N/A, nothing to do"), "");
/// ```
pub fn clean_content(content: &str) -> String {
    let mut text = content.to_owned();
    while COMMENT_REGEX.is_match(&text) {
        text = COMMENT_REGEX.replace_all(&text, "").into_owned();
    }

    let text = text.trim();
    let lower = text.to_lowercase();
    if lower.is_empty() || lower.starts_with("none") || lower.starts_with("n/a") {
        return String::new();
    }
    text.to_owned()
}

/// Finds `section` in `body` and returns its cleaned text. The section runs
/// from its heading to the next level two heading or the end of the body.
pub fn extract_section(body: &str, section: BodySection) -> Option<String> {
    let (_, rest) = body.split_once(section.header())?;
    let content = match rest.find(NEXT_HEADING) {
        Some(end) => &rest[..end],
        None => rest,
    };

    let cleaned = clean_content(content);
    (!cleaned.is_empty()).then_some(cleaned)
}

/// Classifies a raw commit and pulls the known sections out of its body.
///
/// Subjects that do not follow the grammar are kept as `Other` with the
/// whole subject as description.
///
/// # Example
///
/// ```
/// # use relnotes::{parse_commit, ChangeType, RawCommit};
/// let raw = RawCommit::new("abc", "feat(ui): add new button [SW-12] (#40)", "");
/// let parsed = parse_commit(&raw);
///
/// assert_eq!(parsed.change_type, ChangeType::Feature);
/// assert_eq!(parsed.component, "ui");
/// assert_eq!(parsed.description, "add new button");
/// assert_eq!(parsed.issue_number.as_deref(), Some("SW-12"));
/// assert_eq!(parsed.pr_number.as_deref(), Some("40"));
/// ```
pub fn parse_commit(commit: &RawCommit) -> ParsedCommit {
    let mut parsed = match Subject::parse(&commit.subject) {
        Subject::Conventional {
            type_token,
            component,
            description,
            issue,
            pr,
        } => ParsedCommit {
            change_type: ChangeType::from_token(type_token),
            component: component.unwrap_or_default().to_owned(),
            description: description.to_owned(),
            issue_number: issue.map(str::to_owned),
            pr_number: pr.map(str::to_owned),
            ..ParsedCommit::default()
        },
        Subject::Freeform(subject) => {
            debug!("subject of {} is not conventional: {subject:?}", commit.hash);
            ParsedCommit {
                description: subject.to_owned(),
                ..ParsedCommit::default()
            }
        }
    };

    let body = &commit.body;
    parsed.customer_facing_notes = extract_section(body, BodySection::CustomerFacingNotes);
    parsed.configuration_changes = extract_section(body, BodySection::ConfigurationChanges);
    parsed.required_hardware_changes = extract_section(body, BodySection::RequiredHardwareChanges);
    parsed.original = commit.clone();
    parsed
}
