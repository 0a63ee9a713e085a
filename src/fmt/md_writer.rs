use std::fmt::Write as _;

use crate::{
    commit::{BodySection, ParsedCommit},
    release_notes::ReleaseNotes,
    sectionmap::{ComponentMap, SectionMap},
};

/// Heading used for commits without a component when the same section also
/// has named components.
const GENERAL_COMPONENT: &str = "General";

/// Accumulates release notes in Markdown into a `String`.
///
/// # Example
///
/// ```
/// # use relnotes::{fmt::MarkdownWriter, parse_commit, RawCommit, ReleaseNotes, SectionMap};
/// let commits = vec![parse_commit(&RawCommit::new("1f2e3d4c5b", "fix(db): close pool", ""))];
/// let sm = SectionMap::from_commits(&commits);
///
/// let mut out = String::new();
/// MarkdownWriter::new(&mut out).write_release_notes(&ReleaseNotes::default().to("v2.0.0"), &sm);
///
/// assert!(out.starts_with("# Release Notes (v2.0.0)\n"));
/// assert!(out.contains("### Db\n\n* close pool (1f2e3d4c)\n"));
/// ```
pub struct MarkdownWriter<'a>(&'a mut String);

impl<'a> MarkdownWriter<'a> {
    pub fn new(out: &'a mut String) -> MarkdownWriter<'a> {
        MarkdownWriter(out)
    }

    /// Writes the whole document: title, change type sections, then the
    /// configuration and hardware sections.
    pub fn write_release_notes(&mut self, options: &ReleaseNotes, sm: &SectionMap<'_>) {
        self.write_header(options);

        if options.customer_notes {
            self.write_body_section(
                sm,
                BodySection::CustomerFacingNotes,
                "Customer-Facing Release Notes",
                "No release notes provided.",
            );
        }

        for (change_type, components) in &sm.sections {
            self.write_section(change_type.title(), components);
        }

        self.write_body_section(
            sm,
            BodySection::ConfigurationChanges,
            "Configuration Changes",
            "No configuration changes.",
        );
        self.write_body_section(
            sm,
            BodySection::RequiredHardwareChanges,
            "Required Hardware Changes",
            "No required hardware changes.",
        );

        let len = self.0.trim_end().len();
        self.0.truncate(len);
        self.0.push('\n');
    }

    fn write_header(&mut self, options: &ReleaseNotes) {
        let title = &options.title;
        if let Some(range) = range_label(options.from.as_deref(), options.to.as_deref()) {
            _ = writeln!(self.0, "# {title} ({range})\n");
        } else {
            _ = writeln!(self.0, "# {title}\n");
        }
    }

    /// Writes a particular change type section
    fn write_section(&mut self, title: &str, section: &ComponentMap<'_>) {
        if section.is_empty() {
            return;
        }
        _ = writeln!(self.0, "## {title}\n");

        let has_named = section.keys().any(|c| !c.is_empty());
        for (component, entries) in section {
            if !component.is_empty() {
                _ = writeln!(self.0, "### {}\n", capitalize(component));
            } else if has_named {
                _ = writeln!(self.0, "### {GENERAL_COMPONENT}\n");
            }

            for entry in entries {
                self.write_entry(entry);
            }
            self.0.push('\n');
        }
    }

    fn write_entry(&mut self, entry: &ParsedCommit) {
        let (header, rest) = split_description(&entry.description);

        _ = write!(self.0, "* {header}");
        if let Some(issue) = &entry.issue_number {
            _ = write!(self.0, " [{issue}]");
        } else if let Some(pr) = &entry.pr_number {
            _ = write!(self.0, " (#{pr})");
        } else if !entry.short_hash().is_empty() {
            _ = write!(self.0, " ({})", entry.short_hash());
        }
        self.0.push('\n');

        for line in rest.lines().map(str::trim) {
            if line.is_empty() {
                self.0.push('\n');
            } else {
                _ = writeln!(self.0, "  {line}");
            }
        }
    }

    /// Writes one of the body text sections, which are always present. Every
    /// commit carrying the section gets its own sub-heading, in the order the
    /// commits appear above.
    fn write_body_section(
        &mut self,
        sm: &SectionMap<'_>,
        section: BodySection,
        title: &str,
        placeholder: &str,
    ) {
        _ = writeln!(self.0, "## {title}\n");

        let mut written = false;
        let entries = sm.sections.values().flat_map(|c| c.values()).flatten();
        for entry in entries {
            let Some(text) = entry.section(section) else {
                continue;
            };
            if section != BodySection::CustomerFacingNotes {
                let (header, _) = split_description(&entry.description);
                _ = writeln!(self.0, "### {header}\n");
            }
            _ = writeln!(self.0, "{text}\n");
            written = true;
        }

        if !written {
            _ = writeln!(self.0, "{placeholder}\n");
        }
    }
}

/// The parenthesised part of the title, if any end of the range is known.
///
/// # Example
///
/// ```
/// # use relnotes::fmt::range_label;
/// assert_eq!(range_label(Some("v1"), Some("v2")).as_deref(), Some("v1...v2"));
/// assert_eq!(range_label(None, Some("v2")).as_deref(), Some("v2"));
/// assert_eq!(range_label(Some("v1"), None).as_deref(), Some("v1...HEAD"));
/// assert_eq!(range_label(None, None), None);
/// ```
pub fn range_label(from: Option<&str>, to: Option<&str>) -> Option<String> {
    match (from, to) {
        (Some(from), Some(to)) => Some(format!("{from}...{to}")),
        (Some(from), None) => Some(format!("{from}...HEAD")),
        (None, Some(to)) => Some(to.to_owned()),
        (None, None) => None,
    }
}

/// First line, and the trimmed remainder.
fn split_description(description: &str) -> (&str, &str) {
    match description.split_once('\n') {
        Some((header, rest)) => (header.trim_end_matches('\r'), rest.trim()),
        None => (description, ""),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
