use std::cmp::Ordering;

use indexmap::IndexMap;

use crate::commit::{ChangeType, ParsedCommit};

/// Component name that always sorts after every other component.
pub const OTHER_COMPONENT: &str = "other";

/// The second level of the release notes, i.e. the components -> commits,
/// in render order
pub type ComponentMap<'a> = IndexMap<&'a str, Vec<&'a ParsedCommit>>;

/// A struct which holds change types -> components -> commits, every level
/// already in render order. Change types without commits have no entry.
#[derive(Debug, Default)]
pub struct SectionMap<'a> {
    pub sections: IndexMap<ChangeType, ComponentMap<'a>>,
}

impl<'a> SectionMap<'a> {
    /// Buckets commits by change type and orders each bucket by component
    /// then description. The input order only matters between commits with
    /// the same component and description.
    ///
    /// # Example
    ///
    /// ```
    /// # use relnotes::{parse_commit, ChangeType, RawCommit, SectionMap};
    /// let commits: Vec<_> = ["fix(b): two", "fix(a): one", "docs: readme"]
    ///     .iter()
    ///     .map(|s| parse_commit(&RawCommit::new("", *s, "")))
    ///     .collect();
    /// let sm = SectionMap::from_commits(&commits);
    ///
    /// let fixes = &sm.sections[&ChangeType::Fix];
    /// assert_eq!(fixes.keys().copied().collect::<Vec<_>>(), ["a", "b"]);
    /// assert!(!sm.sections.contains_key(&ChangeType::Feature));
    /// ```
    pub fn from_commits(commits: &'a [ParsedCommit]) -> SectionMap<'a> {
        let mut sm = SectionMap::default();

        for change_type in ChangeType::ALL {
            let mut entries: Vec<&ParsedCommit> = commits
                .iter()
                .filter(|c| c.change_type == change_type)
                .collect();
            if entries.is_empty() {
                continue;
            }
            entries.sort_by(|a, b| compare_commits(a, b));

            let comp_map = sm.sections.entry(change_type).or_default();
            for entry in entries {
                comp_map
                    .entry(entry.component.as_str())
                    .or_default()
                    .push(entry);
            }
        }

        sm
    }
}

/// Plain string order, except that [`OTHER_COMPONENT`] goes last.
pub fn component_order(a: &str, b: &str) -> Ordering {
    match (a == OTHER_COMPONENT, b == OTHER_COMPONENT) {
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        _ => a.cmp(b),
    }
}

/// Render order of commits within one change type.
pub fn compare_commits(a: &ParsedCommit, b: &ParsedCommit) -> Ordering {
    component_order(&a.component, &b.component)
        .then_with(|| a.description.cmp(&b.description))
}
