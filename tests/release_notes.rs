use relnotes::{generate, parse_commit, BodySection, ChangeType, RawCommit};

fn parse_all(subjects: &[(&str, &str)]) -> Vec<relnotes::ParsedCommit> {
    subjects
        .iter()
        .enumerate()
        .map(|(i, (subject, body))| {
            parse_commit(&RawCommit::new(format!("{i:040x}"), subject.to_string(), body.to_string()))
        })
        .collect()
}

#[test]
fn feature_and_fix_in_range() {
    let commits = parse_all(&[
        ("feat(ui): add new button [123]", ""),
        ("fix(backend): fix crash [456]", ""),
    ]);
    let notes = generate(&commits, Some("v1.0.0"), Some("v1.1.0"));

    assert!(notes.contains("# Release Notes (v1.0.0...v1.1.0)"));
    let features = notes.find("## Features").unwrap();
    let fixes = notes.find("## Bug Fixes").unwrap();
    assert!(features < fixes);
    assert!(notes[features..fixes].contains("* add new button [123]"));
    assert!(notes[fixes..].contains("* fix crash [456]"));
    assert!(!notes.contains("## Other Changes"));
}

#[test]
fn empty_history() {
    let notes = generate(&[], None, None);

    assert!(notes.starts_with("# Release Notes\n"));
    assert!(notes.contains("No configuration changes."));
    assert!(notes.contains("No required hardware changes."));
    for heading in ["## Features", "## Bug Fixes", "## Other Changes"] {
        assert!(!notes.contains(heading), "{heading}");
    }
}

#[test]
fn body_sections() {
    let body = format!(
        "{}\n\nEnable flag X.\n\n{}\n\nNone",
        BodySection::ConfigurationChanges.header(),
        BodySection::RequiredHardwareChanges.header()
    );
    let commits = parse_all(&[("feat(flags): add flag X", body.as_str())]);

    assert_eq!(commits[0].configuration_changes.as_deref(), Some("Enable flag X."));
    assert_eq!(commits[0].required_hardware_changes, None);

    let notes = generate(&commits, None, Some("v2.0.0"));
    assert!(notes.contains("# Release Notes (v2.0.0)"));
    assert!(notes.contains("## Configuration Changes\n\n### add flag X\n\nEnable flag X.\n"));
    assert!(notes.contains("No required hardware changes."));
}

#[test]
fn sorted_by_component_then_description() {
    let commits = parse_all(&[
        ("feat(b): z", ""),
        ("feat(a): y", ""),
        ("feat(b): a", ""),
    ]);
    let notes = generate(&commits, None, None);

    let pos = |needle: &str| notes.find(needle).unwrap_or_else(|| panic!("{needle}\n{notes}"));
    assert!(pos("### A") < pos("* y"));
    assert!(pos("* y") < pos("### B"));
    assert!(pos("### B") < pos("* a"));
    assert!(pos("* a") < pos("* z"));
}

#[test]
fn other_component_renders_last() {
    let commits = parse_all(&[
        ("fix(other): misc", ""),
        ("fix(zzz): last letter", ""),
        ("fix(aaa): first letter", ""),
    ]);
    let notes = generate(&commits, None, None);

    let aaa = notes.find("### Aaa").unwrap();
    let zzz = notes.find("### Zzz").unwrap();
    let other = notes.find("### Other").unwrap();
    assert!(aaa < zzz && zzz < other, "{notes}");
}

#[test]
fn output_is_deterministic() {
    let subjects = [
        ("feat(api): add pagination (#12)", ""),
        ("Merge branch 'release'", ""),
        ("fix(api): off by one [SW-9]", ""),
        ("chore: bump deps", ""),
        ("feat: top level thing", ""),
    ];
    let forward = parse_all(&subjects);
    let mut reversed = forward.clone();
    reversed.reverse();

    let a = generate(&forward, Some("v1"), Some("v2"));
    let b = generate(&forward, Some("v1"), Some("v2"));
    let c = generate(&reversed, Some("v1"), Some("v2"));
    assert_eq!(a, b);
    assert_eq!(a, c);
}

#[test]
fn freeform_subjects_are_kept() {
    let commits = parse_all(&[("Merge pull request #7 from team/topic", "")]);

    assert_eq!(commits[0].change_type, ChangeType::Other);
    let notes = generate(&commits, None, None);
    assert!(notes.contains(
        "## Other Changes\n\n* Merge pull request #7 from team/topic (00000000)\n"
    ));
}
