// suggestion module - advisory findings based on a learned profile

use super::classifiers::{declared_identifiers, has_plain_into, identifier_prefix, is_comment};
use super::profile::{ProjectPatternProfile, StyleCategory};
use crate::source::SourceDocument;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::fmt;

lazy_static! {
    static ref EMPTY_EQUALITY: Regex = Regex::new(
        r"(?i)([\w\-~]+(?:(?:->|=>)[\w\-~]+)*)\s*(?:=|\bEQ\b)\s*(?:''|``)"
    ).unwrap();
    static ref EMPTY_INEQUALITY: Regex = Regex::new(
        r"(?i)([\w\-~]+(?:(?:->|=>)[\w\-~]+)*)\s*(?:<>|\bNE\b)\s*(?:''|``)"
    ).unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // pad so callers can align severities in columns
        f.pad(match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

/// a single advisory suggestion; never applied automatically
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub line_number: usize,
    pub severity: Severity,
    pub message: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_fix: Option<String>,
}

impl Finding {
    fn new(line_number: usize, severity: Severity, message: String, detail: impl Into<String>) -> Self {
        Self {
            line_number,
            severity,
            message,
            detail: detail.into(),
            suggested_fix: None,
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {} [{}]: {}", self.line_number, self.severity, self.message)
    }
}

/// check one line against the learned profile
pub fn suggest_for_line(line: &str, line_number: usize, profile: &ProjectPatternProfile) -> Vec<Finding> {
    let trimmed = line.trim();
    if trimmed.is_empty() || is_comment(trimmed) {
        return Vec::new();
    }

    let upper = trimmed.to_uppercase();
    let mut findings = Vec::new();

    check_naming(trimmed, line_number, profile, &mut findings);

    if upper.contains("LOOP AT") {
        check_loop_style(&upper, line_number, profile, &mut findings);
    }

    if upper.contains("CALL METHOD") {
        check_call_style(line_number, profile, &mut findings);
    }

    if upper.starts_with("IF ") {
        check_empty_comparison(line, line_number, &mut findings);
    }

    findings
}

/// run `suggest_for_line` over a whole document, numbering lines from 1
pub fn analyse_document(document: &SourceDocument, profile: &ProjectPatternProfile) -> Vec<Finding> {
    document
        .lines
        .iter()
        .enumerate()
        .flat_map(|(idx, line)| suggest_for_line(line, idx + 1, profile))
        .collect()
}

fn check_naming(line: &str, line_number: usize, profile: &ProjectPatternProfile, findings: &mut Vec<Finding>) {
    // an unlearned project has no conventions to enforce
    if profile.common_prefixes.is_empty() {
        return;
    }

    for ident in declared_identifiers(line) {
        let follows_convention = identifier_prefix(ident)
            .map(|prefix| profile.common_prefixes.contains(&prefix))
            .unwrap_or(false);

        if !follows_convention {
            let expected: Vec<String> = profile
                .common_prefixes
                .iter()
                .map(|p| format!("{p}_"))
                .collect();
            findings.push(Finding::new(
                line_number,
                Severity::Info,
                format!("variable '{ident}' doesn't follow project naming convention"),
                format!("consider using prefixes like: {}", expected.join(", ")),
            ));
        }
    }
}

fn check_loop_style(upper: &str, line_number: usize, profile: &ProjectPatternProfile, findings: &mut Vec<Finding>) {
    let loop_into = profile.style_count(StyleCategory::LoopInto);
    let loop_assigning = profile.style_count(StyleCategory::LoopAssigning);

    let plain_binding = has_plain_into(upper) && !upper.contains("ASSIGNING");
    if plain_binding && loop_assigning > loop_into * 2 {
        findings.push(Finding::new(
            line_number,
            Severity::Warning,
            "consider using a field-symbol for better performance".to_string(),
            "your project commonly uses the 'LOOP AT ... ASSIGNING <fs>' pattern, which avoids copying each row into a work area",
        ));
    }
}

fn check_call_style(line_number: usize, profile: &ProjectPatternProfile, findings: &mut Vec<Finding>) {
    let object_oriented = profile.style_count(StyleCategory::ObjectOrientedCall);
    let procedural = profile.style_count(StyleCategory::ProceduralCall);

    if object_oriented > procedural * 2 {
        findings.push(Finding::new(
            line_number,
            Severity::Info,
            "consider using modern method call syntax".to_string(),
            "replace 'CALL METHOD' with a direct method call using the '->' operator",
        ));
    }
}

fn check_empty_comparison(line: &str, line_number: usize, findings: &mut Vec<Finding>) {
    if EMPTY_EQUALITY.is_match(line) {
        let mut finding = Finding::new(
            line_number,
            Severity::Info,
            "consider using 'IS INITIAL' check".to_string(),
            "instead of comparing to an empty string, use 'IS INITIAL' for better readability",
        );
        finding.suggested_fix = Some(EMPTY_EQUALITY.replace_all(line, "${1} IS INITIAL").into_owned());
        findings.push(finding);
    }

    if EMPTY_INEQUALITY.is_match(line) {
        let mut finding = Finding::new(
            line_number,
            Severity::Info,
            "consider using 'IS NOT INITIAL' check".to_string(),
            "instead of comparing against an empty string, use 'IS NOT INITIAL' for better readability",
        );
        finding.suggested_fix = Some(EMPTY_INEQUALITY.replace_all(line, "${1} IS NOT INITIAL").into_owned());
        findings.push(finding);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::learning::PatternMiner;
    use proptest::prelude::*;

    fn profile_from(text: &str) -> ProjectPatternProfile {
        PatternMiner::default().learn(&[SourceDocument::from_text("project", text)])
    }

    #[test]
    fn naming_mismatch_is_reported() {
        let profile = profile_from("DATA: lv_a TYPE i.\nDATA: lt_b TYPE i.");
        let findings = suggest_for_line("  DATA: counter TYPE i.", 4, &profile);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].line_number, 4);
        assert_eq!(findings[0].severity, Severity::Info);
        assert!(findings[0].message.contains("counter"));
        assert_eq!(findings[0].detail, "consider using prefixes like: lv_, lt_");
    }

    #[test]
    fn matching_prefix_is_accepted() {
        let profile = profile_from("DATA: lv_a TYPE i.");
        assert!(suggest_for_line("DATA: LV_TOTAL TYPE p.", 1, &profile).is_empty());
        // the prefix must match exactly, not just start the identifier
        assert_eq!(suggest_for_line("DATA: lvx_total TYPE p.", 1, &profile).len(), 1);
    }

    #[test]
    fn loop_style_mismatch_needs_clear_preference() {
        let prefers_field_symbols = profile_from(
            "LOOP AT a ASSIGNING <x>.\nLOOP AT b ASSIGNING <y>.\nLOOP AT c ASSIGNING <z>.\nLOOP AT d INTO e.",
        );
        let findings = suggest_for_line("LOOP AT lt_rows INTO ls_row.", 9, &prefers_field_symbols);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);

        let balanced = profile_from("LOOP AT a ASSIGNING <x>.\nLOOP AT b ASSIGNING <y>.\nLOOP AT d INTO e.");
        assert!(suggest_for_line("LOOP AT lt_rows INTO ls_row.", 9, &balanced).is_empty());
        assert!(suggest_for_line("LOOP AT lt_rows REFERENCE INTO lr_row.", 9, &prefers_field_symbols).is_empty());
    }

    #[test]
    fn call_method_flagged_in_object_oriented_projects() {
        let profile = profile_from("lo_a->run( ).\nlo_b->run( ).\nlo_c->run( ).");
        let findings = suggest_for_line("CALL METHOD zcl_util=>run.", 2, &profile);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].detail.contains("->"));

        let procedural = profile_from("CALL METHOD run.\nlo_a->run( ).");
        assert!(suggest_for_line("CALL METHOD run.", 2, &procedural).is_empty());
    }

    #[test]
    fn empty_string_comparison_suggests_initial_check() {
        let profile = ProjectPatternProfile::default();
        let findings = suggest_for_line("    IF lv_name = ''.", 3, &profile);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].message, "consider using 'IS INITIAL' check");
        assert_eq!(findings[0].suggested_fix.as_deref(), Some("    IF lv_name IS INITIAL."));

        let findings = suggest_for_line("IF ls_head-name NE ''.", 3, &profile);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].suggested_fix.as_deref(), Some("IF ls_head-name IS NOT INITIAL."));

        assert!(suggest_for_line("IF lv_a >= ''.", 3, &profile).is_empty());
        assert!(suggest_for_line("lv_name = ''.", 3, &profile).is_empty());
    }

    #[test]
    fn comments_produce_nothing() {
        let profile = profile_from("DATA: lv_a TYPE i.");
        assert!(suggest_for_line("* DATA: x TYPE i.", 1, &profile).is_empty());
        assert!(suggest_for_line("\" IF a = ''.", 1, &profile).is_empty());
    }

    #[test]
    fn analyse_document_numbers_lines_from_one() {
        let profile = ProjectPatternProfile::default();
        let doc = SourceDocument::from_text("z", "REPORT z.\n\nIF lv_a = ''.\nENDIF.");
        let findings = analyse_document(&doc, &profile);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].line_number, 3);
        assert_eq!(findings[0].to_string(), "line 3 [info]: consider using 'IS INITIAL' check");
    }

    proptest! {
        #[test]
        fn no_naming_findings_without_learned_prefixes(line in ".{0,60}", ident in "[a-z]{1,8}") {
            let profile = ProjectPatternProfile::default();
            let declaration = format!("DATA: {ident} TYPE i.");
            for candidate in [line.as_str(), declaration.as_str()] {
                let findings = suggest_for_line(candidate, 1, &profile);
                prop_assert!(findings.iter().all(|f| !f.message.contains("naming convention")));
            }
        }
    }
}
