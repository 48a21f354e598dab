// detection module - content-based sniffing of abap documents
//
// best effort only: false positives and negatives are expected.

use super::classifiers::is_comment;
use crate::source::SourceDocument;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

/// default number of non-empty lines inspected
pub const DEFAULT_LINE_BUDGET: usize = 50;

const ABAP_KEYWORDS: &[&str] = &[
    "DATA:", "DATA ", "TYPES:", "TYPES ",
    "METHOD ", "ENDMETHOD", "CLASS ", "ENDCLASS",
    "FORM ", "ENDFORM", "FUNCTION ", "ENDFUNCTION",
    "SELECT ", "FROM ", "INTO ", "WHERE ",
    "LOOP AT", "ENDLOOP", "IF ", "ENDIF",
    "CASE ", "ENDCASE", "DO ", "ENDDO",
    "WHILE ", "ENDWHILE", "TRY", "ENDTRY",
    "WRITE", "MESSAGE", "APPEND", "CLEAR",
    "CALL METHOD", "CALL FUNCTION", "PERFORM",
    "IMPORT", "EXPORT", "TABLES", "USING",
    "CHANGING", "RETURNING", "EXCEPTIONS",
    "IS INITIAL", "IS NOT INITIAL", "TYPE ",
    "LIKE ", "VALUE ", "REFERENCE INTO",
    "FIELD-SYMBOL", "ASSIGN", "UNASSIGN",
];

lazy_static! {
    static ref QUOTED_ASSIGNMENT: Regex = Regex::new(r"\w+\s*=\s*'.*'").unwrap();
    static ref LENGTH_DECLARATION: Regex = Regex::new(r"\w+\(\s*\d+\s*\)").unwrap();
}

/// first abap marker found on an uppercased line
fn abap_marker(upper: &str) -> Option<&'static str> {
    if let Some(keyword) = ABAP_KEYWORDS.iter().copied().find(|k| upper.contains(k)) {
        return Some(keyword);
    }
    if upper.contains("->") {
        return Some("->");
    }
    if upper.contains("=>") {
        return Some("=>");
    }
    if QUOTED_ASSIGNMENT.is_match(upper) {
        return Some("quoted-assignment");
    }
    if LENGTH_DECLARATION.is_match(upper) {
        return Some("length-declaration");
    }
    None
}

/// permissive check on a document name for abap-ish files
pub fn has_abap_like_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.ends_with(".abap") || lower.ends_with(".txt") || lower.contains("abap") || !lower.contains('.')
}

/// decide whether a document looks like abap source
///
/// inspects at most `line_budget` non-empty lines. two distinct markers are
/// enough; a single marker also needs an abap-ish document name.
pub fn classify_document(document: &SourceDocument, line_budget: usize) -> bool {
    let mut markers: HashSet<&'static str> = HashSet::new();
    let mut inspected = 0;

    for line in &document.lines {
        if inspected >= line_budget {
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        inspected += 1;
        if is_comment(trimmed) {
            continue;
        }

        if let Some(marker) = abap_marker(&trimmed.to_uppercase()) {
            markers.insert(marker);
            if markers.len() >= 2 {
                return true;
            }
        }
    }

    markers.len() == 1 && has_abap_like_name(&document.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_distinct_markers_classify_as_abap() {
        let doc = SourceDocument::from_text(
            "zcl_thing.clas",
            "CLASS zcl_thing DEFINITION.\n  METHODS run.\nENDCLASS.",
        );
        assert!(classify_document(&doc, DEFAULT_LINE_BUDGET));
    }

    #[test]
    fn repeated_single_marker_needs_abap_name() {
        let text = "WRITE 'a'.\nWRITE 'b'.\nWRITE 'c'.";
        assert!(!classify_document(&SourceDocument::from_text("notes.md", text), 50));
        assert!(classify_document(&SourceDocument::from_text("zreport.abap", text), 50));
        assert!(classify_document(&SourceDocument::from_text("ZREPORT", text), 50));
    }

    #[test]
    fn non_abap_text_is_rejected() {
        let doc = SourceDocument::from_text("main.rs", "fn main() {\n    println!(\"hi\");\n}");
        assert!(!classify_document(&doc, 50));
    }

    #[test]
    fn markers_beyond_budget_are_not_seen() {
        let mut text = String::new();
        for _ in 0..3 {
            text.push_str("hello world\n\n");
        }
        text.push_str("CLASS zcl_x DEFINITION.\nENDCLASS.\n");
        let doc = SourceDocument::from_text("late.md", &text);
        assert!(!classify_document(&doc, 3));
        // blank lines do not consume the budget
        assert!(classify_document(&doc, 5));
    }

    #[test]
    fn comment_lines_are_not_hits() {
        let doc = SourceDocument::from_text("x.md", "* DATA: lv_a TYPE i.\n* LOOP AT lt_a INTO ls_a.");
        assert!(!classify_document(&doc, 50));
    }

    #[test]
    fn name_heuristic() {
        assert!(has_abap_like_name("ZABAP_UTILS.prog"));
        assert!(has_abap_like_name("report.txt"));
        assert!(has_abap_like_name("Makefile"));
        assert!(!has_abap_like_name("index.html"));
    }
}
