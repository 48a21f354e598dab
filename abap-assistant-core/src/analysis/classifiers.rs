// classifier module - pluggable per-line pattern detection for abap sources

use super::profile::{StyleCategory, PREFIX_BUCKET, VAR_PREFIX_BUCKET};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// identifier directly followed by the TYPE keyword, e.g. `lv_name TYPE string`
    static ref DECLARED_IDENTIFIER: Regex = Regex::new(r"(?i)\b(\w+)\s+TYPE\b").unwrap();
    static ref EQ_KEYWORD: Regex = Regex::new(r"\bEQ\b").unwrap();
}

/// one match produced by a classifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatternTag {
    /// text before the first `_` of a declared identifier, lowercased
    NamingPrefix(String),
    /// first three characters of a declared identifier, lowercased
    VarPrefix(String),
    Style(StyleCategory),
}

impl PatternTag {
    /// frequency-map key under which the tag is counted
    pub fn naming_bucket(&self) -> Option<String> {
        match self {
            PatternTag::NamingPrefix(p) => Some(format!("{PREFIX_BUCKET}{p}")),
            PatternTag::VarPrefix(p) => Some(format!("{VAR_PREFIX_BUCKET}{p}")),
            PatternTag::Style(_) => None,
        }
    }
}

/// a rule that inspects one trimmed, non-comment line
pub trait LineClassifier: Send + Sync {
    fn name(&self) -> &'static str;
    fn classify(&self, line: &str) -> Vec<PatternTag>;
}

/// the classifiers used when none are supplied
pub fn default_classifiers() -> Vec<Box<dyn LineClassifier>> {
    vec![
        Box::new(NamingClassifier),
        Box::new(CallStyleClassifier),
        Box::new(LoopStyleClassifier),
        Box::new(ConditionalClassifier),
    ]
}

/// full-line abap comments start with `*` (column one) or `"`
pub fn is_comment(trimmed: &str) -> bool {
    trimmed.starts_with('*') || trimmed.starts_with('"')
}

/// true for `DATA:` / `DATA ` declaration lines
pub fn is_declaration(line: &str) -> bool {
    let upper = line.to_uppercase();
    upper.contains("DATA:") || upper.contains("DATA ")
}

/// identifiers declared on a line, in order of appearance
pub fn declared_identifiers(line: &str) -> Vec<&str> {
    if !is_declaration(line) {
        return Vec::new();
    }
    DECLARED_IDENTIFIER
        .captures_iter(line)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str())
        // `TYPE TYPE` cannot declare anything
        .filter(|ident| !ident.eq_ignore_ascii_case("DATA"))
        .collect()
}

/// lowercased text before the first `_`, if any
pub fn identifier_prefix(identifier: &str) -> Option<String> {
    let (head, _) = identifier.split_once('_')?;
    if head.is_empty() {
        None
    } else {
        Some(head.to_lowercase())
    }
}

/// true when a loop binds into a work area rather than a reference
pub fn has_plain_into(upper: &str) -> bool {
    let without_reference = upper.replace("REFERENCE INTO", "");
    without_reference
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .any(|word| word == "INTO")
}

pub struct NamingClassifier;

impl LineClassifier for NamingClassifier {
    fn name(&self) -> &'static str {
        "naming"
    }

    fn classify(&self, line: &str) -> Vec<PatternTag> {
        let mut tags = Vec::new();
        for ident in declared_identifiers(line) {
            if ident.chars().count() <= 2 {
                continue;
            }
            let short: String = ident.chars().take(3).collect();
            tags.push(PatternTag::VarPrefix(short.to_lowercase()));
            if let Some(prefix) = identifier_prefix(ident) {
                tags.push(PatternTag::NamingPrefix(prefix));
            }
        }
        tags
    }
}

pub struct CallStyleClassifier;

impl LineClassifier for CallStyleClassifier {
    fn name(&self) -> &'static str {
        "call-style"
    }

    fn classify(&self, line: &str) -> Vec<PatternTag> {
        if line.contains("->") {
            vec![PatternTag::Style(StyleCategory::ObjectOrientedCall)]
        } else if line.to_uppercase().contains("CALL METHOD") {
            vec![PatternTag::Style(StyleCategory::ProceduralCall)]
        } else {
            Vec::new()
        }
    }
}

pub struct LoopStyleClassifier;

impl LineClassifier for LoopStyleClassifier {
    fn name(&self) -> &'static str {
        "loop-style"
    }

    fn classify(&self, line: &str) -> Vec<PatternTag> {
        let upper = line.to_uppercase();
        if !upper.contains("LOOP AT") {
            return Vec::new();
        }

        // independent checks, a line may count towards several
        let mut tags = Vec::new();
        if has_plain_into(&upper) {
            tags.push(PatternTag::Style(StyleCategory::LoopInto));
        }
        if upper.contains("ASSIGNING") {
            tags.push(PatternTag::Style(StyleCategory::LoopAssigning));
        }
        if upper.contains("REFERENCE INTO") {
            tags.push(PatternTag::Style(StyleCategory::LoopReference));
        }
        tags
    }
}

pub struct ConditionalClassifier;

impl LineClassifier for ConditionalClassifier {
    fn name(&self) -> &'static str {
        "conditional-style"
    }

    fn classify(&self, line: &str) -> Vec<PatternTag> {
        let upper = line.to_uppercase();
        if !upper.starts_with("IF ") {
            return Vec::new();
        }

        let mut tags = Vec::new();
        if upper.contains("IS INITIAL") {
            tags.push(PatternTag::Style(StyleCategory::CheckInitial));
        }
        if upper.contains("IS NOT INITIAL") {
            tags.push(PatternTag::Style(StyleCategory::CheckNotInitial));
        }
        if upper.contains('=') || EQ_KEYWORD.is_match(&upper) {
            tags.push(PatternTag::Style(StyleCategory::EqualityCheck));
        }
        tags
    }
}
