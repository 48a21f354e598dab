// profile module - aggregated naming and style statistics for a project

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// key prefix of naming buckets that feed `common_prefixes`
pub const PREFIX_BUCKET: &str = "prefix_";

/// key prefix of the informational three-character buckets
pub const VAR_PREFIX_BUCKET: &str = "var_prefix_";

/// named style categories counted by the miner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StyleCategory {
    ObjectOrientedCall,
    ProceduralCall,
    LoopInto,
    LoopAssigning,
    LoopReference,
    CheckInitial,
    CheckNotInitial,
    EqualityCheck,
}

impl StyleCategory {
    pub const ALL: [StyleCategory; 8] = [
        StyleCategory::ObjectOrientedCall,
        StyleCategory::ProceduralCall,
        StyleCategory::LoopInto,
        StyleCategory::LoopAssigning,
        StyleCategory::LoopReference,
        StyleCategory::CheckInitial,
        StyleCategory::CheckNotInitial,
        StyleCategory::EqualityCheck,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StyleCategory::ObjectOrientedCall => "object-oriented-call",
            StyleCategory::ProceduralCall => "procedural-call",
            StyleCategory::LoopInto => "loop-into",
            StyleCategory::LoopAssigning => "loop-assigning",
            StyleCategory::LoopReference => "loop-reference",
            StyleCategory::CheckInitial => "check-initial",
            StyleCategory::CheckNotInitial => "check-not-initial",
            StyleCategory::EqualityCheck => "equality-check",
        }
    }
}

impl fmt::Display for StyleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// statistical fingerprint of a project's conventions
///
/// rebuilt from scratch on every learning pass, never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPatternProfile {
    /// `prefix_<p>` and `var_prefix_<abc>` buckets in first-seen order
    pub naming_frequency: IndexMap<String, usize>,
    pub style_frequency: IndexMap<StyleCategory, usize>,
    /// top naming prefixes, most frequent first
    pub common_prefixes: Vec<String>,
}

impl ProjectPatternProfile {
    pub fn is_empty(&self) -> bool {
        self.naming_frequency.is_empty() && self.style_frequency.is_empty()
    }

    pub fn style_count(&self, category: StyleCategory) -> usize {
        self.style_frequency.get(&category).copied().unwrap_or(0)
    }

    pub fn naming_count(&self, bucket: &str) -> usize {
        self.naming_frequency.get(bucket).copied().unwrap_or(0)
    }

    pub(crate) fn record_naming(&mut self, bucket: String) {
        *self.naming_frequency.entry(bucket).or_insert(0) += 1;
    }

    pub(crate) fn record_style(&mut self, category: StyleCategory) {
        *self.style_frequency.entry(category).or_insert(0) += 1;
    }

    /// rank `prefix_*` buckets by count; ties keep first-seen order
    pub(crate) fn rank_common_prefixes(&mut self, limit: usize) {
        let mut ranked: Vec<(&String, &usize)> = self
            .naming_frequency
            .iter()
            .filter(|(key, _)| key.starts_with(PREFIX_BUCKET))
            .collect();
        // sort_by is stable, so equal counts stay in insertion order
        ranked.sort_by(|a, b| b.1.cmp(a.1));

        self.common_prefixes = ranked
            .into_iter()
            .take(limit)
            .map(|(key, _)| key[PREFIX_BUCKET.len()..].to_string())
            .collect();
    }

    /// the counts most worth showing, highest first
    pub fn top_naming_buckets(&self, limit: usize) -> Vec<(&str, usize)> {
        let mut buckets: Vec<(&str, usize)> = self
            .naming_frequency
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        buckets.sort_by(|a, b| b.1.cmp(&a.1));
        buckets.truncate(limit);
        buckets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranking_breaks_ties_by_first_seen() {
        let mut profile = ProjectPatternProfile::default();
        for bucket in ["prefix_gv", "prefix_lv", "var_prefix_lv_", "prefix_lv", "prefix_ls", "prefix_gv"] {
            profile.record_naming(bucket.to_string());
        }
        profile.rank_common_prefixes(5);
        assert_eq!(profile.common_prefixes, vec!["gv", "lv", "ls"]);
    }

    #[test]
    fn ranking_honours_limit() {
        let mut profile = ProjectPatternProfile::default();
        for p in ["a", "b", "c", "d", "e", "f"] {
            profile.record_naming(format!("{PREFIX_BUCKET}{p}"));
        }
        profile.record_naming("prefix_f".to_string());
        profile.rank_common_prefixes(5);
        assert_eq!(profile.common_prefixes, vec!["f", "a", "b", "c", "d"]);
    }

    #[test]
    fn style_categories_serialise_kebab_case() {
        let json = serde_json::to_string(&StyleCategory::CheckNotInitial).unwrap();
        assert_eq!(json, "\"check-not-initial\"");
        for category in StyleCategory::ALL {
            assert_eq!(
                serde_json::to_string(&category).unwrap(),
                format!("\"{}\"", category.as_str())
            );
        }
    }

    #[test]
    fn missing_counts_default_to_zero() {
        let profile = ProjectPatternProfile::default();
        assert!(profile.is_empty());
        assert_eq!(profile.style_count(StyleCategory::LoopInto), 0);
        assert_eq!(profile.naming_count("prefix_lv"), 0);
    }
}
