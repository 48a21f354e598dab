// diff module - line-level lcs diff used for refactor previews

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Unchanged,
    Added,
    Removed,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Unchanged => write!(f, "unchanged"),
            ChangeKind::Added => write!(f, "added"),
            ChangeKind::Removed => write!(f, "removed"),
        }
    }
}

/// one row of a diff
///
/// line numbers are 1-based. unchanged rows carry both, added rows only the
/// revised number and removed rows only the original number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffLine {
    content: String,
    kind: ChangeKind,
    original_line: Option<usize>,
    new_line: Option<usize>,
}

impl DiffLine {
    pub fn unchanged(content: impl Into<String>, original_line: usize, new_line: usize) -> Self {
        Self {
            content: content.into(),
            kind: ChangeKind::Unchanged,
            original_line: Some(original_line),
            new_line: Some(new_line),
        }
    }

    pub fn added(content: impl Into<String>, new_line: usize) -> Self {
        Self {
            content: content.into(),
            kind: ChangeKind::Added,
            original_line: None,
            new_line: Some(new_line),
        }
    }

    pub fn removed(content: impl Into<String>, original_line: usize) -> Self {
        Self {
            content: content.into(),
            kind: ChangeKind::Removed,
            original_line: Some(original_line),
            new_line: None,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    pub fn original_line(&self) -> Option<usize> {
        self.original_line
    }

    pub fn new_line(&self) -> Option<usize> {
        self.new_line
    }

    /// number shown in a single gutter: revised side first
    pub fn display_line(&self) -> usize {
        self.new_line.or(self.original_line).unwrap_or(0)
    }
}

/// diff two line sequences with whole-line, exact equality
///
/// when the lcs table ties, the revised side is consumed first while walking
/// back from the end, so a substitution renders as removal then addition.
pub fn diff_lines<S: AsRef<str>>(original: &[S], revised: &[S]) -> Vec<DiffLine> {
    let table = lcs_table(original, revised);

    let mut i = original.len();
    let mut j = revised.len();
    let mut reversed = Vec::with_capacity(i + j);

    while i > 0 || j > 0 {
        if i > 0 && j > 0 && original[i - 1].as_ref() == revised[j - 1].as_ref() {
            reversed.push(DiffLine::unchanged(original[i - 1].as_ref(), i, j));
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || table[i][j - 1] >= table[i - 1][j]) {
            reversed.push(DiffLine::added(revised[j - 1].as_ref(), j));
            j -= 1;
        } else {
            reversed.push(DiffLine::removed(original[i - 1].as_ref(), i));
            i -= 1;
        }
    }

    reversed.reverse();
    reversed
}

/// split two text blobs into lines and diff them
pub fn diff_text(original: &str, revised: &str) -> Vec<DiffLine> {
    let original: Vec<&str> = original.lines().collect();
    let revised: Vec<&str> = revised.lines().collect();
    diff_lines(&original, &revised)
}

fn lcs_table<S: AsRef<str>>(a: &[S], b: &[S]) -> Vec<Vec<usize>> {
    let mut table = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for i in 1..=a.len() {
        for j in 1..=b.len() {
            table[i][j] = if a[i - 1].as_ref() == b[j - 1].as_ref() {
                table[i - 1][j - 1] + 1
            } else {
                table[i - 1][j].max(table[i][j - 1])
            };
        }
    }
    table
}

/// per-kind line counts of a diff
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffStats {
    pub added: usize,
    pub removed: usize,
    pub unchanged: usize,
}

impl DiffStats {
    pub fn from_diff(diff: &[DiffLine]) -> Self {
        diff.iter().fold(Self::default(), |mut stats, line| {
            match line.kind() {
                ChangeKind::Added => stats.added += 1,
                ChangeKind::Removed => stats.removed += 1,
                ChangeKind::Unchanged => stats.unchanged += 1,
            }
            stats
        })
    }

    pub fn has_changes(&self) -> bool {
        self.added > 0 || self.removed > 0
    }
}

impl fmt::Display for DiffStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+{}  -{}", self.added, self.removed)
    }
}

/// marker printed in front of a row's content
pub fn change_marker(kind: ChangeKind) -> &'static str {
    match kind {
        ChangeKind::Added => "+ ",
        ChangeKind::Removed => "- ",
        ChangeKind::Unchanged => "  ",
    }
}

/// one `nnn | <marker><content>` row, without the trailing newline
pub fn format_row(line: &DiffLine) -> String {
    format!(
        "{:>3} | {}{}",
        line.display_line(),
        change_marker(line.kind()),
        line.content()
    )
}

/// render a diff as `nnn | <marker><content>` rows
pub fn format_with_line_numbers(diff: &[DiffLine]) -> String {
    let mut out = String::new();
    for line in diff {
        out.push_str(&format_row(line));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn kinds(diff: &[DiffLine]) -> Vec<(ChangeKind, &str)> {
        diff.iter().map(|l| (l.kind(), l.content())).collect()
    }

    fn keep(diff: &[DiffLine], side: ChangeKind) -> Vec<String> {
        diff.iter()
            .filter(|l| l.kind() == ChangeKind::Unchanged || l.kind() == side)
            .map(|l| l.content().to_string())
            .collect()
    }

    #[test]
    fn single_substitution() {
        let diff = diff_lines(&["a", "b", "c"], &["a", "x", "c"]);
        assert_eq!(
            kinds(&diff),
            vec![
                (ChangeKind::Unchanged, "a"),
                (ChangeKind::Removed, "b"),
                (ChangeKind::Added, "x"),
                (ChangeKind::Unchanged, "c"),
            ]
        );
        let stats = DiffStats::from_diff(&diff);
        assert_eq!(stats, DiffStats { added: 1, removed: 1, unchanged: 2 });
    }

    #[test]
    fn line_numbers_track_both_sides() {
        let diff = diff_lines(&["a", "b", "c"], &["a", "x", "c"]);
        assert_eq!(diff[0].original_line(), Some(1));
        assert_eq!(diff[0].new_line(), Some(1));
        assert_eq!(diff[1].original_line(), Some(2));
        assert_eq!(diff[1].new_line(), None);
        assert_eq!(diff[2].original_line(), None);
        assert_eq!(diff[2].new_line(), Some(2));
        assert_eq!(diff[3].original_line(), Some(3));
        assert_eq!(diff[3].new_line(), Some(3));
    }

    #[test]
    fn empty_sides() {
        let empty: [&str; 0] = [];
        let added = diff_lines(&empty, &["a", "b"]);
        assert!(added.iter().all(|l| l.kind() == ChangeKind::Added));
        assert_eq!(added.len(), 2);

        let removed = diff_lines(&["a", "b", "c"], &empty);
        assert!(removed.iter().all(|l| l.kind() == ChangeKind::Removed));
        assert_eq!(removed.len(), 3);

        assert!(diff_lines(&empty, &empty).is_empty());
    }

    #[test]
    fn comparison_is_case_and_whitespace_sensitive() {
        let diff = diff_lines(&["DATA x TYPE i."], &["data x type i."]);
        assert_eq!(DiffStats::from_diff(&diff), DiffStats { added: 1, removed: 1, unchanged: 0 });

        let diff = diff_lines(&["  WRITE a."], &["WRITE a."]);
        assert_eq!(DiffStats::from_diff(&diff).unchanged, 0);
    }

    #[test]
    fn insertion_in_the_middle() {
        let diff = diff_lines(&["a", "c"], &["a", "b", "c"]);
        assert_eq!(
            kinds(&diff),
            vec![
                (ChangeKind::Unchanged, "a"),
                (ChangeKind::Added, "b"),
                (ChangeKind::Unchanged, "c"),
            ]
        );
        assert_eq!(diff[2].original_line(), Some(2));
        assert_eq!(diff[2].new_line(), Some(3));
    }

    #[test]
    fn diff_text_normalises_line_endings() {
        let diff = diff_text("a\r\nb\r\n", "a\nb\nc\n");
        assert_eq!(DiffStats::from_diff(&diff), DiffStats { added: 1, removed: 0, unchanged: 2 });
    }

    #[test]
    fn formatting_uses_revised_number_first() {
        let diff = diff_lines(&["a", "b"], &["a", "x"]);
        assert_eq!(
            format_with_line_numbers(&diff),
            "  1 |   a\n  2 | - b\n  2 | + x\n"
        );
        assert_eq!(DiffStats::from_diff(&diff).to_string(), "+1  -1");
    }

    #[test]
    fn single_row_matches_full_rendering() {
        let diff = diff_lines(&["a", "b"], &["a", "x", "b"]);
        let rows: Vec<String> = diff.iter().map(format_row).collect();
        assert_eq!(rows, vec!["  1 |   a", "  2 | + x", "  3 |   b"]);
        assert_eq!(format_with_line_numbers(&diff), rows.join("\n") + "\n");
    }

    fn small_lines() -> impl Strategy<Value = Vec<String>> {
        proptest::collection::vec("[abc]{0,2}", 0..12)
    }

    proptest! {
        #[test]
        fn round_trip_reconstructs_both_sides(original in small_lines(), revised in small_lines()) {
            let diff = diff_lines(&original, &revised);
            prop_assert_eq!(keep(&diff, ChangeKind::Added), revised.clone());
            prop_assert_eq!(keep(&diff, ChangeKind::Removed), original.clone());
            prop_assert!(diff.iter().all(|l| l.original_line().is_some() || l.new_line().is_some()));
        }

        #[test]
        fn identical_inputs_are_unchanged(lines in small_lines()) {
            let diff = diff_lines(&lines, &lines);
            prop_assert_eq!(diff.len(), lines.len());
            for (idx, line) in diff.iter().enumerate() {
                prop_assert_eq!(line.kind(), ChangeKind::Unchanged);
                prop_assert_eq!(line.content(), lines[idx].as_str());
                prop_assert_eq!(line.original_line(), Some(idx + 1));
                prop_assert_eq!(line.new_line(), Some(idx + 1));
            }
        }

        #[test]
        fn diff_size_matches_lcs(original in small_lines(), revised in small_lines()) {
            let diff = diff_lines(&original, &revised);
            let stats = DiffStats::from_diff(&diff);
            prop_assert_eq!(stats.unchanged + stats.removed, original.len());
            prop_assert_eq!(stats.unchanged + stats.added, revised.len());
        }
    }
}
