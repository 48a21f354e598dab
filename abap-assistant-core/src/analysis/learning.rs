// learning module - mines a project's naming and style conventions

use super::classifiers::{default_classifiers, is_comment, LineClassifier, PatternTag};
use super::profile::ProjectPatternProfile;
use crate::source::{LoadedSources, SourceDocument};
use serde::Serialize;
use tracing::debug;

/// default number of naming prefixes kept in `common_prefixes`
pub const DEFAULT_TOP_PREFIXES: usize = 5;

/// aggregates classifier output over a set of documents
pub struct PatternMiner {
    classifiers: Vec<Box<dyn LineClassifier>>,
    top_prefixes: usize,
}

impl Default for PatternMiner {
    fn default() -> Self {
        Self::new(default_classifiers(), DEFAULT_TOP_PREFIXES)
    }
}

impl PatternMiner {
    pub fn new(classifiers: Vec<Box<dyn LineClassifier>>, top_prefixes: usize) -> Self {
        Self {
            classifiers,
            top_prefixes,
        }
    }

    pub fn with_top_prefixes(mut self, top_prefixes: usize) -> Self {
        self.top_prefixes = top_prefixes;
        self
    }

    /// add a rule on top of the current set
    pub fn with_classifier(mut self, classifier: Box<dyn LineClassifier>) -> Self {
        self.classifiers.push(classifier);
        self
    }

    pub fn classifier_names(&self) -> Vec<&'static str> {
        self.classifiers.iter().map(|c| c.name()).collect()
    }

    /// build a fresh profile from the given documents
    pub fn learn(&self, documents: &[SourceDocument]) -> ProjectPatternProfile {
        self.learn_counting(documents).0
    }

    fn learn_counting(&self, documents: &[SourceDocument]) -> (ProjectPatternProfile, usize) {
        let mut profile = ProjectPatternProfile::default();
        let mut lines_classified = 0;

        for document in documents {
            for line in &document.lines {
                let trimmed = line.trim();
                if trimmed.is_empty() || is_comment(trimmed) {
                    continue;
                }
                lines_classified += 1;
                self.record_line(trimmed, &mut profile);
            }
        }

        profile.rank_common_prefixes(self.top_prefixes);
        debug!(
            "learned {} naming buckets and {} style categories from {} lines",
            profile.naming_frequency.len(),
            profile.style_frequency.len(),
            lines_classified
        );
        (profile, lines_classified)
    }

    fn record_line(&self, line: &str, profile: &mut ProjectPatternProfile) {
        for classifier in &self.classifiers {
            for tag in classifier.classify(line) {
                match tag {
                    PatternTag::Style(category) => profile.record_style(category),
                    naming => {
                        if let Some(bucket) = naming.naming_bucket() {
                            profile.record_naming(bucket);
                        }
                    }
                }
            }
        }
    }
}

/// summary of the last learning pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LearningReport {
    pub documents_analysed: usize,
    pub documents_skipped: usize,
    /// analysed documents whose read stopped early
    pub documents_partial: usize,
    pub lines_classified: usize,
}

/// one analysis session owning its miner and the profile it learned
///
/// sessions share nothing, so concurrent sessions over the same project
/// each hold an independent profile.
#[derive(Default)]
pub struct AnalysisSession {
    miner: PatternMiner,
    profile: ProjectPatternProfile,
    report: LearningReport,
}

impl AnalysisSession {
    pub fn new(miner: PatternMiner) -> Self {
        Self {
            miner,
            profile: ProjectPatternProfile::default(),
            report: LearningReport::default(),
        }
    }

    /// relearn from scratch, discarding the previous profile
    pub fn learn(&mut self, documents: &[SourceDocument]) -> &ProjectPatternProfile {
        self.learn_with_skipped(documents, 0)
    }

    /// relearn from a directory walk, counting the files it could not read
    pub fn learn_from_sources(&mut self, sources: &LoadedSources) -> &ProjectPatternProfile {
        self.learn_with_skipped(&sources.documents, sources.skipped.len())
    }

    fn learn_with_skipped(&mut self, documents: &[SourceDocument], skipped: usize) -> &ProjectPatternProfile {
        let (profile, lines_classified) = self.miner.learn_counting(documents);
        self.profile = profile;
        self.report = LearningReport {
            documents_analysed: documents.len(),
            documents_skipped: skipped,
            documents_partial: documents.iter().filter(|d| d.partial).count(),
            lines_classified,
        };
        &self.profile
    }

    pub fn profile(&self) -> &ProjectPatternProfile {
        &self.profile
    }

    pub fn report(&self) -> &LearningReport {
        &self.report
    }
}
