// analysis module - organises pattern learning and suggestions into submodules

pub mod classifiers;
pub mod detection;
pub mod learning;
pub mod profile;
pub mod prompts;
pub mod suggestions;

// re-export key public items for convenient access
pub use classifiers::{default_classifiers, LineClassifier, PatternTag};
pub use detection::classify_document;
pub use learning::{AnalysisSession, LearningReport, PatternMiner};
pub use profile::{ProjectPatternProfile, StyleCategory};
pub use prompts::{build_explanation_prompt, build_focused_prompt, build_project_patterns_context};
pub use suggestions::{analyse_document, suggest_for_line, Finding, Severity};
