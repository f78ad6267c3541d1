//! labscan: turns a model-written lab report into typed test records and
//! splits each record's advice into titled, categorized sections.

pub mod batch;
pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod report;

pub use config::{CategoryRule, WhoRanges};
pub use error::ConfigError;
pub use model::{AdviceCategory, AdviceSection, TestResult};
pub use parser::blocks::extract;
pub use parser::sections::{classify, AdviceClassifier};
pub use parser::status::Severity;
pub use parser::{analyze, AnalyzedEntry, AnalyzedReport};
