pub mod config;
pub mod coverage;
pub mod extraction;
pub mod requirement;
pub mod test_artifact;

pub use config::{Config, CoverageThresholds};
pub use coverage::{CoverageGap, CoverageReport, CoverageStats, MatchType, Severity, TestMatch};
pub use requirement::{Category, Priority, Requirement, SourceDocument};
pub use test_artifact::{GeneratedTestCase, TestArtifact};
