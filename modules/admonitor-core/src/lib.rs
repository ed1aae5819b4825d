pub mod classify;
pub mod config;
pub mod domains;
pub mod pipeline;
pub mod traits;
pub mod types;

pub use classify::{build_classifier, AdsLibraryClassifier, HeuristicClassifier};
pub use config::{ClassifierKind, Config, ConfigError};
pub use domains::{extract_domain, query_domain, PlatformFilter};
pub use pipeline::{filter_hits, FilterOutcome, Pipeline, PipelineOutput};
pub use traits::{AdClassifier, ScanSearch};
pub use types::{AdStatus, Candidate, Classification, Indicator, SiteResult};
