pub mod conflict;
pub mod domain;
pub mod extraction;
pub mod guard;
pub mod relevance;
pub mod surfacing;
pub mod utils;

pub use conflict::NumericConflictDetector;
pub use domain::DomainClassifier;
pub use extraction::{
    ExtractionPipeline, FactExtractor, FallbackExtractor, PatternExtractor, SemanticEdgeExtractor,
};
pub use guard::CredentialGuard;
pub use relevance::RelevanceFilter;
pub use surfacing::SurfacingOrchestrator;
