//! Edge-side execution of a planned strategy: drafting, cloud verification,
//! and the response/record assembly the orchestrator performs once a
//! `reasoning_engine::DecisionModule` has produced an `ExecutionPlan`.

pub mod confidence;
pub mod draft;
pub mod orchestrator;
pub mod verifier;

pub use confidence::{ConfidenceScorer, StrategyConfidenceScorer};
pub use draft::{DraftEngine, LocalDraftEngine};
pub use orchestrator::Orchestrator;
pub use verifier::{HttpVerifierClient, VerifierClient};
