pub mod adaptive;
pub mod decision;
pub mod hard_constraints;
pub mod history;
pub mod planner;
pub mod scorer;

pub use adaptive::AdaptiveThresholdCalculator;
pub use decision::{DecisionModule, StatisticsSummary};
pub use hard_constraints::{HardConstraintChecker, HardDecision};
pub use history::HistoryTracker;
pub use planner::ExecutionPlanner;
pub use scorer::{MultiObjectiveScorer, ScoredStrategy};
