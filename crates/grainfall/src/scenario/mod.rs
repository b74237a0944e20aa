//! Scripted scenarios
//!
//! A scenario is a RON file describing a world, the drawing and timing
//! actions to apply to it, and the conditions it must meet afterwards.

pub mod actions;
pub mod definition;
pub mod executor;
pub mod results;
pub mod verification;

pub use actions::ScenarioAction;
pub use definition::ScenarioDefinition;
pub use executor::{ScenarioExecutor, ScenarioExecutorConfig};
pub use results::{ExecutionReport, PerformanceMetrics};
pub use verification::{Region, VerificationCondition, VerificationResult};
