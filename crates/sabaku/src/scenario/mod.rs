//! RON-scripted scenarios
//!
//! A scenario sizes and seeds a world, runs setup and main actions against
//! it, then checks verification conditions and reports the outcome.

mod actions;
mod definition;
mod executor;
mod results;
mod verification;

pub use actions::ScenarioAction;
pub use definition::ScenarioDefinition;
pub use executor::{ScenarioExecutor, ScenarioExecutorConfig};
pub use results::ExecutionReport;
pub use verification::{Region, VerificationCondition, VerificationResult};
