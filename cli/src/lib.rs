//! Library half of the `oracle` command-line tool.

pub mod scenario;

pub use scenario::{Action, Scenario, ScenarioError, SimulationReport, Step, StepError};
