//! # rxzk-harness: Scenario Harness
//!
//! Drives named input assignments through witness construction, proving and
//! verification, and checks each observed outcome against the declared
//! expectation:
//!
//! - [`scenario`]: properties, expectations, observations, scenario kinds.
//! - [`catalog`]: the standard catalog.
//! - [`runner`]: setup once, fresh scenarios (optionally parallel), then
//!   binding probes.
//! - [`report`]: the returned [`ScenarioReport`].
//!
//! "Expected fail, observed fail" is a pass. Only a divergence from the
//! expectation, or a setup failure, is a failure.

pub mod catalog;
pub mod error;
pub mod report;
pub mod runner;
pub mod scenario;

pub use catalog::{baseline, standard_catalog};
pub use error::HarnessError;
pub use report::{PropertySummary, ScenarioRecord, ScenarioReport};
pub use runner::ScenarioRunner;
pub use scenario::{Expectation, Observation, Scenario, ScenarioKind, SecurityProperty};
