//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, enums, errors)
//! - `document` - Document versions and the status state machine
//! - `family` - Versions sharing a base number
//! - `dependency` - Version-to-version dependency graph
//! - `audit` - Hash-chained transition records and dependency audit
//! - `workflow` - Transition planning, workflow instances and errors

pub mod audit;
pub mod dependency;
pub mod document;
pub mod family;
pub mod foundation;
pub mod workflow;
