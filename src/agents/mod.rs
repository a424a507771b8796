//! Coordinator + worker orchestration.
//!
//! The pipeline for one request is strictly sequential:
//!
//! 1. `planner`: turn the request into an [`plan::ExecutionPlan`]
//! 2. `executor`: run each task in order, threading results by placeholder
//! 3. `synthesizer`: return the lone result verbatim, or have the writer
//!    combine the result table into prose
//!
//! `workers` holds the capability-bound executors (research, weather,
//! writer); `coordinator` owns their lifecycle and is the only entry point
//! external callers use.

pub mod coordinator;
pub mod executor;
pub mod plan;
pub mod planner;
pub mod synthesizer;
pub mod workers;
