//! Shared types, config validation, and external-collaborator traits for svroll.
//!
//! # Components
//!
//! - **`types`** — service names, per-unit outcomes, deploy results
//! - **`config`** — the immutable per-run deploy configuration
//! - **`plan`** — the derived canary/rollout plan computed from config + services
//! - **`traits`** — the interfaces the core consumes (executor, enumerator, log sink, metrics sink)
//! - **`error`** — precondition and enumeration error types

pub mod config;
pub mod error;
pub mod plan;
pub mod traits;
pub mod types;

pub use config::DeployConfig;
pub use error::{ConfigError, EnumerateError};
pub use plan::Plan;
pub use traits::{
    Latch, LatchHandle, LockSource, LogSink, MetricsSink, RestartExecutor, ServiceEnumerator,
};
pub use types::{DeployResult, Outcome};
