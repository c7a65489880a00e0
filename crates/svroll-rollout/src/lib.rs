//! The deploy orchestrator core: tolerance accounting, the worker pool,
//! the per-unit restart lifecycle, and the phase state machine.
//!
//! Everything here is pure/async Rust over the collaborator traits defined
//! in `svroll-core` — no filesystem, process, or CLI concerns live here.

pub mod accountant;
pub mod controller;
pub mod pool;
pub mod unit;

pub use accountant::ToleranceAccountant;
pub use controller::PhaseController;
pub use pool::WorkerPool;
pub use unit::UnitRestarter;
