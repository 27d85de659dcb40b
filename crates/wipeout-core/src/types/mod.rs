//! Validated value types shared by the engine, walker and orchestrator.
//!
//! Both types are checked when they are constructed: a `PassCount` is never
//! zero and a `Target` always records what was found at its path when it
//! was resolved.

pub mod pass_count;
pub mod target;

pub use pass_count::PassCount;
pub use target::Target;
pub use target::TargetKind;
