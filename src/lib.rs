//! Decision core of a flow-sensitive nullability checker for JVM-style
//! reference types.
//!
//! The surrounding toolchain lowers source to a CFG, runs a per-procedure
//! fixpoint and materializes annotation databases; this crate holds the
//! policy that turns those artifacts into reports. Collaborators are
//! abstracted behind the traits in [`engine`], pure rule predicates live in
//! [`rules`], and the per-site orchestration lives under [`checkers`].

pub mod checkers;
pub mod config;
pub mod engine;
pub mod ir;
pub mod nullability;
pub mod report;
pub mod rules;
pub mod violation;

#[cfg(test)]
mod testutil;

pub use config::AnalysisConfig;
pub use engine::AnalysisContext;
pub use nullability::{InferredNullability, Nullability, NullsafeMode, Origin, StrictVariant};
pub use violation::{ReportingSink, Violation, ViolationReport};
