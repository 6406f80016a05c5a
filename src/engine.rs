use anyhow::Result;

use crate::config::AnalysisConfig;
use crate::ir::{AnnotatedSignature, CfgNode, ClassAttributes, NodeId, SourceLocation, Typestate};

/// Resolves classes and method contracts from the annotation/signature
/// database. Populated once before checking starts and never mutated while
/// checks run.
pub trait SignatureProvider {
    fn class_attributes(&self, class: &str) -> Option<&ClassAttributes>;
    fn method_signature(&self, procedure: &str) -> Option<&AnnotatedSignature>;
    /// True when the method body lives outside the analyzed code.
    fn is_external(&self, procedure: &str) -> bool;
    /// True when the method appears in the hand-written third-party
    /// signature repository.
    fn in_third_party_repository(&self, procedure: &str) -> bool;
}

/// Enumerates every method a given method immediately or transitively
/// overrides.
pub trait OverrideProvider {
    fn overridden_methods(&self, procedure: &str) -> Vec<String>;
}

/// Access to the per-procedure fixpoint results.
pub trait TypestateProvider {
    /// Final typestates, one per exit path of the procedure.
    fn final_typestates(&self, procedure: &str) -> Result<Vec<Typestate>>;
    /// Initializer methods reachable from the given constructor.
    fn reachable_initializers(&self, constructor: &str) -> Result<Vec<String>>;
}

/// Read access to the control-flow representation.
pub trait CfgProvider {
    fn nodes(&self, procedure: &str) -> Result<Vec<CfgNode>>;
}

/// Best-effort reconstruction of source text. Diagnostics-only and allowed
/// to give up; a `None` never blocks a report.
pub trait SourcePrinter {
    fn describe_expression(
        &self,
        procedure: &str,
        node: Option<NodeId>,
        expression: &str,
    ) -> Option<String>;
    /// Raw source line at a location, for the textual heuristics.
    fn line_at(&self, location: &SourceLocation) -> Option<String>;
}

/// Handles shared by every checker entry point.
///
/// All referenced repositories are read-only; the context owns no mutable
/// state, so one context may serve any number of procedures.
pub struct AnalysisContext<'a> {
    pub signatures: &'a dyn SignatureProvider,
    pub overrides: &'a dyn OverrideProvider,
    pub typestates: &'a dyn TypestateProvider,
    pub cfg: &'a dyn CfgProvider,
    pub printer: &'a dyn SourcePrinter,
    pub config: &'a AnalysisConfig,
}
