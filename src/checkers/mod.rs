pub mod assignment;
pub mod condition;
pub mod dereference;
pub mod field_init;
pub mod overrides;
pub mod returns;

use crate::ir::{NodeId, SourceLocation};
use crate::violation::{ReportingSink, Violation, ViolationReport};

/// Binds a violation to its program point and hands it to the sink. Every
/// rule failure maps to exactly one submission.
pub(crate) fn emit(
    sink: &mut dyn ReportingSink,
    violation: Violation,
    location: &SourceLocation,
    procedure: &str,
    node: Option<NodeId>,
) {
    sink.report(ViolationReport {
        violation,
        location: location.clone(),
        procedure: procedure.to_string(),
        node,
    });
}
