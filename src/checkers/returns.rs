use tracing::debug;

use crate::checkers::emit;
use crate::engine::AnalysisContext;
use crate::ir::{AnnotatedSignature, NodeId, SourceLocation};
use crate::nullability::{InferredNullability, Nullability};
use crate::rules;
use crate::violation::{AssignmentSite, OverAnnotationSite, ReportingSink, Violation};

/// Treats a return statement as an assignment of the returned expression
/// into the formal return slot.
///
/// Lambdas expose no surface to annotate and conventionally-nullable
/// returns are annotated nowhere, so both are skipped.
pub fn check_return_not_nullable(
    enclosing: &AnnotatedSignature,
    returned: &InferredNullability,
    location: &SourceLocation,
    node: Option<NodeId>,
    sink: &mut dyn ReportingSink,
) {
    if enclosing.is_lambda || enclosing.ret_implicitly_nullable {
        debug!(procedure = %enclosing.name, "unannotatable return, skipping");
        return;
    }
    if rules::assignment_violates(
        enclosing.ret.nullability,
        returned.nullability,
        enclosing.mode,
    ) {
        emit(
            sink,
            Violation::BadAssignment {
                site: AssignmentSite::ReturningFromFunction {
                    procedure: enclosing.name.clone(),
                },
                rhs_origin: returned.origin.clone(),
            },
            location,
            &enclosing.name,
            node,
        );
    }
}

/// Compares the inferred nullability at the single return join point against
/// the declared return nullability.
///
/// The control-flow representation joins every return statement into one
/// point, so `observed` is an exact summary rather than an upper bound.
pub fn check_return_over_annotated(
    ctx: &AnalysisContext<'_>,
    enclosing: &AnnotatedSignature,
    observed: Nullability,
    location: &SourceLocation,
    sink: &mut dyn ReportingSink,
) {
    if !ctx.config.return_over_annotated_check {
        return;
    }
    if rules::over_annotation_violates(enclosing.ret.nullability, observed) {
        emit(
            sink,
            Violation::OverAnnotation {
                site: OverAnnotationSite::ReturnOverAnnotated {
                    procedure: enclosing.name.clone(),
                },
            },
            location,
            &enclosing.name,
            None,
        );
    }
}
