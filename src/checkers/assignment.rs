use tracing::debug;

use crate::checkers::emit;
use crate::engine::AnalysisContext;
use crate::ir::{AnnotatedSignature, FieldAttributes, NodeId, SourceLocation};
use crate::nullability::{InferredNullability, NullsafeMode};
use crate::rules;
use crate::violation::{AssignmentSite, ReportingSink, Violation};

/// Checks a write of `rhs` into a field of the enclosing class.
///
/// Exempt writes: non-reference fields, synthesized outer-instance fields,
/// injector-managed read-write fields, and writes inside cleanup methods or
/// methods whose return is annotated as a cleanup context, which tear down
/// state on purpose.
pub fn check_field_write(
    enclosing: &AnnotatedSignature,
    field: &FieldAttributes,
    rhs: &InferredNullability,
    location: &SourceLocation,
    node: Option<NodeId>,
    sink: &mut dyn ReportingSink,
) {
    if !field.ty.is_reference() || field.is_outer_instance || field.injector_readwrite {
        return;
    }
    if enclosing.is_cleanup_method || enclosing.ret_annotated_as_cleanup {
        debug!(
            procedure = %enclosing.name,
            field = %field.name,
            "cleanup context, skipping field write check"
        );
        return;
    }
    if rules::assignment_violates(field.nullability, rhs.nullability, enclosing.mode) {
        emit(
            sink,
            Violation::BadAssignment {
                site: AssignmentSite::AssigningToField {
                    field: field.name.clone(),
                },
                rhs_origin: rhs.origin.clone(),
            },
            location,
            &enclosing.name,
            node,
        );
    }
}

/// Pairs each actual argument, in declaration order, with its formal
/// parameter and applies the assignment rule per position.
///
/// The whole pass is skipped for unmodelled external callees under the
/// optimistic third-party configuration, and on actual/formal arity
/// mismatch; there is no partial iteration.
#[allow(clippy::too_many_arguments)]
pub fn check_call_parameters(
    ctx: &AnalysisContext<'_>,
    procedure: &str,
    mode: NullsafeMode,
    callee: &str,
    actuals: &[InferredNullability],
    location: &SourceLocation,
    node: Option<NodeId>,
    sink: &mut dyn ReportingSink,
) {
    let Some(callee_signature) = ctx.signatures.method_signature(callee) else {
        return;
    };
    if unmodelled_external_callee(ctx, mode, callee, callee_signature) {
        debug!(procedure, callee, "optimistic third-party callee, skipping parameter check");
        return;
    }
    if actuals.len() != callee_signature.params.len() {
        debug!(
            procedure,
            callee,
            actuals = actuals.len(),
            formals = callee_signature.params.len(),
            "arity mismatch, skipping parameter check"
        );
        return;
    }
    for (index, (actual, formal)) in actuals.iter().zip(&callee_signature.params).enumerate() {
        if !formal.ty.is_reference() {
            continue;
        }
        if rules::assignment_violates(formal.nullability, actual.nullability, mode) {
            let position = param_position(callee_signature, index);
            emit(
                sink,
                Violation::BadAssignment {
                    site: AssignmentSite::PassingParamToFunction {
                        position,
                        formal: formal.name.clone(),
                        callee: callee_signature.name.clone(),
                    },
                    rhs_origin: actual.origin.clone(),
                },
                location,
                procedure,
                node,
            );
        }
    }
}

// Positions count from 0 when the signature's first parameter is the
// synthetic receiver, from 1 otherwise, to match the downstream diagnostic
// numbering scheme.
fn param_position(signature: &AnnotatedSignature, index: usize) -> usize {
    if signature.has_receiver { index } else { index + 1 }
}

/// Unannotated external APIs would otherwise dominate false positives, so
/// parameter checks against them are dropped wholesale under Default mode
/// when the callee carries no behavior model.
fn unmodelled_external_callee(
    ctx: &AnalysisContext<'_>,
    mode: NullsafeMode,
    callee: &str,
    signature: &AnnotatedSignature,
) -> bool {
    if !ctx.config.optimistic_third_party_params_in_non_strict || !mode.is_default() {
        return false;
    }
    if signature.model_source.is_some() {
        return false;
    }
    signature.is_external
        || ctx.signatures.in_third_party_repository(callee)
        || ctx.signatures.is_external(callee)
}
