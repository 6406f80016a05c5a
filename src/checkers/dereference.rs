use tracing::debug;

use crate::checkers::emit;
use crate::engine::AnalysisContext;
use crate::ir::{NodeId, SourceLocation, Typestate};
use crate::nullability::{InferredNullability, NullsafeMode};
use crate::rules;
use crate::violation::{DereferenceKind, ReportingSink, Violation};

/// Checks an object about to be dereferenced.
///
/// On failure the dereferenced expression is reconstructed best-effort for
/// the diagnostic; a missing reconstruction never blocks the report.
#[allow(clippy::too_many_arguments)]
pub fn check_dereference(
    ctx: &AnalysisContext<'_>,
    procedure: &str,
    expression: &str,
    inferred: &InferredNullability,
    kind: DereferenceKind,
    mode: NullsafeMode,
    location: &SourceLocation,
    node: Option<NodeId>,
    sink: &mut dyn ReportingSink,
) {
    if !rules::dereference_violates(inferred.nullability, mode) {
        return;
    }
    let reconstructed = ctx.printer.describe_expression(procedure, node, expression);
    emit(
        sink,
        Violation::NullableDereference {
            origin: inferred.origin.clone(),
            kind,
            expression: reconstructed,
        },
        location,
        procedure,
        node,
    );
}

/// Resolves the implicit receiver of a virtual call from the typestate and
/// applies the dereference rule to it.
#[allow(clippy::too_many_arguments)]
pub fn check_call_receiver(
    ctx: &AnalysisContext<'_>,
    procedure: &str,
    typestate: &Typestate,
    receiver: &str,
    callee: &str,
    mode: NullsafeMode,
    location: &SourceLocation,
    node: Option<NodeId>,
    sink: &mut dyn ReportingSink,
) {
    let Some(entry) = typestate.get(receiver) else {
        debug!(procedure, receiver, callee, "receiver missing from typestate, skipping");
        return;
    };
    check_dereference(
        ctx,
        procedure,
        receiver,
        &entry.inferred,
        DereferenceKind::MethodCallReceiver,
        mode,
        location,
        node,
        sink,
    );
}
