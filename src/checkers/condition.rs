use anyhow::Result;
use tracing::debug;

use crate::checkers::emit;
use crate::engine::AnalysisContext;
use crate::ir::{DeclaredType, LowLevelOp, NodeId, SourceLocation};
use crate::nullability::{InferredNullability, Nullability};
use crate::violation::{ReportingSink, Violation};

/// Flags an explicit comparison against the null literal whose outcome is
/// already decided by the typestate.
///
/// Only suppressions lower the report count below the lattice answer:
/// compiler temporaries, non-reference static types, external call results
/// (a lower-confidence signal) and desugared try-with-resources cleanup.
#[allow(clippy::too_many_arguments)]
pub fn check_condition_redundant(
    ctx: &AnalysisContext<'_>,
    procedure: &str,
    expression: &str,
    prior: &InferredNullability,
    ty: &DeclaredType,
    is_synthetic_temp: bool,
    location: &SourceLocation,
    node: Option<NodeId>,
    sink: &mut dyn ReportingSink,
) -> Result<()> {
    if !ctx.config.condition_redundant_check {
        return Ok(());
    }
    if prior.nullability == Nullability::Nullable {
        return Ok(());
    }
    if is_synthetic_temp || !ty.is_reference() {
        return Ok(());
    }
    if prior.origin.is_external_call_result() {
        debug!(procedure, expression, "external call result, suppressing redundancy report");
        return Ok(());
    }
    if looks_like_try_with_resources(ctx, procedure, location)? {
        debug!(procedure, expression, "try-with-resources cleanup, suppressing redundancy report");
        return Ok(());
    }
    let reconstructed = ctx.printer.describe_expression(procedure, node, expression);
    emit(
        sink,
        Violation::ConditionRedundant {
            expression: reconstructed,
        },
        location,
        procedure,
        node,
    );
    Ok(())
}

/// Textual detection of comparisons synthesized by try-with-resources
/// desugaring.
///
/// Pattern-matches the reconstructed source line rather than AST structure:
/// the line carries no equality or inequality operator yet contains a
/// closing brace, and some node at the exact same location tests
/// is-instance-of Throwable. Known precision gap; kept behind this one
/// predicate so a structural detector can replace it.
fn looks_like_try_with_resources(
    ctx: &AnalysisContext<'_>,
    procedure: &str,
    location: &SourceLocation,
) -> Result<bool> {
    let Some(line) = ctx.printer.line_at(location) else {
        return Ok(false);
    };
    if line.contains("==") || line.contains("!=") || !line.contains('}') {
        return Ok(false);
    }
    for node in ctx.cfg.nodes(procedure)? {
        if node.location == *location && node.ops.iter().any(is_throwable_instance_check) {
            return Ok(true);
        }
    }
    Ok(false)
}

fn is_throwable_instance_check(op: &LowLevelOp) -> bool {
    match op {
        LowLevelOp::InstanceOf(name) => {
            name == "Throwable" || name.ends_with("/Throwable") || name.ends_with(".Throwable")
        }
        LowLevelOp::Other => false,
    }
}
