use tracing::debug;

use crate::checkers::emit;
use crate::engine::AnalysisContext;
use crate::rules;
use crate::violation::{OverrideSite, ReportingSink, Violation};

/// Checks a method's declared nullability against every method it overrides.
///
/// Parameters are contravariant: the base declaration must be acceptable to
/// the override slot. Returns are covariant and checked only against
/// first-party bases, since an external base cannot be annotated.
pub fn check_overrides(ctx: &AnalysisContext<'_>, procedure: &str, sink: &mut dyn ReportingSink) {
    let Some(overriding) = ctx.signatures.method_signature(procedure) else {
        debug!(procedure, "no signature for overriding method, skipping");
        return;
    };
    for base_name in ctx.overrides.overridden_methods(procedure) {
        let Some(base) = ctx.signatures.method_signature(&base_name) else {
            debug!(procedure, base = %base_name, "no signature for base method, skipping");
            continue;
        };

        if !base.is_external
            && rules::override_return_violates(
                base.ret.nullability,
                overriding.ret.nullability,
                overriding.mode,
            )
        {
            emit(
                sink,
                Violation::InconsistentOverride {
                    site: OverrideSite::Return {
                        base: base.name.clone(),
                    },
                },
                &overriding.location,
                procedure,
                None,
            );
        }

        if base.params.len() != overriding.params.len() {
            debug!(
                procedure,
                base = %base_name,
                "parameter arity mismatch, skipping pairwise check"
            );
            continue;
        }
        for (index, (base_param, over_param)) in
            base.params.iter().zip(&overriding.params).enumerate()
        {
            if !over_param.ty.is_reference() {
                continue;
            }
            if rules::override_param_violates(
                base_param.nullability,
                over_param.nullability,
                overriding.mode,
            ) {
                let position = if base.has_receiver { index } else { index + 1 };
                emit(
                    sink,
                    Violation::InconsistentOverride {
                        site: OverrideSite::Param {
                            position,
                            name: over_param.name.clone(),
                            base: base.name.clone(),
                            base_nullability: base_param.nullability,
                        },
                    },
                    &overriding.location,
                    procedure,
                    None,
                );
            }
        }
    }
}
