use std::cell::OnceCell;

use anyhow::Result;
use tracing::debug;

use crate::checkers::emit;
use crate::engine::AnalysisContext;
use crate::ir::{ClassAttributes, FieldAttributes, Typestate};
use crate::nullability::{Nullability, Origin};
use crate::rules;
use crate::violation::{OverAnnotationSite, ReportingSink, Violation};

/// The two typestate sets consulted while checking one constructor.
///
/// Collecting either set walks every constructor or initializer of the
/// class through the typestate provider, so both are fetched at most once
/// and shared across all fields.
pub struct ConstructorTypestates<'a> {
    ctx: &'a AnalysisContext<'a>,
    class: &'a ClassAttributes,
    constructor: &'a str,
    own: OnceCell<Vec<Typestate>>,
    all: OnceCell<Vec<Typestate>>,
}

impl<'a> ConstructorTypestates<'a> {
    pub fn new(
        ctx: &'a AnalysisContext<'a>,
        class: &'a ClassAttributes,
        constructor: &'a str,
    ) -> Self {
        Self {
            ctx,
            class,
            constructor,
            own: OnceCell::new(),
            all: OnceCell::new(),
        }
    }

    /// Final typestates of the constructor's own body plus every initializer
    /// method reachable from it.
    fn own_and_initializers(&self) -> Result<&[Typestate]> {
        if let Some(states) = self.own.get() {
            return Ok(states);
        }
        let mut states = self.ctx.typestates.final_typestates(self.constructor)?;
        for initializer in self.ctx.typestates.reachable_initializers(self.constructor)? {
            states.extend(self.ctx.typestates.final_typestates(&initializer)?);
        }
        Ok(self.own.get_or_init(|| states))
    }

    /// Final typestates of every constructor of the class, the current one
    /// included.
    fn all_constructors(&self) -> Result<&[Typestate]> {
        if let Some(states) = self.all.get() {
            return Ok(states);
        }
        let mut states = Vec::new();
        for constructor in &self.class.constructors {
            states.extend(self.ctx.typestates.final_typestates(constructor)?);
        }
        Ok(self.all.get_or_init(|| states))
    }
}

/// Checks every field declared in `class` against the typestates reached by
/// `constructor`.
///
/// Runs the initialization check and, gated separately, the field
/// over-annotation check.
pub fn check_constructor_fields(
    ctx: &AnalysisContext<'_>,
    class: &ClassAttributes,
    constructor: &str,
    sink: &mut dyn ReportingSink,
) -> Result<()> {
    let states = ConstructorTypestates::new(ctx, class, constructor);
    for field in &class.fields {
        if !field.ty.is_reference() || field.is_outer_instance || field.injector_readonly {
            continue;
        }
        check_field_initialized(ctx, class, constructor, field, &states, sink)?;
        check_field_over_annotated(ctx, constructor, field, &states, sink)?;
    }
    Ok(())
}

fn check_field_initialized(
    ctx: &AnalysisContext<'_>,
    class: &ClassAttributes,
    constructor: &str,
    field: &FieldAttributes,
    states: &ConstructorTypestates<'_>,
    sink: &mut dyn ReportingSink,
) -> Result<()> {
    if !field.nullability.is_nonnull() {
        return Ok(());
    }
    if ctx.config.disable_field_not_initialized_in_non_strict_classes && class.mode.is_default() {
        return Ok(());
    }
    let own = states.own_and_initializers()?;
    if own.is_empty() {
        debug!(constructor, field = %field.name, "no typestates for constructor, skipping");
        return Ok(());
    }
    let initialized = own.iter().any(|state| {
        state.get(&field.name).is_some_and(|entry| {
            entry.inferred.origin != Origin::Undef
                && !entry.inferred.origin.is_self_referential_read(&field.name)
        })
    });
    if !initialized {
        emit(
            sink,
            Violation::FieldNotInitialized {
                field: field.name.clone(),
            },
            &field.location,
            constructor,
            None,
        );
    }
    Ok(())
}

fn check_field_over_annotated(
    ctx: &AnalysisContext<'_>,
    constructor: &str,
    field: &FieldAttributes,
    states: &ConstructorTypestates<'_>,
    sink: &mut dyn ReportingSink,
) -> Result<()> {
    if !ctx.config.field_over_annotated_check {
        return Ok(());
    }
    let all = states.all_constructors()?;
    if all.is_empty() {
        return Ok(());
    }
    // A constructor path that never assigns the field is the weakest
    // evidence, so an absent entry contributes the top of the lattice.
    let observed = all.iter().fold(Nullability::StrictNonnull, |bound, state| {
        let term = state
            .get(&field.name)
            .map_or(Nullability::Nullable, |entry| entry.inferred.nullability);
        bound.join(term)
    });
    if rules::over_annotation_violates(field.nullability, observed) {
        emit(
            sink,
            Violation::OverAnnotation {
                site: OverAnnotationSite::FieldOverAnnotated {
                    field: field.name.clone(),
                },
            },
            &field.location,
            constructor,
            None,
        );
    }
    Ok(())
}
