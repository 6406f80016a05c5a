use crate::nullability::{Nullability, NullsafeMode};

/// Least trusted nullability that may still be dereferenced under `mode`.
pub fn minimum_safe_level(mode: NullsafeMode) -> Nullability {
    if mode.is_strict() {
        Nullability::StrictNonnull
    } else {
        Nullability::UncheckedNonnull
    }
}

/// Dereference rule: fails iff the value sits strictly above the mode's
/// minimum-safe level.
pub fn dereference_violates(inferred: Nullability, mode: NullsafeMode) -> bool {
    inferred > minimum_safe_level(mode)
}

/// True iff a value of nullability `rhs` may flow into a slot requiring
/// `lhs`.
///
/// Default mode extends relaxed treatment to unchecked targets: anything may
/// flow into an `UncheckedNonnull` slot there.
pub fn can_flow(rhs: Nullability, lhs: Nullability, mode: NullsafeMode) -> bool {
    rhs <= lhs || (lhs == Nullability::UncheckedNonnull && mode.is_default())
}

/// Assignment rule shared by plain assignment, field write, return and
/// parameter passing.
pub fn assignment_violates(lhs: Nullability, rhs: Nullability, mode: NullsafeMode) -> bool {
    !can_flow(rhs, lhs, mode)
}

/// Over-annotation rule: the declaration promises strictly more nullability
/// than was ever observed.
pub fn over_annotation_violates(declared: Nullability, observed: Nullability) -> bool {
    declared > observed
}

/// Contravariant parameter half of the override-variance rule: the base
/// declaration flows into the override slot.
pub fn override_param_violates(
    base: Nullability,
    overriding: Nullability,
    mode: NullsafeMode,
) -> bool {
    assignment_violates(overriding, base, mode)
}

/// Covariant return half: the override declaration flows into the base slot.
pub fn override_return_violates(
    base: Nullability,
    overriding: Nullability,
    mode: NullsafeMode,
) -> bool {
    assignment_violates(base, overriding, mode)
}
