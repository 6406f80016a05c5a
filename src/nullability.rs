use std::fmt;

/// Three-level nullability lattice.
///
/// The declaration order is the lattice order, `StrictNonnull <
/// UncheckedNonnull < Nullable`, so `join` is the maximum under the derived
/// `Ord`. More nullable means more permissive.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum Nullability {
    /// Proven non-null under strict rules.
    StrictNonnull,
    /// Believed non-null on a best-effort basis, e.g. unannotated
    /// first-party code.
    UncheckedNonnull,
    /// May be null; top of the lattice.
    Nullable,
}

impl Nullability {
    /// The more permissive (more nullable) of the two values.
    pub fn join(self, other: Nullability) -> Nullability {
        self.max(other)
    }

    pub fn is_nonnull(self) -> bool {
        self != Nullability::Nullable
    }
}

impl fmt::Display for Nullability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Nullability::StrictNonnull => "@NonNull",
            Nullability::UncheckedNonnull => "unchecked @NonNull",
            Nullability::Nullable => "@Nullable",
        };
        f.write_str(text)
    }
}

/// Provenance of an inferred nullability value.
///
/// Opaque to the rules; carried for diagnostics plus the two suppression
/// predicates below.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Origin {
    /// Explicit annotation on the declaration.
    DeclaredAnnotation,
    /// The per-class default applied to an unannotated field.
    FieldDefault,
    /// Result of a call, flagged when the callee lives outside the analyzed
    /// code.
    CallResult { external: bool },
    /// No assignment observed on this path.
    Undef,
    /// Read of a field, with the provenance of the object it was read from.
    FieldRead { field: String, receiver: Box<Origin> },
    /// The `this` reference inside an instance method.
    ThisReference,
    /// Missing information treated as non-violating.
    OptimisticFallback,
}

impl Origin {
    pub fn is_external_call_result(&self) -> bool {
        matches!(self, Origin::CallResult { external: true })
    }

    /// A read of `field` off the receiver itself. `this.f = this.f` carries
    /// this origin and does not count as initializing `f`.
    pub fn is_self_referential_read(&self, field: &str) -> bool {
        match self {
            Origin::FieldRead {
                field: read,
                receiver,
            } => read == field && **receiver == Origin::ThisReference,
            _ => false,
        }
    }
}

/// Nullability together with its provenance at one program point.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InferredNullability {
    pub nullability: Nullability,
    pub origin: Origin,
}

impl InferredNullability {
    pub fn new(nullability: Nullability, origin: Origin) -> Self {
        Self {
            nullability,
            origin,
        }
    }
}

/// Per-class strictness level governing rule leniency.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NullsafeMode {
    Default,
    Strict(StrictVariant),
}

/// How a class ended up strict. The rules treat every strict class the same
/// way; the variant only feeds diagnostics.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StrictVariant {
    /// The class itself opted in.
    Explicit,
    /// Strictness flows from the enclosing scope.
    Inherited,
}

impl NullsafeMode {
    pub fn is_strict(self) -> bool {
        matches!(self, NullsafeMode::Strict(_))
    }

    pub fn is_default(self) -> bool {
        matches!(self, NullsafeMode::Default)
    }
}
