use crate::ir::{NodeId, SourceLocation};
use crate::nullability::{Nullability, Origin};

/// Which kind of dereference tripped the rule.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DereferenceKind {
    FieldAccess,
    MethodCallReceiver,
}

/// Where a failed assignment happened.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AssignmentSite {
    AssigningToField {
        field: String,
    },
    ReturningFromFunction {
        procedure: String,
    },
    PassingParamToFunction {
        position: usize,
        formal: String,
        callee: String,
    },
}

/// Which declaration was found more permissive than anything observed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum OverAnnotationSite {
    FieldOverAnnotated { field: String },
    ReturnOverAnnotated { procedure: String },
}

/// Which half of an override pair disagrees with its base.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum OverrideSite {
    Param {
        position: usize,
        name: String,
        base: String,
        /// Declared nullability of the base parameter being narrowed.
        base_nullability: Nullability,
    },
    Return {
        base: String,
    },
}

/// Reportable outcome of one rule application.
///
/// Closed set: every consumer matches exhaustively, so adding a kind is a
/// compile-time-enforced checklist.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Violation {
    NullableDereference {
        origin: Origin,
        kind: DereferenceKind,
        /// Best-effort reconstruction of the dereferenced expression.
        expression: Option<String>,
    },
    BadAssignment {
        site: AssignmentSite,
        rhs_origin: Origin,
    },
    ConditionRedundant {
        expression: Option<String>,
    },
    FieldNotInitialized {
        field: String,
    },
    OverAnnotation {
        site: OverAnnotationSite,
    },
    InconsistentOverride {
        site: OverrideSite,
    },
}

/// A violation bound to the program point that produced it. Never mutated
/// after construction.
#[derive(Clone, Debug)]
pub struct ViolationReport {
    pub violation: Violation,
    pub location: SourceLocation,
    /// Enclosing procedure at the moment the rule fired.
    pub procedure: String,
    /// Per-instruction reference when one exists.
    pub node: Option<NodeId>,
}

/// Accepts finished reports. Deduplication and human-readable formatting
/// belong downstream of this interface.
pub trait ReportingSink {
    fn report(&mut self, report: ViolationReport);
}
