use std::collections::BTreeMap;

use crate::nullability::{InferredNullability, Nullability, NullsafeMode};

// Program model consumed read-only by the checkers. Everything here is
// materialized by the external front end, signature loader and fixpoint
// engine before checking starts.

/// Source position attached to reports and CFG nodes.
#[derive(Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

/// Identifier of a CFG node within one procedure.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct NodeId(pub u32);

/// Declared type of a slot; the checkers only ever ask whether it is a
/// reference type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DeclaredType {
    Reference(String),
    Primitive(String),
}

impl DeclaredType {
    pub fn is_reference(&self) -> bool {
        matches!(self, DeclaredType::Reference(_))
    }
}

/// (declared type, inferred nullability) recorded for one variable at a
/// procedure exit.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TypestateEntry {
    pub ty: DeclaredType,
    pub inferred: InferredNullability,
}

/// Snapshot mapping variables to entries at one exit point of a procedure.
#[derive(Clone, Debug, Default)]
pub struct Typestate {
    entries: BTreeMap<String, TypestateEntry>,
}

impl Typestate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, variable: impl Into<String>, entry: TypestateEntry) {
        self.entries.insert(variable.into(), entry);
    }

    pub fn get(&self, variable: &str) -> Option<&TypestateEntry> {
        self.entries.get(variable)
    }
}

/// Return slot of an annotated signature.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AnnotatedType {
    pub ty: DeclaredType,
    pub nullability: Nullability,
}

/// One formal parameter of an annotated signature, in declaration order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AnnotatedParam {
    pub name: String,
    pub ty: DeclaredType,
    pub nullability: Nullability,
}

/// Where a behavior model for an external method came from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ModelSource {
    /// Shipped with the checker.
    Internal,
    /// Hand-written third-party signature repository.
    ThirdPartyRepository,
}

/// Declared contract of a method as loaded from the signature database.
#[derive(Clone, Debug)]
pub struct AnnotatedSignature {
    /// Qualified method name.
    pub name: String,
    pub ret: AnnotatedType,
    pub params: Vec<AnnotatedParam>,
    /// Strictness of the declaring class.
    pub mode: NullsafeMode,
    /// The method body is outside the analyzed code.
    pub is_external: bool,
    /// Lambdas expose no surface to annotate.
    pub is_lambda: bool,
    /// Recognized destructor or cleanup method.
    pub is_cleanup_method: bool,
    /// The method's own return is annotated as a cleanup context.
    pub ret_annotated_as_cleanup: bool,
    /// Return treated as nullable by convention, without a surface
    /// annotation.
    pub ret_implicitly_nullable: bool,
    /// The first parameter is the synthetic receiver of a virtual method.
    pub has_receiver: bool,
    pub model_source: Option<ModelSource>,
    /// Declaration site, used for reports with no better program point.
    pub location: SourceLocation,
}

impl AnnotatedSignature {
    /// A minimal first-party signature; callers flip the flags they need.
    pub fn new(name: impl Into<String>, ret: AnnotatedType) -> Self {
        Self {
            name: name.into(),
            ret,
            params: Vec::new(),
            mode: NullsafeMode::Default,
            is_external: false,
            is_lambda: false,
            is_cleanup_method: false,
            ret_annotated_as_cleanup: false,
            ret_implicitly_nullable: false,
            has_receiver: false,
            model_source: None,
            location: SourceLocation::default(),
        }
    }
}

/// Field metadata from the type database.
#[derive(Clone, Debug)]
pub struct FieldAttributes {
    pub name: String,
    pub ty: DeclaredType,
    /// Declared nullability, explicit or defaulted.
    pub nullability: Nullability,
    /// Declaration site.
    pub location: SourceLocation,
    /// Compiler-synthesized outer-instance field (`this$0` and friends).
    pub is_outer_instance: bool,
    /// Injector-managed, written by the framework only.
    pub injector_readonly: bool,
    /// Injector-managed, rewritten by the framework at will.
    pub injector_readwrite: bool,
}

impl FieldAttributes {
    pub fn new(
        name: impl Into<String>,
        ty: DeclaredType,
        nullability: Nullability,
        location: SourceLocation,
    ) -> Self {
        Self {
            name: name.into(),
            ty,
            nullability,
            location,
            is_outer_instance: false,
            injector_readonly: false,
            injector_readwrite: false,
        }
    }
}

/// Class metadata from the type database.
#[derive(Clone, Debug)]
pub struct ClassAttributes {
    pub name: String,
    pub mode: NullsafeMode,
    /// Fields declared directly in the class, synthesized ones included.
    pub fields: Vec<FieldAttributes>,
    /// Qualified names of every constructor of the class.
    pub constructors: Vec<String>,
}

/// Low-level operation recorded on a CFG node. Only instance-of tests matter
/// to this crate; everything else collapses to `Other`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LowLevelOp {
    InstanceOf(String),
    Other,
}

/// CFG node surface consumed by the condition-redundancy heuristic.
#[derive(Clone, Debug)]
pub struct CfgNode {
    pub id: NodeId,
    pub location: SourceLocation,
    pub ops: Vec<LowLevelOp>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nullability::Origin;

    #[test]
    fn typestate_lookup_by_variable() {
        let mut state = Typestate::new();
        state.insert(
            "this.cache",
            TypestateEntry {
                ty: DeclaredType::Reference("java/util/Map".to_string()),
                inferred: InferredNullability::new(
                    Nullability::StrictNonnull,
                    Origin::DeclaredAnnotation,
                ),
            },
        );
        assert!(state.get("this.cache").is_some());
        assert!(state.get("this.other").is_none());
    }

    #[test]
    fn reference_type_predicate() {
        assert!(DeclaredType::Reference("java/lang/String".to_string()).is_reference());
        assert!(!DeclaredType::Primitive("int".to_string()).is_reference());
    }
}
