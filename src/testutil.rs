use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;

use crate::config::AnalysisConfig;
use crate::engine::{
    AnalysisContext, CfgProvider, OverrideProvider, SignatureProvider, SourcePrinter,
    TypestateProvider,
};
use crate::ir::{
    AnnotatedSignature, AnnotatedType, CfgNode, ClassAttributes, DeclaredType, NodeId,
    SourceLocation, Typestate, TypestateEntry,
};
use crate::nullability::{InferredNullability, Nullability, Origin};

/// In-memory program model implementing every collaborator interface, for
/// unit tests of the checkers.
#[derive(Default)]
pub(crate) struct ProgramModel {
    pub(crate) classes: BTreeMap<String, ClassAttributes>,
    pub(crate) signatures: BTreeMap<String, AnnotatedSignature>,
    pub(crate) external: BTreeSet<String>,
    pub(crate) third_party: BTreeSet<String>,
    pub(crate) overrides: BTreeMap<String, Vec<String>>,
    pub(crate) typestates: BTreeMap<String, Vec<Typestate>>,
    pub(crate) initializers: BTreeMap<String, Vec<String>>,
    pub(crate) nodes: BTreeMap<String, Vec<CfgNode>>,
    pub(crate) source_lines: BTreeMap<(String, u32), String>,
    pub(crate) descriptions: BTreeMap<String, String>,
}

impl ProgramModel {
    pub(crate) fn add_signature(&mut self, signature: AnnotatedSignature) {
        self.signatures.insert(signature.name.clone(), signature);
    }
}

impl SignatureProvider for ProgramModel {
    fn class_attributes(&self, class: &str) -> Option<&ClassAttributes> {
        self.classes.get(class)
    }

    fn method_signature(&self, procedure: &str) -> Option<&AnnotatedSignature> {
        self.signatures.get(procedure)
    }

    fn is_external(&self, procedure: &str) -> bool {
        self.external.contains(procedure)
            || self
                .signatures
                .get(procedure)
                .is_some_and(|signature| signature.is_external)
    }

    fn in_third_party_repository(&self, procedure: &str) -> bool {
        self.third_party.contains(procedure)
    }
}

impl OverrideProvider for ProgramModel {
    fn overridden_methods(&self, procedure: &str) -> Vec<String> {
        self.overrides.get(procedure).cloned().unwrap_or_default()
    }
}

impl TypestateProvider for ProgramModel {
    fn final_typestates(&self, procedure: &str) -> Result<Vec<Typestate>> {
        Ok(self.typestates.get(procedure).cloned().unwrap_or_default())
    }

    fn reachable_initializers(&self, constructor: &str) -> Result<Vec<String>> {
        Ok(self
            .initializers
            .get(constructor)
            .cloned()
            .unwrap_or_default())
    }
}

impl CfgProvider for ProgramModel {
    fn nodes(&self, procedure: &str) -> Result<Vec<CfgNode>> {
        Ok(self.nodes.get(procedure).cloned().unwrap_or_default())
    }
}

impl SourcePrinter for ProgramModel {
    fn describe_expression(
        &self,
        _procedure: &str,
        _node: Option<NodeId>,
        expression: &str,
    ) -> Option<String> {
        self.descriptions.get(expression).cloned()
    }

    fn line_at(&self, location: &SourceLocation) -> Option<String> {
        self.source_lines
            .get(&(location.file.clone(), location.line))
            .cloned()
    }
}

pub(crate) fn context<'a>(
    model: &'a ProgramModel,
    config: &'a AnalysisConfig,
) -> AnalysisContext<'a> {
    AnalysisContext {
        signatures: model,
        overrides: model,
        typestates: model,
        cfg: model,
        printer: model,
        config,
    }
}

pub(crate) fn reference(name: &str) -> DeclaredType {
    DeclaredType::Reference(name.to_string())
}

pub(crate) fn annotated(name: &str, nullability: Nullability) -> AnnotatedType {
    AnnotatedType {
        ty: reference(name),
        nullability,
    }
}

pub(crate) fn inferred(nullability: Nullability, origin: Origin) -> InferredNullability {
    InferredNullability::new(nullability, origin)
}

pub(crate) fn entry(ty: DeclaredType, value: InferredNullability) -> TypestateEntry {
    TypestateEntry {
        ty,
        inferred: value,
    }
}
