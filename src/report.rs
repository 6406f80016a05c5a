use std::collections::BTreeSet;

use serde_sarif::sarif::{
    ArtifactLocation, Location, LogicalLocation, Message, PhysicalLocation, Region,
    Result as SarifResult,
};

use crate::nullability::Origin;
use crate::violation::{
    AssignmentSite, DereferenceKind, OverAnnotationSite, OverrideSite, ReportingSink, Violation,
    ViolationReport,
};

/// Sink that accumulates reports as-is, for tests and embedders that format
/// diagnostics themselves.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub reports: Vec<ViolationReport>,
}

impl ReportingSink for CollectingSink {
    fn report(&mut self, report: ViolationReport) {
        self.reports.push(report);
    }
}

/// Sink that renders each report into a SARIF result, deduplicating on
/// message, artifact, line and logical name.
#[derive(Default)]
pub struct SarifSink {
    results: Vec<SarifResult>,
    seen: BTreeSet<(String, String, i64, String)>,
}

impl SarifSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_results(self) -> Vec<SarifResult> {
        self.results
    }
}

impl ReportingSink for SarifSink {
    fn report(&mut self, report: ViolationReport) {
        let text = render_message(&report);
        let key = (
            text.clone(),
            report.location.file.clone(),
            report.location.line as i64,
            report.procedure.clone(),
        );
        if !self.seen.insert(key) {
            return;
        }
        let location = procedure_location(&report);
        self.results.push(
            SarifResult::builder()
                .message(Message::builder().text(text).build())
                .locations(vec![location])
                .build(),
        );
    }
}

fn procedure_location(report: &ViolationReport) -> Location {
    let logical = LogicalLocation::builder()
        .name(report.procedure.clone())
        .kind("function")
        .build();
    if report.location.file.is_empty() {
        return Location::builder().logical_locations(vec![logical]).build();
    }
    let artifact_location = ArtifactLocation::builder()
        .uri(report.location.file.clone())
        .build();
    let region = Region::builder()
        .start_line(report.location.line as i64)
        .build();
    let physical = PhysicalLocation::builder()
        .artifact_location(artifact_location)
        .region(region)
        .build();
    Location::builder()
        .logical_locations(vec![logical])
        .physical_location(physical)
        .build()
}

/// One-line message per violation kind, in the house style of the analysis.
pub fn render_message(report: &ViolationReport) -> String {
    match &report.violation {
        Violation::NullableDereference {
            origin,
            kind,
            expression,
        } => {
            let what = match kind {
                DereferenceKind::FieldAccess => "field access on",
                DereferenceKind::MethodCallReceiver => "call receiver",
            };
            let subject = expression
                .as_deref()
                .map(|text| format!("`{text}`"))
                .unwrap_or_else(|| "expression".to_string());
            format!(
                "Nullness issue: {what} {subject} may be null ({})",
                origin_note(origin)
            )
        }
        Violation::BadAssignment { site, rhs_origin } => match site {
            AssignmentSite::AssigningToField { field } => format!(
                "Nullness issue: assigning a possibly-null value ({}) to non-null field {field}",
                origin_note(rhs_origin)
            ),
            AssignmentSite::ReturningFromFunction { procedure } => format!(
                "Nullness issue: {procedure} may return null ({}) but its return is non-null",
                origin_note(rhs_origin)
            ),
            AssignmentSite::PassingParamToFunction {
                position,
                formal,
                callee,
            } => format!(
                "Nullness issue: passing a possibly-null value ({}) to non-null parameter {formal} (#{position}) of {callee}",
                origin_note(rhs_origin)
            ),
        },
        Violation::ConditionRedundant { expression } => {
            let subject = expression
                .as_deref()
                .map(|text| format!("`{text}`"))
                .unwrap_or_else(|| "the tested expression".to_string());
            format!("Redundant condition: {subject} is never null at this point")
        }
        Violation::FieldNotInitialized { field } => format!(
            "Field {field} is declared non-null but is not initialized by the constructor"
        ),
        Violation::OverAnnotation { site } => match site {
            OverAnnotationSite::FieldOverAnnotated { field } => {
                format!("Field {field} is declared @Nullable but is never null")
            }
            OverAnnotationSite::ReturnOverAnnotated { procedure } => {
                format!("Method {procedure} is declared @Nullable but never returns null")
            }
        },
        Violation::InconsistentOverride { site } => match site {
            OverrideSite::Param {
                position,
                name,
                base,
                base_nullability,
            } => format!(
                "Nullness override: parameter {name} (#{position}) narrows a parameter declared {base_nullability} in {base}"
            ),
            OverrideSite::Return { base } => format!(
                "Nullness override: {} returns a more nullable value than overridden {base}",
                report.procedure
            ),
        },
    }
}

fn origin_note(origin: &Origin) -> String {
    match origin {
        Origin::DeclaredAnnotation => "declared @Nullable".to_string(),
        Origin::FieldDefault => "field default".to_string(),
        Origin::CallResult { external: true } => "nullable result of an external call".to_string(),
        Origin::CallResult { external: false } => "nullable result of a call".to_string(),
        Origin::Undef => "may be uninitialized".to_string(),
        Origin::FieldRead { field, .. } => format!("read of field {field}"),
        Origin::ThisReference => "this reference".to_string(),
        Origin::OptimisticFallback => "assumed from missing information".to_string(),
    }
}
