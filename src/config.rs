use serde::{Deserialize, Serialize};

/// Boolean switches consumed by the checkers.
///
/// Field names follow the downstream configuration file keys; loading and
/// merging configuration files is the caller's job.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisConfig {
    /// Enable the condition-redundancy heuristic.
    pub condition_redundant_check: bool,
    /// Enable the per-field over-annotation half of the constructor
    /// analysis.
    pub field_over_annotated_check: bool,
    /// Enable the return over-annotation check.
    pub return_over_annotated_check: bool,
    /// Suppress FieldNotInitialized in Default-mode classes. Strict classes
    /// are never suppressed.
    pub disable_field_not_initialized_in_non_strict_classes: bool,
    /// Skip parameter checks against unmodelled external callees in Default
    /// mode.
    pub optimistic_third_party_params_in_non_strict: bool,
}
