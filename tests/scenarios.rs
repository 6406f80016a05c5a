//! End-to-end scenarios driving the checkers through an in-memory program
//! model, the way the surrounding fixpoint engine would.

use std::collections::BTreeMap;

use anyhow::Result;

use nullity::checkers::assignment::check_call_parameters;
use nullity::checkers::field_init::check_constructor_fields;
use nullity::checkers::overrides::check_overrides;
use nullity::engine::{
    CfgProvider, OverrideProvider, SignatureProvider, SourcePrinter, TypestateProvider,
};
use nullity::ir::{
    AnnotatedParam, AnnotatedSignature, AnnotatedType, CfgNode, ClassAttributes, DeclaredType,
    FieldAttributes, NodeId, SourceLocation, Typestate, TypestateEntry,
};
use nullity::report::{render_message, CollectingSink, SarifSink};
use nullity::{
    AnalysisConfig, AnalysisContext, InferredNullability, Nullability, NullsafeMode, Origin,
    ReportingSink, Violation, ViolationReport,
};

#[derive(Default)]
struct Model {
    classes: BTreeMap<String, ClassAttributes>,
    signatures: BTreeMap<String, AnnotatedSignature>,
    overrides: BTreeMap<String, Vec<String>>,
    typestates: BTreeMap<String, Vec<Typestate>>,
    initializers: BTreeMap<String, Vec<String>>,
}

impl SignatureProvider for Model {
    fn class_attributes(&self, class: &str) -> Option<&ClassAttributes> {
        self.classes.get(class)
    }

    fn method_signature(&self, procedure: &str) -> Option<&AnnotatedSignature> {
        self.signatures.get(procedure)
    }

    fn is_external(&self, procedure: &str) -> bool {
        self.signatures
            .get(procedure)
            .is_some_and(|signature| signature.is_external)
    }

    fn in_third_party_repository(&self, _procedure: &str) -> bool {
        false
    }
}

impl OverrideProvider for Model {
    fn overridden_methods(&self, procedure: &str) -> Vec<String> {
        self.overrides.get(procedure).cloned().unwrap_or_default()
    }
}

impl TypestateProvider for Model {
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

impl CfgProvider for Model {
    fn nodes(&self, _procedure: &str) -> Result<Vec<CfgNode>> {
        Ok(Vec::new())
    }
}

impl SourcePrinter for Model {
    fn describe_expression(
        &self,
        _procedure: &str,
        _node: Option<NodeId>,
        _expression: &str,
    ) -> Option<String> {
        None
    }

    fn line_at(&self, _location: &SourceLocation) -> Option<String> {
        None
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn context<'a>(model: &'a Model, config: &'a AnalysisConfig) -> AnalysisContext<'a> {
    AnalysisContext {
        signatures: model,
        overrides: model,
        typestates: model,
        cfg: model,
        printer: model,
        config,
    }
}

fn string_type() -> DeclaredType {
    DeclaredType::Reference("java/lang/String".to_string())
}

fn typestate_with(variable: &str, nullability: Nullability, origin: Origin) -> Typestate {
    let mut state = Typestate::new();
    state.insert(
        variable,
        TypestateEntry {
            ty: string_type(),
            inferred: InferredNullability::new(nullability, origin),
        },
    );
    state
}

// A constructor assigns `cache` only inside an if with no else. The engine
// hands back one typestate per path; on the skipped path the field keeps its
// Undef origin.
#[test]
fn field_assigned_on_one_branch_only_is_flagged_exactly_once() {
    init_tracing();
    let ctor = "com.example.Store.<init>()";
    let mut model = Model::default();
    model.typestates.insert(
        ctor.to_string(),
        vec![
            typestate_with("cache", Nullability::StrictNonnull, Origin::CallResult {
                external: false,
            }),
            typestate_with("cache", Nullability::Nullable, Origin::Undef),
        ],
    );
    let class = ClassAttributes {
        name: "com.example.Store".to_string(),
        mode: NullsafeMode::Default,
        fields: vec![FieldAttributes::new(
            "cache",
            string_type(),
            Nullability::UncheckedNonnull,
            SourceLocation::new("src/Store.java", 4),
        )],
        constructors: vec![ctor.to_string()],
    };
    let config = AnalysisConfig::default();
    let ctx = context(&model, &config);
    let mut sink = CollectingSink::default();

    check_constructor_fields(&ctx, &class, ctor, &mut sink).expect("field check");

    // One typestate still shows an assignment, so the field counts as
    // initialized on at least one path.
    assert!(sink.reports.is_empty());

    // Drop the assigning path and the report fires, once.
    model.typestates.insert(
        ctor.to_string(),
        vec![typestate_with("cache", Nullability::Nullable, Origin::Undef)],
    );
    let ctx = context(&model, &config);
    let mut sink = CollectingSink::default();
    check_constructor_fields(&ctx, &class, ctor, &mut sink).expect("field check");

    let flagged: Vec<&ViolationReport> = sink
        .reports
        .iter()
        .filter(|report| {
            matches!(
                &report.violation,
                Violation::FieldNotInitialized { field } if field == "cache"
            )
        })
        .collect();
    assert_eq!(1, flagged.len());
    assert_eq!(ctor, flagged[0].procedure);
}

#[test]
fn override_narrowing_a_nullable_parameter_is_flagged_at_its_position() {
    init_tracing();
    let base_name = "com.example.Handler.handle";
    let sub_name = "com.example.LoggingHandler.handle";

    let receiver = |owner: &str| AnnotatedParam {
        name: "this".to_string(),
        ty: DeclaredType::Reference(owner.to_string()),
        nullability: Nullability::StrictNonnull,
    };
    let payload = |nullability| AnnotatedParam {
        name: "payload".to_string(),
        ty: string_type(),
        nullability,
    };

    let mut base = AnnotatedSignature::new(
        base_name,
        AnnotatedType {
            ty: DeclaredType::Primitive("void".to_string()),
            nullability: Nullability::StrictNonnull,
        },
    );
    base.has_receiver = true;
    base.params = vec![receiver("com/example/Handler"), payload(Nullability::Nullable)];

    let mut sub = base.clone();
    sub.name = sub_name.to_string();
    sub.params = vec![
        receiver("com/example/LoggingHandler"),
        payload(Nullability::StrictNonnull),
    ];
    sub.location = SourceLocation::new("src/LoggingHandler.java", 9);

    let mut model = Model::default();
    model.signatures.insert(base_name.to_string(), base);
    model.signatures.insert(sub_name.to_string(), sub);
    model
        .overrides
        .insert(sub_name.to_string(), vec![base_name.to_string()]);
    let config = AnalysisConfig::default();
    let ctx = context(&model, &config);
    let mut sink = CollectingSink::default();

    check_overrides(&ctx, sub_name, &mut sink);

    assert_eq!(1, sink.reports.len());
    match &sink.reports[0].violation {
        Violation::InconsistentOverride {
            site:
                nullity::violation::OverrideSite::Param {
                    position,
                    name,
                    base,
                    base_nullability,
                },
        } => {
            assert_eq!(&1, position);
            assert_eq!("payload", name);
            assert_eq!(base_name, base);
            assert_eq!(&Nullability::Nullable, base_nullability);
        }
        other => panic!("unexpected violation {other:?}"),
    }
}

#[test]
fn optimistic_configuration_silences_unmodelled_external_callees() {
    init_tracing();
    let callee_name = "org.thirdparty.Api.send";
    let mut callee = AnnotatedSignature::new(
        callee_name,
        AnnotatedType {
            ty: DeclaredType::Primitive("void".to_string()),
            nullability: Nullability::StrictNonnull,
        },
    );
    callee.is_external = true;
    callee.params = vec![AnnotatedParam {
        name: "body".to_string(),
        ty: string_type(),
        nullability: Nullability::StrictNonnull,
    }];
    let mut model = Model::default();
    model.signatures.insert(callee_name.to_string(), callee);

    let actuals = [InferredNullability::new(
        Nullability::Nullable,
        Origin::CallResult { external: true },
    )];
    let location = SourceLocation::new("src/Client.java", 17);

    let relaxed = AnalysisConfig {
        optimistic_third_party_params_in_non_strict: true,
        ..AnalysisConfig::default()
    };
    let ctx = context(&model, &relaxed);
    let mut sink = CollectingSink::default();
    check_call_parameters(
        &ctx,
        "com.example.Client.push()",
        NullsafeMode::Default,
        callee_name,
        &actuals,
        &location,
        None,
        &mut sink,
    );
    assert!(sink.reports.is_empty());

    // Without the flag the same call is a violation.
    let pessimistic = AnalysisConfig::default();
    let ctx = context(&model, &pessimistic);
    let mut sink = CollectingSink::default();
    check_call_parameters(
        &ctx,
        "com.example.Client.push()",
        NullsafeMode::Default,
        callee_name,
        &actuals,
        &location,
        None,
        &mut sink,
    );
    assert_eq!(1, sink.reports.len());
    assert!(matches!(
        &sink.reports[0].violation,
        Violation::BadAssignment { .. }
    ));
}

#[test]
fn reports_render_into_deduplicated_sarif_results() {
    init_tracing();
    let report = ViolationReport {
        violation: Violation::FieldNotInitialized {
            field: "cache".to_string(),
        },
        location: SourceLocation::new("src/Store.java", 4),
        procedure: "com.example.Store.<init>()".to_string(),
        node: None,
    };
    let text = render_message(&report);
    assert!(text.contains("cache"));

    let mut sink = SarifSink::new();
    sink.report(report.clone());
    sink.report(report);
    let results = sink.into_results();
    assert_eq!(1, results.len());
    let message = results[0].message.text.as_deref().expect("message text");
    assert!(message.contains("cache"));
}
