use super::reporter::Reporter;
use dgc_common::Diagnostic;
use dgc_common::diagnostics::diagnostic_codes;
use dgc_graph::{GraphSummary, build_component};
use dgc_model::{ClassKind, Markers, ModelBuilder};

const SOURCE: &str = "object AppModule {\n    fun provideA(): String = \"a\"\n}\n";

#[test]
fn formats_location_code_and_snippet() {
    let mut reporter = Reporter::new(false);
    reporter.add_source("App.kt", SOURCE);
    // `provideA` on line 2
    let start = SOURCE.find("provideA").unwrap() as u32;
    let diag = Diagnostic::new(
        "App.kt".to_string(),
        start,
        8,
        "No binding found for 'Clock'.".to_string(),
        diagnostic_codes::NO_BINDING_FOUND,
    );

    let text = reporter.format_diagnostic(&diag);
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("App.kt:2:9 - error DGC1001: No binding found for 'Clock'.")
    );
    assert_eq!(lines.next(), Some("    2       fun provideA(): String = \"a\""));
    assert_eq!(lines.next(), Some("                ~~~~~~~~"));
    assert_eq!(lines.next(), None);
}

#[test]
fn formats_related_information() {
    let mut reporter = Reporter::new(false);
    reporter.add_source("App.kt", SOURCE);
    let diag = Diagnostic::new(
        "App.kt".to_string(),
        0,
        0,
        "'String' is bound multiple times: a, b.".to_string(),
        diagnostic_codes::AMBIGUOUS_BINDINGS,
    )
    .with_related("App.kt".to_string(), 23, 0, "Candidate binding 'a' declared here.".to_string());

    let text = reporter.format_diagnostic(&diag);
    assert!(text.starts_with("App.kt:1:1 - error DGC1002:"), "{text}");
    assert!(
        text.contains("  Related: App.kt:2:5 - Candidate binding 'a' declared here."),
        "{text}"
    );
}

#[test]
fn unknown_files_fall_back_to_the_name() {
    let mut reporter = Reporter::new(false);
    let warning = Diagnostic::new(
        "does/not/exist.kt".to_string(),
        3,
        2,
        "'M' is listed as a module but is not marked as one.".to_string(),
        diagnostic_codes::MISSING_MODULE_MARKER,
    );
    let synthetic = Diagnostic::error(String::new(), 0, 0, "boom".to_string(), 1001);

    let text = reporter.render(&[warning, synthetic]);
    assert_eq!(
        text,
        "does/not/exist.kt - warning DGC2001: 'M' is listed as a module but is not marked as one.\n\
         <unknown> - error DGC1001: boom"
    );
}

#[test]
fn summary_line() {
    let reporter = Reporter::new(false);
    assert_eq!(reporter.format_summary(0, 0), "");
    assert_eq!(reporter.format_summary(1, 0), "Found 1 error.");
    assert_eq!(reporter.format_summary(0, 3), "Found 3 warnings.");
    assert_eq!(reporter.format_summary(2, 1), "Found 2 errors and 1 warning.");
}

#[test]
fn renders_graph_tree() {
    let mut b = ModelBuilder::new();
    let string = b.ty("String");
    let greeter = b.ty("Greeter");
    let module = b.ty("AppModule");
    let component = b.ty("AppComponent");

    let module_decl = b.add_class(module, ClassKind::Object);
    b.mark(module_decl, Markers::MODULE);
    let provide = b.add_function(module, "provideName", &[], string);
    b.mark(provide, Markers::PROVIDES);
    let ctor = b.add_constructor(greeter, &[("name", string)]);
    b.mark(ctor, Markers::INJECT);
    b.add_class(component, ClassKind::Interface);
    b.add_function(component, "greeter", &[], greeter);
    b.add_function(component, "other", &[], greeter);
    b.add_component(component, &[module], &[]);
    let model = b.finish();

    let output = build_component(&model, &model.components()[0]);
    let summary = GraphSummary::new(&output, &model);
    let text = Reporter::new(false).render_graph(&summary);

    assert_eq!(
        text,
        "AppComponent\n\
         \x20 greeter(): Greeter\n\
         \x20   Greeter <- Greeter constructor (constructor)\n\
         \x20     String <- AppModule.provideName (static_function)\n\
         \x20 other(): Greeter\n\
         \x20   Greeter <- Greeter constructor (constructor) ...\n"
    );
}
