//! End-to-end tests for the dependency graph compiler
//!
//! These tests drive the whole pipeline from manifest text:
//! - Lowering manifests into a declaration model
//! - Eager binding and endpoint resolution
//! - Graph building, sharing and cycle breaking
//! - Diagnostics with source positions

use std::path::PathBuf;

use dgc::binder::{BindingKind, BindingVariant};
use dgc::cli::driver::check_model;
use dgc::cli::manifest::{LoadedManifest, lower_manifests, parse_manifest};
use dgc::graph::{BuildOutput, GraphSummary, build_component};
use dgc::model::DeclarationModel;

/// Helper to lower one manifest
fn model_from(source: &str) -> DeclarationModel {
    let manifest = LoadedManifest {
        path: PathBuf::from("test.dgc.json"),
        manifest: parse_manifest(source).expect("manifest should parse"),
    };
    lower_manifests(&[manifest]).expect("manifest should lower")
}

/// Helper to build the component called `name`
fn build(model: &DeclarationModel, name: &str) -> BuildOutput {
    let component = model
        .components()
        .iter()
        .find(|c| model.type_name(c.ty) == name)
        .expect("component should exist");
    build_component(model, component)
}

const APP: &str = r#"{
  "source": "src/App.kt",
  "classes": [
    { "name": "NetworkModule", "kind": "object", "module": true, "includes": ["DbModule"],
      "functions": [
        { "name": "provideBaseUrl", "returns": "String", "provides": true, "qualifiers": ["BaseUrl"] },
        { "name": "provideUserAgent", "returns": "String", "provides": true, "qualifiers": ["UserAgent"] },
        { "name": "provideClient", "returns": "HttpClient", "provides": true, "scopes": ["Singleton"],
          "params": [
            { "name": "url", "type": "String", "qualifiers": ["BaseUrl"] },
            { "name": "agent", "type": "String", "qualifiers": ["UserAgent"] }
          ] }
      ] },
    { "name": "DbModule", "kind": "class", "module": true,
      "functions": [{ "name": "provideDb", "returns": "Database", "provides": true }] },
    { "name": "Repo",
      "constructors": [{ "inject": true, "params": [
        { "name": "client", "type": "HttpClient" },
        { "name": "db", "type": "Database" },
        { "name": "token", "type": "Token" }
      ] }] },
    { "name": "AuthComponent", "kind": "interface",
      "functions": [{ "name": "token", "returns": "Token" }] },
    { "name": "Activity",
      "properties": [{ "name": "repo", "type": "Provider<Repo>", "inject": true }],
      "functions": [{ "name": "setClient", "inject": true,
                      "params": [{ "name": "client", "type": "HttpClient" }] }] },
    { "name": "AppComponent", "kind": "interface", "scopes": ["Singleton"],
      "functions": [
        { "name": "repo", "returns": "Repo" },
        { "name": "inject", "params": [{ "name": "activity", "type": "Activity" }] },
        { "name": "toString", "returns": "String" }
      ] }
  ],
  "components": [
    { "name": "AppComponent", "modules": ["NetworkModule"], "dependencies": ["AuthComponent"] }
  ]
}"#;

#[test]
fn test_full_component_resolves_cleanly() {
    let model = model_from(APP);
    let output = build(&model, "AppComponent");

    assert!(
        output.errors.is_empty(),
        "Expected no diagnostics, got: {:?}",
        output.diagnostics(&model)
    );
    assert!(output.is_renderable());
    // `toString` is a universal method, not an endpoint.
    assert_eq!(output.results.len(), 2);
    assert!(output.results.iter().all(|r| r.is_complete()));

    let kinds: Vec<BindingKind> = output
        .distinct_bindings()
        .into_iter()
        .map(|id| output.graph.binding(id).kind())
        .collect();
    for expected in [
        BindingKind::Constructor,
        BindingKind::StaticFunction,
        BindingKind::InstanceFunction,
        BindingKind::BoundInstance,
        BindingKind::Provider,
    ] {
        assert!(kinds.contains(&expected), "missing {expected:?} in {kinds:?}");
    }
}

#[test]
fn test_endpoints_share_nodes() {
    let model = model_from(APP);
    let output = build(&model, "AppComponent");
    let graph = &output.graph;

    let repo = output.results[0].roots[0].node;
    let repo_node = graph.node(repo);
    assert_eq!(graph.value(repo).kind(), BindingKind::Constructor);
    assert_eq!(repo_node.dependencies.len(), 3);

    let injection = &output.results[1];
    assert!(!injection.endpoint.is_exposed());
    assert_eq!(injection.roots.len(), 2);

    // Provider<Repo> wraps the very node the provision returns.
    let provider = injection.roots[0].node;
    assert_eq!(graph.value(provider).kind(), BindingKind::Provider);
    assert_eq!(graph.node(provider).dependencies.as_slice(), &[repo]);

    // The setter gets the same scoped client the repo was built with.
    let client = injection.roots[1].node;
    assert_eq!(repo_node.dependencies[0], client);
    assert!(graph.value(client).is_scoped());
}

#[test]
fn test_instance_bindings_have_owner_instances() {
    let model = model_from(APP);
    let output = build(&model, "AppComponent");
    let graph = &output.graph;

    let repo = graph.node(output.results[0].roots[0].node);
    let db = repo.dependencies[1];
    let token = repo.dependencies[2];

    for node in [db, token] {
        assert_eq!(graph.value(node).kind(), BindingKind::InstanceFunction);
        let owner = graph.node(node).dependencies[0];
        assert_eq!(graph.value(owner).kind(), BindingKind::BoundInstance);
    }
}

#[test]
fn test_build_is_deterministic() {
    let model = model_from(APP);
    let first = GraphSummary::new(&build(&model, "AppComponent"), &model);
    let second = GraphSummary::new(&build(&model, "AppComponent"), &model);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_lazy_cycle_is_broken_and_patched() {
    let model = model_from(
        r#"{
          "classes": [
            { "name": "A", "constructors": [{ "inject": true, "params": [{ "name": "b", "type": "B" }] }] },
            { "name": "B", "constructors": [{ "inject": true, "params": [{ "name": "a", "type": "Lazy<A>" }] }] },
            { "name": "C", "kind": "interface", "functions": [{ "name": "a", "returns": "A" }] }
          ],
          "components": [{ "name": "C" }]
        }"#,
    );
    let output = build(&model, "C");
    assert!(output.errors.is_empty());
    assert!(output.is_renderable());

    let graph = &output.graph;
    let a = output.results[0].roots[0].node;
    let b = graph.node(a).dependencies[0];
    let lazy = graph.node(b).dependencies[0];
    assert_eq!(graph.value(lazy).kind(), BindingKind::Lazy);

    let placeholder = graph.node(lazy).dependencies[0];
    assert!(matches!(
        graph.value(placeholder).variant,
        BindingVariant::Recursive { .. }
    ));
    assert_eq!(graph.resolve(placeholder), a);
    assert_eq!(graph.unpatched_placeholders().count(), 0);

    // The generator sees A once, not once per reference.
    let distinct = output.distinct_bindings();
    let a_binding = graph.node(a).binding;
    assert_eq!(distinct.iter().filter(|&&id| id == a_binding).count(), 1);
}

#[test]
fn test_diagnostics_point_at_requesting_declarations() {
    let model = model_from(
        r#"{
          "source": "src/Broken.kt",
          "classes": [
            { "name": "Cache", "scopes": ["Singleton"], "constructors": [{ "inject": true }] },
            { "name": "BrokenComponent", "kind": "interface",
              "functions": [
                { "name": "cache", "returns": "Cache", "span": [40, 5] },
                { "name": "clock", "returns": "Clock", "span": [60, 5] }
              ] }
          ],
          "components": [{ "name": "BrokenComponent" }]
        }"#,
    );
    let output = build(&model, "BrokenComponent");
    assert!(!output.is_renderable());

    let diagnostics = output.diagnostics(&model);
    assert_eq!(diagnostics.len(), 2);
    assert_eq!(
        diagnostics[0].message_text,
        "Binding for 'Cache' is scoped with [@Singleton], but the component only declares []."
    );
    assert_eq!(diagnostics[0].file, "src/Broken.kt");
    assert_eq!(diagnostics[0].start, 40);
    assert_eq!(diagnostics[1].message_text, "No binding found for 'Clock'.");
    assert_eq!(diagnostics[1].start, 60);
}

#[test]
fn test_explicit_creator_binds_qualified_instance() {
    let model = model_from(
        r#"{
          "classes": [
            { "name": "C", "kind": "interface",
              "functions": [{ "name": "debug", "returns": "Boolean", "qualifiers": ["Debug"] }] }
          ],
          "components": [
            { "name": "C", "creator": { "kind": "builder", "params": [
              { "name": "debug", "type": "Boolean", "qualifiers": ["Debug"], "bindsInstance": true }
            ] } }
          ]
        }"#,
    );
    let output = build(&model, "C");
    assert!(output.errors.is_empty());
    let root = output.results[0].roots[0].node;
    assert_eq!(output.graph.value(root).kind(), BindingKind::BoundInstance);
    assert_eq!(output.graph.value(root).key.display(&model), "@Debug Boolean");
}

#[test]
fn test_parallel_check_matches_sequential_builds() {
    let model = model_from(
        r#"{
          "classes": [
            { "name": "Engine", "constructors": [{ "inject": true }] },
            { "name": "Car", "constructors": [{ "inject": true, "params": [{ "name": "e", "type": "Engine" }] }] },
            { "name": "One", "kind": "interface", "functions": [{ "name": "car", "returns": "Car" }] },
            { "name": "Two", "kind": "interface", "functions": [{ "name": "engine", "returns": "Engine" }] },
            { "name": "Three", "kind": "interface", "functions": [{ "name": "missing", "returns": "Wheel" }] }
          ],
          "components": [{ "name": "One" }, { "name": "Two" }, { "name": "Three" }]
        }"#,
    );

    let report = check_model(&model, &[], Some(3)).unwrap();
    assert_eq!(report.components.len(), 3);
    for component in &report.components {
        let sequential = build(&model, &component.name);
        assert_eq!(
            serde_json::to_string(&GraphSummary::new(&component.output, &model)).unwrap(),
            serde_json::to_string(&GraphSummary::new(&sequential, &model)).unwrap()
        );
    }
    assert_eq!(report.error_count(), 1);
}
