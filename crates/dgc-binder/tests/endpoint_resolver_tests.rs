use dgc_binder::endpoints::{injection_endpoint, provision_endpoint, resolve_endpoints};
use dgc_binder::{Endpoint, Injectable, Key, Request, ResolverContext};
use dgc_model::{ClassKind, Markers, ModelBuilder, QualifierSet, TypeId};

#[test]
fn test_accessors_become_exposed_endpoints() {
    let mut b = ModelBuilder::new();
    let app = b.ty("AppComponent");
    let service = b.ty("Service");
    let string = b.ty("String");
    let named = b.qualifier("Version");
    b.add_class(app, ClassKind::Interface);
    let accessor = b.add_function(app, "service", &[], service);
    let version = b.add_property(app, "version", string);
    b.qualify(version, named);
    b.add_function(app, "hashCode", &[], string);
    b.add_function(app, "start", &[], TypeId::UNIT);
    b.add_component(app, &[], &[]);
    let model = b.finish();

    let cx = ResolverContext::new(&model, model.component(app).unwrap());
    let endpoints = resolve_endpoints(&cx);
    assert_eq!(
        endpoints,
        vec![
            Endpoint::Exposed {
                accessor,
                key: Key::unqualified(service)
            },
            Endpoint::Exposed {
                accessor: version,
                key: Key::new(string, QualifierSet::single(named))
            },
        ]
    );
    assert_eq!(endpoints[0].describe(&model), "service(): Service");
    assert_eq!(
        endpoints[1].requests(),
        vec![Request {
            key: Key::new(string, QualifierSet::single(named)),
            requester: version
        }]
    );
}

#[test]
fn test_member_injection_collects_inject_properties_and_setters() {
    let mut b = ModelBuilder::new();
    let app = b.ty("AppComponent");
    let activity = b.ty("MainActivity");
    let presenter = b.ty("Presenter");
    let logger = b.ty("Logger");
    let string = b.ty("String");
    b.add_class(app, ClassKind::Interface);
    let inject = b.add_function(app, "inject", &[("activity", activity)], TypeId::UNIT);

    let field = b.add_property(activity, "presenter", presenter);
    b.mark(field, Markers::INJECT);
    b.add_property(activity, "title", string);
    let setter = b.add_function(activity, "setLogger", &[("logger", logger)], TypeId::UNIT);
    b.mark(setter, Markers::INJECT);
    let wide = b.add_function(activity, "setBoth", &[("a", logger), ("b", string)], TypeId::UNIT);
    b.mark(wide, Markers::INJECT);
    b.add_component(app, &[], &[]);
    let model = b.finish();

    let endpoint = injection_endpoint(&model, inject).unwrap();
    let logger_param = model.decl(setter).params()[0];
    assert_eq!(
        endpoint,
        Endpoint::Injected {
            entry: inject,
            target: activity,
            injectables: vec![
                Injectable::Property {
                    owner: activity,
                    accessor: field,
                    key: Key::unqualified(presenter)
                },
                Injectable::Setter {
                    owner: activity,
                    function: setter,
                    parameter: logger_param,
                    key: Key::unqualified(logger)
                },
            ]
        }
    );

    let requests = endpoint.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].requester, field);
    assert_eq!(requests[1].requester, logger_param);
}

#[test]
fn test_injection_function_may_return_its_argument() {
    let mut b = ModelBuilder::new();
    let app = b.ty("AppComponent");
    let target = b.ty("Target");
    let other = b.ty("Other");
    let returning = b.add_function(app, "inject", &[("t", target)], target);
    let mismatched = b.add_function(app, "convert", &[("t", target)], other);
    let two_args = b.add_function(app, "pair", &[("a", target), ("b", target)], TypeId::UNIT);
    b.add_component(app, &[], &[]);
    let model = b.finish();

    assert!(matches!(
        injection_endpoint(&model, returning),
        Some(Endpoint::Injected { target: t, ref injectables, .. }) if t == target && injectables.is_empty()
    ));
    assert_eq!(injection_endpoint(&model, mismatched), None);
    assert_eq!(injection_endpoint(&model, two_args), None);
    assert_eq!(provision_endpoint(&model, returning), None);

    let cx = ResolverContext::new(&model, model.component(app).unwrap());
    let endpoints = resolve_endpoints(&cx);
    assert_eq!(endpoints.len(), 1);
    assert!(!endpoints[0].is_exposed());
    assert_eq!(endpoints[0].describe(&model), "inject(Target)");
}
