use wirebox::prelude::*;

#[derive(Debug, Clone, PartialEq)]
struct Limits {
    max_connections: u32,
}

struct Client {
    url: String,
}

#[derive(Clone, Namespace)]
struct Services {
    #[namespace(rename = "Client")]
    client: Factory,
    url: &'static str,
    retries: u32,
    #[namespace(constant)]
    limits: Limits,
    #[namespace(skip)]
    #[allow(dead_code)]
    scratch: Vec<u8>,
}

fn services() -> Services {
    Services {
        client: Factory::new(|args| Ok(Client { url: args.cloned::<&str>(0)?.to_string() })),
        url: "postgres://localhost",
        retries: 3,
        limits: Limits { max_connections: 16 },
        scratch: Vec::new(),
    }
}

#[test]
fn derived_items_follow_field_order() {
    let names: Vec<String> = services()
        .items()
        .iter()
        .map(|item| item.name().to_string())
        .collect();
    assert_eq!(names, vec!["Client", "url", "retries", "limits"]);
}

#[test]
fn derived_namespace_serves() {
    let ns = services();
    let served = Container::new()
        .serve(
            |includer| {
                includer.include_named(&ns, "Services");
            },
            |registrations| {
                registrations.register("Services", "Client", |entries, _, _| {
                    entries
                        .with_entry()
                        .singleton()
                        .with_resolve_param("Services.url");
                })?;
                Ok(())
            },
        )
        .unwrap();

    let limits = served.namespaces.constant("Services", "limits").unwrap();
    assert_eq!(limits.downcast_ref::<Limits>(), Some(&Limits { max_connections: 16 }));
    let retries = served.namespaces.constant("Services", "retries").unwrap();
    assert_eq!(retries.downcast_ref::<u32>(), Some(&3));

    // `url` is a constant resolved into the client's parameter
    let client = served.namespaces.call("Services", "Client", &[]).unwrap();
    let client = client.downcast_ref::<Client>().unwrap();
    assert_eq!(client.url, "postgres://localhost");
}

#[derive(Clone, Namespace)]
struct Generic<T: Clone + Send + Sync + 'static> {
    #[namespace(constant)]
    value: T,
}

#[test]
fn generic_namespaces() {
    let items = Generic { value: 7u64 }.items();
    assert_eq!(items.len(), 1);
    match items[0].implementation() {
        ItemImpl::Constant(value) => assert_eq!(value.downcast_ref::<u64>(), Some(&7)),
        other => panic!("Expected a constant, got: {other:?}"),
    }
}
