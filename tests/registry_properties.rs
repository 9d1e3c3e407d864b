//! Property tests for the resource registry

use kodegen_tools_markscrape::{ResourceRegistry, ResourceUri, SubscriberId};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
enum Op {
    Add(String),
    Update(usize, String),
    Subscribe(usize, u8),
    Unsubscribe(usize, u8),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        "[a-z]{0,12}".prop_map(Op::Add),
        (any::<usize>(), "[a-z]{0,12}").prop_map(|(i, c)| Op::Update(i, c)),
        (any::<usize>(), 0u8..4).prop_map(|(i, s)| Op::Subscribe(i, s)),
        (any::<usize>(), 0u8..4).prop_map(|(i, s)| Op::Unsubscribe(i, s)),
    ]
}

proptest! {
    #[test]
    fn adds_yield_distinct_ids_and_reads_see_last_write(ops in prop::collection::vec(op(), 1..60)) {
        let registry = ResourceRegistry::detached();
        let mut ids: Vec<ResourceUri> = Vec::new();
        let mut expected: HashMap<ResourceUri, String> = HashMap::new();
        let mut subscribed: HashMap<ResourceUri, HashSet<u8>> = HashMap::new();

        for op in ops {
            match op {
                Op::Add(content) => {
                    let uri = registry.add("https://example.com", content.clone(), "text/markdown");
                    prop_assert!(!ids.contains(&uri));
                    expected.insert(uri.clone(), content);
                    ids.push(uri);
                }
                Op::Update(i, content) if !ids.is_empty() => {
                    let uri = &ids[i % ids.len()];
                    prop_assert!(registry.update(uri, content.clone(), "text/markdown").is_ok());
                    expected.insert(uri.clone(), content);
                }
                Op::Subscribe(i, s) if !ids.is_empty() => {
                    let uri = &ids[i % ids.len()];
                    let subscribed_ok = registry.subscribe(uri, &SubscriberId::new(format!("s{s}"))).is_ok();
                    prop_assert!(subscribed_ok);
                    subscribed.entry(uri.clone()).or_default().insert(s);
                }
                Op::Unsubscribe(i, s) if !ids.is_empty() => {
                    let uri = &ids[i % ids.len()];
                    let result = registry.unsubscribe(uri, &SubscriberId::new(format!("s{s}")));
                    match subscribed.get_mut(uri) {
                        Some(set) => {
                            prop_assert!(result.is_ok());
                            set.remove(&s);
                            if set.is_empty() {
                                subscribed.remove(uri);
                            }
                        }
                        None => prop_assert!(result.is_err()),
                    }
                }
                _ => {}
            }
        }

        prop_assert_eq!(registry.len(), ids.len());
        for (uri, content) in &expected {
            let stored = registry.get(uri).map(|r| r.content).ok();
            prop_assert_eq!(stored.as_ref(), Some(content));
        }

        // No empty subscription entries survive
        prop_assert_eq!(registry.subscription_count(), subscribed.len());
        for uri in &ids {
            let live = registry.subscribers(uri).map(|s| s.len()).unwrap_or(0);
            let model = subscribed.get(uri).map(HashSet::len).unwrap_or(0);
            prop_assert_eq!(live, model);
        }
    }

    #[test]
    fn update_of_unknown_id_never_changes_the_map(count in 0usize..10, content in "[a-z]{0,8}") {
        let registry = ResourceRegistry::detached();
        for n in 0..count {
            registry.add(format!("https://{n}.test"), "original", "text/markdown");
        }
        let before = registry.list();

        prop_assert!(registry.update(&ResourceUri::generate(), content, "text/plain").is_err());
        prop_assert_eq!(registry.list(), before);
    }
}
