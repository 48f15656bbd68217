//! Ordering properties of `Registry::resolve` and the executor, checked over
//! random registries with proptest.

use std::sync::{Arc, Mutex};

use gatehouse::middleware::{Decision, Executor, Interceptor, Registry, RequestContext};
use gatehouse::{Method, Response};
use proptest::prelude::*;

#[derive(Clone, Debug)]
struct Shape {
    priority: i8,
    scoped: bool,
    stops: bool,
}

fn shape() -> impl Strategy<Value = Shape> {
    (any::<i8>(), any::<bool>(), prop::bool::weighted(0.15))
        .prop_map(|(priority, scoped, stops)| Shape { priority, scoped, stops })
}

fn paths() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["/", "/hello", "/hello/x", "/hellojpa", "/other"])
}

type Log = Arc<Mutex<Vec<(char, usize)>>>;

/// Entry `i` is named by its index so duplicates stay distinguishable.
fn build(shapes: &[Shape], log: &Log) -> Registry {
    let mut registry = Registry::new();
    for (i, s) in shapes.iter().enumerate() {
        let (b, a, c) = (log.clone(), log.clone(), log.clone());
        let stops = s.stops;
        let mut interceptor = Interceptor::new(i.to_string())
            .order(i32::from(s.priority))
            .before(move |_| {
                b.lock().unwrap().push(('b', i));
                Ok(if stops { Decision::Stop(Response::text("stopped")) } else { Decision::Continue })
            })
            .after(move |_, _| {
                a.lock().unwrap().push(('a', i));
                Ok(())
            })
            .on_complete(move |_, _| {
                c.lock().unwrap().push(('c', i));
                Ok(())
            });
        if s.scoped {
            interceptor = interceptor.path("/hello*");
        }
        registry.register(interceptor);
    }
    registry
}

fn phase(log: &[(char, usize)], tag: char) -> Vec<usize> {
    log.iter().filter(|(t, _)| *t == tag).map(|(_, i)| *i).collect()
}

proptest! {
    #[test]
    fn resolve_is_sorted_stable_and_scoped(shapes in prop::collection::vec(shape(), 0..12), path in paths()) {
        let registry = build(&shapes, &Log::default());
        let chain = registry.resolve(path);
        let ids: Vec<usize> = chain.iter().map(|i| i.name().parse().unwrap()).collect();

        let mut expected: Vec<usize> = (0..shapes.len())
            .filter(|&i| !shapes[i].scoped || path.starts_with("/hello"))
            .collect();
        expected.sort_by_key(|&i| shapes[i].priority);

        prop_assert_eq!(&ids, &expected);
        let again: Vec<usize> = registry.resolve(path).iter().map(|i| i.name().parse().unwrap()).collect();
        prop_assert_eq!(ids, again);
    }

    #[test]
    fn completion_mirrors_the_before_phase(shapes in prop::collection::vec(shape(), 0..12), path in paths()) {
        let log = Log::default();
        let registry = build(&shapes, &log);
        let handled = Arc::new(Mutex::new(0));

        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let mut ctx = RequestContext::new(Method::GET, path, "prop");
        let executor = Executor::new(registry.resolve(path));
        let h = handled.clone();
        runtime.block_on(executor.run(&mut ctx, || async move {
            *h.lock().unwrap() += 1;
            Ok(Response::text("ok"))
        })).unwrap();

        let log = log.lock().unwrap().clone();
        let before = phase(&log, 'b');
        let after = phase(&log, 'a');
        let complete = phase(&log, 'c');
        let stopped = before.last().is_some_and(|&i| shapes[i].stops);

        // Everything that passed before completes, in reverse; a stopping
        // entry does not.
        let passed = if stopped { &before[..before.len() - 1] } else { &before[..] };
        let mut reversed = passed.to_vec();
        reversed.reverse();
        prop_assert_eq!(&complete, &reversed);

        if stopped {
            prop_assert!(ctx.is_aborted());
            prop_assert_eq!(*handled.lock().unwrap(), 0);
            prop_assert!(after.is_empty());
        } else {
            prop_assert_eq!(*handled.lock().unwrap(), 1);
            prop_assert_eq!(&after, &reversed);
        }
    }
}
