//! Interceptor registry and chain resolution.

use std::slice;

use super::interceptor::Interceptor;

/// Every interceptor the application registered, in registration order.
///
/// Filled once while the [`Router`](crate::Router) is being built and read-only
/// once the server owns it, so concurrent [`resolve`](Registry::resolve) calls
/// need no locking.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    entries: Vec<Interceptor>,
}

impl Registry {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Append an interceptor. Duplicates are kept.
    pub fn register(&mut self, interceptor: Interceptor) {
        self.entries.push(interceptor);
    }

    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// The interceptors in scope for `path`, ascending by priority.
    ///
    /// `sort_by_key` is stable, so equal priorities keep registration order.
    pub fn resolve(&self, path: &str) -> Chain<'_> {
        let mut entries: Vec<&Interceptor> = self.entries.iter()
            .filter(|i| i.applies_to(path))
            .collect();
        entries.sort_by_key(|i| i.priority());
        Chain { entries }
    }
}

/// The ordered interceptors for one request. Iterate it as often as needed.
#[derive(Clone, Debug, Default)]
pub struct Chain<'r> {
    entries: Vec<&'r Interceptor>,
}

impl<'r> Chain<'r> {
    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &'r Interceptor> + ExactSizeIterator + '_ {
        self.entries.iter().copied()
    }

    /// Interceptor names in before-phase order.
    pub fn names(&self) -> Vec<&'r str> {
        self.entries.iter().map(|i| i.name()).collect()
    }
}

impl<'a, 'r> IntoIterator for &'a Chain<'r> {
    type Item = &'a &'r Interceptor;
    type IntoIter = slice::Iter<'a, &'r Interceptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::Registry;
    use crate::middleware::Interceptor;

    fn sample() -> Registry {
        let mut registry = Registry::new();
        registry.register(Interceptor::new("a").order(1));
        registry.register(Interceptor::new("b").order(0).path("/hello*"));
        registry
    }

    #[test]
    fn scoped_entry_runs_first_on_matching_path() {
        assert_eq!(sample().resolve("/hello/x").names(), ["b", "a"]);
    }

    #[test]
    fn scoped_entry_is_absent_elsewhere() {
        assert_eq!(sample().resolve("/other").names(), ["a"]);
    }

    #[test]
    fn equal_priorities_keep_registration_order() {
        let mut registry = Registry::new();
        for name in ["first", "second", "third"] {
            registry.register(Interceptor::new(name).order(5));
        }
        registry.register(Interceptor::new("early").order(-1));
        assert_eq!(registry.resolve("/").names(), ["early", "first", "second", "third"]);
    }

    #[test]
    fn duplicates_are_not_collapsed() {
        let mut registry = Registry::new();
        let twice = Interceptor::new("twice");
        registry.register(twice.clone());
        registry.register(twice);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.resolve("/").names(), ["twice", "twice"]);
    }

    #[test]
    fn chain_can_be_walked_more_than_once() {
        let registry = sample();
        let chain = registry.resolve("/hello");
        let forward: Vec<_> = chain.iter().map(|i| i.name()).collect();
        let again: Vec<_> = (&chain).into_iter().map(|i| i.name()).collect();
        let backward: Vec<_> = chain.iter().rev().map(|i| i.name()).collect();
        assert_eq!(forward, again);
        assert_eq!(backward, ["a", "b"]);
    }

    #[test]
    fn empty_registry_resolves_to_empty_chain() {
        assert!(Registry::new().resolve("/anything").is_empty());
    }
}
