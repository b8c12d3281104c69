use std::{fmt, marker::PhantomData, sync::Arc};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::tag::{uncapitalize, Tagged};

/// Default prefix of derived test names (`isLoading`).
pub const DEFAULT_PREFIX: &str = "is";

struct Target {
    name: String,
    tag: String,
    alt: String,
}

/// A synthesized `is{Variant}` check.
///
/// Clones share one allocation, so two tests obtained for the same name from
/// the same [`Ops`](crate::Ops) are [`ptr_eq`](Self::ptr_eq).
///
/// # Examples
///
/// ```rust
/// use tagsum::{Ops, Record};
///
/// let ops = Ops::<Record>::open("type");
/// let is_idle = ops.test("isIdle").unwrap();
///
/// assert!(is_idle.test(&Record::unit("idle")));
/// assert!(is_idle.ptr_eq(&ops.test("isIdle").unwrap()));
/// ```
pub struct VariantTest<T: ?Sized> {
    target: Arc<Target>,
    _marker: PhantomData<fn(&T)>,
}

impl<T: Tagged + ?Sized> VariantTest<T> {
    /// Splits `name` into `prefix` and a non-empty discriminator.
    fn derive(prefix: &str, name: &str) -> Option<Self> {
        let tag = name.strip_prefix(prefix).filter(|rest| !rest.is_empty())?;

        Some(Self {
            target: Arc::new(Target {
                name: name.to_string(),
                tag: tag.to_string(),
                alt: uncapitalize(tag),
            }),
            _marker: PhantomData,
        })
    }

    /// Whether `value` carries the targeted discriminator, in either its
    /// derived casing or with the first letter lowercased.
    pub fn test(&self, value: &T) -> bool {
        let tag = value.tag();
        tag == self.target.tag || tag == self.target.alt
    }

    /// The derived name this test was requested under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.target.name
    }

    /// The discriminator as spelled in the derived name.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target.tag
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.target, &other.target)
    }

    /// Borrows the test as a plain closure, for `Iterator::filter` and friends.
    pub fn as_fn(&self) -> impl Fn(&T) -> bool + '_ {
        move |value: &T| self.test(value)
    }
}

impl<T: ?Sized> Clone for VariantTest<T> {
    fn clone(&self) -> Self {
        Self {
            target: Arc::clone(&self.target),
            _marker: PhantomData,
        }
    }
}

impl<T: ?Sized> fmt::Debug for VariantTest<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariantTest")
            .field("name", &self.target.name)
            .field("tag", &self.target.tag)
            .finish()
    }
}

/// Derived name → synthesized test. Entries are never evicted.
pub(crate) struct TestCache<T: ?Sized> {
    prefix: String,
    tests: RwLock<FxHashMap<String, VariantTest<T>>>,
}

impl<T: Tagged + ?Sized> TestCache<T> {
    pub(crate) fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            tests: RwLock::new(FxHashMap::default()),
        }
    }

    pub(crate) fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the cached test for `name`, synthesizing it on first request.
    pub(crate) fn get(&self, name: &str) -> Option<VariantTest<T>> {
        if let Some(test) = self.tests.read().get(name) {
            return Some(test.clone());
        }

        let fresh = VariantTest::derive(&self.prefix, name)?;

        // a racing writer may have inserted first; keep whichever landed
        let mut tests = self.tests.write();
        let test = tests.entry(name.to_string()).or_insert_with(|| {
            tracing::trace!(test = name, tag = fresh.target(), "synthesized variant test");
            fresh
        });

        Some(test.clone())
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.tests.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Tag(&'static str);

    impl Tagged for Tag {
        fn tag(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn derived_name_matches_both_casings() {
        let cache = TestCache::<Tag>::new(DEFAULT_PREFIX);
        let is_loading = cache.get("isLoading").unwrap();

        assert!(is_loading.test(&Tag("loading")));
        assert!(is_loading.test(&Tag("Loading")));
        assert!(!is_loading.test(&Tag("LOADING")));
        assert!(!is_loading.test(&Tag("idle")));
        assert_eq!(is_loading.target(), "Loading");
        assert_eq!(is_loading.name(), "isLoading");
    }

    #[test]
    fn camel_case_tail_is_kept() {
        let cache = TestCache::<Tag>::new(DEFAULT_PREFIX);
        let test = cache.get("isNotFound").unwrap();

        assert!(test.test(&Tag("notFound")));
        assert!(test.test(&Tag("NotFound")));
        assert!(!test.test(&Tag("notfound")));
        assert!(!test.test(&Tag("not_found")));
    }

    #[test]
    fn names_without_prefix_or_tail_are_rejected() {
        let cache = TestCache::<Tag>::new(DEFAULT_PREFIX);

        assert!(cache.get("is").is_none());
        assert!(cache.get("hasLoading").is_none());
        assert!(cache.get("").is_none());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn repeated_requests_share_one_instance() {
        let cache = TestCache::<Tag>::new(DEFAULT_PREFIX);
        let first = cache.get("isIdle").unwrap();
        let second = cache.get("isIdle").unwrap();

        assert!(first.ptr_eq(&second));
        assert!(!first.ptr_eq(&cache.get("isError").unwrap()));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn custom_prefix() {
        let cache = TestCache::<Tag>::new("is_");
        let test = cache.get("is_done").unwrap();

        assert!(test.test(&Tag("done")));
        assert!(cache.get("isDone").is_none());
    }

    #[test]
    fn as_fn_filters_iterators() {
        let cache = TestCache::<Tag>::new(DEFAULT_PREFIX);
        let is_a = cache.get("isA").unwrap();
        let tags = [Tag("a"), Tag("b"), Tag("A")];

        assert_eq!(tags.iter().filter(|t| (is_a.as_fn())(*t)).count(), 2);
    }
}
