use std::{collections::BTreeMap, fmt};

type Handler<'h, T, R> = Box<dyn Fn(&T) -> R + 'h>;

/// Per-discriminator functions over one union.
///
/// Total maps drive exhaustive dispatch. Partial maps drive `fold`, `map`,
/// `transform` and `filter_by`.
///
/// # Examples
///
/// ```rust
/// use tagsum::{HandlerMap, Record};
///
/// let handlers: HandlerMap<'_, Record, &str> = HandlerMap::new()
///     .on("idle", |_| "idle")
///     .on("loading", |_| "busy");
///
/// assert_eq!(handlers.len(), 2);
/// assert!(handlers.contains("idle"));
/// ```
pub struct HandlerMap<'h, T: ?Sized, R> {
    handlers: BTreeMap<String, Handler<'h, T, R>>,
}

/// A handler map whose functions answer a yes/no question.
pub type PredicateMap<'h, T> = HandlerMap<'h, T, bool>;

/// A handler map whose functions build a new value of the same union.
pub type TransformMap<'h, T> = HandlerMap<'h, T, T>;

impl<'h, T: ?Sized, R> HandlerMap<'h, T, R> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    /// Registers `handler` for `tag`, replacing any earlier entry.
    #[must_use]
    pub fn on<F>(mut self, tag: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&T) -> R + 'h,
    {
        self.insert(tag, handler);
        self
    }

    pub fn insert<F>(&mut self, tag: impl Into<String>, handler: F)
    where
        F: Fn(&T) -> R + 'h,
    {
        self.handlers.insert(tag.into(), Box::new(handler));
    }

    pub fn get(&self, tag: &str) -> Option<&(dyn Fn(&T) -> R + 'h)> {
        self.handlers.get(tag).map(AsRef::as_ref)
    }

    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.handlers.contains_key(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Invokes the handler for `tag`, if any.
    pub fn apply(&self, tag: &str, value: &T) -> Option<R> {
        self.get(tag).map(|handler| handler(value))
    }
}

impl<T: ?Sized, R> Default for HandlerMap<'_, T, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized, R> fmt::Debug for HandlerMap<'_, T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.handlers.keys()).finish()
    }
}
