use std::{borrow::Borrow, collections::BTreeMap, fmt, marker::PhantomData};

use crate::{
    aggregate::{self, Partition, Selector},
    error::Error,
    handler::{HandlerMap, PredicateMap, TransformMap},
    predicate::{TestCache, VariantTest, DEFAULT_PREFIX},
    record::{Constructor, Record},
    schema::Schema,
    tag::{capitalize, Tagged, Variants},
};

/// The operation set bound to one union.
///
/// Create one per union and reuse it; the only state it carries is its
/// schema and the cache of synthesized `is{Variant}` tests.
///
/// # Examples
///
/// ```rust
/// use tagsum::{handlers, Ops, Tagged};
///
/// #[derive(Tagged)]
/// enum Fetch {
///     Idle,
///     Loading { progress: u8 },
/// }
///
/// let ops = Ops::<Fetch>::new();
/// let label = ops
///     .when(
///         &Fetch::Loading { progress: 50 },
///         &handlers! { Fetch;
///             "idle" => |_| "-".to_string(),
///             "loading" => |f| match f {
///                 Fetch::Loading { progress } => format!("L{progress}"),
///                 _ => unreachable!(),
///             },
///         },
///     )
///     .unwrap();
///
/// assert_eq!(label, "L50");
/// ```
pub struct Ops<T: ?Sized> {
    schema: Schema,
    tests: TestCache<T>,
    _marker: PhantomData<fn(&T)>,
}

impl<T: Variants> Ops<T> {
    /// An operation set over the variants `T` declares.
    #[must_use]
    pub fn new() -> Self {
        Self::from_schema(Schema::of::<T>())
    }
}

impl<T: Variants> Default for Ops<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Tagged + ?Sized> Ops<T> {
    #[must_use]
    pub fn from_schema(schema: Schema) -> Self {
        Self {
            schema,
            tests: TestCache::new(DEFAULT_PREFIX),
            _marker: PhantomData,
        }
    }

    /// An operation set that learns discriminators per call.
    #[must_use]
    pub fn open(field: impl Into<String>) -> Self {
        Self::from_schema(Schema::open(field))
    }

    /// Replaces the prefix of derived test names. Tests already cached
    /// under the old prefix are dropped.
    #[must_use]
    pub fn with_prefix(self, prefix: impl Into<String>) -> Self {
        Self {
            tests: TestCache::new(prefix),
            ..self
        }
    }

    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// An empty handler map over `T`.
    #[must_use]
    pub fn handlers<'h, R>(&self) -> HandlerMap<'h, T, R> {
        HandlerMap::new()
    }

    // dispatch

    /// Runs the handler for `value`'s discriminator. `handlers` is expected
    /// to cover every variant; a gap surfaces here as [`Error::NoHandler`].
    pub fn when<R>(&self, value: &T, handlers: &HandlerMap<'_, T, R>) -> Result<R, Error> {
        let tag = value.tag();
        handlers.apply(tag, value).ok_or_else(|| {
            tracing::debug!(tag, field = self.schema.field(), "no handler for discriminator");
            Error::no_handler(tag)
        })
    }

    /// Same as [`when`](Self::when); reads better when the result type
    /// differs from the union.
    pub fn r#match<R>(&self, value: &T, handlers: &HandlerMap<'_, T, R>) -> Result<R, Error> {
        self.when(value, handlers)
    }

    /// Runs the handler for `value`'s discriminator, or `default` when the
    /// map has none.
    pub fn fold<R, D>(&self, value: &T, handlers: &HandlerMap<'_, T, R>, default: D) -> R
    where
        D: FnOnce(&T) -> R,
    {
        match handlers.get(value.tag()) {
            Some(handler) => handler(value),
            None => default(value),
        }
    }

    /// Verifies `handlers` covers the declared variants and nothing else.
    /// An open schema accepts any map.
    pub fn check<R>(&self, handlers: &HandlerMap<'_, T, R>) -> Result<(), Error> {
        if self.schema.is_open() {
            return Ok(());
        }

        if let Some(tag) = handlers.tags().find(|tag| !self.schema.contains(tag)) {
            tracing::debug!(tag, "handler map names an undeclared discriminator");
            return Err(Error::UnknownVariant {
                tag: tag.to_string(),
            });
        }

        let missing: Vec<String> = self
            .schema
            .tags()
            .iter()
            .filter(|tag| !handlers.contains(tag))
            .cloned()
            .collect();
        if !missing.is_empty() {
            tracing::debug!(?missing, "handler map is not exhaustive");
            return Err(Error::MissingHandlers { tags: missing });
        }

        Ok(())
    }

    /// Checks `handlers` once and binds it for repeated dispatch.
    pub fn exhaustive<'o, 'h, R>(
        &'o self,
        handlers: HandlerMap<'h, T, R>,
    ) -> Result<Exhaustive<'o, 'h, T, R>, Error> {
        self.check(&handlers)?;

        Ok(Exhaustive {
            ops: self,
            handlers,
        })
    }

    // transform

    /// Rebuilds `value` with its handler, which must keep the variant.
    /// Without a handler `value` comes back unchanged.
    pub fn map(&self, value: T, handlers: &TransformMap<'_, T>) -> Result<T, Error>
    where
        T: Sized,
    {
        let Some(mapped) = handlers.apply(value.tag(), &value) else {
            return Ok(value);
        };

        if mapped.tag() != value.tag() {
            tracing::warn!(
                from = value.tag(),
                to = mapped.tag(),
                "map handler changed variant"
            );
            return Err(Error::VariantChanged {
                from: value.tag().to_string(),
                to: mapped.tag().to_string(),
            });
        }

        Ok(mapped)
    }

    /// Rebuilds `value` with its handler, which may move it to any variant.
    /// Without a handler `value` comes back unchanged.
    pub fn transform(&self, value: T, handlers: &TransformMap<'_, T>) -> T
    where
        T: Sized,
    {
        handlers.apply(value.tag(), &value).unwrap_or(value)
    }

    // aggregate

    /// Values whose discriminator is selected, in input order.
    pub fn filter<'s, I>(&self, values: I, selector: impl Into<Selector<'s>>) -> Vec<I::Item>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        aggregate::filter::<T, _>(values, &selector.into())
    }

    /// Values whose discriminator has a predicate that accepts them, in
    /// input order. Discriminators without a predicate are dropped.
    pub fn filter_by<I>(&self, values: I, predicates: &PredicateMap<'_, T>) -> Vec<I::Item>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        aggregate::filter_by(values, predicates)
    }

    /// Groups values by discriminator in one pass.
    pub fn partition<I>(&self, values: I) -> Partition<I::Item>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        aggregate::partition::<T, _>(values)
    }

    // access

    #[must_use]
    pub fn get_type<'v>(&self, value: &'v T) -> &'v str {
        value.tag()
    }

    /// The `is{Variant}` test for a derived name such as `isLoading`,
    /// synthesized on first request and cached for the life of this set.
    /// Returns `None` only if `name` lacks the prefix or has nothing after
    /// it. Any other name yields a test, even one no declared variant can
    /// satisfy.
    #[must_use]
    pub fn test(&self, name: &str) -> Option<VariantTest<T>> {
        self.tests.get(name)
    }

    /// One test per declared discriminator, keyed by derived name.
    #[must_use]
    pub fn tests(&self) -> BTreeMap<String, VariantTest<T>> {
        self.schema
            .tags()
            .iter()
            .filter_map(|tag| {
                let name = format!("{}{}", self.tests.prefix(), capitalize(tag));
                self.tests.get(&name).map(|test| (name, test))
            })
            .collect()
    }
}

impl Ops<Record> {
    /// A constructor stamping `tag` onto every record it builds. A closed
    /// schema rejects a tag it does not declare.
    pub fn constructor(&self, tag: impl Into<String>) -> Result<Constructor, Error> {
        let tag = tag.into();
        self.admit(&tag)?;

        Ok(Constructor::new(self.schema.field(), tag))
    }

    /// Reads a flat object using this set's discriminator field. A closed
    /// schema rejects a discriminator it does not declare.
    pub fn record(&self, object: serde_json::Value) -> Result<Record, Error> {
        let record = Record::from_value(self.schema.field(), object)?;
        self.admit(record.tag())?;

        Ok(record)
    }

    fn admit(&self, tag: &str) -> Result<(), Error> {
        if self.schema.is_open() || self.schema.contains(tag) {
            return Ok(());
        }

        tracing::debug!(tag, field = self.schema.field(), "undeclared discriminator");
        Err(Error::UnknownVariant {
            tag: tag.to_string(),
        })
    }
}

impl<T: ?Sized> fmt::Debug for Ops<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ops").field("schema", &self.schema).finish()
    }
}

/// A handler map already checked against the schema.
pub struct Exhaustive<'o, 'h, T: ?Sized, R> {
    ops: &'o Ops<T>,
    handlers: HandlerMap<'h, T, R>,
}

impl<T: Tagged + ?Sized, R> Exhaustive<'_, '_, T, R> {
    /// Dispatches `value`. Still fallible: the value may carry a
    /// discriminator outside the schema.
    pub fn call(&self, value: &T) -> Result<R, Error> {
        self.ops.when(value, &self.handlers)
    }
}

impl<T: ?Sized, R> fmt::Debug for Exhaustive<'_, '_, T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exhaustive")
            .field("handlers", &self.handlers)
            .finish_non_exhaustive()
    }
}
