use crate::{error::Error, tag::Variants};

/// Default name of the discriminator field.
pub const DEFAULT_FIELD: &str = "type";

/// The discriminator field of a union plus, optionally, the closed list of
/// discriminators it admits.
///
/// An open schema (no declared tags) learns discriminators per call from
/// whatever value or handler map it is given.
///
/// # Examples
///
/// ```rust
/// use tagsum::{Error, Schema};
///
/// let schema = Schema::closed("type", ["idle", "loading"]).unwrap();
/// assert!(schema.contains("idle"));
///
/// assert!(matches!(
///     Schema::closed("type", ["idle", "idle"]),
///     Err(Error::DuplicateVariant { .. })
/// ));
/// assert!(Schema::open("type").is_open());
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Schema {
    field: String,
    tags: Vec<String>,
}

impl Schema {
    /// An open schema over `field`.
    #[must_use]
    pub fn open(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            tags: Vec::new(),
        }
    }

    /// A closed schema; fails if a discriminator repeats or none is given.
    pub fn closed<I, S>(field: impl Into<String>, tags: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let schema = tags
            .into_iter()
            .try_fold(Self::open(field), |schema, tag| schema.variant(tag))?;
        if schema.is_open() {
            return Err(Error::EmptySchema {
                field: schema.field,
            });
        }

        Ok(schema)
    }

    /// The schema a derived enum declares. An enum without variants yields
    /// an open schema.
    #[must_use]
    pub fn of<T: Variants>() -> Self {
        Self {
            field: T::FIELD.to_string(),
            tags: T::TAGS.iter().map(ToString::to_string).collect(),
        }
    }

    /// Declares one more discriminator.
    pub fn variant(mut self, tag: impl Into<String>) -> Result<Self, Error> {
        let tag = tag.into();
        if self.contains(&tag) {
            return Err(Error::DuplicateVariant { tag });
        }
        self.tags.push(tag);

        Ok(self)
    }

    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.tags.is_empty()
    }

    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::open(DEFAULT_FIELD)
    }
}
