use serde_json::{Map, Value};

use crate::{error::Error, tag::Tagged};

/// Payload fields of a [`Record`], keyed by field name.
pub type Payload = Map<String, Value>;

/// A dynamically shaped tagged value: one discriminator plus a payload.
///
/// The payload never holds the discriminator field itself. Records are
/// immutable; [`with`](Self::with) returns an updated copy.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use tagsum::{Record, Tagged};
///
/// let loading = Record::from_value("type", json!({ "type": "loading", "progress": 10 })).unwrap();
/// let done = loading.with("progress", 100);
///
/// assert_eq!(done.tag(), "loading");
/// assert_eq!(done.get("progress"), Some(&json!(100)));
/// assert_eq!(loading.get("progress"), Some(&json!(10)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    tag: String,
    payload: Payload,
}

impl Record {
    #[must_use]
    pub fn new(tag: impl Into<String>, payload: Payload) -> Self {
        Self {
            tag: tag.into(),
            payload,
        }
    }

    /// A record with no payload.
    #[must_use]
    pub fn unit(tag: impl Into<String>) -> Self {
        Self::new(tag, Payload::new())
    }

    /// Splits a flat object into discriminator and payload.
    pub fn from_object(field: &str, mut object: Payload) -> Result<Self, Error> {
        match object.remove(field) {
            Some(Value::String(tag)) => Ok(Self::new(tag, object)),
            Some(_) => Err(Error::InvalidDiscriminator {
                field: field.to_string(),
            }),
            None => Err(Error::MissingDiscriminator {
                field: field.to_string(),
            }),
        }
    }

    /// Like [`from_object`](Self::from_object) for any JSON value; a
    /// non-object has no discriminator.
    pub fn from_value(field: &str, value: Value) -> Result<Self, Error> {
        match value {
            Value::Object(object) => Self::from_object(field, object),
            _ => Err(Error::MissingDiscriminator {
                field: field.to_string(),
            }),
        }
    }

    /// Flattens the record back into one object with the discriminator
    /// stored under `field`.
    #[must_use]
    pub fn into_object(self, field: &str) -> Payload {
        let mut object = self.payload;
        object.insert(field.to_string(), Value::String(self.tag));
        object
    }

    #[must_use]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    #[must_use]
    pub fn into_payload(self) -> Payload {
        self.payload
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }

    /// A copy of this record with `key` set to `value`.
    #[must_use]
    pub fn with(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut payload = self.payload.clone();
        payload.insert(key.into(), value.into());

        Self {
            tag: self.tag.clone(),
            payload,
        }
    }
}

impl Tagged for Record {
    fn tag(&self) -> &str {
        &self.tag
    }
}

/// Builds records of one fixed variant. Produced by
/// [`Ops::constructor`](crate::Ops::constructor).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Constructor {
    field: String,
    tag: String,
}

impl Constructor {
    pub(crate) fn new(field: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            tag: tag.into(),
        }
    }

    /// Attaches the fixed discriminator to `payload`. A payload entry named
    /// like the discriminator field is dropped.
    #[must_use]
    pub fn build(&self, mut payload: Payload) -> Record {
        payload.remove(&self.field);
        Record::new(self.tag.clone(), payload)
    }

    /// A record of this variant with no payload.
    #[must_use]
    pub fn unit(&self) -> Record {
        Record::unit(self.tag.clone())
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn object(value: Value) -> Payload {
        match value {
            Value::Object(object) => object,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn from_object_strips_discriminator() {
        let record =
            Record::from_object("type", object(json!({ "type": "loading", "progress": 50 })))
                .unwrap();

        assert_eq!(record.tag(), "loading");
        assert_eq!(record.get("progress"), Some(&json!(50)));
        assert_eq!(record.get("type"), None);
    }

    #[test]
    fn from_object_requires_string_discriminator() {
        let missing = Record::from_object("type", object(json!({ "progress": 1 })));
        assert_eq!(
            missing,
            Err(Error::MissingDiscriminator {
                field: "type".into()
            })
        );

        let numeric = Record::from_value("type", json!({ "type": 3 }));
        assert_eq!(
            numeric,
            Err(Error::InvalidDiscriminator {
                field: "type".into()
            })
        );

        assert!(Record::from_value("type", json!("loading")).is_err());
    }

    #[test]
    fn into_object_restores_flat_shape() {
        let record = Record::new("error", object(json!({ "message": "x" })));

        assert_eq!(
            Value::Object(record.into_object("kind")),
            json!({ "kind": "error", "message": "x" })
        );
    }

    #[test]
    fn with_leaves_original_untouched() {
        let before = Record::new("loading", object(json!({ "progress": 10 })));
        let after = before.with("progress", 20);

        assert_eq!(before.get("progress"), Some(&json!(10)));
        assert_eq!(after.get("progress"), Some(&json!(20)));
        assert_eq!(after.tag(), "loading");
    }

    #[test]
    fn constructor_fixes_discriminator() {
        let success = Constructor::new("type", "success");
        let record = success.build(object(json!({ "type": "error", "data": [1, 2] })));

        assert_eq!(record.tag(), "success");
        assert_eq!(record.payload(), &object(json!({ "data": [1, 2] })));
        assert_eq!(success.unit(), Record::unit("success"));
    }
}
