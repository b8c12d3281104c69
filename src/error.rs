use thiserror::Error as ThisError;

/// Failures surfaced by an [`Ops`](crate::Ops) set and by [`Record`](crate::Record)
/// conversion. Dispatch failures are caller defects, never transient.
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[non_exhaustive]
pub enum Error {
    #[error("no handler for discriminator `{tag}`")]
    NoHandler { tag: String },

    #[error("handler map is missing discriminators: {}", tags.join(", "))]
    MissingHandlers { tags: Vec<String> },

    #[error("discriminator `{tag}` is outside the schema")]
    UnknownVariant { tag: String },

    #[error("map handler changed discriminator from `{from}` to `{to}`")]
    VariantChanged { from: String, to: String },

    #[error("discriminator `{tag}` is declared more than once")]
    DuplicateVariant { tag: String },

    #[error("closed schema over `{field}` declares no discriminators")]
    EmptySchema { field: String },

    #[error("object has no `{field}` discriminator field")]
    MissingDiscriminator { field: String },

    #[error("discriminator field `{field}` is not a string")]
    InvalidDiscriminator { field: String },
}

impl Error {
    pub(crate) fn no_handler(tag: &str) -> Self {
        Self::NoHandler {
            tag: tag.to_string(),
        }
    }

    /// The discriminator an error is about, when it names exactly one.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::NoHandler { tag } | Self::UnknownVariant { tag } | Self::DuplicateVariant { tag } => {
                Some(tag)
            }
            Self::VariantChanged { from, .. } => Some(from),
            Self::MissingHandlers { .. }
            | Self::EmptySchema { .. }
            | Self::MissingDiscriminator { .. }
            | Self::InvalidDiscriminator { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_handler_names_the_discriminator() {
        let err = Error::no_handler("error");
        assert_eq!(err.to_string(), "no handler for discriminator `error`");
        assert_eq!(err.tag(), Some("error"));
    }

    #[test]
    fn missing_handlers_lists_every_tag() {
        let err = Error::MissingHandlers {
            tags: vec!["success".into(), "error".into()],
        };
        assert_eq!(
            err.to_string(),
            "handler map is missing discriminators: success, error"
        );
        assert_eq!(err.tag(), None);
    }

    #[test]
    fn empty_schema_names_the_field() {
        let err = Error::EmptySchema {
            field: "kind".into(),
        };
        assert_eq!(
            err.to_string(),
            "closed schema over `kind` declares no discriminators"
        );
        assert_eq!(err.tag(), None);
    }
}
