/// A value carrying exactly one string discriminator.
///
/// # Examples
///
/// ```rust
/// use tagsum::Tagged;
///
/// #[derive(Tagged)]
/// enum Light {
///     Red,
///     Green { seconds: u32 },
/// }
///
/// assert_eq!(Light::Green { seconds: 3 }.tag(), "green");
/// ```
pub trait Tagged {
    fn tag(&self) -> &str;
}

impl<T: Tagged + ?Sized> Tagged for &T {
    fn tag(&self) -> &str {
        (**self).tag()
    }
}

/// A closed set of variants known at compile time.
pub trait Variants: Tagged {
    /// Name of the discriminator field.
    const FIELD: &'static str;

    /// Every discriminator, in declaration order.
    const TAGS: &'static [&'static str];
}

/// Uppercases the first character of `tag`, leaving the rest untouched.
pub(crate) fn capitalize(tag: &str) -> String {
    let mut chars = tag.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lowercases the first character of `tag`, leaving the rest untouched.
pub(crate) fn uncapitalize(tag: &str) -> String {
    let mut chars = tag.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
