/// Builds a [`HandlerMap`](crate::HandlerMap) from `tag => handler` pairs.
///
/// A leading `Type;` fixes the value type so closures can call its methods
/// without annotations.
///
/// # Examples
///
/// ```rust
/// use tagsum::{handlers, HandlerMap, Record};
///
/// let map: HandlerMap<'_, Record, u32> = handlers! { Record;
///     "idle" => |_| 0,
///     "loading" => |r| r.get("progress").and_then(|p| p.as_u64()).unwrap_or(0) as u32,
/// };
/// assert_eq!(map.len(), 2);
/// ```
#[macro_export]
macro_rules! handlers {
    {} => [$crate::HandlerMap::new()];
    { $t:ty; $($tag:expr => $handler:expr),* $(,)? } => [
        $crate::HandlerMap::<'_, $t, _>::new()$(.on($tag, $handler))*
    ];
    { $($tag:expr => $handler:expr),+ $(,)? } => [
        $crate::HandlerMap::new()$(.on($tag, $handler))+
    ];
}

#[cfg(test)]
mod tests {
    use crate::HandlerMap;

    #[test]
    fn builds_one_entry_per_pair() {
        let map: HandlerMap<'_, str, usize> = handlers! { str;
            "len" => |s| s.len(),
            "zero" => |_| 0,
        };

        assert_eq!(map.apply("len", "abc"), Some(3));
        assert_eq!(map.apply("zero", "abc"), Some(0));
    }

    #[test]
    fn empty_invocation_builds_empty_map() {
        let map: HandlerMap<'_, str, bool> = handlers! {};
        assert!(map.is_empty());
    }
}
