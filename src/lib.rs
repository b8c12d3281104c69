#![doc = include_str!("../README.md")]
#![deny(future_incompatible)]
#![deny(rust_2018_idioms)]

#[cfg(test)]
extern crate self as tagsum;

mod aggregate;
mod error;
mod handler;
mod macros;
mod ops;
mod predicate;
mod record;
mod schema;
pub mod tag;

pub use self::{
    aggregate::{Groups, Partition, Selector},
    error::Error,
    handler::{HandlerMap, PredicateMap, TransformMap},
    ops::{Exhaustive, Ops},
    predicate::{VariantTest, DEFAULT_PREFIX},
    record::{Constructor, Payload, Record},
    schema::{Schema, DEFAULT_FIELD},
    tag::{Tagged, Variants},
};

/// Derives [`trait@Tagged`] and [`Variants`] for an enum, plus one
/// `is_<variant>()` method per variant.
///
/// The discriminator of each variant is its name in `camelCase` unless
/// renamed:
///
/// ```rust
/// use tagsum::{Tagged, Variants};
///
/// #[derive(Tagged)]
/// #[tagged(field = "kind", rename_all = "snake_case")]
/// enum Job {
///     Queued,
///     InFlight { attempt: u32 },
///     #[tagged(rename = "done")]
///     Finished(String),
/// }
///
/// assert_eq!(Job::FIELD, "kind");
/// assert_eq!(Job::TAGS, ["queued", "in_flight", "done"]);
/// assert_eq!(Job::InFlight { attempt: 1 }.tag(), "in_flight");
/// assert!(Job::Finished("ok".into()).is_finished());
/// ```
pub use tagsum_macros::Tagged;

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[derive(Clone, Debug, PartialEq, Tagged)]
    enum Fetch {
        Idle,
        Loading { progress: u8 },
        Success { data: String },
        Error { message: String },
    }

    #[test]
    fn basic() {
        let ops = Ops::<Fetch>::new();

        assert_eq!(ops.schema().field(), "type");
        assert_eq!(
            ops.schema().tags(),
            ["idle", "loading", "success", "error"]
        );

        let retry = ops
            .handlers()
            .on("error", |_| Fetch::Loading { progress: 0 });
        let state = ops.transform(
            Fetch::Error {
                message: "timeout".into(),
            },
            &retry,
        );
        assert_eq!(state, Fetch::Loading { progress: 0 });
        assert!(state.is_loading());
        assert!(ops.test("isLoading").unwrap().test(&state));

        let label = ops.r#match(
            &state,
            &ops.handlers()
                .on("idle", |_| "idle")
                .on("loading", |_| "busy")
                .on("success", |_| "done")
                .on("error", |_| "failed"),
        );
        assert_eq!(label, Ok("busy"));
    }

    #[test]
    fn concurrent_first_requests_agree() {
        let ops = Ops::<Fetch>::new();

        let tests: Vec<_> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| ops.test("isSuccess")))
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap().unwrap())
                .collect()
        });

        assert!(tests.windows(2).all(|pair| pair[0].ptr_eq(&pair[1])));
        assert!(tests[0].ptr_eq(&ops.test("isSuccess").unwrap()));
    }
}
