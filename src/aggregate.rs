use std::{borrow::Borrow, slice, vec};

use rustc_hash::FxHashMap;

use crate::{handler::PredicateMap, tag::Tagged};

/// One discriminator or a set of them, for [`Ops::filter`](crate::Ops::filter).
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Selector<'a> {
    One(&'a str),
    Any(Vec<&'a str>),
}

impl Selector<'_> {
    #[must_use]
    pub fn matches(&self, tag: &str) -> bool {
        match self {
            Self::One(one) => *one == tag,
            Self::Any(any) => any.contains(&tag),
        }
    }
}

impl<'a> From<&'a str> for Selector<'a> {
    fn from(tag: &'a str) -> Self {
        Self::One(tag)
    }
}

impl<'a> From<&'a String> for Selector<'a> {
    fn from(tag: &'a String) -> Self {
        Self::One(tag)
    }
}

impl<'a> From<&[&'a str]> for Selector<'a> {
    fn from(tags: &[&'a str]) -> Self {
        Self::Any(tags.to_vec())
    }
}

impl<'a, const N: usize> From<[&'a str; N]> for Selector<'a> {
    fn from(tags: [&'a str; N]) -> Self {
        Self::Any(tags.to_vec())
    }
}

impl<'a> From<Vec<&'a str>> for Selector<'a> {
    fn from(tags: Vec<&'a str>) -> Self {
        Self::Any(tags)
    }
}

pub(crate) fn filter<T, I>(values: I, selector: &Selector<'_>) -> Vec<I::Item>
where
    T: Tagged + ?Sized,
    I: IntoIterator,
    I::Item: Borrow<T>,
{
    values
        .into_iter()
        .filter(|value| selector.matches(Borrow::<T>::borrow(value).tag()))
        .collect()
}

pub(crate) fn filter_by<T, I>(values: I, predicates: &PredicateMap<'_, T>) -> Vec<I::Item>
where
    T: Tagged + ?Sized,
    I: IntoIterator,
    I::Item: Borrow<T>,
{
    if predicates.is_empty() {
        return Vec::new();
    }

    values
        .into_iter()
        .filter(|value| {
            let value = Borrow::<T>::borrow(value);
            predicates.apply(value.tag(), value).unwrap_or(false)
        })
        .collect()
}

pub(crate) fn partition<T, I>(values: I) -> Partition<I::Item>
where
    T: Tagged + ?Sized,
    I: IntoIterator,
    I::Item: Borrow<T>,
{
    let mut partition = Partition::default();
    for value in values {
        let tag = Borrow::<T>::borrow(&value).tag().to_string();
        partition.push(tag, value);
    }

    partition
}

/// Values grouped by discriminator.
///
/// Groups keep input order internally and appear in the order their
/// discriminator was first seen. A discriminator absent from the input has
/// no group at all, never an empty one.
///
/// # Examples
///
/// ```rust
/// use tagsum::{Ops, Record};
///
/// let ops = Ops::<Record>::open("type");
/// let groups = ops.partition([Record::unit("b"), Record::unit("a"), Record::unit("b")]);
///
/// assert_eq!(groups.tags().collect::<Vec<_>>(), ["b", "a"]);
/// assert_eq!(groups.get("b").map(<[_]>::len), Some(2));
/// assert!(groups.get("c").is_none());
/// ```
#[derive(Clone, Debug)]
pub struct Partition<V> {
    groups: Vec<(String, Vec<V>)>,
    index: FxHashMap<String, usize>,
}

impl<V> Partition<V> {
    fn push(&mut self, tag: String, value: V) {
        if let Some(&slot) = self.index.get(&tag) {
            self.groups[slot].1.push(value);
            return;
        }

        self.index.insert(tag.clone(), self.groups.len());
        self.groups.push((tag, vec![value]));
    }

    /// Members sharing `tag`; `None` means no members.
    #[must_use]
    pub fn get(&self, tag: &str) -> Option<&[V]> {
        self.index
            .get(tag)
            .map(|&slot| self.groups[slot].1.as_slice())
    }

    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.index.contains_key(tag)
    }

    /// Discriminators in first-seen order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(tag, _)| tag.as_str())
    }

    pub fn iter(&self) -> Groups<'_, V> {
        Groups {
            inner: self.groups.iter(),
        }
    }

    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of values across every group.
    #[must_use]
    pub fn total(&self) -> usize {
        self.groups.iter().map(|(_, members)| members.len()).sum()
    }

    /// Removes and returns the group for `tag`.
    pub fn take(&mut self, tag: &str) -> Option<Vec<V>> {
        let slot = self.index.remove(tag)?;
        let (_, members) = self.groups.remove(slot);
        for later in self.index.values_mut().filter(|s| **s > slot) {
            *later -= 1;
        }

        Some(members)
    }

    #[must_use]
    pub fn into_groups(self) -> Vec<(String, Vec<V>)> {
        self.groups
    }
}

impl<V> Default for Partition<V> {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            index: FxHashMap::default(),
        }
    }
}

impl<V: PartialEq> PartialEq for Partition<V> {
    fn eq(&self, other: &Self) -> bool {
        self.groups == other.groups
    }
}

impl<V: Eq> Eq for Partition<V> {}

/// Borrowing iterator over `(tag, members)` groups.
pub struct Groups<'a, V> {
    inner: slice::Iter<'a, (String, Vec<V>)>,
}

impl<'a, V> Iterator for Groups<'a, V> {
    type Item = (&'a str, &'a [V]);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(tag, members)| (tag.as_str(), members.as_slice()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, V> IntoIterator for &'a Partition<V> {
    type Item = (&'a str, &'a [V]);
    type IntoIter = Groups<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V> IntoIterator for Partition<V> {
    type Item = (String, Vec<V>);
    type IntoIter = vec::IntoIter<(String, Vec<V>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::HandlerMap;

    #[derive(Clone, Debug, PartialEq)]
    struct Item(&'static str, u32);

    impl Tagged for Item {
        fn tag(&self) -> &str {
            self.0
        }
    }

    fn items() -> Vec<Item> {
        vec![Item("a", 1), Item("b", 2), Item("a", 3), Item("c", 4)]
    }

    #[test]
    fn selector_membership() {
        assert!(Selector::from("a").matches("a"));
        assert!(!Selector::from("a").matches("b"));
        assert!(Selector::from(["a", "c"]).matches("c"));
        assert!(!Selector::from(Vec::new()).matches("a"));
    }

    #[test]
    fn filter_keeps_order_and_ownership() {
        let owned = filter::<Item, _>(items(), &Selector::from(["c", "a"]));
        assert_eq!(owned, [Item("a", 1), Item("a", 3), Item("c", 4)]);

        let values = items();
        let borrowed = filter::<Item, _>(&values, &"b".into());
        assert_eq!(borrowed, [&Item("b", 2)]);

        assert!(filter::<Item, _>(&values, &"z".into()).is_empty());
    }

    #[test]
    fn filter_by_excludes_unlisted_tags() {
        let predicates = HandlerMap::<'_, Item, bool>::new().on("a", |item| item.1 > 1);
        let kept = filter_by(items(), &predicates);

        assert_eq!(kept, [Item("a", 3)]);
        assert!(filter_by(items(), &HandlerMap::<'_, Item, bool>::new()).is_empty());
    }

    #[test]
    fn partition_groups_in_first_seen_order() {
        let groups = partition::<Item, _>(items());

        assert_eq!(groups.tags().collect::<Vec<_>>(), ["a", "b", "c"]);
        assert_eq!(groups.get("a"), Some(&[Item("a", 1), Item("a", 3)][..]));
        assert_eq!(groups.get("z"), None);
        assert_eq!(groups.total(), 4);
        assert_eq!(groups.len(), 3);
    }

    #[test]
    fn partition_of_nothing_is_empty() {
        let groups = partition::<Item, _>(Vec::<Item>::new());

        assert!(groups.is_empty());
        assert_eq!(groups.total(), 0);
    }

    #[test]
    fn take_reindexes_later_groups() {
        let mut groups = partition::<Item, _>(items());

        assert_eq!(groups.take("a"), Some(vec![Item("a", 1), Item("a", 3)]));
        assert_eq!(groups.take("a"), None);
        assert_eq!(groups.get("c"), Some(&[Item("c", 4)][..]));
        assert_eq!(groups.tags().collect::<Vec<_>>(), ["b", "c"]);
    }
}
