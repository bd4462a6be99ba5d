use std::cmp::Ordering;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use itertools::Itertools;
use sortby_common::error::{SortError, SortResult};
use sortby_common::value::Value;
use tracing::{debug, trace};

use crate::criterion::{Criterion, ResolvedCriterion};

/// Builds a comparator from criteria in priority order.
///
/// Each criterion is resolved into an extractor and a direction right here, once; comparisons only
/// run the resolved chain. Later criteria break ties left by earlier ones. With no criteria every
/// pair compares `Equal`.
///
/// ```ignore
/// let cmp = by([Criterion::field("name"), Criterion::field("age").desc()]);
/// people.sort_by(cmp.into_fn());
/// ```
pub fn by<T, C>(criteria: impl IntoIterator<Item = C>) -> Comparator<T>
where
    T: 'static,
    C: Into<Criterion<T>>,
{
    let chain: Arc<[ResolvedCriterion<T>]> = criteria
        .into_iter()
        .map(|c| {
            let criterion: Criterion<T> = c.into();
            let resolved = criterion.resolve();
            trace!(criterion = ?resolved, "resolved sort criterion");
            resolved
        })
        .collect();
    debug!(criteria = chain.len(), "built comparator");
    Comparator { chain }
}

/// A two-record ordering function backed by a resolved criterion chain.
///
/// Cloning is cheap and the chain is never mutated, so a comparator can be shared freely between
/// threads.
pub struct Comparator<T> {
    chain: Arc<[ResolvedCriterion<T>]>,
}

impl<T> Comparator<T> {
    #[inline]
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Compares two records, reporting the first extractor failure.
    pub fn try_compare(&self, left: &T, right: &T) -> SortResult<Ordering> {
        for (index, criterion) in self.chain.iter().enumerate() {
            let extract = |record: &T| {
                criterion
                    .extract(record)
                    .map_err(|source| SortError::Extract {
                        criterion: index,
                        source,
                    })
            };
            let (l, r) = (extract(left)?, extract(right)?);
            if let Some(ordering) = criterion.ordering.decide(l.partial_compare(&r)) {
                return Ok(ordering);
            }
        }
        Ok(Ordering::Equal)
    }

    /// Compares two records.
    ///
    /// # Panics
    ///
    /// Panics if a fallible extractor fails. Use [`Comparator::try_compare`] or
    /// [`Comparator::try_sort`] to handle such failures.
    pub fn compare(&self, left: &T, right: &T) -> Ordering {
        match self.try_compare(left, right) {
            Ok(ordering) => ordering,
            Err(err) => match err.source() {
                Some(source) => panic!("{err}: {source}"),
                None => panic!("{err}"),
            },
        }
    }

    /// Returns the comparator as a plain closure, e.g. for [`slice::sort_by`].
    pub fn into_fn(self) -> impl Fn(&T, &T) -> Ordering + Clone + Send + Sync {
        move |left: &T, right: &T| self.compare(left, right)
    }

    /// Stable sort of `items`.
    ///
    /// # Panics
    ///
    /// Same as [`Comparator::compare`].
    pub fn sort(&self, items: &mut [T]) {
        items.sort_by(|l, r| self.compare(l, r));
    }

    /// Stable sort of `items` that reports extractor failures instead of panicking.
    ///
    /// Every sort key of every item is extracted before anything moves, so on error `items` is
    /// left untouched. Unlike [`Comparator::compare`] this also runs extractors of criteria that
    /// would never be reached because an earlier one already decides.
    pub fn try_sort(&self, items: &mut [T]) -> SortResult<()> {
        let keys: Vec<Vec<Value>> = items
            .iter()
            .map(|item| self.extract_keys(item))
            .try_collect()?;
        debug!(items = items.len(), criteria = self.len(), "sorting by extracted keys");
        let mut order = (0..items.len()).collect_vec();
        order.sort_by(|&l, &r| self.compare_keys(&keys[l], &keys[r]));
        apply_permutation(items, order);
        Ok(())
    }

    /// Appends the criteria of `other` as further tie-breakers.
    pub fn then(self, other: Comparator<T>) -> Self {
        let chain = self.chain.iter().chain(other.chain.iter()).cloned().collect();
        Self { chain }
    }

    /// Flips the direction of every criterion.
    pub fn reversed(self) -> Self {
        let chain = self.chain.iter().map(ResolvedCriterion::reversed).collect();
        Self { chain }
    }

    fn extract_keys(&self, record: &T) -> SortResult<Vec<Value>> {
        self.chain
            .iter()
            .enumerate()
            .map(|(index, criterion)| {
                criterion
                    .extract(record)
                    .map_err(|source| SortError::Extract {
                        criterion: index,
                        source,
                    })
            })
            .try_collect()
    }

    fn compare_keys(&self, left: &[Value], right: &[Value]) -> Ordering {
        self.chain
            .iter()
            .zip(left.iter().zip(right))
            .find_map(|(criterion, (l, r))| criterion.ordering.decide(l.partial_compare(r)))
            .unwrap_or(Ordering::Equal)
    }
}

impl<T> Clone for Comparator<T> {
    fn clone(&self) -> Self {
        Self {
            chain: self.chain.clone(),
        }
    }
}

impl<T> fmt::Debug for Comparator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.chain.iter()).finish()
    }
}

/// Rearranges `items` so that position `i` holds the element previously at `order[i]`.
fn apply_permutation<T>(items: &mut [T], mut order: Vec<usize>) {
    debug_assert_eq!(items.len(), order.len());
    for start in 0..items.len() {
        if order[start] == start {
            continue;
        }
        let mut current = start;
        loop {
            let next = order[current];
            order[current] = current;
            if next == start {
                break;
            }
            items.swap(current, next);
            current = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    use insta::assert_snapshot;
    use serde_json::{Value as Json, json};
    use tracing::{Event, Level, Metadata, Subscriber, span};

    use super::*;

    fn names(rows: &[Json]) -> String {
        rows.iter()
            .map(|r| format!("{}:{}", r["name"].as_str().unwrap(), r["age"]))
            .join(" ")
    }

    fn people() -> Vec<Json> {
        vec![
            json!({ "name": "Bob", "age": 23 }),
            json!({ "name": "Alice", "age": 23 }),
            json!({ "name": "Chloe", "age": 42 }),
            json!({ "name": "Bob", "age": 21 }),
        ]
    }

    #[test]
    fn test_single_key() {
        let mut rows = vec![json!({ "n": 3 }), json!({ "n": 1 }), json!({ "n": 2 })];
        by::<Json, _>(["n"]).sort(&mut rows);
        assert_eq!(rows, vec![json!({ "n": 1 }), json!({ "n": 2 }), json!({ "n": 3 })]);

        by([Criterion::field("n").desc()]).sort(&mut rows);
        assert_eq!(rows, vec![json!({ "n": 3 }), json!({ "n": 2 }), json!({ "n": 1 })]);
    }

    #[test]
    fn test_tie_breakers() {
        let mut rows = people();
        by([Criterion::field("name"), Criterion::field("age").desc()]).sort(&mut rows);
        assert_snapshot!(names(&rows), @"Alice:23 Bob:23 Bob:21 Chloe:42");

        by([Criterion::field("age").desc(), Criterion::field("name")]).sort(&mut rows);
        assert_snapshot!(names(&rows), @"Chloe:42 Alice:23 Bob:23 Bob:21");
    }

    #[test]
    fn test_empty_chain() {
        let cmp = by::<Json, Criterion<Json>>([]);
        assert!(cmp.is_empty());
        let rows = people();
        for (l, r) in rows.iter().cartesian_product(&rows) {
            assert_eq!(cmp.compare(l, r), Ordering::Equal);
        }
        let mut sorted = rows.clone();
        cmp.sort(&mut sorted);
        assert_eq!(sorted, rows);
    }

    #[test]
    fn test_first_decisive_criterion_wins() {
        let cmp = by([
            Criterion::field("age"),
            Criterion::try_extractor(|_: &Json| Err::<i32, _>("must not be reached")),
        ]);
        let (young, old) = (json!({ "age": 1 }), json!({ "age": 2 }));
        assert_eq!(cmp.try_compare(&young, &old).unwrap(), Ordering::Less);
        assert_eq!(cmp.compare(&old, &young), Ordering::Greater);
    }

    #[test]
    fn test_non_comparable_values_fall_through() {
        let cmp = by([Criterion::field("score"), Criterion::field("id")]);
        let nan = json!({ "score": "n/a", "id": 2 });
        let num = json!({ "score": 1.5, "id": 1 });
        let missing = json!({ "id": 3 });
        assert_eq!(cmp.compare(&nan, &num), Ordering::Greater);
        assert_eq!(cmp.compare(&num, &missing), Ordering::Less);

        let cmp = by([
            Criterion::extractor(|x: &f64| *x).desc(),
            Criterion::extractor(|x: &f64| x.is_nan()),
        ]);
        assert_eq!(cmp.compare(&f64::NAN, &1.0), Ordering::Greater);
        assert_eq!(cmp.compare(&f64::NAN, &f64::NAN), Ordering::Equal);
    }

    #[test]
    fn test_extractor_failure() {
        let cmp = by([
            Criterion::field("name"),
            Criterion::try_extractor(|r: &Json| r["age"].as_i64().ok_or("age is missing")),
        ]);
        let err = cmp
            .try_compare(&json!({ "name": "x", "age": 1 }), &json!({ "name": "x" }))
            .unwrap_err();
        assert!(matches!(err, SortError::Extract { criterion: 1, .. }));
        assert_snapshot!(err.source().unwrap().to_string(), @"age is missing");

        let mut rows = vec![json!({ "name": "b", "age": 1 }), json!({ "name": "a" })];
        let before = rows.clone();
        assert!(cmp.try_sort(&mut rows).is_err());
        assert_eq!(rows, before);
    }

    #[test]
    #[should_panic(expected = "failed to extract sort key for criterion #0: boom")]
    fn test_compare_panics_on_extractor_failure() {
        let cmp = by([Criterion::try_extractor(|_: &i32| Err::<i32, _>("boom"))]);
        let _ = cmp.compare(&1, &2);
    }

    #[test]
    fn test_try_sort_matches_sort() {
        let cmp = by([Criterion::field("age"), Criterion::field("name").desc()]);
        let mut expected = people();
        cmp.sort(&mut expected);
        let mut rows = people();
        cmp.try_sort(&mut rows).unwrap();
        assert_eq!(rows, expected);
        assert_snapshot!(names(&rows), @"Bob:21 Bob:23 Alice:23 Chloe:42");
    }

    #[test]
    fn test_then_and_reversed() {
        let cmp = by::<Json, _>(["age"]).then(by(["name"]));
        assert_eq!(cmp.len(), 2);
        assert_snapshot!(format!("{cmp:?}"), @"[age asc, name asc]");
        let mut rows = people();
        cmp.clone().reversed().sort(&mut rows);
        assert_snapshot!(names(&rows), @"Chloe:42 Bob:23 Alice:23 Bob:21");
        cmp.sort(&mut rows);
        assert_snapshot!(names(&rows), @"Bob:21 Alice:23 Bob:23 Chloe:42");
    }

    #[test]
    fn test_into_fn() {
        let f = by([
            Criterion::extractor(|s: &&str| s.len()),
            Criterion::extractor(|s: &&str| *s),
        ])
        .into_fn();
        let mut words = vec!["pear", "fig", "apple", "kiwi"];
        words.sort_by(&f);
        assert_eq!(words, ["fig", "kiwi", "pear", "apple"]);
    }

    #[test]
    fn test_try_sort_extracts_once_per_item() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let cmp = by([
            Criterion::field("age"),
            Criterion::extractor(move |r: &Json| {
                counter.fetch_add(1, AtomicOrdering::Relaxed);
                r["name"].as_str().map(str::to_owned)
            }),
        ]);
        let mut rows = people();
        cmp.try_sort(&mut rows).unwrap();
        assert_eq!(calls.load(AtomicOrdering::Relaxed), rows.len());
        assert_snapshot!(names(&rows), @"Bob:21 Alice:23 Bob:23 Chloe:42");
    }

    /// Counts `TRACE` events.
    struct TraceCounter(Arc<AtomicUsize>);

    impl Subscriber for TraceCounter {
        fn enabled(&self, _: &Metadata<'_>) -> bool {
            true
        }

        fn new_span(&self, _: &span::Attributes<'_>) -> span::Id {
            span::Id::from_u64(1)
        }

        fn record(&self, _: &span::Id, _: &span::Record<'_>) {}

        fn record_follows_from(&self, _: &span::Id, _: &span::Id) {}

        fn event(&self, event: &Event<'_>) {
            if *event.metadata().level() == Level::TRACE {
                self.0.fetch_add(1, AtomicOrdering::Relaxed);
            }
        }

        fn enter(&self, _: &span::Id) {}

        fn exit(&self, _: &span::Id) {}
    }

    #[test]
    fn test_criteria_resolved_once_at_build() {
        let events = Arc::new(AtomicUsize::new(0));
        let subscriber = TraceCounter(events.clone());
        tracing::subscriber::with_default(subscriber, || {
            let cmp = by([Criterion::field("age"), Criterion::field("name").desc()]);
            assert_eq!(events.load(AtomicOrdering::Relaxed), 2);

            let mut rows: Vec<Json> = std::iter::repeat_n(people(), 16).flatten().collect();
            cmp.sort(&mut rows);
            cmp.try_sort(&mut rows).unwrap();
            for (l, r) in rows.iter().tuple_windows() {
                assert_ne!(cmp.compare(l, r), Ordering::Greater);
            }
        });
        assert_eq!(events.load(AtomicOrdering::Relaxed), 2);
    }

    #[test]
    fn test_apply_permutation() {
        let mut items = vec!['a', 'b', 'c', 'd', 'e'];
        apply_permutation(&mut items, vec![2, 0, 1, 4, 3]);
        assert_eq!(items, ['c', 'a', 'b', 'e', 'd']);
    }
}
