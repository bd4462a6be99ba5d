use std::fmt;
use std::sync::Arc;

use sortby_common::error::{BoxedError, SortError, SortResult};
use sortby_common::ordering::SortOrdering;
use sortby_common::record::Record;
use sortby_common::value::Value;

/// Type-erased extractor shared by a criterion and every comparator built from it.
pub type Extractor<T> = Arc<dyn Fn(&T) -> Result<Value, BoxedError> + Send + Sync>;

/// Reads a named field off a record. Always `<T as Record>::field`.
pub type FieldAccessor<T> = fn(&T, &str) -> Option<Value>;

/// Sort on a named field of a [`Record`].
pub struct FieldCriterion<T> {
    name: String,
    ordering: SortOrdering,
    accessor: FieldAccessor<T>,
}

impl<T> FieldCriterion<T> {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn ordering(&self) -> SortOrdering {
        self.ordering
    }
}

/// Sort on a value derived from the record by an extractor function.
pub struct ExtractorCriterion<T> {
    extractor: Extractor<T>,
    ordering: SortOrdering,
}

impl<T> ExtractorCriterion<T> {
    #[inline]
    pub fn ordering(&self) -> SortOrdering {
        self.ordering
    }
}

/// A single sort key together with its direction.
///
/// Bare criteria sort ascending; use [`Criterion::desc`], [`Criterion::with_ordering`] or
/// [`Criterion::with_direction`] to change that.
pub enum Criterion<T> {
    Field(FieldCriterion<T>),
    Extractor(ExtractorCriterion<T>),
}

impl<T: Record> Criterion<T> {
    /// Ascending order on the field `name`.
    pub fn field(name: impl Into<String>) -> Self {
        Criterion::Field(FieldCriterion {
            name: name.into(),
            ordering: SortOrdering::Ascending,
            accessor: <T as Record>::field,
        })
    }
}

impl<T> Criterion<T> {
    /// Ascending order on the value returned by `f`.
    pub fn extractor<F, V>(f: F) -> Self
    where
        F: Fn(&T) -> V + Send + Sync + 'static,
        V: Into<Value>,
    {
        Criterion::Extractor(ExtractorCriterion {
            extractor: Arc::new(move |record: &T| -> Result<Value, BoxedError> {
                Ok(f(record).into())
            }),
            ordering: SortOrdering::Ascending,
        })
    }

    /// Ascending order on the value returned by a fallible `f`.
    ///
    /// Errors surface from [`Comparator::try_compare`](crate::Comparator::try_compare) and
    /// [`Comparator::try_sort`](crate::Comparator::try_sort); [`Comparator::compare`](crate::Comparator::compare)
    /// panics on them.
    pub fn try_extractor<F, V, E>(f: F) -> Self
    where
        F: Fn(&T) -> Result<V, E> + Send + Sync + 'static,
        V: Into<Value>,
        E: Into<BoxedError>,
    {
        Criterion::Extractor(ExtractorCriterion {
            extractor: Arc::new(move |record: &T| -> Result<Value, BoxedError> {
                f(record).map(Into::into).map_err(Into::into)
            }),
            ordering: SortOrdering::Ascending,
        })
    }

    #[inline]
    pub fn ordering(&self) -> SortOrdering {
        match self {
            Criterion::Field(c) => c.ordering,
            Criterion::Extractor(c) => c.ordering,
        }
    }

    pub fn with_ordering(mut self, ordering: SortOrdering) -> Self {
        match &mut self {
            Criterion::Field(c) => c.ordering = ordering,
            Criterion::Extractor(c) => c.ordering = ordering,
        }
        self
    }

    /// Sets the direction from an `asc` / `desc` token.
    pub fn with_direction(self, direction: &str) -> SortResult<Self> {
        Ok(self.with_ordering(direction.parse()?))
    }

    #[inline]
    pub fn asc(self) -> Self {
        self.with_ordering(SortOrdering::Ascending)
    }

    #[inline]
    pub fn desc(self) -> Self {
        self.with_ordering(SortOrdering::Descending)
    }

    /// Normalizes the criterion into an extractor and a direction.
    pub(crate) fn resolve(self) -> ResolvedCriterion<T>
    where
        T: 'static,
    {
        match self {
            Criterion::Field(FieldCriterion {
                name,
                ordering,
                accessor,
            }) => {
                let label: Arc<str> = name.into();
                let field = label.clone();
                ResolvedCriterion {
                    label: Some(label),
                    extractor: Arc::new(move |record: &T| -> Result<Value, BoxedError> {
                        Ok(accessor(record, &field).unwrap_or_default())
                    }),
                    ordering,
                }
            }
            Criterion::Extractor(ExtractorCriterion {
                extractor,
                ordering,
            }) => ResolvedCriterion {
                label: None,
                extractor,
                ordering,
            },
        }
    }
}

impl<T> Clone for Criterion<T> {
    fn clone(&self) -> Self {
        match self {
            Criterion::Field(c) => Criterion::Field(FieldCriterion {
                name: c.name.clone(),
                ordering: c.ordering,
                accessor: c.accessor,
            }),
            Criterion::Extractor(c) => Criterion::Extractor(ExtractorCriterion {
                extractor: c.extractor.clone(),
                ordering: c.ordering,
            }),
        }
    }
}

impl<T> fmt::Debug for Criterion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criterion::Field(c) => f
                .debug_struct("Field")
                .field("name", &c.name)
                .field("ordering", &c.ordering)
                .finish(),
            Criterion::Extractor(c) => f
                .debug_struct("Extractor")
                .field("ordering", &c.ordering)
                .finish_non_exhaustive(),
        }
    }
}

impl<T: Record> From<&str> for Criterion<T> {
    #[inline]
    fn from(name: &str) -> Self {
        Criterion::field(name)
    }
}

impl<T: Record> From<String> for Criterion<T> {
    #[inline]
    fn from(name: String) -> Self {
        Criterion::field(name)
    }
}

impl<T: Record> From<(&str, SortOrdering)> for Criterion<T> {
    #[inline]
    fn from((name, ordering): (&str, SortOrdering)) -> Self {
        Criterion::field(name).with_ordering(ordering)
    }
}

impl<T: Record> TryFrom<(&str, &str)> for Criterion<T> {
    type Error = SortError;

    /// Builds a field criterion from a `(field, direction)` pair, rejecting blank field names and
    /// unknown directions.
    fn try_from((name, direction): (&str, &str)) -> SortResult<Self> {
        if name.trim().is_empty() {
            return Err(SortError::malformed("field name is empty"));
        }
        Criterion::field(name).with_direction(direction)
    }
}

/// One link of a comparator's chain.
pub(crate) struct ResolvedCriterion<T> {
    label: Option<Arc<str>>,
    extractor: Extractor<T>,
    pub(crate) ordering: SortOrdering,
}

impl<T> ResolvedCriterion<T> {
    #[inline]
    pub(crate) fn extract(&self, record: &T) -> Result<Value, BoxedError> {
        (self.extractor)(record)
    }

    #[inline]
    pub(crate) fn label(&self) -> &str {
        self.label.as_deref().unwrap_or("<extractor>")
    }

    pub(crate) fn reversed(&self) -> Self {
        Self {
            ordering: self.ordering.reverse(),
            ..self.clone()
        }
    }
}

impl<T> Clone for ResolvedCriterion<T> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            extractor: self.extractor.clone(),
            ordering: self.ordering,
        }
    }
}

impl<T> fmt::Debug for ResolvedCriterion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.label(), self.ordering)
    }
}
