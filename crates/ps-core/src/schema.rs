use serde::Serialize;

/// Ordered field names a trained classifier expects as input.
///
/// # Example
/// ```
/// use ps_core::schema::CanonicalSchema;
/// let schema = CanonicalSchema::new(["NHR", "HNR"]);
/// assert_eq!(schema.len(), 2);
/// assert_eq!(schema.names()[1], "HNR");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanonicalSchema {
    names: Vec<String>,
}

impl CanonicalSchema {
    /// Schema from any ordered collection of names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Field names in classifier order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// `true` for a schema with no field.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Feature values positioned 1:1 with a [`CanonicalSchema`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AlignedVector {
    values: Vec<f64>,
}

impl AlignedVector {
    /// Wrap values already in schema order.
    #[must_use]
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Values in schema order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Width of the row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` for an empty row.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Consume into the underlying row.
    #[must_use]
    pub fn into_inner(self) -> Vec<f64> {
        self.values
    }
}
