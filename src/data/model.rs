use indexmap::IndexMap;

// ---------------------------------------------------------------------------
// Dataset – ordered column name → values mapping
// ---------------------------------------------------------------------------

/// A parsed data sheet: every column in sheet order, all of equal length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: IndexMap<String, Vec<f64>>,
}

impl Dataset {
    /// Build a dataset from `(name, values)` pairs, keeping their order.
    ///
    /// Callers are expected to pass columns of equal length; the loader
    /// guarantees this for sheets it parses.
    pub fn from_columns<I>(columns: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<f64>)>,
    {
        Self {
            columns: columns.into_iter().collect(),
        }
    }

    /// Column names in sheet order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Values of a single column.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows (records).
    pub fn len(&self) -> usize {
        self.columns.values().next().map_or(0, Vec::len)
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
