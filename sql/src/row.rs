//! Result rows.

use confrow_core::{Mapping, Value};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// One result row: column labels paired with cell values, in result order.
///
/// Cells are always scalar [`Value`]s (`Null`, `Bool`, `Integer`, `Float`,
/// `String`, `Binary`). A row is built fresh for every call and belongs to
/// the caller.
///
/// # Examples
///
/// ```
/// use confrow_core::Value;
/// use confrow_sql::Row;
///
/// let row: Row = vec![
///     ("name".to_string(), Value::from("Ann")),
///     ("age".to_string(), Value::from(30)),
/// ]
/// .into_iter()
/// .collect();
///
/// assert_eq!(row.get("age"), Some(&Value::Integer(30)));
/// assert_eq!(row.columns().collect::<Vec<_>>(), ["name", "age"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: Vec<(String, Value)>,
}

impl Row {
    /// An empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty row with room for `capacity` cells.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: Vec::with_capacity(capacity),
        }
    }

    /// Appends a cell.
    pub fn push(&mut self, column: impl Into<String>, value: Value) {
        self.cells.push((column.into(), value));
    }

    /// Looks a cell up by column label. An exact match wins; otherwise the
    /// first label equal ignoring ASCII case is used, matching how SQL
    /// engines resolve unquoted names.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .or_else(|| {
                self.cells
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(column))
            })
            .map(|(_, value)| value)
    }

    /// Column labels in result order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    /// Label and cell pairs in result order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.cells.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Converts the row into the tree vocabulary shared with configuration
    /// documents. Column order is kept.
    pub fn into_mapping(self) -> Mapping {
        self.cells.into_iter().collect()
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Row {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.into_iter()
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (name, value) in &self.cells {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
