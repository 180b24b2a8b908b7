use std::fmt;

/// A single spreadsheet value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Excel serial date/time
    DateTime(f64),
    /// Formula error such as `#N/A`
    Error(String),
}

impl Cell {
    /// String form of the value, as used for pattern matching and validation
    pub fn to_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Int(i) => i.to_string(),
            Cell::Float(f) | Cell::DateTime(f) => format_float(*f),
            Cell::Bool(b) => b.to_string(),
            Cell::Error(e) => e.clone(),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s)
        }
    }
}

/// Integers stored as floats print without a fractional part
fn format_float(f: f64) -> String {
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        (f as i64).to_string()
    } else {
        f.to_string()
    }
}

/// Rows of cells under an ordered header
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Build a table; every row is padded or truncated to the header width.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Empty);
                row
            })
            .collect();

        Table { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Coerced string values of one column, in row order
    pub fn column_texts(&self, col_idx: usize) -> impl Iterator<Item = String> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(col_idx).map(Cell::to_text).unwrap_or_default())
    }

    /// New table holding the rows for which `keep` returns true
    pub fn filter_rows<F>(&self, mut keep: F) -> Table
    where
        F: FnMut(&[Cell]) -> bool,
    {
        Table {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| keep(row))
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_row(values: &[&str]) -> Vec<Cell> {
        values.iter().map(|v| Cell::from(*v)).collect()
    }

    #[test]
    fn test_cell_to_text() {
        assert_eq!(Cell::Empty.to_text(), "");
        assert_eq!(Cell::Text("abc".to_string()).to_text(), "abc");
        assert_eq!(Cell::Int(-7).to_text(), "-7");
        assert_eq!(Cell::Float(42.0).to_text(), "42");
        assert_eq!(Cell::Float(1.5).to_text(), "1.5");
        // 2^63 does not fit an i64
        assert_eq!(Cell::Float(9_223_372_036_854_775_808.0).to_text(), "9223372036854775808");
        assert_eq!(Cell::Float(-9_223_372_036_854_775_808.0).to_text(), "-9223372036854775808");
        assert_eq!(Cell::Bool(true).to_text(), "true");
        assert_eq!(Cell::DateTime(45000.0).to_text(), "45000");
        assert_eq!(Cell::Error("#N/A".to_string()).to_text(), "#N/A");
    }

    #[test]
    fn test_rows_are_padded_and_truncated() {
        let table = Table::new(
            vec!["a".to_string(), "b".to_string()],
            vec![text_row(&["1"]), text_row(&["1", "2", "3"])],
        );
        assert_eq!(table.rows()[0], vec![Cell::from("1"), Cell::Empty]);
        assert_eq!(table.rows()[1], vec![Cell::from("1"), Cell::from("2")]);
    }

    #[test]
    fn test_column_texts() {
        let table = Table::new(
            vec!["n".to_string()],
            vec![vec![Cell::Int(1)], vec![Cell::Empty], vec![Cell::Float(2.25)]],
        );
        let texts: Vec<String> = table.column_texts(0).collect();
        assert_eq!(texts, vec!["1", "", "2.25"]);
    }

    #[test]
    fn test_filter_rows_keeps_order_and_leaves_source_untouched() {
        let table = Table::new(
            vec!["v".to_string()],
            vec![text_row(&["a"]), text_row(&["b"]), text_row(&["c"])],
        );
        let filtered = table.filter_rows(|row| row[0].to_text() != "b");

        assert_eq!(filtered.columns(), table.columns());
        assert_eq!(filtered.rows(), &[text_row(&["a"]), text_row(&["c"])]);
        assert_eq!(table.row_count(), 3);
    }
}
