use std::fmt::{self, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Align {
    Left,
    Right,
}

pub(crate) struct Row {
    cells: Vec<String>,
}

impl Row {
    fn is_awk_safe(&self) -> bool {
        for cell in &self.cells {
            if cell.contains(|c: char| c.is_whitespace()) {
                return false;
            }
        }

        true
    }

    fn columns(&self) -> usize {
        self.cells.len()
    }
}

pub(crate) trait IntoRow: Into<Row> + Sized {
    fn into_row(self) -> Row {
        self.into()
    }
}

impl<T> IntoRow for T where T: Into<Row> + Sized {}

impl From<Vec<String>> for Row {
    fn from(value: Vec<String>) -> Self {
        Row { cells: value }
    }
}

impl From<Vec<&str>> for Row {
    fn from(value: Vec<&str>) -> Self {
        let value: Vec<String> = value.into_iter().map(|s| s.to_owned()).collect();

        value.into()
    }
}

pub(crate) struct Table {
    body: Vec<Row>,
    header: Option<Row>,
    num_columns: Option<usize>,
    alignment: Vec<Align>,
    print_header: bool,
}

impl Table {
    pub(crate) fn new() -> Table {
        Table {
            body: Vec::new(),
            header: None,
            num_columns: None,
            alignment: Vec::new(),
            print_header: true,
        }
    }

    fn expect_num_columns(&mut self, num_columns: usize) {
        if let Some(prev_num_columns) = &self.num_columns {
            if *prev_num_columns == num_columns {
                return;
            }
            panic!(
                "Table has {} columns but a row with {} columns was inserted",
                prev_num_columns, num_columns
            );
        } else {
            let _ = self.num_columns.insert(num_columns);
        }
    }

    pub(crate) fn print_header(&mut self, print_header: bool) {
        self.print_header = print_header;
    }

    /// Right-aligns the given (zero-based) column. Columns are left-aligned
    /// by default.
    pub(crate) fn align_right(&mut self, column: usize) {
        if self.alignment.len() <= column {
            self.alignment.resize(column + 1, Align::Left);
        }

        self.alignment[column] = Align::Right;
    }

    fn alignment(&self, column: usize) -> Align {
        self.alignment.get(column).copied().unwrap_or(Align::Left)
    }

    pub(crate) fn add_row<S: IntoRow>(&mut self, row: S) {
        let row = row.into_row();

        self.expect_num_columns(row.columns());

        self.body.push(row);
    }

    pub(crate) fn set_header<S: IntoRow>(&mut self, header: S) {
        let header = header.into_row();

        self.expect_num_columns(header.columns());

        if !header.is_awk_safe() {
            panic!("Table header is not awk safe, contains whitespace")
        }

        self.header.replace(header);
    }

    fn printed_rows(&self) -> Box<dyn Iterator<Item = &Row> + '_> {
        match self.print_header {
            true => Box::new(self.header.iter().chain(self.body.iter())),
            false => Box::new(self.body.iter()),
        }
    }

    fn column_widths(&self) -> Vec<usize> {
        let n_cols = match self.num_columns {
            Some(n_cols) => n_cols,
            None => return Vec::new(),
        };

        let mut widths = vec![0usize; n_cols];

        for row in self.printed_rows() {
            for (i, cell) in row.cells.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        widths
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let widths = self.column_widths();

        for row in self.printed_rows() {
            for (i, cell) in row.cells.iter().enumerate() {
                let last = i == row.cells.len() - 1;

                match self.alignment(i) {
                    Align::Right => {
                        f.write_fmt(format_args!("{:>width$}", cell, width = widths[i]))?
                    }
                    // No trailing padding after the last column
                    Align::Left if last => f.write_str(cell)?,
                    Align::Left => {
                        f.write_fmt(format_args!("{:<width$}", cell, width = widths[i]))?
                    }
                }

                if !last {
                    f.write_str("  ")?;
                }
            }

            f.write_char('\n')?;
        }

        Ok(())
    }
}

pub(crate) trait IntoTable: Into<Table> + Sized {
    fn into_table(self) -> Table {
        self.into()
    }
}

impl<T> IntoTable for T where T: Into<Table> + Sized {}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        let mut tab = Table::new();

        tab.set_header(vec!["MODEL", "YEAR", "PRICE"]);
        tab.add_row(vec!["Brio", "2016", "$ 7,000"]);
        tab.add_row(vec!["Fortuner", "2022", "$ 45,000"]);

        tab
    }

    #[test]
    fn test_left_aligned() {
        assert_eq!(
            table().to_string(),
            "MODEL     YEAR  PRICE\n\
             Brio      2016  $ 7,000\n\
             Fortuner  2022  $ 45,000\n"
        );
    }

    #[test]
    fn test_right_aligned() {
        let mut tab = table();

        tab.align_right(2);

        assert_eq!(
            tab.to_string(),
            "MODEL     YEAR     PRICE\n\
             Brio      2016   $ 7,000\n\
             Fortuner  2022  $ 45,000\n"
        );
    }

    #[test]
    fn test_headerless() {
        let mut tab = Table::new();

        tab.set_header(vec!["NO", "NAME"]);
        tab.add_row(vec!["1", "Budi"]);
        tab.print_header(false);

        assert_eq!(tab.to_string(), "1  Budi\n");
    }

    #[test]
    fn test_width_counts_characters() {
        let mut tab = Table::new();

        tab.add_row(vec!["é", "x"]);
        tab.add_row(vec!["ab", "y"]);

        assert_eq!(tab.to_string(), "é   x\nab  y\n");
    }

    #[test]
    #[should_panic]
    fn test_mismatched_columns() {
        let mut tab = table();

        tab.add_row(vec!["Civic"]);
    }
}
