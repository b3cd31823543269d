use crate::runner::{QueryOutcome, Row};

/// Severity of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Info,
    Warning,
    Error,
}

/// What the user gets to see for one outcome: a status line or a table.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendering {
    Status { level: Level, message: String },
    Table(ResultTable),
}

impl Rendering {
    pub fn status<S: Into<String>>(level: Level, message: S) -> Rendering {
        Rendering::Status {
            level,
            message: message.into(),
        }
    }
}

/// Solutions laid out as a table: one column per variable seen in any
/// solution, one row per solution.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    pub title: String,
    pub columns: Vec<String>,
    /// Aligned with `columns`; `None` where a solution lacks that variable.
    pub rows: Vec<Vec<Option<String>>>,
}

impl ResultTable {
    pub fn from_rows(rows: &[Row]) -> ResultTable {
        let mut columns: Vec<String> = Vec::new();
        for row in rows {
            for var in row.vars() {
                if !columns.iter().any(|c| c == var) {
                    columns.push(var.to_owned());
                }
            }
        }
        let cells = rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|c| row.get(c).map(str::to_owned))
                    .collect()
            })
            .collect();
        ResultTable {
            title: format!("Found {} results:", rows.len()),
            columns,
            rows: cells,
        }
    }

    /// Width of every column in characters, header included.
    pub fn column_widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                self.rows
                    .iter()
                    .filter_map(|row| row[i].as_ref())
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    /// Aligned plain-text rendering, one line per row.
    pub fn to_plain_text(&self) -> String {
        let widths = self.column_widths();
        let line = |cells: Vec<&str>| {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_owned()
        };

        let mut out = String::new();
        out.push_str(&self.title);
        out.push('\n');
        out.push_str(&line(self.columns.iter().map(String::as_str).collect()));
        out.push('\n');
        out.push_str(
            &widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("-+-"),
        );
        out.push('\n');
        for row in &self.rows {
            out.push_str(&line(
                row.iter().map(|c| c.as_deref().unwrap_or("")).collect(),
            ));
            out.push('\n');
        }
        out
    }
}

impl QueryOutcome {
    /// How this outcome is shown for `query`.
    pub fn render(&self, query: &str) -> Rendering {
        match self {
            QueryOutcome::NoSolution => Rendering::status(Level::Info, "NOT VALID (false)"),
            QueryOutcome::ValidNoBindings => Rendering::status(Level::Info, "VALID (true)"),
            QueryOutcome::EvaluationError(msg) => Rendering::status(
                Level::Error,
                format!("Prolog query error in {}: {}", query.trim(), msg),
            ),
            QueryOutcome::BoundRows(rows) => Rendering::Table(ResultTable::from_rows(rows)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::evaluator::{Solution, Term};

    fn rows(solutions: Vec<Solution>) -> Vec<Row> {
        solutions.iter().map(Row::from).collect()
    }

    #[test]
    fn status_messages() {
        assert_eq!(
            QueryOutcome::NoSolution.render("rekomendasi_urutan(a, z)"),
            Rendering::status(Level::Info, "NOT VALID (false)")
        );
        assert_eq!(
            QueryOutcome::ValidNoBindings.render("lagu_ekstrem(gemuruh)"),
            Rendering::status(Level::Info, "VALID (true)")
        );
        match QueryOutcome::EvaluationError("oops".to_owned()).render(" foo(X ") {
            Rendering::Status { level, message } => {
                assert_eq!(level, Level::Error);
                assert_eq!(message, "Prolog query error in foo(X: oops");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn table_shape_follows_solutions() {
        let rows = rows(vec![
            Solution::new()
                .bind("X", Term::atom("kota_malam"))
                .bind("Y", Term::atom("lari_pagi")),
            Solution::new()
                .bind("X", Term::atom("lari_pagi"))
                .bind("Y", Term::atom("kota_malam")),
            Solution::new().bind("Z", Term::int(3)),
        ]);
        let table = match QueryOutcome::BoundRows(rows).render("q") {
            Rendering::Table(table) => table,
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(table.title, "Found 3 results:");
        assert_eq!(table.columns, vec!["X", "Y", "Z"]);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[2], vec![None, None, Some("3".to_owned())]);
        assert_eq!(table.column_widths(), vec![10, 10, 1]);
    }

    #[test]
    fn plain_text_table() {
        let rows = rows(vec![
            Solution::new().bind("X", Term::atom("gemuruh")),
            Solution::new().bind("X", Term::atom("hujan_pelan")),
        ]);
        let table = ResultTable::from_rows(&rows);
        assert_eq!(
            table.to_plain_text(),
            "Found 2 results:\nX\n-----------\ngemuruh\nhujan_pelan\n"
        );
    }
}
