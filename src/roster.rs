use std::{fmt, fs::File, io::Read, path::Path};

use calamine::{open_workbook_auto, Data, Reader};
use log::info;
use serde::Serialize;

use crate::error::LoadError;

pub const NAME_COLUMN: &str = "name";
pub const SCORE_COLUMN: &str = "score";

/// A raw cell of the roster table, kept so extra columns survive the export untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    fn from_field(field: &str) -> Self {
        if field.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(field.to_owned())
        }
    }

    /// The cell as a finite number. "NaN" and "inf" parse as floats but are rejected.
    pub fn as_number(&self) -> Option<f64> {
        let number = match self {
            Cell::Number(number) => Some(*number),
            Cell::Text(text) => text.trim().parse().ok(),
            Cell::Empty => None,
        };
        number.filter(|number: &f64| number.is_finite())
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::Float(float) => Cell::Number(*float),
            Data::Int(int) => Cell::Number(*int as f64),
            Data::String(string) => Cell::from_field(string),
            other => Cell::Text(other.to_string()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Number(number) => write!(f, "{}", number),
            Cell::Text(text) => write!(f, "{}", text),
        }
    }
}

/// The students loaded from one file. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Roster {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
    name_column: usize,
    score_column: usize,
    names: Vec<String>,
    scores: Vec<f64>,
}

impl Roster {
    /// Reads the first table of a `.csv` file or the first sheet of a workbook.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let roster = match extension.as_str() {
            "csv" => Self::from_csv_reader(File::open(path)?)?,
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Self::from_workbook(path)?,
            _ => return Err(LoadError::UnsupportedFormat(path.display().to_string())),
        };

        info!("loaded {} students from {}", roster.len(), path.display());

        Ok(roster)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

        let headers = csv_reader.headers()?.iter().map(String::from).collect();

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            rows.push(record?.iter().map(Cell::from_field).collect());
        }

        Self::from_table(headers, rows)
    }

    fn from_workbook(path: &Path) -> Result<Self, LoadError> {
        let mut workbook = open_workbook_auto(path)?;
        let range = workbook.worksheet_range_at(0).ok_or(LoadError::NoSheet)??;
        // the range begins at the first used cell, not necessarily at A1
        let header_row = range.start().map(|(row, _)| row as usize + 1).unwrap_or(1);

        let mut sheet_rows = range.rows();
        let headers = sheet_rows
            .next()
            .map(|header_row| header_row.iter().map(|data| data.to_string()).collect())
            .unwrap_or_default();
        let rows = sheet_rows
            .map(|row| row.iter().map(Cell::from).collect())
            .collect();

        Self::from_table_at(headers, rows, header_row)
    }

    /// Validates the table and extracts names and original scores.
    ///
    /// Rows shorter than the header are padded with empty cells. Row numbers in
    /// errors count the header as row 1.
    pub fn from_table(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self, LoadError> {
        Self::from_table_at(headers, rows, 1)
    }

    // `header_row` is the 1-based sheet row holding the header
    fn from_table_at(
        headers: Vec<String>,
        mut rows: Vec<Vec<Cell>>,
        header_row: usize,
    ) -> Result<Self, LoadError> {
        let name_column = headers.iter().position(|header| header == NAME_COLUMN);
        let score_column = headers.iter().position(|header| header == SCORE_COLUMN);

        let (name_column, score_column) = match (name_column, score_column) {
            (Some(name_column), Some(score_column)) => (name_column, score_column),
            (name_column, score_column) => {
                let mut missing = Vec::new();
                if name_column.is_none() {
                    missing.push(NAME_COLUMN);
                }
                if score_column.is_none() {
                    missing.push(SCORE_COLUMN);
                }
                return Err(LoadError::MissingColumns(missing));
            }
        };

        let mut names = Vec::with_capacity(rows.len());
        let mut scores = Vec::with_capacity(rows.len());

        for (index, row) in rows.iter_mut().enumerate() {
            if row.len() < headers.len() {
                row.resize(headers.len(), Cell::Empty);
            }

            let score_cell = &row[score_column];
            let score = score_cell.as_number().ok_or_else(|| LoadError::InvalidScore {
                row: header_row + index + 1,
                value: score_cell.to_string(),
            })?;

            names.push(row[name_column].to_string());
            scores.push(score);
        }

        Ok(Roster {
            headers,
            rows,
            name_column,
            score_column,
            names,
            scores,
        })
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn name_column(&self) -> usize {
        self.name_column
    }

    pub fn score_column(&self) -> usize {
        self.score_column
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The original, unadjusted scores in roster order.
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }
}

#[cfg(test)]
mod tests {
    use super::{Cell, Roster};
    use crate::error::LoadError;
    use rust_xlsxwriter::Workbook;

    #[test]
    fn read_roster_with_extra_columns() {
        let csv = "id,name,score,class\n1,ada,58.5,A\n2,ben,91,B\n";

        let roster = Roster::from_csv_reader(csv.as_bytes()).unwrap();

        assert_eq!(roster.len(), 2);
        assert_eq!(roster.names(), ["ada", "ben"]);
        assert_eq!(roster.scores(), [58.5, 91.0]);
        assert_eq!(roster.headers(), ["id", "name", "score", "class"]);
        assert_eq!(roster.rows()[1][3], Cell::Text("B".to_owned()));
        assert_eq!(roster.score_column(), 2);
    }

    #[test]
    fn missing_columns_are_reported() {
        let csv = "student,points\nada,58\n";

        match Roster::from_csv_reader(csv.as_bytes()) {
            Err(LoadError::MissingColumns(missing)) => assert_eq!(missing, vec!["name", "score"]),
            other => panic!("expected missing columns, got {:?}", other),
        }
    }

    #[test]
    fn column_names_match_literally() {
        let csv = "Name,score\nada,58\n";

        match Roster::from_csv_reader(csv.as_bytes()) {
            Err(LoadError::MissingColumns(missing)) => assert_eq!(missing, vec!["name"]),
            other => panic!("expected missing columns, got {:?}", other),
        }
    }

    #[test]
    fn non_numeric_score_is_rejected() {
        let csv = "name,score\nada,58\nben,absent\n";

        match Roster::from_csv_reader(csv.as_bytes()) {
            Err(LoadError::InvalidScore { row, value }) => {
                assert_eq!(row, 3);
                assert_eq!(value, "absent");
            }
            other => panic!("expected invalid score, got {:?}", other),
        }
    }

    #[test]
    fn non_finite_score_is_rejected() {
        for value in ["NaN", "inf", "-inf"] {
            let csv = format!("name,score\nada,58\nben,{}\n", value);

            match Roster::from_csv_reader(csv.as_bytes()) {
                Err(LoadError::InvalidScore { row, value: reported }) => {
                    assert_eq!(row, 3);
                    assert_eq!(reported, value);
                }
                other => panic!("expected invalid score for {}, got {:?}", value, other),
            }
        }
    }

    #[test]
    fn non_finite_number_cell_is_rejected() {
        let headers = vec!["name".to_owned(), "score".to_owned()];
        let rows = vec![vec![Cell::Text("ada".to_owned()), Cell::Number(f64::NAN)]];

        assert!(matches!(
            Roster::from_table(headers, rows),
            Err(LoadError::InvalidScore { row: 2, .. })
        ));
    }

    #[test]
    fn workbook_rows_count_from_the_sheet_top() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("offset.xlsx");

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        // header on sheet row 3, the invalid score on sheet row 5
        worksheet.write_string(2, 1, "name").unwrap();
        worksheet.write_string(2, 2, "score").unwrap();
        worksheet.write_string(3, 1, "ada").unwrap();
        worksheet.write_number(3, 2, 58.0).unwrap();
        worksheet.write_string(4, 1, "ben").unwrap();
        worksheet.write_string(4, 2, "absent").unwrap();
        workbook.save(&path).unwrap();

        match Roster::from_path(&path) {
            Err(LoadError::InvalidScore { row, value }) => {
                assert_eq!(row, 5);
                assert_eq!(value, "absent");
            }
            other => panic!("expected invalid score, got {:?}", other),
        }
    }

    #[test]
    fn numeric_text_reads_as_number() {
        assert_eq!(Cell::Text(" 17 ".to_owned()).as_number(), Some(17.0));
        assert_eq!(Cell::Text("NaN".to_owned()).as_number(), None);
        assert_eq!(Cell::Text("A".to_owned()).as_number(), None);
    }

    #[test]
    fn short_rows_are_padded() {
        let csv = "name,score,note\nada,58\n";

        let roster = Roster::from_csv_reader(csv.as_bytes()).unwrap();

        assert_eq!(roster.rows()[0].len(), 3);
        assert_eq!(roster.rows()[0][2], Cell::Empty);
    }

    #[test]
    fn header_only_file_is_an_empty_roster() {
        let roster = Roster::from_csv_reader("name,score\n".as_bytes()).unwrap();

        assert!(roster.is_empty());
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        match Roster::from_path("scores.txt") {
            Err(LoadError::UnsupportedFormat(_)) => {}
            other => panic!("expected unsupported format, got {:?}", other),
        }
    }
}
