use std::path::{Path, PathBuf};

use log::info;
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::adjustment::Adjustment;
use crate::error::ExportError;
use crate::parameters::SheetNames;
use crate::roster::{Cell, Roster};
use crate::statistics::Statistics;

pub const ADJUSTED_SCORE_COLUMN: &str = "adjusted_score";
pub const SCORE_CHANGE_COLUMN: &str = "score_change";

/// Everything one export writes: the roster, its final adjusted scores and the
/// slider positions that produced them.
#[derive(Debug, Clone, Copy)]
pub struct ExportData<'a> {
    pub roster: &'a Roster,
    pub adjusted: &'a [f64],
    pub adjustment: Adjustment,
    pub sheets: &'a SheetNames,
}

#[derive(Debug, Clone, PartialEq)]
struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
    /// Write numeric text as workbook numbers. Csv output keeps the text as read.
    numeric_text: bool,
}

impl Table {
    fn key_value(headers: [&str; 2], rows: Vec<(&str, String)>) -> Self {
        Table {
            headers: headers.iter().map(|header| header.to_string()).collect(),
            rows: rows
                .into_iter()
                .map(|(key, value)| vec![Cell::Text(key.to_owned()), Cell::Text(value)])
                .collect(),
            numeric_text: false,
        }
    }
}

/// Writes the three export tables, as sheets of one workbook for `.xlsx` or as
/// three sibling files for `.csv`. Returns the paths written.
pub fn write_export<P: AsRef<Path>>(path: P, data: &ExportData) -> Result<Vec<PathBuf>, ExportError> {
    let path = path.as_ref();
    let statistics = Statistics::compute(data.adjusted).ok_or(ExportError::EmptyRoster)?;

    let tables = [
        (data.sheets.scores.as_str(), scores_table(data)),
        (data.sheets.statistics.as_str(), statistics_table(&statistics)),
        (data.sheets.parameters.as_str(), parameters_table(&data.adjustment)),
    ];

    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let written = match extension.as_str() {
        "xlsx" => {
            write_workbook(path, &tables)?;
            vec![path.to_path_buf()]
        }
        "csv" => write_csv_files(path, &tables)?,
        _ => return Err(ExportError::UnsupportedFormat(path.display().to_string())),
    };

    info!(
        "exported {} adjusted scores to {}",
        data.adjusted.len(),
        path.display()
    );

    Ok(written)
}

fn scores_table(data: &ExportData) -> Table {
    let roster = data.roster;
    let mut headers = roster.headers().to_vec();

    // reuse columns of the same name, e.g. when re-importing an earlier export
    let mut column_for = |name: &str| match headers.iter().position(|header| header == name) {
        Some(column) => column,
        None => {
            headers.push(name.to_owned());
            headers.len() - 1
        }
    };
    let adjusted_column = column_for(ADJUSTED_SCORE_COLUMN);
    let change_column = column_for(SCORE_CHANGE_COLUMN);

    let rows = roster
        .rows()
        .iter()
        .zip(roster.scores().iter().zip(data.adjusted.iter()))
        .map(|(row, (&original, &adjusted))| {
            let mut row = row.clone();
            row.resize(headers.len(), Cell::Empty);
            row[adjusted_column] = Cell::Number(adjusted);
            row[change_column] = Cell::Number(adjusted - original);
            row
        })
        .collect();

    Table {
        headers,
        rows,
        numeric_text: true,
    }
}

fn statistics_table(statistics: &Statistics) -> Table {
    Table::key_value(
        ["statistic", "value"],
        vec![
            ("mean", format!("{:.2}", statistics.mean)),
            ("min", format!("{:.2}", statistics.minimum)),
            ("max", format!("{:.2}", statistics.maximum)),
            ("pass_count", statistics.pass_count.to_string()),
            ("fail_count", statistics.fail_count.to_string()),
            ("pass_rate", format!("{:.2}%", statistics.pass_rate)),
        ],
    )
}

fn parameters_table(adjustment: &Adjustment) -> Table {
    Table::key_value(
        ["parameter", "value"],
        vec![
            ("shift", adjustment.shift.to_string()),
            ("spread_delta", format!("{:.1}", adjustment.spread_delta())),
            ("pass_rate_adjust", adjustment.pass_rate_adjust.to_string()),
        ],
    )
}

fn write_workbook(path: &Path, tables: &[(&str, Table)]) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();

    for (name, table) in tables {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name)?;
        write_sheet(worksheet, table)?;
    }

    workbook.save(path)?;
    Ok(())
}

fn write_sheet(worksheet: &mut Worksheet, table: &Table) -> Result<(), ExportError> {
    for (column, header) in table.headers.iter().enumerate() {
        worksheet.write_string(0, column as u16, header.as_str())?;
    }

    for (row_index, row) in table.rows.iter().enumerate() {
        let row_number = row_index as u32 + 1;
        for (column, cell) in row.iter().enumerate() {
            let number = match cell {
                Cell::Number(number) => Some(*number),
                Cell::Text(_) if table.numeric_text => cell.as_number(),
                _ => None,
            };
            match (number, cell) {
                (Some(number), _) => {
                    worksheet.write_number(row_number, column as u16, number)?;
                }
                (None, Cell::Text(text)) => {
                    worksheet.write_string(row_number, column as u16, text.as_str())?;
                }
                (None, _) => {}
            }
        }
    }

    Ok(())
}

// `scores.csv` keeps its name, the other tables land next to it with the sheet name as suffix
fn write_csv_files(path: &Path, tables: &[(&str, Table)]) -> Result<Vec<PathBuf>, ExportError> {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut written = Vec::with_capacity(tables.len());
    for (index, (name, table)) in tables.iter().enumerate() {
        let table_path = if index == 0 {
            path.to_path_buf()
        } else {
            path.with_file_name(format!("{}_{}.csv", stem, name))
        };
        write_csv_table(&table_path, table)?;
        written.push(table_path);
    }

    Ok(written)
}

fn write_csv_table(path: &Path, table: &Table) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    writer.flush()?;

    Ok(())
}
