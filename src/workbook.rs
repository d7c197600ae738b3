// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use chrono::NaiveDateTime;
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

use crate::error::ExportError;
use crate::models::{CompanyInfo, StatementTable};
use crate::utils::write_atomic;

pub const COVER_SHEET: &str = "Cover Sheet";
pub const COVER_HEADERS: [&str; 5] = ["Company Name", "Sector", "Industry", "Website", "Retrieved"];
pub const LABEL_HEADER: &str = "Fiscal Date Ending";

/// Scaled to millions, negatives in parentheses.
pub const NUMBER_FORMAT: &str = "0,,;(0,,)";
pub const DATE_FORMAT: &str = "mm/dd/yyyy";

pub const COVER_COLUMN_WIDTH: f64 = 25.0;
pub const LABEL_COLUMN_WIDTH: f64 = 35.0;
pub const VALUE_COLUMN_WIDTH: f64 = 13.0;

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Timestamp(NaiveDateTime),
}

/// One worksheet: the first row is the header, widths are per column.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetPlan {
    pub name: String,
    pub rows: Vec<Vec<CellValue>>,
    pub column_widths: Vec<f64>,
}

impl SheetPlan {
    pub fn header(&self) -> &[CellValue] {
        self.rows.first().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn data_rows(&self) -> &[Vec<CellValue>] {
        self.rows.get(1..).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkbookPlan {
    pub sheets: Vec<SheetPlan>,
}

/// Lays out the cover sheet followed by one sheet per statement table.
pub fn plan_workbook(
    company: &CompanyInfo,
    retrieved: NaiveDateTime,
    statements: &[StatementTable],
) -> WorkbookPlan {
    let mut sheets = Vec::with_capacity(statements.len() + 1);
    sheets.push(cover_sheet(company, retrieved));
    sheets.extend(statements.iter().map(statement_sheet));
    WorkbookPlan { sheets }
}

fn cover_sheet(company: &CompanyInfo, retrieved: NaiveDateTime) -> SheetPlan {
    let header = COVER_HEADERS
        .iter()
        .map(|h| CellValue::Text(h.to_string()))
        .collect();
    let values = vec![
        CellValue::Text(company.name.clone()),
        CellValue::Text(company.sector.clone()),
        CellValue::Text(company.industry.clone()),
        CellValue::Text(company.website.clone()),
        CellValue::Timestamp(retrieved),
    ];

    SheetPlan {
        name: COVER_SHEET.to_string(),
        rows: vec![header, values],
        column_widths: vec![COVER_COLUMN_WIDTH; COVER_HEADERS.len()],
    }
}

fn statement_sheet(table: &StatementTable) -> SheetPlan {
    let mut header = Vec::with_capacity(table.column_count() + 1);
    header.push(CellValue::Text(LABEL_HEADER.to_string()));
    header.extend(
        table
            .periods()
            .iter()
            .map(|period| CellValue::Text(period.to_string())),
    );

    let mut rows = Vec::with_capacity(table.row_count() + 1);
    rows.push(header);
    for (label, values) in table.rows() {
        let mut row = Vec::with_capacity(values.len() + 1);
        row.push(CellValue::Text(label.to_string()));
        row.extend(values.iter().map(|v| CellValue::Number(*v)));
        rows.push(row);
    }

    let mut column_widths = vec![VALUE_COLUMN_WIDTH; table.column_count() + 1];
    column_widths[0] = LABEL_COLUMN_WIDTH;

    SheetPlan {
        name: table.statement().sheet_name().to_string(),
        rows,
        column_widths,
    }
}

/// Turns a plan into an in-memory xlsx workbook.
pub fn render(plan: &WorkbookPlan) -> Result<Workbook, ExportError> {
    let header_format = Format::new().set_bold();
    let number_format = Format::new().set_num_format(NUMBER_FORMAT);
    let date_format = Format::new().set_num_format(DATE_FORMAT);

    let mut workbook = Workbook::new();
    for sheet in &plan.sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet.name.as_str())?;

        for (row_idx, row) in (0u32..).zip(&sheet.rows) {
            for (col_idx, cell) in (0u16..).zip(row) {
                match cell {
                    CellValue::Text(text) if row_idx == 0 => {
                        worksheet.write_string_with_format(row_idx, col_idx, text.as_str(), &header_format)?;
                    }
                    CellValue::Text(text) => {
                        worksheet.write_string(row_idx, col_idx, text.as_str())?;
                    }
                    CellValue::Number(value) => {
                        worksheet.write_number_with_format(row_idx, col_idx, *value, &number_format)?;
                    }
                    CellValue::Timestamp(ts) => {
                        worksheet.write_datetime_with_format(row_idx, col_idx, ts, &date_format)?;
                    }
                }
            }
        }

        for (col_idx, width) in (0u16..).zip(&sheet.column_widths) {
            worksheet.set_column_width(col_idx, *width)?;
        }
    }

    Ok(workbook)
}

/// Renders the plan and writes it to `path`, replacing any previous file.
pub fn write_workbook(plan: &WorkbookPlan, path: &Path) -> Result<(), ExportError> {
    let mut workbook = render(plan)?;
    let bytes = workbook.save_to_buffer()?;
    write_atomic(path, &bytes)
}
