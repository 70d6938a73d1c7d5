//! Fixed-width job table

use crate::domain::report::JobRecord;

use super::truncate::CODE_FENCE;

/// A displayable `JobRecord` column
///
/// `logs` and `filename` are never shown in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Id,
    Name,
    Status,
    Time,
    Size,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::Id,
        Column::Name,
        Column::Status,
        Column::Time,
        Column::Size,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Column::Id => "vmid",
            Column::Name => "name",
            Column::Status => "status",
            Column::Time => "time",
            Column::Size => "size",
        }
    }

    fn cell(self, record: &JobRecord) -> &str {
        match self {
            Column::Id => &record.id,
            Column::Name => &record.name,
            Column::Status => &record.status,
            Column::Time => &record.time,
            Column::Size => &record.size,
        }
    }
}

/// Render records as a fenced, column-aligned table
///
/// Each column is as wide as its longest cell or label. Cells are padded on
/// the right and joined with `" | "`; the separator row joins dashes with
/// `"-|-"`.
pub fn text_table(records: &[JobRecord], columns: &[Column]) -> String {
    let widths: Vec<usize> = columns
        .iter()
        .map(|column| {
            records
                .iter()
                .map(|record| column.cell(record).chars().count())
                .fold(column.label().len(), usize::max)
        })
        .collect();

    let row = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join(" | ")
    };

    let mut lines = Vec::with_capacity(records.len() + 4);
    lines.push(CODE_FENCE.to_string());
    lines.push(row(columns.iter().map(|c| c.label()).collect()));
    lines.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("-|-"),
    );
    for record in records {
        lines.push(row(columns.iter().map(|c| c.cell(record)).collect()));
    }
    lines.push(CODE_FENCE.to_string());
    lines.join("\n")
}
