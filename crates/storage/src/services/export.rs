use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::{Result, StorageError};
use crate::models::{AthleteResult, DetailedExportRow};

/// Rows rendered into a print document before truncating.
pub const PRINT_ROW_CAP: usize = 1000;

/// One output column: a stable key, the header text and how to pull the
/// cell value out of a record.
pub struct ExportColumn<T> {
    pub key: &'static str,
    pub header: &'static str,
    pub extract: fn(&T) -> String,
    pub visible: bool,
}

impl<T> ExportColumn<T> {
    pub fn new(key: &'static str, header: &'static str, extract: fn(&T) -> String) -> Self {
        Self {
            key,
            header,
            extract,
            visible: true,
        }
    }
}

/// Ordered column set with per-column visibility.
pub struct ColumnConfig<T> {
    columns: Vec<ExportColumn<T>>,
}

impl<T> ColumnConfig<T> {
    pub fn new(columns: Vec<ExportColumn<T>>) -> Self {
        Self { columns }
    }

    pub fn set_visible(&mut self, key: &str, visible: bool) -> &mut Self {
        for column in self.columns.iter_mut().filter(|c| c.key == key) {
            column.visible = visible;
        }
        self
    }

    /// Show only the columns named in `keys`, keeping configured order.
    pub fn only(mut self, keys: &[&str]) -> Self {
        for column in &mut self.columns {
            column.visible = keys.contains(&column.key);
        }
        self
    }

    pub fn visible(&self) -> impl Iterator<Item = &ExportColumn<T>> {
        self.columns.iter().filter(|c| c.visible)
    }

    pub fn headers(&self) -> Vec<&'static str> {
        self.visible().map(|c| c.header).collect()
    }

    pub fn row(&self, record: &T) -> Vec<String> {
        self.visible().map(|c| (c.extract)(record)).collect()
    }
}

/// Every field double-quoted, embedded quotes doubled, `\n` line endings.
/// No row cap.
pub fn to_csv<T>(records: &[T], columns: &ColumnConfig<T>) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(columns.headers())?;
    for record in records {
        writer.write_record(columns.row(record))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| StorageError::InvalidData(format!("Failed to flush CSV: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| StorageError::InvalidData(format!("CSV output is not UTF-8: {}", e)))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintDocument {
    pub html: String,
    pub truncated: bool,
    pub total_rows: usize,
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Printable HTML table of at most [`PRINT_ROW_CAP`] rows, with a notice
/// when rows were left out.
pub fn to_print_html<T>(
    records: &[T],
    columns: &ColumnConfig<T>,
    title: &str,
    generated_on: NaiveDate,
) -> PrintDocument {
    let total_rows = records.len();
    let truncated = total_rows > PRINT_ROW_CAP;

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    html.push_str(
        "<style>\n\
         body { font-family: Arial, sans-serif; margin: 20px; }\n\
         h1 { color: #333; text-align: center; }\n\
         table { width: 100%; border-collapse: collapse; margin: 20px 0; }\n\
         th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }\n\
         th { background-color: #f5f5f5; font-weight: bold; }\n\
         tr:nth-child(even) { background-color: #f9f9f9; }\n\
         .notice { color: #a00; font-weight: bold; }\n\
         @media print { body { margin: 0; } }\n\
         </style>\n</head>\n<body>\n",
    );
    html.push_str(&format!("<h1>{}</h1>\n", escape_html(title)));
    html.push_str(&format!(
        "<p>Generated on: {}</p>\n",
        generated_on.format("%-m/%-d/%Y")
    ));
    if truncated {
        html.push_str(&format!(
            "<p class=\"notice\">Showing the first {} of {} results. Export to CSV for the full list.</p>\n",
            PRINT_ROW_CAP, total_rows
        ));
    }

    html.push_str("<table>\n<thead>\n<tr>");
    for header in columns.headers() {
        html.push_str(&format!("<th>{}</th>", escape_html(header)));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");

    for record in records.iter().take(PRINT_ROW_CAP) {
        html.push_str("<tr>");
        for cell in columns.row(record) {
            html.push_str(&format!("<td>{}</td>", escape_html(&cell)));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n</body>\n</html>\n");

    PrintDocument {
        html,
        truncated,
        total_rows,
    }
}

fn positive(value: f64) -> String {
    if value > 0.0 {
        value.to_string()
    } else {
        String::new()
    }
}

/// Columns of the rankings table export.
pub fn summary_columns() -> ColumnConfig<AthleteResult> {
    ColumnConfig::new(vec![
        ExportColumn::new("rank", "Rank", |r: &AthleteResult| {
            r.true_rank
                .map(|rank| rank.to_string())
                .unwrap_or_else(|| "N/A".to_string())
        }),
        ExportColumn::new("lifter_name", "Athlete Name", |r: &AthleteResult| r.lifter_name.clone()),
        ExportColumn::new("federation", "Resource", |r: &AthleteResult| {
            r.federation().label().to_string()
        }),
        ExportColumn::new("gender", "Gender", |r: &AthleteResult| r.gender.clone()),
        ExportColumn::new("weight_class", "Weight Class", |r: &AthleteResult| r.weight_class.clone()),
        ExportColumn::new("age_category", "Age Category", |r: &AthleteResult| r.age_category.clone()),
        ExportColumn::new("best_snatch", "Best Snatch (kg)", |r: &AthleteResult| positive(r.best_snatch)),
        ExportColumn::new("best_cj", "Best C&J (kg)", |r: &AthleteResult| positive(r.best_clean_jerk)),
        ExportColumn::new("best_total", "Best Total (kg)", |r: &AthleteResult| positive(r.best_total)),
        ExportColumn::new("best_qpoints", "Best Q-Points", |r: &AthleteResult| positive(r.best_q_score)),
        ExportColumn::new("competition_count", "Competitions", |r: &AthleteResult| {
            r.competition_count.to_string()
        }),
        ExportColumn::new("last_competition", "Last Competition", |r: &AthleteResult| {
            r.last_competition_date.clone()
        }),
        ExportColumn::new("last_meet_name", "Meet Name", |r: &AthleteResult| r.last_meet_name.clone()),
    ])
}

/// Columns of the print view: the summary set without competition count
/// and date.
pub fn print_columns() -> ColumnConfig<AthleteResult> {
    let mut columns = summary_columns();
    columns
        .set_visible("competition_count", false)
        .set_visible("last_competition", false);
    columns
}

/// Columns of the attempt-level export.
pub fn detailed_columns() -> ColumnConfig<DetailedExportRow> {
    ColumnConfig::new(vec![
        ExportColumn::new("source", "Source", |r: &DetailedExportRow| r.source.clone()),
        ExportColumn::new("lifter_name", "Lifter Name", |r: &DetailedExportRow| r.lifter_name.clone()),
        ExportColumn::new("membership_number", "Membership #", |r: &DetailedExportRow| {
            r.membership_number.clone()
        }),
        ExportColumn::new("state", "State", |r: &DetailedExportRow| r.state.clone()),
        ExportColumn::new("date", "Date", |r: &DetailedExportRow| r.date.clone()),
        ExportColumn::new("meet_name", "Meet Name", |r: &DetailedExportRow| r.meet_name.clone()),
        ExportColumn::new("meet_location", "Meet Location", |r: &DetailedExportRow| r.meet_location.clone()),
        ExportColumn::new("gender", "Gender", |r: &DetailedExportRow| r.gender.clone()),
        ExportColumn::new("age_category", "Age Category", |r: &DetailedExportRow| r.age_category.clone()),
        ExportColumn::new("weight_class", "Weight Class", |r: &DetailedExportRow| r.weight_class.clone()),
        ExportColumn::new("body_weight", "Body Weight", |r: &DetailedExportRow| r.body_weight.clone()),
        ExportColumn::new("snatch_1", "Snatch 1", |r: &DetailedExportRow| r.snatch_1.clone()),
        ExportColumn::new("snatch_2", "Snatch 2", |r: &DetailedExportRow| r.snatch_2.clone()),
        ExportColumn::new("snatch_3", "Snatch 3", |r: &DetailedExportRow| r.snatch_3.clone()),
        ExportColumn::new("best_snatch", "Best Snatch", |r: &DetailedExportRow| r.best_snatch.clone()),
        ExportColumn::new("cj_1", "C&J 1", |r: &DetailedExportRow| r.cj_1.clone()),
        ExportColumn::new("cj_2", "C&J 2", |r: &DetailedExportRow| r.cj_2.clone()),
        ExportColumn::new("cj_3", "C&J 3", |r: &DetailedExportRow| r.cj_3.clone()),
        ExportColumn::new("best_cj", "Best C&J", |r: &DetailedExportRow| r.best_cj.clone()),
        ExportColumn::new("total", "Total", |r: &DetailedExportRow| r.total.clone()),
        ExportColumn::new("q_points", "Q Points", |r: &DetailedExportRow| r.q_points.clone()),
        ExportColumn::new("q_youth", "Q Youth", |r: &DetailedExportRow| r.q_youth.clone()),
        ExportColumn::new("q_masters", "Q Masters", |r: &DetailedExportRow| r.q_masters.clone()),
        ExportColumn::new("competition_age", "Comp Age", |r: &DetailedExportRow| r.competition_age.clone()),
        ExportColumn::new("wso", "WSO", |r: &DetailedExportRow| r.wso.clone()),
        ExportColumn::new("club", "Club", |r: &DetailedExportRow| r.club.clone()),
        ExportColumn::new("country", "Country", |r: &DetailedExportRow| r.country.clone()),
    ])
}

pub fn rankings_file_name(date: NaiveDate) -> String {
    format!("weightlifting-rankings-{}.csv", date.format("%Y-%m-%d"))
}

pub fn detailed_file_name(date: NaiveDate) -> String {
    format!("weightlifting-export-{}.csv", date.format("%Y-%m-%d"))
}
