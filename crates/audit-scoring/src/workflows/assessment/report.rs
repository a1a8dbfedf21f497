use std::io::Write;

use super::views::CategorySummary;

const HEADER: [&str; 7] = [
    "Category ID",
    "Category",
    "Answered",
    "Total",
    "Progress",
    "Score",
    "Collapsed",
];

/// Write one CSV row per category, preceded by a header row.
pub fn write_category_csv<W: Write>(
    summaries: &[CategorySummary],
    writer: W,
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);
    csv_writer.write_record(HEADER)?;

    for summary in summaries {
        csv_writer.write_record([
            summary.id.clone(),
            summary.name.clone(),
            summary.answered.to_string(),
            summary.total.to_string(),
            summary.progress_value.to_string(),
            format!("{:.2}", summary.score_sum),
            summary.collapsed.to_string(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}
