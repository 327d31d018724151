//! Delimited-text output of the final n-gram table

use crate::error::OutputError;
use crate::ngram::FrequencySnapshot;
use csv::{QuoteStyle, WriterBuilder};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

/// Header row of the output file
pub const HEADER: [&str; 2] = ["n-gram", "count"];

/// How the table is written
#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    /// Field delimiter
    pub delimiter: u8,

    /// Sort by decreasing count (ties by n-gram)
    pub sort: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            delimiter: b'\t',
            sort: true,
        }
    }
}

/// Write `snapshot` to any writer, returning the number of rows
pub fn write_table<W: Write>(
    writer: W,
    snapshot: &FrequencySnapshot,
    options: OutputOptions,
) -> Result<usize, OutputError> {
    let mut csv = WriterBuilder::new()
        .delimiter(options.delimiter)
        .quote_style(QuoteStyle::Necessary)
        .from_writer(writer);

    csv.write_record(HEADER)?;

    let rows = if options.sort {
        debug!("Sorting n-grams by count (decreasing)");
        snapshot.sorted_by_count()
    } else {
        snapshot.iter().collect()
    };

    for (gram, count) in &rows {
        csv.write_record([*gram, count.to_string().as_str()])?;
    }

    csv.flush().map_err(csv::Error::from)?;
    Ok(rows.len())
}

/// Write `snapshot` to the file at `path`
pub fn write_table_file(
    path: &Path,
    snapshot: &FrequencySnapshot,
    options: OutputOptions,
) -> Result<usize, OutputError> {
    let file = File::create(path).map_err(|source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    let rows = write_table(BufWriter::new(file), snapshot, options)?;
    info!(path = %path.display(), rows, "N-grams written");
    Ok(rows)
}
