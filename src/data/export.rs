use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::LongRecord;

/// Write rows as `country,year,value` CSV. Missing values become empty
/// cells.
pub fn write_rows_csv<W: Write>(output: W, rows: &[LongRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(output);
    for (i, row) in rows.iter().enumerate() {
        writer
            .serialize(row)
            .with_context(|| format!("writing row {i}"))?;
    }
    writer.flush().context("flushing CSV output")?;
    Ok(())
}

/// Export rows to a CSV file at `path`.
pub fn export_rows(path: &Path, rows: &[LongRecord]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_rows_csv(file, rows).with_context(|| format!("exporting to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_serialize_with_header_and_empty_gaps() {
        let rows = vec![
            LongRecord { country: "A".into(), year: 2000, value: Some(10.5) },
            LongRecord { country: "A".into(), year: 2001, value: None },
        ];
        let mut out = Vec::new();
        write_rows_csv(&mut out, &rows).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "country,year,value\nA,2000,10.5\nA,2001,\n");
    }

    #[test]
    fn export_creates_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.csv");
        let rows = vec![LongRecord { country: "B".into(), year: 1999, value: Some(7.0) }];

        export_rows(&path, &rows).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "country,year,value\nB,1999,7.0\n"
        );
    }
}
