use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::Local;

use crate::error::ScopeError;
use crate::view::LineData;

/// Write the currently displayed line as two-column CSV.
pub fn write_csv(
    path: &Path,
    x_label: &str,
    y_label: &str,
    line: &LineData,
) -> Result<(), ScopeError> {
    if line.xs.is_empty() || line.xs.len() != line.ys.len() {
        return Err(ScopeError::Shape(format!(
            "cannot export {} x / {} y points",
            line.xs.len(),
            line.ys.len()
        )));
    }
    let mut w = BufWriter::new(File::create(path)?);
    writeln!(w, "{x_label},{y_label}")?;
    for (x, y) in line.xs.iter().zip(&line.ys) {
        writeln!(w, "{x},{y}")?;
    }
    w.flush()?;
    Ok(())
}

/// Timestamped suggestion for a save dialog, e.g. `spectrum_2026-08-05T14-30-00.csv`.
pub fn default_export_name(stem: &str) -> String {
    format!("{}_{}.csv", stem, Local::now().format("%Y-%m-%dT%H-%M-%S"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_rows() {
        let path = std::env::temp_dir().join("fft_scope_export_test.csv");
        let line = LineData {
            xs: vec![0.0, 1.0, 2.0],
            ys: vec![0.5, 1.5, 2.5],
        };
        write_csv(&path, "Frequency [Hz]", "Amplitude [V]", &line).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let rows: Vec<&str> = contents.lines().collect();
        assert_eq!(rows[0], "Frequency [Hz],Amplitude [V]");
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1], "0,0.5");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn rejects_empty_and_mismatched_lines() {
        let path = std::env::temp_dir().join("fft_scope_export_reject.csv");
        let empty = LineData {
            xs: vec![],
            ys: vec![],
        };
        assert!(matches!(
            write_csv(&path, "x", "y", &empty),
            Err(ScopeError::Shape(_))
        ));

        let mismatched = LineData {
            xs: vec![1.0],
            ys: vec![1.0, 2.0],
        };
        assert!(write_csv(&path, "x", "y", &mismatched).is_err());
    }

    #[test]
    fn export_name_carries_stem_and_extension() {
        let name = default_export_name("spectrum");
        assert!(name.starts_with("spectrum_"));
        assert!(name.ends_with(".csv"));
    }
}
