use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Write a row-major table with a header line.
pub fn write_table<P: AsRef<Path>>(
    path: P,
    headers: &[&str],
    rows: &[Vec<f64>],
) -> io::Result<()> {
    for (i, row) in rows.iter().enumerate() {
        if row.len() != headers.len() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "row {} has {} values but there are {} headers",
                    i,
                    row.len(),
                    headers.len()
                ),
            ));
        }
    }

    let mut file = File::create(path)?;
    writeln!(file, "{}", headers.join(","))?;
    for row in rows {
        let cells: Vec<String> = row.iter().map(|v| format!("{:.15e}", v)).collect();
        writeln!(file, "{}", cells.join(","))?;
    }
    Ok(())
}

/// Write paired x-y data.
pub fn write_xy<P: AsRef<Path>>(
    path: P,
    x_header: &str,
    y_header: &str,
    x: &[f64],
    y: &[f64],
) -> io::Result<()> {
    let rows: Vec<Vec<f64>> = x.iter().zip(y.iter()).map(|(&a, &b)| vec![a, b]).collect();
    write_table(path, &[x_header, y_header], &rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_table(
            &path,
            &["t", "v"],
            &[vec![0.0, 1.0], vec![0.5, 0.75]],
        )
        .unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("t,v"));
        assert_eq!(lines.count(), 2);
    }

    #[test]
    fn rejects_ragged_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        let err = write_table(&path, &["a", "b"], &[vec![1.0]]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
