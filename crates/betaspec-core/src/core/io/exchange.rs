use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

pub const EXCHANGE_PARAMETERS: usize = 9;

pub type ExchangeCoefficients = [f64; EXCHANGE_PARAMETERS];

#[derive(Debug, Error)]
pub enum ExchangeTableError {
    #[error("File I/O error for '{path}': {source}")]
    Io { path: String, source: io::Error },
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// Fitted atomic exchange coefficients, keyed by atomic number.
///
/// Each data line holds `Z` followed by nine whitespace separated coefficients.
/// Blank lines and lines starting with `#` are skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExchangeTable {
    coefficients: BTreeMap<u32, ExchangeCoefficients>,
}

impl ExchangeTable {
    pub fn load(path: &Path) -> Result<Self, ExchangeTableError> {
        let io_error = |e| ExchangeTableError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        };
        let file = File::open(path).map_err(io_error)?;
        let table = Self::read_from(&mut BufReader::new(file)).map_err(|e| match e {
            ExchangeTableError::Io { source, .. } => io_error(source),
            other => other,
        })?;
        debug!(
            entries = table.len(),
            "Loaded exchange coefficients from '{}'.",
            path.display()
        );
        Ok(table)
    }

    pub fn read_from(reader: &mut impl BufRead) -> Result<Self, ExchangeTableError> {
        let mut coefficients = BTreeMap::new();
        for (index, line_res) in reader.lines().enumerate() {
            let line_num = index + 1;
            let line = line_res.map_err(|e| ExchangeTableError::Io {
                path: String::new(),
                source: e,
            })?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let mut fields = trimmed.split_whitespace();
            let z_field = fields.next().unwrap_or_default();
            let z: u32 = z_field.parse().map_err(|_| ExchangeTableError::Parse {
                line: line_num,
                message: format!("invalid atomic number '{}'", z_field),
            })?;

            let mut row = [0.0; EXCHANGE_PARAMETERS];
            let mut count = 0;
            for field in fields {
                if count == EXCHANGE_PARAMETERS {
                    return Err(ExchangeTableError::Parse {
                        line: line_num,
                        message: format!("expected {} coefficients, found more", EXCHANGE_PARAMETERS),
                    });
                }
                row[count] = field.parse().map_err(|_| ExchangeTableError::Parse {
                    line: line_num,
                    message: format!("invalid coefficient '{}'", field),
                })?;
                count += 1;
            }
            if count != EXCHANGE_PARAMETERS {
                return Err(ExchangeTableError::Parse {
                    line: line_num,
                    message: format!(
                        "expected {} coefficients, found {}",
                        EXCHANGE_PARAMETERS, count
                    ),
                });
            }
            coefficients.insert(z, row);
        }
        Ok(Self { coefficients })
    }

    pub fn get(&self, z: u32) -> Option<&ExchangeCoefficients> {
        self.coefficients.get(&z)
    }

    pub fn insert(&mut self, z: u32, coefficients: ExchangeCoefficients) {
        self.coefficients.insert(z, coefficients);
    }

    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    const SAMPLE: &str = "\
# Z p0 p1 p2 p3 p4 p5 p6 p7 p8
27 -0.0088 0.0093 0.121 21.7 0.022 0.62 1.0 0.3 1.1

28 -0.0090 0.0096 0.125 22.1 0.023 0.61 1.0 0.3 1.1
";

    #[test]
    fn read_from_parses_rows_keyed_by_atomic_number() {
        let table = ExchangeTable::read_from(&mut Cursor::new(SAMPLE)).unwrap();
        assert_eq!(table.len(), 2);
        let row = table.get(28).unwrap();
        assert_eq!(row[0], -0.0090);
        assert_eq!(row[8], 1.1);
        assert!(table.get(26).is_none());
    }

    #[test]
    fn read_from_rejects_short_rows() {
        let result = ExchangeTable::read_from(&mut Cursor::new("27 1.0 2.0 3.0\n"));
        match result {
            Err(ExchangeTableError::Parse { line, .. }) => assert_eq!(line, 1),
            other => panic!("expected a parse error, got {:?}", other),
        }
    }

    #[test]
    fn read_from_rejects_long_rows() {
        let result =
            ExchangeTable::read_from(&mut Cursor::new("\n27 1 2 3 4 5 6 7 8 9 10\n"));
        match result {
            Err(ExchangeTableError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected a parse error, got {:?}", other),
        }
    }

    #[test]
    fn read_from_rejects_invalid_numbers() {
        let result = ExchangeTable::read_from(&mut Cursor::new("Co 1 2 3 4 5 6 7 8 9\n"));
        assert!(matches!(result, Err(ExchangeTableError::Parse { .. })));
    }

    #[test]
    fn load_reads_a_file_and_reports_missing_paths() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("exchange.dat");
        std::fs::write(&path, SAMPLE).unwrap();
        let table = ExchangeTable::load(&path).unwrap();
        assert!(table.get(27).is_some());

        let missing = ExchangeTable::load(&dir.path().join("nope.dat"));
        assert!(matches!(missing, Err(ExchangeTableError::Io { .. })));
    }
}
