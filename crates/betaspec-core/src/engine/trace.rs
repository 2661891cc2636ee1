use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// One evaluated grid point, as written to the flat trace table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceRecord {
    pub w: f64,
    pub kinetic_kev: f64,
    pub electron: f64,
    pub neutrino: f64,
    /// Set when a weight was clamped to zero.
    pub clamped: bool,
}

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Table write error: {0}")]
    Csv(#[from] csv::Error),
}

/// Append-only destination for trace records, written in generation order.
pub trait TraceSink {
    fn append(&mut self, record: &TraceRecord) -> Result<(), TraceError>;

    fn flush(&mut self) -> Result<(), TraceError> {
        Ok(())
    }
}

/// Discards every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTrace;

impl TraceSink for NullTrace {
    fn append(&mut self, _record: &TraceRecord) -> Result<(), TraceError> {
        Ok(())
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct MemoryTrace {
    records: Vec<TraceRecord>,
}

impl MemoryTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[TraceRecord] {
        &self.records
    }
}

impl TraceSink for MemoryTrace {
    fn append(&mut self, record: &TraceRecord) -> Result<(), TraceError> {
        self.records.push(*record);
        Ok(())
    }
}

/// Tab-delimited table with the columns `W`, kinetic energy (keV), electron weight and
/// antineutrino weight, one row per record and no header.
pub struct TableTraceWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl TableTraceWriter<BufWriter<File>> {
    pub fn create(path: &Path) -> Result<Self, TraceError> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> TableTraceWriter<W> {
    pub fn new(inner: W) -> Self {
        let writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .from_writer(inner);
        Self { writer }
    }

    /// Flushes the buffered rows and returns the underlying writer.
    pub fn into_inner(self) -> Result<W, TraceError> {
        self.writer
            .into_inner()
            .map_err(|e| TraceError::Io(e.into_error()))
    }
}

impl<W: Write> TraceSink for TableTraceWriter<W> {
    fn append(&mut self, record: &TraceRecord) -> Result<(), TraceError> {
        self.writer.serialize((
            record.w,
            record.kinetic_kev,
            record.electron,
            record.neutrino,
        ))?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), TraceError> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(w: f64) -> TraceRecord {
        TraceRecord {
            w,
            kinetic_kev: (w - 1.0) * 510.99895,
            electron: 0.5,
            neutrino: 0.25,
            clamped: false,
        }
    }

    #[test]
    fn memory_trace_keeps_generation_order() {
        let mut trace = MemoryTrace::new();
        for w in [1.0, 1.5, 2.0] {
            trace.append(&record(w)).unwrap();
        }
        let ws: Vec<f64> = trace.records().iter().map(|r| r.w).collect();
        assert_eq!(ws, vec![1.0, 1.5, 2.0]);
    }

    #[test]
    fn table_writer_emits_tab_separated_rows() {
        let mut writer = TableTraceWriter::new(Vec::new());
        writer.append(&record(1.0)).unwrap();
        writer.append(&record(2.0)).unwrap();
        let bytes = writer.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "1.0\t0.0\t0.5\t0.25");
        let columns: Vec<f64> = lines[1].split('\t').map(|c| c.parse().unwrap()).collect();
        assert_eq!(columns.len(), 4);
        assert_eq!(columns[0], 2.0);
        assert!((columns[1] - 510.99895).abs() < 1e-9);
    }

    #[test]
    fn table_writer_creates_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spectrum.raw");
        let mut writer = TableTraceWriter::create(&path).unwrap();
        writer.append(&record(1.25)).unwrap();
        writer.flush().unwrap();
        drop(writer);
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("1.25\t"));
    }
}
