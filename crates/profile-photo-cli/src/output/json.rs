//! JSON output adapter.

use std::io::{self, Write};
use std::sync::Mutex;

use anyhow::Result;
use profile_photo_core::domain::{BatchEntry, BatchResult, BatchSummary};
use profile_photo_core::ResultOutput;

/// JSON / JSON Lines output adapter.
pub struct JsonOutput {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonOutput {
    /// Creates a new JSON output writing to stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// Creates a new JSON output writing to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Writes a whole batch as one JSON document.
    pub fn write_batch(&self, batch: &BatchResult, pretty: bool) -> Result<()> {
        let json = if pretty {
            serde_json::to_string_pretty(batch)?
        } else {
            serde_json::to_string(batch)?
        };
        self.write_line(&json)
    }

    #[allow(clippy::significant_drop_tightening)]
    fn write_line(&self, line: &str) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writeln!(writer, "{line}")?;
        Ok(())
    }
}

impl ResultOutput for JsonOutput {
    fn write_entry(&self, entry: &BatchEntry) -> Result<()> {
        self.write_line(&serde_json::to_string(entry)?)
    }

    fn write_summary(&self, summary: &BatchSummary) -> Result<()> {
        self.write_line(&serde_json::to_string(summary)?)
    }

    #[allow(clippy::significant_drop_tightening)]
    fn flush(&self) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;

    /// Writer that keeps its bytes reachable after being boxed.
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn test_entries_are_one_line_each() {
        let buf = SharedBuf::default();
        let output = JsonOutput::new(Box::new(buf.clone()));

        output
            .write_entry(&BatchEntry::failed("a.jpg", "decode failed"))
            .unwrap();
        output
            .write_entry(&BatchEntry::failed("b.jpg", "decode failed"))
            .unwrap();
        output.flush().unwrap();

        let text = buf.text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["photo_id"], "a.jpg");
        assert_eq!(first["success"], false);
    }

    #[test]
    fn test_pretty_batch_spans_lines() {
        let buf = SharedBuf::default();
        let output = JsonOutput::new(Box::new(buf.clone()));
        let batch = BatchResult {
            entries: vec![BatchEntry::failed("a.jpg", "boom")],
            summary: BatchSummary::default(),
        };

        output.write_batch(&batch, true).unwrap();

        let text = buf.text();
        assert!(text.lines().count() > 1);
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert!(parsed["entries"].is_array());
        assert!(parsed["summary"].is_object());
    }
}
