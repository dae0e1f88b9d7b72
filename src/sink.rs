//! Record Sinks
//!
//! Where extracted records go. A page emits each record in order, then its
//! summary; pages with no records emit nothing.

use crate::pipeline::PageExtraction;
use anyhow::{Context, Result};
use serde_json::Value;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

pub trait RecordSink {
    fn push_data(&mut self, item: Value) -> Result<()>;
}

/// Keeps every item in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub items: Vec<Value>,
}

impl RecordSink for MemorySink {
    fn push_data(&mut self, item: Value) -> Result<()> {
        self.items.push(item);
        Ok(())
    }
}

/// One JSON document per line.
pub struct JsonLinesSink<W: Write> {
    writer: BufWriter<W>,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
        }
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush records")
    }
}

impl JsonLinesSink<File> {
    /// Append to `path`, creating the file and its parent directories.
    pub fn append_to(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open {:?}", path))?;
        Ok(Self::new(file))
    }
}

impl<W: Write> RecordSink for JsonLinesSink<W> {
    fn push_data(&mut self, item: Value) -> Result<()> {
        let json_line = serde_json::to_string(&item).context("Failed to serialize record")?;
        writeln!(self.writer, "{}", json_line).context("Failed to write record")?;
        Ok(())
    }
}

/// Push a page's records followed by its summary. Returns the number of
/// items pushed.
pub fn emit_page<S: RecordSink + ?Sized>(sink: &mut S, page: &PageExtraction) -> Result<usize> {
    let Some(summary) = &page.summary else {
        return Ok(0);
    };

    for record in &page.records {
        sink.push_data(serde_json::to_value(record)?)?;
    }
    sink.push_data(serde_json::to_value(summary)?)?;

    Ok(page.records.len() + 1)
}
