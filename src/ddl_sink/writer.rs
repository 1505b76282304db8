use chrono::Utc;
use std::io::Write;

use crate::ddl_sink::DdlSink;
use crate::error::SinkError;
use crate::types::{Dialect, Statement};

/// Writes statements as a SQL script, one per line, flushing after each
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Start the script with a comment naming the dialect and generation time
    pub fn with_header(mut writer: W, dialect: Dialect) -> std::io::Result<Self> {
        writeln!(
            writer,
            "-- Generated by vipddl {} for {} on {}",
            env!("CARGO_PKG_VERSION"),
            dialect,
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        Ok(Self { writer })
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DdlSink for WriterSink<W> {
    async fn apply(&mut self, statement: &Statement) -> Result<(), SinkError> {
        writeln!(self.writer, "{}", statement.sql)?;
        self.writer.flush()?;
        Ok(())
    }

    async fn finish(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Keeps applied statements in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub statements: Vec<Statement>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sql(&self) -> Vec<&str> {
        self.statements.iter().map(|s| s.sql.as_str()).collect()
    }
}

impl DdlSink for MemorySink {
    async fn apply(&mut self, statement: &Statement) -> Result<(), SinkError> {
        self.statements.push(statement.clone());
        Ok(())
    }
}
