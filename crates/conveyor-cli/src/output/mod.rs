//! Output renderers and format selection for CLI commands.

pub(crate) mod humanize;
pub(crate) mod table;

use std::fmt::Debug;
use std::io::{self, Write};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use conveyor_telemetry::RenderLog;
use serde::Serialize;

use crate::client::CliResult;
pub(crate) use table::{Tabular, sort_by_number};

/// Rendering mode selected by the `--output` flag.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Wide,
    Json,
    Yaml,
    Dump,
}

impl OutputFormat {
    /// Exact, case-sensitive lookup of a recognised flag value.
    pub(crate) fn parse(value: &str) -> Option<Self> {
        match value {
            "" | "table" => Some(Self::Table),
            "wide" => Some(Self::Wide),
            "json" => Some(Self::Json),
            "yaml" => Some(Self::Yaml),
            "spew" | "dump" => Some(Self::Dump),
            _ => None,
        }
    }

    /// Like [`OutputFormat::parse`], but unknown values select the table.
    pub(crate) fn from_flag(value: &str, log: &dyn RenderLog) -> Self {
        Self::parse(value).unwrap_or_else(|| {
            log.debug(&format!(
                "unrecognised output format '{value}', using table output"
            ));
            Self::Table
        })
    }
}

/// Writes command results to a sink in the selected [`OutputFormat`].
pub(crate) struct Renderer<W> {
    writer: W,
    log: Arc<dyn RenderLog>,
    now: DateTime<Utc>,
}

impl Renderer<io::Stdout> {
    pub(crate) fn stdout(log: Arc<dyn RenderLog>) -> Self {
        Self::new(io::stdout(), log, Utc::now())
    }
}

impl<W: Write> Renderer<W> {
    pub(crate) fn new(writer: W, log: Arc<dyn RenderLog>, now: DateTime<Utc>) -> Self {
        Self { writer, log, now }
    }

    pub(crate) fn log(&self) -> &dyn RenderLog {
        self.log.as_ref()
    }

    pub(crate) fn format(&self, flag: &str) -> OutputFormat {
        OutputFormat::from_flag(flag, self.log())
    }

    /// Render a collection. Structured formats receive the payload in API order;
    /// tables are sorted oldest first.
    pub(crate) fn list<T: Tabular>(&mut self, format: OutputFormat, items: Vec<T>) -> CliResult<()> {
        match format {
            OutputFormat::Table | OutputFormat::Wide => {
                let items = sort_by_number(items);
                self.table(&items, format == OutputFormat::Wide)
            }
            _ => self.structured(format, &items),
        }
    }

    /// Render a single resource; table formats print a one-row table.
    pub(crate) fn item<T: Tabular>(&mut self, format: OutputFormat, item: &T) -> CliResult<()> {
        match format {
            OutputFormat::Table | OutputFormat::Wide => {
                self.table(std::slice::from_ref(item), format == OutputFormat::Wide)
            }
            _ => self.structured(format, item),
        }
    }

    /// Render a confirmation message returned by the server.
    pub(crate) fn message(&mut self, format: OutputFormat, message: &str) -> CliResult<()> {
        match format {
            OutputFormat::Table | OutputFormat::Wide => {
                writeln!(self.writer, "{message}")?;
                self.writer.flush()?;
                Ok(())
            }
            _ => self.structured(format, message),
        }
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.writer
    }

    fn table<T: Tabular>(&mut self, items: &[T], wide: bool) -> CliResult<()> {
        let table = table::build_table(items, wide, self.now, self.log.as_ref());
        for line in table.lines() {
            let line = line.trim_end();
            if !line.is_empty() {
                writeln!(self.writer, "{line}")?;
            }
        }
        self.writer.flush()?;
        Ok(())
    }

    fn structured<T: Serialize + Debug + ?Sized>(
        &mut self,
        format: OutputFormat,
        value: &T,
    ) -> CliResult<()> {
        match format {
            OutputFormat::Json => {
                self.log.debug("rendering output as JSON");
                let text = serde_json::to_string_pretty(value).map_err(io::Error::from)?;
                writeln!(self.writer, "{text}")?;
            }
            OutputFormat::Yaml => {
                self.log.debug("rendering output as YAML");
                let text = serde_yaml::to_string(value).map_err(io::Error::other)?;
                write!(self.writer, "{text}")?;
            }
            OutputFormat::Dump | OutputFormat::Table | OutputFormat::Wide => {
                self.log.debug("dumping output");
                writeln!(self.writer, "{value:#?}")?;
            }
        }
        self.writer.flush()?;
        Ok(())
    }
}
