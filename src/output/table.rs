use crate::domain::model::{Channel, OutputFile};
use crate::output::format_frequency;
use crate::utils::error::{CodeplugError, Result};

/// A fixed CSV layout: column names in order, each with its default value.
pub(crate) type Layout = &'static [(&'static str, &'static str)];

/// One output row, prefilled with the layout's defaults.
#[derive(Debug, Clone)]
pub(crate) struct Row {
    layout: Layout,
    values: Vec<String>,
}

impl Row {
    pub(crate) fn new(layout: Layout) -> Self {
        Self {
            layout,
            values: layout.iter().map(|(_, default)| default.to_string()).collect(),
        }
    }

    /// Sets a column by name. Naming a column the layout lacks is a bug in
    /// the calling serializer.
    pub(crate) fn set(&mut self, column: &str, value: impl Into<String>) -> &mut Self {
        match self.layout.iter().position(|(name, _)| *name == column) {
            Some(index) => self.values[index] = value.into(),
            None => debug_assert!(false, "column '{}' is not in this layout", column),
        }
        self
    }

    #[cfg(test)]
    pub(crate) fn get(&self, column: &str) -> Option<&str> {
        self.layout
            .iter()
            .position(|(name, _)| *name == column)
            .map(|index| self.values[index].as_str())
    }
}

/// Writes rows of one layout as CPS-style CSV: every field quoted, CRLF line
/// endings, header first.
pub(crate) struct Table {
    layout: Layout,
    writer: csv::Writer<Vec<u8>>,
}

impl Table {
    pub(crate) fn new(layout: Layout) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Always)
            .terminator(csv::Terminator::CRLF)
            .from_writer(Vec::new());
        writer.write_record(layout.iter().map(|(name, _)| *name))?;
        Ok(Self { layout, writer })
    }

    pub(crate) fn row(&self) -> Row {
        Row::new(self.layout)
    }

    pub(crate) fn push(&mut self, row: &Row) -> Result<()> {
        self.writer.write_record(&row.values)?;
        Ok(())
    }

    pub(crate) fn finish(self, name: &str) -> Result<OutputFile> {
        let data = self
            .writer
            .into_inner()
            .map_err(|e| CodeplugError::IoError(e.into_error()))?;
        Ok(OutputFile {
            name: name.to_string(),
            data,
        })
    }
}

/// A channel list rendered as the CPS's three parallel `|`-joined columns.
pub(crate) struct Members {
    pub names: String,
    pub rx: String,
    pub tx: String,
}

impl Members {
    pub(crate) fn of<'a>(channels: impl IntoIterator<Item = &'a Channel>) -> Self {
        let mut names = Vec::new();
        let mut rx = Vec::new();
        let mut tx = Vec::new();
        for channel in channels {
            names.push(channel.name.clone());
            rx.push(format_frequency(channel.rx_freq));
            tx.push(format_frequency(channel.tx_freq));
        }
        Self {
            names: names.join("|"),
            rx: rx.join("|"),
            tx: tx.join("|"),
        }
    }
}
