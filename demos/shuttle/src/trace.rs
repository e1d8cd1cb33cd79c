//! `hops.csv` trace output.

use std::fs::File;
use std::path::Path;

use anyhow::Result;
use csv::Writer;

use crate::device::HopRecord;

/// Writes one row per confirmed hop to `hops.csv` in the trace directory.
pub struct TraceWriter {
    hops:     Writer<File>,
    rows:     usize,
    finished: bool,
}

impl TraceWriter {
    /// Create `dir` if needed, open `hops.csv`, and write the header row.
    pub fn new(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        let mut hops = Writer::from_path(dir.join("hops.csv"))?;
        hops.write_record(["seq", "vehicle", "command_id", "from_station", "to_station", "corrected"])?;
        Ok(Self { hops, rows: 0, finished: false })
    }

    pub fn write(&mut self, hop: &HopRecord) -> Result<()> {
        self.rows += 1;
        self.hops.write_record(&[
            self.rows.to_string(),
            hop.vehicle.clone(),
            hop.command_id.get().to_string(),
            hop.from.get().to_string(),
            hop.to.get().to_string(),
            (hop.corrected as u8).to_string(),
        ])?;
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn finish(&mut self) -> Result<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.hops.flush()?;
        Ok(())
    }
}
