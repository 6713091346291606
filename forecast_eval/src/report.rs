//! Text, JSON and CSV output of an evaluation

use crate::error::Result;
use crate::evaluator::Evaluation;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

impl std::fmt::Display for Evaluation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Forecasted Sales for Store Key: {}", self.store_key)?;
        if let (Some(first), Some(last)) = (self.table.rows().first(), self.table.rows().last()) {
            writeln!(
                f,
                "Compared {} days from {} to {}",
                self.table.len(),
                first.date,
                last.date
            )?;
        }
        write!(f, "{}", self.accuracy)?;

        if let Some(outlook) = &self.outlook {
            let dates = outlook.dates();
            if let (Some(first), Some(last)) = (dates.first(), dates.last()) {
                let total: f64 = outlook.values().iter().sum();
                writeln!(
                    f,
                    "Outlook: {} days from {} to {}, {:.0} total forecasted sales",
                    outlook.len(),
                    first,
                    last,
                    total
                )?;
            }
        }
        Ok(())
    }
}

impl Evaluation {
    /// Serialize the evaluation, including the aligned rows, as pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the aligned table to a CSV file
    pub fn export_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.table.write_csv(&mut writer)?;
        writer.flush()?;
        debug!(path = %path.display(), rows = self.table.len(), "exported aligned table");
        Ok(())
    }
}
