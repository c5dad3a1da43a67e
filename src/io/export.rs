//! CSV export for per-tick monitor reports.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::bms::TickReport;
use crate::error::Error;

/// Column header for CSV telemetry export.
const HEADER: &str = "tick,time_s,state,soc_percent,charge_mah,soh_percent,pack_current_a,charging,\
                       charge_cycles,min_cell_v,max_cell_v,max_cell_temp_c";

/// Exports tick reports to a CSV file at the given path.
///
/// Writes a header row followed by one data row per tick. Produces
/// deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an error if file creation or writing fails.
pub fn export_csv(reports: &[TickReport], path: &Path) -> Result<(), Error> {
    let file = File::create(path)?;
    write_csv(reports, io::BufWriter::new(file))
}

/// Writes tick reports as CSV to any writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_csv(reports: &[TickReport], writer: impl Write) -> Result<(), Error> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for r in reports {
        wtr.write_record(&[
            r.tick.to_string(),
            format!("{:.3}", r.time_s),
            r.state.as_str().to_string(),
            format!("{:.4}", r.soc_percent),
            format!("{:.3}", r.charge_mah),
            format!("{:.4}", r.soh_percent),
            format!("{:.4}", r.pack_current_a),
            r.is_charging.to_string(),
            format!("{:.1}", r.charge_cycles),
            format!("{:.4}", r.min_cell_voltage_v),
            format!("{:.4}", r.max_cell_voltage_v),
            format!("{:.4}", r.max_cell_temperature_c),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
