//! This module contains support for reading status from moonraker 3D
//! printers, proxying klipper's printer objects.

use serde_json::Value;

use crate::{
    status::{JobStatus, PrinterFlags, PrinterStatus},
    value::{lookup, number, text},
};

/// Printer objects queried for job status.
pub const JOB_PATH: &str = "/printer/objects/query?virtual_sdcard&print_stats&toolhead";

/// Printer objects queried for printer status.
pub const PRINTER_PATH: &str = "/printer/objects/query?extruder&heater_bed&print_stats";

const STATUS: [&str; 2] = ["result", "status"];

fn status(doc: &Value) -> &Value {
    lookup(doc, &STATUS)
}

/// Read a `virtual_sdcard`/`print_stats` object query.
///
/// Moonraker has no estimate of the total print time, so it is
/// extrapolated from the elapsed print duration and the fraction of the
/// file consumed so far. Zero progress leaves both the estimate and the
/// remaining time non-finite.
pub fn parse_job(doc: &Value) -> JobStatus {
    let job_state = text(doc, &["state"]);
    let status = status(doc);

    if matches!(lookup(status, &["virtual_sdcard", "is_active"]), Value::Bool(false)) {
        return JobStatus {
            job_state,
            ..Default::default()
        };
    }

    let progress = number(status, &["virtual_sdcard", "progress"]);
    let elapsed = number(status, &["print_stats", "print_duration"]);
    let estimated = elapsed / progress;

    JobStatus {
        loaded: true,
        file_name: text(status, &["print_stats", "filename"]),
        job_state,
        estimated_print_time: estimated,
        print_time_elapsed: elapsed,
        print_time_remaining: estimated - elapsed,
        percent_complete: progress,
        filament_length: number(status, &["print_stats", "filament_used"]),
        ..Default::default()
    }
}

/// Read an `extruder`/`heater_bed`/`print_stats` object query.
pub fn parse_printer(doc: &Value) -> PrinterStatus {
    let status = status(doc);

    PrinterStatus {
        tool0_temp: number(status, &["extruder", "temperature"]),
        tool0_target: number(status, &["extruder", "target"]),
        bed_temp: number(status, &["heater_bed", "temperature"]),
        bed_target: number(status, &["heater_bed", "target"]),
        print_state: text(status, &["print_stats", "state"]),
        // klipper exposes no equivalent of OctoPrint's state flags.
        flags: PrinterFlags::empty(),
        ..Default::default()
    }
}
