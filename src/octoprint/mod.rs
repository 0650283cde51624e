//! This module contains support for reading status from OctoPrint servers.

use serde_json::Value;

use crate::{
    status::{JobStatus, PrinterFlag, PrinterFlags, PrinterStatus},
    value::{lookup, number, text, truthy},
};

/// Path of the current job endpoint.
pub const JOB_PATH: &str = "/api/job";

/// Path of the printer state endpoint.
pub const PRINTER_PATH: &str = "/api/printer";

/// Keys under `state.flags` and the flag each one sets.
pub const FLAG_TABLE: [(&str, PrinterFlag); 11] = [
    ("cancelling", PrinterFlag::Cancelling),
    ("closedOrError", PrinterFlag::ClosedOrError),
    ("error", PrinterFlag::Error),
    ("finishing", PrinterFlag::Finishing),
    ("operational", PrinterFlag::Operational),
    ("paused", PrinterFlag::Paused),
    ("pausing", PrinterFlag::Pausing),
    ("printing", PrinterFlag::Printing),
    ("ready", PrinterFlag::Ready),
    ("resuming", PrinterFlag::Resuming),
    ("sdReady", PrinterFlag::SdReady),
];

/// Read a `GET /api/job` document.
pub fn parse_job(doc: &Value) -> JobStatus {
    let job_state = text(doc, &["state"]);

    if lookup(doc, &["job", "file", "display"]).is_null() {
        return JobStatus {
            job_state,
            ..Default::default()
        };
    }

    JobStatus {
        loaded: true,
        file_name: text(doc, &["job", "file", "display"]),
        job_state,
        estimated_print_time: number(doc, &["job", "estimatedPrintTime"]),
        print_time_elapsed: number(doc, &["progress", "printTime"]),
        print_time_remaining: number(doc, &["progress", "printTimeLeft"]),
        // OctoPrint reports `progress.completion`; this path only matches
        // Moonraker-shaped documents and reads 0 otherwise.
        percent_complete: number(doc, &["result", "status", "virtual_sdcard", "progress"]),
        filament_length: number(doc, &["job", "filament", "tool0", "length"]),
        ..Default::default()
    }
}

/// Read a `GET /api/printer` document.
pub fn parse_printer(doc: &Value) -> PrinterStatus {
    let flags: PrinterFlags = FLAG_TABLE
        .iter()
        .filter(|(key, _)| truthy(doc, &["state", "flags", *key]))
        .map(|(_, flag)| *flag)
        .collect();

    PrinterStatus {
        tool0_temp: number(doc, &["temperature", "tool0", "actual"]),
        tool0_target: number(doc, &["temperature", "tool0", "target"]),
        bed_temp: number(doc, &["temperature", "bed", "actual"]),
        bed_target: number(doc, &["temperature", "bed", "target"]),
        print_state: text(doc, &["state", "text"]),
        flags,
        ..Default::default()
    }
}
