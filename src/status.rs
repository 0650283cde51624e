//! Unified status records produced from either printer dialect.

use serde::{Deserialize, Serialize};

/// State of the current (or last) print job.
///
/// Every field other than `valid` is only meaningful when `loaded` is
/// set. When `valid` is false the last fetch failed, and the remaining
/// fields hold whatever was last successfully read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobStatus {
    /// Last job fetch succeeded.
    pub valid: bool,

    /// A job is loaded on the printer.
    pub loaded: bool,

    /// Name of the file being printed.
    pub file_name: String,

    /// Textual job state as reported by the server, empty if not reported.
    pub job_state: String,

    /// Estimated total print time, in seconds.
    pub estimated_print_time: f64,

    /// Time spent printing so far, in seconds.
    pub print_time_elapsed: f64,

    /// Time left until the print completes, in seconds.
    pub print_time_remaining: f64,

    /// Progress of the job as reported by the server.
    pub percent_complete: f64,

    /// Filament used by the job, in millimeters.
    pub filament_length: f64,
}

/// Temperatures and operational state of the printer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrinterStatus {
    /// Last printer fetch succeeded.
    pub valid: bool,

    /// Actual extruder (tool0) temperature, in Celsius.
    pub tool0_temp: f64,

    /// Target extruder (tool0) temperature, in Celsius.
    pub tool0_target: f64,

    /// Actual bed temperature, in Celsius.
    pub bed_temp: f64,

    /// Target bed temperature, in Celsius.
    pub bed_target: f64,

    /// Textual printer state as reported by the server.
    pub print_state: String,

    /// Independent state flags. Always empty for Moonraker.
    pub flags: PrinterFlags,
}

/// Job and printer status, as seen after the last update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Status {
    /// Status of the current job.
    pub job: JobStatus,

    /// Status of the printer itself.
    pub printer: PrinterStatus,
}

/// A single printer state flag.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[repr(u16)]
pub enum PrinterFlag {
    /// A print is being cancelled.
    Cancelling = 1 << 0,
    /// The connection to the printer is closed or errored.
    ClosedOrError = 1 << 1,
    /// The printer is in an error state.
    Error = 1 << 2,
    /// The print is finishing.
    Finishing = 1 << 3,
    /// The printer is operational.
    Operational = 1 << 4,
    /// The print is paused.
    Paused = 1 << 5,
    /// The print is being paused.
    Pausing = 1 << 6,
    /// A print is running.
    Printing = 1 << 7,
    /// The printer is ready to receive a job.
    Ready = 1 << 8,
    /// The print is resuming.
    Resuming = 1 << 9,
    /// The SD card is ready.
    SdReady = 1 << 10,
}

impl PrinterFlag {
    /// Every flag, in bit order.
    pub const ALL: [PrinterFlag; 11] = [
        PrinterFlag::Cancelling,
        PrinterFlag::ClosedOrError,
        PrinterFlag::Error,
        PrinterFlag::Finishing,
        PrinterFlag::Operational,
        PrinterFlag::Paused,
        PrinterFlag::Pausing,
        PrinterFlag::Printing,
        PrinterFlag::Ready,
        PrinterFlag::Resuming,
        PrinterFlag::SdReady,
    ];

    /// Bit used by this flag inside [PrinterFlags].
    pub const fn bit(self) -> u16 {
        self as u16
    }
}

/// Unordered set of [PrinterFlag]s, stored as a bitmask.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrinterFlags(u16);

impl PrinterFlags {
    /// The empty set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Raw bitmask.
    pub const fn bits(&self) -> u16 {
        self.0
    }

    /// Add a flag to the set.
    pub fn insert(&mut self, flag: PrinterFlag) {
        self.0 |= flag.bit();
    }

    /// Check whether a flag is in the set.
    pub fn contains(&self, flag: PrinterFlag) -> bool {
        self.0 & flag.bit() != 0
    }

    /// No flag is set.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterate the set flags, in bit order.
    pub fn iter(&self) -> impl Iterator<Item = PrinterFlag> + '_ {
        PrinterFlag::ALL.into_iter().filter(|flag| self.contains(*flag))
    }
}

impl FromIterator<PrinterFlag> for PrinterFlags {
    fn from_iter<I: IntoIterator<Item = PrinterFlag>>(iter: I) -> Self {
        let mut flags = Self::empty();
        for flag in iter {
            flags.insert(flag);
        }
        flags
    }
}
