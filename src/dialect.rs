//! Selection of the REST dialect spoken by a printer server.

use parse_display::{Display, FromStr};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    moonraker, octoprint,
    status::{JobStatus, PrinterStatus},
};

/// REST dialect spoken by the printer server.
///
/// Chosen once per endpoint; responses are never sniffed to guess it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Display, FromStr, Serialize, Deserialize)]
#[display(style = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// OctoPrint's `/api` endpoints.
    #[default]
    OctoPrint,

    /// Moonraker's printer object queries.
    Moonraker,
}

impl Dialect {
    /// Path queried for the current job.
    pub fn job_path(&self) -> &'static str {
        match self {
            Self::OctoPrint => octoprint::JOB_PATH,
            Self::Moonraker => moonraker::JOB_PATH,
        }
    }

    /// Path queried for temperatures and printer state.
    pub fn printer_path(&self) -> &'static str {
        match self {
            Self::OctoPrint => octoprint::PRINTER_PATH,
            Self::Moonraker => moonraker::PRINTER_PATH,
        }
    }

    /// Map a job document onto a [JobStatus]. `valid` is left unset.
    pub fn parse_job(&self, doc: &Value) -> JobStatus {
        match self {
            Self::OctoPrint => octoprint::parse_job(doc),
            Self::Moonraker => moonraker::parse_job(doc),
        }
    }

    /// Map a printer document onto a [PrinterStatus]. `valid` is left unset.
    pub fn parse_printer(&self, doc: &Value) -> PrinterStatus {
        match self {
            Self::OctoPrint => octoprint::parse_printer(doc),
            Self::Moonraker => moonraker::parse_printer(doc),
        }
    }
}
