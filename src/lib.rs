#![deny(missing_docs)]
#![deny(missing_copy_implementations)]
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
#![deny(unused_import_braces)]
#![deny(unused_qualifications)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

//! This crate polls a 3D printer server speaking either the OctoPrint or
//! the Moonraker REST dialect, and normalizes what it reports into one
//! status record.

pub mod config;
mod dialect;
mod endpoint;
pub mod metrics;
mod monitor;
pub mod moonraker;
pub mod octoprint;
mod status;
pub mod transport;
mod value;

#[cfg(test)]
mod tests;

pub use dialect::Dialect;
pub use endpoint::PrinterEndpoint;
pub use monitor::Monitor;
pub use status::{JobStatus, PrinterFlag, PrinterFlags, PrinterStatus, Status};
