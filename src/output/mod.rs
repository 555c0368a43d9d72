//! Output module.
//!
//! Live terminal reporting and CSV export. Both consume the scanner's result
//! types and never feed anything back into a scan.

mod csv_format;
mod plain;

pub use csv_format::{save_csv, write_csv, ExportKind};
pub use plain::{print_error, Reporter};
