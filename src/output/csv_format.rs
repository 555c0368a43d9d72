//! CSV export of scan results.
//!
//! Two layouts: open ports only (`host,port,banner`) and every result
//! (`host,port,status,banner`). Hosts appear in target order, ports ascending.

use crate::scanner::ScanSummary;
use chrono::{DateTime, Local};
use std::io;
use std::path::{Path, PathBuf};

/// Which rows and columns an export contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// Open ports only.
    OpenOnly,
    /// Every probed port with its status.
    Full,
}

impl ExportKind {
    fn file_prefix(self) -> &'static str {
        match self {
            Self::OpenOnly => "open_ports",
            Self::Full => "scan_full",
        }
    }

    /// Short description used in user-facing messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::OpenOnly => "OPEN ports",
            Self::Full => "FULL results",
        }
    }

    /// Timestamped default file name, e.g. `open_ports_20240131_235959.csv`.
    pub fn default_file_name(self, now: DateTime<Local>) -> String {
        format!("{}_{}.csv", self.file_prefix(), now.format("%Y%m%d_%H%M%S"))
    }
}

/// Write results as CSV to any writer.
pub fn write_csv<W: io::Write>(
    writer: W,
    summary: &ScanSummary,
    kind: ExportKind,
) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    match kind {
        ExportKind::OpenOnly => wtr.write_record(["host", "port", "banner"])?,
        ExportKind::Full => wtr.write_record(["host", "port", "status", "banner"])?,
    }

    for (host, result) in summary.rows() {
        let port = result.port.to_string();
        match kind {
            ExportKind::OpenOnly if result.is_open() => {
                wtr.write_record([host, port.as_str(), result.banner.as_str()])?;
            }
            ExportKind::OpenOnly => {}
            ExportKind::Full => {
                let status = result.status.to_string();
                wtr.write_record([host, port.as_str(), status.as_str(), result.banner.as_str()])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}

/// Save results to `path`, or to a timestamped file in the working directory.
///
/// Returns the path that was written.
pub fn save_csv(
    summary: &ScanSummary,
    kind: ExportKind,
    path: Option<&Path>,
) -> csv::Result<PathBuf> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(kind.default_file_name(Local::now())),
    };
    let file = std::fs::File::create(&path)?;
    write_csv(file, summary, kind)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{HostResult, HostScan, ProbeResult, ProbeStatus};
    use crate::types::Port;
    use chrono::TimeZone;

    fn port(n: u16) -> Port {
        Port::new(n).unwrap()
    }

    fn summary() -> ScanSummary {
        ScanSummary::new(vec![
            HostScan {
                target: "web.example".into(),
                resolved: "192.0.2.10".into(),
                result: HostResult::new(
                    "192.0.2.10",
                    vec![
                        ProbeResult::open(port(80), "HTTP/1.0 200 OK"),
                        ProbeResult::new(port(22), ProbeStatus::Filtered),
                    ],
                ),
            },
            HostScan {
                target: "192.0.2.11".into(),
                resolved: "192.0.2.11".into(),
                result: HostResult::new(
                    "192.0.2.11",
                    vec![
                        ProbeResult::open(port(25), "220 mail, ESMTP"),
                        ProbeResult::new(port(21), ProbeStatus::Closed),
                        ProbeResult::new(port(23), ProbeStatus::Error),
                    ],
                ),
            },
        ])
    }

    fn render(kind: ExportKind) -> String {
        let mut buf = Vec::new();
        write_csv(&mut buf, &summary(), kind).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_open_only_layout() {
        assert_eq!(
            render(ExportKind::OpenOnly),
            "host,port,banner\n\
             web.example,80,HTTP/1.0 200 OK\n\
             192.0.2.11,25,\"220 mail, ESMTP\"\n"
        );
    }

    #[test]
    fn test_full_layout() {
        assert_eq!(
            render(ExportKind::Full),
            "host,port,status,banner\n\
             web.example,22,filtered,\n\
             web.example,80,open,HTTP/1.0 200 OK\n\
             192.0.2.11,21,closed,\n\
             192.0.2.11,23,error,\n\
             192.0.2.11,25,open,\"220 mail, ESMTP\"\n"
        );
    }

    #[test]
    fn test_default_file_names() {
        let now = Local.with_ymd_and_hms(2024, 1, 31, 23, 59, 58).unwrap();
        assert_eq!(
            ExportKind::OpenOnly.default_file_name(now),
            "open_ports_20240131_235958.csv"
        );
        assert_eq!(
            ExportKind::Full.default_file_name(now),
            "scan_full_20240131_235958.csv"
        );
    }

    #[test]
    fn test_save_to_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.csv");

        let written = save_csv(&summary(), ExportKind::OpenOnly, Some(&target)).unwrap();

        assert_eq!(written, target);
        let content = std::fs::read_to_string(&target).unwrap();
        assert!(content.starts_with("host,port,banner\n"));
        assert_eq!(content.lines().count(), 3);
    }
}
