//! Plain text terminal reporting.
//!
//! Produces human-readable output with optional colors. Whether to color is
//! a value owned by the [`Reporter`], not process-wide state.

use crate::scanner::{HostResult, ProbeResult, ScanObserver, ScanSummary};
use console::Style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Mutex;

/// Live reporter for a running scan.
///
/// Prints a header per host, each open port as it is found (completion
/// order), and a closing summary. With `silent` set, only saved-file notices
/// are printed.
pub struct Reporter {
    color: bool,
    silent: bool,
    progress: Mutex<Option<ProgressBar>>,
}

impl Reporter {
    pub fn new(color: bool, silent: bool) -> Self {
        Self {
            color,
            silent,
            progress: Mutex::new(None),
        }
    }

    fn styled(&self, style: Style) -> Style {
        style.force_styling(self.color)
    }

    /// Header line printed before a host is scanned.
    pub fn host_header(&self, target: &str, resolved: &str) -> String {
        let text = format!("== Target: {} ({}) ==", target, resolved);
        self.styled(Style::new().magenta()).apply_to(text).to_string()
    }

    /// Line printed for an open port.
    pub fn open_line(&self, result: &ProbeResult) -> String {
        let banner = if result.banner.is_empty() {
            "-"
        } else {
            result.banner.as_str()
        };
        let text = format!("{:5}  OPEN   {}", result.port.as_u16(), banner);
        self.styled(Style::new().green()).apply_to(text).to_string()
    }

    pub fn summary_line(&self, summary: &ScanSummary) -> String {
        format!(
            "Scan complete. Total open ports found across targets: {}",
            self.styled(Style::new().bold()).apply_to(summary.total_open)
        )
    }

    pub fn print_summary(&self, summary: &ScanSummary) {
        if !self.silent {
            println!();
            println!("{}", self.summary_line(summary));
        }
    }

    /// Announce an exported CSV file. Printed even in silent mode.
    pub fn print_saved(&self, what: &str, path: &Path) {
        let marker = self.styled(Style::new().green().bold()).apply_to("[+]");
        println!("{} Saved {} CSV: {}", marker, what, path.display());
    }

    fn with_progress(&self, f: impl FnOnce(&mut Option<ProgressBar>)) {
        if let Ok(mut guard) = self.progress.lock() {
            f(&mut guard);
        }
    }
}

impl ScanObserver for Reporter {
    fn host_started(&self, target: &str, resolved: &str, ports: usize) {
        if self.silent {
            return;
        }
        println!();
        println!("{}", self.host_header(target, resolved));

        let pb = ProgressBar::new(ports as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%)")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");
        pb.set_style(style);
        self.with_progress(|slot| *slot = Some(pb));
    }

    fn port_finished(&self, result: &ProbeResult) {
        if self.silent {
            return;
        }
        let line = result.is_open().then(|| self.open_line(result));
        self.with_progress(|slot| match slot {
            Some(pb) => {
                pb.inc(1);
                if let Some(line) = &line {
                    pb.suspend(|| println!("{}", line));
                }
            }
            None => {
                if let Some(line) = &line {
                    println!("{}", line);
                }
            }
        });
    }

    fn host_finished(&self, _result: &HostResult) {
        self.with_progress(|slot| {
            if let Some(pb) = slot.take() {
                pb.finish_and_clear();
            }
        });
    }
}

/// Print an error message.
pub fn print_error(msg: &str, color: bool) {
    let label = Style::new().red().bold().force_styling(color);
    eprintln!("{} {}", label.apply_to("Error:"), msg);
}
