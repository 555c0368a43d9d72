//! Banner grabbing support for TCP connections.
//!
//! Holds the static probe table of payloads that are safe to send unsolicited
//! and turns the first chunk of data a service returns into a one-line banner.

/// Maximum bytes to read for a banner.
pub const MAX_BANNER_SIZE: usize = 2048;

const QUIT_PROBE: &[u8] = b"QUIT\r\n";
const CRLF_PROBE: &[u8] = b"\r\n";
const SMTP_PROBE: &[u8] = b"HELO example.com\r\n";
const HTTP_PROBE: &[u8] = b"HEAD / HTTP/1.0\r\n\r\n";

/// Lookup from port to the payload written after connecting.
pub type ProbeLookup = fn(u16) -> Option<&'static [u8]>;

/// Well-known ports and the payload written right after connecting.
static PROBES: &[(u16, &[u8])] = &[
    (21, QUIT_PROBE),  // ftp
    (22, CRLF_PROBE),  // ssh
    (25, SMTP_PROBE),  // smtp
    (80, HTTP_PROBE),  // http
    (110, QUIT_PROBE), // pop3
    (143, CRLF_PROBE), // imap
    (443, HTTP_PROBE), // https
    (3306, CRLF_PROBE), // mysql
];

/// Look up the probe payload for a port, if it has one.
///
/// Ports without an entry only get a passive read.
pub fn probe_for(port: u16) -> Option<&'static [u8]> {
    PROBES
        .iter()
        .find(|(p, _)| *p == port)
        .map(|(_, payload)| *payload)
}

/// Reduce raw service output to its first line.
///
/// Invalid UTF-8 is replaced rather than rejected. Returns an empty string
/// when there is nothing printable.
pub fn extract_banner(data: &[u8]) -> String {
    let text = String::from_utf8_lossy(data);
    text.trim()
        .lines()
        .next()
        .map(|line| line.trim_end().to_string())
        .unwrap_or_default()
}
