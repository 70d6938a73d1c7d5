//! Backup report parser
//!
//! Turns the human-readable report produced by the backup tool into a
//! [`ParsedReport`]. The report is a sequence of sections introduced by
//! header lines:
//!
//! ```text
//! Details
//! =======
//! VMID    Name    Status    Time    Size    Filename
//! 100     vm1     ok        0:10    1G      vzdump-qemu-100.vma.zst
//!
//! Total running time: 0:10
//! Total size: 1G
//!
//! Logs
//! ====
//! 100: 2024-01-01 02:00:00 INFO: Starting Backup of VM 100
//! ```
//!
//! Parsing is best-effort and never fails: rows it cannot make sense of are
//! skipped, and text without any recognised section yields an empty report.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::report::{JobRecord, ParsedReport};

static DOUBLE_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("static pattern is valid"));
static SINGLE_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static pattern is valid"));

/// Column delimiter used for rows in the `Details` section
///
/// The report is whitespace-aligned rather than quoted, so the delimiter is
/// a whitespace rule. The default requires two or more whitespace characters
/// so that names containing a single space survive as one cell.
#[derive(Debug, Clone)]
pub struct SplitPolicy {
    delimiter: Regex,
}

impl SplitPolicy {
    /// Split on runs of two or more whitespace characters
    pub fn double_space() -> Self {
        Self {
            delimiter: DOUBLE_SPACE.clone(),
        }
    }

    /// Split on any run of whitespace
    pub fn single_space() -> Self {
        Self {
            delimiter: SINGLE_SPACE.clone(),
        }
    }

    /// Split on a caller-supplied regular expression
    pub fn custom(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            delimiter: Regex::new(pattern)?,
        })
    }

    /// Resolve a configured policy name (`double` or `single`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "double" | "double_space" => Some(Self::double_space()),
            "single" | "single_space" => Some(Self::single_space()),
            _ => None,
        }
    }

    pub fn pattern(&self) -> &str {
        self.delimiter.as_str()
    }

    fn split<'a>(&self, line: &'a str) -> Vec<&'a str> {
        self.delimiter.split(line).collect()
    }
}

impl Default for SplitPolicy {
    fn default() -> Self {
        Self::double_space()
    }
}

/// Report section currently being scanned
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Section {
    #[default]
    None,
    Details,
    Total,
    Logs,
}

/// Accumulator threaded through the line scan
///
/// The record appended last is the current one.
#[derive(Debug, Default)]
struct Scan {
    section: Section,
    report: ParsedReport,
}

impl Scan {
    fn feed(mut self, line: &str, policy: &SplitPolicy) -> Self {
        // DETAILS and LOGS headers are consumed; the TOTAL header is data too
        if line.starts_with("Details") {
            self.section = Section::Details;
            return self;
        } else if line.starts_with("Total") {
            self.section = Section::Total;
        } else if line.starts_with("Logs") {
            self.section = Section::Logs;
            return self;
        }

        match self.section {
            Section::None => {}
            Section::Details => self.details_row(line, policy),
            Section::Total => self.total_line(line),
            Section::Logs => self.log_line(line),
        }
        self
    }

    fn details_row(&mut self, line: &str, policy: &SplitPolicy) {
        if line.contains("VMID") {
            return;
        }
        let line = line.trim();
        if line.is_empty() || line.starts_with('=') {
            return;
        }

        let mut cells = policy.split(line).into_iter().map(str::trim);
        let mut next = || cells.next().unwrap_or_default().to_string();
        let record = JobRecord {
            id: next(),
            name: next(),
            status: next(),
            time: next(),
            size: next(),
            filename: next(),
            logs: Vec::new(),
        };

        if record.id.is_empty() || record.name.is_empty() {
            tracing::debug!("Skipping incomplete details row: {:?}", line);
            return;
        }
        self.report.records.push(record);
    }

    fn total_line(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        let value = || line.split_once(": ").map(|(_, v)| v.trim().to_string());
        if line.contains("running time") {
            self.report.summary.running_time = value();
        } else if line.contains("Total size") {
            self.report.summary.total_size = value();
        }
    }

    fn log_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() || line.starts_with('=') || !line.contains("INFO:") {
            return;
        }
        let id = line.split(':').next().unwrap_or_default();
        match self.report.find_mut(id) {
            Some(record) => record.logs.push(line.to_string()),
            None => tracing::trace!("Discarding log line for unknown job {:?}", id),
        }
    }
}

/// Parses backup reports with a configurable row delimiter
#[derive(Debug, Clone, Default)]
pub struct ReportParser {
    policy: SplitPolicy,
}

impl ReportParser {
    pub fn new(policy: SplitPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &SplitPolicy {
        &self.policy
    }

    /// Parse report text into records and totals
    ///
    /// # Example
    /// ```
    /// use backhook_core::ReportParser;
    ///
    /// let report = ReportParser::default()
    ///     .parse("Details\n100  vm1  ok  0:10  1G  f1\nTotal size: 1G\n");
    /// assert_eq!(report.records.len(), 1);
    /// assert_eq!(report.summary.total_size.as_deref(), Some("1G"));
    /// ```
    pub fn parse(&self, text: &str) -> ParsedReport {
        text.trim()
            .lines()
            .fold(Scan::default(), |scan, line| scan.feed(line, &self.policy))
            .report
    }
}
