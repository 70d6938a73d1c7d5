//! Notification rendering
//!
//! Converts a [`ParsedReport`] into embeds that respect the sink's limits.
//!
//! Reports with job records get a summary embed (job table, totals, log
//! link) followed by optional "Job Details" embeds holding one section per
//! job. Every section is charged against a per-message character budget;
//! once a job no longer fits, all remaining jobs are collapsed into a single
//! "Remaining Jobs" section, which is itself dropped if it does not fit.
//!
//! Reports without job records are rendered generically from the raw
//! message, severity and log link.

pub mod color;
pub mod table;
pub mod truncate;

use crate::domain::notification::{Embed, EmbedField, EmbedFooter};
use crate::domain::report::{JobRecord, ParsedReport};

use self::color::{report_color, severity_color};
use self::table::{Column, text_table};
use self::truncate::{char_len, is_code_block, truncate};

const SUMMARY_TITLE: &str = "Backup Summary";
const DETAILS_TITLE: &str = "Job Details";
const DETAILS_CONTINUED_TITLE: &str = "Job Details (continued)";
const FALLBACK_TITLE: &str = "Backup Complete";
const GENERIC_TITLE: &str = "Notification";
const NOT_AVAILABLE: &str = "n/a";

/// Hard constraints imposed by the sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub title: usize,
    pub description: usize,
    pub field_name: usize,
    pub field_value: usize,
    pub footer: usize,
    pub fields_per_embed: usize,
    pub embeds_per_message: usize,
    /// Characters across all embeds of one message
    pub total_chars: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            title: 256,
            description: 4096,
            field_name: 256,
            field_value: 1024,
            footer: 2048,
            fields_per_embed: 25,
            embeds_per_message: 10,
            total_chars: 6000,
        }
    }
}

/// What the tabular strategy shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderProfile {
    pub columns: Vec<Column>,
    /// Emit one section per job after the summary
    pub job_sections: bool,
}

impl RenderProfile {
    /// Full table plus per-job sections with log excerpts
    pub fn detailed() -> Self {
        Self {
            columns: Column::ALL.to_vec(),
            job_sections: true,
        }
    }

    /// Full table only
    pub fn table() -> Self {
        Self {
            columns: Column::ALL.to_vec(),
            job_sections: false,
        }
    }

    /// Id, name and status only
    pub fn compact() -> Self {
        Self {
            columns: vec![Column::Id, Column::Name, Column::Status],
            job_sections: false,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "detailed" => Some(Self::detailed()),
            "table" => Some(Self::table()),
            "compact" => Some(Self::compact()),
            _ => None,
        }
    }
}

impl Default for RenderProfile {
    fn default() -> Self {
        Self::detailed()
    }
}

/// Request metadata the renderer needs besides the parsed report
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderContext<'a> {
    pub title: &'a str,
    pub severity: &'a str,
    pub node: &'a str,
    /// Prefix the archived log name is appended to
    pub link_prefix: &'a str,
    /// Raw report text, shown by the generic strategy
    pub message: &'a str,
}

impl RenderContext<'_> {
    pub fn log_url(&self, log_reference: Option<&str>) -> Option<String> {
        log_reference.map(|reference| format!("{}{}", self.link_prefix, reference))
    }
}

/// Builds sink documents from parsed reports
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    limits: Limits,
    profile: RenderProfile,
}

impl Renderer {
    pub fn new(limits: Limits, profile: RenderProfile) -> Self {
        Self { limits, profile }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn profile(&self) -> &RenderProfile {
        &self.profile
    }

    /// Render the primary documents for one delivery attempt
    ///
    /// `log_reference` is the archived log name; without it no log link is
    /// rendered.
    pub fn render(
        &self,
        parsed: &ParsedReport,
        log_reference: Option<&str>,
        ctx: &RenderContext<'_>,
    ) -> Vec<Embed> {
        let log_url = ctx.log_url(log_reference);
        if parsed.is_empty() {
            vec![self.generic(ctx, log_url.as_deref())]
        } else {
            self.tabular(parsed, ctx, log_url.as_deref())
        }
    }

    /// Minimal document sent when the sink rejects the primary one
    ///
    /// Carries only a title, a description and the primary color.
    pub fn fallback(
        &self,
        parsed: &ParsedReport,
        log_reference: Option<&str>,
        ctx: &RenderContext<'_>,
    ) -> Embed {
        let (title, mut description) = if parsed.is_empty() {
            (or_default(ctx.title, GENERIC_TITLE).to_string(), String::new())
        } else {
            (
                FALLBACK_TITLE.to_string(),
                format!("Backup completed for {} jobs.", parsed.records.len()),
            )
        };

        if let Some(url) = ctx.log_url(log_reference) {
            if !description.is_empty() {
                description.push(' ');
            }
            description.push_str(&format!("View full logs [here]({})", url));
        }
        if description.is_empty() {
            description.push_str("The full report could not be delivered.");
        }

        Embed {
            title: truncate(&title, self.limits.title),
            description: Some(truncate(&description, self.limits.description)),
            fields: Vec::new(),
            color: self.color(parsed, ctx),
            footer: None,
        }
    }

    /// Color shared by the primary and fallback documents
    pub fn color(&self, parsed: &ParsedReport, ctx: &RenderContext<'_>) -> u32 {
        if parsed.is_empty() {
            severity_color(ctx.severity)
        } else {
            report_color(parsed.all_ok())
        }
    }

    fn generic(&self, ctx: &RenderContext<'_>, log_url: Option<&str>) -> Embed {
        let mut fields = vec![
            EmbedField::new(
                "Message",
                truncate(or_default(ctx.message, "(empty)"), self.limits.field_value),
            ),
            EmbedField::new(
                "Severity",
                truncate(or_default(ctx.severity, "unknown"), self.limits.field_value),
            ),
        ];
        fields.extend(log_url.map(|url| self.log_link(url)));

        Embed {
            title: truncate(or_default(ctx.title, GENERIC_TITLE), self.limits.title),
            description: None,
            fields,
            color: severity_color(ctx.severity),
            footer: self.footer(ctx),
        }
    }

    fn tabular(
        &self,
        parsed: &ParsedReport,
        ctx: &RenderContext<'_>,
        log_url: Option<&str>,
    ) -> Vec<Embed> {
        let mut documents = Documents::new(&self.limits, self.summary(parsed, ctx, log_url));
        if !self.profile.job_sections {
            return documents.embeds;
        }

        let records = &parsed.records;
        let overflow = records.iter().enumerate().position(|(i, record)| {
            let more_follow = i + 1 < records.len();
            !documents.push_section(self.job_section(record), more_follow)
        });

        if let Some(start) = overflow {
            let rest = &records[start..];
            if documents.push_section(self.remaining_section(rest), false) {
                tracing::debug!("Consolidated {} jobs into one section", rest.len());
            } else {
                tracing::warn!(
                    "Dropping details for {} jobs: message budget exhausted",
                    rest.len()
                );
            }
        }
        documents.embeds
    }

    fn summary(
        &self,
        parsed: &ParsedReport,
        ctx: &RenderContext<'_>,
        log_url: Option<&str>,
    ) -> Embed {
        let summary = &parsed.summary;
        let table = text_table(&parsed.records, &self.profile.columns);
        let totals = format!(
            "**Total Time:** {}\n**Total Size:** {}",
            summary.running_time.as_deref().unwrap_or(NOT_AVAILABLE),
            summary.total_size.as_deref().unwrap_or(NOT_AVAILABLE),
        );

        let mut fields = vec![
            EmbedField::new("Details", truncate(&table, self.limits.field_value)),
            EmbedField::new("Totals", truncate(&totals, self.limits.field_value)),
        ];
        fields.extend(log_url.map(|url| self.log_link(url)));

        Embed {
            title: truncate(
                &format!("{} ({} Jobs)", SUMMARY_TITLE, parsed.records.len()),
                self.limits.title,
            ),
            description: None,
            fields,
            color: report_color(parsed.all_ok()),
            footer: self.footer(ctx),
        }
    }

    fn job_section(&self, record: &JobRecord) -> EmbedField {
        let name = format!("{} ({})", record.name, record.id);
        let mut value = format!(
            "**Status:** {}\n**Time:** {}\n**Size:** {}",
            or_default(&record.status, NOT_AVAILABLE),
            or_default(&record.time, NOT_AVAILABLE),
            or_default(&record.size, NOT_AVAILABLE),
        );

        if !record.logs.is_empty() {
            let room = self.limits.field_value.saturating_sub(char_len(&value) + 1);
            let excerpt = truncate(&format!("```\n{}\n```", record.logs.join("\n")), room);
            if is_code_block(&excerpt) {
                value.push('\n');
                value.push_str(&excerpt);
            }
        }

        EmbedField::new(
            truncate(&name, self.limits.field_name),
            truncate(&value, self.limits.field_value),
        )
    }

    fn remaining_section(&self, records: &[JobRecord]) -> EmbedField {
        let lines: Vec<String> = records
            .iter()
            .map(|r| format!("{} ({}): {} - {}", r.name, r.id, r.status, r.size))
            .collect();
        EmbedField::new(
            truncate(&format!("Remaining Jobs ({})", records.len()), self.limits.field_name),
            truncate(&lines.join("\n"), self.limits.field_value),
        )
    }

    fn log_link(&self, url: &str) -> EmbedField {
        EmbedField::new(
            "Logs",
            truncate(
                &format!("Full logs available [here]({})", url),
                self.limits.field_value,
            ),
        )
    }

    fn footer(&self, ctx: &RenderContext<'_>) -> Option<EmbedFooter> {
        let node = ctx.node.trim();
        (!node.is_empty()).then(|| EmbedFooter {
            text: truncate(&format!("Node: {}", node), self.limits.footer),
        })
    }
}

/// Embeds of one message plus the characters charged so far
struct Documents<'l> {
    limits: &'l Limits,
    embeds: Vec<Embed>,
    used: usize,
    color: u32,
    sections_open: bool,
}

impl<'l> Documents<'l> {
    fn new(limits: &'l Limits, summary: Embed) -> Self {
        Self {
            limits,
            used: summary.char_count(),
            color: summary.color,
            embeds: vec![summary],
            sections_open: false,
        }
    }

    /// Section slots left across the open and not yet opened embeds
    fn free_slots(&self) -> usize {
        let in_current = match self.embeds.last() {
            Some(embed) if self.sections_open => {
                self.limits.fields_per_embed.saturating_sub(embed.fields.len())
            }
            _ => 0,
        };
        let unopened = self
            .limits
            .embeds_per_message
            .saturating_sub(self.embeds.len());
        in_current + unopened * self.limits.fields_per_embed
    }

    /// Append a section if the budget allows
    ///
    /// With `keep_spare` one slot stays free for a later consolidation
    /// section.
    fn push_section(&mut self, field: EmbedField, keep_spare: bool) -> bool {
        let needed_slots = if keep_spare { 2 } else { 1 };
        if self.free_slots() < needed_slots {
            return false;
        }

        let needs_embed = !self.sections_open
            || self
                .embeds
                .last()
                .is_none_or(|embed| embed.fields.len() >= self.limits.fields_per_embed);
        let title = if self.sections_open {
            DETAILS_CONTINUED_TITLE
        } else {
            DETAILS_TITLE
        };
        let title_cost = if needs_embed { char_len(title) } else { 0 };

        let cost = title_cost + field.char_count();
        if self.used + cost > self.limits.total_chars {
            return false;
        }

        if needs_embed {
            self.embeds.push(Embed {
                title: title.to_string(),
                color: self.color,
                ..Default::default()
            });
            self.sections_open = true;
        }
        if let Some(embed) = self.embeds.last_mut() {
            embed.fields.push(field);
        }
        self.used += cost;
        true
    }
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() { default } else { value }
}
