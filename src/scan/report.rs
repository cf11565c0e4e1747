//! Text formatting of scan results.
//!
//! Lines are plain strings, optionally wrapped in ANSI colors: green for files
//! with one shell, red for files needing repair and for failures, yellow for
//! banners and timing. Padding is applied before coloring so columns line up
//! in a terminal.

use owo_colors::OwoColorize;

use super::{FileOutcome, FileReport, Relocation, ScanOptions, ScanSummary};
use crate::error::MeshError;

/// Width of a banner line.
const BANNER_WIDTH: usize = 78;

/// Presentation settings for report lines.
#[derive(Debug, Clone)]
pub struct ReportStyle {
    /// Emit ANSI color sequences.
    pub color: bool,
    /// Column width reserved for file names.
    pub name_width: usize,
}

impl Default for ReportStyle {
    fn default() -> Self {
        Self {
            color: true,
            name_width: 45,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Tone {
    Good,
    Bad,
    Banner,
}

impl ReportStyle {
    /// Enable or disable ANSI colors.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Set the file-name column width.
    pub fn with_name_width(mut self, width: usize) -> Self {
        self.name_width = width;
        self
    }

    fn paint(&self, text: &str, tone: Tone) -> String {
        if !self.color {
            return text.to_string();
        }
        match tone {
            Tone::Good => text.bright_green().to_string(),
            Tone::Bad => text.bright_red().to_string(),
            Tone::Banner => text.bright_yellow().to_string(),
        }
    }

    /// A centered, `=`-filled title line.
    pub fn banner(&self, title: &str) -> String {
        let text = format!("{:=^width$}", format!("'{}'", title), width = BANNER_WIDTH);
        format!(" {}", self.paint(&text, Tone::Banner))
    }

    /// The report line for one file.
    ///
    /// Failures produce a diagnostic naming the file; front ends usually send
    /// those to stderr.
    pub fn file_line(&self, report: &FileReport) -> String {
        let ordinal = report.ordinal.map(|n| n.to_string()).unwrap_or_default();
        let name = format!("{:<width$}", report.file_name(), width = self.name_width);

        match &report.outcome {
            FileOutcome::Good(check) => format!(
                "  {:<4}- {}Shells: {}",
                ordinal,
                self.paint(&name, Tone::Good),
                self.paint(&check.shells().to_string(), Tone::Good),
            ),
            FileOutcome::NeedsRepair { check, relocation } => {
                let shells = format!("{:<4}", check.shells());
                let action = match relocation {
                    Relocation::NotRequested => "- needs repair".to_string(),
                    Relocation::Moved(dest) => {
                        let folder = dest
                            .parent()
                            .and_then(|p| p.file_name())
                            .map(|n| n.to_string_lossy().into_owned())
                            .unwrap_or_default();
                        format!("- moved to {}", folder)
                    }
                    Relocation::Failed(err) => format!("- needs repair (move failed: {})", err),
                };
                format!(
                    "  {:<4}- {}Shells: {}{}",
                    ordinal,
                    self.paint(&name, Tone::Bad),
                    self.paint(&shells, Tone::Bad),
                    action,
                )
            }
            FileOutcome::Failed(err) => self.paint(
                &format!("Error: {} - {}", report.file_name(), failure_reason(err)),
                Tone::Bad,
            ),
        }
    }

    /// The closing summary block.
    pub fn summary_lines(&self, summary: &ScanSummary, options: &ScanOptions) -> Vec<String> {
        let mut lines = vec![String::new(), self.banner("Report"), String::new()];

        if summary.multi_shell > 0 {
            let counts = format!(
                " Need repair:         {} / {:<10}",
                summary.multi_shell, summary.total
            );
            let mut line = self.paint(&counts, Tone::Bad);
            if let (true, Some(folder)) = (summary.any_relocated(), &options.quarantine) {
                line.push_str(&format!("Moved to '{}' folder", folder.display()));
            }
            lines.push(line);
        }

        lines.push(self.paint(
            &format!(" Good files:          {} / {}", summary.single_shell, summary.total),
            Tone::Good,
        ));

        if summary.failed > 0 {
            lines.push(self.paint(
                &format!(" Unreadable files:    {}", summary.failed),
                Tone::Bad,
            ));
        }

        lines.push(String::new());
        lines.push(self.paint(
            &format!(" Elapsed time:        {:.2?}", summary.elapsed),
            Tone::Banner,
        ));
        lines
    }

    /// The exit countdown message.
    pub fn countdown_line(&self, remaining_secs: u64) -> String {
        self.paint(
            &format!("Press ENTER to exit or wait {} seconds...", remaining_secs),
            Tone::Banner,
        )
    }
}

/// The part of an error worth showing next to a file name.
fn failure_reason(err: &MeshError) -> String {
    match err {
        MeshError::Open { source, .. } => format!("cannot open file: {}", source),
        MeshError::Parse { reason, .. } => format!("cannot read file: {}", reason),
        other => other.to_string(),
    }
}
