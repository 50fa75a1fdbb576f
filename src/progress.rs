//! シート処理の進捗表示（indicatif）

use indicatif::{ProgressBar, ProgressStyle};
use itemcode_core::{ProgressSink, SheetReport, SheetStatus};

pub struct SheetProgress {
    bar: ProgressBar,
    verbose: bool,
}

impl SheetProgress {
    pub fn new(verbose: bool) -> Self {
        Self {
            bar: ProgressBar::hidden(),
            verbose,
        }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressSink for SheetProgress {
    fn started(&mut self, total_sheets: usize) {
        let style = ProgressStyle::with_template("  {bar:30.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        self.bar = ProgressBar::new(total_sheets as u64);
        self.bar.set_style(style);
    }

    fn sheet_done(&mut self, report: &SheetReport) {
        self.bar.set_message(report.sheet.clone());
        self.bar.inc(1);

        if self.verbose {
            let line = match &report.status {
                SheetStatus::Transformed { header, stats } => format!(
                    "  - {}: 見出し {} / 一致 {} (完全 {}, 類似 {}, 前方 {}) / 未解決 {} / スキップ {}",
                    report.sheet,
                    header.cell_reference(),
                    stats.resolved(),
                    stats.exact,
                    stats.fuzzy,
                    stats.prefix,
                    stats.unresolved,
                    stats.skipped
                ),
                SheetStatus::Skipped => format!("  - {}: 見出しなし（出力しません）", report.sheet),
            };
            self.bar.println(line);
        }
    }
}
