//! 実行レポート（JSON）

use crate::error::Result;
use chrono::{DateTime, Local};
use itemcode_core::{RunReport, SheetStats};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct ReportFile<'a> {
    pub generated_at: DateTime<Local>,
    pub catalog: String,
    pub cost_sheet: String,
    pub output: String,
    pub fuzzy_threshold: u8,
    pub totals: SheetStats,
    #[serde(flatten)]
    pub run: &'a RunReport,
}

impl<'a> ReportFile<'a> {
    pub fn new(run: &'a RunReport, catalog: &Path, cost_sheet: &Path, output: &Path, fuzzy_threshold: u8) -> Self {
        Self {
            generated_at: Local::now(),
            catalog: catalog.display().to_string(),
            cost_sheet: cost_sheet.display().to_string(),
            output: output.display().to_string(),
            fuzzy_threshold,
            totals: run.totals(),
            run,
        }
    }
}

pub fn write_report(report: &ReportFile<'_>, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use itemcode_core::{HeaderPosition, SheetReport, SheetStatus};

    #[test]
    fn test_write_report() {
        let run = RunReport {
            catalog_entries: 3,
            index_size: 2,
            duplicate_keys: 1,
            sheets: vec![
                SheetReport {
                    sheet: "Costs".into(),
                    status: SheetStatus::Transformed {
                        header: HeaderPosition { header_row: 2, model_column: 1 },
                        stats: SheetStats { exact: 2, fuzzy: 1, prefix: 0, unresolved: 1, skipped: 3 },
                    },
                },
                SheetReport { sheet: "Notes".into(), status: SheetStatus::Skipped },
            ],
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let report = ReportFile::new(&run, Path::new("items.xlsx"), Path::new("cost.xlsx"), Path::new("out.xlsx"), 90);
        write_report(&report, &path).unwrap();

        let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["index_size"], 2);
        assert_eq!(json["duplicate_keys"], 1);
        assert_eq!(json["totals"]["exact"], 2);
        assert_eq!(json["sheets"][0]["status"]["status"], "transformed");
        assert_eq!(json["sheets"][0]["status"]["header"]["model_column"], 1);
        assert_eq!(json["sheets"][1]["status"]["status"], "skipped");
        assert!(json["generated_at"].is_string());
    }
}
