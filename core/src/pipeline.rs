//! ブック単位の処理
//!
//! マスタ索引を1回だけ構築し、対象シートを元の順序で変換する。
//! 見出しのないシートは「全シート」モードでは出力から除外し、
//! 「先頭シートのみ」モードではエラーにする。

use crate::catalog::{CatalogEntry, CatalogIndex};
use crate::error::{Error, Result};
use crate::grid::{Rgb, WorkbookData};
use crate::locator::HeaderPosition;
use crate::matcher::DEFAULT_FUZZY_THRESHOLD;
use crate::transform::{transform_sheet, SheetStats, StylingFidelity, TransformOptions};
use serde::{Deserialize, Serialize};

/// 処理対象シートの範囲
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SheetScope {
    #[default]
    #[serde(rename = "all")]
    AllSheets,
    #[serde(rename = "first")]
    FirstSheetOnly,
}

impl std::str::FromStr for SheetScope {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" | "all-sheets" => Ok(SheetScope::AllSheets),
            "first" | "first-sheet" | "first-sheet-only" => Ok(SheetScope::FirstSheetOnly),
            _ => Err(format!("Unknown scope: {}. Use all or first", s)),
        }
    }
}

impl std::fmt::Display for SheetScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetScope::AllSheets => write!(f, "all"),
            SheetScope::FirstSheetOnly => write!(f, "first"),
        }
    }
}

/// パイプライン設定
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub scope: SheetScope,
    pub styling: StylingFidelity,
    pub fuzzy_threshold: u8,
    pub highlight: Rgb,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            scope: SheetScope::AllSheets,
            styling: StylingFidelity::PreserveAll,
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            highlight: Rgb::YELLOW,
        }
    }
}

impl PipelineOptions {
    fn transform_options(&self) -> TransformOptions {
        TransformOptions {
            styling: self.styling,
            fuzzy_threshold: self.fuzzy_threshold,
            highlight: self.highlight,
        }
    }
}

/// シート処理の進捗通知先
pub trait ProgressSink {
    /// 処理開始（対象シート数）
    fn started(&mut self, _total_sheets: usize) {}

    /// 1シート完了ごとに呼ばれる
    fn sheet_done(&mut self, report: &SheetReport);
}

/// 何もしない進捗通知
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn sheet_done(&mut self, _report: &SheetReport) {}
}

/// シートの処理状態
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum SheetStatus {
    Transformed {
        header: HeaderPosition,
        stats: SheetStats,
    },
    Skipped,
}

/// シートごとの結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetReport {
    pub sheet: String,
    pub status: SheetStatus,
}

/// 実行結果のまとめ
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub catalog_entries: usize,
    pub index_size: usize,
    pub duplicate_keys: usize,
    pub sheets: Vec<SheetReport>,
}

impl RunReport {
    /// 全シート合計
    pub fn totals(&self) -> SheetStats {
        let mut totals = SheetStats::default();
        for report in &self.sheets {
            if let SheetStatus::Transformed { stats, .. } = &report.status {
                totals.exact += stats.exact;
                totals.fuzzy += stats.fuzzy;
                totals.prefix += stats.prefix;
                totals.unresolved += stats.unresolved;
                totals.skipped += stats.skipped;
            }
        }
        totals
    }

    pub fn transformed_count(&self) -> usize {
        self.sheets
            .iter()
            .filter(|r| matches!(r.status, SheetStatus::Transformed { .. }))
            .count()
    }
}

/// 処理結果
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub workbook: WorkbookData,
    pub report: RunReport,
}

/// ブックを処理する
///
/// # Arguments
/// * `input` - コストシートのブック
/// * `catalog` - マスタ行（行順が重複キーの優先順）
/// * `options` - パイプライン設定
/// * `progress` - シート完了ごとの通知先
pub fn process_workbook(
    input: &WorkbookData,
    catalog: &[CatalogEntry],
    options: &PipelineOptions,
    progress: &mut dyn ProgressSink,
) -> Result<ProcessOutput> {
    if options.fuzzy_threshold > 100 {
        return Err(Error::InvalidThreshold(options.fuzzy_threshold));
    }
    if input.sheets.is_empty() {
        return Err(Error::EmptyWorkbook);
    }

    let index = CatalogIndex::build(catalog);
    if index.is_empty() {
        log::warn!("アイテムマスタに照合可能な行がありません");
    }

    let targets = match options.scope {
        SheetScope::AllSheets => &input.sheets[..],
        SheetScope::FirstSheetOnly => &input.sheets[..1],
    };
    progress.started(targets.len());

    let transform_options = options.transform_options();
    let mut output = WorkbookData::default();
    let mut report = RunReport {
        catalog_entries: catalog.len(),
        index_size: index.len(),
        duplicate_keys: index.duplicate_count(),
        sheets: Vec::with_capacity(targets.len()),
    };

    for sheet in targets {
        let sheet_report = match transform_sheet(sheet, &index, &transform_options) {
            Some(transformed) => {
                output.sheets.push(transformed.grid);
                SheetReport {
                    sheet: sheet.name.clone(),
                    status: SheetStatus::Transformed {
                        header: transformed.header,
                        stats: transformed.stats,
                    },
                }
            }
            None if options.scope == SheetScope::FirstSheetOnly => {
                return Err(Error::HeaderNotFound { sheet: sheet.name.clone() });
            }
            None => {
                log::info!("シート「{}」は見出しがないためスキップ", sheet.name);
                SheetReport {
                    sheet: sheet.name.clone(),
                    status: SheetStatus::Skipped,
                }
            }
        };

        progress.sheet_done(&sheet_report);
        report.sheets.push(sheet_report);
    }

    if output.sheets.is_empty() {
        return Err(Error::NoSheetsProcessed);
    }

    Ok(ProcessOutput { workbook: output, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{CellValue, SheetGrid};

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn catalog() -> Vec<CatalogEntry> {
        vec![CatalogEntry::new("Widget-200 (blue)", "IC001")]
    }

    fn located(name: &str) -> SheetGrid {
        SheetGrid::from_values(
            name,
            vec![vec![text("Model No")], vec![text("widget200")]],
        )
    }

    fn unlocatable(name: &str) -> SheetGrid {
        SheetGrid::from_values(name, vec![vec![text("Part")], vec![text("widget200")]])
    }

    #[derive(Default)]
    struct Recorder {
        total: usize,
        done: Vec<String>,
    }

    impl ProgressSink for Recorder {
        fn started(&mut self, total_sheets: usize) {
            self.total = total_sheets;
        }

        fn sheet_done(&mut self, report: &SheetReport) {
            self.done.push(report.sheet.clone());
        }
    }

    #[test]
    fn test_all_sheets_omits_unlocatable() {
        let input = WorkbookData::new(vec![located("A"), unlocatable("B"), located("C")]);
        let mut recorder = Recorder::default();

        let out = process_workbook(&input, &catalog(), &PipelineOptions::default(), &mut recorder)
            .unwrap();

        assert_eq!(out.workbook.sheet_names(), vec!["A", "C"]);
        assert_eq!(out.report.sheets.len(), 3);
        assert_eq!(out.report.sheets[1].status, SheetStatus::Skipped);
        assert_eq!(out.report.transformed_count(), 2);
        assert_eq!(out.report.totals().exact, 2);
        assert_eq!(recorder.total, 3);
        assert_eq!(recorder.done, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_first_sheet_only_processes_one() {
        let input = WorkbookData::new(vec![located("A"), located("B")]);
        let options = PipelineOptions { scope: SheetScope::FirstSheetOnly, ..Default::default() };

        let out = process_workbook(&input, &catalog(), &options, &mut NoProgress).unwrap();
        assert_eq!(out.workbook.sheet_names(), vec!["A"]);
    }

    #[test]
    fn test_first_sheet_only_unlocatable_is_fatal() {
        let input = WorkbookData::new(vec![unlocatable("Front"), located("B")]);
        let options = PipelineOptions { scope: SheetScope::FirstSheetOnly, ..Default::default() };

        let err = process_workbook(&input, &catalog(), &options, &mut NoProgress).unwrap_err();
        assert!(matches!(err, Error::HeaderNotFound { ref sheet } if sheet == "Front"));
    }

    #[test]
    fn test_no_sheets_processed() {
        let input = WorkbookData::new(vec![unlocatable("A")]);
        let err = process_workbook(&input, &catalog(), &PipelineOptions::default(), &mut NoProgress)
            .unwrap_err();
        assert!(matches!(err, Error::NoSheetsProcessed));
    }

    #[test]
    fn test_empty_workbook() {
        let err = process_workbook(
            &WorkbookData::default(),
            &catalog(),
            &PipelineOptions::default(),
            &mut NoProgress,
        )
        .unwrap_err();
        assert!(matches!(err, Error::EmptyWorkbook));
    }

    #[test]
    fn test_invalid_threshold() {
        let input = WorkbookData::new(vec![located("A")]);
        let options = PipelineOptions { fuzzy_threshold: 101, ..Default::default() };
        let err = process_workbook(&input, &catalog(), &options, &mut NoProgress).unwrap_err();
        assert!(matches!(err, Error::InvalidThreshold(101)));
    }

    #[test]
    fn test_report_counts_duplicates() {
        let input = WorkbookData::new(vec![located("A")]);
        let catalog = vec![
            CatalogEntry::new("Widget-200", "IC001"),
            CatalogEntry::new("widget 200", "IC999"),
        ];
        let out = process_workbook(&input, &catalog, &PipelineOptions::default(), &mut NoProgress)
            .unwrap();

        assert_eq!(out.report.catalog_entries, 2);
        assert_eq!(out.report.index_size, 1);
        assert_eq!(out.report.duplicate_keys, 1);
        assert_eq!(
            out.workbook.sheets[0].get(1, 0).unwrap().value,
            text("IC001")
        );
    }

    #[test]
    fn test_scope_from_str() {
        assert_eq!("first".parse::<SheetScope>(), Ok(SheetScope::FirstSheetOnly));
        assert_eq!("ALL".parse::<SheetScope>(), Ok(SheetScope::AllSheets));
        assert!("some".parse::<SheetScope>().is_err());
    }
}
