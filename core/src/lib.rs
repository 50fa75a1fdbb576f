//! Item Code Matcher Core Library
//!
//! コストシートの型番とアイテムマスタを照合するエンジン。
//! ファイル入出力は持たず、CLI側から呼び出される。

pub mod error;
pub mod normalizer;
pub mod similarity;
pub mod catalog;
pub mod grid;
pub mod locator;
pub mod matcher;
pub mod transform;
pub mod pipeline;
#[cfg(feature = "excel")]
pub mod export;

pub use error::{Error, Result};
pub use normalizer::{normalize, is_numeric_only};
pub use similarity::token_set_ratio;
pub use catalog::{CatalogEntry, CatalogIndex};
pub use grid::{Cell, CellStyle, CellValue, Rgb, SheetGrid, WorkbookData};
pub use locator::{locate_header, HeaderPosition};
pub use matcher::{match_label, MatchOutcome, MatchTier, SkipReason, DEFAULT_FUZZY_THRESHOLD};
pub use transform::{transform_sheet, SheetStats, StylingFidelity, TransformOptions, TransformedSheet, RESULT_COLUMN_HEADER};
pub use pipeline::{
    process_workbook, NoProgress, PipelineOptions, ProcessOutput, ProgressSink, RunReport,
    SheetReport, SheetScope, SheetStatus,
};
