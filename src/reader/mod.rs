//! 入力ファイルの読み込み
//!
//! コストシート（全シート）とアイテムマスタを calamine で読み込む。
//! スタイル再現モードでは xlsx パッケージからセルスタイルも読む。

mod catalog;
mod styles;

pub use catalog::{catalog_from_rows, read_catalog};
pub use styles::{parse_a1, StyleBook};

use crate::error::{MatcherError, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};
use itemcode_core::{Cell, CellValue, SheetGrid, StylingFidelity, WorkbookData};
use std::path::Path;

/// ブックを読み込む（全シート、元の順序）
pub fn read_workbook(path: &Path, styling: StylingFidelity) -> Result<WorkbookData> {
    if !path.exists() {
        return Err(MatcherError::FileNotFound(path.display().to_string()));
    }

    let mut workbook = open_workbook_auto(path)?;
    let names = workbook.sheet_names();

    let mut style_book = match styling {
        StylingFidelity::PreserveAll if is_xlsx(path) => match StyleBook::open(path) {
            Ok(book) => Some(book),
            Err(e) => {
                log::warn!("スタイルを読み込めないため値のみコピーします: {}", e);
                None
            }
        },
        _ => None,
    };

    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let range = workbook.worksheet_range(&name)?;
        let mut grid = grid_from_range(&name, &range);

        if let Some(book) = style_book.as_mut() {
            if let Err(e) = book.apply(&name, &mut grid) {
                log::warn!("シート「{}」のスタイル読み込みに失敗: {}", name, e);
            }
        }

        log::debug!("シート「{}」: {}行 × {}列", name, grid.height(), grid.width());
        sheets.push(grid);
    }

    Ok(WorkbookData::new(sheets))
}

/// calamine の Range を A1 起点の絶対座標グリッドに変換
pub fn grid_from_range(name: &str, range: &Range<Data>) -> SheetGrid {
    let mut grid = SheetGrid::new(name);
    let Some((row0, col0)) = range.start() else {
        return grid;
    };

    for (r, cells) in range.rows().enumerate() {
        for (c, data) in cells.iter().enumerate() {
            let value = cell_value(data);
            if !value.is_empty() {
                grid.set(row0 as usize + r, col0 as usize + c, Cell::new(value));
            }
        }
    }

    grid
}

/// calamine のセル値を変換
pub fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::DateTime(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

fn is_xlsx(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e.to_lowercase().as_str(), "xlsx" | "xlsm"))
        .unwrap_or(false)
}
