//! 見出し行・型番列の検出

use crate::grid::SheetGrid;
use serde::Serialize;

/// 見出しセルの判定に使うキーワード（小文字で比較）
pub const HEADER_KEYWORD: &str = "model no";

/// 見出しを探す先頭行数
pub const HEADER_SCAN_ROWS: usize = 40;

/// 見出し位置（0始まり）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeaderPosition {
    pub header_row: usize,
    pub model_column: usize,
}

impl HeaderPosition {
    /// `C3` 形式のセル参照
    pub fn cell_reference(&self) -> String {
        format!("{}{}", column_letter(self.model_column), self.header_row + 1)
    }
}

/// 先頭40行を行優先で走査し、"model no" を含む最初のテキストセルを返す
pub fn locate_header(grid: &SheetGrid) -> Option<HeaderPosition> {
    grid.rows()
        .take(HEADER_SCAN_ROWS)
        .enumerate()
        .find_map(|(row_idx, cells)| {
            cells.iter().position(is_header_cell).map(|col_idx| HeaderPosition {
                header_row: row_idx,
                model_column: col_idx,
            })
        })
}

fn is_header_cell(cell: &crate::grid::Cell) -> bool {
    cell.value
        .as_text()
        .map(|text| text.to_lowercase().contains(HEADER_KEYWORD))
        .unwrap_or(false)
}

/// 0始まりの列番号を列名（A, B, ..., AA）に変換
pub fn column_letter(col: usize) -> String {
    let mut name = String::new();
    let mut n = col + 1;

    while n > 0 {
        let remainder = (n - 1) % 26;
        name.insert(0, (b'A' + remainder as u8) as char);
        n = (n - 1) / 26;
    }

    name
}
