//! シート変換
//!
//! 見出し行から最終行までを新しいグリッドに写し、型番列の左に
//! 「Item Code」列を挿入して各行の照合結果を書き込む。
//! 未解決の行は挿入列のセルを塗りつぶして目視確認を促す。

use crate::catalog::CatalogIndex;
use crate::grid::{Cell, CellStyle, CellValue, Rgb, SheetGrid};
use crate::locator::{locate_header, HeaderPosition};
use crate::matcher::{match_label, MatchOutcome, MatchTier, DEFAULT_FUZZY_THRESHOLD};
use serde::{Deserialize, Serialize};

/// 挿入列の見出し
pub const RESULT_COLUMN_HEADER: &str = "Item Code";

/// スタイルの再現度
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StylingFidelity {
    /// フォント・罫線・塗り・表示形式・配置をセルごとに複製
    #[default]
    #[serde(rename = "preserve")]
    PreserveAll,
    /// 値のみ（大きなシート向け）
    #[serde(rename = "values")]
    ValuesOnly,
}

impl std::str::FromStr for StylingFidelity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "preserve" | "all" | "styles" => Ok(StylingFidelity::PreserveAll),
            "values" | "values-only" | "fast" => Ok(StylingFidelity::ValuesOnly),
            _ => Err(format!("Unknown styling: {}. Use preserve or values", s)),
        }
    }
}

impl std::fmt::Display for StylingFidelity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StylingFidelity::PreserveAll => write!(f, "preserve"),
            StylingFidelity::ValuesOnly => write!(f, "values"),
        }
    }
}

/// シート変換オプション
#[derive(Debug, Clone)]
pub struct TransformOptions {
    pub styling: StylingFidelity,
    pub fuzzy_threshold: u8,
    /// 未解決セルの塗りつぶし色
    pub highlight: Rgb,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            styling: StylingFidelity::PreserveAll,
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            highlight: Rgb::YELLOW,
        }
    }
}

/// シートごとの照合件数
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SheetStats {
    pub exact: usize,
    pub fuzzy: usize,
    pub prefix: usize,
    pub unresolved: usize,
    pub skipped: usize,
}

impl SheetStats {
    pub fn record(&mut self, outcome: &MatchOutcome) {
        match outcome {
            MatchOutcome::Resolved { tier: MatchTier::Exact, .. } => self.exact += 1,
            MatchOutcome::Resolved { tier: MatchTier::Fuzzy { .. }, .. } => self.fuzzy += 1,
            MatchOutcome::Resolved { tier: MatchTier::Prefix, .. } => self.prefix += 1,
            MatchOutcome::Unresolved => self.unresolved += 1,
            MatchOutcome::Skipped(_) => self.skipped += 1,
        }
    }

    pub fn resolved(&self) -> usize {
        self.exact + self.fuzzy + self.prefix
    }
}

/// 変換済みシート
#[derive(Debug, Clone)]
pub struct TransformedSheet {
    pub grid: SheetGrid,
    pub header: HeaderPosition,
    pub stats: SheetStats,
}

/// シートを変換する（見出しが見つからなければ `None`）
pub fn transform_sheet(
    sheet: &SheetGrid,
    index: &CatalogIndex,
    options: &TransformOptions,
) -> Option<TransformedSheet> {
    let header = locate_header(sheet)?;
    let model_col = header.model_column;

    let mut grid = rebuild_from_header(sheet, header.header_row, options.styling);

    // 型番列の位置に結果列を挿入（型番列は1つ右へ）
    grid.insert_column(model_col);
    let header_cell = grid.cell_mut(0, model_col);
    header_cell.value = CellValue::Text(RESULT_COLUMN_HEADER.to_string());
    if options.styling == StylingFidelity::PreserveAll {
        if let Some(reference) = sheet.get(header.header_row, model_col).cloned() {
            grid.cell_mut(0, model_col).clone_style_from(&reference);
        }
    }

    let mut stats = SheetStats::default();
    for row in 1..grid.height() {
        let outcome = match grid.get(row, model_col + 1) {
            Some(cell) => match_label(&cell.value, index, options.fuzzy_threshold),
            None => match_label(&CellValue::Empty, index, options.fuzzy_threshold),
        };
        log::debug!("{}!{}: {:?}", sheet.name, row + header.header_row + 1, outcome);
        stats.record(&outcome);

        match outcome {
            MatchOutcome::Resolved { code, .. } => {
                grid.cell_mut(row, model_col).value = CellValue::Text(code);
            }
            MatchOutcome::Unresolved => {
                grid.set(row, model_col, Cell {
                    value: CellValue::Empty,
                    style: Some(CellStyle::highlight(options.highlight)),
                });
            }
            MatchOutcome::Skipped(_) => {}
        }
    }

    Some(TransformedSheet { grid, header, stats })
}

/// 見出し行以降を写す（各行を元シートの列数まで埋める）
fn rebuild_from_header(sheet: &SheetGrid, header_row: usize, styling: StylingFidelity) -> SheetGrid {
    let width = sheet.width();
    let mut grid = SheetGrid::new(sheet.name.clone());

    for cells in sheet.rows().skip(header_row) {
        let row = (0..width)
            .map(|col| match (cells.get(col), styling) {
                (Some(cell), StylingFidelity::PreserveAll) => cell.clone(),
                (Some(cell), StylingFidelity::ValuesOnly) => cell.value_only(),
                (None, _) => Cell::default(),
            })
            .collect();
        grid.push_row(row);
    }

    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogEntry;
    use crate::grid::FontStyle;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn widget_index() -> CatalogIndex {
        CatalogIndex::build(&[CatalogEntry::new("Widget-200 (blue)", "IC001")])
    }

    /// 見出しが3行目・2列目（1始まり）のシート
    fn cost_sheet(model: &str) -> SheetGrid {
        SheetGrid::from_values(
            "Costs",
            vec![
                vec![text("ACME cost sheet")],
                vec![],
                vec![text("No."), text("Model No."), text("Price")],
                vec![CellValue::Number(1.0), text(model), CellValue::Number(9.5)],
            ],
        )
    }

    #[test]
    fn test_transform_resolves_row() {
        let out = transform_sheet(&cost_sheet("widget200"), &widget_index(), &TransformOptions::default())
            .unwrap();

        assert_eq!(out.header, HeaderPosition { header_row: 2, model_column: 1 });
        let grid = &out.grid;
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.get(0, 1).unwrap().value, text(RESULT_COLUMN_HEADER));
        assert_eq!(grid.get(0, 2).unwrap().value, text("Model No."));
        assert_eq!(grid.get(1, 1).unwrap().value, text("IC001"));
        assert_eq!(grid.get(1, 2).unwrap().value, text("widget200"));
        assert_eq!(grid.get(1, 3).unwrap().value, CellValue::Number(9.5));
        assert_eq!(out.stats.exact, 1);
    }

    #[test]
    fn test_transform_highlights_unresolved() {
        let options = TransformOptions::default();
        let out = transform_sheet(&cost_sheet("Widget-199"), &widget_index(), &options).unwrap();

        let cell = out.grid.get(1, 1).unwrap();
        assert!(cell.value.is_empty());
        assert_eq!(cell.style, Some(CellStyle::highlight(Rgb::YELLOW)));
        assert_eq!(out.stats.unresolved, 1);
        assert_eq!(out.stats.resolved(), 0);
    }

    #[test]
    fn test_transform_skipped_row_untouched() {
        let out = transform_sheet(&cost_sheet("12345"), &widget_index(), &TransformOptions::default())
            .unwrap();

        assert!(out.grid.get(1, 1).unwrap().is_blank());
        assert_eq!(out.stats.skipped, 1);
        assert_eq!(out.stats.unresolved, 0);
    }

    #[test]
    fn test_transform_not_found() {
        let sheet = SheetGrid::from_values("S", vec![vec![text("Part"), text("Qty")]]);
        assert!(transform_sheet(&sheet, &widget_index(), &TransformOptions::default()).is_none());
    }

    #[test]
    fn test_column_insertion_invariant() {
        // 見出しより上に幅の広い行がある
        let sheet = SheetGrid::from_values(
            "Wide",
            vec![
                vec![text("a"), text("b"), text("c"), text("d"), text("e")],
                vec![text("Model No"), text("Desc")],
                vec![text("widget200")],
            ],
        );
        let out = transform_sheet(&sheet, &widget_index(), &TransformOptions::default()).unwrap();

        assert_eq!(out.grid.width(), sheet.width() + 1);
        assert_eq!(out.header.model_column, 0);
        assert_eq!(out.grid.get(0, 1).unwrap().value, text("Model No"));
        assert_eq!(out.grid.get(1, 0).unwrap().value, text("IC001"));
    }

    #[test]
    fn test_header_style_cloned_when_preserving() {
        let mut sheet = cost_sheet("widget200");
        let bold = CellStyle {
            font: Some(FontStyle { bold: true, ..Default::default() }),
            ..Default::default()
        };
        sheet.cell_mut(2, 1).style = Some(bold.clone());

        let out = transform_sheet(&sheet, &widget_index(), &TransformOptions::default()).unwrap();
        assert_eq!(out.grid.get(0, 1).unwrap().style, Some(bold.clone()));
        assert_eq!(out.grid.get(0, 2).unwrap().style, Some(bold));
    }

    #[test]
    fn test_values_only_drops_styles() {
        let mut sheet = cost_sheet("Widget-199");
        sheet.cell_mut(2, 1).style = Some(CellStyle::highlight(Rgb(0x00FF00)));
        let options = TransformOptions {
            styling: StylingFidelity::ValuesOnly,
            highlight: Rgb(0xFF0000),
            ..Default::default()
        };

        let out = transform_sheet(&sheet, &widget_index(), &options).unwrap();
        assert!(out.grid.get(0, 1).unwrap().style.is_none());
        assert!(out.grid.get(0, 2).unwrap().style.is_none());
        // 未解決マーカーは値のみモードでも付く
        assert_eq!(out.grid.get(1, 1).unwrap().style, Some(CellStyle::highlight(Rgb(0xFF0000))));
    }

    #[test]
    fn test_styling_fidelity_from_str() {
        assert_eq!("preserve".parse::<StylingFidelity>(), Ok(StylingFidelity::PreserveAll));
        assert_eq!("VALUES".parse::<StylingFidelity>(), Ok(StylingFidelity::ValuesOnly));
        assert!("bogus".parse::<StylingFidelity>().is_err());
    }
}
