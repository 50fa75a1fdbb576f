//! シートのグリッドモデル
//!
//! セルは型付きの値と任意のスタイル属性を持つ。スタイルのコピーは
//! 常に明示的な clone で行い、セル間でオブジェクトを共有しない。

use serde::{Deserialize, Serialize};

/// セルの値
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    /// Excelのシリアル日付
    DateTime(f64),
    Bool(bool),
}

impl CellValue {
    /// テキストセルなら文字列を返す
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

/// RGBカラー（0xRRGGBB）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u32);

impl Rgb {
    /// 蛍光ペンの黄色
    pub const YELLOW: Rgb = Rgb(0xFFFF00);

    /// `FFFF00` / `#FFFF00` / `FFFFFF00`（ARGB）形式を解釈
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let rgb = match hex.len() {
            6 => hex,
            8 => &hex[2..],
            _ => return None,
        };
        u32::from_str_radix(rgb, 16).ok().map(Rgb)
    }

    pub fn to_hex(self) -> String {
        format!("{:06X}", self.0)
    }
}

/// 罫線の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BorderLine {
    Thin,
    Medium,
    Thick,
    Dashed,
    Dotted,
    Double,
    Hair,
    MediumDashed,
    DashDot,
    MediumDashDot,
    DashDotDot,
    MediumDashDotDot,
    SlantDashDot,
}

impl BorderLine {
    /// OOXML の `style` 属性値から変換
    pub fn from_ooxml(style: &str) -> Option<Self> {
        match style {
            "thin" => Some(BorderLine::Thin),
            "medium" => Some(BorderLine::Medium),
            "thick" => Some(BorderLine::Thick),
            "dashed" => Some(BorderLine::Dashed),
            "dotted" => Some(BorderLine::Dotted),
            "double" => Some(BorderLine::Double),
            "hair" => Some(BorderLine::Hair),
            "mediumDashed" => Some(BorderLine::MediumDashed),
            "dashDot" => Some(BorderLine::DashDot),
            "mediumDashDot" => Some(BorderLine::MediumDashDot),
            "dashDotDot" => Some(BorderLine::DashDotDot),
            "mediumDashDotDot" => Some(BorderLine::MediumDashDotDot),
            "slantDashDot" => Some(BorderLine::SlantDashDot),
            _ => None,
        }
    }
}

/// 罫線1辺
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorderEdge {
    pub line: BorderLine,
    pub color: Option<Rgb>,
}

/// セル罫線
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorderStyle {
    pub left: Option<BorderEdge>,
    pub right: Option<BorderEdge>,
    pub top: Option<BorderEdge>,
    pub bottom: Option<BorderEdge>,
}

impl BorderStyle {
    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_none() && self.top.is_none() && self.bottom.is_none()
    }
}

/// フォント
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FontStyle {
    pub name: Option<String>,
    pub size: Option<f64>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub color: Option<Rgb>,
}

/// 塗りつぶし（単色のみ）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillStyle {
    pub color: Rgb,
}

impl FillStyle {
    pub fn solid(color: Rgb) -> Self {
        Self { color }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
    Fill,
    Justify,
    CenterAcross,
    Distributed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerticalAlign {
    Top,
    Center,
    Bottom,
    Justify,
    Distributed,
}

/// 配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentStyle {
    pub horizontal: Option<HorizontalAlign>,
    pub vertical: Option<VerticalAlign>,
    pub wrap_text: bool,
}

/// セルのスタイル属性一式
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellStyle {
    pub font: Option<FontStyle>,
    pub fill: Option<FillStyle>,
    pub border: Option<BorderStyle>,
    pub number_format: Option<String>,
    pub alignment: Option<AlignmentStyle>,
}

impl CellStyle {
    /// 指定色の単色塗りつぶしのみを持つスタイル
    pub fn highlight(color: Rgb) -> Self {
        Self {
            fill: Some(FillStyle::solid(color)),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.font.is_none()
            && self.fill.is_none()
            && self.border.is_none()
            && self.number_format.is_none()
            && self.alignment.is_none()
    }
}

/// セル
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub value: CellValue,
    pub style: Option<CellStyle>,
}

impl Cell {
    pub fn new(value: impl Into<CellValue>) -> Self {
        Self { value: value.into(), style: None }
    }

    pub fn styled(value: impl Into<CellValue>, style: CellStyle) -> Self {
        Self { value: value.into(), style: Some(style) }
    }

    /// 値のみのコピー（スタイルを落とす）
    pub fn value_only(&self) -> Self {
        Self { value: self.value.clone(), style: None }
    }

    /// 他セルのスタイルを複製して適用
    pub fn clone_style_from(&mut self, other: &Cell) {
        self.style = other.style.clone();
    }

    /// 値もスタイルもないセル
    pub fn is_blank(&self) -> bool {
        self.value.is_empty() && self.style.as_ref().map_or(true, CellStyle::is_empty)
    }
}

/// 1シート分のグリッド（行ごとの可変長配列、0始まり）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetGrid {
    pub name: String,
    rows: Vec<Vec<Cell>>,
}

impl SheetGrid {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), rows: Vec::new() }
    }

    /// 値の二次元配列から作成（テスト・小規模データ用）
    pub fn from_values(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(Cell::new).collect())
            .collect();
        Self { name: name.into(), rows }
    }

    /// 行数
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// 列数（最長行の長さ）
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }

    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// セルへの可変参照（範囲外なら空セルで拡張）
    pub fn cell_mut(&mut self, row: usize, col: usize) -> &mut Cell {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if cells.len() <= col {
            cells.resize_with(col + 1, Cell::default);
        }
        &mut cells[col]
    }

    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        *self.cell_mut(row, col) = cell;
    }

    /// 行を末尾に追加
    pub fn push_row(&mut self, cells: Vec<Cell>) {
        self.rows.push(cells);
    }

    /// `col` の位置に空列を挿入し、以降の列を1つ右へずらす
    ///
    /// `col` に届かない短い行は変更しない（その位置は暗黙に空セル）。
    pub fn insert_column(&mut self, col: usize) {
        for cells in &mut self.rows {
            if cells.len() > col {
                cells.insert(col, Cell::default());
            }
        }
    }
}

/// ブック（シートの順序付き列）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkbookData {
    pub sheets: Vec<SheetGrid>,
}

impl WorkbookData {
    pub fn new(sheets: Vec<SheetGrid>) -> Self {
        Self { sheets }
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn sheet(&self, name: &str) -> Option<&SheetGrid> {
        self.sheets.iter().find(|s| s.name == name)
    }
}
