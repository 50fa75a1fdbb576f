//! xlsx パッケージからのセルスタイル読み込み
//!
//! calamine は値しか返さないため、`xl/styles.xml` の cellXfs と
//! 各シートXMLの `s` 属性を直接読んでセルにスタイルを付ける。
//! テーマ色・インデックス色は解決しない（明示RGBのみ）。

use crate::error::{MatcherError, Result};
use itemcode_core::grid::{
    AlignmentStyle, BorderEdge, BorderLine, BorderStyle, CellStyle, FillStyle, FontStyle,
    HorizontalAlign, Rgb, VerticalAlign,
};
use itemcode_core::SheetGrid;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader as XmlReader;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

/// ブック全体のスタイル表
pub struct StyleBook {
    zip: ZipArchive<File>,
    /// シート名 → パッケージ内パス
    sheet_paths: HashMap<String, String>,
    /// cellXfs のインデックス順
    xf_styles: Vec<CellStyle>,
}

impl StyleBook {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let mut zip = ZipArchive::new(file).map_err(zip_error)?;

        let workbook_xml = read_entry(&mut zip, "xl/workbook.xml")?
            .ok_or_else(|| MatcherError::WorkbookRead("xl/workbook.xml がありません".into()))?;
        let rels_xml = read_entry(&mut zip, "xl/_rels/workbook.xml.rels")?.unwrap_or_default();
        let sheet_paths = resolve_sheet_paths(&workbook_xml, &rels_xml)?;

        let xf_styles = match read_entry(&mut zip, "xl/styles.xml")? {
            Some(xml) => parse_styles(&xml)?,
            None => Vec::new(),
        };

        Ok(Self { zip, sheet_paths, xf_styles })
    }

    /// スタイルID 0 以外のセルにスタイルを付ける
    pub fn apply(&mut self, sheet_name: &str, grid: &mut SheetGrid) -> Result<()> {
        if self.xf_styles.is_empty() {
            return Ok(());
        }
        let Some(path) = self.sheet_paths.get(sheet_name).cloned() else {
            return Ok(());
        };
        let Some(xml) = read_entry(&mut self.zip, &path)? else {
            return Ok(());
        };

        for (row, col, style_id) in parse_cell_style_ids(&xml)? {
            match self.xf_styles.get(style_id) {
                Some(style) if !style.is_empty() => {
                    grid.cell_mut(row, col).style = Some(style.clone());
                }
                _ => {}
            }
        }

        Ok(())
    }
}

fn zip_error(e: zip::result::ZipError) -> MatcherError {
    MatcherError::WorkbookRead(format!("xlsxを展開できません: {}", e))
}

fn xml_error(e: quick_xml::Error) -> MatcherError {
    MatcherError::WorkbookRead(format!("XML解析エラー: {}", e))
}

fn read_entry(zip: &mut ZipArchive<File>, name: &str) -> Result<Option<String>> {
    let mut entry = match zip.by_name(name) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(zip_error(e)),
    };
    let mut content = String::new();
    entry.read_to_string(&mut content)?;
    Ok(Some(content))
}

fn attr_value(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// 名前空間接頭辞を無視して属性を探す（`r:id` など）
fn attr_local(e: &BytesStart, local: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == local)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// workbook.xml と rels からシート名 → シートXMLのパスを求める
fn resolve_sheet_paths(workbook_xml: &str, rels_xml: &str) -> Result<HashMap<String, String>> {
    let mut targets: HashMap<String, String> = HashMap::new();
    let mut reader = XmlReader::from_str(rels_xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"Relationship" {
                    if let (Some(id), Some(target)) = (attr_value(&e, b"Id"), attr_value(&e, b"Target")) {
                        targets.insert(id, target);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(e)),
            _ => {}
        }
        buf.clear();
    }

    let mut paths = HashMap::new();
    let mut reader = XmlReader::from_str(workbook_xml);
    reader.config_mut().trim_text(true);
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"sheet" {
                    let name = attr_value(&e, b"name");
                    let target = attr_local(&e, b"id").and_then(|id| targets.get(&id).cloned());
                    if let (Some(name), Some(target)) = (name, target) {
                        paths.insert(name, package_path(&target));
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(paths)
}

/// rels の Target をパッケージ内パスに変換
fn package_path(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{}", target),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Other,
    NumFmts,
    Fonts,
    Fills,
    Borders,
    CellXfs,
}

#[derive(Debug, Clone, Copy)]
enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

#[derive(Debug, Default)]
struct XfRecord {
    num_fmt_id: u32,
    font_id: usize,
    fill_id: usize,
    border_id: usize,
    alignment: Option<AlignmentStyle>,
}

#[derive(Debug, Default)]
struct StylesParser {
    section: Option<Section>,
    num_fmts: HashMap<u32, String>,
    fonts: Vec<FontStyle>,
    fills: Vec<Option<FillStyle>>,
    fill_solid: bool,
    borders: Vec<BorderStyle>,
    edge: Option<Edge>,
    xfs: Vec<XfRecord>,
}

impl StylesParser {
    fn open(&mut self, e: &BytesStart, is_empty: bool) {
        let name = e.local_name();
        let name = name.as_ref();

        let section = match name {
            b"numFmts" => Some(Section::NumFmts),
            b"fonts" => Some(Section::Fonts),
            b"fills" => Some(Section::Fills),
            b"borders" => Some(Section::Borders),
            b"cellXfs" => Some(Section::CellXfs),
            b"cellStyleXfs" | b"cellStyles" | b"dxfs" | b"tableStyles" | b"colors" => {
                Some(Section::Other)
            }
            _ => None,
        };
        if let Some(section) = section {
            if !is_empty {
                self.section = Some(section);
            }
            return;
        }

        match (self.section, name) {
            (Some(Section::NumFmts), b"numFmt") => {
                let id = attr_value(e, b"numFmtId").and_then(|v| v.parse().ok());
                if let (Some(id), Some(code)) = (id, attr_value(e, b"formatCode")) {
                    self.num_fmts.insert(id, code);
                }
            }
            (Some(Section::Fonts), b"font") => self.fonts.push(FontStyle::default()),
            (Some(Section::Fonts), _) => {
                if let Some(font) = self.fonts.last_mut() {
                    apply_font_property(font, name, e);
                }
            }
            (Some(Section::Fills), b"fill") => {
                self.fills.push(None);
                self.fill_solid = false;
            }
            (Some(Section::Fills), b"patternFill") => {
                self.fill_solid = attr_value(e, b"patternType").as_deref() == Some("solid");
            }
            (Some(Section::Fills), b"fgColor") if self.fill_solid => {
                if let (Some(fill), Some(color)) = (self.fills.last_mut(), rgb_attr(e)) {
                    *fill = Some(FillStyle::solid(color));
                }
            }
            (Some(Section::Borders), b"border") => {
                self.borders.push(BorderStyle::default());
                self.edge = None;
            }
            (Some(Section::Borders), b"left" | b"start") => self.open_edge(Edge::Left, e, is_empty),
            (Some(Section::Borders), b"right" | b"end") => self.open_edge(Edge::Right, e, is_empty),
            (Some(Section::Borders), b"top") => self.open_edge(Edge::Top, e, is_empty),
            (Some(Section::Borders), b"bottom") => self.open_edge(Edge::Bottom, e, is_empty),
            (Some(Section::Borders), b"color") => {
                if let (Some(edge), Some(color)) = (self.edge, rgb_attr(e)) {
                    if let Some(slot) = self.borders.last_mut().and_then(|b| edge_slot(b, edge).as_mut()) {
                        slot.color = Some(color);
                    }
                }
            }
            (Some(Section::CellXfs), b"xf") => {
                let id = |key: &[u8]| -> usize {
                    attr_value(e, key).and_then(|v| v.parse().ok()).unwrap_or(0)
                };
                self.xfs.push(XfRecord {
                    num_fmt_id: id(b"numFmtId") as u32,
                    font_id: id(b"fontId"),
                    fill_id: id(b"fillId"),
                    border_id: id(b"borderId"),
                    alignment: None,
                });
            }
            (Some(Section::CellXfs), b"alignment") => {
                if let Some(xf) = self.xfs.last_mut() {
                    xf.alignment = parse_alignment(e);
                }
            }
            _ => {}
        }
    }

    fn open_edge(&mut self, edge: Edge, e: &BytesStart, is_empty: bool) {
        let line = attr_value(e, b"style").and_then(|s| BorderLine::from_ooxml(&s));
        if let (Some(line), Some(border)) = (line, self.borders.last_mut()) {
            *edge_slot(border, edge) = Some(BorderEdge { line, color: None });
        }
        if !is_empty {
            self.edge = Some(edge);
        }
    }

    fn close(&mut self, name: &[u8]) {
        match name {
            b"numFmts" | b"fonts" | b"fills" | b"borders" | b"cellXfs" | b"cellStyleXfs"
            | b"cellStyles" | b"dxfs" | b"tableStyles" | b"colors" => self.section = None,
            b"left" | b"right" | b"top" | b"bottom" | b"start" | b"end" => self.edge = None,
            _ => {}
        }
    }

    /// xf ごとのスタイルを組み立てる
    fn finish(self) -> Vec<CellStyle> {
        self.xfs
            .iter()
            .map(|xf| CellStyle {
                font: if xf.font_id == 0 {
                    None
                } else {
                    self.fonts.get(xf.font_id).cloned()
                },
                fill: self.fills.get(xf.fill_id).copied().flatten(),
                border: self.borders.get(xf.border_id).filter(|b| !b.is_empty()).cloned(),
                number_format: number_format(xf.num_fmt_id, &self.num_fmts),
                alignment: xf.alignment.clone(),
            })
            .collect()
    }
}

fn edge_slot(border: &mut BorderStyle, edge: Edge) -> &mut Option<BorderEdge> {
    match edge {
        Edge::Left => &mut border.left,
        Edge::Right => &mut border.right,
        Edge::Top => &mut border.top,
        Edge::Bottom => &mut border.bottom,
    }
}

fn apply_font_property(font: &mut FontStyle, name: &[u8], e: &BytesStart) {
    let flag = || attr_value(e, b"val").map_or(true, |v| v != "0" && v != "false");
    match name {
        b"b" => font.bold = flag(),
        b"i" => font.italic = flag(),
        b"u" => font.underline = attr_value(e, b"val").map_or(true, |v| v != "none"),
        b"sz" => font.size = attr_value(e, b"val").and_then(|v| v.parse().ok()),
        b"name" => font.name = attr_value(e, b"val"),
        b"color" => font.color = rgb_attr(e),
        _ => {}
    }
}

fn rgb_attr(e: &BytesStart) -> Option<Rgb> {
    attr_value(e, b"rgb").and_then(|v| Rgb::from_hex(&v))
}

fn parse_alignment(e: &BytesStart) -> Option<AlignmentStyle> {
    let horizontal = attr_value(e, b"horizontal").and_then(|v| match v.as_str() {
        "left" => Some(HorizontalAlign::Left),
        "center" => Some(HorizontalAlign::Center),
        "right" => Some(HorizontalAlign::Right),
        "fill" => Some(HorizontalAlign::Fill),
        "justify" => Some(HorizontalAlign::Justify),
        "centerContinuous" => Some(HorizontalAlign::CenterAcross),
        "distributed" => Some(HorizontalAlign::Distributed),
        _ => None,
    });
    let vertical = attr_value(e, b"vertical").and_then(|v| match v.as_str() {
        "top" => Some(VerticalAlign::Top),
        "center" => Some(VerticalAlign::Center),
        "bottom" => Some(VerticalAlign::Bottom),
        "justify" => Some(VerticalAlign::Justify),
        "distributed" => Some(VerticalAlign::Distributed),
        _ => None,
    });
    let wrap_text = attr_value(e, b"wrapText").map_or(false, |v| v == "1" || v == "true");

    let alignment = AlignmentStyle { horizontal, vertical, wrap_text };
    (alignment != AlignmentStyle::default()).then_some(alignment)
}

/// 表示形式IDを書式文字列に（組み込み形式は主要なもののみ）
fn number_format(id: u32, custom: &HashMap<u32, String>) -> Option<String> {
    if let Some(code) = custom.get(&id) {
        return Some(code.clone());
    }
    let builtin = match id {
        1 => "0",
        2 => "0.00",
        3 => "#,##0",
        4 => "#,##0.00",
        9 => "0%",
        10 => "0.00%",
        11 => "0.00E+00",
        12 => "# ?/?",
        13 => "# ??/??",
        14 => "mm-dd-yy",
        15 => "d-mmm-yy",
        16 => "d-mmm",
        17 => "mmm-yy",
        18 => "h:mm AM/PM",
        19 => "h:mm:ss AM/PM",
        20 => "h:mm",
        21 => "h:mm:ss",
        22 => "m/d/yy h:mm",
        37 => "#,##0 ;(#,##0)",
        38 => "#,##0 ;[Red](#,##0)",
        39 => "#,##0.00;(#,##0.00)",
        40 => "#,##0.00;[Red](#,##0.00)",
        45 => "mm:ss",
        46 => "[h]:mm:ss",
        47 => "mmss.0",
        48 => "##0.0E+0",
        49 => "@",
        _ => return None,
    };
    Some(builtin.to_string())
}

/// styles.xml を解析し、cellXfs 順のスタイル一覧を返す
fn parse_styles(xml: &str) -> Result<Vec<CellStyle>> {
    let mut reader = XmlReader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut parser = StylesParser::default();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => parser.open(&e, false),
            Ok(Event::Empty(e)) => parser.open(&e, true),
            Ok(Event::End(e)) => parser.close(e.local_name().as_ref()),
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(parser.finish())
}

/// シートXMLから (行, 列, スタイルID) を集める（0始まり、ID 0 は除外）
///
/// `r` 属性のない行・セルは直前の位置の次として扱う。
fn parse_cell_style_ids(xml: &str) -> Result<Vec<(usize, usize, usize)>> {
    let mut reader = XmlReader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut out = Vec::new();
    let mut current_row: Option<usize> = None;
    let mut next_col = 0usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"row" => {
                    let explicit = attr_value(&e, b"r")
                        .and_then(|r| r.parse::<usize>().ok())
                        .filter(|&r| r > 0)
                        .map(|r| r - 1);
                    current_row = Some(explicit.unwrap_or_else(|| current_row.map_or(0, |r| r + 1)));
                    next_col = 0;
                }
                b"c" => {
                    let position = attr_value(&e, b"r")
                        .and_then(|r| parse_a1(&r))
                        .or_else(|| current_row.map(|row| (row, next_col)));
                    let style_id: usize = attr_value(&e, b"s")
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(0);

                    match position {
                        Some((row, col)) => {
                            next_col = col + 1;
                            if style_id != 0 {
                                out.push((row, col, style_id));
                            }
                        }
                        None => log::debug!("位置を特定できないセルのスタイルを無視: s={}", style_id),
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(out)
}

/// `B3` → (2, 1)（0始まりの行・列）
pub fn parse_a1(reference: &str) -> Option<(usize, usize)> {
    let split = reference.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = reference.split_at(split);
    if letters.is_empty() {
        return None;
    }

    let mut col = 0usize;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        col = col * 26 + (c.to_ascii_uppercase() as u8 - b'A' + 1) as usize;
    }

    let row: usize = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((row - 1, col - 1))
}
