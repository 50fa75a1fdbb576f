//! Excel生成（共通ライブラリ）
//!
//! [`WorkbookData`] を rust_xlsxwriter のブックに変換する。
//! セルのスタイル属性は個別の `Format` に写す。

use crate::error::Result;
use crate::grid::{
    AlignmentStyle, BorderLine, Cell, CellStyle, CellValue, HorizontalAlign, Rgb, SheetGrid,
    VerticalAlign, WorkbookData,
};
use rust_xlsxwriter::*;

/// ブックを構築する
pub fn build_workbook(data: &WorkbookData) -> Result<Workbook> {
    let mut workbook = Workbook::new();

    for sheet in &data.sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;
        write_sheet(worksheet, sheet)?;
    }

    Ok(workbook)
}

/// Excelをバッファに生成
pub fn generate_excel_buffer(data: &WorkbookData) -> Result<Vec<u8>> {
    let mut workbook = build_workbook(data)?;
    Ok(workbook.save_to_buffer()?)
}

fn write_sheet(worksheet: &mut Worksheet, sheet: &SheetGrid) -> Result<()> {
    for (row_idx, cells) in sheet.rows().enumerate() {
        let row = u32::try_from(row_idx).map_err(|_| XlsxError::RowColumnLimitError)?;

        for (col_idx, cell) in cells.iter().enumerate() {
            if cell.is_blank() {
                continue;
            }
            let col = u16::try_from(col_idx).map_err(|_| XlsxError::RowColumnLimitError)?;
            write_cell(worksheet, row, col, cell)?;
        }
    }

    Ok(())
}

fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, cell: &Cell) -> Result<()> {
    let format = cell.style.as_ref().map(to_format);

    match (&cell.value, format) {
        (CellValue::Text(s), Some(f)) => worksheet.write_string_with_format(row, col, s, &f)?,
        (CellValue::Text(s), None) => worksheet.write_string(row, col, s)?,
        (CellValue::Number(n), Some(f)) => worksheet.write_number_with_format(row, col, *n, &f)?,
        (CellValue::Number(n), None) => worksheet.write_number(row, col, *n)?,
        (CellValue::DateTime(n), f) => {
            let f = f.unwrap_or_else(Format::new);
            let f = if cell.style.as_ref().and_then(|s| s.number_format.as_ref()).is_some() {
                f
            } else {
                f.set_num_format(default_date_format(*n))
            };
            worksheet.write_number_with_format(row, col, *n, &f)?
        }
        (CellValue::Bool(b), Some(f)) => worksheet.write_boolean_with_format(row, col, *b, &f)?,
        (CellValue::Bool(b), None) => worksheet.write_boolean(row, col, *b)?,
        (CellValue::Empty, Some(f)) => worksheet.write_blank(row, col, &f)?,
        (CellValue::Empty, None) => return Ok(()),
    };

    Ok(())
}

/// セルスタイル → Format
pub fn to_format(style: &CellStyle) -> Format {
    let mut format = Format::new();

    if let Some(font) = &style.font {
        if let Some(name) = &font.name {
            format = format.set_font_name(name);
        }
        if let Some(size) = font.size {
            format = format.set_font_size(size);
        }
        if font.bold {
            format = format.set_bold();
        }
        if font.italic {
            format = format.set_italic();
        }
        if font.underline {
            format = format.set_underline(FormatUnderline::Single);
        }
        if let Some(color) = font.color {
            format = format.set_font_color(color_of(color));
        }
    }

    if let Some(fill) = &style.fill {
        format = format
            .set_pattern(FormatPattern::Solid)
            .set_background_color(color_of(fill.color));
    }

    if let Some(border) = &style.border {
        if let Some(edge) = border.left {
            format = format.set_border_left(border_of(edge.line));
            if let Some(color) = edge.color {
                format = format.set_border_left_color(color_of(color));
            }
        }
        if let Some(edge) = border.right {
            format = format.set_border_right(border_of(edge.line));
            if let Some(color) = edge.color {
                format = format.set_border_right_color(color_of(color));
            }
        }
        if let Some(edge) = border.top {
            format = format.set_border_top(border_of(edge.line));
            if let Some(color) = edge.color {
                format = format.set_border_top_color(color_of(color));
            }
        }
        if let Some(edge) = border.bottom {
            format = format.set_border_bottom(border_of(edge.line));
            if let Some(color) = edge.color {
                format = format.set_border_bottom_color(color_of(color));
            }
        }
    }

    if let Some(num_format) = &style.number_format {
        if num_format != "General" {
            format = format.set_num_format(num_format);
        }
    }

    if let Some(alignment) = &style.alignment {
        format = apply_alignment(format, alignment);
    }

    format
}

fn apply_alignment(mut format: Format, alignment: &AlignmentStyle) -> Format {
    if let Some(horizontal) = alignment.horizontal {
        format = format.set_align(match horizontal {
            HorizontalAlign::Left => FormatAlign::Left,
            HorizontalAlign::Center => FormatAlign::Center,
            HorizontalAlign::Right => FormatAlign::Right,
            HorizontalAlign::Fill => FormatAlign::Fill,
            HorizontalAlign::Justify => FormatAlign::Justify,
            HorizontalAlign::CenterAcross => FormatAlign::CenterAcross,
            HorizontalAlign::Distributed => FormatAlign::Distributed,
        });
    }
    if let Some(vertical) = alignment.vertical {
        format = format.set_align(match vertical {
            VerticalAlign::Top => FormatAlign::Top,
            VerticalAlign::Center => FormatAlign::VerticalCenter,
            VerticalAlign::Bottom => FormatAlign::Bottom,
            VerticalAlign::Justify => FormatAlign::VerticalJustify,
            VerticalAlign::Distributed => FormatAlign::VerticalDistributed,
        });
    }
    if alignment.wrap_text {
        format = format.set_text_wrap();
    }
    format
}

/// 表示形式のない日付セルの既定形式
fn default_date_format(serial: f64) -> &'static str {
    if serial.fract() == 0.0 {
        "yyyy-mm-dd"
    } else {
        "yyyy-mm-dd hh:mm:ss"
    }
}

fn color_of(rgb: Rgb) -> Color {
    Color::RGB(rgb.0)
}

fn border_of(line: BorderLine) -> FormatBorder {
    match line {
        BorderLine::Thin => FormatBorder::Thin,
        BorderLine::Medium => FormatBorder::Medium,
        BorderLine::Thick => FormatBorder::Thick,
        BorderLine::Dashed => FormatBorder::Dashed,
        BorderLine::Dotted => FormatBorder::Dotted,
        BorderLine::Double => FormatBorder::Double,
        BorderLine::Hair => FormatBorder::Hair,
        BorderLine::MediumDashed => FormatBorder::MediumDashed,
        BorderLine::DashDot => FormatBorder::DashDot,
        BorderLine::MediumDashDot => FormatBorder::MediumDashDot,
        BorderLine::DashDotDot => FormatBorder::DashDotDot,
        BorderLine::MediumDashDotDot => FormatBorder::MediumDashDotDot,
        BorderLine::SlantDashDot => FormatBorder::SlantDashDot,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{BorderEdge, BorderStyle, FontStyle};

    #[test]
    fn test_generate_excel_buffer() {
        let mut sheet = SheetGrid::new("Costs");
        sheet.set(0, 0, Cell::new("Item Code"));
        sheet.set(0, 1, Cell::new("Model No."));
        sheet.set(1, 0, Cell::styled(CellValue::Empty, CellStyle::highlight(Rgb::YELLOW)));
        sheet.set(1, 1, Cell::new("widget199"));
        sheet.set(1, 2, Cell::new(12.5));
        sheet.set(1, 3, Cell::new(CellValue::Bool(true)));
        sheet.set(1, 4, Cell::new(CellValue::DateTime(45000.5)));

        let buffer = generate_excel_buffer(&WorkbookData::new(vec![sheet])).unwrap();
        // ZIPシグネチャ
        assert_eq!(&buffer[..2], b"PK");
    }

    #[test]
    fn test_default_date_format() {
        assert_eq!(default_date_format(45000.0), "yyyy-mm-dd");
        assert_eq!(default_date_format(45000.25), "yyyy-mm-dd hh:mm:ss");
    }

    #[test]
    fn test_sheet_order_preserved() {
        let data = WorkbookData::new(vec![SheetGrid::new("B"), SheetGrid::new("A")]);
        let mut workbook = build_workbook(&data).unwrap();
        assert_eq!(workbook.worksheet_from_index(0).unwrap().name(), "B");
        assert_eq!(workbook.worksheet_from_index(1).unwrap().name(), "A");
    }

    #[test]
    fn test_invalid_sheet_name_is_error() {
        let data = WorkbookData::new(vec![SheetGrid::new("bad[name]")]);
        assert!(build_workbook(&data).is_err());
    }

    #[test]
    fn test_to_format_full_style() {
        let style = CellStyle {
            font: Some(FontStyle {
                name: Some("Arial".to_string()),
                size: Some(12.0),
                bold: true,
                color: Some(Rgb(0x1F4E79)),
                ..Default::default()
            }),
            border: Some(BorderStyle {
                bottom: Some(BorderEdge { line: BorderLine::Double, color: None }),
                ..Default::default()
            }),
            number_format: Some("0.00".to_string()),
            alignment: Some(AlignmentStyle {
                horizontal: Some(HorizontalAlign::Center),
                vertical: None,
                wrap_text: true,
            }),
            ..Default::default()
        };

        let expected = Format::new()
            .set_font_name("Arial")
            .set_font_size(12.0)
            .set_bold()
            .set_font_color(Color::RGB(0x1F4E79))
            .set_border_bottom(FormatBorder::Double)
            .set_num_format("0.00")
            .set_align(FormatAlign::Center)
            .set_text_wrap();
        assert_eq!(to_format(&style), expected);
    }
}
