//! アイテムマスタの読み込み（xlsx/xls/ods または CSV）

use crate::error::{MatcherError, Result};
use calamine::{open_workbook_auto, Reader};
use itemcode_core::{CatalogEntry, CellValue};
use std::path::Path;

use super::cell_value;

/// 表示名の列見出し
pub const DISPLAY_NAME_HEADER: &str = "Display Name";
/// アイテムコードの列見出し
pub const CODE_HEADER: &str = "Name";

/// マスタファイルを読み込む
pub fn read_catalog(path: &Path) -> Result<Vec<CatalogEntry>> {
    if !path.exists() {
        return Err(MatcherError::FileNotFound(path.display().to_string()));
    }

    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    let rows = if is_csv {
        read_csv_rows(path)?
    } else {
        read_sheet_rows(path)?
    };

    let entries = catalog_from_rows(&rows)?;
    log::info!("アイテムマスタ読み込み: {}件 ({})", entries.len(), path.display());
    Ok(entries)
}

fn read_sheet_rows(path: &Path) -> Result<Vec<Vec<CellValue>>> {
    let mut workbook = open_workbook_auto(path)?;
    let first = workbook
        .sheet_names()
        .into_iter()
        .next()
        .ok_or_else(|| MatcherError::InvalidCatalog("シートがありません".into()))?;
    let range = workbook.worksheet_range(&first)?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_value).collect())
        .collect())
}

fn read_csv_rows(path: &Path) -> Result<Vec<Vec<CellValue>>> {
    let content = std::fs::read_to_string(path)?;
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| {
            MatcherError::InvalidCatalog(format!("CSVを解析できません: {}", e))
        })?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        rows.push(
            record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }

    Ok(rows)
}

/// 先頭行を見出しとしてマスタ行を組み立てる
pub fn catalog_from_rows(rows: &[Vec<CellValue>]) -> Result<Vec<CatalogEntry>> {
    let header = rows
        .first()
        .ok_or_else(|| MatcherError::InvalidCatalog("見出し行がありません".into()))?;

    let name_col = find_column(header, DISPLAY_NAME_HEADER)?;
    let code_col = find_column(header, CODE_HEADER)?;

    let mut entries = Vec::with_capacity(rows.len().saturating_sub(1));
    for (i, row) in rows.iter().enumerate().skip(1) {
        let code = row.get(code_col).map(code_text).unwrap_or_default();
        if code.is_empty() {
            log::warn!("マスタ{}行目: コードが空のため除外", i + 1);
            continue;
        }

        let display_name = match row.get(name_col) {
            Some(CellValue::Text(s)) => Some(s.clone()),
            _ => None,
        };
        entries.push(CatalogEntry { display_name, code });
    }

    Ok(entries)
}

fn find_column(header: &[CellValue], label: &str) -> Result<usize> {
    header
        .iter()
        .position(|cell| cell.as_text().map(str::trim) == Some(label))
        .ok_or_else(|| MatcherError::InvalidCatalog(format!("列「{}」が見つかりません", label)))
}

/// コードセルを文字列化（整数値の数値は小数点なし）
fn code_text(value: &CellValue) -> String {
    match value {
        CellValue::Text(s) => s.trim().to_string(),
        CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
        CellValue::Number(n) => n.to_string(),
        CellValue::Bool(b) => b.to_string(),
        CellValue::DateTime(_) | CellValue::Empty => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_catalog_from_rows() {
        let rows = vec![
            vec![text("Name"), text(" Display Name ")],
            vec![text("IC001"), text("Widget-200 (blue)")],
            vec![CellValue::Number(1002.0), text("Gadget X")],
            vec![text("IC003"), CellValue::Number(42.0)],
        ];

        let entries = catalog_from_rows(&rows).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], CatalogEntry::new("Widget-200 (blue)", "IC001"));
        assert_eq!(entries[1].code, "1002");
        // テキストでない表示名はそのまま渡し、索引側で除外される
        assert_eq!(entries[2].display_name, None);
    }

    #[test]
    fn test_empty_code_rows_dropped() {
        let rows = vec![
            vec![text("Display Name"), text("Name")],
            vec![text("Widget"), CellValue::Empty],
            vec![text("Gadget")],
            vec![text("Gizmo"), text("IC9")],
        ];
        let entries = catalog_from_rows(&rows).unwrap();
        assert_eq!(entries, vec![CatalogEntry::new("Gizmo", "IC9")]);
    }

    #[test]
    fn test_missing_columns() {
        let rows = vec![vec![text("Display Name"), text("Code")]];
        assert!(matches!(catalog_from_rows(&rows), Err(MatcherError::InvalidCatalog(_))));
        assert!(matches!(catalog_from_rows(&[]), Err(MatcherError::InvalidCatalog(_))));
    }

    #[test]
    fn test_read_catalog_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.csv");
        std::fs::write(
            &path,
            "\u{feff}Display Name,Name\n\"Widget-200 (blue)\",IC001\n\nGadget X,IC002\n",
        )
        .unwrap();

        let entries = read_catalog(&path).unwrap();
        assert_eq!(
            entries,
            vec![
                CatalogEntry::new("Widget-200 (blue)", "IC001"),
                CatalogEntry::new("Gadget X", "IC002"),
            ]
        );
    }

    #[test]
    fn test_read_catalog_csv_quoted_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.csv");
        std::fs::write(
            &path,
            "Display Name,Name\n\"Widget\n200\",IC001\n\"Gadget, \"\"X\"\"\",IC002\nGizmo\n",
        )
        .unwrap();

        let entries = read_catalog(&path).unwrap();
        assert_eq!(
            entries,
            vec![
                CatalogEntry::new("Widget\n200", "IC001"),
                CatalogEntry::new("Gadget, \"X\"", "IC002"),
            ]
        );
    }

    #[test]
    fn test_read_catalog_missing_file() {
        let err = read_catalog(Path::new("/nonexistent/items.csv")).unwrap_err();
        assert!(matches!(err, MatcherError::FileNotFound(_)));
    }
}
