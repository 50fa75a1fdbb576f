//! 照合済みブックの保存（rust_xlsxwriter）

use crate::error::Result;
use itemcode_core::export::build_workbook;
use itemcode_core::WorkbookData;
use std::path::Path;

pub fn save_workbook(data: &WorkbookData, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut workbook = build_workbook(data)?;
    workbook.save(output_path)?;

    log::info!("ブックを保存: {} ({}シート)", output_path.display(), data.sheets.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{open_workbook_auto, Reader};
    use itemcode_core::{CellValue, SheetGrid};

    #[test]
    fn test_save_workbook_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.xlsx");
        let data = WorkbookData::new(vec![SheetGrid::from_values(
            "Costs",
            vec![vec![CellValue::Text("Item Code".into()), CellValue::Text("Model No".into())]],
        )]);

        save_workbook(&data, &path).unwrap();

        let mut workbook = open_workbook_auto(&path).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["Costs".to_string()]);
        let range = workbook.worksheet_range("Costs").unwrap();
        assert_eq!(
            range.get_value((0, 0)),
            Some(&calamine::Data::String("Item Code".into()))
        );
    }
}
