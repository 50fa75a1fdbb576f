//! 出力（照合済みブックと実行レポート）

pub mod excel;
pub mod report;

pub use excel::save_workbook;
pub use report::{write_report, ReportFile};

use std::path::{Path, PathBuf};

/// 出力ファイル名の既定値
pub const DEFAULT_OUTPUT_NAME: &str = "CostSheet_ItemCode_Matched";

/// ディレクトリまたは拡張子なしの指定には既定ファイル名を付ける
pub fn output_path_for(output: &Path) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.xlsx", DEFAULT_OUTPUT_NAME))
    } else {
        output.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_for_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            output_path_for(dir.path()),
            dir.path().join("CostSheet_ItemCode_Matched.xlsx")
        );
    }

    #[test]
    fn test_output_path_for_file() {
        assert_eq!(output_path_for(Path::new("out/result.xlsx")), PathBuf::from("out/result.xlsx"));
        assert_eq!(
            output_path_for(Path::new("out")),
            PathBuf::from("out/CostSheet_ItemCode_Matched.xlsx")
        );
    }
}
