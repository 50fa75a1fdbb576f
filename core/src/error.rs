//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("シート「{sheet}」の先頭40行に \"Model No\" 見出しが見つかりません")]
    HeaderNotFound { sheet: String },

    #[error("ブックにシートがありません")]
    EmptyWorkbook,

    #[error("処理できたシートがありません（どのシートにも \"Model No\" 見出しがありません）")]
    NoSheetsProcessed,

    #[error("あいまい一致の閾値は0〜100で指定してください: {0}")]
    InvalidThreshold(u8),

    #[cfg(feature = "excel")]
    #[error("Excel error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
