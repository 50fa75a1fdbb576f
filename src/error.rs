use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatcherError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("ブック読み込みエラー: {0}")]
    WorkbookRead(String),

    #[error("アイテムマスタが不正: {0}")]
    InvalidCatalog(String),

    #[error("ログインに失敗しました: ユーザー名またはパスワードが違います")]
    Authentication,

    #[error("パスワードが入力されていません。環境変数 ITEMCODE_PASSWORD を設定するか対話入力してください")]
    MissingCredentials,

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] itemcode_core::Error),
}

impl From<calamine::Error> for MatcherError {
    fn from(e: calamine::Error) -> Self {
        MatcherError::WorkbookRead(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for MatcherError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        MatcherError::ExcelGeneration(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MatcherError>;
