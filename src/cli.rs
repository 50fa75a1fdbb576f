use clap::{Parser, Subcommand};
use itemcode_core::{SheetScope, StylingFidelity};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "itemcode")]
#[command(about = "コストシートの型番をアイテムマスタと照合してアイテムコード列を追加", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// マスタと照合してアイテムコード列付きのブックを出力
    Match {
        /// アイテムマスタ（xlsx/xls/ods/csv、列: Display Name / Name）
        #[arg(required = true)]
        catalog: PathBuf,

        /// コストシート（xlsx）
        #[arg(required = true)]
        cost_sheet: PathBuf,

        /// 出力ファイル/ディレクトリ（デフォルト: CostSheet_ItemCode_Matched.xlsx）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 対象シート (all/first)。省略時は設定値
        #[arg(long)]
        scope: Option<SheetScope>,

        /// スタイル再現 (preserve/values)。省略時は設定値
        #[arg(long)]
        styling: Option<StylingFidelity>,

        /// 類似一致の閾値（0-100）。省略時は設定値
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        threshold: Option<u8>,

        /// 実行レポート（JSON）の出力先
        #[arg(long)]
        report: Option<PathBuf>,

        /// ログインユーザー名（省略時は設定のユーザー）
        #[arg(short, long)]
        user: Option<String>,
    },

    /// 各シートの見出し位置を表示（出力なし）
    Locate {
        /// コストシート
        #[arg(required = true)]
        cost_sheet: PathBuf,
    },

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 類似一致の閾値を設定
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        set_threshold: Option<u8>,

        /// スタイル再現を設定 (preserve/values)
        #[arg(long)]
        set_styling: Option<StylingFidelity>,

        /// 対象シートを設定 (all/first)
        #[arg(long)]
        set_scope: Option<SheetScope>,

        /// 未解決セルの塗りつぶし色を設定（例: FFFF00）
        #[arg(long)]
        set_highlight: Option<String>,

        /// ログイン情報を設定（パスワードは対話入力）
        #[arg(long, value_name = "USER")]
        set_credentials: Option<String>,

        /// ログイン情報を削除
        #[arg(long, conflicts_with = "set_credentials")]
        clear_credentials: bool,
    },
}
