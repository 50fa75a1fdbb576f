use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use itemcode_core::{locate_header, process_workbook, PipelineOptions, StylingFidelity};
use itemcode_matcher::{auth, cli, config, export, progress, reader};
use cli::{Cli, Commands};
use config::Config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    let config = Config::load().context("設定ファイルを読み込めません")?;

    match cli.command {
        Commands::Match { catalog, cost_sheet, output, scope, styling, threshold, report, user } => {
            println!("🔎 itemcode - アイテムコード照合\n");

            auth::login_gate(config.auth.as_ref(), user.as_deref())?;

            let options = PipelineOptions {
                scope: scope.unwrap_or(config.sheet_scope),
                styling: styling.unwrap_or(config.styling_fidelity),
                fuzzy_threshold: threshold.unwrap_or(config.fuzzy_threshold),
                highlight: config.highlight()?,
            };
            log::debug!("実行設定: {:?}", options);

            // 1. マスタ読み込み
            println!("[1/4] アイテムマスタを読み込み中...");
            let entries = reader::read_catalog(&catalog)
                .with_context(|| format!("マスタを読み込めません: {}", catalog.display()))?;
            println!("✔ {}件のマスタ行\n", entries.len());

            // 2. コストシート読み込み
            println!(
                "[2/4] コストシートを読み込み中...{}",
                if options.styling == StylingFidelity::PreserveAll { " (スタイル再現)" } else { "" }
            );
            let workbook = reader::read_workbook(&cost_sheet, options.styling)
                .with_context(|| format!("コストシートを読み込めません: {}", cost_sheet.display()))?;
            println!("✔ {}シート\n", workbook.sheets.len());

            // 3. 照合
            println!("[3/4] 照合中... (対象: {}, 閾値: {})", options.scope, options.fuzzy_threshold);
            let mut sink = progress::SheetProgress::new(cli.verbose);
            let result = process_workbook(&workbook, &entries, &options, &mut sink);
            sink.finish();
            let processed = result?;

            let totals = processed.report.totals();
            println!(
                "✔ {}シートを処理 (索引 {}件, 重複キー {}件)",
                processed.report.transformed_count(),
                processed.report.index_size,
                processed.report.duplicate_keys
            );
            println!(
                "  一致 {} (完全 {}, 類似 {}, 前方 {}) / 未解決 {} / スキップ {}\n",
                totals.resolved(),
                totals.exact,
                totals.fuzzy,
                totals.prefix,
                totals.unresolved,
                totals.skipped
            );

            if totals.unresolved > 0 {
                println!("⚠ 未解決 {}件は結果列を塗りつぶしています。手動で確認してください\n", totals.unresolved);
            }

            // 4. 保存
            println!("[4/4] 結果を保存中...");
            let output_path =
                export::output_path_for(&output.unwrap_or_else(|| std::path::PathBuf::from(".")));
            export::save_workbook(&processed.workbook, &output_path)?;
            println!("✔ 出力: {}", output_path.display());

            if let Some(report_path) = report {
                let file = export::ReportFile::new(
                    &processed.report,
                    &catalog,
                    &cost_sheet,
                    &output_path,
                    options.fuzzy_threshold,
                );
                export::write_report(&file, &report_path)?;
                println!("✔ レポート: {}", report_path.display());
            }

            println!("\n✅ 照合完了");
        }

        Commands::Locate { cost_sheet } => {
            let workbook = reader::read_workbook(&cost_sheet, StylingFidelity::ValuesOnly)
                .with_context(|| format!("コストシートを読み込めません: {}", cost_sheet.display()))?;

            println!("見出し位置:");
            for sheet in &workbook.sheets {
                match locate_header(sheet) {
                    Some(pos) => println!(
                        "  {}: {} (行 {}, 列 {})",
                        sheet.name,
                        pos.cell_reference(),
                        pos.header_row + 1,
                        pos.model_column + 1
                    ),
                    None => println!("  {}: 見つかりません", sheet.name),
                }
            }
        }

        Commands::Config {
            show,
            set_threshold,
            set_styling,
            set_scope,
            set_highlight,
            set_credentials,
            clear_credentials,
        } => {
            let mut config = config;
            let mut changed = false;

            if let Some(threshold) = set_threshold {
                config.fuzzy_threshold = threshold;
                changed = true;
            }
            if let Some(styling) = set_styling {
                config.styling_fidelity = styling;
                changed = true;
            }
            if let Some(scope) = set_scope {
                config.sheet_scope = scope;
                changed = true;
            }
            if let Some(color) = set_highlight {
                config.highlight_color = color.trim_start_matches('#').to_uppercase();
                changed = true;
            }

            if changed {
                config.save()?;
                println!("✔ 設定を保存しました");
            }

            if let Some(username) = set_credentials {
                let auth = auth::prompt_new_credentials(&username)?;
                config.set_auth(Some(auth))?;
                println!("✔ ログイン情報を設定しました: {}", username);
            }

            if clear_credentials {
                config.set_auth(None)?;
                println!("✔ ログイン情報を削除しました");
            }

            if show {
                println!("設定 ({}):", Config::config_path()?.display());
                println!("  類似一致の閾値: {}", config.fuzzy_threshold);
                println!("  スタイル再現: {}", config.styling_fidelity);
                println!("  対象シート: {}", config.sheet_scope);
                println!("  塗りつぶし色: {}", config.highlight_color);
                println!(
                    "  ログイン: {}",
                    config.auth.as_ref().map_or("未設定".to_string(), |a| format!("{} (設定済み)", a.username))
                );
            }
        }
    }

    Ok(())
}
