//! 型番 → アイテムコードの照合
//!
//! ## 照合順序
//! 1. 完全一致（正規化キーが索引に存在）
//! 2. あいまい一致（トークン集合類似度が閾値以上の最高スコア）
//! 3. 前方一致（正規化キーが索引キーで始まる最初のエントリ）
//!
//! 空欄・非テキスト・数字のみの型番は照合せずスキップする。

use crate::catalog::CatalogIndex;
use crate::grid::CellValue;
use crate::normalizer::{is_numeric_only, normalize};
use crate::similarity::{token_set_ratio_sets, TokenSet};
use serde::Serialize;

/// あいまい一致の既定閾値
pub const DEFAULT_FUZZY_THRESHOLD: u8 = 90;

/// 一致した段階
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchTier {
    Exact,
    Fuzzy { score: u8 },
    Prefix,
}

/// スキップ理由
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    /// 空欄・空白のみ
    Blank,
    /// テキスト以外（数値セルなど）
    NotText,
    /// 正規化後に空
    EmptyKey,
    /// 数字のみ
    NumericOnly,
}

/// 照合結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MatchOutcome {
    Resolved { code: String, tier: MatchTier },
    Unresolved,
    Skipped(SkipReason),
}

/// セル値を照合する
pub fn match_label(raw: &CellValue, index: &CatalogIndex, threshold: u8) -> MatchOutcome {
    let label = match raw {
        CellValue::Text(text) => text,
        CellValue::Empty => return MatchOutcome::Skipped(SkipReason::Blank),
        _ => return MatchOutcome::Skipped(SkipReason::NotText),
    };

    if label.trim().is_empty() {
        return MatchOutcome::Skipped(SkipReason::Blank);
    }

    let key = normalize(label);
    if key.is_empty() {
        return MatchOutcome::Skipped(SkipReason::EmptyKey);
    }
    if is_numeric_only(&key) {
        return MatchOutcome::Skipped(SkipReason::NumericOnly);
    }

    match_key(&key, index, threshold)
}

/// 正規化済みキーを照合する（3段階）
pub fn match_key(key: &str, index: &CatalogIndex, threshold: u8) -> MatchOutcome {
    // 1. 完全一致
    if let Some(entry) = index.get(key) {
        return MatchOutcome::Resolved {
            code: entry.code.clone(),
            tier: MatchTier::Exact,
        };
    }

    // 2. あいまい一致
    if let Some((code, score)) = best_fuzzy(key, index) {
        if score >= threshold {
            return MatchOutcome::Resolved {
                code: code.to_string(),
                tier: MatchTier::Fuzzy { score },
            };
        }
    }

    // 3. 前方一致
    if let Some(entry) = index.iter().find(|e| key.starts_with(e.key.as_str())) {
        return MatchOutcome::Resolved {
            code: entry.code.clone(),
            tier: MatchTier::Prefix,
        };
    }

    MatchOutcome::Unresolved
}

/// 最高スコアのエントリ（同点は索引順で先のもの、スコア0は候補なし）
fn best_fuzzy<'a>(key: &str, index: &'a CatalogIndex) -> Option<(&'a str, u8)> {
    let tokens = TokenSet::new(key);
    let mut best: Option<(&str, u8)> = None;

    for entry in index.iter() {
        let score = token_set_ratio_sets(&tokens, &entry.tokens);
        if score > best.map_or(0, |(_, s)| s) {
            best = Some((entry.code.as_str(), score));
            if score == 100 {
                break;
            }
        }
    }

    best
}
