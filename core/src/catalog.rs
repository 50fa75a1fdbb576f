//! アイテムマスタの索引
//!
//! 表示名を正規化したキーでエントリを引けるようにする。
//! 同じキーに正規化される表示名が複数ある場合は、先に現れた行を採用する。
//! 反復順はマスタの行順（重複を除いた初出順）。

use crate::normalizer::normalize;
use crate::similarity::TokenSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// マスタの1行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// 表示名（テキストでない行は `None`）
    pub display_name: Option<String>,
    /// アイテムコード
    pub code: String,
}

impl CatalogEntry {
    pub fn new(display_name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            display_name: Some(display_name.into()),
            code: code.into(),
        }
    }
}

/// 索引の1件（キーと事前計算済みトークン集合）
#[derive(Debug, Clone)]
pub struct IndexedEntry {
    pub key: String,
    pub display_name: String,
    pub code: String,
    pub(crate) tokens: TokenSet,
}

/// 正規化キー → エントリの索引
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    entries: Vec<IndexedEntry>,
    positions: HashMap<String, usize>,
    duplicates: usize,
}

impl CatalogIndex {
    /// マスタ行から索引を構築
    ///
    /// 表示名がテキストでない行・正規化後に空になる行は除外する。
    pub fn build(entries: &[CatalogEntry]) -> Self {
        let mut index = Self::default();

        for entry in entries {
            let Some(display_name) = entry.display_name.as_deref() else {
                continue;
            };

            let key = normalize(display_name);
            if key.is_empty() {
                log::debug!("空キーのため除外: {:?}", display_name);
                continue;
            }

            if let Some(&pos) = index.positions.get(&key) {
                index.duplicates += 1;
                log::debug!(
                    "重複キー「{}」: {:?} は {:?} を優先して除外",
                    key,
                    display_name,
                    index.entries[pos].display_name
                );
                continue;
            }

            index.positions.insert(key.clone(), index.entries.len());
            index.entries.push(IndexedEntry {
                tokens: TokenSet::new(&key),
                key,
                display_name: display_name.to_string(),
                code: entry.code.clone(),
            });
        }

        index
    }

    /// キーの完全一致で検索
    pub fn get(&self, key: &str) -> Option<&IndexedEntry> {
        self.positions.get(key).map(|&pos| &self.entries[pos])
    }

    /// 索引順に反復
    pub fn iter(&self) -> impl Iterator<Item = &IndexedEntry> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 先勝ちで除外された重複キーの件数
    pub fn duplicate_count(&self) -> usize {
        self.duplicates
    }
}
