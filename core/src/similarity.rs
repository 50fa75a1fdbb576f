//! トークン集合による類似度
//!
//! 語順・重複トークンの影響を受けない 0〜100 のスコアを返す。
//! マスタ側のトークン集合は [`TokenSet`] として事前計算しておける。

use regex::Regex;
use std::collections::BTreeSet;

/// 前処理済みのトークン集合（ソート・重複除去済み）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSet {
    tokens: BTreeSet<String>,
}

impl TokenSet {
    /// 文字列を前処理してトークン集合を作る
    ///
    /// 単語構成文字以外を空白に置き換え、小文字化してから空白で分割する。
    pub fn new(text: &str) -> Self {
        lazy_static::lazy_static! {
            static ref NON_WORD_RE: Regex = Regex::new(r"\W").unwrap();
        }

        let processed = NON_WORD_RE.replace_all(text, " ").to_lowercase();
        let tokens = processed.split_whitespace().map(str::to_string).collect();
        Self { tokens }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// 2つの文字列のトークン集合類似度（0〜100）
pub fn token_set_ratio(a: &str, b: &str) -> u8 {
    token_set_ratio_sets(&TokenSet::new(a), &TokenSet::new(b))
}

/// 前処理済みトークン集合同士の類似度（0〜100）
///
/// 共通部分と差分を連結した3通りの組み合わせを比較し、最大値を返す。
pub fn token_set_ratio_sets(a: &TokenSet, b: &TokenSet) -> u8 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let join = |set: Vec<&String>| -> String {
        set.into_iter().map(String::as_str).collect::<Vec<_>>().join(" ")
    };

    let sect = join(a.tokens.intersection(&b.tokens).collect());
    let diff_ab = join(a.tokens.difference(&b.tokens).collect());
    let diff_ba = join(b.tokens.difference(&a.tokens).collect());

    let combined_ab = format!("{} {}", sect, diff_ab).trim().to_string();
    let combined_ba = format!("{} {}", sect, diff_ba).trim().to_string();

    ratio(&sect, &combined_ab)
        .max(ratio(&sect, &combined_ba))
        .max(ratio(&combined_ab, &combined_ba))
}

/// 挿入・削除の編集距離に基づく類似度（0〜100、偶数丸め）
fn ratio(a: &str, b: &str) -> u8 {
    let a_len = a.chars().count();
    let b_len = b.chars().count();
    if a_len == 0 || b_len == 0 {
        return 0;
    }

    let total = (a_len + b_len) as f64;
    let distance = indel_distance(a, b) as f64;
    (100.0 * (total - distance) / total).round_ties_even() as u8
}

/// 挿入・削除のみの編集距離（= 長さの和 - 2 × 最長共通部分列）
fn indel_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let mut prev = vec![0usize; b_chars.len() + 1];
    let mut curr = vec![0usize; b_chars.len() + 1];

    for a_char in &a_chars {
        for (j, b_char) in b_chars.iter().enumerate() {
            curr[j + 1] = if a_char == b_char {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    let lcs = prev[b_chars.len()];
    a_chars.len() + b_chars.len() - 2 * lcs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indel_distance() {
        assert_eq!(indel_distance("", "abc"), 3);
        assert_eq!(indel_distance("abc", "abc"), 0);
        assert_eq!(indel_distance("abc", "abd"), 2);
        assert_eq!(indel_distance("kitten", "sitting"), 5);
    }

    #[test]
    fn test_ratio_boundaries() {
        assert_eq!(ratio("abcdefghij", "abcdefghik"), 90);
        assert_eq!(ratio("abcdefghi", "abcdefghx"), 89);
        assert_eq!(ratio("", "abc"), 0);
    }

    #[test]
    fn test_token_set_ratio_identical() {
        assert_eq!(token_set_ratio("widget200", "widget200"), 100);
    }

    #[test]
    fn test_token_set_ratio_order_and_duplicates() {
        assert_eq!(token_set_ratio("blue widget", "widget blue"), 100);
        assert_eq!(token_set_ratio("a a b", "b a"), 100);
    }

    #[test]
    fn test_token_set_ratio_subset_scores_full() {
        assert_eq!(token_set_ratio("widget 200", "widget"), 100);
        assert_eq!(token_set_ratio("ab-cd", "ab"), 100);
    }

    #[test]
    fn test_token_set_ratio_dissimilar() {
        assert_eq!(token_set_ratio("widget199", "widget200"), 67);
        assert!(token_set_ratio("pump", "valve") < 50);
    }

    #[test]
    fn test_token_set_ratio_empty_input() {
        assert_eq!(token_set_ratio("", "abc"), 0);
        assert_eq!(token_set_ratio("---", "abc"), 0);
    }

    #[test]
    fn test_precomputed_sets_match_direct() {
        let a = TokenSet::new("xk200/b");
        let b = TokenSet::new("xk200 a");
        assert_eq!(token_set_ratio_sets(&a, &b), token_set_ratio("xk200/b", "xk200 a"));
    }
}
