//! 型番の正規化
//!
//! コストシートの型番とマスタの表示名を同じ比較キーに揃える。
//! 空文字列のキーは「照合対象外」を表す。

/// 型番テキストを比較キーに変換する
///
/// 1. 前後の空白を除去
/// 2. 小文字化
/// 3. 半角スペース・ハイフン・改行を除去
/// 4. 最初の `(` 以降を切り捨て
pub fn normalize(text: &str) -> String {
    let key: String = text
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '\n'))
        .collect();

    match key.find('(') {
        Some(pos) => key[..pos].to_string(),
        None => key,
    }
}

/// 数字（0-9）のみのキーか判定（空白は無視）
///
/// 数値だけの型番は照合しない。空キーは `false`。
pub fn is_numeric_only(key: &str) -> bool {
    let mut digits = key.chars().filter(|c| *c != ' ').peekable();
    digits.peek().is_some() && digits.all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_revision_suffix() {
        assert_eq!(normalize("ABC-123 (rev2)"), "abc123");
    }

    #[test]
    fn test_normalize_whitespace_and_newlines() {
        assert_eq!(normalize("  Widget 200\nBlue  "), "widget200blue");
        assert_eq!(normalize("\tWidget-200\t"), "widget200");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("(only note)"), "");
    }

    #[test]
    fn test_normalize_keeps_other_punctuation() {
        assert_eq!(normalize("AB/12.5"), "ab/12.5");
        assert_eq!(normalize("x_1)"), "x_1)");
    }

    #[test]
    fn test_normalize_idempotent() {
        for text in ["Widget-200 (blue)", "abc 123", "A-B-C", "plain"] {
            let once = normalize(text);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn test_is_numeric_only() {
        assert!(is_numeric_only("12345"));
        assert!(is_numeric_only("12 345"));
        assert!(!is_numeric_only("12a45"));
        assert!(!is_numeric_only(""));
        assert!(!is_numeric_only("12.5"));
        // 分数・ローマ数字は数字扱いしない
        assert!(!is_numeric_only("½"));
        assert!(!is_numeric_only("ⅻ"));
    }
}
