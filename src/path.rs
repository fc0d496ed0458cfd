//! Field Path Module
//!
//! `a.b`や`a[0].b`形式のパス式でレコード内の値を参照する。

use serde_json::Value;

/// パス式をドット区切り形式に正規化する
///
/// `[word]`（英数字とアンダースコアのみ）を`.word`に置換した後、
/// 先頭のドットを1つだけ取り除きます。
///
/// # 使用例
///
/// ```rust
/// use dataexport::normalize_path;
///
/// assert_eq!(normalize_path("a[0].b"), "a.0.b");
/// assert_eq!(normalize_path("[items][2]"), "items.2");
/// ```
pub fn normalize_path(expr: &str) -> String {
    let mut normalized = String::with_capacity(expr.len());
    let mut rest = expr;

    while let Some(open) = rest.find('[') {
        normalized.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        match after.find(']') {
            Some(close) if close > 0 && after[..close].chars().all(is_word_char) => {
                normalized.push('.');
                normalized.push_str(&after[..close]);
                rest = &after[close + 1..];
            }
            _ => {
                // 置換対象外の`[`はそのまま残す
                normalized.push('[');
                rest = after;
            }
        }
    }
    normalized.push_str(rest);

    match normalized.strip_prefix('.') {
        Some(stripped) => stripped.to_string(),
        None => normalized,
    }
}

/// パス式でレコード内の値を解決する
///
/// 各セグメントについて、オブジェクトならキーで、配列なら数値インデックスで
/// 降りていきます。キーが存在しない場合やスカラー値に到達した場合は`None`を返します。
///
/// # 使用例
///
/// ```rust
/// use dataexport::resolve;
/// use serde_json::json;
///
/// assert_eq!(resolve(&json!({"a": {"b": 5}}), "a.b"), Some(&json!(5)));
/// assert_eq!(resolve(&json!({"a": [10, 20]}), "a[1]"), Some(&json!(20)));
/// assert_eq!(resolve(&json!({"a": 1}), "a.x"), None);
/// ```
pub fn resolve<'a>(record: &'a Value, expr: &str) -> Option<&'a Value> {
    let normalized = normalize_path(expr);

    normalized
        .split('.')
        .try_fold(record, |current, key| match current {
            Value::Object(map) => map.get(key),
            Value::Array(items) => key.parse::<usize>().ok().and_then(|idx| items.get(idx)),
            _ => None,
        })
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
