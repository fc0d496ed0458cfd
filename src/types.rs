//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// 列マッピング（出力する列の順序付きリスト）
pub type ColumnMapping = Vec<ColumnSpec>;

/// 1列分の出力定義
///
/// JavaScript側で記述されたマッピング定義をそのまま読み込めるよう、
/// フィールド名はcamelCaseでシリアライズされます。
///
/// # 使用例
///
/// ```rust
/// use dataexport::ColumnSpec;
///
/// let spec: ColumnSpec = serde_json::from_str(
///     r#"{"field": "user.name", "displayName": "Name", "headerCellFilter": "uppercase"}"#,
/// ).unwrap();
/// assert_eq!(spec.field, "user.name");
/// assert_eq!(spec.header_cell_filter.as_deref(), Some("uppercase"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSpec {
    /// レコード内の値へのパス（`a.b`または`a[b]`記法）
    ///
    /// 空文字列の場合、この列はヘッダー以外のすべての行で出力されません。
    #[serde(default, deserialize_with = "null_as_empty")]
    pub field: String,

    /// ヘッダーセルに表示するラベル
    #[serde(default, deserialize_with = "null_as_empty")]
    pub display_name: String,

    /// ラベルに適用するヘッダーフィルター名
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_cell_filter: Option<String>,
}

/// `null`を空文字列として読み込む
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl ColumnSpec {
    /// フィルターなしの列定義を生成
    pub fn new(field: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            display_name: display_name.into(),
            header_cell_filter: None,
        }
    }

    /// ヘッダーフィルターを指定する
    pub fn with_header_cell_filter(mut self, filter: impl Into<String>) -> Self {
        self.header_cell_filter = Some(filter.into());
        self
    }

    /// 本文のセルを出力する列かどうか
    pub fn has_field(&self) -> bool {
        !self.field.is_empty()
    }
}

/// 値をデフォルトの文字列表現に変換する
///
/// ブラウザ側の利用者が期待する文字列変換規則に従います。
///
/// | 値 | 出力 |
/// | --- | --- |
/// | 文字列 | そのまま |
/// | 論理値 | `true` / `false` |
/// | null | `null` |
/// | 整数値の数値 | 小数部なし（`1.0` → `1`） |
/// | 配列 | 要素を`,`で連結（nullは空文字列） |
/// | オブジェクト | `[object Object]` |
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => display_number(n),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => display_value(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// パス解決結果を文字列に変換（未解決は空文字列）
pub(crate) fn display_resolved(value: Option<&Value>) -> String {
    value.map(display_value).unwrap_or_default()
}

fn display_number(n: &serde_json::Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }

    match n.as_f64() {
        // 1e21以上と1e-6未満は指数表記
        Some(f) if f.is_finite() && (f.abs() >= 1e21 || (f != 0.0 && f.abs() < 1e-6)) => {
            display_exponent(f)
        }
        Some(f) if f.is_finite() && f.fract() == 0.0 => format!("{}", f as i128),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// `1.5e300` → `1.5e+300`, `1e-7` → `1e-7`
fn display_exponent(f: f64) -> String {
    let formatted = format!("{:e}", f);
    match formatted.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
        _ => formatted,
    }
}
