//! Serializer Module
//!
//! Strategy Patternによるエクスポート形式の抽象化を提供するモジュール。
//! 組み込みの形式はExcel（HTMLワークシート）のみで、独自の形式は
//! `Serializer`トレイトを実装して`SerializerRegistry`に登録します。

mod excel;

use serde_json::Value;

use crate::error::Result;
use crate::types::ColumnMapping;

pub use excel::{
    ExcelSerializer, ExcelSerializerBuilder, DEFAULT_WORKSHEET_NAME, EXCEL_FILE_EXTENSION,
    EXCEL_MIME_TYPE,
};

/// レコード列を特定の形式のテキストへ変換するシリアライザー
///
/// # 実装例
///
/// ```rust
/// use dataexport::{ColumnMapping, Result, Serializer};
/// use serde_json::Value;
///
/// struct LineCount {
///     mapping: Option<ColumnMapping>,
/// }
///
/// impl Serializer for LineCount {
///     fn mime_type(&self) -> &str {
///         "text/plain"
///     }
///
///     fn file_extension(&self) -> &str {
///         ".txt"
///     }
///
///     fn set_mapping(&mut self, mapping: Option<ColumnMapping>) {
///         self.mapping = mapping;
///     }
///
///     fn mapping(&self) -> Option<&ColumnMapping> {
///         self.mapping.as_ref()
///     }
///
///     fn transform(&self, records: &[Value]) -> Result<String> {
///         Ok(records.len().to_string())
///     }
/// }
/// ```
pub trait Serializer: Send + Sync {
    /// 変換結果のMIMEタイプ
    fn mime_type(&self) -> &str;

    /// 変換結果のファイル拡張子（先頭のドットを含む）
    fn file_extension(&self) -> &str;

    /// 列マッピングを設定する（`None`でマッピングを解除）
    fn set_mapping(&mut self, mapping: Option<ColumnMapping>);

    /// 現在の列マッピング
    fn mapping(&self) -> Option<&ColumnMapping>;

    /// レコード列を変換する
    ///
    /// 変換は全体が成功するか、何も出力せずに失敗するかのどちらかです。
    fn transform(&self, records: &[Value]) -> Result<String>;
}
