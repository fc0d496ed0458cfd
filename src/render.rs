//! Row Renderer Module
//!
//! レコードと列マッピングから`<tr><td>...</td></tr>`形式の行を生成する。

use std::borrow::Cow;
use std::io::Write;

use serde_json::Value;

use crate::error::{DataExportError, Result};
use crate::filter::HeaderFilterRegistry;
use crate::path::resolve;
use crate::types::{display_resolved, display_value, ColumnMapping};

/// セルテキストのエスケープ方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum CellEscaping {
    /// エスケープしない（デフォルト）
    ///
    /// 値に含まれる文字はそのままマークアップに挿入されます。
    /// 信頼できるデータのみを扱う場合に使用してください。
    #[default]
    None,

    /// HTML特殊文字（`<`, `>`, `&`, `'`, `"`）をエンティティに変換
    Html,
}

impl CellEscaping {
    fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match self {
            CellEscaping::None => Cow::Borrowed(text),
            CellEscaping::Html => quick_xml::escape::escape(text),
        }
    }
}

/// ヘッダー行と本文行のレンダラー
///
/// マッピングがない場合は先頭レコードのキーを列として扱い、
/// マッピングがある場合はマッピングの順序と表示名に従います。
#[derive(Debug, Clone, Copy)]
pub struct RowRenderer<'a> {
    mapping: Option<&'a ColumnMapping>,
    filters: &'a HeaderFilterRegistry,
    escaping: CellEscaping,
}

impl<'a> RowRenderer<'a> {
    /// 新しいレンダラーを生成
    pub fn new(
        mapping: Option<&'a ColumnMapping>,
        filters: &'a HeaderFilterRegistry,
        escaping: CellEscaping,
    ) -> Self {
        Self {
            mapping,
            filters,
            escaping,
        }
    }

    /// ヘッダーセルのテキストを計算する
    ///
    /// # 発生し得るエラー
    ///
    /// * `DataExportError::EmptyDataset`: マッピングがなく、レコードが空の場合
    /// * `DataExportError::UnsupportedEnvironment`: マッピングがなく、先頭レコードのキーを列挙できない場合
    /// * `DataExportError::FilterNotFound`: 未登録のヘッダーフィルターが指定された場合
    pub fn header_cells(&self, records: &[Value]) -> Result<Vec<String>> {
        match self.mapping {
            None => {
                let first = records.first().ok_or(DataExportError::EmptyDataset)?;
                enumerable_keys(first)
            }
            Some(mapping) => mapping
                .iter()
                .map(|spec| match spec.header_cell_filter.as_deref() {
                    Some(filter) if !filter.is_empty() => {
                        self.filters.apply(filter, &spec.display_name)
                    }
                    _ => Ok(spec.display_name.clone()),
                })
                .collect(),
        }
    }

    /// 1レコード分の本文セルのテキストを計算する
    ///
    /// マッピングがある場合、`field`が空の列はセル自体を出力しません。
    pub fn row_cells(&self, record: &Value) -> Vec<String> {
        match self.mapping {
            None => match record {
                Value::Object(map) => map.values().map(display_value).collect(),
                Value::Array(items) => items.iter().map(display_value).collect(),
                _ => Vec::new(),
            },
            Some(mapping) => mapping
                .iter()
                .filter(|spec| spec.has_field())
                .map(|spec| display_resolved(resolve(record, &spec.field)))
                .collect(),
        }
    }

    /// ヘッダー行を出力する
    pub fn render_header<W: Write>(&self, writer: &mut W, records: &[Value]) -> Result<()> {
        let cells = self.header_cells(records)?;
        self.write_row(writer, &cells)
    }

    /// 本文の1行を出力する
    pub fn render_row<W: Write>(&self, writer: &mut W, record: &Value) -> Result<()> {
        let cells = self.row_cells(record);
        self.write_row(writer, &cells)
    }

    fn write_row<W: Write>(&self, writer: &mut W, cells: &[String]) -> Result<()> {
        write!(writer, "<tr>")?;
        for cell in cells {
            write!(writer, "<td>{}</td>", self.escaping.apply(cell))?;
        }
        write!(writer, "</tr>")?;
        Ok(())
    }
}

/// レコードのキーを列挙順に取得（配列はインデックス）
fn enumerable_keys(record: &Value) -> Result<Vec<String>> {
    match record {
        Value::Object(map) => Ok(map.keys().cloned().collect()),
        Value::Array(items) => Ok((0..items.len()).map(|i| i.to_string()).collect()),
        other => Err(DataExportError::UnsupportedEnvironment(format!(
            "key enumeration is not available for {} records",
            value_kind(other)
        ))),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnSpec;
    use serde_json::json;

    fn render_to_string(renderer: &RowRenderer<'_>, record: &Value) -> String {
        let mut buffer = Vec::new();
        renderer.render_row(&mut buffer, record).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_header_inferred_from_first_record() {
        let filters = HeaderFilterRegistry::new();
        let renderer = RowRenderer::new(None, &filters, CellEscaping::None);
        let records = vec![json!({"zeta": 1, "alpha": 2}), json!({"other": 3})];

        // 挿入順が保持される
        assert_eq!(renderer.header_cells(&records).unwrap(), vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_header_empty_dataset_without_mapping() {
        let filters = HeaderFilterRegistry::new();
        let renderer = RowRenderer::new(None, &filters, CellEscaping::None);

        assert!(matches!(
            renderer.header_cells(&[]),
            Err(DataExportError::EmptyDataset)
        ));
    }

    #[test]
    fn test_header_scalar_first_record() {
        let filters = HeaderFilterRegistry::new();
        let renderer = RowRenderer::new(None, &filters, CellEscaping::None);

        match renderer.header_cells(&[json!(42)]) {
            Err(DataExportError::UnsupportedEnvironment(msg)) => assert!(msg.contains("number")),
            other => panic!("Expected UnsupportedEnvironment, got {:?}", other),
        }
    }

    #[test]
    fn test_header_array_record_uses_indices() {
        let filters = HeaderFilterRegistry::new();
        let renderer = RowRenderer::new(None, &filters, CellEscaping::None);

        assert_eq!(
            renderer.header_cells(&[json!(["x", "y"])]).unwrap(),
            vec!["0", "1"]
        );
    }

    #[test]
    fn test_header_with_mapping_and_filter() {
        let filters = HeaderFilterRegistry::new();
        let mapping = vec![
            ColumnSpec::new("a", "Alpha").with_header_cell_filter("uppercase"),
            ColumnSpec::new("", "Skipped"),
            ColumnSpec::new("c", "Gamma"),
        ];
        let renderer = RowRenderer::new(Some(&mapping), &filters, CellEscaping::None);

        // ヘッダーはマッピングの全列を出力する
        assert_eq!(
            renderer.header_cells(&[]).unwrap(),
            vec!["ALPHA", "Skipped", "Gamma"]
        );
    }

    #[test]
    fn test_header_with_empty_filter_name_is_verbatim() {
        let filters = HeaderFilterRegistry::new();
        let mapping = vec![ColumnSpec::new("a", "Alpha").with_header_cell_filter("")];
        let renderer = RowRenderer::new(Some(&mapping), &filters, CellEscaping::None);

        assert_eq!(renderer.header_cells(&[]).unwrap(), vec!["Alpha"]);
    }

    #[test]
    fn test_header_unknown_filter() {
        let filters = HeaderFilterRegistry::new();
        let mapping = vec![ColumnSpec::new("a", "Alpha").with_header_cell_filter("shout")];
        let renderer = RowRenderer::new(Some(&mapping), &filters, CellEscaping::None);

        assert!(matches!(
            renderer.header_cells(&[]),
            Err(DataExportError::FilterNotFound(_))
        ));
    }

    #[test]
    fn test_row_without_mapping() {
        let filters = HeaderFilterRegistry::new();
        let renderer = RowRenderer::new(None, &filters, CellEscaping::None);
        let record = json!({"id": 1, "tags": ["a", "b"], "meta": {"k": "v"}, "gone": null});

        assert_eq!(
            render_to_string(&renderer, &record),
            "<tr><td>1</td><td>a,b</td><td>[object Object]</td><td>null</td></tr>"
        );
    }

    #[test]
    fn test_row_with_mapping_skips_empty_field() {
        let filters = HeaderFilterRegistry::new();
        let mapping = vec![
            ColumnSpec::new("a", "A"),
            ColumnSpec::new("", "B"),
            ColumnSpec::new("c", "C"),
        ];
        let renderer = RowRenderer::new(Some(&mapping), &filters, CellEscaping::None);
        let record = json!({"a": 1, "b": 2, "c": 3});

        assert_eq!(renderer.row_cells(&record), vec!["1", "3"]);
        assert_eq!(
            render_to_string(&renderer, &record),
            "<tr><td>1</td><td>3</td></tr>"
        );
    }

    #[test]
    fn test_row_with_mapping_missing_path_is_empty_cell() {
        let filters = HeaderFilterRegistry::new();
        let mapping = vec![ColumnSpec::new("a.x", "AX"), ColumnSpec::new("b[1]", "B1")];
        let renderer = RowRenderer::new(Some(&mapping), &filters, CellEscaping::None);
        let record = json!({"a": 1, "b": [10, 20]});

        assert_eq!(
            render_to_string(&renderer, &record),
            "<tr><td></td><td>20</td></tr>"
        );
    }

    #[test]
    fn test_scalar_record_renders_empty_row() {
        let filters = HeaderFilterRegistry::new();
        let renderer = RowRenderer::new(None, &filters, CellEscaping::None);

        assert_eq!(render_to_string(&renderer, &json!("text")), "<tr></tr>");
    }

    #[test]
    fn test_values_are_not_escaped_by_default() {
        let filters = HeaderFilterRegistry::new();
        let renderer = RowRenderer::new(None, &filters, CellEscaping::None);

        assert_eq!(
            render_to_string(&renderer, &json!({"v": "<b>&</b>"})),
            "<tr><td><b>&</b></td></tr>"
        );
    }

    #[test]
    fn test_html_escaping() {
        let filters = HeaderFilterRegistry::new();
        let renderer = RowRenderer::new(None, &filters, CellEscaping::Html);

        assert_eq!(
            render_to_string(&renderer, &json!({"v": "<b>&</b>"})),
            "<tr><td>&lt;b&gt;&amp;&lt;/b&gt;</td></tr>"
        );
    }
}
