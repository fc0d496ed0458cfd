//! Excel Serializer
//!
//! レコード列をExcelが表形式として開けるHTMLワークシートに変換する。
//! 出力はネイティブのバイナリ形式ではなく、Office名前空間と条件付きコメントで
//! ワークシートであることを示したHTML文書です。

use std::io::Write;

use serde_json::Value;
use tracing::{debug, warn};

use super::Serializer;
use crate::error::{DataExportError, Result};
use crate::filter::HeaderFilterRegistry;
use crate::render::{CellEscaping, RowRenderer};
use crate::types::ColumnMapping;

/// Excel形式のMIMEタイプ
pub const EXCEL_MIME_TYPE: &str = "application/vnd.ms-excel";

/// Excel形式のファイル拡張子
pub const EXCEL_FILE_EXTENSION: &str = ".xls";

/// デフォルトのワークシート名
pub const DEFAULT_WORKSHEET_NAME: &str = "Angular Export Excel";

// Excelが認識するための文書ヘッダー（ワークシート名の前後）
const DOCUMENT_HEAD: &str = "<html xmlns:o='urn:schemas-microsoft-com:office:office' \
xmlns:x='urn:schemas-microsoft-com:office:excel' xmlns='http://www.w3.org/TR/REC-html40'>\
<head><!--[if gte mso 9]><xml><x:ExcelWorkbook><x:ExcelWorksheets><x:ExcelWorksheet><x:Name>";
const DOCUMENT_HEAD_TAIL: &str = "</x:Name><x:WorksheetOptions><x:DisplayGridlines/>\
</x:WorksheetOptions></x:ExcelWorksheet></x:ExcelWorksheets></x:ExcelWorkbook></xml>\
<![endif]--></head><body><table>";
const DOCUMENT_TAIL: &str = "</table></body></html>";

/// Excelのシート名に使用できない文字
const FORBIDDEN_SHEET_CHARS: &[char] = &['<', '>', ':', '\\', '/', '?', '*', '[', ']'];

/// Excelのシート名の最大長
const MAX_WORKSHEET_NAME_LEN: usize = 31;

/// Excel（HTMLワークシート）シリアライザーのビルダー
///
/// # 使用例
///
/// ```rust
/// use dataexport::{CellEscaping, ExcelSerializerBuilder};
///
/// # fn main() -> Result<(), dataexport::DataExportError> {
/// let serializer = ExcelSerializerBuilder::new()
///     .with_worksheet_name("Orders")
///     .with_cell_escaping(CellEscaping::Html)
///     .with_header_filter("bracket", |s: &str| format!("[{}]", s))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ExcelSerializerBuilder {
    worksheet_name: String,
    escaping: CellEscaping,
    filters: HeaderFilterRegistry,
}

impl Default for ExcelSerializerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExcelSerializerBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - ワークシート名: `Angular Export Excel`
    /// - セルのエスケープ: なし
    /// - ヘッダーフィルター: `uppercase`, `lowercase`
    pub fn new() -> Self {
        Self {
            worksheet_name: DEFAULT_WORKSHEET_NAME.to_string(),
            escaping: CellEscaping::None,
            filters: HeaderFilterRegistry::new(),
        }
    }

    /// ワークシート名を指定する
    pub fn with_worksheet_name(mut self, name: impl Into<String>) -> Self {
        self.worksheet_name = name.into();
        self
    }

    /// セルテキストのエスケープ方式を指定する
    pub fn with_cell_escaping(mut self, escaping: CellEscaping) -> Self {
        self.escaping = escaping;
        self
    }

    /// ヘッダーフィルターのレジストリを置き換える
    pub fn with_header_filters(mut self, filters: HeaderFilterRegistry) -> Self {
        self.filters = filters;
        self
    }

    /// ヘッダーフィルターを1つ追加する
    pub fn with_header_filter<F>(mut self, name: impl Into<String>, filter: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.filters.register(name, filter);
        self
    }

    /// 設定を検証し、`ExcelSerializer`インスタンスを生成する
    ///
    /// # 発生し得るエラー
    ///
    /// * `DataExportError::Config(String)`: ワークシート名が空、31文字超、
    ///   または使用できない文字を含む場合
    pub fn build(self) -> Result<ExcelSerializer> {
        if self.worksheet_name.trim().is_empty() {
            return Err(DataExportError::Config(
                "Worksheet name must not be empty".to_string(),
            ));
        }

        if self.worksheet_name.chars().count() > MAX_WORKSHEET_NAME_LEN {
            return Err(DataExportError::Config(format!(
                "Worksheet name exceeds {} characters: '{}'",
                MAX_WORKSHEET_NAME_LEN, self.worksheet_name
            )));
        }

        if let Some(c) = self
            .worksheet_name
            .chars()
            .find(|c| FORBIDDEN_SHEET_CHARS.contains(c))
        {
            return Err(DataExportError::Config(format!(
                "Worksheet name contains forbidden character '{}': '{}'",
                c, self.worksheet_name
            )));
        }

        Ok(ExcelSerializer {
            mapping: None,
            worksheet_name: self.worksheet_name,
            escaping: self.escaping,
            filters: self.filters,
        })
    }
}

/// Excel（HTMLワークシート）シリアライザー
///
/// # 使用例
///
/// ```rust
/// use dataexport::{ExcelSerializer, Serializer};
/// use serde_json::json;
///
/// # fn main() -> Result<(), dataexport::DataExportError> {
/// let serializer = ExcelSerializer::new();
/// let document = serializer.transform(&[json!({"id": 1, "name": "Ada"})])?;
///
/// assert!(document.contains("<tr><td>id</td><td>name</td></tr>"));
/// assert!(document.contains("<tr><td>1</td><td>Ada</td></tr>"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ExcelSerializer {
    /// 現在の列マッピング
    mapping: Option<ColumnMapping>,

    /// ワークシート名
    worksheet_name: String,

    /// セルのエスケープ方式
    escaping: CellEscaping,

    /// ヘッダーフィルター
    filters: HeaderFilterRegistry,
}

impl ExcelSerializer {
    /// デフォルト設定のシリアライザーを生成
    pub fn new() -> Self {
        Self {
            mapping: None,
            worksheet_name: DEFAULT_WORKSHEET_NAME.to_string(),
            escaping: CellEscaping::None,
            filters: HeaderFilterRegistry::new(),
        }
    }

    /// ワークシート名
    pub fn worksheet_name(&self) -> &str {
        &self.worksheet_name
    }

    fn write_document_head<W: Write>(&self, writer: &mut W) -> Result<()> {
        write!(
            writer,
            "{}{}{}",
            DOCUMENT_HEAD, self.worksheet_name, DOCUMENT_HEAD_TAIL
        )?;
        Ok(())
    }
}

impl Default for ExcelSerializer {
    fn default() -> Self {
        Self::new()
    }
}

impl Serializer for ExcelSerializer {
    fn mime_type(&self) -> &str {
        EXCEL_MIME_TYPE
    }

    fn file_extension(&self) -> &str {
        EXCEL_FILE_EXTENSION
    }

    fn set_mapping(&mut self, mapping: Option<ColumnMapping>) {
        self.mapping = mapping;
    }

    fn mapping(&self) -> Option<&ColumnMapping> {
        self.mapping.as_ref()
    }

    fn transform(&self, records: &[Value]) -> Result<String> {
        debug!(
            records = records.len(),
            mapped = self.mapping.is_some(),
            "Transforming records to Excel worksheet"
        );

        if let Some(mapping) = &self.mapping {
            let skipped = mapping.iter().filter(|spec| !spec.has_field()).count();
            if skipped > 0 {
                warn!(
                    skipped,
                    "Column mapping has entries without a field path; their body cells are omitted"
                );
            }
        }

        let renderer = RowRenderer::new(self.mapping.as_ref(), &self.filters, self.escaping);

        // ヘッダーを先に計算し、失敗時は何も出力しない
        let mut table = Vec::new();
        renderer.render_header(&mut table, records)?;
        for record in records {
            renderer.render_row(&mut table, record)?;
        }

        let mut buffer = Vec::with_capacity(table.len() + 512);
        self.write_document_head(&mut buffer)?;
        buffer.extend_from_slice(&table);
        write!(buffer, "{}", DOCUMENT_TAIL)?;

        let document = String::from_utf8(buffer).map_err(|e| {
            DataExportError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })?;

        debug!(bytes = document.len(), "Excel worksheet generated");
        Ok(document)
    }
}
