//! WebAssembly Bindings
//!
//! ブラウザからExcel変換を呼び出すための`wasm-bindgen`バインディング。
//! ファイルの保存（Blobの生成とダウンロード）はJavaScript側で行います。

use wasm_bindgen::prelude::*;

use crate::exporter::parse_records;
use crate::serializer::{ExcelSerializer, Serializer, EXCEL_FILE_EXTENSION, EXCEL_MIME_TYPE};
use crate::types::ColumnMapping;

/// JSON配列のレコードをExcel（HTMLワークシート）文字列に変換
///
/// # Arguments
/// * `records_json` - レコードのJSON配列
/// * `mapping_json` - 列マッピングのJSON配列（省略時は先頭レコードから推論）
///
/// # Returns
/// * Success: Excel文書の文字列
/// * Error: エラーメッセージ
#[wasm_bindgen]
pub fn export_excel(records_json: &str, mapping_json: Option<String>) -> Result<String, String> {
    let records = parse_records(records_json).map_err(|e| e.to_string())?;

    let mapping = match mapping_json {
        Some(ref json) => Some(
            serde_json::from_str::<ColumnMapping>(json)
                .map_err(|e| format!("Invalid column mapping: {}", e))?,
        ),
        None => None,
    };

    let mut serializer = ExcelSerializer::new();
    serializer.set_mapping(mapping);
    serializer
        .transform(&records)
        .map_err(|e| format!("Conversion error: {}", e))
}

/// Excel形式のMIMEタイプ
#[wasm_bindgen]
pub fn excel_mime_type() -> String {
    EXCEL_MIME_TYPE.to_string()
}

/// Excel形式のファイル拡張子
#[wasm_bindgen]
pub fn excel_file_extension() -> String {
    EXCEL_FILE_EXTENSION.to_string()
}

/// Get version information
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
