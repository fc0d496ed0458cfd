//! dataexport - Record-to-spreadsheet export with pluggable serializers
//!
//! このクレートは、メモリ上のレコード（JSON値）の集合をダウンロード可能なファイルに
//! 変換する機能を提供します。組み込みの形式は、表計算アプリケーションが表として
//! 開けるHTMLワークシート（Excel形式）です。独自の形式は`Serializer`トレイトを
//! 実装して登録できます。
//!
//! # Quick Start
//!
//! ```rust
//! use dataexport::{ExcelSerializer, Serializer};
//! use serde_json::json;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let records = vec![
//!         json!({"id": 1, "name": "Ada"}),
//!         json!({"id": 2, "name": "Grace"}),
//!     ];
//!
//!     // 列は先頭レコードのキーから推論される
//!     let document = ExcelSerializer::new().transform(&records)?;
//!     assert!(document.contains("<tr><td>id</td><td>name</td></tr>"));
//!
//!     Ok(())
//! }
//! ```
//!
//! # Column Mapping
//!
//! ```rust
//! use dataexport::{ColumnSpec, ExcelSerializer, Serializer};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), dataexport::DataExportError> {
//! let mut serializer = ExcelSerializer::new();
//! serializer.set_mapping(Some(vec![
//!     ColumnSpec::new("user.name", "Name").with_header_cell_filter("uppercase"),
//!     ColumnSpec::new("tags[0]", "First tag"),
//! ]));
//!
//! let document = serializer.transform(&[json!({"user": {"name": "Ada"}, "tags": ["math"]})])?;
//! assert!(document.contains("<tr><td>NAME</td><td>First tag</td></tr>"));
//! assert!(document.contains("<tr><td>Ada</td><td>math</td></tr>"));
//! # Ok(())
//! # }
//! ```
//!
//! # Export and Download
//!
//! ```rust,no_run
//! use dataexport::{DataExporterBuilder, DirectoryDownloader, EXCEL_SERVICE_NAME};
//! use serde_json::json;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut exporter = DataExporterBuilder::new().build(DirectoryDownloader::new("exports"))?;
//!
//!     // exports/exportData.xls に保存される
//!     exporter.transform_and_download(&[json!({"id": 1})], EXCEL_SERVICE_NAME, None)?;
//!
//!     Ok(())
//! }
//! ```

mod download;
mod error;
mod exporter;
mod filter;
mod path;
mod registry;
mod render;
mod serializer;
mod types;

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
mod wasm;

// 公開API
pub use download::{DirectoryDownloader, DownloadedFile, FileDownloader, MemoryDownloader};
pub use error::{DataExportError, Result};
pub use exporter::{parse_records, DataExporter, DataExporterBuilder, DEFAULT_FILENAME_STEM};
pub use filter::{HeaderFilterFn, HeaderFilterRegistry};
pub use path::{normalize_path, resolve};
pub use registry::{
    SerializerRegistry, EXCEL_LEGACY_SERVICE_NAME, EXCEL_SERVICE_NAME, EXCEL_SERVICE_NAMES,
    EXCEL_SHORT_NAME,
};
pub use render::{CellEscaping, RowRenderer};
pub use serializer::{
    ExcelSerializer, ExcelSerializerBuilder, Serializer, DEFAULT_WORKSHEET_NAME,
    EXCEL_FILE_EXTENSION, EXCEL_MIME_TYPE,
};
pub use types::{ColumnMapping, ColumnSpec};
