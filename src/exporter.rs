//! Exporter Module
//!
//! データセット、シリアライザーの選択、ダウンロード処理をまとめる
//! エクスポートのファサードと、そのビルダーを提供する。

use std::fmt;

use serde_json::Value;
use tracing::{debug, info};

use crate::download::FileDownloader;
use crate::error::{DataExportError, Result};
use crate::registry::SerializerRegistry;
use crate::serializer::Serializer;
use crate::types::ColumnMapping;

/// デフォルトのファイル名（拡張子を除く）
pub const DEFAULT_FILENAME_STEM: &str = "exportData";

/// `DataExporter`を段階的に構築するビルダー
///
/// 組み込みのExcelシリアライザーが登録された状態から開始します。
///
/// # 使用例
///
/// ```rust
/// use dataexport::{DataExporterBuilder, ExcelSerializerBuilder, MemoryDownloader};
///
/// # fn main() -> Result<(), dataexport::DataExportError> {
/// let orders = ExcelSerializerBuilder::new()
///     .with_worksheet_name("Orders")
///     .build()?;
///
/// let exporter = DataExporterBuilder::new()
///     .with_serializer("ordersExportService", Box::new(orders))
///     .with_default_filename_stem("orders")
///     .build(MemoryDownloader::new())?;
/// # Ok(())
/// # }
/// ```
pub struct DataExporterBuilder {
    registry: SerializerRegistry,
    pending: Vec<(String, Box<dyn Serializer>)>,
    filename_stem: String,
}

impl fmt::Debug for DataExporterBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pending: Vec<&str> = self.pending.iter().map(|(name, _)| name.as_str()).collect();
        f.debug_struct("DataExporterBuilder")
            .field("registry", &self.registry)
            .field("pending", &pending)
            .field("filename_stem", &self.filename_stem)
            .finish()
    }
}

impl Default for DataExporterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DataExporterBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - シリアライザー: `excelExportService`、`excel`、`dataExportExcelService`
    ///   （いずれも組み込みのExcelシリアライザー）
    /// - ファイル名: `exportData` + シリアライザーの拡張子
    pub fn new() -> Self {
        Self {
            registry: SerializerRegistry::with_defaults(),
            pending: Vec::new(),
            filename_stem: DEFAULT_FILENAME_STEM.to_string(),
        }
    }

    /// シリアライザーのレジストリを置き換える
    pub fn with_registry(mut self, registry: SerializerRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// シリアライザーを追加登録する
    ///
    /// 名前の検証は`build()`時に行われます。
    pub fn with_serializer(
        mut self,
        name: impl Into<String>,
        serializer: Box<dyn Serializer>,
    ) -> Self {
        self.pending.push((name.into(), serializer));
        self
    }

    /// ファイル名を省略した場合に使う名前（拡張子を除く）を指定する
    pub fn with_default_filename_stem(mut self, stem: impl Into<String>) -> Self {
        self.filename_stem = stem.into();
        self
    }

    /// 設定を検証し、`DataExporter`インスタンスを生成する
    ///
    /// # 発生し得るエラー
    ///
    /// * `DataExportError::Config(String)`:
    ///   * シリアライザー名が空、または重複している
    ///   * デフォルトのファイル名が空
    pub fn build<D: FileDownloader>(self, downloader: D) -> Result<DataExporter<D>> {
        if self.filename_stem.is_empty() {
            return Err(DataExportError::Config(
                "Default filename stem must not be empty".to_string(),
            ));
        }

        let mut registry = self.registry;
        for (name, serializer) in self.pending {
            registry.register(name, serializer)?;
        }

        debug!(serializers = ?registry.names(), "Data exporter configured");

        Ok(DataExporter {
            registry,
            downloader,
            mapping: None,
            filename_stem: self.filename_stem,
        })
    }
}

/// エクスポート処理のファサード
///
/// 名前でシリアライザーを選び、列マッピングを適用して変換し、
/// 必要に応じて結果をダウンローダーへ渡します。
///
/// 列マッピングは呼び出しごとにシリアライザーへ設定し直されるため、
/// 以前の呼び出しのマッピングが残ることはありません。
///
/// # 使用例
///
/// ```rust
/// use dataexport::{ColumnSpec, DataExporterBuilder, MemoryDownloader, EXCEL_SERVICE_NAME};
/// use serde_json::json;
///
/// # fn main() -> Result<(), dataexport::DataExportError> {
/// let mut exporter = DataExporterBuilder::new().build(MemoryDownloader::new())?;
/// let data = vec![json!({"user": {"name": "Ada"}, "age": 36})];
///
/// exporter.set_data_mapping(Some(vec![ColumnSpec::new("user.name", "Name")]));
/// exporter.transform_and_download(&data, EXCEL_SERVICE_NAME, None)?;
///
/// let file = exporter.downloader().last().unwrap();
/// assert_eq!(file.filename, "exportData.xls");
/// assert!(file.content.contains("<tr><td>Name</td></tr><tr><td>Ada</td></tr>"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DataExporter<D> {
    /// シリアライザーのレジストリ
    registry: SerializerRegistry,

    /// ダウンロード処理の協調オブジェクト
    downloader: D,

    /// エクスポーター単位のデフォルト列マッピング
    mapping: Option<ColumnMapping>,

    /// デフォルトのファイル名（拡張子を除く）
    filename_stem: String,
}

impl<D: FileDownloader> DataExporter<D> {
    /// エクスポーター単位のデフォルト列マッピングを設定する
    ///
    /// `transform`と`transform_and_download`はこのマッピングを使用します。
    /// `None`を設定すると、列は先頭レコードから推論されます。
    pub fn set_data_mapping(&mut self, mapping: Option<ColumnMapping>) {
        self.mapping = mapping;
    }

    /// 現在のデフォルト列マッピング
    pub fn data_mapping(&self) -> Option<&ColumnMapping> {
        self.mapping.as_ref()
    }

    /// デフォルト列マッピングを使ってデータを変換する
    ///
    /// # 発生し得るエラー
    ///
    /// * `DataExportError::ServiceNotFound`: シリアライザーが登録されていない
    /// * シリアライザーの`transform`が返すエラー
    pub fn transform(&mut self, data: &[Value], serializer: &str) -> Result<String> {
        let mapping = self.mapping.clone();
        self.run_transform(data, serializer, mapping)
    }

    /// 列マッピングを明示してデータを変換する
    ///
    /// エクスポーターのデフォルト列マッピングは参照も変更もしません。
    pub fn transform_with_mapping(
        &mut self,
        data: &[Value],
        serializer: &str,
        mapping: Option<&ColumnMapping>,
    ) -> Result<String> {
        self.run_transform(data, serializer, mapping.cloned())
    }

    /// JSON配列として与えられたレコードを変換する
    ///
    /// # 発生し得るエラー
    ///
    /// * `DataExportError::Json`: JSONとして解析できない
    /// * `DataExportError::Config`: 最上位の値が配列ではない
    pub fn transform_json(&mut self, json: &str, serializer: &str) -> Result<String> {
        let records = parse_records(json)?;
        self.transform(&records, serializer)
    }

    /// データを変換し、ダウンローダーに保存を依頼する
    ///
    /// `filename`が`None`の場合のみ、`exportData` + シリアライザーの拡張子を使用します。
    /// `Some("")`はそのまま渡されます。
    pub fn transform_and_download(
        &mut self,
        data: &[Value],
        serializer: &str,
        filename: Option<&str>,
    ) -> Result<()> {
        let content = self.transform(data, serializer)?;
        self.download(serializer, filename, &content)
    }

    /// 列マッピングを明示してデータを変換し、ダウンローダーに保存を依頼する
    pub fn transform_and_download_with_mapping(
        &mut self,
        data: &[Value],
        serializer: &str,
        mapping: Option<&ColumnMapping>,
        filename: Option<&str>,
    ) -> Result<()> {
        let content = self.transform_with_mapping(data, serializer, mapping)?;
        self.download(serializer, filename, &content)
    }

    /// シリアライザーのレジストリ
    pub fn registry(&self) -> &SerializerRegistry {
        &self.registry
    }

    /// シリアライザーのレジストリ（可変）
    pub fn registry_mut(&mut self) -> &mut SerializerRegistry {
        &mut self.registry
    }

    /// ダウンロード処理の協調オブジェクト
    pub fn downloader(&self) -> &D {
        &self.downloader
    }

    /// エクスポーターを分解し、ダウンローダーを取り出す
    pub fn into_downloader(self) -> D {
        self.downloader
    }

    fn run_transform(
        &mut self,
        data: &[Value],
        name: &str,
        mapping: Option<ColumnMapping>,
    ) -> Result<String> {
        let serializer = self.registry.get_mut(name)?;

        debug!(
            serializer = name,
            records = data.len(),
            mapped = mapping.is_some(),
            "Running data transform"
        );

        serializer.set_mapping(mapping);
        serializer.transform(data)
    }

    fn download(&mut self, name: &str, filename: Option<&str>, content: &str) -> Result<()> {
        let serializer = self.registry.get(name)?;
        let mime_type = serializer.mime_type().to_string();
        let filename = match filename {
            Some(filename) => filename.to_string(),
            None => format!("{}{}", self.filename_stem, serializer.file_extension()),
        };

        info!(
            serializer = name,
            filename = %filename,
            mime_type = %mime_type,
            bytes = content.len(),
            "Handing export to downloader"
        );

        self.downloader.set_mime_type(&mime_type);
        self.downloader.download_file(&filename, content)
    }
}

/// JSON文字列をレコード列として解析する
pub fn parse_records(json: &str) -> Result<Vec<Value>> {
    match serde_json::from_str(json)? {
        Value::Array(records) => Ok(records),
        other => Err(DataExportError::Config(format!(
            "Expected a JSON array of records, got {}",
            match other {
                Value::Object(_) => "an object",
                Value::String(_) => "a string",
                Value::Number(_) => "a number",
                Value::Bool(_) => "a boolean",
                _ => "null",
            }
        ))),
    }
}
