//! Serializer Registry Module
//!
//! 名前からシリアライザーを引くレジストリ。名前は登録時に検証される。

use std::collections::HashMap;
use std::fmt;

use crate::error::{DataExportError, Result};
use crate::serializer::{ExcelSerializer, Serializer};

/// 組み込みExcelシリアライザーの登録名
pub const EXCEL_SERVICE_NAME: &str = "excelExportService";

/// 組み込みExcelシリアライザーの短縮名
pub const EXCEL_SHORT_NAME: &str = "excel";

/// 旧来の呼び出し側が使う組み込みExcelシリアライザーの登録名
pub const EXCEL_LEGACY_SERVICE_NAME: &str = "dataExportExcelService";

/// 組み込みExcelシリアライザーが登録される名前の一覧
pub const EXCEL_SERVICE_NAMES: [&str; 3] =
    [EXCEL_SERVICE_NAME, EXCEL_SHORT_NAME, EXCEL_LEGACY_SERVICE_NAME];

/// シリアライザーのレジストリ
///
/// # 使用例
///
/// ```rust
/// use dataexport::{Serializer, SerializerRegistry, EXCEL_SERVICE_NAME};
///
/// let registry = SerializerRegistry::with_defaults();
/// let serializer = registry.get(EXCEL_SERVICE_NAME).unwrap();
/// assert_eq!(serializer.file_extension(), ".xls");
/// assert!(registry.get("pdfExportService").is_err());
/// ```
#[derive(Default)]
pub struct SerializerRegistry {
    serializers: HashMap<String, Box<dyn Serializer>>,
}

impl SerializerRegistry {
    /// 空のレジストリを生成
    pub fn new() -> Self {
        Self::default()
    }

    /// 組み込みのExcelシリアライザーを登録したレジストリを生成
    ///
    /// `EXCEL_SERVICE_NAMES`の各名前に個別のインスタンスが登録されるため、
    /// 名前ごとの列マッピングは共有されません。
    pub fn with_defaults() -> Self {
        let serializers = EXCEL_SERVICE_NAMES
            .iter()
            .map(|name| {
                let serializer: Box<dyn Serializer> = Box::new(ExcelSerializer::new());
                (name.to_string(), serializer)
            })
            .collect();
        Self { serializers }
    }

    /// シリアライザーを登録する
    ///
    /// # 発生し得るエラー
    ///
    /// * `DataExportError::Config`: 名前が空、または既に登録されている場合
    pub fn register(
        &mut self,
        name: impl Into<String>,
        serializer: Box<dyn Serializer>,
    ) -> Result<()> {
        let name = name.into();

        if name.trim().is_empty() {
            return Err(DataExportError::Config(
                "Serializer name must not be empty".to_string(),
            ));
        }

        if self.serializers.contains_key(&name) {
            return Err(DataExportError::Config(format!(
                "Serializer already registered: '{}'",
                name
            )));
        }

        self.serializers.insert(name, serializer);
        Ok(())
    }

    /// 名前でシリアライザーを取得する
    pub fn get(&self, name: &str) -> Result<&dyn Serializer> {
        self.serializers
            .get(name)
            .map(|s| &**s)
            .ok_or_else(|| DataExportError::ServiceNotFound(name.to_string()))
    }

    /// 名前でシリアライザーを可変参照として取得する
    pub fn get_mut(&mut self, name: &str) -> Result<&mut dyn Serializer> {
        match self.serializers.get_mut(name) {
            Some(serializer) => Ok(&mut **serializer),
            None => Err(DataExportError::ServiceNotFound(name.to_string())),
        }
    }

    /// 指定された名前が登録されているか
    pub fn contains(&self, name: &str) -> bool {
        self.serializers.contains_key(name)
    }

    /// 登録名の一覧（昇順）
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.serializers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for SerializerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializerRegistry")
            .field("serializers", &self.names())
            .finish()
    }
}
