//! Header Filter Module
//!
//! ヘッダーラベルに適用する名前付き整形関数のレジストリ。

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{DataExportError, Result};

/// ヘッダーラベルの整形関数
pub type HeaderFilterFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// 名前からヘッダーフィルターを引くレジストリ
///
/// 組み込みで`uppercase`と`lowercase`が登録されています。
///
/// # 使用例
///
/// ```rust
/// use dataexport::HeaderFilterRegistry;
///
/// let mut filters = HeaderFilterRegistry::new();
/// filters.register("bracket", |label: &str| format!("[{}]", label));
///
/// assert_eq!(filters.apply("uppercase", "name").unwrap(), "NAME");
/// assert_eq!(filters.apply("bracket", "name").unwrap(), "[name]");
/// assert!(filters.apply("unknown", "name").is_err());
/// ```
#[derive(Clone)]
pub struct HeaderFilterRegistry {
    filters: HashMap<String, HeaderFilterFn>,
}

impl HeaderFilterRegistry {
    /// 組み込みフィルターを登録したレジストリを生成
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register("uppercase", |s: &str| s.to_uppercase());
        registry.register("lowercase", |s: &str| s.to_lowercase());
        registry
    }

    /// フィルターが1つも登録されていないレジストリを生成
    pub fn empty() -> Self {
        Self {
            filters: HashMap::new(),
        }
    }

    /// フィルターを登録する（同名のフィルターは置き換える）
    pub fn register<F>(&mut self, name: impl Into<String>, filter: F)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.filters.insert(name.into(), Arc::new(filter));
    }

    /// 指定された名前のフィルターが登録されているか
    pub fn contains(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    /// 名前で引いたフィルターをテキストに適用する
    ///
    /// # 発生し得るエラー
    ///
    /// * `DataExportError::FilterNotFound`: フィルターが登録されていない場合
    pub fn apply(&self, name: &str, text: &str) -> Result<String> {
        let filter = self
            .filters
            .get(name)
            .ok_or_else(|| DataExportError::FilterNotFound(name.to_string()))?;
        Ok((filter.as_ref())(text))
    }
}

impl Default for HeaderFilterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HeaderFilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.filters.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("HeaderFilterRegistry")
            .field("filters", &names)
            .finish()
    }
}
