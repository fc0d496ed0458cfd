//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

/// クレート内で使用する`Result`型のエイリアス
pub type Result<T> = std::result::Result<T, DataExportError>;

/// dataexportクレート全体で使用するエラー型
///
/// レコードの変換、シリアライザーの検索、ダウンロード処理中に発生する
/// すべてのエラーを統一的に扱うために使用されます。
///
/// # エラーの種類
///
/// - `EmptyDataset`: 列マッピングなしで空のデータセットを変換しようとした
/// - `ServiceNotFound`: 未登録のシリアライザー名が指定された
/// - `UnsupportedEnvironment`: レコードのキーを列挙できない
/// - `FilterNotFound`: 未登録のヘッダーフィルターが指定された
/// - `Config`: 設定の検証に失敗した
/// - `Download`: ダウンロード先への保存を拒否した
///
/// # 使用例
///
/// ```rust
/// use dataexport::{DataExportError, ExcelSerializer, Serializer};
///
/// let serializer = ExcelSerializer::new();
/// match serializer.transform(&[]) {
///     Err(DataExportError::EmptyDataset) => {}
///     other => panic!("unexpected: {:?}", other),
/// }
/// ```
#[derive(Error, Debug)]
pub enum DataExportError {
    /// 列マッピングが設定されていない状態で空のデータセットが渡されたエラー
    ///
    /// マッピングがない場合、ヘッダーは先頭レコードのキーから推論されるため、
    /// 先頭レコードが存在しないとヘッダーを決定できません。
    #[error("Cannot derive header: dataset is empty and no column mapping is configured")]
    EmptyDataset,

    /// 指定された名前のシリアライザーが登録されていないエラー
    #[error("Serializer not found: '{0}'")]
    ServiceNotFound(String),

    /// レコードのキー列挙ができないエラー
    ///
    /// 列マッピングなしで変換する場合、先頭レコードはオブジェクトまたは配列で
    /// なければなりません。文字列や数値などのスカラー値はキーを持たないため、
    /// このエラーになります。
    #[error("Cannot transform data: {0}")]
    UnsupportedEnvironment(String),

    /// 指定された名前のヘッダーフィルターが登録されていないエラー
    #[error("Header filter not found: '{0}'")]
    FilterNotFound(String),

    /// 設定の検証に失敗したエラー
    ///
    /// ビルダーの`build()`時やシリアライザー登録時に、無効な設定が検出された
    /// 場合に発生します。
    ///
    /// # 例
    ///
    /// ```rust
    /// use dataexport::{DataExportError, ExcelSerializerBuilder};
    ///
    /// let result = ExcelSerializerBuilder::new()
    ///     .with_worksheet_name("")
    ///     .build();
    ///
    /// match result {
    ///     Err(DataExportError::Config(msg)) => {
    ///         println!("設定エラー: {}", msg);
    ///     }
    ///     _ => panic!("Expected Config error"),
    /// }
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// ダウンロード処理が拒否されたエラー
    ///
    /// 不正なファイル名（パストラバーサルなど）が指定された場合に発生します。
    #[error("Download error: {0}")]
    Download(String),

    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON入力の解析エラー
    ///
    /// `#[from]`属性により、`serde_json::Error`から自動的に変換されます。
    #[error("Failed to parse JSON records: {0}")]
    Json(#[from] serde_json::Error),
}
