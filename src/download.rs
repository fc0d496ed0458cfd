//! Download Module
//!
//! 変換結果をファイルとして保存する協調オブジェクトの抽象と、
//! ディレクトリ保存・メモリ保持の2つの実装を提供するモジュール。

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{DataExportError, Result};

/// 変換結果を受け取り、ファイルとして保存する協調オブジェクト
pub trait FileDownloader {
    /// 次に保存するファイルのMIMEタイプを設定する
    fn set_mime_type(&mut self, mime_type: &str);

    /// ファイルを保存する
    fn download_file(&mut self, filename: &str, content: &str) -> Result<()>;
}

/// 指定ディレクトリにファイルを書き出すダウンローダー
///
/// # 使用例
///
/// ```rust,no_run
/// use dataexport::{DirectoryDownloader, FileDownloader};
///
/// # fn main() -> Result<(), dataexport::DataExportError> {
/// let mut downloader = DirectoryDownloader::new("exports");
/// downloader.set_mime_type("application/vnd.ms-excel");
/// downloader.download_file("report.xls", "<html></html>")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DirectoryDownloader {
    /// 保存先ディレクトリ
    directory: PathBuf,

    /// 最後に設定されたMIMEタイプ
    mime_type: Option<String>,
}

impl DirectoryDownloader {
    /// 保存先ディレクトリを指定して生成
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            mime_type: None,
        }
    }

    /// 保存先ディレクトリ
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// 最後に設定されたMIMEタイプ
    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }
}

impl FileDownloader for DirectoryDownloader {
    fn set_mime_type(&mut self, mime_type: &str) {
        self.mime_type = Some(mime_type.to_string());
    }

    fn download_file(&mut self, filename: &str, content: &str) -> Result<()> {
        validate_filename(filename)?;

        fs::create_dir_all(&self.directory)?;
        let path = self.directory.join(filename);
        fs::write(&path, content)?;

        debug!(
            "Saved {} bytes to {} ({})",
            content.len(),
            path.display(),
            self.mime_type.as_deref().unwrap_or("unknown mime type")
        );
        Ok(())
    }
}

/// メモリ上に保存されたファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    pub filename: String,
    pub mime_type: Option<String>,
    pub content: String,
}

/// 保存要求をメモリに記録するダウンローダー
#[derive(Debug, Clone, Default)]
pub struct MemoryDownloader {
    mime_type: Option<String>,
    files: Vec<DownloadedFile>,
}

impl MemoryDownloader {
    pub fn new() -> Self {
        Self::default()
    }

    /// 記録されたファイル（保存順）
    pub fn files(&self) -> &[DownloadedFile] {
        &self.files
    }

    /// 最後に記録されたファイル
    pub fn last(&self) -> Option<&DownloadedFile> {
        self.files.last()
    }
}

impl FileDownloader for MemoryDownloader {
    fn set_mime_type(&mut self, mime_type: &str) {
        self.mime_type = Some(mime_type.to_string());
    }

    fn download_file(&mut self, filename: &str, content: &str) -> Result<()> {
        self.files.push(DownloadedFile {
            filename: filename.to_string(),
            mime_type: self.mime_type.clone(),
            content: content.to_string(),
        });
        Ok(())
    }
}

/// 保存ファイル名の検証
///
/// パストラバーサルを防ぐため、ディレクトリ成分を含む名前を拒否します。
fn validate_filename(filename: &str) -> Result<()> {
    if filename.is_empty() {
        return Err(DataExportError::Download(
            "Empty filename is not allowed".to_string(),
        ));
    }

    if filename.contains('/') || filename.contains('\\') {
        return Err(DataExportError::Download(format!(
            "Path separator in filename is not allowed: {}",
            filename
        )));
    }

    if filename.contains("..") {
        return Err(DataExportError::Download(format!(
            "Path traversal detected: {}",
            filename
        )));
    }

    Ok(())
}
