use crate::error::{PaperRagError, Result};
use paper_rag_common::upload::PickedFile;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// ローカルファイル（アップロード・画像添付・音声クエリ用）
#[derive(Debug, Clone, PartialEq)]
pub struct LocalFile {
    pub path: PathBuf,
    pub file_name: String,
}

impl LocalFile {
    pub fn new(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self {
            path: path.to_path_buf(),
            file_name,
        }
    }

    pub fn read(&self) -> Result<Vec<u8>> {
        Ok(std::fs::read(&self.path)?)
    }
}

impl PickedFile for LocalFile {
    fn file_name(&self) -> String {
        self.file_name.clone()
    }

    fn mime_type(&self) -> String {
        mime_from_path(&self.path).to_string()
    }
}

/// 拡張子からMIMEタイプを推定
pub fn mime_from_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "webm" => "audio/webm",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "m4a" => "audio/mp4",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

/// 指定パスを展開する
///
/// フォルダは直下のファイルのみ（再帰しない）、ファイル名順。
/// PDFかどうかの判定は呼び出し側（アップロードモデル）で行う。
pub fn scan_paths(paths: &[PathBuf]) -> Result<Vec<LocalFile>> {
    let mut files = Vec::new();

    for path in paths {
        if !path.exists() {
            return Err(PaperRagError::FileNotFound(path.display().to_string()));
        }

        if path.is_file() {
            files.push(LocalFile::new(path));
            continue;
        }

        let mut in_dir: Vec<LocalFile> = WalkDir::new(path)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file())
            .map(|e| LocalFile::new(e.path()))
            .collect();
        in_dir.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        files.extend(in_dir);
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_mime_from_path() {
        assert_eq!(mime_from_path(Path::new("a.pdf")), "application/pdf");
        assert_eq!(mime_from_path(Path::new("A.PDF")), "application/pdf");
        assert_eq!(mime_from_path(Path::new("x.jpeg")), "image/jpeg");
        assert_eq!(mime_from_path(Path::new("rec.webm")), "audio/webm");
        assert_eq!(mime_from_path(Path::new("noext")), "application/octet-stream");
    }

    #[test]
    fn test_scan_missing_path() {
        let result = scan_paths(&[PathBuf::from("/nonexistent/paper-rag/12345")]);
        assert!(matches!(result, Err(PaperRagError::FileNotFound(_))));
    }

    #[test]
    fn test_scan_folder_sorted_non_recursive() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("b.pdf")).unwrap();
        File::create(dir.path().join("a.pdf")).unwrap();
        File::create(dir.path().join("notes.txt")).unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        File::create(dir.path().join("sub").join("c.pdf")).unwrap();

        let files = scan_paths(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf", "notes.txt"]);
    }
}
