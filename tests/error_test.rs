//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use paper_rag::api::ApiClient;
use paper_rag::error::PaperRagError;
use paper_rag::scanner;
use paper_rag::session::Session;
use std::path::PathBuf;
use tempfile::tempdir;

fn offline_session() -> Session {
    Session::new(ApiClient::new("http://127.0.0.1:1", 2).unwrap())
}

/// 存在しないパスを指定した場合
#[test]
fn test_scan_nonexistent_path() {
    let result = scanner::scan_paths(&[PathBuf::from("/nonexistent/path/12345")]);
    assert!(matches!(result, Err(PaperRagError::FileNotFound(_))));
}

/// 空のフォルダは空のVec
#[test]
fn test_scan_empty_folder() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = scanner::scan_paths(&[dir.path().to_path_buf()]);
    assert!(result.unwrap().is_empty());
}

/// PDFのないフォルダは選択されない
#[test]
fn test_folder_without_pdfs() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("test.txt"), "hello").unwrap();
    std::fs::write(dir.path().join("photo.jpg"), [0xFF, 0xD8]).unwrap();

    let files = scanner::scan_paths(&[dir.path().to_path_buf()]).unwrap();
    assert_eq!(files.len(), 2);

    let mut session = offline_session();
    assert_eq!(session.select_files(files), 0);
    assert!(!session.upload.can_upload(&session.state));
}

/// 通信失敗時のアップロードはエラー表示で選択がクリアされる
#[tokio::test]
async fn test_upload_network_failure() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("paper.pdf"), b"%PDF-1.4").unwrap();

    let mut session = offline_session();
    let files = scanner::scan_paths(&[dir.path().join("paper.pdf")]).unwrap();
    assert_eq!(session.select_files(files), 1);

    let report = session.upload().await.unwrap();
    assert_eq!(report.outcome.message, "Error uploading files");
    assert!(report.response.is_none());
    assert!(report.stats.is_none());
    assert!(session.state.selected_files().is_empty());
    assert!(!session.upload.is_uploading());
}

/// 接続できなければHTTPエラー
#[tokio::test]
async fn test_stats_network_error() {
    let session = offline_session();
    let result = session.api().stats().await;
    assert!(matches!(result, Err(PaperRagError::Http(_))));
}
