//! バックエンドAPIクライアント（reqwest）
//!
//! 1メソッド = 1リクエスト。リトライはしない。
//! 失敗（通信・ステータス・パース）はそのまま呼び出し側へ返す。

use crate::error::{PaperRagError, Result};
use crate::scanner::LocalFile;
use paper_rag_common::api::{self as endpoints, join_url};
use paper_rag_common::types::{
    ArxivSearchResponse, DeleteResponse, IngestResponse, PaperDetailResponse, PapersListResponse,
    QueryRequest, QueryResponse, Stats, UploadResponse, VoiceQueryResponse,
};
use paper_rag_common::upload::PickedFile;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout_seconds: u64) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// 送信してステータス確認後にボディを返す
    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response> {
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!(url = %response.url(), %status, "response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, %body, "API error");
            return Err(PaperRagError::ApiCall(format!("HTTP {}: {}", status, body)));
        }
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.send(request).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| PaperRagError::ApiParse(e.to_string()))
    }

    /// PDFをまとめてアップロード
    pub async fn upload_pdfs(&self, files: &[LocalFile]) -> Result<UploadResponse> {
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.read()?)
                .file_name(file.file_name())
                .mime_str(&file.mime_type())?;
            form = form.part(endpoints::UPLOAD_FIELD, part);
        }
        tracing::debug!(count = files.len(), "uploading PDFs");
        self.send_json(self.http.post(self.url(endpoints::UPLOAD_PATH)).multipart(form))
            .await
    }

    pub async fn search_arxiv(&self, query: &str, max_results: u32) -> Result<ArxivSearchResponse> {
        let body = endpoints::search_request(query, max_results);
        self.send_json(self.http.post(self.url(endpoints::ARXIV_SEARCH_PATH)).json(&body))
            .await
    }

    pub async fn ingest_papers(&self, paper_ids: &[String]) -> Result<IngestResponse> {
        let body = endpoints::ingest_request(paper_ids);
        self.send_json(self.http.post(self.url(endpoints::ARXIV_INGEST_PATH)).json(&body))
            .await
    }

    pub async fn query_text(&self, request: &QueryRequest) -> Result<QueryResponse> {
        self.send_json(self.http.post(self.url(endpoints::QUERY_TEXT_PATH)).json(request))
            .await
    }

    pub async fn stats(&self) -> Result<Stats> {
        self.send_json(self.http.get(self.url(endpoints::STATS_PATH))).await
    }

    pub async fn list_papers(&self) -> Result<PapersListResponse> {
        self.send_json(self.http.get(self.url(endpoints::PAPERS_LIST_PATH))).await
    }

    pub async fn paper_detail(&self, paper_id: &str) -> Result<PaperDetailResponse> {
        self.send_json(self.http.get(self.url(&endpoints::paper_path(paper_id))))
            .await
    }

    /// 削除はID配列をそのままJSONボディで送る
    pub async fn delete_papers(&self, paper_ids: &[String]) -> Result<DeleteResponse> {
        self.send_json(self.http.delete(self.url(endpoints::PAPERS_DELETE_PATH)).json(paper_ids))
            .await
    }

    pub async fn voice_query(&self, audio: Vec<u8>, file_name: &str, mime: &str) -> Result<VoiceQueryResponse> {
        let part = Part::bytes(audio).file_name(file_name.to_string()).mime_str(mime)?;
        let form = Form::new().part(endpoints::AUDIO_FIELD, part);
        self.send_json(self.http.post(self.url(endpoints::VOICE_QUERY_PATH)).multipart(form))
            .await
    }

    /// テキスト読み上げ。音声バイナリを返す
    pub async fn synthesize(&self, text: &str, lang: &str) -> Result<Vec<u8>> {
        let form = Form::new()
            .text("text", text.to_string())
            .text("lang", lang.to_string());
        let response = self
            .send(self.http.post(self.url(endpoints::VOICE_SYNTHESIZE_PATH)).multipart(form))
            .await?;
        Ok(response.bytes().await?.to_vec())
    }
}
