//! バックエンドAPI連携（fetch）
//!
//! 同一オリジンの `/api/*` を呼ぶ。1関数 = 1リクエスト、リトライなし。
//! 失敗は `paper_rag_common::Error` にして呼び出し側のハンドラへ返す。

use crate::files::WebFile;
use paper_rag_common::api::{self as endpoints, join_url};
use paper_rag_common::error::{Error, Result};
use paper_rag_common::types::{
    ArxivSearchResponse, DeleteResponse, IngestResponse, PaperDetailResponse, PapersListResponse,
    QueryRequest, QueryResponse, Stats, UploadResponse, VoiceQueryResponse,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, FormData, Request, RequestInit, RequestMode, Response};

/// 同一オリジン
const BASE_URL: &str = "";

fn js_err(e: JsValue) -> Error {
    Error::Network(format!("{:?}", e))
}

/// リクエスト本体
enum Body {
    Empty,
    Json(String),
    Form(FormData),
}

/// 送信してステータスを確認
async fn send(method: &str, path: &str, body: Body) -> Result<Response> {
    let opts = RequestInit::new();
    opts.set_method(method);
    opts.set_mode(RequestMode::SameOrigin);

    let is_json = matches!(body, Body::Json(_));
    match body {
        Body::Empty => {}
        Body::Json(text) => opts.set_body(&JsValue::from_str(&text)),
        Body::Form(form) => opts.set_body(&form),
    }

    let url = join_url(BASE_URL, path);
    let request = Request::new_with_str_and_init(&url, &opts).map_err(js_err)?;
    if is_json {
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(js_err)?;
    }

    let window = web_sys::window().ok_or_else(|| Error::Network("no window".into()))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_err)?;
    let resp: Response = resp_value.dyn_into().map_err(js_err)?;

    if !resp.ok() {
        return Err(Error::status(resp.status(), resp.status_text()));
    }
    Ok(resp)
}

async fn send_json<T: DeserializeOwned>(method: &str, path: &str, body: Body) -> Result<T> {
    let resp = send(method, path, body).await?;
    let text = JsFuture::from(resp.text().map_err(js_err)?)
        .await
        .map_err(js_err)?
        .as_string()
        .unwrap_or_default();
    Ok(serde_json::from_str(&text)?)
}

fn json_body<B: Serialize + ?Sized>(body: &B) -> Result<Body> {
    Ok(Body::Json(serde_json::to_string(body)?))
}

/// PDFをまとめてアップロード（フィールド名 `files`）
pub async fn upload_pdfs(files: &[WebFile]) -> Result<UploadResponse> {
    let form = FormData::new().map_err(js_err)?;
    for file in files {
        form.append_with_blob_and_filename(endpoints::UPLOAD_FIELD, &file.0, &file.0.name())
            .map_err(js_err)?;
    }
    send_json("POST", endpoints::UPLOAD_PATH, Body::Form(form)).await
}

pub async fn search_arxiv(query: &str, max_results: u32) -> Result<ArxivSearchResponse> {
    let body = json_body(&endpoints::search_request(query, max_results))?;
    send_json("POST", endpoints::ARXIV_SEARCH_PATH, body).await
}

pub async fn ingest_papers(paper_ids: &[String]) -> Result<IngestResponse> {
    let body = json_body(&endpoints::ingest_request(paper_ids))?;
    send_json("POST", endpoints::ARXIV_INGEST_PATH, body).await
}

pub async fn query_text(request: &QueryRequest) -> Result<QueryResponse> {
    send_json("POST", endpoints::QUERY_TEXT_PATH, json_body(request)?).await
}

pub async fn stats() -> Result<Stats> {
    send_json("GET", endpoints::STATS_PATH, Body::Empty).await
}

pub async fn list_papers() -> Result<PapersListResponse> {
    send_json("GET", endpoints::PAPERS_LIST_PATH, Body::Empty).await
}

pub async fn paper_detail(paper_id: &str) -> Result<PaperDetailResponse> {
    send_json("GET", &endpoints::paper_path(paper_id), Body::Empty).await
}

/// ID配列をそのままJSONで送る
pub async fn delete_papers(paper_ids: &[String]) -> Result<DeleteResponse> {
    send_json("DELETE", endpoints::PAPERS_DELETE_PATH, json_body(paper_ids)?).await
}

/// 録音を送信（フィールド名 `audio`, `recording.webm`）
pub async fn voice_query(audio: &Blob) -> Result<VoiceQueryResponse> {
    let form = FormData::new().map_err(js_err)?;
    form.append_with_blob_and_filename(endpoints::AUDIO_FIELD, audio, endpoints::AUDIO_FILE_NAME)
        .map_err(js_err)?;
    send_json("POST", endpoints::VOICE_QUERY_PATH, Body::Form(form)).await
}

/// テキスト読み上げ。音声Blobを返す
pub async fn synthesize(text: &str, lang: &str) -> Result<Blob> {
    let form = FormData::new().map_err(js_err)?;
    form.append_with_str("text", text).map_err(js_err)?;
    form.append_with_str("lang", lang).map_err(js_err)?;

    let resp = send("POST", endpoints::VOICE_SYNTHESIZE_PATH, Body::Form(form)).await?;
    let blob = JsFuture::from(resp.blob().map_err(js_err)?)
        .await
        .map_err(js_err)?;
    blob.dyn_into().map_err(js_err)
}
