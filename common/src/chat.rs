//! チャット（テキスト/画像クエリ）の会話モデル
//!
//! 会話履歴はDOMではなく、安定IDを持つメッセージの順序付きリストで保持する。
//! 描画はこのリストの射影。
//!
//! 送信フロー:
//! 1. 入力とAppStateの添付画像を読む（どちらも空なら何もしない）
//! 2. ユーザー吹き出しを即時追加し、入力と添付画像をクリア
//! 3. 入力中インジケータを追加
//! 4. 応答でインジケータをAI吹き出しに置き換える（失敗時は定型のお詫び文）

use crate::format::{format_segments, Segment};
use crate::state::AppState;
use crate::types::{QueryRequest, QueryResponse, Source, VoiceQueryResponse};

pub type MessageId = u64;

pub const APOLOGY_MESSAGE: &str =
    "Sorry, I encountered an error processing your request. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Ai,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Ai => "ai",
        }
    }

    /// アバターのアイコン（lucide）
    pub fn avatar_icon(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Ai => "bot",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MessageBody {
    Text(String),
    /// 応答待ちのインジケータ
    Typing,
}

/// 音声クエリ応答のメタデータ
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceMeta {
    pub route: String,
    pub latency: f64,
    pub audio_base64: Option<String>,
}

impl VoiceMeta {
    pub fn latency_label(&self) -> String {
        format!("{:.2}s", self.latency)
    }

    pub fn has_audio(&self) -> bool {
        self.audio_base64.as_deref().is_some_and(|a| !a.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: Role,
    pub body: MessageBody,
    /// ユーザーが添付した画像（data URL）
    pub image: Option<String>,
    pub sources: Vec<Source>,
    pub voice: Option<VoiceMeta>,
}

impl ChatMessage {
    pub fn is_typing(&self) -> bool {
        matches!(self.body, MessageBody::Typing)
    }

    pub fn text(&self) -> Option<&str> {
        match &self.body {
            MessageBody::Text(t) => Some(t),
            MessageBody::Typing => None,
        }
    }

    pub fn segments(&self) -> Vec<Segment> {
        self.text().map(format_segments).unwrap_or_default()
    }

    pub fn class(&self) -> String {
        format!("message {}", self.role.as_str())
    }
}

/// 送信中のクエリ
#[derive(Debug, Clone, PartialEq)]
pub struct PendingQuery {
    pub request: QueryRequest,
    pub typing_id: MessageId,
}

/// data URLからBase64部分を取り出す
///
/// `"data:image/jpeg;base64,/9j/4AAQ..."` → `"/9j/4AAQ..."`
pub fn strip_data_url_prefix(data_url: &str) -> Option<&str> {
    data_url.split(',').nth(1)
}

/// 送信リクエストを組み立てる。テキストも画像もなければNone
pub fn prepare_query(text: &str, image: Option<&str>) -> Option<QueryRequest> {
    let query = text.trim();
    if query.is_empty() && image.is_none() {
        return None;
    }
    Some(QueryRequest {
        query: query.to_string(),
        image_base64: image.and_then(strip_data_url_prefix).map(str::to_string),
    })
}

/// AI吹き出しの本文（画像キャプションがあれば先頭に付ける）
pub fn compose_ai_text(response: &QueryResponse) -> String {
    match response.image_caption.as_deref() {
        Some(caption) if !caption.is_empty() => {
            format!("[Image Analysis: {}]\n\n{}", caption, response.response)
        }
        _ => response.response.clone(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    next_id: MessageId,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// 空状態（ウェルカム表示）かどうか
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn get(&self, id: MessageId) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn has_pending(&self) -> bool {
        self.messages.iter().any(ChatMessage::is_typing)
    }

    fn push(&mut self, role: Role, body: MessageBody) -> MessageId {
        self.next_id += 1;
        let id = self.next_id;
        self.messages.push(ChatMessage {
            id,
            role,
            body,
            image: None,
            sources: Vec::new(),
            voice: None,
        });
        id
    }

    fn last_mut(&mut self) -> Option<&mut ChatMessage> {
        self.messages.last_mut()
    }

    pub fn push_user(&mut self, text: impl Into<String>, image: Option<String>) -> MessageId {
        let id = self.push(Role::User, MessageBody::Text(text.into()));
        if let Some(msg) = self.last_mut() {
            msg.image = image;
        }
        id
    }

    pub fn push_ai(&mut self, text: impl Into<String>) -> MessageId {
        self.push(Role::Ai, MessageBody::Text(text.into()))
    }

    pub fn push_typing(&mut self) -> MessageId {
        self.push(Role::Ai, MessageBody::Typing)
    }

    /// インジケータを応答で置き換える。該当がなければfalse
    pub fn resolve_typing(&mut self, id: MessageId, text: impl Into<String>, sources: Vec<Source>) -> bool {
        match self.messages.iter_mut().find(|m| m.id == id && m.is_typing()) {
            Some(msg) => {
                msg.body = MessageBody::Text(text.into());
                msg.sources = sources;
                true
            }
            None => false,
        }
    }

    /// インジケータを定型のお詫び文で置き換える
    pub fn fail_typing(&mut self, id: MessageId) -> bool {
        self.resolve_typing(id, APOLOGY_MESSAGE, Vec::new())
    }

    /// 送信開始。何も送るものがなければNone
    pub fn begin_send<F>(&mut self, state: &mut AppState<F>, input: &str) -> Option<PendingQuery> {
        let request = prepare_query(input, state.uploaded_image())?;
        let image = state.take_uploaded_image();
        self.push_user(request.query.clone(), image);
        let typing_id = self.push_typing();
        Some(PendingQuery { request, typing_id })
    }

    /// 応答を反映
    pub fn complete<E>(&mut self, typing_id: MessageId, result: Result<QueryResponse, E>) -> bool {
        match result {
            Ok(response) => {
                let text = compose_ai_text(&response);
                self.resolve_typing(typing_id, text, response.sources)
            }
            Err(_) => self.fail_typing(typing_id),
        }
    }

    /// 音声クエリ結果を追加（ユーザー: 文字起こし / AI: 応答+メタデータ）
    pub fn push_voice_reply(&mut self, reply: &VoiceQueryResponse) -> (MessageId, MessageId) {
        let user_id = self.push_user(reply.transcribed_text.clone(), None);
        let ai_id = self.push_ai(reply.response_text.clone());
        if let Some(msg) = self.last_mut() {
            msg.voice = Some(VoiceMeta {
                route: reply.route.clone(),
                latency: reply.latency,
                audio_base64: reply.audio_base64.clone(),
            });
        }
        (user_id, ai_id)
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_data_url_prefix() {
        assert_eq!(strip_data_url_prefix("data:image/png;base64,iVBORw0"), Some("iVBORw0"));
        assert_eq!(strip_data_url_prefix("no-comma"), None);
    }

    #[test]
    fn test_prepare_query_empty_is_noop() {
        assert!(prepare_query("   ", None).is_none());
    }

    #[test]
    fn test_prepare_query_image_only() {
        let req = prepare_query("", Some("data:image/jpeg;base64,/9j/4AAQ")).unwrap();
        assert_eq!(req.query, "");
        assert_eq!(req.image_base64.as_deref(), Some("/9j/4AAQ"));
    }

    #[test]
    fn test_compose_ai_text_with_caption() {
        let resp = QueryResponse {
            response: "It shows a transformer.".into(),
            image_caption: Some("a block diagram".into()),
            ..Default::default()
        };
        assert_eq!(
            compose_ai_text(&resp),
            "[Image Analysis: a block diagram]\n\nIt shows a transformer."
        );

        let plain = QueryResponse {
            response: "ok".into(),
            ..Default::default()
        };
        assert_eq!(compose_ai_text(&plain), "ok");
    }

    #[test]
    fn test_send_flow_success() {
        let mut conv = Conversation::new();
        let mut state: AppState<()> = AppState::new();
        state.set_uploaded_image("data:image/png;base64,AAAA".into());

        let pending = conv.begin_send(&mut state, " what is this? ").unwrap();
        assert_eq!(pending.request.query, "what is this?");
        assert_eq!(pending.request.image_base64.as_deref(), Some("AAAA"));
        assert!(state.uploaded_image().is_none());

        assert_eq!(conv.len(), 2);
        assert_eq!(conv.messages()[0].role, Role::User);
        assert_eq!(conv.messages()[0].image.as_deref(), Some("data:image/png;base64,AAAA"));
        assert!(conv.has_pending());

        let resp = QueryResponse {
            response: "A chart.".into(),
            sources: vec![Source {
                paper_id: "p1".into(),
                content: "...".into(),
            }],
            image_caption: None,
        };
        assert!(conv.complete::<String>(pending.typing_id, Ok(resp)));
        assert!(!conv.has_pending());
        let ai = conv.get(pending.typing_id).unwrap();
        assert_eq!(ai.text(), Some("A chart."));
        assert_eq!(ai.sources.len(), 1);
    }

    #[test]
    fn test_send_flow_failure_shows_apology() {
        let mut conv = Conversation::new();
        let mut state: AppState<()> = AppState::new();
        let pending = conv.begin_send(&mut state, "hello").unwrap();

        assert!(conv.complete(pending.typing_id, Err("network")));
        assert_eq!(conv.get(pending.typing_id).unwrap().text(), Some(APOLOGY_MESSAGE));
    }

    #[test]
    fn test_begin_send_with_nothing_keeps_empty_state() {
        let mut conv = Conversation::new();
        let mut state: AppState<()> = AppState::new();
        assert!(conv.begin_send(&mut state, "").is_none());
        assert!(conv.is_empty());
    }

    #[test]
    fn test_ids_are_stable_and_increasing() {
        let mut conv = Conversation::new();
        let a = conv.push_user("a", None);
        let b = conv.push_typing();
        let c = conv.push_ai("c");
        assert!(a < b && b < c);

        // 置き換えてもIDは変わらない
        conv.resolve_typing(b, "done", Vec::new());
        assert_eq!(conv.messages()[1].id, b);
        // 解決済みのIDは再度解決しない
        assert!(!conv.fail_typing(b));
    }

    #[test]
    fn test_push_voice_reply() {
        let mut conv = Conversation::new();
        let reply = VoiceQueryResponse {
            transcribed_text: "compare the papers".into(),
            response_text: "**Paper A** is faster.".into(),
            route: "comparison".into(),
            latency: 1.5,
            audio_base64: Some("SUQz".into()),
        };
        let (user_id, ai_id) = conv.push_voice_reply(&reply);
        assert_eq!(conv.get(user_id).unwrap().text(), Some("compare the papers"));

        let ai = conv.get(ai_id).unwrap();
        let meta = ai.voice.as_ref().unwrap();
        assert_eq!(meta.latency_label(), "1.50s");
        assert!(meta.has_audio());
        assert_eq!(ai.segments()[0], Segment::Strong("Paper A".into()));
    }
}
