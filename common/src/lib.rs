//! Paper RAG Client Common Library
//!
//! ブラウザ(WASM)とCLIで共有される状態・型・操作モデル

pub mod api;
pub mod chat;
pub mod error;
pub mod format;
pub mod papers;
pub mod request;
pub mod search;
pub mod selection;
pub mod state;
pub mod toast;
pub mod types;
pub mod upload;
pub mod voice;

pub use chat::{Conversation, ChatMessage, MessageBody, MessageId, Role, VoiceMeta};
pub use error::{Error, Result};
pub use format::{format_segments, Segment};
pub use papers::{PapersManager, DeleteTarget, PaperDetailView};
pub use request::RequestState;
pub use search::SearchModel;
pub use selection::Selection;
pub use state::AppState;
pub use toast::{Tab, Toast, ToastKind, Toasts};
pub use types::*;
pub use upload::{PickedFile, UploadModel};
pub use voice::{AudioPlayer, CaptureTrack, Playback, VoicePhase, VoiceSession};
