//! UIコンポーネント

pub mod arxiv_search;
pub mod chat_panel;
pub mod header;
pub mod message;
pub mod papers_modal;
pub mod sidebar;
pub mod toast;
pub mod upload_area;
pub mod voice_panel;
