//! 論文RAGアプリの端末クライアント

pub mod api;
pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod render;
pub mod scanner;
pub mod session;
