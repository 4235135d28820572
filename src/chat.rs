//! 対話式チャット
//!
//! 1行ずつ入力を読み、会話モデルに流して応答を表示する。

use crate::error::Result;
use crate::render;
use crate::scanner::LocalFile;
use crate::session::Session;
use dialoguer::Input;
use std::path::PathBuf;

/// 対話アクション
#[derive(Debug, PartialEq)]
pub enum ChatAction {
    /// 質問を送信
    Send(String),
    /// 次の質問に画像を添付
    AttachImage(PathBuf),
    /// 終了
    Quit,
}

/// 入力行をアクションに変換
pub fn parse_chat_input(line: &str) -> ChatAction {
    let trimmed = line.trim();
    match trimmed {
        "/quit" | "/exit" | "/q" => ChatAction::Quit,
        _ => match trimmed.strip_prefix("/image") {
            Some(rest) if !rest.trim().is_empty() => {
                ChatAction::AttachImage(PathBuf::from(rest.trim()))
            }
            _ => ChatAction::Send(trimmed.to_string()),
        },
    }
}

/// 対話ループ
pub async fn run_interactive_chat(session: &mut Session) -> Result<()> {
    println!("💬 質問を入力してください（/image FILE で画像添付、/quit で終了）\n");

    loop {
        let line: String = Input::new()
            .with_prompt("You")
            .allow_empty(true)
            .interact_text()?;

        match parse_chat_input(&line) {
            ChatAction::Quit => break,
            ChatAction::AttachImage(path) => {
                if !path.is_file() {
                    println!("画像が見つかりません: {}", path.display());
                    continue;
                }
                match session.attach_image(&LocalFile::new(&path)) {
                    Ok(()) => println!("✔ Image uploaded! Add a message and send."),
                    Err(e) => println!("画像の読み込みに失敗: {}", e),
                }
            }
            ChatAction::Send(text) => {
                // 空入力かつ画像なしは何もしない
                if let Some(ai_id) = session.ask(&text).await {
                    if let Some(msg) = session.conversation.get(ai_id) {
                        println!("{}\n", render::message(msg));
                    }
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chat_input() {
        assert_eq!(parse_chat_input("/quit"), ChatAction::Quit);
        assert_eq!(parse_chat_input("  /q "), ChatAction::Quit);
        assert_eq!(
            parse_chat_input("/image fig.png"),
            ChatAction::AttachImage(PathBuf::from("fig.png"))
        );
        assert_eq!(parse_chat_input("/image"), ChatAction::Send("/image".into()));
        assert_eq!(parse_chat_input(" what is RAG? "), ChatAction::Send("what is RAG?".into()));
        assert_eq!(parse_chat_input(""), ChatAction::Send(String::new()));
    }
}
