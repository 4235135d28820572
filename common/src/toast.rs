//! トースト通知とタブ切り替え

use serde::{Deserialize, Serialize};

/// 表示時間(ms)
pub const TOAST_DURATION_MS: u32 = 3000;
/// フェードアウト時間(ms)
pub const TOAST_FADE_MS: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl ToastKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
            ToastKind::Info => "info",
        }
    }

    /// トースト用アイコン（lucide）
    pub fn toast_icon(&self) -> &'static str {
        match self {
            ToastKind::Success => "check-circle",
            _ => "alert-circle",
        }
    }

    /// 音声・論文管理の通知用アイコン
    pub fn notification_icon(&self) -> &'static str {
        match self {
            ToastKind::Success => "check-circle",
            ToastKind::Error => "x-circle",
            ToastKind::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub kind: ToastKind,
    /// trueなら通知スタイル（同時に1件だけ）
    pub exclusive: bool,
}

impl Toast {
    pub fn icon(&self) -> &'static str {
        if self.exclusive {
            self.kind.notification_icon()
        } else {
            self.kind.toast_icon()
        }
    }

    pub fn class(&self) -> String {
        if self.exclusive {
            format!("notification notification-{}", self.kind.as_str())
        } else {
            format!("toast {}", self.kind.as_str())
        }
    }
}

/// 表示中のトースト一覧
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Toasts {
    items: Vec<Toast>,
    next_id: u64,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// トーストを追加（積み重なる）。消去タイマー用のIDを返す
    pub fn show(&mut self, message: impl Into<String>, kind: ToastKind) -> u64 {
        let id = self.next_id();
        self.items.push(Toast {
            id,
            message: message.into(),
            kind,
            exclusive: false,
        });
        id
    }

    /// 通知を表示（既存の通知は置き換える）
    pub fn notify(&mut self, message: impl Into<String>, kind: ToastKind) -> u64 {
        self.items.retain(|t| !t.exclusive);
        let id = self.next_id();
        self.items.push(Toast {
            id,
            message: message.into(),
            kind,
            exclusive: true,
        });
        id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|t| t.id != id);
    }

    pub fn items(&self) -> &[Toast] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// サイドバーのタブ
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Tab {
    #[default]
    Upload,
    Arxiv,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::Upload, Tab::Arxiv];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Upload => "Upload PDFs",
            Tab::Arxiv => "Search ArXiv",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Tab::Upload => "upload",
            Tab::Arxiv => "search",
        }
    }

    /// `data-tab` / `{tab}Tab` の要素ID
    pub fn key(&self) -> &'static str {
        match self {
            Tab::Upload => "upload",
            Tab::Arxiv => "arxiv",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toasts_stack() {
        let mut toasts = Toasts::new();
        toasts.show("Found 2 papers", ToastKind::Success);
        toasts.show("Error uploading files", ToastKind::Error);
        assert_eq!(toasts.items().len(), 2);
        assert_eq!(toasts.items()[1].icon(), "alert-circle");
    }

    #[test]
    fn test_notify_replaces_previous_notification() {
        let mut toasts = Toasts::new();
        toasts.show("toast", ToastKind::Success);
        toasts.notify("Voice mode enabled", ToastKind::Success);
        toasts.notify("Playing response...", ToastKind::Info);

        let notifications: Vec<_> = toasts.items().iter().filter(|t| t.exclusive).collect();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].message, "Playing response...");
        assert_eq!(notifications[0].icon(), "info");
        assert_eq!(toasts.items().len(), 2);
    }

    #[test]
    fn test_dismiss() {
        let mut toasts = Toasts::new();
        let id = toasts.show("x", ToastKind::Success);
        toasts.dismiss(id);
        assert!(toasts.is_empty());
        // 二重に消しても問題ない
        toasts.dismiss(id);
    }

    #[test]
    fn test_class_names() {
        let mut toasts = Toasts::new();
        toasts.show("a", ToastKind::Error);
        toasts.notify("b", ToastKind::Error);
        assert_eq!(toasts.items()[0].class(), "toast error");
        assert_eq!(toasts.items()[1].class(), "notification notification-error");
        assert_eq!(toasts.items()[1].icon(), "x-circle");
    }

    #[test]
    fn test_tab_keys() {
        assert_eq!(Tab::default(), Tab::Upload);
        assert_eq!(Tab::Arxiv.key(), "arxiv");
    }
}
