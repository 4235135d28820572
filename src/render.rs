//! 端末表示用の整形
//!
//! 表示モデル（common側）を文字列にするだけ。出力は呼び出し側で行う。

use paper_rag_common::chat::{ChatMessage, Role};
use paper_rag_common::format::plain_text;
use paper_rag_common::papers::{PaperDetailView, PapersManager};
use paper_rag_common::search::ResultItem;
use paper_rag_common::types::{IngestResponse, Stats};

pub fn stats_line(stats: &Stats) -> String {
    format!("📚 {} papers / {} chunks", stats.papers_count, stats.chunks_count)
}

pub fn message(msg: &ChatMessage) -> String {
    let speaker = match msg.role {
        Role::User => "🧑 You",
        Role::Ai => "🤖 AI",
    };

    if msg.is_typing() {
        return format!("{}: ...", speaker);
    }

    let mut out = format!("{}: {}", speaker, plain_text(&msg.segments()));
    if msg.image.is_some() {
        out.push_str("\n   [image attached]");
    }
    if let Some(voice) = &msg.voice {
        out.push_str(&format!(
            "\n   route: {} | latency: {} | Voice Query",
            voice.route,
            voice.latency_label()
        ));
    }
    for source in &msg.sources {
        out.push_str(&format!("\n   - [{}] {}", source.paper_id, source.content));
    }
    out
}

pub fn result_items(items: &[ResultItem]) -> String {
    items
        .iter()
        .map(|item| {
            format!(
                "{:>3}. {} [{}]\n     {}\n     {}",
                item.index + 1,
                item.title,
                item.id,
                item.authors,
                item.published
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// 選択肢用の1行表示
pub fn result_choice(item: &ResultItem) -> String {
    format!("{} ({}, {})", item.title, item.id, item.published)
}

pub fn ingest_breakdown(resp: &IngestResponse) -> String {
    let mut lines = Vec::new();
    if !resp.message.is_empty() {
        lines.push(resp.message.clone());
    }
    for paper in &resp.papers {
        lines.push(format!("  ✔ {} ({} chunks)", paper.paper_id, paper.chunks_added));
    }
    for failed in &resp.failed {
        lines.push(format!("  ✘ {}: {} [{}]", failed.paper_id, failed.error, failed.status));
    }
    lines.join("\n")
}

pub fn papers(mgr: &PapersManager) -> String {
    let rows = mgr.rows();
    if rows.is_empty() {
        return format!(
            "{}\nNo papers found\nUpload PDFs or search ArXiv to add papers",
            mgr.count_label()
        );
    }

    let mut out = vec![mgr.count_label().to_string()];
    for row in rows {
        out.push(format!(
            "  {} {}\n     ID: {} | {} | {}",
            if row.selected { "[x]" } else { "[ ]" },
            row.title,
            row.paper_id,
            row.chunks_label,
            row.size_label
        ));
    }
    out.join("\n")
}

pub fn paper_detail(view: &PaperDetailView) -> String {
    let mut out = vec![
        format!("📄 {}", view.title),
        format!("Paper ID: {}", view.paper_id),
        format!("Total Chunks: {}", view.total_chunks),
        String::new(),
        "Chunks Preview".to_string(),
    ];
    for preview in &view.previews {
        out.push(format!("--- {} ({})", preview.label, preview.chunk_type));
        out.push(preview.excerpt.clone());
    }
    if let Some(remaining) = view.remaining_label() {
        out.push(remaining);
    }
    out.join("\n")
}
