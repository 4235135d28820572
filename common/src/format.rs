//! メッセージ本文の簡易書式
//!
//! `**太字**`、`*斜体*`、`` `コード` `` と改行だけを解釈し、型付きセグメントに分解する。
//! HTML文字列は組み立てないので、本文はそのままテキストノードとして描画される。
//! 書式は改行をまたいでもよく、その場合は改行ごとに同じ種類のセグメントに分かれる。

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref INLINE_RE: Regex = Regex::new(r"(?s)\*\*(.+?)\*\*|\*(.+?)\*|`(.+?)`").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Strong(String),
    Emphasis(String),
    Code(String),
    LineBreak,
}

/// 本文をセグメント列に分解
pub fn format_segments(text: &str) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut last = 0;

    for caps in INLINE_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        push_lines(&text[last..whole.start()], Segment::Text, &mut out);

        if let Some(m) = caps.get(1) {
            push_lines(m.as_str(), Segment::Strong, &mut out);
        } else if let Some(m) = caps.get(2) {
            push_lines(m.as_str(), Segment::Emphasis, &mut out);
        } else if let Some(m) = caps.get(3) {
            push_lines(m.as_str(), Segment::Code, &mut out);
        } else {
            push_lines(whole.as_str(), Segment::Text, &mut out);
        }
        last = whole.end();
    }

    push_lines(&text[last..], Segment::Text, &mut out);
    out
}

/// 改行で分けて `wrap` のセグメントと LineBreak を並べる（空の部分は出さない）
fn push_lines(text: &str, wrap: fn(String) -> Segment, out: &mut Vec<Segment>) {
    for (i, part) in text.split('\n').enumerate() {
        if i > 0 {
            out.push(Segment::LineBreak);
        }
        if !part.is_empty() {
            out.push(wrap(part.to_string()));
        }
    }
}

/// セグメントをプレーンテキストに戻す（端末表示用）
pub fn plain_text(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| match s {
            Segment::Text(t) | Segment::Strong(t) | Segment::Emphasis(t) | Segment::Code(t) => t.as_str(),
            Segment::LineBreak => "\n",
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passthrough() {
        assert_eq!(
            format_segments("hello world"),
            vec![Segment::Text("hello world".into())]
        );
    }

    #[test]
    fn test_line_breaks() {
        assert_eq!(
            format_segments("a\n\nb"),
            vec![
                Segment::Text("a".into()),
                Segment::LineBreak,
                Segment::LineBreak,
                Segment::Text("b".into()),
            ]
        );
    }

    #[test]
    fn test_inline_markup() {
        let segments = format_segments("use **bold**, *em* and `code` here");
        assert_eq!(
            segments,
            vec![
                Segment::Text("use ".into()),
                Segment::Strong("bold".into()),
                Segment::Text(", ".into()),
                Segment::Emphasis("em".into()),
                Segment::Text(" and ".into()),
                Segment::Code("code".into()),
                Segment::Text(" here".into()),
            ]
        );
    }

    #[test]
    fn test_markup_spanning_line_break() {
        assert_eq!(
            format_segments("**a\nb** then *c\nd*"),
            vec![
                Segment::Strong("a".into()),
                Segment::LineBreak,
                Segment::Strong("b".into()),
                Segment::Text(" then ".into()),
                Segment::Emphasis("c".into()),
                Segment::LineBreak,
                Segment::Emphasis("d".into()),
            ]
        );
        assert_eq!(plain_text(&format_segments("**a\nb**")), "a\nb");
    }

    #[test]
    fn test_html_is_not_interpreted() {
        let segments = format_segments("<img src=x onerror=alert(1)>");
        assert_eq!(segments, vec![Segment::Text("<img src=x onerror=alert(1)>".into())]);
    }

    #[test]
    fn test_unclosed_marker_stays_text() {
        assert_eq!(format_segments("2 * 3"), vec![Segment::Text("2 * 3".into())]);
    }

    #[test]
    fn test_plain_text_roundtrip_drops_markers() {
        let text = "**Answer**\nsee `fig 1`";
        assert_eq!(plain_text(&format_segments(text)), "Answer\nsee fig 1");
    }
}
