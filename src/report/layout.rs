//! Page geometry and the pure text-layout core.
//!
//! Sanitization, greedy word wrap, and pagination run here without touching
//! the canvas; the renderer replays the result as draw calls. For a given
//! body the committed lines, their positions, and the page count are fully
//! deterministic, which is what makes layout testable without parsing PDF
//! output.
//!
//! All coordinates are PDF points with the origin at the bottom-left of the
//! page, so the cursor starts high and descends.

use crate::report::fonts::Font;

/// A4 portrait.
pub const PAGE_WIDTH: f64 = 595.28;
pub const PAGE_HEIGHT: f64 = 841.89;

/// Body face and size. Measurement and drawing must agree on both.
pub const BODY_FONT: Font = Font::Helvetica;
pub const BODY_SIZE: f64 = 11.0;
/// Vertical advance per committed body line.
pub const LINE_HEIGHT: f64 = 14.0;
/// Left edge of the body column.
pub const MARGIN_LEFT: f64 = 50.0;
/// Width available to one body line.
pub const TEXT_WIDTH: f64 = PAGE_WIDTH - 100.0;

/// Below this the current paragraph continues on a fresh page.
pub const BREAK_FLOOR: f64 = 60.0;
/// A new paragraph will not start below this.
pub const PARAGRAPH_FLOOR: f64 = 80.0;
/// Cursor position at the top of a continuation page.
pub const CONTINUATION_TOP: f64 = PAGE_HEIGHT - 60.0;
/// Extra gap between paragraphs beyond the final line advance.
pub const PARAGRAPH_GAP: f64 = 6.0;

/// Vertical anchors for the once-per-document front matter on page one.
pub const HEADER_Y: f64 = PAGE_HEIGHT - 40.0;
pub const CARD_X: f64 = 40.0;
pub const CARD_TOP: f64 = HEADER_Y - 70.0;
pub const CARD_WIDTH: f64 = PAGE_WIDTH - 80.0;
pub const CARD_HEIGHT: f64 = 200.0;
pub const RESULT_ROW_Y: f64 = CARD_TOP - CARD_HEIGHT - 30.0;
pub const DISCLAIMER_Y: f64 = RESULT_ROW_Y - 50.0;
/// Where body text starts on page one, below the front matter.
pub const BODY_START_Y: f64 = DISCLAIMER_Y - 50.0;
/// Footer baseline, present on every page.
pub const FOOTER_Y: f64 = 30.0;

/// Normalize CRLF to LF, then strip every character the built-in fonts
/// cannot measure. Newlines survive as paragraph delimiters; everything
/// else must be printable ASCII.
pub fn sanitize(text: &str) -> String {
    text.replace("\r\n", "\n")
        .chars()
        .filter(|&ch| ch == '\n' || (' '..='~').contains(&ch))
        .collect()
}

/// One committed line and the cursor position it draws at.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub y: f64,
}

/// Body lines destined for a single page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageText {
    pub lines: Vec<PlacedLine>,
}

/// Greedy wrap of one paragraph at the body font and size.
///
/// The candidate is measured with a trailing space, matching the drawn
/// inter-word gap, so a word moves to the next line just before the line
/// would touch the right edge. A single word wider than the column still
/// becomes its own line; clipping beats losing text.
pub fn wrap_paragraph(paragraph: &str) -> Vec<String> {
    let space = BODY_FONT.text_width(" ", BODY_SIZE);
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in paragraph.split_whitespace() {
        let candidate = if line.is_empty() {
            word.to_string()
        } else {
            format!("{line} {word}")
        };
        let width = BODY_FONT.text_width(&candidate, BODY_SIZE) + space;
        if width > TEXT_WIDTH && !line.is_empty() {
            lines.push(std::mem::replace(&mut line, word.to_string()));
        } else {
            line = candidate;
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Lay the sanitized body out across pages, starting at `start_y` on the
/// first page.
///
/// Paragraphs are split on `\n`. A blank paragraph only advances the
/// cursor. Mid-paragraph the cursor may not sink below [`BREAK_FLOOR`]; a
/// new paragraph may not start below [`PARAGRAPH_FLOOR`]. Either way the
/// page breaks and the cursor resets to [`CONTINUATION_TOP`].
pub fn paginate(body: &str, start_y: f64) -> Vec<PageText> {
    let mut pages: Vec<PageText> = Vec::new();
    let mut current = PageText::default();
    let mut y = start_y;

    for paragraph in body.split('\n') {
        if paragraph.trim().is_empty() {
            y -= LINE_HEIGHT;
            if y < BREAK_FLOOR {
                pages.push(std::mem::take(&mut current));
                y = CONTINUATION_TOP;
            }
            continue;
        }

        let lines = wrap_paragraph(paragraph);
        let last = lines.len() - 1;
        for (index, text) in lines.into_iter().enumerate() {
            current.lines.push(PlacedLine { text, y });
            y -= LINE_HEIGHT;
            if index != last && y < BREAK_FLOOR {
                pages.push(std::mem::take(&mut current));
                y = CONTINUATION_TOP;
            }
        }

        y -= PARAGRAPH_GAP;
        if y < PARAGRAPH_FLOOR {
            pages.push(std::mem::take(&mut current));
            y = CONTINUATION_TOP;
        }
    }

    pages.push(current);
    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_normalizes_crlf() {
        assert_eq!(sanitize("one\r\ntwo"), "one\ntwo");
    }

    #[test]
    fn test_sanitize_strips_unsupported() {
        assert_eq!(sanitize("caf\u{e9} \u{2014} ok\u{7}"), "caf  ok");
        assert_eq!(sanitize("tab\there"), "tabhere");
    }

    #[test]
    fn test_sanitize_keeps_printable_ascii_and_newlines() {
        let text = "Plain text! With ~every~ [printable] {char}.\nSecond line.";
        assert_eq!(sanitize(text), text);
    }

    #[test]
    fn test_wrap_short_paragraph_is_one_line() {
        let lines = wrap_paragraph("just a few words");
        assert_eq!(lines, vec!["just a few words".to_string()]);
    }

    #[test]
    fn test_wrap_preserves_every_word_in_order() {
        let paragraph = "alpha beta gamma delta ".repeat(40);
        let lines = wrap_paragraph(&paragraph);
        assert!(lines.len() > 1);

        let rejoined: Vec<&str> = lines
            .iter()
            .flat_map(|line| line.split_whitespace())
            .collect();
        let original: Vec<&str> = paragraph.split_whitespace().collect();
        assert_eq!(rejoined, original);
    }

    #[test]
    fn test_wrapped_lines_fit_the_column() {
        let paragraph = "the quick brown fox jumps over the lazy dog ".repeat(30);
        let space = BODY_FONT.text_width(" ", BODY_SIZE);
        for line in wrap_paragraph(&paragraph) {
            let width = BODY_FONT.text_width(&line, BODY_SIZE) + space;
            assert!(width <= TEXT_WIDTH, "line too wide: {line}");
        }
    }

    #[test]
    fn test_oversized_word_gets_its_own_line() {
        let word = "x".repeat(300);
        let lines = wrap_paragraph(&word);
        assert_eq!(lines.len(), 1);
        assert!(BODY_FONT.text_width(&lines[0], BODY_SIZE) > TEXT_WIDTH);
    }

    #[test]
    fn test_paginate_short_text_single_page() {
        let pages = paginate("one paragraph of text", BODY_START_Y);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].lines.len(), 1);
        assert_eq!(pages[0].lines[0].y, BODY_START_Y);
    }

    #[test]
    fn test_paginate_blank_paragraph_advances_cursor() {
        let pages = paginate("a\n\nb", BODY_START_Y);
        assert_eq!(pages.len(), 1);
        let lines = &pages[0].lines;
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].y, BODY_START_Y);
        // Line advance, paragraph gap, then the blank line's advance.
        let expected = BODY_START_Y - LINE_HEIGHT - PARAGRAPH_GAP - LINE_HEIGHT;
        assert_eq!(lines[1].y, expected);
    }

    #[test]
    fn test_paginate_breaks_long_paragraph_across_pages() {
        let body = "wrap me onto many lines please ".repeat(120);
        let pages = paginate(&body, BODY_START_Y);
        assert!(pages.len() >= 2, "expected a page break, got {}", pages.len());

        for page in &pages {
            assert!(!page.lines.is_empty());
            for line in &page.lines {
                assert!(line.y >= BREAK_FLOOR);
                assert!(line.y <= CONTINUATION_TOP);
            }
        }

        // Continuation pages restart at the top.
        assert_eq!(pages[1].lines[0].y, CONTINUATION_TOP);
    }

    #[test]
    fn test_paginate_cursor_descends_within_page() {
        let body = "steady descent of the cursor word by word line by line ".repeat(20);
        for page in paginate(&body, BODY_START_Y) {
            for pair in page.lines.windows(2) {
                assert!(pair[0].y > pair[1].y);
            }
        }
    }

    #[test]
    fn test_paginate_is_deterministic() {
        let body = "same input same layout ".repeat(200);
        assert_eq!(paginate(&body, BODY_START_Y), paginate(&body, BODY_START_Y));
    }

    #[test]
    fn test_paginate_empty_body() {
        let pages = paginate("", BODY_START_Y);
        assert_eq!(pages.len(), 1);
        assert!(pages[0].lines.is_empty());
    }
}
