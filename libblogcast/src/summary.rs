//! Heuristic drafts for publishing without the generative backend

use maud::html;

use crate::http::truncate_chars;
use crate::types::PostDraft;

pub const SIMPLE_TITLE_MAX_CHARS: usize = 60;
pub const SIMPLE_EXCERPT_MAX_CHARS: usize = 140;
pub const FALLBACK_TITLE: &str = "Untitled post";

/// Build a draft straight from `raw`
///
/// The title is the first line, the excerpt the flattened start of the text,
/// and the body repeats both above the full text with line breaks preserved.
pub fn simple_draft(
    raw: &str,
    tags: Vec<String>,
    categories: Vec<String>,
    slug: Option<String>,
) -> PostDraft {
    let text = raw.trim();

    let first_line = text.lines().next().unwrap_or_default();
    let title = match truncate_chars(first_line.trim(), SIMPLE_TITLE_MAX_CHARS) {
        t if t.is_empty() => FALLBACK_TITLE.to_string(),
        t => t,
    };

    let flattened = text.replace('\n', " ");
    let excerpt = if raw.chars().count() > SIMPLE_EXCERPT_MAX_CHARS {
        format!("{}...", truncate_chars(&flattened, SIMPLE_EXCERPT_MAX_CHARS))
    } else {
        flattened
    };

    let content_html = html! {
        h2 { (title) }
        p { (excerpt) }
        hr;
        div {
            p {
                @for (i, line) in text.lines().enumerate() {
                    @if i > 0 { br; }
                    (line)
                }
            }
        }
    }
    .into_string();

    PostDraft {
        title,
        excerpt,
        content_html,
        tags,
        categories,
        slug: slug.unwrap_or_default(),
    }
}
