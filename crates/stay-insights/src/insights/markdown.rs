//! Minimal markdown-to-HTML rendering for model answers.
//!
//! Supported grammar, applied after HTML-escaping the input:
//!
//! * `**text**` becomes `<strong>text</strong>`
//! * `*text*` becomes `<em>text</em>`
//! * consecutive lines starting with `* ` or `- ` become one `<ul>`
//! * consecutive lines starting with `1. `, `2. `, ... become one `<ol>`
//! * remaining lines are joined with `<br/>`
//!
//! Anything else (headings, links, code) passes through as escaped text.

use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    const fn open_tag(self) -> &'static str {
        match self {
            Self::Unordered => "<ul>",
            Self::Ordered => "<ol>",
        }
    }

    const fn close_tag(self) -> &'static str {
        match self {
            Self::Unordered => "</ul>",
            Self::Ordered => "</ol>",
        }
    }
}

fn bullet_item() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\s*[*-]\s+(.*)$").expect("bullet pattern compiles"))
}

fn numbered_item() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\s*\d+\.\s+(.*)$").expect("numbered pattern compiles"))
}

fn bold() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold pattern compiles"))
}

fn italic() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\*([^*\s](?:[^*]*[^*\s])?)\*").expect("italic pattern compiles"))
}

fn list_item(line: &str) -> Option<(ListKind, &str)> {
    let (kind, captures) = if let Some(captures) = bullet_item().captures(line) {
        (ListKind::Unordered, captures)
    } else {
        (ListKind::Ordered, numbered_item().captures(line)?)
    };
    captures.get(1).map(|item| (kind, item.as_str()))
}

fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn render_inline(text: &str) -> String {
    let text = bold().replace_all(text, "<strong>$1</strong>");
    italic().replace_all(&text, "<em>$1</em>").into_owned()
}

pub fn render_markdown(input: &str) -> String {
    let escaped = escape_html(input);
    let mut html = String::with_capacity(escaped.len() + 32);
    let mut open_list: Option<ListKind> = None;
    let mut previous_was_text = false;

    for line in escaped.lines() {
        if let Some((kind, item)) = list_item(line) {
            if open_list != Some(kind) {
                if let Some(current) = open_list {
                    html.push_str(current.close_tag());
                }
                html.push_str(kind.open_tag());
                open_list = Some(kind);
            }
            html.push_str("<li>");
            html.push_str(&render_inline(item));
            html.push_str("</li>");
            previous_was_text = false;
            continue;
        }

        if let Some(current) = open_list.take() {
            html.push_str(current.close_tag());
        } else if previous_was_text {
            html.push_str("<br/>");
        }
        html.push_str(&render_inline(line));
        previous_was_text = true;
    }

    if let Some(current) = open_list {
        html.push_str(current.close_tag());
    }

    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_emphasis() {
        assert_eq!(
            render_markdown("**Airbnb** drove *most* revenue"),
            "<strong>Airbnb</strong> drove <em>most</em> revenue"
        );
    }

    #[test]
    fn groups_bullets_into_one_list() {
        let html = render_markdown("Highlights:\n* Revenue up\n- **Direct** grew\nThanks");
        assert_eq!(
            html,
            "Highlights:<ul><li>Revenue up</li><li><strong>Direct</strong> grew</li></ul>Thanks"
        );
    }

    #[test]
    fn numbered_lines_become_ordered_list() {
        let html = render_markdown("1. Raise weekend rates\n2. Add a minimum stay");
        assert_eq!(
            html,
            "<ol><li>Raise weekend rates</li><li>Add a minimum stay</li></ol>"
        );
    }

    #[test]
    fn switching_list_kind_closes_previous_list() {
        let html = render_markdown("- a\n1. b");
        assert_eq!(html, "<ul><li>a</li></ul><ol><li>b</li></ol>");
    }

    #[test]
    fn plain_lines_are_joined_with_breaks() {
        assert_eq!(render_markdown("one\n\ntwo"), "one<br/><br/>two");
    }

    #[test]
    fn html_is_escaped_before_formatting() {
        assert_eq!(
            render_markdown("<script>alert('x')</script> & **ok**"),
            "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; <strong>ok</strong>"
        );
    }

    #[test]
    fn stray_asterisks_are_left_alone() {
        assert_eq!(render_markdown("2 * 3 = 6"), "2 * 3 = 6");
        assert_eq!(render_markdown(""), "");
    }
}
