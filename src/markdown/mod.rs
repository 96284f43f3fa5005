//! Markdown to HTML-flavoured markup for agent replies
//!
//! Agent text arrives a few characters at a time and is re-rendered from the
//! full accumulated buffer after every delta, so [`render`] must be a pure
//! function: the same input always yields byte-identical output.
//!
//! Supported, in the order the rewrites run:
//! - HTML escaping of `&`, `<`, `>`
//! - Pipe tables (`| a | b |` + separator line)
//! - Headings (`#`, `##`, `###`), including ones inlined mid-line
//! - Horizontal rules (`---`)
//! - Bold (`**x**`), italic (`*x*`), inline code (`` `x` ``)
//! - Line breaks, with runs of blank lines collapsed to one

mod table;

use once_cell::sync::Lazy;
use regex::Regex;

static EMPTY_HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^#{1,6}[ \t]*$").expect("Invalid empty heading regex"));

static INLINE_HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^\s#])[ \t]+(#{1,3} )").expect("Invalid inline heading regex"));

static H3_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^###[ \t]+(.+?)[ \t]*$").expect("Invalid h3 regex"));

static H2_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^##[ \t]+(.+?)[ \t]*$").expect("Invalid h2 regex"));

static H1_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^#[ \t]+(.+?)[ \t]*$").expect("Invalid h1 regex"));

static DIVIDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^-{3,}[ \t]*$").expect("Invalid divider regex"));

static BOLD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("Invalid bold regex"));

static ITALIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*([^*\n]+?)\*").expect("Invalid italic regex"));

static CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`([^`\n]+)`").expect("Invalid inline code regex"));

static BLANK_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("Invalid blank run regex"));

static MARKER_SEGMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#{1,6}[ \t]*$").expect("Invalid marker segment regex"));

static BREAK_AFTER_BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(</h[1-3]>|<hr>|</table>)(?:<br>)+").expect("Invalid block break regex")
});

static LEADING_BREAKS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A(?:\s|<br>)+").expect("Invalid leading break regex"));

static TRAILING_BREAKS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\s|<br>)+\z").expect("Invalid trailing break regex"));

const BREAK: &str = "<br>";

/// Render accumulated agent text to markup.
///
/// Incomplete markdown (an unclosed `**`, half a table) is left as literal
/// text until the rest arrives.
///
/// # Example
///
/// ```
/// use biochat::markdown::render;
///
/// assert_eq!(
///     render("## Costs\n**Spawn** is *cheap*"),
///     "<h2>Costs</h2><strong>Spawn</strong> is <em>cheap</em>"
/// );
/// ```
pub fn render(raw: &str) -> String {
    let text = escape_html(raw);
    let text = table::convert_tables(&text);
    let text = EMPTY_HEADING_RE.replace_all(&text, "");
    let text = INLINE_HEADING_RE.replace_all(&text, "${1}\n${2}");

    let text = H3_RE.replace_all(&text, "<h3>${1}</h3>");
    let text = H2_RE.replace_all(&text, "<h2>${1}</h2>");
    let text = H1_RE.replace_all(&text, "<h1>${1}</h1>");
    let text = DIVIDER_RE.replace_all(&text, "<hr>");

    let text = BOLD_RE.replace_all(&text, "<strong>${1}</strong>");
    let text = ITALIC_RE.replace_all(&text, "<em>${1}</em>");
    let text = CODE_RE.replace_all(&text, "<code>${1}</code>");

    let text = BLANK_RUN_RE.replace_all(&text, "\n\n");
    let text = text.replace('\n', BREAK);

    let text = strip_marker_segments(&text);
    let text = BREAK_AFTER_BLOCK_RE.replace_all(&text, "${1}");

    let text = LEADING_BREAKS_RE.replace(&text, "");
    TRAILING_BREAKS_RE.replace(&text, "").into_owned()
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Drop `<br>`-separated segments that hold nothing but heading markers,
/// e.g. the `##` left behind when a heading's text never arrived.
fn strip_marker_segments(text: &str) -> String {
    if !text.contains('#') {
        return text.to_string();
    }
    text.split(BREAK)
        .filter(|segment| !MARKER_SEGMENT_RE.is_match(segment))
        .collect::<Vec<_>>()
        .join(BREAK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(render(""), "");
        assert_eq!(render("\n\n\n"), "");
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(render("Mycelium grows fast."), "Mycelium grows fast.");
    }

    #[test]
    fn test_escapes_html() {
        assert_eq!(
            render("<script>alert(1)</script> & co"),
            "&lt;script&gt;alert(1)&lt;/script&gt; &amp; co"
        );
    }

    #[test]
    fn test_bold_italic_and_blank_runs() {
        let out = render("**Q1** rose *fast*\n\n\n\nNext");
        assert_eq!(out, "<strong>Q1</strong> rose <em>fast</em><br><br>Next");
        assert_eq!(out.matches("<strong>").count(), 1);
        assert_eq!(out.matches("<em>").count(), 1);
        assert!(!out.contains("<br><br><br>"));
    }

    #[test]
    fn test_inline_code() {
        assert_eq!(render("run `cargo test` now"), "run <code>cargo test</code> now");
    }

    #[test]
    fn test_spans_do_not_cross_lines() {
        assert_eq!(render("**open\nclose**"), "**open<br>close**");
        assert_eq!(render("* apples\n* pears"), "* apples<br>* pears");
    }

    #[test]
    fn test_unclosed_bold_is_literal() {
        assert_eq!(render("**Rev"), "**Rev");
    }

    #[test]
    fn test_headings() {
        assert_eq!(render("# One"), "<h1>One</h1>");
        assert_eq!(render("## Two"), "<h2>Two</h2>");
        assert_eq!(render("### Three  "), "<h3>Three</h3>");
        assert_eq!(render("#### Four"), "#### Four");
    }

    #[test]
    fn test_heading_followed_by_text_has_no_extra_break() {
        assert_eq!(
            render("## Summary\nYields doubled.\n\n### Detail\nMore."),
            "<h2>Summary</h2>Yields doubled.<br><br><h3>Detail</h3>More."
        );
    }

    #[test]
    fn test_inline_heading_gets_own_line() {
        assert_eq!(
            render("Overview complete. ## Costs\nLow."),
            "Overview complete.<br><h2>Costs</h2>Low."
        );
    }

    #[test]
    fn test_hash_without_space_is_not_heading() {
        assert_eq!(render("Use C# and #hashtags"), "Use C# and #hashtags");
    }

    #[test]
    fn test_marker_only_lines_removed() {
        assert_eq!(render("Intro\n##\nBody"), "Intro<br><br>Body");
        assert_eq!(render("Revenue ## "), "Revenue");
        assert_eq!(render("###"), "");
    }

    #[test]
    fn test_divider() {
        assert_eq!(render("Above\n---\nBelow"), "Above<br><hr>Below");
        assert_eq!(render("a --- b"), "a --- b");
    }

    #[test]
    fn test_table_block() {
        let out = render("|A|B|\n|-|-|\n|1|2|\n");
        assert_eq!(
            out,
            "<table><thead><tr><th>A</th><th>B</th></tr></thead>\
             <tbody><tr><td>1</td><td>2</td></tr></tbody></table>"
        );
        assert_eq!(out.matches("<table>").count(), 1);
    }

    #[test]
    fn test_table_followed_by_blank_line() {
        assert_eq!(
            render("|A|\n|-|\n|1|\n\nAfter"),
            "<table><thead><tr><th>A</th></tr></thead><tbody><tr><td>1</td></tr></tbody></table>After"
        );
    }

    #[test]
    fn test_leading_and_trailing_breaks_trimmed() {
        assert_eq!(render("\n\nHello\n\n"), "Hello");
    }

    #[test]
    fn test_render_is_deterministic() {
        let raw = "## Plan\n|Step|Cost|\n|--|--|\n|**Spawn**|$5|\n\nThen *wait* `7d`.\n---\n";
        let first = render(raw);
        for _ in 0..3 {
            assert_eq!(render(raw), first);
        }
    }

    #[test]
    fn test_every_prefix_renders() {
        // Every partial buffer seen during streaming must render
        let raw = "# Título\n**negrita** y *cursiva*: `código`\n|a|b|\n|-|-|\n|ñ|ü|\n";
        for (i, _) in raw.char_indices() {
            let _ = render(&raw[..i]);
        }
    }
}
