//! GFM extended autolinks: bare `http(s)://` and `www.` URLs in text

use super::model::Inline;
use regex_lite::Regex;
use std::sync::LazyLock;
use url::Url;

/// Candidate URL run; boundaries and trailing punctuation are checked after
static URL_CANDIDATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:https?://|www\.)[^\s<]+").unwrap());

/// Split a text run into text and link inlines
///
/// Returns a single `Inline::Text` when no URL is present.
pub fn split_autolinks(text: &str) -> Vec<Inline> {
    let mut out = Vec::new();
    let mut last = 0;

    for m in URL_CANDIDATE_RE.find_iter(text) {
        if !preceded_by_boundary(text, m.start()) {
            continue;
        }
        let candidate = trim_trailing(m.as_str());
        let Some(dest) = link_destination(candidate) else {
            continue;
        };

        if m.start() > last {
            out.push(Inline::Text(text[last..m.start()].to_string()));
        }
        out.push(Inline::Link {
            dest,
            title: String::new(),
            content: vec![Inline::Text(candidate.to_string())],
        });
        last = m.start() + candidate.len();
    }

    if last < text.len() || out.is_empty() {
        out.push(Inline::Text(text[last..].to_string()));
    }
    out
}

fn preceded_by_boundary(text: &str, start: usize) -> bool {
    match text[..start].chars().next_back() {
        None => true,
        Some(c) => c.is_whitespace() || matches!(c, '*' | '_' | '~' | '('),
    }
}

/// Drop trailing punctuation and unbalanced closing parentheses
fn trim_trailing(candidate: &str) -> &str {
    let mut end = candidate.len();
    loop {
        let s = &candidate[..end];
        let Some(c) = s.chars().next_back() else {
            break;
        };
        if matches!(c, '?' | '!' | '.' | ',' | ':' | '*' | '_' | '~' | '\'' | '"') {
            end -= c.len_utf8();
        } else if c == ')' && s.matches(')').count() > s.matches('(').count() {
            end -= 1;
        } else {
            break;
        }
    }
    &candidate[..end]
}

fn link_destination(candidate: &str) -> Option<String> {
    let absolute = if candidate.starts_with("www.") {
        format!("http://{}", candidate)
    } else {
        candidate.to_string()
    };

    let url = Url::parse(&absolute).ok()?;
    let host = url.host_str()?;
    if !host.contains('.') && host != "localhost" {
        return None;
    }
    Some(absolute)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn link(dest: &str, text: &str) -> Inline {
        Inline::Link {
            dest: dest.to_string(),
            title: String::new(),
            content: vec![Inline::Text(text.to_string())],
        }
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(
            split_autolinks("no links here"),
            vec![Inline::Text("no links here".into())]
        );
    }

    #[test]
    fn test_https_link() {
        assert_eq!(
            split_autolinks("see https://example.com/docs."),
            vec![
                Inline::Text("see ".into()),
                link("https://example.com/docs", "https://example.com/docs"),
                Inline::Text(".".into()),
            ]
        );
    }

    #[test]
    fn test_www_link_gets_scheme() {
        assert_eq!(
            split_autolinks("www.rust-lang.org"),
            vec![link("http://www.rust-lang.org", "www.rust-lang.org")]
        );
    }

    #[test]
    fn test_unbalanced_paren_trimmed() {
        let out = split_autolinks("(https://example.com/a_(b))");
        assert_eq!(
            out,
            vec![
                Inline::Text("(".into()),
                link("https://example.com/a_(b)", "https://example.com/a_(b)"),
                Inline::Text(")".into()),
            ]
        );
    }

    #[test]
    fn test_requires_boundary() {
        assert_eq!(
            split_autolinks("xhttps://example.com"),
            vec![Inline::Text("xhttps://example.com".into())]
        );
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(split_autolinks(""), vec![Inline::Text(String::new())]);
    }
}
