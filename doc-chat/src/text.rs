//! Small text helpers for display and saving.

/// Removes the whitespace prefix shared by all non-blank lines.
///
/// Whitespace-only lines become empty.
pub fn dedent(text: &str) -> String {
    let mut margin: Option<&str> = None;
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        let indent = &line[..line.len() - line.trim_start().len()];
        margin = Some(match margin {
            None => indent,
            Some(m) => common_prefix(m, indent),
        });
    }
    let margin = margin.unwrap_or("");

    text.lines()
        .map(|l| {
            if l.trim().is_empty() {
                ""
            } else {
                l.strip_prefix(margin).unwrap_or(l)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Escapes `$` so markdown renderers do not switch into math mode.
pub fn escape_dollars(text: &str) -> String {
    text.replace('$', "\\$")
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let end = a
        .char_indices()
        .zip(b.chars())
        .find(|((_, ca), cb)| ca != cb)
        .map(|((i, _), _)| i)
        .unwrap_or_else(|| a.len().min(b.len()));
    &a[..end]
}
