//! String literal extraction and docstring cleaning.

const TAB_WIDTH: usize = 8;

/// Return the value of a leading string literal in `statement`.
///
/// Only plain and raw/unicode-prefixed literals qualify; f-strings and bytes
/// literals are not docstrings. Returns `None` when the statement does not
/// start with a string or the literal is unterminated.
pub(super) fn string_literal(statement: &str) -> Option<String> {
    let text = statement.trim_start();
    let prefix_len = text
        .chars()
        .take_while(|c| matches!(c, 'r' | 'R' | 'u' | 'U'))
        .count();
    if prefix_len > 1 {
        return None;
    }
    let (prefix, rest) = text.split_at(prefix_len);
    let raw = prefix.eq_ignore_ascii_case("r");
    let quote = rest.chars().next().filter(|c| matches!(c, '"' | '\''))?;
    let triple: String = [quote; 3].iter().collect();
    let (delimiter, opened) = rest
        .strip_prefix(triple.as_str())
        .map_or_else(|| (quote.to_string(), rest.get(1..)), |body| (triple.clone(), Some(body)));
    let body = opened?;
    let end = closing_index(body, &delimiter)?;
    let content = body.get(..end)?;
    Some(if raw {
        content.to_owned()
    } else {
        unescape(content)
    })
}

fn closing_index(body: &str, delimiter: &str) -> Option<usize> {
    let mut escaped = false;
    for (idx, ch) in body.char_indices() {
        if escaped {
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if body.get(idx..).is_some_and(|tail| tail.starts_with(delimiter)) {
            return Some(idx);
        }
    }
    None
}

fn unescape(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('\n') => {}
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(c @ ('\\' | '\'' | '"')) => out.push(c),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn expand_tabs(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut column = 0usize;
    for ch in line.chars() {
        if ch == '\t' {
            let pad = TAB_WIDTH - column.rem_euclid(TAB_WIDTH);
            out.extend(std::iter::repeat_n(' ', pad));
            column += pad;
        } else {
            out.push(ch);
            column += 1;
        }
    }
    out
}

fn leading_whitespace(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Normalise docstring indentation the way Python's `inspect.cleandoc` does.
///
/// Tabs are expanded, the first line is left-trimmed, the smallest
/// indentation of the remaining non-blank lines is removed from each of them,
/// and leading and trailing blank lines are dropped.
///
/// # Examples
/// ```
/// use stepdoc::pysource::cleandoc;
/// let doc = "Log in.\n\n        | user |\n        | bob  |\n    ";
/// assert_eq!(cleandoc(doc), "Log in.\n\n| user |\n| bob  |");
/// ```
#[must_use]
pub fn cleandoc(doc: &str) -> String {
    let mut lines: Vec<String> = doc.split('\n').map(expand_tabs).collect();
    let margin = lines
        .iter()
        .skip(1)
        .filter(|line| !line.trim_start().is_empty())
        .map(|line| leading_whitespace(line))
        .min();
    if let Some(first) = lines.first_mut() {
        *first = first.trim_start().to_owned();
    }
    if let Some(margin) = margin {
        for line in lines.iter_mut().skip(1) {
            *line = line.chars().skip(margin).collect();
        }
    }
    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    let leading = lines.iter().take_while(|line| line.is_empty()).count();
    lines.drain(..leading);
    lines.join("\n")
}
