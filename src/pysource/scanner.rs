//! Groups physical source lines into logical lines.
//!
//! A logical line keeps going while a bracket is open, a triple-quoted string
//! is unterminated, or the line ends in a backslash. Comments and string
//! contents never affect bracket depth.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Quote {
    #[default]
    None,
    Single(char),
    Triple(char),
}

/// Tracks lexical state across the physical lines of one logical line.
#[derive(Debug, Default)]
struct LineScanner {
    depth: usize,
    quote: Quote,
}

impl LineScanner {
    /// Consume one physical line and report whether the logical line
    /// continues onto the next one.
    fn feed(&mut self, line: &str) -> bool {
        let chars: Vec<char> = line.chars().collect();
        let mut i = 0;
        let mut in_comment = false;
        while let Some(&ch) = chars.get(i) {
            match self.quote {
                Quote::Triple(q) => {
                    if ch == '\\' {
                        i += 1;
                    } else if is_triple(&chars, i, q) {
                        self.quote = Quote::None;
                        i += 2;
                    }
                }
                Quote::Single(q) => {
                    if ch == '\\' {
                        i += 1;
                    } else if ch == q {
                        self.quote = Quote::None;
                    }
                }
                Quote::None => match ch {
                    '#' => {
                        in_comment = true;
                        break;
                    }
                    '"' | '\'' if is_triple(&chars, i, ch) => {
                        self.quote = Quote::Triple(ch);
                        i += 2;
                    }
                    '"' | '\'' => self.quote = Quote::Single(ch),
                    '(' | '[' | '{' => self.depth += 1,
                    ')' | ']' | '}' => self.depth = self.depth.saturating_sub(1),
                    _ => {}
                },
            }
            i += 1;
        }
        let backslash = !in_comment && line.trim_end().ends_with('\\');
        if matches!(self.quote, Quote::Single(_)) && !backslash {
            self.quote = Quote::None;
        }
        backslash || self.depth > 0 || matches!(self.quote, Quote::Triple(_))
    }
}

fn is_triple(chars: &[char], at: usize, quote: char) -> bool {
    chars.get(at..at + 3).is_some_and(|run| run.iter().all(|c| *c == quote))
}

/// A run of physical lines forming one statement or blank/comment line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct LogicalLine {
    /// Index of the first physical line.
    pub start: usize,
    /// Index of the last physical line, inclusive.
    pub end: usize,
    /// Leading whitespace width of the first physical line.
    pub indent: usize,
    /// Whether the line holds only whitespace or a comment.
    pub blank: bool,
}

impl LogicalLine {
    /// Physical lines joined back together.
    pub fn text(&self, lines: &[&str]) -> String {
        lines
            .get(self.start..=self.end)
            .map(|run| run.join("\n"))
            .unwrap_or_default()
    }
}

/// Split `lines` into logical lines.
pub(super) fn logical_lines(lines: &[&str]) -> Vec<LogicalLine> {
    let mut out = Vec::new();
    let mut scanner = LineScanner::default();
    let mut i = 0;
    while let Some(first) = lines.get(i) {
        let start = i;
        let content = first.trim_start();
        let indent = first.chars().count() - content.chars().count();
        let blank = content.is_empty() || content.starts_with('#');
        loop {
            let continues = lines.get(i).is_some_and(|line| scanner.feed(line));
            i += 1;
            if !continues || i >= lines.len() {
                break;
            }
        }
        scanner = LineScanner::default();
        out.push(LogicalLine {
            start,
            end: i - 1,
            indent,
            blank,
        });
    }
    out
}
