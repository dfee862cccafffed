//! Lightweight reader for Python step modules.
//!
//! Step metadata is read straight from source text; the referenced code is
//! never imported or executed. Only top-level functions are reported, which
//! matches what a module exposes as callables. Methods and nested functions
//! stay hidden inside their enclosing block.

mod docstring;
mod scanner;

pub use docstring::cleandoc;

use docstring::string_literal;
use scanner::{LogicalLine, logical_lines};

/// A top-level function as it appears in a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSource {
    /// Function name.
    pub name: String,
    /// Source lines from the first decorator (or the `def`) to the end of
    /// the body.
    pub source_lines: Vec<String>,
    /// Cleaned docstring, when the body opens with a string literal.
    pub docstring: Option<String>,
}

impl FunctionSource {
    /// Whether the first source line carries a decorator marker.
    #[must_use]
    pub fn has_decorator(&self) -> bool {
        self.source_lines
            .first()
            .is_some_and(|line| line.contains('@'))
    }
}

fn def_name(head: &str) -> Option<String> {
    let statement = head
        .strip_prefix("async")
        .filter(|after| after.starts_with(char::is_whitespace))
        .map_or(head, str::trim_start);
    let rest = statement.strip_prefix("def")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let name: String = rest
        .trim_start()
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    (!name.is_empty()).then_some(name)
}

/// Parse every top-level function out of `source`, in source order.
///
/// # Examples
/// ```
/// use stepdoc::pysource::parse_module;
/// let src = "@given('a user')\ndef step_user(context):\n    \"\"\"Create a user.\"\"\"\n";
/// let functions = parse_module(src);
/// assert_eq!(functions.len(), 1);
/// assert_eq!(functions[0].name, "step_user");
/// assert!(functions[0].has_decorator());
/// assert_eq!(functions[0].docstring.as_deref(), Some("Create a user."));
/// ```
#[must_use]
pub fn parse_module(source: &str) -> Vec<FunctionSource> {
    let lines: Vec<&str> = source.lines().collect();
    let logical = logical_lines(&lines);
    let mut functions = Vec::new();
    let mut decorator_start: Option<usize> = None;
    let mut idx = 0;
    while let Some(line) = logical.get(idx) {
        idx += 1;
        if line.blank || line.indent > 0 {
            continue;
        }
        let head = lines.get(line.start).copied().unwrap_or_default();
        if head.starts_with('@') {
            decorator_start.get_or_insert(line.start);
            continue;
        }
        let Some(name) = def_name(head) else {
            decorator_start = None;
            continue;
        };
        let start = decorator_start.take().unwrap_or(line.start);
        let (body, consumed) = function_body(logical.get(idx..).unwrap_or_default());
        idx += consumed;
        let end = body.last().map_or(line.end, |last| last.end);
        let docstring = body
            .first()
            .and_then(|first| string_literal(&first.text(&lines)))
            .map(|doc| cleandoc(&doc));
        functions.push(FunctionSource {
            name,
            source_lines: lines
                .get(start..=end)
                .unwrap_or_default()
                .iter()
                .map(|l| (*l).to_owned())
                .collect(),
            docstring,
        });
    }
    functions
}

/// Collect the indented statements that follow a `def` line.
///
/// Returns the non-blank body lines and how many logical lines were consumed.
fn function_body(rest: &[LogicalLine]) -> (Vec<&LogicalLine>, usize) {
    let mut body = Vec::new();
    let mut consumed = 0;
    for line in rest {
        if !line.blank && line.indent == 0 {
            break;
        }
        consumed += 1;
        if !line.blank {
            body.push(line);
        }
    }
    (body, consumed)
}
