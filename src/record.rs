//! Render-time step metadata.
//!
//! A [`FunctionRecord`] is built fresh for every render from a parsed
//! [`FunctionSource`] and is the unit the HTML template iterates over.

use crate::pysource::FunctionSource;
use itertools::Itertools;
use serde::Serialize;

/// Marker that opens and separates table cells in a docstring.
pub const TABLE_DELIMITER: char = '|';

/// Marker that opens a grid table border line.
pub const BORDER_MARKER: char = '+';

/// Metadata for one decorated step function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionRecord {
    /// Function name.
    pub title: String,
    /// Decorator lines with call quoting removed.
    pub decorators: Vec<String>,
    /// Cleaned docstring, if the function has one.
    pub docstring: Option<String>,
    /// Rows of the docstring table; empty when the docstring has none.
    pub table: Vec<Vec<String>>,
    /// Docstring text preceding the table.
    pub description: String,
}

impl FunctionRecord {
    /// Build a record for `function`, or `None` when it is not decorated.
    ///
    /// # Examples
    /// ```
    /// use stepdoc::pysource::parse_module;
    /// use stepdoc::record::FunctionRecord;
    /// let src = "@then('it works')\ndef step_works(context):\n    \"\"\"Checks.\"\"\"\n";
    /// let function = &parse_module(src)[0];
    /// let record = FunctionRecord::from_source(function).expect("decorated");
    /// assert_eq!(record.decorators, vec!["@then  it works"]);
    /// assert_eq!(record.description, "Checks.");
    /// ```
    #[must_use]
    pub fn from_source(function: &FunctionSource) -> Option<Self> {
        if !function.has_decorator() {
            return None;
        }
        let (table, description) = function
            .docstring
            .as_deref()
            .map(split_docstring)
            .unwrap_or_default();
        Some(Self {
            title: function.name.clone(),
            decorators: format_decorators(&function.source_lines),
            docstring: function.docstring.clone(),
            table,
            description,
        })
    }
}

/// Build records for every decorated function, ordered by name.
///
/// Functions sharing a name keep their source order.
#[must_use]
pub fn collect_records(functions: &[FunctionSource]) -> Vec<FunctionRecord> {
    functions
        .iter()
        .filter_map(FunctionRecord::from_source)
        .sorted_by(|a, b| a.title.cmp(&b.title))
        .collect()
}

/// Whether `line` opens with a lower-case decorator call such as `@given(`.
fn is_step_decorator(line: &str) -> bool {
    line.strip_prefix('@').is_some_and(|rest| {
        let name_len = rest
            .chars()
            .take_while(char::is_ascii_lowercase)
            .count();
        name_len > 0 && rest.get(name_len..).is_some_and(|tail| tail.starts_with('('))
    })
}

/// Extract and clean the step decorator lines of a function.
///
/// # Examples
/// ```
/// use stepdoc::record::format_decorators;
/// let lines = vec!["@given('a user')".to_owned(), "def step(context):".to_owned()];
/// assert_eq!(format_decorators(&lines), vec!["@given  a user"]);
/// ```
#[must_use]
pub fn format_decorators(source_lines: &[String]) -> Vec<String> {
    source_lines
        .iter()
        .filter(|line| is_step_decorator(line))
        .map(|line| {
            line.replace("('", "  ")
                .replace("')", "  ")
                .replace("(\"", "  ")
                .replace("\")", "  ")
                .replace('\\', "")
                .trim_end()
                .to_owned()
        })
        .collect()
}

fn is_table_row(line: &str) -> bool {
    line.trim_start().starts_with(TABLE_DELIMITER)
}

/// Whether `line` ends the description: a table row or a grid border.
fn is_description_end(line: &str) -> bool {
    line.trim_start().starts_with([TABLE_DELIMITER, BORDER_MARKER])
}

fn split_row(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let opened = trimmed.strip_prefix(TABLE_DELIMITER).unwrap_or(trimmed);
    opened
        .strip_suffix(TABLE_DELIMITER)
        .unwrap_or(opened)
        .split(TABLE_DELIMITER)
        .map(|cell| cell.trim().to_owned())
        .collect()
}

/// Split a docstring into its table rows and the description before them.
///
/// The description is every line before the first table row or `+` border
/// line, joined with single spaces and trimmed. Without either, the whole
/// docstring is joined that way. Border lines never become rows, and rows are
/// not checked for a consistent column count.
///
/// # Examples
/// ```
/// use stepdoc::record::split_docstring;
/// let (table, description) = split_docstring("Users:\n| name |\n| bob |");
/// assert_eq!(table, vec![vec!["name"], vec!["bob"]]);
/// assert_eq!(description, "Users:");
/// ```
#[must_use]
pub fn split_docstring(docstring: &str) -> (Vec<Vec<String>>, String) {
    let lines = docstring.lines().collect_vec();
    let end = lines
        .iter()
        .position(|line| is_description_end(line))
        .unwrap_or(lines.len());
    let table = lines
        .iter()
        .filter(|line| is_table_row(line))
        .map(|line| split_row(line))
        .collect();
    let description = lines.get(..end).unwrap_or_default().join(" ").trim().to_owned();
    (table, description)
}
