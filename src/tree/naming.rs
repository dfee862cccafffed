//! Titles and file names derived from directory and module names.

use crate::model::DOC_EXTENSION;

/// Word appended to every generated title.
pub const STEPS_SUFFIX: &str = "Steps";

/// Title-case `text` the way Python's `str.title` does.
///
/// The first letter of each run of letters is upper-cased and the rest of
/// the run lower-cased; digits and punctuation end a run.
///
/// # Examples
/// ```
/// use stepdoc::tree::naming::title_case;
/// assert_eq!(title_case("user LOGIN"), "User Login");
/// assert_eq!(title_case("step2go"), "Step2Go");
/// ```
#[must_use]
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

/// Append `suffix` as a separate word unless `title` already ends with it.
#[must_use]
pub fn append_to_title(title: &str, suffix: &str) -> String {
    let already = title == suffix
        || title
            .strip_suffix(suffix)
            .is_some_and(|head| head.ends_with(' '));
    if already {
        title.to_owned()
    } else {
        format!("{title} {suffix}")
    }
}

/// Human readable document title for a directory or module name.
///
/// # Examples
/// ```
/// use stepdoc::tree::naming::doc_title;
/// assert_eq!(doc_title("user_login"), "User Login Steps");
/// assert_eq!(doc_title("common_steps"), "Common Steps");
/// ```
#[must_use]
pub fn doc_title(name: &str) -> String {
    append_to_title(&title_case(&name.replace('_', " ")), STEPS_SUFFIX)
}

/// File name of the index document generated for a category directory.
///
/// # Examples
/// ```
/// use stepdoc::tree::naming::index_file_name;
/// assert_eq!(index_file_name("user_login"), "user-login.rst");
/// ```
#[must_use]
pub fn index_file_name(name: &str) -> String {
    format!("{}.{DOC_EXTENSION}", name.replace('_', "-"))
}

/// File name of the leaf document generated for a step module.
#[must_use]
pub fn leaf_file_name(name: &str) -> String {
    format!("{}-steps.{DOC_EXTENSION}", name.replace('_', "-"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("login", "Login Steps")]
    #[case("user_account", "User Account Steps")]
    #[case("steps", "Steps")]
    #[case("shared_steps", "Shared Steps")]
    #[case("api_v2", "Api V2 Steps")]
    #[case("footsteps", "Footsteps Steps")]
    fn titles(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(doc_title(name), expected);
    }

    #[rstest]
    #[case("user_account", "user-account.rst", "user-account-steps.rst")]
    #[case("foo-bar", "foo-bar.rst", "foo-bar-steps.rst")]
    #[case("foo_bar", "foo-bar.rst", "foo-bar-steps.rst")]
    fn file_names(#[case] name: &str, #[case] index: &str, #[case] leaf: &str) {
        assert_eq!(index_file_name(name), index);
        assert_eq!(leaf_file_name(name), leaf);
    }
}
