//! Line-oriented substring search in multi-line text.
//!
//! Text is split on `\n` and each line is searched independently, so a
//! pattern that itself spans a newline never matches. A trailing `\r` stays
//! part of its line. An empty pattern matches any text, including the empty
//! string.

/// Returns true if any line of `text` contains `pattern` (case-sensitive).
///
/// # Examples
///
/// ```rust
/// use gome::text::text_contains;
///
/// let log = "starting\nERROR: disk full\nstopping";
/// assert!(text_contains(log, "disk full"));
/// assert!(!text_contains(log, "error"));
/// assert!(!text_contains(log, "starting\nERROR"));
/// ```
pub fn text_contains(text: &str, pattern: &str) -> bool {
    text.split('\n').any(|line| line.contains(pattern))
}

/// Returns true if any line of `text` contains `pattern`, ignoring case.
///
/// Both sides are compared in Unicode lowercase form.
///
/// # Examples
///
/// ```rust
/// use gome::text::text_contains_no_case;
///
/// assert!(text_contains_no_case("Grüße\nAUS BERLIN", "aus berlin"));
/// assert!(text_contains_no_case("ΣΟΦΙΑ", "σοφ"));
/// ```
pub fn text_contains_no_case(text: &str, pattern: &str) -> bool {
    let pattern = pattern.to_lowercase();
    text.split('\n').any(|line| line.to_lowercase().contains(&pattern))
}

/// Returns every line containing `pattern`, with its 1-based line number.
///
/// With `case_sensitive` false, matching follows [`text_contains_no_case`].
/// The returned lines borrow from `text` and keep their original case.
///
/// # Examples
///
/// ```rust
/// use gome::text::matching_lines;
///
/// let text = "alpha\nBeta\ngamma beta";
/// assert_eq!(matching_lines(text, "beta", false), vec![(2, "Beta"), (3, "gamma beta")]);
/// assert_eq!(matching_lines(text, "beta", true), vec![(3, "gamma beta")]);
/// ```
pub fn matching_lines<'a>(
    text: &'a str,
    pattern: &str,
    case_sensitive: bool,
) -> Vec<(usize, &'a str)> {
    let lowered = (!case_sensitive).then(|| pattern.to_lowercase());

    text.split('\n')
        .enumerate()
        .filter(|(_, line)| match &lowered {
            Some(pattern) => line.to_lowercase().contains(pattern.as_str()),
            None => line.contains(pattern),
        })
        .map(|(index, line)| (index + 1, line))
        .collect()
}
