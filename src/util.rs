use std::collections::HashSet;

/// Distinct values in first-seen order.
pub fn distinct_in_order<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut distinct = Vec::new();
    for value in values {
        if seen.insert(value) {
            distinct.push(value.to_owned());
        }
    }
    distinct
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
