//! Default tab names and path-derived names

use std::collections::BTreeSet;

/// Every prefix a default-named tab may carry, regardless of the active language.
pub const UNTITLED_PREFIXES: [&str; 2] = ["Untitled", "未命名"];

/// Localized prefix for new default-named tabs.
pub fn untitled_prefix(language: &str) -> &'static str {
    if language.to_ascii_lowercase().starts_with("zh") {
        UNTITLED_PREFIXES[1]
    } else {
        UNTITLED_PREFIXES[0]
    }
}

pub fn untitled_name(prefix: &str, number: u32) -> String {
    format!("{}-{}", prefix, number)
}

/// Number carried by a default-named tab (`Untitled-3` -> 3).
fn untitled_number(name: &str) -> Option<u32> {
    UNTITLED_PREFIXES.iter().find_map(|prefix| {
        let digits = name.strip_prefix(prefix)?.strip_prefix('-')?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    })
}

/// Smallest positive number not used by any default-named tab.
///
/// Names are matched against every known prefix, not just the active one.
pub fn next_untitled_number<'a, I>(names: I) -> u32
where
    I: IntoIterator<Item = &'a str>,
{
    let used: BTreeSet<u32> = names.into_iter().filter_map(untitled_number).collect();

    let mut next = 1;
    for number in used {
        if number == next {
            next += 1;
        } else if number > next {
            break;
        }
    }
    next
}

/// Final segment of a `/` or `\` separated path; the whole path if that segment is empty.
pub fn file_name_from_path(path: &str) -> String {
    match path.rsplit(['/', '\\']).next() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => path.to_string(),
    }
}
