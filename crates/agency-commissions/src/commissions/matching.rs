/// Keyword accepted by connection airport and ticket designator lists meaning "any value".
pub const ANY_KEYWORD: &str = "*ANY*";

/// SQL-LIKE match where `%` stands for any run of characters, anchored on both ends.
pub fn like_match(pattern: &str, value: &str) -> bool {
    if !pattern.contains('%') {
        return pattern == value;
    }

    let parts: Vec<&str> = pattern.split('%').collect();
    let (first, rest) = match parts.split_first() {
        Some(split) => split,
        None => return value.is_empty(),
    };
    let (last, middle) = match rest.split_last() {
        Some(split) => split,
        None => return pattern == value,
    };

    let Some(mut remainder) = value.strip_prefix(first) else {
        return false;
    };

    for part in middle {
        if part.is_empty() {
            continue;
        }
        match remainder.find(part) {
            Some(index) => remainder = &remainder[index + part.len()..],
            None => return false,
        }
    }

    remainder.len() >= last.len() && remainder.ends_with(last)
}

pub fn is_any(value: &str) -> bool {
    value == ANY_KEYWORD
}
