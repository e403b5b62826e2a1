pub mod cart;
pub mod catches;
pub mod checkout;
pub mod orders;
pub mod prices;
pub mod profile;
pub mod slots;
pub mod subscriptions;
pub mod trips;

/// Trim, collapse runs of whitespace into single spaces and drop control
/// characters.
pub(crate) fn sanitize_inline_text(input: &str) -> String {
    let mut sanitized = String::with_capacity(input.len());
    let mut previous_whitespace = false;

    for ch in input.trim().chars() {
        if ch.is_whitespace() {
            if !previous_whitespace {
                sanitized.push(' ');
                previous_whitespace = true;
            }
        } else if ch.is_control() {
            continue;
        } else {
            sanitized.push(ch);
            previous_whitespace = false;
        }
    }

    sanitized
}

/// Sanitise every line, strip leading/trailing blank lines and collapse
/// consecutive blank lines.
pub(crate) fn sanitize_multiline_text(input: &str) -> String {
    let mut lines: Vec<String> = input.lines().map(sanitize_inline_text).collect();

    while matches!(lines.first(), Some(line) if line.is_empty()) {
        lines.remove(0);
    }

    while matches!(lines.last(), Some(line) if line.is_empty()) {
        lines.pop();
    }

    let mut result = Vec::with_capacity(lines.len());
    let mut previous_empty = false;
    for line in lines {
        if line.is_empty() {
            if previous_empty {
                continue;
            }
            previous_empty = true;
            result.push(String::new());
        } else {
            previous_empty = false;
            result.push(line);
        }
    }

    result.join("\n")
}

/// Sanitised optional text; blank input becomes `None`.
pub(crate) fn optional_inline(input: Option<&str>) -> Option<String> {
    input
        .map(sanitize_inline_text)
        .filter(|value| !value.is_empty())
}

pub(crate) fn optional_multiline(input: Option<&str>) -> Option<String> {
    input
        .map(sanitize_multiline_text)
        .filter(|value| !value.is_empty())
}

/// Phone numbers keep digits, a leading `+` and common separators only.
pub(crate) fn sanitize_phone(input: &str) -> String {
    let trimmed = sanitize_inline_text(input);
    trimmed
        .chars()
        .filter(|ch| ch.is_ascii_digit() || matches!(ch, '+' | ' ' | '-' | '(' | ')'))
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_text_collapses_whitespace() {
        assert_eq!(sanitize_inline_text("  Pike\t \n fillet "), "Pike fillet");
        assert_eq!(sanitize_inline_text("a\u{0007}b"), "ab");
    }

    #[test]
    fn multiline_text_keeps_single_blank_lines() {
        assert_eq!(
            sanitize_multiline_text("\n first \n\n\n second \n\n"),
            "first\n\nsecond"
        );
    }

    #[test]
    fn phone_keeps_dialable_characters() {
        assert_eq!(sanitize_phone(" +7 (900) 123-45-67 ext"), "+7 (900) 123-45-67");
        assert_eq!(sanitize_phone("call me"), "");
    }
}
