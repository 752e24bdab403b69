//! Positional message-template formatting.
//!
//! String resources looked up with arguments are treated as templates in
//! the classic message-format convention: `{0}`, `{1}`, … are replaced by
//! the positional arguments, text between apostrophes is literal, and `''`
//! produces one apostrophe. This is formatting only, not a templating
//! system.

use std::fmt;

/// Formats `pattern`, replacing `{N}` placeholders with the corresponding
/// argument.
///
/// A placeholder whose index has no argument is rendered literally, as is
/// any malformed placeholder; formatting itself never fails.
///
/// # Examples
///
/// ```
/// use polyres::format_message;
///
/// let formatted = format_message("{0} of {1} files", &[&3, &12]);
/// assert_eq!(formatted, "3 of 12 files");
/// ```
#[must_use]
pub fn format_message(pattern: &str, args: &[&dyn fmt::Display]) -> String {
    let mut output = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\'' => {
                if chars.peek() == Some(&'\'') {
                    chars.next();
                    output.push('\'');
                } else {
                    // quoted literal run, closed by the next apostrophe
                    for quoted in chars.by_ref() {
                        if quoted == '\'' {
                            break;
                        }
                        output.push(quoted);
                    }
                }
            }
            '{' => {
                let mut digits = String::new();
                while let Some(&digit) = chars.peek() {
                    if digit.is_ascii_digit() {
                        digits.push(digit);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let closed = chars.peek() == Some(&'}');
                let index = digits.parse::<usize>().ok();
                match (closed, index) {
                    (true, Some(index)) if index < args.len() => {
                        chars.next();
                        output.push_str(&args[index].to_string());
                    }
                    (true, Some(_)) => {
                        // no argument for this position: render literally
                        chars.next();
                        output.push('{');
                        output.push_str(&digits);
                        output.push('}');
                    }
                    _ => {
                        // malformed placeholder: render what was scanned
                        output.push('{');
                        output.push_str(&digits);
                    }
                }
            }
            other => output.push(other),
        }
    }
    output
}
