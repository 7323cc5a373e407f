//! Utility functions and helpers

/// Format a number with thousands separators
pub fn format_number<T: ToString>(n: T) -> String {
    let s = n.to_string();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };
    let mut result = String::new();
    let mut count = 0;
    for c in digits.chars().rev() {
        if count == 3 {
            result.push(',');
            count = 0;
        }
        result.push(c);
        count += 1;
    }
    format!("{}{}", sign, result.chars().rev().collect::<String>())
}

/// Escape text for interpolation into HTML content or attribute values
pub fn escape_html(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Quote a CSV field when it contains a separator, quote or line break
pub fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Format a decimal string with two fractional digits, falling back to the raw text
pub fn format_amount(raw: &str) -> String {
    match raw.trim().parse::<f64>() {
        Ok(v) => format!("{:.2}", v),
        Err(_) => raw.to_string(),
    }
}
