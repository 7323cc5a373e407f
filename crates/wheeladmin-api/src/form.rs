//! Form bodies posted by HTMX

use std::collections::HashMap;

/// Decode an `application/x-www-form-urlencoded` body. Later keys win;
/// checkboxes that are absent simply have no entry.
pub fn parse_form(body: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for pair in body.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        params.insert(decode(key), decode(value));
    }
    params
}

fn decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|s| s.into_owned())
        .unwrap_or(spaced)
}

/// Trimmed field value, empty when absent
pub fn field(params: &HashMap<String, String>, name: &str) -> String {
    params.get(name).map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Trimmed field value, `None` when absent or blank
pub fn optional_field(params: &HashMap<String, String>, name: &str) -> Option<String> {
    Some(field(params, name)).filter(|v| !v.is_empty())
}

/// Checkbox state
pub fn checked(params: &HashMap<String, String>, name: &str) -> bool {
    matches!(params.get(name).map(String::as_str), Some("on" | "true" | "1"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_form() {
        let params = parse_form("name=Falcon+X&description=Light%2C+foldable&is_globally_available=on&empty=");
        assert_eq!(field(&params, "name"), "Falcon X");
        assert_eq!(field(&params, "description"), "Light, foldable");
        assert!(checked(&params, "is_globally_available"));
        assert_eq!(optional_field(&params, "empty"), None);
        assert!(!checked(&params, "missing"));
    }

    #[test]
    fn test_literal_plus_survives() {
        let params = parse_form("q=a%2Bb");
        assert_eq!(field(&params, "q"), "a+b");
    }
}
