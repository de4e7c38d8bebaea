//! Reply parsing
//!
//! Replies are free text. A JSON object is used when the model returns one;
//! otherwise `Attributes:` lines and a `Minimum price:` phrase are pulled out
//! with patterns.

use std::sync::LazyLock;

use goods_core::QueryConstraints;
use regex::Regex;
use serde_json::Value;

/// Outcome of parsing one reply
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedReply {
    Constraints(QueryConstraints),
    /// Neither attributes nor a price threshold could be found
    Unparsed,
}

static ATTRIBUTES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\battributes?:\**[ \t]*([\w \t,'-]*)").expect("Invalid attributes regex")
});

static MIN_PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bmin(?:imum)?\s+price:?\**\s*\$?(\d+)").expect("Invalid min price regex")
});

static BULLET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[-*•]|\d+[.)])\s+(.+?)\s*$").expect("Invalid bullet regex")
});

/// Extract constraints from a language-model reply
pub fn parse_reply(text: &str) -> ParsedReply {
    let constraints = parse_structured(text)
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| parse_patterns(text));

    if constraints.is_empty() {
        ParsedReply::Unparsed
    } else {
        ParsedReply::Constraints(constraints)
    }
}

/// JSON reply with `attributes` and/or `min_price`
fn parse_structured(text: &str) -> Option<QueryConstraints> {
    let json = extract_json(text)?;
    let value: Value = serde_json::from_str(json).ok()?;
    let object = value.as_object()?;

    if !object.contains_key("attributes") && !object.contains_key("min_price") {
        return None;
    }

    let attributes = match object.get("attributes") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        Some(Value::String(list)) => split_attributes(list),
        _ => Vec::new(),
    };

    let min_price = match object.get("min_price") {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_start_matches('$').parse::<f64>().ok(),
        _ => None,
    };

    Some(QueryConstraints::new(attributes, min_price))
}

/// Attribute lines and the first minimum-price phrase
fn parse_patterns(text: &str) -> QueryConstraints {
    let mut attributes = Vec::new();
    let mut in_list = false;

    for line in text.lines() {
        let mut found_heading = false;
        let mut bare_heading = false;
        for caps in ATTRIBUTES_RE.captures_iter(line) {
            let tokens = split_attributes(&caps[1]);
            found_heading = true;
            bare_heading = tokens.is_empty();
            attributes.extend(tokens);
        }

        if found_heading {
            // A bare heading introduces a bulleted list
            in_list = bare_heading;
            continue;
        }

        if in_list {
            match BULLET_RE.captures(line) {
                Some(caps) => {
                    let item = strip_emphasis(&caps[1]).trim_end_matches('.').trim();
                    if !item.is_empty() {
                        attributes.push(item.to_string());
                    }
                }
                None if line.trim().is_empty() => {}
                None => in_list = false,
            }
        }
    }

    let min_price = MIN_PRICE_RE
        .captures(text)
        .and_then(|caps| caps[1].parse::<f64>().ok());

    QueryConstraints::new(attributes, min_price)
}

fn split_attributes(list: &str) -> Vec<String> {
    list.split(',')
        .map(strip_emphasis)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Drop markdown `**bold**` / `_italic_` wrappers around an item
fn strip_emphasis(item: &str) -> &str {
    item.trim()
        .trim_matches(|c| c == '*' || c == '_')
        .trim()
}

/// Locate a JSON object in a reply, inside a ```json fence or bare
fn extract_json(content: &str) -> Option<&str> {
    // Try to find JSON in code blocks first
    if let Some(start) = content.find("```json") {
        let start = start + 7;
        if let Some(end) = content[start..].find("```") {
            return Some(content[start..start + end].trim());
        }
    }

    // Try to find raw JSON
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    (start < end).then(|| &content[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constraints(text: &str) -> QueryConstraints {
        match parse_reply(text) {
            ParsedReply::Constraints(c) => c,
            ParsedReply::Unparsed => panic!("Expected constraints from {:?}", text),
        }
    }

    #[test]
    fn test_attributes_and_min_price() {
        let c = constraints("Attributes: eco-friendly, skincare. Minimum price: 20");
        assert_eq!(c.attributes, vec!["eco-friendly", "skincare"]);
        assert_eq!(c.min_price, Some(20.0));
    }

    #[test]
    fn test_every_attribute_line_is_collected_in_order() {
        let c = constraints("Attributes: red, leather\nNotes: none\nattribute: red, waterproof");
        assert_eq!(c.attributes, vec!["red", "leather", "red", "waterproof"]);
        assert_eq!(c.min_price, None);
    }

    #[test]
    fn test_case_is_preserved() {
        let c = constraints("ATTRIBUTES: Red, Wool");
        assert_eq!(c.attributes, vec!["Red", "Wool"]);
    }

    #[test]
    fn test_min_price_only() {
        let c = constraints("The shopper wants something with a min price $15 or more.");
        assert!(c.attributes.is_empty());
        assert_eq!(c.min_price, Some(15.0));
    }

    #[test]
    fn test_min_price_takes_first_integer_part() {
        let c = constraints("Attributes: soap\nMinimum Price: 12.50\nMinimum price: 40");
        assert_eq!(c.min_price, Some(12.0));
    }

    #[test]
    fn test_bulleted_attribute_list() {
        let reply = "**Attributes:**\n- eco-friendly\n- skincare.\n\n**Minimum price:** $20";
        let c = constraints(reply);
        assert_eq!(c.attributes, vec!["eco-friendly", "skincare"]);
        assert_eq!(c.min_price, Some(20.0));
    }

    #[test]
    fn test_emphasized_items_are_unwrapped() {
        let reply = "Attributes:\n- **Eco-friendly**\n- _vegan_\n* **skincare.**\n\nMinimum price: 5";
        let c = constraints(reply);
        assert_eq!(c.attributes, vec!["Eco-friendly", "vegan", "skincare"]);

        let c = constraints("Attributes: _red_, wool_blend");
        assert_eq!(c.attributes, vec!["red", "wool_blend"]);
    }

    #[test]
    fn test_json_reply() {
        let c = constraints(r#"{"attributes": ["vegan", " soap "], "min_price": 10}"#);
        assert_eq!(c.attributes, vec!["vegan", "soap"]);
        assert_eq!(c.min_price, Some(10.0));
    }

    #[test]
    fn test_fenced_json_with_string_fields() {
        let reply = "Here you go:\n```json\n{\"attributes\": \"wool, red\", \"min_price\": \"$30\"}\n```";
        let c = constraints(reply);
        assert_eq!(c.attributes, vec!["wool", "red"]);
        assert_eq!(c.min_price, Some(30.0));
    }

    #[test]
    fn test_unrelated_json_falls_back_to_patterns() {
        let c = constraints("{\"note\": 1}\nAttributes: candle");
        assert_eq!(c.attributes, vec!["candle"]);
    }

    #[test]
    fn test_unparsed_reply() {
        assert_eq!(parse_reply("I'm not sure what you are looking for."), ParsedReply::Unparsed);
        assert_eq!(parse_reply(""), ParsedReply::Unparsed);
        assert_eq!(parse_reply("Attributes: , ,"), ParsedReply::Unparsed);
    }
}
