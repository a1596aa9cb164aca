// Display names for Python expressions
//
// Turns an expression node into the string a reader would recognise:
// dotted attribute chains, call targets, subscript bases, literal values
// and comma-joined tuples.

use tree_sitter::Node;

/// The expression shapes the extractor distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExprKind {
    Identifier,
    Attribute,
    Subscript,
    Call,
    String,
    Integer,
    Literal,
    Ellipsis,
    Tuple,
    Group,
    Other,
}

impl ExprKind {
    fn of(node: &Node) -> Self {
        match node.kind() {
            "identifier" | "keyword_identifier" => ExprKind::Identifier,
            "attribute" => ExprKind::Attribute,
            "subscript" => ExprKind::Subscript,
            "call" => ExprKind::Call,
            "string" | "concatenated_string" => ExprKind::String,
            "integer" => ExprKind::Integer,
            "float" | "true" | "false" | "none" => ExprKind::Literal,
            "ellipsis" => ExprKind::Ellipsis,
            "tuple" | "expression_list" => ExprKind::Tuple,
            "parenthesized_expression" => ExprKind::Group,
            _ => ExprKind::Other,
        }
    }
}

/// Best-effort display string for an expression node. Never fails.
pub fn expression_to_name(node: &Node, source: &[u8]) -> String {
    match ExprKind::of(node) {
        ExprKind::Identifier | ExprKind::Literal => text(node, source),
        ExprKind::Attribute => {
            let object = node.child_by_field_name("object");
            let attribute = node.child_by_field_name("attribute");
            match (object, attribute) {
                (Some(object), Some(attribute)) => format!(
                    "{}.{}",
                    expression_to_name(&object, source),
                    text(&attribute, source)
                ),
                _ => text(node, source),
            }
        }
        ExprKind::Subscript => field_name(node, "value", source),
        ExprKind::Call => field_name(node, "function", source),
        ExprKind::String => string_value(node, source).unwrap_or_else(|| text(node, source)),
        ExprKind::Integer => integer_value(&text(node, source)),
        ExprKind::Ellipsis => "Ellipsis".to_string(),
        ExprKind::Tuple => expression_children(node)
            .iter()
            .map(|child| expression_to_name(child, source))
            .collect::<Vec<_>>()
            .join(", "),
        ExprKind::Group => match expression_children(node).as_slice() {
            [inner] => expression_to_name(inner, source),
            _ => text(node, source),
        },
        ExprKind::Other => text(node, source),
    }
}

fn field_name(node: &Node, field: &str, source: &[u8]) -> String {
    node.child_by_field_name(field)
        .map(|child| expression_to_name(&child, source))
        .unwrap_or_else(|| text(node, source))
}

fn text(node: &Node, source: &[u8]) -> String {
    node.utf8_text(source).unwrap_or_default().to_string()
}

/// Named children that are expressions (comments are named nodes too)
fn expression_children<'a>(node: &Node<'a>) -> Vec<Node<'a>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

/// Literal content of a string, `None` for f-strings
fn string_value(node: &Node, source: &[u8]) -> Option<String> {
    if node.kind() == "concatenated_string" {
        let parts: Option<Vec<String>> = expression_children(node)
            .iter()
            .map(|part| string_value(part, source))
            .collect();
        return parts.map(|p| p.concat());
    }

    let mut cursor = node.walk();
    let mut value = String::new();
    let mut delimited = false;
    let mut raw = false;
    for child in node.children(&mut cursor) {
        match child.kind() {
            "string_start" => {
                delimited = true;
                let prefix = child.utf8_text(source).ok()?.to_lowercase();
                if prefix.contains('f') {
                    return None;
                }
                raw = prefix.contains('r');
            }
            "string_content" => value.push_str(child.utf8_text(source).ok()?),
            "escape_sequence" => {
                let sequence = child.utf8_text(source).ok()?;
                if raw {
                    value.push_str(sequence);
                } else {
                    value.push_str(&decode_escape(sequence));
                }
            }
            "interpolation" => return None,
            _ => {}
        }
    }

    if delimited {
        Some(value)
    } else {
        strip_quotes(node.utf8_text(source).ok()?)
    }
}

/// Value of a single backslash escape; unknown escapes stay as written
fn decode_escape(sequence: &str) -> String {
    let Some(body) = sequence.strip_prefix('\\') else {
        return sequence.to_string();
    };
    let mut chars = body.chars();
    let Some(first) = chars.next() else {
        return sequence.to_string();
    };
    let rest = chars.as_str();
    let simple = match first {
        '\n' | '\r' => Some(""),
        '\\' => Some("\\"),
        '\'' => Some("'"),
        '"' => Some("\""),
        'a' => Some("\u{07}"),
        'b' => Some("\u{08}"),
        'f' => Some("\u{0c}"),
        'n' => Some("\n"),
        'r' => Some("\r"),
        't' => Some("\t"),
        'v' => Some("\u{0b}"),
        _ => None,
    };
    if let Some(value) = simple {
        return value.to_string();
    }

    let code = match first {
        'x' | 'u' | 'U' => u32::from_str_radix(rest, 16).ok(),
        '0'..='7' => u32::from_str_radix(body, 8).ok(),
        _ => None,
    };
    code.and_then(char::from_u32)
        .map(String::from)
        .unwrap_or_else(|| sequence.to_string())
}

/// Fallback for grammars that expose strings as a single token
fn strip_quotes(raw: &str) -> Option<String> {
    let body = raw.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    for quote in ["\"\"\"", "'''", "\"", "'"] {
        if body.len() >= 2 * quote.len() && body.starts_with(quote) && body.ends_with(quote) {
            return Some(body[quote.len()..body.len() - quote.len()].to_string());
        }
    }
    None
}

/// Render an integer literal in decimal, as the interpreter would print it
fn integer_value(raw: &str) -> String {
    let digits = raw.replace('_', "");
    let lower = digits.to_lowercase();
    let parsed = if let Some(hex) = lower.strip_prefix("0x") {
        u128::from_str_radix(hex, 16).ok()
    } else if let Some(oct) = lower.strip_prefix("0o") {
        u128::from_str_radix(oct, 8).ok()
    } else if let Some(bin) = lower.strip_prefix("0b") {
        u128::from_str_radix(bin, 2).ok()
    } else {
        lower.parse::<u128>().ok()
    };
    parsed.map(|n| n.to_string()).unwrap_or_else(|| raw.to_string())
}
