//! Style values: literal CSS text and typed theme token references.
//!
//! Inside the engine a token is always a [`TokenRef`]; nothing inspects string
//! prefixes. The `$name` text form only exists at the parsing boundary
//! ([`Value::parse`]), used for config files and template arguments.

use std::fmt;

/// A reference to a theme token, resolved against the theme at build time.
///
/// Without an explicit scale, the scale is looked up from the property the
/// value is assigned to (`padding` → `space`, `color` → `colors`, …).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenRef {
    pub scale: Option<String>,
    pub name: String,
    pub negated: bool,
}

impl TokenRef {
    /// Creates a token reference whose scale comes from the property.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            scale: None,
            name: name.into(),
            negated: false,
        }
    }

    /// Creates a token reference pinned to a scale.
    pub fn scoped(scale: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            scale: Some(scale.into()),
            name: name.into(),
            negated: false,
        }
    }

    /// Returns the same reference, negating the resolved value.
    pub fn negate(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    /// Parses one word in token syntax: `$name`, `$scale$name`, `-$name`.
    ///
    /// Returns `None` for anything else, which then stays literal.
    pub fn parse(word: &str) -> Option<TokenRef> {
        let (negated, rest) = match word.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, word),
        };
        match scan_token(rest) {
            Some((len, mut token)) if len == rest.len() => {
                token.negated = negated;
                Some(token)
            }
            _ => None,
        }
    }
}

/// Reads a token at the start of `text`, which begins with `$`.
///
/// Returns the byte length consumed and the unnegated reference.
fn scan_token(text: &str) -> Option<(usize, TokenRef)> {
    let rest = text.strip_prefix('$')?;
    let first = name_len(rest);
    if first == 0 {
        return None;
    }
    let after = &rest[first..];
    if let Some(scoped) = after.strip_prefix('$') {
        let second = name_len(scoped);
        if second > 0 {
            let token = TokenRef::scoped(&rest[..first], &scoped[..second]);
            return Some((1 + first + 1 + second, token));
        }
    }
    Some((1 + first, TokenRef::new(&rest[..first])))
}

fn name_len(text: &str) -> usize {
    text.bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
        .count()
}

/// Whether a `-` before `$` at this position negates the token rather than
/// belonging to a preceding word.
fn starts_operand(before: Option<u8>) -> bool {
    match before {
        None => true,
        Some(b) => b.is_ascii_whitespace() || matches!(b, b'(' | b','),
    }
}

impl fmt::Display for TokenRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            f.write_str("-")?;
        }
        if let Some(scale) = &self.scale {
            write!(f, "${}", scale)?;
        }
        write!(f, "${}", self.name)
    }
}

/// A property value in a style declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// CSS text emitted as-is.
    Literal(String),
    /// A theme token.
    Token(TokenRef),
    /// Parts concatenated as-is, e.g. `1px solid ` followed by `$gray`.
    Composite(Vec<Value>),
}

impl Value {
    pub fn literal(text: impl Into<String>) -> Self {
        Value::Literal(text.into())
    }

    /// A token whose scale comes from the property it is assigned to.
    pub fn token(name: impl Into<String>) -> Self {
        Value::Token(TokenRef::new(name))
    }

    /// A token pinned to a scale.
    pub fn scoped(scale: impl Into<String>, name: impl Into<String>) -> Self {
        Value::Token(TokenRef::scoped(scale, name))
    }

    /// Parses text that may contain token references anywhere, e.g.
    /// `calc($4 + 1px)` or `1px solid $colors$gray`.
    ///
    /// Text between tokens is kept byte for byte. Quoted strings are never
    /// scanned, so `content: '$5'` stays literal. A value without tokens
    /// comes back as a single [`Value::Literal`].
    pub fn parse(text: &str) -> Value {
        let trimmed = text.trim();
        let bytes = trimmed.as_bytes();
        let mut parts = Vec::new();
        let mut literal_start = 0;
        let mut quote: Option<u8> = None;
        let mut i = 0;

        while i < bytes.len() {
            let b = bytes[i];
            if let Some(q) = quote {
                if b == b'\\' {
                    i += 2;
                    continue;
                }
                if b == q {
                    quote = None;
                }
                i += 1;
                continue;
            }
            match b {
                b'"' | b'\'' => {
                    quote = Some(b);
                    i += 1;
                }
                b'$' => match scan_token(&trimmed[i..]) {
                    Some((len, mut token)) => {
                        let mut start = i;
                        if i > 0
                            && bytes[i - 1] == b'-'
                            && starts_operand(i.checked_sub(2).map(|j| bytes[j]))
                        {
                            token.negated = true;
                            start = i - 1;
                        }
                        if start > literal_start {
                            parts.push(Value::Literal(trimmed[literal_start..start].to_string()));
                        }
                        parts.push(Value::Token(token));
                        i += len;
                        literal_start = i;
                    }
                    None => i += 1,
                },
                _ => i += 1,
            }
        }

        if parts.is_empty() {
            return Value::Literal(trimmed.to_string());
        }
        if literal_start < bytes.len() {
            parts.push(Value::Literal(trimmed[literal_start..].to_string()));
        }
        if parts.len() == 1 {
            parts.remove(0)
        } else {
            Value::Composite(parts)
        }
    }

    /// Returns true if any part of this value is a token reference.
    pub fn has_tokens(&self) -> bool {
        match self {
            Value::Literal(_) => false,
            Value::Token(_) => true,
            Value::Composite(parts) => parts.iter().any(Value::has_tokens),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Literal(text) => f.write_str(text),
            Value::Token(token) => token.fmt(f),
            Value::Composite(parts) => parts.iter().try_for_each(|part| part.fmt(f)),
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Literal(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Literal(text)
    }
}

impl From<TokenRef> for Value {
    fn from(token: TokenRef) -> Self {
        Value::Token(token)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Literal(n.to_string())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Literal(n.to_string())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Literal(n.to_string())
    }
}

/// Negates a resolved CSS value.
///
/// Plain numbers and dimensions flip their sign; anything else is wrapped in
/// `calc()`.
pub(crate) fn negate_css(value: &str) -> String {
    if let Some(positive) = value.strip_prefix('-') {
        return positive.to_string();
    }
    match value.chars().next() {
        Some(c) if c.is_ascii_digit() || c == '.' => format!("-{}", value),
        _ => format!("calc({} * -1)", value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_parse_forms() {
        assert_eq!(TokenRef::parse("$black"), Some(TokenRef::new("black")));
        assert_eq!(
            TokenRef::parse("$colors$black"),
            Some(TokenRef::scoped("colors", "black"))
        );
        assert_eq!(TokenRef::parse("-$5"), Some(TokenRef::new("5").negate()));
        assert_eq!(TokenRef::parse("black"), None);
        assert_eq!(TokenRef::parse("$"), None);
        assert_eq!(TokenRef::parse("$a$"), None);
    }

    #[test]
    fn test_parse_without_tokens_is_literal() {
        assert_eq!(
            Value::parse("translate(-50%, -50%) rotate(-20deg)"),
            Value::literal("translate(-50%, -50%) rotate(-20deg)")
        );
    }

    #[test]
    fn test_parse_single_token() {
        assert_eq!(Value::parse("$white"), Value::token("white"));
    }

    #[test]
    fn test_parse_composite() {
        let value = Value::parse("1px solid $colors$gray");
        assert_eq!(
            value,
            Value::Composite(vec![
                Value::literal("1px solid "),
                Value::scoped("colors", "gray"),
            ])
        );
        assert!(value.has_tokens());
        assert_eq!(value.to_string(), "1px solid $colors$gray");
    }

    #[test]
    fn test_dollar_inside_quotes_stays_literal() {
        assert_eq!(Value::parse("'$5'"), Value::literal("'$5'"));
        assert_eq!(
            Value::parse(r#""it's $5" $gray"#),
            Value::Composite(vec![Value::literal(r#""it's $5" "#), Value::token("gray")])
        );
    }

    #[test]
    fn test_parse_tokens_inside_functions() {
        assert_eq!(
            Value::parse("calc($blakc + 1px)"),
            Value::Composite(vec![
                Value::literal("calc("),
                Value::token("blakc"),
                Value::literal(" + 1px)"),
            ])
        );
        assert_eq!(
            Value::parse("$4, $colors$gray"),
            Value::Composite(vec![
                Value::token("4"),
                Value::literal(", "),
                Value::scoped("colors", "gray"),
            ])
        );
    }

    #[test]
    fn test_parse_negation_needs_operand_start() {
        assert_eq!(
            Value::parse("calc(100% -$4)"),
            Value::Composite(vec![
                Value::literal("calc(100% "),
                Value::Token(TokenRef::new("4").negate()),
                Value::literal(")"),
            ])
        );
        assert_eq!(
            Value::parse("a-$4"),
            Value::Composite(vec![Value::literal("a-"), Value::token("4")])
        );
    }

    #[test]
    fn test_parse_keeps_whitespace_between_tokens() {
        let value = Value::parse(r#""a  b"   $x"#);
        assert_eq!(
            value,
            Value::Composite(vec![Value::literal(r#""a  b"   "#), Value::token("x")])
        );
        assert_eq!(value.to_string(), r#""a  b"   $x"#);
    }

    #[test]
    fn test_lone_dollar_stays_literal() {
        assert_eq!(Value::parse("$ 5"), Value::literal("$ 5"));
    }

    #[test]
    fn test_negate_css() {
        assert_eq!(negate_css("25px"), "-25px");
        assert_eq!(negate_css("-4px"), "4px");
        assert_eq!(negate_css("var(--x)"), "calc(var(--x) * -1)");
    }
}
