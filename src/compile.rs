//! Compilation of resolved blocks into CSS rule text.

use std::fmt::Write as _;

use cssparser::{ParseError, ParseErrorKind, Parser, ParserInput, Token};

use crate::error::StyleError;
use crate::resolve::{Nesting, ResolvedBlock};
use crate::util::to_kebab_case;

/// Rejects values that would escape their declaration or rule.
///
/// The value is tokenized with `cssparser`, descending into functions and
/// brackets. A `;`, `{`, `}`, `!`, a leftover `$` from an unresolved token,
/// or an unterminated string/url fails.
pub(crate) fn validate_value(property: &str, value: &str) -> Result<(), StyleError> {
    let invalid = |reason: &str| StyleError::InvalidValue {
        property: property.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };

    if value.trim().is_empty() {
        return Err(invalid("empty value"));
    }

    let mut input = ParserInput::new(value);
    let mut parser = Parser::new(&mut input);
    scan_value(&mut parser).map_err(invalid)
}

fn scan_value(parser: &mut Parser<'_, '_>) -> Result<(), &'static str> {
    loop {
        let token = match parser.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => return Ok(()),
        };
        match token {
            Token::Semicolon => return Err("unexpected ';'"),
            Token::CurlyBracketBlock | Token::CloseCurlyBracket => {
                return Err("unexpected brace")
            }
            Token::Delim('!') => return Err("'!important' is not allowed"),
            Token::Delim('$') => return Err("unresolved token reference"),
            Token::BadString(_) => return Err("unterminated string"),
            Token::BadUrl(_) => return Err("malformed url()"),
            Token::Function(_) | Token::ParenthesisBlock | Token::SquareBracketBlock => {
                let nested: Result<(), ParseError<'_, &'static str>> = parser
                    .parse_nested_block(|inner| {
                        scan_value(inner).map_err(|reason| inner.new_custom_error(reason))
                    });
                if let Err(ParseError {
                    kind: ParseErrorKind::Custom(reason),
                    ..
                }) = nested
                {
                    return Err(reason);
                }
            }
            _ => {}
        }
    }
}

/// Whether `name` is a single CSS identifier once kebab-cased.
pub(crate) fn is_property_name(name: &str) -> bool {
    let css = to_kebab_case(name);
    let mut input = ParserInput::new(&css);
    let mut parser = Parser::new(&mut input);
    parser.expect_ident().is_ok() && parser.expect_exhausted().is_ok()
}

/// Whether a selector or media key stays inside its rule prelude.
pub(crate) fn is_prelude(key: &str) -> bool {
    !key.trim().is_empty() && !key.contains(['{', '}', ';'])
}

/// One emitted CSS rule, before it is turned into text.
struct FlatRule {
    /// Sort rank: `None` for unconditional rules, breakpoint rank otherwise.
    rank: Option<usize>,
    conditions: Vec<String>,
    selector: String,
    props: Vec<(String, String)>,
}

/// Compiles a block under `selector` into CSS rules.
///
/// Unconditional rules come first, then media rules ordered by breakpoint
/// rank (narrowest first), then literal `@media` rules, each group keeping
/// declaration order.
pub(crate) fn compile(block: &ResolvedBlock, selector: &str) -> Vec<String> {
    let mut flat = Vec::new();
    flatten(block, selector, None, &mut Vec::new(), &mut flat);
    flat.sort_by_key(|rule| rule.rank);

    flat.iter()
        .filter(|rule| !rule.props.is_empty())
        .map(render_rule)
        .collect()
}

fn flatten(
    block: &ResolvedBlock,
    selector: &str,
    rank: Option<usize>,
    conditions: &mut Vec<String>,
    out: &mut Vec<FlatRule>,
) {
    out.push(FlatRule {
        rank,
        conditions: conditions.clone(),
        selector: selector.to_string(),
        props: block.props.clone(),
    });

    for (nesting, child) in &block.children {
        let child_rank = nesting.rank(rank);
        match nesting {
            Nesting::Selector(key) => {
                flatten(child, &nest_selector(selector, key), child_rank, conditions, out);
            }
            Nesting::Breakpoint(_, condition) | Nesting::Media(condition) => {
                conditions.push(condition.clone());
                flatten(child, selector, child_rank, conditions, out);
                conditions.pop();
            }
        }
    }
}

/// Combines a parent selector with a nested key.
///
/// `&` is replaced by the parent, a leading `:` attaches a pseudo-class, and
/// anything else becomes a descendant selector. Selector lists on either
/// side expand to every combination.
pub(crate) fn nest_selector(parent: &str, key: &str) -> String {
    let mut out = Vec::new();
    for p in parent.split(',').map(str::trim) {
        for k in key.split(',').map(str::trim) {
            out.push(if k.contains('&') {
                k.replace('&', p)
            } else if k.starts_with(':') {
                format!("{}{}", p, k)
            } else {
                format!("{} {}", p, k)
            });
        }
    }
    out.join(", ")
}

fn render_rule(rule: &FlatRule) -> String {
    let mut body = String::new();
    let _ = write!(body, "{}{{", rule.selector);
    for (i, (property, value)) in rule.props.iter().enumerate() {
        if i > 0 {
            body.push(';');
        }
        let _ = write!(body, "{}:{}", to_kebab_case(property), value);
    }
    body.push('}');

    if rule.conditions.is_empty() {
        body
    } else {
        format!("@media {}{{{}}}", rule.conditions.join(" and "), body)
    }
}

/// Serializes a class name as a CSS class selector.
pub(crate) fn class_selector(class: &str) -> String {
    let mut out = String::from(".");
    let _ = cssparser::serialize_identifier(class, &mut out);
    out
}
