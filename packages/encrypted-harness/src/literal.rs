use crate::error::Error;
use pg_escape::quote_literal;
use std::fmt::{self, Display};

///
/// A parameter value rendered as SQL text.
/// Used by the simple protocol and by templated queries, where nothing is bound.
///
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Bool(true) => write!(f, "TRUE"),
            Literal::Bool(false) => write!(f, "FALSE"),
            // Parenthesised so that `1-$1` can never become a `--` comment
            Literal::Integer(i) if *i < 0 => write!(f, "({i})"),
            Literal::Integer(i) => write!(f, "{i}"),
            Literal::Float(n) if n.is_nan() => write!(f, "'NaN'::float8"),
            Literal::Float(n) if n.is_infinite() && *n > 0.0 => write!(f, "'Infinity'::float8"),
            Literal::Float(n) if n.is_infinite() => write!(f, "'-Infinity'::float8"),
            Literal::Float(n) if n.is_sign_negative() => write!(f, "({n:?})"),
            Literal::Float(n) => write!(f, "{n:?}"),
            Literal::Text(s) => write!(f, "{}", quote_literal(s)),
        }
    }
}

///
/// Replace `$N` placeholders in `sql` with the matching literal.
///
/// Placeholders inside quoted strings, dollar-quoted strings, quoted identifiers and comments
/// are left alone, as is a `$N` that ends an identifier (`a$1`).
/// A `$` that is not followed by a digit is copied through unchanged.
///
pub fn interpolate(sql: &str, literals: &[Literal]) -> Result<String, Error> {
    let mut out = String::with_capacity(sql.len());
    let mut chars = sql.char_indices().peekable();
    let mut prev = None;

    while let Some((i, c)) = chars.next() {
        let next = chars.peek().map(|&(_, next)| next);

        match c {
            '\'' | '"' => {
                out.push(c);
                // A doubled delimiter closes then reopens the quoted run
                for (_, next) in chars.by_ref() {
                    out.push(next);
                    if next == c {
                        break;
                    }
                }
            }
            '-' if next == Some('-') => {
                out.push(c);
                for (_, next) in chars.by_ref() {
                    out.push(next);
                    if next == '\n' {
                        break;
                    }
                }
            }
            '/' if next == Some('*') => {
                // Block comments nest in PostgreSQL
                out.push(c);
                out.push('*');
                chars.next();
                let mut depth = 1;
                while depth > 0 {
                    let Some((_, next)) = chars.next() else {
                        break;
                    };
                    out.push(next);
                    match (next, chars.peek().map(|&(_, c)| c)) {
                        ('/', Some('*')) => {
                            out.push('*');
                            chars.next();
                            depth += 1;
                        }
                        ('*', Some('/')) => {
                            out.push('/');
                            chars.next();
                            depth -= 1;
                        }
                        _ => {}
                    }
                }
            }
            '$' if prev.is_some_and(is_identifier) => out.push(c),
            '$' if next.is_some_and(|next| next.is_ascii_digit()) => {
                let mut digits = String::new();
                while let Some(&(_, d)) = chars.peek().filter(|(_, d)| d.is_ascii_digit()) {
                    digits.push(d);
                    chars.next();
                }

                // Only ASCII digits were collected, overflow is the only failure
                let index = digits.parse::<usize>().unwrap_or(usize::MAX);

                let literal = index
                    .checked_sub(1)
                    .and_then(|i| literals.get(i))
                    .ok_or(Error::MissingParameter {
                        index,
                        count: literals.len(),
                    })?;

                out.push_str(&literal.to_string());
            }
            '$' => match dollar_quoted(&sql[i..]) {
                Some(len) => {
                    out.push_str(&sql[i..i + len]);
                    while chars.peek().is_some_and(|&(j, _)| j < i + len) {
                        chars.next();
                    }
                }
                None => out.push(c),
            },
            _ => out.push(c),
        }

        prev = Some(c);
    }

    Ok(out)
}

fn is_identifier(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

///
/// Byte length of the `$tag$ .. $tag$` string at the start of `sql`, closing tag included.
///
fn dollar_quoted(sql: &str) -> Option<usize> {
    let body = sql.strip_prefix('$')?;
    let tag_len = body.find(|c: char| !is_identifier(c))?;

    if !body[tag_len..].starts_with('$') {
        return None;
    }

    let tag = &sql[..tag_len + 2];
    let close = sql[tag.len()..].find(tag)?;

    Some(tag.len() + close + tag.len())
}
