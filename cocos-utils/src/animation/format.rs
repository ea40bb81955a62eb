//! Frame-name templates such as `walk%02d.png` or `walk{:02}.png`.

use std::iter::Peekable;
use std::str::Chars;

use crate::error::{UtilsError, UtilsResult};

#[derive(Clone, Debug, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Number { width: usize, zero_pad: bool },
}

/// A parsed frame-name template with exactly one integer placeholder.
///
/// Accepted placeholders: printf style `%d`, `%i`, `%4d`, `%04d` and Rust
/// style `{}`, `{:4}`, `{:04}`. Literal percent signs and braces are written
/// `%%`, `{{` and `}}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameFormat {
    template: String,
    pieces: Vec<Piece>,
}

impl FrameFormat {
    pub fn parse(template: &str) -> UtilsResult<Self> {
        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            let number = match c {
                '%' if chars.peek() == Some(&'%') => {
                    chars.next();
                    literal.push('%');
                    continue;
                }
                '%' => parse_printf(template, &mut chars)?,
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                    continue;
                }
                '{' => parse_braces(template, &mut chars)?,
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                    continue;
                }
                '}' => {
                    return Err(UtilsError::invalid_argument(format!(
                        "unmatched '}}' in frame format '{template}'"
                    )))
                }
                _ => {
                    literal.push(c);
                    continue;
                }
            };
            if !literal.is_empty() {
                pieces.push(Piece::Literal(std::mem::take(&mut literal)));
            }
            pieces.push(number);
        }
        if !literal.is_empty() {
            pieces.push(Piece::Literal(literal));
        }

        let placeholders = pieces
            .iter()
            .filter(|p| matches!(p, Piece::Number { .. }))
            .count();
        if placeholders != 1 {
            return Err(UtilsError::invalid_argument(format!(
                "frame format '{template}' must contain exactly one integer placeholder, found {placeholders}"
            )));
        }

        Ok(Self {
            template: template.to_string(),
            pieces,
        })
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Substitute `n` for the placeholder.
    pub fn format(&self, n: i64) -> String {
        let mut out = String::with_capacity(self.template.len() + 4);
        for piece in &self.pieces {
            match piece {
                Piece::Literal(s) => out.push_str(s),
                Piece::Number {
                    width,
                    zero_pad: true,
                } => out.push_str(&format!("{n:0width$}")),
                Piece::Number {
                    width,
                    zero_pad: false,
                } => out.push_str(&format!("{n:>width$}")),
            }
        }
        out
    }
}

fn parse_width(chars: &mut Peekable<Chars<'_>>) -> (usize, bool) {
    let zero_pad = chars.next_if_eq(&'0').is_some();
    let mut width = 0usize;
    while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
        chars.next();
        width = width.saturating_mul(10).saturating_add(d as usize);
    }
    (width, zero_pad)
}

fn parse_printf(template: &str, chars: &mut Peekable<Chars<'_>>) -> UtilsResult<Piece> {
    let (width, zero_pad) = parse_width(chars);
    match chars.next() {
        Some('d') | Some('i') => Ok(Piece::Number { width, zero_pad }),
        other => Err(UtilsError::invalid_argument(format!(
            "unsupported conversion {:?} in frame format '{template}'",
            other.map(|c| format!("%{c}")).unwrap_or_else(|| "%".into())
        ))),
    }
}

fn parse_braces(template: &str, chars: &mut Peekable<Chars<'_>>) -> UtilsResult<Piece> {
    let mut width = 0;
    let mut zero_pad = false;
    if chars.next_if_eq(&':').is_some() {
        (width, zero_pad) = parse_width(chars);
    }
    match chars.next() {
        Some('}') => Ok(Piece::Number { width, zero_pad }),
        _ => Err(UtilsError::invalid_argument(format!(
            "malformed '{{...}}' placeholder in frame format '{template}'"
        ))),
    }
}
