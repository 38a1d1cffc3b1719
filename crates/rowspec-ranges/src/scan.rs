//! Tokenizer for range expressions and single-character specifications.

use std::iter::Peekable;
use std::str::Chars;

use crate::error::RangeSyntaxError;

/// Symbolic names accepted in place of a numeric code point.
const SYMBOLIC_NAMES: &[(&str, i64)] = &[
    ("cr", 13),
    ("ff", 12),
    ("lf", 10),
    ("tab", 9),
    ("vt", 11),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token {
    /// A resolved numeric value: integer, hex integer, quoted character
    /// code point, or symbolic name.
    Number(i64),
    /// `...`, the single ellipsis character, or the legacy `:`.
    Ellipsis,
    Comma,
}

pub(crate) struct Scanner<'a> {
    text: &'a str,
    chars: Peekable<Chars<'a>>,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            text,
            chars: text.chars().peekable(),
        }
    }

    fn error(&self, message: impl Into<String>) -> RangeSyntaxError {
        RangeSyntaxError::new(self.text, message)
    }

    /// Next token, or `None` once the input is exhausted.
    pub(crate) fn next_token(&mut self) -> Result<Option<Token>, RangeSyntaxError> {
        while self.chars.peek().is_some_and(|ch| ch.is_whitespace()) {
            self.chars.next();
        }
        let Some(&ch) = self.chars.peek() else {
            return Ok(None);
        };
        match ch {
            ',' => {
                self.chars.next();
                Ok(Some(Token::Comma))
            }
            ':' | '\u{2026}' => {
                self.chars.next();
                Ok(Some(Token::Ellipsis))
            }
            '.' => {
                for _ in 0..3 {
                    if self.chars.next_if_eq(&'.').is_none() {
                        return Err(self.error("ellipsis must be written as three dots (...)"));
                    }
                }
                Ok(Some(Token::Ellipsis))
            }
            '-' => {
                self.chars.next();
                while self.chars.peek().is_some_and(|c| c.is_whitespace()) {
                    self.chars.next();
                }
                if !self.chars.peek().is_some_and(|c| c.is_ascii_digit()) {
                    return Err(self.error("hyphen (-) must be followed by a number"));
                }
                let value = self.scan_number()?;
                Ok(Some(Token::Number(-value)))
            }
            '0'..='9' => Ok(Some(Token::Number(self.scan_number()?))),
            '\'' | '"' => Ok(Some(Token::Number(self.scan_quoted(ch)?))),
            ch if ch.is_ascii_alphabetic() => Ok(Some(Token::Number(self.scan_symbol()?))),
            other => Err(self.error(format!(
                "range must consist of numbers, quoted characters, symbolic names, \
                 ellipsis (...) and comma (,) but found: {other:?}"
            ))),
        }
    }

    fn scan_number(&mut self) -> Result<i64, RangeSyntaxError> {
        let mut digits = String::new();
        if self.chars.next_if_eq(&'0').is_some() {
            if self.chars.next_if(|c| *c == 'x' || *c == 'X').is_some() {
                while let Some(ch) = self.chars.next_if(|c| c.is_ascii_hexdigit()) {
                    digits.push(ch);
                }
                if digits.is_empty() {
                    return Err(self.error("hex number must contain at least one digit after 0x"));
                }
                return i64::from_str_radix(&digits, 16)
                    .map_err(|_| self.error(format!("hex number is out of range: 0x{digits}")));
            }
            digits.push('0');
        }
        while let Some(ch) = self.chars.next_if(|c| c.is_ascii_digit()) {
            digits.push(ch);
        }
        digits
            .parse::<i64>()
            .map_err(|_| self.error(format!("number is out of range: {digits}")))
    }

    /// A quoted character, resolved to its code point. Supports the escape
    /// sequences `\t`, `\\`, `\'`, `\"` and the Unicode escape `\u{HEX}`.
    fn scan_quoted(&mut self, quote: char) -> Result<i64, RangeSyntaxError> {
        self.chars.next();
        let ch = match self.chars.next() {
            None => return Err(self.error("quoted character must be closed")),
            Some(c) if c == quote => {
                return Err(self.error("quoted text must contain a single character"));
            }
            Some('\\') => self.scan_escape()?,
            Some(c) => c,
        };
        if self.chars.next_if_eq(&quote).is_none() {
            return Err(self.error("quoted text must contain a single character"));
        }
        Ok(i64::from(u32::from(ch)))
    }

    fn scan_escape(&mut self) -> Result<char, RangeSyntaxError> {
        match self.chars.next() {
            Some('t') => Ok('\t'),
            Some('\\') => Ok('\\'),
            Some('\'') => Ok('\''),
            Some('"') => Ok('"'),
            Some('u') => {
                if self.chars.next_if_eq(&'{').is_none() {
                    return Err(self.error("unicode escape must be written as \\u{HEX}"));
                }
                let mut digits = String::new();
                while let Some(ch) = self.chars.next_if(|c| c.is_ascii_hexdigit()) {
                    digits.push(ch);
                }
                if digits.is_empty() || self.chars.next_if_eq(&'}').is_none() {
                    return Err(self.error("unicode escape must be written as \\u{HEX}"));
                }
                let code = u32::from_str_radix(&digits, 16)
                    .map_err(|_| self.error(format!("unicode escape is out of range: {digits}")))?;
                char::from_u32(code)
                    .ok_or_else(|| self.error(format!("unicode escape is no character: {digits}")))
            }
            Some(other) => Err(self.error(format!("unknown escape sequence: \\{other}"))),
            None => Err(self.error("escape sequence must be completed")),
        }
    }

    fn scan_symbol(&mut self) -> Result<i64, RangeSyntaxError> {
        let mut name = String::new();
        while let Some(ch) = self.chars.next_if(|c| c.is_ascii_alphabetic()) {
            name.push(ch);
        }
        let lookup = name.to_lowercase();
        SYMBOLIC_NAMES
            .iter()
            .find(|(symbol, _)| *symbol == lookup)
            .map(|(_, code)| *code)
            .ok_or_else(|| {
                self.error(format!(
                    "symbolic name {name:?} must be one of: Cr, Ff, Lf, Tab, Vt"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::{Scanner, Token};

    fn tokens(text: &str) -> Vec<Token> {
        let mut scanner = Scanner::new(text);
        let mut result = Vec::new();
        while let Some(token) = scanner.next_token().expect("scan") {
            result.push(token);
        }
        result
    }

    #[test]
    fn scans_numbers_and_separators() {
        assert_eq!(
            tokens("1...20, 0x1f"),
            vec![
                Token::Number(1),
                Token::Ellipsis,
                Token::Number(20),
                Token::Comma,
                Token::Number(31),
            ]
        );
    }

    #[test]
    fn scans_negative_numbers() {
        assert_eq!(tokens("-17"), vec![Token::Number(-17)]);
    }

    #[test]
    fn scans_quoted_characters_and_escapes() {
        assert_eq!(tokens("'a'"), vec![Token::Number(97)]);
        assert_eq!(tokens(r"'\t'"), vec![Token::Number(9)]);
        assert_eq!(tokens(r#""\"""#), vec![Token::Number(34)]);
        assert_eq!(tokens(r"'\u{20ac}'"), vec![Token::Number(0x20ac)]);
    }

    #[test]
    fn scans_symbolic_names_case_insensitively() {
        assert_eq!(tokens("Tab"), vec![Token::Number(9)]);
        assert_eq!(tokens("cr"), vec![Token::Number(13)]);
    }

    #[test]
    fn rejects_unknown_symbol() {
        let mut scanner = Scanner::new("eot");
        let error = scanner.next_token().unwrap_err();
        assert!(error.message.contains("symbolic name"));
    }

    #[test]
    fn rejects_two_dots() {
        let mut scanner = Scanner::new("1..2");
        scanner.next_token().expect("number");
        assert!(scanner.next_token().is_err());
    }
}
