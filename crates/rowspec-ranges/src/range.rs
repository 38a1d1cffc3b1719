use std::fmt;

use crate::error::RangeSyntaxError;
use crate::scan::{Scanner, Token};

/// Range covering the full 32 bit integer span, used as the default rule
/// for integer fields that declare no rule of their own.
pub const DEFAULT_INTEGER_RANGE_TEXT: &str = "-2147483648...2147483647";

/// A single sub-range with optional bounds.
///
/// An absent lower bound means unbounded below, an absent upper bound means
/// unbounded above. Both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeItem {
    pub lower: Option<i64>,
    pub upper: Option<i64>,
}

impl RangeItem {
    fn contains(&self, value: i64) -> bool {
        self.lower.is_none_or(|lower| value >= lower)
            && self.upper.is_none_or(|upper| value <= upper)
    }
}

impl fmt::Display for RangeItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.lower, self.upper) {
            (Some(lower), Some(upper)) if lower == upper => write!(f, "{lower}"),
            (Some(lower), Some(upper)) => write!(f, "{lower}...{upper}"),
            (Some(lower), None) => write!(f, "{lower}..."),
            (None, Some(upper)) => write!(f, "...{upper}"),
            (None, None) => write!(f, "..."),
        }
    }
}

/// An ordered set of integer sub-ranges parsed from a range expression.
///
/// Sub-ranges may overlap; [`Range::contains`] evaluates the union. A range
/// is immutable once parsed and is reused for every validated row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Range {
    text: String,
    items: Vec<RangeItem>,
}

impl Range {
    /// Parse a range expression such as `1...40`, `...60` or
    /// `0x20...0x7e, Tab`.
    pub fn parse(text: &str) -> Result<Self, RangeSyntaxError> {
        if text.trim().is_empty() {
            return Err(RangeSyntaxError::new(
                text,
                "range must contain at least one item",
            ));
        }
        let mut scanner = Scanner::new(text);
        let mut items = Vec::new();
        let mut lower = None;
        let mut upper = None;
        let mut ellipsis_found = false;
        loop {
            let token = scanner.next_token()?;
            match token {
                Some(Token::Number(value)) => {
                    if ellipsis_found {
                        if upper.is_some() {
                            return Err(RangeSyntaxError::new(
                                text,
                                format!(
                                    "item must have at most a lower and an upper limit \
                                     but found another number: {value}"
                                ),
                            ));
                        }
                        upper = Some(value);
                    } else if lower.is_none() {
                        lower = Some(value);
                    } else {
                        return Err(RangeSyntaxError::new(
                            text,
                            format!("number must be followed by ellipsis (...) but found: {value}"),
                        ));
                    }
                }
                Some(Token::Ellipsis) => {
                    if ellipsis_found {
                        return Err(RangeSyntaxError::new(
                            text,
                            "item must contain at most one ellipsis (...)",
                        ));
                    }
                    ellipsis_found = true;
                }
                Some(Token::Comma) | None => {
                    items.push(Self::finished_item(text, lower, upper, ellipsis_found)?);
                    if token.is_none() {
                        break;
                    }
                    lower = None;
                    upper = None;
                    ellipsis_found = false;
                }
            }
        }
        Ok(Self {
            text: text.trim().to_string(),
            items,
        })
    }

    fn finished_item(
        text: &str,
        lower: Option<i64>,
        upper: Option<i64>,
        ellipsis_found: bool,
    ) -> Result<RangeItem, RangeSyntaxError> {
        match (lower, upper, ellipsis_found) {
            (None, None, true) => Err(RangeSyntaxError::new(
                text,
                "ellipsis (...) must be preceded and/or succeeded by a number",
            )),
            (None, None, false) => Err(RangeSyntaxError::new(
                text,
                "empty item between commas must be removed",
            )),
            (Some(exact), None, false) => Ok(RangeItem {
                lower: Some(exact),
                upper: Some(exact),
            }),
            (Some(lower), Some(upper), _) if lower > upper => Err(RangeSyntaxError::new(
                text,
                format!("lower limit {lower} must be less than or equal to upper limit {upper}"),
            )),
            (lower, upper, _) => Ok(RangeItem { lower, upper }),
        }
    }

    /// Whether `value` is inside any of the sub-ranges.
    pub fn contains(&self, value: i64) -> bool {
        self.items.iter().any(|item| item.contains(value))
    }

    pub fn items(&self) -> &[RangeItem] {
        &self.items
    }

    /// The smallest lower bound, or `None` if any item is unbounded below.
    pub fn lower_limit(&self) -> Option<i64> {
        let mut result = None;
        for item in &self.items {
            let lower = item.lower?;
            result = Some(result.map_or(lower, |current: i64| current.min(lower)));
        }
        result
    }

    /// The largest upper bound, or `None` if any item is unbounded above.
    pub fn upper_limit(&self) -> Option<i64> {
        let mut result = None;
        for item in &self.items {
            let upper = item.upper?;
            result = Some(result.map_or(upper, |current: i64| current.max(upper)));
        }
        result
    }

    /// The single exact value described by this range, if it consists of
    /// exactly one item with equal bounds. Fixed-width fields require this.
    pub fn exact_value(&self) -> Option<i64> {
        match self.items.as_slice() {
            [
                RangeItem {
                    lower: Some(lower),
                    upper: Some(upper),
                },
            ] if lower == upper => Some(*lower),
            _ => None,
        }
    }

    /// The original expression this range was parsed from.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for item in &self.items {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{item}")?;
            first = false;
        }
        Ok(())
    }
}

/// Interpret a single-character specification as used by data format
/// properties such as the item delimiter.
///
/// Accepts a literal non-digit character, a decimal or hex code point, a
/// quoted character, or a symbolic name (`Tab`, `Cr`, ...).
pub fn character_code(text: &str) -> Result<char, RangeSyntaxError> {
    let trimmed = text.trim();
    let mut chars = trimmed.chars();
    if let (Some(only), None) = (chars.next(), chars.next())
        && !only.is_ascii_digit()
    {
        return Ok(only);
    }
    let mut scanner = Scanner::new(text);
    let code = match scanner.next_token()? {
        Some(Token::Number(code)) => code,
        _ => {
            return Err(RangeSyntaxError::new(
                text,
                "value must be a number, a quoted character or a symbolic name",
            ));
        }
    };
    if scanner.next_token()?.is_some() {
        return Err(RangeSyntaxError::new(
            text,
            "value must describe a single character",
        ));
    }
    u32::try_from(code)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| RangeSyntaxError::new(text, format!("code point is no character: {code}")))
}
