use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use rowspec_model::{DataFormat, FieldSpec, FieldValueError, InterfaceError, Value};

use crate::field::FieldType;

/// One element of a compiled date/time template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TemplatePart {
    Year4,
    Year2,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Literal(char),
}

impl TemplatePart {
    fn digits(self) -> usize {
        match self {
            TemplatePart::Year4 => 4,
            TemplatePart::Literal(_) => 0,
            _ => 2,
        }
    }
}

/// Field format accepting calendar dates and times.
///
/// The rule is a template of the placeholders `YYYY YY MM DD hh mm ss`
/// plus literal separator characters that must match verbatim, for example
/// `DD.MM.YYYY` or `YYYY-MM-DD hh:mm:ss`.
#[derive(Debug)]
pub struct DateTimeFieldType {
    template: String,
    parts: Vec<TemplatePart>,
}

impl DateTimeFieldType {
    pub fn new(spec: &FieldSpec, _data_format: &DataFormat) -> Result<Self, InterfaceError> {
        let template = spec.rule.trim();
        if template.is_empty() {
            return Err(InterfaceError::new(
                "date/time rule must be a template such as DD.MM.YYYY",
            ));
        }
        Ok(Self {
            template: template.to_string(),
            parts: compile_template(template),
        })
    }

    fn mismatch(&self, value: &str) -> FieldValueError {
        FieldValueError::new(format!(
            "date must match template {:?} but is: {value:?}",
            self.template
        ))
    }
}

/// Placeholders are matched longest-first so `YYYY` wins over `YY`; any
/// unmatched character becomes a literal.
fn compile_template(template: &str) -> Vec<TemplatePart> {
    const PLACEHOLDERS: &[(&str, TemplatePart)] = &[
        ("YYYY", TemplatePart::Year4),
        ("YY", TemplatePart::Year2),
        ("MM", TemplatePart::Month),
        ("DD", TemplatePart::Day),
        ("hh", TemplatePart::Hour),
        ("mm", TemplatePart::Minute),
        ("ss", TemplatePart::Second),
    ];
    let mut parts = Vec::new();
    let mut rest = template;
    'scan: while !rest.is_empty() {
        for (placeholder, part) in PLACEHOLDERS {
            if let Some(remainder) = rest.strip_prefix(placeholder) {
                parts.push(*part);
                rest = remainder;
                continue 'scan;
            }
        }
        let mut chars = rest.chars();
        if let Some(ch) = chars.next() {
            parts.push(TemplatePart::Literal(ch));
        }
        rest = chars.as_str();
    }
    parts
}

impl FieldType for DateTimeFieldType {
    fn empty_value(&self) -> Value {
        Value::Empty
    }

    fn validate_value(&self, value: &str) -> Result<Value, FieldValueError> {
        let mut chars = value.chars();
        let mut year: i32 = 1970;
        let mut month: u32 = 1;
        let mut day: u32 = 1;
        let mut hour: u32 = 0;
        let mut minute: u32 = 0;
        let mut second: u32 = 0;
        for part in &self.parts {
            if let TemplatePart::Literal(expected) = part {
                match chars.next() {
                    Some(ch) if ch == *expected => {}
                    _ => return Err(self.mismatch(value)),
                }
                continue;
            }
            let mut number: u32 = 0;
            for _ in 0..part.digits() {
                let digit = match chars.next().and_then(|ch| ch.to_digit(10)) {
                    Some(digit) => digit,
                    None => return Err(self.mismatch(value)),
                };
                number = number * 10 + digit;
            }
            match part {
                TemplatePart::Year4 => year = number as i32,
                TemplatePart::Year2 => {
                    // Same pivot as strptime's %y.
                    year = if number <= 68 {
                        2000 + number as i32
                    } else {
                        1900 + number as i32
                    };
                }
                TemplatePart::Month => month = number,
                TemplatePart::Day => day = number,
                TemplatePart::Hour => hour = number,
                TemplatePart::Minute => minute = number,
                TemplatePart::Second => second = number,
                TemplatePart::Literal(_) => {}
            }
        }
        if chars.next().is_some() {
            return Err(self.mismatch(value));
        }

        if !(1..=12).contains(&month) {
            return Err(FieldValueError::new(format!(
                "month {month} is out of range 1...12: {value:?}"
            )));
        }
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            FieldValueError::new(format!(
                "day {day} is out of range for {year:04}-{month:02}: {value:?}"
            ))
        })?;
        if hour > 23 {
            return Err(FieldValueError::new(format!(
                "hour {hour} is out of range 0...23: {value:?}"
            )));
        }
        if minute > 59 {
            return Err(FieldValueError::new(format!(
                "minute {minute} is out of range 0...59: {value:?}"
            )));
        }
        if second > 59 {
            return Err(FieldValueError::new(format!(
                "second {second} is out of range 0...59: {value:?}"
            )));
        }
        let time = NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(|| {
            FieldValueError::new(format!("time is out of range: {value:?}"))
        })?;
        Ok(Value::DateTime(NaiveDateTime::new(date, time)))
    }
}

#[cfg(test)]
mod tests {
    use super::{TemplatePart, compile_template};

    #[test]
    fn long_placeholders_win_over_short_ones() {
        assert_eq!(
            compile_template("YYYY-MM"),
            vec![
                TemplatePart::Year4,
                TemplatePart::Literal('-'),
                TemplatePart::Month,
            ]
        );
        assert_eq!(
            compile_template("YY"),
            vec![TemplatePart::Year2],
        );
    }

    #[test]
    fn month_and_minute_are_case_sensitive() {
        assert_eq!(
            compile_template("hh:mm"),
            vec![
                TemplatePart::Hour,
                TemplatePart::Literal(':'),
                TemplatePart::Minute,
            ]
        );
        assert_eq!(compile_template("MM"), vec![TemplatePart::Month]);
    }
}
