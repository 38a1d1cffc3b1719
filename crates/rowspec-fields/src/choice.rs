use std::iter::Peekable;
use std::str::Chars;

use rowspec_model::{DataFormat, FieldSpec, FieldValueError, InterfaceError, Value};

use crate::field::FieldType;

/// Field format accepting only values from a declared pool of choices.
///
/// The rule is a comma-separated list of bare or quoted literals, compared
/// case-sensitively. A choice field without any choices must be allowed to
/// be empty, otherwise it could never accept anything.
#[derive(Debug)]
pub struct ChoiceFieldType {
    choices: Vec<String>,
}

impl ChoiceFieldType {
    pub fn new(spec: &FieldSpec, _data_format: &DataFormat) -> Result<Self, InterfaceError> {
        let choices = parse_choice_rule(&spec.rule)?;
        if choices.is_empty() && !spec.allowed_to_be_empty {
            return Err(InterfaceError::new(
                "choice field without any choices must be allowed to be empty",
            ));
        }
        Ok(Self { choices })
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }
}

impl FieldType for ChoiceFieldType {
    fn validate_value(&self, value: &str) -> Result<Value, FieldValueError> {
        if self.choices.iter().any(|choice| choice == value) {
            return Ok(Value::Text(value.to_string()));
        }
        let rendered: Vec<String> = self
            .choices
            .iter()
            .map(|choice| format!("{choice:?}"))
            .collect();
        Err(FieldValueError::new(format!(
            "value is {value:?} but must be one of: {}",
            rendered.join(", ")
        )))
    }
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) {
    while chars.next_if(|ch| ch.is_whitespace()).is_some() {}
}

fn parse_choice_rule(rule: &str) -> Result<Vec<String>, InterfaceError> {
    let mut choices = Vec::new();
    let mut chars = rule.chars().peekable();
    skip_whitespace(&mut chars);
    if chars.peek().is_none() {
        return Ok(choices);
    }
    loop {
        skip_whitespace(&mut chars);
        let choice = match chars.peek() {
            None => {
                return Err(InterfaceError::new("trailing comma (,) must be removed"));
            }
            Some(',') => {
                return Err(InterfaceError::new(
                    "choice value must precede a comma (,)",
                ));
            }
            Some(&quote @ ('\'' | '"')) => {
                chars.next();
                scan_quoted_choice(&mut chars, quote)?
            }
            Some(_) => {
                let mut text = String::new();
                while let Some(ch) = chars.next_if(|ch| *ch != ',') {
                    text.push(ch);
                }
                text.trim_end().to_string()
            }
        };
        if choice.is_empty() {
            return Err(InterfaceError::new("choice must not be empty"));
        }
        choices.push(choice);
        skip_whitespace(&mut chars);
        match chars.next() {
            None => break,
            Some(',') => {}
            Some(other) => {
                return Err(InterfaceError::new(format!(
                    "comma (,) must follow choice value but found: {other:?}"
                )));
            }
        }
    }
    Ok(choices)
}

fn scan_quoted_choice(
    chars: &mut Peekable<Chars<'_>>,
    quote: char,
) -> Result<String, InterfaceError> {
    let mut text = String::new();
    loop {
        match chars.next() {
            None => {
                return Err(InterfaceError::new(format!(
                    "quoted choice must be closed with {quote:?}"
                )));
            }
            Some(ch) if ch == quote => return Ok(text),
            Some('\\') => match chars.next() {
                Some('t') => text.push('\t'),
                Some('\\') => text.push('\\'),
                Some('\'') => text.push('\''),
                Some('"') => text.push('"'),
                Some(other) => {
                    return Err(InterfaceError::new(format!(
                        "unknown escape sequence in choice: \\{other}"
                    )));
                }
                None => {
                    return Err(InterfaceError::new(
                        "escape sequence in choice must be completed",
                    ));
                }
            },
            Some(ch) => text.push(ch),
        }
    }
}
