//! Physical data format of a tabular source, declared via `D` rows.

use std::fmt;

use rowspec_ranges::{Range, character_code};

use crate::error::InterfaceError;
use crate::location::Location;

/// Property names recognized by [`DataFormat::set_property`]. Spaces in
/// declared names are treated as underscores.
pub const KEY_ALLOWED_CHARACTERS: &str = "allowed_characters";
pub const KEY_DECIMAL_SEPARATOR: &str = "decimal_separator";
pub const KEY_ENCODING: &str = "encoding";
pub const KEY_ESCAPE_CHARACTER: &str = "escape_character";
pub const KEY_FORMAT: &str = "format";
pub const KEY_HEADER: &str = "header";
pub const KEY_ITEM_DELIMITER: &str = "item_delimiter";
pub const KEY_LINE_DELIMITER: &str = "line_delimiter";
pub const KEY_QUOTE_CHARACTER: &str = "quote_character";
pub const KEY_SHEET: &str = "sheet";
pub const KEY_SKIP_INITIAL_SPACE: &str = "skip_initial_space";
pub const KEY_THOUSANDS_SEPARATOR: &str = "thousands_separator";

/// Kind of physical container the data lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    Delimited,
    Fixed,
    Spreadsheet,
}

impl FormatKind {
    /// Parse a format name; `csv` is accepted as alias for `delimited`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "delimited" | "csv" => Some(FormatKind::Delimited),
            "fixed" => Some(FormatKind::Fixed),
            "spreadsheet" => Some(FormatKind::Spreadsheet),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FormatKind::Delimited => "delimited",
            FormatKind::Fixed => "fixed",
            FormatKind::Spreadsheet => "spreadsheet",
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Line delimiter for text-based formats. `None` is only meaningful for
/// fixed data, where records may follow each other without separation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineDelimiter {
    #[default]
    Any,
    Cr,
    Lf,
    CrLf,
    None,
}

impl LineDelimiter {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "any" => Some(LineDelimiter::Any),
            "cr" => Some(LineDelimiter::Cr),
            "lf" => Some(LineDelimiter::Lf),
            "crlf" => Some(LineDelimiter::CrLf),
            "none" => Some(LineDelimiter::None),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LineDelimiter::Any => "any",
            LineDelimiter::Cr => "cr",
            LineDelimiter::Lf => "lf",
            LineDelimiter::CrLf => "crlf",
            LineDelimiter::None => "none",
        }
    }
}

/// Data format properties collected from the `D` rows of an interface
/// definition.
///
/// Properties are set one at a time while the definition is read;
/// [`DataFormat::validate`] runs once afterwards and freezes the format.
#[derive(Debug, Clone)]
pub struct DataFormat {
    kind: FormatKind,
    encoding: String,
    line_delimiter: LineDelimiter,
    item_delimiter: char,
    quote_character: char,
    escape_character: char,
    skip_initial_space: bool,
    decimal_separator: char,
    thousands_separator: Option<char>,
    allowed_characters: Option<Range>,
    header: u32,
    sheet: u32,
    validated: bool,
}

impl DataFormat {
    pub fn new(kind: FormatKind) -> Self {
        Self {
            kind,
            encoding: "utf-8".to_string(),
            line_delimiter: LineDelimiter::Any,
            item_delimiter: ',',
            quote_character: '"',
            escape_character: '"',
            skip_initial_space: false,
            decimal_separator: ',',
            thousands_separator: None,
            allowed_characters: None,
            header: 0,
            sheet: 1,
            validated: false,
        }
    }

    /// Create a data format from the declared format name.
    pub fn from_name(name: &str, location: &Location) -> Result<Self, InterfaceError> {
        let kind = FormatKind::parse(name).ok_or_else(|| {
            InterfaceError::at(
                format!(
                    "format is {name:?} but must be one of: delimited, fixed, spreadsheet"
                ),
                location.clone(),
            )
        })?;
        Ok(Self::new(kind))
    }

    pub fn kind(&self) -> FormatKind {
        self.kind
    }

    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    pub fn line_delimiter(&self) -> LineDelimiter {
        self.line_delimiter
    }

    pub fn item_delimiter(&self) -> char {
        self.item_delimiter
    }

    pub fn quote_character(&self) -> char {
        self.quote_character
    }

    pub fn escape_character(&self) -> char {
        self.escape_character
    }

    pub fn skip_initial_space(&self) -> bool {
        self.skip_initial_space
    }

    pub fn decimal_separator(&self) -> char {
        self.decimal_separator
    }

    pub fn thousands_separator(&self) -> Option<char> {
        self.thousands_separator
    }

    pub fn allowed_characters(&self) -> Option<&Range> {
        self.allowed_characters.as_ref()
    }

    /// Number of leading rows to skip before data starts.
    pub fn header(&self) -> u32 {
        self.header
    }

    /// 1-based sheet index for spreadsheet data.
    pub fn sheet(&self) -> u32 {
        self.sheet
    }

    /// Whether [`DataFormat::validate`] has been called and succeeded.
    pub fn is_valid(&self) -> bool {
        self.validated
    }

    /// Set a property from its declared name and value.
    ///
    /// Names are case-insensitive and may use spaces instead of
    /// underscores.
    pub fn set_property(
        &mut self,
        name: &str,
        value: &str,
        location: &Location,
    ) -> Result<(), InterfaceError> {
        let key = name.trim().to_lowercase().replace(' ', "_");
        match key.as_str() {
            KEY_FORMAT => Err(InterfaceError::at(
                format!("data format already is {} and must be set only once", self.kind),
                location.clone(),
            )),
            KEY_ENCODING => {
                self.encoding = validated_encoding(value, location)?;
                Ok(())
            }
            KEY_HEADER => {
                self.header = validated_count(&key, value, location)?;
                Ok(())
            }
            KEY_ALLOWED_CHARACTERS => {
                let range = Range::parse(value).map_err(|error| {
                    InterfaceError::at(
                        format!("value for property {key:?} must be a valid range: {error}"),
                        location.clone(),
                    )
                })?;
                self.allowed_characters = Some(range);
                Ok(())
            }
            KEY_LINE_DELIMITER => {
                self.require_kind(&key, &[FormatKind::Delimited, FormatKind::Fixed], location)?;
                let delimiter = LineDelimiter::parse(value).ok_or_else(|| {
                    InterfaceError::at(
                        format!(
                            "line delimiter is {value:?} but must be one of: \
                             any, cr, crlf, lf, none"
                        ),
                        location.clone(),
                    )
                })?;
                if delimiter == LineDelimiter::None && self.kind != FormatKind::Fixed {
                    return Err(InterfaceError::at(
                        "line delimiter \"none\" is only available for fixed data",
                        location.clone(),
                    ));
                }
                self.line_delimiter = delimiter;
                Ok(())
            }
            KEY_ITEM_DELIMITER => {
                self.require_kind(&key, &[FormatKind::Delimited], location)?;
                self.item_delimiter = validated_character(&key, value, location)?;
                Ok(())
            }
            KEY_QUOTE_CHARACTER => {
                self.require_kind(&key, &[FormatKind::Delimited], location)?;
                self.quote_character =
                    validated_choice_character(&key, value, &['"', '\''], location)?;
                Ok(())
            }
            KEY_ESCAPE_CHARACTER => {
                self.require_kind(&key, &[FormatKind::Delimited], location)?;
                self.escape_character =
                    validated_choice_character(&key, value, &['"', '\\'], location)?;
                Ok(())
            }
            KEY_SKIP_INITIAL_SPACE => {
                self.require_kind(&key, &[FormatKind::Delimited], location)?;
                self.skip_initial_space = validated_bool(&key, value, location)?;
                Ok(())
            }
            KEY_DECIMAL_SEPARATOR => {
                self.require_kind(&key, &[FormatKind::Delimited, FormatKind::Fixed], location)?;
                self.decimal_separator =
                    validated_choice_character(&key, value, &['.', ','], location)?;
                Ok(())
            }
            KEY_THOUSANDS_SEPARATOR => {
                self.require_kind(&key, &[FormatKind::Delimited, FormatKind::Fixed], location)?;
                if value.trim().is_empty() {
                    self.thousands_separator = None;
                } else {
                    self.thousands_separator =
                        Some(validated_choice_character(&key, value, &['.', ','], location)?);
                }
                Ok(())
            }
            KEY_SHEET => {
                self.require_kind(&key, &[FormatKind::Spreadsheet], location)?;
                let sheet = validated_count(&key, value, location)?;
                if sheet == 0 {
                    return Err(InterfaceError::at(
                        format!("data format property {key:?} must be at least 1"),
                        location.clone(),
                    ));
                }
                self.sheet = sheet;
                Ok(())
            }
            _ => Err(InterfaceError::at(
                format!(
                    "data format property {name:?} for format {} must be one of: \
                     allowed characters, decimal separator, encoding, escape character, \
                     header, item delimiter, line delimiter, quote character, sheet, \
                     skip initial space, thousands separator",
                    self.kind
                ),
                location.clone(),
            )),
        }
    }

    fn require_kind(
        &self,
        key: &str,
        allowed: &[FormatKind],
        location: &Location,
    ) -> Result<(), InterfaceError> {
        if allowed.contains(&self.kind) {
            return Ok(());
        }
        let names: Vec<&str> = allowed.iter().map(FormatKind::as_str).collect();
        Err(InterfaceError::at(
            format!(
                "data format property {key:?} is only available for {} data but format is {}",
                names.join(" and "),
                self.kind
            ),
            location.clone(),
        ))
    }

    /// Check that the collected properties are consistent and freeze the
    /// format.
    pub fn validate(&mut self, location: &Location) -> Result<(), InterfaceError> {
        if let Some(thousands) = self.thousands_separator
            && thousands == self.decimal_separator
        {
            return Err(InterfaceError::at(
                format!(
                    "decimal separator and thousands separator are both {:?} \
                     but must be different from each other",
                    self.decimal_separator
                ),
                location.clone(),
            ));
        }
        if self.kind == FormatKind::Delimited && self.item_delimiter == self.quote_character {
            return Err(InterfaceError::at(
                format!(
                    "item delimiter and quote character are both {:?} \
                     but must be different from each other",
                    self.item_delimiter
                ),
                location.clone(),
            ));
        }
        self.validated = true;
        Ok(())
    }
}

fn validated_encoding(value: &str, location: &Location) -> Result<String, InterfaceError> {
    let normalized = value.trim().to_lowercase();
    match normalized.as_str() {
        "utf-8" | "utf8" => Ok("utf-8".to_string()),
        "ascii" | "us-ascii" => Ok("ascii".to_string()),
        _ => Err(InterfaceError::at(
            format!("encoding is {value:?} but must be one of: ascii, utf-8"),
            location.clone(),
        )),
    }
}

fn validated_count(key: &str, value: &str, location: &Location) -> Result<u32, InterfaceError> {
    value.trim().parse::<u32>().map_err(|_| {
        InterfaceError::at(
            format!("data format property {key:?} is {value:?} but must be a number of at least 0"),
            location.clone(),
        )
    })
}

fn validated_bool(key: &str, value: &str, location: &Location) -> Result<bool, InterfaceError> {
    match value.trim().to_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(InterfaceError::at(
            format!("data format property {key:?} is {value:?} but must be: false or true"),
            location.clone(),
        )),
    }
}

fn validated_character(key: &str, value: &str, location: &Location) -> Result<char, InterfaceError> {
    character_code(value).map_err(|error| {
        InterfaceError::at(
            format!("value for data format property {key:?} is invalid: {error}"),
            location.clone(),
        )
    })
}

fn validated_choice_character(
    key: &str,
    value: &str,
    choices: &[char],
    location: &Location,
) -> Result<char, InterfaceError> {
    let character = validated_character(key, value, location)?;
    if choices.contains(&character) {
        return Ok(character);
    }
    let rendered: Vec<String> = choices.iter().map(|ch| format!("{ch:?}")).collect();
    Err(InterfaceError::at(
        format!(
            "data format property {key:?} is {character:?} but must be one of: {}",
            rendered.join(", ")
        ),
        location.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::{DataFormat, FormatKind, LineDelimiter};
    use crate::location::Location;

    fn location() -> Location {
        Location::new("cid.csv", 1, 2)
    }

    #[test]
    fn delimited_defaults() {
        let format = DataFormat::new(FormatKind::Delimited);
        assert_eq!(format.item_delimiter(), ',');
        assert_eq!(format.quote_character(), '"');
        assert_eq!(format.encoding(), "utf-8");
        assert_eq!(format.header(), 0);
        assert!(!format.is_valid());
    }

    #[test]
    fn sets_properties_with_flexible_names() {
        let mut format = DataFormat::new(FormatKind::Delimited);
        format
            .set_property("Item Delimiter", ";", &location())
            .expect("set item delimiter");
        format
            .set_property("header", "1", &location())
            .expect("set header");
        format
            .set_property("line_delimiter", "lf", &location())
            .expect("set line delimiter");
        assert_eq!(format.item_delimiter(), ';');
        assert_eq!(format.header(), 1);
        assert_eq!(format.line_delimiter(), LineDelimiter::Lf);
    }

    #[test]
    fn item_delimiter_accepts_character_codes() {
        let mut format = DataFormat::new(FormatKind::Delimited);
        format
            .set_property("item delimiter", "tab", &location())
            .expect("symbolic delimiter");
        assert_eq!(format.item_delimiter(), '\t');
        format
            .set_property("item delimiter", "0x3b", &location())
            .expect("hex delimiter");
        assert_eq!(format.item_delimiter(), ';');
    }

    #[test]
    fn rejects_properties_for_wrong_kind() {
        let mut format = DataFormat::new(FormatKind::Fixed);
        assert!(
            format
                .set_property("item delimiter", ";", &location())
                .is_err()
        );
        assert!(format.set_property("sheet", "2", &location()).is_err());
    }

    #[test]
    fn rejects_unknown_property_and_values() {
        let mut format = DataFormat::new(FormatKind::Delimited);
        assert!(format.set_property("color", "red", &location()).is_err());
        assert!(format.set_property("header", "-1", &location()).is_err());
        assert!(format.set_property("encoding", "klingon", &location()).is_err());
        assert!(
            format
                .set_property("quote character", ";", &location())
                .is_err()
        );
    }

    #[test]
    fn line_delimiter_none_is_fixed_only() {
        let mut delimited = DataFormat::new(FormatKind::Delimited);
        assert!(
            delimited
                .set_property("line delimiter", "none", &location())
                .is_err()
        );
        let mut fixed = DataFormat::new(FormatKind::Fixed);
        fixed
            .set_property("line delimiter", "none", &location())
            .expect("none for fixed");
        assert_eq!(fixed.line_delimiter(), LineDelimiter::None);
    }

    #[test]
    fn validate_rejects_clashing_separators() {
        let mut format = DataFormat::new(FormatKind::Delimited);
        format
            .set_property("decimal separator", ".", &location())
            .expect("decimal");
        format
            .set_property("thousands separator", ".", &location())
            .expect("thousands");
        assert!(format.validate(&location()).is_err());
    }

    #[test]
    fn validate_rejects_item_delimiter_equal_to_quote() {
        let mut format = DataFormat::new(FormatKind::Delimited);
        format
            .set_property("item delimiter", "\"", &location())
            .expect("item delimiter");
        assert!(format.validate(&location()).is_err());
    }

    #[test]
    fn validate_accepts_the_defaults() {
        let mut format = DataFormat::new(FormatKind::Delimited);
        format.validate(&location()).expect("defaults are consistent");
    }

    #[test]
    fn validate_freezes_format() {
        let mut format = DataFormat::new(FormatKind::Delimited);
        format.validate(&location()).expect("validate");
        assert!(format.is_valid());
    }
}
