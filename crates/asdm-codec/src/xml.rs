//! Text forms of attribute values in table documents.
//!
//! Scalars are written as plain text and enumerations by literal name.
//! Arrays carry their rank and dimensions in front of the elements:
//! `1 3 a b c` for a vector and `2 2 3 a b c d e f` for a 2x3 matrix.
//! Strings inside arrays are double-quoted so they may contain spaces.

use asdm_model::{
    Angle, AntennaMake, AntennaType, ArrayTime, AsdmEnum, AtmPhaseCorrection, BasebandName,
    CorrelationMode, CorrelatorCalibration, Frequency, Interval, Length, NetSideband,
    PolarizationType, ProcessorSubType, ProcessorType, SidebandProcessingMode,
    SpectralResolutionType, StationType, StokesParameter, SubscanIntent, SwitchingMode, Tag,
    WindowFunction,
};

use crate::error::{CodecError, Result};

/// A value with a text form in table documents.
pub trait XmlValue: Sized {
    /// Whether array elements of this type are written in double quotes.
    const QUOTED: bool = false;

    fn to_xml_text(&self) -> String;

    /// Parse element text. Implementations other than `String` ignore
    /// surrounding whitespace.
    fn from_xml_text(text: &str) -> Result<Self>;
}

impl XmlValue for bool {
    fn to_xml_text(&self) -> String {
        self.to_string()
    }

    fn from_xml_text(text: &str) -> Result<Self> {
        match text.trim() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(CodecError::invalid_value(other, "expected true or false")),
        }
    }
}

impl XmlValue for String {
    const QUOTED: bool = true;

    fn to_xml_text(&self) -> String {
        self.clone()
    }

    fn from_xml_text(text: &str) -> Result<Self> {
        Ok(text.to_string())
    }
}

macro_rules! parsed_xml_value {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl XmlValue for $ty {
                fn to_xml_text(&self) -> String {
                    self.to_string()
                }

                fn from_xml_text(text: &str) -> Result<Self> {
                    text.trim()
                        .parse::<$ty>()
                        .map_err(|e| CodecError::invalid_value(text, e.to_string()))
                }
            }
        )+
    };
}

parsed_xml_value!(i32, i64, f64, Tag, ArrayTime, Interval, Length, Frequency, Angle);

macro_rules! enum_xml_value {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl XmlValue for $ty {
                fn to_xml_text(&self) -> String {
                    self.as_str().to_string()
                }

                fn from_xml_text(text: &str) -> Result<Self> {
                    Ok(<$ty>::from_literal(text)?)
                }
            }
        )+
    };
}

enum_xml_value!(
    StationType,
    AntennaMake,
    AntennaType,
    BasebandName,
    NetSideband,
    SidebandProcessingMode,
    WindowFunction,
    StokesParameter,
    PolarizationType,
    ProcessorType,
    ProcessorSubType,
    CorrelationMode,
    AtmPhaseCorrection,
    SpectralResolutionType,
    SubscanIntent,
    SwitchingMode,
    CorrelatorCalibration,
);

fn element_text<T: XmlValue>(value: &T) -> String {
    if !T::QUOTED {
        return value.to_xml_text();
    }
    let text = value.to_xml_text();
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Format a vector as `1 N v1 .. vN`.
pub fn format_array<T: XmlValue>(values: &[T]) -> String {
    let mut out = format!("1 {}", values.len());
    for v in values {
        out.push(' ');
        out.push_str(&element_text(v));
    }
    out
}

/// Format a matrix as `2 R C v..` in row-major order.
pub fn format_matrix<T: XmlValue>(values: &[Vec<T>]) -> Result<String> {
    let columns = values.first().map_or(0, Vec::len);
    if values.iter().any(|row| row.len() != columns) {
        return Err(CodecError::invalid_value(
            format!("{} rows", values.len()),
            "ragged two-dimensional array",
        ));
    }
    if columns == 0 && !values.is_empty() {
        return Err(CodecError::invalid_value(
            format!("{} rows", values.len()),
            "two-dimensional array rows have no columns",
        ));
    }
    let mut out = format!("2 {} {}", values.len(), columns);
    for v in values.iter().flatten() {
        out.push(' ');
        out.push_str(&element_text(v));
    }
    Ok(out)
}

pub fn parse_array<T: XmlValue>(text: &str) -> Result<Vec<T>> {
    let tokens = tokenize(text)?;
    let dims = parse_dimensions(text, &tokens, 1)?;
    let values = &tokens[2..];
    if values.len() != dims[0] {
        return Err(CodecError::invalid_value(
            text,
            format!("expected {} elements, found {}", dims[0], values.len()),
        ));
    }
    values.iter().map(|t| T::from_xml_text(t)).collect()
}

pub fn parse_matrix<T: XmlValue>(text: &str) -> Result<Vec<Vec<T>>> {
    let tokens = tokenize(text)?;
    let dims = parse_dimensions(text, &tokens, 2)?;
    let (rows, columns) = (dims[0], dims[1]);
    let values = &tokens[3..];
    if Some(values.len()) != rows.checked_mul(columns) {
        return Err(CodecError::invalid_value(
            text,
            format!(
                "expected {rows}x{columns} elements, found {}",
                values.len()
            ),
        ));
    }
    if columns == 0 {
        if rows != 0 {
            return Err(CodecError::invalid_value(text, "rows without columns"));
        }
        return Ok(Vec::new());
    }
    values
        .chunks(columns)
        .map(|row| row.iter().map(|t| T::from_xml_text(t)).collect())
        .collect()
}

fn parse_dimensions(text: &str, tokens: &[String], rank: usize) -> Result<Vec<usize>> {
    if tokens.len() < rank + 1 {
        return Err(CodecError::invalid_value(text, "missing array dimensions"));
    }
    if tokens[0] != rank.to_string() {
        return Err(CodecError::invalid_value(
            text,
            format!("expected a {rank}-dimensional array"),
        ));
    }
    tokens[1..=rank]
        .iter()
        .map(|t| {
            t.parse::<usize>()
                .map_err(|_| CodecError::invalid_value(text, format!("invalid dimension '{t}'")))
        })
        .collect()
}

/// Split on whitespace, keeping double-quoted runs together without their
/// quotes. Inside quotes a backslash escapes the next character.
fn tokenize(text: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c == '"' {
            chars.next();
            let mut token = String::new();
            loop {
                match chars.next() {
                    Some('"') => break,
                    Some('\\') => match chars.next() {
                        Some(ch) => token.push(ch),
                        None => return Err(CodecError::invalid_value(text, "unterminated quote")),
                    },
                    Some(ch) => token.push(ch),
                    None => return Err(CodecError::invalid_value(text, "unterminated quote")),
                }
            }
            tokens.push(token);
        } else {
            let mut token = String::new();
            while let Some(&ch) = chars.peek() {
                if ch.is_whitespace() {
                    break;
                }
                token.push(ch);
                chars.next();
            }
            tokens.push(token);
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use asdm_model::TagType;

    #[test]
    fn test_vector_notation() {
        let v = vec![Length::new(1.5), Length::new(-2.0), Length::new(3.0)];
        assert_eq!(format_array(&v), "1 3 1.5 -2 3");
        assert_eq!(parse_array::<Length>(" 1 3 1.5 -2 3 ").unwrap(), v);
    }

    #[test]
    fn test_empty_vector() {
        assert_eq!(format_array::<i32>(&[]), "1 0");
        assert!(parse_array::<i32>("1 0").unwrap().is_empty());
    }

    #[test]
    fn test_quoted_strings() {
        let v = vec!["first log".to_string(), String::new(), "x".to_string()];
        let text = format_array(&v);
        assert_eq!(text, "1 3 \"first log\" \"\" \"x\"");
        assert_eq!(parse_array::<String>(&text).unwrap(), v);
        assert!(parse_array::<String>("1 1 \"open").is_err());
    }

    #[test]
    fn test_quotes_inside_strings_are_escaped() {
        let v = vec!["say \"hi\"".to_string(), "back\\slash".to_string(), " ".to_string()];
        let text = format_array(&v);
        assert_eq!(text, r#"1 3 "say \"hi\"" "back\\slash" " ""#);
        assert_eq!(parse_array::<String>(&text).unwrap(), v);
        assert!(parse_array::<String>("1 1 \"dangling\\").is_err());
    }

    #[test]
    fn test_tags_and_enums() {
        let tags = vec![Tag::new(0, TagType::Antenna), Tag::new(4, TagType::Antenna)];
        assert_eq!(format_array(&tags), "1 2 Antenna_0 Antenna_4");
        assert_eq!(
            parse_array::<StokesParameter>("1 2 XX YY").unwrap(),
            vec![StokesParameter::XX, StokesParameter::YY]
        );
    }

    #[test]
    fn test_matrix_notation() {
        let m = vec![
            vec![PolarizationType::X, PolarizationType::X],
            vec![PolarizationType::Y, PolarizationType::Y],
        ];
        let text = format_matrix(&m).unwrap();
        assert_eq!(text, "2 2 2 X X Y Y");
        assert_eq!(parse_matrix::<PolarizationType>(&text).unwrap(), m);
    }

    #[test]
    fn test_dimension_mismatch() {
        assert!(parse_array::<i32>("1 3 1 2").is_err());
        assert!(parse_array::<i32>("2 1 1 5").is_err());
        assert!(parse_matrix::<i32>("2 2 2 1 2 3").is_err());
        assert!(parse_array::<i32>("").is_err());
    }

    #[test]
    fn test_rows_without_columns() {
        assert!(parse_matrix::<i32>("2 4000000000000000000 0").is_err());
        assert!(parse_matrix::<i32>("2 0 0").unwrap().is_empty());
        assert!(parse_matrix::<i32>("2 0 3").unwrap().is_empty());
        assert!(format_matrix::<i32>(&[vec![]]).is_err());
        assert_eq!(format_matrix::<i32>(&[]).unwrap(), "2 0 0");
    }

    #[test]
    fn test_scalars() {
        assert!(bool::from_xml_text(" true ").unwrap());
        assert!(bool::from_xml_text("yes").is_err());
        assert_eq!(i32::from_xml_text(" 42 ").unwrap(), 42);
        assert_eq!(f64::from_xml_text("2.5e9").unwrap(), 2.5e9);
        assert_eq!(
            BasebandName::from_xml_text("BB_3").unwrap(),
            BasebandName::Bb3
        );
    }
}
