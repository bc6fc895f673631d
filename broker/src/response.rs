//! Typed response decoding.
//!
//! A correspondent's reply is decoded according to the type the calling program asked for.
//! Text and numbers are decoded from the body here; pictures are resolved by the
//! conversation layer because they need the transport to look up attached media.

use std::fmt;
use std::str::FromStr;

use playground_core::PlaygroundError;

pub const INT_RETRY_PROMPT: &str = "Whole numbers only, please. Try again.";
pub const FLOAT_RETRY_PROMPT: &str = "Numbers only, please. Try again.";
pub const PICTURE_RETRY_PROMPT: &str = "Please reply with a picture.";

/// The `{type}` path segment of a response request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseType {
    String,
    Int,
    Float,
    Picture,
}

impl ResponseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseType::String => "string",
            ResponseType::Int => "int",
            ResponseType::Float => "float",
            ResponseType::Picture => "picture",
        }
    }

    /// Prompt sent back to the correspondent when a reply cannot be decoded as this type.
    pub fn retry_prompt(&self) -> Option<&'static str> {
        match self {
            ResponseType::String => None,
            ResponseType::Int => Some(INT_RETRY_PROMPT),
            ResponseType::Float => Some(FLOAT_RETRY_PROMPT),
            ResponseType::Picture => Some(PICTURE_RETRY_PROMPT),
        }
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseType {
    type Err = PlaygroundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(ResponseType::String),
            "int" => Ok(ResponseType::Int),
            "float" => Ok(ResponseType::Float),
            "picture" => Ok(ResponseType::Picture),
            other => Err(PlaygroundError::UnsupportedResponseType(other.to_string())),
        }
    }
}

/// A successfully decoded reply.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseValue {
    Text(String),
    Int(i64),
    Float(f64),
    /// Code of the picture record created from the reply's first media item.
    Picture(String),
}

/// Decodes `body` as `expected` (text, int or float). On failure returns the retry prompt to
/// send to the correspondent. Numbers are trimmed before parsing; non-finite floats are
/// rejected since they cannot be represented in the JSON reply.
pub fn decode_text(expected: ResponseType, body: &str) -> Result<ResponseValue, &'static str> {
    match expected {
        ResponseType::String => Ok(ResponseValue::Text(body.to_string())),
        ResponseType::Int => body
            .trim()
            .parse::<i64>()
            .map(ResponseValue::Int)
            .map_err(|_| INT_RETRY_PROMPT),
        ResponseType::Float => match body.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(ResponseValue::Float(value)),
            _ => Err(FLOAT_RETRY_PROMPT),
        },
        ResponseType::Picture => Err(PICTURE_RETRY_PROMPT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_always_succeeds_with_raw_body() {
        assert_eq!(
            decode_text(ResponseType::String, "  Sarah "),
            Ok(ResponseValue::Text("  Sarah ".into()))
        );
        assert_eq!(
            decode_text(ResponseType::String, ""),
            Ok(ResponseValue::Text(String::new()))
        );
    }

    #[test]
    fn int_parses_whole_numbers() {
        assert_eq!(decode_text(ResponseType::Int, "12"), Ok(ResponseValue::Int(12)));
        assert_eq!(decode_text(ResponseType::Int, " -7 "), Ok(ResponseValue::Int(-7)));
    }

    #[test]
    fn int_rejects_non_integers() {
        assert_eq!(decode_text(ResponseType::Int, "abc"), Err(INT_RETRY_PROMPT));
        assert_eq!(decode_text(ResponseType::Int, "1.5"), Err(INT_RETRY_PROMPT));
    }

    #[test]
    fn float_parses_numbers() {
        assert_eq!(decode_text(ResponseType::Float, "2.5"), Ok(ResponseValue::Float(2.5)));
        assert_eq!(decode_text(ResponseType::Float, "3"), Ok(ResponseValue::Float(3.0)));
    }

    #[test]
    fn float_rejects_text_and_non_finite() {
        assert_eq!(decode_text(ResponseType::Float, "two"), Err(FLOAT_RETRY_PROMPT));
        assert_eq!(decode_text(ResponseType::Float, "inf"), Err(FLOAT_RETRY_PROMPT));
        assert_eq!(decode_text(ResponseType::Float, "NaN"), Err(FLOAT_RETRY_PROMPT));
    }

    #[test]
    fn response_type_round_trips_path_segment() {
        for ty in [
            ResponseType::String,
            ResponseType::Int,
            ResponseType::Float,
            ResponseType::Picture,
        ] {
            assert_eq!(ty.as_str().parse::<ResponseType>().unwrap(), ty);
        }
        assert!("bool".parse::<ResponseType>().is_err());
    }
}
