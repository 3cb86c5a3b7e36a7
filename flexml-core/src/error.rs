//! Recoverable parse errors.
//!
//! The scanner never aborts: every error below is reported alongside a
//! best-effort event, and parsing continues after it.

use crate::span::Location;

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorCode {
    /// No valid name character at the expected position
    InvalidName = 0,
    /// Input ended before any name character was read
    NameAtEndOfInput,
    /// `<!--` without `-->`
    UnterminatedComment,
    /// `<?target` without `?>`
    UnterminatedProcessingInstruction,
    /// Quoted attribute value without its closing quote
    UnterminatedAttributeValue,
}

impl ErrorCode {
    /// Get a human-readable message for this error code.
    pub fn message(self) -> &'static str {
        match self {
            Self::InvalidName => "invalid name start character",
            Self::NameAtEndOfInput => "unexpected end of input when reading name",
            Self::UnterminatedComment => "unterminated comment, expected \"-->\"",
            Self::UnterminatedProcessingInstruction => {
                "unterminated processing instruction, expected \"?>\""
            }
            Self::UnterminatedAttributeValue => "unterminated quoted attribute value",
        }
    }

    /// Name could not be read.
    pub fn is_name_error(self) -> bool {
        matches!(self, Self::InvalidName | Self::NameAtEndOfInput)
    }

    /// A delimited construct never found its closing delimiter.
    pub fn is_unterminated(self) -> bool {
        matches!(
            self,
            Self::UnterminatedComment
                | Self::UnterminatedProcessingInstruction
                | Self::UnterminatedAttributeValue
        )
    }
}

/// A recovered parse error.
///
/// `partial` holds the text consumed by the failing construct: the markup
/// opener for name errors, the body read so far for unterminated ones.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} at {location}", .code.message())]
pub struct ParseError {
    pub code: ErrorCode,
    pub location: Location,
    pub partial: String,
}

impl ParseError {
    pub fn new(code: ErrorCode, location: Location, partial: impl Into<String>) -> Self {
        Self {
            code,
            location,
            partial: partial.into(),
        }
    }

    pub fn is_name_error(&self) -> bool {
        self.code.is_name_error()
    }

    pub fn is_unterminated(&self) -> bool {
        self.code.is_unterminated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(ErrorCode::InvalidName.is_name_error());
        assert!(ErrorCode::NameAtEndOfInput.is_name_error());
        assert!(!ErrorCode::UnterminatedComment.is_name_error());
        assert!(ErrorCode::UnterminatedComment.is_unterminated());
        assert!(ErrorCode::UnterminatedAttributeValue.is_unterminated());
        assert!(!ErrorCode::InvalidName.is_unterminated());
    }

    #[test]
    fn test_error_display() {
        let loc = Location { offset: 4, line: 1, column: 5 };
        let err = ParseError::new(ErrorCode::UnterminatedComment, loc, " partial");
        assert_eq!(
            err.to_string(),
            "unterminated comment, expected \"-->\" at line 1, column 5"
        );
    }
}
