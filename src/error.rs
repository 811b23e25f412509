use std::fmt;

/// Wire position of each field in an encoded line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Level = 0,
    Date = 1,
    Body = 2,
    File = 3,
    Function = 4,
    Line = 5,
    IsActive = 6,
}

impl Field {
    /// Number of fields in one encoded record.
    pub const COUNT: usize = 7;

    pub fn position(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Field::Level => "level",
            Field::Date => "date",
            Field::Body => "body",
            Field::File => "file",
            Field::Function => "function",
            Field::Line => "line",
            Field::IsActive => "isActive",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error type returned when decoding a line.
///
/// There is a single failure kind. The attached detail only exists to make
/// logs readable; callers should not branch on it.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("serialized data is broken: {detail}")]
    MalformedRecord { detail: MalformedDetail },
}

/// Which part of the line could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedDetail {
    /// Splitting produced the wrong number of fields.
    FieldCount { found: usize },
    /// A field did not parse as its expected type or range.
    InvalidField { field: Field, value: String },
}

impl fmt::Display for MalformedDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedDetail::FieldCount { found } => {
                write!(f, "expected {} fields, found {}", Field::COUNT, found)
            }
            MalformedDetail::InvalidField { field, value } => {
                write!(f, "invalid {} field {:?}", field, value)
            }
        }
    }
}

impl CodecError {
    pub(crate) fn field_count(found: usize) -> Self {
        CodecError::MalformedRecord {
            detail: MalformedDetail::FieldCount { found },
        }
    }

    pub(crate) fn invalid(field: Field, value: &str) -> Self {
        CodecError::MalformedRecord {
            detail: MalformedDetail::InvalidField {
                field,
                value: value.to_string(),
            },
        }
    }

    /// The offending field, if the failure was tied to one.
    pub fn field(&self) -> Option<Field> {
        match self {
            CodecError::MalformedRecord {
                detail: MalformedDetail::InvalidField { field, .. },
            } => Some(*field),
            CodecError::MalformedRecord { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let err = CodecError::field_count(6);
        assert_eq!(
            err.to_string(),
            "serialized data is broken: expected 7 fields, found 6"
        );
        assert_eq!(err.field(), None);

        let err = CodecError::invalid(Field::Level, "5");
        assert_eq!(err.to_string(), "serialized data is broken: invalid level field \"5\"");
        assert_eq!(err.field(), Some(Field::Level));
    }
}
