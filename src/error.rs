use std::error;
use std::fmt;
use std::io;
use std::result;

/// A type alias for `Result<T, dsv::Error>`.
pub type Result<T> = result::Result<T, Error>;

/// The message attached to a quoted value that runs into the end of input.
pub(crate) const UNEXPECTED_EOF: &str = "unexpected end of file in quoted value";

/// The message attached to a quoted value whose closing quote is followed by
/// something other than a delimiter or line terminator.
pub(crate) const UNTERMINATED_QUOTE: &str =
    "quoted value not terminated after ending quote";

/// An error that can occur when processing delimited data.
///
/// There are exactly two kinds of failure. Either the underlying source or
/// sink reported an I/O error, which is carried here untouched, or the reader
/// found structurally malformed input.
///
/// Writing can only ever fail with `Error::Io`: every string is representable
/// once quoted.
#[derive(Debug)]
pub enum Error {
    /// An I/O error that occurred while reading from the source or writing
    /// to the sink.
    Io(io::Error),
    /// The input is not well formed.
    MalformedInput {
        /// The number of rows completed before the one that failed. This is
        /// a logical row count, so line breaks embedded in quoted values do
        /// not advance it.
        row: u64,
        /// A description of what went wrong.
        msg: &'static str,
    },
}

impl Error {
    pub(crate) fn malformed(row: u64, msg: &'static str) -> Error {
        Error::MalformedInput { row, msg }
    }

    /// Returns the zero-based row number at which parsing failed, if this
    /// is a malformed input error.
    pub fn row(&self) -> Option<u64> {
        match *self {
            Error::Io(_) => None,
            Error::MalformedInput { row, .. } => Some(row),
        }
    }

    /// Returns true if this is an I/O error.
    pub fn is_io_error(&self) -> bool {
        match *self {
            Error::Io(_) => true,
            Error::MalformedInput { .. } => false,
        }
    }

    /// Unwraps the underlying I/O error, if there is one.
    pub fn into_io_error(self) -> Option<io::Error> {
        match self {
            Error::Io(err) => Some(err),
            Error::MalformedInput { .. } => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> io::Error {
        match err {
            Error::Io(err) => err,
            err @ Error::MalformedInput { .. } => {
                io::Error::new(io::ErrorKind::InvalidData, err)
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Io(ref err) => Some(err),
            Error::MalformedInput { .. } => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Io(ref err) => err.fmt(f),
            Error::MalformedInput { row, msg } => {
                write!(f, "malformed input: row {}: {}", row, msg)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::{Error, UNEXPECTED_EOF};

    #[test]
    fn malformed_display_names_row() {
        let err = Error::malformed(2, UNEXPECTED_EOF);
        assert_eq!(
            err.to_string(),
            "malformed input: row 2: unexpected end of file in quoted value"
        );
        assert_eq!(err.row(), Some(2));
        assert!(!err.is_io_error());
    }

    #[test]
    fn io_error_is_not_rewrapped() {
        let err = Error::from(io::Error::new(io::ErrorKind::BrokenPipe, "x"));
        assert!(err.is_io_error());
        assert_eq!(err.row(), None);
        let inner = err.into_io_error().unwrap();
        assert_eq!(inner.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn malformed_converts_to_invalid_data() {
        let err: io::Error = Error::malformed(0, UNEXPECTED_EOF).into();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
