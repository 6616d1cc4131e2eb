/*!
The `dsv` crate reads and writes delimiter-separated text such as CSV and
TSV, one character at a time.

A [`FormatSpec`](struct.FormatSpec.html) describes the delimiter, quote,
escape and row terminator. A [`Reader`](struct.Reader.html) turns a stream
of characters into rows of `String` values, and a
[`Writer`](struct.Writer.html) turns rows back into characters, quoting
values only when it has to.

# Example

```
use dsv::{ReaderBuilder, WriterBuilder};

let mut wtr = WriterBuilder::new().delimiter(';').from_writer(vec![]);
wtr.write_row(&["city", "note"])?;
wtr.write_row(&["Boston", "cold;\nsnowy"])?;
let data = String::from_utf8(wtr.into_inner()?).unwrap();

let mut rdr = ReaderBuilder::new().delimiter(';').from_text(&data);
let rows = rdr.rows().collect::<dsv::Result<Vec<_>>>()?;
assert_eq!(rows, vec![vec!["city", "note"], vec!["Boston", "cold;\nsnowy"]]);
# Ok::<(), dsv::Error>(())
```

# Errors

Reading fails with `Error::MalformedInput` in exactly two situations: a
quoted value that is still open at the end of the input, and a closing quote
followed by something other than a delimiter or line break. The error
carries the number of rows completed before the bad one. I/O errors from the
underlying source or sink are returned as `Error::Io`, untouched.
*/

#![deny(missing_docs)]

pub use crate::error::{Error, Result};
pub use crate::format::{FormatSpec, SpecialChars};
pub use crate::reader::{Reader, ReaderBuilder, Row, Rows};
pub use crate::source::{CharRead, Utf8Chars};
pub use crate::writer::{Writer, WriterBuilder};

mod error;
mod format;
mod lookahead;
mod reader;
mod source;
mod writer;
