use std::io;

use log::{debug, trace};

use crate::error::Result;
use crate::format::FormatSpec;

/// Builds a writer with various configuration knobs.
///
/// This builder can be used to tweak the delimiter, quote, escape and row
/// terminator. Once a `Writer` is built, its configuration cannot be
/// changed.
#[derive(Debug, Default)]
pub struct WriterBuilder {
    format: FormatSpec,
}

impl WriterBuilder {
    /// Create a new builder with the default format.
    pub fn new() -> WriterBuilder {
        WriterBuilder::default()
    }

    /// Build a writer over an arbitrary `io::Write`.
    ///
    /// The writer is *not* buffered. Every value results in one or more
    /// calls to `write_all` on the sink, so wrap it in an `io::BufWriter`
    /// yourself if that matters.
    pub fn from_writer<W: io::Write>(&self, wtr: W) -> Writer<W> {
        Writer { wtr, format: self.format.clone(), rows: 0 }
    }

    /// Replace the whole format.
    pub fn format(&mut self, format: FormatSpec) -> &mut WriterBuilder {
        self.format = format;
        self
    }

    /// The delimiter written between values.
    ///
    /// The default is `,`.
    pub fn delimiter(&mut self, delimiter: char) -> &mut WriterBuilder {
        self.format.delimiter = delimiter;
        self
    }

    /// The quote character.
    ///
    /// The default is `"`.
    pub fn quote(&mut self, quote: char) -> &mut WriterBuilder {
        self.format.quote = quote;
        self
    }

    /// The character written before every quote inside a quoted value.
    ///
    /// When `None` (the default), quotes are escaped by doubling them.
    pub fn escape(&mut self, escape: Option<char>) -> &mut WriterBuilder {
        self.format.escape = escape;
        self
    }

    /// The string written after every row, verbatim.
    ///
    /// It may be empty or several characters long. The default is `"\n"`.
    pub fn terminator<T: Into<String>>(&mut self, term: T) -> &mut WriterBuilder {
        self.format.terminator = term.into();
        self
    }
}

/// A writer of delimited text.
///
/// A value is quoted only when it contains the delimiter, the quote or a
/// character of the terminator. Inside a quoted value, every quote is
/// preceded by the escape character (which is the quote itself by default).
///
/// Note that `\r` is not quoted under the default `"\n"` terminator, even
/// though readers treat it as a line break. Use a `"\r\n"` terminator if
/// values may contain carriage returns.
///
/// # Example
///
/// ```
/// let mut wtr = dsv::Writer::from_writer(vec![]);
/// wtr.write_row(&["a", "b,c"])?;
/// wtr.write_row(&["say \"hi\""])?;
///
/// let data = String::from_utf8(wtr.into_inner()?).unwrap();
/// assert_eq!(data, "a,\"b,c\"\n\"say \"\"hi\"\"\"\n");
/// # Ok::<(), dsv::Error>(())
/// ```
#[derive(Debug)]
pub struct Writer<W> {
    wtr: W,
    format: FormatSpec,
    rows: u64,
}

impl<W: io::Write> Writer<W> {
    /// Create a writer with the default format.
    pub fn from_writer(wtr: W) -> Writer<W> {
        WriterBuilder::new().from_writer(wtr)
    }

    /// Write a single row.
    ///
    /// Values are separated by the delimiter and the row is followed by the
    /// terminator. A row without any values is written as just the
    /// terminator. Note that reading that back yields a row with one empty
    /// value, not an empty row.
    pub fn write_row<I, T>(&mut self, row: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut first = true;
        for value in row {
            if !first {
                self.write_char(self.format.delimiter)?;
            }
            first = false;
            self.write_value(value.as_ref())?;
        }
        self.wtr.write_all(self.format.terminator.as_bytes())?;
        trace!("wrote row {}", self.rows);
        self.rows += 1;
        Ok(())
    }

    /// Write every row produced by `rows`, stopping at the first error.
    pub fn write_rows<I, R, T>(&mut self, rows: I) -> Result<()>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        for row in rows {
            self.write_row(row)?;
        }
        Ok(())
    }

    /// Flush the underlying sink.
    pub fn flush(&mut self) -> Result<()> {
        self.wtr.flush()?;
        Ok(())
    }

    /// The number of rows written so far.
    pub fn rows_written(&self) -> u64 {
        self.rows
    }

    /// The format this writer produces.
    pub fn format(&self) -> &FormatSpec {
        &self.format
    }

    /// Gets a reference to the underlying sink.
    pub fn get_ref(&self) -> &W {
        &self.wtr
    }

    /// Flush and close this writer, dropping the underlying sink.
    pub fn close(mut self) -> Result<()> {
        self.flush()?;
        debug!("closing writer after {} rows", self.rows);
        Ok(())
    }

    /// Flush this writer and return the underlying sink.
    pub fn into_inner(mut self) -> Result<W> {
        self.flush()?;
        Ok(self.wtr)
    }

    fn write_value(&mut self, value: &str) -> Result<()> {
        if !self.format.needs_quotes(value) {
            self.wtr.write_all(value.as_bytes())?;
            return Ok(());
        }
        let quote = self.format.quote;
        let escape = self.format.escape();
        self.write_char(quote)?;
        let mut last = 0;
        for (i, _) in value.match_indices(quote) {
            self.wtr.write_all(value[last..i].as_bytes())?;
            self.write_char(escape)?;
            self.write_char(quote)?;
            last = i + quote.len_utf8();
        }
        self.wtr.write_all(value[last..].as_bytes())?;
        self.write_char(quote)
    }

    fn write_char(&mut self, ch: char) -> Result<()> {
        let mut buf = [0; 4];
        self.wtr.write_all(ch.encode_utf8(&mut buf).as_bytes())?;
        Ok(())
    }
}
