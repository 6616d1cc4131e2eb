use std::io;
use std::iter::FusedIterator;
use std::str;

use log::{debug, trace};

use crate::error::{Error, Result, UNEXPECTED_EOF, UNTERMINATED_QUOTE};
use crate::format::FormatSpec;
use crate::lookahead::Lookahead;
use crate::source::{CharRead, Utf8Chars};

/// Builds a reader with various configuration knobs.
///
/// This builder can be used to tweak the delimiter, quote and escape
/// characters. Once a `Reader` is built, its configuration cannot be changed.
///
/// There is no knob for the row terminator: readers always accept `\n`,
/// `\r` and `\r\n`.
#[derive(Debug, Default)]
pub struct ReaderBuilder {
    format: FormatSpec,
}

impl ReaderBuilder {
    /// Create a new builder with the default format.
    pub fn new() -> ReaderBuilder {
        ReaderBuilder::default()
    }

    /// Build a reader over an arbitrary character source.
    pub fn from_source<S: CharRead>(&self, src: S) -> Reader<S> {
        Reader::new(self.format.clone(), src)
    }

    /// Build a reader over UTF-8 data from an arbitrary `io::Read`.
    ///
    /// The reader is buffered for you automatically.
    pub fn from_reader<R: io::Read>(&self, rdr: R) -> Reader<Utf8Chars<R>> {
        self.from_source(Utf8Chars::new(rdr))
    }

    /// Build a reader over an in memory string.
    pub fn from_text<'a>(&self, text: &'a str) -> Reader<str::Chars<'a>> {
        self.from_source(text.chars())
    }

    /// Replace the whole format.
    pub fn format(&mut self, format: FormatSpec) -> &mut ReaderBuilder {
        self.format = format;
        self
    }

    /// The delimiter separating values.
    ///
    /// The default is `,`.
    pub fn delimiter(&mut self, delimiter: char) -> &mut ReaderBuilder {
        self.format.delimiter = delimiter;
        self
    }

    /// The quote character.
    ///
    /// The default is `"`.
    pub fn quote(&mut self, quote: char) -> &mut ReaderBuilder {
        self.format.quote = quote;
        self
    }

    /// The escape character for quotes inside quoted values.
    ///
    /// When `None` (the default), quotes are escaped by doubling them.
    pub fn escape(&mut self, escape: Option<char>) -> &mut ReaderBuilder {
        self.format.escape = escape;
        self
    }
}

/// Where a reader is relative to the rows it hands out.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    /// Positioned at the start of a row (or at the end of the source).
    Ready,
    /// A `Row` has been handed out and has not finished yet.
    InRow,
    /// No more rows will be produced: the source is exhausted, an error
    /// occurred or a row was abandoned part way through.
    Done,
}

/// How a value ended.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ValueEnd {
    /// A delimiter followed, so another value is in the same row.
    Delimiter,
    /// The row terminator (or the end of the source) followed.
    Row,
}

/// A pull based reader of delimited text.
///
/// The reader holds exactly one character of lookahead over its source and
/// never reads further than it needs to find the end of the current value.
///
/// Rows are read with `next_row`, which hands out a `Row`: a lazy iterator
/// over the values in that row. A `Row` borrows the reader mutably, so the
/// next row cannot be started before the current one is gone.
///
/// # Format
///
/// * A value starting with the quote character is quoted. Delimiters and
///   line breaks inside it are content. The closing quote must be followed
///   by a delimiter, a line break or the end of the input.
/// * Inside a quoted value, a quote is escaped either by doubling it (when
///   the escape is the quote, the default) or by preceding it with the
///   escape character.
/// * Outside of quotes, no escaping is recognized at all.
/// * `\n`, `\r` and `\r\n` each end a row.
/// * An empty line is a row with one empty value.
///
/// # Example
///
/// ```
/// let mut rdr = dsv::Reader::from_text("a,b\n\"c,d\",e\n");
/// let mut rows = vec![];
/// for result in rdr.rows() {
///     rows.push(result?);
/// }
/// assert_eq!(rows, vec![vec!["a", "b"], vec!["c,d", "e"]]);
/// # Ok::<(), dsv::Error>(())
/// ```
#[derive(Debug)]
pub struct Reader<S> {
    src: Lookahead<S>,
    format: FormatSpec,
    row: u64,
    state: State,
}

impl<S: CharRead> Reader<S> {
    fn new(format: FormatSpec, src: S) -> Reader<S> {
        Reader { src: Lookahead::new(src), format, row: 0, state: State::Ready }
    }

    /// Create a reader with the default format over a character source.
    pub fn from_source(src: S) -> Reader<S> {
        ReaderBuilder::new().from_source(src)
    }

    /// Start reading the next row.
    ///
    /// Returns `None` when the source has no characters left. Otherwise the
    /// returned `Row` yields at least one value, and once it has yielded all
    /// of them, the source is positioned just past that row's terminator.
    ///
    /// If a previous `Row` was dropped before it finished, reading cannot
    /// resume in the middle of that row, so this returns `None` for good.
    pub fn next_row(&mut self) -> Result<Option<Row<'_, S>>> {
        match self.state {
            State::Ready => {}
            State::Done => return Ok(None),
            State::InRow => {
                debug!("row {} was abandoned, no further rows", self.row);
                self.state = State::Done;
                return Ok(None);
            }
        }
        match self.src.peek() {
            Ok(Some(_)) => {
                self.state = State::InRow;
                Ok(Some(Row { rdr: self, finished: false }))
            }
            Ok(None) => {
                self.state = State::Done;
                Ok(None)
            }
            Err(err) => {
                self.state = State::Done;
                Err(Error::Io(err))
            }
        }
    }

    /// Read the next row into `row`, which is cleared first.
    ///
    /// Returns `false` when there are no more rows.
    pub fn read_row(&mut self, row: &mut Vec<String>) -> Result<bool> {
        row.clear();
        let values = match self.next_row()? {
            None => return Ok(false),
            Some(values) => values,
        };
        for value in values {
            row.push(value?);
        }
        Ok(true)
    }

    /// Returns an iterator over all remaining rows.
    ///
    /// The iterator stops after yielding the first error.
    pub fn rows(&mut self) -> Rows<'_, S> {
        Rows { rdr: self, done: false }
    }

    /// The number of rows read to completion so far.
    pub fn row_number(&self) -> u64 {
        self.row
    }

    /// Returns true once this reader will not produce any more rows.
    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    /// The format this reader parses.
    pub fn format(&self) -> &FormatSpec {
        &self.format
    }

    /// Gets a reference to the underlying source.
    pub fn get_ref(&self) -> &S {
        self.src.get_ref()
    }

    /// Close this reader, dropping the underlying source.
    pub fn close(self) {
        debug!("closing reader after {} rows", self.row);
    }

    /// Unwraps this reader, returning the underlying source.
    ///
    /// A character that was already peeked from the source is lost.
    pub fn into_inner(self) -> S {
        self.src.into_inner()
    }

    /// Reads one value, along with the delimiter or row terminator after it.
    fn read_value(&mut self) -> Result<(String, ValueEnd)> {
        let mut value = String::new();
        if self.src.eat(self.format.quote)? {
            self.read_quoted(&mut value)?;
        } else {
            self.read_unquoted(&mut value)?;
        }
        if self.src.eat(self.format.delimiter)? {
            return Ok((value, ValueEnd::Delimiter));
        }
        self.read_terminator()?;
        Ok((value, ValueEnd::Row))
    }

    fn read_unquoted(&mut self, value: &mut String) -> Result<()> {
        while let Some(ch) = self.src.peek()? {
            if ch == self.format.delimiter || ch == '\r' || ch == '\n' {
                break;
            }
            value.push(ch);
            self.src.bump();
        }
        Ok(())
    }

    /// Reads the rest of a quoted value. The opening quote has already been
    /// consumed.
    fn read_quoted(&mut self, value: &mut String) -> Result<()> {
        let quote = self.format.quote;
        let escape = self.format.escape();
        loop {
            let ch = match self.src.next_char()? {
                Some(ch) => ch,
                None => return Err(self.malformed(UNEXPECTED_EOF)),
            };
            if ch == escape && escape != quote {
                if self.src.eat(quote)? {
                    value.push(quote);
                } else {
                    value.push(escape);
                }
            } else if ch == quote {
                // With doubled quotes, a quote is either half of an escaped
                // quote or the closing quote. The next character decides.
                if escape == quote && self.src.eat(quote)? {
                    value.push(quote);
                } else {
                    break;
                }
            } else {
                value.push(ch);
            }
        }
        match self.src.peek()? {
            None | Some('\r') | Some('\n') => Ok(()),
            Some(ch) if ch == self.format.delimiter => Ok(()),
            Some(_) => Err(self.malformed(UNTERMINATED_QUOTE)),
        }
    }

    /// Consumes `\n`, `\r`, `\r\n` or nothing at the end of the source, and
    /// completes the current row.
    fn read_terminator(&mut self) -> Result<()> {
        if self.src.eat('\r')? {
            self.src.eat('\n')?;
        } else {
            self.src.eat('\n')?;
        }
        trace!("read row {}", self.row);
        self.row += 1;
        self.state = State::Ready;
        Ok(())
    }

    fn malformed(&mut self, msg: &'static str) -> Error {
        debug!("malformed input at row {}: {}", self.row, msg);
        self.state = State::Done;
        Error::malformed(self.row, msg)
    }
}

impl<R: io::Read> Reader<Utf8Chars<R>> {
    /// Create a reader with the default format over UTF-8 data from an
    /// arbitrary `io::Read`.
    pub fn from_reader(rdr: R) -> Reader<Utf8Chars<R>> {
        ReaderBuilder::new().from_reader(rdr)
    }
}

impl<'a> Reader<str::Chars<'a>> {
    /// Create a reader with the default format over an in memory string.
    pub fn from_text(text: &'a str) -> Reader<str::Chars<'a>> {
        ReaderBuilder::new().from_text(text)
    }
}

/// The values of a single row, read lazily.
///
/// A row always yields at least one value. It stops after the last value or
/// after the first error.
///
/// This is created by `Reader::next_row`.
#[derive(Debug)]
pub struct Row<'r, S> {
    rdr: &'r mut Reader<S>,
    finished: bool,
}

impl<'r, S: CharRead> Row<'r, S> {
    /// Returns true once every value of this row has been yielded, or an
    /// error has been.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl<'r, S: CharRead> Iterator for Row<'r, S> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Result<String>> {
        if self.finished {
            return None;
        }
        match self.rdr.read_value() {
            Ok((value, ValueEnd::Delimiter)) => Some(Ok(value)),
            Ok((value, ValueEnd::Row)) => {
                self.finished = true;
                Some(Ok(value))
            }
            Err(err) => {
                self.finished = true;
                self.rdr.state = State::Done;
                Some(Err(err))
            }
        }
    }
}

impl<'r, S: CharRead> FusedIterator for Row<'r, S> {}

/// An iterator over rows, each collected into a `Vec<String>`.
///
/// This is created by `Reader::rows`.
#[derive(Debug)]
pub struct Rows<'r, S> {
    rdr: &'r mut Reader<S>,
    done: bool,
}

impl<'r, S: CharRead> Iterator for Rows<'r, S> {
    type Item = Result<Vec<String>>;

    fn next(&mut self) -> Option<Result<Vec<String>>> {
        if self.done {
            return None;
        }
        let mut row = vec![];
        match self.rdr.read_row(&mut row) {
            Ok(true) => Some(Ok(row)),
            Ok(false) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl<'r, S: CharRead> FusedIterator for Rows<'r, S> {}
