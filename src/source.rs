use std::io::{self, BufRead};
use std::str;

/// A source of characters, read one at a time.
///
/// This is the only thing a `Reader` needs from its input. `Ok(None)` marks
/// the end of the stream; a source is expected to keep returning `Ok(None)`
/// once it has done so.
///
/// Closing a source is dropping it.
pub trait CharRead {
    /// Read the next character, or `None` at the end of the stream.
    fn read_char(&mut self) -> io::Result<Option<char>>;
}

impl<'a, S: CharRead + ?Sized> CharRead for &'a mut S {
    fn read_char(&mut self) -> io::Result<Option<char>> {
        (**self).read_char()
    }
}

impl<S: CharRead + ?Sized> CharRead for Box<S> {
    fn read_char(&mut self) -> io::Result<Option<char>> {
        (**self).read_char()
    }
}

impl<'a> CharRead for str::Chars<'a> {
    fn read_char(&mut self) -> io::Result<Option<char>> {
        Ok(self.next())
    }
}

/// Decodes UTF-8 from an arbitrary `io::Read` into characters.
///
/// The underlying reader is buffered for you. Invalid UTF-8 is reported as
/// an I/O error of kind `InvalidData`.
#[derive(Debug)]
pub struct Utf8Chars<R> {
    rdr: io::BufReader<R>,
}

impl<R: io::Read> Utf8Chars<R> {
    /// Create a new character source over `rdr`.
    pub fn new(rdr: R) -> Utf8Chars<R> {
        Utf8Chars { rdr: io::BufReader::new(rdr) }
    }

    /// Gets a reference to the underlying reader.
    pub fn get_ref(&self) -> &R {
        self.rdr.get_ref()
    }

    /// Unwraps this source, returning the underlying reader.
    ///
    /// Note that any leftover data in the internal buffer is lost.
    pub fn into_inner(self) -> R {
        self.rdr.into_inner()
    }
}

impl<R: io::Read> CharRead for Utf8Chars<R> {
    fn read_char(&mut self) -> io::Result<Option<char>> {
        // Holds a sequence that was cut off at the end of the buffer.
        let mut partial = [0u8; 4];
        let mut npartial = 0;
        loop {
            let buf = self.rdr.fill_buf()?;
            if buf.is_empty() {
                return if npartial == 0 {
                    Ok(None)
                } else {
                    Err(invalid_utf8())
                };
            }
            if npartial == 0 {
                let (ch, len) = bstr::decode_utf8(buf);
                if let Some(ch) = ch {
                    self.rdr.consume(len);
                    return Ok(Some(ch));
                }
                if len < buf.len() {
                    return Err(invalid_utf8());
                }
                partial[..len].copy_from_slice(&buf[..len]);
                npartial = len;
                self.rdr.consume(len);
                continue;
            }
            partial[npartial] = buf[0];
            npartial += 1;
            self.rdr.consume(1);
            let (ch, len) = bstr::decode_utf8(&partial[..npartial]);
            if let Some(ch) = ch {
                return Ok(Some(ch));
            }
            if len < npartial || npartial == partial.len() {
                return Err(invalid_utf8());
            }
        }
    }
}

fn invalid_utf8() -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, "stream did not contain valid UTF-8")
}

#[cfg(test)]
mod tests {
    use std::io::{self, Read};

    use super::{CharRead, Utf8Chars};

    fn drain<S: CharRead>(mut src: S) -> io::Result<String> {
        let mut out = String::new();
        while let Some(ch) = src.read_char()? {
            out.push(ch);
        }
        Ok(out)
    }

    /// Hands out at most one byte per read, so every multi-byte sequence is
    /// split across buffer refills.
    struct OneByte<'a>(&'a [u8]);

    impl<'a> Read for OneByte<'a> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.0.is_empty() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.0[0];
            self.0 = &self.0[1..];
            Ok(1)
        }
    }

    #[test]
    fn chars_source() {
        assert_eq!(drain("a,é".chars()).unwrap(), "a,é");
    }

    #[test]
    fn utf8_multibyte() {
        let s = "naïve,日本,🦀";
        assert_eq!(drain(Utf8Chars::new(s.as_bytes())).unwrap(), s);
    }

    #[test]
    fn utf8_split_sequences() {
        let s = "ü日🦀x";
        assert_eq!(drain(Utf8Chars::new(OneByte(s.as_bytes()))).unwrap(), s);
    }

    #[test]
    fn utf8_invalid() {
        let err = drain(Utf8Chars::new(&b"a\xffb"[..])).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn utf8_truncated_at_eof() {
        let err = drain(Utf8Chars::new(OneByte(b"a\xe6\x97"))).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn end_is_sticky() {
        let mut src = Utf8Chars::new(&b"a"[..]);
        assert_eq!(src.read_char().unwrap(), Some('a'));
        assert_eq!(src.read_char().unwrap(), None);
        assert_eq!(src.read_char().unwrap(), None);
    }
}
