use std::io;

use crate::source::CharRead;

/// The state of the single lookahead slot.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Slot {
    /// Nothing has been fetched since the last `bump`.
    Empty,
    /// A character has been fetched but not consumed.
    Char(char),
    /// The source reported end of stream. This state is terminal.
    End,
}

/// Owns a character source and provides exactly one character of lookahead
/// over it.
///
/// The source is never exposed, so nothing can read past the peeked
/// character behind the parser's back.
#[derive(Debug)]
pub(crate) struct Lookahead<S> {
    src: S,
    slot: Slot,
}

impl<S: CharRead> Lookahead<S> {
    pub(crate) fn new(src: S) -> Lookahead<S> {
        Lookahead { src, slot: Slot::Empty }
    }

    /// Returns the next character without consuming it, or `None` at the end
    /// of the source.
    ///
    /// Repeated peeks without an intervening `bump` read from the source at
    /// most once.
    pub(crate) fn peek(&mut self) -> io::Result<Option<char>> {
        if let Slot::Empty = self.slot {
            self.slot = match self.src.read_char()? {
                Some(ch) => Slot::Char(ch),
                None => Slot::End,
            };
        }
        Ok(match self.slot {
            Slot::Char(ch) => Some(ch),
            Slot::Empty | Slot::End => None,
        })
    }

    /// Consumes and returns the next character.
    pub(crate) fn next_char(&mut self) -> io::Result<Option<char>> {
        let ch = self.peek()?;
        self.bump();
        Ok(ch)
    }

    /// Consumes the peeked character. Does nothing at the end of the source
    /// or if nothing has been peeked.
    pub(crate) fn bump(&mut self) {
        if let Slot::Char(_) = self.slot {
            self.slot = Slot::Empty;
        }
    }

    /// Consumes the next character if it is `ch`.
    pub(crate) fn eat(&mut self, ch: char) -> io::Result<bool> {
        if self.peek()? == Some(ch) {
            self.bump();
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(crate) fn get_ref(&self) -> &S {
        &self.src
    }

    /// Gives up the source. A character that was peeked but not consumed is
    /// lost.
    pub(crate) fn into_inner(self) -> S {
        self.src
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::Lookahead;
    use crate::source::CharRead;

    /// Counts how often the source is actually read.
    struct Counting<'a> {
        chars: std::str::Chars<'a>,
        reads: usize,
    }

    impl<'a> CharRead for Counting<'a> {
        fn read_char(&mut self) -> io::Result<Option<char>> {
            self.reads += 1;
            Ok(self.chars.next())
        }
    }

    #[test]
    fn peek_is_idempotent() {
        let src = Counting { chars: "ab".chars(), reads: 0 };
        let mut la = Lookahead::new(src);
        assert_eq!(la.peek().unwrap(), Some('a'));
        assert_eq!(la.peek().unwrap(), Some('a'));
        assert_eq!(la.get_ref().reads, 1);
        assert_eq!(la.next_char().unwrap(), Some('a'));
        assert_eq!(la.next_char().unwrap(), Some('b'));
        assert_eq!(la.get_ref().reads, 2);
    }

    #[test]
    fn end_is_terminal() {
        let src = Counting { chars: "".chars(), reads: 0 };
        let mut la = Lookahead::new(src);
        assert_eq!(la.peek().unwrap(), None);
        la.bump();
        assert_eq!(la.next_char().unwrap(), None);
        assert_eq!(la.next_char().unwrap(), None);
        assert_eq!(la.get_ref().reads, 1);
    }

    #[test]
    fn eat() {
        let mut la = Lookahead::new("\r\nx".chars());
        assert!(la.eat('\r').unwrap());
        assert!(!la.eat('x').unwrap());
        assert!(la.eat('\n').unwrap());
        assert_eq!(la.next_char().unwrap(), Some('x'));
    }
}
