use std::iter;
use std::str;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The format of delimited text: which characters separate values, quote
/// them, escape quotes inside them and end rows.
///
/// A `FormatSpec` is a plain value. It is cloned into every reader and
/// writer built from it and never changes afterwards.
///
/// Any combination of characters is accepted. In particular, nothing stops
/// the delimiter and the quote from being the same character, and the
/// terminator may be empty.
///
/// # Example
///
/// ```
/// let format = dsv::FormatSpec {
///     delimiter: ';',
///     ..dsv::FormatSpec::default()
/// };
/// assert!(format.needs_quotes("a;b"));
/// assert!(!format.needs_quotes("a,b"));
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FormatSpec {
    /// The character separating values within a row.
    ///
    /// The default is `,`.
    pub delimiter: char,
    /// The character used to quote values.
    ///
    /// The default is `"`.
    pub quote: char,
    /// The character that marks a literal quote inside a quoted value.
    ///
    /// When `None` (the default), the escape is the quote itself, so quotes
    /// are escaped by doubling them.
    pub escape: Option<char>,
    /// The string written after every row.
    ///
    /// This is only used by writers. Readers always accept `\n`, `\r` and
    /// `\r\n` as row terminators, regardless of this setting.
    ///
    /// The default is `"\n"`.
    pub terminator: String,
}

impl Default for FormatSpec {
    fn default() -> FormatSpec {
        FormatSpec {
            delimiter: ',',
            quote: '"',
            escape: None,
            terminator: "\n".to_string(),
        }
    }
}

impl FormatSpec {
    /// Create the default format: comma delimited, double quoted, quotes
    /// escaped by doubling and rows terminated by `\n`.
    pub fn new() -> FormatSpec {
        FormatSpec::default()
    }

    /// Create a tab delimited format. Everything else is the default.
    pub fn tsv() -> FormatSpec {
        FormatSpec { delimiter: '\t', ..FormatSpec::default() }
    }

    /// The escape character in effect.
    pub fn escape(&self) -> char {
        self.escape.unwrap_or(self.quote)
    }

    /// Whether quotes are escaped by doubling them.
    ///
    /// This changes how a reader resolves a quote found inside a quoted
    /// value: it may either be the first half of an escaped quote or the
    /// closing quote.
    pub fn escape_is_quote(&self) -> bool {
        self.escape() == self.quote
    }

    /// The characters that force a value to be quoted when written: the
    /// delimiter, the quote and every character of the terminator.
    ///
    /// Characters may repeat.
    pub fn special_chars(&self) -> SpecialChars<'_> {
        SpecialChars {
            it: iter::once(self.delimiter)
                .chain(iter::once(self.quote))
                .chain(self.terminator.chars()),
        }
    }

    /// Returns true if `ch` is one of the special characters.
    pub fn is_special(&self, ch: char) -> bool {
        ch == self.delimiter
            || ch == self.quote
            || self.terminator.chars().any(|t| t == ch)
    }

    /// Returns true if `value` must be quoted to survive a round trip.
    pub fn needs_quotes(&self, value: &str) -> bool {
        value.chars().any(|ch| self.is_special(ch))
    }
}

/// An iterator over the special characters of a format.
///
/// This is created by `FormatSpec::special_chars`.
#[derive(Clone, Debug)]
pub struct SpecialChars<'a> {
    it: iter::Chain<
        iter::Chain<iter::Once<char>, iter::Once<char>>,
        str::Chars<'a>,
    >,
}

impl<'a> Iterator for SpecialChars<'a> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        self.it.next()
    }
}

#[cfg(test)]
mod tests {
    use super::FormatSpec;

    #[test]
    fn defaults() {
        let f = FormatSpec::default();
        assert_eq!(f.delimiter, ',');
        assert_eq!(f.quote, '"');
        assert_eq!(f.escape(), '"');
        assert!(f.escape_is_quote());
        assert_eq!(f.terminator, "\n");
    }

    #[test]
    fn special_chars_include_terminator() {
        let f = FormatSpec { terminator: "\r\n".to_string(), ..FormatSpec::new() };
        let specials: Vec<char> = f.special_chars().collect();
        assert_eq!(specials, vec![',', '"', '\r', '\n']);
    }

    #[test]
    fn empty_terminator_adds_nothing() {
        let f = FormatSpec { terminator: String::new(), ..FormatSpec::new() };
        assert_eq!(f.special_chars().count(), 2);
        assert!(!f.needs_quotes("a\nb"));
        assert!(f.needs_quotes("a,b"));
    }

    #[test]
    fn carriage_return_is_plain_under_lf() {
        let f = FormatSpec::new();
        assert!(!f.needs_quotes("a\rb"));
        assert!(f.needs_quotes("a\nb"));
        assert!(f.needs_quotes("a\"b"));
    }

    #[test]
    fn escape_is_not_special() {
        let f = FormatSpec { escape: Some('\\'), ..FormatSpec::new() };
        assert!(!f.escape_is_quote());
        assert!(!f.needs_quotes(r"a\b"));
    }

    #[test]
    fn tsv() {
        let f = FormatSpec::tsv();
        assert!(f.needs_quotes("a\tb"));
        assert!(!f.needs_quotes("a,b"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_config_fills_defaults() {
        let f: FormatSpec =
            serde_json::from_str(r#"{"delimiter": ";", "quote": "'"}"#)
                .unwrap();
        assert_eq!(f.delimiter, ';');
        assert_eq!(f.quote, '\'');
        assert_eq!(f.escape(), '\'');
        assert_eq!(f.terminator, "\n");
    }
}
