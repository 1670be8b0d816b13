//! String leaf paths with lazily memoized parse results.

use once_cell::race::OnceBox;

use crate::error::{Error, Result};
use crate::parse::StringParser;

/// A string leaf bound to a parser.
///
/// The parse runs at most once per path: the first successful `get` caches the
/// value, later calls return the cached reference. A failed parse is not
/// cached and surfaces again on every call.
pub struct StringPath<'p, P: StringParser> {
    raw: String,
    parser: &'p P,
    parsed: OnceBox<P::Output>,
}

impl<'p, P: StringParser> StringPath<'p, P> {
    pub(crate) fn new(raw: String, parser: &'p P) -> Self {
        Self {
            raw,
            parser,
            parsed: OnceBox::new(),
        }
    }

    /// The raw string as found in the JSON document.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn get(&self) -> Result<&P::Output> {
        self.parsed.get_or_try_init(|| {
            self.parser
                .parse(&self.raw)
                .map(Box::new)
                .map_err(Error::from)
        })
    }
}

/// A string leaf that may be absent.
pub struct StringPathNullable<'p, P: StringParser> {
    inner: Option<StringPath<'p, P>>,
}

impl<'p, P: StringParser> StringPathNullable<'p, P> {
    pub(crate) fn new(inner: Option<StringPath<'p, P>>) -> Self {
        Self { inner }
    }

    pub fn is_present(&self) -> bool {
        self.inner.is_some()
    }

    pub fn raw(&self) -> Option<&str> {
        self.inner.as_ref().map(StringPath::raw)
    }

    /// Parsed value if present; a present but unparseable string is an error.
    pub fn get_or_none(&self) -> Result<Option<&P::Output>> {
        match &self.inner {
            Some(path) => path.get().map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;
    use crate::parse::{ExampleValues, StringParserUuid};
    use std::cell::Cell;

    struct CountingParser {
        calls: Cell<usize>,
    }

    impl StringParser for CountingParser {
        type Output = usize;

        fn parse(&self, raw: &str) -> Result<usize, ParseError> {
            self.calls.set(self.calls.get() + 1);
            raw.parse()
                .map_err(|e| ParseError::with_cause(raw, "usize", e))
        }

        fn example(&self) -> ExampleValues<usize> {
            ExampleValues {
                raw: "0".to_string(),
                value: 0,
            }
        }
    }

    #[test]
    fn successful_parse_runs_once() {
        let parser = CountingParser {
            calls: Cell::new(0),
        };
        let path = StringPath::new("17".to_string(), &parser);
        assert_eq!(*path.get().unwrap(), 17);
        assert_eq!(*path.get().unwrap(), 17);
        assert_eq!(parser.calls.get(), 1);
    }

    #[test]
    fn failed_parse_is_reported_every_call() {
        let parser = CountingParser {
            calls: Cell::new(0),
        };
        let path = StringPath::new("not a number".to_string(), &parser);
        assert!(path.get().is_err());
        assert!(path.get().is_err());
        assert_eq!(parser.calls.get(), 2);
    }

    #[test]
    fn nullable_absent_yields_none() {
        let nullable: StringPathNullable<'_, StringParserUuid> = StringPathNullable::new(None);
        assert!(!nullable.is_present());
        assert_eq!(nullable.get_or_none().unwrap(), None);
        assert_eq!(nullable.raw(), None);
    }

    #[test]
    fn nullable_present_parses() {
        let parser = StringParserUuid;
        let raw = "00000000-0000-0000-0000-000000000000".to_string();
        let nullable = StringPathNullable::new(Some(StringPath::new(raw, &parser)));
        assert!(nullable.is_present());
        assert_eq!(
            nullable.get_or_none().unwrap().copied(),
            Some(uuid::Uuid::nil())
        );
    }
}
