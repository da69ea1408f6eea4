//! Structural path parser
//!
//! Grammar:
//! ```text
//! path    = start step*
//! start   = "//*[@id=" quoted "]" | step
//! step    = "/" ( "text()" | name ) [ "[" number "]" ]
//! quoted  = '"' ( char | "\" char )* '"' | "'" char* "'"
//! ```

use super::types::{PathStart, PathStep, StructuralPath};
use thiserror::Error;

/// Path parsing errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathParseError {
    #[error("Empty path")]
    Empty,

    #[error("Expected '/' at position {0}")]
    ExpectedStep(usize),

    #[error("Expected tag name at position {0}")]
    ExpectedName(usize),

    #[error("Expected number at position {0}")]
    ExpectedNumber(usize),

    #[error("Index must be 1 or greater at position {0}")]
    ZeroIndex(usize),

    #[error("Text step requires an index at position {0}")]
    MissingTextIndex(usize),

    #[error("Unterminated string at position {0}")]
    UnterminatedString(usize),

    #[error("Unexpected character '{0}' at position {1}")]
    UnexpectedChar(char, usize),
}

const ID_PREFIX: &str = "//*[@id=";

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_if(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), PathParseError> {
        if self.skip_if(expected) {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn unexpected(&self) -> PathParseError {
        match self.peek() {
            Some(ch) => PathParseError::UnexpectedChar(ch, self.pos),
            None => PathParseError::UnexpectedChar('\0', self.pos),
        }
    }

    fn skip_str(&mut self, s: &str) -> bool {
        if self.input[self.pos..].starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn parse_number(&mut self) -> Result<usize, PathParseError> {
        let start = self.pos;
        while matches!(self.peek(), Some(ch) if ch.is_ascii_digit()) {
            self.advance();
        }
        if self.pos == start {
            return Err(PathParseError::ExpectedNumber(start));
        }
        let value: usize = self.input[start..self.pos]
            .parse()
            .map_err(|_| PathParseError::ExpectedNumber(start))?;
        if value == 0 {
            return Err(PathParseError::ZeroIndex(start));
        }
        Ok(value)
    }

    fn parse_name(&mut self) -> Result<String, PathParseError> {
        let start = self.pos;
        while matches!(
            self.peek(),
            Some(ch) if ch.is_alphanumeric() || matches!(ch, '-' | '_' | '.' | ':')
        ) {
            self.advance();
        }
        if self.pos == start {
            return Err(PathParseError::ExpectedName(start));
        }
        Ok(self.input[start..self.pos].to_ascii_lowercase())
    }

    fn parse_quoted(&mut self) -> Result<String, PathParseError> {
        let start = self.pos;
        let quote = match self.advance() {
            Some(q @ ('"' | '\'')) => q,
            _ => return Err(PathParseError::UnexpectedChar(
                self.input[start..].chars().next().unwrap_or('\0'),
                start,
            )),
        };
        let mut value = String::new();
        loop {
            match self.advance() {
                Some('\\') if quote == '"' => match self.advance() {
                    Some(ch) => value.push(ch),
                    None => return Err(PathParseError::UnterminatedString(start)),
                },
                Some(ch) if ch == quote => return Ok(value),
                Some(ch) => value.push(ch),
                None => return Err(PathParseError::UnterminatedString(start)),
            }
        }
    }

    fn parse_index(&mut self) -> Result<Option<usize>, PathParseError> {
        if !self.skip_if('[') {
            return Ok(None);
        }
        let index = self.parse_number()?;
        self.expect(']')?;
        Ok(Some(index))
    }

    fn parse_step(&mut self) -> Result<PathStep, PathParseError> {
        let start = self.pos;
        if !self.skip_if('/') {
            return Err(PathParseError::ExpectedStep(start));
        }
        if self.skip_str("text()") {
            let at = self.pos;
            return match self.parse_index()? {
                Some(index) => Ok(PathStep::Text { index }),
                None => Err(PathParseError::MissingTextIndex(at)),
            };
        }
        let tag = self.parse_name()?;
        let index = self.parse_index()?;
        Ok(PathStep::Element { tag, index })
    }

    fn parse(mut self) -> Result<StructuralPath, PathParseError> {
        if self.input.trim().is_empty() {
            return Err(PathParseError::Empty);
        }

        let mut path = if self.skip_str(ID_PREFIX) {
            let id = self.parse_quoted()?;
            self.expect(']')?;
            StructuralPath::from_id(id)
        } else {
            StructuralPath::document()
        };

        while !self.at_end() {
            let step = self.parse_step()?;
            path.steps.push(step);
        }

        if path.start == PathStart::Document && path.steps.is_empty() {
            return Err(PathParseError::Empty);
        }
        Ok(path)
    }
}

/// Parse a structural path string
pub fn parse_path(input: &str) -> Result<StructuralPath, PathParseError> {
    Parser::new(input).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_absolute_path() {
        let path = parse_path("/html/body/div[2]/p[1]/text()[3]").unwrap();
        assert_eq!(path.start, PathStart::Document);
        assert_eq!(path.steps.len(), 5);
        assert_eq!(
            path.steps[2],
            PathStep::Element {
                tag: "div".to_string(),
                index: Some(2)
            }
        );
        assert_eq!(path.steps[4], PathStep::Text { index: 3 });
    }

    #[test]
    fn test_parse_id_path() {
        let path = parse_path(r#"//*[@id="intro"]/text()[1]"#).unwrap();
        assert_eq!(path.start, PathStart::Id("intro".to_string()));
        assert_eq!(path.steps, vec![PathStep::Text { index: 1 }]);
    }

    #[test]
    fn test_parse_id_with_escapes() {
        let path = parse_path(r#"//*[@id="a\"b\\c"]"#).unwrap();
        assert_eq!(path.start, PathStart::Id(r#"a"b\c"#.to_string()));
    }

    #[test]
    fn test_parse_single_quoted_id() {
        let path = parse_path("//*[@id='x']/p[1]").unwrap();
        assert_eq!(path.start, PathStart::Id("x".to_string()));
    }

    #[test]
    fn test_round_trip_display() {
        for input in [
            "/html/body",
            "/html/body/section[3]/text()[2]",
            r#"//*[@id="main"]/ul[1]/li[4]"#,
        ] {
            assert_eq!(parse_path(input).unwrap().to_string(), input);
        }
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_path(""), Err(PathParseError::Empty));
        assert_eq!(parse_path("html"), Err(PathParseError::ExpectedStep(0)));
        assert_eq!(parse_path("/p[0]"), Err(PathParseError::ZeroIndex(3)));
        assert_eq!(parse_path("/p[x]"), Err(PathParseError::ExpectedNumber(3)));
        assert_eq!(
            parse_path("/text()"),
            Err(PathParseError::MissingTextIndex(7))
        );
        assert!(matches!(
            parse_path(r#"//*[@id="open"#),
            Err(PathParseError::UnterminatedString(_))
        ));
        assert!(matches!(
            parse_path("/p[1"),
            Err(PathParseError::UnexpectedChar('\0', 4))
        ));
    }
}
