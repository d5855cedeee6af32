//! Path expressions.
//!
//! A path expression spells a chain of field accesses the way it would be
//! written in code: `a.b.c[2].b`, `list[0]['odd.key']`. Parsing yields the
//! plain field names a view walks through; index brackets become their
//! decimal field name.

use thiserror::Error;

use crate::key::is_index;

/// A parsed path: one field name per access.
pub type Path = Vec<String>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("unexpected character {found:?} at {position}")]
    UnexpectedChar { found: char, position: usize },
    #[error("unexpected end of path expression")]
    UnexpectedEnd,
    #[error("unclosed string starting at {position}")]
    UnclosedString { position: usize },
    #[error("empty field name at {position}")]
    EmptyName { position: usize },
    #[error("index out of range at {position}")]
    InvalidIndex { position: usize },
}

/// Parse a path expression.
///
/// # Example
///
/// ```
/// use easy_set::parse_path;
///
/// assert_eq!(parse_path("a.b.c[2].b").unwrap(), vec!["a", "b", "c", "2", "b"]);
/// assert_eq!(parse_path("['x.y'][0]").unwrap(), vec!["x.y", "0"]);
/// assert_eq!(parse_path("").unwrap(), Vec::<String>::new());
/// ```
pub fn parse_path(expr: &str) -> Result<Path, PathError> {
    PathParser::parse(expr)
}

/// Format field names back into a path expression.
///
/// Index-like names use brackets, plain names use dots, and anything else is
/// quoted.
pub fn format_path<S: AsRef<str>>(path: &[S]) -> String {
    let mut out = String::new();
    for (i, field) in path.iter().enumerate() {
        let field = field.as_ref();
        if is_index(field) {
            out.push('[');
            out.push_str(field);
            out.push(']');
        } else if is_plain_name(field) {
            if i > 0 {
                out.push('.');
            }
            out.push_str(field);
        } else {
            out.push_str("['");
            for c in field.chars() {
                if c == '\'' || c == '\\' {
                    out.push('\\');
                }
                out.push(c);
            }
            out.push_str("']");
        }
    }
    out
}

fn is_plain_name(field: &str) -> bool {
    !field.is_empty()
        && !field
            .chars()
            .any(|c| matches!(c, '.' | '[' | ']' | '\'' | '"' | '\\') || c.is_whitespace())
}

struct PathParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> PathParser<'a> {
    fn parse(input: &'a str) -> Result<Path, PathError> {
        let mut parser = Self { input, pos: 0 };
        parser.parse_path()
    }

    fn parse_path(&mut self) -> Result<Path, PathError> {
        let mut path = Vec::new();
        if self.is_at_end() {
            return Ok(path);
        }

        if self.peek() == Some('[') {
            path.push(self.parse_bracket()?);
        } else {
            path.push(self.parse_name()?);
        }

        while let Some(c) = self.peek() {
            match c {
                '.' => {
                    self.advance();
                    path.push(self.parse_name()?);
                }
                '[' => path.push(self.parse_bracket()?),
                found => {
                    return Err(PathError::UnexpectedChar {
                        found,
                        position: self.pos,
                    })
                }
            }
        }
        Ok(path)
    }

    fn parse_name(&mut self) -> Result<String, PathError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if matches!(c, '.' | '[' | ']') {
                break;
            }
            self.advance();
        }
        if start == self.pos {
            return Err(PathError::EmptyName { position: start });
        }
        Ok(self.input[start..self.pos].to_string())
    }

    fn parse_bracket(&mut self) -> Result<String, PathError> {
        self.expect('[')?;
        self.skip_whitespace();
        let field = match self.peek() {
            Some(q @ ('\'' | '"')) => self.parse_string(q)?,
            Some(_) => self.parse_index()?,
            None => return Err(PathError::UnexpectedEnd),
        };
        self.skip_whitespace();
        self.expect(']')?;
        Ok(field)
    }

    fn parse_index(&mut self) -> Result<String, PathError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            self.advance();
        }
        if start == self.pos {
            return match self.peek() {
                Some(']') => Err(PathError::EmptyName { position: start }),
                Some(found) => Err(PathError::UnexpectedChar {
                    found,
                    position: start,
                }),
                None => Err(PathError::UnexpectedEnd),
            };
        }
        // `[007]` means index 7, like a numeric literal would.
        let index: usize = self.input[start..self.pos]
            .parse()
            .map_err(|_| PathError::InvalidIndex { position: start })?;
        Ok(index.to_string())
    }

    fn parse_string(&mut self, quote: char) -> Result<String, PathError> {
        let start = self.pos;
        self.advance();
        let mut out = String::new();
        loop {
            match self.peek() {
                None => return Err(PathError::UnclosedString { position: start }),
                Some('\\') => {
                    self.advance();
                    match self.peek() {
                        Some(c) => {
                            out.push(c);
                            self.advance();
                        }
                        None => return Err(PathError::UnclosedString { position: start }),
                    }
                }
                Some(c) if c == quote => {
                    self.advance();
                    return Ok(out);
                }
                Some(c) => {
                    out.push(c);
                    self.advance();
                }
            }
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), PathError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.advance();
                Ok(())
            }
            Some(found) => Err(PathError::UnexpectedChar {
                found,
                position: self.pos,
            }),
            None => Err(PathError::UnexpectedEnd),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.advance();
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dotted() {
        assert_eq!(parse_path("a").unwrap(), vec!["a"]);
        assert_eq!(parse_path("one.two.one").unwrap(), vec!["one", "two", "one"]);
    }

    #[test]
    fn test_brackets() {
        assert_eq!(parse_path("a[0][12]").unwrap(), vec!["a", "0", "12"]);
        assert_eq!(parse_path("[3].x").unwrap(), vec!["3", "x"]);
        assert_eq!(parse_path("a[ 4 ]").unwrap(), vec!["a", "4"]);
        assert_eq!(parse_path("a[007]").unwrap(), vec!["a", "7"]);
    }

    #[test]
    fn test_quoted() {
        assert_eq!(parse_path("a['b.c']").unwrap(), vec!["a", "b.c"]);
        assert_eq!(parse_path("a[\"x y\"]").unwrap(), vec!["a", "x y"]);
        assert_eq!(parse_path(r"['it\'s']").unwrap(), vec!["it's"]);
        assert_eq!(parse_path("['']").unwrap(), vec![""]);
        // A quoted number is the same field as a bare index.
        assert_eq!(parse_path("a['2']").unwrap(), vec!["a", "2"]);
    }

    #[test]
    fn test_unicode_names() {
        assert_eq!(parse_path("café.naïve").unwrap(), vec!["café", "naïve"]);
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_path("a..b"), Err(PathError::EmptyName { position: 2 }));
        assert_eq!(parse_path("a."), Err(PathError::EmptyName { position: 2 }));
        assert_eq!(parse_path("a[]"), Err(PathError::EmptyName { position: 2 }));
        assert_eq!(parse_path("a["), Err(PathError::UnexpectedEnd));
        assert_eq!(parse_path("a[1"), Err(PathError::UnexpectedEnd));
        assert_eq!(
            parse_path("a[x]"),
            Err(PathError::UnexpectedChar { found: 'x', position: 2 })
        );
        assert_eq!(
            parse_path("a]"),
            Err(PathError::UnexpectedChar { found: ']', position: 1 })
        );
        assert_eq!(
            parse_path("a['b"),
            Err(PathError::UnclosedString { position: 2 })
        );
        assert_eq!(
            parse_path("a[99999999999999999999999999]"),
            Err(PathError::InvalidIndex { position: 2 })
        );
    }

    #[test]
    fn test_format_path() {
        assert_eq!(format_path::<&str>(&[]), "");
        assert_eq!(format_path(&["a", "b", "2", "c"]), "a.b[2].c");
        assert_eq!(format_path(&["0", "x"]), "[0].x");
        assert_eq!(format_path(&["a", "b.c", "it's"]), r"a['b.c']['it\'s']");
        assert_eq!(format_path(&["01"]), "01");
    }

    #[test]
    fn test_format_then_parse() {
        let paths: Vec<Vec<&str>> = vec![
            vec!["a", "b", "c", "2", "b"],
            vec!["0", "0"],
            vec!["", "x y", "q\"uote"],
            vec!["a", "b.c", "[]"],
        ];
        for path in paths {
            let expr = format_path(&path);
            assert_eq!(parse_path(&expr).unwrap(), path, "expr: {expr}");
        }
    }
}
