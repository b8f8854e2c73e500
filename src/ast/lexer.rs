use logos::{Lexer, Logos};

/// Terminal symbols of the GraphQL query language that can't be matched by a plain literal.
///
/// The grammar doesn't tokenize its input up front. Instead, when a production expects a terminal,
/// a lexer is started at the current cursor position and only its first lexeme is inspected. Since
/// none of these lexemes are skipped, the first lexeme always starts at the cursor.
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) enum Lexeme {
    #[regex(r"[_A-Za-z][_0-9A-Za-z]*")]
    Name,

    /// Both integers and floats; a fractional part or an exponent turns the number into a float.
    #[regex(r"-?[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?")]
    Number,

    #[token("\"", single_line_string)]
    String,

    #[token("\"\"\"", block_string)]
    BlockString,

    #[error]
    Error,
}

/// Scans the remainder of a single-line string up to and including its closing quote.
///
/// Escape sequences are only skipped over here, so that `\"` doesn't terminate the string, but
/// aren't validated.
fn single_line_string(lex: &mut Lexer<Lexeme>) -> bool {
    let bytes = lex.remainder().as_bytes();
    let mut index = 0;
    while index < bytes.len() {
        match bytes[index] {
            b'"' => {
                lex.bump(index + 1);
                return true;
            }
            b'\\' => index += 2,
            b'\n' | b'\r' => return false,
            _ => index += 1,
        }
    }
    false
}

/// Scans the remainder of a block string up to and including the next `"""` that isn't escaped
/// as `\"""`.
fn block_string(lex: &mut Lexer<Lexeme>) -> bool {
    let remainder = lex.remainder();
    let mut offset = 0;
    while let Some(index) = remainder[offset..].find(r#"""""#) {
        let end = offset + index;
        if remainder[..end].ends_with('\\') {
            offset = end + 3;
        } else {
            lex.bump(end + 3);
            return true;
        }
    }
    false
}

/// Matches the lexeme starting at the beginning of `input` and returns it with its length.
#[inline]
pub(crate) fn lexeme_at(input: &str) -> Option<(Lexeme, usize)> {
    let mut lexer = Lexeme::lexer(input);
    match lexer.next() {
        Some(Lexeme::Error) | None => None,
        Some(lexeme) => Some((lexeme, lexer.span().end)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert_eq!(lexeme_at("field"), Some((Lexeme::Name, 5)));
        assert_eq!(lexeme_at("_a1 b"), Some((Lexeme::Name, 3)));
        assert_eq!(lexeme_at("1a"), Some((Lexeme::Number, 1)));
    }

    #[test]
    fn numbers() {
        assert_eq!(lexeme_at("007"), Some((Lexeme::Number, 3)));
        assert_eq!(lexeme_at("-1.5e+10,"), Some((Lexeme::Number, 8)));
        assert_eq!(lexeme_at("1E3"), Some((Lexeme::Number, 3)));
        assert_eq!(lexeme_at("-"), None);
    }

    #[test]
    fn strings() {
        assert_eq!(lexeme_at(r#""abc" x"#), Some((Lexeme::String, 5)));
        assert_eq!(lexeme_at(r#""a\"b""#), Some((Lexeme::String, 6)));
        assert_eq!(lexeme_at(r#""""#), Some((Lexeme::String, 2)));
        assert_eq!(lexeme_at("\"a\nb\""), None);
        assert_eq!(lexeme_at("\"abc"), None);
    }

    #[test]
    fn block_strings() {
        assert_eq!(lexeme_at(r#""""a"""b"#), Some((Lexeme::BlockString, 7)));
        assert_eq!(lexeme_at("\"\"\"a\nb\"\"\""), Some((Lexeme::BlockString, 9)));
        assert_eq!(
            lexeme_at(r#""""a\"""b""""#),
            Some((Lexeme::BlockString, 12))
        );
        assert_eq!(lexeme_at(r#""""a"#), None);
    }
}
