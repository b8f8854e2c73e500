//! The grammar engine, a small set of matching primitives that grammar productions are composed
//! from.
//!
//! Every rule is a function of a [Cursor] returning a [`GrammarResult`]. A rule that fails must
//! leave the cursor where it found it, which [`Cursor::attempt`] guarantees for any sequence of
//! sub-rules. Alternations are written as chains of attempts, where the first successful branch
//! wins, and repetitions are greedy and never give back what they've consumed.

use super::ast::ASTContext;
use super::ast_kind::ASTKind;
use super::lexer::{lexeme_at, Lexeme};
use bumpalo::collections::Vec;

/// The result of a grammar rule. A failing rule reports the kind of node it failed to match.
pub(crate) type GrammarResult<T> = std::result::Result<T, ASTKind>;

/// A position in a source text that grammar rules consume input from.
pub struct Cursor<'a> {
    pub(crate) ctx: &'a ASTContext,
    source: &'a str,
    pos: usize,
    furthest: usize,
    expected: Option<ASTKind>,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(ctx: &'a ASTContext, source: &'a str) -> Self {
        Cursor {
            ctx,
            source,
            pos: 0,
            furthest: 0,
            expected: None,
        }
    }

    #[inline]
    pub(crate) fn arena(&self) -> &'a bumpalo::Bump {
        &self.ctx.arena
    }

    /// Moves a parsed node onto the arena.
    #[inline]
    pub(crate) fn alloc<T>(&self, item: T) -> &'a T {
        self.ctx.alloc(item)
    }

    #[inline]
    pub(crate) fn source(&self) -> &'a str {
        self.source
    }

    #[inline]
    pub(crate) fn is_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    #[inline]
    fn remainder(&self) -> &'a str {
        &self.source[self.pos..]
    }

    /// The furthest offset any rule has failed at, and the innermost rule that failed there.
    pub(crate) fn failure(&self) -> (usize, Option<ASTKind>) {
        (self.furthest, self.expected)
    }

    /// Records that a terminal didn't match at the current position.
    #[inline]
    fn miss(&mut self) {
        if self.pos > self.furthest {
            self.furthest = self.pos;
            self.expected = None;
        }
    }

    /// Runs `rule` as a sequence and rewinds the cursor when it fails.
    ///
    /// A failing rule is recorded as the expected node at the furthest failure offset, which is
    /// what syntax errors report.
    #[inline]
    pub(crate) fn attempt<T>(
        &mut self,
        rule: impl FnOnce(&mut Self) -> GrammarResult<T>,
    ) -> GrammarResult<T> {
        let start = self.pos;
        let result = rule(self);
        if let Err(kind) = result {
            // the outermost rule starting at the failure, or else the innermost rule spanning it
            if self.expected.is_none() || start == self.furthest {
                self.expected = Some(kind);
            }
            self.pos = start;
        }
        result
    }

    /// Runs `rule` as an optional match (`?`).
    #[inline]
    pub(crate) fn optional<T>(
        &mut self,
        rule: impl FnOnce(&mut Self) -> GrammarResult<T>,
    ) -> Option<T> {
        self.attempt(rule).ok()
    }

    /// Matches `rule` zero or more times (`*`).
    #[inline]
    pub(crate) fn many<T>(
        &mut self,
        mut rule: impl FnMut(&mut Self) -> GrammarResult<T>,
    ) -> Vec<'a, T> {
        let mut builder = Vec::new_in(self.arena());
        while let Ok(item) = self.attempt(&mut rule) {
            builder.push(item);
        }
        builder
    }

    /// Matches `rule` one or more times (`+`).
    #[inline]
    pub(crate) fn many1<T>(
        &mut self,
        mut rule: impl FnMut(&mut Self) -> GrammarResult<T>,
    ) -> GrammarResult<Vec<'a, T>> {
        let first = self.attempt(&mut rule)?;
        let mut builder = Vec::new_in(self.arena());
        builder.push(first);
        while let Ok(item) = self.attempt(&mut rule) {
            builder.push(item);
        }
        Ok(builder)
    }

    /// Negative lookahead (`!rule`): succeeds without consuming when `rule` doesn't match.
    #[inline]
    pub(crate) fn not<T>(
        &mut self,
        kind: ASTKind,
        rule: impl FnOnce(&mut Self) -> GrammarResult<T>,
    ) -> GrammarResult<()> {
        let start = self.pos;
        match rule(self) {
            Ok(_) => {
                self.pos = start;
                self.miss();
                Err(kind)
            }
            Err(_) => {
                self.pos = start;
                Ok(())
            }
        }
    }

    /// Skips over the `ignored` production: whitespace, commas, and line comments.
    pub(crate) fn ignored(&mut self) {
        let source = self.source;
        let bytes = source.as_bytes();
        while self.pos < bytes.len() {
            match bytes[self.pos] {
                b' ' | b'\t' | b'\n' | b'\r' | b',' => self.pos += 1,
                b'#' => {
                    let start = self.pos;
                    self.pos = source[start..]
                        .find(['\n', '\r'])
                        .map_or(source.len(), |idx| start + idx);
                }
                // UTF-8 encoded byte order mark
                0xEF if source[self.pos..].starts_with('\u{FEFF}') => self.pos += 3,
                _ => break,
            }
        }
    }

    /// Matches the end of the input.
    #[inline]
    pub(crate) fn end(&mut self, kind: ASTKind) -> GrammarResult<()> {
        if self.is_end() {
            Ok(())
        } else {
            self.miss();
            Err(kind)
        }
    }

    /// Matches an exact literal, without skipping any trailing ignored input.
    #[inline]
    pub(crate) fn literal(&mut self, literal: &str, kind: ASTKind) -> GrammarResult<()> {
        if self.remainder().starts_with(literal) {
            self.pos += literal.len();
            Ok(())
        } else {
            self.miss();
            Err(kind)
        }
    }

    /// Matches a punctuator literal followed by optional ignored input.
    #[inline]
    pub(crate) fn token(&mut self, literal: &str, kind: ASTKind) -> GrammarResult<()> {
        self.literal(literal, kind)?;
        self.ignored();
        Ok(())
    }

    /// Matches a terminal of the given [Lexeme] kind and returns its source slice. Trailing
    /// ignored input isn't skipped.
    #[inline]
    pub(crate) fn lexeme(&mut self, expected: Lexeme, kind: ASTKind) -> GrammarResult<&'a str> {
        match lexeme_at(self.remainder()) {
            Some((lexeme, len)) if lexeme == expected => {
                let slice = &self.source[self.pos..self.pos + len];
                self.pos += len;
                Ok(slice)
            }
            _ => {
                self.miss();
                Err(kind)
            }
        }
    }

    /// Matches a whole name equal to `word` followed by optional ignored input.
    ///
    /// Unlike a literal this won't match a prefix of a longer name, so `queryName` isn't matched
    /// by the keyword `query`.
    #[inline]
    pub(crate) fn keyword(&mut self, word: &str, kind: ASTKind) -> GrammarResult<()> {
        let start = self.pos;
        match self.lexeme(Lexeme::Name, kind) {
            Ok(name) if name == word => {
                self.ignored();
                Ok(())
            }
            Ok(_) => {
                self.pos = start;
                self.miss();
                Err(kind)
            }
            Err(kind) => Err(kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digits<'a>(cursor: &mut Cursor<'a>) -> GrammarResult<&'a str> {
        cursor.lexeme(Lexeme::Number, ASTKind::IntValue)
    }

    #[test]
    fn attempt_rewinds() {
        let ctx = ASTContext::new();
        let mut cursor = Cursor::new(&ctx, "[1 2");
        let result = cursor.attempt(|c| {
            c.token("[", ASTKind::ListValue)?;
            c.many(|c| {
                let value = digits(c)?;
                c.ignored();
                Ok(value)
            });
            c.token("]", ASTKind::ListValue)
        });
        assert_eq!(result, Err(ASTKind::ListValue));
        assert!(!cursor.is_end());
        assert_eq!(cursor.remainder(), "[1 2");
        assert_eq!(cursor.failure(), (4, Some(ASTKind::IntValue)));
    }

    #[test]
    fn repetitions() {
        let ctx = ASTContext::new();
        let mut cursor = Cursor::new(&ctx, "a b c 1");
        let names = cursor.many(|c| {
            let name = c.lexeme(Lexeme::Name, ASTKind::Name)?;
            c.ignored();
            Ok(name)
        });
        assert_eq!(names.as_slice(), &["a", "b", "c"]);
        assert_eq!(cursor.remainder(), "1");

        let mut cursor = Cursor::new(&ctx, "x");
        assert_eq!(cursor.many1(digits), Err(ASTKind::IntValue));
        assert_eq!(cursor.optional(digits), None);
    }

    #[test]
    fn keywords() {
        let ctx = ASTContext::new();
        let mut cursor = Cursor::new(&ctx, "onion");
        assert_eq!(cursor.keyword("on", ASTKind::InlineFragment), Err(ASTKind::InlineFragment));
        assert_eq!(cursor.remainder(), "onion");

        let mut cursor = Cursor::new(&ctx, "on  Type");
        assert_eq!(
            cursor.not(ASTKind::FragmentSpread, |c| c.keyword("on", ASTKind::Name)),
            Err(ASTKind::FragmentSpread)
        );
        assert_eq!(cursor.keyword("on", ASTKind::InlineFragment), Ok(()));
        assert_eq!(cursor.remainder(), "Type");
    }

    #[test]
    fn ignored() {
        let ctx = ASTContext::new();
        let mut cursor = Cursor::new(&ctx, "\u{FEFF} ,, # comment\n\t field");
        cursor.ignored();
        assert_eq!(cursor.remainder(), "field");

        let mut cursor = Cursor::new(&ctx, "# only a comment");
        cursor.ignored();
        assert!(cursor.is_end());
    }
}
