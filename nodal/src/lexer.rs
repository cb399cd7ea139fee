use std::sync::Arc;

use crate::{Bounds, Fault, Word};

/// Cursor over a node's script. Offsets are byte offsets into `code`.
#[derive(Debug, Clone)]
pub struct Lexer {
    pub code: Arc<[u8]>,
    pub end: usize,
    pub offset: usize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Token {
    pub start: usize,
    pub len: usize,
}

/// One syntactic unit pulled off the script.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Lexeme {
    Comment,
    /// `start` is the offset of the first byte after `{`.
    Block { start: usize },
    Token(Token),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ParsedToken<'a> {
    Return,
    Char(Word),
    Literal(Word),
    Pointer(Word),
    Label(&'a str),
    Word(&'a str),
}

impl Lexer {
    #[inline]
    pub fn new(code: &[u8]) -> Self {
        Self::from_shared(Arc::from(code))
    }

    #[inline]
    pub fn from_shared(code: Arc<[u8]>) -> Self {
        let end = code.len();
        Self {
            code,
            end,
            offset: 0,
        }
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.offset >= self.end
    }

    #[inline]
    pub fn is_at_whitespace(&self) -> bool {
        self.code[self.offset].is_ascii_whitespace()
    }

    #[inline]
    pub fn skip_whitespace(&mut self) {
        while !self.is_done() && self.is_at_whitespace() {
            self.offset += 1;
        }
    }

    #[inline]
    pub fn rewind(&mut self) {
        self.offset = 0;
    }

    /// Moves the cursor to a script address taken from node memory.
    pub fn seek(&mut self, offset: Word) -> Result<(), Fault> {
        let fault = Fault::OutOfBounds(Bounds::Script {
            offset,
            length: self.end,
        });
        let target = usize::try_from(offset).map_err(|_| fault.clone())?;
        if target > self.end {
            return Err(fault);
        }
        self.offset = target;
        Ok(())
    }

    /// Skips a nested `open` .. `close` span. The cursor must sit on `open`.
    fn skip_nested(&mut self, open: u8, close: u8) -> Result<(), Fault> {
        self.offset += 1;
        let mut levels = 1usize;
        while !self.is_done() && levels > 0 {
            let byte = self.code[self.offset];
            if byte == open {
                levels += 1;
            } else if byte == close {
                levels -= 1;
            }
            self.offset += 1;
        }
        if levels > 0 {
            return Err(Fault::Unterminated(open as char));
        }
        Ok(())
    }

    pub fn next_lexeme(&mut self) -> Result<Option<Lexeme>, Fault> {
        self.skip_whitespace();
        if self.is_done() {
            return Ok(None);
        }

        match self.code[self.offset] {
            b'(' => {
                self.skip_nested(b'(', b')')?;
                Ok(Some(Lexeme::Comment))
            }
            b'{' => {
                let start = self.offset + 1;
                self.skip_nested(b'{', b'}')?;
                Ok(Some(Lexeme::Block { start }))
            }
            _ => {
                let start = self.offset;
                while !self.is_done() && !self.is_at_whitespace() {
                    self.offset += 1;
                }
                let len = self.offset - start;
                Ok(Some(Lexeme::Token(Token { start, len })))
            }
        }
    }

    #[inline]
    pub fn get_token_string(&self, token: Token) -> Result<&str, Fault> {
        let bytes = &self.code[token.start..token.start + token.len];
        std::str::from_utf8(bytes).map_err(|_| {
            Fault::UnknownWord(String::from_utf8_lossy(bytes).into_owned())
        })
    }
}

/// Walks a script the way `tick` would and reports the first `(` or `{`
/// that is never closed, including inside block bodies.
pub fn find_unbalanced(code: &[u8]) -> Option<(char, usize)> {
    let mut lexer = Lexer::new(code);
    check_span(&mut lexer)
}

fn check_span(lexer: &mut Lexer) -> Option<(char, usize)> {
    loop {
        lexer.skip_whitespace();
        let at = lexer.offset;
        match lexer.next_lexeme() {
            Ok(None) => return None,
            Ok(Some(Lexeme::Block { start })) => {
                let mut body = Lexer {
                    code: lexer.code.clone(),
                    end: lexer.offset - 1,
                    offset: start,
                };
                if let Some(found) = check_span(&mut body) {
                    return Some(found);
                }
            }
            Ok(Some(_)) => {}
            Err(Fault::Unterminated(open)) => return Some((open, at)),
            Err(_) => return None,
        }
    }
}

pub fn classify(token: &str) -> Result<ParsedToken<'_>, Fault> {
    if token == "}" {
        return Ok(ParsedToken::Return);
    }
    if let Some(rest) = token.strip_prefix('\'') {
        let ordinal = rest.chars().next().map_or(0, |c| c as Word);
        return Ok(ParsedToken::Char(ordinal));
    }
    if let Some(rest) = token.strip_prefix('#') {
        return parse_literal(rest)
            .map(ParsedToken::Literal)
            .ok_or_else(|| Fault::BadLiteral(token.to_string()));
    }
    if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
        // too large to be a cell either way, let the bounds check reject it
        let index = token.parse::<Word>().unwrap_or(Word::MAX);
        return Ok(ParsedToken::Pointer(index));
    }
    if let Some(name) = token.strip_prefix(':') {
        if name.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return Ok(ParsedToken::Label(name));
        }
    }
    Ok(ParsedToken::Word(token))
}

/// Integer literal body: optional sign, then decimal or a
/// `0x`/`0o`/`0b` prefixed number.
pub fn parse_literal(text: &str) -> Option<Word> {
    let (negative, unsigned) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let (radix, digits) = [("0x", 16), ("0X", 16), ("0o", 8), ("0b", 2)]
        .iter()
        .find_map(|(prefix, radix)| unsigned.strip_prefix(prefix).map(|rest| (*radix, rest)))
        .unwrap_or((10, unsigned));

    // from_str_radix would accept a second sign
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }

    let magnitude = u64::from_str_radix(digits, radix).ok()?;
    if negative {
        if magnitude > Word::MIN.unsigned_abs() {
            return None;
        }
        Some((magnitude as Word).wrapping_neg())
    } else {
        Word::try_from(magnitude).ok()
    }
}
