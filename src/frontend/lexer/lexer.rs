use crate::error::{Diagnostic, DiagnosticKind, Reporter};
use crate::frontend::lexer::token::{Token, TokenKind};
use codespan::{ByteIndex, FileId, Span};

pub struct Lexer<'a> {
    source: &'a [u8],
    file_id: FileId,
    reporter: &'a mut Reporter,
    current: usize,
    start: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, file_id: FileId, reporter: &'a mut Reporter) -> Self {
        Self {
            source: source.as_bytes(),
            file_id,
            reporter,
            current: 0,
            start: 0,
        }
    }

    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token();
            let done = matches!(token.kind, TokenKind::Eof);
            tokens.push(token);
            if done {
                break;
            }
        }

        tokens
    }

    fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        self.start = self.current;
        if self.is_at_end() {
            return self.make_token(TokenKind::Eof);
        }

        let c = self.advance();
        match c {
            b'(' => self.make_token(TokenKind::LParen),
            b')' => self.make_token(TokenKind::RParen),
            b'{' => self.make_token(TokenKind::LBrace),
            b'}' => self.make_token(TokenKind::RBrace),
            b'[' => self.make_token(TokenKind::LBracket),
            b']' => self.make_token(TokenKind::RBracket),
            b',' => self.make_token(TokenKind::Comma),
            b';' => self.make_token(TokenKind::Semicolon),
            b':' => self.make_token(TokenKind::Colon),
            b'~' => self.make_token(TokenKind::Tilde),
            b'^' => {
                if self.match_byte(b'=') {
                    self.make_token(TokenKind::CaretEq)
                } else {
                    self.make_token(TokenKind::Caret)
                }
            }
            b'+' => {
                if self.match_byte(b'+') {
                    self.make_token(TokenKind::PlusPlus)
                } else if self.match_byte(b'=') {
                    self.make_token(TokenKind::PlusEq)
                } else {
                    self.make_token(TokenKind::Plus)
                }
            }
            b'-' => {
                if self.match_byte(b'>') {
                    self.make_token(TokenKind::Arrow)
                } else if self.match_byte(b'=') {
                    self.make_token(TokenKind::MinusEq)
                } else {
                    self.make_token(TokenKind::Minus)
                }
            }
            b'*' => {
                if self.match_byte(b'=') {
                    self.make_token(TokenKind::StarEq)
                } else {
                    self.make_token(TokenKind::Star)
                }
            }
            b'/' => {
                if self.match_byte(b'=') {
                    self.make_token(TokenKind::SlashEq)
                } else {
                    self.make_token(TokenKind::Slash)
                }
            }
            b'%' => {
                if self.match_byte(b'%') {
                    self.make_token(TokenKind::PercentPercent)
                } else if self.match_byte(b'=') {
                    self.make_token(TokenKind::PercentEq)
                } else {
                    self.make_token(TokenKind::Percent)
                }
            }
            b'=' => {
                if self.match_byte(b'=') {
                    self.make_token(TokenKind::EqEq)
                } else if self.match_byte(b'>') {
                    self.make_token(TokenKind::FatArrow)
                } else {
                    self.make_token(TokenKind::Eq)
                }
            }
            b'!' => {
                if self.match_byte(b'=') {
                    self.make_token(TokenKind::BangEq)
                } else {
                    self.make_token(TokenKind::Bang)
                }
            }
            b'<' => {
                if self.match_byte(b'<') {
                    if self.match_byte(b'=') {
                        self.make_token(TokenKind::ShlEq)
                    } else {
                        self.make_token(TokenKind::Shl)
                    }
                } else if self.match_byte(b'=') {
                    self.make_token(TokenKind::LtEq)
                } else {
                    self.make_token(TokenKind::Lt)
                }
            }
            b'>' => {
                if self.match_byte(b'>') {
                    if self.match_byte(b'=') {
                        self.make_token(TokenKind::ShrEq)
                    } else {
                        self.make_token(TokenKind::Shr)
                    }
                } else if self.match_byte(b'=') {
                    self.make_token(TokenKind::GtEq)
                } else {
                    self.make_token(TokenKind::Gt)
                }
            }
            b'&' => {
                if self.match_byte(b'&') {
                    if self.match_byte(b'=') {
                        self.make_token(TokenKind::AmpAmpEq)
                    } else {
                        self.make_token(TokenKind::AmpAmp)
                    }
                } else if self.match_byte(b'=') {
                    self.make_token(TokenKind::AmpEq)
                } else {
                    self.make_token(TokenKind::Amp)
                }
            }
            b'|' => {
                if self.match_byte(b'|') {
                    if self.match_byte(b'=') {
                        self.make_token(TokenKind::PipePipeEq)
                    } else {
                        self.make_token(TokenKind::PipePipe)
                    }
                } else if self.match_byte(b'=') {
                    self.make_token(TokenKind::PipeEq)
                } else {
                    self.make_token(TokenKind::Pipe)
                }
            }
            b'?' => {
                if self.match_byte(b'?') {
                    self.make_token(TokenKind::QuestionQuestion)
                } else if self.match_byte(b'=') {
                    self.make_token(TokenKind::QuestionEq)
                } else {
                    self.make_token(TokenKind::Question)
                }
            }
            b'.' => {
                if self.peek() == b'.' && self.peek_next() == b'.' {
                    self.advance();
                    self.advance();
                    self.make_token(TokenKind::Ellipsis)
                } else if self.peek() == b'.' {
                    self.advance();
                    self.make_token(TokenKind::DotDot)
                } else {
                    self.make_token(TokenKind::Dot)
                }
            }
            b'@' => {
                if self.is_alpha(self.peek()) {
                    let name = self.read_identifier_text();
                    self.make_token(TokenKind::Builtin(name))
                } else {
                    self.error_token("invalid character: '@'")
                }
            }
            b'#' => {
                if self.is_alpha(self.peek()) {
                    let name = self.read_identifier_text();
                    self.make_token(TokenKind::Directive(name))
                } else {
                    self.error_token("invalid character: '#'")
                }
            }
            b'"' => self.string_literal(false),
            b'\'' => self.char_literal(),
            c if c.is_ascii_digit() => self.number_literal(c),
            c if self.is_alpha(c) => self.identifier_or_keyword(),
            c => self.error_token(&format!("invalid character: '{}'", c as char)),
        }
    }

    fn identifier_or_keyword(&mut self) -> Token {
        while self.is_alphanumeric(self.peek()) {
            self.advance();
        }
        let text = std::str::from_utf8(&self.source[self.start..self.current])
            .unwrap_or("")
            .to_string();

        // c"..." is a c string literal
        if text == "c" && self.peek() == b'"' {
            self.advance();
            return self.string_literal(true);
        }

        if let Some(keyword) = TokenKind::keyword_from_str(&text) {
            self.make_token(keyword)
        } else {
            self.make_token(TokenKind::Identifier(text))
        }
    }

    fn read_identifier_text(&mut self) -> String {
        let name_start = self.current;
        while self.is_alphanumeric(self.peek()) {
            self.advance();
        }
        std::str::from_utf8(&self.source[name_start..self.current])
            .unwrap_or("")
            .to_string()
    }

    fn number_literal(&mut self, first: u8) -> Token {
        let mut radix = 10u64;
        if first == b'0' {
            match self.peek() {
                b'x' | b'X' => {
                    radix = 16;
                    self.advance();
                }
                b'o' | b'O' => {
                    radix = 8;
                    self.advance();
                }
                b'b' | b'B' => {
                    radix = 2;
                    self.advance();
                }
                _ => {}
            }
        }

        let mut value: u64 = if radix == 10 {
            (first - b'0') as u64
        } else {
            0
        };
        let mut overflow = false;

        while let Some(digit) = self.digit_value(self.peek(), radix) {
            self.advance();
            value = match value
                .checked_mul(radix)
                .and_then(|v| v.checked_add(digit))
            {
                Some(v) => v,
                None => {
                    overflow = true;
                    value
                }
            };
        }

        // a dot followed by a digit makes it a float; two dots is a range
        if radix == 10 && self.peek() == b'.' && self.peek_next().is_ascii_digit() {
            self.advance();
            while self.peek().is_ascii_digit() {
                self.advance();
            }
            if self.peek() == b'e' || self.peek() == b'E' {
                self.advance();
                if self.peek() == b'+' || self.peek() == b'-' {
                    self.advance();
                }
                while self.peek().is_ascii_digit() {
                    self.advance();
                }
            }
            let text = std::str::from_utf8(&self.source[self.start..self.current]).unwrap_or("0");
            let parsed: f64 = text.parse().unwrap_or(f64::INFINITY);
            return self.make_token(TokenKind::FloatLiteral(parsed));
        }

        self.make_token(TokenKind::IntLiteral { value, overflow })
    }

    fn digit_value(&self, c: u8, radix: u64) -> Option<u64> {
        let value = match c {
            b'0'..=b'9' => (c - b'0') as u64,
            b'a'..=b'f' => (c - b'a') as u64 + 10,
            b'A'..=b'F' => (c - b'A') as u64 + 10,
            b'_' => return None,
            _ => return None,
        };
        if value < radix {
            Some(value)
        } else {
            None
        }
    }

    fn string_literal(&mut self, is_c: bool) -> Token {
        let mut value = Vec::new();
        loop {
            if self.is_at_end() {
                return self.error_token("unterminated string literal");
            }
            let c = self.advance();
            match c {
                b'"' => break,
                b'\\' => match self.escape_byte() {
                    Some(b) => value.push(b),
                    None => return self.error_token("invalid escape sequence"),
                },
                b'\n' => return self.error_token("unterminated string literal"),
                c => value.push(c),
            }
        }
        self.make_token(TokenKind::StringLiteral { value, is_c })
    }

    fn char_literal(&mut self) -> Token {
        if self.is_at_end() {
            return self.error_token("unterminated char literal");
        }
        let c = self.advance();
        let value = if c == b'\\' {
            match self.escape_byte() {
                Some(b) => b,
                None => return self.error_token("invalid escape sequence"),
            }
        } else {
            c
        };
        if !self.match_byte(b'\'') {
            return self.error_token("unterminated char literal");
        }
        self.make_token(TokenKind::CharLiteral(value))
    }

    fn escape_byte(&mut self) -> Option<u8> {
        if self.is_at_end() {
            return None;
        }
        let c = self.advance();
        match c {
            b'n' => Some(b'\n'),
            b'r' => Some(b'\r'),
            b't' => Some(b'\t'),
            b'0' => Some(0),
            b'\\' => Some(b'\\'),
            b'"' => Some(b'"'),
            b'\'' => Some(b'\''),
            b'x' => {
                let hi = self.digit_value(self.peek(), 16)?;
                self.advance();
                let lo = self.digit_value(self.peek(), 16)?;
                self.advance();
                Some((hi * 16 + lo) as u8)
            }
            _ => None,
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                b' ' | b'\t' | b'\r' | b'\n' => {
                    self.advance();
                }
                b'/' if self.peek_next() == b'/' => {
                    while self.peek() != b'\n' && !self.is_at_end() {
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        Token {
            kind,
            span: Span::new(ByteIndex(self.start as u32), ByteIndex(self.current as u32)),
        }
    }

    fn error_token(&mut self, message: &str) -> Token {
        let span = Span::new(ByteIndex(self.start as u32), ByteIndex(self.current as u32));
        self.reporter.add_diagnostic(Diagnostic::error(
            DiagnosticKind::Parse,
            span,
            self.file_id,
            message.to_string(),
        ));
        // resume after the offending text
        self.next_token()
    }

    fn is_alpha(&self, c: u8) -> bool {
        c.is_ascii_alphabetic() || c == b'_'
    }

    fn is_alphanumeric(&self, c: u8) -> bool {
        c.is_ascii_alphanumeric() || c == b'_'
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> u8 {
        let c = self.source[self.current];
        self.current += 1;
        c
    }

    fn match_byte(&mut self, expected: u8) -> bool {
        if self.is_at_end() || self.source[self.current] != expected {
            return false;
        }
        self.current += 1;
        true
    }

    fn peek(&self) -> u8 {
        if self.is_at_end() {
            0
        } else {
            self.source[self.current]
        }
    }

    fn peek_next(&self) -> u8 {
        if self.current + 1 >= self.source.len() {
            0
        } else {
            self.source[self.current + 1]
        }
    }
}
