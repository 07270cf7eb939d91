// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Context-sensitive lexer for `.cli` source.
//!
//! Declaration positions (top level, `var` groups, decorator arguments,
//! pattern labels) produce structural tokens. Once a command header's `:`
//! or a body `{` is consumed, bytes up to the next structural boundary
//! are emitted as a single `SHELL_TEXT` token. Interior `${…}`, `$(…)`,
//! `{…}`, `(…)`, quoted spans, and backslash escapes are preserved
//! verbatim by bracket-stack counting, so `find . -exec rm {} \;` and
//! `${VAR:-$(date)}` survive untouched for later inline-decorator
//! extraction.

use devcmd_core::span::{diagnostic_context, Span};
use devcmd_core::token::{Token, TokenKind};
use thiserror::Error;

/// Lexer errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexerError {
    #[error("unexpected character '{c}'")]
    UnexpectedChar { c: char, span: Span },

    #[error("unterminated string literal")]
    UnterminatedString { span: Span },

    #[error("unterminated quote in shell text")]
    UnterminatedQuote { span: Span },

    #[error("unbalanced bracket in shell text")]
    UnbalancedBracket { span: Span },

    #[error("unterminated block comment")]
    UnterminatedComment { span: Span },

    #[error("invalid numeric literal '{text}'")]
    InvalidNumber { text: String, span: Span },

    #[error("unterminated decorator arguments")]
    UnterminatedArgs { span: Span },
}

impl LexerError {
    pub fn span(&self) -> Span {
        match self {
            LexerError::UnexpectedChar { span, .. }
            | LexerError::UnterminatedString { span }
            | LexerError::UnterminatedQuote { span }
            | LexerError::UnbalancedBracket { span }
            | LexerError::UnterminatedComment { span }
            | LexerError::InvalidNumber { span, .. }
            | LexerError::UnterminatedArgs { span } => *span,
        }
    }

    /// Rich diagnostic with line/column info and a caret.
    pub fn diagnostic(&self, source: &str) -> String {
        diagnostic_context(source, self.span(), &self.to_string())
    }
}

/// Quote state inside a shell-text run.
#[derive(Clone, Copy, PartialEq, Eq)]
enum QuoteMode {
    None,
    Single,
    Double,
    Backtick,
}

/// The devcmd lexer.
pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    col: usize,
    tokens: Vec<Token>,
    /// Nesting depth of body braces (not shell-interior braces).
    depth: usize,
}

impl<'a> Lexer<'a> {
    /// Tokenize a complete source file.
    pub fn tokenize(input: &str) -> Result<Vec<Token>, LexerError> {
        let mut lx = Lexer {
            src: input,
            pos: 0,
            line: 1,
            col: 1,
            tokens: Vec::new(),
            depth: 0,
        };
        lx.run()?;
        Ok(lx.tokens)
    }

    // --- character primitives ---

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek2(&self) -> Option<char> {
        let mut it = self.src[self.pos..].chars();
        it.next();
        it.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn mark(&self) -> (usize, usize, usize) {
        (self.pos, self.line, self.col)
    }

    fn push_at(
        &mut self,
        kind: TokenKind,
        text: impl Into<String>,
        mark: (usize, usize, usize),
    ) {
        let (start, line, col) = mark;
        let raw = self.src[start..self.pos].to_string();
        self.tokens.push(Token::new(
            kind,
            text,
            raw,
            Span::new(start, self.pos),
            line,
            col,
        ));
    }

    fn skip_inline_ws(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\r')) {
            self.bump();
        }
    }

    fn skip_blank(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\r' | '\n')) {
            self.bump();
        }
    }

    // --- identifier scanning ---

    fn is_ident_start(c: char) -> bool {
        c.is_ascii_alphabetic()
    }

    fn is_ident_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '_' || c == '-'
    }

    fn scan_ident(&mut self) -> ((usize, usize, usize), String) {
        let mark = self.mark();
        let mut word = String::new();
        while let Some(c) = self.peek() {
            if (word.is_empty() && Self::is_ident_start(c))
                || (!word.is_empty() && Self::is_ident_char(c))
            {
                word.push(c);
                self.bump();
            } else {
                break;
            }
        }
        (mark, word)
    }

    // --- top level ---

    fn run(&mut self) -> Result<(), LexerError> {
        loop {
            self.skip_blank();
            if self.at_end() {
                let mark = self.mark();
                self.push_at(TokenKind::Eof, "", mark);
                return Ok(());
            }
            match self.peek() {
                Some('/') => self.lex_comment()?,
                Some('@') => {
                    // Decorators are not valid at top level; lex the call
                    // so the parser can report it in context.
                    self.lex_decorator_head()?;
                }
                Some(c) if Self::is_ident_start(c) => self.lex_declaration()?,
                Some(c) => {
                    let mark = self.mark();
                    self.bump();
                    return Err(LexerError::UnexpectedChar {
                        c,
                        span: Span::new(mark.0, self.pos),
                    });
                }
                None => {}
            }
        }
    }

    fn lex_declaration(&mut self) -> Result<(), LexerError> {
        let (mark, word) = self.scan_ident();
        match word.as_str() {
            "var" => {
                self.push_at(TokenKind::Var, word, mark);
                self.lex_var_decl()
            }
            "watch" => {
                self.push_at(TokenKind::Watch, word, mark);
                Ok(())
            }
            "stop" => {
                self.push_at(TokenKind::Stop, word, mark);
                Ok(())
            }
            _ => {
                self.push_at(TokenKind::Identifier, word, mark);
                self.skip_inline_ws();
                if self.peek() == Some(':') {
                    let cmark = self.mark();
                    self.bump();
                    self.push_at(TokenKind::Colon, ":", cmark);
                    self.lex_body(false)?;
                }
                Ok(())
            }
        }
    }

    fn lex_var_decl(&mut self) -> Result<(), LexerError> {
        self.skip_inline_ws();
        if self.peek() == Some('(') {
            let mark = self.mark();
            self.bump();
            self.push_at(TokenKind::LParen, "(", mark);
            loop {
                self.skip_blank();
                match self.peek() {
                    None => return Ok(()), // parser reports the missing ')'
                    Some(')') => {
                        let mark = self.mark();
                        self.bump();
                        self.push_at(TokenKind::RParen, ")", mark);
                        return Ok(());
                    }
                    Some('/') => self.lex_comment()?,
                    Some(c) if Self::is_ident_start(c) => {
                        let (imark, word) = self.scan_ident();
                        self.push_at(TokenKind::Identifier, word, imark);
                        self.skip_inline_ws();
                        if self.peek() == Some('=') {
                            let emark = self.mark();
                            self.bump();
                            self.push_at(TokenKind::Equals, "=", emark);
                            self.skip_inline_ws();
                            self.lex_literal()?;
                        }
                    }
                    Some(c) => {
                        let mark = self.mark();
                        self.bump();
                        return Err(LexerError::UnexpectedChar {
                            c,
                            span: Span::new(mark.0, self.pos),
                        });
                    }
                }
            }
        }

        if matches!(self.peek(), Some(c) if Self::is_ident_start(c)) {
            let (imark, word) = self.scan_ident();
            self.push_at(TokenKind::Identifier, word, imark);
            self.skip_inline_ws();
            if self.peek() == Some('=') {
                let emark = self.mark();
                self.bump();
                self.push_at(TokenKind::Equals, "=", emark);
                self.skip_inline_ws();
                self.lex_literal()?;
            }
        }
        Ok(())
    }

    /// Lex a literal in a value-expecting position: string, number,
    /// duration, boolean, or a bare identifier (rejected later for
    /// variable values, allowed as a reference in decorator arguments).
    fn lex_literal(&mut self) -> Result<(), LexerError> {
        match self.peek() {
            Some('"') | Some('\'') | Some('`') => self.lex_string(),
            Some(c) if c.is_ascii_digit() => self.lex_number(),
            Some(c) if Self::is_ident_start(c) => {
                let (mark, word) = self.scan_ident();
                if word == "true" || word == "false" {
                    self.push_at(TokenKind::Boolean, word, mark);
                } else {
                    self.push_at(TokenKind::Identifier, word, mark);
                }
                Ok(())
            }
            Some(c) => {
                let mark = self.mark();
                self.bump();
                Err(LexerError::UnexpectedChar {
                    c,
                    span: Span::new(mark.0, self.pos),
                })
            }
            None => Ok(()),
        }
    }

    fn lex_string(&mut self) -> Result<(), LexerError> {
        let mark = self.mark();
        let quote = self.bump().unwrap_or('"');
        let mut value = String::new();
        loop {
            match self.peek() {
                None => {
                    return Err(LexerError::UnterminatedString {
                        span: Span::new(mark.0, self.pos),
                    })
                }
                Some(c) if c == quote => {
                    self.bump();
                    self.push_at(TokenKind::String, value, mark);
                    return Ok(());
                }
                Some('\\') => {
                    self.bump();
                    if let Some(escaped) = self.bump() {
                        match escaped {
                            'n' => value.push('\n'),
                            't' => value.push('\t'),
                            'r' => value.push('\r'),
                            other => value.push(other),
                        }
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.bump();
                }
            }
        }
    }

    fn lex_number(&mut self) -> Result<(), LexerError> {
        let mark = self.mark();
        let mut digits = String::new();
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            digits.push(self.bump().unwrap_or('0'));
        }
        if self.peek() == Some('.') && matches!(self.peek2(), Some(c) if c.is_ascii_digit()) {
            digits.push(self.bump().unwrap_or('.'));
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                digits.push(self.bump().unwrap_or('0'));
            }
        }

        let mut suffix = String::new();
        while matches!(self.peek(), Some(c) if c.is_ascii_alphabetic()) {
            suffix.push(self.bump().unwrap_or('s'));
        }

        if suffix.is_empty() {
            self.push_at(TokenKind::Number, digits, mark);
            return Ok(());
        }

        let text = format!("{digits}{suffix}");
        if !digits.contains('.') && matches!(suffix.as_str(), "ns" | "us" | "ms" | "s" | "m" | "h")
        {
            self.push_at(TokenKind::Duration, text, mark);
            Ok(())
        } else {
            Err(LexerError::InvalidNumber {
                text,
                span: Span::new(mark.0, self.pos),
            })
        }
    }

    fn lex_comment(&mut self) -> Result<(), LexerError> {
        let mark = self.mark();
        self.bump(); // '/'
        match self.peek() {
            Some('/') => {
                self.bump();
                let text_start = self.pos;
                while !matches!(self.peek(), None | Some('\n')) {
                    self.bump();
                }
                let text = self.src[text_start..self.pos].trim().to_string();
                self.push_at(TokenKind::Comment, text, mark);
                Ok(())
            }
            Some('*') => {
                self.bump();
                let text_start = self.pos;
                loop {
                    match self.peek() {
                        None => {
                            return Err(LexerError::UnterminatedComment {
                                span: Span::new(mark.0, self.pos),
                            })
                        }
                        Some('*') if self.peek2() == Some('/') => {
                            let text = self.src[text_start..self.pos].trim().to_string();
                            self.bump();
                            self.bump();
                            self.push_at(TokenKind::MultilineComment, text, mark);
                            return Ok(());
                        }
                        Some(_) => {
                            self.bump();
                        }
                    }
                }
            }
            other => Err(LexerError::UnexpectedChar {
                c: other.unwrap_or('/'),
                span: Span::new(mark.0, self.pos),
            }),
        }
    }

    // --- decorator calls ---

    /// Lex `@name` and an optional `( args )` list.
    fn lex_decorator_head(&mut self) -> Result<(), LexerError> {
        let amark = self.mark();
        self.bump(); // '@'
        self.push_at(TokenKind::At, "@", amark);

        if matches!(self.peek(), Some(c) if Self::is_ident_start(c)) {
            let (nmark, word) = self.scan_ident();
            self.push_at(TokenKind::Identifier, word, nmark);
        } else {
            return Ok(()); // parser reports the missing name
        }

        if self.peek() != Some('(') {
            return Ok(());
        }
        let pmark = self.mark();
        self.bump();
        self.push_at(TokenKind::LParen, "(", pmark);

        loop {
            self.skip_blank();
            match self.peek() {
                None => {
                    return Err(LexerError::UnterminatedArgs {
                        span: Span::new(pmark.0, self.pos),
                    })
                }
                Some(')') => {
                    let mark = self.mark();
                    self.bump();
                    self.push_at(TokenKind::RParen, ")", mark);
                    return Ok(());
                }
                Some(',') => {
                    let mark = self.mark();
                    self.bump();
                    self.push_at(TokenKind::Comma, ",", mark);
                }
                Some('=') => {
                    let mark = self.mark();
                    self.bump();
                    self.push_at(TokenKind::Equals, "=", mark);
                }
                _ => self.lex_literal()?,
            }
        }
    }

    // --- command bodies ---

    /// Lex the body after a command or pattern-branch colon.
    ///
    /// `in_branch` marks pattern-branch bodies, whose inline commands are
    /// additionally terminated by a top-level `;` so several branches can
    /// share a line.
    fn lex_body(&mut self, in_branch: bool) -> Result<(), LexerError> {
        self.skip_inline_ws();
        match self.peek() {
            None | Some('\n') => Ok(()), // empty body
            Some('@') => {
                self.lex_decorator_head()?;
                self.skip_inline_ws();
                if self.peek() == Some('{') {
                    let mark = self.mark();
                    self.bump();
                    self.push_at(TokenKind::LBrace, "{", mark);
                    self.depth += 1;
                    self.lex_block()
                } else {
                    // Function-decorator sugar: the rest of the line is
                    // shell text.
                    self.lex_shell_text(in_branch)
                }
            }
            Some('{') => {
                let mark = self.mark();
                self.bump();
                self.push_at(TokenKind::LBrace, "{", mark);
                self.depth += 1;
                self.lex_block()
            }
            _ => self.lex_shell_text(in_branch),
        }
    }

    /// Lex content inside body braces until the matching `}`.
    fn lex_block(&mut self) -> Result<(), LexerError> {
        loop {
            self.skip_blank();
            match self.peek() {
                None => return Ok(()), // parser reports the missing '}'
                Some('}') => {
                    let mark = self.mark();
                    self.bump();
                    self.push_at(TokenKind::RBrace, "}", mark);
                    self.depth -= 1;
                    return Ok(());
                }
                Some('/') if matches!(self.peek2(), Some('/') | Some('*')) => {
                    self.lex_comment()?;
                }
                Some(';') => {
                    self.bump(); // empty separator between items
                }
                Some('@') => {
                    self.lex_decorator_head()?;
                    self.skip_inline_ws();
                    if self.peek() == Some('{') {
                        let mark = self.mark();
                        self.bump();
                        self.push_at(TokenKind::LBrace, "{", mark);
                        self.depth += 1;
                        self.lex_block()?;
                    } else {
                        self.lex_shell_text(false)?;
                    }
                }
                Some(c) if Self::is_ident_start(c) && self.at_branch_label() => {
                    let (imark, word) = self.scan_ident();
                    self.push_at(TokenKind::Identifier, word, imark);
                    self.skip_inline_ws();
                    let cmark = self.mark();
                    self.bump(); // ':'
                    self.push_at(TokenKind::Colon, ":", cmark);
                    self.lex_body(true)?;
                }
                Some(_) => self.lex_shell_text(false)?,
            }
        }
    }

    /// Lookahead: does the upcoming text form a pattern label `ident :`?
    fn at_branch_label(&self) -> bool {
        let rest = &self.src[self.pos..];
        let mut chars = rest.char_indices();
        let Some((_, first)) = chars.next() else {
            return false;
        };
        if !Self::is_ident_start(first) {
            return false;
        }
        let mut end = first.len_utf8();
        for (i, c) in chars {
            if Self::is_ident_char(c) {
                end = i + c.len_utf8();
            } else {
                break;
            }
        }
        rest[end..]
            .chars()
            .find(|c| *c != ' ' && *c != '\t')
            .is_some_and(|c| c == ':')
    }

    /// Lex a raw shell-text run, preserving bracketed and quoted spans.
    ///
    /// The run ends at a logical newline outside brackets, at the block's
    /// closing `}` (left unconsumed), or, inside pattern branches, at a
    /// top-level `;`.
    fn lex_shell_text(&mut self, ends_at_semi: bool) -> Result<(), LexerError> {
        self.skip_inline_ws();
        let mark = self.mark();
        let mut stack: Vec<char> = Vec::new();
        let mut quote = QuoteMode::None;

        loop {
            let Some(c) = self.peek() else {
                if quote != QuoteMode::None {
                    return Err(LexerError::UnterminatedQuote {
                        span: Span::new(mark.0, self.pos),
                    });
                }
                if !stack.is_empty() {
                    return Err(LexerError::UnbalancedBracket {
                        span: Span::new(mark.0, self.pos),
                    });
                }
                break;
            };

            match quote {
                QuoteMode::Single => {
                    self.bump();
                    if c == '\'' {
                        quote = QuoteMode::None;
                    }
                    continue;
                }
                QuoteMode::Double | QuoteMode::Backtick => {
                    self.bump();
                    match c {
                        '\\' => {
                            self.bump();
                        }
                        '"' if quote == QuoteMode::Double => quote = QuoteMode::None,
                        '`' if quote == QuoteMode::Backtick => quote = QuoteMode::None,
                        _ => {}
                    }
                    continue;
                }
                QuoteMode::None => {}
            }

            match c {
                '\\' => {
                    self.bump();
                    self.bump(); // escaped char (or line continuation)
                }
                '\'' => {
                    quote = QuoteMode::Single;
                    self.bump();
                }
                '"' => {
                    quote = QuoteMode::Double;
                    self.bump();
                }
                '`' => {
                    quote = QuoteMode::Backtick;
                    self.bump();
                }
                '$' => {
                    self.bump();
                    match self.peek() {
                        Some('{') => {
                            stack.push('}');
                            self.bump();
                        }
                        Some('(') => {
                            stack.push(')');
                            self.bump();
                        }
                        _ => {}
                    }
                }
                '{' => {
                    stack.push('}');
                    self.bump();
                }
                '(' => {
                    stack.push(')');
                    self.bump();
                }
                '}' => {
                    if stack.last() == Some(&'}') {
                        stack.pop();
                        self.bump();
                    } else if stack.is_empty() && self.depth > 0 {
                        break; // structural close, not ours
                    } else {
                        self.bump();
                    }
                }
                ')' => {
                    if stack.last() == Some(&')') {
                        stack.pop();
                    }
                    self.bump();
                }
                '\n' => {
                    if stack.is_empty() {
                        break;
                    }
                    self.bump();
                }
                ';' => {
                    if ends_at_semi && stack.is_empty() {
                        break;
                    }
                    self.bump();
                }
                _ => {
                    self.bump();
                }
            }
        }

        let raw = &self.src[mark.0..self.pos];
        let text = raw.trim();
        if !text.is_empty() {
            let text = text.to_string();
            self.push_at(TokenKind::ShellText, text, mark);
        }

        // Consume the terminator when it is ours.
        match self.peek() {
            Some('\n') => {
                self.bump();
            }
            Some(';') if ends_at_semi => {
                self.bump();
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "lexer_tests.rs"]
mod tests;
