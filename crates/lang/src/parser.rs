// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recursive-descent parser for devcmd programs.
//!
//! Single pass over the token stream, collecting multiple errors by
//! synchronizing to the next top-level keyword after a failure. Syntax
//! sugar is normalized here so the four equivalent source forms
//! (`name: shell`, `name: { shell }`, `name: @f(…) shell`,
//! `name: @b(…) { … }`) produce identical ASTs, and every `@name`
//! reference is classified and validated through the decorator registry.

use devcmd_core::ast::{
    BlockDecorator, CommandBody, CommandContent, CommandDecl, CommandKind, FunctionDecorator,
    NamedParam, Pattern, PatternBranch, PatternDecorator, Program, ShellContent, ShellPart,
    VarDecl, VarGroup,
};
use devcmd_core::span::Span;
use devcmd_core::token::{Token, TokenKind};
use devcmd_core::value::Expr;
use devcmd_runtime::registry::{self, DecoratorKind};
use devcmd_runtime::schema::{check_patterns, ParameterSchema};
use std::collections::HashSet;

use crate::lexer::Lexer;
use crate::parse_error::{ParseError, ParseReport};

/// Parse a complete source file into a program.
///
/// Returns the program, or a report grouping every error found.
pub fn parse(input: &str) -> Result<Program, ParseReport> {
    let tokens = match Lexer::tokenize(input) {
        Ok(tokens) => tokens,
        Err(e) => return Err(ParseReport::new(vec![e.into()], input)),
    };

    let mut parser = Parser {
        tokens,
        pos: 0,
        errors: Vec::new(),
    };
    let program = parser.parse_program();

    if parser.errors.is_empty() {
        Ok(program)
    } else {
        Err(ParseReport::new(parser.errors, input))
    }
}

/// A parsed decorator head: `@name(args)`, classified by the registry.
struct DecoCall {
    name: String,
    args: Vec<NamedParam>,
    kind: DecoratorKind,
    span: Span,
    /// Line of the call's last token, to keep sugar on one line.
    end_line: usize,
}

/// The devcmd parser.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    errors: Vec<ParseError>,
}

impl Parser {
    // --- token primitives ---

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_next(&self) -> Option<&Token> {
        self.tokens.get(self.pos + 1)
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn at_end(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    fn consume(&mut self, kind: TokenKind, expected: &str) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.current();
        ParseError::UnexpectedToken {
            found: token.kind,
            expected: expected.to_string(),
            span: token.span,
        }
    }

    fn skip_trivia(&mut self) {
        while self.current().is_trivia() {
            self.advance();
        }
    }

    /// Skip to the next probable declaration start after an error.
    fn synchronize(&mut self) {
        self.advance();
        while !self.at_end() {
            match self.current().kind {
                TokenKind::Var | TokenKind::Watch | TokenKind::Stop => return,
                TokenKind::Identifier
                    if self.peek_next().map(|t| t.kind) == Some(TokenKind::Colon) =>
                {
                    return
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    // --- program ---

    fn parse_program(&mut self) -> Program {
        let mut program = Program::default();

        while {
            self.skip_trivia();
            !self.at_end()
        } {
            match self.current().kind {
                TokenKind::Var => {
                    if self.peek_next().map(|t| t.kind) == Some(TokenKind::LParen) {
                        match self.parse_var_group() {
                            Ok(group) => program.var_groups.push(group),
                            Err(e) => {
                                self.errors.push(e);
                                self.synchronize();
                            }
                        }
                    } else {
                        match self.parse_variable_decl() {
                            Ok(decl) => program.variables.push(decl),
                            Err(e) => {
                                self.errors.push(e);
                                self.synchronize();
                            }
                        }
                    }
                }
                TokenKind::Identifier | TokenKind::Watch | TokenKind::Stop => {
                    match self.parse_command_decl() {
                        Ok(cmd) => program.commands.push(cmd),
                        Err(e) => {
                            self.errors.push(e);
                            self.synchronize();
                        }
                    }
                }
                _ => {
                    self.errors
                        .push(self.unexpected("a top-level declaration (var or command)"));
                    self.synchronize();
                }
            }
        }

        self.validate_names(&program);
        program
    }

    /// Command-name uniqueness: no duplicates within a category, and a
    /// regular command may not share a name with a watch/stop pair.
    fn validate_names(&mut self, program: &Program) {
        let mut seen: HashSet<(String, CommandKind)> = HashSet::new();
        for cmd in &program.commands {
            if !seen.insert((cmd.name.clone(), cmd.kind)) {
                self.errors.push(ParseError::DuplicateCommand {
                    name: cmd.name.clone(),
                    category: match cmd.kind {
                        CommandKind::Regular => "command",
                        CommandKind::Watch => "watch command",
                        CommandKind::Stop => "stop command",
                    },
                    span: cmd.span,
                });
            }
        }
        for cmd in &program.commands {
            if cmd.kind == CommandKind::Regular
                && (seen.contains(&(cmd.name.clone(), CommandKind::Watch))
                    || seen.contains(&(cmd.name.clone(), CommandKind::Stop)))
            {
                self.errors.push(ParseError::CrossCategoryConflict {
                    name: cmd.name.clone(),
                    span: cmd.span,
                });
            }
        }

        let mut vars: HashSet<&str> = HashSet::new();
        for var in program.all_variables() {
            if !vars.insert(&var.name) {
                self.errors.push(ParseError::DuplicateCommand {
                    name: var.name.clone(),
                    category: "variable",
                    span: var.span,
                });
            }
        }
    }

    // --- variables ---

    fn parse_variable_decl(&mut self) -> Result<VarDecl, ParseError> {
        let start = self.current().span;
        self.consume(TokenKind::Var, "'var'")?;
        let name = self.consume(TokenKind::Identifier, "variable name")?;
        self.consume(TokenKind::Equals, "'=' after variable name")?;
        let value = self.parse_var_value()?;
        Ok(VarDecl {
            name: name.text,
            value,
            span: start.merge(self.prev_span()),
        })
    }

    fn parse_var_group(&mut self) -> Result<VarGroup, ParseError> {
        let start = self.current().span;
        self.consume(TokenKind::Var, "'var'")?;
        self.consume(TokenKind::LParen, "'(' for var group")?;

        let mut variables = Vec::new();
        loop {
            self.skip_trivia();
            if self.check(TokenKind::RParen) || self.at_end() {
                break;
            }
            let name = self.consume(TokenKind::Identifier, "variable name inside var group")?;
            self.consume(TokenKind::Equals, "'=' after variable name")?;
            let value = self.parse_var_value()?;
            let span = name.span.merge(self.prev_span());
            variables.push(VarDecl {
                name: name.text,
                value,
                span,
            });
        }

        self.consume(TokenKind::RParen, "')' to close var group")?;
        Ok(VarGroup {
            variables,
            span: start.merge(self.prev_span()),
        })
    }

    /// Variable values are restricted to the four literal kinds.
    fn parse_var_value(&mut self) -> Result<Expr, ParseError> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::String => {
                self.advance();
                Ok(Expr::Str(token.text))
            }
            TokenKind::Number => {
                self.advance();
                Ok(Expr::Number(token.text))
            }
            TokenKind::Duration => {
                self.advance();
                Ok(Expr::Duration(token.text))
            }
            TokenKind::Boolean => {
                self.advance();
                Ok(Expr::Bool(token.text == "true"))
            }
            _ => Err(ParseError::InvalidVarValue { span: token.span }),
        }
    }

    fn prev_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            Span::default()
        }
    }

    // --- commands ---

    fn parse_command_decl(&mut self) -> Result<CommandDecl, ParseError> {
        let start = self.current().span;
        let kind = match self.current().kind {
            TokenKind::Watch => {
                self.advance();
                CommandKind::Watch
            }
            TokenKind::Stop => {
                self.advance();
                CommandKind::Stop
            }
            _ => CommandKind::Regular,
        };

        let name = self.consume(TokenKind::Identifier, "command name")?;
        self.consume(TokenKind::Colon, "':' after command name")?;
        let body = self.parse_command_body()?;

        Ok(CommandDecl {
            name: name.text,
            kind,
            body,
            span: start.merge(self.prev_span()),
        })
    }

    fn parse_command_body(&mut self) -> Result<CommandBody, ParseError> {
        let start = self.current().span;
        match self.current().kind {
            TokenKind::At => {
                let call = self.parse_decorator_call()?;
                match call.kind {
                    DecoratorKind::Block(_) => {
                        self.consume(TokenKind::LBrace, "'{' after block decorator")?;
                        let content = self.parse_block_items()?;
                        self.consume(TokenKind::RBrace, "'}' to close command block")?;
                        Ok(CommandBody {
                            content: vec![CommandContent::Block(BlockDecorator {
                                name: call.name,
                                args: call.args,
                                content,
                                span: call.span.merge(self.prev_span()),
                            })],
                            braced: true,
                            span: start.merge(self.prev_span()),
                        })
                    }
                    DecoratorKind::Pattern(p) => {
                        self.consume(TokenKind::LBrace, "'{' after pattern decorator")?;
                        let branches = self.parse_pattern_branches()?;
                        self.consume(TokenKind::RBrace, "'}' to close pattern block")?;
                        let deco_span = call.span.merge(self.prev_span());
                        check_patterns(&call.name, p.pattern_schema(), &branches).map_err(
                            |inner| ParseError::Schema {
                                inner,
                                span: deco_span,
                            },
                        )?;
                        Ok(CommandBody {
                            content: vec![CommandContent::Pattern(PatternDecorator {
                                name: call.name,
                                args: call.args,
                                branches,
                                span: deco_span,
                            })],
                            braced: true,
                            span: start.merge(self.prev_span()),
                        })
                    }
                    DecoratorKind::Value(_) | DecoratorKind::Action(_) => {
                        let shell = self.function_sugar_shell(call)?;
                        Ok(CommandBody {
                            content: vec![CommandContent::Shell(shell)],
                            braced: false,
                            span: start.merge(self.prev_span()),
                        })
                    }
                }
            }
            TokenKind::LBrace => {
                self.advance();
                let content = self.parse_block_items()?;
                self.consume(TokenKind::RBrace, "'}' to close command block")?;
                // Canonical simple form: one shell-only item drops the
                // braces so equivalent sources yield identical ASTs.
                let braced = !(content.len() == 1
                    && matches!(content[0], CommandContent::Shell(_)));
                Ok(CommandBody {
                    content,
                    braced,
                    span: start.merge(self.prev_span()),
                })
            }
            TokenKind::ShellText => {
                let token = self.advance();
                let shell = self.shell_content_from(&token);
                Ok(CommandBody {
                    content: vec![CommandContent::Shell(shell)],
                    braced: false,
                    span: start.merge(self.prev_span()),
                })
            }
            // An absent body canonicalizes like an empty block.
            _ => Ok(CommandBody {
                content: Vec::new(),
                braced: true,
                span: Span::empty(start.start),
            }),
        }
    }

    /// Items inside `{ … }`, one per SHELL_TEXT or decorator occurrence.
    /// Consecutive shell lines stay separate content items.
    fn parse_block_items(&mut self) -> Result<Vec<CommandContent>, ParseError> {
        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            if self.check(TokenKind::RBrace) || self.at_end() {
                break;
            }
            match self.current().kind {
                TokenKind::ShellText => {
                    let token = self.advance();
                    let shell = self.shell_content_from(&token);
                    if !shell.parts.is_empty() {
                        items.push(CommandContent::Shell(shell));
                    }
                }
                TokenKind::At => {
                    let call = self.parse_decorator_call()?;
                    items.push(self.finish_decorator_item(call)?);
                }
                _ => {
                    return Err(self.unexpected("shell text, a decorator, or '}'"));
                }
            }
        }
        Ok(items)
    }

    /// Complete a decorator occurrence inside a block or branch.
    fn finish_decorator_item(&mut self, call: DecoCall) -> Result<CommandContent, ParseError> {
        match call.kind {
            DecoratorKind::Block(_) => {
                self.consume(TokenKind::LBrace, "'{' after block decorator")?;
                let content = self.parse_block_items()?;
                self.consume(TokenKind::RBrace, "'}' after block decorator content")?;
                Ok(CommandContent::Block(BlockDecorator {
                    name: call.name,
                    args: call.args,
                    content,
                    span: call.span.merge(self.prev_span()),
                }))
            }
            DecoratorKind::Pattern(p) => {
                self.consume(TokenKind::LBrace, "'{' after pattern decorator")?;
                let branches = self.parse_pattern_branches()?;
                self.consume(TokenKind::RBrace, "'}' to close pattern block")?;
                let deco_span = call.span.merge(self.prev_span());
                check_patterns(&call.name, p.pattern_schema(), &branches).map_err(|inner| {
                    ParseError::Schema {
                        inner,
                        span: deco_span,
                    }
                })?;
                Ok(CommandContent::Pattern(PatternDecorator {
                    name: call.name,
                    args: call.args,
                    branches,
                    span: deco_span,
                }))
            }
            DecoratorKind::Value(_) | DecoratorKind::Action(_) => {
                let shell = self.function_sugar_shell(call)?;
                Ok(CommandContent::Shell(shell))
            }
        }
    }

    /// Build shell content from function-decorator sugar: the decorator
    /// becomes the first part, followed by any shell text on the line.
    fn function_sugar_shell(&mut self, call: DecoCall) -> Result<ShellContent, ParseError> {
        let mut parts = vec![ShellPart::Decorator(FunctionDecorator {
            name: call.name,
            args: call.args,
            span: call.span,
        })];
        let mut span = call.span;

        if self.check(TokenKind::ShellText) && self.current().line == call.end_line {
            let token = self.advance();
            // Preserve word separation between the call and the text.
            if token.span.start > call.span.end {
                parts.push(ShellPart::Text(" ".to_string()));
            }
            parts.extend(self.extract_inline_parts(&token));
            span = span.merge(token.span);
        }

        Ok(ShellContent { parts, span })
    }

    /// Branches of a pattern decorator: `<pattern> : (<cmd> | { … })`.
    fn parse_pattern_branches(&mut self) -> Result<Vec<PatternBranch>, ParseError> {
        let mut branches = Vec::new();
        loop {
            self.skip_trivia();
            if self.check(TokenKind::RBrace) || self.at_end() {
                break;
            }

            let label = self.consume(TokenKind::Identifier, "pattern identifier")?;
            let pattern = if label.text == "default" {
                Pattern::Wildcard
            } else {
                Pattern::Identifier(label.text.clone())
            };
            self.consume(TokenKind::Colon, "':' after pattern")?;

            let commands = if self.check(TokenKind::LBrace) {
                self.advance();
                let items = self.parse_block_items()?;
                self.consume(TokenKind::RBrace, "'}' to close pattern branch block")?;
                items
            } else {
                match self.current().kind {
                    TokenKind::ShellText => {
                        let token = self.advance();
                        vec![CommandContent::Shell(self.shell_content_from(&token))]
                    }
                    TokenKind::At => {
                        let call = self.parse_decorator_call()?;
                        vec![self.finish_decorator_item(call)?]
                    }
                    _ => Vec::new(), // empty branch
                }
            };

            branches.push(PatternBranch {
                pattern,
                commands,
                span: label.span.merge(self.prev_span()),
            });
        }
        Ok(branches)
    }

    // --- decorators ---

    /// Parse `@name` plus an optional argument list, classify it through
    /// the registry, bind positional arguments to schema names, and run
    /// the decorator's validation.
    fn parse_decorator_call(&mut self) -> Result<DecoCall, ParseError> {
        let at = self.consume(TokenKind::At, "'@'")?;
        let name_tok = self.consume(TokenKind::Identifier, "decorator name after '@'")?;
        let name = name_tok.text.to_lowercase();

        let Some(kind) = registry::global().lookup(&name) else {
            return Err(ParseError::UnknownDecorator {
                name,
                span: at.span.merge(name_tok.span),
            });
        };

        let schema = kind.common().parameter_schema();
        let mut args = Vec::new();
        if self.check(TokenKind::LParen) {
            self.advance();
            args = self.parse_parameter_list(schema)?;
            self.consume(TokenKind::RParen, "')' after decorator arguments")?;
        }

        let span = at.span.merge(self.prev_span());
        kind.common()
            .validate(&args)
            .map_err(|inner| ParseError::Schema { inner, span })?;

        let end_line = if self.pos > 0 {
            self.tokens[self.pos - 1].line
        } else {
            at.line
        };
        Ok(DecoCall {
            name,
            args,
            kind,
            span,
            end_line,
        })
    }

    /// `( (arg | name = arg) (, …)* )` with positional binding.
    fn parse_parameter_list(
        &mut self,
        schema: &[ParameterSchema],
    ) -> Result<Vec<NamedParam>, ParseError> {
        let mut params = Vec::new();
        if self.check(TokenKind::RParen) {
            return Ok(params);
        }

        let mut positional = 0usize;
        loop {
            params.push(self.parse_parameter(schema, &mut positional)?);
            if self.check(TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        Ok(params)
    }

    fn parse_parameter(
        &mut self,
        schema: &[ParameterSchema],
        positional: &mut usize,
    ) -> Result<NamedParam, ParseError> {
        if self.check(TokenKind::Identifier)
            && self.peek_next().map(|t| t.kind) == Some(TokenKind::Equals)
        {
            let name = self.advance();
            self.advance(); // '='
            let value = self.parse_value()?;
            return Ok(NamedParam::named(name.text, value));
        }

        let value = self.parse_value()?;
        let name = schema
            .get(*positional)
            .map(|s| s.name.to_string())
            .unwrap_or_else(|| format!("arg{positional}"));
        *positional += 1;
        Ok(NamedParam::positional(name, value))
    }

    /// A literal or identifier in argument position.
    fn parse_value(&mut self) -> Result<Expr, ParseError> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::String => {
                self.advance();
                Ok(Expr::Str(token.text))
            }
            TokenKind::Number => {
                self.advance();
                Ok(Expr::Number(token.text))
            }
            TokenKind::Duration => {
                self.advance();
                Ok(Expr::Duration(token.text))
            }
            TokenKind::Boolean => {
                self.advance();
                Ok(Expr::Bool(token.text == "true"))
            }
            TokenKind::Identifier => {
                self.advance();
                Ok(Expr::Ident(token.text))
            }
            _ => Err(self.unexpected("a value (string, number, duration, boolean, or identifier)")),
        }
    }

    // --- inline decorator extraction ---

    fn shell_content_from(&self, token: &Token) -> ShellContent {
        ShellContent {
            parts: self.extract_inline_parts(token),
            span: token.span,
        }
    }

    /// Rescan shell text for `@name(…)` where `name` is a registered
    /// value or action decorator. Valid matches split the text; unknown
    /// or ill-formed candidates stay plain text.
    fn extract_inline_parts(&self, token: &Token) -> Vec<ShellPart> {
        let text = token.text.as_str();
        let base = token.span.start + (token.raw.len() - token.raw.trim_start().len());

        let mut parts = Vec::new();
        let mut text_start = 0;
        let mut i = 0;

        while i < text.len() {
            let Some(at_off) = text[i..].find('@') else {
                break;
            };
            let at_pos = i + at_off;

            match try_extract_decorator(text, at_pos, base) {
                Some((decorator, end)) => {
                    if at_pos > text_start {
                        parts.push(ShellPart::Text(text[text_start..at_pos].to_string()));
                    }
                    parts.push(ShellPart::Decorator(decorator));
                    text_start = end;
                    i = end;
                }
                None => {
                    i = at_pos + 1;
                }
            }
        }

        if text_start < text.len() {
            parts.push(ShellPart::Text(text[text_start..].to_string()));
        }
        parts
    }
}

/// Try to extract a function decorator starting at `@`.
///
/// Returns the decorator and the byte offset just past its closing `)`.
fn try_extract_decorator(
    text: &str,
    at_pos: usize,
    span_base: usize,
) -> Option<(FunctionDecorator, usize)> {
    let after_at = &text[at_pos + 1..];
    let mut name_len = 0;
    for (i, c) in after_at.char_indices() {
        let valid = if i == 0 {
            c.is_ascii_alphabetic()
        } else {
            c.is_ascii_alphanumeric() || c == '_' || c == '-'
        };
        if valid {
            name_len = i + c.len_utf8();
        } else {
            break;
        }
    }
    if name_len == 0 {
        return None;
    }
    let name = &after_at[..name_len];

    // Only registered value/action decorators extract; anything else is
    // plain shell text (e.g. user@host).
    let kind = registry::global().lookup(name)?;
    if !kind.is_function() {
        return None;
    }

    let open = at_pos + 1 + name_len;
    if text[open..].chars().next() != Some('(') {
        return None;
    }

    // Balanced-paren scan, respecting quotes.
    let arg_start = open + 1;
    let mut depth = 1;
    let mut quote: Option<char> = None;
    let mut arg_end = None;
    let mut iter = text[arg_start..].char_indices();
    while let Some((i, c)) = iter.next() {
        match quote {
            Some(q) => {
                if c == '\\' {
                    iter.next();
                } else if c == q {
                    quote = None;
                }
            }
            None => match c {
                '"' | '\'' | '`' => quote = Some(c),
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        arg_end = Some(arg_start + i);
                        break;
                    }
                }
                _ => {}
            },
        }
    }
    let arg_end = arg_end?;

    let schema = kind.common().parameter_schema();
    let args = parse_inline_args(&text[arg_start..arg_end], schema)?;

    let decorator = FunctionDecorator {
        name: name.to_string(),
        args,
        span: Span::new(span_base + at_pos, span_base + arg_end + 1),
    };
    kind.common().validate(&decorator.args).ok()?;
    Some((decorator, arg_end + 1))
}

/// Parse the argument text of an inline decorator call.
///
/// Supports positional and `name = value` arguments with the same literal
/// kinds as structural argument lists. Returns `None` when any piece is
/// ill-formed (the candidate then stays plain text).
fn parse_inline_args(arg_text: &str, schema: &[ParameterSchema]) -> Option<Vec<NamedParam>> {
    let mut args = Vec::new();
    if arg_text.trim().is_empty() {
        return Some(args);
    }

    let mut positional = 0usize;
    for piece in split_top_level(arg_text) {
        let piece = piece.trim();
        if piece.is_empty() {
            return None;
        }

        // Named form: `ident = value` (but not inside a quoted value).
        if let Some(eq) = piece.find('=') {
            let (left, right) = piece.split_at(eq);
            let name = left.trim();
            if !name.is_empty()
                && name.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
                && name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            {
                let value = parse_inline_value(right[1..].trim())?;
                args.push(NamedParam::named(name, value));
                continue;
            }
        }

        let value = parse_inline_value(piece)?;
        let name = schema
            .get(positional)
            .map(|s| s.name.to_string())
            .unwrap_or_else(|| format!("arg{positional}"));
        positional += 1;
        args.push(NamedParam::positional(name, value));
    }
    Some(args)
}

/// Split on top-level commas, respecting quotes and nested parens.
fn split_top_level(s: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut depth = 0;
    let mut quote: Option<char> = None;
    let mut iter = s.char_indices();
    while let Some((i, c)) = iter.next() {
        match quote {
            Some(q) => {
                if c == '\\' {
                    iter.next();
                } else if c == q {
                    quote = None;
                }
            }
            None => match c {
                '"' | '\'' | '`' => quote = Some(c),
                '(' => depth += 1,
                ')' => depth -= 1,
                ',' if depth == 0 => {
                    pieces.push(&s[start..i]);
                    start = i + 1;
                }
                _ => {}
            },
        }
    }
    pieces.push(&s[start..]);
    pieces
}

/// Parse a single inline argument value.
fn parse_inline_value(piece: &str) -> Option<Expr> {
    if piece.len() >= 2 {
        let first = piece.chars().next()?;
        if matches!(first, '"' | '\'' | '`') && piece.ends_with(first) {
            let inner = &piece[first.len_utf8()..piece.len() - first.len_utf8()];
            let unescaped = inner.replace("\\\"", "\"").replace("\\\\", "\\");
            return Some(Expr::Str(unescaped));
        }
    }

    if piece == "true" {
        return Some(Expr::Bool(true));
    }
    if piece == "false" {
        return Some(Expr::Bool(false));
    }

    let digits_end = piece
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(piece.len());
    if digits_end > 0 {
        let suffix = &piece[digits_end..];
        if suffix.is_empty() {
            return Some(Expr::Number(piece.to_string()));
        }
        if matches!(suffix, "ns" | "us" | "ms" | "s" | "m" | "h") {
            return Some(Expr::Duration(piece.to_string()));
        }
        return None;
    }

    let mut chars = piece.chars();
    if chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && piece
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Some(Expr::Ident(piece.to_string()));
    }
    None
}

#[cfg(test)]
#[path = "parser_tests/mod.rs"]
mod tests;
