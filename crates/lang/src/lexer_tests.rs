// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lexer tests, with a focus on the bracket structures that must survive
//! inside shell text.

use super::*;
use devcmd_core::token::TokenKind;

fn kinds_and_texts(input: &str) -> Vec<(TokenKind, std::string::String)> {
    Lexer::tokenize(input)
        .unwrap()
        .into_iter()
        .map(|t| (t.kind, t.text))
        .collect()
}

fn assert_tokens(input: &str, expected: &[(TokenKind, &str)]) {
    let actual = kinds_and_texts(input);
    let expected: Vec<(TokenKind, std::string::String)> = expected
        .iter()
        .map(|(k, t)| (*k, t.to_string()))
        .collect();
    assert_eq!(actual, expected, "token mismatch for input: {input}");
}

use TokenKind::*;

#[test]
fn simple_command() {
    assert_tokens(
        "build: echo hi",
        &[
            (Identifier, "build"),
            (Colon, ":"),
            (ShellText, "echo hi"),
            (Eof, ""),
        ],
    );
}

#[test]
fn parameter_expansion() {
    assert_tokens(
        "test: echo ${VAR}",
        &[
            (Identifier, "test"),
            (Colon, ":"),
            (ShellText, "echo ${VAR}"),
            (Eof, ""),
        ],
    );
}

#[test]
fn parameter_expansion_with_default() {
    assert_tokens(
        "test: echo ${VAR:-default}",
        &[
            (Identifier, "test"),
            (Colon, ":"),
            (ShellText, "echo ${VAR:-default}"),
            (Eof, ""),
        ],
    );
}

#[test]
fn nested_parameter_expansion() {
    assert_tokens(
        "test: echo ${VAR:-${DEFAULT}}",
        &[
            (Identifier, "test"),
            (Colon, ":"),
            (ShellText, "echo ${VAR:-${DEFAULT}}"),
            (Eof, ""),
        ],
    );
}

#[test]
fn command_substitution_with_braces() {
    assert_tokens(
        r#"test: echo $(find . -name "*.go" -exec ls {} +)"#,
        &[
            (Identifier, "test"),
            (Colon, ":"),
            (ShellText, r#"echo $(find . -name "*.go" -exec ls {} +)"#),
            (Eof, ""),
        ],
    );
}

#[test]
fn mixed_expansion_and_substitution() {
    assert_tokens(
        "test: echo ${VAR:-$(date +%Y)}",
        &[
            (Identifier, "test"),
            (Colon, ":"),
            (ShellText, "echo ${VAR:-$(date +%Y)}"),
            (Eof, ""),
        ],
    );
}

#[test]
fn inline_decorator_stays_raw_in_expansion() {
    assert_tokens(
        "test: echo ${@var(VAR):-default}",
        &[
            (Identifier, "test"),
            (Colon, ":"),
            (ShellText, "echo ${@var(VAR):-default}"),
            (Eof, ""),
        ],
    );
}

#[test]
fn array_syntax() {
    assert_tokens(
        "test: echo ${ARRAY[0]}",
        &[
            (Identifier, "test"),
            (Colon, ":"),
            (ShellText, "echo ${ARRAY[0]}"),
            (Eof, ""),
        ],
    );
}

#[test]
fn brace_expansion() {
    assert_tokens(
        "test: echo {a,b,c}",
        &[
            (Identifier, "test"),
            (Colon, ":"),
            (ShellText, "echo {a,b,c}"),
            (Eof, ""),
        ],
    );
}

#[test]
fn find_exec_with_escaped_semicolon() {
    assert_tokens(
        r#"test: find . -name "*.txt" -exec rm {} \;"#,
        &[
            (Identifier, "test"),
            (Colon, ":"),
            (ShellText, r#"find . -name "*.txt" -exec rm {} \;"#),
            (Eof, ""),
        ],
    );
}

#[test]
fn for_loop_keeps_semicolons() {
    assert_tokens(
        r#"test: for f in $(find . -name "*.go"); do echo ${f%.go}.bin; done"#,
        &[
            (Identifier, "test"),
            (Colon, ":"),
            (
                ShellText,
                r#"for f in $(find . -name "*.go"); do echo ${f%.go}.bin; done"#,
            ),
            (Eof, ""),
        ],
    );
}

#[test]
fn block_with_shell_brackets_inside() {
    assert_tokens(
        "test: {\n    echo ${VAR:-default}\n    find . -exec ls {} +\n}",
        &[
            (Identifier, "test"),
            (Colon, ":"),
            (LBrace, "{"),
            (ShellText, "echo ${VAR:-default}"),
            (ShellText, "find . -exec ls {} +"),
            (RBrace, "}"),
            (Eof, ""),
        ],
    );
}

#[test]
fn decorator_with_block() {
    assert_tokens(
        "test: @timeout(30s) {\n    rsync -av ${SRC}/ ${DEST}/\n}",
        &[
            (Identifier, "test"),
            (Colon, ":"),
            (At, "@"),
            (Identifier, "timeout"),
            (LParen, "("),
            (Duration, "30s"),
            (RParen, ")"),
            (LBrace, "{"),
            (ShellText, "rsync -av ${SRC}/ ${DEST}/"),
            (RBrace, "}"),
            (Eof, ""),
        ],
    );
}

#[test]
fn variable_declarations() {
    assert_tokens(
        "var SRC = \"./src\"",
        &[
            (Var, "var"),
            (Identifier, "SRC"),
            (Equals, "="),
            (String, "./src"),
            (Eof, ""),
        ],
    );
    assert_tokens(
        "var PORT = 8080",
        &[
            (Var, "var"),
            (Identifier, "PORT"),
            (Equals, "="),
            (Number, "8080"),
            (Eof, ""),
        ],
    );
    assert_tokens(
        "var T = 500ms",
        &[
            (Var, "var"),
            (Identifier, "T"),
            (Equals, "="),
            (Duration, "500ms"),
            (Eof, ""),
        ],
    );
    assert_tokens(
        "var ON = true",
        &[
            (Var, "var"),
            (Identifier, "ON"),
            (Equals, "="),
            (Boolean, "true"),
            (Eof, ""),
        ],
    );
}

#[test]
fn var_group() {
    assert_tokens(
        "var (\n    A = 1\n    B = \"x\"\n)",
        &[
            (Var, "var"),
            (LParen, "("),
            (Identifier, "A"),
            (Equals, "="),
            (Number, "1"),
            (Identifier, "B"),
            (Equals, "="),
            (String, "x"),
            (RParen, ")"),
            (Eof, ""),
        ],
    );
}

#[test]
fn watch_and_stop_keywords() {
    assert_tokens(
        "watch server: node app.js",
        &[
            (Watch, "watch"),
            (Identifier, "server"),
            (Colon, ":"),
            (ShellText, "node app.js"),
            (Eof, ""),
        ],
    );
    assert_tokens(
        "stop server: npm run stop",
        &[
            (Stop, "stop"),
            (Identifier, "server"),
            (Colon, ":"),
            (ShellText, "npm run stop"),
            (Eof, ""),
        ],
    );
}

#[test]
fn pattern_branch_labels() {
    assert_tokens(
        "safe: @try { main: run; catch: cleanup }",
        &[
            (Identifier, "safe"),
            (Colon, ":"),
            (At, "@"),
            (Identifier, "try"),
            (LBrace, "{"),
            (Identifier, "main"),
            (Colon, ":"),
            (ShellText, "run"),
            (Identifier, "catch"),
            (Colon, ":"),
            (ShellText, "cleanup"),
            (RBrace, "}"),
            (Eof, ""),
        ],
    );
}

#[test]
fn semicolon_separates_sibling_decorator_blocks() {
    assert_tokens(
        r#"par: @parallel { @workdir("a"){ pwd }; @workdir("b"){ pwd } }"#,
        &[
            (Identifier, "par"),
            (Colon, ":"),
            (At, "@"),
            (Identifier, "parallel"),
            (LBrace, "{"),
            (At, "@"),
            (Identifier, "workdir"),
            (LParen, "("),
            (String, "a"),
            (RParen, ")"),
            (LBrace, "{"),
            (ShellText, "pwd"),
            (RBrace, "}"),
            (At, "@"),
            (Identifier, "workdir"),
            (LParen, "("),
            (String, "b"),
            (RParen, ")"),
            (LBrace, "{"),
            (ShellText, "pwd"),
            (RBrace, "}"),
            (RBrace, "}"),
            (Eof, ""),
        ],
    );
}

#[test]
fn comments() {
    assert_tokens(
        "// heading\nbuild: echo hi",
        &[
            (Comment, "heading"),
            (Identifier, "build"),
            (Colon, ":"),
            (ShellText, "echo hi"),
            (Eof, ""),
        ],
    );
    assert_tokens(
        "/* multi\nline */\nbuild: echo hi",
        &[
            (MultilineComment, "multi\nline"),
            (Identifier, "build"),
            (Colon, ":"),
            (ShellText, "echo hi"),
            (Eof, ""),
        ],
    );
}

#[test]
fn quoted_strings_in_shell_text() {
    assert_tokens(
        r#"msg: echo "He said \"Hello\" to everyone""#,
        &[
            (Identifier, "msg"),
            (Colon, ":"),
            (ShellText, r#"echo "He said \"Hello\" to everyone""#),
            (Eof, ""),
        ],
    );
}

#[test]
fn unterminated_quote_is_an_error() {
    let err = Lexer::tokenize("build: echo 'oops").unwrap_err();
    assert!(matches!(err, LexerError::UnterminatedQuote { .. }));
}

#[test]
fn unterminated_expansion_is_an_error() {
    let err = Lexer::tokenize("build: echo ${VAR").unwrap_err();
    assert!(matches!(err, LexerError::UnbalancedBracket { .. }));
}

#[test]
fn invalid_duration_suffix_is_an_error() {
    let err = Lexer::tokenize("var T = 30d").unwrap_err();
    assert!(matches!(err, LexerError::InvalidNumber { .. }));
}

#[test]
fn tokens_carry_positions() {
    let tokens = Lexer::tokenize("var A = 1\nbuild: echo hi").unwrap();
    let build = tokens
        .iter()
        .find(|t| t.kind == TokenKind::Identifier && t.text == "build")
        .unwrap();
    assert_eq!(build.line, 2);
    assert_eq!(build.column, 1);
    let shell = tokens
        .iter()
        .find(|t| t.kind == TokenKind::ShellText)
        .unwrap();
    assert_eq!(shell.line, 2);
    assert_eq!(shell.raw, "echo hi");
}
