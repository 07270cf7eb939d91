// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::value::Expr;

fn inline(name: &str, arg: NamedParam) -> FunctionDecorator {
    FunctionDecorator {
        name: name.to_string(),
        args: vec![arg],
        span: Span::new(3, 12),
    }
}

#[test]
fn recompose_round_trips_mixed_parts() {
    let shell = ShellContent {
        parts: vec![
            ShellPart::Text("cp ".into()),
            ShellPart::Decorator(inline(
                "var",
                NamedParam::positional("name", Expr::Ident("SRC".into())),
            )),
            ShellPart::Text("/*.go dst/".into()),
        ],
        span: Span::default(),
    };
    assert_eq!(shell.recompose(), "cp @var(SRC)/*.go dst/");
}

#[test]
fn recompose_renders_string_args_quoted() {
    let shell = ShellContent {
        parts: vec![
            ShellPart::Text("kubectl use ".into()),
            ShellPart::Decorator(inline(
                "env",
                NamedParam::positional("key", Expr::Str("KUBE".into())),
            )),
        ],
        span: Span::default(),
    };
    assert_eq!(shell.recompose(), "kubectl use @env(\"KUBE\")");
}

#[test]
fn normalized_ignores_positions() {
    let mk = |offset: usize| Program {
        variables: vec![VarDecl {
            name: "SRC".into(),
            value: Expr::Str("./src".into()),
            span: Span::new(offset, offset + 5),
        }],
        var_groups: vec![],
        commands: vec![CommandDecl {
            name: "build".into(),
            kind: CommandKind::Regular,
            body: CommandBody {
                content: vec![CommandContent::Shell(ShellContent {
                    parts: vec![ShellPart::Text("make".into())],
                    span: Span::new(offset, offset + 4),
                })],
                braced: false,
                span: Span::new(offset, offset + 4),
            },
            span: Span::new(offset, offset + 10),
        }],
    };

    assert_ne!(mk(0), mk(7));
    assert_eq!(mk(0).normalized(), mk(7).normalized());
}

#[test]
fn pattern_branch_lookup() {
    let deco = PatternDecorator {
        name: "when".into(),
        args: vec![],
        branches: vec![
            PatternBranch {
                pattern: Pattern::Identifier("prod".into()),
                commands: vec![],
                span: Span::default(),
            },
            PatternBranch {
                pattern: Pattern::Wildcard,
                commands: vec![],
                span: Span::default(),
            },
        ],
        span: Span::default(),
    };

    assert!(deco.branch("prod").is_some());
    assert!(deco.branch("staging").is_none());
    assert!(deco.wildcard().is_some());
    assert_eq!(deco.wildcard().unwrap().pattern.name(), "default");
}

#[test]
fn param_helpers_with_defaults() {
    let params = vec![
        NamedParam::named("message", Expr::Str("Deploy?".into())),
        NamedParam::named("defaultYes", Expr::Bool(true)),
    ];

    assert_eq!(string_param(&params, "message", "fallback"), "Deploy?");
    assert_eq!(string_param(&params, "missing", "fallback"), "fallback");
    assert!(bool_param(&params, "defaultYes", false));
    assert!(bool_param(&params, "abortOnNo", true));
}

#[test]
fn command_lookup_respects_kind() {
    let program = Program {
        variables: vec![],
        var_groups: vec![],
        commands: vec![
            CommandDecl {
                name: "server".into(),
                kind: CommandKind::Watch,
                body: CommandBody {
                    content: vec![],
                    braced: false,
                    span: Span::default(),
                },
                span: Span::default(),
            },
            CommandDecl {
                name: "server".into(),
                kind: CommandKind::Stop,
                body: CommandBody {
                    content: vec![],
                    braced: false,
                    span: Span::default(),
                },
                span: Span::default(),
            },
        ],
    };

    assert!(program.command("server", CommandKind::Watch).is_some());
    assert!(program.command("server", CommandKind::Stop).is_some());
    assert!(program.command("server", CommandKind::Regular).is_none());
}
