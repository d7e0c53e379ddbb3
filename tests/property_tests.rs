// tests/property_tests.rs

use molang_lang::ast::{BinOp, Expr, UnaryOp};
use molang_lang::parser::parse;
use molang_lang::{Engine, ReturnKind, Value};
use proptest::prelude::*;

const KEYWORDS: &[&str] = &["true", "false", "break", "continue", "return"];

fn arb_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,6}".prop_filter("keywords are not identifiers", |s| {
        !KEYWORDS.contains(&s.as_str())
    })
}

fn arb_leaf() -> impl Strategy<Value = Expr> {
    prop_oneof![
        (0u32..10_000).prop_map(|n| Expr::Number(n as f64 / 100.0)),
        "[a-z ]{0,8}".prop_map(Expr::String),
        arb_name().prop_map(Expr::Identifier),
    ]
}

fn arb_binop() -> impl Strategy<Value = BinOp> {
    prop::sample::select(vec![
        BinOp::And,
        BinOp::Or,
        BinOp::Lt,
        BinOp::Lte,
        BinOp::Gt,
        BinOp::Gte,
        BinOp::Eq,
        BinOp::Neq,
        BinOp::Add,
        BinOp::Sub,
        BinOp::Mul,
        BinOp::Div,
    ])
}

// Negation is deliberately absent: `-5` re-folds into the literal, so a
// `Unary` negation node over a number would not survive a round-trip.
fn arb_expr() -> impl Strategy<Value = Expr> {
    arb_leaf().prop_recursive(4, 24, 3, |inner| {
        prop_oneof![
            (inner.clone(), arb_name()).prop_map(|(object, property)| Expr::Access {
                object: Box::new(object),
                property,
            }),
            (inner.clone(), inner.clone()).prop_map(|(object, index)| Expr::ArrayAccess {
                object: Box::new(object),
                index: Box::new(index),
            }),
            (inner.clone(), inner.clone()).prop_map(|(object, body)| Expr::Arrow {
                object: Box::new(object),
                body: Box::new(body),
            }),
            (arb_name(), prop::collection::vec(inner.clone(), 0..3)).prop_map(
                |(name, arguments)| Expr::Call {
                    function: Box::new(Expr::Identifier(name)),
                    arguments,
                }
            ),
            (arb_binop(), inner.clone(), inner.clone()).prop_map(|(op, left, right)| {
                Expr::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                }
            }),
            inner.clone().prop_map(|operand| Expr::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
            }),
            (inner.clone(), inner.clone(), inner.clone()).prop_map(
                |(condition, if_true, if_false)| Expr::Ternary {
                    condition: Box::new(condition),
                    if_true: Box::new(if_true),
                    if_false: Box::new(if_false),
                }
            ),
            (inner.clone(), inner.clone()).prop_map(|(condition, if_true)| Expr::Conditional {
                condition: Box::new(condition),
                if_true: Box::new(if_true),
            }),
            (inner.clone(), inner.clone()).prop_map(|(value, fallback)| Expr::NullCoalesce {
                value: Box::new(value),
                fallback: Box::new(fallback),
            }),
            prop::collection::vec(inner.clone(), 1..3).prop_map(Expr::Scope),
        ]
    })
}

proptest! {
    /// Parsing is total over arbitrary input: it errs, it never panics.
    #[test]
    fn parse_never_panics(input in "\\PC*") {
        let _ = parse(&input);
    }

    /// Rendering a tree and reparsing the text yields the same tree; the
    /// renderer inserts parentheses exactly where precedence needs them.
    #[test]
    fn render_reparse_is_identity(expr in arb_expr()) {
        let rendered = expr.to_string();
        let reparsed = parse(&rendered);
        prop_assert!(reparsed.is_ok(), "rendered form failed to parse: {:?}", rendered);
        let reparsed = reparsed.unwrap();
        prop_assert_eq!(reparsed.len(), 1, "rendered as {:?}", rendered);
        prop_assert_eq!(&reparsed[0], &expr, "rendered as {:?}", rendered);
    }

    /// Number literals survive lex, parse and eval exactly.
    #[test]
    fn number_literals_round_trip(value in -1.0e6..1.0e6f64) {
        let engine = Engine::new();
        let source = format!("{}", value);
        prop_assert_eq!(engine.eval(&source), value);
    }

    /// Multiplication binds before addition for any operand values.
    #[test]
    fn precedence_holds_numerically(a in -100i32..100, b in -100i32..100, c in -100i32..100) {
        let engine = Engine::new();
        let source = format!("{} + {} * {}", a, b, c);
        prop_assert_eq!(engine.eval(&source), f64::from(a) + f64::from(b) * f64::from(c));
    }

    /// A compiled function agrees with evaluating the same source against
    /// scope bindings of the same names.
    #[test]
    fn specialization_is_equivalent(a in -100i32..100, b in -100i32..100) {
        let engine = Engine::new();
        let source = "a * 3 + math.max(a, b) - b";
        let compiled = engine.compile(source, &["a", "b"], ReturnKind::Number).unwrap();
        let (a, b) = (f64::from(a), f64::from(b));
        let direct = engine.eval_with_bindings(
            source,
            &[("a", Value::number(a)), ("b", Value::number(b))],
        );
        prop_assert_eq!(compiled.call_numbers(&[a, b]), direct.as_number());
    }
}
