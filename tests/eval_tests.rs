// tests/eval_tests.rs

use molang_lang::{Engine, MutableBinding, ObjectBinding, Value, function};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

// ============================================================================
// Arithmetic and coercion
// ============================================================================

#[test]
fn test_math_pipeline() {
    let engine = Engine::new();
    assert_eq!(engine.eval("math.sqrt(3 * 3 + 4 * 4)"), 5.0);
    assert_eq!(engine.eval("math.clamp(15, 0, 10)"), 10.0);
    assert_eq!(engine.eval("math.lerp(0, 10, 0.25)"), 2.5);
}

#[test]
fn test_temp_cubic() {
    let engine = Engine::new();
    let result = engine.eval("temp.x = 3; return temp.x * temp.x * temp.x;");
    assert_eq!(result, 27.0);
}

#[test]
fn test_division_by_zero_is_zero() {
    let engine = Engine::new();
    assert_eq!(engine.eval("5 / 0"), 0.0);
    assert_eq!(engine.eval("math.mod(5, 0)"), 0.0);
    assert_eq!(engine.eval("math.sqrt(-1)"), 0.0);
}

#[test]
fn test_string_concatenation() {
    let engine = Engine::new();
    assert_eq!(engine.eval_value("'level ' + 3"), Value::string("level 3"));
    assert_eq!(engine.eval_value("1 + '2'"), Value::string("12"));
    assert_eq!(engine.eval("1 + 2"), 3.0);
}

#[test]
fn test_non_numbers_are_zero_in_arithmetic() {
    let engine = Engine::new();
    // strings, objects and functions have no numeric value
    assert_eq!(engine.eval("'hi' * 2"), 0.0);
    assert_eq!(engine.eval("'5' - 3"), -3.0);
    assert_eq!(engine.eval("q * 2"), 0.0);
    assert_eq!(engine.eval("'a' < 1"), 1.0);
    assert_eq!(engine.eval("math + 1"), 1.0);
}

#[test]
fn test_equality() {
    let engine = Engine::new();
    assert_eq!(engine.eval("'a' == 'a'"), 1.0);
    assert_eq!(engine.eval("'a' != 'b'"), 1.0);
    assert_eq!(engine.eval("2 == 2.0"), 1.0);
    assert_eq!(engine.eval("true == 1"), 1.0);
}

#[test]
fn test_truthiness() {
    let engine = Engine::new();
    assert_eq!(engine.eval("'hello' ? 3 : 4"), 3.0);
    assert_eq!(engine.eval("'' ? 3 : 4"), 4.0);
    assert_eq!(engine.eval("!0"), 1.0);
    assert_eq!(engine.eval("-(2 + 3)"), -5.0);
    // binary conditional with a false condition is zero
    assert_eq!(engine.eval("0 ? 42"), 0.0);
}

// ============================================================================
// Namespaces and bindings
// ============================================================================

#[test]
fn test_variable_persists_across_evaluations() {
    let engine = Engine::new();
    assert_close(engine.eval("variable.x = (variable.x ?? 1.2) + 0.3;"), 1.5);
    assert_close(engine.eval("variable.x = (variable.x ?? 1.2) + 0.3;"), 1.8);
    assert_close(engine.eval("v.x"), 1.8);
}

#[test]
fn test_temp_is_fresh_per_evaluation() {
    let engine = Engine::new();
    assert_eq!(engine.eval("temp.a = 5; return temp.a;"), 5.0);
    assert_eq!(engine.eval("temp.a ?? -1"), -1.0);
}

#[test]
fn test_null_coalesce_only_replaces_absent() {
    let engine = Engine::new();
    assert_eq!(engine.eval("0 ?? 5"), 0.0);
    assert_eq!(engine.eval("undefined_var ?? 5"), 5.0);
    assert_eq!(engine.eval("variable.undefined ?? 5"), 5.0);
    assert_eq!(engine.eval("false ?? 5"), 0.0);
}

#[test]
fn test_case_insensitive_lookup() {
    let engine = Engine::new();
    assert_close(engine.eval("MATH.PI"), std::f64::consts::PI);
    assert_eq!(engine.eval("Variable.Test = 5; return VARIABLE.TEST;"), 5.0);
    assert_eq!(engine.eval("v.test"), 5.0);
}

#[test]
fn test_missing_lookups_degrade() {
    let engine = Engine::new();
    assert_eq!(engine.eval("q.nope"), 0.0);
    assert_eq!(engine.eval("q.nope(1, 2)"), 0.0);
    assert_eq!(engine.eval("q.nope.deeper"), 0.0);
    // looking up the same missing name twice is still absent, not created
    assert_eq!(engine.eval("v.ghost ?? 1"), 1.0);
    assert_eq!(engine.eval("v.ghost ?? 1"), 1.0);
}

#[test]
fn test_eval_with_bindings() {
    let engine = Engine::new();
    let result = engine.eval_with_bindings("x * 2 + 1", &[("x", Value::Number(20.5))]);
    assert_eq!(result, Value::Number(42.0));
}

#[test]
fn test_host_query_function() {
    let engine = Engine::new();
    engine
        .bind_query("double", function(|ctx, args| {
            let value = args.first().map(|a| ctx.eval_number(a)).unwrap_or(0.0);
            Value::number(value * 2.0)
        }))
        .unwrap();
    assert_eq!(engine.eval("q.double(21)"), 42.0);
    assert_eq!(engine.eval("query.double(4) + 1"), 9.0);
}

#[test]
fn test_duplicate_binding_rejected() {
    let engine = Engine::new();
    engine.bind_variable("speed", Value::Number(1.0)).unwrap();
    assert!(engine.bind_variable("Speed", Value::Number(2.0)).is_err());
}

// ============================================================================
// Arrays
// ============================================================================

#[test]
fn test_array_indexing() {
    let engine = Engine::new();
    engine
        .bind_query(
            "arr",
            Value::Array(vec![
                Value::Number(10.0),
                Value::Number(20.0),
                Value::Number(30.0),
            ]),
        )
        .unwrap();
    assert_eq!(engine.eval("q.arr[1]"), 20.0);
    assert_eq!(engine.eval("q.arr[1.4]"), 20.0);
    assert_eq!(engine.eval("q.arr[9] ?? -1"), -1.0);
    assert_eq!(engine.eval("q.arr[-1] ?? -1"), -1.0);
}

// ============================================================================
// Loops and control flow
// ============================================================================

#[test]
fn test_loop_fibonacci() {
    let engine = Engine::new();
    let source = "v.a = 1; v.b = 1; \
                  loop(8, {t.c = v.a + v.b; v.a = v.b; v.b = t.c;}); \
                  return v.b;";
    assert_eq!(engine.eval(source), 55.0);
}

#[test]
fn test_loop_break() {
    let engine = Engine::new();
    let source = "v.i = 0; loop(10, {v.i = v.i + 1; (v.i >= 3) ? break;}); return v.i;";
    assert_eq!(engine.eval(source), 3.0);
}

#[test]
fn test_loop_continue() {
    let engine = Engine::new();
    let source = "v.n = 0; loop(5, {continue; v.n = v.n + 1;}); return v.n;";
    assert_eq!(engine.eval(source), 0.0);
}

#[test]
fn test_return_stops_loop() {
    let engine = Engine::new();
    assert_eq!(engine.eval("loop(10, {return 42;});"), 42.0);
}

#[test]
fn test_for_each_sum() {
    let engine = Engine::new();
    engine
        .bind_query(
            "numbers",
            Value::Array(vec![
                Value::Number(5.0),
                Value::Number(10.0),
                Value::Number(83.0),
            ]),
        )
        .unwrap();
    let source = "v.total = 0; \
                  for_each(v.e, q.numbers, {v.total = v.total + v.e;}); \
                  return v.total;";
    assert_eq!(engine.eval(source), 98.0);
}

#[test]
fn test_scope_yields_last_statement() {
    let engine = Engine::new();
    assert_eq!(engine.eval("{1; 2; 3}"), 3.0);
    assert_eq!(engine.eval("{}"), 0.0);
}

// ============================================================================
// Arrow operator
// ============================================================================

#[test]
fn test_arrow_switches_current_object() {
    let engine = Engine::new();

    let creeper = MutableBinding::new();
    creeper.set("name", Value::string("creeper"));
    engine.bind_query("self", Value::object(creeper)).unwrap();

    engine
        .bind_query("get_name", function(|ctx, _| {
            match ctx.current_object() {
                Some(Value::Object(entity)) => entity.get("name"),
                _ => Value::Nil,
            }
        }))
        .unwrap();

    assert_eq!(
        engine.eval_value("q.self->q.get_name()"),
        Value::string("creeper")
    );
    // without an arrow there is no current object
    assert_eq!(engine.eval_value("q.get_name()"), Value::Nil);
}

#[test]
fn test_arrow_assignment_writes_target_object() {
    let engine = Engine::new();
    let entity = Arc::new(MutableBinding::new());
    engine
        .bind_query("self", Value::Object(entity.clone()))
        .unwrap();
    engine.eval("q.self->v.marked = 7;");
    assert_eq!(entity.get("marked"), Value::Nil);
    // the arrow target only changes the current object, writes still go
    // through the property path on the right
    assert_eq!(engine.eval("v.marked"), 7.0);
}

#[test]
fn test_arrow_on_non_object_is_zero() {
    let engine = Engine::new();
    assert_eq!(engine.eval("q.missing->v.x"), 0.0);
    assert_eq!(engine.eval("5->v.x"), 0.0);
}

// ============================================================================
// Engine surface
// ============================================================================

#[test]
fn test_parse_errors_yield_zero_and_hit_handler() {
    let mut engine = Engine::new();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    engine.set_parse_error_handler(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    assert_eq!(engine.eval("1 +"), 0.0);
    assert_eq!(engine.eval("(1"), 0.0);
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[test]
fn test_prepared_function_reuses_parse() {
    let engine = Engine::new();
    let prepared = engine.prepare("v.k = (v.k ?? 0) + 1;").unwrap();
    assert_eq!(prepared.evaluate_number(), 1.0);
    assert_eq!(prepared.evaluate_number(), 2.0);
    assert!(engine.prepare("1 +").is_err());
}

#[test]
fn test_seeded_engines_replay() {
    let a = Engine::with_seed(42);
    let b = Engine::with_seed(42);
    let first = a.eval("math.random(0, 10)");
    assert!((0.0..10.0).contains(&first));
    assert_eq!(first, b.eval("math.random(0, 10)"));
    assert_eq!(
        a.eval("math.random_integer(1, 6)"),
        b.eval("math.random_integer(1, 6)")
    );
}

#[test]
fn test_die_roll_bounds() {
    let engine = Engine::with_seed(7);
    let total = engine.eval("math.die_roll(3, 1, 6)");
    assert!((3.0..=18.0).contains(&total));
    let total = engine.eval("math.die_roll_integer(2, 1, 6)");
    assert!((2.0..=12.0).contains(&total));
    assert_eq!(total.fract(), 0.0);
}
