//! Integration tests for the warning-lang pipeline
//!
//! Runs whole programs through scan, parse and evaluate and checks the
//! produced values and diagnostics.

use warnlang::ast::{Expr, Width};
use warnlang::interp::{Interpreter, Output, Scope};
use warnlang::types::Scalar;
use warnlang::{Diagnostic, PROGRAM_CONTEXT, Span};

/// Helper to run a program and expect success
fn run_ok(source: &str) -> Vec<Output> {
    warnlang::run("test.wl", source).expect("program should run")
}

/// Helper to run a program and expect a diagnostic
fn run_err(source: &str) -> Diagnostic {
    warnlang::run("test.wl", source).expect_err("program should fail")
}

/// Scalar of the last value the program produced
fn last(source: &str) -> Scalar {
    run_ok(source)
        .iter()
        .rev()
        .find_map(Output::last_value)
        .map(|v| v.scalar)
        .expect("program produced a value")
}

// ============================================
// Literals and ranges
// ============================================

#[test]
fn test_literal_defaults() {
    assert_eq!(last("5;"), Scalar::I64(5));
    assert_eq!(last("2.5;"), Scalar::F64(2.5));
}

#[test]
fn test_declared_widths_in_range() {
    let cases = [
        ("i8 x = 127; x;", Scalar::I8(127)),
        ("i16 x = 32767; x;", Scalar::I16(32767)),
        ("i32 x = 2147483647; x;", Scalar::I32(i32::MAX)),
        ("i64 x = 9223372036854775807; x;", Scalar::I64(i64::MAX)),
        ("u8 x = 255; x;", Scalar::U8(255)),
        ("u16 x = 65535; x;", Scalar::U16(u16::MAX)),
        ("u32 x = 4294967295; x;", Scalar::U32(u32::MAX)),
        ("u64 x = 18446744073709551615; x;", Scalar::U64(u64::MAX)),
        ("f32 x = 1.5; x;", Scalar::F32(1.5)),
        ("f64 x = 0.25; x;", Scalar::F64(0.25)),
    ];
    for (src, expected) in cases {
        assert_eq!(last(src), expected, "{src}");
    }
}

#[test]
fn test_declared_widths_out_of_range() {
    for src in [
        "i8 x = 128;",
        "i16 x = 32768;",
        "i32 x = 2147483648;",
        "i64 x = 9223372036854775808;",
        "u8 x = 256;",
        "u16 x = 65536;",
        "u32 x = 4294967296;",
        "u64 x = 18446744073709551616;",
    ] {
        let err = run_err(src);
        assert_eq!(err.category(), "Variable Size Error", "{src}");
    }
}

#[test]
fn test_oversized_literal_fails_where_evaluated() {
    let err = run_err("i64 a = 1;\nu64 x = 18446744073709551616;");
    assert_eq!(err.category(), "Variable Size Error");
    assert_eq!(err.message(), "`18446744073709551616` does not fit in `u64`");
    assert_eq!(err.span(), Span::new(19, 39));
}

#[test]
fn test_oversized_literal_in_skipped_branch() {
    assert_eq!(last("if false { 99999999999999999999; } 1;"), Scalar::I64(1));
}

#[test]
fn test_oversized_literal_fits_float_width() {
    assert_eq!(
        last("f64 x = 18446744073709551616; x;"),
        Scalar::F64(18446744073709551616.0)
    );
}

#[test]
fn test_out_of_range_points_at_literal() {
    let err = run_err("u8 x = 256;");
    assert_eq!(err.span(), Span::new(7, 10));
    assert_eq!(err.start.column, 8);
}

#[test]
fn test_float_literal_into_integer_width() {
    assert_eq!(last("i32 x = 2.7; x;"), Scalar::I32(2));
}

#[test]
fn test_literal_checked_and_cast_once_across_runs() {
    let tokens = warnlang::lexer::tokenize("u8 x = 200; i32 y = 7.9;").unwrap();
    let program = warnlang::parser::parse(&tokens).unwrap();
    let mut scope = Scope::root(PROGRAM_CONTEXT);
    let mut interp = Interpreter::new();
    for _ in 0..5 {
        interp.run_program(&program, &mut scope).unwrap();
        assert_eq!(scope.get("x").map(|b| b.value.scalar), Some(Scalar::U8(200)));
        assert_eq!(scope.get("y").map(|b| b.value.scalar), Some(Scalar::I32(7)));
    }
}

#[test]
fn test_loop_body_literal_is_stable() {
    let src = "u8 total = 0; for i in 0...10 { u8 inc = 25; incr total by inc; } total;";
    // 10 * 25 = 250 fits in u8 without any cumulative truncation
    assert_eq!(last(src), Scalar::U8(250));
}

#[test]
fn test_loop_body_literal_resolved_on_first_iteration() {
    let tokens = warnlang::lexer::tokenize("for i in 0...10 { u8 inc = 25; }").unwrap();
    let program = warnlang::parser::parse(&tokens).unwrap();
    let Expr::For { body, .. } = &program.stmts[0].node else {
        panic!("expected a for loop");
    };
    let Expr::Block(stmts) = &body.node else {
        panic!("expected a block body");
    };
    let Expr::Bind { value, .. } = &stmts[0].node else {
        panic!("expected a declaration");
    };
    let Expr::Number(lit) = &value.node else {
        panic!("expected a literal");
    };
    assert!(!lit.is_resolved());

    let mut scope = Scope::root(PROGRAM_CONTEXT);
    let mut interp = Interpreter::new();
    interp.run_program(&program, &mut scope).unwrap();
    assert_eq!(interp.iterations(), 10);
    assert!(lit.is_resolved());
    assert_eq!(lit.resolve(), Some(Scalar::U8(25)));
    assert_eq!(scope.get("inc").map(|b| b.value.scalar), Some(Scalar::U8(25)));
}

// ============================================
// Arithmetic and promotion
// ============================================

#[test]
fn test_precedence() {
    assert_eq!(last("1 + 2 * 3;"), Scalar::I64(7));
    assert_eq!(last("(1 + 2) * 3;"), Scalar::I64(9));
    assert_eq!(last("2 ^ 3 ^ 2;"), Scalar::I64(512));
    assert_eq!(last("10 - 4 - 3;"), Scalar::I64(3));
}

#[test]
fn test_promotion_to_wider_operand() {
    assert_eq!(last("u8 a = 200; u16 b = 100; a + b;"), Scalar::U16(300));
    assert_eq!(last("i32 a = 3; f32 b = 0.5; a * b;"), Scalar::F32(1.5));
    assert_eq!(last("u64 a = 3; i16 b = 4; a + b;"), Scalar::I16(7));
}

#[test]
fn test_overflow_wraps() {
    assert_eq!(last("u8 a = 200; u8 b = 100; a + b;"), Scalar::U8(44));
}

#[test]
fn test_unary_minus_promotes_small_widths() {
    assert_eq!(last("u8 a = 5; -a;"), Scalar::I16(-5));
    assert_eq!(last("-5;"), Scalar::I64(-5));
}

#[test]
fn test_negated_declaration_checks_literal_before_negation() {
    assert_eq!(last("i8 x = -5; x;"), Scalar::I16(-5));
    assert_eq!(last("i16 x = -32767; x;"), Scalar::I16(-32767));
    for (src, literal, width) in [
        ("i8 x = -128;", "128", "i8"),
        ("i16 x = -32768;", "32768", "i16"),
        ("i32 x = -2147483648;", "2147483648", "i32"),
        ("i64 x = -9223372036854775808;", "9223372036854775808", "i64"),
    ] {
        let err = run_err(src);
        assert_eq!(err.category(), "Variable Size Error", "{src}");
        assert_eq!(
            err.message(),
            format!("`{literal}` does not fit in `{width}`"),
            "{src}"
        );
    }
    // the minimum is still reachable through arithmetic
    assert_eq!(last("i8 x = -127 - 1; x;"), Scalar::I64(-128));
}

#[test]
fn test_not_and_logic() {
    assert_eq!(last("!0;"), Scalar::I64(1));
    assert_eq!(last("!true;"), Scalar::U8(0));
    assert_eq!(last("3 && 4;"), Scalar::I64(4));
    assert_eq!(last("0 || 9;"), Scalar::I64(9));
    assert_eq!(last("1 < 2 && 2 < 3;"), Scalar::I64(1));
}

#[test]
fn test_predefined_names() {
    assert_eq!(last("true;"), Scalar::U8(1));
    assert_eq!(last("nocap;"), Scalar::U8(1));
    assert_eq!(last("cap;"), Scalar::U8(0));
    assert_eq!(last("null;"), Scalar::U8(0));
}

// ============================================
// Bindings and const
// ============================================

#[test]
fn test_rebinding_replaces() {
    assert_eq!(last("i64 x = 1; i64 x = 2; x;"), Scalar::I64(2));
    assert_eq!(last("i64 x = 1; u8 x = 2; x;"), Scalar::U8(2));
}

#[test]
fn test_const_rebinding_fails() {
    let err = run_err("i64 const k = 1; i64 k = 2;");
    assert_eq!(err.category(), "Reassigning Constant Error");
    assert_eq!(err.message(), "`k` is already defined as const");
}

#[test]
fn test_const_increment_fails() {
    let err = run_err("i64 const k = 1; k++;");
    assert_eq!(err.category(), "Reassigning Constant Error");
    assert_eq!(
        err.message(),
        "Cannot perform increment operation on a constant variable"
    );
    let err = run_err("i64 const k = 1; --k;");
    assert_eq!(
        err.message(),
        "Cannot perform decrement operation on a constant variable"
    );
}

#[test]
fn test_const_compound_assignment_fails() {
    for src in [
        "i64 const k = 1; incr k by 1;",
        "i64 const k = 1; decr k by 1;",
        "i64 const k = 1; mult k by 2;",
        "i64 const k = 1; div k by 2;",
        "i64 const k = 1; k += 1;",
    ] {
        assert_eq!(run_err(src).category(), "Reassigning Constant Error", "{src}");
    }
}

#[test]
fn test_const_loop_variable_fails() {
    let err = run_err("i64 const i = 0; for i in 0...3 { }");
    assert_eq!(err.category(), "Reassigning Constant Error");
}

#[test]
fn test_undefined_identifier() {
    let err = run_err("y + 1;");
    assert_eq!(err.category(), "Runtime Error");
    assert_eq!(err.message(), "`y` is not defined");
    assert_eq!(err.span(), Span::new(0, 1));
}

// ============================================
// Increment, decrement, compound assignment
// ============================================

#[test]
fn test_prefix_returns_new_postfix_returns_old() {
    let outputs = run_ok("i64 x = 1; x++; x; ++x; x;");
    let values: Vec<_> = outputs
        .iter()
        .filter_map(Output::as_value)
        .map(|v| v.scalar)
        .collect();
    assert_eq!(
        values,
        vec![Scalar::I64(1), Scalar::I64(2), Scalar::I64(3), Scalar::I64(3)]
    );
}

#[test]
fn test_decrement() {
    assert_eq!(last("i64 x = 5; x--; x;"), Scalar::I64(4));
    assert_eq!(last("i64 x = 5; --x;"), Scalar::I64(4));
}

#[test]
fn test_increment_widens_to_i64() {
    assert_eq!(last("u8 x = 5; x++; x;"), Scalar::I64(6));
}

#[test]
fn test_compound_assignment_keeps_width() {
    assert_eq!(last("u8 x = 250; incr x by 10; x;"), Scalar::U8(4));
    assert_eq!(last("i16 x = 7; decr x by 10; x;"), Scalar::I16(-3));
    assert_eq!(last("i32 x = 6; mult x by 7; x;"), Scalar::I32(42));
    assert_eq!(last("i32 x = 7; div x by 2; x;"), Scalar::I32(3));
    assert_eq!(last("f32 x = 1.5; incr x by 1; x;"), Scalar::F32(2.5));
    assert_eq!(last("i64 x = 1; x += 4; x -= 2; x;"), Scalar::I64(3));
}

#[test]
fn test_compound_assignment_yields_nothing() {
    let outputs = run_ok("i64 x = 1; incr x by 1;");
    assert_eq!(outputs, vec![Output::Empty, Output::Empty]);
}

// ============================================
// Division by zero
// ============================================

#[test]
fn test_division_by_zero_at_divisor() {
    let err = run_err("10 / 0;");
    assert_eq!(err.category(), "Runtime Error");
    assert_eq!(err.message(), "Division by zero");
    assert_eq!(err.span(), Span::new(5, 6));
}

#[test]
fn test_float_division_by_zero() {
    let err = run_err("1.5 / 0.0;");
    assert_eq!(err.message(), "Division by zero");
    assert_eq!(err.span(), Span::new(6, 9));
}

#[test]
fn test_div_by_zero_at_amount() {
    let err = run_err("i64 x = 4; div x by 0;");
    assert_eq!(err.message(), "Division by zero");
    assert_eq!(err.span(), Span::new(20, 21));
}

// ============================================
// Control flow
// ============================================

#[test]
fn test_if_falls_through_to_else() {
    assert_eq!(last("if false { 1; } elif false { 2; } else { 7; }"), Scalar::I64(7));
}

#[test]
fn test_if_without_taken_branch_is_null() {
    let outputs = run_ok("if false { 1; } elif false { 2; }");
    assert_eq!(outputs.len(), 1);
    let value = outputs[0].as_value().expect("null sentinel");
    assert_eq!(value.scalar, Scalar::U8(0));
    assert_eq!(value.width(), Width::U8);
}

#[test]
fn test_if_takes_first_truthy_case() {
    let src = "i64 x = 5; if x > 10 { 1; } elif x > 3 { 2; } elif x > 1 { 3; } else { 4; }";
    assert_eq!(last(src), Scalar::I64(2));
}

#[test]
fn test_slang_program() {
    let src = "
        i64 n = 0;
        rickroll n < 3 { n++; }
        loopsy i in 0...2 { incr n by 10; }
        vibecheck n == 23 { nocap; } idk { cap; }
    ";
    assert_eq!(last(src), Scalar::U8(1));
}

#[test]
fn test_while_loop() {
    assert_eq!(last("i64 n = 0; while n < 10 { n++; } n;"), Scalar::I64(10));
}

#[test]
fn test_while_false_never_runs() {
    assert_eq!(last("i64 n = 0; while false { n++; } n;"), Scalar::I64(0));
}

#[test]
fn test_for_visits_one_through_five() {
    let src = "i64 seen = 0; for i in 0...5 { i64 seen = seen * 10 + i; } seen;";
    assert_eq!(last(src), Scalar::I64(12345));
}

#[test]
fn test_for_negative_step_visits_four_down_to_zero() {
    let src = "i64 seen = 0; for i in 5...0 step -1 { i64 seen = seen * 10 + i; } seen;";
    assert_eq!(last(src), Scalar::I64(43210));
}

#[test]
fn test_for_step_two() {
    let src = "i64 sum = 0; for i in 0...6 step 2 { incr sum by i; } sum;";
    // counter takes 2, 4, 6
    assert_eq!(last(src), Scalar::I64(12));
}

#[test]
fn test_for_fractional_negative_step_descends() {
    let src = "i64 n = 0; i64 seen = 0; for i in 5...0 step -0.5 { n++; i64 seen = i; } n;";
    // counter takes 4.5, 4.0, ..., 0.0
    assert_eq!(last(src), Scalar::I64(10));
    assert_eq!(last(&src.replace(" n;", " seen;")), Scalar::I64(0));
}

#[test]
fn test_for_fractional_step_binds_truncated_i64() {
    let src = "i64 sum = 0; for i in 0...2 step 0.5 { incr sum by i; } sum;";
    // bound values 0, 1, 1, 2
    assert_eq!(last(src), Scalar::I64(4));
}

#[test]
fn test_for_empty_range() {
    let src = "i64 sum = 0; for i in 5...5 { incr sum by 1; } sum;";
    assert_eq!(last(src), Scalar::I64(0));
}

#[test]
fn test_for_variable_is_i64() {
    assert_eq!(last("for i in 0...2 { } i;"), Scalar::I64(2));
}

#[test]
fn test_for_bounds_evaluated_once() {
    let src = "i64 n = 3; i64 runs = 0; for i in 0...n { n++; runs++; } runs;";
    assert_eq!(last(src), Scalar::I64(3));
}

#[test]
fn test_range_outside_for_is_unsupported() {
    let err = run_err("1...3;");
    assert_eq!(err.category(), "Runtime Error");
    assert!(err.message().contains("range"));
}

#[test]
fn test_block_outputs_sequence() {
    let outputs = run_ok("if true { 1; 2; }");
    match &outputs[0] {
        Output::Sequence(items) => assert_eq!(items.len(), 2),
        other => panic!("Expected Sequence, got {other:?}"),
    }
    assert_eq!(outputs[0].to_string(), "[i64(1), i64(2)]");
}

// ============================================
// Diagnostics
// ============================================

#[test]
fn test_lexical_error_diagnostic() {
    let err = run_err("i64 x = 1 & 2;");
    assert_eq!(err.category(), "Expected char");
    assert_eq!(err.start.line, 1);
    assert_eq!(err.start.column, 11);
    assert!(err.traceback.is_empty());
}

#[test]
fn test_missing_semicolon_diagnostic() {
    let err = run_err("i64 x = 5\ni64 y = 6;");
    assert_eq!(err.category(), "Missing Semicolon Error");
    assert_eq!((err.start.line, err.start.column), (1, 10));
}

#[test]
fn test_runtime_error_rendering() {
    let err = run_err("i64 x = 1;\nx / 0;");
    insta::assert_snapshot!(err.to_string(), @r"
    Traceback (most recent call last):
     File test.wl, line 2, in <program>
    Runtime Error: Division by zero
    File test.wl, line 2, col 5

    x / 0;
        ^
    ");
}

#[test]
fn test_syntax_error_rendering() {
    let err = run_err("while x {");
    insta::assert_snapshot!(err.to_string(), @r"
    Invalid Syntax: Expected `}`
    File test.wl, line 1, col 10

    while x {
             ^
    ");
}

#[test]
fn test_error_stops_pipeline() {
    // the statement before the error has no visible effect on the result
    let err = run_err("i64 x = 1; x / 0; x++;");
    assert_eq!(err.message(), "Division by zero");
}

#[test]
fn test_deterministic_runs() {
    let src = "u16 a = 300; for i in 0...4 { incr a by i; } a * 2;";
    assert_eq!(run_ok(src), run_ok(src));
}

#[test]
fn test_ast_serializes_to_json() {
    let tokens = warnlang::lexer::tokenize("u8 const x = 3; x++;").unwrap();
    let program = warnlang::parser::parse(&tokens).unwrap();
    let json = serde_json::to_string(&program).unwrap();
    assert!(json.contains("\"u8\""));
    assert!(json.contains("Increment"));
}
