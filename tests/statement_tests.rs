// Integration tests for statement parsing and whole programs

use sinc::errors::{ErrorKind, Severity};
use sinc::parser::ast::{Expression, Statement, StatementBlock, StatementKind};
use sinc::parser::operators::Operator;
use sinc::parser::Parser;
use sinc::types::PrimaryKind;

fn parse_program(source: &str) -> StatementBlock {
    let mut parser = Parser::new(source).expect("Parser creation failed");
    parser.parse_program().expect("Parsing failed")
}

fn parse_error(source: &str) -> ErrorKind {
    let mut parser = Parser::new(source).expect("Parser creation failed");
    parser
        .parse_program()
        .expect_err("Parsing should have failed")
        .kind
}

#[test]
fn test_declaration_then_allocation() {
    let program = parse_program("decl int x; alloc int x: 5;");
    assert_eq!(program.len(), 2);

    match &program.statements[0].kind {
        StatementKind::Declaration {
            ty,
            name,
            initial_value,
            is_function,
            ..
        } => {
            assert_eq!(name, "x");
            assert_eq!(ty.primary(), PrimaryKind::Int);
            assert!(initial_value.is_none());
            assert!(!is_function);
        }
        _ => panic!("Expected declaration"),
    }

    match &program.statements[1].kind {
        StatementKind::Allocation {
            name,
            initial_value: Some(value),
            ..
        } => {
            assert_eq!(name, "x");
            assert_eq!(value, &Expression::literal(PrimaryKind::Int, "5"));
            assert!(value.is_const());
        }
        _ => panic!("Expected allocation with initializer"),
    }
}

#[test]
fn test_function_with_one_returning_branch_rejected() {
    let source = r#"
        def int choose(decl bool flag) {
            if (flag) {
                return 1;
            } else {
                alloc int unused;
            }
        }
    "#;
    assert_eq!(parse_error(source), ErrorKind::NoReturn);
}

#[test]
fn test_function_with_returning_branches_accepted() {
    let source = r#"
        def int choose(decl bool flag) {
            if (flag) {
                {
                    return 1;
                }
            } else {
                return 2;
            }
        }
    "#;
    let program = parse_program(source);
    match &program.statements[0].kind {
        StatementKind::FunctionDefinition {
            name, params, body, ..
        } => {
            assert_eq!(name, "choose");
            assert_eq!(params.len(), 1);
            assert_eq!(body.len(), 1);
        }
        _ => panic!("Expected function definition"),
    }
}

#[test]
fn test_function_without_return_rejected() {
    let err = parse_error("def int f() { alloc int x: 1; }");
    assert!(matches!(err, ErrorKind::FunctionWithoutReturn { ref name } if name == "f"));
}

#[test]
fn test_void_function_returns_void() {
    let program = parse_program("def void log() { return void; }");
    match &program.statements[0].kind {
        StatementKind::FunctionDefinition { body, .. } => match &body.statements[0].kind {
            StatementKind::Return { value } => {
                assert_eq!(value, &Expression::void_literal());
            }
            _ => panic!("Expected return"),
        },
        _ => panic!("Expected function definition"),
    }
}

#[test]
fn test_compound_assignment_expands() {
    let program = parse_program("let total += step;");
    match &program.statements[0].kind {
        StatementKind::CompoundAssignment { lvalue, rvalue, op } => {
            assert_eq!(*op, Operator::Plus);
            assert_eq!(lvalue, &Expression::identifier("total"));
            match rvalue {
                Expression::Binary {
                    op: Operator::Plus,
                    left,
                    right,
                    ..
                } => {
                    assert_eq!(left.as_ref(), lvalue);
                    assert_eq!(right.as_ref(), &Expression::identifier("step"));
                }
                _ => panic!("Expected expanded binary"),
            }
        }
        _ => panic!("Expected compound assignment"),
    }
}

#[test]
fn test_move_arrows_store_destination_first() {
    let program = parse_program("move a <- b; move c -> d;");
    let destinations: Vec<&Expression> = program
        .iter()
        .map(|statement| match &statement.kind {
            StatementKind::Movement { destination, .. } => destination,
            _ => panic!("Expected movement"),
        })
        .collect();
    assert_eq!(destinations[0], &Expression::identifier("a"));
    assert_eq!(destinations[1], &Expression::identifier("d"));
}

#[test]
fn test_move_operator_in_let_rejected() {
    assert_eq!(parse_error("let a <- b;"), ErrorKind::IllegalMoveOperator);
}

#[test]
fn test_struct_and_construction() {
    let source = r#"
        def struct Point {
            alloc int x;
            alloc int y;
        }
        alloc Point origin;
        construct origin { x: 0, y: 0 }
    "#;
    let program = parse_program(source);
    assert_eq!(program.len(), 3);
    assert!(matches!(
        program.statements[0].kind,
        StatementKind::StructDefinition { .. }
    ));
    match &program.statements[1].kind {
        StatementKind::Allocation { ty, .. } => assert_eq!(ty.struct_name(), Some("Point")),
        _ => panic!("Expected allocation"),
    }
    assert!(matches!(
        program.statements[2].kind,
        StatementKind::Construction { .. }
    ));
}

#[test]
fn test_statements_keep_source_lines() {
    let source = "include \"io.sin\";\nalloc int x: 1;\n\nwhile (x < 10) {\n  let x += 1;\n}\n@print(x);";
    let program = parse_program(source);
    let lines: Vec<usize> = program.iter().map(|s: &Statement| s.line).collect();
    assert_eq!(lines, vec![1, 2, 4, 7]);
    assert!(matches!(
        program.statements[3].kind,
        StatementKind::Call { .. }
    ));
}

#[test]
fn test_missing_semicolon_reported() {
    assert_eq!(parse_error("alloc int x: 5"), ErrorKind::MissingSemicolon);
}

#[test]
fn test_empty_function_warns() {
    let mut parser = Parser::new("def void f() { }").expect("Parser creation failed");
    // An empty body has no return and is rejected, but the warning is still recorded
    assert!(parser.parse_program().is_err());
    assert!(parser
        .diagnostics()
        .iter()
        .any(|d| d.severity == Severity::Warning && d.message == "Empty function definition"));
}

#[test]
fn test_allocation_from_overridden_attribute() {
    let program = parse_program("alloc int n: arr:len &final;");
    match &program.statements[0].kind {
        StatementKind::Allocation {
            initial_value: Some(Expression::AttributeSelection { ty, .. }),
            ..
        } => {
            assert_eq!(ty.primary(), PrimaryKind::Int);
            assert!(ty.qualities().is_final());
        }
        other => panic!("Expected allocation from an attribute, got {:?}", other),
    }
}
