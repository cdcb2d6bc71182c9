//! sam semantic analyzer: scoped static type checking over the AST.

pub mod analyzer;
mod scope;

pub use analyzer::{analyze, Analyzer};

#[cfg(test)]
mod tests {
    use super::*;
    use sam_lexer::Lexer;
    use sam_parser::Parser;
    use sam_syntax::error::ErrorKind;

    fn check(input: &str) -> Result<(), String> {
        let mut lexer = Lexer::new(input);
        let tokens = lexer.tokenize().map_err(|e| format!("Lex error: {}", e.msg))?;
        let mut parser = Parser::new(tokens);
        let program = parser.parse_program().map_err(|e| format!("Parse error: {}", e.msg))?;
        let mut analyzer = Analyzer::new();
        match analyzer.analyze(&program) {
            Ok(()) => Ok(()),
            Err(e) => {
                assert_eq!(e.kind, ErrorKind::Semantic);
                Err(e.msg)
            }
        }
    }

    fn expect_ok(input: &str) {
        if let Err(e) = check(input) {
            panic!("Program failed: {}\nInput: {}", e, input);
        }
    }

    fn expect_error(input: &str, needle: &str) {
        match check(input) {
            Ok(()) => panic!("Expected error but program passed: {}", input),
            Err(msg) => assert!(msg.contains(needle), "error '{}' should mention '{}'", msg, needle),
        }
    }

    #[test]
    fn test_well_typed_programs() {
        expect_ok("let x: int = 5; print(x);");
        expect_ok("let x: int = 0; while (x < 3) { print(x); x = x + 1; }");
        expect_ok("let b: bool = true; if (b) { print(1); } else { print(0); }");
        expect_ok("let z: float = 7.0 / 2.0; print(z);");
        expect_ok("let b: bool = 1 <= 2 && 2.5 >= 1.5 || !(true == false) && 3 != 4;");
        expect_ok("let n: int = -(2 * 3); let f: float = -1.5;");
        expect_ok("print(true); print(1.5);");
    }

    #[test]
    fn test_redeclaration_in_same_scope() {
        expect_error("let x: int = 1; let x: int = 2;", "already declared");
        expect_error("{ let x: int = 1; let x: int = 2; }", "already declared");
        expect_error("while (true) { let y: bool = true; let y: bool = false; }", "already declared");
    }

    #[test]
    fn test_shadowing_enclosing_scope_is_allowed() {
        expect_ok("let x: int = 1; { let x: bool = true; print(x); } x = 2;");
        expect_ok("let x: int = 1; if (x > 0) { let x: float = 0.5; x = 1.5; } else { let x: int = 3; }");
    }

    #[test]
    fn test_scopes_end_with_their_block() {
        expect_error("{ let x: int = 1; } print(x);", "'x' not declared");
        expect_error("while (false) { let i: int = 0; } i = 1;", "'i' not declared");
        expect_error("if (true) { let t: int = 0; } else { t = 1; }", "'t' not declared");
        // a name declared in one block is free again in a sibling block
        expect_ok("{ let x: int = 1; } { let x: int = 2; }");
    }

    #[test]
    fn test_undeclared_names() {
        expect_error("print(y);", "'y' not declared");
        expect_error("y = 3;", "'y' not declared");
        expect_error("let x: int = x;", "'x' not declared");
    }

    #[test]
    fn test_declaration_and_assignment_types() {
        expect_error("let x: int = 1.0;", "declared as int but initialized with float");
        expect_error("let b: bool = 0;", "declared as bool but initialized with int");
        expect_error("let x: int = 1; x = true;", "variable 'x' is int, trying to assign bool");
    }

    #[test]
    fn test_conditions_must_be_bool() {
        expect_error("while (1) { }", "While condition must be bool, got int");
        expect_error("if (1.5) { }", "If condition must be bool, got float");
        expect_error("if (true) { } else if (0) { }", "Else-if condition must be bool, got int");
    }

    #[test]
    fn test_operator_typing() {
        expect_error("let x: int = 1 + 1.0;", "Type mismatch in binary operation: int + float");
        expect_error("let x: bool = true + false;", "Invalid operand type for '+'");
        expect_error("let x: bool = true < false;", "Invalid operand type for '<'");
        expect_error("let x: bool = 1 && 2;", "Logical operator '&&' requires bool operands");
        expect_error("let x: bool = !1;", "Logical '!' requires a bool operand");
        expect_error("let x: bool = -true;", "Invalid operand type for unary '-'");
        expect_error("let x: bool = 1 == 1.0;", "Type mismatch in binary operation");
        expect_error("let x: int = 1 < 2;", "declared as int but initialized with bool");
    }

    #[test]
    fn test_break_placement() {
        expect_error("break;", "'break' outside of loop");
        expect_error("if (true) { break; }", "'break' outside of loop");
        expect_error("while (true) { } break;", "'break' outside of loop");
        expect_ok("while (true) { if (true) { break; } }");
        expect_ok("while (true) { while (false) { break; } break; }");
    }

    #[test]
    fn test_analyzer_is_reusable() {
        let tokens = Lexer::new("let x: int = 1;").tokenize().unwrap();
        let program = Parser::new(tokens).parse_program().unwrap();
        let mut analyzer = Analyzer::new();
        analyzer.analyze(&program).unwrap();
        // the previous run's `x` must not leak into this one
        analyzer.analyze(&program).unwrap();
    }

    #[test]
    fn test_infer() {
        let tokens = Lexer::new("1 < 2 == (3.0 > 1.0)").tokenize().unwrap();
        let expr = Parser::new(tokens).parse_expr().unwrap();
        assert_eq!(Analyzer::new().infer(&expr).unwrap(), sam_syntax::Type::Bool);
    }
}
