//! sam VM: executes sam bytecode programs.

mod ops;
pub mod vm;

pub use vm::{Vm, DEFAULT_MEMORY};

#[cfg(test)]
mod tests {
    use super::*;
    use sam_bytecode::{Instruction, Label, Program, Value};
    use sam_syntax::error::{Error, ErrorKind};

    fn make_program(code: Vec<Instruction>) -> Program {
        Program::new(code, 1)
    }

    fn run_code(code: Vec<Instruction>) -> Result<Vm<Vec<u8>>, Error> {
        let mut vm = Vm::with_output(Vec::new());
        vm.run(&make_program(code))?;
        Ok(vm)
    }

    /// Run source text through every stage and return what it printed.
    fn run_source(input: &str) -> Result<String, Error> {
        let tokens = sam_lexer::tokenize(input)?;
        let ast = sam_parser::parse(tokens)?;
        sam_analyzer::analyze(&ast)?;
        let program = sam_compiler::generate(&ast)?;
        let mut vm = Vm::with_output(Vec::new());
        vm.run(&program)?;
        Ok(String::from_utf8(vm.into_output()).expect("output should be utf-8"))
    }

    fn int(n: i64) -> Instruction {
        Instruction::Push(Value::Int(n))
    }

    fn float(x: f64) -> Instruction {
        Instruction::Push(Value::Float(x))
    }

    #[test]
    fn test_vm_arithmetic_operations() {
        let test_cases = vec![
            (vec![int(10), int(3), Instruction::Add], Value::Int(13)),
            (vec![int(10), int(3), Instruction::Sub], Value::Int(7)),
            (vec![int(10), int(3), Instruction::Mul], Value::Int(30)),
            (vec![int(10), int(3), Instruction::Div], Value::Int(3)),
            (vec![int(-7), int(2), Instruction::Div], Value::Int(-4)),
            (vec![float(7.0), float(2.0), Instruction::Div], Value::Float(3.5)),
            (vec![int(1), float(0.5), Instruction::Add], Value::Float(1.5)),
            (vec![float(1.0), int(0), Instruction::Div], Value::Float(f64::INFINITY)),
        ];

        for (code, expected) in test_cases {
            let vm = run_code(code).unwrap();
            assert_eq!(vm.stack(), &[expected]);
        }
    }

    #[test]
    fn test_vm_comparison_operations() {
        let test_cases = vec![
            (vec![int(5), int(3), Instruction::Lt], 0),
            (vec![int(3), int(5), Instruction::Lt], 1),
            (vec![int(5), int(5), Instruction::Le], 1),
            (vec![int(5), int(5), Instruction::Ge], 1),
            (vec![int(4), int(5), Instruction::Ge], 0),
            (vec![int(5), int(3), Instruction::Gt], 1),
            (vec![int(5), int(5), Instruction::Eq], 1),
            (vec![int(5), int(3), Instruction::Ne], 1),
            (vec![float(2.5), float(2.5), Instruction::Le], 1),
            (vec![int(2), float(2.0), Instruction::Eq], 1),
        ];

        for (code, expected) in test_cases {
            let vm = run_code(code).unwrap();
            assert_eq!(vm.stack(), &[Value::Int(expected)]);
        }
    }

    #[test]
    fn test_vm_logical_operations() {
        let test_cases = vec![
            (vec![int(1), int(0), Instruction::And], 0),
            (vec![int(1), int(1), Instruction::And], 1),
            (vec![int(0), int(1), Instruction::Or], 1),
            (vec![int(0), int(0), Instruction::Or], 0),
            (vec![int(0), Instruction::Not], 1),
            (vec![int(7), Instruction::Not], 0),
        ];

        for (code, expected) in test_cases {
            let vm = run_code(code).unwrap();
            assert_eq!(vm.stack(), &[Value::Int(expected)]);
        }
    }

    #[test]
    fn test_vm_swap_and_negation() {
        let vm = run_code(vec![int(1), int(2), Instruction::Swap]).unwrap();
        assert_eq!(vm.stack(), &[Value::Int(2), Value::Int(1)]);

        let vm = run_code(vec![float(1.5), int(0), Instruction::Swap, Instruction::Sub]).unwrap();
        assert_eq!(vm.stack(), &[Value::Float(-1.5)]);
    }

    #[test]
    fn test_vm_memory() {
        let vm = run_code(vec![int(42), Instruction::Store(0), Instruction::Load(0), Instruction::Load(0)]).unwrap();
        assert_eq!(vm.stack(), &[Value::Int(42), Value::Int(42)]);
        assert_eq!(vm.memory().len(), DEFAULT_MEMORY);
        assert_eq!(vm.memory()[1], Value::Int(0));
    }

    #[test]
    fn test_vm_conditional_jumps() {
        let vm = run_code(vec![
            int(0),
            Instruction::Jz(Label(1)),
            int(1), // skipped
            Instruction::Label(Label(1)),
            int(1),
            Instruction::Jz(Label(2)),
            int(2), // runs
            Instruction::Label(Label(2)),
        ])
        .unwrap();
        assert_eq!(vm.stack(), &[Value::Int(2)]);
    }

    #[test]
    fn test_vm_halt_stops_execution() {
        let vm = run_code(vec![int(1), Instruction::Halt, int(2)]).unwrap();
        assert_eq!(vm.stack(), &[Value::Int(1)]);
    }

    #[test]
    fn test_vm_print_formatting() {
        let vm = run_code(vec![
            int(5),
            Instruction::Print,
            float(3.0),
            Instruction::Print,
            float(-0.25),
            Instruction::Print,
        ])
        .unwrap();
        assert_eq!(String::from_utf8(vm.into_output()).unwrap(), "5\n3.0\n-0.25\n");
    }

    #[test]
    fn test_vm_runtime_errors() {
        let cases = vec![
            (vec![int(10), int(0), Instruction::Div], "division by zero"),
            (vec![int(5), Instruction::Add], "stack underflow in ADD"),
            (vec![Instruction::Print], "stack underflow in PRINT"),
            (vec![Instruction::Jmp(Label(7))], "unresolved label L7"),
            (vec![Instruction::Load(DEFAULT_MEMORY)], "out of range"),
            (vec![int(i64::MAX), int(1), Instruction::Add], "integer overflow"),
            (vec![int(i64::MIN), int(-1), Instruction::Div], "integer overflow"),
        ];

        for (code, needle) in cases {
            let err = run_code(code).err().expect("run should fail");
            assert_eq!(err.kind, ErrorKind::Runtime);
            assert!(err.msg.contains(needle), "'{}' should mention '{}'", err.msg, needle);
        }
    }

    #[test]
    fn test_vm_untaken_jump_to_missing_label_is_fine() {
        let vm = run_code(vec![int(1), Instruction::Jz(Label(3)), int(9)]).unwrap();
        assert_eq!(vm.stack(), &[Value::Int(9)]);
    }

    #[test]
    fn test_vm_memory_capacity() {
        let mut vm = Vm::with_output(Vec::new()).with_memory(4);
        assert_eq!(vm.memory_capacity(), 4);
        let err = vm.run(&Program::new(vec![Instruction::Halt], 5)).unwrap_err();
        assert!(err.msg.contains("needs 5 memory slots"));
        vm.run(&Program::new(vec![int(1), Instruction::Store(3)], 4)).unwrap();
    }

    #[test]
    fn test_vm_state_resets_between_runs() {
        let mut vm = Vm::with_output(Vec::new());
        vm.run(&make_program(vec![int(7), Instruction::Store(0), int(1)])).unwrap();
        vm.run(&make_program(vec![Instruction::Load(0)])).unwrap();
        assert_eq!(vm.stack(), &[Value::Int(0)]);
    }

    #[test]
    fn test_scenarios() {
        assert_eq!(run_source("let x: int = 5; print(x);").unwrap(), "5\n");
        assert_eq!(
            run_source("let x: int = 0; while (x < 3) { print(x); x = x + 1; }").unwrap(),
            "0\n1\n2\n"
        );
        assert_eq!(
            run_source("let b: bool = true; if (b) { print(1); } else { print(0); }").unwrap(),
            "1\n"
        );
        assert_eq!(run_source("let y: int = 7 / 2; print(y);").unwrap(), "3\n");
        assert_eq!(run_source("let z: float = 7.0 / 2.0; print(z);").unwrap(), "3.5\n");

        let err = run_source("{ let x: int = 1; let x: int = 2; }").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Semantic);
        let err = run_source("break;").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Semantic);
    }

    #[test]
    fn test_nested_break_exits_innermost_loop() {
        let src = "
            let i: int = 0;
            while (i < 3) {
                let j: int = 0;
                while (true) {
                    if (j == 2) { break; }
                    print(i * 10 + j);
                    j = j + 1;
                }
                i = i + 1;
            }
            print(99);
        ";
        assert_eq!(run_source(src).unwrap(), "0\n1\n10\n11\n20\n21\n99\n");
    }

    #[test]
    fn test_if_chain_runs_exactly_one_branch() {
        let src = "
            let n: int = 0;
            while (n < 4) {
                if (n == 0) { print(100); }
                else if (n == 1) { print(200); }
                else if (n < 3) { print(300); }
                else { print(400); }
                n = n + 1;
            }
        ";
        assert_eq!(run_source(src).unwrap(), "100\n200\n300\n400\n");
        assert_eq!(run_source("if (false) { print(1); } else if (false) { print(2); }").unwrap(), "");
    }

    #[test]
    fn test_shadowed_variable_keeps_outer_value() {
        let src = "let x: int = 1; { let x: int = 2; x = 5; print(x); } print(x);";
        assert_eq!(run_source(src).unwrap(), "5\n1\n");
    }

    #[test]
    fn test_expressions_end_to_end() {
        assert_eq!(run_source("print(-7 / 2);").unwrap(), "-4\n");
        assert_eq!(run_source("print(-(2.5));").unwrap(), "-2.5\n");
        assert_eq!(run_source("print(1.5 <= 1.5); print(2.0 >= 3.0);").unwrap(), "1\n0\n");
        assert_eq!(run_source("print(true && !false); print(false || false);").unwrap(), "1\n0\n");
        assert_eq!(run_source("print(3 != 4); print(true == false);").unwrap(), "1\n0\n");
        assert_eq!(run_source("print(2 + 3 * 4 - 10 / 3);").unwrap(), "11\n");
        assert_eq!(run_source("let f: float = 1.0 / 4.0; print(f * 2.0);").unwrap(), "0.5\n");
        assert_eq!(
            run_source("print(10000000000000000.0); print(0.0000001);").unwrap(),
            "10000000000000000.0\n0.0000001\n"
        );
    }

    #[test]
    fn test_int_division_by_zero_at_runtime() {
        let err = run_source("let z: int = 0; print(1 / z);").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Runtime);
        assert_eq!(run_source("let z: float = 0.0; print(1.0 / z);").unwrap(), "inf\n");
    }

    #[test]
    fn test_runs_are_deterministic() {
        let src = "let i: int = 0; while (i < 5) { print(i * i); i = i + 1; }";
        assert_eq!(run_source(src).unwrap(), run_source(src).unwrap());
    }
}
