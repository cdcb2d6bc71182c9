use owo_colors::OwoColorize;
use sam_parser::MAX_DEPTH;

pub fn provide_error_suggestions(err_msg: &str) {
    // Names and scopes
    if err_msg.contains("not declared") {
        eprintln!("{}", "💡 Help: Did you forget to declare this variable with 'let'?".yellow());
        eprintln!("    {}", "Variables declared inside a block are not visible after its closing '}'".bright_black());
        eprintln!("    {}", "Example: let count: int = 0;".bright_black());
    }
    else if err_msg.contains("already declared in this scope") {
        eprintln!("{}", "💡 Help: A name can be declared only once per block.".yellow());
        eprintln!("    {}", "Assign to the existing variable, or shadow it inside a nested block".bright_black());
        eprintln!("    {}", "Example: x = 2;   or   { let x: int = 2; }".bright_black());
    }

    // Type-related errors
    else if err_msg.contains("Type mismatch") {
        eprintln!("{}", "💡 Help: Make sure the value matches the declared type annotation.".yellow());
        eprintln!("    {}", "sam has types: int, float, bool. There are no implicit conversions".bright_black());
        eprintln!("    {}", "Example: let half: float = 1.0 / 2.0;".bright_black());
    }
    else if err_msg.contains("condition must be bool") {
        eprintln!("{}", "💡 Help: Conditions must be boolean expressions.".yellow());
        eprintln!("    {}", "Compare explicitly: while (n != 0) { ... }".bright_black());
    }
    else if err_msg.contains("Invalid operand type") || err_msg.contains("requires bool") {
        eprintln!("{}", "💡 Help: Operator used with the wrong kind of value.".yellow());
        eprintln!("    {}", "• Arithmetic and < > <= >= take int or float".bright_black());
        eprintln!("    {}", "• && || ! take bool".bright_black());
    }

    // Control flow errors
    else if err_msg.contains("'break' outside of loop") {
        eprintln!("{}", "💡 Help: 'break' can only be used inside a while loop.".yellow());
        eprintln!("    {}", "Example: while (true) { if (done) { break; } }".bright_black());
    }

    // Runtime errors
    else if err_msg.contains("division by zero") {
        eprintln!("{}", "💡 Help: You cannot divide an int by zero.".yellow());
        eprintln!("    {}", "Check if the divisor is zero before the operation.".bright_black());
    }
    else if err_msg.contains("integer overflow") {
        eprintln!("{}", "💡 Help: The result does not fit in a 64-bit int.".yellow());
        eprintln!("    {}", "Use float values for very large magnitudes".bright_black());
    }
    else if err_msg.contains("memory slots") {
        eprintln!("{}", "💡 Help: The program declares more variables than the VM has memory.".yellow());
        eprintln!("    {}", "Raise the limit with --memory <N>".bright_black());
    }
    else if err_msg.contains("stack underflow") || err_msg.contains("unresolved label") {
        eprintln!("{}", "💡 Help: Internal VM error - this might be a compiler bug.".yellow());
        eprintln!("    {}", "Inspect the generated code with: sam --emit bytecode file.sam".bright_black());
    }

    // Syntax errors
    else if err_msg.contains("String literals are not supported") {
        eprintln!("{}", "💡 Help: sam has no string values.".yellow());
        eprintln!("    {}", "print() accepts int, float and bool expressions".bright_black());
    }
    else if err_msg.contains("nested too deeply") {
        let help = format!("💡 Help: Nesting is limited to {} levels.", MAX_DEPTH);
        eprintln!("{}", help.yellow());
        eprintln!("    {}", "Split the expression with intermediate 'let' variables".bright_black());
    }
    else if err_msg.contains("Unexpected token") {
        eprintln!("{}", "💡 Help: Syntax error detected.".yellow());
        if err_msg.contains("'}'") {
            eprintln!("    {}", "Check that every '{' has a matching '}'".bright_black());
        } else if err_msg.contains("'='") {
            eprintln!("    {}", "Use '==' for comparison, '=' for assignment".bright_black());
        }
    }
    else if err_msg.contains("Expected ';'") {
        eprintln!("{}", "💡 Help: Statements end with ';'.".yellow());
        eprintln!("    {}", "Example: let x: int = 5;".bright_black());
    }
    else if err_msg.contains("Expected type") {
        eprintln!("{}", "💡 Help: Every declaration needs a type.".yellow());
        eprintln!("    {}", "Example: let flag: bool = true;".bright_black());
    }
    else if err_msg.contains("Expected") {
        eprintln!("{}", "💡 Help: Missing required syntax element.".yellow());
        if err_msg.contains("'('") || err_msg.contains("')'") {
            eprintln!("    {}", "Conditions and print arguments go in parentheses: print(x);".bright_black());
        } else if err_msg.contains("'{'") {
            eprintln!("    {}", "Loop and branch bodies must be braced blocks".bright_black());
        }
    }

    // Lexical errors
    else if err_msg.contains("Unterminated string") {
        eprintln!("{}", "💡 Help: String is missing closing quote.".yellow());
        eprintln!("    {}", "Make sure every \" has a matching closing \" on the same line".bright_black());
    }
    else if err_msg.contains("Invalid number") {
        eprintln!("{}", "💡 Help: Number format is not recognized.".yellow());
        eprintln!("    {}", "Use integers like 42 or floats like 3.14 (one '.' at most)".bright_black());
    }
    else if err_msg.contains("Unexpected character") {
        eprintln!("{}", "💡 Help: This character is not part of the language.".yellow());
        eprintln!("    {}", "Logical operators are written '&&' and '||'".bright_black());
    }
}
