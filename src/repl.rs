use crate::evaluator::Interpreter;
use std::io::{self, BufRead, Write};

/// Line-at-a-time REPL. The interpreter, and with it the root scope, lives
/// across lines, so variables and functions persist between commands.
pub fn start() {
    println!("boi v0.1.0");
    println!("Type 'exit' or press Ctrl+D to quit");
    println!();

    let mut interpreter = Interpreter::new();
    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) => {
                println!();
                break;
            }
            Ok(_) => {
                let command = line.trim();
                if command.is_empty() {
                    continue;
                }
                if command == "exit" || command == "quit" {
                    println!("Goodbye!");
                    break;
                }

                run_repl_command(command, &mut interpreter);
            }
            Err(error) => {
                eprintln!("Error reading input: {}", error);
                break;
            }
        }
    }
}

fn run_repl_command(source: &str, interpreter: &mut Interpreter) {
    // A failed line keeps whatever earlier statements on it already did.
    if let Err(error) = interpreter.run(source.as_bytes()) {
        error.report(source, None);
    }
}
