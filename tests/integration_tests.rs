// Parser robustness suite for boi
//
// Table-driven cases grouped into suites. Each case either parses or fails
// with a message fragment; a panic anywhere is recorded as a crash.

use boi::error::BoiError;
use boi::lexer::Lexer;
use boi::parser::Parser;

#[derive(Debug)]
pub enum TestResult {
    Pass,
    Fail(String),
    Crash(String),
}

#[derive(Debug, Clone)]
pub struct TestCase {
    pub name: String,
    pub input: String,
    pub should_succeed: bool,
    pub expected_error_contains: Option<String>,
}

impl TestCase {
    pub fn should_succeed(name: &str, input: &str) -> Self {
        Self {
            name: name.to_string(),
            input: input.to_string(),
            should_succeed: true,
            expected_error_contains: None,
        }
    }

    pub fn should_fail_with_message(name: &str, input: &str, expected_msg: &str) -> Self {
        Self {
            name: name.to_string(),
            input: input.to_string(),
            should_succeed: false,
            expected_error_contains: Some(expected_msg.to_string()),
        }
    }
}

#[derive(Debug)]
pub struct TestSuite {
    pub name: String,
    pub tests: Vec<TestCase>,
}

impl TestSuite {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tests: Vec::new(),
        }
    }

    pub fn add_test(&mut self, test: TestCase) {
        self.tests.push(test);
    }

    /// Runs every case and returns the names of the ones that did not pass.
    pub fn run(&self) -> Vec<String> {
        println!("Running test suite: {}", self.name);

        let mut failures = Vec::new();
        for test in &self.tests {
            match run_single_test(test) {
                TestResult::Pass => println!("  ✓ {}", test.name),
                TestResult::Fail(msg) => {
                    println!("  ✗ {}: {}", test.name, msg);
                    failures.push(format!("{}::{}", self.name, test.name));
                }
                TestResult::Crash(msg) => {
                    println!("  💥 {}: CRASHED - {}", test.name, msg);
                    failures.push(format!("{}::{} (crash)", self.name, test.name));
                }
            }
        }
        println!();
        failures
    }
}

fn run_single_test(test: &TestCase) -> TestResult {
    let result = std::panic::catch_unwind(|| parse_input(&test.input));

    match result {
        Ok(Ok(_)) if test.should_succeed => TestResult::Pass,
        Ok(Ok(_)) => TestResult::Fail("Expected parsing to fail, but it succeeded".to_string()),
        Ok(Err(error)) if test.should_succeed => TestResult::Fail(format!(
            "Expected parsing to succeed, but got error: {}",
            error.message
        )),
        Ok(Err(error)) => match &test.expected_error_contains {
            Some(expected) if !error.message.contains(expected) => TestResult::Fail(format!(
                "Error message '{}' doesn't contain expected text '{}'",
                error.message, expected
            )),
            _ => TestResult::Pass,
        },
        Err(panic_info) => {
            let panic_msg = if let Some(s) = panic_info.downcast_ref::<String>() {
                s.clone()
            } else if let Some(s) = panic_info.downcast_ref::<&str>() {
                s.to_string()
            } else {
                "Unknown panic".to_string()
            };
            TestResult::Crash(panic_msg)
        }
    }
}

fn parse_input(input: &str) -> Result<boi::ast::Program, BoiError> {
    let mut parser = Parser::new(Lexer::new(input));
    parser.parse()
}

// ============================================================================
// Test Suite Creation Functions
// ============================================================================

fn create_edge_case_tests() -> TestSuite {
    let mut suite = TestSuite::new("Edge Cases");

    suite.add_test(TestCase::should_succeed("empty_input", ""));
    suite.add_test(TestCase::should_succeed("only_whitespace", "   \n\t  "));
    suite.add_test(TestCase::should_succeed("only_comment", "-- nothing to see"));
    suite.add_test(TestCase::should_succeed("stray_top_level_terminator", "BOI"));

    let deep_calls = "boi, ".to_string() + &"[cat ".repeat(100) + "x" + &"]".repeat(100) + " boi";
    suite.add_test(TestCase::should_succeed("deeply_nested_calls", &deep_calls));

    suite
}

fn create_keyword_tests() -> TestSuite {
    let mut suite = TestSuite::new("Keyword Tests");

    suite.add_test(TestCase::should_succeed("call", "boi! say hi boi"));
    suite.add_test(TestCase::should_succeed("say_shorthand", "boi, hello boi"));
    suite.add_test(TestCase::should_succeed("set_shorthand", "boi: x 5 boi"));
    suite.add_test(TestCase::should_succeed("declare_lowercase", "one x boi"));
    suite.add_test(TestCase::should_succeed("declare_uppercase", "ONE x boi"));
    suite.add_test(TestCase::should_succeed("semicolon_terminator", "boi, hi;"));

    suite.add_test(TestCase::should_fail_with_message(
        "unknown_word",
        "hello world boi",
        "unrecognized keyword 'hello'",
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "bare_terminator_word",
        "boi hi",
        "unrecognized keyword 'boi'",
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "number_as_keyword",
        "123 boi",
        "unrecognized keyword '123'",
    ));

    suite
}

fn create_block_tests() -> TestSuite {
    let mut suite = TestSuite::new("Block Tests");

    suite.add_test(TestCase::should_succeed(
        "conditional",
        "boi? < 1 2 boi\n    boi, yes boi\nBOI",
    ));
    suite.add_test(TestCase::should_succeed("empty_loop", "bloop < 1 2 boi BOI"));
    suite.add_test(TestCase::should_succeed("empty_function", "oh f boi BOI"));
    suite.add_test(TestCase::should_succeed(
        "function_with_parameters",
        "OH f a b boi\n    boi, boi:arg.0 boi\nBOI",
    ));
    suite.add_test(TestCase::should_succeed(
        "nested_blocks",
        "oh f boi\n  bloop < 1 2 boi\n    boi? x boi BOI\n  BOI\nBOI",
    ));

    suite.add_test(TestCase::should_fail_with_message(
        "unclosed_conditional",
        "boi? x boi\n    boi, y boi",
        "end of file before BOI",
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "inner_block_takes_only_terminator",
        "oh f boi oh g boi BOI",
        "end of file before BOI",
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "bad_statement_in_block",
        "boi? x boi\n    nope boi\nBOI",
        "unrecognized keyword 'nope'",
    ));

    suite
}

fn create_token_tests() -> TestSuite {
    let mut suite = TestSuite::new("Token Tests");

    suite.add_test(TestCase::should_succeed("nested_call", "boi, [cat a [cat b c]] boi"));
    suite.add_test(TestCase::should_succeed("bang_call", "boi, !cat a b ; boi"));
    suite.add_test(TestCase::should_succeed("quoted_with_escapes", "boi, \"say \\\"hi\\\"\" boi"));
    suite.add_test(TestCase::should_succeed("variables", "boi, boi:x ret:exit boi"));

    suite.add_test(TestCase::should_fail_with_message(
        "missing_terminator",
        "boi, hi",
        "unexpected EOF",
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "keyword_at_end",
        "boi,",
        "unexpected EOF",
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "unterminated_quote",
        "boi, \"unterminated boi",
        "unexpected EOF",
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "unclosed_nested_call",
        "boi, [cat a b",
        "unexpected EOF",
    ));

    suite
}

// ============================================================================
// Main Test Function
// ============================================================================

#[test]
fn comprehensive_parser_tests() {
    let suites = vec![
        create_edge_case_tests(),
        create_keyword_tests(),
        create_block_tests(),
        create_token_tests(),
    ];

    let failures: Vec<String> = suites.iter().flat_map(TestSuite::run).collect();

    assert!(failures.is_empty(), "parser cases failed: {:?}", failures);
}
