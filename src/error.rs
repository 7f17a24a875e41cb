use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn single(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos + 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnexpectedEndOfInput,
    UnexpectedEndOfFile,
    UnrecognizedKeyword,
    UndefinedFunction,
    ArityError,
    InvalidNumber,
    DivisionByZero,
    ReturnedToNilContext,
    Io,
}

impl ErrorKind {
    fn title(self) -> &'static str {
        match self {
            ErrorKind::UnexpectedEndOfInput | ErrorKind::UnexpectedEndOfFile => "Unexpected End",
            ErrorKind::UnrecognizedKeyword => "Syntax Error",
            ErrorKind::UndefinedFunction => "Undefined Function",
            ErrorKind::ArityError => "Arity Error",
            ErrorKind::InvalidNumber => "Invalid Number",
            ErrorKind::DivisionByZero => "Division By Zero",
            ErrorKind::ReturnedToNilContext => "Internal Error",
            ErrorKind::Io => "I/O Error",
        }
    }

    fn color(self) -> Color {
        match self {
            ErrorKind::UnexpectedEndOfInput
            | ErrorKind::UnexpectedEndOfFile
            | ErrorKind::UnrecognizedKeyword => Color::Yellow,
            ErrorKind::ReturnedToNilContext | ErrorKind::Io => Color::Red,
            _ => Color::Magenta,
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct BoiError {
    pub kind: ErrorKind,
    pub span: Option<Span>,
    pub message: String,
    pub help: Option<String>,
}

impl BoiError {
    pub fn new(kind: ErrorKind, message: String) -> Self {
        Self {
            kind,
            span: None,
            message,
            help: None,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_help(mut self, help: &str) -> Self {
        self.help = Some(help.to_string());
        self
    }

    /// Attaches `span` unless a more precise one was recorded deeper down.
    pub fn or_span(mut self, span: &Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span.clone());
        }
        self
    }

    pub fn unexpected_end_of_input(pos: usize) -> Self {
        Self::new(ErrorKind::UnexpectedEndOfInput, "unexpected EOF".to_string())
            .with_span(Span::single(pos))
    }

    pub fn unexpected_end_of_file(span: Span) -> Self {
        Self::new(ErrorKind::UnexpectedEndOfFile, "end of file before BOI".to_string())
            .with_span(span)
            .with_help("every 'boi?', 'bloop' and 'oh' block must be closed with 'BOI'")
    }

    pub fn unrecognized_keyword(keyword: &str, span: Span) -> Self {
        Self::new(
            ErrorKind::UnrecognizedKeyword,
            format!("unrecognized keyword '{}'", keyword),
        )
        .with_span(span)
        .with_help("statements start with one of: boi! boi, boi: one ONE boi? bloop oh OH BOI")
    }

    pub fn undefined_function(name: &str) -> Self {
        Self::new(
            ErrorKind::UndefinedFunction,
            format!("call to undefined function {}", name),
        )
    }

    pub fn arity(message: String) -> Self {
        Self::new(ErrorKind::ArityError, message)
    }

    pub fn invalid_number(text: &str) -> Self {
        Self::new(ErrorKind::InvalidNumber, format!("invalid number '{}'", text))
            .with_help("'int' takes base-10 digits only, e.g. [int 42]")
    }

    pub fn division_by_zero() -> Self {
        Self::new(ErrorKind::DivisionByZero, "division by zero".to_string())
    }

    pub fn returned_to_nil_context() -> Self {
        Self::new(
            ErrorKind::ReturnedToNilContext,
            "returned to nil context".to_string(),
        )
    }

    pub fn io(error: std::io::Error) -> Self {
        Self::new(ErrorKind::Io, error.to_string())
    }

    pub fn report(&self, source: &str, filename: Option<&str>) {
        let filename = filename.unwrap_or("<repl>");
        let color = self.kind.color();
        let offset = self.span.as_ref().map_or(0, |span| span.start);

        let mut report_builder = Report::build(ReportKind::Error, filename, offset)
            .with_message(format!("{}: {}", self.kind.title().fg(color), self.message));

        if let Some(ref span) = self.span {
            let end = span.end.min(source.len());
            let start = span.start.min(end);
            report_builder = report_builder.with_label(
                Label::new((filename, start..end))
                    .with_message(&self.message)
                    .with_color(color),
            );
        }

        if let Some(ref help_text) = self.help {
            report_builder = report_builder.with_note(format!("{}: {}", "help".fg(Color::Cyan), help_text));
        }

        // Diagnostics go to stderr; a failure to print one has nowhere left to go.
        let _ = report_builder
            .finish()
            .eprint((filename, Source::from(source)));
    }
}
