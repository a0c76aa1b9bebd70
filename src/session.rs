//! API to drive a calculator session.

use std::error::Error;
use std::fmt;
use std::io;
use std::io::prelude::*;

use crate::eval::{EvalError, Evaluator};

/// A read-evaluate-print session over one input stream.
///
/// Statements are evaluated as they arrive; results go to the output writer
/// as `= value` lines and recoverable errors to the error writer, after which
/// the rest of the offending statement is discarded and the session goes on.
/// The session ends cleanly on a `q` token or when the input runs out.
///
/// # Example
///
/// ```
/// # use rcalc::session::{CalcError, Session};
/// let mut output: Vec<u8> = Vec::new();
/// let mut errors: Vec<u8> = Vec::new();
///
/// let script = "let x = 2; x * (3 + 4); 1/0; 5; q";
/// Session::new(script.as_bytes(), &mut output, &mut errors).run()?;
///
/// assert_eq!(output, b"= 2\n= 14\n= 5\n");
/// assert_eq!(errors, b"divide by zero\n");
/// # Ok::<(), CalcError>(())
/// ```
#[derive(Debug)]
pub struct Session<'a, R: BufRead, W: Write, E: Write> {
    evaluator: Evaluator<R>,
    output: &'a mut W,
    errors: &'a mut E,
    prompt: bool,
}

impl<'a, R: BufRead, W: Write, E: Write> Session<'a, R, W, E> {
    pub fn new(input: R, output: &'a mut W, errors: &'a mut E) -> Session<'a, R, W, E> {
        Session {
            evaluator: Evaluator::new(input),
            output,
            errors,
            prompt: false,
        }
    }

    /// Print a `> ` prompt before each statement, for interactive use.
    pub fn with_prompt(mut self) -> Self {
        self.prompt = true;
        self
    }

    /// Run statements until quit or end of input.
    ///
    /// User-input errors never end the session; only I/O failures and
    /// internal contract violations do.
    pub fn run(&mut self) -> Result<(), CalcError> {
        loop {
            if self.prompt {
                write!(self.output, "> ")?;
                self.output.flush()?;
            }
            match self.evaluator.next_statement() {
                Ok(Some(value)) => writeln!(self.output, "= {}", value)?,
                Ok(None) => return Ok(()),
                Err(e) if e.is_recoverable() => {
                    writeln!(self.errors, "{}", e)?;
                    self.evaluator.recover().map_err(EvalError::from)?;
                }
                Err(e) => return Err(CalcError::Eval(e)),
            }
        }
    }
}

/// Errors a session can end with.
#[derive(Debug)]
pub enum CalcError {
    /// Non-recoverable evaluator error (I/O on the input, pushback contract
    /// violation).  User-input errors are handled inside the loop.
    Eval(EvalError),

    /// Failure writing results or diagnostics.
    Io(io::Error),
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalcError::Eval(e) => write!(f, "{}", e),
            CalcError::Io(e) => write!(f, "output error: {}", e),
        }
    }
}

impl Error for CalcError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CalcError::Eval(e) => Some(e),
            CalcError::Io(e) => Some(e),
        }
    }
}

impl From<EvalError> for CalcError {
    fn from(e: EvalError) -> CalcError {
        CalcError::Eval(e)
    }
}

impl From<io::Error> for CalcError {
    fn from(e: io::Error) -> CalcError {
        CalcError::Io(e)
    }
}
