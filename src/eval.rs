//! Recursive-descent grammar that evaluates while it parses.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! statement   -> "let" declaration | expression
//! declaration -> name "=" expression
//! expression  -> term (("+" | "-") term)*
//! term        -> primary (("*" | "/" | "%") primary)*
//! primary     -> number | name | "(" expression ")" | "-" primary | "+" primary
//! ```
//!
//! There is no syntax tree: each production returns the numeric value of what
//! it just parsed, with one token of lookahead through the stream's pushback
//! buffer.

use std::error::Error;
use std::fmt;
use std::io::prelude::*;

use crate::stream::{StreamError, TokenStream};
use crate::table::{TableError, VarTable};
use crate::token::Token;

/// Evaluates statements straight off a token stream.
///
/// Owns the stream and the variable table, so declared variables persist
/// across statements for the lifetime of the evaluator.
#[derive(Debug)]
pub struct Evaluator<R: BufRead> {
    tokens: TokenStream<R>,
    vars: VarTable,
}

impl<R: BufRead> Evaluator<R> {
    pub fn new(input: R) -> Evaluator<R> {
        Evaluator {
            tokens: TokenStream::new(input),
            vars: VarTable::with_constants(),
        }
    }

    /// Evaluate the next statement.
    ///
    /// Leading `;` separators are skipped first.  Returns `None` on a quit
    /// token or end of input; the evaluator should not be used afterwards.
    pub fn next_statement(&mut self) -> Result<Option<f64>, EvalError> {
        loop {
            match self.tokens.get()? {
                Token::Print => (),
                Token::Quit | Token::Eof => return Ok(None),
                t => {
                    self.tokens.putback(t)?;
                    return self.statement().map(Some);
                }
            }
        }
    }

    /// Skip the remainder of a malformed statement, up to and including the
    /// next `;`.  Call after `next_statement` reported a recoverable error.
    pub fn recover(&mut self) -> Result<(), StreamError> {
        self.tokens.ignore(&Token::Print)
    }

    fn statement(&mut self) -> Result<f64, EvalError> {
        match self.tokens.get()? {
            Token::Let => self.declaration(),
            t => {
                self.tokens.putback(t)?;
                self.expression()
            }
        }
    }

    /// Parse `name "=" expression` after the `let` keyword was consumed.
    /// The table is only touched once the initializer evaluated, so a failed
    /// declaration leaves no binding behind.
    fn declaration(&mut self) -> Result<f64, EvalError> {
        let name = match self.tokens.get()? {
            Token::Name(name) => name,
            t => return Err(EvalError::Syntax(SyntaxError::ExpectedName(t))),
        };
        match self.tokens.get()? {
            Token::Equal => (),
            t => return Err(EvalError::Syntax(SyntaxError::ExpectedEquals(t))),
        }
        let value = self.expression()?;
        Ok(self.vars.define(name, value)?)
    }

    fn expression(&mut self) -> Result<f64, EvalError> {
        let mut left = self.term()?;
        loop {
            match self.tokens.get()? {
                Token::Plus => left += self.term()?,
                Token::Minus => left -= self.term()?,
                t => {
                    self.tokens.putback(t)?;
                    return Ok(left);
                }
            }
        }
    }

    fn term(&mut self) -> Result<f64, EvalError> {
        let mut left = self.primary()?;
        loop {
            match self.tokens.get()? {
                Token::Star => left *= self.primary()?,
                Token::Slash => {
                    let d = self.primary()?;
                    if d == 0.0 {
                        return Err(EvalError::DivideByZero);
                    }
                    left /= d;
                }
                Token::Percent => {
                    let d = self.primary()?;
                    if d == 0.0 {
                        return Err(EvalError::DivideByZero);
                    }
                    // f64::% is fmod: 7.5 % 2 == 1.5
                    left %= d;
                }
                t => {
                    self.tokens.putback(t)?;
                    return Ok(left);
                }
            }
        }
    }

    fn primary(&mut self) -> Result<f64, EvalError> {
        match self.tokens.get()? {
            Token::LeftParen => {
                let value = self.expression()?;
                match self.tokens.get()? {
                    Token::RightParen => Ok(value),
                    _ => Err(EvalError::Syntax(SyntaxError::ExpectedRightParen)),
                }
            }
            Token::Number(n) => Ok(n),
            Token::Name(name) => Ok(self.vars.get_value(&name)?),
            Token::Minus => Ok(-self.primary()?),
            Token::Plus => self.primary(),
            t => Err(EvalError::Syntax(SyntaxError::ExpectedPrimary(t))),
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum SyntaxError {
    /// Unmatched `(`.
    ExpectedRightParen,
    ExpectedPrimary(Token),
    ExpectedName(Token),
    ExpectedEquals(Token),
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxError::ExpectedRightParen => write!(f, "')' expected"),
            SyntaxError::ExpectedPrimary(t) => write!(f, "primary expected, found '{}'", t),
            SyntaxError::ExpectedName(t) => {
                write!(f, "name expected in declaration, found '{}'", t)
            }
            SyntaxError::ExpectedEquals(t) => {
                write!(f, "'=' missing in declaration, found '{}'", t)
            }
        }
    }
}

#[derive(Debug)]
pub enum EvalError {
    Stream(StreamError),
    Table(TableError),
    Syntax(SyntaxError),
    DivideByZero,
}

impl EvalError {
    /// True when the session can discard the rest of the statement and go
    /// on.  I/O failures and pushback contract violations are not user-input
    /// errors and end the session.
    pub fn is_recoverable(&self) -> bool {
        match self {
            EvalError::Stream(StreamError::Io(_)) | EvalError::Stream(StreamError::BufferFull) => {
                false
            }
            EvalError::Stream(_)
            | EvalError::Table(_)
            | EvalError::Syntax(_)
            | EvalError::DivideByZero => true,
        }
    }
}

impl Error for EvalError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            EvalError::Stream(e) => Some(e),
            EvalError::Table(e) => Some(e),
            EvalError::Syntax(_) | EvalError::DivideByZero => None,
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::Stream(e) => write!(f, "{}", e),
            EvalError::Table(e) => write!(f, "{}", e),
            EvalError::Syntax(e) => write!(f, "{}", e),
            EvalError::DivideByZero => write!(f, "divide by zero"),
        }
    }
}

impl From<StreamError> for EvalError {
    fn from(e: StreamError) -> EvalError {
        EvalError::Stream(e)
    }
}

impl From<TableError> for EvalError {
    fn from(e: TableError) -> EvalError {
        EvalError::Table(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval_one(input: &str) -> Result<Option<f64>, EvalError> {
        Evaluator::new(input.as_bytes()).next_statement()
    }

    fn eval_value(input: &str) -> Result<f64, EvalError> {
        Ok(eval_one(input)?.expect("statement expected"))
    }

    #[test]
    fn number() -> Result<(), EvalError> {
        assert_eq!(eval_value("42")?, 42.0);
        Ok(())
    }

    #[test]
    fn addition_and_subtraction() -> Result<(), EvalError> {
        assert_eq!(eval_value("1+2")?, 3.0);
        assert_eq!(eval_value("10 - 4 - 3")?, 3.0);
        Ok(())
    }

    #[test]
    fn multiplication_has_precedence_over_addition() -> Result<(), EvalError> {
        assert_eq!(eval_value("1+2*3")?, 7.0);
        Ok(())
    }

    #[test]
    fn parentheses_override_precedence() -> Result<(), EvalError> {
        assert_eq!(eval_value("(1+2)*3")?, 9.0);
        Ok(())
    }

    #[test]
    fn division() -> Result<(), EvalError> {
        assert_eq!(eval_value("9/2")?, 4.5);
        Ok(())
    }

    #[test]
    fn term_operators_are_left_associative() -> Result<(), EvalError> {
        assert_eq!(eval_value("8/4/2")?, 1.0);
        assert_eq!(eval_value("8 % 5 % 2")?, 1.0);
        Ok(())
    }

    #[test]
    fn integer_modulo() -> Result<(), EvalError> {
        assert_eq!(eval_value("7 % 2")?, 1.0);
        Ok(())
    }

    #[test]
    fn floating_modulo() -> Result<(), EvalError> {
        assert_eq!(eval_value("7.5 % 2")?, 1.5);
        Ok(())
    }

    #[test]
    fn divide_by_zero() {
        match eval_one("1/0") {
            Err(EvalError::DivideByZero) => (),
            r => panic!("unexpected output: {:?}", r),
        }
        match eval_one("1 % 0") {
            Err(EvalError::DivideByZero) => (),
            r => panic!("unexpected output: {:?}", r),
        }
    }

    #[test]
    fn nested_unary_signs() -> Result<(), EvalError> {
        assert_eq!(eval_value("--5")?, 5.0);
        assert_eq!(eval_value("-+-5")?, 5.0);
        assert_eq!(eval_value("-5+2")?, -3.0);
        Ok(())
    }

    #[test]
    fn declaration_then_use() -> Result<(), EvalError> {
        let mut evaluator = Evaluator::new("let x = 5; x + 1;".as_bytes());
        assert_eq!(evaluator.next_statement()?, Some(5.0));
        assert_eq!(evaluator.next_statement()?, Some(6.0));
        Ok(())
    }

    #[test]
    fn redeclaration_fails_and_keeps_old_value() -> Result<(), EvalError> {
        let mut evaluator = Evaluator::new("let x = 5; let x = 6; x;".as_bytes());
        assert_eq!(evaluator.next_statement()?, Some(5.0));
        match evaluator.next_statement() {
            Err(EvalError::Table(TableError::DeclaredTwice(name))) if name == "x" => (),
            r => panic!("unexpected output: {:?}", r),
        }
        evaluator.recover().map_err(EvalError::from)?;
        assert_eq!(evaluator.next_statement()?, Some(5.0));
        Ok(())
    }

    #[test]
    fn undefined_variable() {
        match eval_one("y + 1") {
            Err(EvalError::Table(TableError::Undefined(name))) if name == "y" => (),
            r => panic!("unexpected output: {:?}", r),
        }
    }

    #[test]
    fn seeded_constants_are_usable() -> Result<(), EvalError> {
        assert_eq!(eval_value("pi")?, 3.1415926535);
        assert_eq!(eval_value("2*e")?, 2.0 * 2.7182818284);
        Ok(())
    }

    #[test]
    fn missing_right_paren() {
        match eval_one("(1+2") {
            Err(EvalError::Syntax(SyntaxError::ExpectedRightParen)) => (),
            r => panic!("unexpected output: {:?}", r),
        }
    }

    #[test]
    fn missing_primary() {
        match eval_one("1+*2") {
            Err(EvalError::Syntax(SyntaxError::ExpectedPrimary(Token::Star))) => (),
            r => panic!("unexpected output: {:?}", r),
        }
    }

    #[test]
    fn declaration_without_name() {
        match eval_one("let 1 = 2") {
            Err(EvalError::Syntax(SyntaxError::ExpectedName(Token::Number(n)))) if n == 1.0 => (),
            r => panic!("unexpected output: {:?}", r),
        }
    }

    #[test]
    fn declaration_without_equals() {
        match eval_one("let x 2") {
            Err(EvalError::Syntax(SyntaxError::ExpectedEquals(Token::Number(n)))) if n == 2.0 => (),
            r => panic!("unexpected output: {:?}", r),
        }
    }

    #[test]
    fn failed_declaration_leaves_no_binding() -> Result<(), EvalError> {
        let mut evaluator = Evaluator::new("let x = 1/0; let x = 3; x;".as_bytes());
        match evaluator.next_statement() {
            Err(EvalError::DivideByZero) => (),
            r => panic!("unexpected output: {:?}", r),
        }
        evaluator.recover().map_err(EvalError::from)?;
        assert_eq!(evaluator.next_statement()?, Some(3.0));
        assert_eq!(evaluator.next_statement()?, Some(3.0));
        Ok(())
    }

    #[test]
    fn leading_separators_are_skipped() -> Result<(), EvalError> {
        let mut evaluator = Evaluator::new(";; 2;".as_bytes());
        assert_eq!(evaluator.next_statement()?, Some(2.0));
        Ok(())
    }

    #[test]
    fn quit_ends_without_evaluating() -> Result<(), EvalError> {
        let mut evaluator = Evaluator::new("q 1+1;".as_bytes());
        assert_eq!(evaluator.next_statement()?, None);
        Ok(())
    }

    #[test]
    fn end_of_input_ends_cleanly() -> Result<(), EvalError> {
        let mut evaluator = Evaluator::new("".as_bytes());
        assert_eq!(evaluator.next_statement()?, None);
        Ok(())
    }

    #[test]
    fn recovery_resynchronizes_on_separator() -> Result<(), EvalError> {
        let mut evaluator = Evaluator::new("1+*2; 4*2;".as_bytes());
        match evaluator.next_statement() {
            Err(EvalError::Syntax(SyntaxError::ExpectedPrimary(_))) => (),
            r => panic!("unexpected output: {:?}", r),
        }
        evaluator.recover().map_err(EvalError::from)?;
        assert_eq!(evaluator.next_statement()?, Some(8.0));
        Ok(())
    }
}
