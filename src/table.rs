//! Variable table: declare-once name/value bindings.

use std::error::Error;
use std::fmt;

/// A named numeric binding.
#[derive(Debug, PartialEq, Clone)]
pub struct Variable {
    pub name: String,
    pub value: f64,
}

/// Bindings in declaration order.  Names are unique; a declaration never
/// overwrites an earlier one.
///
/// Sessions start with the constants `pi` and `e` already bound.
#[derive(Debug, Default)]
pub struct VarTable {
    entries: Vec<Variable>,
}

impl VarTable {
    pub fn new() -> VarTable {
        VarTable { entries: vec![] }
    }

    /// A table pre-seeded with the session constants.
    pub fn with_constants() -> VarTable {
        let mut table = VarTable::new();
        for (name, value) in CONSTANTS {
            // A fresh table cannot already hold the constant.
            let _ = table.define(name.to_string(), *value);
        }
        table
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.entries.iter().any(|v| v.name == name)
    }

    /// Bind `name` to `value` and return the value.
    pub fn define(&mut self, name: String, value: f64) -> Result<f64, TableError> {
        if self.is_declared(&name) {
            return Err(TableError::DeclaredTwice(name));
        }
        self.entries.push(Variable { name, value });
        Ok(value)
    }

    pub fn get_value(&self, name: &str) -> Result<f64, TableError> {
        self.entries
            .iter()
            .find(|v| v.name == name)
            .map(|v| v.value)
            .ok_or_else(|| TableError::Undefined(name.to_string()))
    }

    /// Overwrite an existing binding.  The statement grammar never reassigns;
    /// this exists for embedders extending the session.
    pub fn set_value(&mut self, name: &str, value: f64) -> Result<(), TableError> {
        match self.entries.iter_mut().find(|v| v.name == name) {
            Some(var) => {
                var.value = value;
                Ok(())
            }
            None => Err(TableError::Undefined(name.to_string())),
        }
    }
}

const CONSTANTS: &[(&str, f64)] = &[("pi", 3.1415926535), ("e", 2.7182818284)];

#[derive(Debug, PartialEq)]
pub enum TableError {
    DeclaredTwice(String),
    Undefined(String),
}

impl Error for TableError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::DeclaredTwice(name) => write!(f, "{} declared twice", name),
            TableError::Undefined(name) => write!(f, "undefined variable: {}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_then_look_up() -> Result<(), TableError> {
        let mut table = VarTable::new();
        assert_eq!(table.define("x".to_string(), 5.0)?, 5.0);
        assert!(table.is_declared("x"));
        assert_eq!(table.get_value("x")?, 5.0);
        Ok(())
    }

    #[test]
    fn defining_twice_fails_and_keeps_first_value() -> Result<(), TableError> {
        let mut table = VarTable::new();
        table.define("x".to_string(), 5.0)?;
        match table.define("x".to_string(), 6.0) {
            Err(TableError::DeclaredTwice(name)) if name == "x" => (),
            r => panic!("unexpected output: {:?}", r),
        }
        assert_eq!(table.get_value("x")?, 5.0);
        Ok(())
    }

    #[test]
    fn undefined_lookup_fails() {
        let table = VarTable::new();
        assert_eq!(
            table.get_value("y"),
            Err(TableError::Undefined("y".to_string()))
        );
    }

    #[test]
    fn set_value_overwrites_existing_binding() -> Result<(), TableError> {
        let mut table = VarTable::new();
        table.define("x".to_string(), 1.0)?;
        table.set_value("x", 2.0)?;
        assert_eq!(table.get_value("x")?, 2.0);
        Ok(())
    }

    #[test]
    fn set_value_on_missing_binding_fails() {
        let mut table = VarTable::new();
        assert_eq!(
            table.set_value("x", 2.0),
            Err(TableError::Undefined("x".to_string()))
        );
    }

    #[test]
    fn constants_are_seeded() -> Result<(), TableError> {
        let table = VarTable::with_constants();
        assert_eq!(table.get_value("pi")?, 3.1415926535);
        assert_eq!(table.get_value("e")?, 2.7182818284);
        Ok(())
    }
}
