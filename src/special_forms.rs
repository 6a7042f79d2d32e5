use crate::environment::Environment;
use crate::evaluator::{Error, Result, EVAL};
use crate::types::{MalObject, TypeMismatch};
use itertools::Itertools;
use std::fmt;
use std::rc::Rc;

#[derive(Debug)]
pub enum DefError {
    WrongArgCount(usize),
    KeyNotASymbol(TypeMismatch),
}

impl fmt::Display for DefError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefError::WrongArgCount(n) => write!(f, "expected a name and a value, got {} forms", n),
            DefError::KeyNotASymbol(e) => write!(f, "cannot bind: {}", e),
        }
    }
}

/// `(def! name expr)`: bind into the current scope, not a child.
pub fn apply_def(args: &[MalObject], env: &Rc<Environment>) -> Result {
    let (key, value) = match args {
        [key, value] => (key, value),
        _ => return Err(Error::Def(DefError::WrongArgCount(args.len()))),
    };
    let key = key
        .as_symbol()
        .map_err(|e| Error::Def(DefError::KeyNotASymbol(e)))?;
    let value = EVAL(value, env)?;
    log::debug!("define {} as {}", key, value);
    env.set(key.clone(), value.clone());
    Ok(value)
}

#[derive(Debug)]
pub enum LetError {
    WrongArgCount(usize),
    BindingsNotSequence(TypeMismatch),
    BindingsOddLength(usize),
    BindToNonSymbol(TypeMismatch),
}

impl fmt::Display for LetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LetError::WrongArgCount(n) => {
                write!(f, "expected bindings and a body, got {} forms", n)
            }
            LetError::BindingsNotSequence(e) => write!(f, "bad bindings: {}", e),
            LetError::BindingsOddLength(n) => {
                write!(f, "bindings need an even number of forms, got {}", n)
            }
            LetError::BindToNonSymbol(e) => write!(f, "cannot bind: {}", e),
        }
    }
}

/// `(let* [name expr ...] body)`
pub fn apply_let(args: &[MalObject], env: &Rc<Environment>) -> Result {
    let (bindings, body) = match args {
        [bindings, body] => (bindings, body),
        _ => return Err(Error::Let(LetError::WrongArgCount(args.len()))),
    };
    let bindings = bindings
        .as_seq()
        .map_err(|e| Error::Let(LetError::BindingsNotSequence(e)))?;
    if bindings.len() % 2 != 0 {
        return Err(Error::Let(LetError::BindingsOddLength(bindings.len())));
    }
    let child = make_let_environment(bindings, env)?;
    log::trace!("let* body in {}", child);
    EVAL(body, &child)
}

fn make_let_environment(
    bindings: &[MalObject],
    parent: &Rc<Environment>,
) -> Result<Rc<Environment>> {
    let child = Environment::spawn_from(parent);
    for (key, value) in bindings.iter().tuples() {
        let key = key
            .as_symbol()
            .map_err(|e| Error::Let(LetError::BindToNonSymbol(e)))?;
        // Evaluate in the child so that later bindings can refer to earlier ones.
        let value = EVAL(value, &child)?;
        child.set(key.clone(), value);
    }
    Ok(child)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read_str;
    use crate::types::MalSymbol;

    fn eval_str(input: &str, env: &Rc<Environment>) -> Result {
        EVAL(&read_str(input).unwrap(), env)
    }

    #[test]
    fn def_binds_in_current_scope() {
        let env = Environment::global();
        assert_eq!(eval_str("(def! x 10)", &env).unwrap(), MalObject::Integer(10));
        assert_eq!(eval_str("x", &env).unwrap(), MalObject::Integer(10));
        assert_eq!(eval_str("(def! x (+ x 1))", &env).unwrap(), MalObject::Integer(11));
        assert_eq!(eval_str("x", &env).unwrap(), MalObject::Integer(11));
    }

    #[test]
    fn def_requires_symbol() {
        let env = Environment::global();
        assert!(matches!(
            eval_str("(def! 1 2)", &env),
            Err(Error::Def(DefError::KeyNotASymbol(TypeMismatch::NotASymbol(_))))
        ));
        assert!(matches!(
            eval_str("(def! x)", &env),
            Err(Error::Def(DefError::WrongArgCount(1)))
        ));
    }

    #[test]
    fn failed_def_installs_nothing() {
        let env = Environment::global();
        assert!(eval_str("(def! y (/ 1 0))", &env).is_err());
        assert!(!env.contains_locally(&MalSymbol::from("y")));
    }

    #[test]
    fn let_sequential_bindings() {
        let env = Environment::global();
        assert_eq!(
            eval_str("(let* [a 5 b (+ a 1)] (+ a b))", &env).unwrap(),
            MalObject::Integer(11)
        );
        assert_eq!(
            eval_str("(let* (c 2) (* c c))", &env).unwrap(),
            MalObject::Integer(4)
        );
        assert!(env.get(&MalSymbol::from("a")).is_none());
        assert!(env.get(&MalSymbol::from("c")).is_none());
    }

    #[test]
    fn let_shadows_without_touching_outer() {
        let env = Environment::global();
        eval_str("(def! a 1)", &env).unwrap();
        assert_eq!(
            eval_str("(let* [a 2] a)", &env).unwrap(),
            MalObject::Integer(2)
        );
        assert_eq!(eval_str("a", &env).unwrap(), MalObject::Integer(1));
    }

    #[test]
    fn def_inside_let_binds_in_child() {
        let env = Environment::global();
        assert_eq!(
            eval_str("(let* [q 1] (def! inner q))", &env).unwrap(),
            MalObject::Integer(1)
        );
        assert!(env.get(&MalSymbol::from("inner")).is_none());
    }

    #[test]
    fn let_errors() {
        let env = Environment::global();
        assert!(matches!(
            eval_str("(let* [a] a)", &env),
            Err(Error::Let(LetError::BindingsOddLength(1)))
        ));
        assert!(matches!(
            eval_str("(let* 1 2)", &env),
            Err(Error::Let(LetError::BindingsNotSequence(_)))
        ));
        assert!(matches!(
            eval_str("(let* [1 2] 3)", &env),
            Err(Error::Let(LetError::BindToNonSymbol(_)))
        ));
        assert!(matches!(
            eval_str("(let* [a 1])", &env),
            Err(Error::Let(LetError::WrongArgCount(1)))
        ));
    }
}
