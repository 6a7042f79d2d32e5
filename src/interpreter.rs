use crate::environment::Environment;
use crate::{evaluator, printer, reader, MalObject};
use std::fmt;
use std::rc::Rc;

pub type Result<T = MalObject> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Read(reader::Error),
    Eval(evaluator::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Read(e) => write!(f, "read error: {}", e),
            Error::Eval(e) => write!(f, "{}", e),
        }
    }
}

impl From<reader::Error> for Error {
    fn from(e: reader::Error) -> Self {
        Self::Read(e)
    }
}

impl From<evaluator::Error> for Error {
    fn from(e: evaluator::Error) -> Self {
        Self::Eval(e)
    }
}

pub fn read(line: &str) -> Result {
    Ok(reader::read_str(line)?)
}

pub fn eval(obj: &MalObject, env: &Rc<Environment>) -> Result {
    Ok(evaluator::EVAL(obj, env)?)
}

pub fn print(obj: &MalObject) -> String {
    printer::pr_str(obj)
}

pub fn rep(line: &str, env: &Rc<Environment>) -> Result<String> {
    let ast = read(line)?;
    let value = eval(&ast, env)?;
    Ok(print(&value))
}
