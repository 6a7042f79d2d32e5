use crate::environment::{Environment, UnknownSymbol};
use crate::special_forms;
use crate::types::{map_seq, BadArgCount, MalObject, PrimitiveFn, TypeMismatch};
use itertools::Itertools;
use std::fmt;
use std::rc::Rc;

pub type Result<T = MalObject> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    UnknownSymbol(UnknownSymbol),
    NotCallable(String),
    Def(special_forms::DefError),
    Let(special_forms::LetError),
    TypeMismatch(TypeMismatch),
    BadArgument {
        function: &'static str,
        position: usize,
        mismatch: TypeMismatch,
    },
    BadArgCount(BadArgCount),
    DivideByZero,
    Overflow(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownSymbol(e) => write!(f, "{}", e),
            Error::NotCallable(head) => write!(f, "{} is not a function", head),
            Error::Def(e) => write!(f, "def!: {}", e),
            Error::Let(e) => write!(f, "let*: {}", e),
            Error::TypeMismatch(e) => write!(f, "type mismatch: {}", e),
            Error::BadArgument {
                function,
                position,
                mismatch,
            } => write!(f, "{}: argument {} {}", function, position + 1, mismatch),
            Error::BadArgCount(e) => write!(f, "{}", e),
            Error::DivideByZero => write!(f, "cannot divide by zero!"),
            Error::Overflow(op) => write!(f, "integer overflow in {}", op),
        }
    }
}

impl From<TypeMismatch> for Error {
    fn from(t: TypeMismatch) -> Self {
        Self::TypeMismatch(t)
    }
}

impl From<UnknownSymbol> for Error {
    fn from(e: UnknownSymbol) -> Self {
        Self::UnknownSymbol(e)
    }
}

#[allow(non_snake_case)]
pub fn EVAL(ast: &MalObject, env: &Rc<Environment>) -> Result {
    let argv = match ast {
        MalObject::List(argv) => argv,
        _ => return evaluate_ast(ast, env),
    };
    let head = match argv.first() {
        None => return Ok(ast.clone()),
        Some(head) => head,
    };
    log::trace!("apply {}", ast);
    if let MalObject::Symbol(name) = head {
        match name.as_str() {
            "def!" => return special_forms::apply_def(&argv[1..], env),
            "let*" => return special_forms::apply_let(&argv[1..], env),
            // Any other initial symbol is looked up and applied below.
            _ => (),
        }
    }
    let evaluated = map_seq(argv, |obj| EVAL(obj, env))?;
    match evaluated.split_first() {
        Some((callable, args)) => apply(callable, args),
        None => Ok(ast.clone()),
    }
}

pub fn apply(callable: &MalObject, args: &[MalObject]) -> Result {
    match callable {
        MalObject::Function(f) => call_primitive(f, args),
        other => Err(Error::NotCallable(other.to_string())),
    }
}

pub fn evaluate_ast(ast: &MalObject, env: &Rc<Environment>) -> Result {
    log::trace!("evaluate_ast {}", ast);
    match ast {
        MalObject::Symbol(s) => Ok(env.fetch(s)?),
        _ => ast
            .map_elements(|element| EVAL(element, env))
            .unwrap_or_else(|| Ok(ast.clone())),
    }
}

pub(crate) fn pretty_print_args(args: &[MalObject]) -> String {
    match args.len() {
        0 => "no args".into(),
        1 => args[0].to_string(),
        _ => format!("\n\t{}", args.iter().join("\n\t")),
    }
}

pub fn call_primitive(func: &PrimitiveFn, args: &[MalObject]) -> Result {
    func.arity
        .validate_for(args.len(), func.name)
        .map_err(Error::BadArgCount)?;
    log::trace!("Call {} with {}", func.name, pretty_print_args(args));
    let result = (func.fn_ptr)(args);
    match &result {
        Ok(val) => log::trace!("Call to {} resulted in {}", func.name, val),
        Err(e) => log::trace!("Call to {} failed: {}", func.name, e),
    }
    result
}
