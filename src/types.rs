use crate::{evaluator, printer};
use derive_more::{Deref, DerefMut, Display};
use itertools::Itertools;
use std::collections::HashMap;
use std::fmt;
use std::fmt::Formatter;
use std::ops::{RangeFrom, RangeInclusive};
use std::rc::Rc;

#[derive(Deref, DerefMut, Debug, Default)]
pub struct MalList(pub Vec<MalObject>);
#[derive(Deref, DerefMut, Debug, Default)]
pub struct MalVector(pub Vec<MalObject>);

#[derive(Deref, DerefMut, Debug, Default)]
pub struct MalMap(pub HashMap<MalString, MalObject>);
pub type MalInt = i64;
pub type MalFloat = f64;

#[derive(Deref, Display, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub struct MalSymbol(pub String);

impl AsRef<str> for MalSymbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MalSymbol {
    fn from(name: &str) -> Self {
        MalSymbol(String::from(name))
    }
}

/// Text value. Keywords are strings too; they differ only in how they print.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct MalString {
    text: String,
    keyword: bool,
}

impl MalString {
    pub fn new<T: Into<String>>(text: T) -> Self {
        Self {
            text: text.into(),
            keyword: false,
        }
    }

    pub fn keyword<T: Into<String>>(name: T) -> Self {
        Self {
            text: name.into(),
            keyword: true,
        }
    }

    pub fn is_keyword(&self) -> bool {
        self.keyword
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone)]
pub enum Arity {
    Between(RangeInclusive<usize>),
    AtLeast(RangeFrom<usize>),
}

#[derive(Debug)]
pub struct BadArgCount {
    name: &'static str,
    expected: Arity,
    got: usize,
}

impl fmt::Display for BadArgCount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "When evaluating {} expected {} arguments, but received {} arguments",
            self.name, self.expected, self.got
        )
    }
}

impl Arity {
    pub const fn exactly(n: usize) -> Self {
        Self::Between(n..=n)
    }

    pub const fn at_least(n: usize) -> Self {
        Self::AtLeast(n..)
    }

    pub(crate) fn contains(&self, n: usize) -> bool {
        match self {
            Self::Between(range) => range.contains(&n),
            Self::AtLeast(range) => range.contains(&n),
        }
    }

    pub(crate) fn validate_for(&self, n: usize, name: &'static str) -> Result<(), BadArgCount> {
        match self.contains(n) {
            true => Ok(()),
            false => Err(BadArgCount {
                name,
                expected: self.clone(),
                got: n,
            }),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Between(r) => {
                if r.start() == r.end() {
                    write!(f, "exactly {}", r.start())
                } else {
                    write!(f, "from {} to {}", r.start(), r.end())
                }
            }
            Arity::AtLeast(r) => write!(f, "at least {}", r.start),
        }
    }
}

pub struct PrimitiveFn {
    pub name: &'static str,
    pub arity: Arity,
    pub fn_ptr: fn(&[MalObject]) -> evaluator::Result,
}

impl fmt::Debug for PrimitiveFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "primitive function #<{}>", self.name)
    }
}

#[derive(Debug, Clone)]
pub enum MalObject {
    Nil,
    Integer(MalInt),
    Float(MalFloat),
    Bool(bool),
    String(MalString),
    Symbol(MalSymbol),
    List(Rc<MalList>),
    Vector(Rc<MalVector>),
    Map(Rc<MalMap>),
    Function(&'static PrimitiveFn),
}

impl fmt::Display for MalObject {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", printer::pr_str(self))
    }
}

/// Wrong variant for the operation; carries the offending value as printed.
#[derive(Debug)]
pub enum TypeMismatch {
    NotAnInt(String),
    NotASequence(String),
    NotASymbol(String),
}

impl fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TypeMismatch::NotAnInt(got) => write!(f, "expected an integer, got {}", got),
            TypeMismatch::NotASequence(got) => {
                write!(f, "expected a list or vector, got {}", got)
            }
            TypeMismatch::NotASymbol(got) => write!(f, "expected a symbol, got {}", got),
        }
    }
}

impl MalObject {
    pub(crate) fn as_int(&self) -> Result<MalInt, TypeMismatch> {
        match self {
            MalObject::Integer(x) => Ok(*x),
            _ => Err(TypeMismatch::NotAnInt(self.to_string())),
        }
    }

    pub(crate) fn as_seq(&self) -> Result<&[MalObject], TypeMismatch> {
        match self {
            MalObject::List(x) => Ok(x),
            MalObject::Vector(x) => Ok(x),
            _ => Err(TypeMismatch::NotASequence(self.to_string())),
        }
    }

    pub(crate) fn as_symbol(&self) -> Result<&MalSymbol, TypeMismatch> {
        match self {
            MalObject::Symbol(s) => Ok(s),
            _ => Err(TypeMismatch::NotASymbol(self.to_string())),
        }
    }

    /// Rebuild a collection with `f` applied to every element, or to every
    /// value in the case of a map. Returns `None` for anything that isn't a
    /// collection.
    pub(crate) fn map_elements<E>(
        &self,
        mut f: impl FnMut(&MalObject) -> Result<MalObject, E>,
    ) -> Option<Result<MalObject, E>> {
        let mapped = match self {
            MalObject::List(list) => map_seq(list, &mut f).map(MalObject::wrap_list),
            MalObject::Vector(vec) => map_seq(vec, &mut f).map(MalObject::wrap_vector),
            MalObject::Map(map) => map
                .iter()
                .map(|(key, value)| f(value).map(|value| (key.clone(), value)))
                .collect::<Result<HashMap<_, _>, E>>()
                .map(MalObject::wrap_map),
            MalObject::Nil
            | MalObject::Integer(_)
            | MalObject::Float(_)
            | MalObject::Bool(_)
            | MalObject::String(_)
            | MalObject::Symbol(_)
            | MalObject::Function(_) => return None,
        };
        Some(mapped)
    }
}

pub(crate) fn map_seq<E>(
    seq: &[MalObject],
    f: impl FnMut(&MalObject) -> Result<MalObject, E>,
) -> Result<Vec<MalObject>, E> {
    seq.iter().map(f).collect()
}

#[derive(Debug)]
pub enum MapError {
    OddEntries(usize),
    UnhashableKey(String),
}

pub(crate) fn build_map(entries: Vec<MalObject>) -> Result<MalObject, MapError> {
    if entries.len() % 2 == 1 {
        return Err(MapError::OddEntries(entries.len()));
    }
    let mut map = HashMap::with_capacity(entries.len() / 2);
    for (key, value) in entries.into_iter().tuples() {
        let key = match key {
            MalObject::String(s) => s,
            other => return Err(MapError::UnhashableKey(other.to_string())),
        };
        // Later duplicates win.
        map.insert(key, value);
    }
    Ok(MalObject::wrap_map(map))
}

impl MalObject {
    pub fn new_list() -> Self {
        Self::List(Rc::new(MalList(Vec::new())))
    }
    pub fn wrap_list(elements: Vec<MalObject>) -> Self {
        Self::List(Rc::new(MalList(elements)))
    }
    pub fn wrap_vector(elements: Vec<MalObject>) -> Self {
        Self::Vector(Rc::new(MalVector(elements)))
    }
    pub fn wrap_map(entries: HashMap<MalString, MalObject>) -> Self {
        Self::Map(Rc::new(MalMap(entries)))
    }
    pub fn new_symbol(name: &str) -> Self {
        Self::Symbol(MalSymbol::from(name))
    }
    pub fn new_string(text: &str) -> Self {
        Self::String(MalString::new(text))
    }
    pub fn new_keyword(name: &str) -> Self {
        Self::String(MalString::keyword(name))
    }
}

impl PartialEq for MalObject {
    fn eq(&self, other: &Self) -> bool {
        use MalObject::*;
        match (self, other) {
            (List(x), List(y)) => equal_sequences(x, y),
            (List(x), Vector(y)) => equal_sequences(x, y),
            (Vector(x), List(y)) => equal_sequences(x, y),
            (Vector(x), Vector(y)) => equal_sequences(x, y),
            (Integer(x), Integer(y)) => x == y,
            (Float(x), Float(y)) => x == y,
            (Bool(x), Bool(y)) => x == y,
            (String(x), String(y)) => x == y,
            (Symbol(x), Symbol(y)) => x == y,
            (Map(x), Map(y)) => x.0 == y.0,
            (Function(x), Function(y)) => std::ptr::eq(*x, *y),
            (Nil, Nil) => true,
            (_, _) => false,
        }
    }
}

fn equal_sequences(xs: &[MalObject], ys: &[MalObject]) -> bool {
    xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| x == y)
}
