use crate::core;
use crate::types::{MalObject, MalSymbol};
use itertools::Itertools;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// One lexical scope. Lookups fall through to `outer` until the global scope,
/// which has none. Children hold their outer scope alive.
#[derive(Default)]
pub struct Environment {
    data: RefCell<HashMap<MalSymbol, MalObject>>,
    outer: Option<Rc<Environment>>,
}

#[derive(Debug)]
pub struct UnknownSymbol(pub MalSymbol);

impl fmt::Display for UnknownSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' not found", self.0)
    }
}

impl Environment {
    /// An empty global scope with no bindings at all.
    pub fn empty() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// The global scope, with the core primitives installed.
    pub fn global() -> Rc<Self> {
        let env = Self::empty();
        for &func in core::PRIMITIVES.iter() {
            env.set(func.name, MalObject::Function(func));
        }
        env
    }

    pub fn spawn_from(outer: &Rc<Environment>) -> Rc<Self> {
        Rc::new(Self {
            data: RefCell::new(HashMap::new()),
            outer: Some(outer.clone()),
        })
    }

    pub fn set<T>(&self, key: T, value: MalObject) -> Option<MalObject>
    where
        T: Into<MalSymbol>,
    {
        self.data.borrow_mut().insert(key.into(), value)
    }

    pub fn get(&self, key: &MalSymbol) -> Option<MalObject> {
        let mut env = self;
        loop {
            if let Some(value) = env.data.borrow().get(key) {
                return Some(value.clone());
            }
            env = env.outer.as_deref()?;
        }
    }

    pub fn fetch(&self, key: &MalSymbol) -> Result<MalObject, UnknownSymbol> {
        self.get(key).ok_or_else(|| UnknownSymbol(key.clone()))
    }

    pub fn contains_locally(&self, key: &MalSymbol) -> bool {
        self.data.borrow().contains_key(key)
    }

    fn depth(&self) -> usize {
        self.outer.as_ref().map_or(0, |outer| outer.depth() + 1)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.data.borrow();
        write!(
            f,
            "<env depth {}: {}>",
            self.depth(),
            data.keys().sorted().join(" ")
        )
    }
}
