use crate::strings;
use crate::types::{MalObject, MalString};
use itertools::Itertools;

pub fn pr_str(object: &MalObject) -> String {
    match object {
        MalObject::List(elements) => format!("({})", elements.iter().map(pr_str).join(" ")),
        MalObject::Vector(elements) => format!("[{}]", elements.iter().map(pr_str).join(" ")),
        // Map iteration order is whatever the HashMap gives us.
        MalObject::Map(map) => format!(
            "{{{}}}",
            map.iter()
                .map(|(key, value)| format!("{} {}", string_str(key), pr_str(value)))
                .join(" ")
        ),
        MalObject::Integer(value) => value.to_string(),
        MalObject::Float(value) => format!("{:.6}", value),
        MalObject::Bool(value) => value.to_string(),
        MalObject::String(s) => string_str(s),
        MalObject::Symbol(name) => name.0.clone(),
        MalObject::Nil => String::from("nil"),
        MalObject::Function(f) => String::from(f.name),
    }
}

fn string_str(s: &MalString) -> String {
    match s.is_keyword() {
        true => format!(":{}", s.as_str()),
        false => strings::string_repr(s.as_str()),
    }
}
