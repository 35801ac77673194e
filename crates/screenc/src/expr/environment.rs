use indexmap::IndexMap;
use log::debug;

use super::Value;

/// Named variables visible to every expression of one compile.
///
/// Later writes replace earlier ones.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    variables: IndexMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        debug!(name = name.as_str(), value = value.to_string(); "Setting variable");
        self.variables.insert(name, value);
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}
