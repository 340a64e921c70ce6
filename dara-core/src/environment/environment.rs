use std::{cell::RefCell, collections::HashMap, rc::Rc};

use super::prelude::Object;

pub type Env = Rc<RefCell<Environment>>;

#[derive(Default)]
pub struct Environment {
    pub store: HashMap<String, Object>,
    pub outer: Option<Env>,
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names = self.store.keys().collect::<Vec<_>>();
        names.sort();

        f.debug_struct("Environment")
            .field("names", &names)
            .field("enclosed", &self.outer.is_some())
            .finish()
    }
}

impl Environment {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
            outer: None
        }
    }

    /// A fresh top-level environment.
    pub fn new_env() -> Env {
        Rc::new(RefCell::new(Self::new()))
    }

    /// A child scope whose lookups fall back to `outer`.
    pub fn new_enclosed(outer: &Env) -> Env {
        Rc::new(RefCell::new(Self {
            store: HashMap::new(),
            outer: Some(Rc::clone(outer))
        }))
    }

    /// Looks `name` up here, then along the chain of enclosing scopes.
    pub fn get(&self, name: &str) -> Option<Object> {
        match self.store.get(name) {
            Some(value) => Some(value.clone()),
            None => self.outer.as_ref()
                .and_then(|outer| outer.borrow().get(name))
        }
    }

    /// Binds `name` in this scope only and hands the value back.
    pub fn set(&mut self, name: impl Into<String>, value: Object) -> Object {
        self.store.insert(name.into(), value.clone());

        value
    }

    pub fn contains_local(&self, name: &str) -> bool {
        self.store.contains_key(name)
    }
}
