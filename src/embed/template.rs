//! Template types for typed variable injection.

use std::marker::PhantomData;

use crate::utils::hash;

/// Trait for template variable sets
pub trait TemplateVars {
    fn apply(&self, content: &str) -> String;

    /// Returns a string representation of the variables for hash computation.
    /// Override this when the variables are cheaper to hash than the output.
    fn hash_input(&self) -> String {
        String::new()
    }
}

/// Template with typed variable injection
#[derive(Debug, Clone, Copy)]
pub struct Template<V> {
    name: &'static str,
    content: &'static str,
    _marker: PhantomData<V>,
}

impl<V> Template<V> {
    pub const fn new(name: &'static str, content: &'static str) -> Self {
        Self {
            name,
            content,
            _marker: PhantomData,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Raw template text with placeholders.
    pub const fn content(&self) -> &'static str {
        self.content
    }
}

impl<V: TemplateVars> Template<V> {
    pub fn render(&self, vars: &V) -> String {
        vars.apply(self.content)
    }

    /// Content-addressed file name, e.g. `bootstrap-1a2b3c4d.js`.
    ///
    /// Changes whenever the template or its variables change, so hosts can
    /// serve it with long cache lifetimes.
    pub fn file_name(&self, vars: &V, extension: &str) -> String {
        let input = format!("{}{}", self.content, vars.hash_input());
        format!("{}-{}.{}", self.name, hash::fingerprint(&input), extension)
    }
}
