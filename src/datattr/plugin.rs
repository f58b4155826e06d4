use crate::directive::{DataDirective, Directive};
use crate::error::{DatattrError, Result};
use crate::options::{Options, PluginConfig};
use std::collections::HashMap;
use tracing::{info, warn};

/// A host framework that directives can be registered on.
pub trait DirectiveHost {
    /// Register `directive` under `name`, returning the directive it replaced.
    fn register_directive(
        &mut self,
        name: &str,
        directive: Box<dyn Directive>,
    ) -> Option<Box<dyn Directive>>;
}

/// In-memory host: a name → directive table.
#[derive(Default)]
pub struct DirectiveRegistry {
    directives: HashMap<String, Box<dyn Directive>>,
}

impl DirectiveRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&dyn Directive> {
        self.directives.get(name).map(|d| d.as_ref())
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.directives.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl DirectiveHost for DirectiveRegistry {
    fn register_directive(
        &mut self,
        name: &str,
        directive: Box<dyn Directive>,
    ) -> Option<Box<dyn Directive>> {
        self.directives.insert(name.to_string(), directive)
    }
}

/// Resolve `config` against the defaults and register a [`DataDirective`]
/// named after the resulting prefix. Returns the options the directive uses.
pub fn install<H: DirectiveHost + ?Sized>(
    host: &mut H,
    config: impl Into<PluginConfig>,
) -> Result<Options> {
    let options = config.into().resolve(&Options::default());
    if options.name.is_empty() {
        return Err(DatattrError::Config(
            "Directive name cannot be empty".to_string(),
        ));
    }

    let directive = Box::new(DataDirective::new(options.clone()));
    if host.register_directive(&options.name, directive).is_some() {
        warn!(name = %options.name, "replaced an existing directive");
    }
    info!(
        name = %options.name,
        empty = options.empty,
        bools = options.bools,
        "directive installed"
    );
    Ok(options)
}
