//! # Directive Lifecycle
//!
//! A host framework drives a directive with calls of the shape
//! `{ value, old_value, modifiers }` ([`DirectiveBinding`]). Every call is a
//! full clear-then-rewrite: the old binding's attributes are removed, then the
//! new binding is written with the directive's defaults merged with the call's
//! modifiers. Old and new keys are never diffed. Modifiers can't move the
//! prefix, so the old attributes are always named the way they were written.
//!
//! ```text
//!            update(b1)            update(b2)
//!  Unbound ─────────────▶ Bound(b1) ─────────▶ Bound(b2)
//!     ▲                                          │
//!     └──────────────────── unbind ──────────────┘
//! ```
//!
//! [`Directive`] is the seam to the host. [`BoundElement`] keeps the state
//! machine for hosts that don't hand back the previous value themselves.

use crate::binding::Binding;
use crate::error::Result;
use crate::options::{Modifiers, Options};
use crate::sync::{self, SyncReport};
use crate::target::AttributeTarget;
use tracing::debug;

/// One invocation from the host framework.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectiveBinding {
    pub value: Binding,
    pub old_value: Option<Binding>,
    pub modifiers: Modifiers,
}

impl DirectiveBinding {
    pub fn new(value: Binding) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }

    pub fn with_old_value(mut self, old_value: Binding) -> Self {
        self.old_value = Some(old_value);
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Host-agnostic directive interface.
pub trait Directive {
    /// Options captured at installation.
    fn defaults(&self) -> &Options;

    fn on_bind(
        &self,
        target: &mut dyn AttributeTarget,
        binding: &Binding,
        options: &Options,
    ) -> Result<SyncReport>;

    fn on_unbind(
        &self,
        target: &mut dyn AttributeTarget,
        binding: &Binding,
        options: &Options,
    ) -> Result<()>;

    /// Clear `old_value` if present, then bind `value`.
    fn update(
        &self,
        target: &mut dyn AttributeTarget,
        call: &DirectiveBinding,
    ) -> Result<SyncReport> {
        let options = self.defaults().merged_call(&call.modifiers);
        if let Some(old) = &call.old_value {
            self.on_unbind(target, old, &options)?;
        }
        self.on_bind(target, &call.value, &options)
    }
}

/// The `data-*` directive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataDirective {
    defaults: Options,
}

impl DataDirective {
    pub fn new(defaults: Options) -> Self {
        Self { defaults }
    }
}

impl Directive for DataDirective {
    fn defaults(&self) -> &Options {
        &self.defaults
    }

    fn on_bind(
        &self,
        target: &mut dyn AttributeTarget,
        binding: &Binding,
        options: &Options,
    ) -> Result<SyncReport> {
        debug!(prefix = %options.name, keys = binding.len(), "binding");
        sync::synchronize(target, binding, options)
    }

    fn on_unbind(
        &self,
        target: &mut dyn AttributeTarget,
        binding: &Binding,
        options: &Options,
    ) -> Result<()> {
        debug!(prefix = %options.name, keys = binding.len(), "unbinding");
        sync::clear(target, binding, options)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DirectiveState {
    #[default]
    Unbound,
    /// The applied binding and the effective options it was written with.
    Bound(Binding, Options),
}

impl DirectiveState {
    pub fn binding(&self) -> Option<&Binding> {
        match self {
            DirectiveState::Unbound => None,
            DirectiveState::Bound(binding, _) => Some(binding),
        }
    }

    pub fn options(&self) -> Option<&Options> {
        match self {
            DirectiveState::Unbound => None,
            DirectiveState::Bound(_, options) => Some(options),
        }
    }
}

/// A target paired with its directive and the last binding applied to it.
pub struct BoundElement<T, D = DataDirective> {
    target: T,
    directive: D,
    state: DirectiveState,
}

impl<T: AttributeTarget, D: Directive> BoundElement<T, D> {
    pub fn new(target: T, directive: D) -> Self {
        Self {
            target,
            directive,
            state: DirectiveState::Unbound,
        }
    }

    /// Apply `value`, clearing whatever the previous update wrote.
    /// On error the previous binding is kept as the current state.
    pub fn update(&mut self, value: Binding, modifiers: Modifiers) -> Result<SyncReport> {
        if let DirectiveState::Bound(old, written_with) = &self.state {
            self.directive
                .on_unbind(&mut self.target, old, written_with)?;
        }
        let options = self.directive.defaults().merged_call(&modifiers);
        let report = self.directive.on_bind(&mut self.target, &value, &options)?;
        self.state = DirectiveState::Bound(value, options);
        Ok(report)
    }

    /// Remove the current binding's attributes and go back to `Unbound`.
    pub fn unbind(&mut self) -> Result<()> {
        if let DirectiveState::Bound(binding, written_with) = &self.state {
            self.directive
                .on_unbind(&mut self.target, binding, written_with)?;
        }
        self.state = DirectiveState::Unbound;
        Ok(())
    }

    pub fn state(&self) -> &DirectiveState {
        &self.state
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn into_target(self) -> T {
        self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::ElementAttributes;
    use crate::value::Value;

    fn prefixed(name: &str) -> DataDirective {
        DataDirective::new(Options::default().merged(&Modifiers::new().with_name(name)))
    }

    #[test]
    fn first_update_only_binds() {
        let directive = DataDirective::default();
        let mut el = ElementAttributes::new();
        el.set_attribute("data-other", "x").unwrap();

        let call = DirectiveBinding::new(Binding::new().with("a", 1));
        directive.update(&mut el, &call).unwrap();

        assert_eq!(el.get("data-a"), Some("1"));
        assert_eq!(el.get("data-other"), Some("x"));
    }

    #[test]
    fn update_clears_old_value_first() {
        let directive = DataDirective::default();
        let mut el = ElementAttributes::new();
        let old = Binding::new().with("a", 1).with("b", 2);
        directive
            .update(&mut el, &DirectiveBinding::new(old.clone()))
            .unwrap();

        let call = DirectiveBinding::new(Binding::new().with("b", 5)).with_old_value(old);
        directive.update(&mut el, &call).unwrap();

        assert!(!el.contains("data-a"));
        assert_eq!(el.get("data-b"), Some("5"));
    }

    #[test]
    fn modifiers_apply_to_one_call_only() {
        let directive = DataDirective::default();
        let mut el = ElementAttributes::new();

        let call = DirectiveBinding::new(Binding::new().with("flag", true))
            .with_modifiers(Modifiers::from_flags(["bools"]));
        directive.update(&mut el, &call).unwrap();
        assert_eq!(el.get("data-flag"), Some("true"));

        let call = DirectiveBinding::new(Binding::new().with("flag", true));
        directive.update(&mut el, &call).unwrap();
        assert_eq!(el.get("data-flag"), Some("1"));
        assert_eq!(directive.defaults(), &Options::default());
    }

    #[test]
    fn bound_element_tracks_state() {
        let mut bound = BoundElement::new(ElementAttributes::new(), prefixed("x"));
        assert_eq!(bound.state(), &DirectiveState::Unbound);

        let first = Binding::new().with("a", 1);
        bound.update(first.clone(), Modifiers::new()).unwrap();
        assert_eq!(bound.state().binding(), Some(&first));
        assert_eq!(bound.state().options().map(|o| o.name.as_str()), Some("x"));

        bound
            .update(Binding::new().with("b", 2), Modifiers::new())
            .unwrap();
        assert!(!bound.target().contains("x-a"));
        assert_eq!(bound.target().get("x-b"), Some("2"));
    }

    #[test]
    fn bound_element_unbind_clears() {
        let mut bound = BoundElement::new(ElementAttributes::new(), DataDirective::default());
        bound
            .update(Binding::new().with("a", 1).with("b", "z"), Modifiers::new())
            .unwrap();
        bound.unbind().unwrap();

        assert_eq!(bound.state(), &DirectiveState::Unbound);
        assert!(bound.into_target().is_empty());
    }

    #[test]
    fn failed_update_keeps_previous_state() {
        let mut bound = BoundElement::new(ElementAttributes::new(), DataDirective::default());
        let good = Binding::new().with("a", 1);
        bound.update(good.clone(), Modifiers::new()).unwrap();

        let bad = Binding::new().with("bad key", 1);
        assert!(bound.update(bad, Modifiers::new()).is_err());
        assert_eq!(bound.state().binding(), Some(&good));
    }

    #[test]
    fn prefix_override_does_not_strand_old_attributes() {
        let mut bound = BoundElement::new(ElementAttributes::new(), DataDirective::default());
        bound
            .update(Binding::new().with("a", 1), Modifiers::new().with_name("y"))
            .unwrap();
        bound
            .update(Binding::new().with("b", 2), Modifiers::new())
            .unwrap();

        let attributes: Vec<_> = bound.target().iter().collect();
        assert_eq!(attributes, vec![("data-b", "2")]);
    }

    #[test]
    fn host_driven_update_ignores_prefix_modifier() {
        let directive = DataDirective::default();
        let mut el = ElementAttributes::new();
        let old = Binding::new().with("a", 1);
        let call = DirectiveBinding::new(old.clone()).with_modifiers(Modifiers::new().with_name("y"));
        directive.update(&mut el, &call).unwrap();

        let call = DirectiveBinding::new(Binding::new().with("b", 2)).with_old_value(old);
        directive.update(&mut el, &call).unwrap();

        let attributes: Vec<_> = el.iter().collect();
        assert_eq!(attributes, vec![("data-b", "2")]);
    }

    #[test]
    fn unbind_uses_options_the_binding_was_written_with() {
        let mut bound = BoundElement::new(ElementAttributes::new(), prefixed("x"));
        bound
            .update(Binding::new().with("a", "").with("b", 1), Modifiers::from_flags(["empty"]))
            .unwrap();
        assert_eq!(bound.target().len(), 2);

        bound.unbind().unwrap();
        assert!(bound.target().is_empty());
    }

    #[test]
    fn empty_modifier_writes_blank_values() {
        let mut bound = BoundElement::new(ElementAttributes::new(), DataDirective::default());
        bound
            .update(
                Binding::new().with("gone", Value::Empty),
                Modifiers::from_flags(["empty"]),
            )
            .unwrap();
        assert_eq!(bound.target().get("data-gone"), Some(""));
    }
}
