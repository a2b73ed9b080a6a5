use alloc::{
    collections::{BTreeMap, BTreeSet},
    vec::Vec,
};
use tracing::{debug, debug_span, error};

use crate::{dependency::WrapperKind, errors::ValidateErrorKind, key::ComponentKey, provider::Provider};

/// Depth-first walk over every binding, run once before a context is produced.
///
/// `visiting` is the current path of direct dependencies. Revisiting a key on it reports every key on the path,
/// including the chain that leads into the cycle. Deferred edges are only checked for existence.
pub(crate) struct GraphValidator<'a> {
    bindings: &'a BTreeMap<ComponentKey, Provider>,
    validated: BTreeSet<&'a ComponentKey>,
    visiting: Vec<&'a ComponentKey>,
}

impl<'a> GraphValidator<'a> {
    #[inline]
    pub(crate) fn new(bindings: &'a BTreeMap<ComponentKey, Provider>) -> Self {
        Self {
            bindings,
            validated: BTreeSet::new(),
            visiting: Vec::new(),
        }
    }

    /// Validates the bindings in the given order, stopping at the first error
    pub(crate) fn validate<'k>(mut self, order: impl IntoIterator<Item = &'k ComponentKey>) -> Result<(), ValidateErrorKind> {
        let span = debug_span!("validate", bindings = self.bindings.len());
        let _guard = span.enter();

        for key in order {
            let Some((key, provider)) = self.bindings.get_key_value(key) else {
                continue;
            };
            if self.validated.contains(key) {
                continue;
            }

            self.visiting.push(key);
            self.visit(key, provider)?;
            self.visiting.pop();
        }

        debug!("Validated");
        Ok(())
    }

    fn visit(&mut self, component: &'a ComponentKey, provider: &'a Provider) -> Result<(), ValidateErrorKind> {
        let span = debug_span!("visit", component = %component);
        let _guard = span.enter();

        for dependency in provider.dependencies() {
            let Some((key, dependency_provider)) = self.bindings.get_key_value(&dependency.key) else {
                let err = ValidateErrorKind::DependencyNotFound {
                    component: component.clone(),
                    dependency: dependency.key.clone(),
                };
                error!("{}", err);
                return Err(err);
            };

            if dependency.kind == WrapperKind::Deferred {
                continue;
            }

            if self.visiting.contains(&key) {
                let err = ValidateErrorKind::CyclicDependency {
                    components: self.visiting.iter().map(|&key| key.clone()).collect(),
                };
                error!("{}", err);
                return Err(err);
            }
            if self.validated.contains(key) {
                continue;
            }

            self.visiting.push(key);
            self.visit(key, dependency_provider)?;
            self.visiting.pop();
        }

        self.validated.insert(component);
        Ok(())
    }
}
