use alloc::{boxed::Box, collections::BTreeMap, sync::Arc, vec::Vec};
use tracing::{debug, error, warn};

use crate::{
    any::TypeInfo,
    config::Config,
    context::Context,
    errors::{BindErrorKind, ValidateErrorKind},
    implements::Implements,
    injection::InjectionProvider,
    introspect::Introspect,
    key::{ComponentKey, Qualifier},
    provider::{InstanceProvider, Provider},
    validator::GraphValidator,
};

/// Binding registry, filled during configuration and turned into a [`Context`] by [`Registry::finalize`].
///
/// A key holds at most one provider. Binding a key again replaces the previous provider (last write wins),
/// but the key keeps its original position in the validation order.
#[derive(Default)]
pub struct Registry {
    bindings: BTreeMap<ComponentKey, Provider>,
    order: Vec<ComponentKey>,
    config: Config,
}

impl Registry {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self {
            bindings: BTreeMap::new(),
            order: Vec::new(),
            config,
        }
    }

    /// Binds a component type to a fixed value, returned as is by every resolution
    #[inline]
    pub fn bind_instance<C>(&mut self, instance: Arc<C>) -> &mut Self
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.add_provider(ComponentKey::of::<C>(), Provider::Instance(InstanceProvider::new(instance)));
        self
    }

    #[inline]
    pub fn bind_qualified_instance<C>(&mut self, qualifier: Qualifier, instance: Arc<C>) -> &mut Self
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.add_provider(ComponentKey::qualified::<C>(qualifier), Provider::Instance(InstanceProvider::new(instance)));
        self
    }

    /// Binds a component type to an implementation constructed through its injection points.
    ///
    /// # Errors
    /// Returns [`BindErrorKind::IllegalComponent`] if the implementation can't be constructed by injection.
    /// The registry is left unchanged in this case.
    pub fn bind_type<C, I>(&mut self) -> Result<&mut Self, BindErrorKind>
    where
        C: ?Sized + Send + Sync + 'static,
        I: Introspect + Implements<C>,
    {
        self.bind_type_with_key::<C, I>(ComponentKey::of::<C>())
    }

    /// # Errors
    /// Returns [`BindErrorKind::IllegalComponent`] if the implementation can't be constructed by injection.
    /// The registry is left unchanged in this case.
    pub fn bind_qualified_type<C, I>(&mut self, qualifier: Qualifier) -> Result<&mut Self, BindErrorKind>
    where
        C: ?Sized + Send + Sync + 'static,
        I: Introspect + Implements<C>,
    {
        self.bind_type_with_key::<C, I>(ComponentKey::qualified::<C>(qualifier))
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Validates every binding and produces the context.
    ///
    /// # Errors
    /// - Returns [`ValidateErrorKind::DependencyNotFound`] if a declared dependency isn't bound
    /// - Returns [`ValidateErrorKind::CyclicDependency`] if direct dependencies form a cycle
    pub fn finalize(self) -> Result<Context, ValidateErrorKind> {
        GraphValidator::new(&self.bindings).validate(&self.order)?;
        Ok(Context::new(self.bindings, self.config))
    }
}

impl Registry {
    fn bind_type_with_key<C, I>(&mut self, key: ComponentKey) -> Result<&mut Self, BindErrorKind>
    where
        C: ?Sized + Send + Sync + 'static,
        I: Introspect + Implements<C>,
    {
        match InjectionProvider::<C, I>::new() {
            Ok(provider) => {
                self.add_provider(key, Provider::Constructor(Box::new(provider)));
                Ok(self)
            }
            Err(reason) => {
                let err = BindErrorKind::IllegalComponent {
                    implementation: TypeInfo::of::<I>(),
                    reason,
                };
                error!(component = %key, "{}", err);
                Err(err)
            }
        }
    }

    pub(crate) fn add_provider(&mut self, key: ComponentKey, provider: Provider) -> Option<Provider> {
        let implementation = provider.implementation();
        let previous = self.bindings.insert(key.clone(), provider);
        if previous.is_some() {
            warn!(component = %key, implementation = %implementation, "Binding replaced");
        } else {
            debug!(component = %key, implementation = %implementation, "Bound");
            self.order.push(key);
        }
        previous
    }
}
