use alloc::{collections::BTreeMap, sync::Arc};
use tracing::{debug, error, info_span};

use crate::{
    any::{BoxedAny, TypeInfo},
    arguments::Injected,
    config::Config,
    deferred::Deferred,
    dependency::{Dependency, WrapperKind},
    errors::ResolveErrorKind,
    key::{ComponentKey, Qualifier},
    provider::Provider,
};

/// Outcome of [`Context::resolve`], shaped by the requested [`WrapperKind`]
pub enum Resolved<C: ?Sized> {
    Direct(Arc<C>),
    Deferred(Deferred<C>),
}

pub(crate) struct ContextInner {
    bindings: BTreeMap<ComponentKey, Provider>,
    #[cfg_attr(not(feature = "std"), allow(dead_code))]
    config: Config,
}

/// Validated, read-only view of a registry.
///
/// Cloning is cheap and every clone shares the same bindings. Instance bindings always return
/// the registered value, type bindings construct a new instance on every direct resolution.
#[derive(Clone)]
pub struct Context {
    inner: Arc<ContextInner>,
}

impl Context {
    #[inline]
    pub(crate) fn new(bindings: BTreeMap<ComponentKey, Provider>, config: Config) -> Self {
        Self {
            inner: Arc::new(ContextInner { bindings, config }),
        }
    }

    /// Resolves a component by type and optional qualifier.
    ///
    /// Returns `Ok(None)` if the key isn't bound. For [`WrapperKind::Deferred`] nothing is constructed,
    /// the returned factory resolves the same key each time it is invoked.
    ///
    /// # Errors
    /// Returns any error raised while constructing the component or its dependencies
    pub fn resolve<C>(&self, qualifier: Option<&Qualifier>, kind: WrapperKind) -> Result<Option<Resolved<C>>, ResolveErrorKind>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let key = ComponentKey::new(TypeInfo::of::<C>(), qualifier.cloned());
        match kind {
            WrapperKind::Direct => Ok(self.resolve_key(&key)?.map(Resolved::Direct)),
            WrapperKind::Deferred => Ok(self.deferred(key).map(Resolved::Deferred)),
        }
    }

    /// Gets a component bound without a qualifier
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::NotFound`] if the component isn't bound
    /// - Returns any error raised while constructing the component or its dependencies
    pub fn get<C>(&self) -> Result<Arc<C>, ResolveErrorKind>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.get_by_key(ComponentKey::of::<C>())
    }

    /// Gets a component bound with the given qualifier
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::NotFound`] if the component isn't bound with this qualifier
    /// - Returns any error raised while constructing the component or its dependencies
    pub fn get_qualified<C>(&self, qualifier: &Qualifier) -> Result<Arc<C>, ResolveErrorKind>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.get_by_key(ComponentKey::qualified::<C>(qualifier.clone()))
    }

    /// Gets a factory for a component, or `None` if it isn't bound
    #[must_use]
    pub fn get_deferred<C>(&self, qualifier: Option<&Qualifier>) -> Option<Deferred<C>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.deferred(ComponentKey::new(TypeInfo::of::<C>(), qualifier.cloned()))
    }

    #[inline]
    #[must_use]
    pub fn contains<C: ?Sized + 'static>(&self, qualifier: Option<&Qualifier>) -> bool {
        self.inner
            .bindings
            .contains_key(&ComponentKey::new(TypeInfo::of::<C>(), qualifier.cloned()))
    }

    /// Dependencies declared by a binding: constructor parameters, then fields, then method parameters.
    /// Instance bindings have none.
    #[inline]
    #[must_use]
    pub fn dependencies(&self, key: &ComponentKey) -> Option<&[Dependency]> {
        self.inner.bindings.get(key).map(Provider::dependencies)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.bindings.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.bindings.is_empty()
    }
}

impl Context {
    fn get_by_key<C>(&self, key: ComponentKey) -> Result<Arc<C>, ResolveErrorKind>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        match self.resolve_key(&key)? {
            Some(component) => Ok(component),
            None => {
                let err = ResolveErrorKind::NotFound { key };
                error!("{}", err);
                Err(err)
            }
        }
    }

    #[inline]
    fn deferred<C>(&self, key: ComponentKey) -> Option<Deferred<C>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.inner
            .bindings
            .contains_key(&key)
            .then(|| Deferred::new(self.clone(), key))
    }

    pub(crate) fn resolve_key<C>(&self, key: &ComponentKey) -> Result<Option<Arc<C>>, ResolveErrorKind>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let Some(provider) = self.inner.bindings.get(key) else {
            debug!(component = %key, "Not bound");
            return Ok(None);
        };

        // Providers store `Arc<C>` for the `C` their key is typed by, and every key reaching here is built from `C`,
        // so the downcast holds. The error arm only guards that invariant.
        match self.provide(key, provider)?.downcast::<Arc<C>>() {
            Ok(component) => Ok(Some(*component)),
            Err(_) => {
                let err = ResolveErrorKind::IncorrectType {
                    expected: TypeInfo::of::<C>(),
                    actual: provider.implementation(),
                };
                error!("{}", err);
                Err(err)
            }
        }
    }

    /// Resolves one declared dependency for an injection point. The value stays type-erased until it's taken.
    pub(crate) fn resolve_dependency(&self, dependency: &Dependency) -> Result<Option<Injected>, ResolveErrorKind> {
        let Some(provider) = self.inner.bindings.get(&dependency.key) else {
            return Ok(None);
        };

        match dependency.kind {
            WrapperKind::Direct => Ok(Some(Injected::Value {
                type_info: dependency.key.type_info,
                value: self.provide(&dependency.key, provider)?,
            })),
            WrapperKind::Deferred => Ok(Some(Injected::Deferred {
                context: self.clone(),
                key: dependency.key.clone(),
            })),
        }
    }

    fn provide(&self, key: &ComponentKey, provider: &Provider) -> Result<BoxedAny, ResolveErrorKind> {
        let span = info_span!("resolve", component = %key.type_info, qualifier = ?key.qualifier);
        let _guard = span.enter();

        #[cfg(feature = "std")]
        let _construction = match provider {
            Provider::Constructor(_) if self.inner.config.runtime_cycle_detection => {
                Some(crate::guard::ConstructionGuard::enter(self.id(), key)?)
            }
            _ => None,
        };

        let component = provider.provide(self)?;
        debug!("Resolved");
        Ok(component)
    }

    #[cfg(feature = "std")]
    #[inline]
    fn id(&self) -> usize {
        Arc::as_ptr(&self.inner) as usize
    }
}
