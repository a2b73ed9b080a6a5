use alloc::sync::Arc;
use core::{
    fmt::{self, Debug, Formatter},
    marker::PhantomData,
};

use crate::{context::Context, errors::ResolveErrorKind, key::ComponentKey};

/// Zero-argument factory for a component, handed out for [`crate::WrapperKind::Deferred`] dependencies.
///
/// Nothing is constructed until [`Deferred::get`] is called, and every call performs
/// a fresh direct resolution against the context the factory came from.
pub struct Deferred<C: ?Sized> {
    context: Context,
    key: ComponentKey,
    _component: PhantomData<fn() -> Arc<C>>,
}

impl<C: ?Sized> Clone for Deferred<C> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
            key: self.key.clone(),
            _component: PhantomData,
        }
    }
}

impl<C: ?Sized> Debug for Deferred<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred").field("key", &self.key).finish_non_exhaustive()
    }
}

impl<C> Deferred<C>
where
    C: ?Sized + Send + Sync + 'static,
{
    #[inline]
    pub(crate) fn new(context: Context, key: ComponentKey) -> Self {
        Self {
            context,
            key,
            _component: PhantomData,
        }
    }

    #[inline]
    #[must_use]
    pub fn key(&self) -> &ComponentKey {
        &self.key
    }

    /// Resolves the component now
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::NotFound`] if the key isn't bound
    /// - Returns any error raised while constructing the component
    pub fn get(&self) -> Result<Arc<C>, ResolveErrorKind> {
        self.context.resolve_key::<C>(&self.key)?.ok_or_else(|| ResolveErrorKind::NotFound { key: self.key.clone() })
    }
}
