use alloc::{boxed::Box, sync::Arc};

use crate::{
    any::{BoxedAny, TypeInfo},
    context::Context,
    dependency::Dependency,
    errors::ResolveErrorKind,
};

/// Type-erased construction recipe of a type binding
pub(crate) trait ComponentFactory: Send + Sync {
    fn implementation(&self) -> TypeInfo;

    /// Constructor parameters, then fields, then method parameters
    fn dependencies(&self) -> &[Dependency];

    fn provide(&self, context: &Context) -> Result<BoxedAny, ResolveErrorKind>;
}

pub(crate) struct InstanceProvider {
    type_info: TypeInfo,
    clone_instance: Box<dyn Fn() -> BoxedAny + Send + Sync>,
}

impl InstanceProvider {
    #[inline]
    pub(crate) fn new<C>(instance: Arc<C>) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
    {
        Self {
            type_info: TypeInfo::of::<C>(),
            clone_instance: Box::new(move || Box::new(instance.clone()) as BoxedAny),
        }
    }
}

pub(crate) enum Provider {
    Instance(InstanceProvider),
    Constructor(Box<dyn ComponentFactory>),
}

impl Provider {
    #[inline]
    pub(crate) fn implementation(&self) -> TypeInfo {
        match self {
            Self::Instance(provider) => provider.type_info,
            Self::Constructor(factory) => factory.implementation(),
        }
    }

    #[inline]
    pub(crate) fn dependencies(&self) -> &[Dependency] {
        match self {
            Self::Instance(_) => &[],
            Self::Constructor(factory) => factory.dependencies(),
        }
    }

    #[inline]
    pub(crate) fn provide(&self, context: &Context) -> Result<BoxedAny, ResolveErrorKind> {
        match self {
            Self::Instance(provider) => Ok((provider.clone_instance)()),
            Self::Constructor(factory) => factory.provide(context),
        }
    }
}
