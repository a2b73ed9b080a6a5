use alloc::{collections::VecDeque, sync::Arc};
use tracing::error;

use crate::{
    any::{BoxedAny, TypeInfo},
    context::Context,
    deferred::Deferred,
    errors::ResolveErrorKind,
    key::ComponentKey,
};

/// A resolved dependency waiting to be handed to an injection point
pub(crate) enum Injected {
    Value { type_info: TypeInfo, value: BoxedAny },
    Deferred { context: Context, key: ComponentKey },
}

impl Injected {
    #[inline]
    fn type_info(&self) -> TypeInfo {
        match self {
            Self::Value { type_info, .. } => *type_info,
            Self::Deferred { key, .. } => key.type_info,
        }
    }
}

/// Cursor over the dependencies resolved for one injection point, in declaration order
pub struct Arguments {
    implementation: TypeInfo,
    values: VecDeque<Injected>,
}

impl Arguments {
    #[inline]
    pub(crate) fn new(implementation: TypeInfo, values: VecDeque<Injected>) -> Self {
        Self { implementation, values }
    }

    /// Takes the next argument, declared as [`crate::WrapperKind::Direct`]
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::MissingArgument`] if every declared argument is already taken
    /// - Returns [`ResolveErrorKind::IncorrectType`] if the next argument isn't a direct `C`
    pub fn take<C>(&mut self) -> Result<Arc<C>, ResolveErrorKind>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let expected = TypeInfo::of::<C>();
        match self.pop(expected)? {
            Injected::Value { type_info, value } => value.downcast::<Arc<C>>().map(|value| *value).map_err(|_| {
                let err = ResolveErrorKind::IncorrectType {
                    expected,
                    actual: type_info,
                };
                error!("{}", err);
                err
            }),
            Injected::Deferred { key, .. } => {
                let err = ResolveErrorKind::IncorrectType {
                    expected,
                    actual: TypeInfo::of::<Deferred<C>>(),
                };
                error!(dependency = %key, "{}", err);
                Err(err)
            }
        }
    }

    /// Takes the next argument, declared as [`crate::WrapperKind::Deferred`]
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::MissingArgument`] if every declared argument is already taken
    /// - Returns [`ResolveErrorKind::IncorrectType`] if the next argument isn't a deferred `C`
    pub fn take_deferred<C>(&mut self) -> Result<Deferred<C>, ResolveErrorKind>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let expected = TypeInfo::of::<C>();
        match self.pop(expected)? {
            Injected::Deferred { context, key } if key.type_info == expected => Ok(Deferred::new(context, key)),
            injected => {
                let err = ResolveErrorKind::IncorrectType {
                    expected: TypeInfo::of::<Deferred<C>>(),
                    actual: injected.type_info(),
                };
                error!("{}", err);
                Err(err)
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn pop(&mut self, expected: TypeInfo) -> Result<Injected, ResolveErrorKind> {
        self.values.pop_front().ok_or_else(|| {
            let err = ResolveErrorKind::MissingArgument {
                implementation: self.implementation,
                expected,
            };
            error!("{}", err);
            err
        })
    }
}
