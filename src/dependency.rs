use crate::{
    any::TypeInfo,
    key::{ComponentKey, Qualifier},
};

/// How a dependency is delivered to its injection point
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WrapperKind {
    /// The value is required while the dependent is being constructed.
    Direct,
    /// A [`crate::Deferred`] factory is delivered instead; its target is resolved only when the factory is invoked.
    /// Deferred edges never take part in cycle detection.
    Deferred,
}

/// One required dependency of an injection point
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Dependency {
    pub key: ComponentKey,
    pub kind: WrapperKind,
}

impl Dependency {
    #[inline]
    #[must_use]
    pub fn direct<C: ?Sized + 'static>() -> Self {
        Self {
            key: ComponentKey::of::<C>(),
            kind: WrapperKind::Direct,
        }
    }

    #[inline]
    #[must_use]
    pub fn deferred<C: ?Sized + 'static>() -> Self {
        Self {
            key: ComponentKey::of::<C>(),
            kind: WrapperKind::Deferred,
        }
    }

    #[inline]
    #[must_use]
    pub fn qualified(mut self, qualifier: Qualifier) -> Self {
        self.key.qualifier = Some(qualifier);
        self
    }

    #[inline]
    #[must_use]
    pub fn type_info(&self) -> TypeInfo {
        self.key.type_info
    }

    #[inline]
    #[must_use]
    pub fn is_deferred(&self) -> bool {
        self.kind == WrapperKind::Deferred
    }

    /// Part of a method signature contributed by this parameter. Qualifiers don't participate.
    #[inline]
    pub(crate) fn signature(&self) -> (TypeInfo, WrapperKind) {
        (self.key.type_info, self.kind)
    }
}
