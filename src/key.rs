use alloc::borrow::Cow;
use core::fmt::{self, Display, Formatter};

use crate::any::TypeInfo;

/// Discriminator between several bindings of one component type.
///
/// Two qualifiers are equal iff both their kind and their value are equal,
/// so `Qualifier::named("main")` never matches a custom qualifier with the same value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Qualifier {
    kind: &'static str,
    value: Cow<'static, str>,
}

impl Qualifier {
    const NAMED: &'static str = "named";

    #[inline]
    #[must_use]
    pub fn new(kind: &'static str, value: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    #[inline]
    #[must_use]
    pub fn named(value: impl Into<Cow<'static, str>>) -> Self {
        Self::new(Self::NAMED, value)
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    #[inline]
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl Display for Qualifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "@{}(\"{}\")", self.kind, self.value)
    }
}

/// Key of a binding: a component type plus an optional qualifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentKey {
    pub type_info: TypeInfo,
    pub qualifier: Option<Qualifier>,
}

impl ComponentKey {
    #[inline]
    #[must_use]
    pub const fn new(type_info: TypeInfo, qualifier: Option<Qualifier>) -> Self {
        Self { type_info, qualifier }
    }

    #[inline]
    #[must_use]
    pub fn of<C: ?Sized + 'static>() -> Self {
        Self::new(TypeInfo::of::<C>(), None)
    }

    #[inline]
    #[must_use]
    pub fn qualified<C: ?Sized + 'static>(qualifier: Qualifier) -> Self {
        Self::new(TypeInfo::of::<C>(), Some(qualifier))
    }
}

impl Display for ComponentKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(qualifier) => write!(f, "{} {}", self.type_info, qualifier),
            None => write!(f, "{}", self.type_info),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ComponentKey, Qualifier};

    use alloc::string::String;

    trait Engine {}

    #[test]
    fn test_qualifier_equality() {
        assert_eq!(Qualifier::named("main"), Qualifier::named(String::from("main")));
        assert_ne!(Qualifier::named("main"), Qualifier::named("backup"));
        assert_ne!(Qualifier::named("main"), Qualifier::new("skywalker", "main"));
    }

    #[test]
    fn test_key_distinguishes_qualifier() {
        let plain = ComponentKey::of::<dyn Engine>();
        let named = ComponentKey::qualified::<dyn Engine>(Qualifier::named("v8"));

        assert_ne!(plain, named);
        assert_eq!(named, ComponentKey::qualified::<dyn Engine>(Qualifier::named("v8")));
        assert_eq!(plain.type_info, named.type_info);
    }
}
