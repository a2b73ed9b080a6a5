use alloc::{boxed::Box, vec::Vec};

use crate::{arguments::Arguments, dependency::Dependency, errors::InstantiateErrorKind};

pub(crate) type ConstructFn<T> = Box<dyn Fn(&mut Arguments) -> Result<T, InstantiateErrorKind> + Send + Sync>;
pub(crate) type InjectFn<T> = Box<dyn Fn(&mut T, &mut Arguments) -> Result<(), InstantiateErrorKind> + Send + Sync>;

/// Source of injection metadata for an implementation type.
///
/// The registry never looks inside a type by itself. Whatever knows its shape
/// (a hand-written impl, a code generator) describes it here once, and [`crate::Registry::bind_type`]
/// validates and caches the description.
///
/// # Examples
/// ```rust
/// use joinery::{Constructor, Dependency, Field, Introspect, Level, TypeMetadata};
/// use std::sync::Arc;
///
/// struct Engine;
///
/// struct Car {
///     engine: Arc<Engine>,
///     spare: Option<Arc<Engine>>,
/// }
///
/// impl Introspect for Car {
///     fn introspect() -> TypeMetadata<Self> {
///         TypeMetadata::new()
///             .constructor(Constructor::inject([Dependency::direct::<Engine>()], |args| {
///                 Ok(Car { engine: args.take()?, spare: None })
///             }))
///             .level(Level::new("Car").field(Field::inject("spare", Dependency::direct::<Engine>(), |car: &mut Car, args| {
///                 car.spare = Some(args.take()?);
///                 Ok(())
///             })))
///     }
/// }
/// ```
pub trait Introspect: Sized + Send + Sync + 'static {
    fn introspect() -> TypeMetadata<Self>;
}

pub struct TypeMetadata<T> {
    pub(crate) is_abstract: bool,
    pub(crate) constructors: Vec<Constructor<T>>,
    pub(crate) levels: Vec<Level<T>>,
}

impl<T> Default for TypeMetadata<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TypeMetadata<T> {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            is_abstract: false,
            constructors: Vec::new(),
            levels: Vec::new(),
        }
    }

    /// Marks the described type as not instantiable
    #[inline]
    #[must_use]
    pub fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    #[inline]
    #[must_use]
    pub fn constructor(mut self, constructor: Constructor<T>) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// Adds the next level of the type hierarchy.
    /// The first level is the type itself, the following ones are its ancestors from the nearest to the farthest.
    #[inline]
    #[must_use]
    pub fn level(mut self, level: Level<T>) -> Self {
        self.levels.push(level);
        self
    }
}

pub struct Constructor<T> {
    pub(crate) marked: bool,
    pub(crate) params: Vec<Dependency>,
    pub(crate) factory: ConstructFn<T>,
}

impl<T> Constructor<T> {
    /// Constructor marked as the injection point
    #[inline]
    #[must_use]
    pub fn inject<F>(params: impl IntoIterator<Item = Dependency>, factory: F) -> Self
    where
        F: Fn(&mut Arguments) -> Result<T, InstantiateErrorKind> + Send + Sync + 'static,
    {
        Self {
            marked: true,
            params: params.into_iter().collect(),
            factory: Box::new(factory),
        }
    }

    /// Constructor the type declares without marking it.
    /// Used only as the no-argument fallback, so `params` must be empty for it to be picked.
    #[inline]
    #[must_use]
    pub fn declared<F>(params: impl IntoIterator<Item = Dependency>, factory: F) -> Self
    where
        F: Fn(&mut Arguments) -> Result<T, InstantiateErrorKind> + Send + Sync + 'static,
    {
        Self {
            marked: false,
            params: params.into_iter().collect(),
            factory: Box::new(factory),
        }
    }
}

pub struct Level<T> {
    pub(crate) name: &'static str,
    pub(crate) fields: Vec<Field<T>>,
    pub(crate) methods: Vec<Method<T>>,
}

impl<T> Level<T> {
    #[inline]
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn field(mut self, field: Field<T>) -> Self {
        self.fields.push(field);
        self
    }

    #[inline]
    #[must_use]
    pub fn method(mut self, method: Method<T>) -> Self {
        self.methods.push(method);
        self
    }
}

pub struct Field<T> {
    pub(crate) name: &'static str,
    pub(crate) dependency: Dependency,
    pub(crate) immutable: bool,
    pub(crate) assign: Option<InjectFn<T>>,
}

impl<T> Field<T> {
    /// Field marked for injection. `assign` receives exactly one argument.
    #[inline]
    #[must_use]
    pub fn inject<F>(name: &'static str, dependency: Dependency, assign: F) -> Self
    where
        F: Fn(&mut T, &mut Arguments) -> Result<(), InstantiateErrorKind> + Send + Sync + 'static,
    {
        Self {
            name,
            dependency,
            immutable: false,
            assign: Some(Box::new(assign)),
        }
    }

    #[inline]
    #[must_use]
    pub fn declared(name: &'static str, dependency: Dependency) -> Self {
        Self {
            name,
            dependency,
            immutable: false,
            assign: None,
        }
    }

    /// Marks the field as assignable only once
    #[inline]
    #[must_use]
    pub fn immutable(mut self) -> Self {
        self.immutable = true;
        self
    }

    #[inline]
    pub(crate) fn is_marked(&self) -> bool {
        self.assign.is_some()
    }
}

pub struct Method<T> {
    pub(crate) name: &'static str,
    pub(crate) params: Vec<Dependency>,
    pub(crate) generic: bool,
    pub(crate) invoke: Option<InjectFn<T>>,
}

impl<T> Method<T> {
    /// Method marked for injection, called once per construction after the fields are assigned
    #[inline]
    #[must_use]
    pub fn inject<F>(name: &'static str, params: impl IntoIterator<Item = Dependency>, invoke: F) -> Self
    where
        F: Fn(&mut T, &mut Arguments) -> Result<(), InstantiateErrorKind> + Send + Sync + 'static,
    {
        Self {
            name,
            params: params.into_iter().collect(),
            generic: false,
            invoke: Some(Box::new(invoke)),
        }
    }

    /// Method the level declares without marking it. Only its signature matters:
    /// declared on the implementation type itself, it suppresses every inherited injected method it overrides.
    #[inline]
    #[must_use]
    pub fn declared(name: &'static str, params: impl IntoIterator<Item = Dependency>) -> Self {
        Self {
            name,
            params: params.into_iter().collect(),
            generic: false,
            invoke: None,
        }
    }

    /// Marks the method as declaring its own type parameters
    #[inline]
    #[must_use]
    pub fn generic(mut self) -> Self {
        self.generic = true;
        self
    }

    #[inline]
    pub(crate) fn is_marked(&self) -> bool {
        self.invoke.is_some()
    }

    pub(crate) fn overrides(&self, other: &Method<T>) -> bool {
        self.name == other.name
            && self.params.len() == other.params.len()
            && self
                .params
                .iter()
                .zip(&other.params)
                .all(|(param, other)| param.signature() == other.signature())
    }
}
