use alloc::{boxed::Box, collections::VecDeque, sync::Arc, vec, vec::Vec};
use core::marker::PhantomData;
use tracing::{debug, error};

use crate::{
    any::{BoxedAny, TypeInfo},
    arguments::Arguments,
    context::Context,
    dependency::Dependency,
    errors::{ComponentErrorKind, InstantiateErrorKind, ResolveErrorKind},
    implements::Implements,
    introspect::{Constructor, Field, InjectFn, Introspect, Level, Method, TypeMetadata},
    provider::ComponentFactory,
};

struct InjectionPoint<T> {
    params: Vec<Dependency>,
    inject: InjectFn<T>,
}

/// Construction recipe of one implementation type, bound to the component type `C`.
///
/// The injection points are discovered and checked once, when the binding is made.
pub(crate) struct InjectionProvider<C: ?Sized, I> {
    implementation: TypeInfo,
    constructor: Constructor<I>,
    fields: Vec<InjectionPoint<I>>,
    methods: Vec<InjectionPoint<I>>,
    dependencies: Vec<Dependency>,
    _component: PhantomData<fn() -> Arc<C>>,
}

impl<C, I> InjectionProvider<C, I>
where
    C: ?Sized + Send + Sync + 'static,
    I: Introspect + Implements<C>,
{
    pub(crate) fn new() -> Result<Self, ComponentErrorKind> {
        let TypeMetadata {
            is_abstract,
            constructors,
            levels,
        } = I::introspect();

        if is_abstract {
            return Err(ComponentErrorKind::Abstract);
        }

        let constructor = select_constructor(constructors)?;
        let (fields, methods) = collect_injection_points(levels)?;

        let dependencies = constructor
            .params
            .iter()
            .chain(fields.iter().flat_map(|field| &field.params))
            .chain(methods.iter().flat_map(|method| &method.params))
            .cloned()
            .collect();

        debug!(
            fields = fields.len(),
            methods = methods.len(),
            "Injection points collected"
        );

        Ok(Self {
            implementation: TypeInfo::of::<I>(),
            constructor,
            fields,
            methods,
            dependencies,
            _component: PhantomData,
        })
    }

    fn arguments(&self, context: &Context, params: &[Dependency]) -> Result<Arguments, ResolveErrorKind> {
        let mut values = VecDeque::with_capacity(params.len());
        for dependency in params {
            match context.resolve_dependency(dependency)? {
                Some(injected) => values.push_back(injected),
                None => {
                    let err = ResolveErrorKind::DependencyNotFound {
                        component: self.implementation,
                        dependency: dependency.key.clone(),
                    };
                    error!("{}", err);
                    return Err(err);
                }
            }
        }
        Ok(Arguments::new(self.implementation, values))
    }

    fn instantiate_error(&self, err: InstantiateErrorKind) -> ResolveErrorKind {
        match err {
            InstantiateErrorKind::Resolve(err) => err,
            InstantiateErrorKind::Custom(source) => {
                let err = ResolveErrorKind::Factory {
                    implementation: self.implementation,
                    source,
                };
                error!("{}", err);
                err
            }
        }
    }
}

impl<C, I> ComponentFactory for InjectionProvider<C, I>
where
    C: ?Sized + Send + Sync + 'static,
    I: Introspect + Implements<C>,
{
    #[inline]
    fn implementation(&self) -> TypeInfo {
        self.implementation
    }

    #[inline]
    fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    fn provide(&self, context: &Context) -> Result<BoxedAny, ResolveErrorKind> {
        let mut args = self.arguments(context, &self.constructor.params)?;
        let mut instance = (self.constructor.factory)(&mut args).map_err(|err| self.instantiate_error(err))?;

        for point in self.fields.iter().chain(&self.methods) {
            let mut args = self.arguments(context, &point.params)?;
            (point.inject)(&mut instance, &mut args).map_err(|err| self.instantiate_error(err))?;
        }

        let component = <I as Implements<C>>::into_component(Arc::new(instance));
        Ok(Box::new(component))
    }
}

fn select_constructor<T>(constructors: Vec<Constructor<T>>) -> Result<Constructor<T>, ComponentErrorKind> {
    let marked = constructors.iter().filter(|constructor| constructor.marked).count();
    if marked > 1 {
        return Err(ComponentErrorKind::MultipleInjectConstructors { count: marked });
    }

    constructors
        .into_iter()
        .find(|constructor| {
            if marked == 1 {
                constructor.marked
            } else {
                constructor.params.is_empty()
            }
        })
        .ok_or(ComponentErrorKind::NoUsableConstructor)
}

/// Walks the levels from the implementation type up to its farthest ancestor.
///
/// Every marked field is kept. A marked method is dropped when a more derived level already contributed
/// the same signature, or when the implementation type itself declares that signature without marking it.
#[allow(clippy::type_complexity)]
fn collect_injection_points<T>(
    levels: Vec<Level<T>>,
) -> Result<(Vec<InjectionPoint<T>>, Vec<InjectionPoint<T>>), ComponentErrorKind> {
    let mut fields = Vec::new();
    let mut methods: Vec<Method<T>> = Vec::new();
    let mut unmarked_overrides: Vec<Method<T>> = Vec::new();

    for (depth, level) in levels.into_iter().enumerate() {
        let Level {
            name: level_name,
            fields: level_fields,
            methods: level_methods,
        } = level;

        for field in level_fields {
            if let Some(point) = field_point(level_name, field)? {
                fields.push(point);
            }
        }

        let (marked, unmarked): (Vec<_>, Vec<_>) = level_methods.into_iter().partition(Method::is_marked);
        if depth == 0 {
            unmarked_overrides = unmarked;
        }

        for method in marked {
            if methods.iter().any(|collected| collected.overrides(&method))
                || unmarked_overrides.iter().any(|declared| declared.overrides(&method))
            {
                debug!(level = level_name, method = method.name, "Overridden injection method skipped");
                continue;
            }
            if method.generic {
                return Err(ComponentErrorKind::GenericMethod {
                    level: level_name,
                    method: method.name,
                });
            }
            methods.push(method);
        }
    }

    let methods = methods
        .into_iter()
        .filter_map(|Method { params, invoke, .. }| invoke.map(|inject| InjectionPoint { params, inject }))
        .collect();

    Ok((fields, methods))
}

fn field_point<T>(level: &'static str, field: Field<T>) -> Result<Option<InjectionPoint<T>>, ComponentErrorKind> {
    let Field {
        name,
        dependency,
        immutable,
        assign,
    } = field;

    let Some(inject) = assign else {
        return Ok(None);
    };
    if immutable {
        return Err(ComponentErrorKind::ImmutableField { level, field: name });
    }

    Ok(Some(InjectionPoint {
        params: vec![dependency],
        inject,
    }))
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::InjectionProvider;
    use crate::{
        dependency::Dependency,
        errors::ComponentErrorKind,
        introspect::{Constructor, Field, Introspect, Level, Method, TypeMetadata},
        provider::ComponentFactory as _,
    };

    use alloc::{
        format,
        string::{String, ToString as _},
        vec::Vec,
    };
    use tracing_test::traced_test;

    struct Dep;
    struct Other;

    fn types(provider: &dyn crate::provider::ComponentFactory) -> Vec<&'static str> {
        provider.dependencies().iter().map(|dependency| dependency.type_info().short_name()).collect()
    }

    fn new_provider<I: Introspect>() -> Result<InjectionProvider<I, I>, ComponentErrorKind> {
        InjectionProvider::<I, I>::new()
    }

    #[test]
    #[traced_test]
    fn test_abstract_type() {
        struct Abstract;

        impl Introspect for Abstract {
            fn introspect() -> TypeMetadata<Self> {
                TypeMetadata::new()
                    .abstract_type()
                    .constructor(Constructor::declared([], |_| Ok(Abstract)))
            }
        }

        assert!(matches!(new_provider::<Abstract>(), Err(ComponentErrorKind::Abstract)));
    }

    #[test]
    #[traced_test]
    fn test_multiple_inject_constructors() {
        struct Component;

        impl Introspect for Component {
            fn introspect() -> TypeMetadata<Self> {
                TypeMetadata::new()
                    .constructor(Constructor::inject([Dependency::direct::<Dep>()], |_| Ok(Component)))
                    .constructor(Constructor::inject([Dependency::direct::<Other>()], |_| Ok(Component)))
            }
        }

        assert!(matches!(
            new_provider::<Component>(),
            Err(ComponentErrorKind::MultipleInjectConstructors { count: 2 })
        ));
    }

    #[test]
    #[traced_test]
    fn test_no_usable_constructor() {
        struct Component;

        impl Introspect for Component {
            fn introspect() -> TypeMetadata<Self> {
                TypeMetadata::new().constructor(Constructor::declared([Dependency::direct::<Dep>()], |_| Ok(Component)))
            }
        }

        assert!(matches!(new_provider::<Component>(), Err(ComponentErrorKind::NoUsableConstructor)));
    }

    #[test]
    #[traced_test]
    fn test_no_argument_constructor_fallback() {
        struct Component;

        impl Introspect for Component {
            fn introspect() -> TypeMetadata<Self> {
                TypeMetadata::new()
                    .constructor(Constructor::declared([Dependency::direct::<Dep>()], |_| Ok(Component)))
                    .constructor(Constructor::declared([], |_| Ok(Component)))
            }
        }

        let provider = new_provider::<Component>().unwrap();
        assert!(provider.dependencies().is_empty());
    }

    #[test]
    #[traced_test]
    fn test_marked_constructor_wins_over_no_argument() {
        struct Component;

        impl Introspect for Component {
            fn introspect() -> TypeMetadata<Self> {
                TypeMetadata::new()
                    .constructor(Constructor::declared([], |_| Ok(Component)))
                    .constructor(Constructor::inject([Dependency::direct::<Dep>()], |_| Ok(Component)))
            }
        }

        let provider = new_provider::<Component>().unwrap();
        assert_eq!(types(&provider), ["Dep"]);
    }

    #[test]
    #[traced_test]
    fn test_immutable_field() {
        struct Component;

        impl Introspect for Component {
            fn introspect() -> TypeMetadata<Self> {
                TypeMetadata::new().constructor(Constructor::declared([], |_| Ok(Component))).level(
                    Level::new("Component").field(Field::inject("dep", Dependency::direct::<Dep>(), |_, _| Ok(())).immutable()),
                )
            }
        }

        assert!(matches!(
            new_provider::<Component>(),
            Err(ComponentErrorKind::ImmutableField { field: "dep", .. })
        ));
    }

    #[test]
    #[traced_test]
    fn test_immutable_unmarked_field_is_ignored() {
        struct Component;

        impl Introspect for Component {
            fn introspect() -> TypeMetadata<Self> {
                TypeMetadata::new()
                    .constructor(Constructor::declared([], |_| Ok(Component)))
                    .level(Level::new("Component").field(Field::declared("dep", Dependency::direct::<Dep>()).immutable()))
            }
        }

        let provider = new_provider::<Component>().unwrap();
        assert!(provider.dependencies().is_empty());
    }

    #[test]
    #[traced_test]
    fn test_generic_method() {
        struct Component;

        impl Introspect for Component {
            fn introspect() -> TypeMetadata<Self> {
                TypeMetadata::new().constructor(Constructor::declared([], |_| Ok(Component))).level(
                    Level::new("Component").method(Method::inject("install", [Dependency::direct::<Dep>()], |_, _| Ok(())).generic()),
                )
            }
        }

        assert!(matches!(
            new_provider::<Component>(),
            Err(ComponentErrorKind::GenericMethod { method: "install", .. })
        ));
    }

    #[test]
    #[traced_test]
    fn test_dependencies_order() {
        struct Component;

        impl Introspect for Component {
            fn introspect() -> TypeMetadata<Self> {
                TypeMetadata::new()
                    .constructor(Constructor::inject([Dependency::direct::<Dep>()], |_| Ok(Component)))
                    .level(
                        Level::new("Component")
                            .method(Method::inject("install", [Dependency::deferred::<u8>()], |_, _| Ok(())))
                            .field(Field::inject("other", Dependency::direct::<Other>(), |_, _| Ok(()))),
                    )
                    .level(Level::new("Base").field(Field::inject("base", Dependency::direct::<u16>(), |_, _| Ok(()))))
            }
        }

        let provider = new_provider::<Component>().unwrap();
        assert_eq!(types(&provider), ["Dep", "Other", "u16", "u8"]);
        assert!(provider.dependencies()[3].is_deferred());
    }

    #[test]
    #[traced_test]
    fn test_overridden_inject_method_collected_once() {
        struct Component;

        impl Introspect for Component {
            fn introspect() -> TypeMetadata<Self> {
                TypeMetadata::new()
                    .constructor(Constructor::declared([], |_| Ok(Component)))
                    .level(Level::new("Component").method(Method::inject("install", [Dependency::direct::<Dep>()], |_, _| Ok(()))))
                    .level(Level::new("Base").method(Method::inject("install", [Dependency::direct::<Dep>()], |_, _| Ok(()))))
            }
        }

        let provider = new_provider::<Component>().unwrap();
        assert_eq!(provider.methods.len(), 1);
        assert_eq!(types(&provider), ["Dep"]);
    }

    #[test]
    #[traced_test]
    fn test_overload_is_not_override() {
        struct Component;

        impl Introspect for Component {
            fn introspect() -> TypeMetadata<Self> {
                TypeMetadata::new()
                    .constructor(Constructor::declared([], |_| Ok(Component)))
                    .level(Level::new("Component").method(Method::inject("install", [Dependency::direct::<Dep>()], |_, _| Ok(()))))
                    .level(Level::new("Base").method(Method::inject("install", [Dependency::deferred::<Dep>()], |_, _| Ok(()))))
            }
        }

        let provider = new_provider::<Component>().unwrap();
        assert_eq!(provider.methods.len(), 2);
    }

    #[test]
    #[traced_test]
    fn test_unmarked_override_suppresses_inherited_method() {
        struct Component;

        impl Introspect for Component {
            fn introspect() -> TypeMetadata<Self> {
                TypeMetadata::new()
                    .constructor(Constructor::declared([], |_| Ok(Component)))
                    .level(Level::new("Component").method(Method::declared("install", [Dependency::direct::<Dep>()])))
                    .level(Level::new("Base").method(Method::inject("install", [Dependency::direct::<Dep>()], |_, _| Ok(())).generic()))
            }
        }

        let provider = new_provider::<Component>().unwrap();
        assert!(provider.methods.is_empty());
        assert!(provider.dependencies().is_empty());
    }

    #[test]
    #[traced_test]
    fn test_unmarked_override_in_middle_level_keeps_inherited_method() {
        struct Component;

        impl Introspect for Component {
            fn introspect() -> TypeMetadata<Self> {
                TypeMetadata::new()
                    .constructor(Constructor::declared([], |_| Ok(Component)))
                    .level(Level::new("Component"))
                    .level(Level::new("Middle").method(Method::declared("install", [])))
                    .level(Level::new("Base").method(Method::inject("install", [], |_, _| Ok(()))))
            }
        }

        let provider = new_provider::<Component>().unwrap();
        assert_eq!(provider.methods.len(), 1);
    }
}
