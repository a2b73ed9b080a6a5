use alloc::collections::BTreeSet;

use super::KeyList;
use crate::{any::TypeInfo, key::ComponentKey};

#[derive(thiserror::Error, Debug)]
pub enum ResolveErrorKind {
    #[error("No binding for `{key}`")]
    NotFound { key: ComponentKey },
    #[error("Dependency `{dependency}` of `{component}` is not bound")]
    DependencyNotFound { component: TypeInfo, dependency: ComponentKey },
    #[error("Cyclic construction detected between: {}", KeyList(.components))]
    CyclicDependency { components: BTreeSet<ComponentKey> },
    #[error("`{implementation}` took more arguments than it declares, next expected: `{expected}`")]
    MissingArgument { implementation: TypeInfo, expected: TypeInfo },
    #[error("Incorrect argument type. Actual: `{actual}`, expected: `{expected}`")]
    IncorrectType { expected: TypeInfo, actual: TypeInfo },
    #[error("Failed to instantiate `{implementation}`")]
    Factory {
        implementation: TypeInfo,
        #[source]
        source: anyhow::Error,
    },
}
