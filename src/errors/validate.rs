use alloc::collections::BTreeSet;

use super::KeyList;
use crate::key::ComponentKey;

#[derive(thiserror::Error, Debug)]
pub enum ValidateErrorKind {
    #[error("Dependency `{dependency}` of `{component}` is not bound")]
    DependencyNotFound { component: ComponentKey, dependency: ComponentKey },
    #[error("Cyclic dependency detected between: {}", KeyList(.components))]
    CyclicDependency { components: BTreeSet<ComponentKey> },
}
