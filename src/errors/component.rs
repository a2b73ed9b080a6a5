use crate::any::TypeInfo;

#[derive(thiserror::Error, Debug)]
pub enum ComponentErrorKind {
    #[error("Abstract type can't be instantiated")]
    Abstract,
    #[error("Only one constructor can be marked for injection, found {count}")]
    MultipleInjectConstructors { count: usize },
    #[error("Neither a constructor marked for injection nor a no-argument constructor is declared")]
    NoUsableConstructor,
    #[error("Field `{field}` of `{level}` is marked for injection but is immutable")]
    ImmutableField { level: &'static str, field: &'static str },
    #[error("Method `{method}` of `{level}` is marked for injection but declares its own type parameters")]
    GenericMethod { level: &'static str, method: &'static str },
}

#[derive(thiserror::Error, Debug)]
pub enum BindErrorKind {
    #[error("Illegal component `{implementation}`: {reason}")]
    IllegalComponent {
        implementation: TypeInfo,
        #[source]
        reason: ComponentErrorKind,
    },
}
