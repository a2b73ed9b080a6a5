use super::ResolveErrorKind;

/// Error returned by constructors, field assigners and injected methods.
///
/// Resolution failures raised while taking arguments are handed back to the caller as is,
/// anything else is user code failing and is reported as [`ResolveErrorKind::Factory`].
#[derive(thiserror::Error, Debug)]
pub enum InstantiateErrorKind {
    #[error(transparent)]
    Resolve(#[from] ResolveErrorKind),
    #[error(transparent)]
    Custom(#[from] anyhow::Error),
}
