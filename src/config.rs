/// Config for a registry and the context it produces
/// ## Fields
/// - `runtime_cycle_detection`:
///   If `true`, every thread tracks the bindings it is currently constructing, and re-entering one of them
///   fails with [`crate::ResolveErrorKind::CyclicDependency`].
///
///   Validation already rejects cycles made of direct dependencies, so this only matters
///   when user code invokes a [`crate::Deferred`] factory while its target is still being built.
///   Without the `std` feature there is no thread-local storage and the flag is ignored.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub runtime_cycle_detection: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            runtime_cycle_detection: true,
        }
    }
}
