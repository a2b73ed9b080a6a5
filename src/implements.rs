use alloc::sync::Arc;

/// Conversion of a constructed implementation into the component type it is bound to.
///
/// Every type implements its own component type. Trait objects need an impl per trait,
/// which [`crate::implements!`] generates.
pub trait Implements<C: ?Sized>: Send + Sync + 'static {
    fn into_component(self: Arc<Self>) -> Arc<C>;
}

impl<T: Send + Sync + 'static> Implements<T> for T {
    #[inline]
    fn into_component(self: Arc<Self>) -> Arc<T> {
        self
    }
}

/// Declares that an implementation type can be bound to one or more trait-object component types.
///
/// # Syntax
/// ```text
/// implements!(Implementation => dyn Trait [, dyn OtherTrait ...])
/// ```
///
/// # Examples
/// ```rust
/// use joinery::implements;
///
/// trait Engine: Send + Sync {}
/// trait Part: Send + Sync {}
///
/// struct V8;
///
/// impl Engine for V8 {}
/// impl Part for V8 {}
///
/// implements!(V8 => dyn Engine, dyn Part);
/// ```
#[macro_export]
macro_rules! implements {
    ($implementation:ty => $($component:ty),+ $(,)?) => {
        $(
            impl $crate::Implements<$component> for $implementation {
                #[inline]
                fn into_component(self: $crate::macros_utils::Arc<Self>) -> $crate::macros_utils::Arc<$component> {
                    self
                }
            }
        )+
    };
}
