use alloc::vec::Vec;
use core::{cell::RefCell, marker::PhantomData};
use std::thread_local;
use tracing::error;

use crate::{errors::ResolveErrorKind, key::ComponentKey};

thread_local! {
    static CONSTRUCTING: RefCell<Vec<(usize, ComponentKey)>> = const { RefCell::new(Vec::new()) };
}

/// Marks a binding as being constructed on the current thread until dropped.
///
/// Entries are tagged with the owning context, so two contexts resolving the same key on one thread don't collide.
/// The guard is `!Send`: dropping it pops the stack of the thread that created it.
pub(crate) struct ConstructionGuard {
    _not_send: PhantomData<*const ()>,
}

impl ConstructionGuard {
    pub(crate) fn enter(context: usize, key: &ComponentKey) -> Result<Self, ResolveErrorKind> {
        CONSTRUCTING.with(|stack| {
            let mut stack = stack.borrow_mut();
            if stack.iter().any(|(id, entry)| *id == context && entry == key) {
                let err = ResolveErrorKind::CyclicDependency {
                    components: stack
                        .iter()
                        .filter(|(id, _)| *id == context)
                        .map(|(_, key)| key.clone())
                        .collect(),
                };
                error!("{}", err);
                return Err(err);
            }

            stack.push((context, key.clone()));
            Ok(Self { _not_send: PhantomData })
        })
    }
}

impl Drop for ConstructionGuard {
    fn drop(&mut self) {
        CONSTRUCTING.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::ConstructionGuard;
    use crate::{errors::ResolveErrorKind, key::ComponentKey};

    use alloc::{
        collections::BTreeSet,
        format,
        string::{String, ToString as _},
    };
    use tracing_test::traced_test;

    struct A;
    struct B;

    #[test]
    #[traced_test]
    fn test_reenter_same_key() {
        let a = ComponentKey::of::<A>();
        let b = ComponentKey::of::<B>();

        let _a = ConstructionGuard::enter(1, &a).unwrap();
        let _b = ConstructionGuard::enter(1, &b).unwrap();

        let Err(ResolveErrorKind::CyclicDependency { components }) = ConstructionGuard::enter(1, &a) else {
            panic!("expected cyclic dependency");
        };
        assert_eq!(components.len(), 2);
        assert!(components.contains(&a) && components.contains(&b));
    }

    #[test]
    #[traced_test]
    fn test_released_on_drop() {
        let a = ComponentKey::of::<A>();

        drop(ConstructionGuard::enter(1, &a).unwrap());
        let _a = ConstructionGuard::enter(1, &a).unwrap();
    }

    #[test]
    #[traced_test]
    fn test_reenter_reports_whole_stack() {
        struct C;

        let a = ComponentKey::of::<A>();
        let b = ComponentKey::of::<B>();
        let c = ComponentKey::of::<C>();

        let _c = ConstructionGuard::enter(1, &c).unwrap();
        let _a = ConstructionGuard::enter(1, &a).unwrap();
        let _b = ConstructionGuard::enter(1, &b).unwrap();
        let _other = ConstructionGuard::enter(2, &b).unwrap();

        let Err(ResolveErrorKind::CyclicDependency { components }) = ConstructionGuard::enter(1, &a) else {
            panic!("expected cyclic dependency");
        };
        assert_eq!(components, BTreeSet::from([a, b, c]));
    }

    #[test]
    #[traced_test]
    fn test_stack_is_per_thread() {
        let a = ComponentKey::of::<A>();
        let _a = ConstructionGuard::enter(1, &a).unwrap();

        let key = a.clone();
        std::thread::spawn(move || {
            let _a = ConstructionGuard::enter(1, &key).unwrap();
        })
        .join()
        .unwrap();
    }

    #[test]
    fn test_guard_isnt_send() {
        // Resolves only if exactly one impl applies, i.e. the guard doesn't implement `Send`
        trait AmbiguousIfSend<M> {
            fn some_item() {}
        }
        impl<T: ?Sized> AmbiguousIfSend<()> for T {}
        impl<T: ?Sized + Send> AmbiguousIfSend<u8> for T {}

        let _ = <ConstructionGuard as AmbiguousIfSend<_>>::some_item;
    }

    #[test]
    #[traced_test]
    fn test_other_context_doesnt_collide() {
        let a = ComponentKey::of::<A>();

        let _first = ConstructionGuard::enter(1, &a).unwrap();
        let _second = ConstructionGuard::enter(2, &a).unwrap();
    }
}
