#![allow(dead_code)]

use criterion::{criterion_group, criterion_main, Criterion};
use joinery::{Config, Constructor, Context, Deferred, Dependency, Field, Introspect, Level, Registry, TypeMetadata};
use std::sync::Arc;

struct A(Arc<B>, Arc<C>);
struct B(i32);
struct C(Arc<CA>);
struct CA(Arc<CAA>);
struct CAA(Arc<CAAA>);
struct CAAA(Arc<CAAAA>);
struct CAAAA(Deferred<CAAAAA>);
struct CAAAAA;

macro_rules! link {
    ($ty:ident($dep:ident)) => {
        impl Introspect for $ty {
            fn introspect() -> TypeMetadata<Self> {
                TypeMetadata::new().constructor(Constructor::inject([Dependency::direct::<$dep>()], |args| {
                    Ok($ty(args.take()?))
                }))
            }
        }
    };
}

link!(C(CA));
link!(CA(CAA));
link!(CAA(CAAA));
link!(CAAA(CAAAA));

impl Introspect for A {
    fn introspect() -> TypeMetadata<Self> {
        TypeMetadata::new().constructor(Constructor::inject(
            [Dependency::direct::<B>(), Dependency::direct::<C>()],
            |args| Ok(A(args.take()?, args.take()?)),
        ))
    }
}

impl Introspect for B {
    fn introspect() -> TypeMetadata<Self> {
        TypeMetadata::new().constructor(Constructor::declared([], |_| Ok(B(2))))
    }
}

impl Introspect for CAAAA {
    fn introspect() -> TypeMetadata<Self> {
        TypeMetadata::new().constructor(Constructor::inject([Dependency::deferred::<CAAAAA>()], |args| {
            Ok(CAAAA(args.take_deferred()?))
        }))
    }
}

impl Introspect for CAAAAA {
    fn introspect() -> TypeMetadata<Self> {
        TypeMetadata::new().constructor(Constructor::declared([], |_| Ok(CAAAAA)))
    }
}

struct Injected {
    b: Option<Arc<B>>,
}

impl Introspect for Injected {
    fn introspect() -> TypeMetadata<Self> {
        TypeMetadata::new()
            .constructor(Constructor::declared([], |_| Ok(Injected { b: None })))
            .level(Level::new("Injected").field(Field::inject("b", Dependency::direct::<B>(), |this: &mut Injected, args| {
                this.b = Some(args.take()?);
                Ok(())
            })))
    }
}

fn registry(config: Config) -> Registry {
    let mut registry = Registry::with_config(config);
    registry
        .bind_type::<A, A>()
        .unwrap()
        .bind_type::<B, B>()
        .unwrap()
        .bind_type::<C, C>()
        .unwrap()
        .bind_type::<CA, CA>()
        .unwrap()
        .bind_type::<CAA, CAA>()
        .unwrap()
        .bind_type::<CAAA, CAAA>()
        .unwrap()
        .bind_type::<CAAAA, CAAAA>()
        .unwrap()
        .bind_type::<CAAAAA, CAAAAA>()
        .unwrap()
        .bind_type::<Injected, Injected>()
        .unwrap()
        .bind_instance(Arc::new(0u8));
    registry
}

#[inline]
fn context_get(context: &Context) {
    let _ = context.get::<A>().unwrap();
}

fn criterion_benchmark(c: &mut Criterion) {
    let context_1 = registry(Config::default()).finalize().unwrap();
    let context_2 = registry(Config {
        runtime_cycle_detection: false,
    })
    .finalize()
    .unwrap();

    c.bench_function("registry_finalize", |b| b.iter(|| registry(Config::default()).finalize().unwrap()))
        .bench_function("context_get", |b| b.iter(|| context_get(&context_1)))
        .bench_function("context_get_without_cycle_detection", |b| b.iter(|| context_get(&context_2)))
        .bench_function("context_get_instance", |b| b.iter(|| context_1.get::<u8>().unwrap()))
        .bench_function("context_get_with_field", |b| b.iter(|| context_1.get::<Injected>().unwrap()))
        .bench_function("deferred_get", |b| {
            let deferred = context_1.get_deferred::<CAAAAA>(None).unwrap();
            b.iter(|| deferred.get().unwrap())
        });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
