use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use recast::{
    value, Caster, CasterBuilder, ClassSet, Hint, ObjectAdapter, ObjectConfig, SchemaResolver,
    TypeDesc, Value,
};

fn flat_input() -> Value {
    value!({
        "id": 123,
        "name": "Ada",
        "active": true,
        "score": 99.5
    })
}

fn nested_input() -> Value {
    value!({
        "name": "Orwell",
        "books": [
            {"title": "1984", "year": 1949},
            {"title": "Animal Farm", "year": 1945},
            {"title": "Homage to Catalonia", "year": 1938}
        ],
        "tags": ["novelist", "essayist", "critic"]
    })
}

fn library_engine() -> Caster {
    CasterBuilder::with_defaults()
        .register(
            ClassSet::subtypes(TypeDesc::object("Book")),
            Arc::new(ObjectAdapter::new(ObjectConfig::for_class("Book"))),
        )
        .register(
            ClassSet::subtypes(TypeDesc::object("Author")),
            Arc::new(ObjectAdapter::new(
                ObjectConfig::for_class("Author").with_resolver(
                    "books",
                    SchemaResolver::hint(TypeDesc::sequence_of(TypeDesc::object("Book"))),
                ),
            )),
        )
        .build()
}

fn bench_flat_mapping(c: &mut Criterion) {
    let caster = Caster::new();
    let input = flat_input();
    c.bench_function("cast_flat_mapping", |b| {
        b.iter(|| {
            caster
                .cast(
                    black_box(input.clone()),
                    Hint::Auto,
                    Hint::Type(TypeDesc::mapping()),
                )
                .unwrap()
        })
    });
}

fn bench_nested_mapping(c: &mut Criterion) {
    let caster = Caster::new();
    let input = nested_input();
    c.bench_function("cast_nested_mapping", |b| {
        b.iter(|| {
            caster
                .cast(black_box(input.clone()), Hint::Auto, Hint::Auto)
                .unwrap()
        })
    });
}

fn bench_mapping_to_object_graph(c: &mut Criterion) {
    let caster = library_engine();
    let input = nested_input();
    c.bench_function("cast_mapping_to_object_graph", |b| {
        b.iter(|| {
            caster
                .cast(
                    black_box(input.clone()),
                    Hint::Auto,
                    Hint::Type(TypeDesc::object("Author")),
                )
                .unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_flat_mapping,
    bench_nested_mapping,
    bench_mapping_to_object_graph
);
criterion_main!(benches);
