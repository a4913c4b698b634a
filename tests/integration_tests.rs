use std::sync::Arc;

use recast::{
    cast_with, value, Adapter, Caster, CasterBuilder, ClassSet, Error, Hint, IdentityAdapter,
    Key, MappingAdapter, ObjectAdapter, ObjectConfig, ObjectValue, SchemaResolver, TypeDesc,
    Value,
};

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

fn orwell() -> Value {
    value!({
        "name": "Orwell",
        "books": [{"title": "1984"}, {"title": "Animal Farm"}]
    })
}

#[test]
fn symmetric_casts_round_trip() {
    let caster = Caster::new();

    let mapping = value!({"a": 1, "b": [true, false], "c": {"d": "x"}});
    let out = caster
        .cast(mapping.clone(), Hint::Auto, Hint::Type(TypeDesc::mapping()))
        .unwrap();
    assert_eq!(out, mapping);

    let sequence = value!([1, "two", [3]]);
    let out = caster
        .cast(sequence.clone(), Hint::Auto, Hint::Type(TypeDesc::sequence()))
        .unwrap();
    assert_eq!(out, sequence);
}

#[test]
fn specificity_picks_the_narrowest_registration() {
    // A marker adapter registered for sequence<int> only: it decomposes
    // normally but recomposes into a mapping, making the dispatch visible.
    #[derive(Debug)]
    struct Marking;
    impl Adapter for Marking {
        fn kind(&self) -> recast::AdapterKind {
            recast::AdapterKind::Mapping
        }
        fn decompose(
            &self,
            desc: &TypeDesc,
            subject: Value,
        ) -> recast::Result<Vec<(Key, Value)>> {
            recast::SequenceAdapter::new().decompose(desc, subject)
        }
        fn schema(&self, _desc: &TypeDesc) -> recast::Schema {
            recast::Schema::new()
        }
        fn recompose(
            &self,
            desc: &TypeDesc,
            pairs: recast::Pairs<'_>,
        ) -> recast::Result<Value> {
            MappingAdapter::new().recompose(desc, pairs)
        }
    }

    let caster = CasterBuilder::with_defaults()
        .register(
            ClassSet::subtypes(TypeDesc::sequence_of(TypeDesc::Int)),
            Arc::new(Marking),
        )
        .build();

    // sequence<int> hits the narrow registration...
    let out = caster
        .cast(
            value!([7, 8]),
            Hint::Auto,
            Hint::Type(TypeDesc::sequence_of(TypeDesc::Int)),
        )
        .unwrap();
    assert!(out.is_mapping());

    // ...while plain sequences still hit the built-in one.
    let out = caster
        .cast(
            value!(["a", "b"]),
            Hint::Auto,
            Hint::Type(TypeDesc::sequence()),
        )
        .unwrap();
    assert_eq!(out, value!(["a", "b"]));
}

#[test]
fn unhinted_target_without_fallback_fails() {
    let caster = Caster::builder()
        .register(
            ClassSet::subtypes(TypeDesc::Int),
            Arc::new(IdentityAdapter),
        )
        .build();
    let err = caster
        .cast(Value::from(5), Hint::Auto, Hint::Auto)
        .unwrap_err();
    assert!(
        matches!(err, Error::NoAdapterFound { .. }),
        "expected NoAdapterFound, got: {}",
        err
    );
}

#[test]
fn scalar_recompose_rejects_empty_input() {
    let adapter = IdentityAdapter;
    let mut empty = std::iter::empty();
    let err = adapter.recompose(&TypeDesc::Int, &mut empty).unwrap_err();
    assert!(matches!(err, Error::EmptyScalarInput));
}

#[test]
fn sequence_recompose_restores_positional_order() {
    let adapter = recast::SequenceAdapter::new();
    let mut shuffled = vec![
        Ok((Key::Index(1), Value::from("b"))),
        Ok((Key::Index(0), Value::from("a"))),
        Ok((Key::Index(2), Value::from("c"))),
    ]
    .into_iter();
    let out = adapter
        .recompose(&TypeDesc::sequence(), &mut shuffled)
        .unwrap();
    assert_eq!(out, value!(["a", "b", "c"]));
}

#[test]
fn nested_mapping_round_trips_with_a_per_key_override() {
    let caster = Caster::new();
    let source = MappingAdapter::new().with_entry(
        "books",
        SchemaResolver::hint(TypeDesc::sequence_of(TypeDesc::mapping())),
    );
    let out = caster
        .cast(
            orwell(),
            Hint::Adapter(Arc::new(source)),
            Hint::Type(TypeDesc::mapping()),
        )
        .unwrap();
    assert_eq!(out, orwell());
}

#[test]
fn nested_mapping_casts_into_an_object_graph() {
    let caster = library_engine();
    let author = caster
        .cast(orwell(), Hint::Auto, Hint::Type(TypeDesc::object("Author")))
        .unwrap();

    let author = author.as_object().unwrap();
    assert_eq!(author.class(), "Author");
    assert_eq!(author.get("name"), Some(&Value::from("Orwell")));

    let books = author.get("books").and_then(|v| v.as_sequence()).unwrap();
    assert_eq!(books.len(), 2);
    for (book, title) in books.iter().zip(["1984", "Animal Farm"]) {
        let book = book.as_object().unwrap();
        assert_eq!(book.class(), "Book");
        assert_eq!(book.get("title"), Some(&Value::from(title)));
    }
}

#[test]
fn object_graph_casts_back_into_nested_mappings() {
    // Overriding the object fallback turns every unhinted object into a
    // mapping, all the way down: the shape of a serializer.
    let caster = library_engine();
    let author = caster
        .cast(orwell(), Hint::Auto, Hint::Type(TypeDesc::object("Author")))
        .unwrap();

    let serializer = CasterBuilder::with_defaults()
        .register(
            ClassSet::subtypes(TypeDesc::object("Author")),
            Arc::new(ObjectAdapter::new(
                ObjectConfig::for_class("Author").with_resolver(
                    "books",
                    SchemaResolver::hint(TypeDesc::sequence_of(TypeDesc::object("Book"))),
                ),
            )),
        )
        .register(
            ClassSet::subtypes(TypeDesc::object("Book")),
            Arc::new(ObjectAdapter::new(ObjectConfig::for_class("Book"))),
        )
        .register_fallback(
            ClassSet::subtypes(TypeDesc::any_object()),
            Arc::new(MappingAdapter::new()),
        )
        .build();

    let out = serializer.cast(author, Hint::Auto, Hint::Auto).unwrap();
    assert_eq!(out, orwell());
}

#[derive(Debug)]
struct Temperature {
    celsius: f64,
}

impl recast::SelfDescribing for Temperature {
    fn decompose(&self) -> recast::Result<Vec<(Key, Value)>> {
        Ok(vec![(Key::name("celsius"), Value::from(self.celsius))])
    }

    fn schema(&self) -> recast::Schema {
        recast::Schema::new()
    }
}

#[test]
fn self_describing_values_bypass_registrations() {
    // The default engine would resolve an object adapter for this value's
    // runtime type; the value's own decomposition must win anyway.
    let caster = Caster::new();
    let out = caster
        .cast(
            Value::Custom(Arc::new(Temperature { celsius: 21.5 })),
            Hint::Auto,
            Hint::Type(TypeDesc::mapping()),
        )
        .unwrap();
    assert_eq!(out, value!({"celsius": 21.5}));
}

#[test]
fn field_access_modes_shape_both_directions() {
    let caster = CasterBuilder::with_defaults()
        .register(
            ClassSet::subtypes(TypeDesc::object("User")),
            Arc::new(ObjectAdapter::new(
                ObjectConfig::for_class("User")
                    .with_access("id", recast::FieldAccess::ReadOnly)
                    .exclude(["secret"]),
            )),
        )
        .build();

    // Loading a mapping: the read-only id and the excluded secret are both
    // dropped.
    let user = caster
        .cast(
            value!({"id": 1, "name": "Ada", "secret": "k"}),
            Hint::Auto,
            Hint::Type(TypeDesc::object("User")),
        )
        .unwrap();
    let user = user.as_object().unwrap();
    assert_eq!(user.get("id"), None);
    assert_eq!(user.get("secret"), None);
    assert_eq!(user.get("name"), Some(&Value::from("Ada")));

    // Dumping an object: the read-only id is emitted.
    let mut stored = ObjectValue::new("User");
    stored.set("id", Value::from(1));
    stored.set("name", Value::from("Ada"));
    let out = caster
        .cast(
            Value::Object(stored),
            Hint::Auto,
            Hint::Type(TypeDesc::mapping()),
        )
        .unwrap();
    assert_eq!(out, value!({"id": 1, "name": "Ada"}));
}

#[test]
fn values_bridge_through_serde() {
    let input = value!({"name": "Ada", "scores": [1, 2, 3], "active": true});
    let json = serde_json::to_string(&input).unwrap();
    let back: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(back, input);
}

#[test]
fn free_functions_use_the_default_engine() {
    let out = cast_with(value!([1, 2]), Hint::Auto, Hint::Auto).unwrap();
    assert_eq!(out, value!([1, 2]));

    let out = recast::cast(value!({"k": "v"}), TypeDesc::mapping()).unwrap();
    assert_eq!(out, value!({"k": "v"}));
}
