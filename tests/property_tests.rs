//! Property-based tests for the core conversion guarantees: unhinted and
//! kind-hinted casts round-trip arbitrary value trees, and sequence
//! recompose is invariant under pair reordering.

use proptest::prelude::*;
use recast::{Adapter, Caster, Hint, Key, SequenceAdapter, TypeDesc, Value};

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z]{0,8}".prop_map(Value::from),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_scalar().prop_recursive(3, 24, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Sequence),
            prop::collection::vec(("[a-z]{1,6}", inner), 0..6)
                .prop_map(|entries| Value::Mapping(entries.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn unhinted_casts_round_trip(v in arb_value()) {
        let caster = Caster::new();
        let out = caster.cast(v.clone(), Hint::Auto, Hint::Auto).unwrap();
        prop_assert_eq!(out, v);
    }

    #[test]
    fn mapping_casts_round_trip(entries in prop::collection::vec(("[a-z]{1,6}", arb_scalar()), 0..8)) {
        let caster = Caster::new();
        let v = Value::Mapping(entries.into_iter().collect());
        let out = caster
            .cast(v.clone(), Hint::Auto, Hint::Type(TypeDesc::mapping()))
            .unwrap();
        prop_assert_eq!(out, v);
    }

    #[test]
    fn sequence_casts_round_trip(items in prop::collection::vec(arb_scalar(), 0..8)) {
        let caster = Caster::new();
        let v = Value::Sequence(items);
        let out = caster
            .cast(v.clone(), Hint::Auto, Hint::Type(TypeDesc::sequence()))
            .unwrap();
        prop_assert_eq!(out, v);
    }

    #[test]
    fn sequence_recompose_ignores_pair_order(
        (values, order) in prop::collection::vec(arb_scalar(), 1..8).prop_flat_map(|v| {
            let indices: Vec<usize> = (0..v.len()).collect();
            (Just(v), Just(indices).prop_shuffle())
        })
    ) {
        let adapter = SequenceAdapter::new();
        let mut shuffled = order
            .iter()
            .map(|&i| Ok((Key::Index(i), values[i].clone())));
        let out = adapter
            .recompose(&TypeDesc::sequence(), &mut shuffled)
            .unwrap();
        prop_assert_eq!(out, Value::Sequence(values));
    }

    #[test]
    fn nested_casts_never_partially_convert(inner in arb_scalar()) {
        // Either the whole cast succeeds or it fails; a success must carry
        // the full structure.
        let caster = Caster::new();
        let v = Value::Mapping(
            std::iter::once(("wrapped".to_string(), Value::Sequence(vec![inner]))).collect(),
        );
        let out = caster.cast(v.clone(), Hint::Auto, Hint::Auto).unwrap();
        prop_assert_eq!(out, v);
    }
}
