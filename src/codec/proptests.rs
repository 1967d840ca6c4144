use super::{json, tagged};
use crate::model::{Data, Number};

use proptest::prelude::*;

fn finite_f32() -> impl Strategy<Value = f32> {
    any::<f32>().prop_filter("finite", |f| f.is_finite())
}

fn finite_f64() -> impl Strategy<Value = f64> {
    any::<f64>().prop_filter("finite", |f| f.is_finite())
}

/// Every width, with any float bit pattern except NaN
fn number_strategy() -> impl Strategy<Value = Number> {
    prop_oneof![
        any::<i8>().prop_map(Number::Byte),
        any::<i16>().prop_map(Number::Short),
        any::<i32>().prop_map(Number::Int),
        any::<i64>().prop_map(Number::Long),
        any::<f32>().prop_filter("not NaN", |f| !f.is_nan()).prop_map(Number::Float),
        any::<f64>().prop_filter("not NaN", |f| !f.is_nan()).prop_map(Number::Double),
    ]
}

/// Every width, floats limited to what JSON can carry
fn json_number_strategy() -> impl Strategy<Value = Number> {
    prop_oneof![
        any::<i8>().prop_map(Number::Byte),
        any::<i32>().prop_map(Number::Int),
        any::<i64>().prop_map(Number::Long),
        finite_f32().prop_map(Number::Float),
        finite_f64().prop_map(Number::Double),
    ]
}

fn data_with(numbers: BoxedStrategy<Number>) -> BoxedStrategy<Data> {
    let leaf = prop_oneof![
        Just(Data::Null),
        any::<bool>().prop_map(Data::Bool),
        numbers.prop_map(Data::Number),
        any::<String>().prop_map(Data::Text),
    ];
    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Data::List),
            prop::collection::btree_map(any::<String>(), inner, 0..6).prop_map(Data::Map),
        ]
    })
    .boxed()
}

/// Arbitrary structured values, nested a few levels deep
pub(crate) fn data_strategy() -> BoxedStrategy<Data> {
    data_with(number_strategy().boxed())
}

/// The value JSON hands back: integers as `Long`, other numbers as `Double`
fn widened(data: &Data) -> Data {
    match data {
        Data::Number(n) if n.is_integral() => Data::Number(Number::Long(n.as_i64().unwrap())),
        Data::Number(n) => Data::Number(Number::Double(n.as_f64())),
        Data::List(items) => Data::List(items.iter().map(widened).collect()),
        Data::Map(map) => Data::Map(map.iter().map(|(k, v)| (k.clone(), widened(v))).collect()),
        other => other.clone(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_tagged_roundtrip_is_exact(data in data_strategy()) {
        let text = tagged::encode(&data);
        prop_assert_eq!(tagged::decode(&text).unwrap(), data);
    }

    #[test]
    fn prop_json_roundtrip_up_to_width(data in data_with(json_number_strategy().boxed())) {
        let text = json::to_string(&data).unwrap();
        prop_assert_eq!(json::from_str(&text).unwrap(), widened(&data));
    }

    #[test]
    fn prop_json_is_stable_after_one_pass(data in data_with(json_number_strategy().boxed())) {
        let once = json::from_str(&json::to_string(&data).unwrap()).unwrap();
        let twice = json::from_str(&json::to_string(&once).unwrap()).unwrap();
        prop_assert_eq!(twice, once);
    }
}
