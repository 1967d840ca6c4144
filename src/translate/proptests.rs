use super::*;
use crate::codec::proptests::data_strategy;
use crate::model::Data;

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::BTreeMap;
use std::fmt::Debug;

/// Both directions of a translator give back what went in
fn check_laws<T>(t: &T, value: &T::Value) -> std::result::Result<(), TestCaseError>
where
    T: Translator,
    T::Value: PartialEq + Debug,
{
    let data = t.to_data(value).unwrap();
    prop_assert_eq!(&t.from_data(&data).unwrap(), value);
    let text = t.encode(value).unwrap();
    prop_assert_eq!(&t.decode(&text).unwrap(), value, "text {:?}", text);
    Ok(())
}

fn present_data() -> impl Strategy<Value = Data> {
    data_strategy().prop_filter("present", |d| !d.is_null())
}

fn finite_f32() -> impl Strategy<Value = f32> {
    any::<f32>().prop_filter("finite", |f| f.is_finite())
}

fn finite_f64() -> impl Strategy<Value = f64> {
    any::<f64>().prop_filter("finite", |f| f.is_finite())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_scalar_translators(
        b in any::<bool>(),
        i8v in any::<i8>(),
        i16v in any::<i16>(),
        i32v in any::<i32>(),
        i64v in any::<i64>(),
        f32v in finite_f32(),
        f64v in finite_f64(),
        s in any::<String>(),
    ) {
        check_laws(&BoolTranslator, &b)?;
        check_laws(&I8Translator::new(), &i8v)?;
        check_laws(&I16Translator::new(), &i16v)?;
        check_laws(&I32Translator::new(), &i32v)?;
        check_laws(&I64Translator::new(), &i64v)?;
        check_laws(&F32Translator::new(), &f32v)?;
        check_laws(&F64Translator::new(), &f64v)?;
        check_laws(&StringTranslator, &s)?;
    }

    #[test]
    fn prop_data_translator(data in present_data()) {
        check_laws(&DataTranslator, &data)?;
    }

    #[test]
    fn prop_nullable_translators(
        data in prop::option::of(present_data()),
        n in prop::option::of(any::<i32>()),
        s in prop::option::of(any::<String>()),
        f in prop::option::of(finite_f32()),
    ) {
        check_laws(&Nullable(DataTranslator), &data)?;
        check_laws(&Nullable(I32Translator::new()), &n)?;
        check_laws(&Nullable(StringTranslator), &s)?;
        check_laws(&Nullable(F32Translator::new()), &f)?;
    }

    #[test]
    fn prop_collection_translators(
        shorts in prop::collection::vec(any::<i16>(), 0..8),
        items in prop::collection::vec(present_data(), 0..4),
        flags in prop::collection::btree_map(any::<String>(), any::<bool>(), 0..8),
        maybe in prop::collection::btree_map(any::<String>(), prop::option::of(any::<i64>()), 0..8),
    ) {
        check_laws(&ListTranslator::new(I16Translator::new()), &shorts)?;
        check_laws(&ListTranslator::new(DataTranslator), &items)?;
        check_laws(&MapTranslator::new(BoolTranslator), &flags)?;
        check_laws(&MapTranslator::new(Nullable(I64Translator::new())), &maybe)?;
    }

    #[test]
    fn prop_json_translator(pairs in prop::collection::vec((any::<String>(), any::<i32>()), 0..8)) {
        check_laws(&JsonTranslator::<Vec<(String, i32)>>::new(), &pairs)?;
    }

    #[test]
    fn prop_registry_matches_typed_translator(n in any::<i64>(), s in any::<String>()) {
        let registry = TranslatorRegistry::with_defaults();
        prop_assert_eq!(registry.to_data_any(&n).unwrap(), I64Translator::new().to_data(&n).unwrap());
        prop_assert_eq!(registry.encode_any(&s).unwrap(), StringTranslator.encode(&s).unwrap());
        let data: BTreeMap<String, Data> = BTreeMap::new();
        prop_assert_eq!(registry.from_data::<i64>(&Data::from(n)).unwrap(), n);
        prop_assert!(registry.to_data_any(&data).is_err());
    }
}
