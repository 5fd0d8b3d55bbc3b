use bson::{doc, Bson};
use doctour_core::{Filter, Update};
use proptest::prelude::*;

// Strategy for the numeric BSON types a balance can be stored as.
// Int64 stays inside f64's exact integer range so mixed comparisons are exact.
fn arb_number() -> impl Strategy<Value = Bson> {
    prop_oneof![
        any::<i32>().prop_map(Bson::Int32),
        (-(1i64 << 52)..(1i64 << 52)).prop_map(Bson::Int64),
        (-1.0e12f64..1.0e12f64).prop_map(Bson::Double),
    ]
}

proptest! {
    /// Property: integer thresholds split documents exactly like `>` and `<`
    #[test]
    fn prop_integer_thresholds(money in any::<i64>(), threshold in any::<i64>()) {
        let doc = doc! { "bank_money": money };
        prop_assert_eq!(Filter::gt("bank_money", threshold).matches(&doc), money > threshold);
        prop_assert_eq!(Filter::lt("bank_money", threshold).matches(&doc), money < threshold);
        prop_assert_eq!(Filter::eq("bank_money", threshold).matches(&doc), money == threshold);
    }

    /// Property: exactly one of gt / lt / eq holds for any numeric pair
    #[test]
    fn prop_comparisons_are_exclusive(actual in arb_number(), threshold in arb_number()) {
        let doc = doc! { "v": actual };
        let hits = [
            Filter::Gt("v".into(), threshold.clone()).matches(&doc),
            Filter::Lt("v".into(), threshold.clone()).matches(&doc),
            Filter::Eq("v".into(), threshold).matches(&doc),
        ];
        prop_assert_eq!(hits.iter().filter(|hit| **hit).count(), 1);
    }

    /// Property: string fields never satisfy numeric range filters
    #[test]
    fn prop_strings_never_compare_to_numbers(text in ".*", threshold in arb_number()) {
        let doc = doc! { "v": text };
        prop_assert!(!Filter::Gt("v".into(), threshold.clone()).matches(&doc));
        prop_assert!(!Filter::Lt("v".into(), threshold).matches(&doc));
    }

    /// Property: applying the same $set twice modifies only once
    #[test]
    fn prop_set_is_idempotent(start in any::<i64>(), target in any::<i64>()) {
        let mut doc = doc! { "name": "michael", "bank_money": start };
        let update = Update::set("bank_money", target);

        let first = update.apply(&mut doc);
        prop_assert_eq!(first, start != target);
        prop_assert!(!update.apply(&mut doc));
        prop_assert!(Filter::eq("bank_money", target).matches(&doc));
    }
}
