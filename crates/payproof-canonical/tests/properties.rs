use payproof_canonical::identifier_of;
use proptest::prelude::*;
use std::collections::BTreeMap;

fn object_text<'a>(entries: impl Iterator<Item = (&'a String, &'a String)>, spaced: bool) -> String {
    let sep = if spaced { ", " } else { "," };
    let colon = if spaced { " : " } else { ":" };
    let body: Vec<String> = entries
        .map(|(k, v)| {
            format!(
                "{}{}{}",
                serde_json::to_string(k).unwrap(),
                colon,
                serde_json::to_string(v).unwrap()
            )
        })
        .collect();
    format!("{{{}}}", body.join(sep))
}

proptest! {
    #[test]
    fn identifier_ignores_context_key_order(
        fields in proptest::collection::btree_map("[a-zA-Z]{1,8}", "[ -~]{0,12}", 1..8)
    ) {
        let fields: BTreeMap<String, String> = fields;
        let forward = object_text(fields.iter(), false);
        let reversed = object_text(fields.iter().rev(), true);
        let a = identifier_of("http", "{}", &forward).unwrap();
        let b = identifier_of("http", "{}", &reversed).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn changing_a_context_value_changes_identifier(
        fields in proptest::collection::btree_map("[a-z]{1,6}", "[a-z]{1,6}", 1..6)
    ) {
        let fields: BTreeMap<String, String> = fields;
        let original = object_text(fields.iter(), false);
        let mut tampered = fields.clone();
        if let Some(v) = tampered.values_mut().next() {
            v.push('!');
        }
        let tampered = object_text(tampered.iter(), false);
        prop_assert_ne!(
            identifier_of("http", "{}", &original).unwrap(),
            identifier_of("http", "{}", &tampered).unwrap()
        );
    }
}
