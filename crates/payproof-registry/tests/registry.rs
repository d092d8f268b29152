use payproof_canonical::{Address, PaymentMethod, ProviderHash};
use payproof_registry::{
    MemoryStore, ProviderRegistry, ProviderTemplate, RegistryAction, RegistryError,
    TemplateBlueprint,
};
use proptest::prelude::*;

const VENMO_TEMPLATE: &str = r#"{"url":"https://account.venmo.com/api/stories?feedType=me&externalId={{SENDER_ID}}","method":"GET","body":"","responseMatches":[{"type":"regex","value":"\"amount\":\"- \\$(?<amount>[^\"]+)\""}],"responseRedactions":[{"jsonPath":"$.stories[{{INDEX}}].amount","xPath":""}]}"#;

fn operator() -> Address {
    Address::parse("0x00000000000000000000000000000000000000aa").unwrap()
}

fn make_registry() -> ProviderRegistry<MemoryStore> {
    ProviderRegistry::new(
        PaymentMethod::parse("venmo").unwrap(),
        [operator()],
        MemoryStore::new(),
    )
}

fn blueprint() -> TemplateBlueprint {
    TemplateBlueprint::new(serde_json::from_str::<ProviderTemplate>(VENMO_TEMPLATE).unwrap())
}

#[test]
fn template_hash_golden_vectors() {
    let hashes = blueprint().hashes_for_positions(3).unwrap();
    assert_eq!(
        hashes[0].to_hex(),
        "0x73a41b2bcac0e9d60ed438cd53bff9f840e756193b02f74ba5926d32ade392d7"
    );
    assert_eq!(
        hashes[1].to_hex(),
        "0x0e4b0cdbcf851ecd5d8bdae7dbb479e815fd4488e9c000996242003b2ac05b53"
    );
    assert_eq!(
        hashes[2].to_hex(),
        "0x55cfebccda6ba2fa4d45594396e55a31548609e3782c9b80cb9315117bddf82a"
    );
}

#[test]
fn template_field_order_is_fixed_regardless_of_input_order() {
    let reordered = r#"{"responseRedactions":[{"xPath":"","jsonPath":"$.stories[0].amount"}],"body":"","method":"GET","responseMatches":[{"value":"\"amount\":\"- \\$(?<amount>[^\"]+)\"","type":"regex"}],"url":"https://account.venmo.com/api/stories?feedType=me&externalId={{SENDER_ID}}"}"#;
    let template: ProviderTemplate = serde_json::from_str(reordered).unwrap();
    assert_eq!(
        template.canonical_hash().unwrap(),
        blueprint().for_position(0).canonical_hash().unwrap()
    );
}

#[test]
fn duplicate_add_is_rejected_and_changes_nothing() {
    let mut registry = make_registry();
    let hash = blueprint().for_position(0).canonical_hash().unwrap();
    registry.add(&operator(), hash).unwrap();

    let before = registry.enumerate();
    let err = registry.add(&operator(), hash).unwrap_err();
    assert!(matches!(err, RegistryError::ProviderHashAlreadyRegistered { .. }));
    assert_eq!(registry.enumerate(), before);
    assert_eq!(registry.history().len(), 1);
}

#[test]
fn remove_of_absent_hash_is_rejected() {
    let mut registry = make_registry();
    let err = registry
        .remove(&operator(), ProviderHash::digest(b"never added"))
        .unwrap_err();
    assert!(matches!(err, RegistryError::ProviderHashNotRegistered { .. }));
    assert!(registry.history().is_empty());
}

#[test]
fn non_operator_cannot_mutate() {
    let mut registry = make_registry();
    let stranger = Address::parse("0x00000000000000000000000000000000000000bb").unwrap();
    let hash = ProviderHash::digest(b"t");

    let err = registry.add(&stranger, hash).unwrap_err();
    assert!(matches!(err, RegistryError::UnauthorizedRegistryMutation { .. }));
    assert!(!registry.is_registered(&hash));
    assert!(registry.history().is_empty());
}

#[test]
fn history_records_caller_and_action() {
    let mut registry = make_registry();
    let hash = ProviderHash::digest(b"t");
    registry.add(&operator(), hash).unwrap();
    registry.remove(&operator(), hash).unwrap();

    let actions: Vec<_> = registry.history().iter().map(|e| e.action).collect();
    assert_eq!(actions, vec![RegistryAction::Add, RegistryAction::Remove]);
    assert!(registry.history().iter().all(|e| e.caller == operator()));
    assert!(registry.enumerate().is_empty());
}

proptest! {
    #[test]
    fn repeated_adds_leave_one_member(seed in any::<[u8; 8]>(), repeats in 1usize..5) {
        let mut registry = make_registry();
        let hash = ProviderHash::digest(&seed);
        for _ in 0..repeats {
            let _ = registry.add(&operator(), hash);
        }
        prop_assert_eq!(registry.enumerate(), vec![hash]);
        prop_assert_eq!(registry.history().len(), 1);
    }

    #[test]
    fn membership_matches_last_action(ops in proptest::collection::vec((0u8..4, any::<bool>()), 0..24)) {
        let mut registry = make_registry();
        let mut expected = std::collections::BTreeSet::new();
        for (n, add) in ops {
            let hash = ProviderHash::digest(&[n]);
            if add {
                if registry.add(&operator(), hash).is_ok() {
                    expected.insert(hash);
                }
            } else if registry.remove(&operator(), hash).is_ok() {
                expected.remove(&hash);
            }
        }
        prop_assert_eq!(registry.enumerate(), expected.into_iter().collect::<Vec<_>>());
    }
}
