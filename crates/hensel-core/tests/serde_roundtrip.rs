// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
use hensel_core::{Ciphertext, HenselCode, KeyParams, PublicKey, Rational, SecretKey};
use rand::rngs::StdRng;
use rand::SeedableRng;

const PARAMS: KeyParams = KeyParams {
    message_bits: 8,
    noise_bits: 12,
    capacity: 2,
};

#[test]
fn big_integers_serialize_as_decimal_strings() {
    let hc = HenselCode::new(7919, 990).expect("code");
    let json = serde_json::to_value(&hc).expect("serialize");
    assert_eq!(json, serde_json::json!({ "modulus": "7919", "residue": "990" }));

    let r: Rational = serde_json::from_str(r#"{ "num": "6", "den": "-8" }"#).expect("parse");
    assert_eq!(r, Rational::new(-3, 4).expect("q"));
}

#[test]
fn invalid_wire_values_are_rejected() {
    for bad in [
        r#"{ "modulus": "8", "residue": "1" }"#,
        r#"{ "modulus": "7", "residue": "7" }"#,
        r#"{ "modulus": "7", "residue": "x" }"#,
    ] {
        assert!(serde_json::from_str::<HenselCode>(bad).is_err(), "{bad}");
    }
    assert!(serde_json::from_str::<Rational>(r#"{ "num": "1", "den": "0" }"#).is_err());
}

#[test]
fn stored_keys_still_decrypt() {
    let mut rng = StdRng::seed_from_u64(99);
    let key = SecretKey::generate(PARAMS, &mut rng).expect("keygen");
    let m = Rational::new(-7, 9).expect("q");
    let c = key.encrypt(&m, &mut rng).expect("encrypt");

    let key_json = serde_json::to_string_pretty(&key).expect("key json");
    let pk_json = serde_json::to_string(&key.public_key()).expect("pk json");
    let c_json = serde_json::to_string(&c).expect("c json");

    let key2: SecretKey = serde_json::from_str(&key_json).expect("key back");
    let pk2: PublicKey = serde_json::from_str(&pk_json).expect("pk back");
    let c2: Ciphertext = serde_json::from_str(&c_json).expect("c back");

    assert_eq!(pk2, key.public_key());
    assert_eq!(key2.decrypt(&c2), Ok(m.clone()));
    let doubled = pk2.add(&c2, &c2).expect("add");
    assert_eq!(key2.decrypt(&doubled), Ok(&m + &m));
}

#[test]
fn tampered_key_files_fail_validation() {
    let mut rng = StdRng::seed_from_u64(100);
    let key = SecretKey::generate(PARAMS, &mut rng).expect("keygen");
    let mut value = serde_json::to_value(&key).expect("json");
    value["p4"] = serde_json::Value::String("7919".into());
    assert!(serde_json::from_value::<SecretKey>(value).is_err());

    let zero_weight = serde_json::json!({
        "code": { "modulus": "7919", "residue": "1" },
        "weight": 0
    });
    assert!(serde_json::from_value::<Ciphertext>(zero_weight).is_err());
}
