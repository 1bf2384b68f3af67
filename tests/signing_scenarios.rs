use sui_tx_core::crypto::intent::personal_message_bytes;
use sui_tx_core::crypto::{Intent, DEFAULT_ED25519_PATH};
use sui_tx_core::{
    verify_personal_message_signature, MultiSigPublicKey, PublicKey, SerializedSignature,
    SignatureScheme, SuiError, SuiKeyPair,
};

const SEED: &[u8] = b"hello, go modules!";
const MESSAGE: &[u8] = b"Sui intent signing";

fn seeded_keypair() -> SuiKeyPair {
    SuiKeyPair::derive_from_seed(SignatureScheme::Ed25519, SEED, DEFAULT_ED25519_PATH)
        .expect("seed derives")
}

#[test]
fn seeded_ed25519_signature_round_trips_and_verifies() {
    let keypair = seeded_keypair();
    let serialized = keypair.sign_personal_message(MESSAGE).expect("signs");
    let bytes = serialized.to_bytes();
    assert_eq!(bytes.len(), 1 + 64 + 32);
    assert_eq!(bytes[0], SignatureScheme::Ed25519.flag());

    let parsed = SerializedSignature::from_bytes(&bytes).expect("parses");
    let single = match &parsed {
        SerializedSignature::Single(single) => single.clone(),
        other => panic!("expected a single signature, got {:?}", other),
    };
    assert_eq!(single.scheme(), SignatureScheme::Ed25519);
    assert_eq!(&single.signature[..], &bytes[1..65]);
    assert_eq!(single.public_key, keypair.public_key());
    assert!(keypair
        .public_key()
        .verify_personal_message(MESSAGE, &parsed.to_base64())
        .expect("verifies"));

    // Deterministic across runs
    let again = seeded_keypair().sign_personal_message(MESSAGE).expect("signs");
    assert_eq!(again, serialized);
}

#[test]
fn corrupted_public_key_fails_verification() {
    let keypair = seeded_keypair();
    let original = keypair.sign_personal_message(MESSAGE).expect("signs").to_bytes();
    let payload = personal_message_bytes(MESSAGE);

    // Every bit of the embedded key, whether or not the result is a curve point
    for byte in 65..original.len() {
        for bit in 0..8 {
            let mut bytes = original.clone();
            bytes[byte] ^= 1 << bit;

            let parsed = SerializedSignature::from_bytes(&bytes).expect("length is unchanged");
            let single = match &parsed {
                SerializedSignature::Single(single) => single.clone(),
                other => panic!("unexpected {:?}", other),
            };
            assert!(
                !single.verify(Intent::personal_message(), &payload).expect("no decode error"),
                "byte {} bit {} verified",
                byte,
                bit
            );
            assert!(!keypair
                .public_key()
                .verify_personal_message(MESSAGE, &parsed.to_base64())
                .expect("well-formed signature"));
            assert!(matches!(
                verify_personal_message_signature(MESSAGE, &parsed.to_base64()),
                Err(SuiError::InvalidSignature(_))
            ));
        }
    }
}

#[test]
fn four_key_threshold_three_address_is_stable() {
    let build = || {
        let keys: Vec<PublicKey> = (0..4u8)
            .map(|i| {
                let scheme = SignatureScheme::ALL[usize::from(i) % 3];
                SuiKeyPair::derive_from_seed(
                    scheme,
                    &[i + 1; 64],
                    sui_tx_core::crypto::DerivationPath::default_for(scheme).expect("default path"),
                )
                .expect("derives")
                .public_key()
            })
            .collect();
        MultiSigPublicKey::new(keys, vec![1, 1, 1, 2], 3).expect("valid multisig")
    };

    let first = build();
    let second = build();
    assert_eq!(first.address(), second.address());
    assert_eq!(first.to_base64(), second.to_base64());
    assert_eq!(first.total_weight(), 5);

    let decoded = MultiSigPublicKey::from_base64(&first.to_base64()).expect("decodes");
    assert_eq!(decoded.address(), first.address());
}

#[test]
fn multisig_threshold_reached_only_with_enough_weight() {
    let signers: Vec<SuiKeyPair> = (0..3u8)
        .map(|i| {
            SuiKeyPair::derive_from_seed(SignatureScheme::Ed25519, &[i; 32], DEFAULT_ED25519_PATH)
                .expect("derives")
        })
        .collect();
    let multisig_pk = MultiSigPublicKey::new(
        signers.iter().map(SuiKeyPair::public_key).collect(),
        vec![1, 1, 2],
        3,
    )
    .expect("valid multisig");

    let sign = |i: usize| signers[i].sign_personal_message(MESSAGE).expect("signs");

    let weak = multisig_pk
        .combine_partial_signatures(&[sign(0), sign(1)])
        .expect("combines");
    assert!(!multisig_pk
        .verify_personal_message(MESSAGE, &weak.to_base64())
        .expect("well-formed"));

    let strong = multisig_pk
        .combine_partial_signatures(&[sign(2), sign(0)])
        .expect("combines");
    assert!(multisig_pk
        .verify_personal_message(MESSAGE, &strong.to_base64())
        .expect("well-formed"));

    let outsider = SuiKeyPair::generate(SignatureScheme::Ed25519).expect("generates");
    let err = multisig_pk
        .combine_partial_signatures(&[outsider.sign_personal_message(MESSAGE).expect("signs")])
        .unwrap_err();
    assert!(matches!(err, SuiError::UnknownSigner { .. }));
}
