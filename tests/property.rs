use base64::{engine::general_purpose::STANDARD, Engine as _};
use bech32::FromBase32;
use proptest::prelude::*;
use sui_tx_core::crypto::multisig::{bitmap_indices, MAX_BITMAP_VALUE};
use sui_tx_core::crypto::DEFAULT_ED25519_PATH;
use sui_tx_core::transaction::{compute_gas_budget, GasCost};
use sui_tx_core::{
    verify_personal_message_signature, MultiSigPublicKey, SerializedSignature, SignatureScheme,
    SuiAddress, SuiError, SuiKeyPair,
};

/// Flip one bit of a serialized single signature
fn flip_bit(signature: &SerializedSignature, byte: usize, bit: u8) -> String {
    let mut bytes = signature.to_bytes();
    bytes[byte] ^= 1 << bit;
    STANDARD.encode(bytes)
}

fn any_scheme() -> impl Strategy<Value = SignatureScheme> {
    prop_oneof![
        Just(SignatureScheme::Ed25519),
        Just(SignatureScheme::Secp256k1),
        Just(SignatureScheme::Secp256r1),
    ]
}

fn any_keypair() -> impl Strategy<Value = SuiKeyPair> {
    (any_scheme(), prop::array::uniform32(any::<u8>())).prop_filter_map(
        "valid secret scalar",
        |(scheme, secret)| SuiKeyPair::from_secret_key(scheme, &secret, true).ok(),
    )
}

proptest! {
    #[test]
    fn short_addresses_pad_to_full_width(bytes in prop::array::uniform32(any::<u8>())) {
        let address = SuiAddress::new(bytes);
        let hex = address.to_hex();
        prop_assert_eq!(hex.len(), 66);

        let trimmed = format!("0x{}", hex[2..].trim_start_matches('0'));
        if trimmed != "0x" {
            prop_assert_eq!(SuiAddress::from_hex(&trimmed).unwrap(), address);
        }
    }

    #[test]
    fn personal_messages_verify_for_every_scheme(keypair in any_keypair(), message in prop::collection::vec(any::<u8>(), 0..256)) {
        let signature = keypair.sign_personal_message(&message).unwrap();
        let signer = verify_personal_message_signature(&message, &signature.to_base64()).unwrap();
        prop_assert_eq!(signer, keypair.address());

        let mut tampered = message.clone();
        tampered.push(0);
        prop_assert!(verify_personal_message_signature(&tampered, &signature.to_base64()).is_err());
    }

    #[test]
    fn flipped_signature_bits_never_verify(
        keypair in any_keypair(),
        message in prop::collection::vec(any::<u8>(), 0..64),
        byte in 1usize..65,
        bit in 0u8..8,
    ) {
        let signature = keypair.sign_personal_message(&message).unwrap();
        let tampered = flip_bit(&signature, byte, bit);

        prop_assert!(!keypair.public_key().verify_personal_message(&message, &tampered).unwrap());
        prop_assert!(matches!(
            verify_personal_message_signature(&message, &tampered),
            Err(SuiError::InvalidSignature(_))
        ));
    }

    #[test]
    fn flipped_public_key_bits_never_verify(
        keypair in any_keypair(),
        offset in 0usize..32,
        bit in 0u8..8,
    ) {
        let signature = keypair.sign_personal_message(b"embedded key").unwrap();
        let tampered = flip_bit(&signature, 65 + offset, bit);

        // Off-curve keys included: these still parse and simply fail
        prop_assert!(!keypair.public_key().verify_personal_message(b"embedded key", &tampered).unwrap());
        prop_assert!(matches!(
            verify_personal_message_signature(b"embedded key", &tampered),
            Err(SuiError::InvalidSignature(_))
        ));
    }

    #[test]
    fn bech32_private_keys_round_trip_bytes(
        scheme in any_scheme(),
        secret in prop::array::uniform32(any::<u8>()),
    ) {
        let Ok(keypair) = SuiKeyPair::from_secret_key(scheme, &secret, false) else {
            // Not a valid scalar for this curve
            return Ok(());
        };
        let encoded = keypair.to_bech32().unwrap();
        prop_assert!(encoded.starts_with("suiprivkey1"));

        let (hrp, data, variant) = bech32::decode(&encoded).unwrap();
        prop_assert_eq!(hrp.as_str(), "suiprivkey");
        prop_assert_eq!(variant, bech32::Variant::Bech32);
        let payload = Vec::<u8>::from_base32(&data).unwrap();
        prop_assert_eq!(payload.len(), 33);
        prop_assert_eq!(payload[0], scheme.flag());
        prop_assert_eq!(&payload[1..], &secret[..]);

        let decoded = SuiKeyPair::from_bech32(&encoded).unwrap();
        prop_assert_eq!(decoded.scheme(), scheme);
        prop_assert_eq!(decoded.address(), keypair.address());
        let reencoded = decoded.to_bech32().unwrap();
        prop_assert_eq!(reencoded.as_str(), encoded.as_str());
    }

    #[test]
    fn bitmap_indices_match_set_bits(bitmap in 0u16..=MAX_BITMAP_VALUE) {
        let indices = bitmap_indices(bitmap).unwrap();
        prop_assert_eq!(indices.len() as u32, bitmap.count_ones());
        prop_assert!(indices.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(indices.iter().all(|&i| bitmap & (1 << i) != 0));
    }

    #[test]
    fn bitmaps_over_limit_are_rejected(bitmap in (MAX_BITMAP_VALUE + 1)..=u16::MAX) {
        prop_assert!(bitmap_indices(bitmap).is_err());
    }

    #[test]
    fn gas_budget_never_below_computation_floor(
        computation in 0u64..1_000_000_000_000,
        storage in 0u64..1_000_000_000_000,
        rebate in 0u64..1_000_000_000_000,
        price in 1u64..100_000,
        overhead in 0u64..10_000,
    ) {
        let cost = GasCost { computation_cost: computation, storage_cost: storage, storage_rebate: rebate };
        let budget = compute_gas_budget(&cost, price, overhead).unwrap();
        let floor = computation + price * overhead;

        prop_assert!(budget >= floor);
        if rebate >= storage {
            prop_assert_eq!(budget, floor);
        } else {
            prop_assert_eq!(budget, floor + storage - rebate);
        }
    }

    #[test]
    fn multisig_address_depends_on_member_order(
        seeds in prop::collection::hash_set(any::<u8>(), 2..5),
        threshold in 1u16..=2,
    ) {
        let keys: Vec<_> = seeds
            .iter()
            .map(|s| {
                SuiKeyPair::derive_from_seed(SignatureScheme::Ed25519, &[*s; 32], DEFAULT_ED25519_PATH)
                    .unwrap()
                    .public_key()
            })
            .collect();
        let weights = vec![1u8; keys.len()];

        let forward = MultiSigPublicKey::new(keys.clone(), weights.clone(), threshold).unwrap();
        let mut reversed_keys = keys;
        reversed_keys.reverse();
        let reversed = MultiSigPublicKey::new(reversed_keys, weights, threshold).unwrap();

        prop_assert_ne!(forward.address(), reversed.address());
        prop_assert_eq!(MultiSigPublicKey::from_base64(&forward.to_base64()).unwrap(), forward);
    }

    #[test]
    fn garbage_signatures_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..400)) {
        let _ = SerializedSignature::from_bytes(&bytes);
    }
}
