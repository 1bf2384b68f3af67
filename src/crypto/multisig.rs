//! Weighted threshold multisig
//!
//! A `MultiSigPublicKey` is an ordered list of `(public key, weight)`
//! members plus a threshold. A `MultiSig` carries one compressed signature
//! per contributing member and a 16-bit bitmap whose bit `i` marks the
//! `i`-th declared member.
//!
//! BCS layout, written by hand because both enums are tagged by scheme:
//!
//! ```text
//! MultiSigPublicKey = uleb(n) (tag pk[32|33] weight:u8)* threshold:u16
//! MultiSig          = uleb(m) (tag sig[64])* bitmap:u16 MultiSigPublicKey
//! ```

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::collections::HashSet;

use super::intent::{intent_digest, personal_message_bytes, Intent};
use super::public_key::PublicKey;
use super::scheme::SignatureScheme;
use super::signature::SerializedSignature;
use crate::error::{SuiError, SuiResult};
use crate::types::{blake2b256, SuiAddress};
use crate::utils::codec::{BcsReader, BcsWriter};
use crate::log_debug;

pub const MAX_SIGNERS: usize = 10;

/// Highest bitmap with only the low `MAX_SIGNERS` bits set
pub const MAX_BITMAP_VALUE: u16 = (1 << MAX_SIGNERS) - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultiSigMember {
    pub public_key: PublicKey,
    pub weight: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiSigPublicKey {
    members: Vec<MultiSigMember>,
    threshold: u16,
}

/// BCS enum tag of a scheme inside `PublicKey` / `CompressedSignature`
fn scheme_tag(scheme: SignatureScheme) -> u8 {
    match scheme {
        SignatureScheme::Ed25519 => 0,
        SignatureScheme::Secp256k1 => 1,
        _ => 2,
    }
}

fn scheme_from_tag(tag: u8) -> SuiResult<SignatureScheme> {
    match tag {
        0 => Ok(SignatureScheme::Ed25519),
        1 => Ok(SignatureScheme::Secp256k1),
        2 => Ok(SignatureScheme::Secp256r1),
        other => Err(SuiError::InvalidMultiSig(format!("unsupported scheme tag {}", other))),
    }
}

impl MultiSigPublicKey {
    pub fn new(public_keys: Vec<PublicKey>, weights: Vec<u8>, threshold: u16) -> SuiResult<Self> {
        if public_keys.len() != weights.len() {
            return Err(SuiError::InvalidMultiSig(format!(
                "{} public keys but {} weights",
                public_keys.len(),
                weights.len()
            )));
        }
        let members = public_keys
            .into_iter()
            .zip(weights)
            .map(|(public_key, weight)| MultiSigMember { public_key, weight })
            .collect();
        Self::from_members(members, threshold)
    }

    fn from_members(members: Vec<MultiSigMember>, threshold: u16) -> SuiResult<Self> {
        if members.is_empty() || members.len() > MAX_SIGNERS {
            return Err(SuiError::InvalidMultiSig(format!(
                "member count must be 1..={}, got {}",
                MAX_SIGNERS,
                members.len()
            )));
        }
        if threshold == 0 {
            return Err(SuiError::InvalidThreshold("threshold must be at least 1".into()));
        }

        let mut seen = HashSet::new();
        for (i, member) in members.iter().enumerate() {
            if member.weight == 0 {
                return Err(SuiError::InvalidMultiSig(format!("member {} has zero weight", i)));
            }
            if !seen.insert(member.public_key.as_bytes().to_vec()) {
                return Err(SuiError::DuplicatePublicKey(i));
            }
        }

        let total_weight: u32 = members.iter().map(|m| u32::from(m.weight)).sum();
        if total_weight < u32::from(threshold) {
            return Err(SuiError::UnreachableThreshold {
                threshold,
                total_weight,
            });
        }

        Ok(Self { members, threshold })
    }

    pub fn members(&self) -> &[MultiSigMember] {
        &self.members
    }

    pub fn threshold(&self) -> u16 {
        self.threshold
    }

    pub fn total_weight(&self) -> u32 {
        self.members.iter().map(|m| u32::from(m.weight)).sum()
    }

    /// Position of `public_key` in the declared member order
    pub fn member_index(&self, public_key: &PublicKey) -> Option<usize> {
        self.members.iter().position(|m| m.public_key == *public_key)
    }

    /// BLAKE2b-256(0x03 || threshold LE || (flag || pk || weight)*)
    pub fn address(&self) -> SuiAddress {
        let mut preimage = vec![SignatureScheme::MultiSig.flag()];
        preimage.extend_from_slice(&self.threshold.to_le_bytes());
        for member in &self.members {
            preimage.extend_from_slice(&member.public_key.to_sui_bytes());
            preimage.push(member.weight);
        }
        SuiAddress::new(blake2b256(&[&preimage]))
    }

    fn write_to(&self, writer: &mut BcsWriter) {
        writer.write_uleb128(self.members.len() as u64);
        for member in &self.members {
            writer
                .write_u8(scheme_tag(member.public_key.scheme()))
                .write_fixed(member.public_key.as_bytes())
                .write_u8(member.weight);
        }
        writer.write_u16(self.threshold);
    }

    fn read_from(reader: &mut BcsReader<'_>) -> SuiResult<Self> {
        let count = reader.read_uleb128()? as usize;
        if count > MAX_SIGNERS {
            return Err(SuiError::InvalidMultiSig(format!("{} members exceeds {}", count, MAX_SIGNERS)));
        }
        let mut members = Vec::with_capacity(count);
        for _ in 0..count {
            let scheme = scheme_from_tag(reader.read_u8()?)?;
            let public_key = match scheme {
                SignatureScheme::Ed25519 => PublicKey::from_bytes(scheme, &reader.read_fixed::<32>()?)?,
                _ => PublicKey::from_bytes(scheme, &reader.read_fixed::<33>()?)?,
            };
            let weight = reader.read_u8()?;
            members.push(MultiSigMember { public_key, weight });
        }
        let threshold = reader.read_u16()?;
        Self::from_members(members, threshold)
    }

    pub fn to_bcs_bytes(&self) -> Vec<u8> {
        let mut writer = BcsWriter::new();
        self.write_to(&mut writer);
        writer.into_bytes()
    }

    pub fn from_bcs_bytes(bytes: &[u8]) -> SuiResult<Self> {
        let mut reader = BcsReader::new(bytes);
        let multisig_pk = Self::read_from(&mut reader)?;
        reader.finish()?;
        Ok(multisig_pk)
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.to_bcs_bytes())
    }

    pub fn from_base64(encoded: &str) -> SuiResult<Self> {
        Self::from_bcs_bytes(&STANDARD.decode(encoded.trim())?)
    }

    /// Combine single-signer signatures from members into one multisig.
    ///
    /// The output lists signatures in ascending member ordinal, whatever
    /// order `signatures` arrives in: the k-th signature belongs to the
    /// member at the k-th set bit of the bitmap. The same partials in any
    /// order therefore combine to identical bytes.
    pub fn combine_partial_signatures(
        &self,
        signatures: &[SerializedSignature],
    ) -> SuiResult<SerializedSignature> {
        if signatures.is_empty() {
            return Err(SuiError::InvalidMultiSig("no signatures to combine".into()));
        }

        let mut bitmap: u16 = 0;
        let mut indexed = Vec::with_capacity(signatures.len());
        for (index, signature) in signatures.iter().enumerate() {
            let single = match signature {
                SerializedSignature::Single(single) => single,
                SerializedSignature::MultiSig(_) => {
                    return Err(SuiError::InvalidMultiSig(format!(
                        "signature {} is itself a multisig",
                        index
                    )))
                }
            };
            let member = self
                .member_index(&single.public_key)
                .ok_or(SuiError::UnknownSigner { index })?;
            if bitmap & (1 << member) != 0 {
                return Err(SuiError::DuplicateSigner { index, member });
            }
            bitmap |= 1 << member;
            indexed.push((
                member,
                CompressedSignature {
                    scheme: single.scheme(),
                    bytes: single.signature,
                },
            ));
        }
        indexed.sort_by_key(|(member, _)| *member);

        log_debug!(
            "multisig",
            "Combined partial signatures",
            signers = indexed.len(),
            bitmap = bitmap,
            address = self.address()
        );

        Ok(SerializedSignature::MultiSig(MultiSig {
            signatures: indexed.into_iter().map(|(_, sig)| sig).collect(),
            bitmap,
            multisig_pk: self.clone(),
        }))
    }

    /// Verify a serialized multisig over `intent || payload` against this
    /// key. A signature for a different key set is `Ok(false)`.
    pub fn verify(&self, intent: Intent, payload: &[u8], serialized: &str) -> SuiResult<bool> {
        let multisig = match SerializedSignature::parse(serialized)? {
            SerializedSignature::MultiSig(multisig) => multisig,
            SerializedSignature::Single(_) => return Ok(false),
        };
        // Byte-identical membership and threshold, not just the same address
        if multisig.multisig_pk.to_bcs_bytes() != self.to_bcs_bytes() {
            return Ok(false);
        }
        multisig.verify(intent, payload)
    }

    pub fn verify_personal_message(&self, message: &[u8], serialized: &str) -> SuiResult<bool> {
        self.verify(
            Intent::personal_message(),
            &personal_message_bytes(message),
            serialized,
        )
    }

    pub fn verify_transaction(&self, tx_bytes: &[u8], serialized: &str) -> SuiResult<bool> {
        self.verify(Intent::transaction_data(), tx_bytes, serialized)
    }
}

/// A member signature without its public key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressedSignature {
    pub scheme: SignatureScheme,
    pub bytes: [u8; 64],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiSig {
    signatures: Vec<CompressedSignature>,
    bitmap: u16,
    multisig_pk: MultiSigPublicKey,
}

/// Member ordinals for the set bits of `bitmap`, low to high
pub fn bitmap_indices(bitmap: u16) -> SuiResult<Vec<usize>> {
    if bitmap > MAX_BITMAP_VALUE {
        return Err(SuiError::InvalidMultiSig(format!(
            "bitmap {} exceeds {}",
            bitmap, MAX_BITMAP_VALUE
        )));
    }
    Ok((0..MAX_SIGNERS).filter(|i| bitmap & (1 << i) != 0).collect())
}

impl MultiSig {
    pub fn signatures(&self) -> &[CompressedSignature] {
        &self.signatures
    }

    pub fn bitmap(&self) -> u16 {
        self.bitmap
    }

    pub fn multisig_pk(&self) -> &MultiSigPublicKey {
        &self.multisig_pk
    }

    pub fn to_bcs_bytes(&self) -> Vec<u8> {
        let mut writer = BcsWriter::new();
        writer.write_uleb128(self.signatures.len() as u64);
        for sig in &self.signatures {
            writer.write_u8(scheme_tag(sig.scheme)).write_fixed(&sig.bytes);
        }
        writer.write_u16(self.bitmap);
        self.multisig_pk.write_to(&mut writer);
        writer.into_bytes()
    }

    pub fn from_bcs_bytes(bytes: &[u8]) -> SuiResult<Self> {
        let mut reader = BcsReader::new(bytes);
        let count = reader.read_uleb128()? as usize;
        if count > MAX_SIGNERS {
            return Err(SuiError::InvalidMultiSig(format!("{} signatures exceeds {}", count, MAX_SIGNERS)));
        }
        let mut signatures = Vec::with_capacity(count);
        for _ in 0..count {
            let scheme = scheme_from_tag(reader.read_u8()?)?;
            let bytes = reader.read_fixed::<64>()?;
            signatures.push(CompressedSignature { scheme, bytes });
        }
        let bitmap = reader.read_u16()?;
        let multisig_pk = MultiSigPublicKey::read_from(&mut reader)?;
        reader.finish()?;

        Ok(Self {
            signatures,
            bitmap,
            multisig_pk,
        })
    }

    /// Every component must verify and the summed weight must reach the
    /// threshold.
    pub fn verify(&self, intent: Intent, payload: &[u8]) -> SuiResult<bool> {
        let indices = bitmap_indices(self.bitmap)?;
        if indices.len() != self.signatures.len() {
            return Err(SuiError::InvalidMultiSig(format!(
                "bitmap marks {} signers but {} signatures are present",
                indices.len(),
                self.signatures.len()
            )));
        }

        let digest = intent_digest(intent, payload);
        let mut weight: u32 = 0;
        for (sig, &member_index) in self.signatures.iter().zip(&indices) {
            let member = self.multisig_pk.members.get(member_index).ok_or_else(|| {
                SuiError::InvalidMultiSig(format!("bitmap references missing member {}", member_index))
            })?;
            if member.public_key.scheme() != sig.scheme {
                return Ok(false);
            }
            if !member.public_key.verify_raw(&digest, &sig.bytes)? {
                return Ok(false);
            }
            weight += u32::from(member.weight);
        }

        Ok(weight >= u32::from(self.multisig_pk.threshold))
    }
}
