//! EIP-4844 blob sidecars and the KZG capability.
//!
//! Sidecars only appear in the network wrapper
//! `[tx, [blob, ...], [commitment, ...], [proof, ...]]`; they are never part
//! of the signing hash or the transaction hash. Commitment and proof
//! computation is delegated to a [`Kzg`] implementation supplied by the caller.

use alloy_primitives::{Bytes, FixedBytes, B256};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use scribe_core::error::{TransactionError, TransactionResult};
use scribe_core::rlp::{decode_bytes, RlpList};

/// Size of one blob in bytes (4096 field elements of 32 bytes).
pub const BLOB_SIZE: usize = 131_072;

/// Size of a KZG commitment or proof in bytes.
pub const KZG_ELEMENT_SIZE: usize = 48;

/// Version byte of a KZG versioned hash.
pub const VERSIONED_HASH_VERSION_KZG: u8 = 0x01;

/// A 48-byte KZG commitment.
pub type KzgCommitment = FixedBytes<48>;

/// A 48-byte KZG proof.
pub type KzgProof = FixedBytes<48>;

/// External KZG commitment scheme.
///
/// Implementations wrap a trusted setup; this crate never computes
/// commitments itself.
pub trait Kzg {
    /// Commit to a blob.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::Kzg`] if the backend rejects the blob.
    fn blob_to_commitment(&self, blob: &[u8]) -> TransactionResult<KzgCommitment>;

    /// Compute the proof for a blob and its commitment.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::Kzg`] if the backend fails.
    fn compute_proof(&self, blob: &[u8], commitment: &KzgCommitment)
        -> TransactionResult<KzgProof>;
}

/// One blob with its commitment and proof.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlobSidecar {
    /// Blob contents, exactly [`BLOB_SIZE`] bytes.
    pub blob: Bytes,
    /// KZG commitment to the blob.
    pub commitment: KzgCommitment,
    /// KZG proof for the commitment.
    pub proof: KzgProof,
}

impl BlobSidecar {
    /// Build sidecars for `blobs`, computing commitments and proofs with `kzg`.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::InvalidSidecar`] for a wrongly sized blob and
    /// propagates [`Kzg`] failures.
    pub fn from_blobs(blobs: &[Bytes], kzg: &dyn Kzg) -> TransactionResult<Vec<Self>> {
        blobs
            .iter()
            .enumerate()
            .map(|(index, blob)| {
                check_blob_size(index, blob)?;
                let commitment = kzg.blob_to_commitment(blob)?;
                let proof = kzg.compute_proof(blob, &commitment)?;
                Ok(Self {
                    blob: blob.clone(),
                    commitment,
                    proof,
                })
            })
            .collect()
    }

    /// The versioned hash of this blob's commitment: `0x01 ‖ sha256(commitment)[1..]`.
    #[must_use]
    pub fn versioned_hash(&self) -> B256 {
        versioned_hash(&self.commitment)
    }
}

/// `0x01 ‖ sha256(commitment)[1..]`.
#[must_use]
pub fn versioned_hash(commitment: &KzgCommitment) -> B256 {
    let mut hash = B256::from_slice(&Sha256::digest(commitment.as_slice()));
    hash[0] = VERSIONED_HASH_VERSION_KZG;
    hash
}

fn check_blob_size(index: usize, blob: &[u8]) -> TransactionResult<()> {
    if blob.len() == BLOB_SIZE {
        Ok(())
    } else {
        Err(TransactionError::invalid_sidecar(format!(
            "blob {index} is {} bytes, expected {BLOB_SIZE}",
            blob.len()
        )))
    }
}

fn decode_kzg_element(kind: &str, index: usize, raw: &[u8]) -> TransactionResult<FixedBytes<48>> {
    let bytes = decode_bytes(raw)?;
    if bytes.len() != KZG_ELEMENT_SIZE {
        return Err(TransactionError::invalid_sidecar(format!(
            "{kind} {index} is {} bytes, expected {KZG_ELEMENT_SIZE}",
            bytes.len()
        )));
    }
    Ok(FixedBytes::from_slice(&bytes))
}

/// Split sidecars into the `blobs`, `commitments` and `proofs` lists of the wrapper.
#[must_use]
pub fn sidecars_to_rlp(sidecars: &[BlobSidecar]) -> [RlpList; 3] {
    let mut blobs = RlpList::new();
    let mut commitments = RlpList::new();
    let mut proofs = RlpList::new();
    for sidecar in sidecars {
        blobs.push(&sidecar.blob);
        commitments.push(&sidecar.commitment);
        proofs.push(&sidecar.proof);
    }
    [blobs, commitments, proofs]
}

/// Reassemble sidecars from the three wrapper lists.
///
/// # Errors
///
/// Returns [`TransactionError::InvalidSidecar`] if the lists differ in length
/// or any element has the wrong size.
pub fn sidecars_from_rlp(
    blobs: &[&[u8]],
    commitments: &[&[u8]],
    proofs: &[&[u8]],
) -> TransactionResult<Vec<BlobSidecar>> {
    if blobs.len() != commitments.len() || blobs.len() != proofs.len() {
        return Err(TransactionError::invalid_sidecar(format!(
            "{} blobs, {} commitments and {} proofs",
            blobs.len(),
            commitments.len(),
            proofs.len()
        )));
    }

    blobs
        .iter()
        .zip(commitments)
        .zip(proofs)
        .enumerate()
        .map(|(index, ((blob, commitment), proof))| {
            let blob = decode_bytes(blob)?;
            check_blob_size(index, &blob)?;
            Ok(BlobSidecar {
                blob,
                commitment: decode_kzg_element("commitment", index, commitment)?,
                proof: decode_kzg_element("proof", index, proof)?,
            })
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use alloy_primitives::keccak256;
    use scribe_core::rlp::decode_list;

    /// Deterministic stand-in for a KZG backend.
    pub(crate) struct HashKzg;

    impl Kzg for HashKzg {
        fn blob_to_commitment(&self, blob: &[u8]) -> TransactionResult<KzgCommitment> {
            let hash = keccak256(blob);
            let mut out = [0u8; 48];
            out[..32].copy_from_slice(hash.as_slice());
            Ok(FixedBytes::from(out))
        }

        fn compute_proof(
            &self,
            _blob: &[u8],
            commitment: &KzgCommitment,
        ) -> TransactionResult<KzgProof> {
            let mut out = commitment.0;
            out.reverse();
            Ok(FixedBytes::from(out))
        }
    }

    struct FailingKzg;

    impl Kzg for FailingKzg {
        fn blob_to_commitment(&self, _blob: &[u8]) -> TransactionResult<KzgCommitment> {
            Err(TransactionError::kzg("trusted setup not loaded"))
        }

        fn compute_proof(
            &self,
            _blob: &[u8],
            _commitment: &KzgCommitment,
        ) -> TransactionResult<KzgProof> {
            Err(TransactionError::kzg("trusted setup not loaded"))
        }
    }

    pub(crate) fn blob(fill: u8) -> Bytes {
        Bytes::from(vec![fill; BLOB_SIZE])
    }

    #[test]
    fn test_from_blobs_uses_kzg() {
        let sidecars = BlobSidecar::from_blobs(&[blob(1), blob(2)], &HashKzg).unwrap();

        assert_eq!(sidecars.len(), 2);
        assert_eq!(sidecars[0].blob, blob(1));
        assert_eq!(
            sidecars[0].commitment,
            HashKzg.blob_to_commitment(&blob(1)).unwrap()
        );
        assert_ne!(sidecars[0].commitment, sidecars[1].commitment);
    }

    #[test]
    fn test_from_blobs_rejects_wrong_size() {
        let err = BlobSidecar::from_blobs(&[Bytes::from_static(&[0u8; 10])], &HashKzg).unwrap_err();
        assert!(matches!(err, TransactionError::InvalidSidecar { .. }));
    }

    #[test]
    fn test_from_blobs_propagates_kzg_error() {
        let err = BlobSidecar::from_blobs(&[blob(0)], &FailingKzg).unwrap_err();
        assert!(matches!(err, TransactionError::Kzg { .. }));
    }

    #[test]
    fn test_versioned_hash_has_version_byte() {
        let commitment = KzgCommitment::repeat_byte(0xc0);
        let hash = versioned_hash(&commitment);
        let digest = Sha256::digest(commitment.as_slice());

        assert_eq!(hash[0], 0x01);
        assert_eq!(&hash[1..], &digest[1..]);
    }

    #[test]
    fn test_wrapper_lists_roundtrip() {
        let sidecars = BlobSidecar::from_blobs(&[blob(7)], &HashKzg).unwrap();
        let [blobs, commitments, proofs] = sidecars_to_rlp(&sidecars);
        let (blobs, commitments, proofs) = (blobs.finish(), commitments.finish(), proofs.finish());

        let decoded = sidecars_from_rlp(
            &decode_list(&blobs).unwrap(),
            &decode_list(&commitments).unwrap(),
            &decode_list(&proofs).unwrap(),
        )
        .unwrap();
        assert_eq!(decoded, sidecars);
    }

    #[test]
    fn test_mismatched_list_lengths_rejected() {
        let sidecars = BlobSidecar::from_blobs(&[blob(7)], &HashKzg).unwrap();
        let [blobs, _, proofs] = sidecars_to_rlp(&sidecars);
        let (blobs, proofs) = (blobs.finish(), proofs.finish());

        let err = sidecars_from_rlp(
            &decode_list(&blobs).unwrap(),
            &[],
            &decode_list(&proofs).unwrap(),
        )
        .unwrap_err();
        assert!(matches!(err, TransactionError::InvalidSidecar { .. }));
    }

    #[test]
    fn test_short_commitment_rejected() {
        let short = alloy_rlp::encode(&[0u8; 47][..]);
        let blob = alloy_rlp::encode(&blob(0)[..]);

        let err = sidecars_from_rlp(&[blob.as_slice()], &[short.as_slice()], &[short.as_slice()])
            .unwrap_err();
        assert!(matches!(err, TransactionError::InvalidSidecar { .. }));
    }
}
