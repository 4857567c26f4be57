//! Transaction signing with Ed25519 keypairs.
//!
//! Signing is a separate step from building because the keypair only
//! exists inside the submission call — construction and validation happen
//! without key material. The signing data is the canonical
//! [`AttestationTransaction::signable_bytes`] output.

use super::builder::AttestationTransaction;
use crate::crypto::keys::Keypair;

/// Signs a transaction in place.
///
/// Produces an Ed25519 signature over `signable_bytes()`, stores it
/// hex-encoded in `tx.signature`, and embeds the hex public key so
/// verifiers need no separate lookup. The transaction `id` is unaffected:
/// it derives from the same signable bytes, which exclude both fields.
pub fn sign_transaction<'a>(
    tx: &'a mut AttestationTransaction,
    keypair: &Keypair,
) -> &'a AttestationTransaction {
    let signable = tx.signable_bytes();
    let signature = keypair.sign(&signable);
    tx.signature = Some(signature.to_hex());
    tx.sender_public_key = Some(keypair.public_key().to_hex());
    tx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::Signature;
    use crate::identity::SigningIdentity;
    use crate::ledger::NetworkParameters;
    use crate::transaction::builder::TransactionBuilder;
    use crate::transaction::record::AttestationRecord;

    fn signed_fixture() -> (AttestationTransaction, Keypair) {
        let keypair = Keypair::from_seed(&[21u8; 32]);
        let identity = SigningIdentity::from_keypair(Keypair::from_seed(&[21u8; 32]));
        let record = AttestationRecord::build("ACK-5", None, &identity).unwrap();
        let params = NetworkParameters {
            fee: 1000,
            min_fee: 1000,
            first_round: 1,
            last_round: 1000,
            genesis_id: "marknet-v1".to_owned(),
            genesis_hash: "aGFzaA==".to_owned(),
        };
        let mut tx = TransactionBuilder::for_record(&record)
            .parameters(&params)
            .build();
        sign_transaction(&mut tx, &keypair);
        (tx, keypair)
    }

    #[test]
    fn sign_sets_signature_and_public_key() {
        let (tx, keypair) = signed_fixture();
        assert!(tx.is_signed());
        assert_eq!(
            tx.sender_public_key.as_deref(),
            Some(keypair.public_key().to_hex().as_str())
        );
        // Ed25519 signatures are 64 bytes = 128 hex characters.
        assert_eq!(tx.signature.as_ref().unwrap().len(), 128);
    }

    #[test]
    fn signature_verifies_against_signable_bytes() {
        let (tx, keypair) = signed_fixture();
        let signature = Signature::from_hex(tx.signature.as_ref().unwrap()).unwrap();
        assert!(keypair.verify(&tx.signable_bytes(), &signature));
    }

    #[test]
    fn tampering_invalidates_signature() {
        let (mut tx, keypair) = signed_fixture();
        let signature = Signature::from_hex(tx.signature.as_ref().unwrap()).unwrap();
        tx.note = b"forged memo".to_vec();
        assert!(!keypair.verify(&tx.signable_bytes(), &signature));
    }

    #[test]
    fn signing_is_deterministic() {
        let (tx_a, _) = signed_fixture();
        let keypair = Keypair::from_seed(&[21u8; 32]);
        let mut tx_b = tx_a.clone();
        tx_b.signature = None;
        tx_b.sender_public_key = None;
        sign_transaction(&mut tx_b, &keypair);
        assert_eq!(tx_a.signature, tx_b.signature);
    }
}
