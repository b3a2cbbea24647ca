// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{
    CiphertextHandle, ClearValue, EAddress, EBool, EUint64, EncryptedInput, FheBackend, FheError,
    FheResult, FheType, HandleId, InputProof,
};
use rand::{rngs::OsRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sealbid_utils::Identity;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

struct StoredCiphertext {
    value: ClearValue,
    acl: HashSet<Identity>,
}

#[derive(Default)]
struct MockState {
    ciphertexts: HashMap<HandleId, StoredCiphertext>,
    nonce: u64,
}

impl MockState {
    fn next_handle(&mut self, op: &str, parts: &[&[u8]]) -> HandleId {
        let mut hasher = Sha256::new();
        hasher.update(op.as_bytes());
        for part in parts {
            hasher.update(part);
        }
        hasher.update(self.nonce.to_le_bytes());
        self.nonce += 1;
        HandleId(hasher.finalize().into())
    }

    fn insert(&mut self, id: HandleId, value: ClearValue, acl: &[Identity]) {
        self.ciphertexts.insert(
            id,
            StoredCiphertext {
                value,
                acl: acl.iter().copied().collect(),
            },
        );
    }

    fn entry<T: FheType>(&self, handle: &CiphertextHandle<T>) -> FheResult<&StoredCiphertext> {
        let id = *handle.id();
        let stored = self
            .ciphertexts
            .get(&id)
            .ok_or(FheError::UnknownHandle(id))?;
        let actual = stored.value.kind();
        if actual != T::KIND {
            return Err(FheError::TypeMismatch {
                handle: id,
                expected: T::KIND,
                actual,
            });
        }
        Ok(stored)
    }

    /// Load an operand on behalf of `caller`, enforcing the access list.
    fn operand<T: FheType>(
        &self,
        handle: &CiphertextHandle<T>,
        caller: &Identity,
    ) -> FheResult<ClearValue> {
        let stored = self.entry(handle)?;
        if !stored.acl.contains(caller) {
            return Err(FheError::AccessDenied {
                handle: *handle.id(),
                identity: *caller,
            });
        }
        Ok(stored.value)
    }
}

/// In-process plaintext oracle implementing [`FheBackend`].
///
/// Values are kept in a handle table behind a mutex; access lists, input proofs and the
/// shape of the gadgets match what a real coprocessor enforces, so code exercised against it
/// observes the same failures. Clones share the same table.
#[derive(Clone)]
pub struct MockCoprocessor {
    state: Arc<Mutex<MockState>>,
    secret: [u8; 32],
}

impl MockCoprocessor {
    pub fn new() -> Self {
        let mut secret = [0u8; 32];
        OsRng.fill_bytes(&mut secret);
        Self::with_secret(secret)
    }

    /// Deterministic coprocessor for reproducible tests.
    pub fn from_seed(seed: u64) -> Self {
        let mut secret = [0u8; 32];
        ChaCha20Rng::seed_from_u64(seed).fill_bytes(&mut secret);
        Self::with_secret(secret)
    }

    fn with_secret(secret: [u8; 32]) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
            secret,
        }
    }

    /// Number of ciphertexts held.
    pub fn len(&self) -> usize {
        self.lock().map(|s| s.ciphertexts.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> FheResult<MutexGuard<'_, MockState>> {
        self.state.lock().map_err(|_| FheError::Unavailable)
    }

    fn input_proof(&self, id: &HandleId, context: &Identity, sender: &Identity) -> InputProof {
        let mut hasher = Sha256::new();
        hasher.update(b"sealbid/input-proof");
        hasher.update(self.secret);
        hasher.update(id.as_bytes());
        hasher.update(context.as_bytes());
        hasher.update(sender.as_bytes());
        InputProof(hasher.finalize().into())
    }

    fn encrypt_input<T: FheType>(
        &self,
        value: T::Clear,
        context: &Identity,
        sender: &Identity,
    ) -> FheResult<EncryptedInput<T>> {
        let mut state = self.lock()?;
        let id = state.next_handle("input", &[context.as_bytes(), sender.as_bytes()]);
        // Inputs are unusable until a context imports them with a valid proof.
        state.insert(id, T::into_value(value), &[]);
        Ok(EncryptedInput {
            handle: CiphertextHandle::new(id),
            proof: self.input_proof(&id, context, sender),
        })
    }

    fn trivial<T: FheType>(
        &self,
        value: T::Clear,
        owner: &Identity,
    ) -> FheResult<CiphertextHandle<T>> {
        let mut state = self.lock()?;
        let id = state.next_handle("trivial", &[owner.as_bytes()]);
        state.insert(id, T::into_value(value), &[*owner]);
        Ok(CiphertextHandle::new(id))
    }
}

impl Default for MockCoprocessor {
    fn default() -> Self {
        Self::new()
    }
}

/// `a > b` computed from the sign of `b - a` in 128 bit arithmetic.
fn masked_gt(a: u64, b: u64) -> bool {
    ((b as u128).wrapping_sub(a as u128) >> 127) == 1
}

/// Select between two values of the same kind with a mask derived from `cond`.
fn masked_select(cond: bool, a: ClearValue, b: ClearValue) -> Option<ClearValue> {
    let mask = 0u64.wrapping_sub(cond as u64);
    match (a, b) {
        (ClearValue::Uint64(a), ClearValue::Uint64(b)) => {
            Some(ClearValue::Uint64((a & mask) | (b & !mask)))
        }
        (ClearValue::Bool(a), ClearValue::Bool(b)) => Some(ClearValue::Bool(
            ((a as u64 & mask) | (b as u64 & !mask)) != 0,
        )),
        (ClearValue::Address(a), ClearValue::Address(b)) => {
            let byte_mask = mask as u8;
            let a = a.to_bytes();
            let b = b.to_bytes();
            let mut out = [0u8; 20];
            for (o, (x, y)) in out.iter_mut().zip(a.iter().zip(b.iter())) {
                *o = (x & byte_mask) | (y & !byte_mask);
            }
            Some(ClearValue::Address(Identity::from_bytes(out)))
        }
        _ => None,
    }
}

impl FheBackend for MockCoprocessor {
    fn encrypt_u64(
        &self,
        value: u64,
        context: &Identity,
        sender: &Identity,
    ) -> FheResult<EncryptedInput<EUint64>> {
        self.encrypt_input::<EUint64>(value, context, sender)
    }

    fn encrypt_address(
        &self,
        value: &Identity,
        context: &Identity,
        sender: &Identity,
    ) -> FheResult<EncryptedInput<EAddress>> {
        self.encrypt_input::<EAddress>(*value, context, sender)
    }

    fn verify_input<T: FheType>(
        &self,
        input: &EncryptedInput<T>,
        context: &Identity,
        sender: &Identity,
    ) -> FheResult<CiphertextHandle<T>> {
        let id = *input.handle.id();
        let mut state = self.lock()?;
        state.entry(&input.handle)?;
        if self.input_proof(&id, context, sender) != input.proof {
            warn!(handle = %id, %context, %sender, "Input proof rejected");
            return Err(FheError::InvalidInputProof(id));
        }
        if let Some(stored) = state.ciphertexts.get_mut(&id) {
            stored.acl.insert(*context);
        }
        Ok(input.handle)
    }

    fn trivial_u64(&self, value: u64, owner: &Identity) -> FheResult<CiphertextHandle<EUint64>> {
        self.trivial::<EUint64>(value, owner)
    }

    fn trivial_address(
        &self,
        value: &Identity,
        owner: &Identity,
    ) -> FheResult<CiphertextHandle<EAddress>> {
        self.trivial::<EAddress>(*value, owner)
    }

    fn gt(
        &self,
        a: &CiphertextHandle<EUint64>,
        b: &CiphertextHandle<EUint64>,
        caller: &Identity,
    ) -> FheResult<CiphertextHandle<EBool>> {
        let mut state = self.lock()?;
        let lhs = state.operand(a, caller)?;
        let rhs = state.operand(b, caller)?;
        let (ClearValue::Uint64(lhs), ClearValue::Uint64(rhs)) = (lhs, rhs) else {
            return Err(FheError::TypeMismatch {
                handle: *a.id(),
                expected: EUint64::KIND,
                actual: lhs.kind(),
            });
        };
        let id = state.next_handle("gt", &[a.id().as_bytes(), b.id().as_bytes()]);
        state.insert(id, ClearValue::Bool(masked_gt(lhs, rhs)), &[*caller]);
        debug!(result = %id, "gt evaluated");
        Ok(CiphertextHandle::new(id))
    }

    fn select<T: FheType>(
        &self,
        cond: &CiphertextHandle<EBool>,
        a: &CiphertextHandle<T>,
        b: &CiphertextHandle<T>,
        caller: &Identity,
    ) -> FheResult<CiphertextHandle<T>> {
        let mut state = self.lock()?;
        let flag = match state.operand(cond, caller)? {
            ClearValue::Bool(flag) => flag,
            other => {
                return Err(FheError::TypeMismatch {
                    handle: *cond.id(),
                    expected: EBool::KIND,
                    actual: other.kind(),
                })
            }
        };
        let lhs = state.operand(a, caller)?;
        let rhs = state.operand(b, caller)?;
        let value = masked_select(flag, lhs, rhs).ok_or(FheError::TypeMismatch {
            handle: *b.id(),
            expected: lhs.kind(),
            actual: rhs.kind(),
        })?;
        let id = state.next_handle(
            "select",
            &[
                cond.id().as_bytes(),
                a.id().as_bytes(),
                b.id().as_bytes(),
            ],
        );
        state.insert(id, value, &[*caller]);
        debug!(result = %id, "select evaluated");
        Ok(CiphertextHandle::new(id))
    }

    fn allow<T: FheType>(
        &self,
        handle: &CiphertextHandle<T>,
        grantee: &Identity,
        caller: &Identity,
    ) -> FheResult<()> {
        let mut state = self.lock()?;
        state.operand(handle, caller)?;
        if let Some(stored) = state.ciphertexts.get_mut(handle.id()) {
            stored.acl.insert(*grantee);
        }
        Ok(())
    }

    fn is_allowed<T: FheType>(
        &self,
        handle: &CiphertextHandle<T>,
        identity: &Identity,
    ) -> FheResult<bool> {
        let state = self.lock()?;
        Ok(state.entry(handle)?.acl.contains(identity))
    }

    fn user_decrypt<T: FheType>(
        &self,
        handle: &CiphertextHandle<T>,
        context: &Identity,
        requester: &Identity,
    ) -> FheResult<T::Clear> {
        let state = self.lock()?;
        state.operand(handle, context)?;
        let value = state.operand(handle, requester)?;
        T::from_value(value).ok_or(FheError::TypeMismatch {
            handle: *handle.id(),
            expected: T::KIND,
            actual: value.kind(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FheKind;
    use anyhow::Result;

    fn ids() -> (Identity, Identity, Identity) {
        (
            Identity::from_bytes([1u8; 20]),
            Identity::from_bytes([2u8; 20]),
            Identity::from_bytes([3u8; 20]),
        )
    }

    #[test]
    fn masked_gt_matches_native_comparison() {
        let samples = [0u64, 1, 2, 49, 50, 70, u64::MAX - 1, u64::MAX];
        for a in samples {
            for b in samples {
                assert_eq!(masked_gt(a, b), a > b, "{a} > {b}");
            }
        }
    }

    #[test]
    fn masked_select_picks_by_condition() {
        let a = ClearValue::Address(Identity::from_bytes([0xaa; 20]));
        let b = ClearValue::Address(Identity::from_bytes([0x55; 20]));
        assert_eq!(masked_select(true, a, b), Some(a));
        assert_eq!(masked_select(false, a, b), Some(b));
        assert_eq!(
            masked_select(true, ClearValue::Uint64(7), ClearValue::Uint64(9)),
            Some(ClearValue::Uint64(7))
        );
        assert_eq!(
            masked_select(false, ClearValue::Bool(true), ClearValue::Bool(false)),
            Some(ClearValue::Bool(false))
        );
        assert_eq!(
            masked_select(true, ClearValue::Uint64(7), ClearValue::Bool(false)),
            None
        );
    }

    #[test]
    fn inputs_are_bound_to_context_and_sender() -> Result<()> {
        let fhe = MockCoprocessor::from_seed(1);
        let (contract, alice, bob) = ids();
        let input = fhe.encrypt_u64(50, &contract, &alice)?;

        // Bob cannot replay Alice's ciphertext as his own
        assert_eq!(
            fhe.verify_input(&input, &contract, &bob),
            Err(FheError::InvalidInputProof(*input.handle.id()))
        );
        // Nor can it be imported into another context
        assert!(fhe.verify_input(&input, &bob, &alice).is_err());

        assert!(!fhe.is_allowed(&input.handle, &contract)?);
        let handle = fhe.verify_input(&input, &contract, &alice)?;
        assert!(fhe.is_allowed(&handle, &contract)?);
        Ok(())
    }

    #[test]
    fn gadgets_require_access_and_grant_the_result() -> Result<()> {
        let fhe = MockCoprocessor::from_seed(2);
        let (contract, alice, _) = ids();
        let a = fhe.trivial_u64(70, &contract)?;
        let b = fhe.trivial_u64(65, &contract)?;

        let denied = fhe.gt(&a, &b, &alice);
        assert!(matches!(denied, Err(FheError::AccessDenied { .. })));

        let is_higher = fhe.gt(&a, &b, &contract)?;
        let max = fhe.select(&is_higher, &a, &b, &contract)?;
        assert!(fhe.is_allowed(&max, &contract)?);
        assert!(!fhe.is_allowed(&max, &alice)?);
        Ok(())
    }

    #[test]
    fn decrypt_needs_context_and_requester() -> Result<()> {
        let fhe = MockCoprocessor::from_seed(3);
        let (contract, alice, bob) = ids();
        let winner = fhe.trivial_address(&alice, &contract)?;

        assert!(matches!(
            fhe.user_decrypt(&winner, &contract, &bob),
            Err(FheError::AccessDenied { .. })
        ));
        fhe.allow(&winner, &bob, &contract)?;
        assert_eq!(fhe.user_decrypt(&winner, &contract, &bob)?, alice);

        // Decryption is scoped to the context that owns the handle
        assert!(fhe.user_decrypt(&winner, &alice, &bob).is_err());
        Ok(())
    }

    #[test]
    fn select_rejects_a_condition_that_is_not_a_bool() -> Result<()> {
        let fhe = MockCoprocessor::from_seed(5);
        let (contract, _, _) = ids();
        let a = fhe.trivial_u64(70, &contract)?;
        let b = fhe.trivial_u64(65, &contract)?;
        let not_a_bool = CiphertextHandle::<EBool>::new(*a.id());

        assert_eq!(
            fhe.select(&not_a_bool, &a, &b, &contract),
            Err(FheError::TypeMismatch {
                handle: *a.id(),
                expected: FheKind::Bool,
                actual: FheKind::Uint64,
            })
        );
        Ok(())
    }

    #[test]
    fn allow_requires_caller_access() -> Result<()> {
        let fhe = MockCoprocessor::from_seed(4);
        let (contract, alice, bob) = ids();
        let price = fhe.trivial_u64(70, &contract)?;
        assert!(matches!(
            fhe.allow(&price, &bob, &alice),
            Err(FheError::AccessDenied { .. })
        ));
        Ok(())
    }

    #[test]
    fn type_confusion_is_rejected() -> Result<()> {
        let fhe = MockCoprocessor::from_seed(5);
        let (contract, _, _) = ids();
        let price = fhe.trivial_u64(70, &contract)?;
        let forged = CiphertextHandle::<EAddress>::new(*price.id());
        assert!(matches!(
            fhe.user_decrypt(&forged, &contract, &contract),
            Err(FheError::TypeMismatch { .. })
        ));
        Ok(())
    }
}
