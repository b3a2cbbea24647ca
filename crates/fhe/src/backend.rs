// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{CiphertextHandle, EAddress, EBool, EUint64, EncryptedInput, FheError, FheType};
use sealbid_utils::Identity;

pub type FheResult<T> = Result<T, FheError>;

/// Contract of the homomorphic coprocessor.
///
/// Every ciphertext carries an access list. Compute gadgets require the caller to be on the
/// access list of every operand and put the caller on the access list of the result.
/// Decryption requires both the scoping context and the requester to be on the access list,
/// so a handle passed around on its own grants nothing.
pub trait FheBackend: Send + Sync + 'static {
    /// Client side: encrypt a u64 for use by `context`, attested by `sender`.
    fn encrypt_u64(
        &self,
        value: u64,
        context: &Identity,
        sender: &Identity,
    ) -> FheResult<EncryptedInput<EUint64>>;

    /// Client side: encrypt an identity for use by `context`, attested by `sender`.
    fn encrypt_address(
        &self,
        value: &Identity,
        context: &Identity,
        sender: &Identity,
    ) -> FheResult<EncryptedInput<EAddress>>;

    /// Check the input proof of a client ciphertext and admit `context` to its access list.
    fn verify_input<T: FheType>(
        &self,
        input: &EncryptedInput<T>,
        context: &Identity,
        sender: &Identity,
    ) -> FheResult<CiphertextHandle<T>>;

    /// Encrypt a public constant on behalf of `owner`.
    fn trivial_u64(&self, value: u64, owner: &Identity) -> FheResult<CiphertextHandle<EUint64>>;

    /// Encrypt a public identity on behalf of `owner`.
    fn trivial_address(
        &self,
        value: &Identity,
        owner: &Identity,
    ) -> FheResult<CiphertextHandle<EAddress>>;

    /// Encrypted `a > b`.
    fn gt(
        &self,
        a: &CiphertextHandle<EUint64>,
        b: &CiphertextHandle<EUint64>,
        caller: &Identity,
    ) -> FheResult<CiphertextHandle<EBool>>;

    /// Encrypted `if cond { a } else { b }` evaluated without branching on `cond`.
    fn select<T: FheType>(
        &self,
        cond: &CiphertextHandle<EBool>,
        a: &CiphertextHandle<T>,
        b: &CiphertextHandle<T>,
        caller: &Identity,
    ) -> FheResult<CiphertextHandle<T>>;

    /// Add `grantee` to the access list. `caller` must already be on it.
    fn allow<T: FheType>(
        &self,
        handle: &CiphertextHandle<T>,
        grantee: &Identity,
        caller: &Identity,
    ) -> FheResult<()>;

    fn is_allowed<T: FheType>(
        &self,
        handle: &CiphertextHandle<T>,
        identity: &Identity,
    ) -> FheResult<bool>;

    /// Decrypt for `requester` within `context`.
    fn user_decrypt<T: FheType>(
        &self,
        handle: &CiphertextHandle<T>,
        context: &Identity,
        requester: &Identity,
    ) -> FheResult<T::Clear>;
}
