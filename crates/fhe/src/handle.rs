// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::FheType;
use sealbid_utils::{hexf, short_hex};
use serde::{Deserialize, Serialize};
use std::{fmt, marker::PhantomData};

/// Raw 32 byte reference to a ciphertext held by a coprocessor.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandleId(pub [u8; 32]);

impl HandleId {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", short_hex(&self.0))
    }
}

impl fmt::Debug for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        hexf(&self.0, f)
    }
}

/// Opaque typed reference to an encrypted value. Carries no plaintext.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct CiphertextHandle<T: FheType> {
    id: HandleId,
    #[serde(skip)]
    _t: PhantomData<T>,
}

impl<T: FheType> CiphertextHandle<T> {
    pub fn new(id: HandleId) -> Self {
        Self {
            id,
            _t: PhantomData,
        }
    }

    pub fn id(&self) -> &HandleId {
        &self.id
    }
}

impl<T: FheType> fmt::Display for CiphertextHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", T::KIND, self.id)
    }
}

impl<T: FheType> fmt::Debug for CiphertextHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CiphertextHandle")
            .field("kind", &T::KIND)
            .field("id", &self.id)
            .finish()
    }
}

/// Attestation produced alongside a client-side encryption, binding the ciphertext to the
/// context it was encrypted for and to the identity that encrypted it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputProof(pub [u8; 32]);

impl fmt::Debug for InputProof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        hexf(&self.0, f)
    }
}

/// A freshly encrypted client input: the handle plus the proof needed to import it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct EncryptedInput<T: FheType> {
    pub handle: CiphertextHandle<T>,
    pub proof: InputProof,
}
