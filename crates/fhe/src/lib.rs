// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Typed ciphertext handles and the interface to the homomorphic coprocessor.
//!
//! The auction engine never sees plaintext. It holds [`CiphertextHandle`]s and asks an
//! [`FheBackend`] to compare, select and grant access to them. [`MockCoprocessor`] is an
//! in-process plaintext oracle implementing the same contract for tests and local runs.

mod backend;
mod error;
mod handle;
mod mock;
mod types;

pub use backend::*;
pub use error::*;
pub use handle::*;
pub use mock::*;
pub use types::*;
