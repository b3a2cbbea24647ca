// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use sealbid_fhe::{CiphertextHandle, EAddress, EUint64, FheBackend, FheError, FheResult};
use sealbid_utils::Identity;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Encrypted maximum over the accepted bids and the encrypted identity that placed it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunningState {
    pub highest_amount: CiphertextHandle<EUint64>,
    pub highest_bidder: CiphertextHandle<EAddress>,
}

/// Folds bids into the running maximum without learning anything about them.
///
/// Each update asks the coprocessor for `amount > highest` and uses the encrypted answer to
/// select both the new amount and the new owner. The answer is never decrypted so no code path
/// depends on it. Ties keep the earlier bid because the comparison is strict.
///
/// The first accepted bid replaces the starting point outright, so a bid of zero still has an
/// owner. Whether a bid is the first is public, since the bid count is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonEngine {
    state: RunningState,
}

impl ComparisonEngine {
    /// Start at encrypted zero owned by the null identity. `context` is the auction instance and
    /// owns every ciphertext the engine produces.
    pub fn init<F: FheBackend>(fhe: &F, context: &Identity) -> FheResult<Self> {
        Ok(Self {
            state: RunningState {
                highest_amount: fhe.trivial_u64(0, context)?,
                highest_bidder: fhe.trivial_address(&Identity::NULL, context)?,
            },
        })
    }

    pub fn from_state(state: RunningState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &RunningState {
        &self.state
    }

    /// Compute the state that results from folding in one more bid, leaving `self` untouched.
    pub fn evaluate<F: FheBackend>(
        &self,
        fhe: &F,
        amount: &CiphertextHandle<EUint64>,
        bidder: &Identity,
        context: &Identity,
        first_bid: bool,
    ) -> FheResult<RunningState> {
        if first_bid {
            return Self::seed(fhe, amount, bidder, context);
        }
        let current = &self.state;
        let is_higher = fhe.gt(amount, &current.highest_amount, context)?;
        let highest_amount = fhe.select(&is_higher, amount, &current.highest_amount, context)?;
        let candidate = fhe.trivial_address(bidder, context)?;
        let highest_bidder =
            fhe.select(&is_higher, &candidate, &current.highest_bidder, context)?;
        debug!(amount = %highest_amount, bidder = %highest_bidder, "running maximum evaluated");

        Ok(RunningState {
            highest_amount,
            highest_bidder,
        })
    }

    fn seed<F: FheBackend>(
        fhe: &F,
        amount: &CiphertextHandle<EUint64>,
        bidder: &Identity,
        context: &Identity,
    ) -> FheResult<RunningState> {
        if !fhe.is_allowed(amount, context)? {
            return Err(FheError::AccessDenied {
                handle: *amount.id(),
                identity: *context,
            });
        }
        let highest_bidder = fhe.trivial_address(bidder, context)?;
        debug!(amount = %amount, bidder = %highest_bidder, "running maximum seeded");

        Ok(RunningState {
            highest_amount: *amount,
            highest_bidder,
        })
    }

    /// Fold a bid in. The state is replaced only once every gadget call has succeeded.
    pub fn update<F: FheBackend>(
        &mut self,
        fhe: &F,
        amount: &CiphertextHandle<EUint64>,
        bidder: &Identity,
        context: &Identity,
        first_bid: bool,
    ) -> FheResult<()> {
        self.state = self.evaluate(fhe, amount, bidder, context, first_bid)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use sealbid_fhe::MockCoprocessor;

    fn id(b: u8) -> Identity {
        Identity::from_bytes([b; 20])
    }

    fn bid(
        fhe: &MockCoprocessor,
        ctx: &Identity,
        who: &Identity,
        value: u64,
    ) -> Result<CiphertextHandle<EUint64>> {
        let input = fhe.encrypt_u64(value, ctx, who)?;
        Ok(fhe.verify_input(&input, ctx, who)?)
    }

    fn reveal(
        fhe: &MockCoprocessor,
        ctx: &Identity,
        engine: &ComparisonEngine,
    ) -> Result<(u64, Identity)> {
        let state = engine.state();
        Ok((
            fhe.user_decrypt(&state.highest_amount, ctx, ctx)?,
            fhe.user_decrypt(&state.highest_bidder, ctx, ctx)?,
        ))
    }

    #[test]
    fn starts_at_zero_and_null() -> Result<()> {
        let fhe = MockCoprocessor::from_seed(1);
        let ctx = id(0xaa);
        let engine = ComparisonEngine::init(&fhe, &ctx)?;
        assert_eq!(reveal(&fhe, &ctx, &engine)?, (0, Identity::NULL));
        Ok(())
    }

    #[test]
    fn tracks_maximum_and_keeps_first_on_tie() -> Result<()> {
        let fhe = MockCoprocessor::from_seed(2);
        let ctx = id(0xaa);
        let mut engine = ComparisonEngine::init(&fhe, &ctx)?;

        for (i, (who, value)) in [(1, 50), (2, 70), (3, 70), (4, 65)].into_iter().enumerate() {
            let amount = bid(&fhe, &ctx, &id(who), value)?;
            engine.update(&fhe, &amount, &id(who), &ctx, i == 0)?;
        }

        assert_eq!(reveal(&fhe, &ctx, &engine)?, (70, id(2)));
        Ok(())
    }

    #[test]
    fn zero_bid_is_owned_by_its_bidder() -> Result<()> {
        let fhe = MockCoprocessor::from_seed(4);
        let ctx = id(0xaa);
        let mut engine = ComparisonEngine::init(&fhe, &ctx)?;

        let zero = bid(&fhe, &ctx, &id(1), 0)?;
        engine.update(&fhe, &zero, &id(1), &ctx, true)?;
        assert_eq!(reveal(&fhe, &ctx, &engine)?, (0, id(1)));

        // A later zero ties and keeps the first bidder.
        let zero = bid(&fhe, &ctx, &id(2), 0)?;
        engine.update(&fhe, &zero, &id(2), &ctx, false)?;
        assert_eq!(reveal(&fhe, &ctx, &engine)?, (0, id(1)));
        Ok(())
    }

    #[test]
    fn failed_update_leaves_state_untouched() -> Result<()> {
        let fhe = MockCoprocessor::from_seed(3);
        let ctx = id(0xaa);
        let mut engine = ComparisonEngine::init(&fhe, &ctx)?;
        let before = *engine.state();

        // Never imported, so the auction has no access to it.
        let foreign = fhe.encrypt_u64(10, &ctx, &id(1))?.handle;
        for first_bid in [true, false] {
            let err = engine
                .update(&fhe, &foreign, &id(1), &ctx, first_bid)
                .unwrap_err();
            assert!(matches!(err, FheError::AccessDenied { .. }));
            assert_eq!(*engine.state(), before);
        }
        Ok(())
    }
}
