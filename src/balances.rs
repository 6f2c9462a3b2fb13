// Balance ledger: withdrawable balances, credited only by settlement and
// debited only by withdrawal. A balance never goes negative — withdraw takes
// everything or fails.

use std::collections::BTreeMap;

use crate::amount::Amount;
use crate::error::MarketError;

#[derive(Debug, Default)]
pub struct BalanceLedger {
    balances: BTreeMap<String, Amount>,
}

impl BalanceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, owner: &str) -> Amount {
        self.balances.get(owner).copied().unwrap_or(Amount::ZERO)
    }

    /// Add winnings to an owner's balance. Overflow fails the enclosing
    /// settlement rather than wrapping.
    pub fn credit(&mut self, owner: &str, amount: Amount) -> Result<(), MarketError> {
        let entry = self
            .balances
            .entry(owner.to_string())
            .or_insert(Amount::ZERO);
        *entry = entry.checked_add(amount)?;
        Ok(())
    }

    /// Zero the balance and hand back what was there. The actual value
    /// transfer is the caller's problem; this only settles the accounting
    /// entry.
    pub fn withdraw(&mut self, owner: &str) -> Result<Amount, MarketError> {
        let balance = self.get(owner);
        if balance.is_zero() {
            return Err(MarketError::NothingToWithdraw);
        }
        self.balances.insert(owner.to_string(), Amount::ZERO);
        Ok(balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_accumulates() {
        let mut ledger = BalanceLedger::new();
        assert_eq!(ledger.get("alice"), Amount::ZERO);
        ledger.credit("alice", Amount::from_units(2)).unwrap();
        ledger.credit("alice", Amount::from_units(3)).unwrap();
        assert_eq!(ledger.get("alice"), Amount::from_units(5));
    }

    #[test]
    fn test_credit_overflow_fails() {
        let mut ledger = BalanceLedger::new();
        ledger
            .credit("alice", Amount::from_wei(u128::MAX))
            .unwrap();
        assert_eq!(
            ledger.credit("alice", Amount::from_wei(1)).unwrap_err(),
            MarketError::ArithmeticOverflow
        );
    }

    #[test]
    fn test_withdraw_zeroes_exactly_once() {
        let mut ledger = BalanceLedger::new();
        assert_eq!(
            ledger.withdraw("alice").unwrap_err(),
            MarketError::NothingToWithdraw
        );

        ledger.credit("alice", Amount::from_units(4)).unwrap();
        assert_eq!(ledger.withdraw("alice").unwrap(), Amount::from_units(4));
        assert_eq!(ledger.get("alice"), Amount::ZERO);
        assert_eq!(
            ledger.withdraw("alice").unwrap_err(),
            MarketError::NothingToWithdraw
        );
    }
}
