// Balance policies and interest formulas, passed to the service as closures.

use super::Money;

/// A balance check handed to withdraw/transfer operations.
pub type BalancePredicate<'a> = &'a dyn Fn(Money) -> bool;

/// `balance >= amount`
pub fn has_sufficient_balance(balance: Money, amount: Money) -> bool {
    balance >= amount
}

/// `balance >= minimum`
pub fn is_balance_above_minimum(balance: Money, minimum: Money) -> bool {
    balance >= minimum
}

/// Predicate accepting any balance that covers `amount`.
pub fn requested_amount(amount: Money) -> impl Fn(Money) -> bool {
    move |balance| has_sufficient_balance(balance, amount)
}

/// Predicate accepting any balance at or above `minimum`.
pub fn minimum_balance(minimum: Money) -> impl Fn(Money) -> bool {
    move |balance| is_balance_above_minimum(balance, minimum)
}

/// Interest where `rate` is a fraction: 0.05 on 1200 yields 60.
/// `None` if the product overflows.
pub fn simple_interest(balance: Money, rate: Money) -> Option<Money> {
    balance.checked_mul(rate)
}

/// Interest where `percent` is a percentage: 5 on 1000 yields 50.
pub fn percent_interest(balance: Money, percent: Money) -> Option<Money> {
    balance.checked_mul(percent)?.checked_div(Money::ONE_HUNDRED)
}
