//! Errors raised while normalising inputs and building the solvency trace.

use thiserror::Error;

/// Input and witness failures detected before any commitment is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AirError {
    /// `uts` is not a power of two in `[4, max_uts]`.
    #[error("user trace size {uts} must be a power of two in [4, {max_uts}]")]
    InvalidUts { uts: usize, max_uts: usize },
    /// No coin columns were supplied.
    #[error("at least one coin balance list is required")]
    NoCoins,
    /// No users were supplied.
    #[error("at least one user is required")]
    NoUsers,
    /// A coin balance list does not have one entry per user.
    #[error("coin {coin} has {got} balances, expected {expected}")]
    BalanceShape {
        coin: usize,
        expected: usize,
        got: usize,
    },
    /// More main coins requested than coins supplied.
    #[error("{main_coins} main coins requested but only {coins} coins supplied")]
    TooManyMainCoins { main_coins: usize, coins: usize },
    /// Padded batch exceeds the configured maximum.
    #[error("batch of {users} users pads to {padded}, above the limit of {max}")]
    BatchTooLarge {
        users: usize,
        padded: usize,
        max: usize,
    },
    /// A balance magnitude exceeds `max_user_value`.
    #[error("balance {value} of user {user} in coin {coin} is out of range")]
    BalanceOutOfRange { coin: usize, user: usize, value: i64 },
    /// Extended domain is too large to sample positions from.
    #[error("extended domain of size {precision} exceeds the sampling limit")]
    DomainTooLarge { precision: usize },
    /// A user's net value is negative or does not fit the base-4 unfolding.
    #[error("net value of user {user} is negative or too large for the trace")]
    NetValueOutOfRange { user: usize },
}
