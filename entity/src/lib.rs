//! SeaORM entities for the fiado store-credit ledger.

pub mod client;
pub mod credit_account;
pub mod credit_account_history;
pub mod credit_request;
pub mod enums;
pub mod establishment;
pub mod installment;
pub mod late_fee;
pub mod late_fee_rule;
pub mod transaction;
