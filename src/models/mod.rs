// Request/Response models
pub mod accounts;
pub mod credit_requests;
pub mod ledger;
pub mod reports;
