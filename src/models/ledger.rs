use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

/// Body of a purchase or payment. The amount must be positive; the sign of
/// the balance change is implied by the operation.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AmountRequest {
    pub amount: Decimal,
    #[validate(length(min = 1, max = 255))]
    pub description: String,
}
