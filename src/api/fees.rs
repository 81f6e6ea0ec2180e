use super::{encode_segment, ApiClient, ApiResult};
use crate::models::{FeeData, FeeStatus};
use reqwest::Method;

fn fee_path(user_id: &str, tail: &str) -> String {
    format!("/reviews/{}/{tail}", encode_segment(user_id))
}

impl ApiClient {
    /// Flips `feeStatus` only; category, amount and due date stay as stored.
    pub async fn update_fee_status(&self, user_id: &str, status: FeeStatus) -> ApiResult<()> {
        self.send_unit(
            Method::PATCH,
            &fee_path(user_id, "fee-status"),
            Some(serde_json::json!({ "feeStatus": status })),
        )
        .await
    }

    /// Creates the fee record or overwrites all four fee fields.
    pub async fn upsert_fees(&self, user_id: &str, fees: &FeeData) -> ApiResult<()> {
        let body = Self::to_body(fees)?;
        self.send_unit(Method::PUT, &fee_path(user_id, "fees"), Some(body))
            .await
    }

    pub async fn delete_fees(&self, user_id: &str) -> ApiResult<()> {
        self.send_unit(Method::DELETE, &fee_path(user_id, "fees"), None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_path_encodes_user_id() {
        assert_eq!(fee_path("u 1", "fee-status"), "/reviews/u%201/fee-status");
        assert_eq!(fee_path("u1", "fees"), "/reviews/u1/fees");
    }
}
