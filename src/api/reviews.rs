use super::{encode_segment, ApiClient, ApiResult};
use crate::models::ReviewStatus;
use reqwest::Method;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReviewRequest {
    /// Only sent on create; edits address the user through the path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub review_status: ReviewStatus,
    pub review_date: String,
}

impl ApiClient {
    pub async fn create_review(&self, user_id: &str, status: ReviewStatus, review_date: &str) -> ApiResult<()> {
        let body = Self::to_body(&ReviewRequest {
            user_id: Some(user_id.to_string()),
            review_status: status,
            review_date: review_date.to_string(),
        })?;
        self.send_unit(Method::POST, "/reviews", Some(body)).await
    }

    pub async fn update_review(&self, user_id: &str, status: ReviewStatus, review_date: &str) -> ApiResult<()> {
        let body = Self::to_body(&ReviewRequest {
            user_id: None,
            review_status: status,
            review_date: review_date.to_string(),
        })?;
        self.send_unit(
            Method::PUT,
            &format!("/reviews/{}", encode_segment(user_id)),
            Some(body),
        )
        .await
    }

    pub async fn delete_review(&self, user_id: &str) -> ApiResult<()> {
        self.send_unit(
            Method::DELETE,
            &format!("/reviews/{}", encode_segment(user_id)),
            None,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_request_omits_user_id_on_edit() {
        let req = ReviewRequest {
            user_id: None,
            review_status: ReviewStatus::NotAssigned,
            review_date: "2024-05-01".to_string(),
        };
        let v = serde_json::to_value(req).expect("should serialize");
        assert!(v.get("userId").is_none());
        assert_eq!(v["reviewStatus"], "Not Assigned");
        assert_eq!(v["reviewDate"], "2024-05-01");
    }
}
