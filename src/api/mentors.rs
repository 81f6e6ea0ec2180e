use super::{encode_segment, ApiClient, ApiResult};
use crate::models::UserProfile;
use reqwest::Method;

impl ApiClient {
    pub async fn list_mentors(&self) -> ApiResult<Vec<UserProfile>> {
        self.get("/mentors").await
    }

    pub async fn assign_mentor(&self, user_id: &str, mentor_id: &str) -> ApiResult<()> {
        self.send_unit(
            Method::PUT,
            "/mentors/assign",
            Some(serde_json::json!({ "userId": user_id, "mentorId": mentor_id })),
        )
        .await
    }

    pub async fn unassign_mentor(&self, user_id: &str) -> ApiResult<()> {
        self.send_unit(
            Method::PUT,
            &format!("/mentors/unassign/{}", encode_segment(user_id)),
            None,
        )
        .await
    }
}
