use super::{ApiClient, ApiResult};
use crate::models::{UserProfile, UserWithReview};

impl ApiClient {
    pub async fn list_users(&self) -> ApiResult<Vec<UserProfile>> {
        self.get("/users").await
    }

    /// Dashboard listing: every user with their review (and fee fields).
    pub async fn list_users_with_reviews(&self) -> ApiResult<Vec<UserWithReview>> {
        self.get("/users/with-reviews").await
    }
}
