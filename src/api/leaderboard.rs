use super::{ApiClient, ApiResult};
use crate::models::LeaderboardEntry;

impl ApiClient {
    pub async fn leaderboard(&self) -> ApiResult<Vec<LeaderboardEntry>> {
        self.get("/leaderboard").await
    }
}
