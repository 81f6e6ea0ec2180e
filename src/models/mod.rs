use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Display, EnumString, EnumIter,
)]
pub(crate) enum Role {
    Admin,
    Mentor,
    User,
}

/// Account as returned by the backend.
///
/// `mentor_id == None` means the student is not assigned to a mentor.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserProfile {
    // Mongo-backed endpoints send `_id`.
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub full_name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mentor_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
}

impl UserProfile {
    pub fn display_name(&self) -> &str {
        if self.full_name.trim().is_empty() {
            &self.email
        } else {
            &self.full_name
        }
    }

    pub fn has_mentor(&self) -> bool {
        self.mentor_id
            .as_deref()
            .is_some_and(|id| !id.trim().is_empty())
    }
}

#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Display, EnumString, EnumIter,
)]
pub(crate) enum ReviewStatus {
    #[serde(rename = "Not Assigned")]
    #[strum(serialize = "Not Assigned")]
    NotAssigned,
    Assigned,
    Completed,
}

#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Display, EnumString, EnumIter,
)]
pub(crate) enum FeeStatus {
    Pending,
    Completed,
    Overdued,
}

/// One review per user. Fee fields ride along on the same record.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Review {
    pub user_id: String,
    pub review_status: ReviewStatus,
    #[serde(default)]
    pub review_date: String,
    #[serde(default)]
    pub fee_category: Option<String>,
    #[serde(default)]
    pub pending_amount: Option<f64>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub fee_status: Option<FeeStatus>,
}

impl Review {
    /// A review without a fee category has no fee record yet.
    pub fn has_fee_record(&self) -> bool {
        self.fee_category
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty())
    }
}

/// Dashboard row: a user and their (optional) review.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct UserWithReview {
    #[serde(flatten)]
    pub user: UserProfile,
    #[serde(default)]
    pub review: Option<Review>,
}

/// Full fee terms as sent to the upsert endpoint.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FeeData {
    pub fee_category: String,
    pub pending_amount: f64,
    /// `YYYY-MM-DD`
    pub due_date: String,
    pub fee_status: FeeStatus,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct Holiday {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Notification {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub read: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LeaderboardEntry {
    pub user_id: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub completed_reviews: u32,
    #[serde(default)]
    pub profile_image_url: Option<String>,
}
