use super::{encode_segment, ApiClient, ApiResult};
use crate::models::Holiday;
use reqwest::Method;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct NewHoliday {
    pub title: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ApiClient {
    pub async fn list_holidays(&self) -> ApiResult<Vec<Holiday>> {
        self.get("/holidays").await
    }

    pub async fn create_holiday(&self, holiday: &NewHoliday) -> ApiResult<()> {
        let body = Self::to_body(holiday)?;
        self.send_unit(Method::POST, "/holidays", Some(body)).await
    }

    pub async fn delete_holiday(&self, id: &str) -> ApiResult<()> {
        self.send_unit(
            Method::DELETE,
            &format!("/holidays/{}", encode_segment(id)),
            None,
        )
        .await
    }
}
