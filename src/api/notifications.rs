use super::{encode_segment, ApiClient, ApiResult};
use crate::models::Notification;
use reqwest::Method;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct NewNotification {
    pub title: String,
    pub message: String,
}

impl ApiClient {
    pub async fn list_notifications(&self) -> ApiResult<Vec<Notification>> {
        self.get("/notifications").await
    }

    pub async fn send_notification(&self, n: &NewNotification) -> ApiResult<()> {
        let body = Self::to_body(n)?;
        self.send_unit(Method::POST, "/notifications", Some(body))
            .await
    }

    pub async fn mark_notification_read(&self, id: &str) -> ApiResult<()> {
        self.send_unit(
            Method::PUT,
            &format!("/notifications/{}/read", encode_segment(id)),
            None,
        )
        .await
    }

    pub async fn delete_notification(&self, id: &str) -> ApiResult<()> {
        self.send_unit(
            Method::DELETE,
            &format!("/notifications/{}", encode_segment(id)),
            None,
        )
        .await
    }
}
