mod dialog;

pub(crate) use dialog::DialogState;

use crate::api::ApiClient;
use crate::models::{Role, UserProfile};
use crate::storage::load_user_from_storage;
use leptos::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum NoticeKind {
    Success,
    Error,
}

/// Transient banner shown after an action completes or fails.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub text: String,
}

#[derive(Clone, Copy)]
pub(crate) struct AppState {
    pub api_client: RwSignal<ApiClient>,
    pub current_user: RwSignal<Option<UserProfile>>,

    /// At most one notice is visible; a newer one replaces the old.
    pub notice: RwSignal<Option<Notice>>,
    notice_seq: RwSignal<u64>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            api_client: RwSignal::new(ApiClient::load_from_storage()),
            current_user: RwSignal::new(load_user_from_storage()),
            notice: RwSignal::new(None),
            notice_seq: RwSignal::new(0),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.current_user
            .with(|u| u.as_ref().is_some_and(|u| u.role == Role::Admin))
    }

    fn push_notice(&self, kind: NoticeKind, text: String) {
        let id = self.notice_seq.get_untracked() + 1;
        self.notice_seq.set(id);
        self.notice.set(Some(Notice { id, kind, text }));
    }

    pub fn notify_success(&self, text: impl Into<String>) {
        self.push_notice(NoticeKind::Success, text.into());
    }

    pub fn notify_error(&self, text: impl Into<String>) {
        let text = text.into();
        log::warn!("{text}");
        self.push_notice(NoticeKind::Error, text);
    }

    /// Clear the notice only if it is still the one identified by `id`.
    pub fn dismiss_notice(&self, id: u64) {
        if self.notice.with_untracked(|n| n.as_ref().is_some_and(|n| n.id == id)) {
            self.notice.set(None);
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
pub(crate) struct AppContext(pub AppState);
