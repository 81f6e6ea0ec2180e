use crate::models::{FeeStatus, ReviewStatus};
use crate::reviews::ReviewState;
use leptos::prelude::*;
use tw_merge::tw_merge;

const BADGE_BASE: &str = "inline-flex items-center rounded-full border px-2 py-0.5 text-xs font-medium";

pub(crate) fn fee_status_class(status: Option<FeeStatus>) -> &'static str {
    match status {
        Some(FeeStatus::Completed) => "border-emerald-300 bg-emerald-50 text-emerald-700",
        Some(FeeStatus::Pending) => "border-amber-300 bg-amber-50 text-amber-700",
        Some(FeeStatus::Overdued) => "border-red-300 bg-red-50 text-red-700",
        None => "border-border text-muted-foreground",
    }
}

pub(crate) fn review_state_class(state: ReviewState) -> &'static str {
    match state {
        ReviewState::Recorded(ReviewStatus::Completed) => "border-emerald-300 bg-emerald-50 text-emerald-700",
        ReviewState::Recorded(ReviewStatus::Assigned) => "border-sky-300 bg-sky-50 text-sky-700",
        ReviewState::Recorded(ReviewStatus::NotAssigned) => "border-amber-300 bg-amber-50 text-amber-700",
        ReviewState::NoReview => "border-border text-muted-foreground",
    }
}

#[component]
pub fn Badge(#[prop(into, optional)] class: String, children: Children) -> impl IntoView {
    let merged_class = tw_merge!(BADGE_BASE, class);
    view! { <span class=merged_class>{children()}</span> }
}

#[component]
pub fn FeeStatusBadge(status: Option<FeeStatus>) -> impl IntoView {
    let label = status.map_or_else(|| "No fee".to_string(), |s| s.to_string());
    view! { <Badge class=fee_status_class(status)>{label}</Badge> }
}

#[component]
pub fn ReviewStateBadge(state: ReviewState) -> impl IntoView {
    view! { <Badge class=review_state_class(state)>{state.label()}</Badge> }
}
