use crate::components::ui::{
    BusyLabel, Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription, CardHeader,
    CardTable, CardTitle, ErrorAlert, FeeStatusBadge, Input, Label, Modal, ReviewStateBadge,
    SelectInput, Spinner,
};
use crate::fees::{self, FeeForm, FeeSavePlan};
use crate::models::{FeeStatus, ReviewStatus, Role, UserWithReview};
use crate::reviews::{self, ReviewCommand, ReviewForm, ReviewState, REVIEW_DELETE_FADE_MS};
use crate::state::{AppContext, DialogState};
use crate::util::{display_date, format_amount};
use icons::{Check, Pencil, Trash2};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dom::helpers::set_timeout;
use std::collections::HashSet;
use std::str::FromStr;
use std::time::Duration;
use strum::IntoEnumIterator;

/// A destructive action waiting for the admin to confirm it.
#[derive(Clone, Debug, PartialEq)]
enum PendingDelete {
    Review(UserWithReview),
    Fees(UserWithReview),
}

impl PendingDelete {
    fn prompt(&self) -> String {
        match self {
            Self::Review(row) => format!(
                "Delete the review for {}? Fee details are kept.",
                row.user.display_name()
            ),
            Self::Fees(row) => format!("Delete the fee details for {}?", row.user.display_name()),
        }
    }
}

fn status_options<T: IntoEnumIterator + ToString>() -> Vec<(String, String)> {
    T::iter()
        .map(|s| {
            let s = s.to_string();
            (s.clone(), s)
        })
        .collect()
}

/// What the quick status control shows once an update settles: the new
/// status on success, the previous one otherwise.
fn settled_status(previous: FeeStatus, requested: FeeStatus, saved: bool) -> FeeStatus {
    if saved {
        requested
    } else {
        previous
    }
}

fn start_fade(fading: RwSignal<HashSet<String>>, user_id: &str) {
    fading.update(|f| {
        f.insert(user_id.to_string());
    });
}

fn end_fade(fading: RwSignal<HashSet<String>>, user_id: &str) {
    fading.update(|f| {
        f.remove(user_id);
    });
}

fn fee_summary(row: &UserWithReview) -> Option<(String, String, String)> {
    let review = row.review.as_ref().filter(|r| r.has_fee_record())?;
    Some((
        review.fee_category.clone().unwrap_or_default(),
        review.pending_amount.map(format_amount).unwrap_or_else(|| "—".to_string()),
        review.due_date.as_deref().map(display_date).unwrap_or_else(|| "—".to_string()),
    ))
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let api = move || app_state.0.api_client.get_untracked();

    let rows: RwSignal<Vec<UserWithReview>> = RwSignal::new(vec![]);
    let loading: RwSignal<bool> = RwSignal::new(false);
    let load_error: RwSignal<Option<String>> = RwSignal::new(None);

    // Row-level UI state: quick status updates in flight and rows fading out.
    let busy_row: RwSignal<Option<String>> = RwSignal::new(None);
    let fading_rows: RwSignal<HashSet<String>> = RwSignal::new(HashSet::new());

    let review_dialog: RwSignal<DialogState<UserWithReview>> = RwSignal::new(DialogState::Closed);
    let review_status: RwSignal<String> = RwSignal::new(String::new());
    let review_date: RwSignal<String> = RwSignal::new(String::new());
    let review_error: RwSignal<Option<String>> = RwSignal::new(None);
    let review_saving: RwSignal<bool> = RwSignal::new(false);

    let fee_dialog: RwSignal<DialogState<UserWithReview>> = RwSignal::new(DialogState::Closed);
    let fee_category: RwSignal<String> = RwSignal::new(String::new());
    let fee_amount: RwSignal<String> = RwSignal::new(String::new());
    let fee_due: RwSignal<String> = RwSignal::new(String::new());
    let fee_status: RwSignal<String> = RwSignal::new(String::new());
    let fee_error: RwSignal<Option<String>> = RwSignal::new(None);
    let fee_saving: RwSignal<bool> = RwSignal::new(false);

    let confirm: RwSignal<DialogState<PendingDelete>> = RwSignal::new(DialogState::Closed);

    let reload = move || {
        loading.set(true);
        spawn_local(async move {
            let client = api();
            match client.list_users_with_reviews().await {
                Ok(list) => {
                    log::debug!("loaded {} users", list.len());
                    rows.set(list);
                    load_error.set(None);
                }
                Err(e) => load_error.set(Some(e.message)),
            }
            loading.set(false);
        });
    };

    reload();

    // `shown` is the row's control value; it snaps back if the update fails.
    let quick_status = move |user_id: String, status: FeeStatus, shown: RwSignal<FeeStatus>| {
        let previous = shown.get_untracked();
        if busy_row.get_untracked().is_some() {
            shown.set(previous);
            return;
        }
        busy_row.set(Some(user_id.clone()));
        shown.set(status);
        spawn_local(async move {
            let client = api();
            let result = fees::update_fee_status(&client, &user_id, status).await;
            shown.set(settled_status(previous, status, result.is_ok()));
            match result {
                Ok(()) => {
                    app_state.0.notify_success(format!("Fee status set to {status}"));
                    reload();
                }
                Err(e) => app_state.0.notify_error(format!("Failed to update fee status: {e}")),
            }
            busy_row.set(None);
        });
    };

    let open_review = move |row: UserWithReview| {
        let form = ReviewForm::from_review(row.review.as_ref());
        review_status.set(form.status.to_string());
        review_date.set(form.review_date);
        review_error.set(None);
        review_dialog.set(DialogState::Editing(row));
    };

    let on_save_review = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if review_saving.get_untracked() {
            return;
        }
        let Some(row) = review_dialog.get_untracked().into_entity() else {
            return;
        };
        let Ok(status) = ReviewStatus::from_str(&review_status.get_untracked()) else {
            review_error.set(Some("Choose a review status".to_string()));
            return;
        };
        let form = ReviewForm {
            status,
            review_date: review_date.get_untracked(),
        };

        review_saving.set(true);
        review_error.set(None);

        spawn_local(async move {
            let client = api();
            let current = ReviewState::of(row.review.as_ref());
            match reviews::save_review(&client, &row.user.id, current, &form).await {
                Ok(command) => {
                    review_dialog.set(DialogState::Closed);
                    app_state.0.notify_success(match command {
                        ReviewCommand::Create { .. } => "Review created",
                        ReviewCommand::Edit { .. } => "Review updated",
                    });
                    reload();
                }
                Err(e) => {
                    review_error.set(Some(e.to_string()));
                    app_state.0.notify_error(format!("Failed to save review: {e}"));
                }
            }
            review_saving.set(false);
        });
    };

    // With a fee record the dialog opens read-only first; without one it
    // goes straight to the form.
    let open_fees = move |row: UserWithReview| {
        let form = FeeForm::from_review(row.review.as_ref());
        fee_category.set(form.fee_category.unwrap_or_default());
        fee_amount.set(form.pending_amount.unwrap_or_default());
        fee_due.set(form.due_date.unwrap_or_default());
        fee_status.set(form.fee_status.map(|s| s.to_string()).unwrap_or_default());
        fee_error.set(None);

        let has_record = row.review.as_ref().is_some_and(|r| r.has_fee_record());
        fee_dialog.set(if has_record {
            DialogState::Viewing(row)
        } else {
            DialogState::Editing(row)
        });
    };

    let on_save_fees = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if fee_saving.get_untracked() {
            return;
        }
        let Some(row) = fee_dialog.get_untracked().into_entity() else {
            return;
        };
        let form = FeeForm {
            fee_category: Some(fee_category.get_untracked()),
            pending_amount: Some(fee_amount.get_untracked()),
            due_date: Some(fee_due.get_untracked()),
            fee_status: FeeStatus::from_str(&fee_status.get_untracked()).ok(),
        };

        fee_saving.set(true);
        fee_error.set(None);

        spawn_local(async move {
            let client = api();
            match fees::save_fees(&client, &row.user.id, &form, row.review.as_ref()).await {
                Ok(plan) => {
                    fee_dialog.set(DialogState::Closed);
                    app_state.0.notify_success(match plan {
                        FeeSavePlan::StatusOnly(status) => format!("Fee status updated to {status}"),
                        FeeSavePlan::Upsert(_) => "Fee details saved".to_string(),
                    });
                    reload();
                }
                Err(e) => {
                    // The dialog stays open with the typed values intact.
                    fee_error.set(Some(e.to_string()));
                    app_state.0.notify_error(format!("Failed to save fees: {e}"));
                }
            }
            fee_saving.set(false);
        });
    };

    let on_confirm_delete = move |_: web_sys::MouseEvent| {
        let Some(target) = confirm.get_untracked().into_entity() else {
            return;
        };
        confirm.set(DialogState::Closed);

        match target {
            PendingDelete::Review(row) => {
                let user_id = row.user.id.clone();
                start_fade(fading_rows, &user_id);
                set_timeout(
                    move || {
                        spawn_local(async move {
                            let client = api();
                            let current = ReviewState::of(row.review.as_ref());
                            match reviews::delete_review(&client, &user_id, current).await {
                                Ok(()) => {
                                    app_state.0.notify_success("Review deleted");
                                    reload();
                                }
                                Err(e) => app_state.0.notify_error(format!("Failed to delete review: {e}")),
                            }
                            end_fade(fading_rows, &user_id);
                        });
                    },
                    Duration::from_millis(REVIEW_DELETE_FADE_MS),
                );
            }
            PendingDelete::Fees(row) => {
                fee_dialog.set(DialogState::Closed);
                spawn_local(async move {
                    let client = api();
                    match reviews::delete_fees(&client, &row.user.id, row.review.as_ref()).await {
                        Ok(()) => {
                            app_state.0.notify_success("Fee details deleted");
                            reload();
                        }
                        Err(e) => app_state.0.notify_error(format!("Failed to delete fees: {e}")),
                    }
                });
            }
        }
    };

    let student_rows = move || {
        rows.with(|rows| {
            rows.iter()
                .filter(|r| r.user.role == Role::User)
                .cloned()
                .map(|row| {
                    let uid = row.user.id.clone();
                    let state = ReviewState::of(row.review.as_ref());
                    let has_review = row.review.is_some();
                    let stored_fee_status = row
                        .review
                        .as_ref()
                        .filter(|r| r.has_fee_record())
                        .and_then(|r| r.fee_status);
                    let review_day = row
                        .review
                        .as_ref()
                        .map(|r| display_date(&r.review_date))
                        .unwrap_or_default();
                    let fee_terms = fee_summary(&row);

                    let row_class = {
                        let uid = uid.clone();
                        move || {
                            let base = "border-b transition-opacity duration-500";
                            if fading_rows.with(|f| f.contains(&uid)) {
                                format!("{base} opacity-0")
                            } else {
                                base.to_string()
                            }
                        }
                    };
                    let row_busy = {
                        let uid = uid.clone();
                        move || busy_row.with(|b| b.as_deref() == Some(uid.as_str()))
                    };

                    let status_cell = match stored_fee_status {
                        Some(current) => {
                            let shown = RwSignal::new(current);
                            let uid_select = uid.clone();
                            let uid_paid = uid.clone();
                            let busy_select = row_busy.clone();
                            let busy_paid = row_busy;
                            view! {
                                <div class="flex items-center gap-2">
                                    <select
                                        class="border-input h-7 rounded-md border bg-transparent px-1 text-xs"
                                        prop:value=move || shown.get().to_string()
                                        disabled=busy_select
                                        on:change=move |ev| {
                                            if let Ok(status) = FeeStatus::from_str(&event_target_value(&ev)) {
                                                if status != shown.get_untracked() {
                                                    quick_status(uid_select.clone(), status, shown);
                                                }
                                            }
                                        }
                                    >
                                        {FeeStatus::iter()
                                            .map(|s| view! { <option value=s.to_string()>{s.to_string()}</option> })
                                            .collect_view()}
                                    </select>
                                    <Show when=move || current != FeeStatus::Completed fallback=|| ().into_view()>
                                        {
                                            let uid_paid = uid_paid.clone();
                                            let busy_paid = busy_paid.clone();
                                            view! {
                                                <Button
                                                    variant=ButtonVariant::Success
                                                    size=ButtonSize::Xs
                                                    attr:disabled=busy_paid
                                                    on:click=move |_| quick_status(uid_paid.clone(), FeeStatus::Completed, shown)
                                                >
                                                    <Check class="size-3" />
                                                    "Mark Paid"
                                                </Button>
                                            }
                                        }
                                    </Show>
                                </div>
                            }
                            .into_any()
                        }
                        None => view! { <FeeStatusBadge status=None /> }.into_any(),
                    };

                    let row_review = row.clone();
                    let row_fees = row.clone();
                    let row_delete = row.clone();

                    view! {
                        <tr class=row_class>
                            <td class="py-2 pr-4">
                                <div class="text-sm font-medium">{row.user.display_name().to_string()}</div>
                                <div class="text-xs text-muted-foreground">{row.user.email.clone()}</div>
                            </td>
                            <td class="py-2 pr-4 text-xs">
                                {if row.user.has_mentor() { "Assigned" } else { "Unassigned" }}
                            </td>
                            <td class="py-2 pr-4">
                                <div class="flex flex-col gap-1">
                                    <ReviewStateBadge state=state />
                                    <span class="text-xs text-muted-foreground">{review_day}</span>
                                </div>
                            </td>
                            <td class="py-2 pr-4 text-xs">
                                {match fee_terms {
                                    Some((category, amount, due)) => view! {
                                        <div class="flex flex-col">
                                            <span class="font-medium">{category}</span>
                                            <span>{amount}</span>
                                            <span class="text-muted-foreground">"Due " {due}</span>
                                        </div>
                                    }
                                    .into_any(),
                                    None => view! { <span class="text-muted-foreground">"—"</span> }.into_any(),
                                }}
                            </td>
                            <td class="py-2 pr-4">{status_cell}</td>
                            <td class="py-2">
                                <div class="flex items-center justify-end gap-1">
                                    <Button
                                        variant=ButtonVariant::Outline
                                        size=ButtonSize::Xs
                                        on:click=move |_| open_review(row_review.clone())
                                    >
                                        <Pencil class="size-3" />
                                        {if has_review { "Review" } else { "Add review" }}
                                    </Button>
                                    <Button
                                        variant=ButtonVariant::Outline
                                        size=ButtonSize::Xs
                                        on:click=move |_| open_fees(row_fees.clone())
                                    >
                                        "Fees"
                                    </Button>
                                    <Show when=move || has_review fallback=|| ().into_view()>
                                        {
                                            let row_delete = row_delete.clone();
                                            view! {
                                                <Button
                                                    variant=ButtonVariant::Ghost
                                                    size=ButtonSize::Xs
                                                    attr:title="Delete review"
                                                    on:click=move |_| {
                                                        confirm.set(DialogState::Confirming(PendingDelete::Review(row_delete.clone())))
                                                    }
                                                >
                                                    <Trash2 class="size-3 text-destructive" />
                                                </Button>
                                            }
                                        }
                                    </Show>
                                </div>
                            </td>
                        </tr>
                    }
                })
                .collect_view()
        })
    };

    let fee_view = move || {
        fee_dialog.with(|d| match d {
            DialogState::Viewing(row) => {
                let details = fee_summary(row).unwrap_or_default();
                let stored_status = row.review.as_ref().and_then(|r| r.fee_status);
                let row_delete = row.clone();
                view! {
                    <div class="flex flex-col gap-3 text-sm">
                        <dl class="grid grid-cols-2 gap-x-4 gap-y-2">
                            <dt class="text-xs text-muted-foreground">"Category"</dt>
                            <dd>{details.0}</dd>
                            <dt class="text-xs text-muted-foreground">"Pending amount"</dt>
                            <dd>{details.1}</dd>
                            <dt class="text-xs text-muted-foreground">"Due date"</dt>
                            <dd>{details.2}</dd>
                            <dt class="text-xs text-muted-foreground">"Status"</dt>
                            <dd><FeeStatusBadge status=stored_status /></dd>
                        </dl>
                        <div class="flex justify-between gap-2">
                            <Button
                                variant=ButtonVariant::Destructive
                                size=ButtonSize::Sm
                                on:click=move |_| {
                                    confirm.set(DialogState::Confirming(PendingDelete::Fees(row_delete.clone())))
                                }
                            >
                                "Delete fees"
                            </Button>
                            <Button
                                size=ButtonSize::Sm
                                on:click=move |_| fee_dialog.update(|d| *d = std::mem::take(d).edit())
                            >
                                "Edit"
                            </Button>
                        </div>
                    </div>
                }
                .into_any()
            }
            DialogState::Editing(_) => view! {
                <form class="flex flex-col gap-3" on:submit=on_save_fees>
                    <div class="flex flex-col gap-1.5">
                        <Label html_for="fee-category">"Fee category"</Label>
                        <Input id="fee-category" placeholder="e.g. Monthly" bind_value=fee_category />
                    </div>
                    <div class="flex flex-col gap-1.5">
                        <Label html_for="fee-amount">"Pending amount"</Label>
                        <Input
                            id="fee-amount"
                            r#type="number"
                            min="0"
                            step="any"
                            bind_value=fee_amount
                        />
                    </div>
                    <div class="flex flex-col gap-1.5">
                        <Label html_for="fee-due">"Due date"</Label>
                        <Input id="fee-due" r#type="date" bind_value=fee_due />
                    </div>
                    <div class="flex flex-col gap-1.5">
                        <Label html_for="fee-status">"Status"</Label>
                        <SelectInput id="fee-status" options={status_options::<FeeStatus>()} bind_value=fee_status />
                    </div>
                    <ErrorAlert message=fee_error />
                    <div class="flex justify-end">
                        <Button size=ButtonSize::Sm attr:disabled=move || fee_saving.get()>
                            <BusyLabel busy=fee_saving idle="Save Fees" working="Saving..." />
                        </Button>
                    </div>
                </form>
            }
            .into_any(),
            DialogState::Closed | DialogState::Confirming(_) => ().into_any(),
        })
    };

    view! {
        <Card>
            <CardHeader>
                <div class="flex w-full items-center justify-between">
                    <div class="flex flex-col gap-1.5">
                        <CardTitle>"Dashboard management"</CardTitle>
                        <CardDescription class="text-xs">
                            "Reviews and fees for every student."
                        </CardDescription>
                    </div>
                    <Button
                        variant=ButtonVariant::Outline
                        size=ButtonSize::Sm
                        attr:disabled=move || loading.get()
                        on:click=move |_| reload()
                    >
                        <BusyLabel busy=loading idle="Refresh" working="Loading..." />
                    </Button>
                </div>
            </CardHeader>
            <CardContent>
                <ErrorAlert message=load_error />
            </CardContent>
            <CardTable>
                <Show
                    when=move || !(loading.get() && rows.with(Vec::is_empty))
                    fallback=|| view! { <div class="flex justify-center py-8"><Spinner /></div> }
                >
                    <table class="w-full text-left">
                        <thead>
                            <tr class="border-b text-xs text-muted-foreground">
                                <th class="py-2 pr-4 font-medium">"Student"</th>
                                <th class="py-2 pr-4 font-medium">"Mentor"</th>
                                <th class="py-2 pr-4 font-medium">"Review"</th>
                                <th class="py-2 pr-4 font-medium">"Fees"</th>
                                <th class="py-2 pr-4 font-medium">"Fee status"</th>
                                <th class="py-2"></th>
                            </tr>
                        </thead>
                        <tbody>{student_rows}</tbody>
                    </table>
                </Show>
            </CardTable>
        </Card>

        <Modal
            open=Signal::derive(move || review_dialog.with(DialogState::is_editing))
            title=Signal::derive(move || {
                review_dialog.with(|d| {
                    d.entity()
                        .map(|row| format!("Review · {}", row.user.display_name()))
                        .unwrap_or_default()
                })
            })
            on_close=Callback::new(move |_| review_dialog.set(DialogState::Closed))
        >
            <form class="flex flex-col gap-3" on:submit=on_save_review>
                <div class="flex flex-col gap-1.5">
                    <Label html_for="review-status">"Status"</Label>
                    <SelectInput
                        id="review-status"
                        options={status_options::<ReviewStatus>()}
                        bind_value=review_status
                    />
                </div>
                <div class="flex flex-col gap-1.5">
                    <Label html_for="review-date">"Review date"</Label>
                    <Input id="review-date" r#type="date" bind_value=review_date />
                </div>
                <ErrorAlert message=review_error />
                <div class="flex justify-end">
                    <Button size=ButtonSize::Sm attr:disabled=move || review_saving.get()>
                        <BusyLabel busy=review_saving idle="Save review" working="Saving..." />
                    </Button>
                </div>
            </form>
        </Modal>

        <Modal
            open=Signal::derive(move || fee_dialog.with(DialogState::is_open))
            title=Signal::derive(move || {
                fee_dialog.with(|d| {
                    d.entity()
                        .map(|row| format!("Fees · {}", row.user.display_name()))
                        .unwrap_or_default()
                })
            })
            on_close=Callback::new(move |_| fee_dialog.set(DialogState::Closed))
        >
            {fee_view}
        </Modal>

        <Modal
            open=Signal::derive(move || confirm.with(DialogState::is_confirming))
            title=Signal::derive(|| "Please confirm".to_string())
            on_close=Callback::new(move |_| confirm.set(DialogState::Closed))
        >
            <p class="mb-4 text-sm">
                {move || confirm.with(|d| d.entity().map(PendingDelete::prompt).unwrap_or_default())}
            </p>
            <div class="flex justify-end gap-2">
                <Button
                    variant=ButtonVariant::Outline
                    size=ButtonSize::Sm
                    on:click=move |_| confirm.set(DialogState::Closed)
                >
                    "Cancel"
                </Button>
                <Button variant=ButtonVariant::Destructive size=ButtonSize::Sm on:click=on_confirm_delete>
                    "Delete"
                </Button>
            </div>
        </Modal>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Review, UserProfile};

    fn row(fee_category: Option<&str>) -> UserWithReview {
        UserWithReview {
            user: UserProfile {
                id: "u1".to_string(),
                full_name: "Asha Menon".to_string(),
                email: "asha@example.com".to_string(),
                role: Role::User,
                mentor_id: None,
                profile_image_url: None,
            },
            review: Some(Review {
                user_id: "u1".to_string(),
                review_status: ReviewStatus::Assigned,
                review_date: "2024-03-01".to_string(),
                fee_category: fee_category.map(str::to_string),
                pending_amount: Some(500.0),
                due_date: Some("2024-01-01T00:00:00.000Z".to_string()),
                fee_status: Some(FeeStatus::Pending),
            }),
        }
    }

    #[test]
    fn test_fee_summary_requires_fee_record() {
        assert_eq!(fee_summary(&row(None)), None);
        assert_eq!(
            fee_summary(&row(Some("Weekback"))),
            Some((
                "Weekback".to_string(),
                "₹500".to_string(),
                "01 Jan 2024".to_string()
            ))
        );
    }

    #[test]
    fn test_delete_prompts_name_the_student() {
        let r = row(Some("Weekback"));
        assert!(PendingDelete::Review(r.clone()).prompt().contains("Asha Menon"));
        assert!(PendingDelete::Review(r.clone()).prompt().contains("Fee details are kept"));
        assert_eq!(
            PendingDelete::Fees(r).prompt(),
            "Delete the fee details for Asha Menon?"
        );
    }

    #[test]
    fn test_quick_status_reverts_on_failure() {
        assert_eq!(
            settled_status(FeeStatus::Pending, FeeStatus::Completed, true),
            FeeStatus::Completed
        );
        assert_eq!(
            settled_status(FeeStatus::Pending, FeeStatus::Completed, false),
            FeeStatus::Pending
        );
    }

    #[test]
    fn test_overlapping_deletes_fade_independently() {
        let fading = RwSignal::new(HashSet::new());
        start_fade(fading, "u1");
        start_fade(fading, "u2");
        end_fade(fading, "u1");

        assert!(!fading.with_untracked(|f| f.contains("u1")));
        assert!(fading.with_untracked(|f| f.contains("u2")));
    }

    #[test]
    fn test_status_options_use_wire_names() {
        let opts = status_options::<ReviewStatus>();
        assert_eq!(opts[0], ("Not Assigned".to_string(), "Not Assigned".to_string()));
        assert_eq!(status_options::<FeeStatus>().len(), 3);
    }
}
