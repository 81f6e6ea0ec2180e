use crate::api::NewHoliday;
use crate::components::ui::{
    BusyLabel, Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription, CardHeader,
    CardTitle, ErrorAlert, Input, Label, Modal, Spinner,
};
use crate::models::Holiday;
use crate::state::{AppContext, DialogState};
use crate::util::{display_date, parse_calendar_day};
use icons::Trash2;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Validate the add-holiday form.
fn new_holiday(title: &str, date: &str, description: &str) -> Result<NewHoliday, &'static str> {
    let title = title.trim();
    if title.is_empty() {
        return Err("Title is required");
    }
    let date = parse_calendar_day(date).ok_or("Date must be a valid date")?;
    let description = description.trim();

    Ok(NewHoliday {
        title: title.to_string(),
        date: date.format("%Y-%m-%d").to_string(),
        description: (!description.is_empty()).then(|| description.to_string()),
    })
}

/// Chronological; unparseable dates sink to the end.
fn sort_by_date(holidays: &mut [Holiday]) {
    holidays.sort_by_key(|h| (parse_calendar_day(&h.date).is_none(), parse_calendar_day(&h.date)));
}

#[component]
pub fn HolidaysPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let api = move || app_state.0.api_client.get_untracked();
    let is_admin = move || app_state.0.is_admin();

    let holidays: RwSignal<Vec<Holiday>> = RwSignal::new(vec![]);
    let loading: RwSignal<bool> = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);

    let title: RwSignal<String> = RwSignal::new(String::new());
    let date: RwSignal<String> = RwSignal::new(String::new());
    let description: RwSignal<String> = RwSignal::new(String::new());
    let form_error: RwSignal<Option<String>> = RwSignal::new(None);
    let saving: RwSignal<bool> = RwSignal::new(false);

    let confirm: RwSignal<DialogState<Holiday>> = RwSignal::new(DialogState::Closed);

    let reload = move || {
        loading.set(true);
        spawn_local(async move {
            match api().list_holidays().await {
                Ok(mut list) => {
                    sort_by_date(&mut list);
                    holidays.set(list);
                    error.set(None);
                }
                Err(e) => error.set(Some(e.message)),
            }
            loading.set(false);
        });
    };

    reload();

    let on_add = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if saving.get_untracked() {
            return;
        }
        let holiday = match new_holiday(
            &title.get_untracked(),
            &date.get_untracked(),
            &description.get_untracked(),
        ) {
            Ok(h) => h,
            Err(msg) => {
                form_error.set(Some(msg.to_string()));
                return;
            }
        };

        saving.set(true);
        form_error.set(None);
        spawn_local(async move {
            match api().create_holiday(&holiday).await {
                Ok(()) => {
                    title.set(String::new());
                    date.set(String::new());
                    description.set(String::new());
                    app_state.0.notify_success(format!("Added {}", holiday.title));
                    reload();
                }
                Err(e) => {
                    form_error.set(Some(e.message.clone()));
                    app_state.0.notify_error(e.message);
                }
            }
            saving.set(false);
        });
    };

    let on_confirm_delete = move |_: web_sys::MouseEvent| {
        let Some(holiday) = confirm.get_untracked().into_entity() else {
            return;
        };
        confirm.set(DialogState::Closed);
        spawn_local(async move {
            match api().delete_holiday(&holiday.id).await {
                Ok(()) => {
                    app_state.0.notify_success(format!("Deleted {}", holiday.title));
                    reload();
                }
                Err(e) => app_state.0.notify_error(e.message),
            }
        });
    };

    view! {
        <div class="flex flex-col gap-6">
            <Show when=is_admin fallback=|| ().into_view()>
                <Card>
                    <CardHeader>
                        <CardTitle>"Add holiday"</CardTitle>
                    </CardHeader>
                    <CardContent>
                        <form class="grid gap-3 sm:grid-cols-3" on:submit=on_add>
                            <div class="flex flex-col gap-1.5">
                                <Label html_for="holiday-title">"Title"</Label>
                                <Input id="holiday-title" bind_value=title required=true />
                            </div>
                            <div class="flex flex-col gap-1.5">
                                <Label html_for="holiday-date">"Date"</Label>
                                <Input id="holiday-date" r#type="date" bind_value=date required=true />
                            </div>
                            <div class="flex flex-col gap-1.5">
                                <Label html_for="holiday-description">"Description"</Label>
                                <Input id="holiday-description" placeholder="Optional" bind_value=description />
                            </div>
                            <div class="sm:col-span-3 flex flex-col gap-2">
                                <ErrorAlert message=form_error />
                                <Button size=ButtonSize::Sm attr:disabled=move || saving.get()>
                                    <BusyLabel busy=saving idle="Add holiday" working="Adding..." />
                                </Button>
                            </div>
                        </form>
                    </CardContent>
                </Card>
            </Show>

            <Card>
                <CardHeader>
                    <CardTitle>"Holidays"</CardTitle>
                    <CardDescription class="text-xs">"Days the institute is closed."</CardDescription>
                </CardHeader>
                <CardContent>
                    <ErrorAlert message=error />
                    <Show
                        when=move || !(loading.get() && holidays.with(Vec::is_empty))
                        fallback=|| view! { <div class="flex justify-center py-8"><Spinner /></div> }
                    >
                        <Show
                            when=move || !holidays.with(Vec::is_empty)
                            fallback=|| view! { <p class="text-xs text-muted-foreground">"No holidays scheduled."</p> }
                        >
                            <ul class="divide-y">
                                {move || {
                                    holidays
                                        .get()
                                        .into_iter()
                                        .map(|h| {
                                            let day = display_date(&h.date);
                                            let target = h.clone();
                                            view! {
                                                <li class="flex items-start justify-between gap-4 py-3">
                                                    <div class="flex flex-col gap-0.5">
                                                        <span class="text-sm font-medium">{h.title}</span>
                                                        <span class="text-xs text-muted-foreground">{day}</span>
                                                        {h.description.map(|d| view! { <span class="text-xs">{d}</span> })}
                                                    </div>
                                                    <Show when=is_admin fallback=|| ().into_view()>
                                                        {
                                                            let target = target.clone();
                                                            view! {
                                                                <Button
                                                                    variant=ButtonVariant::Ghost
                                                                    size=ButtonSize::Xs
                                                                    attr:title="Delete holiday"
                                                                    on:click=move |_| confirm.set(DialogState::Confirming(target.clone()))
                                                                >
                                                                    <Trash2 class="size-3 text-destructive" />
                                                                </Button>
                                                            }
                                                        }
                                                    </Show>
                                                </li>
                                            }
                                        })
                                        .collect_view()
                                }}
                            </ul>
                        </Show>
                    </Show>
                </CardContent>
            </Card>
        </div>

        <Modal
            open=Signal::derive(move || confirm.with(DialogState::is_confirming))
            title=Signal::derive(|| "Delete holiday".to_string())
            on_close=Callback::new(move |_| confirm.set(DialogState::Closed))
        >
            <p class="mb-4 text-sm">
                {move || {
                    confirm.with(|d| d.entity().map(|h| format!("Delete \"{}\"?", h.title)).unwrap_or_default())
                }}
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

    fn holiday(id: &str, date: &str) -> Holiday {
        Holiday {
            id: id.to_string(),
            title: id.to_string(),
            date: date.to_string(),
            description: None,
        }
    }

    #[test]
    fn test_new_holiday_validation() {
        assert_eq!(new_holiday("  ", "2024-08-15", ""), Err("Title is required"));
        assert_eq!(new_holiday("Onam", "soon", ""), Err("Date must be a valid date"));

        let h = new_holiday(" Onam ", "2024-09-15T00:00:00Z", "  ").expect("valid holiday");
        assert_eq!(h.title, "Onam");
        assert_eq!(h.date, "2024-09-15");
        assert_eq!(h.description, None);
    }

    #[test]
    fn test_sort_by_date_puts_bad_dates_last() {
        let mut list = vec![
            holiday("b", "2024-12-25"),
            holiday("x", "tbd"),
            holiday("a", "2024-01-26T00:00:00.000Z"),
        ];
        sort_by_date(&mut list);
        let ids: Vec<_> = list.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "x"]);
    }
}
