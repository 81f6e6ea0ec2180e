use crate::api::NewNotification;
use crate::components::ui::{
    Badge, BusyLabel, Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription,
    CardHeader, CardTitle, ErrorAlert, Input, Label, Spinner,
};
use crate::models::Notification;
use crate::state::AppContext;
use crate::util::display_date;
use icons::{Check, Trash2};
use leptos::prelude::*;
use leptos::task::spawn_local;

fn unread_count(list: &[Notification]) -> usize {
    list.iter().filter(|n| !n.read).count()
}

#[component]
pub fn NotificationsPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let api = move || app_state.0.api_client.get_untracked();
    let is_admin = move || app_state.0.is_admin();

    let notifications: RwSignal<Vec<Notification>> = RwSignal::new(vec![]);
    let loading: RwSignal<bool> = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);

    let title: RwSignal<String> = RwSignal::new(String::new());
    let message: RwSignal<String> = RwSignal::new(String::new());
    let form_error: RwSignal<Option<String>> = RwSignal::new(None);
    let sending: RwSignal<bool> = RwSignal::new(false);

    let reload = move || {
        loading.set(true);
        spawn_local(async move {
            match api().list_notifications().await {
                Ok(list) => {
                    notifications.set(list);
                    error.set(None);
                }
                Err(e) => error.set(Some(e.message)),
            }
            loading.set(false);
        });
    };

    reload();

    let on_send = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if sending.get_untracked() {
            return;
        }
        let n = NewNotification {
            title: title.get_untracked().trim().to_string(),
            message: message.get_untracked().trim().to_string(),
        };
        if n.title.is_empty() || n.message.is_empty() {
            form_error.set(Some("Title and message are required".to_string()));
            return;
        }

        sending.set(true);
        form_error.set(None);
        spawn_local(async move {
            match api().send_notification(&n).await {
                Ok(()) => {
                    title.set(String::new());
                    message.set(String::new());
                    app_state.0.notify_success("Notification sent");
                    reload();
                }
                Err(e) => {
                    form_error.set(Some(e.message.clone()));
                    app_state.0.notify_error(e.message);
                }
            }
            sending.set(false);
        });
    };

    // Read state is flipped locally on success; no reload needed.
    let mark_read = move |id: String| {
        spawn_local(async move {
            match api().mark_notification_read(&id).await {
                Ok(()) => notifications.update(|list| {
                    if let Some(n) = list.iter_mut().find(|n| n.id == id) {
                        n.read = true;
                    }
                }),
                Err(e) => app_state.0.notify_error(e.message),
            }
        });
    };

    let remove = move |id: String| {
        spawn_local(async move {
            match api().delete_notification(&id).await {
                Ok(()) => {
                    app_state.0.notify_success("Notification deleted");
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
                        <CardTitle>"Send notification"</CardTitle>
                    </CardHeader>
                    <CardContent>
                        <form class="flex flex-col gap-3" on:submit=on_send>
                            <div class="flex flex-col gap-1.5">
                                <Label html_for="notification-title">"Title"</Label>
                                <Input id="notification-title" bind_value=title />
                            </div>
                            <div class="flex flex-col gap-1.5">
                                <Label html_for="notification-message">"Message"</Label>
                                <textarea
                                    id="notification-message"
                                    class="border-input min-h-20 w-full rounded-md border bg-transparent px-3 py-2 text-sm shadow-xs outline-none"
                                    prop:value=move || message.get()
                                    on:input=move |ev| message.set(event_target_value(&ev))
                                />
                            </div>
                            <ErrorAlert message=form_error />
                            <Button size=ButtonSize::Sm attr:disabled=move || sending.get()>
                                <BusyLabel busy=sending idle="Send" working="Sending..." />
                            </Button>
                        </form>
                    </CardContent>
                </Card>
            </Show>

            <Card>
                <CardHeader>
                    <CardTitle>"Notifications"</CardTitle>
                    <CardDescription class="text-xs">
                        {move || format!("{} unread", notifications.with(|l| unread_count(l)))}
                    </CardDescription>
                </CardHeader>
                <CardContent>
                    <ErrorAlert message=error />
                    <Show
                        when=move || !(loading.get() && notifications.with(Vec::is_empty))
                        fallback=|| view! { <div class="flex justify-center py-8"><Spinner /></div> }
                    >
                        <ul class="divide-y">
                            {move || {
                                notifications
                                    .get()
                                    .into_iter()
                                    .map(|n| {
                                        let id_read = n.id.clone();
                                        let id_delete = n.id.clone();
                                        let unread = !n.read;
                                        view! {
                                            <li class="flex items-start justify-between gap-4 py-3">
                                                <div class="flex flex-col gap-0.5">
                                                    <div class="flex items-center gap-2">
                                                        <span class="text-sm font-medium">{n.title}</span>
                                                        <Show when=move || unread fallback=|| ().into_view()>
                                                            <Badge class="border-sky-300 bg-sky-50 text-sky-700">"New"</Badge>
                                                        </Show>
                                                    </div>
                                                    <span class="text-sm">{n.message}</span>
                                                    <span class="text-xs text-muted-foreground">{display_date(&n.created_at)}</span>
                                                </div>
                                                <div class="flex gap-1">
                                                    <Show when=move || unread fallback=|| ().into_view()>
                                                        {
                                                            let id = id_read.clone();
                                                            view! {
                                                                <Button
                                                                    variant=ButtonVariant::Outline
                                                                    size=ButtonSize::Xs
                                                                    on:click=move |_| mark_read(id.clone())
                                                                >
                                                                    <Check class="size-3" />
                                                                    "Mark read"
                                                                </Button>
                                                            }
                                                        }
                                                    </Show>
                                                    <Show when=is_admin fallback=|| ().into_view()>
                                                        {
                                                            let id = id_delete.clone();
                                                            view! {
                                                                <Button
                                                                    variant=ButtonVariant::Ghost
                                                                    size=ButtonSize::Xs
                                                                    attr:title="Delete notification"
                                                                    on:click=move |_| remove(id.clone())
                                                                >
                                                                    <Trash2 class="size-3 text-destructive" />
                                                                </Button>
                                                            }
                                                        }
                                                    </Show>
                                                </div>
                                            </li>
                                        }
                                    })
                                    .collect_view()
                            }}
                        </ul>
                    </Show>
                </CardContent>
            </Card>
        </div>
    }
}
