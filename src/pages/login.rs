use super::home_path;
use crate::api::{ApiError, ApiErrorKind};
use crate::components::ui::{
    BusyLabel, Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription, CardHeader,
    CardTitle, ErrorAlert, Input, Label, Modal,
};
use crate::password_reset::{PasswordReset, ResetGateway, ResetStep, SUCCESS_CLOSE_MS};
use crate::state::AppContext;
use crate::storage::save_user_to_storage;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dom::helpers::set_timeout;
use leptos_router::hooks::use_navigate;
use std::time::Duration;

const FIELD_CLASS: &str = "border-input flex h-8 w-full rounded-md border bg-transparent px-3 py-1 text-sm shadow-xs outline-none focus-visible:ring-2 focus-visible:ring-ring/50 disabled:opacity-50";

fn login_error_message(e: &ApiError) -> String {
    match e.kind {
        ApiErrorKind::Unauthorized => "Invalid email or password".to_string(),
        ApiErrorKind::NotFound => "No account found for this email".to_string(),
        _ => e.message.clone(),
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let email: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);

    let app_state = expect_context::<AppContext>();
    let navigate = StoredValue::new(use_navigate());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if loading.get_untracked() {
            return;
        }

        let email_val = email.get_untracked().trim().to_string();
        let password_val = password.get_untracked();
        let mut api_client = app_state.0.api_client.get_untracked();

        loading.set(true);
        error.set(None);

        spawn_local(async move {
            match api_client.login(&email_val, &password_val).await {
                Ok(response) => {
                    log::info!("signed in as {} ({})", response.user.email, response.user.role);
                    let home = home_path(response.user.role);
                    api_client.set_token(response.token);
                    api_client.save_to_storage();
                    save_user_to_storage(&response.user);
                    app_state.0.api_client.set(api_client);
                    app_state.0.current_user.set(Some(response.user));
                    navigate.with_value(|nav| nav(home, Default::default()));
                }
                Err(e) => {
                    error.set(Some(login_error_message(&e)));
                }
            }
            loading.set(false);
        });
    };

    let reset: RwSignal<PasswordReset> = RwSignal::new(PasswordReset::default());

    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto flex min-h-screen w-full max-w-sm flex-col justify-center px-4 py-10">
                <div class="mb-6 flex items-center justify-center">
                    <span class="text-sm font-medium text-foreground">"Institute Desk"</span>
                </div>

                <Card>
                    <CardHeader>
                        <CardTitle class="text-lg">"Log in"</CardTitle>
                        <CardDescription class="text-xs">"Use your institute email and password."</CardDescription>
                    </CardHeader>

                    <CardContent>
                        <form class="flex flex-col gap-3" on:submit=on_submit>
                            <div class="flex flex-col gap-1.5">
                                <Label html_for="email" class="text-xs">"Email"</Label>
                                <Input
                                    id="email"
                                    r#type="email"
                                    placeholder="you@example.com"
                                    bind_value=email
                                    required=true
                                    class="h-8 text-sm"
                                />
                            </div>

                            <div class="flex flex-col gap-1.5">
                                <Label html_for="password" class="text-xs">"Password"</Label>
                                <Input
                                    id="password"
                                    r#type="password"
                                    placeholder="••••••••"
                                    bind_value=password
                                    required=true
                                    class="h-8 text-sm"
                                />
                            </div>

                            <ErrorAlert message=error />

                            <Button
                                class="w-full"
                                size=ButtonSize::Sm
                                attr:disabled=move || loading.get()
                            >
                                <BusyLabel busy=loading idle="Continue" working="Signing in..." />
                            </Button>

                            <button
                                type="button"
                                class="pt-1 text-left text-xs text-primary underline underline-offset-4"
                                on:click=move |_| reset.update(PasswordReset::open)
                            >
                                "Forgot password?"
                            </button>
                        </form>
                    </CardContent>
                </Card>
            </div>

            <ForgotPasswordModal reset=reset />
        </div>
    }
}

/// Text field bound straight into the reset state.
fn reset_field(
    reset: RwSignal<PasswordReset>,
    id: &'static str,
    label: &'static str,
    kind: &'static str,
    get: fn(&PasswordReset) -> String,
    set: fn(&mut PasswordReset, String),
) -> impl IntoView {
    view! {
        <div class="flex flex-col gap-1.5">
            <Label html_for=id>{label}</Label>
            <input
                id=id
                type=kind
                class=FIELD_CLASS
                prop:value=move || reset.with(get)
                disabled=move || reset.with(PasswordReset::is_busy)
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    reset.update(|r| set(r, value));
                }
            />
        </div>
    }
}

#[component]
fn ForgotPasswordModal(reset: RwSignal<PasswordReset>) -> impl IntoView {
    let app_state = expect_context::<AppContext>();

    let on_verify = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some((session, email, password)) = reset.try_update(PasswordReset::begin_verify).flatten() else {
            return;
        };
        let api = app_state.0.api_client.get_untracked();

        spawn_local(async move {
            let result = api.verify_credentials(&email, &password).await;
            reset.try_update(|r| r.finish_verify(session, result));
        });
    };

    let on_change = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some((session, req, token)) = reset.try_update(PasswordReset::begin_change).flatten() else {
            return;
        };
        let api = app_state.0.api_client.get_untracked();

        spawn_local(async move {
            let result = ResetGateway::change_password(&api, token, &req).await;
            let succeeded = result.is_ok();
            reset.try_update(|r| r.finish_change(session, result));

            if succeeded {
                set_timeout(
                    move || {
                        reset.try_update(|r| r.close_if_succeeded(session));
                    },
                    Duration::from_millis(SUCCESS_CLOSE_MS),
                );
            }
        });
    };

    let busy = Signal::derive(move || reset.with(PasswordReset::is_busy));
    // Only re-render the body when the visible form changes, not on every keystroke.
    let screen = Memo::new(move |_| match reset.with(|r| r.step) {
        ResetStep::Verifying => ResetStep::VerifyIdentity,
        ResetStep::Submitting => ResetStep::SetPassword,
        step => step,
    });
    let error = Signal::derive(move || reset.with(|r| r.error.clone()));

    view! {
        <Modal
            open=Signal::derive(move || reset.with(PasswordReset::is_open))
            title=Signal::derive(move || {
                format!("Reset password · Step {} of 2", reset.with(PasswordReset::step_number))
            })
            on_close=Callback::new(move |_| reset.update(PasswordReset::close))
        >
            {move || match screen.get() {
                ResetStep::Closed => ().into_any(),
                ResetStep::VerifyIdentity | ResetStep::Verifying => view! {
                    <form class="flex flex-col gap-3" on:submit=on_verify>
                        <p class="text-xs text-muted-foreground">
                            "Confirm it's you with your email and current password."
                        </p>
                        {reset_field(reset, "reset-email", "Email", "email", |r| r.email.clone(), |r, v| r.email = v)}
                        {reset_field(
                            reset,
                            "reset-current",
                            "Current password",
                            "password",
                            |r| r.current_password.clone(),
                            |r, v| r.current_password = v,
                        )}
                        <ErrorAlert message=error />
                        <div class="flex justify-end gap-2">
                            <Button
                                variant=ButtonVariant::Outline
                                size=ButtonSize::Sm
                                on:click=move |ev| {
                                    ev.prevent_default();
                                    reset.update(PasswordReset::close);
                                }
                            >
                                "Cancel"
                            </Button>
                            <Button size=ButtonSize::Sm attr:disabled=move || busy.get()>
                                <BusyLabel busy=busy idle="Verify" working="Verifying..." />
                            </Button>
                        </div>
                    </form>
                }
                .into_any(),
                ResetStep::SetPassword | ResetStep::Submitting => view! {
                    <form class="flex flex-col gap-3" on:submit=on_change>
                        <p class="text-xs text-muted-foreground">
                            {move || reset.with(|r| {
                                r.verified
                                    .as_ref()
                                    .map(|v| format!("Verified as {}. Choose a new password.", v.email))
                                    .unwrap_or_default()
                            })}
                        </p>
                        {reset_field(
                            reset,
                            "reset-new",
                            "New password",
                            "password",
                            |r| r.new_password.clone(),
                            |r, v| r.new_password = v,
                        )}
                        {reset_field(
                            reset,
                            "reset-confirm",
                            "Confirm new password",
                            "password",
                            |r| r.confirm_password.clone(),
                            |r, v| r.confirm_password = v,
                        )}
                        <ErrorAlert message=error />
                        <div class="flex justify-between gap-2">
                            <Button
                                variant=ButtonVariant::Ghost
                                size=ButtonSize::Sm
                                attr:disabled=move || busy.get()
                                on:click=move |ev| {
                                    ev.prevent_default();
                                    reset.update(PasswordReset::back);
                                }
                            >
                                "Back"
                            </Button>
                            <Button size=ButtonSize::Sm attr:disabled=move || busy.get()>
                                <BusyLabel busy=busy idle="Change password" working="Saving..." />
                            </Button>
                        </div>
                    </form>
                }
                .into_any(),
                ResetStep::Succeeded => view! {
                    <p class="rounded-md border border-emerald-300 bg-emerald-50 px-3 py-2 text-sm text-emerald-800">
                        {move || reset.with(|r| r.success.clone().unwrap_or_default())}
                    </p>
                }
                .into_any(),
            }}
        </Modal>
    }
}
