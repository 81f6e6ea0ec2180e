mod dashboard;
mod holidays;
mod leaderboard;
mod login;
mod mentors;
mod notifications;

pub use dashboard::DashboardPage;
pub use holidays::HolidaysPage;
pub use leaderboard::LeaderboardPage;
pub use login::LoginPage;
pub use mentors::MentorsPage;
pub use notifications::NotificationsPage;

use crate::api::ApiClient;
use crate::components::ui::{Button, ButtonSize, ButtonVariant};
use crate::models::Role;
use crate::state::{AppContext, NoticeKind};
use icons::{LogOut, X};
use leptos::prelude::*;
use leptos_dom::helpers::set_timeout;
use leptos_router::components::Redirect;
use leptos_router::hooks::{use_location, use_navigate};
use std::time::Duration;

/// How long a success/error notice stays on screen.
const NOTICE_MS: u64 = 4000;

/// Landing route after sign-in.
pub(crate) fn home_path(role: Role) -> &'static str {
    match role {
        Role::Admin => "/dashboard",
        Role::Mentor | Role::User => "/leaderboard",
    }
}

struct NavLink {
    href: &'static str,
    label: &'static str,
    admin_only: bool,
}

const NAV_LINKS: &[NavLink] = &[
    NavLink {
        href: "/dashboard",
        label: "Dashboard",
        admin_only: true,
    },
    NavLink {
        href: "/mentors",
        label: "Mentors",
        admin_only: true,
    },
    NavLink {
        href: "/holidays",
        label: "Holidays",
        admin_only: false,
    },
    NavLink {
        href: "/notifications",
        label: "Notifications",
        admin_only: false,
    },
    NavLink {
        href: "/leaderboard",
        label: "Leaderboard",
        admin_only: false,
    },
];

#[component]
fn NoticeBanner() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let notice = app_state.0.notice;

    Effect::new(move |_| {
        if let Some(id) = notice.with(|n| n.as_ref().map(|n| n.id)) {
            set_timeout(
                move || app_state.0.dismiss_notice(id),
                Duration::from_millis(NOTICE_MS),
            );
        }
    });

    view! {
        {move || {
            notice.get().map(|n| {
                let tone = match n.kind {
                    NoticeKind::Success => "border-emerald-300 bg-emerald-50 text-emerald-800",
                    NoticeKind::Error => "border-red-300 bg-red-50 text-red-800",
                };
                let id = n.id;
                view! {
                    <div
                        role="status"
                        class=format!(
                            "fixed right-4 bottom-4 z-50 flex max-w-sm items-start gap-3 rounded-lg border px-4 py-3 text-sm shadow-md {tone}",
                        )
                    >
                        <span class="flex-1">{n.text}</span>
                        <button
                            type="button"
                            class="opacity-60 hover:opacity-100"
                            aria-label="Dismiss"
                            on:click=move |_| app_state.0.dismiss_notice(id)
                        >
                            <X class="size-4" />
                        </button>
                    </div>
                }
            })
        }}
    }
}

#[component]
pub fn AppLayout(children: ChildrenFn) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let navigate = StoredValue::new(use_navigate());
    let location = use_location();

    let user_name = move || {
        app_state
            .0
            .current_user
            .with(|u| u.as_ref().map(|u| u.display_name().to_string()).unwrap_or_default())
    };
    let role_label = move || {
        app_state
            .0
            .current_user
            .with(|u| u.as_ref().map(|u| u.role.to_string()).unwrap_or_default())
    };

    let on_logout = move |_: web_sys::MouseEvent| {
        app_state.0.api_client.update(ApiClient::logout);
        app_state.0.current_user.set(None);
        log::info!("signed out");
        navigate.with_value(|nav| nav("/login", Default::default()));
    };

    view! {
        <div class="min-h-screen bg-background">
            <header class="border-b">
                <div class="mx-auto flex h-12 max-w-6xl items-center gap-6 px-4">
                    <a href="/" class="text-sm font-semibold">"Institute Desk"</a>
                    <nav class="flex items-center gap-1">
                        {NAV_LINKS
                            .iter()
                            .map(|link| {
                                let href = link.href;
                                let visible = move || !link.admin_only || app_state.0.is_admin();
                                let active = move || location.pathname.get().starts_with(href);
                                view! {
                                    <Show when=visible fallback=|| ().into_view()>
                                        <a
                                            href=href
                                            class=move || {
                                                if active() {
                                                    "rounded-md bg-accent px-3 py-1.5 text-xs font-medium"
                                                } else {
                                                    "rounded-md px-3 py-1.5 text-xs text-muted-foreground hover:text-foreground"
                                                }
                                            }
                                        >
                                            {link.label}
                                        </a>
                                    </Show>
                                }
                            })
                            .collect_view()}
                    </nav>
                    <div class="ml-auto flex items-center gap-3 text-xs">
                        <span class="text-muted-foreground">
                            {user_name} " · " {role_label}
                        </span>
                        <Button
                            variant=ButtonVariant::Ghost
                            size=ButtonSize::Xs
                            on:click=on_logout
                            attr:title="Sign out"
                        >
                            <LogOut class="size-4" />
                        </Button>
                    </div>
                </div>
            </header>
            <main class="mx-auto max-w-6xl px-4 py-6">
                {move || children()}
            </main>
            <NoticeBanner />
        </div>
    }
}

#[component]
pub fn RootAuthed(
    /// Non-admins get the root redirect instead of the page.
    #[prop(optional)]
    admin_only: bool,
    children: ChildrenFn,
) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let is_authenticated = move || app_state.0.api_client.with(ApiClient::is_authenticated);
    let allowed = move || !admin_only || app_state.0.is_admin();

    // Store children so the view macro sees an `Fn` (not an `FnOnce`).
    let children = StoredValue::new(children);

    view! {
        <Show when=is_authenticated fallback=move || view! { <LoginPage /> }>
            <Show when=allowed fallback=|| view! { <Redirect path="/" /> }>
                <AppLayout>
                    {move || children.with_value(|c| c())}
                </AppLayout>
            </Show>
        </Show>
    }
}

#[component]
pub fn RootPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let target = move || {
        let role = app_state
            .0
            .current_user
            .with(|u| u.as_ref().map_or(Role::User, |u| u.role));
        home_path(role)
    };

    view! {
        <RootAuthed>
            {move || view! { <Redirect path=target() /> }}
        </RootAuthed>
    }
}
