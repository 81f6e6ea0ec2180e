use crate::pages::{
    DashboardPage, HolidaysPage, LeaderboardPage, LoginPage, MentorsPage, NotificationsPage,
    RootAuthed, RootPage,
};
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App() -> impl IntoView {
    provide_context(AppContext(AppState::new()));

    // Router hooks (`use_navigate`, `use_location`) need a <Router> ancestor.
    view! {
        <Router>
            <Routes fallback=|| view! { <div class="px-4 py-8 text-xs text-muted-foreground">"Not found"</div> }>
                <Route path=path!("login") view=LoginPage />
                <Route path=path!("dashboard") view=move || view! {
                    <RootAuthed admin_only=true>
                        <DashboardPage />
                    </RootAuthed>
                } />
                <Route path=path!("mentors") view=move || view! {
                    <RootAuthed admin_only=true>
                        <MentorsPage />
                    </RootAuthed>
                } />
                <Route path=path!("holidays") view=move || view! {
                    <RootAuthed>
                        <HolidaysPage />
                    </RootAuthed>
                } />
                <Route path=path!("notifications") view=move || view! {
                    <RootAuthed>
                        <NotificationsPage />
                    </RootAuthed>
                } />
                <Route path=path!("leaderboard") view=move || view! {
                    <RootAuthed>
                        <LeaderboardPage />
                    </RootAuthed>
                } />
                <Route path=path!("") view=RootPage />
            </Routes>
        </Router>
    }
}
