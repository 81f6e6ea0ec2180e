use crate::components::ui::{
    Card, CardContent, CardDescription, CardHeader, CardTable, CardTitle, ErrorAlert, Spinner,
};
use crate::models::LeaderboardEntry;
use crate::state::AppContext;
use crate::util::rank_leaderboard;
use leptos::prelude::*;
use leptos::task::spawn_local;

fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|w| w.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

#[component]
pub fn LeaderboardPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();

    let ranked: RwSignal<Vec<(u32, LeaderboardEntry)>> = RwSignal::new(vec![]);
    let loading: RwSignal<bool> = RwSignal::new(true);
    let error: RwSignal<Option<String>> = RwSignal::new(None);

    let me = move || {
        app_state
            .0
            .current_user
            .with(|u| u.as_ref().map(|u| u.id.clone()))
    };

    spawn_local(async move {
        let client = app_state.0.api_client.get_untracked();
        match client.leaderboard().await {
            Ok(entries) => ranked.set(rank_leaderboard(entries)),
            Err(e) => error.set(Some(e.message)),
        }
        loading.set(false);
    });

    view! {
        <Card>
            <CardHeader>
                <CardTitle>"Leaderboard"</CardTitle>
                <CardDescription class="text-xs">"Equal scores share a rank."</CardDescription>
            </CardHeader>
            <CardContent>
                <ErrorAlert message=error />
            </CardContent>
            <CardTable>
                <Show
                    when=move || !loading.get()
                    fallback=|| view! { <div class="flex justify-center py-8"><Spinner /></div> }
                >
                    <table class="w-full text-left">
                        <thead>
                            <tr class="border-b text-xs text-muted-foreground">
                                <th class="py-2 pr-4 font-medium">"Rank"</th>
                                <th class="py-2 pr-4 font-medium">"Student"</th>
                                <th class="py-2 pr-4 font-medium">"Reviews completed"</th>
                                <th class="py-2 text-right font-medium">"Score"</th>
                            </tr>
                        </thead>
                        <tbody>
                            {move || {
                                let me = me();
                                ranked
                                    .get()
                                    .into_iter()
                                    .map(|(rank, e)| {
                                        let row_class = if me.as_deref() == Some(e.user_id.as_str()) {
                                            "border-b bg-accent"
                                        } else {
                                            "border-b"
                                        };
                                        let avatar = match e.profile_image_url.clone() {
                                            Some(url) => view! {
                                                <img src=url alt="" class="size-7 rounded-full object-cover" />
                                            }
                                            .into_any(),
                                            None => view! {
                                                <span class="flex size-7 items-center justify-center rounded-full bg-muted text-xs">
                                                    {initials(&e.full_name)}
                                                </span>
                                            }
                                            .into_any(),
                                        };
                                        view! {
                                            <tr class=row_class>
                                                <td class="py-2 pr-4 text-sm font-semibold">{format!("#{rank}")}</td>
                                                <td class="py-2 pr-4">
                                                    <div class="flex items-center gap-2 text-sm">
                                                        {avatar}
                                                        {e.full_name}
                                                    </div>
                                                </td>
                                                <td class="py-2 pr-4 text-sm">{e.completed_reviews}</td>
                                                <td class="py-2 text-right text-sm">{e.score.to_string()}</td>
                                            </tr>
                                        }
                                    })
                                    .collect_view()
                            }}
                        </tbody>
                    </table>
                </Show>
            </CardTable>
        </Card>
    }
}
