use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription, CardHeader, CardTable,
    CardTitle, ErrorAlert, SelectInput, Spinner,
};
use crate::models::{Role, UserProfile};
use crate::state::AppContext;
use leptos::prelude::*;
use leptos::task::spawn_local;

fn mentor_name(mentors: &[UserProfile], mentor_id: Option<&str>) -> String {
    match mentor_id {
        Some(id) => mentors
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.display_name().to_string())
            .unwrap_or_else(|| "Unknown mentor".to_string()),
        None => "Unassigned".to_string(),
    }
}

#[component]
pub fn MentorsPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let api = move || app_state.0.api_client.get_untracked();

    let students: RwSignal<Vec<UserProfile>> = RwSignal::new(vec![]);
    let mentors: RwSignal<Vec<UserProfile>> = RwSignal::new(vec![]);
    let loading: RwSignal<bool> = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let busy_row: RwSignal<Option<String>> = RwSignal::new(None);

    let reload = move || {
        loading.set(true);
        spawn_local(async move {
            let client = api();
            let result = async {
                let users = client.list_users().await?;
                let mentors = client.list_mentors().await?;
                Ok::<_, crate::api::ApiError>((users, mentors))
            }
            .await;

            match result {
                Ok((users, list)) => {
                    students.set(users.into_iter().filter(|u| u.role == Role::User).collect());
                    mentors.set(list);
                    error.set(None);
                }
                Err(e) => error.set(Some(e.message)),
            }
            loading.set(false);
        });
    };

    reload();

    // `mentor_id == None` unassigns.
    let apply = move |user_id: String, mentor_id: Option<String>| {
        busy_row.set(Some(user_id.clone()));
        spawn_local(async move {
            let client = api();
            let result = match &mentor_id {
                Some(mentor_id) => client.assign_mentor(&user_id, mentor_id).await,
                None => client.unassign_mentor(&user_id).await,
            };
            match result {
                Ok(()) => {
                    app_state.0.notify_success(if mentor_id.is_some() {
                        "Mentor assigned"
                    } else {
                        "Mentor unassigned"
                    });
                    reload();
                }
                Err(e) => app_state.0.notify_error(e.message),
            }
            busy_row.set(None);
        });
    };

    let student_rows = move || {
        let options: Vec<(String, String)> = std::iter::once((String::new(), "Choose mentor".to_string()))
            .chain(mentors.with(|ms| {
                ms.iter()
                    .map(|m| (m.id.clone(), m.display_name().to_string()))
                    .collect::<Vec<_>>()
            }))
            .collect();

        students
            .get()
            .into_iter()
            .map(|student| {
                let assigned = student.mentor_id.as_deref().filter(|_| student.has_mentor());
                let current = mentors.with(|ms| mentor_name(ms, assigned));
                let selected = RwSignal::new(student.mentor_id.clone().unwrap_or_default());
                let uid = student.id.clone();
                let busy = {
                    let uid = uid.clone();
                    move || busy_row.with(|b| b.as_deref() == Some(uid.as_str()))
                };
                let busy_unassign = busy.clone();
                let uid_assign = uid.clone();
                let uid_unassign = uid;
                let has_mentor = student.has_mentor();

                view! {
                    <tr class="border-b">
                        <td class="py-2 pr-4">
                            <div class="text-sm font-medium">{student.display_name().to_string()}</div>
                            <div class="text-xs text-muted-foreground">{student.email.clone()}</div>
                        </td>
                        <td class="py-2 pr-4 text-xs">{current}</td>
                        <td class="py-2 pr-4">
                            <SelectInput options=options.clone() bind_value=selected class="h-7 text-xs" />
                        </td>
                        <td class="py-2">
                            <div class="flex justify-end gap-1">
                                <Button
                                    size=ButtonSize::Xs
                                    attr:disabled=move || busy() || selected.with(String::is_empty)
                                    on:click=move |_| {
                                        let mentor_id = selected.get_untracked();
                                        if !mentor_id.is_empty() {
                                            apply(uid_assign.clone(), Some(mentor_id));
                                        }
                                    }
                                >
                                    "Assign"
                                </Button>
                                <Button
                                    variant=ButtonVariant::Outline
                                    size=ButtonSize::Xs
                                    attr:disabled=move || busy_unassign() || !has_mentor
                                    on:click=move |_| apply(uid_unassign.clone(), None)
                                >
                                    "Unassign"
                                </Button>
                            </div>
                        </td>
                    </tr>
                }
            })
            .collect_view()
    };

    view! {
        <Card>
            <CardHeader>
                <CardTitle>"Mentor assignment"</CardTitle>
                <CardDescription class="text-xs">"Pair each student with a mentor."</CardDescription>
            </CardHeader>
            <CardContent>
                <ErrorAlert message=error />
            </CardContent>
            <CardTable>
                <Show
                    when=move || !(loading.get() && students.with(Vec::is_empty))
                    fallback=|| view! { <div class="flex justify-center py-8"><Spinner /></div> }
                >
                    <table class="w-full text-left">
                        <thead>
                            <tr class="border-b text-xs text-muted-foreground">
                                <th class="py-2 pr-4 font-medium">"Student"</th>
                                <th class="py-2 pr-4 font-medium">"Mentor"</th>
                                <th class="py-2 pr-4 font-medium">"Change to"</th>
                                <th class="py-2"></th>
                            </tr>
                        </thead>
                        <tbody>{student_rows}</tbody>
                    </table>
                </Show>
            </CardTable>
        </Card>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mentor(id: &str, name: &str) -> UserProfile {
        UserProfile {
            id: id.to_string(),
            full_name: name.to_string(),
            email: format!("{id}@example.com"),
            role: Role::Mentor,
            mentor_id: None,
            profile_image_url: None,
        }
    }

    #[test]
    fn test_mentor_name_lookup() {
        let mentors = vec![mentor("m1", "Ravi"), mentor("m2", "")];
        assert_eq!(mentor_name(&mentors, Some("m1")), "Ravi");
        assert_eq!(mentor_name(&mentors, Some("m2")), "m2@example.com");
        assert_eq!(mentor_name(&mentors, Some("gone")), "Unknown mentor");
        assert_eq!(mentor_name(&mentors, None), "Unassigned");
    }
}
