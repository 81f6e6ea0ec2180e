use icons::X;
use leptos::prelude::*;
use tw_merge::tw_merge;

/// Controlled modal. Visibility is owned by the caller's dialog state; the
/// close button, backdrop and Escape all go through `on_close`.
#[component]
pub fn Modal(
    #[prop(into)] open: Signal<bool>,
    #[prop(into)] title: Signal<String>,
    on_close: Callback<()>,
    #[prop(optional, into)] class: String,
    children: ChildrenFn,
) -> impl IntoView {
    let merged_class = tw_merge!(
        "relative w-full max-w-md rounded-xl border bg-background p-5 shadow-lg",
        class
    );
    let children = StoredValue::new(children);

    let esc = leptos_dom::helpers::window_event_listener(leptos::ev::keydown, move |ev| {
        if ev.key() == "Escape" && open.get_untracked() {
            on_close.run(());
        }
    });
    on_cleanup(move || esc.remove());

    view! {
        <Show when=move || open.get() fallback=|| ().into_view()>
            <div
                class="fixed inset-0 z-50 flex items-center justify-center bg-black/40 px-4"
                on:click=move |_| on_close.run(())
            >
                <div
                    role="dialog"
                    aria-modal="true"
                    class=merged_class.clone()
                    on:click=|ev| ev.stop_propagation()
                >
                    <button
                        type="button"
                        class="absolute top-4 right-4 rounded-sm p-1 text-muted-foreground hover:text-foreground"
                        aria-label="Close dialog"
                        on:click=move |_| on_close.run(())
                    >
                        <X class="size-4" />
                    </button>
                    <h3 class="mb-4 text-base font-semibold">{move || title.get()}</h3>
                    {move || children.with_value(|c| c())}
                </div>
            </div>
        </Show>
    }
}
