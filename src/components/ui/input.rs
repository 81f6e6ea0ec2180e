use leptos::html;
use leptos::prelude::*;
use tw_merge::tw_merge;

#[component]
pub fn Input(
    // Styling
    #[prop(into, optional)] class: String,

    // Common HTML attributes
    #[prop(into, default = "text")] r#type: &'static str,
    #[prop(into, optional)] placeholder: String,
    #[prop(into, optional)] id: String,
    #[prop(into, optional)] min: Option<String>,
    #[prop(into, optional)] step: Option<String>,
    #[prop(into, optional)] disabled: MaybeProp<bool>,
    #[prop(optional)] required: bool,

    // Two-way binding
    //
    // NOTE: We intentionally avoid `bind:value=...` here because Leptos binding
    // APIs/macros have changed across versions. This manual wiring is stable.
    #[prop(into)] bind_value: RwSignal<String>,

    // Ref for direct DOM access
    #[prop(optional)] node_ref: NodeRef<html::Input>,
) -> impl IntoView {
    let merged_class = tw_merge!(
        "placeholder:text-muted-foreground border-input flex h-8 w-full min-w-0 rounded-md border bg-transparent px-3 py-1 text-sm shadow-xs outline-none disabled:pointer-events-none disabled:cursor-not-allowed disabled:opacity-50",
        "focus-visible:border-ring focus-visible:ring-ring/50 focus-visible:ring-2",
        class
    );

    view! {
        <input
            data-name="Input"
            type=r#type
            class=merged_class
            placeholder=placeholder
            id=id
            min=min
            step=step
            disabled=move || disabled.get().unwrap_or(false)
            required=required
            prop:value=move || bind_value.get()
            on:input=move |ev| bind_value.set(event_target_value(&ev))
            node_ref=node_ref
        />
    }
    .into_any()
}

/// Native `<select>` over a fixed list of string options.
#[component]
pub fn SelectInput(
    #[prop(into, optional)] class: String,
    #[prop(into, optional)] id: String,
    #[prop(into, optional)] disabled: MaybeProp<bool>,
    options: Vec<(String, String)>,
    #[prop(into)] bind_value: RwSignal<String>,
) -> impl IntoView {
    let merged_class = tw_merge!(
        "border-input h-8 w-full rounded-md border bg-transparent px-2 text-sm shadow-xs outline-none disabled:opacity-50",
        class
    );

    view! {
        <select
            class=merged_class
            id=id
            disabled=move || disabled.get().unwrap_or(false)
            prop:value=move || bind_value.get()
            on:change=move |ev| bind_value.set(event_target_value(&ev))
        >
            {options
                .into_iter()
                .map(|(value, label)| view! { <option value=value>{label}</option> })
                .collect_view()}
        </select>
    }
}
