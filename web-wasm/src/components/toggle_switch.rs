//! トグルスイッチ（状態は持たない）

use leptos::prelude::*;

#[component]
pub fn ToggleSwitch<F>(
    label: &'static str,
    #[prop(optional)] description: Option<&'static str>,
    #[prop(into)] checked: Signal<bool>,
    on_change: F,
) -> impl IntoView
where
    F: Fn(bool) + 'static,
{
    view! {
        <label class="toggle-switch">
            <input
                type="checkbox"
                prop:checked=move || checked.get()
                on:change=move |ev| on_change(event_target_checked(&ev))
            />
            <span class="toggle-slider"></span>
            <span class="toggle-label">{label}</span>
            {description.map(|d| view! { <span class="text-muted">{d}</span> })}
        </label>
    }
}
