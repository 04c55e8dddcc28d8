use leptos::prelude::*;

#[component]
pub fn MetricCard(
    /// Card heading, e.g. "Energy Saved"
    #[prop(into)]
    title: String,
    #[prop(into)] value: String,
) -> impl IntoView {
    view! {
        <div class="metric-card">
            <p class="metric-title">{title}</p>
            <p class="metric-value">{value}</p>
        </div>
    }
}
