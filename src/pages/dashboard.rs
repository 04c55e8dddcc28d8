use leptos::prelude::*;
use serde_json::Value;

use crate::app::SessionContext;
use crate::session::View;

fn format_field(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "--".to_string(),
        other => other.to_string(),
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let ctx = expect_context::<SessionContext>();
    let user = ctx.user();

    let greeting = user
        .as_ref()
        .map(|u| format!("Welcome back, {}", u.display_name()))
        .unwrap_or_default();

    let rows = user
        .map(|u| {
            let mut rows = vec![("email".to_string(), u.email.clone())];
            rows.extend(u.profile.iter().map(|(k, v)| (k.clone(), format_field(v))));
            rows
        })
        .unwrap_or_default();

    view! {
        <div class="page dashboard-page">
            <h2>{greeting}</h2>
            <p class="page-description">"Your account at a glance."</p>

            <div class="card profile-card">
                <h3>"Profile"</h3>
                {rows
                    .into_iter()
                    .map(|(key, value)| view! {
                        <div class="profile-row">
                            <span class="profile-label">{key}</span>
                            <span class="profile-value">{value}</span>
                        </div>
                    })
                    .collect::<Vec<_>>()}
            </div>

            <div class="card">
                <h3>"Prompt Optimizer"</h3>
                <p>"Shorten a prompt and record the energy it saves"</p>
                <button class="btn btn-primary" on:click=move |_| ctx.navigate(View::Optimizer)>
                    "Optimize a Prompt"
                </button>
            </div>
        </div>
    }
}
