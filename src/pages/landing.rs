use leptos::prelude::*;

use crate::app::SessionContext;

#[component]
pub fn LandingPage() -> impl IntoView {
    let ctx = expect_context::<SessionContext>();

    view! {
        <div class="page landing-page">
            <h2>"Welcome to EcoPrompt"</h2>
            <p class="page-description">
                "Measure and reduce the energy footprint of your AI usage."
            </p>

            <div class="card-grid">
                <div class="card">
                    <h3>"Optimize Prompts"</h3>
                    <p>"Trim verbose prompts and see the tokens you save"</p>
                </div>
                <div class="card">
                    <h3>"Track Impact"</h3>
                    <p>"Record the estimated energy and CO\u{2082} saved by each change"</p>
                </div>
            </div>

            <button class="btn btn-primary" on:click=move |_| ctx.request_login()>
                "Log In"
            </button>
        </div>
    }
}
