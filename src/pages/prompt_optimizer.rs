//! Prompt sustainability optimizer.
//!
//! The user submits a prompt, reviews the optimized version with its
//! estimated savings, and may accept it once to record the CO2 saved.

use leptos::prelude::*;
use tracing::warn;
use wasm_bindgen_futures::spawn_local;

use crate::api::HttpApi;
use crate::app::SessionContext;
use crate::browser::{self, BrowserTimer};
use crate::components::metric_card::MetricCard;
use crate::components::token_chart::TokenChart;
use crate::config::AppConfig;
use crate::optimizer::{self, CopyNotice, Workflow};

#[component]
pub fn PromptOptimizerPage() -> impl IntoView {
    let ctx = expect_context::<SessionContext>();
    let api = HttpApi::new(use_context::<AppConfig>().unwrap_or_default());

    let (prompt, set_prompt) = signal(String::new());
    let workflow = RwSignal::new(Workflow::new());
    let copy_notice = StoredValue::new_local(CopyNotice::new(BrowserTimer));

    on_cleanup(move || {
        copy_notice.try_with_value(|n| n.cancel());
    });

    let api_optimize = api.clone();
    let on_optimize = move |_| {
        let api = api_optimize.clone();
        let text = prompt.get();
        spawn_local(async move {
            if let Err(e) = optimizer::optimize(&api, &workflow, &text).await {
                browser::alert(e.user_message());
            }
        });
    };

    let on_accept = move |_| {
        let Some(user) = ctx.user() else {
            warn!("Accept clicked without a logged-in user");
            return;
        };
        let api = api.clone();
        spawn_local(async move {
            if let Err(e) = optimizer::accept(&api, &workflow, &user).await {
                browser::alert(e.user_message());
            }
        });
    };

    let on_copy = move |_| {
        let Some(text) = copy_notice.with_value(|n| n.copy(&workflow)) else {
            return;
        };
        spawn_local(async move {
            if let Err(e) = browser::write_clipboard(&text).await {
                warn!("Clipboard write failed: {}", e);
            }
        });
    };

    let optimizing = move || workflow.with(Workflow::is_optimizing);
    let saving = move || workflow.with(Workflow::is_saving);
    let accepted = move || workflow.with(Workflow::is_accepted);
    let result = Memo::new(move |_| workflow.with(|w| w.result().cloned()));

    view! {
        <div class="page prompt-optimizer-page">
            <h2>"Prompt Sustainability Optimizer"</h2>
            <p class="page-description">
                "Reduce AI compute waste by optimizing prompt verbosity."
            </p>

            <div class="card optimizer-input">
                <textarea
                    rows=4
                    class="input"
                    placeholder="Enter your original prompt..."
                    prop:value=move || prompt.get()
                    on:input=move |ev| set_prompt.set(event_target_value(&ev))
                ></textarea>

                <button
                    class="btn btn-primary"
                    on:click=on_optimize
                    disabled=optimizing
                >
                    {move || if optimizing() { "Optimizing..." } else { "Optimize Prompt" }}
                </button>
            </div>

            {move || {
                result.get().map(|result| {
                    let metrics = workflow.with_untracked(Workflow::metrics);
                    let series = result.token_series().to_vec();
                    view! {
                        <div class="prompt-comparison">
                            <div class="card">
                                <h3>"Original Prompt"</h3>
                                <p>{result.original_prompt}</p>
                            </div>

                            <div class="card optimized-card">
                                <h3>"Optimized Prompt"</h3>
                                <p>{result.optimized_prompt}</p>
                                <button class="btn-small btn-copy" title="Copy" on:click=on_copy>
                                    "Copy"
                                </button>
                                <Show when=move || workflow.with(Workflow::is_copied)>
                                    <span class="status-text status-saved">"Copied!"</span>
                                </Show>
                            </div>
                        </div>

                        <div class="metric-grid">
                            {metrics
                                .into_iter()
                                .map(|m| view! { <MetricCard title=m.title value=m.value /> })
                                .collect::<Vec<_>>()}
                        </div>

                        <div class="card">
                            <h3>"Token Usage Comparison"</h3>
                            <TokenChart series=series />
                        </div>

                        <div class="action-buttons">
                            <button
                                class=move || if accepted() { "btn btn-accepted" } else { "btn btn-primary" }
                                on:click=on_accept.clone()
                                disabled=move || accepted() || saving()
                            >
                                {move || {
                                    if accepted() {
                                        "\u{2714} Optimization Applied"
                                    } else if saving() {
                                        "Applying..."
                                    } else {
                                        "Accept Optimization"
                                    }
                                }}
                            </button>
                        </div>
                    }
                })
            }}
        </div>
    }
}
