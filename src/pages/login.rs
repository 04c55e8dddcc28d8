use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::api::{HttpApi, LoginRequest, SustainabilityApi};
use crate::app::SessionContext;
use crate::config::AppConfig;

#[component]
pub fn LoginPage() -> impl IntoView {
    let ctx = expect_context::<SessionContext>();
    let api = HttpApi::new(use_context::<AppConfig>().unwrap_or_default());

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (submitting, set_submitting) = signal(false);
    let (error, set_error) = signal::<Option<String>>(None);

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let request = LoginRequest {
            email: email.get().trim().to_string(),
            password: password.get(),
        };
        if request.email.is_empty() || request.password.is_empty() {
            set_error.set(Some("Please enter your email and password".to_string()));
            return;
        }

        set_submitting.set(true);
        set_error.set(None);
        let api = api.clone();
        spawn_local(async move {
            match api.login(&request).await {
                Ok(user) => {
                    set_submitting.set(false);
                    let storage = ctx.storage;
                    if let Some(Err(e)) = ctx.session.try_update(|s| s.login(&storage, user)) {
                        set_error.set(Some(format!("Login failed: {}", e)));
                    }
                }
                Err(e) => {
                    set_error.set(Some(format!("Login failed: {}", e)));
                    set_submitting.set(false);
                }
            }
        });
    };

    view! {
        <div class="page login-page">
            <h2>"Log In"</h2>

            <form class="login-form" on:submit=submit>
                <div class="form-group">
                    <label for="login-email">"Email"</label>
                    <input
                        id="login-email"
                        type="email"
                        class="input"
                        prop:value=move || email.get()
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                        disabled=move || submitting.get()
                    />
                </div>
                <div class="form-group">
                    <label for="login-password">"Password"</label>
                    <input
                        id="login-password"
                        type="password"
                        class="input input-password"
                        prop:value=move || password.get()
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                        disabled=move || submitting.get()
                    />
                </div>

                <button type="submit" class="btn btn-primary" disabled=move || submitting.get()>
                    {move || if submitting.get() { "Logging in..." } else { "Log In" }}
                </button>
            </form>

            {move || error.get().map(|e| view! {
                <span class="status-text status-error">{e}</span>
            })}
        </div>
    }
}
