use leptos::prelude::*;

use crate::app::SessionContext;
use crate::session::View;

#[component]
pub fn Navbar() -> impl IntoView {
    let ctx = expect_context::<SessionContext>();
    let user_label = move || {
        ctx.session
            .with(|s| s.user().map(|u| u.display_name().to_string()))
            .unwrap_or_default()
    };

    view! {
        <nav class="navbar">
            <div class="navbar-header">
                <h1 class="navbar-title">"EcoPrompt"</h1>
                <p class="navbar-subtitle">"AI Sustainability Dashboard"</p>
            </div>
            <ul class="nav-list">
                {View::ALL
                    .into_iter()
                    .map(|item| {
                        let class = move || {
                            if ctx.session.with(|s| s.view()) == item {
                                "nav-link active"
                            } else {
                                "nav-link"
                            }
                        };
                        view! {
                            <li class="nav-item">
                                <button class=class on:click=move |_| ctx.navigate(item)>
                                    {item.label()}
                                </button>
                            </li>
                        }
                    })
                    .collect::<Vec<_>>()}
            </ul>
            <div class="navbar-user">
                <span class="navbar-email">{user_label}</span>
                <button class="btn btn-secondary" on:click=move |_| ctx.logout()>
                    "Log out"
                </button>
            </div>
        </nav>
    }
}
