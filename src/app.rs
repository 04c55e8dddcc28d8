use leptos::prelude::*;
use tracing::warn;

use crate::components::navbar::Navbar;
use crate::config::AppConfig;
use crate::pages::dashboard::DashboardPage;
use crate::pages::landing::LandingPage;
use crate::pages::login::LoginPage;
use crate::pages::prompt_optimizer::PromptOptimizerPage;
use crate::session::{AuthState, Session, User, View};
use crate::storage::LocalStorage;

/// Login state shared with every page.
#[derive(Clone, Copy)]
pub struct SessionContext {
    pub session: RwSignal<Session>,
    pub storage: LocalStorage,
}

impl SessionContext {
    pub fn user(&self) -> Option<User> {
        self.session.with(|s| s.user().cloned())
    }

    pub fn request_login(&self) {
        if let Some(Err(e)) = self.session.try_update(|s| s.request_login()) {
            warn!("{}", e);
        }
    }

    pub fn navigate(&self, view: View) {
        if let Some(Err(e)) = self.session.try_update(|s| s.navigate(view)) {
            warn!("{}", e);
        }
    }

    pub fn logout(&self) {
        let storage = self.storage;
        if let Some(Err(e)) = self.session.try_update(|s| s.logout(&storage)) {
            warn!("Logout failed, still signed in: {}", e);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Landing,
    Login,
    Main(View),
}

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    let storage = LocalStorage;
    let session = RwSignal::new(Session::restore(&storage));
    provide_context(SessionContext { session, storage });
    provide_context(config);

    // Pages only remount when the screen itself changes.
    let screen = Memo::new(move |_| {
        session.with(|s| match s.auth() {
            AuthState::Anonymous => Screen::Landing,
            AuthState::LoginPrompted => Screen::Login,
            AuthState::Authenticated(_) => Screen::Main(s.view()),
        })
    });

    move || match screen.get() {
        Screen::Landing => view! { <LandingPage /> }.into_any(),
        Screen::Login => view! { <LoginPage /> }.into_any(),
        Screen::Main(current) => view! {
            <div class="app-layout">
                <Navbar />
                <main class="content">{page(current)}</main>
            </div>
        }
        .into_any(),
    }
}

fn page(current: View) -> AnyView {
    match current {
        View::Dashboard => view! { <DashboardPage /> }.into_any(),
        View::Optimizer => view! { <PromptOptimizerPage /> }.into_any(),
    }
}
