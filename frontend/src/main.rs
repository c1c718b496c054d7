use yew::prelude::*;

mod components;
mod hooks;
mod services;

use components::loans::LoansView;
use components::{Header, LoginForm};
use hooks::use_session::use_session;

#[function_component(App)]
fn app() -> Html {
    let session = use_session();

    match session.state.user.clone() {
        Some(user) => html! {
            <div class="app">
                <Header user={user.clone()} on_logout={session.actions.logout.clone()} />
                <main class="main-content">
                    <LoansView user={user} />
                </main>
            </div>
        },
        None => html! {
            <LoginForm on_login={session.actions.login.clone()} />
        },
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}
