use shared::SessionUser;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct HeaderProps {
    pub user: SessionUser,
    pub on_logout: Callback<()>,
}

#[function_component(Header)]
pub fn header(props: &HeaderProps) -> Html {
    let on_logout_click = {
        let on_logout = props.on_logout.clone();
        Callback::from(move |_: MouseEvent| {
            on_logout.emit(());
        })
    };

    html! {
        <header class="header">
            <div class="container">
                <h1>{"Préstamo de Activos"}</h1>
                <div class="header-right">
                    <span class="header-user">{props.user.display_name()}</span>
                    <button type="button" class="btn btn-secondary" onclick={on_logout_click}>
                        {"Cerrar sesión"}
                    </button>
                </div>
            </div>
        </header>
    }
}
