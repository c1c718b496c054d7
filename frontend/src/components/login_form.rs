use shared::{LoginRequest, LoginResponse};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::services::api::ApiClient;

#[derive(Properties, PartialEq)]
pub struct LoginFormProps {
    pub on_login: Callback<LoginResponse>,
}

#[function_component(LoginForm)]
pub fn login_form(props: &LoginFormProps) -> Html {
    let email = use_state(String::new);
    let password = use_state(String::new);
    let is_submitting = use_state(|| false);
    let error_message = use_state(|| Option::<String>::None);
    let api_client = ApiClient::new();

    let on_email_change = {
        let email = email.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            email.set(input.value());
        })
    };

    let on_password_change = {
        let password = password.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            password.set(input.value());
        })
    };

    let on_submit = {
        let email = email.clone();
        let password = password.clone();
        let is_submitting = is_submitting.clone();
        let error_message = error_message.clone();
        let on_login = props.on_login.clone();
        let api_client = api_client.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let email_value = (*email).trim().to_string();
            let password_value = (*password).clone();

            if email_value.is_empty() {
                error_message.set(Some("Ingrese el correo electrónico".to_string()));
                return;
            }

            if password_value.is_empty() {
                error_message.set(Some("Ingrese la contraseña".to_string()));
                return;
            }

            is_submitting.set(true);
            error_message.set(None);

            let is_submitting = is_submitting.clone();
            let error_message = error_message.clone();
            let on_login = on_login.clone();
            let api_client = api_client.clone();

            spawn_local(async move {
                let request = LoginRequest {
                    email: email_value,
                    password: password_value,
                };

                match api_client.login(request).await {
                    Ok(response) => {
                        is_submitting.set(false);
                        on_login.emit(response);
                    }
                    Err(e) => {
                        is_submitting.set(false);
                        error_message.set(Some(e.to_string()));
                    }
                }
            });
        })
    };

    html! {
        <div class="login-page">
            <div class="login-card">
                <h2 class="login-title">{"Iniciar sesión"}</h2>

                {if let Some(error) = (*error_message).clone() {
                    html! {
                        <div class="form-error">
                            {error}
                        </div>
                    }
                } else {
                    html! {}
                }}

                <form class="login-form" onsubmit={on_submit}>
                    <div class="form-group">
                        <label for="login-email">{"Correo electrónico"}</label>
                        <input
                            id="login-email"
                            type="email"
                            class="form-input"
                            placeholder="correo@institucion.edu"
                            value={(*email).clone()}
                            onchange={on_email_change}
                            disabled={*is_submitting}
                            autofocus=true
                        />
                    </div>

                    <div class="form-group">
                        <label for="login-password">{"Contraseña"}</label>
                        <input
                            id="login-password"
                            type="password"
                            class="form-input"
                            value={(*password).clone()}
                            onchange={on_password_change}
                            disabled={*is_submitting}
                        />
                    </div>

                    <button type="submit" class="btn btn-primary" disabled={*is_submitting}>
                        {if *is_submitting {
                            "Ingresando..."
                        } else {
                            "Ingresar"
                        }}
                    </button>
                </form>
            </div>
        </div>
    }
}
