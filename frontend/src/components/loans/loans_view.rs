use gloo::timers::future::TimeoutFuture;
use shared::{Asset, Loan, LoanStatus, SessionUser};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlSelectElement;
use yew::prelude::*;

use crate::components::forms::CreateLoanForm;
use crate::components::loans::LoanTable;
use crate::components::LoanStatusModal;
use crate::hooks::use_catalogs::use_catalogs;
use crate::hooks::use_loans::use_loans;
use crate::services::api::ApiClient;

/// Which slice of the loan collection the view is showing. The `None`
/// variants mean the tab is open but no target has been picked yet, so no
/// fetch is issued.
#[derive(Clone, PartialEq)]
enum LoanScope {
    All,
    Mine,
    Location(Option<i64>),
    Asset(Option<i64>),
    Status(String),
}

#[derive(Properties, PartialEq)]
pub struct LoansViewProps {
    pub user: SessionUser,
}

#[function_component(LoansView)]
pub fn loans_view(props: &LoansViewProps) -> Html {
    let api_client = ApiClient::new();
    let loans = use_loans(&api_client);
    let catalogs = use_catalogs(&api_client);

    let scope = use_state(|| LoanScope::All);
    let status_modal_loan = use_state(|| Option::<Loan>::None);
    let form_asset = use_state(|| Option::<Asset>::None);
    let picker_asset_value = use_state(String::new);
    let success_message = use_state(|| Option::<String>::None);

    // Fetch whenever the scope lands on a concrete target.
    use_effect_with((*scope).clone(), {
        let actions = loans.actions.clone();
        let user_id = props.user.id;
        move |scope: &LoanScope| {
            match scope {
                LoanScope::All => actions.fetch_all.emit(()),
                LoanScope::Mine => actions.fetch_by_user.emit(user_id),
                LoanScope::Location(Some(id)) => actions.fetch_by_location.emit(*id),
                LoanScope::Asset(Some(id)) => actions.fetch_by_asset.emit(*id),
                LoanScope::Status(status) => actions.fetch_by_status.emit(status.clone()),
                LoanScope::Location(None) | LoanScope::Asset(None) => {}
            }
            || ()
        }
    });

    let set_scope = |next: LoanScope| {
        let scope = scope.clone();
        Callback::from(move |_: MouseEvent| {
            scope.set(next.clone());
        })
    };

    let on_scope_location_change = {
        let scope = scope.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            scope.set(LoanScope::Location(select.value().parse::<i64>().ok()));
        })
    };

    let on_scope_asset_change = {
        let scope = scope.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            scope.set(LoanScope::Asset(select.value().parse::<i64>().ok()));
        })
    };

    let on_scope_status_change = {
        let scope = scope.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            scope.set(LoanScope::Status(select.value()));
        })
    };

    let on_picker_change = {
        let picker_asset_value = picker_asset_value.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            picker_asset_value.set(select.value());
        })
    };

    let on_open_form = {
        let picker_asset_value = picker_asset_value.clone();
        let form_asset = form_asset.clone();
        let assets = catalogs.state.assets.clone();
        Callback::from(move |_: MouseEvent| {
            if let Ok(id) = picker_asset_value.parse::<i64>() {
                if let Some(asset) = assets.iter().find(|asset| asset.id == id) {
                    form_asset.set(Some(asset.clone()));
                }
            }
        })
    };

    let on_open_status = {
        let status_modal_loan = status_modal_loan.clone();
        Callback::from(move |loan: Loan| {
            status_modal_loan.set(Some(loan));
        })
    };

    let on_modal_close = {
        let status_modal_loan = status_modal_loan.clone();
        Callback::from(move |_: ()| {
            status_modal_loan.set(None);
        })
    };

    let on_form_close = {
        let form_asset = form_asset.clone();
        Callback::from(move |_: ()| {
            form_asset.set(None);
        })
    };

    let on_form_success = {
        let form_asset = form_asset.clone();
        let picker_asset_value = picker_asset_value.clone();
        let success_message = success_message.clone();
        Callback::from(move |_: ()| {
            form_asset.set(None);
            picker_asset_value.set(String::new());
            success_message.set(Some("Préstamo registrado correctamente".to_string()));

            // Clear the confirmation after a few seconds.
            let success_message = success_message.clone();
            spawn_local(async move {
                TimeoutFuture::new(3000).await;
                success_message.set(None);
            });
        })
    };

    let is_all = matches!(&*scope, LoanScope::All);
    let is_mine = matches!(&*scope, LoanScope::Mine);
    let is_location = matches!(&*scope, LoanScope::Location(_));
    let is_asset = matches!(&*scope, LoanScope::Asset(_));
    let is_status = matches!(&*scope, LoanScope::Status(_));

    let tab_class = |active: bool| if active { "tab active" } else { "tab" };

    let selected_location_id = match &*scope {
        LoanScope::Location(Some(id)) => Some(*id),
        _ => None,
    };
    let selected_asset_id = match &*scope {
        LoanScope::Asset(Some(id)) => Some(*id),
        _ => None,
    };
    let selected_status = match &*scope {
        LoanScope::Status(status) => Some(status.clone()),
        _ => None,
    };

    html! {
        <div class="loans-view">
            <div class="loans-toolbar">
                <div class="scope-tabs">
                    <button
                        type="button"
                        class={tab_class(is_all)}
                        onclick={set_scope(LoanScope::All)}
                    >
                        {"Todos"}
                    </button>
                    <button
                        type="button"
                        class={tab_class(is_mine)}
                        onclick={set_scope(LoanScope::Mine)}
                    >
                        {"Mis préstamos"}
                    </button>
                    <button
                        type="button"
                        class={tab_class(is_location)}
                        onclick={set_scope(LoanScope::Location(None))}
                    >
                        {"Por ubicación"}
                    </button>
                    <button
                        type="button"
                        class={tab_class(is_asset)}
                        onclick={set_scope(LoanScope::Asset(None))}
                    >
                        {"Por activo"}
                    </button>
                    <button
                        type="button"
                        class={tab_class(is_status)}
                        onclick={set_scope(LoanScope::Status(
                            LoanStatus::Active.as_str().to_string(),
                        ))}
                    >
                        {"Por estado"}
                    </button>
                </div>

                {if is_location {
                    html! {
                        <select class="scope-select" onchange={on_scope_location_change}>
                            <option value="" selected={selected_location_id.is_none()}>
                                {"Seleccione una ubicación"}
                            </option>
                            {for catalogs.state.locations.iter().map(|location| {
                                html! {
                                    <option
                                        value={location.id.to_string()}
                                        selected={selected_location_id == Some(location.id)}
                                    >
                                        {&location.name}
                                    </option>
                                }
                            })}
                        </select>
                    }
                } else if is_asset {
                    html! {
                        <select class="scope-select" onchange={on_scope_asset_change}>
                            <option value="" selected={selected_asset_id.is_none()}>
                                {"Seleccione un activo"}
                            </option>
                            {for catalogs.state.assets.iter().map(|asset| {
                                html! {
                                    <option
                                        value={asset.id.to_string()}
                                        selected={selected_asset_id == Some(asset.id)}
                                    >
                                        {format!("{} ({})", asset.name, asset.plate)}
                                    </option>
                                }
                            })}
                        </select>
                    }
                } else if is_status {
                    html! {
                        <select class="scope-select" onchange={on_scope_status_change}>
                            {for LoanStatus::ALL.iter().map(|status| {
                                let value = status.as_str();
                                html! {
                                    <option
                                        value={value}
                                        selected={selected_status.as_deref() == Some(value)}
                                    >
                                        {value}
                                    </option>
                                }
                            })}
                        </select>
                    }
                } else {
                    html! {}
                }}

                <div class="create-loan-picker">
                    <select class="scope-select" onchange={on_picker_change}>
                        <option value="" selected={picker_asset_value.is_empty()}>
                            {"Seleccione un activo"}
                        </option>
                        {for catalogs.state.assets.iter().map(|asset| {
                            let id = asset.id.to_string();
                            html! {
                                <option
                                    value={id.clone()}
                                    selected={*picker_asset_value == id}
                                >
                                    {format!("{} ({})", asset.name, asset.plate)}
                                </option>
                            }
                        })}
                    </select>
                    <button
                        type="button"
                        class="btn btn-primary"
                        onclick={on_open_form}
                        disabled={picker_asset_value.is_empty()}
                    >
                        {"Registrar préstamo"}
                    </button>
                </div>
            </div>

            {if let Some(error) = catalogs.state.error.clone() {
                html! { <div class="table-error">{error}</div> }
            } else {
                html! {}
            }}

            {if let Some(message) = (*success_message).clone() {
                html! { <div class="success-message">{message}</div> }
            } else {
                html! {}
            }}

            <LoanTable
                loans={loans.state.loans.clone()}
                loading={loans.state.loading}
                saving={loans.state.saving}
                error={loans.state.error.clone()}
                save_error={loans.state.save_error.clone()}
                on_open_status={on_open_status}
                on_delete={loans.actions.delete.clone()}
            />

            {if let Some(loan) = (*status_modal_loan).clone() {
                html! {
                    <LoanStatusModal
                        loan={loan}
                        on_update={loans.actions.update_status.clone()}
                        on_close={on_modal_close}
                    />
                }
            } else {
                html! {}
            }}

            {if let Some(asset) = (*form_asset).clone() {
                html! {
                    <CreateLoanForm
                        asset={asset}
                        session_user={Some(props.user.clone())}
                        teachers={catalogs.state.teachers.clone()}
                        locations={catalogs.state.locations.clone()}
                        on_create={loans.actions.create.clone()}
                        on_success={on_form_success}
                        on_close={on_form_close}
                    />
                }
            } else {
                html! {}
            }}
        </div>
    }
}
