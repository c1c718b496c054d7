use chrono::Utc;
use shared::{
    validate_loan_form, Asset, LoanDraft, LoanFormInput, LoanStatus, Location, SessionUser, Teacher,
};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::hooks::use_loans::CreateLoanPayload;
use crate::services::date_utils::{current_date_input_value, parse_date_input};

#[derive(Properties, PartialEq)]
pub struct CreateLoanFormProps {
    /// Asset chosen before the form opened.
    pub asset: Asset,
    /// Authenticated user, recorded as the lender.
    pub session_user: Option<SessionUser>,
    pub teachers: Vec<Teacher>,
    pub locations: Vec<Location>,
    pub on_create: Callback<CreateLoanPayload>,
    pub on_success: Callback<()>,
    pub on_close: Callback<()>,
}

/// Loan registration form. The source location is captured from the asset
/// when the form opens and is not re-checked at submit time.
#[function_component(CreateLoanForm)]
pub fn create_loan_form(props: &CreateLoanFormProps) -> Html {
    let borrower_value = use_state(String::new);
    let location_value = use_state(String::new);
    // The date input opens pre-filled with today so the field is never blank.
    let return_date = use_state(current_date_input_value);
    let from_location_id = use_state(|| props.asset.location_id);
    let is_submitting = use_state(|| false);
    let error_message = use_state(|| Option::<String>::None);

    // Blank the form when it is reopened for another asset.
    use_effect_with(props.asset.id, {
        let borrower_value = borrower_value.clone();
        let location_value = location_value.clone();
        let return_date = return_date.clone();
        let from_location_id = from_location_id.clone();
        let is_submitting = is_submitting.clone();
        let error_message = error_message.clone();
        let asset_location_id = props.asset.location_id;
        move |_| {
            borrower_value.set(String::new());
            location_value.set(String::new());
            return_date.set(current_date_input_value());
            from_location_id.set(asset_location_id);
            is_submitting.set(false);
            error_message.set(None);
            || ()
        }
    });

    let on_borrower_change = {
        let borrower_value = borrower_value.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            borrower_value.set(select.value());
        })
    };

    let on_location_change = {
        let location_value = location_value.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            location_value.set(select.value());
        })
    };

    let on_return_date_change = {
        let return_date = return_date.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            return_date.set(input.value());
        })
    };

    let on_submit = {
        let borrower_value = borrower_value.clone();
        let location_value = location_value.clone();
        let return_date = return_date.clone();
        let from_location_id = from_location_id.clone();
        let is_submitting = is_submitting.clone();
        let error_message = error_message.clone();
        let on_create = props.on_create.clone();
        let on_success = props.on_success.clone();
        let session_user_id = props.session_user.as_ref().map(|user| user.id);
        let asset_id = props.asset.id;

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let input = LoanFormInput {
                lender_id: session_user_id,
                borrower_id: (*borrower_value).parse::<i64>().ok(),
                to_location_id: (*location_value).parse::<i64>().ok(),
                return_date: (*return_date).clone(),
            };

            if let Err(validation) = validate_loan_form(&input) {
                error_message.set(Some(validation.to_string()));
                return;
            }

            let (Some(lender_id), Some(borrower_id), Some(to_location_id)) =
                (input.lender_id, input.borrower_id, input.to_location_id)
            else {
                return;
            };

            let Some(return_date_value) = parse_date_input(&input.return_date) else {
                error_message.set(Some("La fecha de devolución no es válida".to_string()));
                return;
            };

            is_submitting.set(true);
            error_message.set(None);

            let draft = LoanDraft {
                asset_id,
                lender_id,
                borrower_id,
                to_location_id,
                from_location_id: *from_location_id,
                loan_date: Utc::now(),
                return_date: Some(return_date_value),
                status: LoanStatus::Active.as_str().to_string(),
            };

            let on_done = {
                let is_submitting = is_submitting.clone();
                let error_message = error_message.clone();
                let on_success = on_success.clone();

                Callback::from(move |result: Result<(), String>| {
                    is_submitting.set(false);
                    match result {
                        Ok(()) => on_success.emit(()),
                        Err(message) => error_message.set(Some(message)),
                    }
                })
            };

            on_create.emit(CreateLoanPayload { draft, on_done });
        })
    };

    let on_backdrop_click = {
        let on_close = props.on_close.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            on_close.emit(());
        })
    };

    let on_modal_click = Callback::from(|e: MouseEvent| {
        e.stop_propagation();
    });

    let on_cancel = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| {
            on_close.emit(());
        })
    };

    let source_location = props
        .asset
        .location
        .as_ref()
        .map(|location| location.name.clone())
        .unwrap_or_else(|| format!("Ubicación #{}", props.asset.location_id));

    html! {
        <div class="modal-backdrop" onclick={on_backdrop_click}>
            <div class="modal" onclick={on_modal_click}>
                <div class="modal-content">
                    <h3 class="modal-title">{"Registrar préstamo"}</h3>

                    <div class="loan-form-asset">
                        <span class="loan-form-asset-name">{&props.asset.name}</span>
                        <span class="loan-form-asset-plate">
                            {format!("Placa: {}", props.asset.plate)}
                        </span>
                        <span class="loan-form-asset-location">
                            {format!("Ubicación actual: {}", source_location)}
                        </span>
                    </div>

                    {if let Some(error) = (*error_message).clone() {
                        html! {
                            <div class="form-error">
                                {error}
                            </div>
                        }
                    } else {
                        html! {}
                    }}

                    <form class="loan-form" onsubmit={on_submit}>
                        <div class="form-group">
                            <label for="loan-borrower">{"Docente"}</label>
                            <select
                                id="loan-borrower"
                                class="form-input"
                                onchange={on_borrower_change}
                                disabled={*is_submitting}
                            >
                                <option value="" selected={borrower_value.is_empty()}>
                                    {"Seleccione un docente"}
                                </option>
                                {for props.teachers.iter().map(|teacher| {
                                    let id = teacher.id.to_string();
                                    html! {
                                        <option
                                            value={id.clone()}
                                            selected={*borrower_value == id}
                                        >
                                            {teacher.display_name()}
                                        </option>
                                    }
                                })}
                            </select>
                        </div>

                        <div class="form-group">
                            <label for="loan-location">{"Ubicación de destino"}</label>
                            <select
                                id="loan-location"
                                class="form-input"
                                onchange={on_location_change}
                                disabled={*is_submitting}
                            >
                                <option value="" selected={location_value.is_empty()}>
                                    {"Seleccione una ubicación"}
                                </option>
                                {for props.locations.iter().map(|location| {
                                    let id = location.id.to_string();
                                    html! {
                                        <option
                                            value={id.clone()}
                                            selected={*location_value == id}
                                        >
                                            {&location.name}
                                        </option>
                                    }
                                })}
                            </select>
                        </div>

                        <div class="form-group">
                            <label for="loan-return-date">{"Fecha de devolución"}</label>
                            <input
                                id="loan-return-date"
                                type="date"
                                class="form-input"
                                value={(*return_date).clone()}
                                onchange={on_return_date_change}
                                disabled={*is_submitting}
                            />
                        </div>

                        <div class="modal-buttons">
                            <button type="submit" class="btn btn-primary" disabled={*is_submitting}>
                                {if *is_submitting {
                                    "Registrando..."
                                } else {
                                    "Registrar"
                                }}
                            </button>
                            <button
                                type="button"
                                class="btn btn-secondary"
                                onclick={on_cancel}
                                disabled={*is_submitting}
                            >
                                {"Cancelar"}
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}
