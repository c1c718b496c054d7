use shared::{Loan, LoanStatus};
use web_sys::HtmlSelectElement;
use yew::prelude::*;

use crate::hooks::use_loans::UpdateLoanStatusPayload;

#[derive(Properties, PartialEq)]
pub struct LoanStatusModalProps {
    /// Record being edited; its status at open time seeds the selector.
    pub loan: Loan,
    pub on_update: Callback<UpdateLoanStatusPayload>,
    pub on_close: Callback<()>,
}

/// Modal offering the three canonical statuses. Any status may be selected
/// from any other; nothing enforces a forward-only lifecycle.
#[function_component(LoanStatusModal)]
pub fn loan_status_modal(props: &LoanStatusModalProps) -> Html {
    let selected_status = use_state(|| props.loan.status.clone());
    let is_submitting = use_state(|| false);
    let error_message = use_state(|| Option::<String>::None);

    // Re-seed when the modal is reused for a different record.
    use_effect_with(props.loan.id, {
        let selected_status = selected_status.clone();
        let is_submitting = is_submitting.clone();
        let error_message = error_message.clone();
        let status = props.loan.status.clone();
        move |_| {
            selected_status.set(status);
            is_submitting.set(false);
            error_message.set(None);
            || ()
        }
    });

    let on_status_change = {
        let selected_status = selected_status.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            selected_status.set(select.value());
        })
    };

    let on_submit = {
        let selected_status = selected_status.clone();
        let is_submitting = is_submitting.clone();
        let error_message = error_message.clone();
        let on_update = props.on_update.clone();
        let on_close = props.on_close.clone();
        let loan_id = props.loan.id;

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            is_submitting.set(true);
            error_message.set(None);

            let on_done = {
                let is_submitting = is_submitting.clone();
                let error_message = error_message.clone();
                let on_close = on_close.clone();

                Callback::from(move |result: Result<(), String>| {
                    is_submitting.set(false);
                    match result {
                        Ok(()) => on_close.emit(()),
                        Err(message) => error_message.set(Some(message)),
                    }
                })
            };

            on_update.emit(UpdateLoanStatusPayload {
                id: loan_id,
                status: (*selected_status).clone(),
                on_done,
            });
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

    html! {
        <div class="modal-backdrop" onclick={on_backdrop_click}>
            <div class="modal" onclick={on_modal_click}>
                <div class="modal-content">
                    <h3 class="modal-title">
                        {format!("Estado del préstamo #{}", props.loan.id)}
                    </h3>
                    <p class="modal-subtitle">
                        {props.loan.asset_name().unwrap_or("Activo sin nombre")}
                    </p>

                    {if let Some(error) = (*error_message).clone() {
                        html! {
                            <div class="form-error">
                                {error}
                            </div>
                        }
                    } else {
                        html! {}
                    }}

                    <form class="status-form" onsubmit={on_submit}>
                        <div class="form-group">
                            <label for="loan-status">{"Estado"}</label>
                            <select
                                id="loan-status"
                                class="form-input"
                                onchange={on_status_change}
                                disabled={*is_submitting}
                            >
                                {for LoanStatus::ALL.iter().map(|status| {
                                    let value = status.as_str();
                                    html! {
                                        <option
                                            value={value}
                                            selected={*selected_status == value}
                                        >
                                            {value}
                                        </option>
                                    }
                                })}
                            </select>
                        </div>

                        <div class="modal-buttons">
                            <button type="submit" class="btn btn-primary" disabled={*is_submitting}>
                                {if *is_submitting {
                                    "Guardando..."
                                } else {
                                    "Guardar"
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
