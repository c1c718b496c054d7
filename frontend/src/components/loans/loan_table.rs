use shared::{Loan, LoanStatus};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::services::date_utils::{format_date, format_optional_date};
use crate::services::report::{
    derive_view, parse_page_jump, LoanFilters, ReportQuery, SortOrder, PAGE_SIZES,
};

#[derive(Properties, PartialEq)]
pub struct LoanTableProps {
    /// Full collection as fetched; filtering and paging happen here.
    pub loans: Vec<Loan>,
    pub loading: bool,
    /// True while a create/update/delete is in flight; row actions are
    /// disabled so a second mutation cannot start mid-request.
    pub saving: bool,
    pub error: Option<String>,
    pub save_error: Option<String>,
    pub on_open_status: Callback<Loan>,
    pub on_delete: Callback<i64>,
}

fn status_class(status: &str) -> &'static str {
    match LoanStatus::parse(status) {
        Some(LoanStatus::Active) => "status-badge status-active",
        Some(LoanStatus::Returned) => "status-badge status-returned",
        Some(LoanStatus::NotReturned) => "status-badge status-overdue",
        None => "status-badge",
    }
}

/// Loan report table: filter inputs, id-sorted rows, windowed pager.
///
/// The visible page is recomputed from the props and the local query on
/// every render; there is no cached derived state to invalidate.
#[function_component(LoanTable)]
pub fn loan_table(props: &LoanTableProps) -> Html {
    let query = use_state(ReportQuery::default);
    let jump_input = use_state(String::new);

    let view = derive_view(&props.loans, &query);

    let on_asset_name_input = {
        let query = query.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let filters = LoanFilters {
                asset_name: input.value(),
                ..query.filters.clone()
            };
            query.set(query.with_filters(filters));
        })
    };

    let on_person_name_input = {
        let query = query.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let filters = LoanFilters {
                person_name: input.value(),
                ..query.filters.clone()
            };
            query.set(query.with_filters(filters));
        })
    };

    let on_plate_input = {
        let query = query.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let filters = LoanFilters {
                plate: input.value(),
                ..query.filters.clone()
            };
            query.set(query.with_filters(filters));
        })
    };

    let on_location_input = {
        let query = query.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let filters = LoanFilters {
                location: input.value(),
                ..query.filters.clone()
            };
            query.set(query.with_filters(filters));
        })
    };

    let on_sort_toggle = {
        let query = query.clone();
        Callback::from(move |_: MouseEvent| {
            query.set(query.with_sort(query.sort.toggled()));
        })
    };

    let on_prev_page = {
        let query = query.clone();
        Callback::from(move |_: MouseEvent| {
            if query.page > 1 {
                query.set(query.with_page(query.page - 1));
            }
        })
    };

    let on_next_page = {
        let query = query.clone();
        let total_pages = view.total_pages;
        Callback::from(move |_: MouseEvent| {
            if query.page < total_pages {
                query.set(query.with_page(query.page + 1));
            }
        })
    };

    let on_per_page_change = {
        let query = query.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            if let Ok(per_page) = select.value().parse::<usize>() {
                query.set(query.with_per_page(per_page));
            }
        })
    };

    let on_jump_input = {
        let jump_input = jump_input.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            jump_input.set(input.value());
        })
    };

    // Out-of-range entries change nothing; the input is cleared either way.
    let on_jump_submit = {
        let query = query.clone();
        let jump_input = jump_input.clone();
        let total_pages = view.total_pages;
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if let Some(page) = parse_page_jump(jump_input.as_str(), total_pages) {
                query.set(query.with_page(page));
            }
            jump_input.set(String::new());
        })
    };

    let sort_indicator = match query.sort {
        SortOrder::Ascending => " ▲",
        SortOrder::Descending => " ▼",
    };

    html! {
        <section class="loans-section">
            <div class="loan-filters">
                <input
                    type="text"
                    class="filter-input"
                    placeholder="Buscar por activo"
                    value={query.filters.asset_name.clone()}
                    oninput={on_asset_name_input}
                />
                <input
                    type="text"
                    class="filter-input"
                    placeholder="Buscar por persona"
                    value={query.filters.person_name.clone()}
                    oninput={on_person_name_input}
                />
                <input
                    type="text"
                    class="filter-input"
                    placeholder="Buscar por placa"
                    value={query.filters.plate.clone()}
                    oninput={on_plate_input}
                />
                <input
                    type="text"
                    class="filter-input"
                    placeholder="Buscar por ubicación"
                    value={query.filters.location.clone()}
                    oninput={on_location_input}
                />
            </div>

            {if let Some(error) = props.error.clone() {
                html! { <div class="table-error">{error}</div> }
            } else {
                html! {}
            }}

            {if let Some(error) = props.save_error.clone() {
                html! { <div class="table-error">{error}</div> }
            } else {
                html! {}
            }}

            {if props.loading {
                html! { <div class="loading">{"Cargando préstamos..."}</div> }
            } else {
                html! {
                    <div class="table-container">
                        <table class="loans-table">
                            <thead>
                                <tr>
                                    <th class="sortable" onclick={on_sort_toggle}>
                                        {"ID"}{sort_indicator}
                                    </th>
                                    <th>{"Activo"}</th>
                                    <th>{"Placa"}</th>
                                    <th>{"Prestado por"}</th>
                                    <th>{"Prestado a"}</th>
                                    <th>{"Destino"}</th>
                                    <th>{"Origen"}</th>
                                    <th>{"Fecha préstamo"}</th>
                                    <th>{"Fecha devolución"}</th>
                                    <th>{"Estado"}</th>
                                    <th>{"Acciones"}</th>
                                </tr>
                            </thead>
                            <tbody>
                                {if view.rows.is_empty() {
                                    html! {
                                        <tr>
                                            <td class="empty-row" colspan="11">
                                                {"No hay préstamos para mostrar"}
                                            </td>
                                        </tr>
                                    }
                                } else {
                                    html! {
                                        <>
                                        {for view.rows.iter().map(|loan| {
                                            let on_status_click = {
                                                let on_open_status = props.on_open_status.clone();
                                                let loan = loan.clone();
                                                Callback::from(move |_: MouseEvent| {
                                                    on_open_status.emit(loan.clone());
                                                })
                                            };
                                            let on_delete_click = {
                                                let on_delete = props.on_delete.clone();
                                                let id = loan.id;
                                                Callback::from(move |_: MouseEvent| {
                                                    on_delete.emit(id);
                                                })
                                            };

                                            html! {
                                                <tr key={loan.id}>
                                                    <td>{loan.id}</td>
                                                    <td>{loan.asset_name().unwrap_or("—")}</td>
                                                    <td>{loan.asset.as_ref().map(|a| a.plate.as_str()).unwrap_or("—")}</td>
                                                    <td>{loan.lender.as_ref().map(|u| u.display_name()).unwrap_or_else(|| "—".to_string())}</td>
                                                    <td>{loan.borrower.as_ref().map(|u| u.display_name()).unwrap_or_else(|| "—".to_string())}</td>
                                                    <td>{loan.to_location.as_ref().map(|l| l.name.as_str()).unwrap_or("—")}</td>
                                                    <td>{loan.from_location.as_ref().map(|l| l.name.as_str()).unwrap_or("—")}</td>
                                                    <td>{format_date(&loan.loan_date)}</td>
                                                    <td>{format_optional_date(loan.effective_return_date().as_ref())}</td>
                                                    <td>
                                                        <span class={status_class(&loan.status)}>
                                                            {&loan.status}
                                                        </span>
                                                    </td>
                                                    <td class="row-actions">
                                                        <button
                                                            type="button"
                                                            class="btn btn-small"
                                                            onclick={on_status_click}
                                                            disabled={props.saving}
                                                        >
                                                            {"Estado"}
                                                        </button>
                                                        <button
                                                            type="button"
                                                            class="btn btn-small btn-danger"
                                                            onclick={on_delete_click}
                                                            disabled={props.saving}
                                                        >
                                                            {"Eliminar"}
                                                        </button>
                                                    </td>
                                                </tr>
                                            }
                                        })}
                                        </>
                                    }
                                }}
                            </tbody>
                        </table>
                    </div>
                }
            }}

            <div class="pagination">
                <span class="pagination-summary">
                    {format!("Mostrando {} de {} préstamos", view.rows.len(), view.filtered_count)}
                </span>

                <div class="pagination-pages">
                    <button
                        type="button"
                        class="pagination-btn"
                        onclick={on_prev_page}
                        disabled={query.page <= 1}
                    >
                        {"Anterior"}
                    </button>

                    {for view.page_window.iter().map(|&page| {
                        let query = query.clone();
                        let is_current = page == query.page;
                        let onclick = Callback::from(move |_: MouseEvent| {
                            query.set(query.with_page(page));
                        });
                        html! {
                            <button
                                type="button"
                                class={if is_current { "pagination-btn current" } else { "pagination-btn" }}
                                onclick={onclick}
                                disabled={is_current}
                            >
                                {page}
                            </button>
                        }
                    })}

                    <button
                        type="button"
                        class="pagination-btn"
                        onclick={on_next_page}
                        disabled={query.page >= view.total_pages}
                    >
                        {"Siguiente"}
                    </button>
                </div>

                <select class="page-size-select" onchange={on_per_page_change}>
                    {for PAGE_SIZES.iter().map(|&size| {
                        html! {
                            <option
                                value={size.to_string()}
                                selected={query.per_page == size}
                            >
                                {format!("{} por página", size)}
                            </option>
                        }
                    })}
                </select>

                <form class="page-jump" onsubmit={on_jump_submit}>
                    <input
                        type="text"
                        class="page-jump-input"
                        placeholder="Ir a página"
                        value={(*jump_input).clone()}
                        oninput={on_jump_input}
                    />
                    <button type="submit" class="pagination-btn">{"Ir"}</button>
                </form>
            </div>
        </section>
    }
}
