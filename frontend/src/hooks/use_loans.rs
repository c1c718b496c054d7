use shared::{Loan, LoanDraft};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::api::{ApiClient, ApiError};
use crate::services::logging::Logger;

const COMPONENT: &str = "loans-hook";

/// State owned by the loan controller hook.
///
/// `loading`/`error` track the fetch operations that replace the whole
/// collection; `saving`/`save_error` track the record-level mutations, so a
/// failed status change does not blank out the table.
#[derive(Clone, PartialEq)]
pub struct LoansState {
    pub loans: Vec<Loan>,
    pub loading: bool,
    pub error: Option<String>,
    pub saving: bool,
    pub save_error: Option<String>,
}

/// Request to register a new loan. `on_done` fires after the collection has
/// been reconciled, with the error message on failure.
pub struct CreateLoanPayload {
    pub draft: LoanDraft,
    pub on_done: Callback<Result<(), String>>,
}

/// Request to move an existing loan to another status.
pub struct UpdateLoanStatusPayload {
    pub id: i64,
    pub status: String,
    pub on_done: Callback<Result<(), String>>,
}

pub struct UseLoansResult {
    pub state: LoansState,
    pub actions: UseLoansActions,
}

#[derive(Clone, PartialEq)]
pub struct UseLoansActions {
    pub fetch_all: Callback<()>,
    pub fetch_by_user: Callback<i64>,
    pub fetch_by_location: Callback<i64>,
    pub fetch_by_asset: Callback<i64>,
    pub fetch_by_status: Callback<String>,
    pub create: Callback<CreateLoanPayload>,
    pub update_status: Callback<UpdateLoanStatusPayload>,
    pub delete: Callback<i64>,
}

enum LoanQuery {
    All,
    ByUser(i64),
    ByLocation(i64),
    ByAsset(i64),
    ByStatus(String),
}

/// Run one fetch and reconcile its outcome. A fetched set always replaces
/// the previous collection wholesale; when two fetches overlap, whichever
/// response lands last wins, matching the lack of request cancellation.
async fn load(
    api_client: ApiClient,
    query: LoanQuery,
    loans: UseStateHandle<Vec<Loan>>,
    loading: UseStateHandle<bool>,
    error: UseStateHandle<Option<String>>,
) {
    loading.set(true);
    error.set(None);

    let result = match &query {
        LoanQuery::All => api_client.list_loans().await,
        LoanQuery::ByUser(id) => api_client.list_loans_by_user(*id).await,
        LoanQuery::ByLocation(id) => api_client.list_loans_by_location(*id).await,
        LoanQuery::ByAsset(id) => api_client.list_loans_by_asset(*id).await,
        LoanQuery::ByStatus(status) => api_client.list_loans_by_status(status).await,
    };

    match reconcile_fetch(&loans, result) {
        (fetched, None) => {
            Logger::debug_with_component(
                COMPONENT,
                &format!("{} préstamos recibidos", fetched.len()),
            );
            loans.set(fetched);
        }
        (_, Some(message)) => {
            error.set(Some(message));
        }
    }

    loading.set(false);
}

/// Apply a fetch outcome to the previous collection: a successful response
/// replaces it wholesale (never merged), a failure leaves it untouched and
/// yields the user-facing message.
fn reconcile_fetch(
    previous: &[Loan],
    result: Result<Vec<Loan>, ApiError>,
) -> (Vec<Loan>, Option<String>) {
    match result {
        Ok(fetched) => (fetched, None),
        Err(e) => (previous.to_vec(), Some(e.to_string())),
    }
}

/// A record replaced in place keeps its position; an unknown id leaves the
/// collection untouched.
fn replace_by_id(loans: &[Loan], updated: &Loan) -> Vec<Loan> {
    loans
        .iter()
        .map(|loan| {
            if loan.id == updated.id {
                updated.clone()
            } else {
                loan.clone()
            }
        })
        .collect()
}

fn remove_by_id(loans: &[Loan], id: i64) -> Vec<Loan> {
    loans.iter().filter(|loan| loan.id != id).cloned().collect()
}

#[hook]
pub fn use_loans(api_client: &ApiClient) -> UseLoansResult {
    let loans = use_state(Vec::<Loan>::new);
    let loading = use_state(|| false);
    let error = use_state(|| Option::<String>::None);
    let saving = use_state(|| false);
    let save_error = use_state(|| Option::<String>::None);

    let fetch_all = {
        let api_client = api_client.clone();
        let loans = loans.clone();
        let loading = loading.clone();
        let error = error.clone();

        use_callback((), move |_, _| {
            let api_client = api_client.clone();
            let loans = loans.clone();
            let loading = loading.clone();
            let error = error.clone();

            spawn_local(async move {
                load(api_client, LoanQuery::All, loans, loading, error).await;
            });
        })
    };

    let fetch_by_user = {
        let api_client = api_client.clone();
        let loans = loans.clone();
        let loading = loading.clone();
        let error = error.clone();

        use_callback((), move |user_id: i64, _| {
            let api_client = api_client.clone();
            let loans = loans.clone();
            let loading = loading.clone();
            let error = error.clone();

            spawn_local(async move {
                load(api_client, LoanQuery::ByUser(user_id), loans, loading, error).await;
            });
        })
    };

    let fetch_by_location = {
        let api_client = api_client.clone();
        let loans = loans.clone();
        let loading = loading.clone();
        let error = error.clone();

        use_callback((), move |location_id: i64, _| {
            let api_client = api_client.clone();
            let loans = loans.clone();
            let loading = loading.clone();
            let error = error.clone();

            spawn_local(async move {
                load(
                    api_client,
                    LoanQuery::ByLocation(location_id),
                    loans,
                    loading,
                    error,
                )
                .await;
            });
        })
    };

    let fetch_by_asset = {
        let api_client = api_client.clone();
        let loans = loans.clone();
        let loading = loading.clone();
        let error = error.clone();

        use_callback((), move |asset_id: i64, _| {
            let api_client = api_client.clone();
            let loans = loans.clone();
            let loading = loading.clone();
            let error = error.clone();

            spawn_local(async move {
                load(api_client, LoanQuery::ByAsset(asset_id), loans, loading, error).await;
            });
        })
    };

    let fetch_by_status = {
        let api_client = api_client.clone();
        let loans = loans.clone();
        let loading = loading.clone();
        let error = error.clone();

        use_callback((), move |status: String, _| {
            let api_client = api_client.clone();
            let loans = loans.clone();
            let loading = loading.clone();
            let error = error.clone();

            spawn_local(async move {
                load(api_client, LoanQuery::ByStatus(status), loans, loading, error).await;
            });
        })
    };

    // The mutations read the current collection, so they depend on its value
    // and are rebuilt whenever it changes.
    let create = {
        let api_client = api_client.clone();
        let loans = loans.clone();
        let saving = saving.clone();
        let save_error = save_error.clone();

        use_callback((*loans).clone(), move |payload: CreateLoanPayload, _| {
            let api_client = api_client.clone();
            let loans = loans.clone();
            let saving = saving.clone();
            let save_error = save_error.clone();

            spawn_local(async move {
                saving.set(true);
                save_error.set(None);

                match api_client.create_loan(&payload.draft).await {
                    Ok(created) => {
                        Logger::info_with_component(
                            COMPONENT,
                            &format!("préstamo {} registrado", created.id),
                        );
                        let mut updated = (*loans).clone();
                        updated.push(created);
                        loans.set(updated);
                        saving.set(false);
                        payload.on_done.emit(Ok(()));
                    }
                    Err(e) => {
                        let message = e.to_string();
                        save_error.set(Some(message.clone()));
                        saving.set(false);
                        payload.on_done.emit(Err(message));
                    }
                }
            });
        })
    };

    let update_status = {
        let api_client = api_client.clone();
        let loans = loans.clone();
        let saving = saving.clone();
        let save_error = save_error.clone();

        use_callback(
            (*loans).clone(),
            move |payload: UpdateLoanStatusPayload, _| {
                let api_client = api_client.clone();
                let loans = loans.clone();
                let saving = saving.clone();
                let save_error = save_error.clone();

                spawn_local(async move {
                    saving.set(true);
                    save_error.set(None);

                    match api_client
                        .update_loan_status(payload.id, &payload.status)
                        .await
                    {
                        Ok(updated) => {
                            loans.set(replace_by_id(&loans, &updated));
                            saving.set(false);
                            payload.on_done.emit(Ok(()));
                        }
                        Err(e) => {
                            let message = e.to_string();
                            save_error.set(Some(message.clone()));
                            saving.set(false);
                            payload.on_done.emit(Err(message));
                        }
                    }
                });
            },
        )
    };

    let delete = {
        let api_client = api_client.clone();
        let loans = loans.clone();
        let saving = saving.clone();
        let save_error = save_error.clone();

        use_callback((*loans).clone(), move |id: i64, _| {
            let api_client = api_client.clone();
            let loans = loans.clone();
            let saving = saving.clone();
            let save_error = save_error.clone();

            spawn_local(async move {
                saving.set(true);
                save_error.set(None);

                match api_client.delete_loan(id).await {
                    Ok(()) => {
                        Logger::info_with_component(
                            COMPONENT,
                            &format!("préstamo {} eliminado", id),
                        );
                        loans.set(remove_by_id(&loans, id));
                        saving.set(false);
                    }
                    Err(e) => {
                        save_error.set(Some(e.to_string()));
                        saving.set(false);
                    }
                }
            });
        })
    };

    let state = LoansState {
        loans: (*loans).clone(),
        loading: *loading,
        error: (*error).clone(),
        saving: *saving,
        save_error: (*save_error).clone(),
    };

    let actions = UseLoansActions {
        fetch_all,
        fetch_by_user,
        fetch_by_location,
        fetch_by_asset,
        fetch_by_status,
        create,
        update_status,
        delete,
    };

    UseLoansResult { state, actions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn make_loan(id: i64, status: &str) -> Loan {
        Loan {
            id,
            asset_id: id * 10,
            lender_id: 1,
            borrower_id: 2,
            to_location_id: 3,
            from_location_id: 4,
            loan_date: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            return_date: None,
            status: status.to_string(),
            asset: None,
            lender: None,
            borrower: None,
            to_location: None,
            from_location: None,
        }
    }

    #[test]
    fn test_replace_by_id_keeps_position_and_order() {
        let loans = vec![
            make_loan(1, "En préstamo"),
            make_loan(2, "En préstamo"),
            make_loan(3, "En préstamo"),
        ];
        let updated = make_loan(2, "Devuelto");

        let result = replace_by_id(&loans, &updated);
        let ids: Vec<i64> = result.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(result[1].status, "Devuelto");
        assert_eq!(result[0].status, "En préstamo");
    }

    #[test]
    fn test_replace_by_id_unknown_id_changes_nothing() {
        let loans = vec![make_loan(1, "En préstamo"), make_loan(2, "En préstamo")];
        let result = replace_by_id(&loans, &make_loan(99, "Devuelto"));
        assert_eq!(result, loans);
    }

    #[test]
    fn test_remove_by_id_drops_exactly_one() {
        let loans = vec![
            make_loan(1, "En préstamo"),
            make_loan(2, "Devuelto"),
            make_loan(3, "En préstamo"),
        ];
        let result = remove_by_id(&loans, 2);
        let ids: Vec<i64> = result.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_remove_by_id_unknown_id_is_noop() {
        let loans = vec![make_loan(1, "En préstamo")];
        assert_eq!(remove_by_id(&loans, 99), loans);
    }

    #[test]
    fn test_fetched_set_supersedes_previous_view() {
        let by_user = vec![make_loan(1, "En préstamo"), make_loan(2, "Devuelto")];
        let by_location = vec![make_loan(5, "En préstamo")];

        // A later fetch replaces the collection wholesale, never merges.
        let (visible, failure) = reconcile_fetch(&by_user, Ok(by_location.clone()));
        assert_eq!(visible, by_location);
        assert!(failure.is_none());
    }

    #[test]
    fn test_failed_fetch_leaves_collection_untouched() {
        let visible = vec![make_loan(1, "En préstamo"), make_loan(2, "Devuelto")];

        let (after, failure) = reconcile_fetch(
            &visible,
            Err(ApiError::Network("connection refused".to_string())),
        );
        assert_eq!(after, visible);
        assert!(failure.is_some());
    }

    #[test]
    fn test_create_update_delete_scenario() {
        // Mirrors a full record lifecycle against the in-memory collection.
        let mut loans = vec![make_loan(1, "Devuelto"), make_loan(2, "En préstamo")];

        // Created records go to the end, never re-sorted here.
        let created = make_loan(7, "En préstamo");
        loans.push(created.clone());
        assert_eq!(loans.last().map(|l| l.id), Some(7));
        assert_eq!(loans.len(), 3);

        // Status change keeps id and position.
        let mut returned = created;
        returned.status = "Devuelto".to_string();
        loans = replace_by_id(&loans, &returned);
        assert_eq!(loans[2].id, 7);
        assert_eq!(loans[2].status, "Devuelto");
        assert_eq!(loans.len(), 3);

        // Deletion shrinks the collection by exactly one.
        loans = remove_by_id(&loans, 7);
        assert_eq!(loans.len(), 2);
        assert!(loans.iter().all(|l| l.id != 7));
    }
}
