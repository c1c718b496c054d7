use shared::{Asset, Location, Teacher};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::api::ApiClient;
use crate::services::logging::Logger;

const COMPONENT: &str = "catalogs-hook";

/// Catalog data backing the pickers of the loan form and the scope selectors.
#[derive(Clone, PartialEq, Default)]
pub struct CatalogsState {
    pub teachers: Vec<Teacher>,
    pub locations: Vec<Location>,
    pub assets: Vec<Asset>,
    pub loading: bool,
    pub error: Option<String>,
}

pub struct UseCatalogsResult {
    pub state: CatalogsState,
    pub actions: UseCatalogsActions,
}

#[derive(Clone, PartialEq)]
pub struct UseCatalogsActions {
    pub reload: Callback<()>,
}

/// Loads the three catalogs once on mount. The catalogs load independently:
/// one failing endpoint leaves the other pickers usable.
#[hook]
pub fn use_catalogs(api_client: &ApiClient) -> UseCatalogsResult {
    let teachers = use_state(Vec::<Teacher>::new);
    let locations = use_state(Vec::<Location>::new);
    let assets = use_state(Vec::<Asset>::new);
    let loading = use_state(|| false);
    let error = use_state(|| Option::<String>::None);

    let reload = {
        let api_client = api_client.clone();
        let teachers = teachers.clone();
        let locations = locations.clone();
        let assets = assets.clone();
        let loading = loading.clone();
        let error = error.clone();

        use_callback((), move |_, _| {
            let api_client = api_client.clone();
            let teachers = teachers.clone();
            let locations = locations.clone();
            let assets = assets.clone();
            let loading = loading.clone();
            let error = error.clone();

            spawn_local(async move {
                loading.set(true);
                error.set(None);

                match api_client.list_teachers().await {
                    Ok(fetched) => teachers.set(fetched),
                    Err(e) => {
                        Logger::warn_with_component(COMPONENT, "no se pudieron cargar los docentes");
                        error.set(Some(e.to_string()));
                    }
                }

                match api_client.list_locations().await {
                    Ok(fetched) => locations.set(fetched),
                    Err(e) => {
                        Logger::warn_with_component(
                            COMPONENT,
                            "no se pudieron cargar las ubicaciones",
                        );
                        error.set(Some(e.to_string()));
                    }
                }

                match api_client.list_assets().await {
                    Ok(fetched) => assets.set(fetched),
                    Err(e) => {
                        Logger::warn_with_component(COMPONENT, "no se pudieron cargar los activos");
                        error.set(Some(e.to_string()));
                    }
                }

                loading.set(false);
            });
        })
    };

    use_effect_with((), {
        let reload = reload.clone();
        move |_| {
            reload.emit(());
            || ()
        }
    });

    let state = CatalogsState {
        teachers: (*teachers).clone(),
        locations: (*locations).clone(),
        assets: (*assets).clone(),
        loading: *loading,
        error: (*error).clone(),
    };

    let actions = UseCatalogsActions { reload };

    UseCatalogsResult { state, actions }
}
