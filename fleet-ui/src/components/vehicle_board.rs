use crate::alert::use_alert;
use crate::api;
use crate::app::POLL_INTERVAL;
use crate::config::ApiConfig;
use fleet_registry::{
    open_incidents_for, validate_new_vehicle, Incident, NewVehicle, Vehicle, VehicleType,
};
use leptos::*;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;

/// One card per vehicle with its open incidents, plus the create-vehicle
/// form. Owns its own polling loop and feeds every successful incident
/// fetch into the shared alert store.
#[component]
pub fn VehicleBoard(
    refresh_trigger: RwSignal<u32>,
    #[prop(into)] on_data_change: Callback<()>,
) -> impl IntoView {
    let config = expect_context::<ApiConfig>();
    let alert = use_alert();

    let vehicles = create_rw_signal(Vec::<Vehicle>::new());
    let incidents = create_rw_signal(Vec::<Incident>::new());
    let loading = create_rw_signal(true);
    let error = create_rw_signal(None::<String>);

    let show_create_form = create_rw_signal(false);
    let name = create_rw_signal(String::new());
    let kind = create_rw_signal(VehicleType::Bus);
    let creating = create_rw_signal(false);
    let form_error = create_rw_signal(None::<String>);

    let fetch_data = {
        let config = config.clone();
        let alert = alert.clone();
        let seq = Rc::new(api::FetchSeq::new());
        move || {
            let config = config.clone();
            let alert = alert.clone();
            let seq = Rc::clone(&seq);
            loading.set(true);
            spawn_local(async move {
                let ticket = seq.begin();
                let fetched = async {
                    let vehicles = api::fetch_vehicles(&config).await?;
                    let incidents = api::fetch_incidents(&config).await?;
                    Ok::<_, String>((vehicles, incidents))
                }
                .await;
                match fetched {
                    Ok((fetched_vehicles, fetched_incidents)) => {
                        if seq.try_commit(ticket) {
                            let open: Vec<Incident> = fetched_incidents
                                .iter()
                                .filter(|incident| incident.is_open())
                                .cloned()
                                .collect();
                            vehicles.set(fetched_vehicles);
                            incidents.set(fetched_incidents);
                            alert.update_alert_level(&open);
                            error.set(None);
                        }
                    }
                    Err(message) => {
                        // Keep the last good data on a background failure;
                        // only a first load with nothing to show errors out.
                        if vehicles.get_untracked().is_empty() {
                            error.set(Some(message));
                        } else {
                            crate::console_warn(&format!(
                                "vehicle refresh failed, keeping last data: {message}"
                            ));
                        }
                    }
                }
                loading.set(false);
            });
        }
    };

    create_effect({
        let fetch_data = fetch_data.clone();
        move |_| {
            let _ = refresh_trigger.get();
            fetch_data();
        }
    });
    if let Ok(handle) = set_interval_with_handle(fetch_data.clone(), POLL_INTERVAL) {
        on_cleanup(move || handle.clear());
    }

    let refetch = Callback::new({
        let fetch_data = fetch_data.clone();
        move |_: ()| fetch_data()
    });

    let submit_new_vehicle = Callback::new({
        let config = config.clone();
        move |_: ()| {
            let request = NewVehicle::new(name.get_untracked(), kind.get_untracked());
            if let Err(message) = validate_new_vehicle(&request) {
                form_error.set(Some(message));
                return;
            }
            form_error.set(None);
            creating.set(true);
            let config = config.clone();
            spawn_local(async move {
                match api::create_vehicle(&config, &request).await {
                    Ok(_) => {
                        name.set(String::new());
                        kind.set(VehicleType::Bus);
                        on_data_change.call(());
                        refetch.call(());
                    }
                    Err(message) => form_error.set(Some(message)),
                }
                creating.set(false);
            });
        }
    });

    let incident_list: Signal<Vec<Incident>> = incidents.into();

    view! {
      <div class="vehicles-section">
        {move || {
            if loading.get() && vehicles.with(Vec::is_empty) {
                return view! { <div class="loading">"Loading vehicles..."</div> }.into_view();
            }
            if vehicles.with(Vec::is_empty) {
                if let Some(message) = error.get() {
                    return view! { <div class="error">{message}</div> }.into_view();
                }
            }
            view! {
              <div class="section-header">
                <h2>"Vehicles & Incidents"</h2>
                <div class="section-actions">
                  <button
                    class="refresh-btn add"
                    on:click=move |_| show_create_form.update(|open| *open = !*open)
                  >
                    {move || if show_create_form.get() { "Close" } else { "Add Vehicle" }}
                  </button>
                  <button class="refresh-btn" on:click=move |_| refetch.call(())>
                    "↻ Refresh"
                  </button>
                </div>
              </div>

              <Show when=move || show_create_form.get() fallback=|| ()>
                <CreateVehicleForm
                  name=name
                  kind=kind
                  creating=creating
                  error=form_error
                  on_submit=submit_new_vehicle
                />
              </Show>

              <Show when=move || vehicles.with(Vec::is_empty) && !loading.get() fallback=|| ()>
                <div class="empty-state">
                  <p>"No vehicles found. Create one below:"</p>
                  <CreateVehicleForm
                    name=name
                    kind=kind
                    creating=creating
                    error=form_error
                    on_submit=submit_new_vehicle
                  />
                </div>
              </Show>

              <Show when=move || !vehicles.with(Vec::is_empty) fallback=|| ()>
                <div class="vehicles-grid">
                  <For
                    each=move || vehicles.get()
                    key=|vehicle| vehicle.id.clone()
                    children=move |vehicle| {
                        view! {
                          <VehicleCard vehicle=vehicle incidents=incident_list on_refresh=refetch/>
                        }
                    }
                  />
                </div>
              </Show>
            }
            .into_view()
        }}
      </div>
    }
}

#[component]
fn CreateVehicleForm(
    name: RwSignal<String>,
    kind: RwSignal<VehicleType>,
    creating: RwSignal<bool>,
    error: RwSignal<Option<String>>,
    #[prop(into)] on_submit: Callback<()>,
) -> impl IntoView {
    view! {
      <form
        class="create-form"
        on:submit=move |ev: ev::SubmitEvent| {
            ev.prevent_default();
            on_submit.call(());
        }
      >
        <input
          type="text"
          placeholder="Vehicle name"
          prop:value=move || name.get()
          on:input=move |ev| name.set(event_target_value(&ev))
        />
        <select
          prop:value=move || kind.get().as_str().to_string()
          on:change=move |ev| {
              if let Some(parsed) = VehicleType::parse(&event_target_value(&ev)) {
                  kind.set(parsed);
              }
          }
        >
          {VehicleType::ALL
              .into_iter()
              .map(|option| view! { <option value=option.as_str()>{option.as_str()}</option> })
              .collect_view()}
        </select>
        <button type="submit" disabled=move || creating.get()>
          {move || if creating.get() { "Creating..." } else { "Create" }}
        </button>
        <Show when=move || error.get().is_some() fallback=|| ()>
          <div class="form-error">{move || error.get().unwrap_or_default()}</div>
        </Show>
      </form>
    }
}

#[component]
fn VehicleCard(
    vehicle: Vehicle,
    #[prop(into)] incidents: Signal<Vec<Incident>>,
    #[prop(into)] on_refresh: Callback<()>,
) -> impl IntoView {
    let config = expect_context::<ApiConfig>();

    let open = {
        let vehicle_id = vehicle.id.clone();
        Signal::derive(move || {
            incidents.with(|all| {
                open_incidents_for(&vehicle_id, all)
                    .into_iter()
                    .cloned()
                    .collect::<Vec<_>>()
            })
        })
    };

    let resolve = Callback::new(move |incident_id: String| {
        let config = config.clone();
        spawn_local(async move {
            match api::close_incident(&config, &incident_id).await {
                Ok(_) => on_refresh.call(()),
                Err(message) => crate::console_warn(&format!(
                    "failed to close incident {incident_id}: {message}"
                )),
            }
        });
    });

    let short_id: String = vehicle.id.chars().take(8).collect();
    let active = vehicle.status.is_active();
    let card_class = if active { "vehicle-card active" } else { "vehicle-card inactive" };
    let badge_class = if active { "status-badge active" } else { "status-badge inactive" };

    view! {
      <div class=card_class>
        <div class="vehicle-header">
          <h3>{vehicle.name.clone()}</h3>
          <span class=badge_class>{vehicle.status.as_str()}</span>
        </div>
        <div class="vehicle-info">
          <p><strong>"Type: "</strong>{vehicle.kind.as_str()}</p>
          <p><strong>"ID: "</strong>{format!("{short_id}...")}</p>
        </div>
        <Show when=move || !open.with(Vec::is_empty) fallback=|| ()>
          <div class="incidents-section">
            <h4>{move || format!("Active Incidents ({})", open.with(Vec::len))}</h4>
            <ul class="incidents-list">
              <For
                each=move || open.get()
                key=|incident| incident.id.clone()
                children=move |incident| {
                    let incident_id = incident.id.clone();
                    view! {
                      <li class="incident-item">
                        <span>{format!("{}: {}", incident.kind.as_str(), incident.description)}</span>
                        <button class="close-btn" on:click=move |_| resolve.call(incident_id.clone())>
                          "Resolve"
                        </button>
                      </li>
                    }
                }
              />
            </ul>
          </div>
        </Show>
      </div>
    }
}
