use crate::api;
use crate::app::POLL_INTERVAL;
use crate::config::ApiConfig;
use fleet_registry::{validate_incident_report, IncidentReport, IncidentType, Vehicle};
use leptos::*;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen_futures::spawn_local;

/// How long the success banner stays up after a report goes through.
const SUCCESS_BANNER: Duration = Duration::from_millis(3_000);

/// Incident report form. Fetches the vehicle list on its own timer (the
/// only request in the app that carries a timeout) and refetches whenever
/// a sibling bumps the shared refresh trigger.
#[component]
pub fn ReportIncident(
    refresh_trigger: RwSignal<u32>,
    #[prop(into)] on_reported: Callback<()>,
) -> impl IntoView {
    let config = expect_context::<ApiConfig>();

    let vehicles = create_rw_signal(Vec::<Vehicle>::new());
    let vehicles_loading = create_rw_signal(true);
    let vehicle_id = create_rw_signal(String::new());
    let kind = create_rw_signal(IncidentType::Traffic);
    let description = create_rw_signal(String::new());
    let submitting = create_rw_signal(false);
    let error = create_rw_signal(None::<String>);
    let success = create_rw_signal(false);

    let fetch_vehicle_list = {
        let config = config.clone();
        let seq = Rc::new(api::FetchSeq::new());
        move || {
            let config = config.clone();
            let seq = Rc::clone(&seq);
            vehicles_loading.set(true);
            spawn_local(async move {
                let ticket = seq.begin();
                match api::fetch_vehicles_with_timeout(&config).await {
                    Ok(list) => {
                        if seq.try_commit(ticket) {
                            vehicles.set(list);
                            error.set(None);
                        }
                    }
                    Err(message) => {
                        crate::console_warn(&format!("vehicle list fetch failed: {message}"));
                        if vehicles.with_untracked(Vec::is_empty) {
                            error.set(Some(format!(
                                "Failed to load vehicles. Make sure the backend is running on {}",
                                config.base_url()
                            )));
                        }
                    }
                }
                vehicles_loading.set(false);
            });
        }
    };

    create_effect({
        let fetch = fetch_vehicle_list.clone();
        move |_| {
            let _ = refresh_trigger.get();
            fetch();
        }
    });
    if let Ok(handle) = set_interval_with_handle(fetch_vehicle_list, POLL_INTERVAL) {
        on_cleanup(move || handle.clear());
    }

    let submit = {
        let config = config.clone();
        move |ev: ev::SubmitEvent| {
            ev.prevent_default();
            let report = IncidentReport {
                vehicle_id: vehicle_id.get_untracked(),
                kind: kind.get_untracked(),
                description: description.get_untracked(),
            };
            if let Err(message) = validate_incident_report(&report) {
                error.set(Some(message));
                return;
            }
            submitting.set(true);
            error.set(None);
            success.set(false);
            let config = config.clone();
            spawn_local(async move {
                match api::report_incident(&config, &report).await {
                    Ok(_) => {
                        success.set(true);
                        vehicle_id.set(String::new());
                        kind.set(IncidentType::Traffic);
                        description.set(String::new());
                        set_timeout(move || success.set(false), SUCCESS_BANNER);
                        on_reported.call(());
                    }
                    // The form keeps its contents so the operator can retry.
                    Err(message) => error.set(Some(message)),
                }
                submitting.set(false);
            });
        }
    };

    let placeholder = move || {
        if vehicles_loading.get() {
            "Loading vehicles..."
        } else if vehicles.with(Vec::is_empty) {
            "No vehicles available"
        } else {
            "-- Choose a vehicle --"
        }
    };

    view! {
      <div class="report-incident-section">
        <h2>"Report an Incident"</h2>
        <form class="incident-form" on:submit=submit>
          <div class="form-group">
            <label for="report-vehicle">"Select Vehicle *"</label>
            <select
              id="report-vehicle"
              prop:value=move || vehicle_id.get()
              on:change=move |ev| vehicle_id.set(event_target_value(&ev))
              disabled=move || vehicles_loading.get()
            >
              <option value="">{placeholder}</option>
              <For
                each=move || vehicles.get()
                key=|vehicle| vehicle.id.clone()
                children=move |vehicle| {
                    view! {
                      <option value=vehicle.id.clone()>
                        {format!("{} ({})", vehicle.name, vehicle.kind.as_str())}
                      </option>
                    }
                }
              />
            </select>
          </div>

          <div class="form-group">
            <label for="report-type">"Incident Type *"</label>
            <select
              id="report-type"
              prop:value=move || kind.get().as_str().to_string()
              on:change=move |ev| {
                  if let Some(parsed) = IncidentType::parse(&event_target_value(&ev)) {
                      kind.set(parsed);
                  }
              }
            >
              {IncidentType::ALL
                  .into_iter()
                  .map(|option| view! { <option value=option.as_str()>{option.as_str()}</option> })
                  .collect_view()}
            </select>
          </div>

          <div class="form-group">
            <label for="report-description">"Description"</label>
            <textarea
              id="report-description"
              rows="4"
              placeholder="Describe the incident..."
              prop:value=move || description.get()
              on:input=move |ev| description.set(event_target_value(&ev))
            ></textarea>
          </div>

          <Show when=move || error.get().is_some() fallback=|| ()>
            <div class="alert alert-error">{move || error.get().unwrap_or_default()}</div>
          </Show>
          <Show when=move || success.get() fallback=|| ()>
            <div class="alert alert-success">"Incident reported successfully!"</div>
          </Show>

          <button
            type="submit"
            class="submit-btn"
            disabled=move || submitting.get() || vehicles_loading.get()
          >
            {move || if submitting.get() { "Reporting..." } else { "Report Incident" }}
          </button>
        </form>
      </div>
    }
}
