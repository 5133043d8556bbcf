use crate::alert::{provide_alert_store, use_alert};
use crate::api;
use crate::components::report_incident::ReportIncident;
use crate::components::vehicle_board::VehicleBoard;
use crate::config::ApiConfig;
use fleet_registry::{AlertLevel, FleetStats};
use leptos::*;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen_futures::spawn_local;

/// All three views poll on this period, each on its own timer.
pub const POLL_INTERVAL: Duration = Duration::from_millis(5_000);

fn alert_color(level: AlertLevel) -> &'static str {
    match level {
        AlertLevel::Green => "#10b981",
        AlertLevel::Yellow => "#f59e0b",
        AlertLevel::Red => "#ef4444",
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_context(ApiConfig::resolve());
    provide_alert_store();

    view! { <Dashboard/> }
}

#[component]
fn StatCard(
    title: &'static str,
    #[prop(into)] value: Signal<usize>,
    color: &'static str,
) -> impl IntoView {
    view! {
      <div class=format!("stat-card stat-{color}")>
        <div class="stat-title">{title}</div>
        <div class="stat-value">{move || value.get()}</div>
      </div>
    }
}

/// Composition root: header with the alert pill, summary statistics, and
/// the two operational views. Owns its own polling loop for the stats and
/// the refresh trigger the views use to nudge each other after writes.
#[component]
fn Dashboard() -> impl IntoView {
    let config = expect_context::<ApiConfig>();
    let alert = use_alert();

    let stats = create_rw_signal(FleetStats::default());
    let refresh_trigger = create_rw_signal(0u32);

    let fetch_stats = {
        let config = config.clone();
        let seq = Rc::new(api::FetchSeq::new());
        move || {
            let config = config.clone();
            let seq = Rc::clone(&seq);
            spawn_local(async move {
                let ticket = seq.begin();
                let fetched = async {
                    let vehicles = api::fetch_vehicles(&config).await?;
                    let incidents = api::fetch_incidents(&config).await?;
                    Ok::<_, String>((vehicles, incidents))
                }
                .await;
                match fetched {
                    Ok((vehicles, incidents)) => {
                        if seq.try_commit(ticket) {
                            stats.set(FleetStats::derive(&vehicles, &incidents));
                        }
                    }
                    // Keep the last good numbers on a failed refresh.
                    Err(message) => crate::console_warn(&format!("stats refresh failed: {message}")),
                }
            });
        }
    };

    create_effect({
        let fetch_stats = fetch_stats.clone();
        move |_| {
            let _ = refresh_trigger.get();
            fetch_stats();
        }
    });
    if let Ok(handle) = set_interval_with_handle(fetch_stats, POLL_INTERVAL) {
        on_cleanup(move || handle.clear());
    }

    let pill_color = {
        let alert = alert.clone();
        move || alert_color(alert.level())
    };
    let pill_label = move || format!("Alert Level: {}", alert.level().as_str());

    view! {
      <div class="shell">
        <aside class="sidebar">
          <div class="brand">"Urban Flow"</div>
          <nav>
            <ul>
              <li class="current"><a href="#">"Dashboard"</a></li>
              <li><a href="#">"Services"</a></li>
              <li><a href="#">"Analytics"</a></li>
              <li><a href="#">"Settings"</a></li>
            </ul>
          </nav>
          <div class="sidebar-footer">"© 2025 Urban Flow"</div>
        </aside>

        <main class="content">
          <header class="topbar">
            <div>
              <h2>"Service Orchestration Dashboard"</h2>
              <p class="subtitle">"Manage vehicles and incidents in real-time"</p>
            </div>
            <div class="alert-pill" style:background-color=pill_color>
              <span class="alert-dot"></span>
              <span>{pill_label}</span>
            </div>
          </header>

          <section class="stats-grid">
            <StatCard
              title="Total Vehicles"
              value=Signal::derive(move || stats.get().total_vehicles)
              color="blue"
            />
            <StatCard
              title="Active Vehicles"
              value=Signal::derive(move || stats.get().active_vehicles)
              color="green"
            />
            <StatCard
              title="Open Incidents"
              value=Signal::derive(move || stats.get().open_incidents)
              color="red"
            />
          </section>

          <div class="content-grid">
            <div class="panel wide">
              <VehicleBoard
                refresh_trigger=refresh_trigger
                on_data_change=move |_| refresh_trigger.update(|n| *n += 1)
              />
            </div>
            <div class="panel">
              <ReportIncident
                refresh_trigger=refresh_trigger
                on_reported=move |_| refresh_trigger.update(|n| *n += 1)
              />
            </div>
          </div>
        </main>
      </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pill_colors_track_levels() {
        assert_eq!(alert_color(AlertLevel::Green), "#10b981");
        assert_eq!(alert_color(AlertLevel::Yellow), "#f59e0b");
        assert_eq!(alert_color(AlertLevel::Red), "#ef4444");
    }
}
