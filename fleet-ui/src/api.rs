//! Typed bridge to the fleet backend's REST surface.

use crate::config::ApiConfig;
use fleet_registry::{Incident, IncidentReport, NewVehicle, Vehicle};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::Cell;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, Request, RequestInit, Response};

/// The incident-report view's vehicle fetch gives up after this long;
/// no other request carries a timeout.
pub const FETCH_TIMEOUT_MS: i32 = 5_000;

/// Stale-response guard for overlapping polls of the same resource.
///
/// Each fetch cycle takes a ticket before issuing its requests and commits
/// it before applying the response. A response whose ticket is older than
/// the last one applied is discarded, so an interval tick that completes
/// out of order can no longer clobber newer data.
#[derive(Debug, Default)]
pub struct FetchSeq {
    issued: Cell<u64>,
    applied: Cell<u64>,
}

impl FetchSeq {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> u64 {
        let ticket = self.issued.get() + 1;
        self.issued.set(ticket);
        ticket
    }

    /// True when `ticket`'s response may be applied.
    pub fn try_commit(&self, ticket: u64) -> bool {
        if ticket <= self.applied.get() {
            return false;
        }
        self.applied.set(ticket);
        true
    }
}

pub async fn fetch_vehicles(config: &ApiConfig) -> Result<Vec<Vehicle>, String> {
    get(config, "/vehicles", None).await
}

pub async fn fetch_vehicles_with_timeout(config: &ApiConfig) -> Result<Vec<Vehicle>, String> {
    get(config, "/vehicles", Some(FETCH_TIMEOUT_MS)).await
}

pub async fn fetch_incidents(config: &ApiConfig) -> Result<Vec<Incident>, String> {
    get(config, "/incidents", None).await
}

pub async fn create_vehicle(config: &ApiConfig, vehicle: &NewVehicle) -> Result<Vehicle, String> {
    post(config, "/vehicles", vehicle).await
}

pub async fn report_incident(
    config: &ApiConfig,
    report: &IncidentReport,
) -> Result<Incident, String> {
    post(config, "/incidents", report).await
}

pub async fn close_incident(config: &ApiConfig, incident_id: &str) -> Result<Incident, String> {
    put(config, &format!("/incidents/{incident_id}/close")).await
}

async fn get<R: DeserializeOwned>(
    config: &ApiConfig,
    path: &str,
    timeout_ms: Option<i32>,
) -> Result<R, String> {
    decode(send(config, "GET", path, None, timeout_ms).await?)
}

async fn post<B: Serialize, R: DeserializeOwned>(
    config: &ApiConfig,
    path: &str,
    body: &B,
) -> Result<R, String> {
    let body = serde_json::to_string(body).map_err(|e| e.to_string())?;
    decode(send(config, "POST", path, Some(body), None).await?)
}

async fn put<R: DeserializeOwned>(config: &ApiConfig, path: &str) -> Result<R, String> {
    decode(send(config, "PUT", path, None, None).await?)
}

fn decode<R: DeserializeOwned>(value: JsValue) -> Result<R, String> {
    serde_wasm_bindgen::from_value(value).map_err(|e| e.to_string())
}

async fn send(
    config: &ApiConfig,
    method: &str,
    path: &str,
    body: Option<String>,
    timeout_ms: Option<i32>,
) -> Result<JsValue, String> {
    let window = web_sys::window().ok_or_else(|| "window not available".to_string())?;

    let opts = RequestInit::new();
    opts.set_method(method);
    if let Some(body) = &body {
        opts.set_body(&JsValue::from_str(body));
    }

    let mut timeout = None;
    if let Some(ms) = timeout_ms {
        let controller =
            AbortController::new().map_err(|e| format!("abort controller: {e:?}"))?;
        opts.set_signal(Some(&controller.signal()));
        let abort = Closure::<dyn FnMut()>::new(move || controller.abort());
        let handle = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                abort.as_ref().unchecked_ref(),
                ms,
            )
            .map_err(|e| format!("request timer: {e:?}"))?;
        timeout = Some((abort, handle));
    }

    let url = format!("{}{}", config.base_url(), path);
    let request = Request::new_with_str_and_init(&url, &opts)
        .map_err(|e| format!("invalid request for {url}: {e:?}"))?;
    if body.is_some() {
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(|e| format!("request headers: {e:?}"))?;
    }

    let outcome = JsFuture::from(window.fetch_with_request(&request)).await;

    if let Some((abort, handle)) = timeout {
        window.clear_timeout_with_handle(handle);
        drop(abort);
    }

    let response: Response = outcome
        .map_err(|_| format!("backend unreachable at {url}"))?
        .dyn_into()
        .map_err(|_| "unexpected fetch response".to_string())?;

    if !response.ok() {
        return Err(error_message(&response).await);
    }

    let json = response
        .json()
        .map_err(|e| format!("unreadable response body: {e:?}"))?;
    JsFuture::from(json)
        .await
        .map_err(|e| format!("unreadable response body: {e:?}"))
}

async fn error_message(response: &Response) -> String {
    let fallback = format!("{} {}", response.status(), response.status_text());
    let Ok(text) = response.text() else {
        return fallback;
    };
    let Ok(body) = JsFuture::from(text).await else {
        return fallback;
    };
    body.as_string()
        .as_deref()
        .and_then(backend_message)
        .unwrap_or(fallback)
}

/// The backend reports failures as `{"message": "..."}`; surface that text
/// verbatim when present.
fn backend_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    Some(value.get("message")?.as_str()?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_responses_are_discarded() {
        let seq = FetchSeq::new();
        let first = seq.begin();
        let second = seq.begin();

        // The later poll resolves first and wins.
        assert!(seq.try_commit(second));
        assert!(!seq.try_commit(first));
    }

    #[test]
    fn in_order_responses_all_apply() {
        let seq = FetchSeq::new();
        for _ in 0..3 {
            let ticket = seq.begin();
            assert!(seq.try_commit(ticket));
        }
    }

    #[test]
    fn a_ticket_commits_once() {
        let seq = FetchSeq::new();
        let ticket = seq.begin();
        assert!(seq.try_commit(ticket));
        assert!(!seq.try_commit(ticket));
    }

    #[test]
    fn backend_message_is_surfaced_verbatim() {
        assert_eq!(
            backend_message(r#"{"message": "vehicle not found"}"#),
            Some("vehicle not found".to_string())
        );
        assert_eq!(backend_message(r#"{"error": "nope"}"#), None);
        assert_eq!(backend_message("<html>bad gateway</html>"), None);
    }
}
