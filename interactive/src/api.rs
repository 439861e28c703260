use std::sync::Arc;

use gloo_net::http::{Request, RequestBuilder};
use leptos::prelude::*;
use learnhub_shared::http::{ApiRequest, Body, Method, Part, RawResponse, Transport};
use learnhub_shared::optimistic::Store;
use learnhub_shared::session::CredentialStore;
use learnhub_shared::{ApiClient, ApiError, ClientConfig};
use web_sys::{window, FormData};

pub type Client = ApiClient<GlooTransport, LocalStorage>;

fn api_base() -> String {
    // Set by the host page; blank or missing falls back to the local backend
    window()
        .and_then(|w| w.document())
        .and_then(|d| d.query_selector("meta[name='learnhub-api']").ok().flatten())
        .and_then(|el| el.get_attribute("content"))
        .unwrap_or_default()
}

pub fn config() -> Arc<ClientConfig> {
    Arc::new(ClientConfig::with_base_url(&api_base()))
}

pub fn client() -> Client {
    ApiClient::new(GlooTransport, LocalStorage, config())
}

pub fn media_url(path: &str) -> String {
    config().media_url(path)
}

// ── Transport ──

#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTransport;

fn builder(method: Method, url: &str) -> RequestBuilder {
    match method {
        Method::Get => Request::get(url),
        Method::Post => Request::post(url),
        Method::Put => Request::put(url),
        Method::Patch => Request::patch(url),
        Method::Delete => Request::delete(url),
    }
}

fn form_data(parts: Vec<(String, Part<web_sys::File>)>) -> Result<FormData, ApiError> {
    let js_err = |e: wasm_bindgen::JsValue| ApiError::Network(format!("{e:?}"));
    let data = FormData::new().map_err(js_err)?;
    for (name, part) in parts {
        match part {
            Part::Text(value) => data.append_with_str(&name, &value).map_err(js_err)?,
            Part::File(file) => data
                .append_with_blob_and_filename(&name, &file, &file.name())
                .map_err(js_err)?,
        }
    }
    Ok(data)
}

impl Transport for GlooTransport {
    type File = web_sys::File;

    async fn send(&self, request: ApiRequest<web_sys::File>) -> Result<RawResponse, ApiError> {
        let mut req = builder(request.method, &request.url);
        if let Some(token) = &request.bearer {
            req = req.header("Authorization", &format!("Bearer {token}"));
        }

        let net_err = |e: gloo_net::Error| ApiError::Network(e.to_string());
        let req = match request.body {
            Body::Empty => req.build().map_err(net_err)?,
            Body::Json(json) => req
                .header("Content-Type", "application/json")
                .body(json)
                .map_err(net_err)?,
            // the browser sets the multipart boundary itself
            Body::Multipart(form) => req.body(form_data(form.into_parts())?).map_err(net_err)?,
        };

        let resp = req.send().await.map_err(net_err)?;
        let status = resp.status();
        let body = resp.text().await.map_err(net_err)?;
        Ok(RawResponse { status, body })
    }
}

// ── Credentials ──

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

fn storage() -> Option<web_sys::Storage> {
    window()?.local_storage().ok()?
}

impl CredentialStore for LocalStorage {
    fn load(&self, key: &str) -> Option<String> {
        storage()?.get_item(key).ok()?
    }

    fn store(&self, key: &str, value: &str) {
        if let Some(storage) = storage() {
            let _ = storage.set_item(key, value);
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = storage() {
            let _ = storage.remove_item(key);
        }
    }
}

// ── Optimistic updates ──

/// Lets a signal back an optimistic mutation.
pub struct SignalStore<T: Send + Sync + 'static>(pub RwSignal<T>);

impl<T: Send + Sync + 'static> Store<T> for SignalStore<T> {
    fn modify<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.0.try_update(f)
    }
}
