#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use charsheet_core::errors::StoreError;
use charsheet_core::store::{decode_profile, is_valid_file_name};
use charsheet_core::templates::sample_profile;
use charsheet_core::{CharacterProfile, ProfileStore};
use charsheet_engine::{
    GenerationConfig, GenerationRequest, ProfileGenerator, ProfileService, ProviderError,
};
use charsheet_http::{build_router, AppState};

/// Generator that records names and answers through `reply`.
pub struct MockGenerator {
    pub calls: AtomicUsize,
    pub names: Mutex<Vec<String>>,
    reply: fn(&str) -> Result<Value, ProviderError>,
}

impl MockGenerator {
    pub fn new(reply: fn(&str) -> Result<Value, ProviderError>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            names: Mutex::new(Vec::new()),
            reply,
        })
    }

    /// Always returns a conforming sample profile.
    pub fn conforming() -> Arc<Self> {
        Self::new(|name| Ok(sample_profile(name)))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileGenerator for MockGenerator {
    async fn generate(&self, req: &GenerationRequest) -> Result<Value, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.names.lock().unwrap().push(req.name.clone());
        (self.reply)(&req.name)
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// In-memory profile store keyed by file name.
#[derive(Default)]
pub struct MemoryStore {
    files: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn with(mut self, file: &str, content: impl Into<String>) -> Self {
        self.files.insert(file.to_string(), content.into());
        self
    }
}

impl ProfileStore for MemoryStore {
    fn list(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.files.keys().rev().cloned().collect())
    }

    fn read(&self, file: &str) -> Result<CharacterProfile, StoreError> {
        if !is_valid_file_name(file) {
            return Err(StoreError::InvalidFileName(file.to_string()));
        }
        let content = self
            .files
            .get(file)
            .ok_or_else(|| StoreError::NotFound(file.to_string()))?;
        decode_profile(file, content)
    }
}

/// Build the full router around `generator` and `store`.
pub fn build_test_app(generator: Arc<dyn ProfileGenerator>, store: impl ProfileStore + 'static) -> Router {
    let service = ProfileService::new(generator, GenerationConfig::default()).unwrap();
    build_router(AppState {
        service,
        store: Arc::new(store),
    })
}

pub async fn send(app: Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

pub async fn post_raw(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, bytes) = send(app, req).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, bytes) = get_bytes(app, uri).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

pub async fn get_bytes(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, req).await
}
