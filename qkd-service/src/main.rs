//! HTTP key-generation service.
//!
//! Thin glue over the protocol engine: one GET endpoint per protocol,
//! a path parameter for the desired key length, JSON bodies out. Each
//! request owns a fresh entropy-seeded rng and runs its generation loop
//! on the blocking pool, so concurrent requests are fully independent.

use std::net::SocketAddr;
use std::time::Instant;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use serde_json::json;

use qkd_protocols::bb84::Bb84Protocol;
use qkd_protocols::e91::E91Protocol;
use qkd_protocols::engine::{generate_key, EngineConfig, KeyPair};
use qkd_protocols::error::KeyGenError;
use qkd_protocols::pairing::PairingProtocol;
use qubit_sim::simulator::Simulator;

#[derive(Clone)]
struct AppState {
    config: EngineConfig,
    oracle: Simulator,
}

#[derive(Debug, Clone, Copy)]
enum ProtocolKind {
    Pairing,
    Bb84,
    E91,
}

impl ProtocolKind {
    fn tag(self) -> &'static str {
        match self {
            ProtocolKind::Pairing => "BS",
            ProtocolKind::Bb84 => "BB84",
            ProtocolKind::E91 => "E91",
        }
    }
}

#[derive(Serialize)]
struct KeyResponse {
    alice_key: String,
    bob_key: String,
    time_taken: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    protocol: Option<&'static str>,
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/key/:desired_key_length", get(legacy_pairing_key))
        .route("/bs_key/:desired_key_length", get(pairing_key))
        .route("/bb84_key/:desired_key_length", get(bb84_key))
        .route("/e91_key/:desired_key_length", get(e91_key))
        .with_state(state)
}

fn generate(kind: ProtocolKind, length: usize, state: &AppState) -> Result<KeyPair, KeyGenError> {
    let mut rng = StdRng::from_entropy();
    match kind {
        ProtocolKind::Pairing => generate_key(
            &PairingProtocol::new(&state.config),
            length,
            &state.config,
            &state.oracle,
            &mut rng,
        ),
        ProtocolKind::Bb84 => generate_key(
            &Bb84Protocol::new(&state.config),
            length,
            &state.config,
            &state.oracle,
            &mut rng,
        ),
        ProtocolKind::E91 => generate_key(
            &E91Protocol::new(&state.config),
            length,
            &state.config,
            &state.oracle,
            &mut rng,
        ),
    }
}

fn bad_request(detail: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "detail": detail })),
    )
        .into_response()
}

fn engine_error(kind: ProtocolKind, err: KeyGenError) -> Response {
    error!("{} key generation failed: {err}", kind.tag());
    let status = match err {
        KeyGenError::InvalidLength => StatusCode::BAD_REQUEST,
        KeyGenError::Channel(_) => StatusCode::INTERNAL_SERVER_ERROR,
        KeyGenError::DeadlineExceeded { .. } => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, Json(json!({ "detail": err.to_string() }))).into_response()
}

async fn run_protocol(
    state: AppState,
    kind: ProtocolKind,
    length: usize,
    tagged: bool,
) -> Response {
    let started = Instant::now();
    let generated =
        tokio::task::spawn_blocking(move || generate(kind, length, &state)).await;
    let pair = match generated {
        Ok(Ok(pair)) => pair,
        Ok(Err(err)) => return engine_error(kind, err),
        Err(join_err) => {
            error!("{} generation task failed: {join_err}", kind.tag());
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "detail": "key generation task failed" })),
            )
                .into_response();
        }
    };

    let time_taken = started.elapsed().as_secs_f64();
    info!(
        "{}: generated {length} bit key in {time_taken:.3}s",
        kind.tag()
    );
    Json(KeyResponse {
        alice_key: pair.alice.to_string(),
        bob_key: pair.bob.to_string(),
        time_taken,
        protocol: tagged.then(|| kind.tag()),
    })
    .into_response()
}

/// Unvalidated pairing endpoint: a non-positive length yields empty keys
/// without touching the channel.
async fn legacy_pairing_key(
    State(state): State<AppState>,
    Path(length): Path<i64>,
) -> Response {
    if length < 1 {
        return Json(KeyResponse {
            alice_key: String::new(),
            bob_key: String::new(),
            time_taken: 0.0,
            protocol: None,
        })
        .into_response();
    }
    run_protocol(state, ProtocolKind::Pairing, length as usize, false).await
}

async fn pairing_key(State(state): State<AppState>, Path(length): Path<i64>) -> Response {
    match validate(length) {
        Ok(length) => run_protocol(state, ProtocolKind::Pairing, length, true).await,
        Err(resp) => resp,
    }
}

async fn bb84_key(State(state): State<AppState>, Path(length): Path<i64>) -> Response {
    match validate(length) {
        Ok(length) => run_protocol(state, ProtocolKind::Bb84, length, true).await,
        Err(resp) => resp,
    }
}

async fn e91_key(State(state): State<AppState>, Path(length): Path<i64>) -> Response {
    match validate(length) {
        Ok(length) => run_protocol(state, ProtocolKind::E91, length, true).await,
        Err(resp) => resp,
    }
}

fn validate(length: i64) -> Result<usize, Response> {
    if length < 1 {
        return Err(bad_request("desired key length must be positive"));
    }
    Ok(length as usize)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let addr: SocketAddr = std::env::var("QKD_LISTEN")
        .unwrap_or_else(|_| "127.0.0.1:8000".to_string())
        .parse()?;
    let state = AppState {
        config: EngineConfig::default(),
        oracle: Simulator::new(),
    };

    info!("serving QKD key endpoints on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state)).await?;
    Ok(())
}
