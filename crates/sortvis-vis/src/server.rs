//! Axum web server with WebSocket streaming for visualization.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{broadcast, RwLock};

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sortvis_kernels::AlgorithmKind;
use sortvis_playback::{
    ChannelObserver, Controller, PlaybackSnapshot, PlaybackUpdate, RunStatus, Speed,
};
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

use crate::config::{Theme, VisConfig};
use crate::error::{Error, Result};
use crate::input::{parse_custom, SequenceSource};
use crate::pseudocode::{clipboard_text, AlgorithmDoc};

/// Capacity of the update channel feeding WebSocket clients.
const UPDATE_BUFFER: usize = 1024;

/// Shared application state.
pub struct AppState {
    config: VisConfig,
    controller: Controller,
    source: Mutex<SequenceSource>,
    algorithm: RwLock<AlgorithmKind>,
    theme: RwLock<Theme>,
    updates: broadcast::Sender<PlaybackUpdate>,
}

impl AppState {
    /// Build state with a freshly generated sequence loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: VisConfig) -> Result<Self> {
        config.validate()?;
        let mut source = SequenceSource::new(&config);
        let controller = Controller::with_sequence(config.playback(), source.generate())?;
        let (updates, _) = broadcast::channel(UPDATE_BUFFER);

        Ok(Self {
            algorithm: RwLock::new(config.default_algorithm),
            theme: RwLock::new(config.theme),
            controller,
            source: Mutex::new(source),
            updates,
            config,
        })
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Receive every notification of every run started through this state.
    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackUpdate> {
        self.updates.subscribe()
    }

    fn with_source<T>(&self, f: impl FnOnce(&mut SequenceSource) -> T) -> T {
        let mut source = self.source.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut source)
    }

    pub async fn generate(&self) -> Result<PlaybackSnapshot> {
        let sequence = self.with_source(SequenceSource::generate);
        self.controller.load(sequence).await?;
        Ok(self.controller.snapshot().await)
    }

    pub async fn shuffle(&self) -> Result<PlaybackSnapshot> {
        let mut sequence = self.controller.sequence().await;
        self.with_source(|source| source.shuffle(&mut sequence));
        self.controller.replace_working(sequence).await?;
        Ok(self.controller.snapshot().await)
    }

    pub async fn reset(&self) -> Result<PlaybackSnapshot> {
        self.controller.reset().await?;
        Ok(self.controller.snapshot().await)
    }

    /// Load a comma-separated list. Unusable text leaves the current
    /// sequence in place and still returns the snapshot.
    pub async fn custom(&self, text: &str) -> Result<PlaybackSnapshot> {
        match parse_custom(text, self.config.max_len) {
            Some(sequence) => self.controller.load(sequence).await?,
            None => debug!("custom sequence ignored"),
        }
        Ok(self.controller.snapshot().await)
    }

    /// Start sorting the current sequence.
    pub async fn start(&self, request: StartRequest) -> Result<PlaybackSnapshot> {
        let algorithm = match request.algorithm {
            Some(algorithm) => {
                *self.algorithm.write().await = algorithm;
                algorithm
            }
            None => *self.algorithm.read().await,
        };
        let speed = request.speed.unwrap_or_else(|| self.controller.speed());

        let observer = ChannelObserver::new(self.updates.clone());
        // The run task is detached; progress reaches clients via `updates`.
        let _run = self
            .controller
            .start_current(algorithm, speed, observer)
            .await?;
        Ok(self.controller.snapshot().await)
    }

    pub async fn select_algorithm(&self, algorithm: AlgorithmKind) -> AlgorithmKind {
        *self.algorithm.write().await = algorithm;
        algorithm
    }

    pub async fn toggle_theme(&self) -> Theme {
        let mut theme = self.theme.write().await;
        *theme = theme.toggled();
        *theme
    }

    async fn settings(&self) -> Settings {
        Settings {
            config: self.config.clone(),
            algorithm: *self.algorithm.read().await,
            theme: *self.theme.read().await,
            speed: self.controller.speed(),
            speed_options_ms: sortvis_playback::SPEED_OPTIONS_MS,
        }
    }
}

/// Visualization server.
pub struct VisServer {
    state: Arc<AppState>,
}

impl VisServer {
    /// Create a new visualization server.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: VisConfig) -> Result<Self> {
        Ok(Self {
            state: Arc::new(AppState::new(config)?),
        })
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Build the router for the server.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/status", get(status_handler))
            .route("/api/config", get(config_handler))
            .route("/api/theme/toggle", post(theme_handler))
            .route("/api/sequence", get(snapshot_handler))
            .route("/api/sequence/generate", post(generate_handler))
            .route("/api/sequence/shuffle", post(shuffle_handler))
            .route("/api/sequence/reset", post(reset_handler))
            .route("/api/sequence/custom", post(custom_handler))
            .route("/api/algorithms", get(algorithms_handler))
            .route("/api/algorithms/select", post(select_handler))
            .route("/api/algorithms/{id}/pseudocode", get(pseudocode_handler))
            .route("/api/run/start", post(start_handler))
            .route("/api/run/pause", post(pause_handler))
            .route("/api/run/resume", post(resume_handler))
            .route("/api/run/cancel", post(cancel_handler))
            .route("/api/run/speed", post(speed_handler))
            // WebSocket for real-time updates
            .route("/ws", get(ws_handler))
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Run the server on the configured port.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot bind or the server fails.
    pub async fn serve(self) -> Result<()> {
        let port = self.state.config.port;
        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Visualization server running on http://localhost:{}", port);
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

/// Error body for failed API calls.
struct ApiError(Error);

impl<E: Into<Error>> From<E> for ApiError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use sortvis_playback::Error as PlaybackError;

        let status = match &self.0 {
            Error::Playback(PlaybackError::AlreadyRunning | PlaybackError::NotRunning) => {
                StatusCode::CONFLICT
            }
            Error::Playback(PlaybackError::InvalidInput(_) | PlaybackError::Kernel(_))
            | Error::Kernel(_)
            | Error::InvalidConfig(_) => StatusCode::BAD_REQUEST,
            Error::Playback(PlaybackError::Join(_)) | Error::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(ErrorBody { error: self.0.to_string() })).into_response()
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

/// Server status response.
#[derive(Serialize)]
struct StatusResponse {
    status: &'static str,
    run: RunStatus,
    len: usize,
}

async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        run: state.controller.status(),
        len: state.controller.sequence().await.len(),
    })
}

/// Current settings, including values that change at runtime.
#[derive(Serialize)]
struct Settings {
    config: VisConfig,
    algorithm: AlgorithmKind,
    theme: Theme,
    speed: Speed,
    speed_options_ms: [u64; 10],
}

async fn config_handler(State(state): State<Arc<AppState>>) -> Json<Settings> {
    Json(state.settings().await)
}

async fn theme_handler(State(state): State<Arc<AppState>>) -> Json<Settings> {
    state.toggle_theme().await;
    Json(state.settings().await)
}

async fn snapshot_handler(State(state): State<Arc<AppState>>) -> Json<PlaybackSnapshot> {
    Json(state.controller.snapshot().await)
}

async fn generate_handler(State(state): State<Arc<AppState>>) -> ApiResult<PlaybackSnapshot> {
    Ok(Json(state.generate().await?))
}

async fn shuffle_handler(State(state): State<Arc<AppState>>) -> ApiResult<PlaybackSnapshot> {
    Ok(Json(state.shuffle().await?))
}

async fn reset_handler(State(state): State<Arc<AppState>>) -> ApiResult<PlaybackSnapshot> {
    Ok(Json(state.reset().await?))
}

#[derive(Deserialize)]
struct CustomRequest {
    text: String,
}

async fn custom_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CustomRequest>,
) -> ApiResult<PlaybackSnapshot> {
    Ok(Json(state.custom(&req.text).await?))
}

async fn algorithms_handler() -> Json<Vec<AlgorithmDoc>> {
    Json(AlgorithmKind::ALL.into_iter().map(AlgorithmDoc::of).collect())
}

#[derive(Deserialize)]
struct SelectRequest {
    algorithm: AlgorithmKind,
}

async fn select_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SelectRequest>,
) -> Json<AlgorithmDoc> {
    Json(AlgorithmDoc::of(state.select_algorithm(req.algorithm).await))
}

#[derive(Serialize)]
struct PseudoCodeResponse {
    #[serde(flatten)]
    doc: AlgorithmDoc,
    text: String,
}

async fn pseudocode_handler(Path(id): Path<String>) -> ApiResult<PseudoCodeResponse> {
    let kind: AlgorithmKind = id.parse()?;
    Ok(Json(PseudoCodeResponse {
        doc: AlgorithmDoc::of(kind),
        text: clipboard_text(kind),
    }))
}

/// Parameters for starting a run. Missing fields fall back to the last
/// selected algorithm and the current speed.
#[derive(Debug, Default, Deserialize)]
pub struct StartRequest {
    pub algorithm: Option<AlgorithmKind>,
    pub speed: Option<Speed>,
}

async fn start_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StartRequest>,
) -> ApiResult<PlaybackSnapshot> {
    Ok(Json(state.start(req).await?))
}

async fn pause_handler(State(state): State<Arc<AppState>>) -> ApiResult<PlaybackSnapshot> {
    state.controller.pause()?;
    Ok(Json(state.controller.snapshot().await))
}

async fn resume_handler(State(state): State<Arc<AppState>>) -> ApiResult<PlaybackSnapshot> {
    state.controller.resume()?;
    Ok(Json(state.controller.snapshot().await))
}

async fn cancel_handler(State(state): State<Arc<AppState>>) -> ApiResult<PlaybackSnapshot> {
    state.controller.cancel()?;
    Ok(Json(state.controller.snapshot().await))
}

#[derive(Deserialize)]
struct SpeedRequest {
    speed: Speed,
}

async fn speed_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SpeedRequest>,
) -> Json<PlaybackSnapshot> {
    state.controller.set_speed(req.speed);
    Json(state.controller.snapshot().await)
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    info!("WebSocket client connected");

    // Subscribe before the snapshot so no update falls in between.
    let mut updates = state.subscribe();
    let snapshot = WsResponse::Snapshot(state.controller.snapshot().await);
    if send_json(&mut socket, &snapshot).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let response = match serde_json::from_str::<WsCommand>(text.as_str()) {
                            Ok(cmd) => handle_ws_command(&state, cmd).await,
                            Err(e) => WsResponse::Error { message: e.to_string() },
                        };
                        if send_json(&mut socket, &response).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!("WebSocket client disconnected");
                        break;
                    }
                    Some(Err(e)) => {
                        warn!("WebSocket error: {}", e);
                        break;
                    }
                    _ => {}
                }
            }
            update = updates.recv() => {
                let response = match update {
                    Ok(update) => WsResponse::Update(update),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "client lagged, resending snapshot");
                        WsResponse::Snapshot(state.controller.snapshot().await)
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };
                if send_json(&mut socket, &response).await.is_err() {
                    break;
                }
            }
        }
    }
}

async fn send_json(socket: &mut WebSocket, response: &WsResponse) -> std::result::Result<(), ()> {
    let json = serde_json::to_string(response).map_err(|e| warn!("Failed to encode: {}", e))?;
    socket
        .send(Message::Text(json.into()))
        .await
        .map_err(|e| debug!("Failed to send: {}", e))
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsCommand {
    GetSnapshot,
    Pause,
    Resume,
    TogglePause,
    Cancel,
    SetSpeed { speed: Speed },
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsResponse {
    Snapshot(PlaybackSnapshot),
    Update(PlaybackUpdate),
    Status { status: RunStatus },
    Error { message: String },
}

async fn handle_ws_command(state: &Arc<AppState>, cmd: WsCommand) -> WsResponse {
    let controller = &state.controller;
    let result = match cmd {
        WsCommand::GetSnapshot => return WsResponse::Snapshot(controller.snapshot().await),
        WsCommand::Pause => controller.pause(),
        WsCommand::Resume => controller.resume(),
        WsCommand::TogglePause => controller.toggle_pause().map(|_| ()),
        WsCommand::Cancel => controller.cancel(),
        WsCommand::SetSpeed { speed } => {
            controller.set_speed(speed);
            Ok(())
        }
    };
    match result {
        Ok(()) => WsResponse::Status {
            status: controller.status(),
        },
        Err(e) => WsResponse::Error {
            message: e.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sortvis_playback::Notification;
    use tokio_test::assert_ok;

    fn state() -> AppState {
        AppState::new(VisConfig {
            seed: Some(42),
            ..VisConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn server_creation() {
        let _server = VisServer::new(VisConfig::default()).unwrap();
    }

    #[test]
    fn router_builds() {
        let server = VisServer::new(VisConfig::default()).unwrap();
        let _router = server.router();
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = VisConfig {
            min_len: 50,
            max_len: 20,
            ..VisConfig::default()
        };
        assert!(matches!(VisServer::new(config), Err(Error::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn starts_with_generated_sequence() {
        let state = state();
        let snapshot = state.controller.snapshot().await;
        assert!((10..350).contains(&snapshot.sequence.len()));
        assert_eq!(snapshot.sequence, snapshot.original);
        assert_eq!(snapshot.stats.status, RunStatus::Idle);
    }

    #[tokio::test]
    async fn custom_input_keeps_prior_sequence_when_unusable() {
        let state = state();
        let loaded = assert_ok!(state.custom("5, 3, 8, 1").await);
        assert_eq!(loaded.sequence, vec![5, 3, 8, 1]);

        let ignored = assert_ok!(state.custom("not, numbers").await);
        assert_eq!(ignored.sequence, vec![5, 3, 8, 1]);
    }

    #[tokio::test]
    async fn shuffle_then_reset() {
        let state = state();
        state.custom("1,2,3,4,5,6,7,8,9,10").await.unwrap();
        let shuffled = state.shuffle().await.unwrap();
        assert_eq!(shuffled.original, (1..=10).collect::<Vec<_>>());

        let reset = state.reset().await.unwrap();
        assert_eq!(reset.sequence, (1..=10).collect::<Vec<_>>());
    }

    #[tokio::test(start_paused = true)]
    async fn start_streams_updates_and_blocks_sequence_changes() {
        let state = state();
        state.custom("5, 3, 8, 1").await.unwrap();
        let mut updates = state.subscribe();

        state
            .start(StartRequest {
                algorithm: Some(AlgorithmKind::Bubble),
                speed: Some(Speed::from_index(0).unwrap()),
            })
            .await
            .unwrap();

        assert!(matches!(
            state.generate().await,
            Err(Error::Playback(sortvis_playback::Error::AlreadyRunning))
        ));
        assert!(matches!(
            state.start(StartRequest::default()).await,
            Err(Error::Playback(sortvis_playback::Error::AlreadyRunning))
        ));

        let mut comparisons = 0;
        loop {
            let update = updates.recv().await.unwrap();
            match update.notification {
                Notification::Comparing { .. } => comparisons += 1,
                Notification::Completed(stats) => {
                    assert_eq!(stats.status, RunStatus::Finished);
                    assert_eq!(update.sequence, vec![1, 3, 5, 8]);
                    break;
                }
                _ => {}
            }
        }
        assert_eq!(comparisons, 6);
        assert_eq!(*state.algorithm.read().await, AlgorithmKind::Bubble);
    }

    #[tokio::test]
    async fn ws_commands_report_not_running() {
        let state = Arc::new(state());
        let response = handle_ws_command(&state, WsCommand::Pause).await;
        assert!(matches!(response, WsResponse::Error { .. }));

        let response = handle_ws_command(&state, WsCommand::GetSnapshot).await;
        assert!(matches!(response, WsResponse::Snapshot(_)));
    }

    #[test]
    fn ws_command_parsing() {
        let cmd: WsCommand = serde_json::from_str(r#"{"type":"set_speed","speed":2}"#).unwrap();
        assert!(matches!(cmd, WsCommand::SetSpeed { speed } if speed.millis() == 67));

        let cmd: WsCommand = serde_json::from_str(r#"{"type":"toggle_pause"}"#).unwrap();
        assert!(matches!(cmd, WsCommand::TogglePause));
    }

    #[test]
    fn error_status_codes() {
        let conflict = ApiError::from(sortvis_playback::Error::AlreadyRunning).into_response();
        assert_eq!(conflict.status(), StatusCode::CONFLICT);

        let bad = ApiError::from(sortvis_kernels::Error::UnknownAlgorithm("x".into())).into_response();
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
    }
}
