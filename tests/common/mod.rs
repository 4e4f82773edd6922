//! Shared fixtures: a throwaway SQLite file and an in-process stand-in for TMDB.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, Query, State},
    http::{Request, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use movie_shelf::{
    AppState, build_router,
    config::Config,
    db,
    store::MovieStore,
    tmdb::{self, TmdbClient},
};
use serde_json::json;
use tempfile::TempDir;
use tower::util::ServiceExt;

pub const API_KEY: &str = "test-key";
pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";

pub struct TestApp {
    pub router: Router,
    pub store: MovieStore,
    pub tmdb_hits: Arc<AtomicUsize>,
    _dir: TempDir,
}

impl TestApp {
    pub fn tmdb_calls(&self) -> usize {
        self.tmdb_hits.load(Ordering::SeqCst)
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(&self, uri: &str, body: &str) -> Response {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }
}

pub async fn setup_app() -> TestApp {
    setup_app_with(API_KEY, false).await
}

pub async fn setup_app_with(api_key: &str, persist_rankings: bool) -> TestApp {
    let (tmdb_base_url, tmdb_hits) = spawn_fake_tmdb().await;
    build_app(api_key, persist_rankings, tmdb_base_url, tmdb_hits, 5).await
}

/// TMDB accepts connections but never answers; requests give up after one second.
pub async fn setup_app_with_silent_tmdb() -> TestApp {
    let tmdb_base_url = spawn_silent_tmdb().await;
    build_app(API_KEY, false, tmdb_base_url, Arc::new(AtomicUsize::new(0)), 1).await
}

async fn build_app(
    api_key: &str,
    persist_rankings: bool,
    tmdb_base_url: String,
    tmdb_hits: Arc<AtomicUsize>,
    http_timeout_secs: u64,
) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let database_url = format!("sqlite://{}?mode=rwc", dir.path().join("movies.db").display());

    let config = Config {
        addr: "127.0.0.1:0".parse().unwrap(),
        tmdb_api_key: api_key.to_string(),
        tmdb_base_url,
        tmdb_image_base_url: IMAGE_BASE.to_string(),
        tmdb_rps: 50,
        http_timeout_secs,
        database_url,
        persist_rankings,
    };

    let conn = db::connect_and_migrate(&config.database_url).await.unwrap();
    let store = MovieStore::new(conn);
    let http = tmdb::http_client(Duration::from_secs(config.http_timeout_secs)).unwrap();
    let tmdb = TmdbClient::new(
        http,
        config.tmdb_api_key.clone(),
        config.tmdb_base_url.clone(),
        config.tmdb_image_base_url.clone(),
        config.tmdb_rps,
    );

    let state = Arc::new(AppState {
        config: Arc::new(config),
        store: store.clone(),
        tmdb: Arc::new(tmdb),
    });

    TestApp { router: build_router(state), store, tmdb_hits, _dir: dir }
}

pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(response: &Response) -> Option<&str> {
    response.headers().get(header::LOCATION).and_then(|v| v.to_str().ok())
}

pub fn set_cookie(response: &Response) -> Option<&str> {
    response.headers().get(header::SET_COOKIE).and_then(|v| v.to_str().ok())
}

async fn spawn_fake_tmdb() -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route("/search/movie", get(search))
        .route("/movie/{id}", get(details))
        .with_state(hits.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), hits)
}

async fn spawn_silent_tmdb() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    format!("http://{addr}")
}

fn authorized(params: &HashMap<String, String>) -> bool {
    params.get("api_key").map(String::as_str) == Some(API_KEY)
}

async fn search(
    State(hits): State<Arc<AtomicUsize>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    hits.fetch_add(1, Ordering::SeqCst);
    if !authorized(&params) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "status_code": 7 }))).into_response();
    }

    let query = params.get("query").map(String::as_str).unwrap_or_default();
    let results = if query.eq_ignore_ascii_case("inception") {
        json!([
            {
                "id": 27205,
                "title": "Inception",
                "release_date": "2010-07-15",
                "overview": "Cobb, a skilled thief who commits corporate espionage.",
                "poster_path": "/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg"
            },
            {
                "id": 64956,
                "title": "Inception: The Cobol Job",
                "release_date": "2010-12-07",
                "overview": null,
                "poster_path": null
            }
        ])
    } else if query == "broken" {
        return Json(json!({ "page": 1 })).into_response();
    } else {
        json!([])
    };

    Json(json!({ "page": 1, "results": results })).into_response()
}

async fn details(
    State(hits): State<Arc<AtomicUsize>>,
    Path(id): Path<i64>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    hits.fetch_add(1, Ordering::SeqCst);
    if !authorized(&params) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "status_code": 7 }))).into_response();
    }
    if params.get("language").map(String::as_str) != Some("en-US") {
        return StatusCode::BAD_REQUEST.into_response();
    }

    match id {
        27205 => Json(json!({
            "id": 27205,
            "title": "Inception",
            "release_date": "2010-07-15",
            "overview": "Cobb, a skilled thief who commits corporate espionage.",
            "poster_path": "/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg"
        }))
        .into_response(),
        550 => Json(json!({
            "id": 550,
            "title": "Fight Club",
            "release_date": "1999-10-15",
            "overview": "A ticking-time-bomb insomniac.",
            "poster_path": null
        }))
        .into_response(),
        13 => Json(json!({ "id": 13, "overview": "no title here" })).into_response(),
        500 => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ => (StatusCode::NOT_FOUND, Json(json!({ "status_code": 34 }))).into_response(),
    }
}
