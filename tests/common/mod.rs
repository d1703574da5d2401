use axum::Router;
use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::time::{Duration, sleep};

async fn hit() -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    headers.insert("x-nextjs-cache", "HIT".parse().unwrap());
    (headers, "cached page")
}

async fn err() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded")
}

// /slow/1500 holds the response headers back for 1500ms
async fn slow(Path(ms): Path<u64>) -> impl IntoResponse {
    sleep(Duration::from_millis(ms)).await;
    "slept"
}

async fn redir() -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    headers.insert(header::LOCATION, "/hit".parse().unwrap());
    (StatusCode::FOUND, headers, "")
}

/// Returns (base_url, shutdown_sender, join_handle)
pub async fn spawn_test_server() -> (String, oneshot::Sender<()>, tokio::task::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{addr}");

    let app = Router::new()
        .route("/hit", get(hit))
        .route("/err", get(err))
        .route("/slow/{ms}", get(slow))
        .route("/redir", get(redir));

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    (base_url, shutdown_tx, handle)
}
