//! HTTP surface: the layout document, the carousel image listing, and a
//! server-rendered view of the stored frames.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
    routing::get,
    Json, Router,
};
use frameboard_core::{
    CollectionState, FrameDocument, FrameStore, FrameView, ImageListing, JsonFileStore, LayoutConfig,
};
use serde_json::{json, Value};

pub struct AppState {
    pub store: JsonFileStore,
    pub image_dir: PathBuf,
    pub layout: LayoutConfig,
}

pub fn build_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/frames", get(get_frames).post(save_frames))
        .route("/frames/view", get(frames_view))
        .route("/images", get(list_images))
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

/// Stored layout, or the empty document when the file is missing or unreadable.
async fn get_frames(State(state): State<Arc<AppState>>) -> Json<FrameDocument> {
    match state.store.fetch().await {
        Ok(doc) => Json(doc),
        Err(e) => {
            tracing::warn!(path = %state.store.path().display(), error = %e, "no stored layout; serving empty document");
            Json(FrameDocument::default())
        }
    }
}

async fn save_frames(
    State(state): State<Arc<AppState>>,
    Json(doc): Json<FrameDocument>,
) -> (StatusCode, Json<Value>) {
    match state.store.store(&doc).await {
        Ok(()) => {
            tracing::info!(frames = doc.frames.len(), frame_count = doc.frame_count, "layout saved");
            (StatusCode::OK, Json(json!({ "status": "ok" })))
        }
        Err(e) => {
            tracing::error!(error = %e, "layout save failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Failed to save" })),
            )
        }
    }
}

/// GET /frames/view: HTML fragment with every stored frame, unlocked.
async fn frames_view(State(state): State<Arc<AppState>>) -> Html<String> {
    let doc = state.store.fetch().await.unwrap_or_default();
    let frames = CollectionState::from_document(&doc, &state.layout);
    Html(frames.frames().map(|f| FrameView::new(f, false).to_html()).collect())
}

async fn list_images(State(state): State<Arc<AppState>>) -> Json<ImageListing> {
    let images = match png_urls(&state.image_dir).await {
        Ok(images) => images,
        Err(e) => {
            tracing::warn!(dir = %state.image_dir.display(), error = %e, "image directory unreadable");
            Vec::new()
        }
    };
    Json(ImageListing { images })
}

/// `.png` files directly under `dir` as sorted, percent-encoded `/name` paths.
pub async fn png_urls(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.to_ascii_lowercase().ends_with(".png") {
            names.push(name);
        }
    }
    names.sort();
    Ok(names.iter().map(|n| encode_uri(&format!("/{n}"))).collect())
}

/// Percent-encode a URI path, leaving the URI reserved and mark characters
/// readable so names like `beach (2).png` keep their punctuation.
fn encode_uri(path: &str) -> String {
    const KEEP: &str = ";,/?:@&=+$-_.!~*'()#";
    let mut out = String::with_capacity(path.len());
    let mut buf = [0u8; 4];
    for c in path.chars() {
        if c.is_ascii_alphanumeric() || KEEP.contains(c) {
            out.push(c);
        } else {
            out.push_str(&urlencoding::encode(c.encode_utf8(&mut buf)));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use frameboard_core::{
        Dashboard, FrameboardError, HttpFrameStore, LoadSource, MemoryCache, MemoryStore, PersistenceManager,
        Viewport,
    };
    use tower::ServiceExt;

    fn app(dir: &Path) -> Router {
        build_app(Arc::new(AppState {
            store: JsonFileStore::new(dir.join("frames.json")),
            image_dir: dir.to_path_buf(),
            layout: LayoutConfig::default(),
        }))
    }

    async fn body_string(resp: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn image_urls_keep_uri_punctuation() {
        assert_eq!(encode_uri("/beach (2)!.png"), "/beach%20(2)!.png");
        assert_eq!(encode_uri("/mom's & dad's.png"), "/mom's%20&%20dad's.png");
        assert_eq!(encode_uri("/café.png"), "/caf%C3%A9.png");
    }

    /// Serve the router on an ephemeral port; returns its base URL.
    async fn serve(dir: &Path) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = app(dir);
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn http_store_round_trips_through_the_gateway() {
        let dir = tempfile::tempdir().unwrap();
        let store = HttpFrameStore::new(serve(dir.path()).await);
        assert_eq!(store.fetch().await.unwrap(), FrameDocument::empty());

        let mut board = Dashboard::new(
            LayoutConfig::default(),
            PersistenceManager::new(Arc::new(store.clone()), Arc::new(MemoryCache::new())),
        );
        let view = Viewport::new(1280.0, 800.0, 60.0);
        board.add_frame(&view);
        assert_eq!(board.flush().await, 1);
        board.add_frame(&view);
        assert_eq!(board.flush().await, 1);
        board.set_title(2, "Errands").unwrap();
        assert_eq!(board.flush().await, 1);

        let fetched = store.fetch().await.unwrap();
        assert_eq!(fetched, board.state().to_document());
        assert_eq!(fetched.frames[1].title, "Errands");
    }

    #[tokio::test]
    async fn non_success_status_falls_back_to_cache() {
        let dir = tempfile::tempdir().unwrap();
        let store = HttpFrameStore::new(format!("{}/missing", serve(dir.path()).await));
        assert!(matches!(store.fetch().await, Err(FrameboardError::Backend(404))));
        assert!(matches!(
            store.store(&FrameDocument::empty()).await,
            Err(FrameboardError::Backend(404))
        ));
        assert!(store.list_images().await.is_err());

        let cached = r#"{"frameCount":1,"frames":[{"id":1,"title":"cached"}]}"#;
        let manager = PersistenceManager::new(Arc::new(store), Arc::new(MemoryCache::with_raw(cached)));
        let outcome = manager.load().await;
        assert_eq!(outcome.source, LoadSource::Cache);
        assert_eq!(outcome.document.frames[0].title, "cached");
    }

    #[tokio::test]
    async fn image_listing_feeds_the_carousel() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.png", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        let base = serve(dir.path()).await;
        let store = HttpFrameStore::new(base.as_str());
        assert_eq!(store.list_images().await.unwrap(), vec!["/a.png", "/b.png"]);

        let mut board = Dashboard::new(
            LayoutConfig::default(),
            PersistenceManager::new(Arc::new(MemoryStore::new()), Arc::new(MemoryCache::new())),
        );
        let photos = board.add_carousel_frame(&Viewport::new(1280.0, 800.0, 60.0));
        assert_eq!(board.refresh_images(&store).await, 2);
        assert_eq!(board.carousel(photos).unwrap().current(), Some("/a.png"));

        let offline = HttpFrameStore::new(format!("{base}/missing"));
        assert_eq!(board.refresh_images(&offline).await, 2);
        assert_eq!(board.carousel(photos).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn health_ok() {
        let dir = tempfile::tempdir().unwrap();
        let resp = app(dir.path())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_string(resp).await, "OK");
    }

    #[tokio::test]
    async fn missing_file_serves_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let resp = app(dir.path())
            .oneshot(Request::builder().uri("/frames").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let v: Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(v, json!({ "frameCount": 0, "frames": [] }));
    }

    #[tokio::test]
    async fn corrupt_file_serves_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("frames.json"), "{{{").unwrap();
        let resp = app(dir.path())
            .oneshot(Request::builder().uri("/frames").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let v: Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(v["frameCount"], 0);
    }

    #[tokio::test]
    async fn post_then_get_returns_saved_layout() {
        let dir = tempfile::tempdir().unwrap();
        let payload = json!({
            "frameCount": 2,
            "frames": [{
                "id": 2, "left": "40px", "top": "100px", "width": "220px", "height": "150px",
                "minimized": false, "title": "Todo", "content": "milk"
            }]
        });
        let resp = app(dir.path())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/frames")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let v: Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(v, json!({ "status": "ok" }));

        let resp = app(dir.path())
            .oneshot(Request::builder().uri("/frames").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let doc: FrameDocument = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(doc.frame_count, 2);
        assert_eq!(doc.frames[0].title, "Todo");
        assert_eq!(doc.frames[0].left, Some(40.0));
    }

    #[tokio::test]
    async fn unwritable_store_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be makes the rename fail.
        std::fs::create_dir(dir.path().join("frames.json")).unwrap();
        std::fs::write(dir.path().join("frames.json").join("keep"), "x").unwrap();
        let resp = app(dir.path())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/frames")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"frameCount":0,"frames":[]}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let v: Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(v, json!({ "message": "Failed to save" }));
    }

    #[tokio::test]
    async fn images_lists_only_png_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a photo.PNG", "notes.txt", "c.jpg"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        std::fs::create_dir(dir.path().join("dir.png")).unwrap();
        let resp = app(dir.path())
            .oneshot(Request::builder().uri("/images").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let v: Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(v, json!({ "images": ["/a%20photo.PNG", "/b.png"] }));
    }

    #[tokio::test]
    async fn images_missing_dir_is_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let resp = app(&dir.path().join("gone"))
            .oneshot(Request::builder().uri("/images").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let v: Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(v, json!({ "images": [] }));
    }

    #[tokio::test]
    async fn view_renders_stored_frames() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("frames.json"),
            r#"{"frameCount":1,"frames":[{"id":1,"left":"5px","top":"70px","width":"200px","height":"150px","minimized":false,"title":"<Plans>","content":"hi"}]}"#,
        )
        .unwrap();
        let resp = app(dir.path())
            .oneshot(Request::builder().uri("/frames/view").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let html = body_string(resp).await;
        assert!(html.contains("&lt;Plans&gt;"));
        assert!(html.contains("left: 5px"));
    }
}
