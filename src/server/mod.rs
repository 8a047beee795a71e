//! JSON API server

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::SiteConfig;
use crate::content::{extract_headings, outline, ContentError, Heading, Post, PostSummary, TocNode};
use crate::generator::Generator;
use crate::helpers::{paginate, Paginated};
use crate::{Blog, SiteCatalog};

/// Server state
struct ServerState {
    config: SiteConfig,
    catalog: SiteCatalog,
}

/// Errors returned to API clients as `{"error": ...}`
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<ContentError> for ApiError {
    fn from(e: ContentError) -> Self {
        tracing::error!("Content error: {}", e);
        ApiError::Internal("Failed to read content".to_string())
    }
}

#[derive(Debug, Deserialize)]
struct PageParams {
    page: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: Option<String>,
}

#[derive(Debug, Serialize)]
struct TocResponse {
    headings: Vec<Heading>,
    outline: Vec<TocNode>,
}

/// Build the API router for a blog
pub fn router(blog: &Blog) -> Router {
    let state = Arc::new(ServerState {
        config: blog.config.clone(),
        catalog: blog.catalog(),
    });

    Router::new()
        .route("/api/posts", get(list_posts))
        .route("/api/posts/:slug", get(get_post))
        .route("/api/posts/:slug/toc", get(post_toc))
        .route("/api/tags", get(list_tags))
        .route("/api/tags/:tag", get(posts_by_tag))
        .route("/api/authors/:author", get(posts_by_author))
        .route("/api/search", get(search))
        .route("/sitemap.xml", get(sitemap))
        .route("/robots.txt", get(robots))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the API server
pub async fn start(blog: &Blog, ip: &str, port: u16) -> Result<()> {
    let app = router(blog);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Serving posts from {:?}", blog.content_dir);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Run a catalog query on the blocking pool
async fn query<T, F>(state: &Arc<ServerState>, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&SiteCatalog) -> Result<T, ContentError> + Send + 'static,
{
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || f(&state.catalog))
        .await
        .map_err(|e| ApiError::Internal(format!("Query task failed: {}", e)))?
        .map_err(ApiError::from)
}

/// Page `page` of `posts` as summaries; 404 for a page that does not exist
/// unless the listing is empty and the first page was asked for
fn page_of(
    posts: &[Post],
    page: Option<usize>,
    per_page: usize,
) -> Result<Paginated<PostSummary>, ApiError> {
    let page = page.unwrap_or(1);
    let window = paginate(posts.len(), page, per_page);
    if !window.in_range() && !(posts.is_empty() && page == 1) {
        return Err(ApiError::NotFound(format!("Page {} does not exist", page)));
    }
    Ok(Paginated::from_slice(posts, page, per_page).map(|p| PostSummary::from(&p)))
}

async fn list_posts(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<PageParams>,
) -> Result<Json<Paginated<PostSummary>>, ApiError> {
    let posts = query(&state, |c| c.list_all()).await?;
    page_of(&posts, params.page, state.config.per_page).map(Json)
}

async fn get_post(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Result<Json<Post>, ApiError> {
    let lookup = slug.clone();
    query(&state, move |c| c.get_by_slug(&lookup))
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No post '{}'", slug)))
}

async fn post_toc(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Result<Json<TocResponse>, ApiError> {
    let lookup = slug.clone();
    let post = query(&state, move |c| c.get_by_slug(&lookup))
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No post '{}'", slug)))?;

    let headings = extract_headings(&post.content);
    let outline = outline(&headings);
    Ok(Json(TocResponse { headings, outline }))
}

async fn list_tags(State(state): State<Arc<ServerState>>) -> Result<impl IntoResponse, ApiError> {
    let tags = query(&state, |c| c.tag_counts()).await?;
    Ok(Json(tags))
}

async fn posts_by_tag(
    State(state): State<Arc<ServerState>>,
    Path(tag): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Json<Paginated<PostSummary>>, ApiError> {
    let lookup = tag.clone();
    let posts = query(&state, move |c| c.by_tag(&lookup)).await?;
    if posts.is_empty() {
        return Err(ApiError::NotFound(format!("No posts tagged '{}'", tag)));
    }
    page_of(&posts, params.page, state.config.per_page).map(Json)
}

async fn posts_by_author(
    State(state): State<Arc<ServerState>>,
    Path(author): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Json<Paginated<PostSummary>>, ApiError> {
    let lookup = author.clone();
    let posts = query(&state, move |c| c.by_author(&lookup)).await?;
    if posts.is_empty() {
        return Err(ApiError::NotFound(format!("No posts by '{}'", author)));
    }
    page_of(&posts, params.page, state.config.per_page).map(Json)
}

async fn search(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<PostSummary>>, ApiError> {
    let posts = query(&state, move |c| c.by_search(params.q.as_deref())).await?;
    Ok(Json(posts.iter().map(PostSummary::from).collect()))
}

async fn sitemap(State(state): State<Arc<ServerState>>) -> Result<Response, ApiError> {
    let posts = query(&state, |c| c.list_all()).await?;
    let xml = Generator::new(&state.config).sitemap(&posts);
    Ok(([(header::CONTENT_TYPE, "application/xml")], xml).into_response())
}

async fn robots(State(state): State<Arc<ServerState>>) -> Response {
    let robots = Generator::new(&state.config).robots();
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], robots).into_response()
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}
