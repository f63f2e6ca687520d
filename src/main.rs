//! rustdblp - DBLP Author Publication Explorer
//!
//! A Rust microservice for resolving author names via the DBLP search API
//! and scraping their profile pages into structured publication records.
//!
//! ## Usage
//!
//! ### CLI Mode
//! ```bash
//! rustdblp search "Donald E. Knuth"
//! ```
//!
//! ### HTTP Server Mode
//! ```bash
//! rustdblp serve --port 3000
//! ```

use anyhow::{Context, Result};
use axum::{
    extract::{DefaultBodyLimit, Multipart, Query, State},
    response::{Html, Redirect},
    routing::{get, post},
    Form, Json, Router,
};
use clap::{Parser, Subcommand};
use rustdblp::pipeline::SearchPipeline;
use rustdblp::profile::Publication;
use rustdblp::store::{PublicationStore, DEFAULT_STORE_PATH};
use rustdblp::{bibliography, resolver};
use serde::Deserialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn, Level};
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

/// Maximum accepted upload size (a .bib file, not a dataset)
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

// ============================================================================
// CLI Definition
// ============================================================================

/// DBLP Author Publication Explorer - Rust Microservice
#[derive(Parser)]
#[command(name = "rustdblp")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search one author's publications and persist them as JSON
    Search {
        /// Author name (free text)
        name: String,

        /// Mirror site URL (default: https://dblp.org)
        #[arg(long)]
        mirror: Option<String>,

        /// Output file path (env: RUSTDBLP_STORE)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Resolve an author name to their profile URL
    Resolve {
        /// Author name (free text)
        name: String,

        /// Mirror site URL (default: https://dblp.org)
        #[arg(long)]
        mirror: Option<String>,
    },

    /// Run as HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Output file path (env: RUSTDBLP_STORE)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .init();

    match cli.command {
        Commands::Search {
            name,
            mirror,
            output,
        } => run_search(name, mirror, output).await,
        Commands::Resolve { name, mirror } => run_resolve(name, mirror).await,
        Commands::Serve { port, host, output } => run_server(host, port, output).await,
    }
}

/// Resolve the store path: flag, then RUSTDBLP_STORE, then default.
fn store_path(output: Option<PathBuf>) -> PathBuf {
    output
        .or_else(|| std::env::var_os("RUSTDBLP_STORE").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH))
}

/// Build a pipeline with an optional (validated) mirror base URL.
fn build_pipeline(store: PublicationStore, mirror: Option<String>) -> Result<SearchPipeline> {
    let pipeline = SearchPipeline::new(store)?;
    match mirror {
        Some(mirror) => {
            Url::parse(&mirror).with_context(|| format!("Invalid --mirror URL: {}", mirror))?;
            Ok(pipeline.with_base_url(&mirror))
        }
        None => Ok(pipeline),
    }
}

// ============================================================================
// CLI Commands
// ============================================================================

async fn run_search(name: String, mirror: Option<String>, output: Option<PathBuf>) -> Result<()> {
    let store = PublicationStore::with_path(store_path(output));
    let pipeline = build_pipeline(store, mirror)?;

    let publications = pipeline.search(&name).await;

    if publications.is_empty() {
        println!("No publications found for \"{}\".", name);
    } else {
        println!("Found {} publications for \"{}\":\n", publications.len(), name);
        for publication in &publications {
            println!("  [{}] {}", publication.year, publication.title);
            println!("      {} — {}", publication.authors, publication.kind);
        }
    }

    println!("\nSaved: {}", pipeline.store().path().display());
    Ok(())
}

async fn run_resolve(name: String, mirror: Option<String>) -> Result<()> {
    let pipeline = build_pipeline(PublicationStore::default(), mirror)?;

    match pipeline.resolve(&name).await {
        Some(url) => println!("{}", url),
        None => println!("No profile found for \"{}\".", name),
    }

    Ok(())
}

// ============================================================================
// HTTP Server
// ============================================================================

struct AppState {
    pipeline: SearchPipeline,
}

async fn run_server(host: String, port: u16, output: Option<PathBuf>) -> Result<()> {
    let store = PublicationStore::with_path(store_path(output));
    let app_state = Arc::new(AppState {
        pipeline: SearchPipeline::new(store)?,
    });

    let app = Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/upload", post(upload_handler))
        .route("/search", get(search_get_handler).post(search_form_handler))
        .route("/api/search", post(api_search_handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .context("Invalid host:port")?;

    info!(resolver = resolver::DEFAULT_DBLP_URL, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    println!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}

/// Health check endpoint
async fn health_handler() -> &'static str {
    "OK"
}

/// Index page with the upload and search forms
async fn index_handler() -> Html<String> {
    render_index(None, None, None)
}

/// Bibliography upload: list the distinct authors found in the file
async fn upload_handler(
    State(_state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> std::result::Result<Html<String>, Redirect> {
    let mut upload: Option<(String, String)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        warn!(error = %e, "Failed to read upload form");
        Redirect::to("/")
    })? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("").to_string();
        let content = field.text().await.map_err(|e| {
            warn!(error = %e, "Failed to read uploaded file");
            Redirect::to("/")
        })?;
        upload = Some((filename, content));
    }

    // Mirror the original UI: no file, empty selection, or a non-.bib
    // extension silently returns to the index page.
    let Some((filename, content)) = upload else {
        return Err(Redirect::to("/"));
    };
    if filename.is_empty() || !filename.to_lowercase().ends_with(".bib") {
        return Err(Redirect::to("/"));
    }

    info!(file = %filename, bytes = content.len(), "Bibliography uploaded");

    match bibliography::distinct_authors(&content) {
        Ok(authors) => Ok(render_index(
            None,
            Some((filename.as_str(), authors.as_slice())),
            None,
        )),
        Err(e) => {
            warn!(file = %filename, error = %e, "Bibliography parse failed");
            Ok(render_index(
                Some(&format!("Could not parse {}: {}", filename, e)),
                None,
                None,
            ))
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchForm {
    author: Option<String>,
}

/// Author search via the index form
async fn search_form_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SearchForm>,
) -> std::result::Result<Html<String>, Redirect> {
    run_web_search(&state, form.author).await
}

/// Author search via link (used by the clickable author list)
async fn search_get_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchForm>,
) -> std::result::Result<Html<String>, Redirect> {
    run_web_search(&state, query.author).await
}

async fn run_web_search(
    state: &AppState,
    author: Option<String>,
) -> std::result::Result<Html<String>, Redirect> {
    let author = author.map(|a| a.trim().to_string()).unwrap_or_default();
    if author.is_empty() {
        return Err(Redirect::to("/"));
    }

    let publications = state.pipeline.search(&author).await;
    Ok(render_index(
        None,
        None,
        Some((author.as_str(), publications.as_slice())),
    ))
}

/// Search request body
#[derive(Debug, Deserialize)]
struct SearchRequest {
    author: String,
}

/// JSON search endpoint: maps the queried name to its publication list
async fn api_search_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SearchRequest>,
) -> Json<HashMap<String, Vec<Publication>>> {
    info!(author = %req.author, "API search request");

    let author = req.author.trim().to_string();
    if author.is_empty() {
        error!("API search with empty author name");
        return Json(HashMap::new());
    }

    let publications = state.pipeline.search(&author).await;
    Json(HashMap::from([(author, publications)]))
}

// ============================================================================
// HTML Rendering
// ============================================================================

const INDEX_HTML: &str = include_str!("../templates/index.html");

/// Render the index page, filling the flash/authors/results slots.
fn render_index(
    flash: Option<&str>,
    authors: Option<(&str, &[String])>,
    results: Option<(&str, &[Publication])>,
) -> Html<String> {
    let mut page = INDEX_HTML.to_string();

    if let Some(message) = flash {
        page = page.replace(
            "<!--FLASH-->",
            &format!("<p class=\"flash\">{}</p>", escape_html(message)),
        );
    }

    if let Some((filename, authors)) = authors {
        page = page.replace("<!--AUTHORS-->", &render_authors(filename, authors));
    }

    if let Some((author, publications)) = results {
        page = page.replace("<!--RESULTS-->", &render_results(author, publications));
    }

    Html(page)
}

/// Author list fragment: each name links to a prefilled search.
fn render_authors(filename: &str, authors: &[String]) -> String {
    let mut html = format!(
        "<h2>{} authors in {}</h2>\n<ul class=\"authors\">\n",
        authors.len(),
        escape_html(filename)
    );
    for author in authors {
        html.push_str(&format!(
            "<li><a href=\"/search?author={}\">{}</a></li>\n",
            urlencoding::encode(author),
            escape_html(author)
        ));
    }
    html.push_str("</ul>\n");
    html
}

/// Results table fragment for one author's publication list.
fn render_results(author: &str, publications: &[Publication]) -> String {
    if publications.is_empty() {
        return format!(
            "<h2>Publications for {}</h2>\n<p>No publications found.</p>\n",
            escape_html(author)
        );
    }

    let mut html = format!(
        "<h2>Publications for {} ({})</h2>\n<table>\n\
         <tr><th>Title</th><th>Authors</th><th>Year</th><th>Type</th><th>Description</th></tr>\n",
        escape_html(author),
        publications.len()
    );
    for publication in publications {
        html.push_str(&format!(
            "<tr><td><a href=\"{}\">{}</a></td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(&publication.link),
            escape_html(&publication.title),
            escape_html(&publication.authors),
            escape_html(&publication.year),
            escape_html(&publication.kind),
            escape_html(&publication.description),
        ));
    }
    html.push_str("</table>\n");
    html
}

/// Minimal HTML entity escaping for interpolated text.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
