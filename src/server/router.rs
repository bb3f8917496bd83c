//! Request routing.
//!
//! URL layout:
//!
//! | Path                       | Page                               |
//! |----------------------------|------------------------------------|
//! | `/`, `/index.html`         | landing page (projects)            |
//! | `/fundamentals/`           | Fundamentals listing               |
//! | `/fundamentals/<name>`     | source of one sample               |
//! | `/projects/<name>/...`     | static files of a project          |
//! | `/assets/style.css`, `.js` | embedded assets                    |
//! | anything else              | 404 page                           |

use tokio::fs;
use tracing::{debug, error};

use super::http::{content_type_for, percent_decode, Method, Request, Response};
use crate::render::{SCRIPT_JS, STYLE_CSS};
use crate::site::{Section, Site, SiteError, FUNDAMENTALS_MOUNT};

/// Where a request path leads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Landing,
    Fundamentals,
    Sample(String),
    /// Decoded segments below /projects
    ProjectFile(Vec<String>),
    Asset {
        content_type: &'static str,
        body: &'static str,
    },
    Redirect(String),
    NotFound,
}

/// Resolve a request path (query string already stripped)
pub fn resolve(path: &str) -> Route {
    let Some(rest) = path.strip_prefix('/') else {
        return Route::NotFound;
    };

    let Some(segments) = rest
        .split('/')
        .map(percent_decode)
        .collect::<Option<Vec<String>>>()
    else {
        return Route::NotFound;
    };
    let segs: Vec<&str> = segments.iter().map(String::as_str).collect();

    match segs.as_slice() {
        [""] | ["index.html"] => Route::Landing,
        ["fundamentals"] => Route::Redirect(format!("{}/", FUNDAMENTALS_MOUNT)),
        ["fundamentals", ""] | ["fundamentals", "index.html"] => Route::Fundamentals,
        ["fundamentals", name] => Route::Sample(name.to_string()),
        ["projects"] | ["projects", ""] => Route::Redirect("/".to_string()),
        ["projects", files @ ..] => project_route(files),
        ["assets", "style.css"] => Route::Asset {
            content_type: "text/css; charset=utf-8",
            body: STYLE_CSS,
        },
        ["assets", "script.js"] => Route::Asset {
            content_type: "text/javascript; charset=utf-8",
            body: SCRIPT_JS,
        },
        _ => Route::NotFound,
    }
}

fn project_route(files: &[&str]) -> Route {
    let mut segments: Vec<String> = files.iter().map(|s| s.to_string()).collect();

    // Trailing slash serves the directory's index page
    if segments.last().is_some_and(|s| s.is_empty()) {
        segments.pop();
        segments.push("index.html".to_string());
    }

    if segments.iter().any(|s| s.is_empty()) {
        return Route::NotFound;
    }
    Route::ProjectFile(segments)
}

/// Produce the response for a request. Never fails: problems become 404
/// or 500 pages.
pub async fn respond(site: &Site, request: &Request) -> Response {
    if request.method == Method::Other {
        return Response::text(405, "Method Not Allowed").with_header("Allow", "GET, HEAD");
    }

    match resolve(&request.path) {
        Route::Landing => page(site, site.render_section(Section::Projects).await),
        Route::Fundamentals => page(site, site.render_section(Section::Fundamentals).await),
        Route::Sample(name) => page(site, site.render_source(&name).await),
        Route::ProjectFile(segments) => project_file(site, &request.path, &segments).await,
        Route::Asset { content_type, body } => Response::new(200, content_type, body),
        Route::Redirect(location) => Response::text(301, "").with_header("Location", location),
        Route::NotFound => not_found(site),
    }
}

fn page(site: &Site, rendered: Result<String, SiteError>) -> Response {
    match rendered {
        Ok(html) => Response::html(200, html),
        Err(e) if e.is_not_found() => {
            debug!("{}", e);
            not_found(site)
        }
        Err(e) => {
            error!("Failed to render page: {}", e);
            Response::text(500, "Internal Server Error")
        }
    }
}

async fn project_file(site: &Site, request_path: &str, segments: &[String]) -> Response {
    let Some(path) = site.project_file(segments) else {
        return not_found(site);
    };

    match fs::metadata(&path).await {
        Ok(meta) if meta.is_dir() => {
            Response::text(301, "").with_header("Location", format!("{}/", request_path))
        }
        Ok(_) => match fs::read(&path).await {
            Ok(body) => Response::new(200, content_type_for(&path), body),
            Err(e) => {
                debug!(path = %path.display(), "Failed to read project file: {}", e);
                not_found(site)
            }
        },
        Err(_) => not_found(site),
    }
}

/// The 404 page, falling back to plain text if the template fails
pub fn not_found(site: &Site) -> Response {
    match site.render_not_found() {
        Ok(html) => Response::html(404, html),
        Err(e) => {
            error!("Failed to render 404 page: {}", e);
            Response::text(404, "404 - Page Not Found")
        }
    }
}
