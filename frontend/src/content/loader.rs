use gloo_net::http::Request;
use log::{error, info};
use thiserror::Error;

use super::ContentDocument;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to fetch {path}: {source}")]
    Fetch {
        path: String,
        #[source]
        source: gloo_net::Error,
    },
    #[error("failed to fetch {path}: HTTP {status}")]
    Status { path: String, status: u16 },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

pub fn parse_document(path: &str, body: &str) -> Result<ContentDocument, ContentError> {
    serde_json::from_str(body).map_err(|source| ContentError::Parse {
        path: path.to_string(),
        source,
    })
}

pub async fn fetch_document(path: &str) -> Result<ContentDocument, ContentError> {
    let fetch_error = |source| ContentError::Fetch {
        path: path.to_string(),
        source,
    };

    let response = Request::get(path).send().await.map_err(fetch_error)?;
    if !response.ok() {
        return Err(ContentError::Status {
            path: path.to_string(),
            status: response.status(),
        });
    }
    let body = response.text().await.map_err(fetch_error)?;
    parse_document(path, &body)
}

/// Fetches the page content once. Any failure is logged and yields an empty
/// document so the page still renders its skeleton.
pub async fn load_content(path: &str) -> ContentDocument {
    match fetch_document(path).await {
        Ok(document) => {
            info!(
                "Company data loaded from {} ({} services, {} testimonials)",
                path,
                document.services.len(),
                document.testimonials.len()
            );
            document
        }
        Err(e) => {
            error!("{}", e);
            ContentDocument::default()
        }
    }
}
