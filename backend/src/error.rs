use crate::models::ErrorResponse;
use log::error;
use rocket::http::{ContentType, Status};
use rocket::request::Request;
use rocket::response::{self, Responder};
use rocket::Response;
use std::fmt;
use std::io::Cursor;
use std::time::Duration;
use thiserror::Error;

/// Which outbound YouTube call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamStage {
    Search,
    VideoDetails,
    ChannelStats,
}

impl fmt::Display for UpstreamStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UpstreamStage::Search => "search",
            UpstreamStage::VideoDetails => "video details",
            UpstreamStage::ChannelStats => "channel stats",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{stage} request failed: {message}")]
    Upstream {
        stage: UpstreamStage,
        message: String,
    },
    #[error("search did not finish within {0:?}")]
    TimedOut(Duration),
}

impl SearchError {
    pub fn upstream(stage: UpstreamStage, err: impl fmt::Display) -> Self {
        SearchError::Upstream {
            stage,
            message: err.to_string(),
        }
    }

    pub fn status(&self) -> Status {
        match self {
            SearchError::InvalidInput(_) => Status::BadRequest,
            SearchError::Upstream { .. } | SearchError::TimedOut(_) => Status::InternalServerError,
        }
    }

    /// Message shown to the caller. Upstream details stay in the log.
    pub fn public_message(&self) -> String {
        match self {
            SearchError::InvalidInput(msg) => msg.clone(),
            SearchError::Upstream { .. } | SearchError::TimedOut(_) => {
                "Failed to fetch YouTube data".to_string()
            }
        }
    }
}

impl<'r> Responder<'r, 'static> for SearchError {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();
        if status == Status::InternalServerError {
            error!("YouTube API error: {self}");
        }

        let body = ErrorResponse {
            error: self.public_message(),
        };
        let json = serde_json::to_string(&body).map_err(|e| {
            error!("Failed to serialize error response: {e:?}");
            Status::InternalServerError
        })?;

        Response::build()
            .status(status)
            .header(ContentType::JSON)
            .sized_body(json.len(), Cursor::new(json))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_is_a_bad_request() {
        let err = SearchError::InvalidInput("Search query is required".to_string());
        assert_eq!(err.status(), Status::BadRequest);
        assert_eq!(err.public_message(), "Search query is required");
    }

    #[test]
    fn upstream_details_are_not_exposed() {
        let err = SearchError::upstream(UpstreamStage::ChannelStats, "403 quotaExceeded");
        assert_eq!(err.status(), Status::InternalServerError);
        assert_eq!(err.public_message(), "Failed to fetch YouTube data");
        assert_eq!(
            err.to_string(),
            "channel stats request failed: 403 quotaExceeded"
        );
    }

    #[test]
    fn timeout_maps_to_server_error() {
        let err = SearchError::TimedOut(Duration::from_secs(30));
        assert_eq!(err.status(), Status::InternalServerError);
    }
}
