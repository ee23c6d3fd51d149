//! # Request Classifier
//!
//! Pure functions over intercepted URLs. `route()` decides which pipeline a
//! navigation belongs to; `classify()` pulls the project and update params
//! out of fixed positional path segments.
//!
//! ```text
//! /projects/{project}/updates/{update}            → Route::Update
//! /projects/{project}/updates/{update}/comments   → Route::Comments
//! anything else                                   → Route::PassThrough
//! ```

use std::fmt;

use crate::core::types::NavigationRequest;

const PROJECT_SEGMENT: usize = 2;
const UPDATE_SEGMENT: usize = 4;

/// Project and update params, in their encoded form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectUpdateParams {
    pub project_param: String,
    pub update_param: String,
}

/// Where an intercepted URL should go.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Comments(NavigationRequest),
    Update(NavigationRequest),
    /// Not an update link; the embedded view loads it as-is.
    PassThrough(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    /// The path is too short to hold the segment at `index`.
    MissingSegment { index: usize, len: usize },
}

impl fmt::Display for ClassifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifyError::MissingSegment { index, len } => {
                write!(f, "missing path segment {index} (path has {len} segments)")
            }
        }
    }
}

impl std::error::Error for ClassifyError {}

/// Extracts the project param (segment 2) and update param (segment 4).
///
/// Segments are returned exactly as they appear in the encoded path. No
/// other validation is done: `/a/b/c/d` yields `("b", "d")`.
pub fn classify(request: &NavigationRequest) -> Result<ProjectUpdateParams, ClassifyError> {
    let segment = |index: usize| {
        request
            .segments
            .get(index)
            .cloned()
            .ok_or(ClassifyError::MissingSegment {
                index,
                len: request.segments.len(),
            })
    };

    Ok(ProjectUpdateParams {
        project_param: segment(PROJECT_SEGMENT)?,
        update_param: segment(UPDATE_SEGMENT)?,
    })
}

/// Routes a raw intercepted URL to the pipeline that should handle it.
pub fn route(raw: &str) -> Route {
    let Ok(request) = NavigationRequest::parse(raw) else {
        return Route::PassThrough(raw.to_string());
    };

    // Tolerate a trailing slash
    let mut segments: &[String] = &request.segments;
    if let Some((last, rest)) = segments.split_last()
        && last.is_empty()
        && segments.len() > 1
    {
        segments = rest;
    }

    let is_update_link = segments.len() >= 5
        && segments[0].is_empty()
        && segments[1] == "projects"
        && !segments[PROJECT_SEGMENT].is_empty()
        && matches!(segments[3].as_str(), "updates" | "posts")
        && !segments[UPDATE_SEGMENT].is_empty();

    let is_update = is_update_link && segments.len() == 5;
    let is_comments = is_update_link && segments.len() == 6 && segments[5] == "comments";

    if is_update {
        Route::Update(request)
    } else if is_comments {
        Route::Comments(request)
    } else {
        Route::PassThrough(raw.to_string())
    }
}
