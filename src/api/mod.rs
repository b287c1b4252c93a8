//! Match-analysis API integration.
//!
//! This module provides a typed interface to the external analysis
//! service: response shapes, normalization, and the HTTP client.

mod client;
mod converter;
pub mod types;

pub use client::{AnalysisPage, ApiClient, ApiClientBuilder, LatestLinks, MatchAction, MatchApi};
#[cfg(test)]
pub use client::MockMatchApi;
pub use converter::DataConverter;
pub use types::{
    ApiStatus, CollectionInfo, DataAnalysis, MatchEvent, MatchLink, MatchStatus,
    ScreenshotAnalysis, ScreenshotCapture, StatPair,
};
