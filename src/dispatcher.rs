//! Runs the network side of actions.
//!
//! Each request is its own tokio task that reports back through the action
//! channel. Nothing is de-duplicated or cancelled; a slow response for a
//! match that is no longer on screen is dropped by the store.

use crate::api::MatchApi;
use crate::config::ApiConfig;
use crate::error::Result;
use crate::state::{Action, RequestKind};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Spawns API calls for request actions.
#[derive(Clone)]
pub struct Dispatcher {
    api: Arc<dyn MatchApi>,
    action_tx: mpsc::UnboundedSender<Action>,
    analyses_limit: u32,
    match_analyses_limit: u32,
}

impl Dispatcher {
    pub fn new(
        api: Arc<dyn MatchApi>,
        config: &ApiConfig,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        Self {
            api,
            action_tx,
            analyses_limit: config.analyses_limit,
            match_analyses_limit: config.match_analyses_limit,
        }
    }

    /// Start the requests behind `action`.
    ///
    /// `open_match` is the match on the detail screen; actions about "the
    /// current match" do nothing without one.
    pub fn perform(&self, action: &Action, open_match: Option<&str>) -> Vec<JoinHandle<()>> {
        let api = Arc::clone(&self.api);
        match action {
            Action::CheckStatus => vec![self.spawn(RequestKind::Status, async move {
                api.status().await.map(Action::StatusLoaded)
            })],
            Action::LoadMatches => vec![self.spawn(RequestKind::Matches, async move {
                api.latest_links().await.map(Action::MatchesLoaded)
            })],
            Action::CollectLinks => vec![self.spawn(RequestKind::Collect, async move {
                api.collect_links().await.map(Action::LinksCollected)
            })],
            Action::LoadHistory => {
                let limit = self.analyses_limit;
                vec![self.spawn(RequestKind::History, async move {
                    api.screenshot_analyses(limit).await.map(Action::HistoryLoaded)
                })]
            }
            Action::OpenDetail(target) => vec![self.load_detail(target.match_id.clone())],
            Action::RefreshDetail => match open_match {
                Some(id) => vec![
                    self.load_detail(id.to_string()),
                    self.data_analysis(id.to_string()),
                ],
                None => Vec::new(),
            },
            Action::GenerateDataAnalysis => open_match
                .map(|id| self.data_analysis(id.to_string()))
                .into_iter()
                .collect(),
            Action::GenerateScreenshotAnalysis => open_match
                .map(|id| {
                    let match_id = id.to_string();
                    self.spawn(RequestKind::ScreenshotAnalysis, async move {
                        let analysis = api.generate_screenshot_analysis(&match_id).await?;
                        Ok(Action::AnalysisGenerated { match_id, analysis })
                    })
                })
                .into_iter()
                .collect(),
            Action::CaptureScreenshot => open_match
                .map(|id| {
                    let match_id = id.to_string();
                    self.spawn(RequestKind::Screenshot, async move {
                        let capture = api.capture_screenshot(&match_id).await?;
                        Ok(Action::ScreenshotCaptured { match_id, capture })
                    })
                })
                .into_iter()
                .collect(),
            _ => Vec::new(),
        }
    }

    fn load_detail(&self, match_id: String) -> JoinHandle<()> {
        let api = Arc::clone(&self.api);
        let limit = self.match_analyses_limit;
        self.spawn(RequestKind::Detail, async move {
            let page = api.match_screenshot_analyses(&match_id, limit).await?;
            Ok(Action::DetailLoaded { match_id, page })
        })
    }

    fn data_analysis(&self, match_id: String) -> JoinHandle<()> {
        let api = Arc::clone(&self.api);
        self.spawn(RequestKind::DataAnalysis, async move {
            let analysis = api.generate_data_analysis(&match_id).await?;
            Ok(Action::AnalysisGenerated { match_id, analysis })
        })
    }

    fn spawn<F>(&self, kind: RequestKind, request: F) -> JoinHandle<()>
    where
        F: Future<Output = Result<Action>> + Send + 'static,
    {
        let action_tx = self.action_tx.clone();
        tracing::debug!(%kind, "Request started");
        tokio::spawn(async move {
            let action = match request.await {
                Ok(action) => action,
                Err(e) => {
                    tracing::warn!(%kind, error = %e, "Request failed");
                    Action::RequestFailed {
                        kind,
                        message: e.to_string(),
                    }
                }
            };
            if action_tx.send(action).is_err() {
                tracing::debug!(%kind, "Result dropped, application closed");
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::api::{
        AnalysisPage, ApiStatus, DataAnalysis, LatestLinks, MatchLink, MockMatchApi,
    };
    use pretty_assertions::assert_eq;

    fn dispatcher(mock: MockMatchApi) -> (Dispatcher, mpsc::UnboundedReceiver<Action>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Dispatcher::new(Arc::new(mock), &ApiConfig::default(), tx), rx)
    }

    async fn finish(handles: Vec<JoinHandle<()>>) -> usize {
        let count = handles.len();
        for handle in handles {
            handle.await.unwrap();
        }
        count
    }

    #[tokio::test]
    async fn test_status_success() {
        let mut mock = MockMatchApi::new();
        mock.expect_status().times(1).returning(|| {
            Ok(ApiStatus {
                version: "1.2.0".to_string(),
                ..Default::default()
            })
        });
        let (dispatcher, mut rx) = dispatcher(mock);

        finish(dispatcher.perform(&Action::CheckStatus, None)).await;
        match rx.try_recv().unwrap() {
            Action::StatusLoaded(status) => assert_eq!(status.version, "1.2.0"),
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failure_becomes_request_failed() {
        let mut mock = MockMatchApi::new();
        mock.expect_latest_links()
            .returning(|| Err(Error::http(404, "Nenhum link encontrado")));
        let (dispatcher, mut rx) = dispatcher(mock);

        finish(dispatcher.perform(&Action::LoadMatches, None)).await;
        match rx.try_recv().unwrap() {
            Action::RequestFailed { kind, message } => {
                assert_eq!(kind, RequestKind::Matches);
                assert!(message.contains("Nenhum link encontrado"));
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_history_uses_configured_limit() {
        let mut mock = MockMatchApi::new();
        mock.expect_screenshot_analyses()
            .withf(|limit| *limit == 50)
            .times(1)
            .returning(|_| Ok(AnalysisPage::default()));
        let (dispatcher, mut rx) = dispatcher(mock);

        finish(dispatcher.perform(&Action::LoadHistory, None)).await;
        assert!(matches!(rx.try_recv(), Ok(Action::HistoryLoaded(_))));
    }

    #[tokio::test]
    async fn test_refresh_detail_reloads_and_regenerates() {
        let mut mock = MockMatchApi::new();
        mock.expect_match_screenshot_analyses()
            .withf(|id, limit| id.to_string() == "12345" && *limit == 10)
            .times(1)
            .returning(|_, _| Ok(AnalysisPage::default()));
        mock.expect_generate_data_analysis()
            .times(1)
            .returning(|id| {
                Ok(DataAnalysis {
                    match_id: id.to_string(),
                    analysis_text: "ok".to_string(),
                    ..Default::default()
                })
            });
        let (dispatcher, mut rx) = dispatcher(mock);

        let spawned = finish(dispatcher.perform(&Action::RefreshDetail, Some("12345"))).await;
        assert_eq!(spawned, 2);

        let mut detail = false;
        let mut generated = false;
        while let Ok(action) = rx.try_recv() {
            match action {
                Action::DetailLoaded { match_id, .. } => detail = match_id == "12345",
                Action::AnalysisGenerated { match_id, .. } => generated = match_id == "12345",
                other => panic!("unexpected action: {other:?}"),
            }
        }
        assert!(detail && generated);
    }

    #[tokio::test]
    async fn test_match_actions_need_open_match() {
        let (dispatcher, _rx) = dispatcher(MockMatchApi::new());
        for action in [
            Action::RefreshDetail,
            Action::GenerateDataAnalysis,
            Action::GenerateScreenshotAnalysis,
            Action::CaptureScreenshot,
        ] {
            assert!(dispatcher.perform(&action, None).is_empty());
        }
    }

    #[tokio::test]
    async fn test_overlapping_requests_are_not_deduplicated() {
        let mut mock = MockMatchApi::new();
        mock.expect_collect_links().times(2).returning(|| {
            Ok(vec![MatchLink {
                match_id: "1".to_string(),
                ..Default::default()
            }])
        });
        let (dispatcher, mut rx) = dispatcher(mock);

        let mut handles = dispatcher.perform(&Action::CollectLinks, None);
        handles.extend(dispatcher.perform(&Action::CollectLinks, None));
        finish(handles).await;

        let collected = std::iter::from_fn(|| rx.try_recv().ok())
            .filter(|a| matches!(a, Action::LinksCollected(_)))
            .count();
        assert_eq!(collected, 2);
    }

    #[tokio::test]
    async fn test_non_request_actions_spawn_nothing() {
        let (dispatcher, _rx) = dispatcher(MockMatchApi::new());
        assert!(dispatcher.perform(&Action::ScrollDown, Some("1")).is_empty());
        assert!(dispatcher
            .perform(&Action::MatchesLoaded(LatestLinks::default()), None)
            .is_empty());
    }
}
