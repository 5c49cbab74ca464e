use tokio::sync::watch;

use crate::client::{Conversion, ConversionService};
use crate::clipboard::Clipboard;
use crate::document::SelectedFile;
use crate::endpoint::PageLocation;
use crate::error::{ClipboardError, ConvertError, SelectionError};
use crate::notify::{Notification, Notifier};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    pub name: String,
    pub size: usize,
}

/// Everything the page shows. Result and error are never both set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub file: Option<FileSummary>,
    pub loading: bool,
    pub result: Option<String>,
    pub error: Option<String>,
}

/// How a call to [`UploadController::submit`] ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Nothing was selected, no request was made
    Skipped,
    Converted(Conversion),
    Failed(String),
}

/// Clears the loading flag when a submission ends, including when its
/// future is dropped before the service answers.
struct LoadingGuard<'a>(&'a watch::Sender<ViewState>);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.send_if_modified(|s| std::mem::replace(&mut s.loading, false));
    }
}

/// Holds the selected document and drives one conversion at a time.
///
/// `submit` borrows the controller mutably, so a second submission cannot
/// start while one is in flight.
pub struct UploadController<S> {
    service: S,
    location: PageLocation,
    notifier: Box<dyn Notifier>,
    clipboard: Box<dyn Clipboard>,
    file: Option<SelectedFile>,
    state: watch::Sender<ViewState>,
}

impl<S: ConversionService> UploadController<S> {
    pub fn new(
        service: S,
        location: PageLocation,
        notifier: Box<dyn Notifier>,
        clipboard: Box<dyn Clipboard>,
    ) -> Self {
        let (state, _) = watch::channel(ViewState::default());
        Self {
            service,
            location,
            notifier,
            clipboard,
            file: None,
            state,
        }
    }

    /// Receive every state change, e.g. to draw a spinner while loading
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Replace the selected document. Unsupported formats leave everything as it was.
    pub fn select_file(&mut self, candidate: SelectedFile) -> Result<(), SelectionError> {
        if candidate.format().is_none() {
            tracing::debug!(file = candidate.name(), "rejected unsupported format");
            self.notifier.notify(Notification::invalid_format());
            return Err(SelectionError::InvalidFormat {
                name: candidate.name().to_string(),
            });
        }

        tracing::debug!(file = candidate.name(), bytes = candidate.size(), "file selected");

        let summary = FileSummary {
            name: candidate.name().to_string(),
            size: candidate.size(),
        };
        self.file = Some(candidate);
        self.state.send_modify(|s| {
            s.file = Some(summary);
            s.result = None;
            s.error = None;
        });

        Ok(())
    }

    /// Upload the selected document and wait for the service's answer.
    /// Every failure ends up in the view state; nothing is returned as an error.
    pub async fn submit(&mut self) -> Submission {
        let Some(file) = self.file.as_ref() else {
            self.notifier.notify(Notification::no_file_selected());
            return Submission::Skipped;
        };

        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });
        let _loading = LoadingGuard(&self.state);

        let outcome = match self.location.endpoint() {
            Ok(endpoint) => self.service.convert(file, &endpoint).await,
            Err(e) => Err(ConvertError::from(e)),
        };

        match outcome {
            Ok(conversion) => {
                tracing::info!(
                    file = %conversion.filename,
                    chars = conversion.content.len(),
                    "conversion finished"
                );
                self.state.send_modify(|s| {
                    s.result = Some(conversion.content.clone());
                    s.error = None;
                    s.loading = false;
                });
                self.notifier
                    .notify(Notification::converted(&conversion.filename));
                Submission::Converted(conversion)
            }
            Err(e) => {
                tracing::warn!(error = %e, "conversion failed");
                let message = e.user_message();
                self.state.send_modify(|s| {
                    s.result = None;
                    s.error = Some(message.clone());
                    s.loading = false;
                });
                self.notifier
                    .notify(Notification::conversion_failed(&message));
                Submission::Failed(message)
            }
        }
    }

    /// Put the current result on the clipboard. Returns false when there is
    /// nothing to copy.
    pub fn copy_result(&mut self) -> Result<bool, ClipboardError> {
        let text = match self.state.borrow().result.as_deref() {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => return Ok(false),
        };

        self.clipboard.set_text(&text)?;
        self.notifier.notify(Notification::copied());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::testing::MemoryClipboard;
    use crate::error::FAILED_TO_CONVERT;
    use crate::notify::testing::RecordingNotifier;
    use std::sync::{Arc, Mutex};
    use tokio::sync::oneshot;
    use url::Url;

    type Reply = Box<dyn Fn() -> Result<Conversion, ConvertError>>;

    /// Answers every request with the same reply and records where it went
    struct FakeService {
        reply: Reply,
        requests: Arc<Mutex<Vec<(String, Url)>>>,
    }

    impl FakeService {
        fn new(reply: impl Fn() -> Result<Conversion, ConvertError> + 'static) -> Self {
            Self {
                reply: Box::new(reply),
                requests: Arc::default(),
            }
        }

        fn converting_to(content: &str, filename: &str) -> Self {
            let conversion = Conversion {
                content: content.to_string(),
                filename: filename.to_string(),
            };
            Self::new(move || Ok(conversion.clone()))
        }
    }

    impl ConversionService for FakeService {
        async fn convert(
            &self,
            file: &SelectedFile,
            endpoint: &Url,
        ) -> Result<Conversion, ConvertError> {
            self.requests
                .lock()
                .unwrap()
                .push((file.name().to_string(), endpoint.clone()));
            (self.reply)()
        }
    }

    /// Holds the request open until the test releases it
    struct GatedService {
        gate: Mutex<Option<oneshot::Receiver<Result<Conversion, ConvertError>>>>,
    }

    impl ConversionService for GatedService {
        async fn convert(
            &self,
            _file: &SelectedFile,
            _endpoint: &Url,
        ) -> Result<Conversion, ConvertError> {
            let gate = self.gate.lock().unwrap().take().expect("single request");
            gate.await.expect("gate dropped")
        }
    }

    /// Never answers
    struct HangingService;

    impl ConversionService for HangingService {
        async fn convert(
            &self,
            _file: &SelectedFile,
            _endpoint: &Url,
        ) -> Result<Conversion, ConvertError> {
            std::future::pending().await
        }
    }

    struct Harness<S> {
        controller: UploadController<S>,
        notifier: RecordingNotifier,
        clipboard: MemoryClipboard,
    }

    fn harness<S: ConversionService>(service: S, location: PageLocation) -> Harness<S> {
        let notifier = RecordingNotifier::default();
        let clipboard = MemoryClipboard::default();
        let controller = UploadController::new(
            service,
            location,
            Box::new(notifier.clone()),
            Box::new(clipboard.clone()),
        );
        Harness {
            controller,
            notifier,
            clipboard,
        }
    }

    fn local() -> PageLocation {
        PageLocation::new("http:", "localhost")
    }

    fn pdf(name: &str) -> SelectedFile {
        SelectedFile::new(name, b"%PDF-1.7".to_vec())
    }

    #[test]
    fn test_invalid_format_changes_nothing() {
        let mut h = harness(FakeService::converting_to("# Hello", "a.pdf"), local());
        h.controller.select_file(pdf("a.pdf")).unwrap();
        let before = h.controller.state();

        let err = h
            .controller
            .select_file(SelectedFile::new("notes.txt", b"hi".to_vec()))
            .unwrap_err();

        assert_eq!(
            err,
            SelectionError::InvalidFormat {
                name: "notes.txt".to_string()
            }
        );
        assert_eq!(h.controller.state(), before);
        assert_eq!(h.controller.state().file.unwrap().name, "a.pdf");
        assert_eq!(h.notifier.titles(), vec!["Invalid file format"]);
    }

    #[tokio::test]
    async fn test_valid_selection_clears_result_and_error() {
        let mut h = harness(FakeService::converting_to("# Hello", "a.pdf"), local());
        h.controller.select_file(pdf("a.pdf")).unwrap();
        h.controller.submit().await;
        assert!(h.controller.state().result.is_some());

        h.controller.select_file(pdf("report.PDF")).unwrap();
        let state = h.controller.state();
        assert_eq!(state.result, None);
        assert_eq!(state.error, None);
        assert_eq!(state.file.unwrap().name, "report.PDF");
    }

    #[tokio::test]
    async fn test_selection_clears_previous_error() {
        let service = FakeService::new(|| {
            Err(ConvertError::Service {
                status: 500,
                detail: None,
            })
        });
        let mut h = harness(service, local());
        h.controller.select_file(pdf("a.pdf")).unwrap();
        h.controller.submit().await;
        assert!(h.controller.state().error.is_some());

        h.controller.select_file(pdf("b.pdf")).unwrap();
        assert_eq!(h.controller.state().error, None);
    }

    #[tokio::test]
    async fn test_submit_without_file_makes_no_request() {
        let service = FakeService::converting_to("# Hello", "a.pdf");
        let requests = service.requests.clone();
        let mut h = harness(service, local());

        assert_eq!(h.controller.submit().await, Submission::Skipped);

        assert!(requests.lock().unwrap().is_empty());
        assert!(!h.controller.state().loading);
        assert_eq!(h.notifier.titles(), vec!["No file selected"]);
    }

    #[tokio::test]
    async fn test_loading_spans_the_request() {
        let (release, gate) = oneshot::channel();
        let service = GatedService {
            gate: Mutex::new(Some(gate)),
        };
        let mut h = harness(service, local());
        let mut view = h.controller.subscribe();
        h.controller.select_file(pdf("a.pdf")).unwrap();

        {
            let submit = h.controller.submit();
            tokio::pin!(submit);

            tokio::select! {
                _ = &mut submit => panic!("request finished before it was released"),
                seen = view.wait_for(|s| s.loading) => {
                    let seen = seen.unwrap();
                    assert!(seen.error.is_none());
                }
            }

            release
                .send(Ok(Conversion {
                    content: "# Hello".to_string(),
                    filename: "a.pdf".to_string(),
                }))
                .unwrap();

            let outcome = submit.await;
            assert!(matches!(outcome, Submission::Converted(_)));
        }

        assert!(!view.borrow().loading);
        assert!(!h.controller.state().loading);
    }

    #[tokio::test]
    async fn test_loading_resets_after_failure() {
        let (release, gate) = oneshot::channel();
        let service = GatedService {
            gate: Mutex::new(Some(gate)),
        };
        let mut h = harness(service, local());
        h.controller.select_file(pdf("a.pdf")).unwrap();

        release
            .send(Err(ConvertError::Service {
                status: 500,
                detail: Some("Conversion error: boom".to_string()),
            }))
            .unwrap();

        let outcome = h.controller.submit().await;
        assert_eq!(
            outcome,
            Submission::Failed("Conversion error: boom".to_string())
        );
        assert!(!h.controller.state().loading);
    }

    #[tokio::test]
    async fn test_abandoned_submit_releases_loading() {
        let mut h = harness(HangingService, local());
        let mut view = h.controller.subscribe();
        h.controller.select_file(pdf("a.pdf")).unwrap();

        let timed_out = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            h.controller.submit(),
        )
        .await;
        assert!(timed_out.is_err());

        let state = h.controller.state();
        assert!(!state.loading);
        assert_eq!(state.result, None);
        assert_eq!(state.error, None);
        assert!(crate::render::Page::project(&state).upload.button_enabled);

        // The spinner side sees the release too
        assert!(view.has_changed().unwrap());
        assert!(!view.borrow_and_update().loading);
        assert!(h.notifier.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_success_sets_result_only() {
        let mut h = harness(FakeService::converting_to("# Hello", "a.pdf"), local());
        h.controller.select_file(pdf("a.pdf")).unwrap();

        h.controller.submit().await;

        let state = h.controller.state();
        assert_eq!(state.result.as_deref(), Some("# Hello"));
        assert_eq!(state.error, None);
        assert!(!state.loading);

        let last = h.notifier.notifications().pop().unwrap();
        assert_eq!(last.title, "Conversion successful");
        assert_eq!(last.description, "a.pdf has been converted to Markdown.");
    }

    #[tokio::test]
    async fn test_service_detail_becomes_error() {
        let service = FakeService::new(|| {
            crate::client::interpret_response(
                reqwest::StatusCode::BAD_REQUEST,
                r#"{"detail": "corrupt file"}"#,
            )
        });
        let mut h = harness(service, local());
        h.controller.select_file(pdf("a.pdf")).unwrap();

        h.controller.submit().await;

        let state = h.controller.state();
        assert_eq!(state.error.as_deref(), Some("corrupt file"));
        assert_eq!(state.result, None);
        assert_eq!(h.notifier.titles().last().unwrap(), "Conversion failed");
    }

    #[tokio::test]
    async fn test_unparseable_failure_uses_fallback() {
        let service = FakeService::new(|| {
            crate::client::interpret_response(reqwest::StatusCode::BAD_GATEWAY, "<html>")
        });
        let mut h = harness(service, local());
        h.controller.select_file(pdf("a.pdf")).unwrap();

        h.controller.submit().await;

        assert_eq!(h.controller.state().error.as_deref(), Some(FAILED_TO_CONVERT));
    }

    #[tokio::test]
    async fn test_failure_after_success_drops_old_result() {
        let calls = Arc::new(Mutex::new(0));
        let counter = calls.clone();
        let service = FakeService::new(move || {
            let mut n = counter.lock().unwrap();
            *n += 1;
            if *n == 1 {
                Ok(Conversion {
                    content: "# First".to_string(),
                    filename: "a.pdf".to_string(),
                })
            } else {
                Err(ConvertError::Service {
                    status: 500,
                    detail: None,
                })
            }
        });
        let mut h = harness(service, local());
        h.controller.select_file(pdf("a.pdf")).unwrap();

        h.controller.submit().await;
        h.controller.submit().await;

        let state = h.controller.state();
        assert_eq!(state.result, None);
        assert_eq!(state.error.as_deref(), Some(FAILED_TO_CONVERT));
    }

    #[tokio::test]
    async fn test_endpoint_resolved_from_location() {
        let service = FakeService::converting_to("# Hello", "a.pdf");
        let requests = service.requests.clone();
        let mut h = harness(service, PageLocation::new("https:", "example.com"));
        h.controller.select_file(pdf("a.pdf")).unwrap();

        h.controller.submit().await;

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, "a.pdf");
        assert_eq!(requests[0].1.as_str(), "https://api.example.com/tomd");
    }

    #[tokio::test]
    async fn test_localhost_endpoint() {
        let service = FakeService::converting_to("# Hello", "a.pdf");
        let requests = service.requests.clone();
        let mut h = harness(service, local());
        h.controller.select_file(pdf("a.pdf")).unwrap();

        h.controller.submit().await;

        assert_eq!(
            requests.lock().unwrap()[0].1.as_str(),
            "http://localhost:8000/tomd"
        );
    }

    #[tokio::test]
    async fn test_copy_writes_current_result() {
        let mut h = harness(FakeService::converting_to("# Hello\n\nWorld", "a.pdf"), local());
        h.controller.select_file(pdf("a.pdf")).unwrap();
        h.controller.submit().await;

        assert!(h.controller.copy_result().unwrap());

        assert_eq!(h.clipboard.writes(), vec!["# Hello\n\nWorld"]);
        assert_eq!(h.notifier.titles().last().unwrap(), "Copied to clipboard");
    }

    #[tokio::test]
    async fn test_copy_without_result_does_nothing() {
        let mut h = harness(FakeService::converting_to("", "a.pdf"), local());
        assert!(!h.controller.copy_result().unwrap());

        // An empty conversion is still nothing to copy
        h.controller.select_file(pdf("a.pdf")).unwrap();
        h.controller.submit().await;
        assert!(!h.controller.copy_result().unwrap());

        assert!(h.clipboard.writes().is_empty());
    }
}
