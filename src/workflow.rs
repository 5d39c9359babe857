/// Shorten-and-present workflow as a pure state machine.
///
/// The workflow never touches the browser. It consumes [`Event`]s and
/// answers with [`Effect`]s that the host executes; host completions come
/// back as new events.
use crate::config::WorkflowConfig;
use crate::error::ShortenError;
use crate::shortener::build_request_url;
use crate::tab_data::{LongUrl, ShortUrl};

/// What the popup is currently showing
#[derive(Debug, Clone, PartialEq)]
pub enum PresentationState {
    /// Waiting for the active tab query to answer
    Pending,
    Preparing { long_url: LongUrl },
    Ready { long_url: LongUrl, short_url: ShortUrl },
    Closing { long_url: LongUrl, short_url: ShortUrl },
    Failed { error: ShortenError },
}

impl PresentationState {
    pub fn name(&self) -> &'static str {
        match self {
            PresentationState::Pending => "pending",
            PresentationState::Preparing { .. } => "preparing",
            PresentationState::Ready { .. } => "ready",
            PresentationState::Closing { .. } => "closing",
            PresentationState::Failed { .. } => "failed",
        }
    }
}

/// Timers owned by the workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timer {
    Preparing,
    AutoClose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

/// A transient notification; the host dismisses it after `duration_ms`
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub message: String,
    pub duration_ms: u32,
    pub kind: ToastKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    TabResolved(Result<LongUrl, ShortenError>),
    TimerElapsed(Timer),
    ResponseReceived(Result<ShortUrl, ShortenError>),
    ClipboardRejected(String),
    LinkClicked,
    RetryRequested,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    QueryActiveTab,
    Render(PresentationState),
    ShowToast(Toast),
    StartTimer { timer: Timer, delay_ms: u32 },
    FetchShortUrl { request_url: String },
    WriteClipboard { text: String },
    WriteClipboardFallback { text: String },
    CloseWindow,
}

/// One popup's worth of workflow state
#[derive(Debug)]
pub struct Workflow {
    config: WorkflowConfig,
    started: bool,
    state: Option<PresentationState>,
    request_issued: bool,
    fallback_used: bool,
}

impl Workflow {
    pub fn new(config: WorkflowConfig) -> Workflow {
        Workflow {
            config,
            started: false,
            state: None,
            request_issued: false,
            fallback_used: false,
        }
    }

    /// Current presentation, `None` until started
    pub fn state(&self) -> Option<&PresentationState> {
        self.state.as_ref()
    }

    /// Kick off a run. Only the first call does anything.
    pub fn start(&mut self) -> Vec<Effect> {
        if self.started {
            log::debug!("Workflow already started, ignoring start");
            return Vec::new();
        }
        self.started = true;
        self.begin_run()
    }

    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::TabResolved(result) => self.on_tab_resolved(result),
            Event::TimerElapsed(Timer::Preparing) => self.on_preparing_elapsed(),
            Event::TimerElapsed(Timer::AutoClose) | Event::LinkClicked => self.close(),
            Event::ResponseReceived(result) => self.on_response(result),
            Event::ClipboardRejected(reason) => self.on_clipboard_rejected(reason),
            Event::RetryRequested => self.on_retry(),
        }
    }

    fn on_tab_resolved(&mut self, result: Result<LongUrl, ShortenError>) -> Vec<Effect> {
        if !matches!(self.state, Some(PresentationState::Pending)) {
            log::debug!("Ignoring tab result outside of start");
            return Vec::new();
        }

        match result {
            Ok(long_url) => {
                log::info!("Shortening {}", long_url);
                let state = PresentationState::Preparing { long_url };
                self.state = Some(state.clone());
                vec![
                    Effect::Render(state),
                    Effect::ShowToast(Toast {
                        message: self.config.preparing_message.clone(),
                        duration_ms: self.config.preparing_delay_ms,
                        kind: ToastKind::Info,
                    }),
                    Effect::StartTimer {
                        timer: Timer::Preparing,
                        delay_ms: self.config.preparing_delay_ms,
                    },
                ]
            }
            Err(error) => self.fail(error),
        }
    }

    fn on_preparing_elapsed(&mut self) -> Vec<Effect> {
        let long_url = match &self.state {
            Some(PresentationState::Preparing { long_url }) if !self.request_issued => long_url,
            _ => {
                log::debug!("Ignoring preparing timer, request already issued or state moved on");
                return Vec::new();
            }
        };

        match build_request_url(&self.config.service_base_url, long_url) {
            Ok(request_url) => {
                self.request_issued = true;
                vec![Effect::FetchShortUrl { request_url }]
            }
            Err(error) => self.fail(error),
        }
    }

    fn on_response(&mut self, result: Result<ShortUrl, ShortenError>) -> Vec<Effect> {
        let long_url = match &self.state {
            Some(PresentationState::Preparing { long_url }) if self.request_issued => long_url.clone(),
            _ => {
                log::debug!("Ignoring response, no request outstanding");
                return Vec::new();
            }
        };

        match result {
            Ok(short_url) => {
                log::info!("Short link ready: {}", short_url);
                let state = PresentationState::Ready {
                    long_url,
                    short_url: short_url.clone(),
                };
                self.state = Some(state.clone());
                vec![
                    Effect::Render(state),
                    Effect::ShowToast(Toast {
                        message: self.config.success_message.clone(),
                        duration_ms: self.config.done_delay_ms,
                        kind: ToastKind::Success,
                    }),
                    Effect::WriteClipboard {
                        text: short_url.as_str().to_string(),
                    },
                    Effect::StartTimer {
                        timer: Timer::AutoClose,
                        delay_ms: self.config.auto_close_delay_ms,
                    },
                ]
            }
            Err(error) => self.fail(error),
        }
    }

    fn on_clipboard_rejected(&mut self, reason: String) -> Vec<Effect> {
        let text = match &self.state {
            Some(PresentationState::Ready { short_url, .. })
            | Some(PresentationState::Closing { short_url, .. }) => short_url.as_str().to_string(),
            _ => return Vec::new(),
        };

        if self.fallback_used {
            log::warn!("Clipboard fallback already attempted: {}", reason);
            return Vec::new();
        }

        log::warn!("Clipboard write rejected ({}), using fallback", reason);
        self.fallback_used = true;
        vec![Effect::WriteClipboardFallback { text }]
    }

    fn close(&mut self) -> Vec<Effect> {
        let Some(PresentationState::Ready { long_url, short_url }) = &self.state else {
            log::debug!("Ignoring close request outside of ready state");
            return Vec::new();
        };

        let state = PresentationState::Closing {
            long_url: long_url.clone(),
            short_url: short_url.clone(),
        };
        self.state = Some(state.clone());
        vec![Effect::Render(state), Effect::CloseWindow]
    }

    fn on_retry(&mut self) -> Vec<Effect> {
        if !matches!(self.state, Some(PresentationState::Failed { .. })) {
            log::debug!("Ignoring retry outside of failed state");
            return Vec::new();
        }

        log::info!("Retrying shortening run");
        self.begin_run()
    }

    fn begin_run(&mut self) -> Vec<Effect> {
        self.request_issued = false;
        self.fallback_used = false;
        self.state = Some(PresentationState::Pending);
        vec![Effect::Render(PresentationState::Pending), Effect::QueryActiveTab]
    }

    fn fail(&mut self, error: ShortenError) -> Vec<Effect> {
        log::warn!("Shortening failed ({:?}): {}", error.kind(), error);
        let state = PresentationState::Failed { error: error.clone() };
        self.state = Some(state.clone());
        vec![
            Effect::Render(state),
            Effect::ShowToast(Toast {
                message: error.to_string(),
                duration_ms: self.config.done_delay_ms,
                kind: ToastKind::Error,
            }),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_url() -> LongUrl {
        LongUrl::new("https://example.com/very/long/path?x=1").unwrap()
    }

    fn short_url() -> ShortUrl {
        ShortUrl::new("https://tinyurl.com/abc123")
    }

    fn ready_workflow() -> Workflow {
        let mut workflow = Workflow::new(WorkflowConfig::default());
        workflow.start();
        workflow.handle(Event::TabResolved(Ok(long_url())));
        workflow.handle(Event::TimerElapsed(Timer::Preparing));
        workflow.handle(Event::ResponseReceived(Ok(short_url())));
        workflow
    }

    #[test]
    fn test_start_queries_tab_once() {
        let mut workflow = Workflow::new(WorkflowConfig::default());

        assert_eq!(workflow.state(), None);
        assert_eq!(
            workflow.start(),
            vec![Effect::Render(PresentationState::Pending), Effect::QueryActiveTab]
        );
        assert!(workflow.start().is_empty());
        assert_eq!(workflow.state(), Some(&PresentationState::Pending));
    }

    #[test]
    fn test_tab_resolved_enters_preparing() {
        let config = WorkflowConfig::default();
        let mut workflow = Workflow::new(config.clone());
        workflow.start();

        let effects = workflow.handle(Event::TabResolved(Ok(long_url())));

        let preparing = PresentationState::Preparing { long_url: long_url() };
        assert_eq!(
            effects,
            vec![
                Effect::Render(preparing.clone()),
                Effect::ShowToast(Toast {
                    message: config.preparing_message.clone(),
                    duration_ms: config.preparing_delay_ms,
                    kind: ToastKind::Info,
                }),
                Effect::StartTimer {
                    timer: Timer::Preparing,
                    delay_ms: config.preparing_delay_ms,
                },
            ]
        );
        assert_eq!(workflow.state(), Some(&preparing));
    }

    #[test]
    fn test_preparing_timer_issues_single_request() {
        let mut workflow = Workflow::new(WorkflowConfig::default());
        workflow.start();
        workflow.handle(Event::TabResolved(Ok(long_url())));

        let first = workflow.handle(Event::TimerElapsed(Timer::Preparing));
        let second = workflow.handle(Event::TimerElapsed(Timer::Preparing));

        assert_eq!(first.len(), 1);
        assert!(matches!(&first[0], Effect::FetchShortUrl { request_url }
            if request_url.starts_with("https://tinyurl.com/api-create.php?url=")));
        assert!(second.is_empty());
    }

    #[test]
    fn test_response_enters_ready_and_copies() {
        let mut workflow = Workflow::new(WorkflowConfig::default());
        workflow.start();
        workflow.handle(Event::TabResolved(Ok(long_url())));
        workflow.handle(Event::TimerElapsed(Timer::Preparing));

        let effects = workflow.handle(Event::ResponseReceived(Ok(short_url())));

        assert!(matches!(&effects[0], Effect::Render(PresentationState::Ready { short_url: s, .. })
            if s.as_str() == "https://tinyurl.com/abc123"));
        assert!(matches!(&effects[1], Effect::ShowToast(Toast { kind: ToastKind::Success, .. })));
        assert_eq!(
            effects[2],
            Effect::WriteClipboard { text: "https://tinyurl.com/abc123".to_string() }
        );
        assert_eq!(
            effects[3],
            Effect::StartTimer { timer: Timer::AutoClose, delay_ms: 2500 }
        );
    }

    #[test]
    fn test_response_before_request_is_ignored() {
        let mut workflow = Workflow::new(WorkflowConfig::default());
        workflow.start();
        workflow.handle(Event::TabResolved(Ok(long_url())));

        let effects = workflow.handle(Event::ResponseReceived(Ok(short_url())));

        assert!(effects.is_empty());
        assert_eq!(workflow.state().map(|s| s.name()), Some("preparing"));
    }

    #[test]
    fn test_link_click_closes_once() {
        let mut workflow = ready_workflow();

        let effects = workflow.handle(Event::LinkClicked);
        assert_eq!(effects.last(), Some(&Effect::CloseWindow));
        assert_eq!(workflow.state().map(|s| s.name()), Some("closing"));

        // The pending auto-close timer must not close a second time
        assert!(workflow.handle(Event::TimerElapsed(Timer::AutoClose)).is_empty());
        assert!(workflow.handle(Event::LinkClicked).is_empty());
    }

    #[test]
    fn test_auto_close_timer_closes() {
        let mut workflow = ready_workflow();

        let effects = workflow.handle(Event::TimerElapsed(Timer::AutoClose));

        assert_eq!(effects.last(), Some(&Effect::CloseWindow));
    }

    #[test]
    fn test_click_while_preparing_does_nothing() {
        let mut workflow = Workflow::new(WorkflowConfig::default());
        workflow.start();
        workflow.handle(Event::TabResolved(Ok(long_url())));

        assert!(workflow.handle(Event::LinkClicked).is_empty());
        assert!(workflow.handle(Event::TimerElapsed(Timer::AutoClose)).is_empty());
    }

    #[test]
    fn test_clipboard_rejection_falls_back_once() {
        let mut workflow = ready_workflow();

        let effects = workflow.handle(Event::ClipboardRejected("NotAllowedError".to_string()));
        assert_eq!(
            effects,
            vec![Effect::WriteClipboardFallback { text: "https://tinyurl.com/abc123".to_string() }]
        );

        assert!(workflow.handle(Event::ClipboardRejected("again".to_string())).is_empty());
    }

    #[test]
    fn test_no_active_tab_fails() {
        let mut workflow = Workflow::new(WorkflowConfig::default());
        workflow.start();

        let effects = workflow.handle(Event::TabResolved(Err(ShortenError::NoActiveTab)));

        assert_eq!(
            effects[0],
            Effect::Render(PresentationState::Failed { error: ShortenError::NoActiveTab })
        );
        assert!(matches!(&effects[1], Effect::ShowToast(Toast { kind: ToastKind::Error, .. })));
    }

    #[test]
    fn test_request_failure_fails_and_never_closes() {
        let mut workflow = Workflow::new(WorkflowConfig::default());
        workflow.start();
        workflow.handle(Event::TabResolved(Ok(long_url())));
        workflow.handle(Event::TimerElapsed(Timer::Preparing));

        let effects = workflow.handle(Event::ResponseReceived(Err(ShortenError::RequestFailed(
            "HTTP 500".to_string(),
        ))));

        assert!(!effects.contains(&Effect::CloseWindow));
        assert_eq!(workflow.state().map(|s| s.name()), Some("failed"));
        assert!(workflow.handle(Event::LinkClicked).is_empty());
    }

    #[test]
    fn test_tab_result_ignored_once_preparing() {
        let mut workflow = Workflow::new(WorkflowConfig::default());
        workflow.start();
        workflow.handle(Event::TabResolved(Ok(long_url())));

        assert!(workflow.handle(Event::TabResolved(Err(ShortenError::NoActiveTab))).is_empty());
        assert_eq!(workflow.state().map(|s| s.name()), Some("preparing"));
    }

    #[test]
    fn test_invalid_response_fails() {
        let mut workflow = Workflow::new(WorkflowConfig::default());
        workflow.start();
        workflow.handle(Event::TabResolved(Ok(long_url())));
        workflow.handle(Event::TimerElapsed(Timer::Preparing));

        let effects = workflow.handle(Event::ResponseReceived(Err(ShortenError::InvalidResponse(
            "empty response body".to_string(),
        ))));

        assert_eq!(
            effects[0],
            Effect::Render(PresentationState::Failed {
                error: ShortenError::InvalidResponse("empty response body".to_string())
            })
        );
        assert!(!effects.contains(&Effect::CloseWindow));
    }

    #[test]
    fn test_invalid_service_url_fails_instead_of_requesting() {
        let config = WorkflowConfig {
            service_base_url: "::not-a-url".to_string(),
            ..WorkflowConfig::default()
        };
        let mut workflow = Workflow::new(config);
        workflow.start();
        workflow.handle(Event::TabResolved(Ok(long_url())));

        let effects = workflow.handle(Event::TimerElapsed(Timer::Preparing));

        assert!(matches!(
            &effects[0],
            Effect::Render(PresentationState::Failed { error: ShortenError::RequestFailed(_) })
        ));
    }

    #[test]
    fn test_retry_only_from_failed() {
        let mut workflow = ready_workflow();
        assert!(workflow.handle(Event::RetryRequested).is_empty());

        let mut workflow = Workflow::new(WorkflowConfig::default());
        workflow.start();
        workflow.handle(Event::TabResolved(Err(ShortenError::NoActiveTab)));

        assert_eq!(
            workflow.handle(Event::RetryRequested),
            vec![Effect::Render(PresentationState::Pending), Effect::QueryActiveTab]
        );
        assert_eq!(workflow.state(), Some(&PresentationState::Pending));

        // The failure panel is gone, so a second click has nothing to retry
        assert!(workflow.handle(Event::RetryRequested).is_empty());

        // Fresh run proceeds normally
        let effects = workflow.handle(Event::TabResolved(Ok(long_url())));
        assert!(matches!(&effects[0], Effect::Render(PresentationState::Preparing { .. })));
        let effects = workflow.handle(Event::TimerElapsed(Timer::Preparing));
        assert!(matches!(&effects[0], Effect::FetchShortUrl { .. }));
    }
}
