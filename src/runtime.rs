/// Glue between the pure workflow and whatever environment executes it
use crate::config::WorkflowConfig;
use crate::workflow::{Effect, Event, PresentationState, Timer, Toast, Workflow};
use std::cell::RefCell;
use std::rc::Rc;

/// External collaborators of the workflow.
///
/// Asynchronous operations receive a [`Dispatcher`] and report their outcome
/// through it as an [`Event`]. Implementations may dispatch synchronously.
pub trait Host: Sized + 'static {
    fn render(&self, state: &PresentationState);

    fn show_toast(&self, toast: &Toast);

    /// Must eventually dispatch `Event::TabResolved`
    fn query_active_tab(&self, reply: Dispatcher<Self>);

    /// Must dispatch `Event::TimerElapsed(timer)` after `delay_ms`
    fn start_timer(&self, timer: Timer, delay_ms: u32, reply: Dispatcher<Self>);

    /// Must dispatch `Event::ResponseReceived` once the GET settles
    fn fetch_short_url(&self, request_url: &str, reply: Dispatcher<Self>);

    /// Dispatches `Event::ClipboardRejected` if the write fails
    fn write_clipboard(&self, text: &str, reply: Dispatcher<Self>);

    /// Synchronous legacy copy. Returns whether the copy command succeeded.
    fn write_clipboard_fallback(&self, text: &str) -> bool;

    fn close_window(&self);
}

struct Inner<H> {
    workflow: RefCell<Workflow>,
    host: H,
}

/// Shared handle that feeds events into the workflow and runs the effects
pub struct Dispatcher<H: Host> {
    inner: Rc<Inner<H>>,
}

impl<H: Host> Clone for Dispatcher<H> {
    fn clone(&self) -> Self {
        Dispatcher {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<H: Host> Dispatcher<H> {
    pub fn new(config: WorkflowConfig, host: H) -> Dispatcher<H> {
        Dispatcher {
            inner: Rc::new(Inner {
                workflow: RefCell::new(Workflow::new(config)),
                host,
            }),
        }
    }

    pub fn state(&self) -> Option<PresentationState> {
        self.inner.workflow.borrow().state().cloned()
    }

    pub fn start(&self) {
        let effects = self.inner.workflow.borrow_mut().start();
        self.execute(effects);
    }

    pub fn dispatch(&self, event: Event) {
        log::debug!("Dispatching {:?}", event);
        // The borrow ends before effects run, so hosts may dispatch re-entrantly
        let effects = self.inner.workflow.borrow_mut().handle(event);
        self.execute(effects);
    }

    fn execute(&self, effects: Vec<Effect>) {
        let host = &self.inner.host;

        for effect in effects {
            log::debug!("Executing {:?}", effect);
            match effect {
                Effect::QueryActiveTab => host.query_active_tab(self.clone()),
                Effect::Render(state) => host.render(&state),
                Effect::ShowToast(toast) => host.show_toast(&toast),
                Effect::StartTimer { timer, delay_ms } => host.start_timer(timer, delay_ms, self.clone()),
                Effect::FetchShortUrl { request_url } => host.fetch_short_url(&request_url, self.clone()),
                Effect::WriteClipboard { text } => host.write_clipboard(&text, self.clone()),
                Effect::WriteClipboardFallback { text } => {
                    if !host.write_clipboard_fallback(&text) {
                        log::warn!("Fallback clipboard copy failed; short link left on screen");
                    }
                }
                Effect::CloseWindow => host.close_window(),
            }
        }
    }
}
