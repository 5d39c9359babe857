/// Popup UI: the browser host for the shortening workflow

use crate::browser;
use crate::config::WorkflowConfig;
use crate::runtime::{Dispatcher, Host};
use crate::ui::components::{Failure, Preparing, ShortLink, ToastBanner};
use crate::workflow::{Event, PresentationState, Timer, Toast};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[derive(Clone, PartialEq)]
struct ActiveToast {
    id: u32,
    toast: Toast,
}

/// Executes workflow effects against the real browser and Yew state
#[derive(Clone)]
pub struct WebHost {
    state: UseStateHandle<Option<PresentationState>>,
    toast: UseStateHandle<Option<ActiveToast>>,
    toast_seq: Rc<Cell<u32>>,
}

impl Host for WebHost {
    fn render(&self, state: &PresentationState) {
        log::info!("Popup is now {}", state.name());
        self.state.set(Some(state.clone()));
    }

    fn show_toast(&self, toast: &Toast) {
        let id = self.toast_seq.get().wrapping_add(1);
        self.toast_seq.set(id);
        self.toast.set(Some(ActiveToast {
            id,
            toast: toast.clone(),
        }));

        let handle = self.toast.clone();
        let seq = Rc::clone(&self.toast_seq);
        let duration_ms = toast.duration_ms;
        spawn_local(async move {
            browser::sleep_ms(duration_ms).await;
            // A newer toast owns the banner now
            if seq.get() == id {
                handle.set(None);
            }
        });
    }

    fn query_active_tab(&self, reply: Dispatcher<Self>) {
        spawn_local(async move {
            let result = browser::query_active_tab_url().await;
            reply.dispatch(Event::TabResolved(result));
        });
    }

    fn start_timer(&self, timer: Timer, delay_ms: u32, reply: Dispatcher<Self>) {
        spawn_local(async move {
            browser::sleep_ms(delay_ms).await;
            reply.dispatch(Event::TimerElapsed(timer));
        });
    }

    fn fetch_short_url(&self, request_url: &str, reply: Dispatcher<Self>) {
        let request_url = request_url.to_string();
        spawn_local(async move {
            let result = browser::fetch_short_url(&request_url).await;
            reply.dispatch(Event::ResponseReceived(result));
        });
    }

    fn write_clipboard(&self, text: &str, reply: Dispatcher<Self>) {
        let text = text.to_string();
        spawn_local(async move {
            if let Err(reason) = browser::write_clipboard(&text).await {
                reply.dispatch(Event::ClipboardRejected(reason));
            }
        });
    }

    fn write_clipboard_fallback(&self, text: &str) -> bool {
        browser::copy_with_hidden_input(text).unwrap_or_else(|e| {
            log::warn!("Fallback copy failed: {:?}", e);
            false
        })
    }

    fn close_window(&self) {
        browser::close_window();
    }
}

/// Dispatcher slot filled in once the workflow is mounted
pub type SharedDispatcher<H> = Rc<RefCell<Option<Dispatcher<H>>>>;

/// Click handler feeding `event` into the workflow
pub fn dispatch_on_click<H: Host>(dispatcher: SharedDispatcher<H>, event: Event) -> Callback<MouseEvent> {
    Callback::from(move |e: MouseEvent| {
        e.prevent_default();
        let current = dispatcher.borrow().clone();
        match current {
            Some(workflow) => workflow.dispatch(event.clone()),
            None => log::debug!("Workflow not mounted yet, dropping {:?}", event),
        }
    })
}

#[derive(Properties, PartialEq, Default)]
pub struct AppProps {
    #[prop_or_default]
    pub config: WorkflowConfig,
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let state = use_state(|| None::<PresentationState>);
    let toast = use_state(|| None::<ActiveToast>);
    let toast_seq = use_memo((), |_| Cell::new(0u32));
    let dispatcher: SharedDispatcher<WebHost> = use_mut_ref(|| None);

    // Start the workflow once on mount
    {
        let host = WebHost {
            state: state.clone(),
            toast: toast.clone(),
            toast_seq: Rc::clone(&toast_seq),
        };
        let config = props.config.clone();
        let dispatcher = dispatcher.clone();

        use_effect_with((), move |_| {
            let workflow = Dispatcher::new(config, host);
            *dispatcher.borrow_mut() = Some(workflow.clone());
            workflow.start();
            || ()
        });
    }

    let on_link_click = dispatch_on_click(dispatcher.clone(), Event::LinkClicked);
    let on_retry = dispatch_on_click(dispatcher.clone(), Event::RetryRequested);

    let on_toast_dismiss = {
        let toast = toast.clone();
        Callback::from(move |_: MouseEvent| {
            toast.set(None);
        })
    };

    let (body, long_url) = match &*state {
        None | Some(PresentationState::Pending) => (
            html! { <Preparing heading={props.config.preparing_heading.clone()} /> },
            None,
        ),
        Some(PresentationState::Preparing { long_url }) => (
            html! { <Preparing heading={props.config.preparing_heading.clone()} /> },
            Some(long_url.to_string()),
        ),
        Some(PresentationState::Ready { long_url, short_url })
        | Some(PresentationState::Closing { long_url, short_url }) => (
            html! { <ShortLink short_url={short_url.to_string()} onclick={on_link_click} /> },
            Some(long_url.to_string()),
        ),
        Some(PresentationState::Failed { error }) => (
            html! { <Failure error={error.clone()} on_retry={on_retry} /> },
            None,
        ),
    };

    html! {
        <div class="padding-20">
            if let Some(active) = (*toast).clone() {
                <ToastBanner key={active.id} toast={active.toast} on_dismiss={on_toast_dismiss} />
            }

            {body}

            if let Some(url) = long_url {
                <p class="long-url" title={url.clone()}>{url}</p>
            }
        </div>
    }
}
