/// Reusable UI components

use crate::error::{ErrorKind, ShortenError};
use crate::workflow::{Toast, ToastKind};
use patternfly_yew::prelude::*;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ShortLinkProps {
    pub short_url: String,
    pub onclick: Callback<MouseEvent>,
}

/// The short link itself. It has no target; clicking it closes the popup.
#[function_component(ShortLink)]
pub fn short_link(props: &ShortLinkProps) -> Html {
    html! {
        <h1 class="popup-heading">
            <a class="short-link" title="Click to close popup" onclick={props.onclick.clone()}>
                {props.short_url.clone()}
            </a>
        </h1>
    }
}

#[derive(Properties, PartialEq)]
pub struct PreparingProps {
    pub heading: String,
}

#[function_component(Preparing)]
pub fn preparing(props: &PreparingProps) -> Html {
    html! {
        <div class="loading-text-center">
            <h1 class="popup-heading">{props.heading.clone()}</h1>
            <Spinner />
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct FailureProps {
    pub error: ShortenError,
    pub on_retry: Callback<MouseEvent>,
}

/// Headline shown above the error detail
pub fn failure_title(error: &ShortenError) -> &'static str {
    match error.kind() {
        ErrorKind::NoActiveTab => "No tab to shorten",
        ErrorKind::RequestFailed => "Could not reach the shortening service",
        ErrorKind::InvalidResponse => "The shortening service sent an unexpected reply",
    }
}

#[function_component(Failure)]
pub fn failure(props: &FailureProps) -> Html {
    html! {
        <div class="message-top-margin">
            <Alert r#type={AlertType::Danger} title={failure_title(&props.error)} inline={true}>
                {props.error.to_string()}
            </Alert>
            <Button onclick={props.on_retry.clone()} variant={ButtonVariant::Secondary} block={true}>
                {"Try again"}
            </Button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ToastBannerProps {
    pub toast: Toast,
    pub on_dismiss: Callback<MouseEvent>,
}

/// Toast pinned to the top of the popup; clicking it dismisses it
#[function_component(ToastBanner)]
pub fn toast_banner(props: &ToastBannerProps) -> Html {
    let alert_type = match props.toast.kind {
        ToastKind::Info => AlertType::Info,
        ToastKind::Success => AlertType::Success,
        ToastKind::Error => AlertType::Danger,
    };

    html! {
        <div class="toast-north" onclick={props.on_dismiss.clone()}>
            <Alert r#type={alert_type} title={props.toast.message.clone()} inline={true}>
            </Alert>
        </div>
    }
}
