//! Login/signup flow rules shared with whatever surface renders the forms.
//!
//! The validators below are the server-side gate: the HTTP handlers call
//! them on every register/login/reset request. [`step`] and the effect enum
//! are the other half of the contract, published for clients: they pin down
//! how a conforming surface sequences tab switches, the busy state around a
//! submission, and the post-success redirect, so a client driven by this
//! machine agrees with the server on every edge (for example, a tab switch
//! mid-submission is a no-op rather than an abort). The machine is pure and
//! never touches a view.

use std::time::Duration;

use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::AuthError;

/// Minimum password length, enforced the same everywhere (live feedback and
/// submission alike).
pub const MIN_PASSWORD_LEN: usize = 8;

/// How long a success message stays visible before the host navigates away.
pub const REDIRECT_DELAY: Duration = Duration::from_millis(1500);

/// The two tabs of the auth form. A rendering surface feeds [`FlowEvent`]s
/// into [`step`] and applies the returned [`FlowEffect`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthTab {
    Login,
    Signup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle(AuthTab),
    Submitting(AuthTab),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    SwitchTab(AuthTab),
    Submit,
    Completed { success: bool, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEffect {
    ClearMessage,
    DisableSubmit,
    EnableSubmit,
    ShowMessage { text: String, success: bool },
    NavigateAfterDelay(Duration),
}

/// Advances the flow by one event. Tab switches are ignored mid-submission;
/// completion returns to the prior tab in an interactive state.
pub fn step(state: FlowState, event: FlowEvent) -> (FlowState, Vec<FlowEffect>) {
    match (state, event) {
        (FlowState::Idle(_), FlowEvent::SwitchTab(tab)) => {
            (FlowState::Idle(tab), vec![FlowEffect::ClearMessage])
        }
        (FlowState::Submitting(tab), FlowEvent::SwitchTab(_)) => {
            (FlowState::Submitting(tab), vec![])
        }
        (FlowState::Idle(tab), FlowEvent::Submit) => {
            (FlowState::Submitting(tab), vec![FlowEffect::DisableSubmit])
        }
        (FlowState::Submitting(tab), FlowEvent::Submit) => (FlowState::Submitting(tab), vec![]),
        (FlowState::Submitting(tab), FlowEvent::Completed { success, message }) => {
            let mut effects = vec![
                FlowEffect::EnableSubmit,
                FlowEffect::ShowMessage {
                    text: message,
                    success,
                },
            ];
            if success {
                effects.push(FlowEffect::NavigateAfterDelay(REDIRECT_DELAY));
            }
            (FlowState::Idle(tab), effects)
        }
        (state @ FlowState::Idle(_), FlowEvent::Completed { .. }) => (state, vec![]),
    }
}

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn validation(msg: &str) -> AuthError {
    AuthError::Validation(msg.to_string())
}

pub fn validate_login(email: &str, password: &str) -> Result<(), AuthError> {
    if !is_valid_email(email) {
        return Err(validation("Please enter a valid email address"));
    }
    if password.is_empty() {
        return Err(validation("Please fill in all fields"));
    }
    Ok(())
}

pub fn validate_signup(
    name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<(), AuthError> {
    if name.len() < 2 {
        return Err(validation("Please enter your full name"));
    }
    if !is_valid_email(email) {
        return Err(validation("Please enter a valid email address"));
    }
    validate_password(password)?;
    if password != confirm_password {
        return Err(validation("Passwords do not match"));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(validation("Password must be at least 8 characters long"));
    }
    Ok(())
}
