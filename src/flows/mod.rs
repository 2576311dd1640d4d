//! Concrete flows and their terminal rendering.
//!
//! The engine under [`crate::flow`] is generic; this module holds the flows
//! tally actually ships — currently just [`onboarding`] — plus the
//! [`UiReporter`] bridge that renders engine events through a
//! [`crate::ui::UserInterface`].

pub mod onboarding;
pub mod reporter;

pub use onboarding::{build_flow, validate_alias, OnboardingInputs, OnboardingServices, FLOW_NAME};
pub use reporter::UiReporter;
