//! Search state and fetch orchestration.
//!
//! The controller owns `(query, page, selection)` and decides which fetches
//! to issue; the dispatcher runs them; notifications carry transient
//! messages to the user.

/// Query state controller.
pub mod controller;
/// Background fetch dispatch.
pub mod dispatch;
/// Transient notifications.
pub mod notify;

pub use controller::{
    FetchRequest, FetchResponse, NO_RESULTS_MESSAGE, QueryStateController, normalize_query,
};
pub use dispatch::{FetchDispatcher, SearchOptions};
pub use notify::{LogNotifier, Notification, Notifier, NotifyLevel};
