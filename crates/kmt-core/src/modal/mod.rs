//! Feature details and the chained flows sharing one overlay.
//!
//! The [`ModalDispatcher`] writes a [`ModalView`] into the [`Overlay`] of a
//! visitor. Delayed steps of the simulated payment, goods booking and journey
//! planning run as Tokio tasks holding a [`CancellationToken`], which the next
//! action of the visitor cancels.

mod dispatcher;
mod feature;
mod overlay;
mod view;

pub use dispatcher::{CancellationToken, ModalDispatcher};
pub use feature::Feature;
pub use overlay::Overlay;
pub use view::{ContainerState, ModalView, NotificationPreferences, PlannerState};
