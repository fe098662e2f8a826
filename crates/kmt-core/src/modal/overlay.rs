use super::view::{ContainerState, ModalView};
use crate::view::Overflow;

/// The shared overlay and the background scrolling it suspends.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    /// Whether the overlay is shown.
    visible: bool,
    /// Content of the container.
    view: Option<ModalView>,
    /// Background overflow before the overlay was opened.
    saved_overflow: Option<Overflow>,
    /// Current background overflow.
    body_overflow: Overflow,
}

impl Overlay {
    /// Creates a hidden overlay over a background with the overflow.
    #[inline]
    pub fn with_body_overflow(body_overflow: Overflow) -> Self {
        Self {
            body_overflow,
            ..Self::default()
        }
    }

    /// Returns `true` if the overlay is shown.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Returns the view in the container.
    #[inline]
    pub fn view(&self) -> Option<&ModalView> {
        self.view.as_ref()
    }

    /// Returns the state of the container.
    #[inline]
    pub fn state(&self) -> Option<ContainerState> {
        self.view.as_ref().map(ModalView::state)
    }

    /// Returns the background overflow.
    #[inline]
    pub fn body_overflow(&self) -> Overflow {
        self.body_overflow
    }

    /// Shows the view and suspends background scrolling.
    ///
    /// The overflow from before the first open is kept until the overlay is closed.
    pub fn open(&mut self, view: ModalView) {
        if self.saved_overflow.is_none() {
            self.saved_overflow = Some(self.body_overflow);
        }
        self.body_overflow = Overflow::Hidden;
        self.visible = true;
        self.view = Some(view);
    }

    /// Replaces the view without touching the visibility.
    #[inline]
    pub fn replace(&mut self, view: ModalView) {
        self.view = Some(view);
    }

    /// Hides the overlay and restores background scrolling.
    pub fn close(&mut self) {
        self.visible = false;
        self.view = None;
        if let Some(overflow) = self.saved_overflow.take() {
            self.body_overflow = overflow;
        }
    }
}
