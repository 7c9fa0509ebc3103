#![forbid(unsafe_code)]

//! Transient on-page message with cancel-and-restart auto-hide.
//!
//! Each [`Toast::show`] bumps a generation and hands back a ticket; the host
//! schedules a timer and returns the ticket to [`Toast::expire`]. Only the
//! latest ticket hides the toast, so a superseded timer is a no-op.

use crate::host::PageHost;

/// Proof of one `show` call, redeemed when its timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToastTicket {
    generation: u64,
}

impl ToastTicket {
    /// Raw generation, for hosts that pass tickets through timer callbacks.
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.generation
    }

    #[must_use]
    pub const fn from_generation(generation: u64) -> Self {
        Self { generation }
    }
}

#[derive(Debug, Default)]
pub struct Toast {
    generation: u64,
    visible: bool,
}

impl Toast {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show `message`, superseding any pending expiry.
    pub fn show<H: PageHost>(&mut self, host: &H, message: &str) -> ToastTicket {
        self.generation = self.generation.wrapping_add(1);
        self.visible = true;
        host.show_toast(message);
        ToastTicket {
            generation: self.generation,
        }
    }

    /// Hide if `ticket` is the latest. Returns whether the toast was hidden.
    pub fn expire<H: PageHost>(&mut self, host: &H, ticket: ToastTicket) -> bool {
        if !self.visible || ticket.generation != self.generation {
            return false;
        }
        self.visible = false;
        host.hide_toast();
        true
    }
}
