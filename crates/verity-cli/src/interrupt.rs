//! Ctrl-C handling during the scan.
//!
//! While the scan runs, SIGINT only raises a flag; workers see it through
//! [`InterruptToken`] and stop after the file in hand. Once the scan is over the
//! default disposition is restored so Ctrl-C at the prompt ends the process.

use std::ffi::c_int;
use std::sync::atomic::{AtomicBool, Ordering};

use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use verity_core::traits::{Cancellable, CancellationToken};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

extern "C" fn on_sigint(_signal: c_int) {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

fn set_sigint(handler: SigHandler) -> nix::Result<()> {
    let action = SigAction::new(handler, SaFlags::SA_RESTART, SigSet::empty());
    // SAFETY: the handler only stores to an atomic, which is async-signal-safe.
    unsafe { sigaction(Signal::SIGINT, &action) }.map(|_| ())
}

/// Route SIGINT to the interrupt flag.
pub fn install() {
    INTERRUPTED.store(false, Ordering::SeqCst);
    if let Err(e) = set_sigint(SigHandler::Handler(on_sigint)) {
        tracing::warn!(error = %e, "could not install SIGINT handler");
    }
}

/// Put SIGINT back to its default behaviour.
pub fn restore_default() {
    if let Err(e) = set_sigint(SigHandler::SigDfl) {
        tracing::warn!(error = %e, "could not restore SIGINT handler");
    }
}

pub fn interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

/// Cancelled by Ctrl-C or by the engine itself.
///
/// Engine-side cancellation (worker failure, timeout) stays local so it is not
/// mistaken for a user interrupt.
#[derive(Debug, Clone, Default)]
pub struct InterruptToken {
    local: CancellationToken,
}

impl InterruptToken {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Cancellable for InterruptToken {
    fn is_cancelled(&self) -> bool {
        self.local.is_cancelled() || interrupted()
    }

    fn cancel(&self) {
        self.local.cancel();
    }
}
