//! Cooperative cancellation for scans and deletions.

use std::ptr;
use std::sync::atomic::{AtomicBool, AtomicPtr, Ordering};
use std::sync::Arc;

use nix::sys::signal::{self, SigHandler, Signal};

/// Shared flag checked by the scanner before entering a directory and by the
/// executor before starting a path.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Flag of the token currently receiving SIGINT, or null. The handler only
/// loads this pointer and stores through it.
static INTERRUPT_TARGET: AtomicPtr<AtomicBool> = AtomicPtr::new(ptr::null_mut());

/// Routes SIGINT to a [`CancelToken`] while alive.
///
/// Dropping the guard restores the default SIGINT disposition, so Ctrl-C at
/// an interactive prompt terminates the process as usual.
pub struct InterruptGuard {
    // keeps the published flag alive until the handler is gone
    flag: Arc<AtomicBool>,
}

impl InterruptGuard {
    pub fn install(token: &CancelToken) -> nix::Result<Self> {
        let flag = Arc::clone(&token.0);
        INTERRUPT_TARGET.store(Arc::as_ptr(&flag).cast_mut(), Ordering::SeqCst);

        // SAFETY: the handler only performs atomic operations on a flag kept
        // alive by this guard.
        let installed =
            unsafe { signal::signal(Signal::SIGINT, SigHandler::Handler(handle_interrupt)) };
        if let Err(e) = installed {
            INTERRUPT_TARGET.store(ptr::null_mut(), Ordering::SeqCst);
            return Err(e);
        }

        Ok(Self { flag })
    }
}

impl Drop for InterruptGuard {
    fn drop(&mut self) {
        // SAFETY: restoring the default disposition has no preconditions.
        let _ = unsafe { signal::signal(Signal::SIGINT, SigHandler::SigDfl) };
        let ours = Arc::as_ptr(&self.flag).cast_mut();
        let _ = INTERRUPT_TARGET.compare_exchange(
            ours,
            ptr::null_mut(),
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
    }
}

extern "C" fn handle_interrupt(_: i32) {
    raise(&INTERRUPT_TARGET);
}

fn raise(target: &AtomicPtr<AtomicBool>) {
    let flag = target.load(Ordering::SeqCst);
    // SAFETY: a non-null target points at a flag owned by a live guard.
    if let Some(flag) = unsafe { flag.as_ref() } {
        flag.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_starts_clear() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn clones_share_state() {
        let token = CancelToken::new();
        let other = token.clone();
        other.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn raise_sets_published_flag() {
        let token = CancelToken::new();
        let target = AtomicPtr::new(Arc::as_ptr(&token.0).cast_mut());

        raise(&target);
        assert!(token.is_cancelled());
    }

    #[test]
    fn raise_without_target_is_noop() {
        raise(&AtomicPtr::new(ptr::null_mut()));
    }

    #[test]
    fn install_and_drop_guard() {
        let token = CancelToken::new();
        let guard = InterruptGuard::install(&token);
        assert!(guard.is_ok());
        drop(guard);
        assert!(!token.is_cancelled());
    }
}
