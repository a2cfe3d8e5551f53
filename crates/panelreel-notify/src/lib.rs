//! Cross-thread update notification channel.
//!
//! A reel's redraw loop needs a way to learn "something changed, wake up and
//! redraw" from tablet worker threads without those threads touching the
//! reel lock directly (spec §6). [`Notifier`] abstracts the wakeup
//! primitive; [`EventFdNotifier`] backs it with a real Linux `eventfd` (the
//! same mechanism the original implementation's demo used), and
//! [`ChannelNotifier`] provides a portable fallback for non-Linux targets
//! and for tests that don't want a raw fd.
//!
//! Both implementations coalesce: touching an already-dirty notifier is a
//! no-op, so a storm of `touch` calls between two redraws collapses into a
//! single wakeup, matching `eventfd`'s natural counter-saturation-at-1
//! behaviour in non-blocking mode.

use anyhow::Result;

/// A coalescing, non-blocking wakeup signal.
pub trait Notifier: Send + Sync {
    /// Mark the notifier dirty, waking any waiter. Tolerant of being called
    /// when already dirty (spec: `touch` never blocks and never errors on a
    /// saturated signal).
    fn touch(&self);

    /// Block until `touch` has been called since the last `wait`, then clear
    /// the dirty flag. Returns immediately if already dirty.
    fn wait(&self) -> Result<()>;

    /// Non-blocking poll: `true` and clears the flag if dirty, `false`
    /// otherwise.
    fn poll(&self) -> bool;
}

#[cfg(target_os = "linux")]
mod eventfd {
    use super::{Notifier, Result};
    use rustix::event::eventfd::{eventfd, EventfdFlags};
    use rustix::fd::OwnedFd;
    use rustix::io::{read, write, Errno};
    use std::os::fd::AsFd;
    use std::sync::Mutex;

    /// Real `eventfd`-backed notifier, non-blocking, tolerating `EAGAIN` on
    /// an already-saturated counter the same way the original C demo's
    /// `write()` call does.
    pub struct EventFdNotifier {
        fd: Mutex<OwnedFd>,
    }

    impl EventFdNotifier {
        pub fn new() -> Result<Self> {
            let fd = eventfd(0, EventfdFlags::NONBLOCK)?;
            Ok(Self { fd: Mutex::new(fd) })
        }

        /// Raw fd suitable for registering with an external poll/epoll loop.
        pub fn as_raw_fd(&self) -> std::os::fd::RawFd {
            use std::os::fd::AsRawFd;
            self.fd.lock().expect("eventfd mutex poisoned").as_fd().as_raw_fd()
        }
    }

    impl Notifier for EventFdNotifier {
        fn touch(&self) {
            let fd = self.fd.lock().expect("eventfd mutex poisoned");
            let one: u64 = 1;
            match write(&*fd, &one.to_ne_bytes()) {
                Ok(_) => {}
                Err(Errno::AGAIN) => {
                    // Counter already at its non-blocking ceiling: a wakeup
                    // is already pending, so this touch is redundant.
                }
                Err(err) => {
                    tracing::warn!(?err, "eventfd touch write failed");
                }
            }
        }

        fn wait(&self) -> Result<()> {
            // A blocking wait would require temporarily clearing
            // O_NONBLOCK; panelreel's facade never calls `wait` from inside
            // the reel lock, so this drives a spin-poll instead to avoid
            // adding raw-fd-mode-toggling complexity for a path the facade
            // doesn't exercise directly.
            loop {
                if self.poll() {
                    return Ok(());
                }
                std::thread::yield_now();
            }
        }

        fn poll(&self) -> bool {
            let fd = self.fd.lock().expect("eventfd mutex poisoned");
            let mut buf = [0u8; 8];
            match read(&*fd, &mut buf) {
                Ok(_) => true,
                Err(Errno::AGAIN) => false,
                Err(err) => {
                    tracing::warn!(?err, "eventfd poll read failed");
                    false
                }
            }
        }
    }
}

#[cfg(target_os = "linux")]
pub use eventfd::EventFdNotifier;

/// Portable notifier backed by an atomic dirty flag plus a condvar, used on
/// non-Linux targets and in tests that don't want to depend on a raw fd.
pub struct ChannelNotifier {
    dirty: std::sync::Mutex<bool>,
    condvar: std::sync::Condvar,
}

impl Default for ChannelNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelNotifier {
    pub fn new() -> Self {
        Self {
            dirty: std::sync::Mutex::new(false),
            condvar: std::sync::Condvar::new(),
        }
    }
}

impl Notifier for ChannelNotifier {
    fn touch(&self) {
        let mut dirty = self.dirty.lock().expect("notifier mutex poisoned");
        *dirty = true;
        self.condvar.notify_one();
    }

    fn wait(&self) -> Result<()> {
        let mut dirty = self.dirty.lock().expect("notifier mutex poisoned");
        while !*dirty {
            dirty = self.condvar.wait(dirty).expect("notifier mutex poisoned");
        }
        *dirty = false;
        Ok(())
    }

    fn poll(&self) -> bool {
        let mut dirty = self.dirty.lock().expect("notifier mutex poisoned");
        if *dirty {
            *dirty = false;
            true
        } else {
            false
        }
    }
}
