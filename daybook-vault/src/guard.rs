//! Inactivity auto-lock.
//!
//! The guard owns no thread and no clock callbacks. Hosts report user
//! activity with [`InactivityGuard::touch`] and drive the timer by
//! calling [`InactivityGuard::poll`] whenever convenient (a UI tick, an
//! event loop turn); expiry is evaluated lazily against a deadline.

use crate::session::VaultSession;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::warn;

/// Default idle time before the vault locks itself.
pub const DEFAULT_INACTIVITY_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// Deadline timer that locks a session after a period of inactivity.
///
/// At most one deadline is live at a time; re-arming replaces it. While
/// the session is not unlocked the guard is inert.
pub struct InactivityGuard {
    timeout: Duration,
    deadline: Mutex<Option<Instant>>,
}

impl InactivityGuard {
    /// Creates a guard with the given idle timeout.
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            deadline: Mutex::new(None),
        }
    }

    /// The configured idle timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns true if a deadline is currently armed.
    pub fn is_armed(&self) -> bool {
        self.deadline.lock().unwrap().is_some()
    }

    /// Time left until expiry, if armed.
    pub fn remaining(&self) -> Option<Duration> {
        let deadline = self.deadline.lock().unwrap();
        deadline.map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Registers user activity, pushing the deadline out. No effect
    /// while the guard is not armed.
    pub fn touch(&self) {
        let mut deadline = self.deadline.lock().unwrap();
        if deadline.is_some() {
            *deadline = Some(Instant::now() + self.timeout);
        }
    }

    /// Drops the deadline without locking anything.
    pub fn disarm(&self) {
        *self.deadline.lock().unwrap() = None;
    }

    /// Moves an armed deadline to the current instant, so the next
    /// [`poll`](Self::poll) observes it as expired.
    pub fn expire_now(&self) {
        let mut deadline = self.deadline.lock().unwrap();
        if deadline.is_some() {
            *deadline = Some(Instant::now());
        }
    }

    /// Advances the guard against the session's current state.
    ///
    /// Arms when the session is unlocked, disarms when it is not, and
    /// locks the session once the deadline has passed. Returns true
    /// when this call performed the lock.
    pub fn poll(&self, session: &VaultSession) -> bool {
        let mut deadline = self.deadline.lock().unwrap();
        if !session.is_unlocked() {
            *deadline = None;
            return false;
        }
        match *deadline {
            None => {
                *deadline = Some(Instant::now() + self.timeout);
                false
            }
            Some(d) if Instant::now() >= d => {
                *deadline = None;
                drop(deadline);
                warn!("Inactivity timeout reached; locking vault");
                session.lock();
                true
            }
            Some(_) => false,
        }
    }
}

impl Default for InactivityGuard {
    fn default() -> Self {
        Self::new(DEFAULT_INACTIVITY_TIMEOUT)
    }
}
