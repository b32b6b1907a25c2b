//! Send state and UI-facing flags
//!
//! The orchestrator is the only writer. A `SendGuard` is held for the whole
//! attempt and clears both flags when dropped, on every exit path.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SendState {
    #[default]
    Idle,
    Validating,
    ContractTokenPath,
    PrivacyTokenPath,
    FixedFeePath,
    StandardPath,
    Broadcasting,
    Succeeded,
    Failed,
}

impl SendState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SendState::Succeeded | SendState::Failed)
    }
}

#[derive(Debug, Default)]
pub struct SendFlags {
    sending: AtomicBool,
    awaiting_hardware: AtomicBool,
    state: Mutex<SendState>,
}

impl SendFlags {
    pub fn is_sending(&self) -> bool {
        self.sending.load(Ordering::SeqCst)
    }

    pub fn awaiting_hardware_confirmation(&self) -> bool {
        self.awaiting_hardware.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> SendState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_state(&self, state: SendState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = state;
    }

    /// Start an attempt
    pub fn begin(&self) -> SendGuard<'_> {
        self.sending.store(true, Ordering::SeqCst);
        self.set_state(SendState::Validating);
        SendGuard { flags: self }
    }
}

pub struct SendGuard<'a> {
    flags: &'a SendFlags,
}

impl SendGuard<'_> {
    pub fn transition(&self, state: SendState) {
        self.flags.set_state(state);
    }

    pub fn awaiting_hardware(&self) {
        self.flags.awaiting_hardware.store(true, Ordering::SeqCst);
    }

    pub fn finish(self, success: bool) {
        self.transition(if success {
            SendState::Succeeded
        } else {
            SendState::Failed
        });
    }
}

impl Drop for SendGuard<'_> {
    fn drop(&mut self) {
        if !self.flags.state().is_terminal() {
            self.flags.set_state(SendState::Failed);
        }
        self.flags.awaiting_hardware.store(false, Ordering::SeqCst);
        self.flags.sending.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_sets_and_clears_flags() {
        let flags = SendFlags::default();
        assert_eq!(flags.state(), SendState::Idle);

        let guard = flags.begin();
        guard.awaiting_hardware();
        assert!(flags.is_sending());
        assert!(flags.awaiting_hardware_confirmation());
        assert_eq!(flags.state(), SendState::Validating);

        guard.finish(true);
        assert!(!flags.is_sending());
        assert!(!flags.awaiting_hardware_confirmation());
        assert_eq!(flags.state(), SendState::Succeeded);
    }

    #[test]
    fn test_dropped_guard_marks_failed() {
        let flags = SendFlags::default();
        {
            let guard = flags.begin();
            guard.transition(SendState::Broadcasting);
        }
        assert_eq!(flags.state(), SendState::Failed);
        assert!(!flags.is_sending());
    }
}
