//! Injected environment capabilities.
//!
//! The host decides what time it is, which callers count as
//! externally-initiated actors, and which addresses host a probeable token
//! contract. The engine only ever sees these trait objects, so every
//! capability is mockable in tests.

use boostpass_types::{Address, Timestamp};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current time, in UNIX seconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time from the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default()
    }
}

/// Settable clock for deterministic tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Mutex<Timestamp>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, now: Timestamp) {
        *self.now.lock() = now;
    }

    pub fn advance(&self, secs: u64) {
        let mut now = self.now.lock();
        *now = now.saturating_add(secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock()
    }
}

/// Distinguishes externally-initiated actors from automated/program callers.
///
/// The concrete detection mechanism (code-presence probing) is a host
/// concern; the engine only asks the question.
pub trait CallerClassifier: Send + Sync {
    fn is_external(&self, caller: &Address) -> bool;
}

/// Treats every caller as external. Suitable for hosts without a program
/// model.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAllCallers;

impl CallerClassifier for AllowAllCallers {
    fn is_external(&self, _caller: &Address) -> bool {
        true
    }
}

/// Classifier backed by an explicit directory of known program addresses.
#[derive(Debug, Default)]
pub struct ProgramDirectory {
    programs: HashSet<Address>,
}

impl ProgramDirectory {
    pub fn new(programs: impl IntoIterator<Item = Address>) -> Self {
        Self {
            programs: programs.into_iter().collect(),
        }
    }
}

impl CallerClassifier for ProgramDirectory {
    fn is_external(&self, caller: &Address) -> bool {
        !self.programs.contains(caller)
    }
}

/// Probes whether an address hosts a fungible-token contract: executable
/// code present and a fixed-size read-only `decimals` query answered with
/// exactly 32 bytes.
pub trait TokenProbe: Send + Sync {
    fn probe(&self, token: &Address) -> bool;
}

/// Accepts every address as a valid token contract.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllTokens;

impl TokenProbe for AcceptAllTokens {
    fn probe(&self, _token: &Address) -> bool {
        true
    }
}

/// Probe backed by an explicit allow-set of token addresses.
#[derive(Debug, Default)]
pub struct StaticTokenProbe {
    known: HashSet<Address>,
}

impl StaticTokenProbe {
    pub fn new(known: impl IntoIterator<Item = Address>) -> Self {
        Self {
            known: known.into_iter().collect(),
        }
    }
}

impl TokenProbe for StaticTokenProbe {
    fn probe(&self, token: &Address) -> bool {
        self.known.contains(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address([byte; 32])
    }

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::new(1_000);
        assert_eq!(clock.now(), 1_000);
        clock.advance(60);
        assert_eq!(clock.now(), 1_060);
        clock.set(500);
        assert_eq!(clock.now(), 500);
    }

    #[test]
    fn program_directory_flags_programs() {
        let classifier = ProgramDirectory::new([addr(9)]);
        assert!(!classifier.is_external(&addr(9)));
        assert!(classifier.is_external(&addr(1)));
    }

    #[test]
    fn static_probe_rejects_unknown_tokens() {
        let probe = StaticTokenProbe::new([addr(3)]);
        assert!(probe.probe(&addr(3)));
        assert!(!probe.probe(&addr(4)));
    }
}
