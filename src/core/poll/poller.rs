// Poller facade: registration bookkeeping plus the wait/retry cycle
use std::fmt;
use std::io;
use std::time::Duration;

use libc::c_int;

use crate::common::constants::INDEFINITE_TIMEOUT_MS;
use crate::common::error::{PollError, Result};
use crate::common::logger::Logger;
use crate::common::time::Deadline;
use crate::config::PollerOptions;
use crate::core::net::fd::Pollable;
use crate::core::poll::events::EventMask;
use crate::core::poll::probe::{self, ReadinessProbe, SysPoll};
use crate::core::poll::quirk;
use crate::core::poll::records::RecordTable;
use crate::core::poll::registry::Registry;

/// Readiness multiplexer over a set of registered keys.
///
/// Each key contributes one record to a contiguous table handed to the
/// readiness syscall; `poll` reports `(key, returned_events)` for every
/// record whose returned mask came back non-zero. A single instance must
/// only ever be driven from one place at a time, which the `&mut self`
/// receivers enforce.
pub struct Poller<K, P = SysPoll> {
    records: RecordTable,
    registry: Registry<K>,
    probe: P,
    unreliable_disconnect_events: bool,
}

impl<K: Pollable> Poller<K> {
    pub fn new() -> Self {
        Self::with_options(PollerOptions::default())
    }

    pub fn with_options(options: PollerOptions) -> Self {
        Self::with_probe(options, SysPoll)
    }
}

impl<K: Pollable> Default for Poller<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Pollable, P: ReadinessProbe> Poller<K, P> {
    /// Build a poller over a caller-supplied readiness probe.
    pub fn with_probe(options: PollerOptions, probe: P) -> Self {
        let granularity = options
            .allocation_granularity
            .unwrap_or_else(probe::allocation_granularity);
        Self {
            records: RecordTable::new(granularity, options.size_hint_records),
            registry: Registry::new(),
            probe,
            unreliable_disconnect_events: options.unreliable_disconnect_events,
        }
    }

    /// Register `key` with the given interest mask.
    ///
    /// Re-registering a key whose descriptor is already in the set updates
    /// the existing slot's mask and replaces the stored key; the set never
    /// holds two records for one descriptor.
    pub fn register(&mut self, key: K, events: EventMask) -> Result<()> {
        let fd = key.poll_descriptor()?;
        match self.records.find(fd) {
            Some(index) => self.records.set_events(index, events),
            None => {
                self.records.append(fd, events);
            }
        }
        self.registry.set(fd, key);
        self.check_consistency();
        Ok(())
    }

    /// Update the interest mask for an already-registered key.
    pub fn modify(&mut self, key: K, events: EventMask) -> Result<()> {
        let fd = key.poll_descriptor()?;
        let index = self
            .records
            .find(fd)
            .ok_or(PollError::NotRegistered(fd))?;
        self.records.set_events(index, events);
        self.registry.set(fd, key);
        self.check_consistency();
        Ok(())
    }

    /// Remove `key` from the set, handing back the stored key object.
    pub fn unregister(&mut self, key: &K) -> Result<K> {
        let fd = key.poll_descriptor()?;
        let index = self
            .records
            .find(fd)
            .ok_or(PollError::NotRegistered(fd))?;
        self.records.remove_at(index);
        let stored = self
            .registry
            .remove(fd)
            .ok_or(PollError::NotRegistered(fd))?;
        self.check_consistency();
        Ok(stored)
    }

    /// Wait until at least one registered descriptor is ready or `timeout`
    /// elapses; `None` blocks indefinitely.
    ///
    /// Interrupted waits are retried against a deadline captured up front,
    /// so the total wait never exceeds the requested timeout. The result
    /// holds one entry per descriptor with a non-zero returned mask, in
    /// table order.
    pub fn poll(&mut self, timeout: Option<Duration>) -> Result<Vec<(&K, EventMask)>> {
        let mut timeout_ms = match timeout {
            Some(duration) => millis_round_up(duration),
            None => INDEFINITE_TIMEOUT_MS,
        };
        // Captured once; retries re-derive the remaining wait from it.
        // Indefinite waits have nothing to account, so they track nothing.
        let deadline = timeout.map(Deadline::after);

        self.advise_on_quirks(timeout);
        self.records.clear_returned();

        let ready = loop {
            match self.probe.wait(self.records.as_syscall_slice(), timeout_ms) {
                Ok(count) => break count,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {
                    if let Some(deadline) = &deadline {
                        // A zero remainder still gets one non-blocking check.
                        timeout_ms = millis_round_up(deadline.remaining());
                        Logger::debug(&format!(
                            "wait interrupted, {}ms of the timeout left",
                            timeout_ms
                        ));
                    }
                }
                Err(err) => return Err(PollError::Wait(err)),
            }
        };
        debug_assert!(
            ready <= self.records.len(),
            "readiness syscall reported {} ready of {} records",
            ready,
            self.records.len()
        );

        let mut result = Vec::with_capacity(ready);
        for slot in self.records.as_slice() {
            if slot.revents == 0 {
                continue;
            }
            match self.registry.get(slot.fd) {
                Some(key) => result.push((key, EventMask::from_bits_retain(slot.revents))),
                // A ready descriptor the registry does not know is a defect
                // in this component, not a caller error.
                None => debug_assert!(false, "descriptor {} ready but not registered", slot.fd),
            }
        }
        Ok(result)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.len() == 0
    }

    /// Snapshot of the registered set in table order. Replaying the pairs
    /// through `register` reconstructs an equivalent poller.
    pub fn registered(&self) -> impl Iterator<Item = (&K, EventMask)> + '_ {
        self.records.as_slice().iter().filter_map(move |slot| {
            self.registry
                .get(slot.fd)
                .map(|key| (key, EventMask::from_bits_retain(slot.events)))
        })
    }

    fn advise_on_quirks(&self, timeout: Option<Duration>) {
        if timeout.is_some() || !self.unreliable_disconnect_events {
            return;
        }
        if quirk::stale_disconnect_risk(self.records.as_slice(), probe::is_stream_socket) {
            Logger::warn(quirk::STALE_DISCONNECT_ADVICE);
        }
    }

    fn check_consistency(&self) {
        use std::collections::HashSet;
        use std::os::unix::io::RawFd;

        debug_assert_eq!(
            self.records.descriptors().collect::<HashSet<RawFd>>(),
            self.registry.descriptors().collect::<HashSet<RawFd>>(),
            "poll set inconsistency: table descriptors diverged from registry keys"
        );
    }
}

impl<K, P> fmt::Debug for Poller<K, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Poller ")?;
        let mut map = f.debug_map();
        for slot in self.records.as_slice() {
            map.entry(&slot.fd, &EventMask::from_bits_retain(slot.events));
        }
        map.finish()
    }
}

/// Whole milliseconds, rounding up so a caller's wait is never truncated
/// below what they asked for. Saturates at the syscall's `c_int` limit.
fn millis_round_up(timeout: Duration) -> c_int {
    let mut millis = timeout.as_millis();
    if timeout.subsec_nanos() % 1_000_000 != 0 {
        millis += 1;
    }
    millis.min(c_int::MAX as u128) as c_int
}
