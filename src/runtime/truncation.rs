//! Truncation state machine.
//!
//! Tracks three pieces of state for one widget:
//! - intent: whether content should currently render clamped,
//! - measured state: whether the last completed pass found overflow,
//! - pass completion: whether a pass has completed for the current generation.
//!
//! Invariants:
//! - `is_truncated()` is `true` only after a completed pass found overflow. An effectful
//!   reset clears it until the next pass completes.
//! - `is_settled()` is `false` from an effectful reset until the next pass completes.
//! - At most one restoration and one measurement are pending at any time, and a
//!   measurement ticket from an older generation is discarded.
//! - A measurement is only handed out after a commit that rendered with intent `true`,
//!   so it never observes the tree of a commit that predates its reset.

use crate::runtime::scheduler::RenderScheduler;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TruncationPhase {
    Settled,
    Pending,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeferredKey {
    RestoreIntent,
    Measure,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Deferred {
    RestoreIntent,
    Measure { generation: u64 },
}

/// Which watched options differ between two configurations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConfigChange {
    pub content: bool,
    pub max_lines: bool,
    /// New truncation flag, when it changed.
    pub truncate: Option<bool>,
}

impl ConfigChange {
    pub fn any(&self) -> bool {
        self.content || self.max_lines || self.truncate.is_some()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleDirection {
    Expand,
    Collapse,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub direction: ToggleDirection,
    pub now_truncated: bool,
    /// Whether the toggle started a reset.
    pub reset: bool,
}

/// Permission to run one measurement against the current commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeasureTicket {
    generation: u64,
}

impl MeasureTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CommitOutcome {
    pub measure: Option<MeasureTicket>,
    /// Intent changed after the commit, so the view must render again.
    pub rerender: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MeasureStats {
    pub passes: u64,
    pub overflowing_passes: u64,
    pub resets: u64,
    pub coalesced_resets: u64,
}

#[derive(Debug)]
pub struct TruncationMachine {
    intent: bool,
    pending_restore: Option<bool>,
    is_truncated: bool,
    pass_complete: bool,
    generation: u64,
    scheduler: RenderScheduler<DeferredKey, Deferred>,
    stats: MeasureStats,
}

impl TruncationMachine {
    pub fn new(truncate: bool) -> Self {
        Self {
            intent: truncate,
            pending_restore: None,
            is_truncated: false,
            pass_complete: true,
            generation: 0,
            scheduler: RenderScheduler::new(),
            stats: MeasureStats::default(),
        }
    }

    /// Intent the view should render with right now.
    pub fn intent(&self) -> bool {
        self.intent
    }

    /// Intent once any pending restoration has run.
    pub fn logical_intent(&self) -> bool {
        self.pending_restore.unwrap_or(self.intent)
    }

    pub fn is_truncated(&self) -> bool {
        self.is_truncated
    }

    pub fn is_settled(&self) -> bool {
        self.pass_complete
    }

    pub fn phase(&self) -> TruncationPhase {
        if self.pass_complete {
            TruncationPhase::Settled
        } else {
            TruncationPhase::Pending
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn stats(&self) -> MeasureStats {
        self.stats
    }

    pub fn restore_pending(&self) -> bool {
        self.pending_restore.is_some()
    }

    pub fn measure_pending(&self) -> bool {
        self.scheduler.is_pending(DeferredKey::Measure)
    }

    fn set_logical_intent(&mut self, value: bool) {
        match self.pending_restore.as_mut() {
            Some(target) => *target = value,
            None => self.intent = value,
        }
    }

    /// Apply a configuration diff. Returns whether a reset was requested.
    pub fn apply_config_change(&mut self, change: ConfigChange) -> bool {
        if let Some(truncate) = change.truncate {
            self.set_logical_intent(truncate);
        }
        if !change.any() {
            return false;
        }
        log::debug!("configuration changed: {change:?}");
        self.reset();
        true
    }

    /// Force one unclamped render before the next measurement.
    ///
    /// Returns `false` when intent is off and the reset does nothing.
    pub fn reset(&mut self) -> bool {
        if !self.logical_intent() {
            log::trace!("reset skipped: intent is off");
            return false;
        }

        self.pass_complete = false;
        self.is_truncated = false;
        self.generation += 1;
        let _ = self.scheduler.cancel(DeferredKey::Measure);

        if self.pending_restore.is_some() {
            self.stats.coalesced_resets += 1;
            log::debug!(
                "reset coalesced into pending restoration (generation {})",
                self.generation
            );
            return true;
        }

        self.pending_restore = Some(self.intent);
        self.intent = false;
        self.scheduler
            .defer(DeferredKey::RestoreIntent, Deferred::RestoreIntent);
        self.stats.resets += 1;
        log::debug!("reset started (generation {})", self.generation);
        true
    }

    pub fn resize(&mut self) -> bool {
        log::debug!("viewport resized");
        self.reset()
    }

    pub fn toggle(&mut self) -> ToggleOutcome {
        let was_truncating = self.logical_intent();
        self.set_logical_intent(!was_truncating);

        let outcome = if was_truncating {
            ToggleOutcome {
                direction: ToggleDirection::Expand,
                now_truncated: false,
                reset: false,
            }
        } else {
            ToggleOutcome {
                direction: ToggleDirection::Collapse,
                now_truncated: true,
                reset: self.reset(),
            }
        };
        log::debug!("toggled: {outcome:?}");
        outcome
    }

    /// Schedule a measurement pass for after the current commit.
    ///
    /// No-op when settled or when intent is off. Returns whether a new pass was
    /// scheduled; a second call before the first pass ran is coalesced.
    pub fn measure(&mut self) -> bool {
        if self.pass_complete || !self.intent {
            return false;
        }
        let scheduled = self.scheduler.defer(
            DeferredKey::Measure,
            Deferred::Measure {
                generation: self.generation,
            },
        );
        if scheduled {
            log::trace!("measure scheduled (generation {})", self.generation);
        }
        scheduled
    }

    /// Post-render hook. `rendered_intent` is the intent the commit rendered with.
    pub fn post_render(&mut self, rendered_intent: bool) -> bool {
        if self.pass_complete || !rendered_intent {
            return false;
        }
        self.measure()
    }

    /// Run everything deferred until after the commit that just happened.
    pub fn run_deferred(&mut self) -> CommitOutcome {
        let mut outcome = CommitOutcome::default();
        for (_, task) in self.scheduler.take_due() {
            match task {
                Deferred::RestoreIntent => {
                    if let Some(target) = self.pending_restore.take() {
                        outcome.rerender |= target != self.intent;
                        self.intent = target;
                        log::trace!("intent restored to {target}");
                    }
                }
                Deferred::Measure { generation } => {
                    if generation == self.generation && self.intent && !self.pass_complete {
                        outcome.measure = Some(MeasureTicket { generation });
                    } else {
                        log::debug!(
                            "stale measurement dropped (ticket {generation}, current {})",
                            self.generation
                        );
                    }
                }
            }
        }
        outcome
    }

    /// Record the result of a measurement pass. Returns `false` for a stale ticket.
    pub fn complete_measure(&mut self, ticket: MeasureTicket, did_truncate: bool) -> bool {
        if ticket.generation != self.generation || self.pass_complete {
            log::debug!(
                "measurement result discarded (ticket {}, current {})",
                ticket.generation,
                self.generation
            );
            return false;
        }
        self.is_truncated = did_truncate;
        self.pass_complete = true;
        self.stats.passes += 1;
        if did_truncate {
            self.stats.overflowing_passes += 1;
        }
        log::debug!(
            "measurement completed (generation {}, truncated {did_truncate})",
            self.generation
        );
        true
    }
}
