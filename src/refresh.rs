//! Periodic re-fetch of live screens.
//!
//! One tick chain runs for the whole session once a live screen has been
//! entered. Every tick re-arms itself; whether it also fetches is decided
//! at firing time from the screen that is active then, so a tick never
//! loads data into a screen the operator has already left.

use std::time::Duration;

use crate::worker::Command;

#[derive(Clone, Debug)]
pub struct RefreshScheduler {
    period: Duration,
    armed: bool,
}

impl RefreshScheduler {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            armed: false,
        }
    }

    /// Start the chain if it is not running yet.
    pub fn arm(&mut self) -> Option<Command> {
        if self.armed {
            return None;
        }
        self.armed = true;
        tracing::debug!(period_ms = self.period.as_millis() as u64, "refresh armed");
        Some(self.next_tick())
    }

    /// Handle a firing: always reschedule, and fetch only when `live_fetch`
    /// names the load of the screen active right now.
    pub fn on_tick(&mut self, live_fetch: Option<Command>) -> Vec<Command> {
        self.armed = true;
        let mut cmds = vec![self.next_tick()];
        cmds.extend(live_fetch);
        cmds
    }

    fn next_tick(&self) -> Command {
        Command::ScheduleTick { after: self.period }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arm_only_once() {
        let mut r = RefreshScheduler::new(Duration::from_secs(2));
        assert_eq!(
            r.arm(),
            Some(Command::ScheduleTick {
                after: Duration::from_secs(2)
            })
        );
        assert_eq!(r.arm(), None);
    }

    #[test]
    fn idle_tick_keeps_the_chain() {
        let mut r = RefreshScheduler::new(Duration::from_millis(500));
        let cmds = r.on_tick(None);
        assert_eq!(
            cmds,
            vec![Command::ScheduleTick {
                after: Duration::from_millis(500)
            }]
        );
    }

    #[test]
    fn live_tick_fetches_and_reschedules() {
        let mut r = RefreshScheduler::new(Duration::from_millis(500));
        let cmds = r.on_tick(Some(Command::FetchMachines));
        assert_eq!(cmds.len(), 2);
        assert!(cmds.contains(&Command::FetchMachines));
    }
}
