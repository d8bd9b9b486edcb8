use anyhow::{bail, Result};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::config::Config;
use crate::types::Target;

/// Pacing state for one polling schedule.
///
/// Query start times are spread evenly: with N hosts and interval I,
/// consecutive dispatches are one step (I/N) apart, so every host is
/// queried exactly once per interval without bursting. All offsets are
/// relative to the scheduler loop's epoch.
#[derive(Debug, Clone)]
pub struct Schedule {
    /// Target spacing between dispatches. `None` in one-shot mode.
    step: Option<Duration>,
    /// Offset of the next dispatch slot. Only ever advances, even
    /// across reloads, so a slow reload cannot cause a query burst.
    next_run: Duration,
}

impl Schedule {
    pub fn new(interval: Option<Duration>, host_count: usize) -> Result<Self> {
        if host_count == 0 {
            bail!("cannot schedule zero hosts");
        }
        let step = match interval {
            Some(i) => Some(i / host_count as u32),
            None => None,
        };
        Ok(Self { step, next_run: Duration::ZERO })
    }

    pub fn is_one_shot(&self) -> bool {
        self.step.is_none()
    }

    pub fn step(&self) -> Option<Duration> {
        self.step
    }

    /// Recompute the step from a new interval and host count,
    /// preserving `next_run`. Hosts already paced in the current
    /// sweep are not rescheduled.
    pub fn reschedule(&mut self, interval: Option<Duration>, host_count: usize) -> Result<()> {
        let fresh = Schedule::new(interval, host_count)?;
        self.step = fresh.step;
        Ok(())
    }

    /// How long to sleep before the next dispatch, given the time
    /// elapsed since the loop epoch. Advances `next_run` by one step.
    ///
    /// If the loop was blocked past its slot the result is zero
    /// (catch-up dispatches happen immediately). If the computed
    /// sleep exceeds one step (e.g. the step shrank on reload) it is
    /// reduced modulo the step and the slot is re-anchored to the
    /// clock, so subsequent dispatches pace at the new step instead
    /// of burning down the stale offset with zero-sleeps.
    pub fn sleep_before(&mut self, elapsed: Duration) -> Duration {
        let step = match self.step {
            Some(s) => s,
            None => return Duration::ZERO,
        };
        let mut sleep = self.next_run.saturating_sub(elapsed);
        if !step.is_zero() && sleep > step {
            sleep = Duration::from_nanos((sleep.as_nanos() % step.as_nanos()) as u64);
            self.next_run = elapsed + sleep;
        }
        self.next_run += step;
        sleep
    }
}

/// The pacing loop. Owns the active configuration and the schedule
/// state; reload application is funneled through this loop so the
/// state has a single writer.
pub struct Scheduler {
    config: Config,
    schedule: Schedule,
}

impl Scheduler {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let schedule = Schedule::new(config.poll_interval()?, config.host_count())?;
        Ok(Self { config, schedule })
    }

    /// Run sweeps until shut down (continuous mode) or for exactly one
    /// sweep (one-shot mode).
    ///
    /// `dispatch` is invoked once per host per sweep, in config order,
    /// at that host's slot boundary. It must not block: the per-host
    /// round runs as a spawned task, fire-and-forget, unbounded by
    /// anything but the host count.
    pub async fn run<F>(mut self, mut reload_rx: mpsc::Receiver<Config>, mut dispatch: F)
    where
        F: FnMut(Target),
    {
        let epoch = Instant::now();
        loop {
            // Apply pending reloads between sweeps.
            while let Ok(new) = reload_rx.try_recv() {
                self.apply(new);
            }

            for target in self.config.targets() {
                let sleep = self.schedule.sleep_before(epoch.elapsed());
                if !sleep.is_zero() {
                    tokio::time::sleep(sleep).await;
                }
                dispatch(target);
            }

            if self.schedule.is_one_shot() {
                tracing::info!("One-shot sweep complete");
                return;
            }
        }
    }

    fn apply(&mut self, new: Config) {
        let interval = match new.poll_interval() {
            Ok(i) => i,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring reload with bad interval");
                return;
            }
        };
        if let Err(e) = self.schedule.reschedule(interval, new.host_count()) {
            tracing::warn!(error = %e, "Ignoring reload");
            return;
        }
        self.config = new;
        tracing::info!(
            hosts = self.config.host_count(),
            one_shot = self.schedule.is_one_shot(),
            "Configuration reloaded"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    /// Simulate a loop where dispatch is instantaneous: elapsed time
    /// only advances by the sleeps the schedule asks for. Returns the
    /// dispatch offsets.
    fn simulate(schedule: &mut Schedule, dispatches: usize) -> Vec<Duration> {
        let mut elapsed = Duration::ZERO;
        let mut out = Vec::new();
        for _ in 0..dispatches {
            elapsed += schedule.sleep_before(elapsed);
            out.push(elapsed);
        }
        out
    }

    #[test]
    fn pacing_spreads_hosts_evenly() {
        for (hosts, interval) in [(1, 60), (3, 60), (4, 120), (7, 35), (10, 600)] {
            let mut sched = Schedule::new(Some(secs(interval)), hosts).unwrap();
            let step = secs(interval) / hosts as u32;
            // One full sweep plus the first slot of the next one.
            let times = simulate(&mut sched, hosts + 1);
            for pair in times.windows(2) {
                assert_eq!(pair[1] - pair[0], step, "hosts={} interval={}", hosts, interval);
            }
            // The gaps over one sweep sum to the full interval.
            assert_eq!(times[hosts] - times[0], secs(interval));
        }
    }

    #[test]
    fn blocked_dispatch_catches_up_without_drift() {
        let mut sched = Schedule::new(Some(secs(40)), 4).unwrap();
        let step = secs(10);
        assert_eq!(sched.sleep_before(Duration::ZERO), Duration::ZERO);
        // The first round blocked for 2.5 steps.
        let mut elapsed = secs(25);
        let mut sleeps = Vec::new();
        for _ in 0..4 {
            let s = sched.sleep_before(elapsed);
            elapsed += s;
            sleeps.push(s);
        }
        // Missed slots fire immediately, then pacing resumes; no sleep
        // ever exceeds one step and the backlog does not compound.
        assert_eq!(sleeps, [Duration::ZERO, Duration::ZERO, secs(5), secs(10)]);
    }

    #[test]
    fn oversized_sleep_reduced_modulo_step() {
        // Step shrinks on reload while next_run is still far out.
        let mut sched = Schedule::new(Some(secs(95)), 1).unwrap();
        assert_eq!(sched.sleep_before(Duration::ZERO), Duration::ZERO);
        // next_run is now 95s out; shrink the step to 10s.
        sched.reschedule(Some(secs(100)), 10).unwrap();
        assert_eq!(sched.sleep_before(Duration::ZERO), secs(5));
    }

    #[test]
    fn pacing_recovers_after_reload_shrinks_step() {
        let mut sched = Schedule::new(Some(secs(95)), 1).unwrap();
        assert_eq!(sched.sleep_before(Duration::ZERO), Duration::ZERO);
        // next_run sits 95s out when the step shrinks to 10s.
        sched.reschedule(Some(secs(100)), 10).unwrap();
        let mut elapsed = Duration::ZERO;
        let mut sleeps = Vec::new();
        for _ in 0..5 {
            let s = sched.sleep_before(elapsed);
            elapsed += s;
            sleeps.push(s);
        }
        // One reduced sleep, then steady pacing at the new step; the
        // stale offset must not turn into a run of zero-sleeps.
        assert_eq!(sleeps, [secs(5), secs(10), secs(10), secs(10), secs(10)]);
    }

    #[test]
    fn one_shot_skips_pacing() {
        let mut sched = Schedule::new(None, 3).unwrap();
        assert!(sched.is_one_shot());
        for _ in 0..3 {
            assert_eq!(sched.sleep_before(secs(123)), Duration::ZERO);
        }
    }

    #[test]
    fn zero_hosts_rejected() {
        assert!(Schedule::new(Some(secs(60)), 0).is_err());
        assert!(Schedule::new(None, 0).is_err());
    }

    fn test_config(hosts: &[&str], interval: &str) -> Config {
        let mut yaml = String::from("nxapi:\n  - user: admin\n    password: pw\n    host:\n");
        for h in hosts {
            yaml.push_str(&format!("      - {}\n", h));
        }
        if !interval.is_empty() {
            yaml.push_str(&format!("interval: {}\n", interval));
        }
        serde_yaml::from_str(&yaml).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn scheduler_paces_dispatches_on_the_clock() {
        let cfg = test_config(&["sw1", "sw2", "sw3", "sw4"], "40s");
        let scheduler = Scheduler::new(cfg).unwrap();
        let (_reload_tx, reload_rx) = mpsc::channel(1);
        let (tx, mut rx) = mpsc::unbounded_channel();

        let handle = tokio::spawn(scheduler.run(reload_rx, move |t: Target| {
            let _ = tx.send((t.host, Instant::now()));
        }));

        let mut seen = Vec::new();
        for _ in 0..8 {
            seen.push(rx.recv().await.unwrap());
        }
        handle.abort();

        let hosts: Vec<&str> = seen.iter().map(|(h, _)| h.as_str()).collect();
        assert_eq!(hosts, ["sw1", "sw2", "sw3", "sw4", "sw1", "sw2", "sw3", "sw4"]);
        for pair in seen.windows(2) {
            assert_eq!(pair[1].1 - pair[0].1, secs(10));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn reload_applies_between_sweeps() {
        let cfg = test_config(&["sw1", "sw2"], "20s");
        let scheduler = Scheduler::new(cfg).unwrap();
        let (reload_tx, reload_rx) = mpsc::channel(1);
        let (tx, mut rx) = mpsc::unbounded_channel();

        let handle = tokio::spawn(scheduler.run(reload_rx, move |t: Target| {
            let _ = tx.send(t.host);
        }));

        // First sweep runs with the original host list.
        assert_eq!(rx.recv().await.unwrap(), "sw1");
        assert_eq!(rx.recv().await.unwrap(), "sw2");

        reload_tx
            .send(test_config(&["sw1", "sw2", "sw3"], "30s"))
            .await
            .unwrap();

        // A following sweep picks up the new host list. The reload
        // may land before the next sweep or the one after, depending
        // on where the loop is sleeping, but it must land.
        let mut later = Vec::new();
        for _ in 0..6 {
            later.push(rx.recv().await.unwrap());
        }
        handle.abort();
        assert!(later.windows(3).any(|w| w == ["sw1", "sw2", "sw3"]));
    }

    #[tokio::test]
    async fn one_shot_scheduler_dispatches_each_host_once() {
        let cfg = test_config(&["sw1", "sw2", "sw3"], "");
        let scheduler = Scheduler::new(cfg).unwrap();
        let (_reload_tx, reload_rx) = mpsc::channel(1);
        let mut seen = Vec::new();
        scheduler.run(reload_rx, |t: Target| seen.push(t.host)).await;
        assert_eq!(seen, ["sw1", "sw2", "sw3"]);
    }
}
