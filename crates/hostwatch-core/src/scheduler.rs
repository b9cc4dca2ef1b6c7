//! The monitor loop: periodic sweeps interleaved with queued chat commands.
//!
//! One task, cooperative and non-preemptive. Each iteration:
//! 1. runs a sweep if the timer is due,
//! 2. handles whatever commands are already queued,
//! 3. sleeps for one tick.
//!
//! A slow probe therefore delays command handling until it finishes.

use std::time::{Duration, Instant};

use chrono::Local;
use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::{
    commands::Command,
    monitor::{Monitor, SweepTrigger},
};

/// Fixed-interval timer. The next run is measured from when the previous
/// sweep *finished*, so sweeps never pile up.
#[derive(Clone, Debug)]
pub struct SweepTimer {
    interval: Duration,
    next_due: Instant,
}

impl SweepTimer {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next_due: now + interval,
        }
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_due
    }

    pub fn reset(&mut self, now: Instant) {
        self.next_due = now + self.interval;
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

pub struct MonitorLoop {
    monitor: Monitor,
    timer: SweepTimer,
    tick: Duration,
}

impl MonitorLoop {
    pub fn new(monitor: Monitor, interval: Duration, tick: Duration) -> Self {
        Self {
            monitor,
            timer: SweepTimer::new(interval, Instant::now()),
            tick,
        }
    }

    /// Run until every command sender is dropped and the queue is drained.
    pub async fn run(mut self, mut commands: mpsc::Receiver<Command>) {
        info!(
            interval_secs = self.timer.interval().as_secs(),
            "monitor loop started"
        );

        loop {
            if self.timer.is_due(Instant::now()) {
                self.monitor.sweep(SweepTrigger::Scheduled).await;
                self.timer.reset(Instant::now());
                log_next_sweep(self.timer.interval());
            }

            // Bound the drain so a command flood cannot starve the timer.
            for _ in 0..commands.max_capacity() {
                match commands.try_recv() {
                    Ok(cmd) => self.monitor.handle(cmd).await,
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        warn!("command transport closed, stopping monitor loop");
                        return;
                    }
                }
            }

            sleep(self.tick).await;
        }
    }
}

fn log_next_sweep(interval: Duration) {
    match chrono::Duration::from_std(interval) {
        Ok(d) => {
            let next = Local::now() + d;
            info!(next_sweep = %next.format("%Y-%m-%d %H:%M:%S"), "sweep scheduled");
        }
        Err(_) => info!("sweep scheduled"),
    }
}
