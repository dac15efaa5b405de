//! Minimal host loop: runs a [`VirtualUserIteration`] across a fixed number
//! of virtual users until an iteration count or a deadline is reached.
//!
//! There is no ramping and no result aggregation here; the report only says
//! how many iterations ran to completion.

use std::{sync::Arc, time::Duration};
use tokio::task::JoinSet;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::iteration::VirtualUserIteration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopCondition {
    /// Iterations per virtual user.
    Iterations(u64),
    Duration(Duration),
    /// Whichever limit is hit first.
    Both { iterations: u64, duration: Duration },
}

impl StopCondition {
    fn max_iterations(&self) -> Option<u64> {
        match self {
            StopCondition::Iterations(n) | StopCondition::Both { iterations: n, .. } => Some(*n),
            StopCondition::Duration(_) => None,
        }
    }

    fn deadline(&self, started: Instant) -> Option<Instant> {
        match self {
            StopCondition::Duration(d) | StopCondition::Both { duration: d, .. } => {
                Some(started + *d)
            }
            StopCondition::Iterations(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunPlan {
    pub virtual_users: usize,
    pub stop: StopCondition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub iterations_completed: u64,
    pub elapsed: Duration,
}

/// Drives `routine` on `plan.virtual_users` concurrent tasks.
///
/// Cancelling `cancel`, or reaching the deadline, drops any iteration still
/// in flight; it is not counted.
pub async fn run(
    plan: RunPlan,
    routine: Arc<dyn VirtualUserIteration>,
    cancel: CancellationToken,
) -> RunReport {
    let started = Instant::now();
    let deadline = plan.stop.deadline(started);
    let max_iterations = plan.stop.max_iterations();
    info!(
        virtual_users = plan.virtual_users,
        stop = ?plan.stop,
        "load run starting"
    );

    let mut users = JoinSet::new();
    for user in 0..plan.virtual_users {
        users.spawn(virtual_user(
            user,
            routine.clone(),
            max_iterations,
            deadline,
            cancel.clone(),
        ));
    }

    let mut iterations_completed = 0;
    while let Some(joined) = users.join_next().await {
        match joined {
            Ok(n) => iterations_completed += n,
            Err(e) => warn!(error = %e, "virtual user task ended abnormally"),
        }
    }

    let report = RunReport {
        iterations_completed,
        elapsed: started.elapsed(),
    };
    info!(
        iterations = report.iterations_completed,
        elapsed_ms = report.elapsed.as_millis() as u64,
        cancelled = cancel.is_cancelled(),
        "load run finished"
    );
    report
}

async fn virtual_user(
    user: usize,
    routine: Arc<dyn VirtualUserIteration>,
    max_iterations: Option<u64>,
    deadline: Option<Instant>,
    cancel: CancellationToken,
) -> u64 {
    let mut completed = 0;
    loop {
        if max_iterations.is_some_and(|max| completed >= max) || cancel.is_cancelled() {
            break;
        }
        let expired = async {
            match deadline {
                Some(at) => sleep_until(at).await,
                None => std::future::pending().await,
            }
        };
        tokio::select! {
            _ = routine.iterate() => completed += 1,
            _ = cancel.cancelled() => break,
            _ = expired => break,
        }
    }
    debug!(user, completed, "virtual user stopped");
    completed
}
