//! Win announcement blink, driven by a background timer task.

use std::time::Duration;

use tokio::{sync::mpsc, task::JoinHandle, time};
use tracing::debug;

/// One repaint step of a blink sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlinkStep {
    pub generation: u64,
    pub step: u32,
    pub last: bool,
}

impl BlinkStep {
    /// Whether the highlight is drawn after this step. The final step always leaves it on.
    pub fn lit(&self) -> bool {
        self.last || self.step % 2 == 1
    }
}

/// Owns at most one running blink sequence.
#[derive(Debug, Default)]
pub struct BlinkTimer {
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl BlinkTimer {
    /// Cancel any running sequence and start a new one of `steps` steps.
    ///
    /// Each step is mapped through `wrap` and sent on `sender`. Returns the
    /// generation stamped on the new steps.
    pub fn start<E, F>(
        &mut self,
        steps: u32,
        interval: Duration,
        sender: mpsc::Sender<E>,
        wrap: F,
    ) -> u64
    where
        E: Send + 'static,
        F: Fn(BlinkStep) -> E + Send + 'static,
    {
        self.cancel();
        let generation = self.generation;
        self.handle = Some(tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            ticker.tick().await;
            for step in 0..steps {
                ticker.tick().await;
                let event = wrap(BlinkStep {
                    generation,
                    step,
                    last: step + 1 == steps,
                });
                if sender.send(event).await.is_err() {
                    break;
                }
            }
        }));
        debug!(generation, steps, "blink started");
        generation
    }

    /// Stop the running sequence. Steps already queued become stale.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!(generation = self.generation, "blink cancelled");
        }
        self.generation += 1;
    }

    /// True when `step` belongs to the most recently started sequence.
    pub fn is_current(&self, step: &BlinkStep) -> bool {
        step.generation == self.generation && self.handle.is_some()
    }

    /// Mark the sequence finished once its last step has been handled.
    pub fn finish(&mut self, step: &BlinkStep) {
        if step.last && self.is_current(step) {
            self.handle = None;
        }
    }
}

impl Drop for BlinkTimer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn emits_every_step_then_stops() {
        let (tx, mut rx) = mpsc::channel(16);
        let mut timer = BlinkTimer::default();
        let generation = timer.start(4, Duration::from_millis(5), tx, |step| step);

        let mut steps = Vec::new();
        while let Some(step) = rx.recv().await {
            assert!(timer.is_current(&step));
            steps.push(step);
        }

        assert_eq!(steps.len(), 4);
        assert!(steps.iter().all(|step| step.generation == generation));
        let lit: Vec<bool> = steps.iter().map(BlinkStep::lit).collect();
        assert_eq!(lit, vec![false, true, false, true]);
        assert!(steps[3].last);

        timer.finish(&steps[3]);
        assert!(!timer.is_current(&steps[3]));
    }

    #[tokio::test]
    async fn cancel_stops_the_sequence() {
        let (tx, mut rx) = mpsc::channel(16);
        let mut timer = BlinkTimer::default();
        timer.start(50, Duration::from_millis(20), tx, |step| step);
        timer.cancel();

        let mut received = 0;
        while let Some(step) = rx.recv().await {
            assert!(!timer.is_current(&step));
            received += 1;
        }
        assert!(received < 50);
    }

    #[tokio::test]
    async fn restarting_invalidates_older_steps() {
        let (tx, mut rx) = mpsc::channel(16);
        let mut timer = BlinkTimer::default();
        let first = timer.start(50, Duration::from_millis(20), tx.clone(), |step| step);
        let second = timer.start(1, Duration::from_millis(5), tx, |step| step);
        assert_ne!(first, second);

        let step = rx.recv().await.expect("step from second sequence");
        assert_eq!(step.generation, second);
        assert!(step.lit());
        assert!(timer.is_current(&step));
    }
}
