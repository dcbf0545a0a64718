use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::trace;

use super::SessionEvent;
use crate::game::{PlaybackPlan, RoundToken};
use crate::sound::{play_best_effort, SoundId, SoundPlayer};

/// A running playback.
///
/// The task walks the plan step by step, reporting highlight changes and
/// completion on the session channel. Dropping the handle aborts the task.
pub struct PlaybackTask {
    token: RoundToken,
    handle: JoinHandle<()>,
}

impl PlaybackTask {
    pub fn spawn(
        token: RoundToken,
        plan: PlaybackPlan,
        sound: Arc<dyn SoundPlayer>,
        events: UnboundedSender<SessionEvent>,
    ) -> Self {
        let handle = tokio::spawn(run_plan(token, plan, sound, events));
        Self { token, handle }
    }

    pub fn token(&self) -> RoundToken {
        self.token
    }

    pub fn abort(&self) {
        self.handle.abort();
    }
}

impl Drop for PlaybackTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run_plan(
    token: RoundToken,
    plan: PlaybackPlan,
    sound: Arc<dyn SoundPlayer>,
    events: UnboundedSender<SessionEvent>,
) {
    for (i, step) in plan.steps.iter().enumerate() {
        trace!(?token, step = i, symbol = %step.symbol, "playback step");

        if events
            .send(SessionEvent::Highlight {
                token,
                symbol: Some(step.symbol),
            })
            .is_err()
        {
            // Session is gone
            return;
        }
        play_best_effort(sound.as_ref(), SoundId::Tone(step.symbol));
        sleep(step.highlight).await;

        if events
            .send(SessionEvent::Highlight {
                token,
                symbol: None,
            })
            .is_err()
        {
            return;
        }

        if !step.gap_after.is_zero() {
            sleep(step.gap_after).await;
        }
    }

    let _ = events.send(SessionEvent::PlaybackFinished { token });
}
