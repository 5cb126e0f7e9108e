use super::recorder::Recorder;
use super::state::PauseOrigin;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Process lifecycle signals the recording machine reacts to.
///
/// These arrive over an explicit channel rather than a global broadcast so
/// the conditional-resume rule can be enforced with state the machine owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    EnteredBackground,
    EnteredForeground,
    WillTerminate,
    InterruptionBegan,
    InterruptionEnded { resume_suggested: bool },
}

/// Drive a recorder from a lifecycle-event channel.
///
/// Interruptions and backgrounding pause with their own origin; the matching
/// end signal resumes only a pause with that origin, so a session the user
/// paused by hand stays paused. Termination takes the emergency path.
pub fn spawn_lifecycle_listener(
    recorder: Recorder,
    mut events: mpsc::Receiver<LifecycleEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            debug!("Lifecycle event: {:?}", event);

            match event {
                LifecycleEvent::InterruptionBegan => {
                    recorder.pause_with(PauseOrigin::Interruption).await;
                }
                LifecycleEvent::InterruptionEnded { resume_suggested } => {
                    if resume_suggested {
                        if let Err(e) = recorder.resume_if(PauseOrigin::Interruption).await {
                            warn!("Resume after interruption failed: {}", e);
                        }
                    }
                }
                LifecycleEvent::EnteredBackground => {
                    recorder.pause_with(PauseOrigin::Background).await;
                }
                LifecycleEvent::EnteredForeground => {
                    if let Err(e) = recorder.resume_if(PauseOrigin::Background).await {
                        warn!("Resume after foregrounding failed: {}", e);
                    }
                }
                LifecycleEvent::WillTerminate => {
                    recorder.emergency_finalize();
                    break;
                }
            }
        }

        debug!("Lifecycle listener stopped");
    })
}
