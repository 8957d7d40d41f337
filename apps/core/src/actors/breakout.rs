use crate::actors::messages::{ActorError, AppError, BreakoutMessage};
use crate::actors::traits::InterestAnalyzer;
use crate::brain::KeywordExtractor;
use crate::breakout::{PartitionState, RoomEvent, RoomPartitioner};
use crate::config::BreakoutConfig;
use crate::models::{BreakoutRoom, ChatMessage, Participant};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{timeout, Duration};
use tracing::{info, instrument};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// A handle to the breakout coordinator.
///
/// The coordinator owns the single [`PartitionState`] of a meeting. All mutations
/// are queued through its channel and applied one at a time, and every committed
/// state is published in full to subscribers.
#[derive(Clone)]
pub struct BreakoutHandle {
    sender: mpsc::Sender<BreakoutMessage>,
    snapshots: watch::Receiver<Arc<PartitionState>>,
}

impl BreakoutHandle {
    /// Spawns a coordinator using the TF-IDF extractor. Must be called inside a tokio runtime.
    pub fn new(config: &BreakoutConfig) -> Self {
        Self::with_analyzer(config, KeywordExtractor::from_config(config))
    }

    /// Spawns a coordinator with a custom interest analyzer.
    pub fn with_analyzer<A: InterestAnalyzer>(config: &BreakoutConfig, analyzer: A) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        let (publisher, snapshots) = watch::channel(Arc::new(PartitionState::default()));
        let runner = BreakoutRunner {
            receiver,
            analyzer,
            partitioner: RoomPartitioner::from_config(config),
            state: Arc::new(PartitionState::default()),
            publisher,
        };
        tokio::spawn(async move { runner.run().await });
        Self { sender, snapshots }
    }

    /// Re-analyzes the chat and replaces the current rooms.
    ///
    /// Every current-room pointer is cleared, since the previous room ids no longer exist.
    #[instrument(skip_all, fields(participants = participants.len(), messages = messages.len()))]
    pub async fn regroup(
        &self,
        participants: Vec<Participant>,
        messages: Vec<ChatMessage>,
    ) -> Result<Vec<BreakoutRoom>, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = BreakoutMessage::Regroup {
            participants,
            messages,
            responder: send,
        };
        self.request(msg, recv).await
    }

    /// Moves a participant into a room. Fails with [`AppError::UnknownRoom`] for ids
    /// outside the current partition.
    #[instrument(skip(self, participant), fields(participant = %participant.id))]
    pub async fn join_room(&self, room_id: &str, participant: Participant) -> Result<(), AppError> {
        self.apply(RoomEvent::Join {
            room_id: room_id.to_string(),
            participant,
        })
        .await
    }

    /// Sends a participant back to the main session.
    #[instrument(skip(self))]
    pub async fn leave_room(&self, participant_id: &str) -> Result<(), AppError> {
        self.apply(RoomEvent::Leave {
            participant_id: participant_id.to_string(),
        })
        .await
    }

    pub async fn apply(&self, event: RoomEvent) -> Result<(), AppError> {
        let (send, recv) = oneshot::channel();
        self.request(
            BreakoutMessage::Apply {
                event,
                responder: send,
            },
            recv,
        )
        .await
    }

    /// The most recently committed state.
    pub fn snapshot(&self) -> Arc<PartitionState> {
        self.snapshots.borrow().clone()
    }

    /// A receiver that observes every committed state.
    pub fn subscribe(&self) -> watch::Receiver<Arc<PartitionState>> {
        self.snapshots.clone()
    }

    /// Stops the coordinator. Later requests fail with [`ActorError::Unavailable`].
    pub async fn shutdown(&self) -> Result<(), AppError> {
        self.sender
            .send(BreakoutMessage::Shutdown)
            .await
            .map_err(|e| AppError::Actor(ActorError::Unavailable(e.to_string())))
    }

    async fn request<T>(
        &self,
        msg: BreakoutMessage,
        recv: oneshot::Receiver<Result<T, AppError>>,
    ) -> Result<T, AppError> {
        self.sender
            .send(msg)
            .await
            .map_err(|e| AppError::Actor(ActorError::Unavailable(e.to_string())))?;
        timeout(REQUEST_TIMEOUT, recv)
            .await?
            .map_err(|e| AppError::Actor(ActorError::Unavailable(e.to_string())))?
    }
}

// --- Actor Runner ---
struct BreakoutRunner<A: InterestAnalyzer> {
    receiver: mpsc::Receiver<BreakoutMessage>,
    analyzer: A,
    partitioner: RoomPartitioner,
    state: Arc<PartitionState>,
    publisher: watch::Sender<Arc<PartitionState>>,
}

impl<A: InterestAnalyzer> BreakoutRunner<A> {
    async fn run(mut self) {
        info!("Breakout coordinator started");
        while let Some(msg) = self.receiver.recv().await {
            if !self.handle_message(msg) {
                break;
            }
        }
        info!("Breakout coordinator stopped");
    }

    /// Returns `false` once the coordinator should stop.
    fn handle_message(&mut self, msg: BreakoutMessage) -> bool {
        match msg {
            BreakoutMessage::Regroup {
                participants,
                messages,
                responder,
            } => {
                let index = self.analyzer.analyze(&messages);
                let rooms = self.partitioner.partition(&participants, &index);
                let result = self
                    .commit(RoomEvent::Replace {
                        rooms: rooms.clone(),
                    })
                    .map(|_| rooms);
                let _ = responder.send(result);
            }
            BreakoutMessage::Apply { event, responder } => {
                let _ = responder.send(self.commit(event));
            }
            BreakoutMessage::Shutdown => {
                info!("Breakout coordinator shutting down...");
                return false;
            }
        }
        true
    }

    fn commit(&mut self, event: RoomEvent) -> Result<(), AppError> {
        let next = self.state.apply(event)?;
        if next == *self.state {
            return Ok(());
        }
        let next = Arc::new(next);
        self.state = Arc::clone(&next);
        self.publisher.send_replace(next);
        Ok(())
    }
}
