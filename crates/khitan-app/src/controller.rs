use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::events::event_loop;
use crate::io::stdin_reader;
use crate::state::AppState;

/// Centralized channel management
pub struct ChannelSet {
    pub input_to_app: (AsyncSender<String>, AsyncReceiver<String>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            input_to_app: kanal::bounded_async(64),
        }
    }
}

impl Default for ChannelSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Interactive shell controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    state: Arc<AppState>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            channels: ChannelSet::new(),
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn spawn_tasks(&self) -> JoinSet<anyhow::Result<()>> {
        let tasks = self.spawn_event_loop();

        // Stdin reader runs on its own thread; a pending read must not hold
        // up runtime shutdown
        stdin_reader(self.channels.input_to_app.0.clone(), self.cancel_token.child_token());

        tasks
    }

    /// Event loop only, fed through `sender`
    pub fn spawn_event_loop(&self) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        tasks.spawn(event_loop(
            self.state.clone(),
            self.channels.input_to_app.1.clone(),
            self.cancel_token.clone(),
        ));

        tasks
    }

    pub fn sender(&self) -> AsyncSender<String> {
        self.channels.input_to_app.0.clone()
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
