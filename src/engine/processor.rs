//! Dispatch of command-file chunks and the single-writer mutation task

use std::time::SystemTime;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use super::handlers;
use crate::app::events::{Effect, EngineEvent};
use crate::protocol::{split_commands, Directive};
use crate::state::DialogState;

/// Owns the dialog state and applies command-file text to it
pub struct CommandProcessor {
    state: DialogState,
    launch_time: SystemTime,
}

impl CommandProcessor {
    /// Create a processor; content modified before `launch_time` is ignored
    pub fn new(state: DialogState, launch_time: SystemTime) -> Self {
        Self { state, launch_time }
    }

    pub fn state(&self) -> &DialogState {
        &self.state
    }

    /// Apply every directive in a chunk, returning the requested effects
    ///
    /// `modified` is the command file's modification time when the chunk
    /// was read. Anything written before this process started is stale.
    pub fn process(&mut self, chunk: &str, modified: SystemTime) -> Vec<Effect> {
        let mut effects = Vec::new();

        if modified < self.launch_time {
            debug!("Ignoring command file content written before launch");
            return effects;
        }

        for line in split_commands(chunk) {
            match Directive::parse(line) {
                Some(directive) => {
                    debug!("Applying directive: {:?}", directive);
                    handlers::apply(&mut self.state, directive, &mut effects);
                }
                None => debug!("Ignoring unrecognised command: {}", line),
            }
        }

        effects
    }

    /// Run as the only writer of the state
    ///
    /// Each chunk is applied in full before a single snapshot is published,
    /// so observers never see a half-applied batch. Returns when the event
    /// channel closes or the effect receiver is gone.
    pub async fn run(
        mut self,
        mut rx: mpsc::Receiver<EngineEvent>,
        state_tx: watch::Sender<DialogState>,
        effect_tx: mpsc::Sender<Effect>,
    ) {
        info!("Command processor started");

        while let Some(event) = rx.recv().await {
            let EngineEvent::Chunk { text, modified } = event;
            let effects = self.process(&text, modified);

            state_tx.send_if_modified(|published| {
                if *published == self.state {
                    false
                } else {
                    *published = self.state.clone();
                    true
                }
            });

            for effect in effects {
                if effect_tx.send(effect).await.is_err() {
                    warn!("Effect receiver dropped, stopping command processor");
                    return;
                }
            }
        }

        info!("Command processor stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::events::EXIT_CODE_COMMAND_QUIT;
    use crate::state::StatusIcon;
    use std::time::Duration;

    fn processor() -> CommandProcessor {
        CommandProcessor::new(DialogState::default(), SystemTime::now())
    }

    #[test]
    fn test_scenario_chunk() {
        let mut processor = processor();
        let chunk = "title: Hello\nwidth: 500\nprogress: 42\nlist: A,B,C\nlist-item: title: B, status: success\n";
        let effects = processor.process(chunk, SystemTime::now());

        let state = processor.state();
        assert_eq!(state.options.title.value, "Hello");
        assert_eq!(state.window.width, 500.0);
        assert_eq!(state.progress.value, Some(42.0));
        let titles: Vec<&str> = state.list_items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
        assert_eq!(state.list_items.get(1).unwrap().status_icon, Some(StatusIcon::Success));
        assert!(matches!(effects.as_slice(), [Effect::Reposition { .. }]));
    }

    #[test]
    fn test_stale_content_is_ignored() {
        let mut processor = processor();
        let before_launch = SystemTime::now() - Duration::from_secs(60);
        let effects = processor.process("title: Old\nquit:\n", before_launch);

        assert!(effects.is_empty());
        assert_eq!(processor.state(), &DialogState::default());
    }

    #[test]
    fn test_unknown_lines_are_skipped() {
        let mut processor = processor();
        processor.process("bogus: 1\ntitle: Kept\n\n", SystemTime::now());
        assert_eq!(processor.state().options.title.value, "Kept");
    }

    #[tokio::test]
    async fn test_run_publishes_snapshot_and_forwards_quit() {
        let (tx, rx) = mpsc::channel(8);
        let (state_tx, mut state_rx) = watch::channel(DialogState::default());
        let (effect_tx, mut effect_rx) = mpsc::channel(8);

        let handle = tokio::spawn(processor().run(rx, state_tx, effect_tx));

        tx.send(EngineEvent::Chunk {
            text: "title: Live\nquit:\n".to_string(),
            modified: SystemTime::now(),
        })
        .await
        .unwrap();

        let effect = effect_rx.recv().await.unwrap();
        assert_eq!(
            effect,
            Effect::Quit {
                exit_code: EXIT_CODE_COMMAND_QUIT
            }
        );
        assert!(state_rx.has_changed().unwrap());
        assert_eq!(state_rx.borrow_and_update().options.title.value, "Live");

        drop(tx);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_run_skips_publish_when_unchanged() {
        let (tx, rx) = mpsc::channel(8);
        let (state_tx, state_rx) = watch::channel(DialogState::default());
        let (effect_tx, mut effect_rx) = mpsc::channel(8);

        let handle = tokio::spawn(processor().run(rx, state_tx, effect_tx));

        tx.send(EngineEvent::Chunk {
            text: "webcontent: ftp://example.com\nactivate:\n".to_string(),
            modified: SystemTime::now(),
        })
        .await
        .unwrap();

        assert_eq!(effect_rx.recv().await.unwrap(), Effect::Activate);
        assert!(!state_rx.has_changed().unwrap());

        drop(tx);
        handle.await.unwrap();
    }
}
