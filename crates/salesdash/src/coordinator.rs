//! Hands out cancellation tokens so only the newest render pass survives.

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Token and sequence number of one render pass.
#[derive(Debug, Clone)]
pub struct PassTicket {
    /// Monotonic pass number, starting at 1.
    pub generation: u64,
    /// Cancelled when a newer pass starts or on shutdown.
    pub token: CancellationToken,
}

#[derive(Debug, Default)]
struct State {
    generation: u64,
    current: Option<CancellationToken>,
}

/// Tracks the in-flight render pass.
#[derive(Debug)]
pub struct PassCoordinator {
    shutdown: CancellationToken,
    state: Mutex<State>,
}

impl PassCoordinator {
    /// Creates a coordinator whose passes are all cancelled with `shutdown`.
    pub fn new(shutdown: CancellationToken) -> Self {
        Self {
            shutdown,
            state: Mutex::new(State::default()),
        }
    }

    /// Cancels the current pass, if any, and starts a new one.
    pub async fn begin(&self) -> PassTicket {
        let mut state = self.state.lock().await;
        if let Some(previous) = state.current.take() {
            if !previous.is_cancelled() {
                debug!(generation = state.generation, "Cancelling superseded render pass");
                previous.cancel();
            }
        }

        state.generation += 1;
        let token = self.shutdown.child_token();
        state.current = Some(token.clone());
        PassTicket {
            generation: state.generation,
            token,
        }
    }

    /// Number of passes started so far.
    pub async fn generation(&self) -> u64 {
        self.state.lock().await.generation
    }

    /// Token cancelling every pass.
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_pass_cancels_previous() {
        let coordinator = PassCoordinator::new(CancellationToken::new());
        let first = coordinator.begin().await;
        let second = coordinator.begin().await;

        assert!(first.token.is_cancelled());
        assert!(!second.token.is_cancelled());
        assert_eq!((first.generation, second.generation), (1, 2));
        assert_eq!(coordinator.generation().await, 2);
    }

    #[test]
    fn test_starts_at_generation_zero() {
        let coordinator = PassCoordinator::new(CancellationToken::new());
        assert_eq!(tokio_test::block_on(coordinator.generation()), 0);
    }

    #[tokio::test]
    async fn test_shutdown_cancels_current() {
        let shutdown = CancellationToken::new();
        let coordinator = PassCoordinator::new(shutdown.clone());
        let ticket = coordinator.begin().await;

        shutdown.cancel();
        assert!(ticket.token.is_cancelled());
        assert!(coordinator.shutdown_token().is_cancelled());
    }
}
