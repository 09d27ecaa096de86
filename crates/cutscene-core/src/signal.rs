//! One-shot signals passed between collaborators and the director.
//!
//! A signal fires at most once. The receiving half is an owned token:
//! dropping it is the unsubscribe, so a subscription can never be released
//! twice or leak past the playback that created it.

use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

/// Observed state of a signal receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalState {
    /// The signal has not fired yet.
    Pending,
    /// The signal fired.
    Fired,
    /// The sending half was dropped without firing.
    Abandoned,
}

/// Sending half of a one-shot signal.
#[derive(Debug)]
pub struct SignalSender(Option<oneshot::Sender<()>>);

impl SignalSender {
    /// Fires the signal. Returns `true` if a live receiver observed it.
    /// Firing an already-fired sender is a no-op returning `false`.
    pub fn fire(&mut self) -> bool {
        self.0.take().is_some_and(|tx| tx.send(()).is_ok())
    }

    /// Whether the signal is still unfired and somebody is listening.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.0.as_ref().is_some_and(|tx| !tx.is_closed())
    }
}

/// Receiving half of a one-shot signal, polled once per tick.
#[derive(Debug)]
pub struct SignalReceiver {
    rx: oneshot::Receiver<()>,
    state: SignalState,
}

impl SignalReceiver {
    /// Polls without blocking. Once the signal has fired or been abandoned
    /// the terminal state is sticky.
    pub fn poll(&mut self) -> SignalState {
        if self.state != SignalState::Pending {
            return self.state;
        }
        self.state = match self.rx.try_recv() {
            Ok(()) => SignalState::Fired,
            Err(TryRecvError::Empty) => SignalState::Pending,
            Err(TryRecvError::Closed) => SignalState::Abandoned,
        };
        self.state
    }
}

/// Creates a connected sender/receiver pair.
#[must_use]
pub fn signal() -> (SignalSender, SignalReceiver) {
    let (tx, rx) = oneshot::channel();
    (
        SignalSender(Some(tx)),
        SignalReceiver {
            rx,
            state: SignalState::Pending,
        },
    )
}
