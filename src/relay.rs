//! Hand-off between the transport's delivery threads and the UI loop.
//!
//! Subscription callbacks fire on whatever thread the transport owns; plot
//! state must only ever change on the UI loop. The relay is the single
//! crossing point: callbacks enqueue, the UI loop drains on its own turn.
//! Delivery is FIFO and non-lossy, one enqueued update per received update.

use crossbeam_channel::{Receiver, Sender, TryIter, unbounded};

use crate::pv::ProcessVariable;
use crate::types::{PvValue, SignalUpdate, WaveSignal};

/// Sender half, cloneable into subscription callbacks.
#[derive(Clone)]
pub struct UpdateRelay {
    tx: Sender<SignalUpdate>,
}

/// Receiver half, owned by the UI loop.
pub struct UpdateReceiver {
    rx: Receiver<SignalUpdate>,
}

pub fn channel() -> (UpdateRelay, UpdateReceiver) {
    let (tx, rx) = unbounded();
    (UpdateRelay { tx }, UpdateReceiver { rx })
}

impl UpdateRelay {
    /// Enqueue one update. Never blocks; a send after the display has gone
    /// away is silently dropped, matching a dialog that was closed while the
    /// subscription kept delivering.
    pub fn relay(&self, update: SignalUpdate) {
        let _ = self.tx.send(update);
    }

    /// Subscribe `pv` and forward every waveform update it delivers, tagged
    /// as `signal`. Non-array updates are ignored.
    pub fn attach(&self, pv: &dyn ProcessVariable, signal: WaveSignal) {
        let relay = self.clone();
        pv.subscribe(Box::new(move |value| {
            if let PvValue::ArrayF64(samples) = value {
                relay.relay(SignalUpdate::new(signal, samples.clone()));
            }
        }));
    }
}

impl UpdateReceiver {
    pub fn try_next(&self) -> Option<SignalUpdate> {
        self.rx.try_recv().ok()
    }

    /// Drain everything queued so far without blocking.
    pub fn try_iter(&self) -> TryIter<'_, SignalUpdate> {
        self.rx.try_iter()
    }
}
