// live.rs
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Weak};

use crate::gateway::{ChannelEvent, GatewayError, PushChannel};
use crate::store::events::StoreEvent;
use crate::store::store::ShipmentStore;

/// Bridges the push channel into the store.
///
/// At most one consumer is live per listener: attaching again (say, after a
/// credential change) first detaches the previous consumer, so broadcasts
/// are never counted twice by stacked handlers. Exceptions are consumed and
/// logged; they never take the listener down.
pub struct LiveUpdateListener {
    store: Weak<ShipmentStore>,
    generation: Arc<AtomicU64>,
}

impl LiveUpdateListener {
    pub fn new(store: &Arc<ShipmentStore>) -> Self {
        Self {
            store: Arc::downgrade(store),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Connect through a transport and start consuming its events.
    pub fn connect_channel(
        &self,
        channel: &dyn PushChannel,
        credential: &str,
    ) -> Result<(), GatewayError> {
        let events = channel.connect(credential)?;
        self.attach(events);
        Ok(())
    }

    /// Attach a consumer to an already-open event stream, detaching any
    /// previous one.
    pub fn attach(&self, events: Receiver<ChannelEvent>) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let current = Arc::clone(&self.generation);
        let store = self.store.clone();

        std::thread::spawn(move || {
            while let Ok(event) = events.recv() {
                if current.load(Ordering::SeqCst) != generation {
                    // A newer connection took over; this one applies nothing.
                    break;
                }

                match event {
                    ChannelEvent::Broadcast => match store.upgrade() {
                        Some(store) => store.apply(StoreEvent::ShipmentCreated),
                        None => break,
                    },
                    ChannelEvent::Exception(errors) => {
                        for error in errors {
                            eprintln!("⚠️ Channel exception: {error}");
                        }
                    }
                }
            }
        });
    }
}
