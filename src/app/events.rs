// app/events.rs - State Change Notifications
//
// Producers publish typed events; ruler windows and the magnifier subscribe and
// update themselves from what they receive.

use log::debug;
use tokio::sync::broadcast;

use crate::ruler::{DividerPair, HandleSnapConfiguration, NudgeEvent, Orientation};
use crate::units::UnitType;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum MeasureEvent {
    UnitChanged(UnitType),
    SnapSettingsChanged(HandleSnapConfiguration),
    DividersChanged {
        orientation: Orientation,
        dividers: DividerPair,
    },
    /// A handle just landed on a snap candidate; the view flashes once
    SnapPulse {
        orientation: Orientation,
        value: f64,
    },
    RulerVisibilityChanged {
        orientation: Orientation,
        shown: bool,
    },
    MagnificationChanged(f64),
    MeasurementScaleChanged {
        scale: f64,
        show_override: bool,
    },
    Nudge(NudgeEvent),
}

/// Broadcast bus for [`MeasureEvent`]s
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<MeasureEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MeasureEvent> {
        self.sender.subscribe()
    }

    /// Publish to every current subscriber. Having none is not an error.
    pub fn publish(&self, event: MeasureEvent) {
        if let Err(broadcast::error::SendError(event)) = self.sender.send(event) {
            debug!("No subscribers for {:?}", event);
        }
    }
}
