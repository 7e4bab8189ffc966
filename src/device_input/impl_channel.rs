use crate::device_input::interface::{Command, DeviceInput};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Mutex;

/// Commands pushed through a channel, e.g. by the buttons of the classifier
/// window, which holds the sending half.
pub struct DeviceInputChannel {
    receiver: Mutex<Option<Receiver<Command>>>,
}

impl DeviceInputChannel {
    pub fn new() -> (Self, Sender<Command>) {
        let (tx, rx) = channel();
        (
            Self {
                receiver: Mutex::new(Some(rx)),
            },
            tx,
        )
    }
}

impl DeviceInput for DeviceInputChannel {
    fn events(&self) -> Receiver<Command> {
        let taken = self.receiver.lock().ok().and_then(|mut r| r.take());
        match taken {
            Some(rx) => rx,
            None => {
                // already handed out: a disconnected receiver
                let (_tx, rx) = channel();
                rx
            }
        }
    }
}
