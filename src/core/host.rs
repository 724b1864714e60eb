use std::sync::mpsc::{self, Receiver, Sender};

/// Host notification captured on a foreign thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostMessage {
    Resize { width: u32, height: u32 },
    Shutdown,
    Pointer { x: i32, y: i32, action: i32 },
    Key { keycode: i32, action: i32 },
}

/// Sendable handle for hosts that deliver input off the render thread
///
/// Messages queue until the owning device drains them on its own thread,
/// at the start of each flip and in `pump_events`.
#[derive(Debug, Clone)]
pub struct HostHandle {
    sender: Sender<HostMessage>,
}

impl HostHandle {
    /// Returns false once the device has been dropped
    fn send(&self, message: HostMessage) -> bool {
        self.sender.send(message).is_ok()
    }

    pub fn notify_resize(&self, width: u32, height: u32) -> bool {
        self.send(HostMessage::Resize { width, height })
    }

    pub fn notify_shutdown(&self) -> bool {
        self.send(HostMessage::Shutdown)
    }

    pub fn notify_pointer(&self, x: i32, y: i32, action: i32) -> bool {
        self.send(HostMessage::Pointer { x, y, action })
    }

    pub fn notify_key(&self, keycode: i32, action: i32) -> bool {
        self.send(HostMessage::Key { keycode, action })
    }
}

/// Receiving end held by the device
#[derive(Debug)]
pub(crate) struct HostInbox {
    receiver: Receiver<HostMessage>,
}

impl HostInbox {
    /// All messages queued so far, without blocking
    pub(crate) fn pending(&self) -> impl Iterator<Item = HostMessage> + '_ {
        self.receiver.try_iter()
    }
}

pub(crate) fn channel() -> (HostHandle, HostInbox) {
    let (sender, receiver) = mpsc::channel();
    (HostHandle { sender }, HostInbox { receiver })
}
