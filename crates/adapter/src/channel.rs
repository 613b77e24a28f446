//! Outgoing side of the server connection

use std::cell::RefCell;

use tokio::sync::mpsc;

use crate::protocol::OutboundMessage;

/// Fire-and-forget sender of protocol frames
pub trait MessageChannel {
    fn send(&self, message: OutboundMessage);
}

/// Encoded frames go to a writer task; a closed connection drops them
impl MessageChannel for mpsc::UnboundedSender<String> {
    fn send(&self, message: OutboundMessage) {
        let frame = message.encode();
        log::trace!("-> {}", frame);
        if mpsc::UnboundedSender::send(self, frame).is_err() {
            log::warn!("connection closed; dropping {}", message);
        }
    }
}

/// Records frames in order (tests, offline play)
impl MessageChannel for RefCell<Vec<OutboundMessage>> {
    fn send(&self, message: OutboundMessage) {
        self.borrow_mut().push(message);
    }
}

impl<C: MessageChannel + ?Sized> MessageChannel for std::rc::Rc<C> {
    fn send(&self, message: OutboundMessage) {
        (**self).send(message);
    }
}

impl<C: MessageChannel + ?Sized> MessageChannel for std::sync::Arc<C> {
    fn send(&self, message: OutboundMessage) {
        (**self).send(message);
    }
}
