//! Message receivers: anything a rendered template can be sent to.

use super::element::Text;

/// Something that can receive chat messages: a player, the console, a
/// broadcast channel. Implemented by the host.
pub trait MessageReceiver {
    fn send_message(&mut self, message: Text);

    fn send_messages(&mut self, messages: Vec<Text>) {
        for message in messages {
            self.send_message(message);
        }
    }
}

/// Collects every message it receives. Useful for plugin tests and for
/// buffering output before it reaches a real receiver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BufferedReceiver {
    pub messages: Vec<Text>,
}

impl MessageReceiver for BufferedReceiver {
    fn send_message(&mut self, message: Text) {
        self.messages.push(message);
    }
}
