use tokio::sync::mpsc::UnboundedSender;

/// Receives the announcements of a game, in order.
pub trait Narrator {
    fn say(&mut self, message: String);
}

/// Collects the announcements, e.g. to return them in a response.
impl Narrator for Vec<String> {
    fn say(&mut self, message: String) {
        self.push(message);
    }
}

/// Streams the announcements to another task.
impl Narrator for UnboundedSender<String> {
    fn say(&mut self, message: String) {
        if self.send(message).is_err() {
            log::warn!("Narration channel closed");
        }
    }
}

/// Logs every announcement before passing it on.
pub struct LogNarrator<N>(pub N);

impl<N: Narrator> Narrator for LogNarrator<N> {
    fn say(&mut self, message: String) {
        log::info!("{}", message);
        self.0.say(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn channel_keeps_order() {
        let (mut tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        tx.say("one".into());
        tx.say("two".into());
        drop(tx);
        assert_eq!(rx.recv().await.as_deref(), Some("one"));
        assert_eq!(rx.recv().await.as_deref(), Some("two"));
        assert_eq!(rx.recv().await, None);
    }

    #[test]
    fn logging_passes_messages_on() {
        let mut narrator = LogNarrator(Vec::<String>::new());
        narrator.say("hello".into());
        assert_eq!(narrator.0, ["hello"]);
    }
}
