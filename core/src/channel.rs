//! [`async_channel`] re-exports and shims
pub use async_channel::*;

/// Creates a oneshot channel (bounded channel with a limit of 1 message)
pub fn oneshot<T>() -> (Sender<T>, Receiver<T>) {
    bounded(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn oneshot_holds_a_single_message() {
        let (sender, receiver) = oneshot::<u32>();
        sender.try_send(7).unwrap();
        assert!(sender.try_send(8).is_err());
        assert_eq!(receiver.len(), 1);
        assert_eq!(receiver.recv().await.unwrap(), 7);
        assert!(receiver.is_empty());
    }

    #[tokio::test]
    async fn recv_fails_once_all_senders_are_gone() {
        let (sender, receiver) = oneshot::<()>();
        drop(sender);
        assert!(receiver.recv().await.is_err());
    }
}
