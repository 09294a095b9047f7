//! Tests for the shared cancellation flag

#[cfg(test)]
mod tests {
    use tilematch::algorithm::cancel::CancelFlag;

    // Tests clones observe a cancellation raised through any handle
    // Verified by giving each clone its own atomic
    #[test]
    fn test_clones_share_state() {
        let flag = CancelFlag::new();
        let handle = flag.clone();
        assert!(!flag.is_cancelled());

        handle.cancel();
        assert!(flag.is_cancelled());
        assert!(handle.is_cancelled());
    }

    // Tests cancellation is visible across threads
    // Verified by storing the flag in a thread-local
    #[test]
    fn test_cancel_from_other_thread() {
        let flag = CancelFlag::new();
        let handle = flag.clone();
        std::thread::spawn(move || handle.cancel()).join().unwrap();
        assert!(flag.is_cancelled());
    }
}
