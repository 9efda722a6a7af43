// src/crawl/frontier.rs
// =============================================================================
// The frontier is the state every worker shares:
// - a queue of candidate URLs waiting to be processed
// - the set of URLs already claimed by some worker
// - a counter of unfinished items, used to detect when the crawl is done
//
// The queue tracks "unfinished" items the same way a task queue does:
// every enqueue adds one, every task_done() removes one. When the counter
// hits zero nothing is queued and nothing is being processed, so no more
// work can ever appear. join() waits for exactly that moment.
//
// Rust concepts:
// - tokio::sync::Mutex: An async-aware lock (waiting on it doesn't block a thread)
// - tokio::sync::Notify: Lets one task wake up others that are waiting
// =============================================================================

use std::collections::{HashSet, VecDeque};
use tokio::sync::{Mutex, Notify};
use tracing::debug;

use super::scope;

#[derive(Debug, Default)]
struct QueueState {
    pending: VecDeque<String>,
    // Enqueued items that have not been matched by task_done() yet
    unfinished: usize,
    closed: bool,
}

#[derive(Debug, Default)]
pub struct Frontier {
    queue: Mutex<QueueState>,
    visited: Mutex<HashSet<String>>,
    // Woken when an item is pushed or the frontier is closed
    item_ready: Notify,
    // Woken when `unfinished` drops to zero
    drained: Notify,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    // Adds a URL to the queue without any filtering
    //
    // Returns false if the frontier was already closed and the URL was dropped.
    pub async fn enqueue(&self, url: String) -> bool {
        let mut state = self.queue.lock().await;
        if state.closed {
            debug!(%url, "frontier closed, dropping url");
            return false;
        }

        state.pending.push_back(url);
        state.unfinished += 1;
        drop(state);

        self.item_ready.notify_one();
        true
    }

    // Waits for the next URL
    //
    // Returns None once the frontier has been closed.
    pub async fn dequeue(&self) -> Option<String> {
        loop {
            // Register as a waiter before looking at the queue, so a push
            // that lands between the check and the await is not missed
            let notified = self.item_ready.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut state = self.queue.lock().await;
                if state.closed {
                    return None;
                }
                if let Some(url) = state.pending.pop_front() {
                    return Some(url);
                }
            }

            notified.await;
        }
    }

    // Claims a URL for processing
    //
    // Returns true only for the first caller with a given URL. This is the
    // one place that stops two workers from fetching the same page.
    pub async fn mark_visited(&self, url: &str) -> bool {
        self.visited.lock().await.insert(url.to_string())
    }

    // Runs the scope predicate against the current visited set
    pub async fn admits(&self, candidate: &str, base_url: &str) -> bool {
        let visited = self.visited.lock().await;
        scope::is_in_scope(candidate, base_url, &visited)
    }

    // Signals that one dequeued item is fully processed
    pub async fn task_done(&self) {
        let mut state = self.queue.lock().await;
        debug_assert!(state.unfinished > 0, "task_done() called too many times");
        state.unfinished = state.unfinished.saturating_sub(1);

        if state.unfinished == 0 {
            drop(state);
            self.drained.notify_waiters();
        }
    }

    // Waits until every enqueued item has been matched by task_done()
    pub async fn join(&self) {
        loop {
            let notified = self.drained.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.queue.lock().await.unfinished == 0 {
                return;
            }

            notified.await;
        }
    }

    // Tears the frontier down: waiting workers get None, new URLs are refused
    pub async fn close(&self) {
        let mut state = self.queue.lock().await;
        state.closed = true;
        state.pending.clear();
        drop(state);

        self.item_ready.notify_waiters();
    }

    // Copies out the visited set (used once the crawl has finished)
    pub async fn visited_snapshot(&self) -> HashSet<String> {
        self.visited.lock().await.clone()
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why enable() before checking the queue?
//    - notified() on its own does nothing until it is polled
//    - enable() registers the waiter right away
//    - So if another task pushes and calls notify_one() while we hold the
//      lock, we still get woken instead of sleeping forever
//
// 2. Why two Notify values?
//    - item_ready wakes workers waiting in dequeue()
//    - drained wakes the coordinator waiting in join()
//    - Keeping them apart means a new URL never wakes the coordinator
//
// 3. Why two separate locks?
//    - A worker checking `visited` doesn't need to block a worker pushing URLs
//    - Nothing ever holds both locks, so they can't deadlock
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_enqueue_then_dequeue() {
        let frontier = Frontier::new();
        assert!(frontier.enqueue("http://x.com".to_string()).await);
        assert_eq!(frontier.dequeue().await, Some("http://x.com".to_string()));
    }

    #[tokio::test]
    async fn test_mark_visited_first_writer_wins() {
        let frontier = Frontier::new();
        assert!(frontier.mark_visited("http://x.com/a").await);
        assert!(!frontier.mark_visited("http://x.com/a").await);
        assert_eq!(frontier.visited_snapshot().await.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_mark_visited_has_one_winner() {
        let frontier = Arc::new(Frontier::new());
        let mut handles = Vec::new();

        for _ in 0..16 {
            let frontier = Arc::clone(&frontier);
            handles.push(tokio::spawn(async move {
                frontier.mark_visited("http://x.com/page").await
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn test_admits_respects_visited_set() {
        let frontier = Frontier::new();
        assert!(frontier.admits("http://x.com/a", "http://x.com").await);

        frontier.mark_visited("http://x.com/a").await;
        assert!(!frontier.admits("http://x.com/a#top", "http://x.com").await);
    }

    #[tokio::test]
    async fn test_join_returns_immediately_when_empty() {
        let frontier = Frontier::new();
        timeout(Duration::from_secs(1), frontier.join())
            .await
            .expect("join should not block on an empty frontier");
    }

    #[tokio::test]
    async fn test_join_waits_for_task_done() {
        let frontier = Arc::new(Frontier::new());
        frontier.enqueue("http://x.com".to_string()).await;
        let _ = frontier.dequeue().await;

        // Still one unfinished item, so join must block
        assert!(timeout(Duration::from_millis(50), frontier.join()).await.is_err());

        let waiter = {
            let frontier = Arc::clone(&frontier);
            tokio::spawn(async move { frontier.join().await })
        };
        frontier.task_done().await;

        timeout(Duration::from_secs(1), waiter)
            .await
            .expect("join should return after task_done")
            .unwrap();
    }

    #[tokio::test]
    async fn test_dequeue_blocks_until_item_arrives() {
        let frontier = Arc::new(Frontier::new());

        let reader = {
            let frontier = Arc::clone(&frontier);
            tokio::spawn(async move { frontier.dequeue().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        frontier.enqueue("http://x.com/late".to_string()).await;

        let got = timeout(Duration::from_secs(1), reader).await.unwrap().unwrap();
        assert_eq!(got, Some("http://x.com/late".to_string()));
    }

    #[tokio::test]
    async fn test_close_wakes_blocked_dequeue_and_rejects_enqueue() {
        let frontier = Arc::new(Frontier::new());

        let reader = {
            let frontier = Arc::clone(&frontier);
            tokio::spawn(async move { frontier.dequeue().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        frontier.close().await;

        let got = timeout(Duration::from_secs(1), reader).await.unwrap().unwrap();
        assert_eq!(got, None);
        assert!(!frontier.enqueue("http://x.com/after".to_string()).await);
    }
}
