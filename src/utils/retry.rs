//! Bounded retry combinator.
//!
//! Each attempt reports whether it finished, wants another try, or hit an error
//! that must not be retried. The combinator returns a tagged outcome instead of
//! leaving the caller to inspect loop state.

use std::future::Future;

/// What a single attempt produced.
#[derive(Debug, PartialEq, Eq)]
pub enum Attempt<T, E> {
    Done(T),
    Retry,
    Abort(E),
}

/// Final result of [`retry`].
#[derive(Debug, PartialEq, Eq)]
pub enum RetryOutcome<T, E> {
    Success(T),
    /// Every attempt asked to retry.
    Exhausted { attempts: u32 },
    /// An attempt failed in a way that must not be retried.
    Aborted(E),
}

/// Runs `operation` up to `max_attempts` times.
///
/// The closure receives the 1-based attempt number. A `max_attempts` of zero
/// runs nothing and reports [`RetryOutcome::Exhausted`].
pub async fn retry<T, E, F, Fut>(max_attempts: u32, mut operation: F) -> RetryOutcome<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Attempt<T, E>>,
{
    for attempt in 1..=max_attempts {
        match operation(attempt).await {
            Attempt::Done(value) => return RetryOutcome::Success(value),
            Attempt::Retry => continue,
            Attempt::Abort(err) => return RetryOutcome::Aborted(err),
        }
    }

    RetryOutcome::Exhausted {
        attempts: max_attempts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let outcome: RetryOutcome<u32, ()> = retry(10, |n| async move { Attempt::Done(n) }).await;
        assert_eq!(outcome, RetryOutcome::Success(1));
    }

    #[tokio::test]
    async fn test_success_after_retries() {
        let outcome: RetryOutcome<u32, ()> = retry(10, |n| async move {
            if n < 4 { Attempt::Retry } else { Attempt::Done(n) }
        })
        .await;
        assert_eq!(outcome, RetryOutcome::Success(4));
    }

    #[tokio::test]
    async fn test_exhausted_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let outcome: RetryOutcome<(), ()> = retry(10, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Attempt::Retry }
        })
        .await;

        assert_eq!(outcome, RetryOutcome::Exhausted { attempts: 10 });
        assert_eq!(calls.load(Ordering::SeqCst), 10);
    }

    #[tokio::test]
    async fn test_abort_stops_immediately() {
        let calls = AtomicU32::new(0);
        let outcome: RetryOutcome<(), &str> = retry(10, |n| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 2 { Attempt::Abort("backend down") } else { Attempt::Retry }
            }
        })
        .await;

        assert_eq!(outcome, RetryOutcome::Aborted("backend down"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_zero_attempts() {
        let outcome: RetryOutcome<(), ()> = retry(0, |_| async { Attempt::Done(()) }).await;
        assert_eq!(outcome, RetryOutcome::Exhausted { attempts: 0 });
    }
}
