//! Gathering the results of several coroutines.
//!
//! This module provides the [`Gather`] combinator, which advances a fixed set of
//! children round-robin and collects their final values in construction order.

use tracing::{debug, trace, warn};

use crate::{
    error::{CleanupFailure, Error},
    Coroutine, Step,
};

/// Create a [`Gather`] over `children` with `close_on_error` enabled.
///
/// # Examples
///
/// ```
/// use coro::prelude::*;
///
/// let mut both = gather(vec![awaitable(1), awaitable(2)]);
///
/// // one pass steps every child once
/// assert!(both.resume().is_suspended());
/// assert_eq!(both.resume().unwrap_complete(), vec![1, 2]);
/// ```
pub fn gather<C, I>(children: I) -> Gather<C>
where
    C: Coroutine,
    I: IntoIterator<Item = C>,
{
    Gather::new(children)
}

/// Per-child state of a [`Gather`].
pub enum Slot<C: Coroutine> {
    /// The child has not terminated yet.
    Pending(C),
    /// The child completed with a value.
    Done(C::Output),
    /// The child failed.
    Errored(Error),
}

impl<C: Coroutine> Slot<C> {
    /// Returns `true` if the child has not terminated yet.
    pub fn is_pending(&self) -> bool {
        matches!(self, Slot::Pending(_))
    }

    fn into_error(self) -> Option<Error> {
        match self {
            Slot::Errored(error) => Some(error),
            Slot::Pending(_) | Slot::Done(_) => None,
        }
    }
}

/// Runs several coroutines concurrently and collects their results.
///
/// Each resume of a `Gather` is one pass: every child that is still pending
/// is resumed once, in construction order. If any child is still pending after
/// the pass, the gather suspends once, no matter how many children it
/// advanced. When all children complete, the gather completes with their values
/// in construction order.
///
/// When a child fails and `close_on_error` is set (the default), every other
/// pending child is closed in construction order and the gather fails at once.
/// Otherwise the remaining children keep running, and once all of them have
/// terminated the gather fails with the first error it encountered.
///
/// Failures are reported as [`Error::Gather`] carrying the failing child's
/// index.
pub struct Gather<C: Coroutine> {
    slots: Vec<Slot<C>>,
    close_on_error: bool,
    first_error: Option<usize>,
    pass: usize,
    terminated: bool,
}

impl<C> Gather<C>
where
    C: Coroutine,
{
    /// Create a gather over `children`, all of them pending.
    pub fn new<I>(children: I) -> Self
    where
        I: IntoIterator<Item = C>,
    {
        Self::from_slots(children.into_iter().map(Slot::Pending))
    }

    /// Create a gather from slots, some of which may already be terminal.
    ///
    /// Terminal slots are never stepped. An [`Slot::Errored`] slot counts as
    /// the earliest error encountered.
    pub fn from_slots<I>(slots: I) -> Self
    where
        I: IntoIterator<Item = Slot<C>>,
    {
        let slots: Vec<_> = slots.into_iter().collect();
        let first_error = slots
            .iter()
            .position(|slot| matches!(slot, Slot::Errored(_)));
        Gather {
            slots,
            close_on_error: true,
            first_error,
            pass: 0,
            terminated: false,
        }
    }

    /// Whether to close the remaining children as soon as one fails.
    pub fn close_on_error(mut self, close_on_error: bool) -> Self {
        self.close_on_error = close_on_error;
        self
    }

    /// Number of children, terminal or not.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the gather has no children.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of children that have not terminated yet.
    pub fn pending(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_pending()).count()
    }

    /// Close every pending child in construction order, collecting cleanup
    /// failures.
    fn close_pending(&mut self) -> Vec<CleanupFailure> {
        let mut failures = Vec::new();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let Slot::Pending(child) = slot else {
                continue;
            };
            debug!(index, "closing pending coroutine");
            if let Err(error) = child.close() {
                warn!(index, %error, "cleanup failed while closing coroutine");
                failures.push(CleanupFailure {
                    index,
                    error: Error::cleanup(error),
                });
            }
        }
        failures
    }

    fn fail(&mut self, index: usize, suppressed: Vec<CleanupFailure>) -> Step<Vec<C::Output>> {
        self.terminated = true;
        let error = std::mem::take(&mut self.slots)
            .into_iter()
            .nth(index)
            .and_then(Slot::into_error)
            .unwrap_or(Error::Terminated);
        Step::Failed(Error::Gather {
            index,
            source: Box::new(error),
            suppressed,
        })
    }

    fn fail_fast(&mut self, index: usize) -> Step<Vec<C::Output>> {
        let suppressed = self.close_pending();
        self.fail(index, suppressed)
    }

    fn complete(&mut self) -> Step<Vec<C::Output>> {
        self.terminated = true;
        let values = std::mem::take(&mut self.slots)
            .into_iter()
            .map(|slot| match slot {
                Slot::Done(value) => Some(value),
                Slot::Pending(_) | Slot::Errored(_) => None,
            })
            .collect::<Option<Vec<_>>>();
        match values {
            Some(values) => Step::Complete(values),
            None => Step::Failed(Error::Terminated),
        }
    }
}

impl<C> Coroutine for Gather<C>
where
    C: Coroutine,
{
    type Output = Vec<C::Output>;

    fn resume(&mut self) -> Step<Self::Output> {
        if self.terminated {
            return Step::Failed(Error::Terminated);
        }
        if let (true, Some(index)) = (self.close_on_error, self.first_error) {
            // a child was already errored when the gather was built
            return self.fail_fast(index);
        }

        self.pass += 1;
        for index in 0..self.slots.len() {
            let Slot::Pending(child) = &mut self.slots[index] else {
                continue;
            };
            match child.resume() {
                Step::Suspended => {}
                Step::Complete(value) => self.slots[index] = Slot::Done(value),
                Step::Failed(error) => {
                    debug!(index, pass = self.pass, %error, "coroutine failed");
                    self.slots[index] = Slot::Errored(error);
                    if self.first_error.is_none() {
                        self.first_error = Some(index);
                    }
                    if self.close_on_error {
                        return self.fail_fast(index);
                    }
                }
            }
        }

        let pending = self.pending();
        if pending > 0 {
            trace!(pass = self.pass, pending, "gather pass finished");
            return Step::Suspended;
        }
        match self.first_error {
            Some(index) => self.fail(index, Vec::new()),
            None => self.complete(),
        }
    }

    fn close(&mut self) -> Result<(), Error> {
        if self.terminated {
            return Ok(());
        }
        self.terminated = true;
        let failures = self.close_pending();
        self.slots.clear();
        match failures.into_iter().next() {
            Some(failure) => Err(failure.error),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, rc::Rc};

    type Log = Rc<RefCell<Vec<String>>>;

    /// Suspends a fixed number of times, logging every step, then finishes.
    struct Script {
        name: &'static str,
        suspends: usize,
        outcome: Option<Result<i32, &'static str>>,
        close_fails: bool,
        steps: usize,
        log: Log,
    }

    fn script(
        log: &Log,
        name: &'static str,
        suspends: usize,
        outcome: Result<i32, &'static str>,
    ) -> Script {
        Script {
            name,
            suspends,
            outcome: Some(outcome),
            close_fails: false,
            steps: 0,
            log: Rc::clone(log),
        }
    }

    impl Coroutine for Script {
        type Output = i32;

        fn resume(&mut self) -> Step<i32> {
            self.steps += 1;
            self.log.borrow_mut().push(format!("{}{}", self.name, self.steps));
            if self.steps <= self.suspends {
                return Step::Suspended;
            }
            match self.outcome.take() {
                Some(Ok(value)) => Step::Complete(value),
                Some(Err(msg)) => Step::Failed(Error::msg(msg)),
                None => Step::Failed(Error::Terminated),
            }
        }

        fn close(&mut self) -> Result<(), Error> {
            self.log.borrow_mut().push(format!("{} closed", self.name));
            if self.close_fails {
                return Err(Error::cleanup(Error::msg("close failed")));
            }
            Ok(())
        }
    }

    fn entries(log: &Log) -> Vec<String> {
        log.borrow().clone()
    }

    #[test]
    fn test_empty_gather_completes_without_suspending() {
        let mut g: Gather<Script> = gather(Vec::new());
        assert!(g.is_empty());
        assert_eq!(g.resume().unwrap_complete(), Vec::<i32>::new());
        assert!(g.resume().unwrap_failed().is_usage());
    }

    #[test]
    fn test_results_follow_construction_order() {
        let log = Log::default();
        let mut g = gather(vec![
            script(&log, "a", 2, Ok(1)),
            script(&log, "b", 0, Ok(2)),
            script(&log, "c", 1, Ok(3)),
        ]);

        assert!(g.resume().is_suspended());
        assert_eq!(g.pending(), 2);
        assert!(g.resume().is_suspended());
        assert_eq!(g.resume().unwrap_complete(), vec![1, 2, 3]);
        assert_eq!(entries(&log), ["a1", "b1", "c1", "a2", "c2", "a3"]);
    }

    #[test]
    fn test_close_on_error_closes_pending_siblings_in_order() {
        let log = Log::default();
        let mut g = gather(vec![
            script(&log, "a", 5, Ok(1)),
            script(&log, "b", 1, Err("b broke")),
            script(&log, "c", 5, Ok(3)),
        ]);

        assert!(g.resume().is_suspended());
        let err = g.resume().unwrap_failed();

        assert_eq!(err.child_index(), Some(1));
        assert_eq!(err.root().to_string(), "b broke");
        // c is closed before it gets its second step
        assert_eq!(
            entries(&log),
            ["a1", "b1", "c1", "a2", "b2", "a closed", "c closed"]
        );
        assert!(g.resume().unwrap_failed().is_usage());
    }

    #[test]
    fn test_deferred_error_lets_siblings_finish() {
        let log = Log::default();
        let mut g = gather(vec![
            script(&log, "a", 0, Err("a broke")),
            script(&log, "b", 2, Err("b broke")),
            script(&log, "c", 1, Ok(3)),
        ])
        .close_on_error(false);

        assert!(g.resume().is_suspended());
        assert!(g.resume().is_suspended());
        let err = g.resume().unwrap_failed();

        assert_eq!(err.child_index(), Some(0));
        assert_eq!(err.root().to_string(), "a broke");
        assert_eq!(entries(&log), ["a1", "b1", "c1", "b2", "c2", "b3"]);
    }

    #[test]
    fn test_deferred_error_is_first_encountered() {
        let log = Log::default();
        let mut g = gather(vec![
            script(&log, "a", 1, Err("a broke")),
            script(&log, "b", 0, Err("b broke")),
        ])
        .close_on_error(false);

        assert!(g.resume().is_suspended());
        let err = g.resume().unwrap_failed();
        assert_eq!(err.child_index(), Some(1));
    }

    #[test]
    fn test_terminal_slots_are_never_stepped() {
        let log = Log::default();
        let mut g = Gather::from_slots(vec![
            Slot::Done(10),
            Slot::Pending(script(&log, "b", 1, Ok(20))),
        ]);

        assert_eq!(g.len(), 2);
        assert!(g.resume().is_suspended());
        assert_eq!(g.resume().unwrap_complete(), vec![10, 20]);
        assert_eq!(entries(&log), ["b1", "b2"]);
    }

    #[test]
    fn test_errored_slot_fails_before_any_step() {
        let log = Log::default();
        let mut g = Gather::from_slots(vec![
            Slot::Pending(script(&log, "a", 1, Ok(1))),
            Slot::Errored(Error::msg("stale")),
        ]);

        let err = g.resume().unwrap_failed();
        assert_eq!(err.child_index(), Some(1));
        assert_eq!(entries(&log), ["a closed"]);
    }

    #[test]
    fn test_cleanup_failures_are_suppressed_into_the_error() {
        let log = Log::default();
        let mut noisy = script(&log, "b", 3, Ok(2));
        noisy.close_fails = true;
        let mut g = gather(vec![script(&log, "a", 0, Err("a broke")), noisy]);

        match g.resume() {
            Step::Failed(Error::Gather {
                index, suppressed, ..
            }) => {
                assert_eq!(index, 0);
                assert_eq!(suppressed.len(), 1);
                assert_eq!(suppressed[0].index, 1);
                assert!(suppressed[0].error.is_cleanup());
            }
            other => panic!("expected gather failure, got {:?}", other),
        }
    }

    #[test]
    fn test_close_closes_every_pending_child() {
        let log = Log::default();
        let mut g = gather(vec![
            script(&log, "a", 0, Ok(1)),
            script(&log, "b", 3, Ok(2)),
            script(&log, "c", 3, Ok(3)),
        ]);

        assert!(g.resume().is_suspended());
        g.close().unwrap();
        g.close().unwrap();
        assert_eq!(entries(&log), ["a1", "b1", "c1", "b closed", "c closed"]);
        assert!(g.resume().unwrap_failed().is_usage());
    }
}
