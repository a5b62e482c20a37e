//! Run observation and cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Receives progress notifications from a run.
///
/// Both methods default to doing nothing, so an implementation only has
/// to name the events it cares about.
pub trait Observer {
    /// Called after every executed instruction with the cumulative number
    /// of instructions this machine has executed. The count only ever
    /// grows, even when the program jumps backwards.
    fn on_step(&mut self, _steps: u64) {}

    /// Called exactly once when the run ends, whether it reached the end
    /// of the program or honored a stop request, with the output
    /// accumulated so far.
    fn on_finish(&mut self, _output: &[f64]) {}
}

/// Cloneable cancellation handle shared between a run and whoever may
/// want to stop it.
///
/// The interpreter checks the flag before every instruction, so a stop
/// requested from an observer or another thread takes effect before the
/// next instruction; the current one always completes.
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a cooperative stop.
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// True once a stop has been requested.
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Observation and cancellation for a single run.
///
/// Observers accumulate: every registered observer receives every event,
/// in registration order. The stop flag is shared; grab a clone with
/// [`stop_flag`](Execution::stop_flag) to request cancellation from
/// inside an observer callback or from another thread.
#[derive(Default)]
pub struct Execution<'a> {
    observers: Vec<&'a mut dyn Observer>,
    stop: StopFlag,
}

impl<'a> Execution<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer; registration order is firing order.
    pub fn observe(&mut self, observer: &'a mut dyn Observer) {
        self.observers.push(observer);
    }

    /// A cancellation handle tied to this execution.
    pub fn stop_flag(&self) -> StopFlag {
        self.stop.clone()
    }

    /// Requests a cooperative stop of the associated run.
    pub fn stop(&self) {
        self.stop.stop();
    }

    /// True once a stop has been requested.
    pub fn is_stopped(&self) -> bool {
        self.stop.is_stopped()
    }

    pub(crate) fn notify_step(&mut self, steps: u64) {
        for observer in &mut self.observers {
            observer.on_step(steps);
        }
    }

    pub(crate) fn notify_finish(&mut self, output: &[f64]) {
        for observer in &mut self.observers {
            observer.on_finish(output);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Tagged {
        tag: char,
        log: Rc<RefCell<Vec<(char, u64)>>>,
    }

    impl Observer for Tagged {
        fn on_step(&mut self, steps: u64) {
            self.log.borrow_mut().push((self.tag, steps));
        }
    }

    #[test]
    fn test_every_observer_fires_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut first = Tagged {
            tag: 'a',
            log: Rc::clone(&log),
        };
        let mut second = Tagged {
            tag: 'b',
            log: Rc::clone(&log),
        };
        let mut execution = Execution::new();
        execution.observe(&mut first);
        execution.observe(&mut second);

        execution.notify_step(1);
        execution.notify_step(2);
        assert_eq!(*log.borrow(), vec![('a', 1), ('b', 1), ('a', 2), ('b', 2)]);
    }

    #[test]
    fn test_stop_flag_is_shared() {
        let execution = Execution::new();
        let flag = execution.stop_flag();
        assert!(!execution.is_stopped());
        flag.stop();
        assert!(execution.is_stopped());
        assert!(flag.is_stopped());
    }

    #[test]
    fn test_stop_on_execution_reaches_cloned_flags() {
        let execution = Execution::new();
        let flag = execution.stop_flag();
        execution.stop();
        assert!(flag.is_stopped());
    }

    #[test]
    fn test_observer_defaults_ignore_events() {
        struct Silent;
        impl Observer for Silent {}

        let mut silent = Silent;
        let mut execution = Execution::new();
        execution.observe(&mut silent);
        execution.notify_step(1);
        execution.notify_finish(&[1.0]);
    }
}
