//! The bifurcation queue: a bounded, mutex-protected FIFO of pending branch
//! points, paired with a single condition variable used both to wake idle
//! workers and to broadcast termination (spec §4.2).

use parking_lot::{Condvar, Mutex};

use crate::direction::{Coord, Direction};

/// "A worker should explore `position`, having arrived from `came_from`."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bifurcation {
    pub position: Coord,
    pub came_from: Direction,
}

/// The data the queue's mutex guards: the ring buffer plus the
/// system-wide coordination flags that must be observed atomically
/// together with it (spec §5: `active_workers`, `solution_found`,
/// `shutdown` are queue-locked).
struct Inner {
    buf: Vec<Option<Bifurcation>>,
    head: usize,
    tail: usize,
    count: usize,
    active_workers: usize,
    solution_found: bool,
    shutdown: bool,
}

/// A bounded FIFO of [`Bifurcation`]s with one lock and one condvar.
///
/// Capacity is `width * height`: the spec's data model (§3) states a queue
/// capacity of `floor(W*H/4)` with a silent-drop policy on overflow, but its
/// design notes (§9) recommend sizing the queue to the upper bound on live
/// bifurcations instead, to eliminate the drop path entirely. This crate
/// takes that recommendation (Option (a) — see DESIGN.md): `push` never
/// actually drops in practice, though the drop branch is kept as a
/// defensive fallback since it preserves correctness regardless (§4.2: a
/// dropped branch's cells are simply picked up by whichever other worker
/// reaches them from an alternate direction).
pub struct BifurcationQueue {
    inner: Mutex<Inner>,
    monitor: Condvar,
}

/// What an idle worker gets back from [`BifurcationQueue::pop`].
pub enum PopOutcome {
    /// A bifurcation to explore.
    Work(Bifurcation),
    /// The system has terminated (solved, shut down, or quiescent); the
    /// worker should exit.
    Terminate,
}

impl BifurcationQueue {
    pub fn new(capacity: usize) -> Self {
        BifurcationQueue {
            inner: Mutex::new(Inner {
                buf: vec![None; capacity.max(1)],
                head: 0,
                tail: 0,
                count: 0,
                active_workers: 0,
                solution_found: false,
                shutdown: false,
            }),
            monitor: Condvar::new(),
        }
    }

    fn capacity(inner: &Inner) -> usize {
        inner.buf.len()
    }

    /// Pushes a bifurcation and wakes one idle waiter. Silently drops the
    /// item if the queue is full (see the type-level doc comment).
    pub fn push(&self, b: Bifurcation) {
        let mut inner = self.inner.lock();
        let cap = Self::capacity(&inner);
        if inner.count < cap {
            let tail = inner.tail;
            inner.buf[tail] = Some(b);
            inner.tail = (tail + 1) % cap;
            inner.count += 1;
            self.monitor.notify_one();
        }
    }

    /// Waits for a bifurcation, for a termination signal, or for quiescence.
    ///
    /// Mirrors spec §4.3 step 2: each wake re-checks `active_workers`; if
    /// both it and `count` are zero, this call is the one that *declares*
    /// quiescence — it sets `shutdown` and broadcasts before returning
    /// [`PopOutcome::Terminate`].
    pub fn pop(&self) -> PopOutcome {
        let mut inner = self.inner.lock();
        loop {
            if inner.solution_found || inner.shutdown {
                return PopOutcome::Terminate;
            }
            if inner.count > 0 {
                let cap = Self::capacity(&inner);
                let head = inner.head;
                let b = inner.buf[head].take().expect("count > 0 implies a slot is occupied");
                inner.head = (head + 1) % cap;
                inner.count -= 1;
                return PopOutcome::Work(b);
            }
            if inner.active_workers == 0 {
                inner.shutdown = true;
                self.monitor.notify_all();
                return PopOutcome::Terminate;
            }
            self.monitor.wait(&mut inner);
        }
    }

    /// True once `solution_found` or `shutdown` is set. Checked by every
    /// worker at the top of its main loop (spec §4.3 step 1).
    pub fn should_terminate(&self) -> bool {
        let inner = self.inner.lock();
        inner.solution_found || inner.shutdown
    }

    /// Registers the calling worker as Exploring. Only worker 0 calls this
    /// outside of a successful [`Self::pop`] transition, at startup.
    pub fn enter_exploring(&self) {
        let mut inner = self.inner.lock();
        inner.active_workers += 1;
    }

    /// Registers the calling worker as Idle again, broadcasting the
    /// condvar if this drops `active_workers` to zero (spec §4.4: this is
    /// what guarantees the protocol is deadlock-free).
    pub fn leave_exploring(&self) {
        let mut inner = self.inner.lock();
        inner.active_workers -= 1;
        if inner.active_workers == 0 {
            self.monitor.notify_all();
        }
    }

    /// Declares victory: sets `solution_found`, decrements
    /// `active_workers`, and broadcasts. Called exactly once, by whichever
    /// worker reaches the goal first (spec §4.3 step 5).
    pub fn declare_solution_found(&self) {
        let mut inner = self.inner.lock();
        inner.solution_found = true;
        inner.active_workers -= 1;
        self.monitor.notify_all();
    }

    pub fn len(&self) -> usize {
        self.inner.lock().count
    }

    pub fn active_workers(&self) -> usize {
        self.inner.lock().active_workers
    }

    pub fn solution_found(&self) -> bool {
        self.inner.lock().solution_found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(x: usize, y: usize, from: Direction) -> Bifurcation {
        Bifurcation { position: Coord::new(x, y), came_from: from }
    }

    #[test]
    fn fifo_order_is_preserved() {
        let q = BifurcationQueue::new(4);
        q.push(b(0, 0, Direction::NORTH));
        q.push(b(1, 0, Direction::EAST));
        match q.pop() {
            PopOutcome::Work(w) => assert_eq!(w.position, Coord::new(0, 0)),
            PopOutcome::Terminate => panic!("expected work"),
        }
        match q.pop() {
            PopOutcome::Work(w) => assert_eq!(w.position, Coord::new(1, 0)),
            PopOutcome::Terminate => panic!("expected work"),
        }
    }

    #[test]
    fn pop_declares_quiescence_when_idle_and_empty() {
        let q = BifurcationQueue::new(4);
        // No active workers, nothing queued: the very first pop must
        // observe quiescence and terminate rather than block forever.
        match q.pop() {
            PopOutcome::Terminate => {}
            PopOutcome::Work(_) => panic!("expected termination"),
        }
        assert!(q.should_terminate());
    }

    #[test]
    fn overflow_drops_silently_without_panicking() {
        let q = BifurcationQueue::new(1);
        q.push(b(0, 0, Direction::NORTH));
        q.push(b(1, 0, Direction::EAST)); // dropped, capacity is 1
        assert_eq!(q.len(), 1);
    }
}
