//! This module is for testing only

use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub type DropFlag<T> = Rc<RefCell<T>>;

/// Sets its flag when dropped.
pub struct Droppable {
    pub dropflag: DropFlag<bool>,
}

impl Drop for Droppable {
    fn drop(&mut self) {
        *self.dropflag.borrow_mut() = true;
    }
}

thread_local! {
    static LIVE: Cell<isize> = Cell::new(0);
    static CLONES_LEFT: Cell<Option<usize>> = Cell::new(None);
    static DEFAULTS_LEFT: Cell<Option<usize>> = Cell::new(None);
}

fn spend(budget: &'static std::thread::LocalKey<Cell<Option<usize>>>, what: &str) {
    budget.with(|left| match left.get() {
        Some(0) => panic!("{} failed", what),
        Some(n) => left.set(Some(n - 1)),
        None => (),
    });
}

/// Element type that counts live instances per thread.
///
/// `Default` and `Clone` can be armed to panic, which is how the tests
/// simulate element construction failing halfway through a reallocation.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Tracked(pub i32);

impl Tracked {
    pub fn new(value: i32) -> Tracked {
        LIVE.with(|live| live.set(live.get() + 1));
        Tracked(value)
    }

    /// Number of `Tracked` values currently alive on this thread.
    pub fn live() -> isize {
        LIVE.with(|live| live.get())
    }

    /// The next `n` clones succeed, the one after panics.
    pub fn fail_clone_after(n: usize) {
        CLONES_LEFT.with(|left| left.set(Some(n)));
    }

    /// The next `n` default constructions succeed, the one after panics.
    pub fn fail_default_after(n: usize) {
        DEFAULTS_LEFT.with(|left| left.set(Some(n)));
    }

    pub fn disarm() {
        CLONES_LEFT.with(|left| left.set(None));
        DEFAULTS_LEFT.with(|left| left.set(None));
    }
}

impl Default for Tracked {
    fn default() -> Tracked {
        spend(&DEFAULTS_LEFT, "default construction");
        Tracked::new(0)
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Tracked {
        spend(&CLONES_LEFT, "clone");
        Tracked::new(self.0)
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        LIVE.with(|live| live.set(live.get() - 1));
    }
}

#[test]
fn dropflag() {
    let flag = DropFlag::new(RefCell::new(false));
    let droppable = Droppable { dropflag: flag.clone() };
    assert_eq!(false, *flag.borrow());
    std::mem::drop(droppable);
    assert_eq!(true, *flag.borrow());
}

#[test]
fn tracked_counts_live_values() {
    let a = Tracked::new(1);
    let b = a.clone();
    let c = Tracked::default();
    assert_eq!(3, Tracked::live());
    drop((a, b, c));
    assert_eq!(0, Tracked::live());
}

#[test]
fn armed_clone_panics() {
    let a = Tracked::new(7);
    Tracked::fail_clone_after(1);
    let _b = a.clone();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| a.clone()));
    Tracked::disarm();
    assert!(result.is_err());
    assert_eq!(2, Tracked::live());
}
