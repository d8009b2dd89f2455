//! Conditional invocation of optional callbacks.
//!
//! ```rust
//! use typed_fsm::events;
//! use std::cell::Cell;
//!
//! let calls = Cell::new(0);
//! let handler = |step: i32| calls.set(calls.get() + step);
//!
//! events::bind(Some(&handler)).to_args((2,)).fire_if(true);
//! events::bind(Some(&handler)).to_args((5,)).fire_if(0);
//! events::bind(None::<&dyn Fn(i32)>).to_args((7,)).fire();
//!
//! assert_eq!(calls.get(), 2);
//! ```

/// A callable that accepts its arguments as a tuple.
///
/// Implemented for every `Fn` of up to three arguments, including
/// trait objects such as `dyn Fn(&A, &B) + Send + Sync`.
pub trait Callback<Args> {
    fn call_with(&self, args: Args);
}

impl<F> Callback<()> for F
where
    F: Fn() + ?Sized,
{
    fn call_with(&self, _args: ()) {
        self()
    }
}

impl<F, A> Callback<(A,)> for F
where
    F: Fn(A) + ?Sized,
{
    fn call_with(&self, (a,): (A,)) {
        self(a)
    }
}

impl<F, A, B> Callback<(A, B)> for F
where
    F: Fn(A, B) + ?Sized,
{
    fn call_with(&self, (a, b): (A, B)) {
        self(a, b)
    }
}

impl<F, A, B, C> Callback<(A, B, C)> for F
where
    F: Fn(A, B, C) + ?Sized,
{
    fn call_with(&self, (a, b, c): (A, B, C)) {
        self(a, b, c)
    }
}

/// Values that can gate [`Event::fire_if`].
///
/// `false`, `None` and zero are falsy.
pub trait Truthy {
    fn is_truthy(&self) -> bool;
}

impl Truthy for bool {
    fn is_truthy(&self) -> bool {
        *self
    }
}

impl<T: Truthy> Truthy for Option<T> {
    fn is_truthy(&self) -> bool {
        self.as_ref().is_some_and(Truthy::is_truthy)
    }
}

macro_rules! truthy_int {
    ($($ty:ty),*) => {
        $(
            impl Truthy for $ty {
                fn is_truthy(&self) -> bool {
                    *self != 0
                }
            }
        )*
    };
}

truthy_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// An event bound to an optional handler and the arguments to call it with.
pub struct Event<'h, H: ?Sized, Args> {
    handler: Option<&'h H>,
    args: Args,
}

/// Bind an optional handler. Arguments default to the empty tuple.
pub fn bind<H: ?Sized>(handler: Option<&H>) -> Event<'_, H, ()> {
    Event { handler, args: () }
}

impl<'h, H: ?Sized, Args> Event<'h, H, Args> {
    /// Set the arguments the handler will be called with.
    pub fn to_args<A>(self, args: A) -> Event<'h, H, A> {
        Event {
            handler: self.handler,
            args,
        }
    }

    /// Fire the handler iff `condition` is truthy.
    pub fn fire_if(self, condition: impl Truthy)
    where
        H: Callback<Args>,
    {
        if condition.is_truthy() {
            self.fire();
        }
    }

    /// Fire the handler, if there is one.
    pub fn fire(self)
    where
        H: Callback<Args>,
    {
        if let Some(handler) = self.handler {
            handler.call_with(self.args);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::sync::Arc;

    #[test]
    fn handler_runs_only_after_fire() {
        let calls = RefCell::new(0);
        let handler = || *calls.borrow_mut() += 1;

        let event = bind(Some(&handler));
        assert_eq!(*calls.borrow(), 0);

        event.fire();
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn handler_receives_bound_arguments() {
        let seen = RefCell::new(Vec::new());
        let handler = |a: &str, b: Vec<&str>, c: &str| {
            seen.borrow_mut().push(format!("{a}|{}|{c}", b.join(",")));
        };

        bind(Some(&handler))
            .to_args(("1", vec!["2", "2"], "3"))
            .fire();

        assert_eq!(*seen.borrow(), vec!["1|2,2|3".to_string()]);
    }

    #[test]
    fn falsy_conditions_suppress_the_handler() {
        let calls = RefCell::new(0);
        let handler = || *calls.borrow_mut() += 1;

        bind(Some(&handler)).fire_if(false);
        bind(Some(&handler)).fire_if(None::<bool>);
        bind(Some(&handler)).fire_if(Some(false));
        bind(Some(&handler)).fire_if(0);
        assert_eq!(*calls.borrow(), 0);

        bind(Some(&handler)).fire_if(Some(true));
        bind(Some(&handler)).fire_if(3usize);
        assert_eq!(*calls.borrow(), 2);
    }

    #[test]
    fn missing_handler_is_a_no_op() {
        bind(None::<&dyn Fn()>).fire();
        bind(None::<&dyn Fn(u8)>).to_args((1,)).fire_if(true);
    }

    #[test]
    fn trait_objects_behind_arc_are_callable() {
        let total = Arc::new(parking_lot::Mutex::new(0));
        let sink = Arc::clone(&total);
        let handler: Option<Arc<dyn Fn(&i32, &i32) + Send + Sync>> =
            Some(Arc::new(move |a: &i32, b: &i32| *sink.lock() += a + b));

        bind(handler.as_deref()).to_args((&4, &5)).fire_if(true);

        assert_eq!(*total.lock(), 9);
    }
}
