//! Caller-supplied lifecycle notifications.
//!
//! A `Callback` always has the same invocation shape regardless of how it was built,
//! so the widget never branches on what the caller handed in.

use std::fmt;

pub struct Callback<A> {
    inner: Box<dyn FnMut(A)>,
}

impl<A: 'static> Callback<A> {
    pub fn new(f: impl FnMut(A) + 'static) -> Self {
        Self { inner: Box::new(f) }
    }

    /// Route invocations to a named-event sink as `(name, arg)`.
    pub fn dispatch(name: impl Into<String>, mut sink: impl FnMut(&str, A) + 'static) -> Self {
        let name = name.into();
        Self::new(move |arg| sink(&name, arg))
    }

    /// Invoke once. Panics raised by the callback are not caught.
    pub fn call(&mut self, arg: A) {
        (self.inner)(arg);
    }
}

impl<A> fmt::Debug for Callback<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::Callback;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn closure_and_dispatch_are_invoked_the_same_way() {
        let log = Rc::new(RefCell::new(Vec::new()));

        let direct_log = Rc::clone(&log);
        let mut direct = Callback::new(move |value: bool| {
            direct_log.borrow_mut().push(format!("direct:{value}"));
        });
        let sink_log = Rc::clone(&log);
        let mut named = Callback::dispatch("toggle", move |name: &str, value: bool| {
            sink_log.borrow_mut().push(format!("{name}:{value}"));
        });

        direct.call(true);
        named.call(false);

        assert_eq!(*log.borrow(), vec!["direct:true", "toggle:false"]);
    }
}
