//! The user-specified pre/main/post/init/close pipeline invoked once per
//! dispatched argument tuple.
//!
//! A `QueueFunction` is a pure value: it holds no threads, no locks, and no
//! mutable state of its own. `Queue` invokes it concurrently from multiple
//! worker threads, so every installed callable must be `Send + Sync`.

use std::sync::Arc;

type InitFn = dyn Fn() + Send + Sync;
type PreFn<A> = dyn Fn(A) -> bool + Send + Sync;
type MainFn<R, A> = dyn Fn(A) -> R + Send + Sync;
type PostFn<R> = dyn Fn(R) + Send + Sync;
type CloseFn = dyn Fn() + Send + Sync;

/// Bundles the pipeline a `Queue` runs once per dispatched argument tuple.
///
/// Only `main` is required to be useful: a `QueueFunction` with no `main`
/// makes every dispatch a no-op. `pre` gates `main`; `post` observes
/// `main`'s return value and only fires when `main` actually ran.
pub struct QueueFunction<R, A> {
    init: Option<Arc<InitFn>>,
    pre: Option<Arc<PreFn<A>>>,
    main: Option<Arc<MainFn<R, A>>>,
    post: Option<Arc<PostFn<R>>>,
    close: Option<Arc<CloseFn>>,
}

impl<R, A> QueueFunction<R, A>
where
    R: Send + 'static,
    A: Clone + Send + 'static,
{
    /// Start building a pipeline with no callables installed.
    ///
    /// Useful when `main` is supplied later via [`with_main`](Self::with_main),
    /// or when a `QueueFunction` is deliberately left main-less as a no-op.
    pub fn empty() -> Self {
        Self {
            init: None,
            pre: None,
            main: None,
            post: None,
            close: None,
        }
    }

    /// Build a pipeline around the required `main` callable.
    pub fn new<F>(main: F) -> Self
    where
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        Self::empty().with_main(main)
    }

    /// Install the `init` hook, run once when a worker thread starts.
    pub fn with_init<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.init = Some(Arc::new(f));
        self
    }

    /// Install the `pre` filter. Returning `false` skips `main` and `post`
    /// for that dispatch.
    pub fn with_pre<F>(mut self, f: F) -> Self
    where
        F: Fn(A) -> bool + Send + Sync + 'static,
    {
        self.pre = Some(Arc::new(f));
        self
    }

    /// Install (or replace) the `main` callable.
    pub fn with_main<F>(mut self, f: F) -> Self
    where
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        self.main = Some(Arc::new(f));
        self
    }

    /// Install the `post` callable, invoked with `main`'s return value.
    ///
    /// When `R` is `()`, `post` is naturally parameterless in effect: the
    /// unit argument carries no information.
    pub fn with_post<F>(mut self, f: F) -> Self
    where
        F: Fn(R) + Send + Sync + 'static,
    {
        self.post = Some(Arc::new(f));
        self
    }

    /// Install the `close` hook, run once when a worker thread exits.
    pub fn with_close<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.close = Some(Arc::new(f));
        self
    }

    /// Run `init` once, if set. Called by a worker at thread startup.
    pub fn run_init(&self) {
        if let Some(init) = &self.init {
            init();
        }
    }

    /// Run `close` once, if set. Called by a worker at thread exit.
    pub fn run_close(&self) {
        if let Some(close) = &self.close {
            close();
        }
    }

    /// Run the per-dispatch pipeline for one argument tuple.
    ///
    /// This is invoked on a worker thread, never on the dispatcher. It has
    /// no error channel: a user callable that panics unwinds the worker
    /// thread that called it.
    pub fn run(&self, args: A) {
        let main = match &self.main {
            Some(main) => main,
            None => return,
        };

        let should_run = match &self.pre {
            Some(pre) => pre(args.clone()),
            None => true,
        };
        if !should_run {
            return;
        }

        let result = main(args);

        if let Some(post) = &self.post {
            post(result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Mutex;

    #[test]
    fn main_only_runs_and_returns() {
        let qf = QueueFunction::<i64, i64>::new(|x| x * 2);
        // run() has no return channel; exercise it via post to observe.
        let seen = Arc::new(Mutex::new(None));
        let seen2 = seen.clone();
        let qf = qf.with_post(move |v| *seen2.lock().unwrap() = Some(v));
        qf.run(21);
        assert_eq!(*seen.lock().unwrap(), Some(42));
    }

    #[test]
    fn pre_false_skips_main_and_post() {
        let main_calls = Arc::new(AtomicI64::new(0));
        let post_calls = Arc::new(AtomicI64::new(0));
        let m = main_calls.clone();
        let p = post_calls.clone();
        let qf = QueueFunction::<i64, i64>::new(move |x| {
            m.fetch_add(1, Ordering::SeqCst);
            x
        })
        .with_pre(|x| x % 2 == 0)
        .with_post(move |_| {
            p.fetch_add(1, Ordering::SeqCst);
        });

        qf.run(3);
        assert_eq!(main_calls.load(Ordering::SeqCst), 0);
        assert_eq!(post_calls.load(Ordering::SeqCst), 0);

        qf.run(4);
        assert_eq!(main_calls.load(Ordering::SeqCst), 1);
        assert_eq!(post_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn missing_main_is_a_no_op() {
        let qf = QueueFunction::<(), i64>::empty().with_post(|_| panic!("post must not run"));
        qf.run(1);
    }

    #[test]
    fn missing_pre_treated_as_true() {
        let count = Arc::new(AtomicI64::new(0));
        let c = count.clone();
        let qf = QueueFunction::<(), i64>::new(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        qf.run(0);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn init_and_close_run_on_demand() {
        let init_ran = Arc::new(AtomicI64::new(0));
        let close_ran = Arc::new(AtomicI64::new(0));
        let i = init_ran.clone();
        let c = close_ran.clone();
        let qf = QueueFunction::<(), ()>::new(|_| {})
            .with_init(move || {
                i.fetch_add(1, Ordering::SeqCst);
            })
            .with_close(move || {
                c.fetch_add(1, Ordering::SeqCst);
            });

        qf.run_init();
        qf.run_init();
        qf.run_close();
        assert_eq!(init_ran.load(Ordering::SeqCst), 2);
        assert_eq!(close_ran.load(Ordering::SeqCst), 1);
    }
}
