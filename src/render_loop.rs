//! Dedicated render thread.
//!
//! Requests only raise a pending flag. Any number of requests arriving while a pass runs
//! collapse into a single follow-up pass that renders the latest state.

use crate::composer::SceneComposer;
use eyre::{Result, WrapErr};
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

#[derive(Default)]
struct LoopState {
    pending: bool,
    running: bool,
    shutdown: bool,
    coalesced: u64,
}

struct Inner {
    state: Mutex<LoopState>,
    wake: Condvar,
    idle: Condvar,
}

pub struct RenderLoop {
    inner: Arc<Inner>,
    composer: Arc<SceneComposer>,
    handle: Option<JoinHandle<()>>,
}

impl RenderLoop {
    pub fn spawn(composer: Arc<SceneComposer>) -> Result<Self> {
        let inner = Arc::new(Inner {
            state: Mutex::new(LoopState::default()),
            wake: Condvar::new(),
            idle: Condvar::new(),
        });

        let worker_inner = inner.clone();
        let worker_composer = composer.clone();
        let handle = std::thread::Builder::new()
            .name("plot3d-render".into())
            .spawn(move || run(worker_inner, worker_composer))
            .wrap_err("failed to start render thread")?;

        tracing::info!("render loop started");
        Ok(Self {
            inner,
            composer,
            handle: Some(handle),
        })
    }

    pub fn composer(&self) -> &Arc<SceneComposer> {
        &self.composer
    }

    pub fn passes_completed(&self) -> u64 {
        self.composer.passes_completed()
    }

    /// Asks for a pass of the current state. Never blocks on rendering.
    pub fn request_render(&self) {
        let mut state = self.inner.state.lock();
        if state.shutdown {
            return;
        }
        if state.pending {
            state.coalesced += 1;
            tracing::trace!(coalesced = state.coalesced, "render request coalesced");
        }
        state.pending = true;
        self.inner.wake.notify_one();
    }

    /// Number of requests merged into an already pending one.
    pub fn coalesced_requests(&self) -> u64 {
        self.inner.state.lock().coalesced
    }

    /// Blocks until no pass is pending or running. Returns false on timeout.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = self.inner.state.lock();
        while state.pending || state.running {
            if self.inner.idle.wait_until(&mut state, deadline).timed_out() {
                return !(state.pending || state.running);
            }
        }
        true
    }

    /// Stops the thread after the pass in flight, if any, completes.
    pub fn shutdown(&mut self) {
        {
            let mut state = self.inner.state.lock();
            state.shutdown = true;
            self.inner.wake.notify_all();
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("render thread panicked");
            }
            tracing::info!("render loop stopped");
        }
    }
}

impl Drop for RenderLoop {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run(inner: Arc<Inner>, composer: Arc<SceneComposer>) {
    loop {
        {
            let mut state = inner.state.lock();
            while !state.pending && !state.shutdown {
                inner.wake.wait(&mut state);
            }
            if state.shutdown {
                state.pending = false;
                inner.idle.notify_all();
                return;
            }
            state.pending = false;
            state.running = true;
        }

        composer.render();

        let mut state = inner.state.lock();
        state.running = false;
        if !state.pending {
            inner.idle.notify_all();
        }
    }
}
