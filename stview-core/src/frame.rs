/// Self-rescheduling frame loop on top of a host frame scheduler
use crate::error::Result;

/// Host facility delivering "draw the next frame" callbacks
/// (`requestAnimationFrame` in a browser, a paced timer in a terminal).
pub trait FrameScheduler {
    type Token: Copy;

    /// Ask the host for one more frame callback
    fn request_frame(&mut self) -> Result<Self::Token>;

    /// Withdraw a request that has not fired yet
    fn cancel_frame(&mut self, token: Self::Token);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    Stopped,
}

/// Tracks the single outstanding frame request of a render loop.
///
/// Every frame that runs requests its successor, so the loop continues until
/// [`FrameLoop::stop`] cancels the outstanding request.
pub struct FrameLoop<S: FrameScheduler> {
    scheduler: S,
    state: LoopState,
    pending: Option<S::Token>,
    frames: u64,
}

impl<S: FrameScheduler> FrameLoop<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            state: LoopState::Idle,
            pending: None,
            frames: 0,
        }
    }

    /// Request the first frame. Does nothing unless the loop is idle.
    pub fn start(&mut self) -> Result<()> {
        if self.state != LoopState::Idle {
            return Ok(());
        }
        self.pending = Some(self.scheduler.request_frame()?);
        self.state = LoopState::Running;
        Ok(())
    }

    /// Handle a fired frame callback.
    ///
    /// Returns `Ok(false)` without running `body` once the loop has stopped.
    /// A failing body stops the loop.
    pub fn run_frame<F>(&mut self, body: F) -> Result<bool>
    where
        F: FnOnce() -> Result<()>,
    {
        if self.state != LoopState::Running {
            return Ok(false);
        }
        self.pending = None;

        if let Err(err) = body() {
            self.state = LoopState::Stopped;
            return Err(err);
        }
        self.frames += 1;

        match self.scheduler.request_frame() {
            Ok(token) => {
                self.pending = Some(token);
                Ok(true)
            }
            Err(err) => {
                self.state = LoopState::Stopped;
                Err(err)
            }
        }
    }

    /// Cancel the outstanding request; no frame runs after this
    pub fn stop(&mut self) {
        if let Some(token) = self.pending.take() {
            self.scheduler.cancel_frame(token);
        }
        self.state = LoopState::Stopped;
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[derive(Debug, Default)]
    struct CountingScheduler {
        next: u32,
        outstanding: Vec<u32>,
        canceled: Vec<u32>,
    }

    impl FrameScheduler for CountingScheduler {
        type Token = u32;

        fn request_frame(&mut self) -> Result<u32> {
            self.next += 1;
            self.outstanding.push(self.next);
            Ok(self.next)
        }

        fn cancel_frame(&mut self, token: u32) {
            self.outstanding.retain(|t| *t != token);
            self.canceled.push(token);
        }
    }

    #[test]
    fn test_frames_reschedule() {
        let mut frame_loop = FrameLoop::new(CountingScheduler::default());
        assert!(!frame_loop.run_frame(|| Ok(())).unwrap());

        frame_loop.start().unwrap();
        for _ in 0..3 {
            assert!(frame_loop.run_frame(|| Ok(())).unwrap());
        }
        assert_eq!(frame_loop.frames_rendered(), 3);
        assert_eq!(frame_loop.scheduler().next, 4);
        assert!(frame_loop.has_pending());
    }

    #[test]
    fn test_stop_cancels_pending_request() {
        let mut frame_loop = FrameLoop::new(CountingScheduler::default());
        frame_loop.start().unwrap();
        frame_loop.run_frame(|| Ok(())).unwrap();
        frame_loop.stop();

        assert_eq!(frame_loop.scheduler().canceled, vec![2]);
        assert!(!frame_loop.has_pending());

        let mut ran = false;
        assert!(!frame_loop
            .run_frame(|| {
                ran = true;
                Ok(())
            })
            .unwrap());
        assert!(!ran);
        assert_eq!(frame_loop.frames_rendered(), 1);
        assert_eq!(frame_loop.scheduler().next, 2);
    }

    #[test]
    fn test_failed_frame_stops_loop() {
        let mut frame_loop = FrameLoop::new(CountingScheduler::default());
        frame_loop.start().unwrap();
        let result = frame_loop.run_frame(|| Err(Error::Render("lost context".into())));
        assert!(matches!(result, Err(Error::Render(_))));
        assert_eq!(frame_loop.state(), LoopState::Stopped);
        assert!(!frame_loop.has_pending());
    }

    #[test]
    fn test_restart_after_stop_is_ignored() {
        let mut frame_loop = FrameLoop::new(CountingScheduler::default());
        frame_loop.start().unwrap();
        frame_loop.stop();
        frame_loop.start().unwrap();
        assert_eq!(frame_loop.state(), LoopState::Stopped);
        assert_eq!(frame_loop.scheduler().next, 1);
    }
}
