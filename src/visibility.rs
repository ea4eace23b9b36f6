use crate::clock::TimeSource;
use crate::visual::ParticleScene;
use std::rc::Rc;
use std::time::{Duration, SystemTime};

/// Default debounce applied to show/hide transitions
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityState {
    Hidden,
    /// Transitioning in; further show() calls are dropped
    Showing,
    Visible,
    /// Transitioning out; teardown is deferred until the deadline and a
    /// show() issued meanwhile cancels it
    Hiding,
}

/// Gates whether the particle visualization is shown, mutually exclusive
/// with active timing in the UI.
///
/// Cooperative: show()/hide() arm a deadline and `poll()` — called from
/// the regular tick — completes whichever transition is in progress once
/// the debounce has elapsed. Scene resources are built lazily on the
/// first show and only released by `cleanup()`.
pub struct VisibilityCoordinator {
    time: Rc<dyn TimeSource>,
    state: VisibilityState,
    debounce: Duration,
    deadline: Option<SystemTime>,
    particle_count: usize,
    scene: Option<ParticleScene>,
}

impl VisibilityCoordinator {
    pub fn new(time: Rc<dyn TimeSource>, debounce: Duration, particle_count: usize) -> Self {
        Self {
            time,
            state: VisibilityState::Hidden,
            debounce,
            deadline: None,
            particle_count,
            scene: None,
        }
    }

    pub fn state(&self) -> VisibilityState {
        self.state
    }

    /// The `visible` flag of the state machine: true from the moment a
    /// show is requested until a hide is requested
    pub fn is_visible(&self) -> bool {
        matches!(
            self.state,
            VisibilityState::Showing | VisibilityState::Visible
        )
    }

    /// Whether the scene should be drawn this frame. During a pending
    /// hide the scene stays on screen until the deadline passes.
    pub fn should_render(&self) -> bool {
        self.state != VisibilityState::Hidden && self.scene.is_some()
    }

    pub fn scene(&self) -> Option<&ParticleScene> {
        self.scene.as_ref()
    }

    pub fn scene_mut(&mut self) -> Option<&mut ParticleScene> {
        self.scene.as_mut()
    }

    /// Request the visualization be shown. Dropped while a show is
    /// already in progress; supersedes (and thereby cancels) a pending
    /// hide. The first call constructs the scene resources.
    pub fn show(&mut self) {
        if self.state == VisibilityState::Showing {
            return;
        }
        self.state = VisibilityState::Showing;
        self.deadline = Some(self.time.now() + self.debounce);
        if self.scene.is_none() {
            self.scene = Some(ParticleScene::new(self.particle_count));
        }
    }

    /// Request the visualization be hidden. Dropped while any transition
    /// is in progress and when already hidden. Teardown of the on-screen
    /// scene is deferred until the debounce deadline.
    pub fn hide(&mut self) {
        match self.state {
            VisibilityState::Visible => {
                self.state = VisibilityState::Hiding;
                self.deadline = Some(self.time.now() + self.debounce);
            }
            VisibilityState::Hidden | VisibilityState::Showing | VisibilityState::Hiding => {}
        }
    }

    /// Complete an in-progress transition once its deadline has passed.
    /// Called from the periodic tick.
    pub fn poll(&mut self) {
        let Some(deadline) = self.deadline else {
            return;
        };
        if self.time.now() < deadline {
            return;
        }
        self.deadline = None;
        match self.state {
            VisibilityState::Showing => self.state = VisibilityState::Visible,
            // Scene resources survive a hide; only cleanup() releases them
            VisibilityState::Hiding => self.state = VisibilityState::Hidden,
            VisibilityState::Hidden | VisibilityState::Visible => {}
        }
    }

    /// Process-teardown path: force hidden, drop any pending deadline and
    /// release scene resources. Safe to call at any time, including
    /// before any show and repeatedly.
    pub fn cleanup(&mut self) {
        self.state = VisibilityState::Hidden;
        self.deadline = None;
        self.scene = None;
    }
}

impl std::fmt::Debug for VisibilityCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisibilityCoordinator")
            .field("state", &self.state)
            .field("deadline", &self.deadline)
            .field("initialized", &self.scene.is_some())
            .finish()
    }
}
