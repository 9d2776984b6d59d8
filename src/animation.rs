use eframe::egui::Context;

/// Anything that can be asked for another frame callback.
pub trait FrameHost {
    fn request_frame(&self);
}

impl FrameHost for Context {
    fn request_frame(&self) {
        self.request_repaint();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Running,
    TornDown,
}

impl Lifecycle {
    pub fn label(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Running => "running",
            Self::TornDown => "torn down",
        }
    }
}

/// Proof that a controller may still tick. Not `Clone`: dropping the only
/// copy is what cancels the loop.
#[derive(Debug)]
pub struct FrameToken {
    _private: (),
}

/// Owns the frame scheduling of one component.
///
/// `Uninitialized -> Running -> TornDown`, nothing else. Once torn down the
/// controller never hands out another frame.
#[derive(Debug)]
pub struct AnimationController {
    name: &'static str,
    lifecycle: Lifecycle,
    token: Option<FrameToken>,
    frames: u64,
}

impl AnimationController {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            lifecycle: Lifecycle::Uninitialized,
            token: None,
            frames: 0,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_running(&self) -> bool {
        self.token.is_some()
    }

    pub fn is_torn_down(&self) -> bool {
        self.lifecycle == Lifecycle::TornDown
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn start(&mut self) -> bool {
        match self.lifecycle {
            Lifecycle::Uninitialized => {
                self.token = Some(FrameToken { _private: () });
                self.lifecycle = Lifecycle::Running;
                log::debug!("{}: animation started", self.name);
                true
            }
            Lifecycle::Running => false,
            Lifecycle::TornDown => {
                log::warn!("{}: start requested after teardown, ignoring", self.name);
                false
            }
        }
    }

    pub fn teardown(&mut self) -> bool {
        let Some(token) = self.token.take() else {
            if self.lifecycle == Lifecycle::Uninitialized {
                log::warn!("{}: teardown requested before start, ignoring", self.name);
            }
            return false;
        };

        drop(token);
        self.lifecycle = Lifecycle::TornDown;
        log::debug!("{}: torn down after {} frames", self.name, self.frames);
        true
    }

    /// Claims the next frame. Returns `false` when the loop is not running,
    /// in which case the caller must not touch its state.
    pub fn begin_frame(&mut self) -> bool {
        if self.token.is_none() {
            return false;
        }

        self.frames = self.frames.wrapping_add(1);
        true
    }

    pub fn schedule(&self, host: &impl FrameHost) {
        if self.is_running() {
            host.request_frame();
        }
    }
}
