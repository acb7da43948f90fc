//! Externally ticked animation controller.
//!
//! The driver owns the only long-lived mutable cell in the system: the
//! `(current, target, progress)` triple. A parameter change regenerates the
//! target and restarts progress (last-writer-wins, no queueing); each tick
//! interpolates one frame, hands it to the render target, and on completion
//! commits target as the new current and notifies observers. There is no
//! internal timer or thread; the host loop calls [`AnimationDriver::tick`].

use crate::{
    error::NodelinkResult,
    generate::generate,
    interp::{Ease, interpolate},
    model::DiagramState,
    params::DiagramParams,
};

/// Consumer of interpolated frames; implemented by both render backends.
pub trait RenderTarget {
    fn render(&mut self, state: &DiagramState, params: &DiagramParams) -> NodelinkResult<()>;
}

impl RenderTarget for crate::render::raster::RasterRenderer {
    fn render(&mut self, state: &DiagramState, params: &DiagramParams) -> NodelinkResult<()> {
        self.draw(state, params)
    }
}

impl RenderTarget for crate::render::svg::SvgRenderer {
    fn render(&mut self, state: &DiagramState, params: &DiagramParams) -> NodelinkResult<()> {
        self.draw(state, params);
        Ok(())
    }
}

/// Result of one driver tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Tick {
    /// No animation in flight; nothing was rendered.
    Idle,
    /// A frame was rendered at the given raw (un-eased) progress.
    Frame { progress: f64, completed: bool },
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Phase {
    Idle,
    Animating,
}

/// Tween controller between the committed diagram and a regenerated target.
pub struct AnimationDriver {
    params: DiagramParams,
    current: DiagramState,
    target: DiagramState,
    progress: f64,
    phase: Phase,
    ease: Ease,
    observers: Vec<Box<dyn FnMut(&DiagramState)>>,
}

impl AnimationDriver {
    /// Generate the initial diagram and start idle on it.
    pub fn new(params: DiagramParams) -> Self {
        let state = generate(&params);
        Self {
            params,
            current: state.clone(),
            target: state,
            progress: 1.0,
            phase: Phase::Idle,
            ease: Ease::InOutCubic,
            observers: Vec::new(),
        }
    }

    pub fn params(&self) -> &DiagramParams {
        &self.params
    }

    /// The last committed (fully animated-to) diagram.
    pub fn current(&self) -> &DiagramState {
        &self.current
    }

    pub fn is_animating(&self) -> bool {
        self.phase == Phase::Animating
    }

    /// Register an observer called with the committed state when an animation
    /// completes.
    pub fn on_commit(&mut self, f: impl FnMut(&DiagramState) + 'static) {
        self.observers.push(Box::new(f));
    }

    /// Apply a parameter change: regenerate the target, reset progress, and
    /// enter `Animating`. Any in-flight target is discarded; the animation
    /// source stays the last committed state.
    pub fn set_params(&mut self, params: DiagramParams) {
        self.params = params;
        self.target = generate(&self.params);
        self.progress = 0.0;
        self.phase = Phase::Animating;
        tracing::debug!(seed = self.params.random_seed, "retargeted animation");
    }

    /// Advance one frame: bump progress by `animation_speed * 0.1`, render
    /// the eased interpolation into `renderer`, and commit when progress
    /// reaches 1. With `animation_speed = 0` the animation never commits;
    /// that is accepted behavior, not an error.
    pub fn tick(&mut self, renderer: &mut dyn RenderTarget) -> NodelinkResult<Tick> {
        if self.phase == Phase::Idle {
            return Ok(Tick::Idle);
        }

        self.progress = (self.progress + self.params.animation_speed * 0.1).min(1.0);
        let eased = self.ease.apply(self.progress);
        let frame = interpolate(&self.current, &self.target, eased);
        renderer.render(&frame, &self.params)?;

        let completed = self.progress >= 1.0;
        if completed {
            self.current = self.target.clone();
            self.phase = Phase::Idle;
            for observer in &mut self.observers {
                observer(&self.current);
            }
        }

        Ok(Tick::Frame {
            progress: self.progress,
            completed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, rc::Rc};

    /// Records every frame handed to it.
    #[derive(Default)]
    struct Recorder {
        frames: Vec<DiagramState>,
    }

    impl RenderTarget for Recorder {
        fn render(&mut self, state: &DiagramState, _params: &DiagramParams) -> NodelinkResult<()> {
            self.frames.push(state.clone());
            Ok(())
        }
    }

    fn params(seed: i64, speed: f64) -> DiagramParams {
        DiagramParams {
            node_count: 4,
            random_seed: seed,
            animation_speed: speed,
            ..DiagramParams::default()
        }
    }

    #[test]
    fn idle_driver_ticks_without_rendering() {
        let mut driver = AnimationDriver::new(params(1, 1.0));
        let mut recorder = Recorder::default();
        assert_eq!(driver.tick(&mut recorder).unwrap(), Tick::Idle);
        assert!(recorder.frames.is_empty());
    }

    #[test]
    fn animation_runs_to_completion_and_commits() {
        // speed 2.5 -> step 0.25 -> exactly four ticks.
        let mut driver = AnimationDriver::new(params(1, 2.5));
        let mut recorder = Recorder::default();

        driver.set_params(params(2, 2.5));
        let expected_target = generate(&params(2, 2.5));
        assert!(driver.is_animating());

        for i in 0..3 {
            let tick = driver.tick(&mut recorder).unwrap();
            assert_eq!(
                tick,
                Tick::Frame {
                    progress: 0.25 * (i + 1) as f64,
                    completed: false
                }
            );
        }
        let last = driver.tick(&mut recorder).unwrap();
        assert_eq!(
            last,
            Tick::Frame {
                progress: 1.0,
                completed: true
            }
        );
        assert!(!driver.is_animating());
        assert_eq!(driver.current(), &expected_target);
        assert_eq!(recorder.frames.len(), 4);
        // Final frame reproduces the target exactly.
        assert_eq!(recorder.frames.last().unwrap(), &expected_target);
    }

    #[test]
    fn commit_notifies_observers() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut driver = AnimationDriver::new(params(1, 10.0));
        let sink = seen.clone();
        driver.on_commit(move |state| sink.borrow_mut().push(state.nodes.len()));

        let mut recorder = Recorder::default();
        driver.set_params(params(3, 10.0));
        // step 1.0 -> single tick completes.
        let tick = driver.tick(&mut recorder).unwrap();
        assert!(matches!(tick, Tick::Frame { completed: true, .. }));
        assert_eq!(seen.borrow().as_slice(), &[4]);
    }

    #[test]
    fn retarget_mid_flight_discards_old_target() {
        let mut driver = AnimationDriver::new(params(1, 2.5));
        let mut recorder = Recorder::default();

        driver.set_params(params(2, 2.5));
        driver.tick(&mut recorder).unwrap();
        driver.tick(&mut recorder).unwrap();

        // Supersede mid-animation: progress resets, source stays the last
        // committed state (seed 1), not the interpolated frame.
        let original = generate(&params(1, 2.5));
        driver.set_params(params(5, 2.5));
        assert!(driver.is_animating());
        assert_eq!(driver.current(), &original);

        for _ in 0..4 {
            driver.tick(&mut recorder).unwrap();
        }
        assert_eq!(driver.current(), &generate(&params(5, 2.5)));
    }

    #[test]
    fn zero_speed_never_commits() {
        let mut driver = AnimationDriver::new(params(1, 0.0));
        let mut recorder = Recorder::default();
        driver.set_params(params(2, 0.0));
        for _ in 0..50 {
            let tick = driver.tick(&mut recorder).unwrap();
            assert_eq!(
                tick,
                Tick::Frame {
                    progress: 0.0,
                    completed: false
                }
            );
        }
        assert!(driver.is_animating());
        assert_eq!(driver.current(), &generate(&params(1, 0.0)));
    }
}
