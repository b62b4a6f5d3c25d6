//=========================================================================
// Fade Transition
//=========================================================================
//
// Tick-driven opacity interpolator that masks a mode switch.
//
// States:
// ```text
//   Idle ──start()──▶ Running ──level ≤ 0──▶ Complete ──start()──▶ Running
//     ▲                                         │
//     └─────────────────reset()─────────────────┘
// ```
//
// The level drops by a fixed decrement per tick, so the fade lasts a fixed
// number of frames rather than a fixed wall-clock duration.
//
//=========================================================================

//=== Constants ===========================================================

/// Default opacity level a fade starts from.
pub const DEFAULT_START_LEVEL: f32 = 1.0;

/// Default level decrement applied on each tick.
pub const DEFAULT_DECREMENT: f32 = 0.05;

// Absorbs f32 representation error so that e.g. 1.0 / 0.05 counts 20 ticks.
const TICK_EPSILON: f64 = 1e-4;

//=== FadeConfig ==========================================================

/// Start level and per-tick decrement of a fade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeConfig {
    start_level: f32,
    decrement: f32,
}

impl FadeConfig {
    /// Creates a fade configuration.
    ///
    /// # Panics
    ///
    /// Panics if `start_level` is outside `[0.0, 1.0]` or `decrement <= 0.0`.
    pub fn new(start_level: f32, decrement: f32) -> Self {
        assert!(
            (0.0..=1.0).contains(&start_level),
            "Fade start level must be within [0.0, 1.0], got {}",
            start_level
        );
        assert!(decrement > 0.0, "Fade decrement must be positive, got {}", decrement);
        Self { start_level, decrement }
    }

    pub fn start_level(&self) -> f32 {
        self.start_level
    }

    pub fn decrement(&self) -> f32 {
        self.decrement
    }

    /// Number of ticks a fade spends running: `ceil(start / decrement)`,
    /// and never less than one.
    pub fn total_ticks(&self) -> u32 {
        let ratio = f64::from(self.start_level) / f64::from(self.decrement);
        (ratio - TICK_EPSILON).ceil().max(1.0) as u32
    }
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            start_level: DEFAULT_START_LEVEL,
            decrement: DEFAULT_DECREMENT,
        }
    }
}

//=== FadeState / FadeStep ================================================

/// Lifecycle state of a [`FadeTransition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeState {
    Idle,
    Running,
    Complete,
}

/// Result of advancing a fade by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FadeStep {
    /// The fade is idle or already complete; nothing changed.
    Inert,

    /// Still fading; `level` is the overlay multiplier for this frame.
    Running { level: f32 },

    /// The level reached zero on this tick. Reported once per run.
    Completed,
}

//=== FadeTransition ======================================================

/// Linear fade from the start level down to zero.
#[derive(Debug, Clone)]
pub struct FadeTransition {
    config: FadeConfig,
    state: FadeState,
    level: f32,
    elapsed: u32,
    total: u32,
}

impl FadeTransition {
    pub fn new(config: FadeConfig) -> Self {
        Self {
            config,
            state: FadeState::Idle,
            level: config.start_level,
            elapsed: 0,
            total: config.total_ticks(),
        }
    }

    //--- Control ----------------------------------------------------------

    /// Starts a fade from the configured start level.
    ///
    /// Returns `false` and changes nothing if a fade is already running.
    pub fn start(&mut self) -> bool {
        if self.state == FadeState::Running {
            return false;
        }

        self.state = FadeState::Running;
        self.level = self.config.start_level;
        self.elapsed = 0;
        true
    }

    /// Returns to `Idle` with a full level.
    pub fn reset(&mut self) {
        self.state = FadeState::Idle;
        self.level = self.config.start_level;
        self.elapsed = 0;
    }

    /// Advances a running fade by one tick.
    pub fn step(&mut self) -> FadeStep {
        if self.state != FadeState::Running {
            return FadeStep::Inert;
        }

        self.elapsed += 1;

        if self.elapsed >= self.total {
            self.level = 0.0;
            self.state = FadeState::Complete;
            return FadeStep::Completed;
        }

        let faded = self.config.decrement * self.elapsed as f32;
        self.level = (self.config.start_level - faded).max(0.0);
        FadeStep::Running { level: self.level }
    }

    //--- Queries ----------------------------------------------------------

    pub fn state(&self) -> FadeState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == FadeState::Running
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    /// Ticks elapsed since the last `start()`.
    pub fn elapsed_ticks(&self) -> u32 {
        self.elapsed
    }

    pub fn config(&self) -> FadeConfig {
        self.config
    }

    /// Opacity multiplier for the renderer, or `None` while idle.
    ///
    /// A completed fade keeps reporting `0.0` so the screen stays dark
    /// until the next mode is swapped in.
    pub fn overlay(&self) -> Option<f32> {
        match self.state {
            FadeState::Idle => None,
            FadeState::Running | FadeState::Complete => Some(self.level),
        }
    }
}

impl Default for FadeTransition {
    fn default() -> Self {
        Self::new(FadeConfig::default())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_completion(fade: &mut FadeTransition) -> (u32, Vec<f32>) {
        let mut ticks = 0;
        let mut levels = Vec::new();
        loop {
            ticks += 1;
            match fade.step() {
                FadeStep::Running { level } => levels.push(level),
                FadeStep::Completed => {
                    levels.push(fade.level());
                    return (ticks, levels);
                }
                FadeStep::Inert => panic!("fade went inert before completing"),
            }
            assert!(ticks < 10_000, "fade never completed");
        }
    }

    //--- Configuration ----------------------------------------------------

    #[test]
    fn defaults_match_constants() {
        let config = FadeConfig::default();
        assert_eq!(config.start_level(), 1.0);
        assert_eq!(config.decrement(), 0.05);
    }

    #[test]
    fn total_ticks_is_ceiling_of_ratio() {
        assert_eq!(FadeConfig::new(1.0, 0.05).total_ticks(), 20);
        assert_eq!(FadeConfig::new(1.0, 0.1).total_ticks(), 10);
        assert_eq!(FadeConfig::new(1.0, 0.25).total_ticks(), 4);
        assert_eq!(FadeConfig::new(1.0, 0.3).total_ticks(), 4);
        assert_eq!(FadeConfig::new(1.0, 2.0).total_ticks(), 1);
        assert_eq!(FadeConfig::new(0.0, 0.05).total_ticks(), 1);
    }

    #[test]
    #[should_panic(expected = "Fade decrement must be positive")]
    fn zero_decrement_panics() {
        FadeConfig::new(1.0, 0.0);
    }

    #[test]
    #[should_panic(expected = "Fade start level must be within")]
    fn start_level_above_one_panics() {
        FadeConfig::new(1.5, 0.05);
    }

    //--- Lifecycle --------------------------------------------------------

    #[test]
    fn idle_fade_is_inert() {
        let mut fade = FadeTransition::default();
        assert_eq!(fade.state(), FadeState::Idle);
        assert_eq!(fade.step(), FadeStep::Inert);
        assert_eq!(fade.overlay(), None);
    }

    #[test]
    fn default_fade_runs_exactly_twenty_ticks() {
        let mut fade = FadeTransition::default();
        assert!(fade.start());

        let (ticks, levels) = run_to_completion(&mut fade);

        assert_eq!(ticks, 20);
        assert_eq!(levels.len(), 20);
        assert_eq!(fade.state(), FadeState::Complete);
        assert_eq!(fade.level(), 0.0);
    }

    #[test]
    fn level_is_monotonic_and_never_negative() {
        for decrement in [0.05, 0.07, 0.1, 0.3, 0.33, 0.5, 1.0] {
            let mut fade = FadeTransition::new(FadeConfig::new(1.0, decrement));
            fade.start();

            let (ticks, levels) = run_to_completion(&mut fade);

            assert_eq!(ticks, FadeConfig::new(1.0, decrement).total_ticks());
            assert!(levels.windows(2).all(|w| w[1] <= w[0]), "levels rose for {}", decrement);
            assert!(levels.iter().all(|&l| l >= 0.0));
            assert_eq!(*levels.last().unwrap(), 0.0);
        }
    }

    #[test]
    fn completion_is_reported_once() {
        let mut fade = FadeTransition::default();
        fade.start();

        let mut completions = 0;
        for _ in 0..100 {
            if fade.step() == FadeStep::Completed {
                completions += 1;
            }
        }

        assert_eq!(completions, 1);
        assert_eq!(fade.step(), FadeStep::Inert);
    }

    #[test]
    fn start_while_running_is_rejected() {
        let mut fade = FadeTransition::default();
        assert!(fade.start());
        fade.step();
        fade.step();
        let level = fade.level();

        assert!(!fade.start());
        assert_eq!(fade.level(), level);
        assert_eq!(fade.elapsed_ticks(), 2);
    }

    #[test]
    fn completed_fade_keeps_dark_overlay_until_reset() {
        let mut fade = FadeTransition::new(FadeConfig::new(1.0, 0.5));
        fade.start();
        fade.step();
        fade.step();

        assert_eq!(fade.overlay(), Some(0.0));

        fade.reset();
        assert_eq!(fade.state(), FadeState::Idle);
        assert_eq!(fade.overlay(), None);
        assert_eq!(fade.level(), 1.0);
    }

    #[test]
    fn completed_fade_can_run_again() {
        let mut fade = FadeTransition::new(FadeConfig::new(1.0, 0.25));
        fade.start();
        let (first, _) = run_to_completion(&mut fade);

        assert!(fade.start());
        let (second, _) = run_to_completion(&mut fade);

        assert_eq!(first, second);
    }
}
