//! System sequencer - visits registered subsystems once per frame

use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

use log::{debug, error};

use crate::config::SequencerConfig;
use crate::error::SequencerError;

/// A per-frame participant. Both hooks are optional; the defaults do nothing.
pub trait System {
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn update(&mut self, _dt: f64) {}

    fn render(&mut self) {}
}

type Factory = Box<dyn FnOnce() -> anyhow::Result<Box<dyn System>>>;

/// What can be handed to [`SystemSequencer::use_system`]: a ready instance,
/// or a factory the sequencer invokes to build one.
pub enum Registration {
    Instance(Box<dyn System>),
    Factory(Factory),
}

impl Registration {
    pub fn instance(system: impl System + 'static) -> Self {
        Self::Instance(Box::new(system))
    }

    pub fn factory<F, S>(factory: F) -> Self
    where
        F: FnOnce() -> S + 'static,
        S: System + 'static,
    {
        Self::Factory(Box::new(move || -> anyhow::Result<Box<dyn System>> {
            Ok(Box::new(factory()))
        }))
    }

    /// Factory whose construction may fail
    pub fn try_factory<F, S>(factory: F) -> Self
    where
        F: FnOnce() -> anyhow::Result<S> + 'static,
        S: System + 'static,
    {
        Self::Factory(Box::new(move || -> anyhow::Result<Box<dyn System>> {
            Ok(Box::new(factory()?))
        }))
    }

    fn into_system(self) -> anyhow::Result<Box<dyn System>> {
        match self {
            Self::Instance(system) => Ok(system),
            Self::Factory(factory) => factory(),
        }
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instance(system) => f.debug_tuple("Instance").field(&system.name()).finish(),
            Self::Factory(_) => f.write_str("Factory"),
        }
    }
}

/// Timing for a single update pass
#[derive(Debug, Clone)]
pub struct FrameStats {
    pub frame: u64,
    pub duration: Duration,
    pub system_times: Vec<(String, Duration)>,
}

/// Ordered, append-only list of subsystems
pub struct SystemSequencer {
    systems: Vec<Box<dyn System>>,
    frame_count: u64,
    stats_history: VecDeque<FrameStats>,
    max_stats_history: usize,
}

impl SystemSequencer {
    pub fn new() -> Self {
        Self::with_stats_history(SequencerConfig::default().stats_history)
    }

    pub fn from_config(config: &SequencerConfig) -> Self {
        Self::with_stats_history(config.stats_history)
    }

    /// Keep timing for at most `frames` update passes; zero disables it.
    pub fn with_stats_history(frames: usize) -> Self {
        Self {
            systems: Vec::new(),
            frame_count: 0,
            stats_history: VecDeque::new(),
            max_stats_history: frames,
        }
    }

    /// Register a system, building it first when given a factory.
    ///
    /// A failing factory is logged and leaves the sequencer untouched.
    pub fn use_system(
        &mut self,
        registration: Registration,
    ) -> Result<&mut (dyn System + 'static), SequencerError> {
        let system = registration.into_system().map_err(|source| {
            error!("system registration failed: {source:#}");
            SequencerError::FactoryFailed { source }
        })?;

        let position = self.systems.len();
        debug!("registered system '{}' at position {position}", system.name());
        self.systems.push(system);
        Ok(self.systems[position].as_mut())
    }

    /// Number of registered systems
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    pub fn system_names(&self) -> impl Iterator<Item = &str> {
        self.systems.iter().map(|system| system.name())
    }

    /// Run every system's update hook in registration order
    pub fn update(&mut self, dt: f64) {
        let frame_start = Instant::now();
        let mut system_times = Vec::with_capacity(self.systems.len());

        for system in &mut self.systems {
            let system_start = Instant::now();
            system.update(dt);
            system_times.push((system.name().to_string(), system_start.elapsed()));
        }

        self.frame_count += 1;
        if self.max_stats_history == 0 {
            return;
        }

        if self.stats_history.len() == self.max_stats_history {
            self.stats_history.pop_front();
        }
        self.stats_history.push_back(FrameStats {
            frame: self.frame_count,
            duration: frame_start.elapsed(),
            system_times,
        });
    }

    /// Run every system's render hook in registration order
    pub fn render(&mut self) {
        for system in &mut self.systems {
            system.render();
        }
    }

    /// Number of update passes so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Oldest first
    pub fn recent_stats(&self) -> &VecDeque<FrameStats> {
        &self.stats_history
    }

    /// Average update time over the recorded history
    pub fn average_frame_time(&self) -> Option<Duration> {
        if self.stats_history.is_empty() {
            return None;
        }

        let total: Duration = self.stats_history.iter().map(|s| s.duration).sum();
        Some(total / self.stats_history.len() as u32)
    }
}

impl Default for SystemSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SystemSequencer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemSequencer")
            .field("systems", &self.system_names().collect::<Vec<_>>())
            .field("frame_count", &self.frame_count)
            .finish()
    }
}
