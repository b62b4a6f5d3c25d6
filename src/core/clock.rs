//=========================================================================
// Frame Clock
//=========================================================================
//
// Per-frame subscription point driving every core system.
//
// Architecture:
//   PlatformEvent::Frame → FrameClock::tick(ctx) → subscriber 1..N
//
// The clock has no fixed interval: one tick happens per rendered frame, so
// the cadence follows the display refresh rate. Subscribers run in
// registration order; the first failing subscriber ends the tick and its
// error is returned unchanged.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::{Duration, Instant};

use log::trace;

//=== Internal Dependencies ===============================================

use crate::core::services::RenderFault;

//=== FrameInfo ===========================================================

/// Per-tick information handed to every subscriber.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    /// Monotonic frame counter, starting at 1 for the first tick.
    pub index: u64,

    /// Wall-clock time since the previous tick (zero on the first tick).
    pub delta: Duration,
}

//=== FrameClock ==========================================================

type Subscriber<C> = Box<dyn FnMut(&mut C, &FrameInfo) -> Result<(), RenderFault> + Send>;

/// Invokes registered callbacks once per frame against a shared context.
pub struct FrameClock<C> {
    subscribers: Vec<(&'static str, Subscriber<C>)>,
    frame_index: u64,
    last_tick: Option<Instant>,
}

impl<C> FrameClock<C> {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            frame_index: 0,
            last_tick: None,
        }
    }

    /// Registers a per-frame callback. Callbacks run in registration order.
    pub fn subscribe<F>(&mut self, name: &'static str, subscriber: F)
    where
        F: FnMut(&mut C, &FrameInfo) -> Result<(), RenderFault> + Send + 'static,
    {
        trace!("Frame clock subscriber registered: {}", name);
        self.subscribers.push((name, Box::new(subscriber)));
    }

    /// Runs one frame: invokes every subscriber with `context`.
    pub fn tick(&mut self, context: &mut C) -> Result<FrameInfo, RenderFault> {
        let now = Instant::now();
        let delta = self
            .last_tick
            .map(|last| now.duration_since(last))
            .unwrap_or(Duration::ZERO);
        self.last_tick = Some(now);
        self.frame_index += 1;

        let frame = FrameInfo {
            index: self.frame_index,
            delta,
        };

        for (name, subscriber) in &mut self.subscribers {
            if let Err(fault) = subscriber(context, &frame) {
                trace!("Subscriber {} failed on frame {}", name, frame.index);
                return Err(fault);
            }
        }

        Ok(frame)
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Names of registered subscribers, in invocation order.
    pub fn subscriber_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.subscribers.iter().map(|(name, _)| *name)
    }
}

impl<C> Default for FrameClock<C> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_without_subscribers_advances_index() {
        let mut clock: FrameClock<()> = FrameClock::new();
        let first = clock.tick(&mut ()).unwrap();
        let second = clock.tick(&mut ()).unwrap();

        assert_eq!(first.index, 1);
        assert_eq!(first.delta, Duration::ZERO);
        assert_eq!(second.index, 2);
        assert_eq!(clock.frame_index(), 2);
    }

    #[test]
    fn subscribers_run_in_registration_order() {
        let mut clock: FrameClock<Vec<&'static str>> = FrameClock::new();
        clock.subscribe("a", |log, _| {
            log.push("a");
            Ok(())
        });
        clock.subscribe("b", |log, _| {
            log.push("b");
            Ok(())
        });
        clock.subscribe("c", |log, _| {
            log.push("c");
            Ok(())
        });

        let mut log = Vec::new();
        clock.tick(&mut log).unwrap();
        clock.tick(&mut log).unwrap();

        assert_eq!(log, ["a", "b", "c", "a", "b", "c"]);
        assert_eq!(clock.subscriber_names().collect::<Vec<_>>(), ["a", "b", "c"]);
    }

    #[test]
    fn failing_subscriber_stops_the_tick() {
        let mut clock: FrameClock<Vec<u64>> = FrameClock::new();
        clock.subscribe("first", |seen, frame| {
            seen.push(frame.index);
            Ok(())
        });
        clock.subscribe("faulty", |_, frame| {
            if frame.index == 2 {
                Err(RenderFault::new("device lost"))
            } else {
                Ok(())
            }
        });
        clock.subscribe("last", |seen, frame| {
            seen.push(frame.index * 100);
            Ok(())
        });

        let mut seen = Vec::new();
        clock.tick(&mut seen).unwrap();
        let fault = clock.tick(&mut seen).unwrap_err();

        assert_eq!(fault.message(), "device lost");
        assert_eq!(seen, [1, 100, 2]);
    }

    #[test]
    fn subscribers_see_same_frame_info() {
        let mut clock: FrameClock<Vec<FrameInfo>> = FrameClock::new();
        clock.subscribe("one", |seen, frame| {
            seen.push(*frame);
            Ok(())
        });
        clock.subscribe("two", |seen, frame| {
            seen.push(*frame);
            Ok(())
        });

        let mut seen = Vec::new();
        let frame = clock.tick(&mut seen).unwrap();

        assert_eq!(seen, [frame, frame]);
    }
}
