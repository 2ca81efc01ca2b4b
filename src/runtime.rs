use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crate::session::{RecognitionEvent, RecordingSession};

/// Unified event type consumed by the recording runner
#[derive(Clone, Debug)]
pub enum SessionEvent {
    Recognition(RecognitionEvent),
    /// The recognizer finished and closed its stream.
    Closed,
    Tick,
}

/// Source of recognition results for one attempt
pub trait RecognitionSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<SessionEvent, RecvTimeoutError>;
}

/// Source fed by another thread through a channel
pub struct ChannelSource {
    rx: Receiver<SessionEvent>,
}

impl ChannelSource {
    pub fn new(rx: Receiver<SessionEvent>) -> Self {
        Self { rx }
    }
}

impl RecognitionSource for ChannelSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<SessionEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Time left in the current recording.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Countdown {
    remaining: Duration,
}

impl Countdown {
    pub fn new(total: Duration) -> Self {
        Self { remaining: total }
    }

    pub fn from_secs(secs: u32) -> Self {
        Self::new(Duration::from_secs(u64::from(secs)))
    }

    pub fn on_tick(&mut self, elapsed: Duration) {
        self.remaining = self.remaining.saturating_sub(elapsed);
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn expired(&self) -> bool {
        self.remaining.is_zero()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    StreamClosed,
    TimeUp,
}

/// Runner that advances a recording one event/tick at a time
pub struct Runner<S: RecognitionSource, T: Ticker> {
    source: S,
    ticker: T,
}

impl<S: RecognitionSource, T: Ticker> Runner<S, T> {
    pub fn new(source: S, ticker: T) -> Self {
        Self { source, ticker }
    }

    /// Blocks up to tick interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> SessionEvent {
        match self.source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => SessionEvent::Tick,
            Err(RecvTimeoutError::Disconnected) => SessionEvent::Closed,
        }
    }

    /// Drive one attempt: the session is reset, then fed until the stream
    /// closes or the countdown runs out. The countdown follows wall time, so
    /// a source that never goes quiet still ends on time.
    pub fn record(&self, session: &mut RecordingSession, mut countdown: Countdown) -> StopReason {
        session.reset();
        let mut last = Instant::now();

        loop {
            let event = self.step();
            let now = Instant::now();
            countdown.on_tick(now.duration_since(last));
            last = now;

            match event {
                SessionEvent::Recognition(event) => session.apply(&event),
                SessionEvent::Closed => {
                    log::info!("recognizer closed the stream");
                    return StopReason::StreamClosed;
                }
                SessionEvent::Tick => {}
            }

            if countdown.expired() {
                log::info!("recording time is up");
                return StopReason::TimeUp;
            }
        }
    }
}
