// src/session/timer.rs

/// What a single countdown step asks the session to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Nothing expired this tick.
    Running,

    /// The per-question limit ran out and a next question exists.
    AdvanceQuestion,

    /// The overall limit ran out; the attempt must finalize now.
    OverallExpired,
}

/// Two independent countdowns over a shared one-second tick.
///
/// The overall timer is monotonic from attempt start and unaffected by
/// navigation. The per-question timer only exists when the exam defines
/// a pacing limit; it resets on navigation and on auto-advance, and it
/// stops for good once it expires on the last question (no wraparound).
#[derive(Debug, Clone)]
pub struct TimerController {
    overall_remaining: u64,
    question_limit: Option<u64>,
    question_remaining: Option<u64>,
    elapsed: u64,
    stopped: bool,
}

impl TimerController {
    pub fn new(total_seconds: u64, per_question_seconds: Option<u64>) -> Self {
        Self {
            overall_remaining: total_seconds,
            question_limit: per_question_seconds,
            question_remaining: per_question_seconds,
            elapsed: 0,
            stopped: false,
        }
    }

    /// One whole countdown step: decrement, check expiry, and decide the
    /// side effect. Callers run this under the session lock so the step
    /// is indivisible with respect to user actions.
    pub fn tick(&mut self, on_last_question: bool) -> TimerEvent {
        if self.stopped {
            return TimerEvent::Running;
        }

        self.elapsed += 1;
        self.overall_remaining = self.overall_remaining.saturating_sub(1);
        if self.overall_remaining == 0 {
            self.stop();
            return TimerEvent::OverallExpired;
        }

        if let Some(remaining) = self.question_remaining {
            let remaining = remaining.saturating_sub(1);
            if remaining == 0 {
                if on_last_question {
                    // Last question: the pacing countdown ends here.
                    self.question_remaining = None;
                } else {
                    self.question_remaining = self.question_limit;
                    return TimerEvent::AdvanceQuestion;
                }
            } else {
                self.question_remaining = Some(remaining);
            }
        }

        TimerEvent::Running
    }

    /// Restarts the per-question countdown (navigation landed on a new
    /// question). No effect when the exam has no pacing limit.
    pub fn reset_question_timer(&mut self) {
        if !self.stopped {
            self.question_remaining = self.question_limit;
        }
    }

    /// Tears both countdowns down. Once stopped a timer never fires again.
    pub fn stop(&mut self) {
        self.stopped = true;
        self.question_remaining = None;
    }

    pub fn overall_remaining(&self) -> u64 {
        self.overall_remaining
    }

    pub fn question_remaining(&self) -> Option<u64> {
        self.question_remaining
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}
