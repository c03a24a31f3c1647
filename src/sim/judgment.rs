//! Computer manners quiz
//!
//! Eight short scenarios, each either good or bad behaviour at the computer.
//! The player judges each one; feedback stays up for a second before the next
//! scenario, and the level pays 50 points per correct call.

use serde::{Deserialize, Serialize};

use super::scheduler::Scheduler;
use crate::audio::AudioSink;
use crate::consts::*;

/// One quiz item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Scenario {
    pub text: &'static str,
    /// Ground truth: is this acceptable behaviour?
    pub acceptable: bool,
}

pub static SCENARIOS: [Scenario; 8] = [
    Scenario {
        text: "사용 후 마우스와 키보드를 가지런히 정리해요.",
        acceptable: true,
    },
    Scenario {
        text: "컴퓨터를 발로 툭툭 차요.",
        acceptable: false,
    },
    Scenario {
        text: "음료수나 과자를 컴퓨터 앞에서 먹어요.",
        acceptable: false,
    },
    Scenario {
        text: "컴퓨터 전원을 함부로 껐다 켰다 반복해요.",
        acceptable: false,
    },
    Scenario {
        text: "모르는 내용이 있으면 손을 들고 질문해요.",
        acceptable: true,
    },
    Scenario {
        text: "친구의 모니터를 손가락으로 꾹꾹 눌러요.",
        acceptable: false,
    },
    Scenario {
        text: "수업 시간에 게임을 몰래 해요.",
        acceptable: false,
    },
    Scenario {
        text: "지정된 자리에 바른 자세로 앉아요.",
        acceptable: true,
    },
];

/// Result of the last answer, shown until the delay runs out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feedback {
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JudgmentTask {
    ClearFeedback,
}

#[derive(Debug, Clone)]
pub struct JudgmentChallenge {
    index: usize,
    earned: u32,
    feedback: Option<Feedback>,
    scheduler: Scheduler<JudgmentTask>,
    complete: bool,
}

impl Default for JudgmentChallenge {
    fn default() -> Self {
        Self::new()
    }
}

impl JudgmentChallenge {
    pub fn new() -> Self {
        Self {
            index: 0,
            earned: 0,
            feedback: None,
            scheduler: Scheduler::new(),
            complete: false,
        }
    }

    pub fn current(&self) -> &'static Scenario {
        &SCENARIOS[self.index.min(SCENARIOS.len() - 1)]
    }

    /// Zero-based index of the scenario on screen
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn earned(&self) -> u32 {
        self.earned
    }

    pub fn feedback(&self) -> Option<Feedback> {
        self.feedback
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn live_tasks(&self) -> usize {
        self.scheduler.len()
    }

    pub fn teardown(&mut self) {
        self.scheduler.cancel_all();
    }

    /// Judge the current scenario. Ignored while feedback is showing.
    /// Returns true if the answer was taken.
    pub fn choose(&mut self, acceptable: bool, audio: &mut dyn AudioSink) -> bool {
        if self.complete || self.feedback.is_some() {
            return false;
        }

        if acceptable == self.current().acceptable {
            audio.success();
            self.earned += POINTS_PER_CORRECT;
            self.feedback = Some(Feedback::Correct);
        } else {
            audio.error();
            self.feedback = Some(Feedback::Incorrect);
        }
        log::debug!(
            "Scenario {}: {:?} (earned {})",
            self.index + 1,
            self.feedback,
            self.earned
        );

        self.scheduler
            .after(FEEDBACK_DELAY_MS, JudgmentTask::ClearFeedback);
        true
    }

    /// Advance time. Returns the total earned once the last feedback clears.
    pub fn tick(&mut self, dt_ms: u64) -> Option<u32> {
        let until = self.scheduler.now() + dt_ms;
        while let Some(task) = self.scheduler.pop_due(until) {
            match task {
                JudgmentTask::ClearFeedback => {
                    self.feedback = None;
                    if self.index + 1 < SCENARIOS.len() {
                        self.index += 1;
                    } else {
                        self.complete = true;
                        self.teardown();
                        return Some(self.earned);
                    }
                }
            }
        }
        self.scheduler.settle(until);
        None
    }
}
