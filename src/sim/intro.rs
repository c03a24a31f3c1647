//! Welcome screen narrative
//!
//! Booting splash for two seconds, then a distress call the player clicks
//! through line by line, then the start menu.

use serde::{Deserialize, Serialize};

use super::scheduler::Scheduler;
use crate::audio::{AudioSink, BgmMode};
use crate::consts::*;

pub const DISTRESS_LINES: [&str; 5] = [
    "치직... 제 목소리가... 들리나요?",
    "여기는 메인프레임... 다크 바이러스의 습격을 받았습니다.",
    "모든 시스템이 오염되고 있어요... 마스터 칩이 필요합니다.",
    "당신이... 우리를 구원할 '키마 마스터'인가요?",
    "제발... 시스템에 접속해서 저희를 도와주세요!",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntroStage {
    /// Connection splash
    Booting,
    /// Clicking through `DISTRESS_LINES`
    Distress,
    /// Start button visible
    Menu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IntroTask {
    Boot,
}

#[derive(Debug, Clone)]
pub struct Intro {
    stage: IntroStage,
    line: usize,
    scheduler: Scheduler<IntroTask>,
}

impl Default for Intro {
    fn default() -> Self {
        Self::new()
    }
}

impl Intro {
    pub fn new() -> Self {
        let mut scheduler = Scheduler::new();
        scheduler.after(BOOT_DELAY_MS, IntroTask::Boot);
        Self {
            stage: IntroStage::Booting,
            line: 0,
            scheduler,
        }
    }

    pub fn stage(&self) -> IntroStage {
        self.stage
    }

    /// Index of the distress line on screen
    pub fn line_index(&self) -> usize {
        self.line
    }

    pub fn line(&self) -> Option<&'static str> {
        match self.stage {
            IntroStage::Distress => DISTRESS_LINES.get(self.line).copied(),
            _ => None,
        }
    }

    /// True while another line follows the current one
    pub fn has_more_lines(&self) -> bool {
        self.line + 1 < DISTRESS_LINES.len()
    }

    /// Show the next distress line, or the menu after the last one.
    /// The first advance starts the intro music. Ignored outside `Distress`.
    pub fn advance(&mut self, audio: &mut dyn AudioSink) {
        if self.stage != IntroStage::Distress {
            return;
        }
        if self.line == 0 {
            audio.set_background_mode(BgmMode::Intro);
        }
        audio.click();

        if self.has_more_lines() {
            self.line += 1;
        } else {
            self.stage = IntroStage::Menu;
            audio.set_background_mode(BgmMode::Game);
            log::info!("Intro finished");
        }
    }

    pub fn tick(&mut self, dt_ms: u64) {
        let until = self.scheduler.now() + dt_ms;
        while let Some(task) = self.scheduler.pop_due(until) {
            match task {
                IntroTask::Boot => {
                    self.stage = IntroStage::Distress;
                    log::debug!("Boot splash done");
                }
            }
        }
        self.scheduler.settle(until);
    }
}
