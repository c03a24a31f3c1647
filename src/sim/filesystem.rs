//! Folder maze challenge
//!
//! A small fixed directory tree. One folder, picked when the challenge is
//! created, hides the master chip; opening it clears the level.

use rand::Rng;
use serde::Serialize;

use crate::audio::AudioSink;
use crate::consts::*;

pub const ROOT: &str = "🏰 메인프레임";

/// Synthetic entry shown only inside the treasure folder
pub const MASTER_CHIP: &str = "💎 마스터_칩.chip";

/// Every folder and its children. Leaves have no children.
const TREE: [(&str, &[&str]); 10] = [
    (ROOT, &["📂 시스템_코어", "📂 보관용_서버", "📂 관리자_실"]),
    ("📂 시스템_코어", &["📂 보안_게이트", "📂 데이터_터널"]),
    ("📂 보관용_서버", &["📂 잊혀진_아카이브", "📂 깨진_섹터"]),
    ("📂 관리자_실", &["📂 기밀_디렉토리", "📂 휴지통"]),
    ("📂 보안_게이트", &[]),
    ("📂 데이터_터널", &[]),
    ("📂 잊혀진_아카이브", &[]),
    ("📂 깨진_섹터", &[]),
    ("📂 기밀_디렉토리", &[]),
    ("📂 휴지통", &[]),
];

/// Folders the chip may be hidden in
pub const TREASURE_SPOTS: [&str; 4] = [
    "📂 잊혀진_아카이브",
    "📂 깨진_섹터",
    "📂 기밀_디렉토리",
    "📂 보안_게이트",
];

/// Static children of a folder
fn children(folder: &str) -> &'static [&'static str] {
    TREE.iter()
        .find(|(name, _)| *name == folder)
        .map(|(_, kids)| *kids)
        .unwrap_or(&[])
}

#[derive(Debug, Clone, Serialize)]
pub struct FileSystemChallenge {
    /// Root first, current folder last; never empty
    path: Vec<&'static str>,
    treasure: &'static str,
    complete: bool,
}

impl FileSystemChallenge {
    /// Hide the chip in a random spot
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        let treasure = TREASURE_SPOTS[rng.random_range(0..TREASURE_SPOTS.len())];
        log::debug!("Master chip hidden in {}", treasure);
        Self::with_treasure(treasure)
    }

    /// Hide the chip in a known folder. Falls back to the first spot when
    /// `folder` is not a treasure spot.
    pub fn with_treasure(folder: &str) -> Self {
        let treasure = TREASURE_SPOTS
            .iter()
            .copied()
            .find(|spot| *spot == folder)
            .unwrap_or(TREASURE_SPOTS[0]);
        Self {
            path: vec![ROOT],
            treasure,
            complete: false,
        }
    }

    pub fn path(&self) -> &[&'static str] {
        &self.path
    }

    pub fn current(&self) -> &'static str {
        self.path.last().copied().unwrap_or(ROOT)
    }

    pub fn treasure(&self) -> &'static str {
        self.treasure
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Breadcrumb for the address bar
    pub fn path_display(&self) -> String {
        self.path.join(" > ")
    }

    /// What the current folder shows
    pub fn contents(&self) -> Vec<&'static str> {
        let current = self.current();
        let mut items = children(current).to_vec();
        if current == self.treasure {
            items.push(MASTER_CHIP);
        }
        items
    }

    /// Open an entry of the current folder. Opening the chip returns the
    /// reward; opening a folder descends into it. Names that are not in the
    /// current folder are ignored.
    pub fn open(&mut self, name: &str, audio: &mut dyn AudioSink) -> Option<u32> {
        if self.complete {
            return None;
        }
        let entry = self.contents().into_iter().find(|item| *item == name)?;

        if entry == MASTER_CHIP {
            audio.fanfare();
            self.complete = true;
            log::info!("Master chip found at {}", self.path_display());
            return Some(TREASURE_REWARD);
        }

        audio.click();
        self.path.push(entry);
        None
    }

    /// Go up one folder. Does nothing at the root.
    pub fn go_back(&mut self, audio: &mut dyn AudioSink) {
        if self.complete || self.path.len() <= 1 {
            return;
        }
        audio.click();
        self.path.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{Cue, CueLog};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Path from the root to a treasure spot
    fn route_to(spot: &str) -> Vec<&'static str> {
        let parent = TREE
            .iter()
            .find(|(_, kids)| kids.contains(&spot))
            .map(|(name, _)| *name)
            .unwrap();
        let leaf = children(parent).iter().copied().find(|k| *k == spot).unwrap();
        vec![parent, leaf]
    }

    #[test]
    fn test_tree_is_consistent() {
        for (_, kids) in TREE.iter() {
            for kid in kids.iter() {
                assert!(TREE.iter().any(|(name, _)| name == kid), "{} missing", kid);
            }
        }
        for spot in TREASURE_SPOTS {
            assert!(TREE.iter().any(|(name, _)| *name == spot));
        }
    }

    #[test]
    fn test_back_at_root_is_noop() {
        let mut audio = CueLog::new();
        let mut challenge = FileSystemChallenge::with_treasure(TREASURE_SPOTS[0]);
        challenge.go_back(&mut audio);
        assert_eq!(challenge.path(), &[ROOT]);
        assert_eq!(audio.count(Cue::Click), 0);
    }

    #[test]
    fn test_open_and_back() {
        let mut audio = CueLog::new();
        let mut challenge = FileSystemChallenge::with_treasure("📂 깨진_섹터");

        assert_eq!(challenge.open("📂 시스템_코어", &mut audio), None);
        assert_eq!(challenge.current(), "📂 시스템_코어");
        assert_eq!(challenge.contents(), vec!["📂 보안_게이트", "📂 데이터_터널"]);
        assert_eq!(challenge.path_display(), "🏰 메인프레임 > 📂 시스템_코어");

        // Not a child of the current folder
        assert_eq!(challenge.open("📂 휴지통", &mut audio), None);
        assert_eq!(challenge.path().len(), 2);

        challenge.go_back(&mut audio);
        assert_eq!(challenge.current(), ROOT);
    }

    #[test]
    fn test_chip_only_visible_in_treasure_folder() {
        for spot in TREASURE_SPOTS {
            let mut audio = CueLog::new();
            let mut challenge = FileSystemChallenge::with_treasure(spot);
            let route = route_to(spot);

            assert!(!challenge.contents().contains(&MASTER_CHIP));
            // Chip cannot be opened from elsewhere
            assert_eq!(challenge.open(MASTER_CHIP, &mut audio), None);

            for folder in &route {
                challenge.open(folder, &mut audio);
            }
            assert!(challenge.contents().contains(&MASTER_CHIP));
            assert_eq!(challenge.open(MASTER_CHIP, &mut audio), Some(TREASURE_REWARD));
            assert!(challenge.is_complete());
            assert_eq!(challenge.open(MASTER_CHIP, &mut audio), None);
        }
    }

    #[test]
    fn test_chip_absent_from_every_other_folder() {
        let challenge = FileSystemChallenge::with_treasure("📂 기밀_디렉토리");
        for (folder, _) in TREE.iter() {
            let mut peek = challenge.clone();
            peek.path = vec![ROOT, *folder];
            let has_chip = peek.contents().contains(&MASTER_CHIP);
            assert_eq!(has_chip, *folder == "📂 기밀_디렉토리");
        }
    }

    #[test]
    fn test_random_spot_is_a_candidate() {
        let mut rng = Pcg32::seed_from_u64(2024);
        for _ in 0..20 {
            let challenge = FileSystemChallenge::new(&mut rng);
            assert!(TREASURE_SPOTS.contains(&challenge.treasure()));
        }
    }

    #[test]
    fn test_unknown_spot_falls_back() {
        let challenge = FileSystemChallenge::with_treasure("📂 휴지통");
        assert_eq!(challenge.treasure(), TREASURE_SPOTS[0]);
    }
}
