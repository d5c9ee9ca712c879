use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

//
// ─── READINESS LEVEL ───────────────────────────────────────────────────────────
//

/// Overall readiness classification derived from the total score.
///
/// Bands are fixed and non-overlapping:
///
/// | total   | level               |
/// |---------|---------------------|
/// | 0–40    | Not Ready           |
/// | 41–60   | Foundation Building |
/// | 61–75   | Ready for Pilots    |
/// | 76–85   | AI Ready            |
/// | 86–150  | AI Advanced         |
///
/// Totals above 150 still classify as `AiAdvanced`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReadinessLevel {
    #[serde(rename = "Not Ready")]
    NotReady,
    #[serde(rename = "Foundation Building")]
    FoundationBuilding,
    #[serde(rename = "Ready for Pilots")]
    ReadyForPilots,
    #[serde(rename = "AI Ready")]
    AiReady,
    #[serde(rename = "AI Advanced")]
    AiAdvanced,
}

impl ReadinessLevel {
    pub const ALL: [ReadinessLevel; 5] = [
        ReadinessLevel::NotReady,
        ReadinessLevel::FoundationBuilding,
        ReadinessLevel::ReadyForPilots,
        ReadinessLevel::AiReady,
        ReadinessLevel::AiAdvanced,
    ];

    /// Classifies a total score.
    #[must_use]
    pub fn from_total(total: u32) -> Self {
        match total {
            0..=40 => ReadinessLevel::NotReady,
            41..=60 => ReadinessLevel::FoundationBuilding,
            61..=75 => ReadinessLevel::ReadyForPilots,
            76..=85 => ReadinessLevel::AiReady,
            _ => ReadinessLevel::AiAdvanced,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ReadinessLevel::NotReady => "Not Ready",
            ReadinessLevel::FoundationBuilding => "Foundation Building",
            ReadinessLevel::ReadyForPilots => "Ready for Pilots",
            ReadinessLevel::AiReady => "AI Ready",
            ReadinessLevel::AiAdvanced => "AI Advanced",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            ReadinessLevel::NotReady => {
                "Significant foundational work needed before AI implementation"
            }
            ReadinessLevel::FoundationBuilding => {
                "Some readiness exists but key gaps need addressing"
            }
            ReadinessLevel::ReadyForPilots => "Good foundation for starting AI implementation",
            ReadinessLevel::AiReady => "Strong readiness for comprehensive AI implementation",
            ReadinessLevel::AiAdvanced => "Excellent readiness for cutting-edge AI implementation",
        }
    }

    /// Inclusive score band for this level.
    #[must_use]
    pub fn score_range(self) -> RangeInclusive<u32> {
        match self {
            ReadinessLevel::NotReady => 0..=40,
            ReadinessLevel::FoundationBuilding => 41..=60,
            ReadinessLevel::ReadyForPilots => 61..=75,
            ReadinessLevel::AiReady => 76..=85,
            ReadinessLevel::AiAdvanced => 86..=150,
        }
    }

    /// Parses a stored label back into a level.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.label() == label)
    }
}

impl fmt::Display for ReadinessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

//
// ─── SECTION STATUS ────────────────────────────────────────────────────────────
//

/// Qualitative label for a single section's percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionStatus {
    Strong,
    Adequate,
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
    #[serde(rename = "Critical Gap")]
    CriticalGap,
}

impl SectionStatus {
    #[must_use]
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 80.0 {
            SectionStatus::Strong
        } else if percentage >= 60.0 {
            SectionStatus::Adequate
        } else if percentage >= 40.0 {
            SectionStatus::NeedsImprovement
        } else {
            SectionStatus::CriticalGap
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SectionStatus::Strong => "Strong",
            SectionStatus::Adequate => "Adequate",
            SectionStatus::NeedsImprovement => "Needs Improvement",
            SectionStatus::CriticalGap => "Critical Gap",
        }
    }
}

impl fmt::Display for SectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_boundaries_classify_distinctly() {
        let cases = [
            (0, ReadinessLevel::NotReady),
            (40, ReadinessLevel::NotReady),
            (41, ReadinessLevel::FoundationBuilding),
            (60, ReadinessLevel::FoundationBuilding),
            (61, ReadinessLevel::ReadyForPilots),
            (75, ReadinessLevel::ReadyForPilots),
            (76, ReadinessLevel::AiReady),
            (85, ReadinessLevel::AiReady),
            (86, ReadinessLevel::AiAdvanced),
            (150, ReadinessLevel::AiAdvanced),
        ];
        for (total, expected) in cases {
            assert_eq!(ReadinessLevel::from_total(total), expected, "total {total}");
        }
    }

    #[test]
    fn bands_cover_scale_without_overlap() {
        for total in 0..=150 {
            let matching = ReadinessLevel::ALL
                .iter()
                .filter(|l| l.score_range().contains(&total))
                .count();
            assert_eq!(matching, 1, "total {total}");
            assert!(ReadinessLevel::from_total(total).score_range().contains(&total));
        }
    }

    #[test]
    fn labels_roundtrip() {
        for level in ReadinessLevel::ALL {
            assert_eq!(ReadinessLevel::from_label(level.label()), Some(level));
        }
        assert_eq!(
            serde_json::to_string(&ReadinessLevel::AiReady).unwrap(),
            "\"AI Ready\""
        );
    }

    #[test]
    fn section_status_thresholds() {
        assert_eq!(SectionStatus::from_percentage(100.0), SectionStatus::Strong);
        assert_eq!(SectionStatus::from_percentage(80.0), SectionStatus::Strong);
        assert_eq!(SectionStatus::from_percentage(79.9), SectionStatus::Adequate);
        assert_eq!(SectionStatus::from_percentage(60.0), SectionStatus::Adequate);
        assert_eq!(
            SectionStatus::from_percentage(40.0),
            SectionStatus::NeedsImprovement
        );
        assert_eq!(SectionStatus::from_percentage(39.9), SectionStatus::CriticalGap);
        assert_eq!(SectionStatus::from_percentage(0.0), SectionStatus::CriticalGap);
    }
}
