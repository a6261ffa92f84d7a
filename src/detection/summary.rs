//! Natural-language summary of a (grass, weed) confidence pair.
//!
//! The arms of [`SummaryTier::classify`] overlap; they are evaluated top to
//! bottom and the first match wins.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryTier {
    NothingDetected,
    AllGrass,
    LikelyGrassWeedUndetermined,
    GoodChanceGrass,
    PossiblyGrass,
    BothVeryLow,
    BothVeryHigh,
    BothModerate,
    AllWeed,
    /// Compares a 0-1 confidence against `60.0` and therefore never matches.
    /// Kept so the table reads the same as the deployed service's.
    LikelyWeedLegacyScale,
    GoodChanceWeed,
    PossiblyWeed,
    Inconclusive,
}

impl SummaryTier {
    pub fn classify(grass: f64, weed: f64) -> SummaryTier {
        match (grass, weed) {
            (g, w) if g < 0.01 && w < 0.01 => SummaryTier::NothingDetected,
            (g, w) if g > 0.8 && w < 0.1 => SummaryTier::AllGrass,
            (g, w) if g > 0.6 && w < 0.1 => SummaryTier::LikelyGrassWeedUndetermined,
            (g, w) if g > 0.40 && w < 0.1 => SummaryTier::GoodChanceGrass,
            (g, w) if g > 0.3 && w < 0.1 => SummaryTier::PossiblyGrass,
            (g, w) if g <= 0.3 && w <= 0.3 => SummaryTier::BothVeryLow,
            (g, w) if g > 0.8 && w > 0.8 => SummaryTier::BothVeryHigh,
            (g, w) if g > 0.3 && w > 0.3 => SummaryTier::BothModerate,
            (g, w) if w > 0.8 && g < 0.1 => SummaryTier::AllWeed,
            (g, w) if w > 60.0 && g < 0.1 => SummaryTier::LikelyWeedLegacyScale,
            (g, w) if w > 0.40 && g < 0.1 => SummaryTier::GoodChanceWeed,
            (g, w) if w > 0.3 && g < 0.1 => SummaryTier::PossiblyWeed,
            _ => SummaryTier::Inconclusive,
        }
    }

    pub fn sentence(&self) -> &'static str {
        match self {
            SummaryTier::NothingDetected => {
                "Unable to detect either Grass or Weed with confidence."
            }
            SummaryTier::AllGrass => {
                "The area analyzed is most likely all Grass and maybe little or no Weed."
            }
            SummaryTier::LikelyGrassWeedUndetermined => {
                "The area analyzed has good chance of Grass but not enough confidence to determine the presence of Weed."
            }
            SummaryTier::GoodChanceGrass => {
                "There is a good chance of Grass but not enough confidence for Weed."
            }
            SummaryTier::PossiblyGrass => {
                "Possibly some grass but not enough confidence to determine the presence of Weed"
            }
            SummaryTier::BothVeryLow => "Very low chances of either Grass and Weed.",
            SummaryTier::BothVeryHigh => "Very high chance your lawn has both Grass and Weed.",
            SummaryTier::BothModerate => {
                "There is a moderate chance that your lawn has both Grass and Weed."
            }
            SummaryTier::AllWeed => {
                "The area analyzed is most likely all Weed with very low chance of Grass."
            }
            SummaryTier::LikelyWeedLegacyScale => {
                "The area analyzed most likely has Weed with very low chance of Grass."
            }
            SummaryTier::GoodChanceWeed => {
                "There is a good chance of Weed but not enough confidence for Grass."
            }
            SummaryTier::PossiblyWeed => {
                "Possibly good chance of Weed but low likelihood for Grass."
            }
            SummaryTier::Inconclusive => {
                "Always use model prediction information with care when making decisions."
            }
        }
    }
}

pub fn summarize(grass: f64, weed: f64) -> &'static str {
    SummaryTier::classify(grass, weed).sentence()
}

#[cfg(test)]
mod tests {
    use super::SummaryTier::*;
    use super::*;

    const BOUNDARIES: [f64; 11] = [0.0, 0.009, 0.01, 0.1, 0.3, 0.3001, 0.4, 0.6, 0.8, 0.8001, 1.0];

    #[test]
    fn boundary_table() {
        let cases = [
            // (grass, weed, tier)
            (0.0, 0.0, NothingDetected),
            (0.009, 0.009, NothingDetected),
            (0.01, 0.0, BothVeryLow),
            (0.0, 0.01, BothVeryLow),
            (0.8001, 0.0, AllGrass),
            (1.0, 0.009, AllGrass),
            (0.8, 0.0, LikelyGrassWeedUndetermined),
            (0.8001, 0.1, Inconclusive),
            (0.6, 0.0, GoodChanceGrass),
            (0.4, 0.0, PossiblyGrass),
            (0.3001, 0.0, PossiblyGrass),
            (0.3, 0.0, BothVeryLow),
            (0.3, 0.3, BothVeryLow),
            (0.1, 0.1, BothVeryLow),
            (0.8001, 0.8001, BothVeryHigh),
            (1.0, 1.0, BothVeryHigh),
            (0.8, 0.8001, BothModerate),
            (0.3001, 0.3001, BothModerate),
            (0.0, 0.8001, AllWeed),
            (0.009, 1.0, AllWeed),
            (0.0, 0.8, GoodChanceWeed),
            (0.0, 0.6, GoodChanceWeed),
            (0.0, 0.4, PossiblyWeed),
            (0.0, 0.3001, PossiblyWeed),
            (0.1, 0.8001, Inconclusive),
            (0.3, 0.4, Inconclusive),
            (0.1, 1.0, Inconclusive),
            (0.3001, 0.1, Inconclusive),
            (0.6, 0.3, Inconclusive),
        ];

        for (g, w, expected) in cases {
            assert_eq!(SummaryTier::classify(g, w), expected, "g={g} w={w}");
        }
    }

    #[test]
    fn every_boundary_pair_yields_exactly_one_sentence() {
        for g in BOUNDARIES {
            for w in BOUNDARIES {
                let tier = SummaryTier::classify(g, w);
                assert!(!tier.sentence().is_empty());
                if g < 0.01 && w < 0.01 {
                    assert_eq!(tier, NothingDetected);
                }
                if g <= 0.3 && w <= 0.3 && (g >= 0.01 || w >= 0.01) {
                    assert_eq!(tier, BothVeryLow, "g={g} w={w}");
                }
            }
        }
    }

    #[test]
    fn legacy_scale_rule_never_fires_on_unit_interval() {
        for g in BOUNDARIES {
            for w in BOUNDARIES {
                assert_ne!(SummaryTier::classify(g, w), LikelyWeedLegacyScale);
            }
        }
        // Weed-only confidences between 0.4 and 0.8 fall through to the next rule.
        assert_eq!(SummaryTier::classify(0.0, 0.7), GoodChanceWeed);
        assert_eq!(SummaryTier::classify(0.0, 0.81), AllWeed);
    }

    #[test]
    fn sentences_match_published_wording() {
        assert_eq!(summarize(0.0, 0.0), "Unable to detect either Grass or Weed with confidence.");
        assert_eq!(
            summarize(0.95, 0.05),
            "The area analyzed is most likely all Grass and maybe little or no Weed."
        );
        assert_eq!(
            summarize(0.2, 0.5),
            "Always use model prediction information with care when making decisions."
        );
    }
}
