//! Pricing tiers

use serde::{Deserialize, Serialize};

const USD_LMS_PER_WEEK: f64 = 19.0;
const INR_LMS_PER_WEEK: f64 = 1499.0;
const USD_VIDEO_ADDON: f64 = 60.0;
const INR_VIDEO_ADDON: f64 = 6000.0;
const USD_LIVE_PER_WEEK: f64 = 60.0;
const INR_LIVE_PER_WEEK: f64 = 5000.0;

/// A price in both currencies
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceTier {
    /// Price in US dollars
    #[serde(default)]
    pub usd: f64,
    /// Price in Indian rupees
    #[serde(default)]
    pub inr: f64,
}

impl PriceTier {
    /// Create a tier
    #[must_use]
    pub const fn new(usd: f64, inr: f64) -> Self {
        Self { usd, inr }
    }
}

/// The three delivery tiers of a course
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Pricing {
    /// Week count the tiers were derived from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weeks: Option<u32>,
    /// Self-paced LMS access
    #[serde(default)]
    pub lms: Option<PriceTier>,
    /// LMS plus recorded video
    #[serde(default)]
    pub lms_video: Option<PriceTier>,
    /// LMS plus video plus live sessions
    #[serde(default)]
    pub lms_video_live: Option<PriceTier>,
}

impl Pricing {
    /// Derive the standard tiers for a course of `weeks` weeks.
    ///
    /// LMS is charged per week, video is a flat add-on on top of LMS, and
    /// live adds one lecture per week on top of LMS plus video.
    #[must_use]
    pub fn from_weeks(weeks: u32) -> Self {
        let w = f64::from(weeks);
        let lms = PriceTier::new(w * USD_LMS_PER_WEEK, w * INR_LMS_PER_WEEK);
        let lms_video = PriceTier::new(lms.usd + USD_VIDEO_ADDON, lms.inr + INR_VIDEO_ADDON);
        let lms_video_live = PriceTier::new(
            lms_video.usd + w * USD_LIVE_PER_WEEK,
            lms_video.inr + w * INR_LIVE_PER_WEEK,
        );
        Self {
            weeks: Some(weeks),
            lms: Some(lms),
            lms_video: Some(lms_video),
            lms_video_live: Some(lms_video_live),
        }
    }

    /// Tiers with their display labels, skipping absent ones
    #[must_use]
    pub fn tiers(&self) -> Vec<(&'static str, PriceTier)> {
        [
            ("LMS", self.lms),
            ("LMS + Video", self.lms_video),
            ("LMS + Video + Live", self.lms_video_live),
        ]
        .into_iter()
        .filter_map(|(label, tier)| tier.map(|t| (label, t)))
        .collect()
    }

    /// Lowest positive INR price across the tiers.
    ///
    /// Zero-priced and missing tiers are ignored; `None` means unpriced.
    #[must_use]
    pub fn min_inr(&self) -> Option<f64> {
        [self.lms, self.lms_video, self.lms_video_live]
            .into_iter()
            .flatten()
            .map(|t| t.inr)
            .filter(|inr| *inr > 0.0)
            .min_by(f64::total_cmp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_inr_across_tiers() {
        let pricing = Pricing {
            weeks: Some(1),
            lms: Some(PriceTier::new(19.0, 1499.0)),
            lms_video: Some(PriceTier::new(79.0, 7499.0)),
            lms_video_live: Some(PriceTier::new(139.0, 12499.0)),
        };
        assert_eq!(pricing.min_inr(), Some(1499.0));
    }

    #[test]
    fn test_min_inr_ignores_zero_and_missing() {
        let pricing = Pricing {
            weeks: None,
            lms: Some(PriceTier::new(0.0, 0.0)),
            lms_video: None,
            lms_video_live: Some(PriceTier::new(100.0, 9000.0)),
        };
        assert_eq!(pricing.min_inr(), Some(9000.0));
        assert_eq!(Pricing::default().min_inr(), None);
    }

    #[test]
    fn test_from_weeks_one_week() {
        let pricing = Pricing::from_weeks(1);
        assert_eq!(pricing.lms, Some(PriceTier::new(19.0, 1499.0)));
        assert_eq!(pricing.lms_video, Some(PriceTier::new(79.0, 7499.0)));
        assert_eq!(pricing.lms_video_live, Some(PriceTier::new(139.0, 12499.0)));
    }

    #[test]
    fn test_from_weeks_live_adds_one_lecture_per_week() {
        let pricing = Pricing::from_weeks(4);
        let live = pricing.lms_video_live.unwrap();
        // 4 * 1499 + 6000 + 4 * 5000
        assert!((live.inr - 31996.0).abs() < f64::EPSILON);
        assert!((live.usd - (76.0 + 60.0 + 240.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tiers_labels() {
        let labels: Vec<_> = Pricing::from_weeks(2)
            .tiers()
            .into_iter()
            .map(|(l, _)| l)
            .collect();
        assert_eq!(labels, vec!["LMS", "LMS + Video", "LMS + Video + Live"]);
    }
}
