//! Length distribution validation.

use contentgate_core::{
    AnalyzerKind, Batch, Issue, LengthItem, LengthSection, ValidationResult,
};
use std::collections::BTreeMap;

use crate::config::LengthConfig;

/// Platform-aware length validator.
#[derive(Debug, Clone, Default)]
pub struct LengthValidator {
    config: LengthConfig,
}

impl LengthValidator {
    /// Create a validator.
    pub fn new(config: LengthConfig) -> Self {
        Self { config }
    }

    /// Check every item against its profile and the batch for homogeneity.
    pub fn analyze(&self, batch: &Batch) -> LengthSection {
        let n = batch.len();
        let mut issues = Vec::new();
        let mut items = Vec::with_capacity(n);
        let mut histograms: BTreeMap<String, BTreeMap<usize, usize>> = BTreeMap::new();

        for item in batch.items() {
            let profile = item.profile();
            let words = item.word_count();
            let in_range = (profile.min_words..=profile.max_words).contains(&words);
            let in_optimal = (profile.optimal_min..=profile.optimal_max).contains(&words);

            if !in_range {
                issues.push(Issue::item_error(
                    item.position(),
                    format!(
                        "{} words is outside the {}-{} word range for {}",
                        words,
                        profile.min_words,
                        profile.max_words,
                        profile.key()
                    ),
                ));
            }

            let bucket = words / profile.histogram_bucket * profile.histogram_bucket;
            *histograms
                .entry(profile.key().to_string())
                .or_default()
                .entry(bucket)
                .or_default() += 1;

            items.push(LengthItem {
                position: item.position(),
                profile: profile.key().to_string(),
                word_count: words,
                in_range,
                in_optimal,
            });
        }

        let ratio = |count: usize| if n == 0 { 1.0 } else { count as f64 / n as f64 };
        let in_range_ratio = ratio(items.iter().filter(|i| i.in_range).count());
        let optimal_ratio = ratio(items.iter().filter(|i| i.in_optimal).count());

        let largest_bucket_share = self.largest_bucket_share(&items);
        let homogeneous = n >= self.config.min_items_for_homogeneity
            && largest_bucket_share > self.config.homogeneity_max_share;
        if homogeneous {
            issues.push(Issue::batch_error(format!(
                "{:.0}% of items fall in the same {}-word length bucket (limit {:.0}%)",
                largest_bucket_share * 100.0,
                self.config.homogeneity_bucket,
                self.config.homogeneity_max_share * 100.0
            )));
        }

        let diversity = if homogeneous { 1.0 - largest_bucket_share } else { 1.0 };
        let score = 0.5 * in_range_ratio + 0.3 * optimal_ratio + 0.2 * diversity;
        let passed = in_range_ratio == 1.0 && !homogeneous;

        let metric = format!(
            "{:.0}% in range, {:.0}% optimal, largest {}-word bucket {:.0}%",
            in_range_ratio * 100.0,
            optimal_ratio * 100.0,
            self.config.homogeneity_bucket,
            largest_bucket_share * 100.0
        );

        LengthSection {
            result: ValidationResult::new(AnalyzerKind::Length, passed, score, issues, metric),
            items,
            in_range_ratio,
            optimal_ratio,
            histograms,
            largest_bucket_share,
            homogeneous,
        }
    }

    fn largest_bucket_share(&self, items: &[LengthItem]) -> f64 {
        if items.is_empty() {
            return 0.0;
        }
        let mut buckets: BTreeMap<usize, usize> = BTreeMap::new();
        for item in items {
            *buckets
                .entry(item.word_count / self.config.homogeneity_bucket)
                .or_default() += 1;
        }
        let largest = buckets.values().copied().max().unwrap_or(0);
        largest as f64 / items.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contentgate_core::ItemRecord;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    fn batch(lengths: &[usize], platform: &str) -> Batch {
        let records = lengths
            .iter()
            .enumerate()
            .map(|(i, n)| ItemRecord::new(i, words(*n)).with_platform(platform))
            .collect();
        Batch::from_records(records).unwrap()
    }

    #[test]
    fn test_single_long_form_item_in_optimal_range() {
        let section = LengthValidator::default().analyze(&batch(&[2200], "blog"));
        assert!(section.result.passed);
        assert_eq!(section.optimal_ratio, 1.0);
        assert_eq!(section.in_range_ratio, 1.0);
        assert_eq!(section.histograms["blog"][&2000], 1);
    }

    #[test]
    fn test_out_of_range_item_fails() {
        let section = LengthValidator::default().analyze(&batch(&[30, 120, 700], "linkedin"));
        assert!(!section.result.passed);
        let positions: Vec<_> = section.result.issues.iter().map(|i| i.position).collect();
        assert_eq!(positions, vec![Some(0), Some(2)]);
        assert!(!section.items[0].in_range);
        assert!(section.items[1].in_range);
    }

    #[test]
    fn test_homogeneous_batch_fails() {
        // 8 of 10 items in the 150-159 bucket
        let lengths = [150, 151, 152, 153, 154, 155, 156, 159, 220, 290];
        let section = LengthValidator::default().analyze(&batch(&lengths, "linkedin"));
        assert!(section.homogeneous);
        assert_eq!(section.largest_bucket_share, 0.8);
        assert!(!section.result.passed);
    }

    #[test]
    fn test_varied_batch_passes() {
        let lengths = [150, 170, 190, 210, 230, 250, 270, 290, 160, 180];
        let section = LengthValidator::default().analyze(&batch(&lengths, "linkedin"));
        assert!(!section.homogeneous);
        assert!(section.result.passed);
        assert_eq!(section.optimal_ratio, 1.0);
    }

    #[test]
    fn test_histogram_buckets_follow_platform() {
        let section = LengthValidator::default().analyze(&batch(&[12, 19, 25], "twitter"));
        let twitter = &section.histograms["twitter"];
        assert_eq!(twitter[&10], 2);
        assert_eq!(twitter[&20], 1);
    }

    #[test]
    fn test_empty_batch_passes() {
        let section = LengthValidator::default().analyze(&Batch::default());
        assert!(section.result.passed);
        assert_eq!(section.result.score, 1.0);
    }
}
