use crate::fetch::RawProgress;

/// Turns the collaborator's heterogeneous progress records into a clean,
/// non-decreasing 0..=100 percentage.
///
/// A `downloading` record with an unparsable percent counts as 0. The
/// `finished` record maps to 100 and is reported exactly once; anything after
/// it is dropped.
#[derive(Debug, Default)]
pub struct ProgressNormalizer {
    last: u8,
    finished: bool,
}

impl ProgressNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn normalize(&mut self, raw: &RawProgress) -> Option<u8> {
        if self.finished {
            return None;
        }

        match raw.status.as_str() {
            "downloading" => {
                let pct = parse_percent(&raw.percent).max(self.last);
                self.last = pct;
                Some(pct)
            }
            "finished" => {
                self.finished = true;
                self.last = 100;
                Some(100)
            }
            _ => None,
        }
    }
}

fn parse_percent(raw: &str) -> u8 {
    raw.trim()
        .trim_end_matches('%')
        .trim()
        .parse::<f32>()
        .map(|v| v.clamp(0.0, 100.0) as u8)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn downloading(percent: &str) -> RawProgress {
        RawProgress {
            status: "downloading".to_string(),
            percent: percent.to_string(),
        }
    }

    fn finished() -> RawProgress {
        RawProgress {
            status: "finished".to_string(),
            percent: "100%".to_string(),
        }
    }

    #[test]
    fn parses_percent_strings() {
        let mut norm = ProgressNormalizer::new();
        assert_eq!(norm.normalize(&downloading(" 42.3%")), Some(42));
        assert_eq!(norm.normalize(&downloading("99.9%")), Some(99));
    }

    #[test]
    fn unparsable_percent_defaults_to_zero() {
        let mut norm = ProgressNormalizer::new();
        assert_eq!(norm.normalize(&downloading("NaN?")), Some(0));
        assert_eq!(norm.normalize(&downloading("")), Some(0));
    }

    #[test]
    fn repeated_zeros_are_allowed() {
        let mut norm = ProgressNormalizer::new();
        assert_eq!(norm.normalize(&downloading("0.0%")), Some(0));
        assert_eq!(norm.normalize(&downloading("0.0%")), Some(0));
    }

    #[test]
    fn output_is_clamped_non_decreasing() {
        let mut norm = ProgressNormalizer::new();
        assert_eq!(norm.normalize(&downloading("50.0%")), Some(50));
        assert_eq!(norm.normalize(&downloading("30.0%")), Some(50));
        assert_eq!(norm.normalize(&downloading("75.0%")), Some(75));
    }

    #[test]
    fn finished_reports_hundred_exactly_once() {
        let mut norm = ProgressNormalizer::new();
        assert_eq!(norm.normalize(&downloading("98.0%")), Some(98));
        assert_eq!(norm.normalize(&finished()), Some(100));
        assert_eq!(norm.normalize(&finished()), None);
        assert_eq!(norm.normalize(&downloading("99.0%")), None);
    }

    #[test]
    fn unknown_status_is_ignored() {
        let mut norm = ProgressNormalizer::new();
        assert_eq!(
            norm.normalize(&RawProgress {
                status: "postprocessing".to_string(),
                percent: String::new(),
            }),
            None
        );
    }
}
