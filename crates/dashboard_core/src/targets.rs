/// Identifies one request attempt; newer requests always get larger ids.
pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    Single,
    Batch,
}

impl RequestMode {
    /// One target is a single analysis, anything more is a batch.
    pub fn for_target_count(count: usize) -> Self {
        if count == 1 {
            RequestMode::Single
        } else {
            RequestMode::Batch
        }
    }
}

/// A request the controller has issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub id: RequestId,
    pub targets: Vec<String>,
    pub mode: RequestMode,
}

/// Splits raw input on newlines and commas, trimming each piece and dropping
/// blanks. Order is preserved and repeated URLs are kept.
pub fn parse_targets(raw: &str) -> Vec<String> {
    raw.split(['\n', ','])
        .map(str::trim)
        .filter(|target| !target.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Inverse of [`parse_targets`] for the navigation trigger value.
pub fn join_targets(targets: &[String]) -> String {
    targets.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_newlines_and_commas() {
        assert_eq!(
            parse_targets("urlA\nurlB,urlC"),
            vec!["urlA", "urlB", "urlC"]
        );
    }

    #[test]
    fn runs_of_separators_and_whitespace_are_dropped() {
        assert_eq!(
            parse_targets(" a ,,\r\n\n,  b\t\n , "),
            vec!["a", "b"]
        );
        assert!(parse_targets(" \n , \n").is_empty());
        assert!(parse_targets("").is_empty());
    }

    #[test]
    fn duplicates_are_kept_in_order() {
        assert_eq!(parse_targets("x\ny\nx"), vec!["x", "y", "x"]);
    }

    #[test]
    fn joined_targets_parse_back() {
        let targets = parse_targets("a\nb , c");
        assert_eq!(parse_targets(&join_targets(&targets)), targets);
    }

    #[test]
    fn mode_threshold_is_exactly_one() {
        assert_eq!(RequestMode::for_target_count(1), RequestMode::Single);
        assert_eq!(RequestMode::for_target_count(2), RequestMode::Batch);
        assert_eq!(RequestMode::for_target_count(40), RequestMode::Batch);
    }
}
