//! Cycle time inference from PDU names
//!
//! PDUs follow a naming convention where a trailing `_<ms>` suffix of two to
//! four digits encodes the transmission period in milliseconds.

use regex::Regex;
use std::sync::OnceLock;

/// Cycle time derived from a PDU name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleTime {
    /// The matched digit run, or `"None"` when the name carries no period
    pub extracted: String,
    /// Period in seconds as decimal text
    pub seconds: String,
}

impl CycleTime {
    fn none() -> Self {
        Self {
            extracted: "None".to_string(),
            seconds: "0.0".to_string(),
        }
    }

    /// True when the name carried a period suffix
    pub fn is_inferred(&self) -> bool {
        self.extracted != "None"
    }
}

fn suffix_regex() -> &'static Regex {
    static SUFFIX_REGEX: OnceLock<Regex> = OnceLock::new();
    SUFFIX_REGEX.get_or_init(|| Regex::new(r"_([0-9]{2,4})$").expect("Invalid regex"))
}

/// Infer the transmission cycle time of a PDU from its name
///
/// `"Engine_Status_100"` yields `("100", "0.1")`; names without a 2-4 digit
/// suffix yield `("None", "0.0")`.
pub fn infer_cycle_time(pdu_name: &str) -> CycleTime {
    let Some(digits) = suffix_regex().captures(pdu_name).and_then(|c| c.get(1)) else {
        return CycleTime::none();
    };

    // At most four digits, always fits
    let millis: u32 = digits.as_str().parse().unwrap_or(0);

    CycleTime {
        extracted: digits.as_str().to_string(),
        seconds: format_seconds(f64::from(millis) / 1000.0),
    }
}

/// The name without its `_<digits>` period suffix, if it has one
///
/// `"EngineStatus_100"` yields `Some("EngineStatus")`.
pub fn strip_cycle_suffix(pdu_name: &str) -> Option<&str> {
    suffix_regex()
        .find(pdu_name)
        .map(|suffix| &pdu_name[..suffix.start()])
}

/// Shortest round-trip decimal text, keeping ".0" on whole numbers
fn format_seconds(seconds: f64) -> String {
    format!("{:?}", seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(name: &str) -> (String, String) {
        let cycle = infer_cycle_time(name);
        (cycle.extracted, cycle.seconds)
    }

    #[test]
    fn test_suffix_is_parsed() {
        assert_eq!(pair("Engine_Status_100"), ("100".into(), "0.1".into()));
        assert_eq!(pair("Brake_20"), ("20".into(), "0.02".into()));
        assert_eq!(pair("Body_1000"), ("1000".into(), "1.0".into()));
        assert_eq!(pair("Body_9999"), ("9999".into(), "9.999".into()));
        assert_eq!(pair("Lamp_005"), ("005".into(), "0.005".into()));
        assert_eq!(pair("Zero_00"), ("00".into(), "0.0".into()));
    }

    #[test]
    fn test_no_suffix() {
        assert_eq!(pair("Diag_Req"), ("None".into(), "0.0".into()));
        assert!(!infer_cycle_time("Diag_Req").is_inferred());
    }

    #[test]
    fn test_digit_run_bounds() {
        assert_eq!(pair("X_5"), ("None".into(), "0.0".into()));
        assert_eq!(pair("X_12345"), ("None".into(), "0.0".into()));
        assert_eq!(pair("X100"), ("None".into(), "0.0".into()));
    }

    #[test]
    fn test_strip_cycle_suffix() {
        assert_eq!(strip_cycle_suffix("EngineStatus_100"), Some("EngineStatus"));
        assert_eq!(strip_cycle_suffix("Msg_10_250"), Some("Msg_10"));
        assert_eq!(strip_cycle_suffix("Diag_Req"), None);
        assert_eq!(strip_cycle_suffix("X_5"), None);
    }

    #[test]
    fn test_only_trailing_suffix_counts() {
        assert_eq!(pair("Msg_100_Ext"), ("None".into(), "0.0".into()));
        assert_eq!(pair("Msg_10_250"), ("250".into(), "0.25".into()));
    }
}
