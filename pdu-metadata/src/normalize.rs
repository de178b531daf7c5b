//! Name normalization for matching PDUs against service interfaces
//!
//! Service deployments are named like `SomeIp_SI_EngineStatus` while the PDUs
//! carrying their events are named like `EngineStatus_100`. Stripping the
//! SOME/IP decorations and underscores, then case-folding, gives both sides a
//! common key.

/// Canonicalize an identifier for cross-document matching
///
/// Removes every `"SomeIp"`, then every `"_SI"`, then every underscore, and
/// lower-cases the result.
pub fn normalize(name: &str) -> String {
    name.replace("SomeIp", "")
        .replace("_SI", "")
        .replace('_', "")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_someip_decorations() {
        assert_eq!(normalize("SomeIp_SI_Foo_Bar"), "foobar");
        assert_eq!(normalize("SomeIp_SI_EngineStatus"), "enginestatus");
    }

    #[test]
    fn test_pdu_name_keeps_digits() {
        assert_eq!(normalize("EngineStatus_100"), "enginestatus100");
    }

    #[test]
    fn test_prefix_match_is_case_sensitive() {
        assert_eq!(normalize("someip_si_Door"), "someipsidoor");
        assert_eq!(normalize("SOMEIP_Door"), "someipdoor");
    }

    #[test]
    fn test_removal_order() {
        // "_SI" is removed before underscores, so a split marker survives
        assert_eq!(normalize("A_S_I"), "asi");
        assert_eq!(normalize("Some_Ip"), "someip");
        assert_eq!(normalize("SomeSomeIpIp"), "someip");
    }

    #[test]
    fn test_idempotent() {
        for name in [
            "SomeIp_SI_Foo_Bar",
            "SomeSomeIpIp",
            "X__SI_SI",
            "Engine_Status_100",
            "",
            "_SomeIp_",
        ] {
            let once = normalize(name);
            assert_eq!(normalize(&once), once, "not idempotent for {name:?}");
        }
    }
}
