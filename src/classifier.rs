//! Traffic-light classification of a GTIN's registration state

use crate::models::{RegisterEntry, Status};

/// Shown for green/yellow products whose register row has no name
pub const NAME_MISSING: &str = "Name Missing";

/// Membership and upload flags derived from one snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Presence {
    pub in_register: bool,
    pub in_catalog: bool,
    pub in_all_gtins: bool,
    pub uploaded_to_catalog: bool,
    pub uploaded_to_register: bool,
}

/// Rules are checked in order and the first match wins; they overlap.
pub fn classify(p: &Presence) -> Status {
    if p.in_register && p.in_catalog && p.uploaded_to_catalog && p.uploaded_to_register {
        return Status::Green;
    }

    if p.in_register && (!p.uploaded_to_catalog || !p.uploaded_to_register) {
        return Status::Yellow;
    }

    if p.in_all_gtins && !p.in_register {
        return Status::Orange;
    }

    Status::Red
}

/// Display name for a classified GTIN
pub fn resolve_name(status: Status, entry: Option<&RegisterEntry>) -> Option<String> {
    match status {
        Status::Green | Status::Yellow => Some(
            entry
                .and_then(|e| e.name.as_deref())
                .filter(|name| !name.is_empty())
                .unwrap_or(NAME_MISSING)
                .to_string(),
        ),
        Status::Orange | Status::Red => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn presence(flags: [bool; 5]) -> Presence {
        let [in_register, in_catalog, in_all_gtins, uploaded_to_catalog, uploaded_to_register] =
            flags;
        Presence {
            in_register,
            in_catalog,
            in_all_gtins,
            uploaded_to_catalog,
            uploaded_to_register,
        }
    }

    #[rstest]
    #[case::fully_registered([true, true, true, true, true], Status::Green)]
    #[case::green_ignores_all_gtins([true, true, false, true, true], Status::Green)]
    #[case::register_flag_missing([true, true, true, true, false], Status::Yellow)]
    #[case::catalog_flag_missing([true, true, true, false, true], Status::Yellow)]
    #[case::no_flags([true, false, false, false, false], Status::Yellow)]
    #[case::flags_but_not_in_catalog([true, false, true, true, true], Status::Red)]
    #[case::only_in_all_gtins([false, true, true, false, false], Status::Orange)]
    #[case::unregistered_with_stray_flags([false, false, true, true, true], Status::Orange)]
    #[case::catalog_without_all_gtins([false, true, false, false, false], Status::Red)]
    #[case::nowhere([false, false, false, false, false], Status::Red)]
    fn test_classify(#[case] flags: [bool; 5], #[case] expected: Status) {
        assert_eq!(classify(&presence(flags)), expected);
    }

    #[test]
    fn test_green_requires_all_four_flags() {
        for bits in 0u8..32 {
            let flags: [bool; 5] = std::array::from_fn(|i| bits & (1 << i) != 0);
            let p = presence(flags);
            let all_four =
                p.in_register && p.in_catalog && p.uploaded_to_catalog && p.uploaded_to_register;
            assert_eq!(classify(&p) == Status::Green, all_four, "flags {flags:?}");
        }
    }

    #[test]
    fn test_registered_is_never_orange() {
        for bits in 0u8..32 {
            let flags: [bool; 5] = std::array::from_fn(|i| bits & (1 << i) != 0);
            let p = presence(flags);
            if p.in_register {
                assert_ne!(classify(&p), Status::Orange, "flags {flags:?}");
            }
        }
    }

    #[rstest]
    #[case(Status::Green)]
    #[case(Status::Yellow)]
    fn test_name_falls_back_when_missing(#[case] status: Status) {
        let unnamed = RegisterEntry::default();
        let empty = RegisterEntry {
            name: Some(String::new()),
            ..RegisterEntry::default()
        };

        assert_eq!(resolve_name(status, Some(&unnamed)).as_deref(), Some(NAME_MISSING));
        assert_eq!(resolve_name(status, Some(&empty)).as_deref(), Some(NAME_MISSING));
        assert_eq!(resolve_name(status, None).as_deref(), Some(NAME_MISSING));
    }

    #[rstest]
    #[case(Status::Green)]
    #[case(Status::Yellow)]
    fn test_name_uses_register_entry(#[case] status: Status) {
        let entry = RegisterEntry {
            name: Some("Acme Widget".to_string()),
            ..RegisterEntry::default()
        };

        assert_eq!(resolve_name(status, Some(&entry)).as_deref(), Some("Acme Widget"));
    }

    #[rstest]
    #[case(Status::Orange)]
    #[case(Status::Red)]
    fn test_name_hidden_for_unregistered(#[case] status: Status) {
        let entry = RegisterEntry {
            name: Some("Acme Widget".to_string()),
            ..RegisterEntry::default()
        };

        assert_eq!(resolve_name(status, Some(&entry)), None);
        assert_eq!(resolve_name(status, None), None);
    }
}
