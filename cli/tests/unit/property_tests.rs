//! Property-based tests for name validation, remote quoting, and listing filtering.

use asyd_cli::domain::filter_listing;
use asyd_cli::domain::listing::managed_records;
use asyd_cli::domain::project::validate_project_name;
use asyd_cli::infra::command::escape_remote_arg;
use proptest::prelude::*;

proptest! {
    #[test]
    fn plain_names_are_accepted(name in "[A-Za-z0-9_][A-Za-z0-9_-]{0,40}") {
        prop_assert!(validate_project_name(&name).is_ok());
    }

    #[test]
    fn names_with_separators_are_rejected(
        head in "[a-z]{0,8}",
        sep in prop::sample::select(vec!["/", "\\", ".."]),
        tail in "[a-z]{0,8}",
    ) {
        let name = format!("{head}{sep}{tail}");
        prop_assert!(validate_project_name(&name).is_err());
    }

    #[test]
    fn overlong_names_are_rejected(name in "[a-z]{65,80}") {
        prop_assert!(validate_project_name(&name).is_err());
    }

    #[test]
    fn filter_never_panics_and_keeps_header(raw in "\\PC{0,200}(\n\\PC{0,80}){0,8}") {
        let out = filter_listing(&raw);
        prop_assert!(out.ends_with('\n'));
        let header = raw.trim_end_matches('\n').split('\n').next().unwrap_or_default();
        prop_assert!(out.starts_with(header));
    }

    #[test]
    fn surviving_records_are_loaded_and_namespaced(
        rows in prop::collection::vec(
            ("(asyd-)?[a-z]{1,10}\\.service", prop::sample::select(vec!["loaded", "not-found", "masked"])),
            0..10,
        ),
    ) {
        let mut raw = String::from("UNIT LOAD ACTIVE SUB DESCRIPTION\n");
        for (name, load) in &rows {
            raw.push_str(&format!("  {name} {load} active running x\n"));
        }
        raw.push_str("\nN loaded units listed.\n");

        let records = managed_records(&raw);
        let expected = rows
            .iter()
            .filter(|(n, l)| n.starts_with("asyd-") && *l == "loaded")
            .count();
        prop_assert_eq!(records.len(), expected);
        for r in records {
            prop_assert_eq!(r.load_state.as_str(), "loaded");
            prop_assert_eq!(format!("asyd-{}", r.display_name), r.namespaced_name);
        }
    }

    #[test]
    fn safe_remote_args_are_left_unquoted(arg in "[A-Za-z0-9_./-]{1,30}") {
        let escaped = escape_remote_arg(&arg);
        prop_assert_eq!(escaped.as_ref(), arg.as_str());
    }

    #[test]
    fn unsafe_remote_args_are_quoted(arg in "[a-z]{0,5}[ ;$&|][a-z]{0,5}") {
        prop_assert!(escape_remote_arg(&arg).starts_with('\''));
    }
}
