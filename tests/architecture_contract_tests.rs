//! Architecture contract tests.

mod support;

use support::architecture::{find_lines_containing, find_non_export_lines_in_mod_files, path_exists};

#[test]
fn domain_has_no_framework_or_outer_layer_imports() {
    let hits = find_lines_containing(
        "src/domain",
        &[
            "crate::adapter",
            "crate::infrastructure",
            "crate::application",
            "crate::port",
            "tokio::",
            "reqwest::",
            "diesel::",
        ],
    );

    assert!(
        hits.is_empty(),
        "found forbidden imports in domain layer: {hits:#?}"
    );
}

#[test]
fn ports_depend_only_on_domain_and_errors() {
    let hits = find_lines_containing(
        "src/port",
        &[
            "crate::adapter",
            "crate::infrastructure",
            "crate::application",
            "reqwest::",
            "diesel::",
        ],
    );

    assert!(hits.is_empty(), "found outer-layer imports in ports: {hits:#?}");
}

#[test]
fn application_does_not_reach_into_adapters() {
    let hits = find_lines_containing("src/application", &["crate::adapter", "reqwest::", "diesel::"]);

    assert!(
        hits.is_empty(),
        "application services must go through ports: {hits:#?}"
    );
}

#[test]
fn only_the_sqlite_adapter_touches_diesel() {
    let hits: Vec<_> = find_lines_containing("src", &["use diesel", "diesel::"])
        .into_iter()
        .filter(|(path, _, _)| !path.starts_with("src/adapter/outbound/sqlite/"))
        .collect();

    assert!(hits.is_empty(), "diesel used outside the SQLite adapter: {hits:#?}");
}

#[test]
fn mod_rs_is_export_only() {
    let violations = find_non_export_lines_in_mod_files("src");
    assert!(
        violations.is_empty(),
        "found non-export content in mod.rs files: {violations:#?}"
    );
}

#[test]
fn migrations_ship_with_the_crate() {
    assert!(path_exists("migrations"), "embedded migrations directory is missing");
    assert!(path_exists("src/adapter/outbound/sqlite/database/schema.rs"));
}
