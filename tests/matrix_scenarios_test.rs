//! End-to-end matrix scenarios through the public API.

use neo::matrix::{MatrixConfig, RenamePolicy, UngroupedPolicy, build_matrix, generate_matrix};
use neo::source::{StaticChanges, StaticListing};
use neo::{ChangeStatus, ChangedFile, InputMode};

fn file(path: &str, status: ChangeStatus) -> ChangedFile {
    ChangedFile::new(path, status)
}

fn no_listing() -> Result<Vec<String>, neo::CollaboratorError> {
    panic!("repository listing must not be requested")
}

#[test]
fn test_environments_from_changes() {
    let config = MatrixConfig::from_pattern(r"infrastructure/(?P<environment>[^/]+)").unwrap();
    let changes = vec![
        file("infrastructure/live/main.tf", ChangeStatus::Modified),
        file("infrastructure/staging/main.tf", ChangeStatus::Modified),
    ];

    let matrix = build_matrix(&config, &changes, no_listing).unwrap();

    assert_eq!(
        matrix.to_json().unwrap(),
        r#"[{"environment":"live","reason":"modified"},{"environment":"staging","reason":"modified"}]"#
    );
}

#[tokio::test]
async fn test_default_pattern_expands_to_repository() {
    let config = MatrixConfig::builder(r"infrastructure/(?P<environment>[^/]+)")
        .default_patterns(["terraform-modules/**"])
        .build()
        .unwrap();
    let provider = StaticChanges(vec![file("terraform-modules/aws.tf", ChangeStatus::Modified)]);
    let lister = StaticListing(vec![
        "README.md".to_string(),
        "infrastructure/live/a.tf".to_string(),
        "infrastructure/staging/b.tf".to_string(),
        "terraform-modules/aws.tf".to_string(),
    ]);

    let matrix = generate_matrix(&config, &provider, &lister).await.unwrap();

    assert_eq!(matrix.mode, InputMode::FullRepository);
    assert_eq!(
        matrix.to_json().unwrap(),
        r#"[{"environment":"live","reason":"unknown"},{"environment":"staging","reason":"unknown"}]"#
    );
}

#[tokio::test]
async fn test_keep_change_reasons_in_full_repository_mode() {
    let config = MatrixConfig::builder(r"infrastructure/(?P<environment>[^/]+)")
        .default_patterns(["terraform-modules/**"])
        .keep_change_reasons(true)
        .build()
        .unwrap();
    let provider = StaticChanges(vec![
        file("terraform-modules/aws.tf", ChangeStatus::Modified),
        file("infrastructure/live/a.tf", ChangeStatus::Added),
    ]);
    let lister = StaticListing(vec![
        "infrastructure/live/a.tf".to_string(),
        "infrastructure/staging/b.tf".to_string(),
    ]);

    let matrix = generate_matrix(&config, &provider, &lister).await.unwrap();

    assert_eq!(
        matrix.to_json().unwrap(),
        r#"[{"environment":"live","reason":"added"},{"environment":"staging","reason":"unknown"}]"#
    );
}

#[test]
fn test_defaults_ignored_when_something_matches() {
    let config = MatrixConfig::builder(r"(?P<module>database-us|database-fr)")
        .defaults(true)
        .build()
        .unwrap();
    let changes = vec![
        file("database-us/x.go", ChangeStatus::Deleted),
        file("database-us/y.go", ChangeStatus::Deleted),
    ];

    let matrix = build_matrix(&config, &changes, no_listing).unwrap();

    assert_eq!(matrix.mode, InputMode::ChangesOnly);
    assert_eq!(
        matrix.to_json().unwrap(),
        r#"[{"module":"database-us","reason":"deleted"}]"#
    );
}

#[test]
fn test_defaults_without_matches_runs_everything() {
    let config = MatrixConfig::builder(r"(?P<module>database-us|database-fr)")
        .defaults(true)
        .build()
        .unwrap();
    let changes = vec![file("docs/index.md", ChangeStatus::Modified)];

    let matrix = build_matrix(&config, &changes, || {
        Ok(vec![
            "database-fr/a.go".to_string(),
            "database-us/a.go".to_string(),
            "docs/index.md".to_string(),
        ])
    })
    .unwrap();

    assert_eq!(matrix.mode, InputMode::FullRepository);
    assert_eq!(
        matrix.to_json().unwrap(),
        r#"[{"module":"database-fr","reason":"unknown"},{"module":"database-us","reason":"unknown"}]"#
    );
}

#[test]
fn test_conflicting_statuses_are_ambiguous() {
    let config = MatrixConfig::from_pattern(r"lib/(?P<f>[^/]+)").unwrap();
    let changes = vec![
        file("lib/a.c", ChangeStatus::Added),
        file("lib/a.c", ChangeStatus::Modified),
    ];

    let matrix = build_matrix(&config, &changes, no_listing).unwrap();

    assert_eq!(matrix.to_json().unwrap(), r#"[{"f":"a.c","reason":"?"}]"#);
}

#[test]
fn test_no_matches_without_defaults_is_empty() {
    let config = MatrixConfig::from_pattern(r"(?P<module>database-us|database-fr)").unwrap();
    let changes = vec![file("README.md", ChangeStatus::Modified)];

    let matrix = build_matrix(&config, &changes, no_listing).unwrap();

    assert!(matrix.is_empty());
    assert_eq!(matrix.len(), 0);
    assert_eq!(matrix.to_json().unwrap(), "[]");
    assert_eq!(matrix.to_include_json().unwrap(), r#"{"include":[]}"#);
}

#[test]
fn test_output_is_deterministic() {
    let config = MatrixConfig::from_pattern(r"(?P<team>[^/]+)/(?P<service>[^/]+)/").unwrap();
    let changes = vec![
        file("payments/api/main.go", ChangeStatus::Modified),
        file("search/indexer/main.go", ChangeStatus::Added),
        file("payments/api/handler.go", ChangeStatus::Deleted),
        file("payments/worker/main.go", ChangeStatus::Added),
    ];

    let first = build_matrix(&config, &changes, no_listing).unwrap();
    let second = build_matrix(&config, &changes, no_listing).unwrap();

    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
    assert_eq!(
        first.to_json().unwrap(),
        concat!(
            r#"[{"team":"payments","service":"api","reason":"?"},"#,
            r#"{"team":"search","service":"indexer","reason":"added"},"#,
            r#"{"team":"payments","service":"worker","reason":"added"}]"#
        )
    );
}

#[test]
fn test_non_matching_paths_do_not_affect_output() {
    let config = MatrixConfig::from_pattern(r"lib/(?P<f>[^/]+)").unwrap();
    let base = vec![file("lib/a.c", ChangeStatus::Added)];
    let mut noisy = base.clone();
    noisy.push(file("docs/a.c", ChangeStatus::Deleted));
    noisy.push(file("README.md", ChangeStatus::Modified));

    let clean = build_matrix(&config, &base, no_listing).unwrap();
    let with_noise = build_matrix(&config, &noisy, no_listing).unwrap();

    assert_eq!(clean, with_noise);
}

#[test]
fn test_ungrouped_pattern_policies() {
    let changes = vec![
        file("src/lib.rs", ChangeStatus::Modified),
        file("src/main.rs", ChangeStatus::Modified),
    ];

    let global = MatrixConfig::from_pattern(r"\.rs$").unwrap();
    assert_eq!(
        build_matrix(&global, &changes, no_listing)
            .unwrap()
            .to_json()
            .unwrap(),
        r#"[{"reason":"modified"}]"#
    );

    let per_path = MatrixConfig::builder(r"\.rs$")
        .ungrouped(UngroupedPolicy::Path)
        .build()
        .unwrap();
    assert_eq!(
        build_matrix(&per_path, &changes, no_listing)
            .unwrap()
            .to_json()
            .unwrap(),
        r#"[{"path":"src/lib.rs","reason":"modified"},{"path":"src/main.rs","reason":"modified"}]"#
    );
}

#[test]
fn test_rename_policies() {
    let changes = vec![ChangedFile::renamed("pkg/old/mod.go", "pkg/new/mod.go")];
    let pattern = r"pkg/(?P<name>[^/]+)/";

    let render = |policy: RenamePolicy| {
        let config = MatrixConfig::builder(pattern)
            .rename_policy(policy)
            .build()
            .unwrap();
        build_matrix(&config, &changes, no_listing)
            .unwrap()
            .to_json()
            .unwrap()
    };

    assert_eq!(
        render(RenamePolicy::Added),
        r#"[{"name":"new","reason":"added"},{"name":"old","reason":"deleted"}]"#
    );
    assert_eq!(
        render(RenamePolicy::Renamed),
        r#"[{"name":"new","reason":"renamed"},{"name":"old","reason":"renamed"}]"#
    );
    assert_eq!(
        render(RenamePolicy::Split),
        r#"[{"name":"new","reason":"added"},{"name":"old","reason":"deleted"}]"#
    );
}

#[test]
fn test_rename_within_one_tuple() {
    let changes = vec![ChangedFile::renamed("pkg/core/a.go", "pkg/core/b.go")];
    let render = |policy: RenamePolicy| {
        let config = MatrixConfig::builder(r"pkg/(?P<name>[^/]+)/")
            .rename_policy(policy)
            .build()
            .unwrap();
        build_matrix(&config, &changes, no_listing)
            .unwrap()
            .to_json()
            .unwrap()
    };

    assert_eq!(render(RenamePolicy::Added), r#"[{"name":"core","reason":"added"}]"#);
    assert_eq!(render(RenamePolicy::Renamed), r#"[{"name":"core","reason":"renamed"}]"#);
    assert_eq!(render(RenamePolicy::Split), r#"[{"name":"core","reason":"?"}]"#);
}

#[test]
fn test_rename_out_of_pattern_contributes_nothing() {
    let changes = vec![ChangedFile::renamed("services/api/x.go", "archive/x.go")];

    let config = MatrixConfig::from_pattern(r"services/(?P<service>[^/]+)/").unwrap();
    let matrix = build_matrix(&config, &changes, no_listing).unwrap();
    assert_eq!(matrix.mode, InputMode::ChangesOnly);
    assert_eq!(matrix.to_json().unwrap(), "[]");

    let split = MatrixConfig::builder(r"services/(?P<service>[^/]+)/")
        .rename_policy(RenamePolicy::Split)
        .build()
        .unwrap();
    assert_eq!(
        build_matrix(&split, &changes, no_listing)
            .unwrap()
            .to_json()
            .unwrap(),
        r#"[{"service":"api","reason":"deleted"}]"#
    );
}

#[test]
fn test_rename_out_of_pattern_with_defaults_runs_everything() {
    let config = MatrixConfig::builder(r"services/(?P<service>[^/]+)/")
        .defaults(true)
        .build()
        .unwrap();
    let changes = vec![ChangedFile::renamed("services/api/x.go", "archive/x.go")];

    let matrix = build_matrix(&config, &changes, || {
        Ok(vec![
            "archive/x.go".to_string(),
            "services/web/main.go".to_string(),
        ])
    })
    .unwrap();

    assert_eq!(matrix.mode, InputMode::FullRepository);
    assert_eq!(
        matrix.to_json().unwrap(),
        r#"[{"service":"web","reason":"unknown"}]"#
    );
}

#[test]
fn test_reserved_group_name_is_rejected() {
    let err = MatrixConfig::from_pattern(r"(?P<reason>[^/]+)/").unwrap_err();
    assert!(err.to_string().contains("reserved"));
}
