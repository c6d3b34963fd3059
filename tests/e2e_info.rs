//! End-to-end tests for the commands backed by the JSON API

mod helper;

use serde_json::json;

use helper::{FakeIndex, Release, run_qypi};

async fn foobar_index() -> FakeIndex {
    let mut index = FakeIndex::start().await;
    index
        .project(
            "foobar",
            &[
                Release::new("1.0.0").uploaded("2019-01-01T00:00:00Z"),
                Release::new("2.0.0a1").uploaded("2019-03-01T00:00:00Z"),
                Release::new("1.2.3")
                    .uploaded("2019-02-01T09:17:59.172284Z")
                    .info(json!({
                        "summary": "Foo all your bars",
                        "author": "Jane Doe",
                        "author_email": "jane@example.com",
                        "maintainer": "",
                        "maintainer_email": "UNKNOWN",
                        "home_page": "",
                        "license": "MIT",
                        "description": "foobar readme",
                        "downloads": {"last_day": -1, "last_month": -1, "last_week": -1},
                        "_pypi_ordering": 2,
                    })),
            ],
        )
        .await;
    index.missing("does-not-exist").await;
    index
}

#[tokio::test]
async fn info_shows_highest_stable_release() {
    let index = foobar_index().await;

    let output = run_qypi(&index.index_url(), &["info", "foobar"]).await;

    assert_eq!(output.code, 0, "{}", output.stderr);
    assert_eq!(
        output.stdout,
        concat!(
            "{\n",
            "    \"license\": \"MIT\",\n",
            "    \"name\": \"foobar\",\n",
            "    \"people\": [\n",
            "        {\n",
            "            \"email\": \"jane@example.com\",\n",
            "            \"name\": \"Jane Doe\",\n",
            "            \"role\": \"author\"\n",
            "        }\n",
            "    ],\n",
            "    \"release_date\": \"2019-02-01T09:17:59.172284+00:00\",\n",
            "    \"release_url\": \"https://pypi.org/project/foobar/1.2.3/\",\n",
            "    \"summary\": \"Foo all your bars\",\n",
            "    \"url\": null,\n",
            "    \"version\": \"1.2.3\",\n",
            "    \"yanked\": false\n",
            "}\n",
        )
    );
}

#[tokio::test]
async fn info_includes_description_and_downloads_on_request() {
    let index = foobar_index().await;

    let output = run_qypi(
        &index.index_url(),
        &["info", "--description", "--trust-downloads", "foobar"],
    )
    .await;

    assert_eq!(output.code, 0, "{}", output.stderr);
    let info = output.json();
    assert_eq!(info["description"], json!("foobar readme"));
    assert_eq!(info["downloads"]["last_week"], json!(-1));
}

#[tokio::test]
async fn info_pre_selects_prerelease() {
    let index = foobar_index().await;

    let output = run_qypi(&index.index_url(), &["info", "--pre", "foobar"]).await;

    assert_eq!(output.code, 0, "{}", output.stderr);
    assert_eq!(output.json()["version"], json!("2.0.0a1"));
}

#[tokio::test]
async fn info_pinned_version() {
    let index = foobar_index().await;

    let output = run_qypi(&index.index_url(), &["info", "foobar==1.0.0"]).await;

    assert_eq!(output.code, 0, "{}", output.stderr);
    let info = output.json();
    assert_eq!(info["version"], json!("1.0.0"));
    assert_eq!(info["people"], json!([]));
    assert_eq!(info["release_date"], json!("2019-01-01T00:00:00+00:00"));
}

#[tokio::test]
async fn info_prerelease_only_match_is_selected_automatically() {
    let index = foobar_index().await;

    let output = run_qypi(&index.index_url(), &["info", "foobar>1.5"]).await;

    assert_eq!(output.code, 0, "{}", output.stderr);
    assert_eq!(output.json()["version"], json!("2.0.0a1"));
}

#[tokio::test]
async fn info_no_pre_suggests_pre() {
    let index = foobar_index().await;

    let output = run_qypi(&index.index_url(), &["info", "--no-pre", "foobar>1.5"]).await;

    assert_eq!(output.code, 2);
    assert_eq!(output.stdout, "");
    assert!(
        output
            .stderr
            .starts_with("Error: foobar: no matching versions found\nHint: "),
        "{}",
        output.stderr
    );
}

#[tokio::test]
async fn info_nonexistent_version() {
    let index = foobar_index().await;

    let output = run_qypi(&index.index_url(), &["info", "foobar==2.23.42"]).await;

    assert_eq!(output.code, 2);
    assert_eq!(output.stdout, "");
    assert_eq!(output.stderr, "Error: foobar: version 2.23.42 not found\n");
}

#[tokio::test]
async fn info_nonexistent_project() {
    let index = foobar_index().await;

    let output = run_qypi(&index.index_url(), &["info", "does-not-exist"]).await;

    assert_eq!(output.code, 2);
    assert_eq!(output.stderr, "Error: does-not-exist: project not found\n");

    let output = run_qypi(&index.index_url(), &["info", "does-not-exist==1.0"]).await;

    assert_eq!(output.stderr, "Error: does-not-exist: project not found\n");
}

#[tokio::test]
async fn info_reports_project_name_as_typed() {
    let mut index = FakeIndex::start().await;
    index.missing("Foo_Bar").await;

    let output = run_qypi(&index.index_url(), &["info", "Foo_Bar"]).await;

    assert_eq!(output.code, 2);
    assert_eq!(output.stderr, "Error: Foo_Bar: project not found\n");
}

#[tokio::test]
async fn info_transport_failure_exits_with_one() {
    let index = foobar_index().await;

    // Nothing is mounted for this project, so the server answers 501
    let output = run_qypi(&index.index_url(), &["info", "unmounted"]).await;

    assert_eq!(output.code, 1);
    assert!(
        output.stderr.starts_with("Error: Index returned status 501"),
        "{}",
        output.stderr
    );
}

#[tokio::test]
async fn info_all_versions_ascending() {
    let index = foobar_index().await;

    let output = run_qypi(&index.index_url(), &["info", "-A", "foobar"]).await;

    assert_eq!(output.code, 0, "{}", output.stderr);
    let versions: Vec<String> = output
        .json()
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["version"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(versions, vec!["1.0.0", "1.2.3"]);
}

#[tokio::test]
async fn info_newest_and_yanked() {
    let mut index = FakeIndex::start().await;
    index
        .project(
            "timey",
            &[
                Release::new("1.5.0").uploaded("2021-06-01T00:00:00Z"),
                Release::new("1.6.0").yanked().uploaded("2022-01-01T00:00:00Z"),
                Release::new("2.0.0").uploaded("2020-01-01T00:00:00Z"),
            ],
        )
        .await;
    let url = index.index_url();

    let highest = run_qypi(&url, &["info", "timey"]).await;
    let newest = run_qypi(&url, &["info", "--newest", "timey"]).await;
    let newest_yanked = run_qypi(&url, &["info", "--newest", "--yanked", "timey"]).await;

    assert_eq!(highest.json()["version"], json!("2.0.0"));
    assert_eq!(newest.json()["version"], json!("1.5.0"));
    assert_eq!(newest_yanked.json()["version"], json!("1.6.0"));
}

#[tokio::test]
async fn info_skips_yanked_even_when_pinned() {
    let mut index = FakeIndex::start().await;
    index
        .project(
            "yankee",
            &[Release::new("1.0.0"), Release::new("1.1.0").yanked()],
        )
        .await;
    let url = index.index_url();

    let latest = run_qypi(&url, &["info", "yankee"]).await;
    let pinned = run_qypi(&url, &["info", "yankee==1.1.0"]).await;
    let pinned_yanked = run_qypi(&url, &["info", "--yanked", "yankee==1.1.0"]).await;

    assert_eq!(latest.json()["version"], json!("1.0.0"));
    assert_eq!(pinned.code, 2);
    assert_eq!(pinned.stdout, "");
    assert_eq!(pinned.stderr, "Error: yankee: no matching versions found\n");
    assert_eq!(pinned_yanked.code, 0, "{}", pinned_yanked.stderr);
    assert_eq!(pinned_yanked.json()["version"], json!("1.1.0"));
    assert_eq!(pinned_yanked.json()["yanked"], json!(true));
}

#[tokio::test]
async fn info_pinned_version_keeps_index_spelling() {
    let mut index = FakeIndex::start().await;
    index
        .project(
            "calver",
            &[Release::new("2001.01.01"), Release::new("2000.12.31")],
        )
        .await;

    let output = run_qypi(&index.index_url(), &["info", "calver==2001.1.1"]).await;

    assert_eq!(output.code, 0, "{}", output.stderr);
    assert_eq!(output.json()["version"], json!("2001.01.01"));
}

#[tokio::test]
async fn readme_prints_description() {
    let index = foobar_index().await;

    let output = run_qypi(&index.index_url(), &["readme", "foobar"]).await;
    let missing = run_qypi(&index.index_url(), &["readme", "foobar==1.0.0"]).await;

    assert_eq!(output.stdout, "foobar readme\n");
    assert_eq!(missing.stdout, "--- no description ---\n");
}

#[tokio::test]
async fn releases_lists_every_version_ascending() {
    let index = foobar_index().await;

    let output = run_qypi(&index.index_url(), &["releases", "foobar"]).await;

    assert_eq!(output.code, 0, "{}", output.stderr);
    assert_eq!(
        output.json(),
        json!([
            {
                "version": "1.0.0",
                "is_prerelease": false,
                "is_yanked": false,
                "release_date": "2019-01-01T00:00:00+00:00",
                "release_url": "https://pypi.org/project/foobar/1.0.0/",
            },
            {
                "version": "1.2.3",
                "is_prerelease": false,
                "is_yanked": false,
                "release_date": "2019-02-01T09:17:59.172284+00:00",
                "release_url": "https://pypi.org/project/foobar/1.2.3/",
            },
            {
                "version": "2.0.0a1",
                "is_prerelease": true,
                "is_yanked": false,
                "release_date": "2019-03-01T00:00:00+00:00",
                "release_url": "https://pypi.org/project/foobar/2.0.0a1/",
            },
        ])
    );
}

#[tokio::test]
async fn files_hide_storage_path_and_downloads() {
    let index = foobar_index().await;

    let output = run_qypi(&index.index_url(), &["files", "foobar"]).await;
    let trusted = run_qypi(&index.index_url(), &["files", "--trust-downloads", "foobar"]).await;

    assert_eq!(output.code, 0, "{}", output.stderr);
    assert_eq!(
        output.json(),
        json!([{
            "filename": "foobar-1.2.3.tar.gz",
            "packagetype": "sdist",
            "python_version": "source",
            "size": 1024,
            "url": "https://files.example.com/foobar-1.2.3.tar.gz",
            "upload_time_iso_8601": "2019-02-01T09:17:59.172284Z",
        }])
    );
    assert_eq!(trusted.json()[0]["downloads"], json!(-1));
}

#[tokio::test]
async fn files_all_versions_keyed_by_version() {
    let index = foobar_index().await;

    let output = run_qypi(&index.index_url(), &["files", "-A", "--pre", "foobar"]).await;

    assert_eq!(output.code, 0, "{}", output.stderr);
    let by_version = output.json();
    let keys: Vec<&String> = by_version.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["1.0.0", "1.2.3", "2.0.0a1"]);
    assert_eq!(by_version["1.0.0"][0]["filename"], json!("foobar-1.0.0.tar.gz"));
}
