//! Upload endpoint behavior, driven in-process through the router.

use std::path::Path;

use axum::http::StatusCode;
use folder_upload::upload::NamingScheme;

mod common;

use common::{entries, send_json, upload_request, MultipartBody, TestServer};

#[tokio::test]
async fn test_zero_files_is_rejected_without_side_effects() {
    let ts = TestServer::new();

    let (status, json) = send_json(
        ts.router(),
        upload_request(MultipartBody::new().text("folderName", "Acme")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json,
        serde_json::json!({ "success": false, "message": "No files uploaded" })
    );
    assert!(entries(ts.root()).is_empty(), "no directory should be created");
}

#[tokio::test]
async fn test_folder_upload_sanitizes_name() {
    let ts = TestServer::new();

    let body = MultipartBody::new()
        .text("folderName", "Acme Corp!")
        .file("files", "a.txt", b"alpha")
        .file("files", "b.txt", b"bravo");
    let (status, json) = send_json(ts.router(), upload_request(body)).await;

    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Files uploaded successfully");
    assert_eq!(json["folder"], "Acme Corp!");
    assert_eq!(json["folderName"]["raw"], "Acme Corp!");
    assert_eq!(json["folderName"]["safe"], "Acme_Corp_");
    assert_eq!(json["count"], 2);
    assert_eq!(json["folderUrl"], "/uploads/Acme_Corp_");

    let dest = ts.root().join("Acme_Corp_");
    assert_eq!(json["folderPath"], dest.display().to_string());
    assert!(Path::new(json["folderPath"].as_str().unwrap()).is_absolute());

    let files = json["files"].as_array().unwrap();
    assert_eq!(files.len(), 2);
    for file in files {
        assert_eq!(file["savedAs"], file["originalName"]);
    }
    assert_eq!(files[0]["path"], dest.join("a.txt").display().to_string());

    assert_eq!(std::fs::read(dest.join("a.txt")).unwrap(), b"alpha");
    assert_eq!(std::fs::read(dest.join("b.txt")).unwrap(), b"bravo");
    assert_eq!(entries(&dest), vec!["a.txt", "b.txt"]);
}

#[tokio::test]
async fn test_missing_folder_name_uses_default() {
    let ts = TestServer::new();

    let body = MultipartBody::new()
        .text("folderName", "   ")
        .file("files", "a.txt", b"x");
    let (status, json) = send_json(ts.router(), upload_request(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["folder"], "default");
    assert_eq!(json["folderName"]["safe"], "default");
    assert!(ts.root().join("default").join("a.txt").is_file());
}

#[tokio::test]
async fn test_same_name_overwrites() {
    let ts = TestServer::new();

    for content in [&b"first version, longer"[..], &b"second"[..]] {
        let body = MultipartBody::new()
            .text("folderName", "docs")
            .file("files", "report.txt", content);
        let (status, _) = send_json(ts.router(), upload_request(body)).await;
        assert_eq!(status, StatusCode::OK);
    }

    let dest = ts.root().join("docs");
    assert_eq!(std::fs::read(dest.join("report.txt")).unwrap(), b"second");
    assert_eq!(entries(&dest), vec!["report.txt"]);
}

#[tokio::test]
async fn test_hierarchical_upload() {
    let ts = TestServer::with_config(|config| {
        config.storage.naming_scheme = NamingScheme::Hierarchical;
    });

    let body = MultipartBody::new()
        .text("companyName", "Sys")
        .text("projectName", "P1")
        .text("titleName", "lcc-001")
        .file("files", "report.pdf", b"%PDF-1.4 fake");
    let (status, json) = send_json(ts.router(), upload_request(body)).await;

    assert_eq!(status, StatusCode::OK, "{json}");
    assert!(json.get("folder").is_none());
    assert_eq!(json["companyName"], serde_json::json!({ "raw": "Sys", "safe": "Sys" }));
    assert_eq!(json["projectName"]["safe"], "P1");
    assert_eq!(json["titleName"]["safe"], "lcc-001");
    assert!(json["folderPath"].as_str().unwrap().ends_with("Sys/P1/lcc-001"));
    assert_eq!(json["folderUrl"], "/uploads/Sys/P1/lcc-001");
    assert_eq!(json["count"], 1);

    let stored = ts.root().join("Sys").join("P1").join("lcc-001").join("report.pdf");
    assert_eq!(std::fs::read(stored).unwrap(), b"%PDF-1.4 fake");
}

#[tokio::test]
async fn test_hierarchical_defaults() {
    let ts = TestServer::with_config(|config| {
        config.storage.naming_scheme = NamingScheme::Hierarchical;
    });

    let body = MultipartBody::new()
        .text("projectName", "../../etc")
        .file("files", "a.txt", b"x");
    let (status, json) = send_json(ts.router(), upload_request(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["companyName"]["raw"], "company_default");
    assert_eq!(json["projectName"]["safe"], "______etc");
    assert_eq!(json["titleName"]["raw"], "title_default");
    assert!(ts
        .root()
        .join("company_default/______etc/title_default/a.txt")
        .is_file());
}

#[tokio::test]
async fn test_concurrent_uploads_to_same_folder() {
    let ts = TestServer::new();

    let request = |name: &str| {
        upload_request(
            MultipartBody::new()
                .text("folderName", "shared")
                .file("files", name, name.as_bytes()),
        )
    };

    let ((s1, _), (s2, _)) = tokio::join!(
        send_json(ts.router(), request("one.txt")),
        send_json(ts.router(), request("two.txt")),
    );

    assert_eq!(s1, StatusCode::OK);
    assert_eq!(s2, StatusCode::OK);
    assert_eq!(entries(&ts.root().join("shared")), vec!["one.txt", "two.txt"]);
}

#[tokio::test]
async fn test_file_name_directories_are_stripped() {
    let ts = TestServer::new();

    let body = MultipartBody::new()
        .text("folderName", "safe")
        .file("files", "../../evil.txt", b"nope");
    let (status, json) = send_json(ts.router(), upload_request(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["files"][0]["originalName"], "../../evil.txt");
    assert_eq!(json["files"][0]["savedAs"], "evil.txt");
    assert!(ts.root().join("safe").join("evil.txt").is_file());
    assert!(!ts.dir.path().join("evil.txt").exists());
}

#[tokio::test]
async fn test_unusable_file_name_is_rejected() {
    let ts = TestServer::new();

    let body = MultipartBody::new().file("files", "..", b"x");
    let (status, json) = send_json(ts.router(), upload_request(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Invalid file name '..'");
    assert!(entries(ts.root()).is_empty());
}

#[tokio::test]
async fn test_too_many_files_reports_stored() {
    let ts = TestServer::with_config(|config| config.limits.max_files = 2);

    let body = MultipartBody::new()
        .file("files", "1.txt", b"1")
        .file("files", "2.txt", b"2")
        .file("files", "3.txt", b"3");
    let (status, json) = send_json(ts.router(), upload_request(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Too many files (maximum is 2)");
    assert_eq!(json["count"], 2);
    assert_eq!(json["files"][1]["savedAs"], "2.txt");
    assert_eq!(entries(&ts.root().join("default")), vec!["1.txt", "2.txt"]);
}

#[tokio::test]
async fn test_unexpected_file_field() {
    let ts = TestServer::new();

    let body = MultipartBody::new().file("attachment", "a.txt", b"x");
    let (status, json) = send_json(ts.router(), upload_request(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Unexpected file field 'attachment'");
    assert!(entries(ts.root()).is_empty());
}

#[tokio::test]
async fn test_file_size_limit() {
    let ts = TestServer::with_config(|config| config.limits.max_file_size = Some(4));

    let body = MultipartBody::new()
        .file("files", "ok.txt", b"1234")
        .file("files", "big.txt", b"0123456789");
    let (status, json) = send_json(ts.router(), upload_request(body)).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json["count"], 1);
    assert_eq!(json["files"][0]["savedAs"], "ok.txt");
    // The oversized part leaves neither a final file nor a temp file behind.
    assert_eq!(entries(&ts.root().join("default")), vec!["ok.txt"]);
}

#[tokio::test]
async fn test_late_naming_field_is_ignored() {
    let ts = TestServer::new();

    let body = MultipartBody::new()
        .file("files", "a.txt", b"x")
        .text("folderName", "late");
    let (status, json) = send_json(ts.router(), upload_request(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["folder"], "default");
    assert!(!ts.root().join("late").exists());
}

#[tokio::test]
async fn test_non_multipart_request_is_client_error() {
    let ts = TestServer::new();

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/upload")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{}"))
        .unwrap();
    let (status, json) = send_json(ts.router(), request).await;

    assert!(status.is_client_error());
    assert_eq!(json["success"], false);
    assert!(entries(ts.root()).is_empty());
}

#[tokio::test]
async fn test_truncated_body_leaves_no_partial_file() {
    let ts = TestServer::new();

    let mut bytes = MultipartBody::new()
        .text("folderName", "cut")
        .file("files", "a.txt", b"complete")
        .file("files", "b.txt", &[7u8; 4096])
        .build();
    // Drop the closing boundary and the tail of the second part.
    bytes.truncate(bytes.len() - 2048);

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", common::BOUNDARY),
        )
        .body(axum::body::Body::from(bytes))
        .unwrap();
    let (status, json) = send_json(ts.router(), request).await;

    assert!(status.is_client_error(), "{status}");
    assert_eq!(json["count"], 1);
    assert_eq!(entries(&ts.root().join("cut")), vec!["a.txt"]);
}

#[tokio::test]
async fn test_empty_file_input_is_skipped() {
    let ts = TestServer::new();

    let body = MultipartBody::new()
        .text("folderName", "mix")
        .file("files", "real.txt", b"real")
        .file("files", "", b"");
    let (status, json) = send_json(ts.router(), upload_request(body)).await;

    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["count"], 1);
    assert_eq!(json["files"][0]["savedAs"], "real.txt");
    assert_eq!(entries(&ts.root().join("mix")), vec!["real.txt"]);
}

#[tokio::test]
async fn test_only_empty_file_input_counts_as_no_files() {
    let ts = TestServer::new();

    let body = MultipartBody::new()
        .text("folderName", "mix")
        .file("files", "", b"");
    let (status, json) = send_json(ts.router(), upload_request(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json,
        serde_json::json!({ "success": false, "message": "No files uploaded" })
    );
    assert!(entries(ts.root()).is_empty());
}

#[tokio::test]
async fn test_overlong_file_name_is_rejected() {
    let ts = TestServer::new();
    let name = format!("{}.txt", "a".repeat(252));

    let body = MultipartBody::new().file("files", &name, b"x");
    let (status, json) = send_json(ts.router(), upload_request(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], format!("Invalid file name '{name}'"));
    assert!(entries(ts.root()).is_empty());
}

#[tokio::test]
async fn test_unwritable_destination_is_server_error() {
    let ts = TestServer::new();
    std::fs::write(ts.root().join("blocked"), b"a file, not a folder").unwrap();

    let body = MultipartBody::new()
        .text("folderName", "blocked")
        .file("files", "a.txt", b"x");
    let (status, json) = send_json(ts.router(), upload_request(body)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json,
        serde_json::json!({ "success": false, "message": "Failed to create upload directory" })
    );
    assert_eq!(entries(ts.root()), vec!["blocked"]);
}

#[tokio::test]
async fn test_storage_failure_stops_and_reports_stored() {
    let ts = TestServer::new();
    // A directory where the second file should land makes its rename fail.
    std::fs::create_dir_all(ts.root().join("docs").join("b.txt")).unwrap();

    let body = MultipartBody::new()
        .text("folderName", "docs")
        .file("files", "a.txt", b"alpha")
        .file("files", "b.txt", b"bravo")
        .file("files", "c.txt", b"charlie");
    let (status, json) = send_json(ts.router(), upload_request(body)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Failed to store file 'b.txt'");
    assert_eq!(json["count"], 1);
    assert_eq!(json["files"][0]["savedAs"], "a.txt");

    let dest = ts.root().join("docs");
    assert_eq!(std::fs::read(dest.join("a.txt")).unwrap(), b"alpha");
    assert!(dest.join("b.txt").is_dir());
    // Nothing after the failure, and no temp file left behind.
    assert_eq!(entries(&dest), vec!["a.txt", "b.txt"]);
}
