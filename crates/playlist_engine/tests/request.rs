use playlist_engine::{FailureKind, IngestRequest};

#[test]
fn valid_url_and_credential_build_request() {
    let request = IngestRequest::from_input(
        "https://www.youtube.com/watch?v=abc&list=PL123",
        Some(" secret "),
    )
    .unwrap();

    assert_eq!(request.playlist_id, "PL123");
    assert_eq!(request.credential, "secret");
}

#[test]
fn missing_credential_is_reported_before_url() {
    let err = IngestRequest::from_input("not a url", None).unwrap_err();
    assert_eq!(err.kind, FailureKind::MissingCredential);
    assert_eq!(err.user_message(), "Please configure your YouTube API key first");

    let err = IngestRequest::from_input("https://x/watch?list=PL1", Some("  ")).unwrap_err();
    assert_eq!(err.kind, FailureKind::MissingCredential);
}

#[test]
fn url_without_list_is_invalid() {
    let err = IngestRequest::from_input("https://x/watch?v=abc", Some("secret")).unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
    assert_eq!(err.user_message(), "Invalid playlist URL");
}
