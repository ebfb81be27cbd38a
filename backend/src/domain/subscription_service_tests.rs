//! Tests for the waitlist subscription service.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{FixtureMailingListProvider, MockMailingListProvider};
use crate::domain::{RawSignup, Role, SUCCESS_MESSAGE, validate};
use mockall::Sequence;
use rstest::{fixture, rstest};

#[fixture]
fn credentials() -> ProviderCredentials {
    ProviderCredentials::new(Some("0123456789abcdef-us21"), Some("list123"))
        .expect("fixture credentials are valid")
}

fn signup(email: &str, role: Option<&str>) -> SignupRequest {
    validate(RawSignup {
        email: Some(email.to_owned()),
        role: role.map(str::to_owned).into(),
        source: None,
    })
    .expect("fixture signup is valid")
}

fn make_service(
    provider: MockMailingListProvider,
    credentials: Result<ProviderCredentials, CredentialsError>,
) -> WaitlistSubscriptionService<MockMailingListProvider> {
    WaitlistSubscriptionService::new(Arc::new(provider), credentials)
}

fn expect_failure(outcome: SubscriptionOutcome) -> SubscriptionFailure {
    match outcome {
        SubscriptionOutcome::Failure(failure) => failure,
        SubscriptionOutcome::Success { .. } => panic!("expected a failure outcome"),
    }
}

#[rstest]
#[tokio::test]
async fn runs_all_stages_in_order(credentials: ProviderCredentials) {
    let mut provider = MockMailingListProvider::new();
    let mut seq = Sequence::new();
    let expected_hash = MemberHash::from_email("a@b.com");
    let upsert_hash = expected_hash.clone();
    let tag_hash = expected_hash.clone();

    provider
        .expect_probe_audience()
        .withf(|creds| creds.audience_id() == "list123")
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    provider
        .expect_upsert_member()
        .withf(move |_, member, upsert| {
            member.as_str() == upsert_hash.as_str()
                && upsert.email_address == "A@b.com"
                && upsert.role == Role::Teacher
                && upsert.source == "landing-v1"
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(()));
    provider
        .expect_tag_member()
        .withf(move |_, member, tag| member.as_str() == tag_hash.as_str() && tag.name == "waitlist-teacher")
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(()));

    let service = make_service(provider, Ok(credentials));
    let outcome = service.subscribe(signup("A@b.com", Some("teacher"))).await;

    assert_eq!(
        outcome,
        SubscriptionOutcome::Success {
            message: SUCCESS_MESSAGE.to_owned()
        }
    );
}

#[rstest]
#[tokio::test]
async fn omitted_role_is_tagged_as_student(credentials: ProviderCredentials) {
    let mut provider = MockMailingListProvider::new();
    provider.expect_probe_audience().returning(|_| Ok(()));
    provider.expect_upsert_member().returning(|_, _, _| Ok(()));
    provider
        .expect_tag_member()
        .withf(|_, _, tag| tag.name == "waitlist-student")
        .times(1)
        .returning(|_, _, _| Ok(()));

    let service = make_service(provider, Ok(credentials));
    assert!(service.subscribe(signup("a@b.com", None)).await.is_success());
}

#[rstest]
#[case::missing_key(CredentialsError::MissingApiKey)]
#[case::missing_list(CredentialsError::MissingAudienceId)]
#[case::missing_suffix(CredentialsError::MissingDatacenter)]
#[tokio::test]
async fn config_errors_short_circuit_before_network(#[case] cause: CredentialsError) {
    let mut provider = MockMailingListProvider::new();
    provider.expect_probe_audience().times(0);
    provider.expect_upsert_member().times(0);
    provider.expect_tag_member().times(0);

    let service = make_service(provider, Err(cause));
    let failure = expect_failure(service.subscribe(signup("a@b.com", None)).await);

    assert_eq!(failure, SubscriptionFailure::config());
    assert!(failure.detail().is_none(), "config detail stays server-side");
}

#[rstest]
#[tokio::test]
async fn audience_probe_failure_skips_upsert_and_tag(credentials: ProviderCredentials) {
    let mut provider = MockMailingListProvider::new();
    provider.expect_probe_audience().times(1).returning(|_| {
        Err(MailingListProviderError::status(
            404_u16,
            r#"{"title":"Resource Not Found","detail":"The requested resource could not be found."}"#,
        ))
    });
    provider.expect_upsert_member().times(0);
    provider.expect_tag_member().times(0);

    let service = make_service(provider, Ok(credentials));
    let failure = expect_failure(service.subscribe(signup("a@b.com", None)).await);

    assert_eq!(failure.stage(), FailureStage::AudienceLookup);
    assert_eq!(failure.http_status(), Some(404));
    assert_eq!(
        failure.detail(),
        Some("The requested resource could not be found.")
    );
}

#[rstest]
#[tokio::test]
async fn upsert_failure_skips_tag(credentials: ProviderCredentials) {
    let mut provider = MockMailingListProvider::new();
    provider.expect_probe_audience().times(1).returning(|_| Ok(()));
    provider
        .expect_upsert_member()
        .times(1)
        .returning(|_, _, _| Err(MailingListProviderError::status(400_u16, "x".repeat(1_000))));
    provider.expect_tag_member().times(0);

    let service = make_service(provider, Ok(credentials));
    let failure = expect_failure(service.subscribe(signup("a@b.com", None)).await);

    assert_eq!(failure.stage(), FailureStage::Upsert);
    assert_eq!(failure.http_status(), Some(400));
    assert_eq!(failure.detail().map(str::len), Some(300));
}

#[rstest]
#[tokio::test]
async fn tag_failure_is_reported_after_member_upsert(credentials: ProviderCredentials) {
    let mut provider = MockMailingListProvider::new();
    provider.expect_probe_audience().times(1).returning(|_| Ok(()));
    provider.expect_upsert_member().times(1).returning(|_, _, _| Ok(()));
    provider
        .expect_tag_member()
        .times(1)
        .returning(|_, _, _| Err(MailingListProviderError::status(500_u16, "")));

    let service = make_service(provider, Ok(credentials));
    let failure = expect_failure(service.subscribe(signup("a@b.com", None)).await);

    assert_eq!(failure.stage(), FailureStage::Tag);
    assert_eq!(failure.http_status(), Some(500));
    assert_eq!(failure.detail(), None);
}

#[rstest]
#[tokio::test]
async fn repeated_signups_upsert_the_same_member(credentials: ProviderCredentials) {
    let expected = MemberHash::from_email("yogi@example.com");
    let mut provider = MockMailingListProvider::new();
    provider.expect_probe_audience().times(2).returning(|_| Ok(()));
    provider
        .expect_upsert_member()
        .withf(move |_, member, _| member.as_str() == expected.as_str())
        .times(2)
        .returning(|_, _, _| Ok(()));
    provider
        .expect_tag_member()
        .times(2)
        .returning(|_, _, _| Err(MailingListProviderError::transport("reset")));

    let service = make_service(provider, Ok(credentials));
    for email in ["yogi@example.com", "Yogi@Example.com"] {
        let failure = expect_failure(service.subscribe(signup(email, None)).await);
        assert_eq!(failure.stage(), FailureStage::Tag);
    }
}

#[rstest]
#[case::timeout(MailingListProviderError::timeout("deadline elapsed"), "deadline elapsed")]
#[case::transport(MailingListProviderError::transport("connection refused"), "connection refused")]
#[case::invalid(MailingListProviderError::invalid_request("bad url"), "bad url")]
#[tokio::test]
async fn transport_faults_become_statusless_failures(
    credentials: ProviderCredentials,
    #[case] cause: MailingListProviderError,
    #[case] expected_detail: &str,
) {
    let mut provider = MockMailingListProvider::new();
    provider
        .expect_probe_audience()
        .times(1)
        .return_once(move |_| Err(cause));

    let service = make_service(provider, Ok(credentials));
    let failure = expect_failure(service.subscribe(signup("a@b.com", None)).await);

    assert_eq!(failure.stage(), FailureStage::AudienceLookup);
    assert_eq!(failure.http_status(), None);
    assert_eq!(failure.detail(), Some(expected_detail));
}

#[rstest]
#[tokio::test]
async fn subscribe_with_accepts_borrowed_credentials(credentials: ProviderCredentials) {
    let outcome = subscribe_with(
        &FixtureMailingListProvider,
        &signup("a@b.com", Some("student")),
        Ok(&credentials),
    )
    .await;
    assert!(outcome.is_success());
}
