//! Tests for the member directory service.

use std::sync::Arc;

use rstest::{fixture, rstest};

use super::*;
use crate::domain::FieldViolation;
use crate::domain::ports::{InMemoryMemberRepository, MockMemberRepository};

type InMemoryService = MemberService<InMemoryMemberRepository>;

#[fixture]
fn service() -> InMemoryService {
    MemberService::new(Arc::new(InMemoryMemberRepository::new()))
}

fn make_mock_service(repo: MockMemberRepository) -> MemberService<MockMemberRepository> {
    MemberService::new(Arc::new(repo))
}

fn john() -> MemberDraft {
    MemberDraft::new("John Doe", "JOHN@EXAMPLE.COM").with_phone("+1-234-567-8901")
}

fn stored(id: i64, name: &str, email: &str, phone: Option<&str>) -> Member {
    Member::from_stored(id, name, email, phone).expect("valid stored member")
}

#[rstest]
#[tokio::test]
async fn create_normalises_email_and_keeps_phone_formatting(service: InMemoryService) {
    let member = service.create(john()).await.expect("create succeeds");

    assert_eq!(member.name().as_str(), "John Doe");
    assert_eq!(member.email().as_str(), "john@example.com");
    assert_eq!(
        member.phone().map(PhoneNumber::as_str),
        Some("+1-234-567-8901")
    );
}

#[rstest]
#[case("john@example.com")]
#[case("John@Example.Com")]
#[case("  JOHN@EXAMPLE.COM ")]
#[tokio::test]
async fn create_rejects_duplicate_email_in_any_case(
    service: InMemoryService,
    #[case] email: &str,
) {
    service.create(john()).await.expect("first create");

    let err = service
        .create(MemberDraft::new("Other Person", email))
        .await
        .expect_err("duplicate email");
    assert_eq!(
        err,
        MemberError::already_exists(MemberField::Email, "john@example.com")
    );
}

#[rstest]
#[tokio::test]
async fn create_rejects_duplicate_phone(service: InMemoryService) {
    service.create(john()).await.expect("first create");

    let err = service
        .create(MemberDraft::new("Jane Doe", "jane@example.com").with_phone("+1-234-567-8901"))
        .await
        .expect_err("duplicate phone");
    assert_eq!(err.field(), Some(MemberField::Phone));
    assert!(matches!(err, MemberError::AlreadyExists { .. }));
}

#[rstest]
#[case(MemberDraft::new("A", "a@example.com"), MemberField::Name)]
#[case(
    MemberDraft::new("Alice", "a@example.com").with_phone("123-abc-7890"),
    MemberField::Phone
)]
#[case(MemberDraft::new("Alice", "a..b@example.com"), MemberField::Email)]
#[tokio::test]
async fn create_rejects_invalid_fields_before_touching_the_store(
    #[case] draft: MemberDraft,
    #[case] field: MemberField,
) {
    // No expectations: any repository call would panic.
    let service = make_mock_service(MockMemberRepository::new());

    let err = service.create(draft).await.expect_err("invalid draft");
    assert!(matches!(err, MemberError::InvalidField { .. }));
    assert_eq!(err.field(), Some(field));
}

#[rstest]
#[tokio::test]
async fn phone_less_members_coexist(service: InMemoryService) {
    for (name, email) in [
        ("Ann Lee", "ann@example.com"),
        ("Bob Ray", "bob@example.com"),
    ] {
        service
            .create(MemberDraft::new(name, email).with_phone("   "))
            .await
            .expect("phone-less create");
    }

    let members = service.list(0, 10).await.expect("list");
    assert_eq!(members.len(), 2);
    assert!(members.iter().all(|member| member.phone().is_none()));
}

#[rstest]
#[tokio::test]
async fn create_maps_commit_time_email_conflict_to_already_exists() {
    let mut repo = MockMemberRepository::new();
    repo.expect_find_by_email().returning(|_| Ok(None));
    repo.expect_find_by_phone().returning(|_| Ok(None));
    repo.expect_insert().times(1).return_once(|_| {
        Err(MemberPersistenceError::unique_violation(
            MemberField::Email,
            "duplicate key value violates unique constraint \"members_email_key\"",
        ))
    });

    let err = make_mock_service(repo)
        .create(john())
        .await
        .expect_err("raced insert");
    assert_eq!(
        err,
        MemberError::already_exists(MemberField::Email, "john@example.com")
    );
}

#[rstest]
#[tokio::test]
async fn create_maps_unattributed_conflict_to_store_error() {
    let mut repo = MockMemberRepository::new();
    repo.expect_find_by_email().returning(|_| Ok(None));
    repo.expect_find_by_phone().returning(|_| Ok(None));
    repo.expect_insert()
        .times(1)
        .return_once(|_| Err(MemberPersistenceError::unique_violation(None, "conflict")));

    let err = make_mock_service(repo)
        .create(john())
        .await
        .expect_err("unattributed conflict");
    assert!(matches!(
        err,
        MemberError::Store {
            operation: "create_member",
            ..
        }
    ));
}

#[rstest]
#[tokio::test]
async fn lookup_failures_surface_as_store_errors() {
    let mut repo = MockMemberRepository::new();
    repo.expect_find_by_email()
        .times(1)
        .return_once(|_| Err(MemberPersistenceError::connection("pool timed out")));

    let err = make_mock_service(repo)
        .find_by_email("john@example.com")
        .await
        .expect_err("connection failure");
    assert_eq!(
        err,
        MemberError::store(
            "find_member_by_email",
            "member repository connection failed: pool timed out"
        )
    );
}

#[rstest]
#[tokio::test]
async fn find_by_email_normalises_its_input() {
    let mut repo = MockMemberRepository::new();
    repo.expect_find_by_email()
        .withf(|email: &str| email == "john@example.com")
        .times(1)
        .return_once(|_| Ok(None));

    let found = make_mock_service(repo)
        .find_by_email("  John@Example.COM ")
        .await
        .expect("lookup succeeds");
    assert!(found.is_none());
}

#[rstest]
#[tokio::test]
async fn get_missing_member_is_not_found(service: InMemoryService) {
    let err = service.get(MemberId::new(5)).await.expect_err("missing");
    assert_eq!(err, MemberError::member_not_found(MemberId::new(5)));
}

#[rstest]
#[case(0, 500, 100)]
#[case(10, 20, 20)]
#[case(0, 0, 0)]
#[tokio::test]
async fn list_clamps_the_page_size(#[case] skip: u64, #[case] limit: u64, #[case] expected: u64) {
    let mut repo = MockMemberRepository::new();
    repo.expect_list()
        .withf(move |s, l| *s == skip && *l == expected)
        .times(1)
        .return_once(|_, _| Ok(Vec::new()));

    let members = make_mock_service(repo)
        .list(skip, limit)
        .await
        .expect("list succeeds");
    assert!(members.is_empty());
}

#[rstest]
#[tokio::test]
async fn update_changes_only_supplied_fields(service: InMemoryService) {
    let created = service.create(john()).await.expect("create");

    let updated = service
        .update(created.id(), MemberPatch::default().name("Johnny Doe"))
        .await
        .expect("update");

    assert_eq!(updated.id(), created.id());
    assert_eq!(updated.name().as_str(), "Johnny Doe");
    assert_eq!(updated.email(), created.email());
    assert_eq!(updated.phone(), created.phone());
}

#[rstest]
#[tokio::test]
async fn update_is_all_or_nothing(service: InMemoryService) {
    let created = service.create(john()).await.expect("create");

    let err = service
        .update(
            created.id(),
            MemberPatch::default().name("Valid Name").phone("12"),
        )
        .await
        .expect_err("invalid phone");
    assert!(matches!(
        err,
        MemberError::InvalidField {
            field: MemberField::Phone,
            reason: FieldViolation::TooFewDigits { .. },
            ..
        }
    ));

    let unchanged = service.get(created.id()).await.expect("still stored");
    assert_eq!(unchanged, created);
}

#[rstest]
#[tokio::test]
async fn update_keeping_own_email_is_not_a_conflict(service: InMemoryService) {
    let created = service.create(john()).await.expect("create");

    let updated = service
        .update(
            created.id(),
            MemberPatch::default()
                .email("john@example.com")
                .phone("+1-234-567-8901"),
        )
        .await
        .expect("self update");
    assert_eq!(updated, created);
}

#[rstest]
#[tokio::test]
async fn update_rejects_email_held_by_another_member(service: InMemoryService) {
    service.create(john()).await.expect("create john");
    let jane = service
        .create(MemberDraft::new("Jane Doe", "jane@example.com"))
        .await
        .expect("create jane");

    let err = service
        .update(jane.id(), MemberPatch::default().email("JOHN@example.com"))
        .await
        .expect_err("email taken");
    assert_eq!(
        err,
        MemberError::already_exists(MemberField::Email, "john@example.com")
    );
}

#[rstest]
#[tokio::test]
async fn update_with_blank_phone_clears_it(service: InMemoryService) {
    let created = service.create(john()).await.expect("create");

    let updated = service
        .update(created.id(), MemberPatch::default().phone(""))
        .await
        .expect("clear phone");
    assert!(updated.phone().is_none());

    // The released number is free for someone else.
    service
        .create(MemberDraft::new("Jane Doe", "jane@example.com").with_phone("+1-234-567-8901"))
        .await
        .expect("reuse phone");
}

#[rstest]
#[tokio::test]
async fn update_checks_existence_before_validation(service: InMemoryService) {
    let err = service
        .update(MemberId::new(9), MemberPatch::default().name("A"))
        .await
        .expect_err("missing member");
    assert_eq!(err, MemberError::member_not_found(MemberId::new(9)));
}

#[rstest]
#[tokio::test]
async fn update_reports_not_found_when_row_vanishes_mid_update() {
    let existing = stored(3, "John Doe", "john@example.com", None);
    let mut repo = MockMemberRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(existing)));
    repo.expect_update().times(1).return_once(|_, _| Ok(None));

    let err = make_mock_service(repo)
        .update(MemberId::new(3), MemberPatch::default().name("Johnny"))
        .await
        .expect_err("row vanished");
    assert_eq!(err, MemberError::member_not_found(MemberId::new(3)));
}

#[rstest]
#[tokio::test]
async fn update_maps_commit_time_phone_conflict() {
    let existing = stored(3, "John Doe", "john@example.com", None);
    let mut repo = MockMemberRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(existing)));
    repo.expect_find_by_phone().times(1).return_once(|_| Ok(None));
    repo.expect_update().times(1).return_once(|_, _| {
        Err(MemberPersistenceError::unique_violation(
            MemberField::Phone,
            "duplicate key value violates unique constraint \"members_phone_key\"",
        ))
    });

    let err = make_mock_service(repo)
        .update(MemberId::new(3), MemberPatch::default().phone("+62 812 3456 7890"))
        .await
        .expect_err("raced update");
    assert_eq!(
        err,
        MemberError::already_exists(MemberField::Phone, "+62 812 3456 7890")
    );
}

#[rstest]
#[tokio::test]
async fn empty_patch_returns_the_current_member_without_writing() {
    let existing = stored(3, "John Doe", "john@example.com", None);
    let expected = existing.clone();
    let mut repo = MockMemberRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(existing)));
    repo.expect_update().never();

    let member = make_mock_service(repo)
        .update(MemberId::new(3), MemberPatch::default())
        .await
        .expect("no-op update");
    assert_eq!(member, expected);
}

#[rstest]
#[tokio::test]
async fn delete_then_lookup_is_absent_and_second_delete_fails(service: InMemoryService) {
    let created = service.create(john()).await.expect("create");

    service.delete(created.id()).await.expect("first delete");
    assert!(
        service
            .find_by_email("john@example.com")
            .await
            .expect("lookup")
            .is_none()
    );

    let err = service
        .delete(created.id())
        .await
        .expect_err("second delete");
    assert_eq!(err, MemberError::member_not_found(created.id()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_creates_sharing_an_email_admit_one_member() {
    let service = Arc::new(MemberService::new(Arc::new(
        InMemoryMemberRepository::new(),
    )));

    let handles: Vec<_> = (0..64)
        .map(|i| {
            let service = Arc::clone(&service);
            let email = if i % 2 == 0 {
                "Race@Example.com"
            } else {
                "race@EXAMPLE.com"
            };
            tokio::spawn(async move {
                service
                    .create(MemberDraft::new(format!("Racer {i}"), email))
                    .await
            })
        })
        .collect();

    let mut created = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.expect("task completes") {
            Ok(member) => {
                assert_eq!(member.email().as_str(), "race@example.com");
                created += 1;
            }
            Err(err) => {
                assert_eq!(
                    err,
                    MemberError::already_exists(MemberField::Email, "race@example.com")
                );
                conflicts += 1;
            }
        }
    }

    assert_eq!(created, 1);
    assert_eq!(conflicts, 63);
    let members = service.list(0, 100).await.expect("list");
    assert_eq!(members.len(), 1);
}
