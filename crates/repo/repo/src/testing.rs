use lexcase_core::{CaseId, CaseStatus, NewAttachment, NewCase, UserId, storage_path};

use crate::error::RepoError;
use crate::repository::CaseRepository;

fn new_case(user: &UserId, title: &str) -> NewCase {
    NewCase {
        user_id: user.clone(),
        title: title.to_owned(),
        description: "Necesito ayuda legal con mi divorcio".to_owned(),
    }
}

fn new_attachment(case_id: CaseId, file_name: &str) -> NewAttachment {
    NewAttachment {
        case_id,
        storage_bucket: "case-files".to_owned(),
        storage_path: storage_path(&case_id, file_name),
        file_name: file_name.to_owned(),
        file_size: 2 * 1024 * 1024,
        mime_type: "application/pdf".to_owned(),
    }
}

/// Run the full case repository conformance test suite.
///
/// Call this from your backend's test module with a fresh repository. The
/// `run_id` is mixed into user identifiers so repeated runs against a shared
/// database do not see each other's rows.
///
/// # Errors
///
/// Returns an error if any repository call fails unexpectedly.
pub async fn run_repository_conformance_tests(
    repo: &dyn CaseRepository,
    run_id: &str,
) -> Result<(), RepoError> {
    test_create_case(repo, run_id).await?;
    test_create_is_not_idempotent(repo, run_id).await?;
    test_get_missing(repo).await?;
    test_attachments_roundtrip(repo, run_id).await?;
    test_attachment_requires_case(repo).await?;
    test_list_cases_newest_first(repo, run_id).await?;
    test_update_status(repo, run_id).await?;
    test_update_status_missing(repo).await?;
    Ok(())
}

async fn test_create_case(repo: &dyn CaseRepository, run_id: &str) -> Result<(), RepoError> {
    let user = UserId::new(format!("{run_id}-create"));
    let case = repo.create_case(new_case(&user, "Divorcio")).await?;

    assert_eq!(case.user_id, user);
    assert_eq!(case.title, "Divorcio");
    assert_eq!(case.status, CaseStatus::Pending, "new cases start pending");
    assert_eq!(case.created_at, case.updated_at);

    let fetched = repo.get_case(case.id).await?;
    assert_eq!(fetched.as_ref(), Some(&case), "get should return the stored case");
    Ok(())
}

async fn test_create_is_not_idempotent(
    repo: &dyn CaseRepository,
    run_id: &str,
) -> Result<(), RepoError> {
    let user = UserId::new(format!("{run_id}-twice"));
    let a = repo.create_case(new_case(&user, "Herencia")).await?;
    let b = repo.create_case(new_case(&user, "Herencia")).await?;
    assert_ne!(a.id, b.id, "identical input must create two distinct cases");

    let listed = repo.list_cases(&user).await?;
    assert_eq!(listed.len(), 2);
    Ok(())
}

async fn test_get_missing(repo: &dyn CaseRepository) -> Result<(), RepoError> {
    let missing = repo.get_case(CaseId::generate()).await?;
    assert!(missing.is_none(), "get on unknown id should return None");
    Ok(())
}

async fn test_attachments_roundtrip(
    repo: &dyn CaseRepository,
    run_id: &str,
) -> Result<(), RepoError> {
    let user = UserId::new(format!("{run_id}-attach"));
    let case = repo.create_case(new_case(&user, "Despido")).await?;

    let first = repo
        .add_attachment(new_attachment(case.id, "contrato.pdf"))
        .await?;
    let second = repo
        .add_attachment(new_attachment(case.id, "contrato.pdf"))
        .await?;

    assert_ne!(first.id, second.id);
    assert_ne!(first.storage_path, second.storage_path);
    assert_eq!(first.case_id, case.id);
    assert_eq!(first.file_size, 2 * 1024 * 1024);

    let listed = repo.list_attachments(case.id).await?;
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, first.id, "attachments are listed oldest first");

    let none = repo.list_attachments(CaseId::generate()).await?;
    assert!(none.is_empty());
    Ok(())
}

async fn test_attachment_requires_case(repo: &dyn CaseRepository) -> Result<(), RepoError> {
    let orphan = CaseId::generate();
    let result = repo.add_attachment(new_attachment(orphan, "x.pdf")).await;
    assert!(
        matches!(result, Err(RepoError::CaseNotFound(id)) if id == orphan),
        "attachment for unknown case should fail with CaseNotFound"
    );
    Ok(())
}

async fn test_list_cases_newest_first(
    repo: &dyn CaseRepository,
    run_id: &str,
) -> Result<(), RepoError> {
    let user = UserId::new(format!("{run_id}-list"));
    let other = UserId::new(format!("{run_id}-list-other"));

    let older = repo.create_case(new_case(&user, "Primero")).await?;
    let newer = repo.create_case(new_case(&user, "Segundo")).await?;
    repo.create_case(new_case(&other, "Ajeno")).await?;

    let listed = repo.list_cases(&user).await?;
    assert_eq!(listed.len(), 2, "only the user's own cases are listed");
    assert_eq!(listed[0].id, newer.id);
    assert_eq!(listed[1].id, older.id);
    Ok(())
}

async fn test_update_status(repo: &dyn CaseRepository, run_id: &str) -> Result<(), RepoError> {
    let user = UserId::new(format!("{run_id}-status"));
    let case = repo.create_case(new_case(&user, "Arrendamiento")).await?;

    let updated = repo.update_status(case.id, CaseStatus::InProgress).await?;
    assert_eq!(updated.status, CaseStatus::InProgress);
    assert_eq!(updated.created_at, case.created_at);
    assert!(updated.updated_at >= case.updated_at);

    let fetched = repo.get_case(case.id).await?;
    assert_eq!(fetched.map(|c| c.status), Some(CaseStatus::InProgress));
    Ok(())
}

async fn test_update_status_missing(repo: &dyn CaseRepository) -> Result<(), RepoError> {
    let result = repo
        .update_status(CaseId::generate(), CaseStatus::Closed)
        .await;
    assert!(matches!(result, Err(RepoError::CaseNotFound(_))));
    Ok(())
}
