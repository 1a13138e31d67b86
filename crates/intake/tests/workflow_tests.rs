use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;

use lexcase_core::{
    Attachment, Case, CaseId, CaseStatus, FieldErrors, IntakeFile, IntakeLimits, IntakeRequest,
    NewAttachment, NewCase, UserId,
};
use lexcase_intake::{FileStatus, IntakeError, IntakeWorkflow, IntakeWorkflowBuilder};
use lexcase_repo::{CaseRepository, RepoError};
use lexcase_repo_memory::MemoryCaseRepository;
use lexcase_storage::{ObjectStore, StorageError, StoredObject};
use lexcase_storage_memory::MemoryObjectStore;

const BUCKET: &str = "case-files";
const POISON: &[u8] = b"upload-will-fail";

/// Object store that refuses any payload equal to [`POISON`].
#[derive(Default)]
struct FlakyStore {
    inner: MemoryObjectStore,
    puts: AtomicUsize,
}

#[async_trait]
impl ObjectStore for FlakyStore {
    async fn put(
        &self,
        bucket: &str,
        path: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<StoredObject, StorageError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if data.as_ref() == POISON {
            return Err(StorageError::Connection("simulated outage".into()));
        }
        self.inner.put(bucket, path, content_type, data).await
    }
}

/// Repository wrapper that counts calls and can be told to fail.
#[derive(Default)]
struct CountingRepo {
    inner: MemoryCaseRepository,
    create_calls: AtomicUsize,
    fail_create: bool,
    reject_file_name: Option<String>,
}

#[async_trait]
impl CaseRepository for CountingRepo {
    async fn create_case(&self, case: NewCase) -> Result<Case, RepoError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_create {
            return Err(RepoError::Connection("database unavailable".into()));
        }
        self.inner.create_case(case).await
    }

    async fn add_attachment(&self, attachment: NewAttachment) -> Result<Attachment, RepoError> {
        if self.reject_file_name.as_deref() == Some(attachment.file_name.as_str()) {
            return Err(RepoError::Backend("insert failed".into()));
        }
        self.inner.add_attachment(attachment).await
    }

    async fn get_case(&self, id: CaseId) -> Result<Option<Case>, RepoError> {
        self.inner.get_case(id).await
    }

    async fn list_cases(&self, user_id: &UserId) -> Result<Vec<Case>, RepoError> {
        self.inner.list_cases(user_id).await
    }

    async fn list_attachments(&self, case_id: CaseId) -> Result<Vec<Attachment>, RepoError> {
        self.inner.list_attachments(case_id).await
    }

    async fn update_status(&self, id: CaseId, status: CaseStatus) -> Result<Case, RepoError> {
        self.inner.update_status(id, status).await
    }
}

struct Harness {
    repo: Arc<CountingRepo>,
    store: Arc<FlakyStore>,
    workflow: IntakeWorkflow,
}

fn harness_with(repo: CountingRepo) -> Harness {
    let repo = Arc::new(repo);
    let store = Arc::new(FlakyStore::default());
    let workflow = IntakeWorkflowBuilder::new()
        .repository(Arc::clone(&repo) as Arc<dyn CaseRepository>)
        .storage(Arc::clone(&store) as Arc<dyn ObjectStore>)
        .bucket(BUCKET)
        .build()
        .expect("workflow should build");
    Harness {
        repo,
        store,
        workflow,
    }
}

fn harness() -> Harness {
    harness_with(CountingRepo::default())
}

fn request(title: &str, description: &str, files: Vec<IntakeFile>) -> IntakeRequest {
    IntakeRequest {
        user_id: UserId::new("u1"),
        title: title.to_owned(),
        description: description.to_owned(),
        files,
    }
}

fn pdf(name: &str, len: usize) -> IntakeFile {
    IntakeFile::new(name, "application/pdf", vec![b'%'; len])
}

fn failing(name: &str) -> IntakeFile {
    IntakeFile::new(name, "application/pdf", Bytes::from_static(POISON))
}

const DESCRIPTION: &str = "Necesito ayuda legal con mi divorcio";

#[tokio::test]
async fn creates_case_and_registers_every_file() {
    let h = harness();
    let outcome = h
        .workflow
        .submit(request(
            "Divorcio",
            DESCRIPTION,
            vec![pdf("acta.pdf", 64), pdf("poder.PDF", 32)],
        ))
        .await
        .unwrap();

    assert_eq!(outcome.case.status, CaseStatus::Pending);
    assert_eq!(outcome.case.title, "Divorcio");
    assert_eq!(outcome.failed_count(), 0);

    let stored = h.repo.list_attachments(outcome.case_id()).await.unwrap();
    assert_eq!(stored.len(), 2);
    for attachment in &stored {
        assert_eq!(attachment.storage_bucket, BUCKET);
        assert!(
            attachment
                .storage_path
                .starts_with(&format!("{}/", outcome.case_id()))
        );
        assert!(attachment.storage_path.ends_with(".pdf"));
        assert!(
            h.store
                .inner
                .get(BUCKET, &attachment.storage_path)
                .is_some()
        );
    }
}

#[tokio::test]
async fn file_outcomes_follow_submission_order() {
    let h = harness();
    let files = (0..8).map(|i| pdf(&format!("doc-{i}.pdf"), 16)).collect();
    let outcome = h
        .workflow
        .submit(request("Herencia", DESCRIPTION, files))
        .await
        .unwrap();

    let names: Vec<_> = outcome.files.iter().map(|f| f.file_name.clone()).collect();
    let expected: Vec<_> = (0..8).map(|i| format!("doc-{i}.pdf")).collect();
    assert_eq!(names, expected);
}

#[tokio::test]
async fn scenario_one_upload_fails_one_succeeds() {
    let h = harness();
    let two_mb = 2 * 1024 * 1024;
    let outcome = h
        .workflow
        .submit(request(
            "Divorcio",
            DESCRIPTION,
            vec![pdf("fileA.pdf", two_mb), failing("fileB.pdf")],
        ))
        .await
        .expect("case id is returned despite the failed upload");

    let stored = h.repo.list_attachments(outcome.case_id()).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].file_name, "fileA.pdf");
    assert_eq!(stored[0].file_size, two_mb as u64);

    assert!(outcome.files[0].is_stored());
    assert!(matches!(
        outcome.files[1].status,
        FileStatus::UploadFailed(StorageError::Connection(_))
    ));
    assert_eq!(outcome.failed_count(), 1);
    assert!(h.repo.get_case(outcome.case_id()).await.unwrap().is_some());
}

#[tokio::test]
async fn empty_title_and_short_description_abort_before_persistence() {
    let h = harness();
    let err = h
        .workflow
        .submit(request("", "short", vec![pdf("a.pdf", 8)]))
        .await
        .unwrap_err();

    let IntakeError::Validation(validation) = err else {
        panic!("expected validation error");
    };
    assert!(validation.has_field("title"));
    assert!(validation.has_field("description"));
    assert_eq!(h.repo.create_calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.store.puts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn scenario_empty_title_creates_no_case() {
    let h = harness();
    let result = h.workflow.submit(request("", "short text", vec![])).await;

    assert!(matches!(result, Err(IntakeError::Validation(ref v)) if v.has_field("title")));
    assert_eq!(h.repo.inner.case_count(), 0);
}

#[tokio::test]
async fn description_length_boundary() {
    let h = harness();

    let nine = h.workflow.submit(request("Despido", "123456789", vec![])).await;
    assert!(matches!(nine, Err(IntakeError::Validation(ref v)) if v.has_field("description")));

    let ten = h.workflow.submit(request("Despido", "1234567890", vec![])).await;
    assert!(ten.is_ok());
    assert_eq!(h.repo.create_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn same_file_twice_gets_two_paths_and_two_rows() {
    let h = harness();
    let first = h
        .workflow
        .submit(request("Arriendo", DESCRIPTION, vec![pdf("contrato.pdf", 10)]))
        .await
        .unwrap();
    let second = h
        .workflow
        .submit(request("Arriendo", DESCRIPTION, vec![pdf("contrato.pdf", 10)]))
        .await
        .unwrap();

    assert_ne!(first.case_id(), second.case_id());
    let a = first.attachments().next().unwrap();
    let b = second.attachments().next().unwrap();
    assert_ne!(a.storage_path, b.storage_path);
    assert_eq!(h.repo.inner.attachment_count(), 2);
    assert_eq!(h.store.inner.len(), 2);
}

#[tokio::test]
async fn registration_failure_keeps_case_and_other_files() {
    let h = harness_with(CountingRepo {
        reject_file_name: Some("broken.pdf".into()),
        ..CountingRepo::default()
    });

    let outcome = h
        .workflow
        .submit(request(
            "Laboral",
            DESCRIPTION,
            vec![pdf("ok.pdf", 10), pdf("broken.pdf", 10)],
        ))
        .await
        .unwrap();

    let stored = h.repo.list_attachments(outcome.case_id()).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].file_name, "ok.pdf");

    let FileStatus::RegistrationFailed { stored: orphan, .. } = &outcome.files[1].status else {
        panic!("expected registration failure for broken.pdf");
    };
    assert!(h.store.inner.get(BUCKET, &orphan.path).is_some());
    assert!(h.repo.get_case(outcome.case_id()).await.unwrap().is_some());
}

#[tokio::test]
async fn case_creation_failure_uploads_nothing() {
    let h = harness_with(CountingRepo {
        fail_create: true,
        ..CountingRepo::default()
    });

    let result = h
        .workflow
        .submit(request("Penal", DESCRIPTION, vec![pdf("a.pdf", 10)]))
        .await;

    assert!(matches!(
        result,
        Err(IntakeError::Persistence(RepoError::Connection(_)))
    ));
    assert_eq!(h.store.puts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn case_without_files() {
    let h = harness();
    let outcome = h
        .workflow
        .submit(request("Consulta", DESCRIPTION, vec![]))
        .await
        .unwrap();

    assert!(outcome.files.is_empty());
    assert!(h.repo.list_attachments(outcome.case_id()).await.unwrap().is_empty());
}

#[tokio::test]
async fn text_fields_are_trimmed_before_insert() {
    let h = harness();
    let outcome = h
        .workflow
        .submit(request("  Divorcio  ", &format!("  {DESCRIPTION}\n"), vec![]))
        .await
        .unwrap();

    assert_eq!(outcome.case.title, "Divorcio");
    assert_eq!(outcome.case.description, DESCRIPTION);
}

#[tokio::test]
async fn limits_are_enforced() {
    let repo = Arc::new(CountingRepo::default());
    let workflow = IntakeWorkflowBuilder::new()
        .repository(Arc::clone(&repo) as Arc<dyn CaseRepository>)
        .storage(Arc::new(FlakyStore::default()))
        .limits(IntakeLimits {
            max_files: 1,
            max_file_bytes: 4,
        })
        .build()
        .unwrap();

    let err = workflow
        .submit(request(
            "Divorcio",
            DESCRIPTION,
            vec![pdf("a.pdf", 2), pdf("b.pdf", 5)],
        ))
        .await
        .unwrap_err();

    let IntakeError::Validation(validation) = err else {
        panic!("expected validation error");
    };
    assert!(validation.has_field("files"));
    assert!(validation.has_field("files[1]"));
    assert!(!validation.has_field("files[0]"));
    assert_eq!(repo.create_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn metrics_track_outcomes() {
    let h = harness();
    h.workflow
        .submit(request(
            "Divorcio",
            DESCRIPTION,
            vec![pdf("a.pdf", 4), failing("b.pdf")],
        ))
        .await
        .unwrap();
    let _ = h.workflow.submit(request("", DESCRIPTION, vec![])).await;

    let snap = h.workflow.metrics().snapshot();
    assert_eq!(snap.submitted, 2);
    assert_eq!(snap.rejected, 1);
    assert_eq!(snap.cases_created, 1);
    assert_eq!(snap.attachments_stored, 1);
    assert_eq!(snap.upload_failures, 1);
    assert_eq!(snap.registration_failures, 0);
}

#[tokio::test]
async fn rejection_outside_submit_is_counted() {
    let h = harness();
    let mut errors = FieldErrors::new();
    errors.push("files[0]", "data_base64 is not valid base64");
    let error = errors.into_result().unwrap_err();

    h.workflow.reject(&error);

    let snap = h.workflow.metrics().snapshot();
    assert_eq!(snap.submitted, 1);
    assert_eq!(snap.rejected, 1);
    assert_eq!(snap.cases_created, 0);
    assert_eq!(h.repo.create_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn serial_uploads_still_process_every_file() {
    let repo = Arc::new(MemoryCaseRepository::new());
    let workflow = IntakeWorkflowBuilder::new()
        .repository(Arc::clone(&repo) as Arc<dyn CaseRepository>)
        .storage(Arc::new(MemoryObjectStore::new()))
        .max_concurrent_uploads(1)
        .build()
        .unwrap();

    let outcome = workflow
        .submit(request(
            "Divorcio",
            DESCRIPTION,
            vec![pdf("a.pdf", 1), pdf("b.pdf", 1), pdf("c.pdf", 1)],
        ))
        .await
        .unwrap();

    assert_eq!(outcome.attachments().count(), 3);
    assert_eq!(repo.attachment_count(), 3);
}
