//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the student screen to Dart via FRB as one opaque handle.
//! - Convert core errors into flat, UI-ready response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Positions are list indices as last rendered from `items()`.

use log::warn;
use student_core::db::open_db;
use student_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    EntryForm, ItemAction, ListChange, PresenterError, PresenterResult, SqliteStudentRepository,
    Student, StudentListPresenter,
};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

const STUDENTS_DB_FILE_NAME: &str = "students.sqlite3";
const STUDENTS_DB_PATH_ENV: &str = "STUDENTS_DB_PATH";

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One list row as rendered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentItem {
    pub id: i64,
    pub name: String,
    pub grade: i32,
    pub course: String,
    /// Epoch milliseconds.
    pub created_at: i64,
}

impl From<&Student> for StudentItem {
    fn from(student: &Student) -> Self {
        Self {
            id: student.id,
            name: student.name.clone(),
            grade: student.grade,
            course: student.course.clone(),
            created_at: student.created_at,
        }
    }
}

/// Dialog contents for the create or edit prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentFormFields {
    pub title: String,
    pub positive_label: String,
    pub negative_label: String,
    pub name: String,
    pub grade: String,
    pub course: String,
}

impl From<&EntryForm> for StudentFormFields {
    fn from(form: &EntryForm) -> Self {
        Self {
            title: form.title().to_string(),
            positive_label: form.positive_label().to_string(),
            negative_label: form.negative_label().to_string(),
            name: form.name.clone(),
            grade: form.grade.clone(),
            course: form.course.clone(),
        }
    }
}

/// Result envelope for list mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentActionResponse {
    /// Whether the mutation was applied.
    pub ok: bool,
    /// Affected list position, when the list changed.
    pub position: Option<u32>,
    /// User-visible message; the toast text on validation failure.
    pub message: String,
}

impl StudentActionResponse {
    fn from_result(result: PresenterResult<ListChange>, success: &str) -> Self {
        match result {
            Ok(change) => Self {
                ok: true,
                position: changed_position(change),
                message: success.to_string(),
            },
            Err(err) => {
                warn!(
                    "event=ffi_student_action module=ffi status=error error_code={}",
                    err.code()
                );
                Self {
                    ok: false,
                    position: None,
                    message: err.to_string(),
                }
            }
        }
    }
}

type ScreenPresenter = StudentListPresenter<SqliteStudentRepository>;

/// The single student screen: one database, one presenter.
///
/// The presenter sits behind a `Mutex` so the handle is `Send + Sync` for
/// the bridge even though the SQLite connection is not `Sync`.
#[flutter_rust_bridge::frb(opaque)]
pub struct StudentScreen {
    presenter: Mutex<ScreenPresenter>,
}

impl StudentScreen {
    /// Opens the database and loads all students.
    ///
    /// A blank or missing `db_path` falls back to `STUDENTS_DB_PATH`, then
    /// to a file in the system temp directory.
    #[flutter_rust_bridge::frb(sync)]
    pub fn open(db_path: Option<String>) -> Result<StudentScreen, String> {
        let path = resolve_db_path(db_path);
        let conn = open_db(&path).map_err(|err| format!("student DB open failed: {err}"))?;
        let presenter = StudentListPresenter::load(SqliteStudentRepository::new(conn))
            .map_err(|err| format!("student list load failed: {err}"))?;
        Ok(Self {
            presenter: Mutex::new(presenter),
        })
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn items(&self) -> Vec<StudentItem> {
        self.lock()
            .students()
            .iter()
            .map(StudentItem::from)
            .collect()
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn empty_state_visible(&self) -> bool {
        self.lock().empty_state_visible()
    }

    /// Labels for the long-press menu, indexed like `ItemAction`.
    #[flutter_rust_bridge::frb(sync)]
    pub fn action_labels(&self) -> Vec<String> {
        ItemAction::ALL
            .iter()
            .map(|action| action.label().to_string())
            .collect()
    }

    /// Blank dialog for the add button.
    #[flutter_rust_bridge::frb(sync)]
    pub fn create_form(&self) -> StudentFormFields {
        StudentFormFields::from(&self.lock().open_create_form())
    }

    /// Prefilled dialog for the row at `position`, or `None` if out of range.
    #[flutter_rust_bridge::frb(sync)]
    pub fn edit_form(&self, position: u32) -> Option<StudentFormFields> {
        let index = usize::try_from(position).ok()?;
        self.lock()
            .get(index)
            .map(|student| StudentFormFields::from(&EntryForm::edit(index, student)))
    }

    /// Submits the create dialog with raw field text.
    #[flutter_rust_bridge::frb(sync)]
    pub fn create(&self, name: String, grade: String, course: String) -> StudentActionResponse {
        let form = EntryForm::create().with_fields(name, grade, course);
        StudentActionResponse::from_result(self.lock().submit(&form), "Student created.")
    }

    /// Submits the edit dialog for the row at `position`.
    #[flutter_rust_bridge::frb(sync)]
    pub fn update(
        &self,
        position: u32,
        name: String,
        grade: String,
        course: String,
    ) -> StudentActionResponse {
        let mut presenter = self.lock();
        let index = position as usize;
        let form = match presenter.get(index) {
            Some(student) => Ok(EntryForm::edit(index, student).with_fields(name, grade, course)),
            None => Err(PresenterError::PositionOutOfRange {
                position: index,
                len: presenter.len(),
            }),
        };
        let result = form.and_then(|form| presenter.submit(&form));
        StudentActionResponse::from_result(result, "Student updated.")
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn delete(&self, position: u32) -> StudentActionResponse {
        let result = self.lock().delete_at(position as usize);
        StudentActionResponse::from_result(result, "Student deleted.")
    }

    fn lock(&self) -> MutexGuard<'_, ScreenPresenter> {
        self.presenter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn changed_position(change: ListChange) -> Option<u32> {
    let position = match change {
        ListChange::Inserted(position)
        | ListChange::Changed(position)
        | ListChange::Removed(position) => position,
        ListChange::Unchanged => return None,
    };
    u32::try_from(position).ok()
}

fn resolve_db_path(db_path: Option<String>) -> PathBuf {
    pick_db_path(db_path, std::env::var(STUDENTS_DB_PATH_ENV).ok())
}

/// First non-blank of the explicit path and the env value, else the temp default.
fn pick_db_path(explicit: Option<String>, from_env: Option<String>) -> PathBuf {
    [explicit, from_env]
        .into_iter()
        .flatten()
        .map(|raw| raw.trim().to_string())
        .find(|raw| !raw.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join(STUDENTS_DB_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, pick_db_path, ping, StudentScreen, STUDENTS_DB_FILE_NAME,
    };
    use rusqlite::Connection;
    use std::path::PathBuf;

    fn open_screen(dir: &tempfile::TempDir) -> StudentScreen {
        let path = dir.path().join("students.sqlite3");
        StudentScreen::open(Some(path.to_string_lossy().into_owned())).expect("open screen")
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn explicit_db_path_wins() {
        let path = pick_db_path(
            Some(" /data/students.db ".to_string()),
            Some("/env/students.db".to_string()),
        );
        assert_eq!(path, PathBuf::from("/data/students.db"));
    }

    #[test]
    fn blank_db_path_falls_back_to_env() {
        let path = pick_db_path(Some("   ".to_string()), Some("/env/students.db".to_string()));
        assert_eq!(path, PathBuf::from("/env/students.db"));
    }

    #[test]
    fn blank_everywhere_uses_temp_default() {
        let path = pick_db_path(Some(String::new()), Some(" ".to_string()));
        assert_eq!(path, std::env::temp_dir().join(STUDENTS_DB_FILE_NAME));
    }

    #[test]
    fn screen_handle_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StudentScreen>();
    }

    #[test]
    fn fresh_screen_shows_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let screen = open_screen(&dir);
        assert!(screen.items().is_empty());
        assert!(screen.empty_state_visible());
        assert_eq!(screen.create_form().title, "New Student");
        assert_eq!(screen.action_labels(), vec!["Edit", "Delete"]);
    }

    #[test]
    fn create_update_delete_flow() {
        let dir = tempfile::tempdir().unwrap();
        let screen = open_screen(&dir);

        let created = screen.create("Ana".to_string(), "5".to_string(), "Math".to_string());
        assert!(created.ok, "{}", created.message);
        assert_eq!(created.position, Some(0));
        assert!(!screen.empty_state_visible());

        let form = screen.edit_form(0).expect("row 0 exists");
        assert_eq!(form.title, "Edit Student");
        assert_eq!(form.positive_label, "update");
        assert_eq!(form.grade, "5");

        let id = screen.items()[0].id;
        let updated = screen.update(0, "Ana".to_string(), "6".to_string(), "Physics".to_string());
        assert!(updated.ok, "{}", updated.message);
        assert_eq!(screen.items()[0].id, id);
        assert_eq!(screen.items()[0].course, "Physics");

        let deleted = screen.delete(0);
        assert!(deleted.ok, "{}", deleted.message);
        assert!(screen.items().is_empty());
        assert!(screen.empty_state_visible());
    }

    #[test]
    fn empty_submission_returns_toast_message() {
        let dir = tempfile::tempdir().unwrap();
        let screen = open_screen(&dir);

        let response = screen.create(String::new(), String::new(), String::new());
        assert!(!response.ok);
        assert_eq!(response.message, "Enter student details!");
        assert!(screen.items().is_empty());
    }

    #[test]
    fn out_of_range_mutations_fail_without_panicking() {
        let dir = tempfile::tempdir().unwrap();
        let screen = open_screen(&dir);

        assert!(!screen.delete(4).ok);
        assert!(!screen
            .update(4, "A".to_string(), "1".to_string(), "B".to_string())
            .ok);
        assert!(screen.edit_form(4).is_none());
    }

    #[test]
    fn rows_persist_across_screen_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let screen = open_screen(&dir);
            assert!(screen.create("Ana".to_string(), "5".to_string(), "Math".to_string()).ok);
        }

        let screen = open_screen(&dir);
        assert_eq!(screen.items().len(), 1);

        let conn = Connection::open(dir.path().join("students.sqlite3")).expect("open raw db");
        let name: String = conn
            .query_row("SELECT name FROM students;", [], |row| row.get(0))
            .expect("query student row");
        assert_eq!(name, "Ana");
    }
}
