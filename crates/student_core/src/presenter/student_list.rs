//! List presenter for the student screen.
//!
//! # Responsibility
//! - Own the in-memory student list shown by the host.
//! - Apply create/update/delete to storage first, then patch the list.
//! - Recompute empty-state visibility from storage after every mutation.
//!
//! # Invariants
//! - `students` mirrors storage order: newest first.
//! - Positions are indices into `students`; an update keeps both the id and
//!   the position of the edited row.
//! - A rejected form leaves storage and list untouched.

use crate::model::student::Student;
use crate::presenter::entry_form::{EntryForm, FormError, FormMode};
use crate::repo::student_repo::{RepoError, StudentRepository};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type PresenterResult<T> = Result<T, PresenterError>;

#[derive(Debug)]
pub enum PresenterError {
    Form(FormError),
    Repo(RepoError),
    PositionOutOfRange { position: usize, len: usize },
}

impl Display for PresenterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Form(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::PositionOutOfRange { position, len } => {
                write!(f, "position {position} out of range for list of {len}")
            }
        }
    }
}

impl Error for PresenterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Form(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::PositionOutOfRange { .. } => None,
        }
    }
}

impl PresenterError {
    /// Stable log code; never includes user-entered text.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Form(err) => err.code(),
            Self::Repo(_) => "repo_error",
            Self::PositionOutOfRange { .. } => "position_out_of_range",
        }
    }
}

impl From<FormError> for PresenterError {
    fn from(value: FormError) -> Self {
        Self::Form(value)
    }
}

impl From<RepoError> for PresenterError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Change notification a host uses to refresh its list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListChange {
    /// Storage accepted the write but nothing was shown.
    Unchanged,
    Inserted(usize),
    Changed(usize),
    Removed(usize),
}

/// Long-press menu entries, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemAction {
    Edit,
    Delete,
}

impl ItemAction {
    pub const ALL: [ItemAction; 2] = [ItemAction::Edit, ItemAction::Delete];

    pub fn label(self) -> &'static str {
        match self {
            Self::Edit => "Edit",
            Self::Delete => "Delete",
        }
    }

    /// Maps a menu index back to its action.
    pub fn from_index(which: usize) -> Option<Self> {
        Self::ALL.get(which).copied()
    }
}

/// Result of picking an entry from the long-press menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Host should show this prefilled form.
    OpenForm(EntryForm),
    Applied(ListChange),
}

/// Presenter owning the repository and the displayed list.
pub struct StudentListPresenter<R: StudentRepository> {
    repo: R,
    students: Vec<Student>,
    empty_state_visible: bool,
}

impl<R: StudentRepository> StudentListPresenter<R> {
    /// Reads every stored student and computes the initial empty state.
    pub fn load(repo: R) -> PresenterResult<Self> {
        let students = repo.list_all()?;
        let mut presenter = Self {
            repo,
            students,
            empty_state_visible: true,
        };
        presenter.refresh_empty_state()?;
        info!(
            "event=students_load module=presenter status=ok count={}",
            presenter.students.len()
        );
        Ok(presenter)
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn get(&self, position: usize) -> Option<&Student> {
        self.students.get(position)
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Whether the "no students" placeholder should replace the list.
    pub fn empty_state_visible(&self) -> bool {
        self.empty_state_visible
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Blank form opened from the add button.
    pub fn open_create_form(&self) -> EntryForm {
        EntryForm::create()
    }

    /// Menu shown on long press of the row at `position`.
    pub fn show_actions(&self, position: usize) -> PresenterResult<&'static [ItemAction]> {
        self.student_at(position)?;
        Ok(&ItemAction::ALL)
    }

    /// Dispatches a long-press menu choice for the row at `position`.
    pub fn choose_action(
        &mut self,
        position: usize,
        action: ItemAction,
    ) -> PresenterResult<ActionOutcome> {
        match action {
            ItemAction::Edit => {
                let student = self.student_at(position)?;
                Ok(ActionOutcome::OpenForm(EntryForm::edit(position, student)))
            }
            ItemAction::Delete => self.delete_at(position).map(ActionOutcome::Applied),
        }
    }

    /// Handles the form's positive button.
    ///
    /// On error the host keeps the form open; nothing was written.
    pub fn submit(&mut self, form: &EntryForm) -> PresenterResult<ListChange> {
        let draft = match form.submit() {
            Ok(draft) => draft,
            Err(err) => {
                info!(
                    "event=student_submit module=presenter status=rejected reason={}",
                    err.code()
                );
                return Err(err.into());
            }
        };

        match form.mode() {
            FormMode::Create => self.create(&draft.name, draft.grade, &draft.course),
            FormMode::Edit { position } => {
                self.update_at(position, &draft.name, draft.grade, &draft.course)
            }
        }
    }

    /// Inserts a student and shows it at the top of the list.
    pub fn create(&mut self, name: &str, grade: i32, course: &str) -> PresenterResult<ListChange> {
        let id = self.repo.insert(name, grade, course)?;

        let change = match self.repo.fetch(id)? {
            Some(student) => {
                self.students.insert(0, student);
                ListChange::Inserted(0)
            }
            None => {
                warn!("event=student_create module=presenter status=missing_readback id={id}");
                ListChange::Unchanged
            }
        };

        self.refresh_empty_state()?;
        info!("event=student_create module=presenter status=ok id={id}");
        Ok(change)
    }

    /// Overwrites the editable fields of the row at `position`.
    pub fn update_at(
        &mut self,
        position: usize,
        name: &str,
        grade: i32,
        course: &str,
    ) -> PresenterResult<ListChange> {
        let mut updated = self.student_at(position)?.clone();
        updated.apply_edit(name, grade, course);

        let changed = self.repo.update(&updated)?;
        if changed == 0 {
            warn!(
                "event=student_update module=presenter status=no_rows id={} position={}",
                updated.id, position
            );
        }

        let id = updated.id;
        self.students[position] = updated;
        self.refresh_empty_state()?;
        info!("event=student_update module=presenter status=ok id={id} position={position}");
        Ok(ListChange::Changed(position))
    }

    /// Deletes the row at `position`; later rows shift up by one.
    pub fn delete_at(&mut self, position: usize) -> PresenterResult<ListChange> {
        let changed = self.repo.delete(self.student_at(position)?)?;
        let removed = self.students.remove(position);
        if changed == 0 {
            warn!(
                "event=student_delete module=presenter status=no_rows id={} position={}",
                removed.id, position
            );
        }

        self.refresh_empty_state()?;
        info!(
            "event=student_delete module=presenter status=ok id={} position={}",
            removed.id, position
        );
        Ok(ListChange::Removed(position))
    }

    fn student_at(&self, position: usize) -> PresenterResult<&Student> {
        self.students
            .get(position)
            .ok_or(PresenterError::PositionOutOfRange {
                position,
                len: self.students.len(),
            })
    }

    fn refresh_empty_state(&mut self) -> PresenterResult<()> {
        self.empty_state_visible = self.repo.count()? == 0;
        Ok(())
    }
}
