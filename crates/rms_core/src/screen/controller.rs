//! Screen controller state machine.
//!
//! # Responsibility
//! - Hold the current screen, the cached record list and the last notice.
//! - Apply `ScreenMessage`s: open forms, edit fields, submit, delete.
//!
//! # Invariants
//! - A rejected or failed submit keeps the form and its input.
//! - A successful write returns to the list and refreshes it.
//! - Delete only runs after an explicit confirmation.

use crate::model::record::{Record, RecordField, RecordId, RecordInput};
use crate::repo::record_repo::RecordRepository;
use crate::service::record_service::{RecordService, ServiceError};
use crate::service::validation::ValidationError;
use log::debug;

/// Whether a form creates a new record or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(RecordId),
}

/// Where a form is in its submit cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormStatus {
    Editing,
    /// Input failed a validation rule; back to editing once the user types.
    Rejected(ValidationError),
    /// The store failed while persisting.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    List {
        /// Record awaiting delete confirmation.
        pending_delete: Option<RecordId>,
    },
    Form {
        mode: FormMode,
        input: RecordInput,
        status: FormStatus,
    },
}

impl Screen {
    fn list() -> Self {
        Self::List {
            pending_delete: None,
        }
    }

    /// Reason the form is not editing cleanly, in the copy of its mode.
    pub fn form_reason(&self) -> Option<String> {
        match self {
            Self::Form {
                mode,
                status: FormStatus::Rejected(reason),
                ..
            } => Some(match mode {
                FormMode::Create => reason.message().to_string(),
                FormMode::Edit(_) => reason.update_message().to_string(),
            }),
            Self::Form {
                status: FormStatus::Failed(reason),
                ..
            } => Some(reason.clone()),
            _ => None,
        }
    }
}

/// User actions understood by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenMessage {
    ShowList,
    OpenCreate,
    OpenEdit(RecordId),
    SetField(RecordField, String),
    Submit,
    Cancel,
    RequestDelete(RecordId),
    ConfirmDelete,
    CancelDelete,
    Refresh,
}

/// Outcome message for the shell to surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

type RefreshListener = Box<dyn FnMut(&[Record])>;

/// Message-driven controller over a `RecordService`.
pub struct ScreenController<R: RecordRepository> {
    service: RecordService<R>,
    screen: Screen,
    records: Vec<Record>,
    notice: Option<Notice>,
    refresh_listener: Option<RefreshListener>,
}

impl<R: RecordRepository> ScreenController<R> {
    /// Starts idle on an empty list; send `Refresh` or `ShowList` to load.
    pub fn new(service: RecordService<R>) -> Self {
        Self {
            service,
            screen: Screen::list(),
            records: Vec::new(),
            notice: None,
            refresh_listener: None,
        }
    }

    /// Registers a callback invoked after every successful list refresh.
    pub fn set_refresh_listener(&mut self, listener: impl FnMut(&[Record]) + 'static) {
        self.refresh_listener = Some(Box::new(listener));
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Notice produced by the last dispatched message, if any.
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn service(&self) -> &RecordService<R> {
        &self.service
    }

    /// Applies one user action and returns the resulting screen.
    pub fn dispatch(&mut self, message: ScreenMessage) -> &Screen {
        debug!("event=screen_dispatch module=screen message={}", message_name(&message));
        self.notice = None;

        match message {
            ScreenMessage::ShowList => {
                self.screen = Screen::list();
                self.refresh();
            }
            ScreenMessage::Refresh => self.refresh(),
            ScreenMessage::OpenCreate => {
                self.screen = Screen::Form {
                    mode: FormMode::Create,
                    input: RecordInput::default(),
                    status: FormStatus::Editing,
                };
            }
            ScreenMessage::OpenEdit(id) => self.open_edit(id),
            ScreenMessage::SetField(field, value) => {
                if let Screen::Form { input, status, .. } = &mut self.screen {
                    input.set(field, value);
                    *status = FormStatus::Editing;
                }
            }
            ScreenMessage::Submit => self.submit(),
            ScreenMessage::Cancel => self.screen = Screen::list(),
            ScreenMessage::RequestDelete(id) => {
                if let Screen::List { pending_delete } = &mut self.screen {
                    *pending_delete = Some(id);
                }
            }
            ScreenMessage::ConfirmDelete => self.confirm_delete(),
            ScreenMessage::CancelDelete => {
                if let Screen::List { pending_delete } = &mut self.screen {
                    *pending_delete = None;
                }
            }
        }

        &self.screen
    }

    fn open_edit(&mut self, id: RecordId) {
        match self.service.get_record(id) {
            Ok(Some(record)) => {
                self.screen = Screen::Form {
                    mode: FormMode::Edit(id),
                    input: RecordInput::from_record(&record),
                    status: FormStatus::Editing,
                };
            }
            Ok(None) => {
                self.screen = Screen::list();
                self.refresh_then_notify(Notice::Error(format!(
                    "Record {id} no longer exists."
                )));
            }
            Err(err) => {
                self.notice = Some(Notice::Error(format!("Failed to load record: {err}")));
            }
        }
    }

    fn submit(&mut self) {
        let Screen::Form {
            mode,
            input,
            status,
        } = &mut self.screen
        else {
            return;
        };

        let result = match *mode {
            FormMode::Create => self.service.create_record(input).map(|_| "Record added."),
            FormMode::Edit(id) => self
                .service
                .update_record(id, input)
                .map(|()| "Record updated."),
        };

        match result {
            Ok(message) => {
                self.screen = Screen::list();
                self.refresh_then_notify(Notice::Info(message.to_string()));
            }
            Err(ServiceError::Validation(reason)) => {
                *status = FormStatus::Rejected(reason);
            }
            Err(ServiceError::Storage(err)) => {
                *status = FormStatus::Failed(err.to_string());
            }
        }
    }

    fn confirm_delete(&mut self) {
        let Screen::List { pending_delete } = &mut self.screen else {
            return;
        };
        let Some(id) = pending_delete.take() else {
            return;
        };

        match self.service.delete_record(id) {
            Ok(()) => {
                self.refresh_then_notify(Notice::Info("Record deleted.".to_string()));
            }
            Err(err) => {
                self.notice = Some(Notice::Error(format!("Failed to delete: {err}")));
            }
        }
    }

    /// Refreshes the list, then reports `outcome`. A failed refresh is
    /// appended to the outcome and turns it into an error notice.
    fn refresh_then_notify(&mut self, outcome: Notice) {
        self.refresh();
        self.notice = Some(match (self.notice.take(), outcome) {
            (Some(Notice::Error(reason)), Notice::Info(message) | Notice::Error(message)) => {
                Notice::Error(format!("{message} {reason}"))
            }
            (_, outcome) => outcome,
        });
    }

    fn refresh(&mut self) {
        match self.service.list_records() {
            Ok(records) => {
                self.records = records;
                if let Some(listener) = self.refresh_listener.as_mut() {
                    listener(&self.records);
                }
            }
            Err(err) => {
                self.notice = Some(Notice::Error(format!("Failed to load records: {err}")));
            }
        }
    }
}

fn message_name(message: &ScreenMessage) -> &'static str {
    match message {
        ScreenMessage::ShowList => "show_list",
        ScreenMessage::OpenCreate => "open_create",
        ScreenMessage::OpenEdit(_) => "open_edit",
        ScreenMessage::SetField(..) => "set_field",
        ScreenMessage::Submit => "submit",
        ScreenMessage::Cancel => "cancel",
        ScreenMessage::RequestDelete(_) => "request_delete",
        ScreenMessage::ConfirmDelete => "confirm_delete",
        ScreenMessage::CancelDelete => "cancel_delete",
        ScreenMessage::Refresh => "refresh",
    }
}
