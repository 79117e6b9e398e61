//! What the operator has entered so far: the selected action, the manual
//! entries, and the selected file.
//!
//! The session never talks to the service. It produces owned snapshots for
//! the [`Orchestrator`], so editing entries or picking another file while a
//! request is outstanding cannot affect that request.

use log::{info, warn};

use crate::input::{CsvEncoding, InputError, UploadedFile};
use crate::models::{ClassificationOutcome, RetrainMetrics};
use crate::service::ModelService;
use crate::workflow::{ClassifyInput, Operation, Orchestrator, WorkflowState};

/// Where classify input comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassifyMode {
    /// A growable list of typed opinions
    #[default]
    Manual,
    /// The selected csv/xlsx/xls file
    File,
}

/// State of whichever workflow is currently selected for display.
#[derive(Debug, Clone, PartialEq)]
pub enum Displayed {
    Nothing,
    Classify(WorkflowState<Vec<ClassificationOutcome>>),
    Retrain(WorkflowState<RetrainMetrics>),
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    selected: Option<Operation>,
    mode: ClassifyMode,
    entries: Vec<String>,
    file: Option<UploadedFile>,
}

impl Session {
    /// A fresh session with one empty manual entry.
    pub fn new() -> Self {
        Self {
            entries: vec![String::new()],
            ..Self::default()
        }
    }

    /// Switches the displayed action. Neither workflow is cancelled or reset.
    pub fn select(&mut self, operation: Operation) {
        self.selected = Some(operation);
    }

    pub fn selected(&self) -> Option<Operation> {
        self.selected
    }

    pub fn set_mode(&mut self, mode: ClassifyMode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> ClassifyMode {
        self.mode
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn add_entry(&mut self) {
        self.entries.push(String::new());
    }

    /// Replaces the text of entry `index`. Returns `false` if there is no such entry.
    pub fn update_entry(&mut self, index: usize, text: impl Into<String>) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) => {
                *entry = text.into();
                true
            }
            None => false,
        }
    }

    pub fn remove_entry(&mut self, index: usize) -> Option<String> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    pub fn file(&self) -> Option<&UploadedFile> {
        self.file.as_ref()
    }

    /// Selects a new file. An unsupported extension is refused and the
    /// previously selected file, if any, stays in place.
    pub fn select_file(
        &mut self,
        file_name: impl Into<String>,
        bytes: impl Into<std::sync::Arc<[u8]>>,
        encoding: CsvEncoding,
    ) -> Result<&UploadedFile, InputError> {
        let file = match UploadedFile::new(file_name, bytes) {
            Ok(file) => file.with_encoding(encoding),
            Err(err) => {
                warn!("File not accepted: {}", err);
                return Err(err);
            }
        };
        info!("Selected {} ({})", file.file_name(), file.format());
        Ok(self.file.insert(file))
    }

    /// Selects an already constructed upload.
    pub fn set_file(&mut self, file: UploadedFile) {
        self.file = Some(file);
    }

    /// Snapshot of the classify input for the current mode. File mode with
    /// no file selected is left for the orchestrator to reject.
    pub fn classify_input(&self) -> ClassifyInput {
        match self.mode {
            ClassifyMode::Manual => ClassifyInput::Manual(self.entries.clone()),
            ClassifyMode::File => ClassifyInput::File(self.file.clone()),
        }
    }

    /// Snapshot of the file to retrain with.
    pub fn retrain_file(&self) -> Option<UploadedFile> {
        self.file.clone()
    }

    /// The state to render for the selected action.
    pub fn displayed<S: ModelService>(&self, orchestrator: &Orchestrator<S>) -> Displayed {
        match self.selected {
            None => Displayed::Nothing,
            Some(Operation::Classify) => Displayed::Classify(orchestrator.classify_state()),
            Some(Operation::Retrain) => Displayed::Retrain(orchestrator.retrain_state()),
        }
    }
}
