// View-state machine for the upload page.
//
// static/index.html drives these transitions in the browser; this module is
// the typed definition of that flow. Browser effects (object URLs, the save
// dialog, the file input) sit behind the UiHost trait so every transition can
// be exercised without a browser.

use crate::models::{
    FileInfo, ProcessingResult, UPLOAD_FIELD_NAME, validate_upload,
};

/// Client-local object URL handle (preview image or download blob).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectUrl(pub String);

/// Browser-side effects the view depends on.
pub trait UiHost {
    /// Creates an object URL for the named local file or blob.
    fn create_object_url(&mut self, source: &str) -> ObjectUrl;
    /// Releases an object URL that will no longer be rendered.
    fn revoke_object_url(&mut self, url: ObjectUrl);
    /// Triggers a client-side save of the blob behind `url` as `file_name`.
    fn trigger_save(&mut self, url: &ObjectUrl, file_name: &str);
    /// Clears the file input control.
    fn clear_file_input(&mut self);
}

/// Current page state. A tagged union rather than independent result/error
/// flags: holding both a result and an error at once is unrepresentable.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Idle,
    Submitting,
    Succeeded(ProcessingResult),
    Failed(String),
}

/// One upload to issue: the accepted file, to be sent as multipart form data
/// under `field_name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub field_name: &'static str,
    pub file: FileInfo,
}

/// A download to perform from the Succeeded state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSpec {
    pub url: String,
    pub save_as: String,
}

pub struct UploadView<H: UiHost> {
    host: H,
    state: ViewState,
    preview: Option<ObjectUrl>,
    drag_over: bool,
}

impl<H: UiHost> UploadView<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            state: ViewState::Idle,
            preview: None,
            drag_over: false,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Preview URL for the original image, if one is being shown.
    pub fn preview_url(&self) -> Option<&ObjectUrl> {
        self.preview.as_ref()
    }

    /// Whether the drop zone is highlighted for a hovering drag.
    pub fn is_drag_over(&self) -> bool {
        self.drag_over
    }

    /// Handles a file picked via the file input. Returns the upload to issue,
    /// or None if validation rejected the file (no network call is made).
    ///
    /// Note: a selection arriving while a submission is in flight is not
    /// guarded against; the later response wins.
    pub fn select_file(&mut self, file: FileInfo) -> Option<UploadRequest> {
        if let Err(rejection) = validate_upload(file.size, Some(&file.mime)) {
            self.state = ViewState::Failed(rejection.to_string());
            return None;
        }

        // Release the superseded preview before creating the next one.
        if let Some(old) = self.preview.take() {
            self.host.revoke_object_url(old);
        }
        self.preview = Some(self.host.create_object_url(&file.name));

        self.state = ViewState::Submitting;
        Some(UploadRequest {
            field_name: UPLOAD_FIELD_NAME,
            file,
        })
    }

    pub fn handle_drag_over(&mut self) {
        self.drag_over = true;
    }

    pub fn handle_drag_leave(&mut self) {
        self.drag_over = false;
    }

    /// Handles a drop. Only the first dropped file is considered; the rest
    /// are ignored.
    pub fn handle_drop(&mut self, files: Vec<FileInfo>) -> Option<UploadRequest> {
        self.drag_over = false;
        let first = files.into_iter().next()?;
        self.select_file(first)
    }

    /// Applies the upstream response to the current submission.
    pub fn handle_response(&mut self, response: ProcessingResult) {
        self.state = if response.success {
            ViewState::Succeeded(response)
        } else if response.message.is_empty() {
            ViewState::Failed("Processing failed".to_string())
        } else {
            ViewState::Failed(response.message)
        };
    }

    /// Applies a thrown transport error, prefixed to distinguish it from an
    /// application-level rejection.
    pub fn handle_transport_error(&mut self, detail: &str) {
        self.state = ViewState::Failed(format!("Network error: {}", detail));
    }

    /// What to fetch and how to name the saved file, when a result is shown.
    pub fn download_spec(&self) -> Option<DownloadSpec> {
        let ViewState::Succeeded(result) = &self.state else {
            return None;
        };
        Some(DownloadSpec {
            url: result.processed_image_url.clone(),
            save_as: format!("avatar_{}.png", result.avatar_id),
        })
    }

    /// Saves a fetched processed image: a blob URL is created for the save
    /// and released immediately after, so repeated downloads do not grow the
    /// object-URL table.
    pub fn finish_download(&mut self) {
        let Some(spec) = self.download_spec() else {
            return;
        };
        let blob = self.host.create_object_url(&spec.save_as);
        self.host.trigger_save(&blob, &spec.save_as);
        self.host.revoke_object_url(blob);
    }

    /// Records a failed download fetch.
    pub fn fail_download(&mut self) {
        self.state = ViewState::Failed("Failed to download image".to_string());
    }

    /// Clears result, error, preview, and the file input; returns to Idle.
    pub fn reset(&mut self) {
        if let Some(preview) = self.preview.take() {
            self.host.revoke_object_url(preview);
        }
        self.host.clear_file_input();
        self.state = ViewState::Idle;
        self.drag_over = false;
    }
}
