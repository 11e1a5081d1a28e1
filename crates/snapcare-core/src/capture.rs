//! Photo capture boundary.
//!
//! On a phone the camera sits behind a permission prompt and hands back a
//! file. [`FileCamera`] plays that role for the CLI: an existing image on
//! disk is the "captured" photo. A terminal has no permission prompt, so it
//! always grants, and a missing file is reported as not found.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::{CoreError, Result};
use crate::onboarding::{Permission, PermissionStatus};

/// A captured photo on local storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotoHandle {
    pub path: PathBuf,
    pub mime: String,
}

impl PhotoHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mime = mime_for(&path).to_string();
        Self { path, mime }
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo".to_string())
    }

    pub fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        std::fs::read(&self.path)
    }
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "heic" => "image/heic",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

pub trait Camera {
    fn request_permission(&mut self) -> PermissionStatus;
    fn capture_photo(&mut self) -> Result<PhotoHandle>;
}

/// Ask for permission, then capture.
pub fn take_photo<C: Camera + ?Sized>(camera: &mut C) -> Result<PhotoHandle> {
    match camera.request_permission() {
        PermissionStatus::Granted => camera.capture_photo(),
        PermissionStatus::Denied => Err(CoreError::PermissionDenied(Permission::Camera)),
    }
}

/// Camera backed by an image file that already exists.
#[derive(Debug, Clone)]
pub struct FileCamera {
    path: PathBuf,
}

impl FileCamera {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Camera for FileCamera {
    fn request_permission(&mut self) -> PermissionStatus {
        PermissionStatus::Granted
    }

    fn capture_photo(&mut self) -> Result<PhotoHandle> {
        if !self.path.is_file() {
            return Err(CoreError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no photo at {}", self.path.display()),
            )));
        }
        tracing::debug!(path = %self.path.display(), "photo captured from file");
        Ok(PhotoHandle::new(self.path.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_follows_extension() {
        assert_eq!(PhotoHandle::new("a/bruise.JPG").mime, "image/jpeg");
        assert_eq!(PhotoHandle::new("rash.png").mime, "image/png");
        assert_eq!(PhotoHandle::new("scan").mime, "application/octet-stream");
        assert_eq!(PhotoHandle::new("a/bruise.jpg").file_name(), "bruise.jpg");
    }

    #[test]
    fn file_camera_captures_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cut.jpg");
        std::fs::write(&path, b"\xFF\xD8\xFF").unwrap();

        let photo = take_photo(&mut FileCamera::new(&path)).unwrap();
        assert_eq!(photo.path, path);
        assert_eq!(photo.read_bytes().unwrap(), b"\xFF\xD8\xFF");
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = take_photo(&mut FileCamera::new("/definitely/not/here.jpg")).unwrap_err();
        match err {
            CoreError::Io(e) => {
                assert_eq!(e.kind(), std::io::ErrorKind::NotFound);
                assert!(e.to_string().contains("/definitely/not/here.jpg"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    struct DeniedCamera;

    impl Camera for DeniedCamera {
        fn request_permission(&mut self) -> PermissionStatus {
            PermissionStatus::Denied
        }

        fn capture_photo(&mut self) -> Result<PhotoHandle> {
            panic!("capture without permission");
        }
    }

    #[test]
    fn denied_camera_never_captures() {
        let err = take_photo(&mut DeniedCamera).unwrap_err();
        assert!(matches!(err, CoreError::PermissionDenied(Permission::Camera)));
    }
}
