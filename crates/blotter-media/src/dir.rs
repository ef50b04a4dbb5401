//! [`MediaDir`]: the on-disk photo directory.

use std::path::{Path, PathBuf};

use blotter_core::subject::{PhotoView, SubjectId};
use bytes::Bytes;
use tracing::debug;

use crate::{Error, Result};

/// Longest extension kept from an uploaded file name.
const MAX_EXTENSION_LEN: usize = 8;

/// One uploaded image destined for a subject's photo slot.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
  pub view:      PhotoView,
  /// Name of the file as uploaded; only its extension is used.
  pub file_name: Option<String>,
  pub data:      Bytes,
}

impl PhotoUpload {
  pub fn new(view: PhotoView, file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
    Self { view, file_name: Some(file_name.into()), data: data.into() }
  }
}

/// The extension of `file_name` including the dot (`".jpg"`), if it is short
/// and plain ASCII alphanumeric. Anything else is dropped.
pub fn extension_of(file_name: &str) -> Option<String> {
  let ext = Path::new(file_name).extension()?.to_str()?;
  let plain = !ext.is_empty()
    && ext.len() <= MAX_EXTENSION_LEN
    && ext.bytes().all(|b| b.is_ascii_alphanumeric());
  plain.then(|| format!(".{ext}"))
}

/// The directory holding subject photos.
#[derive(Debug, Clone)]
pub struct MediaDir {
  root: PathBuf,
}

impl MediaDir {
  pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

  pub fn root(&self) -> &Path { &self.root }

  /// Create the root directory if it does not exist.
  pub async fn ensure(&self) -> Result<()> {
    tokio::fs::create_dir_all(&self.root)
      .await
      .map_err(|e| Error::io(&self.root, e))
  }

  /// Where the photo for `(id, view)` is stored.
  pub fn path_for(
    &self,
    id: SubjectId,
    view: PhotoView,
    file_name: Option<&str>,
  ) -> PathBuf {
    let ext = file_name.and_then(extension_of).unwrap_or_default();
    self.root.join(format!("{id}_{}{ext}", view.label()))
  }

  /// Write `upload` for subject `id`, creating the root if needed. Returns
  /// the path written; an existing file at that path is replaced.
  pub async fn write(&self, id: SubjectId, upload: &PhotoUpload) -> Result<PathBuf> {
    self.ensure().await?;
    let path = self.path_for(id, upload.view, upload.file_name.as_deref());
    tokio::fs::write(&path, &upload.data)
      .await
      .map_err(|e| Error::io(&path, e))?;
    debug!(subject_id = id.0, view = upload.view.label(), ?path, "photo written");
    Ok(path)
  }

  /// Read back a stored photo by the path recorded on the subject.
  pub async fn read(&self, path: impl AsRef<Path>) -> Result<Bytes> {
    let path = path.as_ref();
    tokio::fs::read(path)
      .await
      .map(Bytes::from)
      .map_err(|e| Error::io(path, e))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn extension_is_preserved_when_plain() {
    assert_eq!(extension_of("mugshot.JPG").as_deref(), Some(".JPG"));
    assert_eq!(extension_of("a.b.png").as_deref(), Some(".png"));
    assert_eq!(extension_of("noext"), None);
    assert_eq!(extension_of("weird.p/ng"), None);
    assert_eq!(extension_of("x.tar;rm"), None);
    assert_eq!(extension_of("long.abcdefghij"), None);
  }

  #[test]
  fn path_is_keyed_by_id_and_view() {
    let media = MediaDir::new("/srv/media");
    assert_eq!(
      media.path_for(SubjectId(42), PhotoView::Front, Some("face.jpeg")),
      PathBuf::from("/srv/media/42_front.jpeg")
    );
    assert_eq!(
      media.path_for(SubjectId(7), PhotoView::Right, None),
      PathBuf::from("/srv/media/7_right")
    );
  }

  #[tokio::test]
  async fn write_creates_missing_root() {
    let tmp = tempfile::tempdir().unwrap();
    let media = MediaDir::new(tmp.path().join("nested").join("photos"));
    let upload = PhotoUpload::new(PhotoView::Left, "side.png", &b"png-bytes"[..]);

    let path = media.write(SubjectId(3), &upload).await.unwrap();
    assert!(path.ends_with("3_left.png"));
    assert_eq!(media.read(&path).await.unwrap(), Bytes::from_static(b"png-bytes"));
  }

  #[tokio::test]
  async fn reading_a_missing_photo_is_not_found() {
    let tmp = tempfile::tempdir().unwrap();
    let media = MediaDir::new(tmp.path());
    let err = media.read(tmp.path().join("1_front.jpg")).await.unwrap_err();
    assert!(err.is_not_found());
  }
}
