// tests/upload_flow_test.rs

use gallery_uploader::thumb::{ItemView, ThumbList};
use gallery_uploader::upload::{
    spawn_uploads, FileProcessor, ImageId, LocalFile, UploadQueue, Uploader,
};
use std::fs;
use std::sync::mpsc::channel;
use std::sync::Arc;
use tempfile::tempdir;

/// Reports a few progress steps, then names the image after its file.
struct SteppingUploader;

impl Uploader for SteppingUploader {
    fn upload(&self, file: &LocalFile, progress: &mut dyn FnMut(f64)) -> Result<ImageId, String> {
        for step in [0.0, 0.5, 1.0] {
            progress(step);
        }
        match file.name.as_deref() {
            Some(name) if name.starts_with("broken") => Err("server said no".to_string()),
            Some(name) => Ok(ImageId::new(format!("/img/{}", name))),
            None => Err("nameless file".to_string()),
        }
    }
}

#[test]
fn folder_to_rendered_list() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.jpg"), b"jpeg").unwrap();
    fs::write(dir.path().join("broken.png"), b"png").unwrap();
    fs::write(dir.path().join("readme.txt"), b"text").unwrap();

    let processor = FileProcessor::new(&["*.jpg".to_string(), "*.png".to_string()]);
    let mut files = processor.collect_folder(dir.path());
    files.sort_by(|a, b| a.name.cmp(&b.name));
    assert_eq!(files.len(), 2);

    let mut queue = UploadQueue::new();
    for file in files {
        queue.enqueue(file);
    }

    let (tx, rx) = channel();
    spawn_uploads(Arc::new(SteppingUploader), queue.queued(), tx)
        .join()
        .unwrap();
    for event in rx.try_iter() {
        queue.apply(event).unwrap();
    }

    let pass = ThumbList::new().render(queue.items());
    assert_eq!(pass.rows.len(), 2);

    match &pass.rows[0].view {
        Ok(ItemView::Done(view)) => assert_eq!(view.thumbnail, "/img/a.jpg.thumb.jpg"),
        other => panic!("expected a done row, got {:?}", other),
    }
    match &pass.rows[1].view {
        Ok(ItemView::Pending(view)) => {
            assert_eq!(view.message(), Some("error: server said no"));
            assert_eq!(view.preview.alt, "preview of broken.png");
        }
        other => panic!("expected an error row, got {:?}", other),
    }
}
