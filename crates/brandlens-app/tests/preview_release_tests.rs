//! Integration tests for preview decoding and release semantics.

use std::io::Cursor;

use brandlens_app::decode_preview;
use brandlens_core::{FileCandidate, MediaKind, UploadPolicy};
use brandlens_ui::{MemorySink, UploadForm};

fn png_bytes() -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(2, 2, image::Rgba([200, 40, 40, 255]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("png encoding should work");
    bytes
}

fn form_with_selection(bytes: Vec<u8>) -> (UploadForm, brandlens_core::PreviewTicket) {
    let sink = MemorySink::new();
    let mut form = UploadForm::new(UploadPolicy::image_and_video());
    let ticket = form
        .select_file(
            Some(FileCandidate::with_mime("ad.png", "image/png", bytes)),
            &sink,
        )
        .expect("candidate should be accepted");
    (form, ticket)
}

#[test]
fn preview_release_tests_image_decode_produces_pixels_and_data_url() {
    let bytes = png_bytes();
    let (mut form, ticket) = form_with_selection(bytes.clone());

    let media = form.media().expect("media is stored").clone();
    let preview = decode_preview(&media);
    assert!(preview.data_url.starts_with("data:image/png;base64,"));
    let image = preview.image.as_ref().expect("image media decodes pixels");
    assert_eq!((image.width, image.height), (2, 2));

    assert!(form.complete_preview(ticket, preview));
    assert!(form.preview().is_some());
}

#[test]
fn preview_release_tests_video_decode_skips_pixels() {
    let media = brandlens_core::SelectedMedia {
        file_name: "spot.mp4".to_string(),
        mime: "video/mp4".to_string(),
        kind: MediaKind::Video,
        bytes: vec![0, 1, 2, 3],
    };

    let preview = decode_preview(&media);
    assert!(preview.data_url.starts_with("data:video/mp4;base64,"));
    assert!(preview.image.is_none());
}

#[test]
fn preview_release_tests_reset_releases_exactly_once() {
    let (mut form, ticket) = form_with_selection(png_bytes());
    let media = form.media().expect("media is stored").clone();
    assert!(form.complete_preview(ticket, decode_preview(&media)));

    assert!(form.reset().is_some());
    assert!(form.reset().is_none());
    assert!(form.preview().is_none());
}

#[test]
fn preview_release_tests_stale_decode_cannot_overwrite_new_selection() {
    let sink = MemorySink::new();
    let mut form = UploadForm::new(UploadPolicy::image_and_video());

    let first_ticket = form
        .select_file(
            Some(FileCandidate::with_mime("a.png", "image/png", png_bytes())),
            &sink,
        )
        .expect("first candidate accepted");
    let first_media = form.media().expect("media stored").clone();

    let second_ticket = form
        .select_file(
            Some(FileCandidate::with_mime("b.png", "image/png", png_bytes())),
            &sink,
        )
        .expect("second candidate accepted");
    let second_media = form.media().expect("media stored").clone();

    // The slow first decode lands after the re-selection and is discarded.
    assert!(!form.complete_preview(first_ticket, decode_preview(&first_media)));
    assert!(form.preview().is_none());
    assert!(form.complete_preview(second_ticket, decode_preview(&second_media)));
    assert!(form.preview().is_some());
}

#[test]
fn preview_release_tests_repeated_cycles_do_not_leak() {
    for _ in 0..3 {
        let (mut form, ticket) = form_with_selection(png_bytes());
        let media = form.media().expect("media is stored").clone();
        assert!(form.complete_preview(ticket, decode_preview(&media)));
        assert!(form.reset().is_some());
        assert!(form.reset().is_none());
    }
}
