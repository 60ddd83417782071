//! One-shot formatting from a file on disk to files on disk.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use pixform::format::{FormatError, format_file, load_options};
use pixform::imaging::RustBackend;
use pixform::options::{Options, Thumb};
use pixform::pipeline::PipelineEvent;
use std::path::Path;
use tempfile::TempDir;

fn write_png(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 90])
    });
    DynamicImage::ImageRgb8(img).save(path).unwrap();
}

fn dimensions(path: &Path) -> (u32, u32) {
    image::image_dimensions(path).unwrap()
}

#[test]
fn options_file_drives_rotate_crop_resize_and_thumbnails() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("in.png");
    write_png(&src, 80, 60);
    let options_path = tmp.path().join("options.json");
    std::fs::write(
        &options_path,
        r#"{
            "rotate": 90,
            "crop": {"x": 10, "y": 10, "width": 40, "height": 50},
            "resize": {"width": 20},
            "thumbnails": [
                {"suffix": "-small", "width": 8, "height": 8},
                {"suffix": "-wide", "width": 12, "height": 6}
            ]
        }"#,
    )
    .unwrap();
    let options = load_options(&options_path).unwrap();
    let dst = tmp.path().join("out/photo.jpg");

    let saved = format_file(&RustBackend::new(), &src, &dst, &options, None).unwrap();

    assert_eq!(
        saved,
        vec![
            dst.clone(),
            tmp.path().join("out/photo-small.jpg"),
            tmp.path().join("out/photo-wide.jpg"),
        ]
    );
    assert_eq!(ImageFormat::from_path(&saved[0]).unwrap(), ImageFormat::Jpeg);
    assert_eq!(dimensions(&saved[0]), (20, 20));
    assert_eq!(dimensions(&saved[1]), (8, 8));
    assert_eq!(dimensions(&saved[2]), (12, 6));
}

#[test]
fn events_report_every_output_in_order() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("in.png");
    write_png(&src, 30, 20);
    let dst = tmp.path().join("photo.png");
    let options = Options {
        thumbnails: vec![Thumb {
            suffix: "-small".into(),
            width: 10,
            height: 10,
        }],
        ..Options::default()
    };

    let (tx, rx) = std::sync::mpsc::channel();
    format_file(&RustBackend::new(), &src, &dst, &options, Some(tx)).unwrap();

    let ready: Vec<(usize, String)> = rx
        .iter()
        .filter_map(|event| match event {
            PipelineEvent::OutputReady { index, name, .. } => Some((index, name)),
            _ => None,
        })
        .collect();
    assert_eq!(
        ready,
        vec![
            (0, dst.to_string_lossy().into_owned()),
            (1, tmp.path().join("photo-small.png").to_string_lossy().into_owned()),
        ]
    );
}

#[test]
fn empty_suffix_is_rejected_before_writing() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("in.png");
    write_png(&src, 30, 20);
    let dst = tmp.path().join("photo.png");
    let options = Options {
        thumbnails: vec![Thumb::default()],
        ..Options::default()
    };

    let result = format_file(&RustBackend::new(), &src, &dst, &options, None);

    assert!(matches!(result, Err(FormatError::DuplicateOutput(_))));
    assert!(!dst.exists());
}
