use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use ndarray::ArrayView4;
use proptest::prelude::*;
use tumor_scan::{
    Diagnosis, Error, PatientStore, Processor, Scorer, Session, StaticCredentials, TumorDetector,
    Upload, check_tumor, delete_patient, show_history,
};

/// Scores by mean brightness, so a bright scan reads as a tumor.
struct BrightnessScorer;

impl Scorer for BrightnessScorer {
    fn tumor_probability(&self, batch: ArrayView4<'_, f32>) -> tumor_scan::Result<f32> {
        batch
            .mean()
            .ok_or_else(|| Error::Inference("empty batch".into()))
    }
}

fn encode(width: u32, height: u32, value: u8, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([value, (x % 256) as u8, (y % 256) as u8])
    });
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), format)
        .unwrap();
    bytes
}

fn flat(width: u32, height: u32, value: u8, format: ImageFormat) -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([value; 3])))
        .write_to(&mut Cursor::new(&mut bytes), format)
        .unwrap();
    bytes
}

fn session() -> Session {
    let mut session = Session::new();
    assert!(session.login(&StaticCredentials::new("admin", "admin"), "admin", "admin"));
    session
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn any_image_size_becomes_a_unit_range_224_tensor(
        width in 1u32..600,
        height in 1u32..600,
        value in any::<u8>(),
    ) {
        let tensor = Processor::default()
            .preprocess(&encode(width, height, value, ImageFormat::Png))
            .unwrap();

        prop_assert_eq!(tensor.shape(), &[224, 224, 3]);
        prop_assert!(tensor.iter().all(|v| (0.0..=1.0).contains(v)));
    }
}

#[test]
fn jpeg_uploads_are_accepted() {
    let tensor = Processor::default()
        .preprocess(&encode(300, 200, 40, ImageFormat::Jpeg))
        .unwrap();
    assert_eq!(tensor.shape(), &[224, 224, 3]);
}

#[test]
fn check_then_review_then_delete() {
    let dir = tempfile::tempdir().unwrap();
    let store = PatientStore::new(dir.path().join("data").join("patients.json"));
    let detector = TumorDetector::new(Processor::default(), BrightnessScorer);
    let session = session();

    let bright = Upload::new("bright.png", flat(64, 64, 230, ImageFormat::Png)).unwrap();
    let dark = Upload::new("dark.PNG", flat(64, 64, 20, ImageFormat::Png)).unwrap();

    let (first, _) = check_tumor(&session, &store, &detector, "Alice", &bright).unwrap();
    let (second, _) = check_tumor(&session, &store, &detector, "Bob", &dark).unwrap();
    assert_eq!(first.result, Diagnosis::TumorDetected);
    assert_eq!(second.result, Diagnosis::NoTumorDetected);
    assert!(second.confidence > 50.0);

    let history = show_history(&session, &store).unwrap();
    assert_eq!(history.rows.len(), 2);
    assert_eq!(history.rows[1].name, "Bob");

    assert_eq!(delete_patient(&session, &store, "Alice").unwrap(), 1);
    let history = show_history(&session, &store).unwrap();
    assert_eq!(history.rows.len(), 1);
    assert_eq!(history.rows[0].number, 1);
}

#[test]
fn logged_out_session_cannot_check() {
    let dir = tempfile::tempdir().unwrap();
    let store = PatientStore::new(dir.path().join("patients.json"));
    let detector = TumorDetector::new(Processor::default(), BrightnessScorer);
    let mut session = session();
    session.logout();

    let upload = Upload::new("scan.png", flat(8, 8, 100, ImageFormat::Png)).unwrap();
    let err = check_tumor(&session, &store, &detector, "Alice", &upload).unwrap_err();

    assert!(matches!(err, Error::NotAuthenticated));
    assert!(store.load().unwrap().is_empty());
}
