use anyhow::Result;
use image::{Rgba, RgbaImage};
use pwaicons::{
    assemble, IconBatch, IconConfig, IconError, Session, SourceImage, TaskRunner, ZipFileOptions,
    ICON_SIZES,
};
use std::io::{Cursor, Read};
use zip::ZipArchive;

fn gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let r = (255 * x / width.max(1)) as u8;
        let g = (255 * y / height.max(1)) as u8;
        Rgba([r, g, 128, 255])
    })
}

fn session_with(img: RgbaImage) -> Result<Session> {
    let mut session = Session::new(&IconConfig::default())?;
    session.load(SourceImage::from_image(img)?);
    Ok(session)
}

fn assert_dimensions(batch: &IconBatch) -> Result<()> {
    for icon in batch {
        let decoded = image::load_from_memory(icon.png())?;
        assert_eq!((decoded.width(), decoded.height()), (icon.size(), icon.size()));
    }
    Ok(())
}

#[test]
fn test_generate_and_package_512() -> Result<()> {
    let mut session = session_with(gradient(512, 512))?;
    let mut runner = TaskRunner::new();
    let batch = session.generate(&mut runner)?.clone();
    assert_eq!(runner.completed(), 8);
    assert_eq!(batch.sizes(), ICON_SIZES.to_vec());
    assert_dimensions(&batch)?;

    let archive = session.archive()?;
    assert_eq!(archive.name(), "pwa-icons.zip");
    let mut zip = ZipArchive::new(Cursor::new(archive.bytes()))?;
    assert_eq!(zip.len(), batch.len());
    for (i, size) in ICON_SIZES.iter().enumerate() {
        let mut file = zip.by_index(i)?;
        assert_eq!(file.name(), format!("icon-{}x{}.png", size, size));
        let mut contents = vec![];
        file.read_to_end(&mut contents)?;
        assert_eq!(contents, batch.icons()[i].png());
        let decoded = image::load_from_memory(&contents)?;
        assert_eq!((decoded.width(), decoded.height()), (*size, *size));
    }
    Ok(())
}

#[test]
fn test_non_square_source() -> Result<()> {
    let mut session = session_with(gradient(300, 97))?;
    let batch = session.generate(&mut ())?;
    assert_eq!(batch.len(), ICON_SIZES.len());
    assert_dimensions(batch)
}

#[test]
fn test_single_pixel_source() -> Result<()> {
    let mut session = session_with(RgbaImage::from_pixel(1, 1, Rgba([0, 200, 100, 255])))?;
    let batch = session.generate(&mut ())?;
    assert_eq!(batch.sizes(), ICON_SIZES.to_vec());
    assert_dimensions(batch)
}

#[test]
fn test_zero_dimension_source_is_rejected() {
    let err = SourceImage::from_image(RgbaImage::new(0, 64)).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<IconError>(),
        Some(IconError::EmptySource { .. })
    ));
}

#[test]
fn test_generate_is_idempotent() -> Result<()> {
    let mut translucent = gradient(64, 40);
    translucent.put_pixel(3, 3, Rgba([10, 10, 10, 0]));
    let mut session = session_with(translucent)?;
    let first = session.generate(&mut ())?.clone();
    let second = session.generate(&mut ())?.clone();
    assert_eq!(first.sizes(), second.sizes());
    for (a, b) in first.iter().zip(second.iter()) {
        let a = image::load_from_memory(a.png())?.to_rgba8();
        let b = image::load_from_memory(b.png())?.to_rgba8();
        assert_eq!(a, b);
    }
    assert_eq!(
        assemble(&first, ZipFileOptions::Compressed)?,
        assemble(&second, ZipFileOptions::Compressed)?
    );
    Ok(())
}

#[test]
fn test_generate_without_source() -> Result<()> {
    let mut session = Session::new(&IconConfig::default())?;
    let err = session.generate(&mut ()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<IconError>(),
        Some(IconError::InputMissing)
    ));
    assert!(session.batch().is_none());
    Ok(())
}

#[test]
fn test_upload_png_bytes() -> Result<()> {
    let mut png = vec![];
    image::DynamicImage::ImageRgba8(gradient(128, 128))
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)?;
    let mut session = Session::new(&IconConfig {
        sizes: vec![96, 72],
        ..Default::default()
    })?;
    session.load_bytes(&png)?;
    let batch = session.generate(&mut ())?;
    assert_eq!(batch.sizes(), vec![96, 72]);
    Ok(())
}
