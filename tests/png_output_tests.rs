use byteorder::{BigEndian, ReadBytesExt};
use dmg_background::png::{ChunkType, PngReader, write_file, write_png};
use dmg_background::render::background::{ARROW_COLOR, BACKGROUND_COLOR};
use dmg_background::render::render_background;
use dmg_background::{BackgroundParams, PngEncodeParams, Scale, generate};
use flate2::read::ZlibDecoder;
use std::io::{Cursor, Read};

fn generate_at(scale: Scale) -> Vec<u8> {
    generate(
        &BackgroundParams::default().with_scale(scale),
        &PngEncodeParams::default(),
    )
    .expect("Failed to generate background")
}

/// Walks the raw bytes by hand: signature, then IHDR, IDAT, IEND.
#[test]
fn test_png_structure_validator() {
    let buf = generate_at(Scale::Retina);
    let mut cursor = Cursor::new(&buf);

    // 1) Signature
    let mut sig = [0u8; 8];
    cursor.read_exact(&mut sig).unwrap();
    assert_eq!(&sig, b"\x89PNG\r\n\x1a\n");

    // 2) IHDR
    assert_eq!(cursor.read_u32::<BigEndian>().unwrap(), 13);
    let mut id = [0u8; 4];
    cursor.read_exact(&mut id).unwrap();
    assert_eq!(&id, b"IHDR");
    assert_eq!(cursor.read_u32::<BigEndian>().unwrap(), 1320);
    assert_eq!(cursor.read_u32::<BigEndian>().unwrap(), 800);
    let mut rest = [0u8; 5];
    cursor.read_exact(&mut rest).unwrap();
    assert_eq!(rest, [8, 6, 0, 0, 0], "depth 8, RGBA, deflate, filter 0, no interlace");
    cursor.read_u32::<BigEndian>().unwrap(); // crc

    // 3) Remaining chunks
    let mut seen = Vec::new();
    while (cursor.position() as usize) < buf.len() {
        let len = cursor.read_u32::<BigEndian>().unwrap() as u64;
        cursor.read_exact(&mut id).unwrap();
        seen.push(id);
        cursor.set_position(cursor.position() + len + 4);
    }
    assert_eq!(seen, vec![*b"IDAT", *b"IEND"]);
    assert_eq!(cursor.position() as usize, buf.len());
}

#[test]
fn test_chunks_have_valid_crcs() {
    let buf = generate_at(Scale::Standard);
    let chunks = PngReader::new(Cursor::new(&buf))
        .unwrap()
        .read_all()
        .expect("Every chunk CRC should verify");
    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].chunk_type, ChunkType::IHDR);
    assert_eq!(chunks[2].chunk_type, ChunkType::IEND);
}

#[test]
fn test_idat_scanlines() {
    let buf = generate_at(Scale::Standard);
    let chunks = PngReader::new(Cursor::new(&buf)).unwrap().read_all().unwrap();

    let mut raw = Vec::new();
    ZlibDecoder::new(&chunks[1].data[..])
        .read_to_end(&mut raw)
        .unwrap();

    let stride = 1 + 660 * 4;
    assert_eq!(raw.len(), 400 * stride);
    assert!(raw.chunks(stride).all(|row| row[0] == 0));
}

#[test]
fn test_decodes_with_image_crate() {
    let buf = generate_at(Scale::Retina);
    let img = image::load_from_memory_with_format(&buf, image::ImageFormat::Png)
        .expect("A standard decoder should accept the file")
        .to_rgba8();

    assert_eq!(img.dimensions(), (1320, 800));
    assert_eq!(img.get_pixel(0, 0).0, BACKGROUND_COLOR.0);
    assert_eq!(img.get_pixel(1319, 799).0, BACKGROUND_COLOR.0);
    assert_eq!(img.get_pixel(660, 390).0, ARROW_COLOR.0);
    // Arrow tip is 40 px right of centre.
    assert_eq!(img.get_pixel(700, 390).0, ARROW_COLOR.0);
    assert_eq!(img.get_pixel(701, 390).0, BACKGROUND_COLOR.0);
}

#[test]
fn test_decoded_pixels_match_canvas() {
    let params = BackgroundParams::default().with_scale(Scale::Standard);
    let canvas = render_background(&params);
    let buf = generate(&params, &PngEncodeParams::default()).unwrap();
    let img = image::load_from_memory(&buf).unwrap().to_rgba8();
    assert_eq!(img.as_raw().as_slice(), canvas.as_bytes());
}

#[test]
fn test_write_png_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("build").join("nested").join("dmg-background.png");

    let params = BackgroundParams::default().with_scale(Scale::Standard);
    let canvas = render_background(&params);
    let (w, h) = canvas.dimensions();
    write_png(&path, canvas.as_bytes(), w, h, &PngEncodeParams::default()).unwrap();

    let img = image::open(&path).unwrap();
    assert_eq!((img.width(), img.height()), (660, 400));
}

#[test]
fn test_write_png_reports_io_errors() {
    let dir = tempfile::tempdir().unwrap();
    // A regular file where a directory is expected.
    let blocker = dir.path().join("build");
    std::fs::write(&blocker, b"not a directory").unwrap();
    let path = blocker.join("dmg-background.png");

    let result = write_png(&path, &[0; 4], 1, 1, &PngEncodeParams::default());
    assert!(matches!(result, Err(dmg_background::DmgError::Io(_))));
}

#[test]
fn test_output_is_deterministic() {
    assert_eq!(generate_at(Scale::Standard), generate_at(Scale::Standard));
}

#[test]
fn test_write_file_saves_generated_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("build").join("dmg-background.png");

    let png = generate_at(Scale::Standard);
    write_file(&path, &png).unwrap();

    assert_eq!(std::fs::read(&path).unwrap(), png);
}
