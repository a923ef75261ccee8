use super::*;
use image::{AnimationDecoder, codecs::gif::GifDecoder};

fn solid(px: [u8; 4]) -> FrameRGBA {
    FrameRGBA {
        width: 6,
        height: 4,
        data: px.repeat(24),
        premultiplied: true,
    }
}

fn opts(encoding: EncodingDef) -> WriteOptions {
    WriteOptions {
        frame_ms: 100,
        encoding,
    }
}

fn decode_gif(path: &Path) -> Vec<image::Frame> {
    let file = std::io::BufReader::new(std::fs::File::open(path).unwrap());
    GifDecoder::new(file)
        .unwrap()
        .into_frames()
        .collect_frames()
        .unwrap()
}

#[test]
fn gif_keeps_every_frame_and_delay() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("out/anim.gif");
    let frames = [
        solid([255, 0, 0, 255]),
        solid([255, 0, 0, 255]),
        solid([0, 0, 255, 255]),
    ];
    write_artifact(&frames, &path, &opts(EncodingDef::default())).unwrap();

    let decoded = decode_gif(&path);
    assert_eq!(decoded.len(), 3);
    for f in &decoded {
        assert_eq!(f.delay().numer_denom_ms(), (100, 1));
        assert_eq!(f.buffer().dimensions(), (6, 4));
    }
    assert_eq!(decoded[2].buffer().get_pixel(3, 2).0, [0, 0, 255, 255]);
}

#[test]
fn identical_runs_coalesce_into_longer_frames() {
    let frames = [
        solid([255, 0, 0, 255]),
        solid([255, 0, 0, 255]),
        solid([0, 0, 255, 255]),
        solid([255, 0, 0, 255]),
    ];
    let enc = EncodingDef {
        coalesce_identical: true,
        ..EncodingDef::default()
    };
    let planned = plan_gif_frames(&frames, &opts(enc));
    let delays: Vec<_> = planned.iter().map(|f| f.delay_ms).collect();
    assert_eq!(delays, [200, 100, 100]);

    let planned = plan_gif_frames(&frames, &opts(EncodingDef::default()));
    assert_eq!(planned.len(), 4);
}

#[test]
fn shared_palette_limits_colors_across_frames() {
    let gradient = |shift: u8| FrameRGBA {
        width: 256,
        height: 2,
        data: (0..512u32)
            .flat_map(|i| [(i % 256) as u8, shift, (i / 256) as u8 * 200, 255])
            .collect(),
        premultiplied: true,
    };
    let frames = [gradient(0), gradient(90)];
    let enc = EncodingDef::default().with_palette(PaletteMode::Shared);
    let planned = plan_gif_frames(&frames, &opts(enc));
    let mut colors: Vec<&[u8]> = planned
        .iter()
        .flat_map(|f| f.rgba.chunks_exact(4))
        .collect();
    colors.sort_unstable();
    colors.dedup();
    assert!(colors.len() <= MAX_COLORS, "{} colors", colors.len());

    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("shared.gif");
    write_artifact(&frames, &path, &opts(enc)).unwrap();
    assert_eq!(decode_gif(&path).len(), 2);
}

#[test]
fn png_is_a_single_straight_alpha_still() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("still.png");
    // Premultiplied half-transparent white.
    write_artifact(&[solid([128, 128, 128, 128])], &path, &opts(EncodingDef::default()))
        .unwrap();
    let img = image::open(&path).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (6, 4));
    assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255, 128]);

    let two = [solid([0, 0, 0, 255]), solid([0, 0, 0, 255])];
    let err = write_artifact(&two, &path, &opts(EncodingDef::default())).unwrap_err();
    assert!(matches!(err, TutoError::Validation(_)));
}

#[test]
fn bad_inputs_are_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let o = opts(EncodingDef::default());
    assert!(write_artifact(&[], &tmp.path().join("a.gif"), &o).is_err());
    assert!(write_artifact(&[solid([0, 0, 0, 255])], &tmp.path().join("a.jpg"), &o).is_err());

    let mut small = solid([0, 0, 0, 255]);
    small.width = 3;
    small.data.truncate(3 * 4 * 4);
    let mixed = [solid([0, 0, 0, 255]), small];
    assert!(write_artifact(&mixed, &tmp.path().join("a.gif"), &o).is_err());
    assert!(!tmp.path().join("a.gif").exists());
}

/// Loop count from the NETSCAPE2.0 application extension, if present.
fn netscape_loops(bytes: &[u8]) -> Option<u16> {
    const ID: &[u8] = b"NETSCAPE2.0";
    let at = bytes.windows(ID.len()).position(|w| w == ID)?;
    let block = &bytes[at + ID.len()..at + ID.len() + 4];
    assert_eq!(&block[..2], &[0x03, 0x01]);
    Some(u16::from_le_bytes([block[2], block[3]]))
}

#[test]
fn loop_mode_sets_the_netscape_loop_count() {
    let tmp = tempfile::tempdir().unwrap();
    let frames = [solid([0, 0, 0, 255]), solid([255, 255, 255, 255])];
    let written = |mode: LoopMode, name: &str| {
        let path = tmp.path().join(name);
        let enc = EncodingDef::default().with_loop(mode);
        write_artifact(&frames, &path, &opts(enc)).unwrap();
        std::fs::read(&path).unwrap()
    };

    assert_eq!(netscape_loops(&written(LoopMode::Forever, "forever.gif")), Some(0));
    assert_eq!(netscape_loops(&written(LoopMode::Times(3), "times.gif")), Some(3));
    assert_eq!(netscape_loops(&written(LoopMode::Once, "once.gif")), None);
}
