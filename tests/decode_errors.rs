use smfile::prelude::*;

/// Helper to build a header chunk followed by raw chunks
fn create_file(format: u16, tracks: u16, chunks: &[(&[u8; 4], &[u8])]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&6u32.to_be_bytes());
    bytes.extend_from_slice(&format.to_be_bytes());
    bytes.extend_from_slice(&tracks.to_be_bytes());
    bytes.extend_from_slice(&[0x00, 0x60]); // 96 ticks per quarter note
    for (tag, data) in chunks {
        bytes.extend_from_slice(*tag);
        bytes.extend_from_slice(&(data.len() as u32).to_be_bytes());
        bytes.extend_from_slice(data);
    }
    bytes
}

fn parse_error(bytes: &[u8]) -> ParseError {
    match MidiFile::parse(bytes).unwrap_err().error_kind() {
        ReaderErrorKind::ParseError(e) => e.clone(),
        other => panic!("Expected a parse error, got {other:?}"),
    }
}

const END: &[u8] = &[0x00, 0xFF, 0x2F, 0x00];

#[test]
fn test_missing_header() {
    let mut bytes = create_file(0, 0, &[]);
    bytes[..4].copy_from_slice(b"MTrk");
    assert_eq!(
        parse_error(&bytes),
        HeaderError::MissingHeader(*b"MTrk").into()
    );
}

#[test]
fn test_unknown_format_is_kept() {
    let bytes = create_file(3, 1, &[(b"MTrk", END)]);
    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(file.format_type(), FormatType::Other(3));
    assert_eq!(file.to_bytes().unwrap(), bytes);
}

#[test]
fn test_unknown_smpte_frame_rate_reads_as_ticks_per_quarter_note() {
    let mut bytes = create_file(0, 1, &[(b"MTrk", END)]);
    bytes[12] = 0xE4; // -28
    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(file.timing().division_type(), 0);
    assert_eq!(file.resolution(), 0xE460);
    assert_eq!(file.to_bytes().unwrap(), bytes);
}

#[test]
fn test_unexpected_chunk_where_track_expected() {
    let bytes = create_file(1, 2, &[(b"MTrk", END), (b"XFIH", &[1, 2, 3])]);
    assert_eq!(
        parse_error(&bytes),
        ChunkError::Unexpected {
            expected: *b"MTrk",
            found: *b"XFIH"
        }
        .into()
    );
}

#[test]
fn test_chunks_after_last_track_are_ignored() {
    let bytes = create_file(1, 1, &[(b"MTrk", END), (b"XFIH", &[1, 2, 3])]);
    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(file.track_count(), 1);
}

#[test]
fn test_truncated_track_chunk() {
    let mut bytes = create_file(0, 1, &[(b"MTrk", &[0x00, 0x90, 0x3C, 0x64])]);
    // Declare far more bytes than remain in the file
    let len_at = bytes.len() - 8;
    bytes[len_at..len_at + 4].copy_from_slice(&1000u32.to_be_bytes());
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert!(err.is_out_of_bounds());
}

#[test]
fn test_truncated_event() {
    let bytes = create_file(0, 1, &[(b"MTrk", &[0x00, 0x90, 0x3C])]);
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert!(err.is_out_of_bounds());
}

#[test]
fn test_missing_track() {
    let bytes = create_file(1, 2, &[(b"MTrk", END)]);
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert!(err.is_out_of_bounds());
}

#[test]
fn test_sysex_longer_than_track() {
    let bytes = create_file(0, 1, &[(b"MTrk", &[0x00, 0xF0, 0x7F, 0x01])]);
    assert!(MidiFile::parse(&bytes).unwrap_err().is_out_of_bounds());
}

#[test]
fn test_varlen_too_long() {
    let bytes = create_file(0, 1, &[(b"MTrk", &[0x80, 0x80, 0x80, 0x80, 0x00, 0xC0, 0x01])]);
    assert_eq!(parse_error(&bytes), TrackError::VarLenTooLong.into());
}

#[test]
fn test_rmid_with_wrong_form_type() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&4u32.to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    assert_eq!(parse_error(&bytes), HeaderError::NotRmid(*b"WAVE").into());
}

#[test]
fn test_rmid_without_data_chunk() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&[0, 0, 0, 12]);
    bytes.extend_from_slice(b"RMID");
    bytes.extend_from_slice(b"LIST");
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    assert_eq!(
        parse_error(&bytes),
        HeaderError::MissingRmidData(*b"LIST").into()
    );
}

#[test]
fn test_errors_carry_position() {
    let bytes = create_file(0, 1, &[(b"MTrk", &[0x00, 0x3C, 0x64])]);
    let err = MidiFile::parse(&bytes).unwrap_err();
    // 14 header bytes, 8 chunk header bytes, one delta byte
    assert_eq!(err.position(), 23);
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::ParseError(TrackError::NoRunningStatus(0x3C).into())
    );
}

#[cfg(feature = "std")]
#[test]
fn test_failed_load_leaves_file_untouched() {
    let dir = std::env::temp_dir().join(format!("smfile-load-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("broken.mid");
    std::fs::write(&path, create_file(0, 1, &[(b"MTrk", &[0x00, 0x90])])).unwrap();

    let mut file = MidiFile::new();
    let track = file.create_track();
    file.create_marker_event(track, 0, "keep");
    let before = file.clone();

    assert!(matches!(file.load(&path), Err(SmfError::Read(_))));
    assert_eq!(file, before);
    assert!(matches!(
        file.load(dir.join("missing.mid")),
        Err(SmfError::Io(_))
    ));
    assert_eq!(file, before);

    std::fs::remove_dir_all(&dir).unwrap();
}
