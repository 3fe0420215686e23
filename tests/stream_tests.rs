use std::io::{Read, Seek, SeekFrom, Write};

use mockfs_kit::{Entry, FsError, MockFileSystem, OpenMode, Platform, StreamOptions};
use proptest::prelude::*;
use rstest::{fixture, rstest};

#[fixture]
fn fs() -> MockFileSystem {
    MockFileSystem::from_entries(Platform::Unix, [("/data/file.txt", Entry::file("0123456789"))])
}

#[rstest]
fn test_read_of_missing_file_fails(fs: MockFileSystem) {
    let err = fs.open("/data/missing.txt", OpenMode::Read).unwrap_err();
    assert_eq!(err, FsError::NotFound { path: "/data/missing.txt".into() });
    assert!(!fs.file_exists("/data/missing.txt"));
}

#[rstest]
fn test_writing_modes_create_empty_file(
    fs: MockFileSystem,
    #[values(OpenMode::Write, OpenMode::Append, OpenMode::Truncate)] mode: OpenMode,
) -> anyhow::Result<()> {
    let stream = fs.open("/data/new.txt", mode)?;
    // visible before the stream is closed
    assert!(fs.file_exists("/data/new.txt"));
    assert!(stream.is_empty());
    drop(stream);
    assert_eq!(fs.read_all_bytes("/data/new.txt")?, Vec::<u8>::new());
    Ok(())
}

#[rstest]
#[case::write(OpenMode::Write, "abc3456789")]
#[case::append(OpenMode::Append, "0123456789abc")]
#[case::truncate(OpenMode::Truncate, "abc")]
fn test_mode_decides_start(
    fs: MockFileSystem,
    #[case] mode: OpenMode,
    #[case] expected: &str,
) -> anyhow::Result<()> {
    let mut stream = fs.open("/data/file.txt", mode)?;
    stream.write_all(b"abc")?;
    stream.close();
    assert_eq!(fs.read_all_text("/data/file.txt")?, expected);
    Ok(())
}

#[rstest]
fn test_writes_invisible_until_flush(fs: MockFileSystem) -> anyhow::Result<()> {
    let mut stream = fs.open("/data/file.txt", OpenMode::Truncate)?;
    stream.write_all(b"new")?;
    // truncation happens in the buffer
    assert_eq!(fs.read_all_text("/data/file.txt")?, "0123456789");

    stream.flush()?;
    assert_eq!(fs.read_all_text("/data/file.txt")?, "new");
    assert_eq!(stream.position(), 3);
    Ok(())
}

#[rstest]
fn test_read_stream_rejects_writes(fs: MockFileSystem) -> anyhow::Result<()> {
    let mut stream = fs.open("/data/file.txt", OpenMode::Read)?;
    assert!(!stream.can_write());
    let err = stream.write(b"x").unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::PermissionDenied);
    assert!(stream.set_len(0).is_err());

    stream.seek(SeekFrom::Start(5))?;
    let mut rest = String::new();
    stream.read_to_string(&mut rest)?;
    assert_eq!(rest, "56789");
    Ok(())
}

#[rstest]
fn test_closed_stream_rejects_everything(fs: MockFileSystem) -> anyhow::Result<()> {
    let mut stream = fs.open("/data/file.txt", OpenMode::Write)?;
    stream.close();
    stream.close();

    assert!(stream.is_closed());
    assert!(!stream.can_read() && !stream.can_write() && !stream.can_seek());
    assert!(stream.read(&mut [0; 4]).is_err());
    assert!(stream.write(b"x").is_err());
    assert!(stream.seek(SeekFrom::Start(0)).is_err());
    assert!(stream.flush().is_err());
    Ok(())
}

#[rstest]
fn test_last_close_wins(fs: MockFileSystem) -> anyhow::Result<()> {
    let mut first = fs.open("/data/file.txt", OpenMode::Truncate)?;
    let mut second = fs.open("/data/file.txt", OpenMode::Truncate)?;
    first.write_all(b"first")?;
    second.write_all(b"second")?;

    second.close();
    first.close();

    assert_eq!(fs.read_all_text("/data/file.txt")?, "first");
    Ok(())
}

#[rstest]
fn test_deleted_file_is_not_recreated(fs: MockFileSystem) -> anyhow::Result<()> {
    let mut stream = fs.open("/data/file.txt", OpenMode::Write)?;
    stream.write_all(b"late")?;
    fs.delete("/data/file.txt")?;
    stream.close();
    assert!(!fs.file_exists("/data/file.txt"));
    Ok(())
}

#[rstest]
fn test_moved_file_keeps_old_content(fs: MockFileSystem) -> anyhow::Result<()> {
    let mut stream = fs.open("/data/file.txt", OpenMode::Truncate)?;
    stream.write_all(b"late")?;
    fs.move_file("/data/file.txt", "/data/moved.txt")?;
    drop(stream);

    assert!(!fs.file_exists("/data/file.txt"));
    assert_eq!(fs.read_all_text("/data/moved.txt")?, "0123456789");
    Ok(())
}

#[rstest]
fn test_delete_on_close(fs: MockFileSystem) -> anyhow::Result<()> {
    let options = StreamOptions::new().delete_on_close(true);
    let mut stream = fs.open_with_options("/data/temp.txt", OpenMode::Write, options)?;
    stream.write_all(b"scratch")?;
    stream.flush()?;
    assert_eq!(fs.read_all_text("/data/temp.txt")?, "scratch");

    drop(stream);
    assert!(!fs.file_exists("/data/temp.txt"));
    assert!(fs.file_exists("/data/file.txt"));
    Ok(())
}

#[rstest]
fn test_directories_cannot_be_opened(
    fs: MockFileSystem,
    #[values(OpenMode::Read, OpenMode::Write)] mode: OpenMode,
) {
    let err = fs.open("/data", mode).unwrap_err();
    assert_eq!(err, FsError::AccessDenied { path: "/data".into() });
}

#[rstest]
fn test_cannot_create_below_file(
    fs: MockFileSystem,
    #[values(OpenMode::Write, OpenMode::Append, OpenMode::Truncate)] mode: OpenMode,
) {
    let err = fs.open("/data/file.txt/child.txt", mode).unwrap_err();
    assert_eq!(err, FsError::AccessDenied { path: "/data/file.txt/child.txt".into() });
    assert!(!fs.file_exists("/data/file.txt/child.txt"));
    assert!(!fs.directory_exists("/data/file.txt"));
}

#[rstest]
fn test_reading_keeps_modified_time(fs: MockFileSystem) -> anyhow::Result<()> {
    let before = fs.get_file("/data/file.txt").map(|e| e.times());
    assert_eq!(fs.read_all_text("/data/file.txt")?, "0123456789");
    assert_eq!(fs.get_file("/data/file.txt").map(|e| e.times()), before);
    Ok(())
}

#[rstest]
fn test_set_len(fs: MockFileSystem) -> anyhow::Result<()> {
    let mut stream = fs.open("/data/file.txt", OpenMode::Append)?;
    assert_eq!(stream.position(), 10);
    stream.set_len(4)?;
    assert_eq!(stream.position(), 4);
    stream.set_len(6)?;
    stream.close();
    assert_eq!(fs.read_all_bytes("/data/file.txt")?, b"0123\0\0");
    Ok(())
}

#[rstest]
fn test_stream_errors_convert_for_question_mark(fs: MockFileSystem) {
    fn write_through(fs: &MockFileSystem) -> mockfs_kit::Result<()> {
        let mut stream = fs.open("/data/file.txt", OpenMode::Read)?;
        stream.write_all(b"x")?;
        Ok(())
    }
    let err = write_through(&fs).unwrap_err();
    assert!(matches!(err, FsError::Io { kind: std::io::ErrorKind::PermissionDenied, .. }));
}

proptest! {
    #[test]
    fn written_bytes_read_back(
        first in proptest::collection::vec(any::<u8>(), 0..256),
        second in proptest::collection::vec(any::<u8>(), 0..256),
    ) {
        let fs = MockFileSystem::with_platform(Platform::Unix);
        {
            let mut stream = fs.open("/blob.bin", OpenMode::Write).unwrap();
            stream.write_all(&first).unwrap();
        }
        {
            let mut stream = fs.open("/blob.bin", OpenMode::Truncate).unwrap();
            stream.write_all(&second).unwrap();
        }

        let mut stream = fs.open("/blob.bin", OpenMode::Read).unwrap();
        let mut read = Vec::new();
        stream.read_to_end(&mut read).unwrap();
        prop_assert_eq!(read, second);
    }

    #[test]
    fn appends_concatenate(
        parts in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..32), 0..8),
    ) {
        let fs = MockFileSystem::with_platform(Platform::Unix);
        for part in &parts {
            let mut stream = fs.open("/log.bin", OpenMode::Append).unwrap();
            stream.write_all(part).unwrap();
        }
        if !parts.is_empty() {
            prop_assert_eq!(fs.read_all_bytes("/log.bin").unwrap(), parts.concat());
        }
    }
}
