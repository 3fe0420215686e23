use std::io::{Read, Write};

use mockfs_kit::{Entry, MockFileSystem, OpenMode, Platform};

fn main() -> anyhow::Result<()> {
    // a Windows-flavoured file system with one file; `C:\docs` exists implicitly
    let fs = MockFileSystem::from_entries(
        Platform::Windows,
        [(r"C:\docs\first.txt", Entry::file("Hello"))],
    );
    assert!(fs.directory_exists(r"c:\DOCS"));

    // streams buffer their writes; closing (or dropping) writes them back
    {
        let mut stream = fs.open(r"C:\docs\second.txt", OpenMode::Write)?;
        stream.write_all(b"World")?;
    }

    // moves the first file; the destination directory must already exist
    fs.create_directory(r"C:\archive")?;
    fs.move_file(r"C:\docs\first.txt", r"C:\archive\first.txt")?;
    assert!(!fs.file_exists(r"C:\docs\first.txt"));

    // appends lines, each followed by "\r\n"
    fs.append_all_lines(r"C:\archive\log.txt", Some(["started", "moved first.txt"]))?;

    let mut first = String::new();
    fs.open(r"C:\archive\first.txt", OpenMode::Read)?
        .read_to_string(&mut first)?;
    let second = fs.read_all_text(r"C:\docs\second.txt")?;
    println!("{first}, {second}!");

    for path in fs.all_paths() {
        println!("{path}");
    }
    print!("{}", fs.read_all_text(r"C:\archive\log.txt")?);

    // argument errors come with the familiar messages
    if let Err(err) = fs.move_file(None, r"C:\x.txt") {
        println!("{err}");
    }
    Ok(())
}
