#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;

/// (archive name, body, day of January 2023)
pub type Entry<'a> = (&'a str, &'a str, u8);

pub fn write_zip(path: &Path, entries: &[Entry]) -> PathBuf {
    let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
    for (name, body, day) in entries {
        let time = zip::DateTime::from_date_and_time(2023, 1, *day, 0, 0, 0).unwrap();
        let options = SimpleFileOptions::default().last_modified_time(time);
        zip.start_file(*name, options).unwrap();
        zip.write_all(body.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
    path.to_path_buf()
}

pub fn canvas_export(dir: &Path) -> PathBuf {
    write_zip(
        &dir.join("ml-systems.imscc"),
        &[
            (
                "imsmanifest.xml",
                r#"<manifest identifier="m1"><title>ML Systems</title></manifest>"#,
                1,
            ),
            (
                "wiki_content/week2.html",
                "<h1>Week 2</h1><p>Deployment</p>",
                3,
            ),
            ("wiki_content/week1.html", "<h1>Week 1</h1><p>Intro</p>", 2),
            ("web_resources/logo.png", "\u{89}PNG", 2),
            ("web_resources/notes.md", "# Notes\nRead chapter 1", 4),
        ],
    )
}

pub fn piazza_export(dir: &Path) -> PathBuf {
    write_zip(
        &dir.join("mech2-piazza.zip"),
        &[
            (
                "config.json",
                r#"{"course_number": "12345", "name": "piazza_sample"}"#,
                1,
            ),
            (
                "users.json",
                r#"[{"user_id": "u1", "name": "Example Student"}]"#,
                2,
            ),
            (
                "class_content_flat.json",
                r#"[{"id": "p1", "subject": "Hello from Piazza", "type": "question"}]"#,
                3,
            ),
            ("stats/summary.csv", "user,posts\nu1,3\nu2,5\n", 4),
            ("README.txt", "not loaded", 5),
        ],
    )
}
