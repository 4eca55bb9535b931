use assert_fs::TempDir;
use assert_fs::fixture::{FileWriteStr, PathChild};
use common::command::{init_repository_dir, run_minigit_command};
use fake::Fake;
use fake::faker::lorem::en::{Word, Words};
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

const HI_BLOB: &str = "45b983be36b73c0788dc9cbcb76cbb80fc7bb057";

#[rstest]
fn hash_object_prints_the_blob_id_without_storing(init_repository_dir: TempDir) {
    init_repository_dir.child("hi.txt").write_str("hi\n").unwrap();

    run_minigit_command(init_repository_dir.path(), &["hash-object", "hi.txt"])
        .assert()
        .success()
        .stdout(format!("{HI_BLOB}\n"));

    assert!(
        !init_repository_dir
            .path()
            .join(".git/objects/45/b983be36b73c0788dc9cbcb76cbb80fc7bb057")
            .exists()
    );
}

#[rstest]
fn hash_object_with_write_stores_the_blob(init_repository_dir: TempDir) {
    init_repository_dir.child("hi.txt").write_str("hi\n").unwrap();

    run_minigit_command(init_repository_dir.path(), &["hash-object", "-w", "hi.txt"])
        .assert()
        .success()
        .stdout(format!("{HI_BLOB}\n"));

    let object_path = init_repository_dir
        .path()
        .join(".git/objects/45/b983be36b73c0788dc9cbcb76cbb80fc7bb057");
    let compressed = std::fs::read(object_path).unwrap();
    let mut decoder = flate2::read::ZlibDecoder::new(&compressed[..]);
    let mut inflated = Vec::new();
    std::io::Read::read_to_end(&mut decoder, &mut inflated).unwrap();

    assert_eq!(inflated, b"blob 3\0hi\n".to_vec());
}

#[rstest]
fn cat_file_prints_stored_content(init_repository_dir: TempDir) {
    let file_name = format!("{}.txt", Word().fake::<String>());
    let file_content = Words(5..10).fake::<Vec<String>>().join(" ");
    init_repository_dir
        .child(&file_name)
        .write_str(&file_content)
        .unwrap();

    let output = run_minigit_command(init_repository_dir.path(), &["hash-object", "-w", &file_name])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let oid = String::from_utf8(output).unwrap().trim().to_string();

    run_minigit_command(init_repository_dir.path(), &["cat-file", "-p", &oid])
        .assert()
        .success()
        .stdout(file_content);

    run_minigit_command(init_repository_dir.path(), &["cat-file", "-t", &oid])
        .assert()
        .success()
        .stdout("blob\n");
}

#[rstest]
fn cat_file_needs_an_output_mode(init_repository_dir: TempDir) {
    run_minigit_command(init_repository_dir.path(), &["cat-file", HI_BLOB])
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));

    run_minigit_command(init_repository_dir.path(), &["cat-file", "-p", "-t", HI_BLOB])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[rstest]
fn hashing_a_directory_fails(init_repository_dir: TempDir) {
    init_repository_dir.child("dir/file.txt").write_str("x").unwrap();

    run_minigit_command(init_repository_dir.path(), &["hash-object", "dir"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is a directory"));
}

#[rstest]
fn cat_file_of_unknown_object_fails(init_repository_dir: TempDir) {
    run_minigit_command(init_repository_dir.path(), &["cat-file", "-p", HI_BLOB])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no such file or object"));
}

#[rstest]
fn cat_file_reports_corrupt_objects(init_repository_dir: TempDir) {
    let shard = init_repository_dir.path().join(".git/objects/45");
    std::fs::create_dir_all(&shard).unwrap();
    std::fs::write(shard.join(&HI_BLOB[2..]), b"garbage").unwrap();

    run_minigit_command(init_repository_dir.path(), &["cat-file", "-p", HI_BLOB])
        .assert()
        .failure()
        .stderr(predicate::str::contains("corrupt object"));
}
