use crate::e2e::helpers;

use helpers::assertions::artifact_field;
use helpers::fake_tts::FakeTtsEngine;
use helpers::{batch_id, TestContext};
use hyper::StatusCode;
use std::io::{Cursor, Read};
use test_context::test_context;
use zip::ZipArchive;

const TEXT: &str = "你好，我是你的中文老师。";

fn read_zip(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).expect("Response is not a zip");
    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index(i).unwrap();
            let mut content = Vec::new();
            file.read_to_end(&mut content).unwrap();
            (file.name().to_string(), content)
        })
        .collect()
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_download_every_file_as_one_zip(ctx: &TestContext) {
    let created = ctx.create_batch(TEXT, &["A", "B"], 3).await;
    created.assert_status(StatusCode::CREATED);
    let body = created.body.as_ref().unwrap();
    let id = batch_id(body);

    let response = ctx
        .client
        .get(&format!("/api/batches/{}/archive", id))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::OK)
        .assert_header("content-type", "application/zip")
        .assert_header(
            "content-disposition",
            "attachment; filename=\"tts_outputs.zip\"",
        )
        .assert_header("x-archive-entries", "3");

    let entries = read_zip(&response.body_bytes);
    let names: Vec<&str> = entries.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, artifact_field(body, "name"));

    for ((name, content), voice) in entries.iter().zip(["A", "B", "A"]) {
        assert!(!name.contains('/'), "Entry {} has a directory", name);
        assert_eq!(content, &FakeTtsEngine::audio_for(voice, TEXT));
        assert_eq!(content, &std::fs::read(ctx.store_dir.join(name)).unwrap());
    }
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_skip_files_that_are_gone(ctx: &TestContext) {
    let created = ctx.create_batch(TEXT, &["A"], 3).await;
    let body = created.body.as_ref().unwrap();
    let id = batch_id(body);
    let names = artifact_field(body, "name");

    std::fs::remove_file(ctx.store_dir.join(names[1])).unwrap();

    let response = ctx
        .client
        .get(&format!("/api/batches/{}/archive", id))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::OK)
        .assert_header("x-archive-entries", "2");

    let entries: Vec<String> = read_zip(&response.body_bytes)
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(entries, vec![names[0].to_string(), names[2].to_string()]);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_404_for_unknown_batch_archive(ctx: &TestContext) {
    let response = ctx
        .client
        .get(&format!("/api/batches/{}/archive", uuid::Uuid::new_v4()))
        .await
        .unwrap();

    response.assert_status(StatusCode::NOT_FOUND);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_not_archive_a_deleted_batch(ctx: &TestContext) {
    let created = ctx.create_batch(TEXT, &["A"], 2).await;
    let id = batch_id(created.body.as_ref().unwrap());

    ctx.client
        .delete(&format!("/api/batches/{}", id))
        .await
        .unwrap()
        .assert_status(StatusCode::NO_CONTENT);

    let response = ctx
        .client
        .get(&format!("/api/batches/{}/archive", id))
        .await
        .unwrap();
    response.assert_status(StatusCode::NOT_FOUND);
}
