//! Drives many tasks through the public `Bundler` API at once.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{archive_entries, serve_file, serve_file_slowly, test_config};
use link_bundler::{Bundler, Error, Status, TaskError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use wiremock::MockServer;

#[tokio::test]
async fn test_tasks_run_independently_and_each_archive_holds_its_own_files() {
    let server = MockServer::start().await;
    for i in 0..4 {
        serve_file(&server, &format!("/t{i}/a.png"), format!("a{i}").as_bytes()).await;
        serve_file(&server, &format!("/t{i}/b.pdf"), format!("b{i}").as_bytes()).await;
    }
    let bundler = Arc::new(Bundler::new(test_config(2, 4)).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let bundler = bundler.clone();
            let base = server.uri();
            tokio::spawn(async move {
                let task = bundler.create_task().await.unwrap();
                let links = vec![format!("{base}/t{i}/a.png"), format!("{base}/t{i}/b.pdf")];
                let status = bundler.add_links(task.id, &links).await.unwrap();
                (i, status, bundler.take_archive(task.id).await.unwrap())
            })
        })
        .collect();

    for handle in handles {
        let (i, status, archive) = handle.await.unwrap();
        assert_eq!(status, Status::Completed);
        assert_eq!(
            archive_entries(&archive),
            vec![
                ("a.png".to_string(), format!("a{i}").into_bytes()),
                ("b.pdf".to_string(), format!("b{i}").into_bytes()),
            ]
        );
    }
    assert_eq!(bundler.task_count().await, 0);
}

#[tokio::test]
async fn test_capacity_frees_up_once_an_archive_is_downloaded() {
    let server = MockServer::start().await;
    serve_file(&server, "/a.png", b"a").await;
    let bundler = Bundler::new(test_config(1, 2)).unwrap();

    let first = bundler.create_task().await.unwrap();
    bundler.create_task().await.unwrap();
    assert!(matches!(
        bundler.create_task().await,
        Err(Error::CapacityExceeded { max: 2 })
    ));

    let status = bundler
        .add_links(first.id, &[format!("{}/a.png", server.uri())])
        .await
        .unwrap();
    assert_eq!(status, Status::Completed);
    // a finished task still occupies its slot until downloaded
    assert!(bundler.create_task().await.is_err());

    bundler.take_archive(first.id).await.unwrap();
    assert!(bundler.create_task().await.is_ok());
}

#[tokio::test]
async fn test_links_of_one_task_are_fetched_in_parallel() {
    let server = MockServer::start().await;
    let delay = Duration::from_millis(400);
    for name in ["a.png", "b.png", "c.png"] {
        serve_file_slowly(&server, &format!("/{name}"), name.as_bytes(), delay).await;
    }
    let bundler = Bundler::new(test_config(3, 1)).unwrap();
    let task = bundler.create_task().await.unwrap();
    let links: Vec<String> = ["a.png", "b.png", "c.png"]
        .iter()
        .map(|n| format!("{}/{}", server.uri(), n))
        .collect();

    let started = Instant::now();
    let status = bundler.add_links(task.id, &links).await.unwrap();

    assert_eq!(status, Status::Completed);
    assert!(
        started.elapsed() < Duration::from_millis(1100),
        "three 400ms fetches took {:?}",
        started.elapsed()
    );
}

#[tokio::test]
async fn test_a_downloaded_task_is_gone_for_every_operation() {
    let server = MockServer::start().await;
    serve_file(&server, "/a.jpg", b"a").await;
    let bundler = Bundler::new(test_config(1, 1)).unwrap();
    let task = bundler.create_task().await.unwrap();
    bundler
        .add_links(task.id, &[format!("{}/a.jpg", server.uri())])
        .await
        .unwrap();
    bundler.take_archive(task.id).await.unwrap();

    assert!(matches!(
        bundler.status(task.id).await,
        Err(Error::Task(TaskError::NotFound { .. }))
    ));
    assert!(matches!(
        bundler.take_archive(task.id).await,
        Err(Error::Task(TaskError::NotFound { .. }))
    ));
    assert!(matches!(
        bundler.add_links(task.id, &["http://h/x.png".to_string()]).await,
        Err(Error::Task(TaskError::NotFound { .. }))
    ));
}
