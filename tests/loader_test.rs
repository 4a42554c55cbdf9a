mod common;

use course_graph::{
    graph_from_canvas, graph_from_piazza, CanvasLoader, DocumentLoader, GraphRetriever,
    LoaderError, PiazzaLoader,
};

#[tokio::test]
async fn test_canvas_loader_normalizes_files() {
    let temp = tempfile::tempdir().unwrap();
    let export = common::canvas_export(temp.path());

    let docs = CanvasLoader::new(&export).unwrap().load().await.unwrap();

    let sources: Vec<_> = docs.iter().filter_map(|d| d.source()).collect();
    assert_eq!(
        sources,
        vec![
            "imsmanifest.xml",
            "wiki_content/week2.html",
            "wiki_content/week1.html",
            "web_resources/notes.md",
        ]
    );
    assert_eq!(docs[0].content, "ML Systems");
    assert_eq!(docs[2].content, "Week 1\nIntro");
    assert_eq!(docs[3].content, "Notes\nRead chapter 1");
    assert_eq!(docs[2].timestamp(), Some("2023-01-02T00:00:00"));
    assert!(docs.iter().all(|d| d.course() == Some("ml-systems")));
}

#[tokio::test]
async fn test_graph_from_canvas_links_directory_chronologically() {
    let temp = tempfile::tempdir().unwrap();
    let export = common::canvas_export(temp.path());

    let graph = graph_from_canvas(&export).await.unwrap();

    assert_eq!(
        graph.node_ids().collect::<Vec<_>>(),
        vec!["canvas_0", "canvas_1", "canvas_2", "canvas_3"]
    );
    // week1 (canvas_2) was modified before week2 (canvas_1)
    assert_eq!(graph.edge_count(), 1);
    assert!(graph.has_edge("canvas_2", "canvas_1"));

    let retriever = GraphRetriever::new(&graph, 5);
    let related = retriever.retrieve("canvas_2", None).unwrap();
    assert_eq!(related.len(), 1);
    assert_eq!(related[0].content, "Week 2\nDeployment");
}

#[tokio::test]
async fn test_piazza_loader_reads_json_and_csv() {
    let temp = tempfile::tempdir().unwrap();
    let export = common::piazza_export(temp.path());

    let docs = PiazzaLoader::new(&export).unwrap().load().await.unwrap();

    assert_eq!(docs.len(), 5);
    assert_eq!(docs[0].source(), Some("config.json"));
    assert_eq!(
        docs[0].content,
        r#"{"course_number":"12345","name":"piazza_sample"}"#
    );
    assert_eq!(docs[3].content, "user: u1\nposts: 3");
    assert_eq!(docs[4].content, "user: u2\nposts: 5");
    assert_eq!(docs[4].metadata["row"], serde_json::json!(1));
    assert!(docs.iter().all(|d| d.course() == Some("mech2-piazza")));
}

#[tokio::test]
async fn test_graph_from_piazza_chains_root_files() {
    let temp = tempfile::tempdir().unwrap();
    let export = common::piazza_export(temp.path());

    let graph = graph_from_piazza(&export).await.unwrap();

    assert_eq!(graph.len(), 5);
    assert!(graph.has_edge("piazza_0", "piazza_1"));
    assert!(graph.has_edge("piazza_1", "piazza_2"));
    assert!(graph.has_edge("piazza_3", "piazza_4"));
    assert_eq!(graph.edge_count(), 3);
    assert!(!graph.has_edge("piazza_2", "piazza_3"));
}

#[tokio::test]
async fn test_piazza_invalid_json_is_an_error() {
    let temp = tempfile::tempdir().unwrap();
    let export = common::write_zip(
        &temp.path().join("broken.zip"),
        &[("class_content_flat.json", "{not json", 1)],
    );

    let err = PiazzaLoader::new(&export).unwrap().load().await.unwrap_err();
    assert!(matches!(err, LoaderError::Json { .. }));
    assert!(err.to_string().contains("class_content_flat.json"));
}

#[tokio::test]
async fn test_missing_exports() {
    let temp = tempfile::tempdir().unwrap();
    let missing = temp.path().join("missing.zip");

    assert!(matches!(
        PiazzaLoader::new(&missing),
        Err(LoaderError::NotFound(_))
    ));
    assert!(graph_from_piazza(&missing).await.is_err());
    assert!(graph_from_canvas(temp.path()).await.is_err());
}
