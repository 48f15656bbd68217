//! The sample application end to end through `Router::call`.

use std::sync::Arc;

use bytes::Bytes;
use gatehouse::Router;

#[path = "../demos/app.rs"]
mod app;

use app::{Person, PersonRepository};

fn get(uri: &str) -> http::Request<Bytes> {
    http::Request::builder().uri(uri).body(Bytes::new()).unwrap()
}

fn get_with(uri: &str, media_type: &str, body: impl Into<Bytes>) -> http::Request<Bytes> {
    http::Request::builder()
        .uri(uri)
        .header("content-type", media_type)
        .header("accept", media_type)
        .body(body.into())
        .unwrap()
}

fn sample() -> (Router, Arc<PersonRepository>) {
    let repo = Arc::new(PersonRepository::default());
    (app::app(Arc::clone(&repo)), repo)
}

fn jonghak() -> Person {
    Person { id: 2022, name: "jonghak".to_owned() }
}

#[tokio::test]
async fn hello_by_path_and_by_query() {
    let (app, _) = sample();
    assert_eq!(app.call(get("/hello/jonghak")).await.body(), b"hello jonghak");
    assert_eq!(app.call(get("/hello?name=jonghak")).await.body(), b"hello jonghak");
    assert_eq!(app.call(get("/hello")).await.status_code(), 400);
}

#[tokio::test]
async fn hellojpa_greets_a_saved_person() {
    let (app, repo) = sample();
    let person = repo.save("jonghak").await;

    let res = app.call(get(&format!("/hellojpa?id={}", person.id))).await;

    assert_eq!(res.status_code(), 200);
    assert_eq!(res.body(), b"hello jonghak");
}

#[tokio::test]
async fn hellojpa_unknown_id_is_404_and_bad_id_is_400() {
    let (app, _) = sample();
    assert_eq!(app.call(get("/hellojpa?id=42")).await.status_code(), 404);
    assert_eq!(app.call(get("/hellojpa?id=jonghak")).await.status_code(), 400);
    assert_eq!(app.call(get("/hellojpa")).await.status_code(), 400);
}

#[tokio::test]
async fn created_person_is_found_through_its_location() {
    let (app, _) = sample();
    let post = http::Request::builder()
        .method("POST")
        .uri("/people")
        .body(Bytes::from_static(b"jonghak"))
        .unwrap();

    let created = app.call(post).await;
    assert_eq!(created.status_code(), 201);
    let location = created.header("location").unwrap().to_owned();

    assert_eq!(app.call(get(&location)).await.body(), b"hello jonghak");
}

#[tokio::test]
async fn message_echoes_the_body() {
    let (app, _) = sample();
    let req = http::Request::builder()
        .uri("/message")
        .body(Bytes::from_static(b"hello message"))
        .unwrap();

    let res = app.call(req).await;

    assert_eq!(res.status_code(), 200);
    assert_eq!(res.body(), b"hello message");
}

#[tokio::test]
async fn json_message_round_trips() {
    let (app, _) = sample();
    let body = serde_json::to_vec(&jonghak()).unwrap();

    let res = app.call(get_with("/jsonMessage", "application/json", body)).await;

    assert_eq!(res.status_code(), 200);
    assert_eq!(res.header("content-type"), Some("application/json"));
    let echoed: Person = serde_json::from_slice(res.body()).unwrap();
    assert_eq!(echoed, jonghak());
}

#[tokio::test]
async fn xml_message_round_trips() {
    let (app, _) = sample();
    let body = quick_xml::se::to_string(&jonghak()).unwrap();

    let res = app.call(get_with("/jsonMessage", "application/xml", body)).await;

    assert_eq!(res.status_code(), 200);
    assert_eq!(res.header("content-type"), Some("application/xml"));
    let xml = std::str::from_utf8(res.body()).unwrap();
    assert!(xml.starts_with("<person>"), "{xml}");
    assert!(xml.contains("<name>jonghak</name>"), "{xml}");
    assert!(xml.contains("<id>2022</id>"), "{xml}");
    let echoed: Person = quick_xml::de::from_str(xml).unwrap();
    assert_eq!(echoed, jonghak());
}

#[tokio::test]
async fn json_in_xml_out_follows_accept() {
    let (app, _) = sample();
    let req = http::Request::builder()
        .uri("/jsonMessage")
        .header("content-type", "application/json")
        .header("accept", "application/xml")
        .body(Bytes::from(serde_json::to_vec(&jonghak()).unwrap()))
        .unwrap();

    let res = app.call(req).await;

    assert_eq!(res.header("content-type"), Some("application/xml"));
}

#[tokio::test]
async fn unreadable_message_is_400() {
    let (app, _) = sample();
    let res = app.call(get_with("/jsonMessage", "application/json", "{not json")).await;
    assert_eq!(res.status_code(), 400);
}

#[tokio::test]
async fn root_index_is_served() {
    let (app, _) = sample();

    let res = app.call(get("/index.html")).await;

    assert_eq!(res.status_code(), 200);
    assert!(String::from_utf8_lossy(res.body()).contains("hello index"));
    assert_eq!(res.header("cache-control"), None);
}

#[tokio::test]
async fn mobile_index_carries_cache_control() {
    let (app, _) = sample();

    let res = app.call(get("/mobile/index.html")).await;

    assert_eq!(res.status_code(), 200);
    assert!(String::from_utf8_lossy(res.body()).contains("hello mobile"));
    assert_eq!(res.header("cache-control"), Some("max-age=600"));
}

#[tokio::test]
async fn hi_view_serves_hi_html() {
    let (app, _) = sample();

    let res = app.call(get("/hi")).await;

    assert_eq!(res.status_code(), 200);
    assert_eq!(res.header("content-type"), Some("text/html"));
    assert!(String::from_utf8_lossy(res.body()).contains("<h1>hi</h1>"));
}
