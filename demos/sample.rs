//! Sample application server.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example sample
//!
//! Try:
//!   curl http://localhost:3000/hello/jonghak
//!   curl 'http://localhost:3000/hello?name=jonghak'
//!   curl -X POST http://localhost:3000/people -d 'jonghak'     → {"id":1,...}
//!   curl 'http://localhost:3000/hellojpa?id=1'
//!   curl http://localhost:3000/message -d 'hello message'
//!   curl http://localhost:3000/jsonMessage -H 'content-type: application/json' \
//!        -d '{"id":2022,"name":"jonghak"}'
//!   curl http://localhost:3000/jsonMessage -H 'content-type: application/xml' \
//!        -d '<person><id>2022</id><name>jonghak</name></person>'
//!   curl http://localhost:3000/hi                              → hi.html
//!   curl -i http://localhost:3000/mobile/index.html           → cache-control: max-age=600

use std::sync::Arc;

use gatehouse::Server;

#[path = "app.rs"]
mod app;

#[tokio::main]
async fn main() -> Result<(), gatehouse::Error> {
    tracing_subscriber::fmt::init();

    let repo = Arc::new(app::PersonRepository::default());
    Server::bind("0.0.0.0:3000")?.serve(app::app(repo)).await
}
