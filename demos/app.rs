//! The sample application: greeting endpoints behind two interceptors.
//!
//! Shared by `demos/sample.rs`, which serves it, and `tests/sample_app.rs`,
//! which drives it through `Router::call`.
//!
//! Interceptor order for `/hello/jonghak`:
//!   before another → before greeting → handler → after greeting → after another
//!   → complete greeting → complete another
//!
//! `/message` only sees the greeting interceptor: `another` is scoped to `/hello*`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use gatehouse::middleware::{self, Decision, Interceptor};
use gatehouse::{BoxError, CacheControl, ContentType, Request, Resources, Response, Router, Status};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename = "person")]
pub struct Person {
    pub id: u64,
    pub name: String,
}

/// Stand-in for a database table: id → person.
#[derive(Default)]
pub struct PersonRepository {
    next_id: AtomicU64,
    people: RwLock<HashMap<u64, Person>>,
}

impl PersonRepository {
    pub async fn save(&self, name: &str) -> Person {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let person = Person { id, name: name.to_owned() };
        self.people.write().await.insert(id, person.clone());
        person
    }

    pub async fn find(&self, id: u64) -> Option<Person> {
        self.people.read().await.get(&id).cloned()
    }
}

pub fn app(repo: Arc<PersonRepository>) -> Router {
    let static_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/static");
    let (save_repo, find_repo) = (Arc::clone(&repo), repo);

    Router::new()
        .intercept(middleware::trace().order(i32::MIN))
        .intercept(logging("greeting").order(1))
        .intercept(logging("another").path("/hello*").order(0))
        .get("/hello/{name}", hello_path)
        .get("/hello", hello_query)
        .get("/hellojpa", move |req: Request| hello_jpa(Arc::clone(&find_repo), req))
        .post("/people", move |req: Request| create_person(Arc::clone(&save_repo), req))
        .get("/message", message)
        .get("/jsonMessage", person_message)
        .view("/hi", "hi.html")
        .resources(
            Resources::new("/mobile/**", static_dir.join("mobile"))
                .cache_control(CacheControl::max_age(Duration::from_secs(10 * 60)))
                .resource_chain(true),
        )
        .resources(Resources::new("/", static_dir))
}

/// Logs each phase it takes part in, nothing more.
fn logging(name: &'static str) -> Interceptor {
    Interceptor::new(name)
        .before(move |ctx| {
            info!(interceptor = name, handler = ctx.handler(), "before");
            Ok(Decision::Continue)
        })
        .after(move |_ctx, res| {
            info!(interceptor = name, status = res.status_code(), "after");
            Ok(())
        })
        .on_complete(move |_ctx, outcome| {
            info!(interceptor = name, failed = outcome.is_err(), "complete");
            Ok(())
        })
}

// GET /hello/{name}
async fn hello_path(req: Request) -> String {
    format!("hello {}", req.param("name").unwrap_or_default())
}

// GET /hello?name=…
async fn hello_query(req: Request) -> Response {
    match req.query("name") {
        Some(name) => Response::text(format!("hello {name}")),
        None => Response::status(Status::BAD_REQUEST),
    }
}

// GET /hellojpa?id=…
async fn hello_jpa(repo: Arc<PersonRepository>, req: Request) -> Response {
    let Some(id) = req.query("id").and_then(|id| id.parse::<u64>().ok()) else {
        return Response::status(Status::BAD_REQUEST);
    };
    match repo.find(id).await {
        Some(person) => Response::text(format!("hello {}", person.name)),
        None => Response::status(Status::NOT_FOUND),
    }
}

// POST /people — body is the name
async fn create_person(
    repo: Arc<PersonRepository>,
    req: Request,
) -> Result<Response, serde_json::Error> {
    let name = String::from_utf8_lossy(req.body());
    let person = repo.save(name.trim()).await;
    Ok(Response::builder()
        .status(Status::CREATED)
        .header("location", &format!("/hellojpa?id={}", person.id))
        .json(serde_json::to_vec(&person)?))
}

// GET /message — echoes the body back as text
async fn message(req: Request) -> String {
    String::from_utf8_lossy(req.body()).into_owned()
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Format {
    Json,
    Xml,
}

impl Format {
    /// XML when the media type names it, JSON for anything else.
    fn of(media_type: Option<&str>) -> Self {
        match media_type {
            Some(value) if value.contains("xml") => Self::Xml,
            _ => Self::Json,
        }
    }

    fn read(self, body: &[u8]) -> Result<Person, BoxError> {
        Ok(match self {
            Self::Json => serde_json::from_slice(body)?,
            Self::Xml => quick_xml::de::from_str(std::str::from_utf8(body)?)?,
        })
    }

    fn write(self, person: &Person) -> Result<Response, BoxError> {
        Ok(match self {
            Self::Json => Response::json(serde_json::to_vec(person)?),
            Self::Xml => Response::builder().bytes(ContentType::Xml, quick_xml::se::to_string(person)?),
        })
    }
}

// GET /jsonMessage — reads a person as JSON or XML per Content-Type, answers
// per Accept (falling back to the request's own format)
async fn person_message(req: Request) -> Result<Response, BoxError> {
    let input = Format::of(req.header("content-type"));
    let person = match input.read(req.body()) {
        Ok(person) => person,
        Err(e) => {
            debug!(format = ?input, "unreadable person: {e}");
            return Ok(Response::status(Status::BAD_REQUEST));
        }
    };
    let output = match req.header("accept") {
        Some(accept) if accept != "*/*" => Format::of(Some(accept)),
        _ => input,
    };
    output.write(&person)
}
