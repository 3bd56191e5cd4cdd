mod error;

pub use error::{Error, Result};

use std::{
	net::SocketAddr,
	sync::{Arc, Mutex},
};

use axum::{
	Router,
	extract::{Request, State},
	middleware::{self, Next},
	response::Response,
};
use tokio::{net::TcpListener, task::JoinHandle};

/// One request observed by a [`TestServer`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedRequest {
	pub path: String,
	pub query: Option<String>,
}
impl RecordedRequest {
	/// Value of the first query pair named `key`, undecoded.
	pub fn query_value(&self, key: &str) -> Option<&str> {
		self.query.as_deref()?.split('&').find_map(|pair| {
			let (name, value) = pair.split_once('=').unwrap_or((pair, ""));

			(name == key).then_some(value)
		})
	}
}

/// Loopback HTTP server hosting a fixture router for the lifetime of a test.
pub struct TestServer {
	addr: SocketAddr,
	requests: Arc<Mutex<Vec<RecordedRequest>>>,
	handle: JoinHandle<()>,
}
impl TestServer {
	pub async fn start(router: Router) -> Result<Self> {
		let listener = TcpListener::bind("127.0.0.1:0").await?;
		let addr = listener.local_addr()?;
		let requests = Arc::new(Mutex::new(Vec::new()));
		let app = router.layer(middleware::from_fn_with_state(requests.clone(), record));
		let handle = tokio::spawn(async move {
			if let Err(err) = axum::serve(listener, app).await {
				eprintln!("Test server stopped: {err}.");
			}
		});

		Ok(Self { addr, requests, handle })
	}

	pub fn addr(&self) -> SocketAddr {
		self.addr
	}

	/// Base URL with a trailing slash, e.g. `http://127.0.0.1:40123/`.
	pub fn base_url(&self) -> String {
		format!("http://{}/", self.addr)
	}

	pub fn requests(&self) -> Vec<RecordedRequest> {
		self.requests.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}

	pub fn last_request(&self) -> Option<RecordedRequest> {
		self.requests.lock().unwrap_or_else(|err| err.into_inner()).last().cloned()
	}
}
impl Drop for TestServer {
	fn drop(&mut self) {
		self.handle.abort();
	}
}

async fn record(
	State(requests): State<Arc<Mutex<Vec<RecordedRequest>>>>,
	request: Request,
	next: Next,
) -> Response {
	let recorded = RecordedRequest {
		path: request.uri().path().to_string(),
		query: request.uri().query().map(str::to_string),
	};

	requests.lock().unwrap_or_else(|err| err.into_inner()).push(recorded);

	next.run(request).await
}
