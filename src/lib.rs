//! Send HTTP requests from short scripts and look at what came back.
//!
//! ```no_run
//! use httpscript::{Session, json_encode, succeed};
//! use serde_json::json;
//!
//! # fn main() -> httpscript::Result<()> {
//! let mut s = Session::builder().base_url("https://jsonplaceholder.typicode.com").build()?;
//! let body = json_encode(&json!({"title": "write tests", "done": false}))?;
//! let status = s.post("/todos", &body, &["Content-Type:application/json", "dry==1"])?.status();
//! if succeed(status.as_u16()) {
//!     println!("created {}", s.value("id").as_i64());
//! }
//! # Ok(())
//! # }
//! ```

pub mod decoder;
pub mod error;
pub mod extract;
pub mod highlight;
pub mod http;
pub mod params;
pub mod profile;
pub mod render;
pub mod request;
pub mod session;

pub use error::{Error, Result};
pub use extract::Accessor;
pub use http::{HttpConnectionProfile, HttpResponse};
pub use params::{Params, classify};
pub use profile::Profile;
pub use render::{ColorChoice, Palette, Renderer};
pub use request::HttpRequest;
pub use reqwest::{Method, StatusCode};
pub use session::{Session, SessionBuilder, failed, json_encode, succeed};
