#![forbid(unsafe_code)]

use path_absolutize::Absolutize;
use std::ops::Deref;
use std::path::Path;

use poem::Request;
use log::{debug, LevelFilter};

// ***************************************************************************
// GENERAL PUBLIC FUNCTIONS
// ***************************************************************************
// ---------------------------------------------------------------------------
// get_absolute_path:
// ---------------------------------------------------------------------------
/** Replace tilde (~) and environment variable values in a path name and
 * then construct the absolute path name.  Unlike canonicalize, absolutize
 * does not care whether the file exists or what the file really is.
 *
 * On any failure the original path is returned unchanged.
 */
pub fn get_absolute_path(path: &str) -> String {
    // Replace ~ and environment variable values if possible.
    let s = match shellexpand::full(path) {
        Ok(x) => x,
        Err(_) => return path.to_owned(),
    };

    // Convert to absolute path if necessary.
    let p = Path::new(s.deref());
    let p1 = match p.absolutize() {
        Ok(x) => x,
        Err(_) => return path.to_owned(),
    };
    let p2 = match p1.to_str() {
        Some(x) => x,
        None => return path.to_owned(),
    };

    p2.to_owned()
}

// ***************************************************************************
//                                  Traits
// ***************************************************************************
pub trait RequestDebug {
    fn get_request_info(&self) -> String;
}

// ---------------------------------------------------------------------------
// debug_request:
// ---------------------------------------------------------------------------
// Dump http request information to the log.
pub fn debug_request(http_req: &Request, req: &impl RequestDebug) {
    // Check that debug or higher logging is in effect.
    let level = log::max_level();
    if level < LevelFilter::Debug {
        return;
    }

    debug!("{}", format_request(http_req, req));
}

// ***************************************************************************
// PRIVATE FUNCTIONS
// ***************************************************************************
// ---------------------------------------------------------------------------
// format_request:
// ---------------------------------------------------------------------------
fn format_request(http_req: &Request, req: &impl RequestDebug) -> String {
    // Accumulate the output.
    let mut s = "\n".to_string();

    // Restate the URI.
    let uri = http_req.uri();
    s += format!("  URI: {:?}\n", uri).as_str();

    // Accumulate the headers
    for (name, value) in http_req.headers().iter() {
        s += format!("  Header: {} = {:?} \n", name, value).as_str();
    }

    // List query parameters.
    if let Some(q) = uri.query() {
        s += format!("  Query Parameters: {:?}\n", q).as_str();
    } else {
        s += "  * No Query Parameters\n";
    }

    // Add the request's information.
    s += req.get_request_info().as_str();
    s
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use super::*;
    use poem::http::Uri;

    struct Probe;
    impl RequestDebug for Probe {
        fn get_request_info(&self) -> String {
            "  Request body:\n    id: 7".to_string()
        }
    }

    #[test]
    fn absolute_paths_pass_through() {
        assert_eq!(get_absolute_path("/var/lib/writer_llm"), "/var/lib/writer_llm");
    }

    #[test]
    fn relative_paths_become_absolute() {
        assert!(Path::new(&get_absolute_path("config/writer_llm.toml")).is_absolute());
    }

    #[test]
    fn request_dump_lists_uri_headers_and_fields() {
        let req = Request::builder()
            .uri(Uri::from_static("/api/users/7?verbose=1"))
            .header("x-trace", "abc")
            .finish();
        let s = format_request(&req, &Probe);
        assert!(s.contains("/api/users/7"));
        assert!(s.contains("Header: x-trace = \"abc\""));
        assert!(s.contains("Query Parameters: \"verbose=1\""));
        assert!(s.ends_with("id: 7"));
    }

    #[test]
    fn request_dump_notes_missing_query() {
        let req = Request::builder().uri(Uri::from_static("/api/users")).finish();
        assert!(format_request(&req, &Probe).contains("* No Query Parameters"));
    }
}
